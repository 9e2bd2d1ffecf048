pub mod information;
pub mod metrics;
pub mod overview;
pub mod test;

pub use information::Information;
pub use metrics::Metrics;
pub use overview::Overview;
pub use test::TestPage;
