pub mod dashboard;

pub use dashboard::DashboardLayout;
