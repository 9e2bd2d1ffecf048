pub mod dashboard;
pub mod landing;
pub mod login;
pub mod routes;
pub mod signup;

pub use routes::{App, Route};
