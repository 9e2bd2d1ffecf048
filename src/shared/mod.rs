pub mod errors;
pub mod hooks;
pub mod services;
pub mod storage;
pub mod validate;
