pub mod log_service;
pub mod model;
