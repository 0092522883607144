pub mod app;
pub mod error;
pub mod metrics;
pub mod stream;
