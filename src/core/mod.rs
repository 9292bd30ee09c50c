pub mod charts;
pub mod error;
pub mod metrics;
pub mod models;
pub mod preparation;
pub mod reporting;
pub mod smoothing;
