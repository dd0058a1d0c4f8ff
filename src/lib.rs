pub mod args;
pub mod compliance;
pub mod config;
pub mod engine;
pub mod errors;
pub mod matcher;
pub mod model;
pub mod report_store;
pub mod rules;
pub mod scan_service;
pub mod selector;
pub mod tracking;

pub use errors::AppError;
pub use model::{ScanConfig, ScanReport, Vulnerability};
pub use scan_service::ScanService;
