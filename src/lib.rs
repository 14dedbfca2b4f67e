pub mod http;
pub mod scan;
pub mod utils;

pub use scan::engine::{DocumentCheck, ScanEngine, ScanOutcome};
pub use scan::error::ScanError;
