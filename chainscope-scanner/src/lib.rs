pub mod client;
pub mod error;
pub mod result;

pub use client::{ChainClient, FetchOutcome};
pub use error::ScanError;
pub use result::{CallOutcome, DependencyResult, TreeSummary, parse};
