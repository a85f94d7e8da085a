// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    build_report, parse_format, parse_payload, read_payload, report_destination,
    resolve_output_path, write_report,
};

// Re-export walk functionality from chainscope-core
pub use chainscope_core::walk::{WalkOptions, WalkProgressCallback, execute_walk};
