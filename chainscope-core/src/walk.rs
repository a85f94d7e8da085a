use chainscope_scanner::{ChainClient, DependencyResult, ScanError};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Options for configuring a walk
#[derive(Debug, Clone)]
pub struct WalkOptions {
    pub url: String,
    pub depth: usize,
    pub timeout_secs: u64,
    pub caller_path: Option<String>,
    pub show_progress: bool,
}

impl WalkOptions {
    pub fn new(url: impl Into<String>, depth: usize) -> Self {
        Self {
            url: url.into(),
            depth,
            timeout_secs: 30,
            caller_path: None,
            show_progress: false,
        }
    }
}

/// Callback for reporting walk progress
pub type WalkProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Ask the chain endpoint behind `options.url` for its dependency tree
pub async fn execute_walk(
    options: WalkOptions,
    progress_callback: Option<WalkProgressCallback>,
) -> Result<DependencyResult, ScanError> {
    let WalkOptions {
        url,
        depth,
        timeout_secs,
        caller_path,
        show_progress,
    } = options;

    let mut client = ChainClient::with_timeout(timeout_secs)?;
    if let Some(ref path) = caller_path {
        client = client.with_caller_path(path);
    }

    let target = client.walk_url(&url, depth)?;

    let spinner = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let start_msg = format!("Walking {} (depth {})...", target, depth);
    if let Some(ref pb) = spinner {
        pb.set_message(start_msg.clone());
    }
    if let Some(ref callback) = progress_callback {
        callback(start_msg);
    }

    let result = client.walk(&url, depth).await;

    match result {
        Ok(ref tree) => {
            let summary = tree.summary();
            let msg = format!(
                "Walk complete! {} endpoints, {} failed calls",
                summary.nodes, summary.failed_calls
            );
            if let Some(ref pb) = spinner {
                pb.finish_with_message(msg.clone());
            }
            if let Some(ref callback) = progress_callback {
                callback(msg);
            }
        }
        Err(ref e) => {
            warn!("Walk of {} failed: {}", url, e);
            if let Some(ref pb) = spinner {
                pb.finish_and_clear();
            }
            if let Some(ref callback) = progress_callback {
                callback(format!("[!]  Failed to walk {}: {}", url, e));
            }
        }
    }

    result
}
