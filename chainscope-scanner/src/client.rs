use crate::error::{Result, ScanError};
use crate::result::{self, DependencyResult};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

const DEFAULT_CALLER_PATH: &str = "URLCaller/depth";

/// Raw answer of a single GET against a chain endpoint
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub success: bool,
    pub status_code: u16,
    pub body: String,
    pub response_time: Duration,
}

/// HTTP client that asks a chain endpoint to walk its dependencies.
///
/// The endpoint itself performs the recursion; the client only triggers it
/// and turns the returned payload into a [`DependencyResult`].
pub struct ChainClient {
    client: Client,
    caller_path: String,
}

impl ChainClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(30)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent("Chainscope/0.1 (https://github.com/trapdoorsec/chainscope)")
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            caller_path: DEFAULT_CALLER_PATH.to_string(),
        })
    }

    /// Path joined onto the base URL before the depth segment
    pub fn with_caller_path(mut self, path: &str) -> Self {
        self.caller_path = path.trim_matches('/').to_string();
        self
    }

    /// Build `{base}/{caller_path}/{depth}`, keeping any path prefix of `base`.
    pub fn walk_url(&self, base_url: &str, depth: usize) -> Result<Url> {
        let mut base = Url::parse(base_url)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        if base.cannot_be_a_base() {
            return Err(ScanError::InvalidUrl(format!(
                "{}: cannot be used as a base URL",
                base_url
            )));
        }

        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        base.join(&format!("{}/{}", self.caller_path, depth))
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", base_url, e)))
    }

    pub async fn fetch(&self, url: &str) -> Result<FetchOutcome> {
        debug!("Fetching {}", url);

        let start = Instant::now();
        let response = self.client.get(url).send().await?;
        let response_time = start.elapsed();

        let status = response.status();
        let body = response.text().await?;

        debug!(
            "Fetched {} -> {} in {:?} ({} bytes)",
            url,
            status.as_u16(),
            response_time,
            body.len()
        );

        Ok(FetchOutcome {
            success: status.is_success(),
            status_code: status.as_u16(),
            body,
            response_time,
        })
    }

    /// Ask the chain endpoint at `base_url` to walk `depth` levels deep.
    pub async fn walk(&self, base_url: &str, depth: usize) -> Result<DependencyResult> {
        let url = self.walk_url(base_url, depth)?;
        info!("Walking {} with depth {}", base_url, depth);

        let outcome = self.fetch(url.as_str()).await?;
        if !outcome.success {
            warn!("Chain endpoint {} answered {}", url, outcome.status_code);
            return Err(ScanError::UnexpectedStatus(outcome.status_code));
        }

        let tree = result::parse(&outcome.body)?;
        info!(
            "Walk complete. {} levels reported by {} in {:?}",
            tree.depth(),
            tree.url,
            outcome.response_time
        );
        Ok(tree)
    }
}
