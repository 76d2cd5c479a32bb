//! HTTP transport for the solver RFQ protocol.

use crate::wire::{SolverRequestBody, SolverResponse};
use async_trait::async_trait;
use auction_types::QuoteError;
use std::time::Duration;
use tracing::{debug, warn};

/// Transport seam between the normalizer and the network. Tests plug in
/// deterministic stubs here.
#[async_trait]
pub trait RfqApi: Send + Sync {
	async fn call(&self, url: &str, body: &SolverRequestBody) -> Result<SolverResponse, QuoteError>;
}

/// Reqwest-backed RFQ client. One shared client per process; reqwest pools
/// connections per host underneath.
pub struct HttpRfqClient {
	client: reqwest::Client,
	api_key: String,
}

impl HttpRfqClient {
	pub fn new(api_key: impl Into<String>) -> Self {
		Self {
			client: reqwest::Client::new(),
			api_key: api_key.into(),
		}
	}

	/// A client whose connect timeout is bounded separately from the
	/// auction's own per-call race.
	pub fn with_connect_timeout(api_key: impl Into<String>, timeout: Duration) -> Self {
		let client = reqwest::Client::builder()
			.connect_timeout(timeout)
			.build()
			.unwrap_or_default();
		Self {
			client,
			api_key: api_key.into(),
		}
	}
}

#[async_trait]
impl RfqApi for HttpRfqClient {
	async fn call(&self, url: &str, body: &SolverRequestBody) -> Result<SolverResponse, QuoteError> {
		let response = self
			.client
			.post(url)
			.header("Content-Type", "application/json")
			.header("X-API-KEY", &self.api_key)
			.json(body)
			.send()
			.await
			.map_err(|e| {
				warn!("[{}] rfq fetch failed: {}", body.session_id, e);
				QuoteError::FetchFailed
			})?;

		let status = response.status();
		let parsed = response.json::<SolverResponse>().await.map_err(|e| {
			warn!("[{}] rfq decode failed: {}", body.session_id, e);
			QuoteError::Provider("generalError".to_string())
		})?;

		if !status.is_success() {
			debug!("[{}] rfq non-200 status {}", body.session_id, status);
			let reason = parsed
				.error
				.clone()
				.or_else(|| parsed.error_message.clone())
				.unwrap_or_else(|| format!("status {}", status.as_u16()));
			return Err(QuoteError::Provider(reason));
		}
		Ok(parsed)
	}
}
