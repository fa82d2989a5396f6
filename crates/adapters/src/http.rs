//! Shared HTTP plumbing for live-mode adapters

use std::time::Duration;

use grocer_types::{AdapterError, AdapterResult, ProviderRuntimeConfig};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use url::Url;

/// Build a client honoring the provider's timeout, credential, and headers
pub fn client_for(config: &ProviderRuntimeConfig) -> AdapterResult<Client> {
	let mut headers = HeaderMap::new();

	if let Some(api_key) = &config.api_key {
		let value = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| {
			AdapterError::Config {
				reason: format!("invalid api key for provider {}", config.provider_id),
			}
		})?;
		headers.insert(reqwest::header::AUTHORIZATION, value);
	}

	if let Some(custom) = &config.headers {
		for (name, value) in custom {
			let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
				AdapterError::Config {
					reason: format!("invalid header name '{name}'"),
				}
			})?;
			let value = HeaderValue::from_str(value).map_err(|_| AdapterError::Config {
				reason: format!("invalid header value for '{name}'"),
			})?;
			headers.insert(name, value);
		}
	}

	Client::builder()
		.timeout(Duration::from_millis(config.timeout_ms))
		.default_headers(headers)
		.build()
		.map_err(AdapterError::Http)
}

/// Properly construct a URL by joining the base endpoint with a path
pub fn join_url(base_url: &str, path: &str) -> AdapterResult<String> {
	let mut base = Url::parse(base_url).map_err(|e| AdapterError::InvalidResponse {
		reason: format!("invalid base URL '{base_url}': {e}"),
	})?;

	// Treat the base as a directory so join() appends instead of replacing
	if !base.path().ends_with('/') {
		base.set_path(&format!("{}/", base.path()));
	}

	let joined = base.join(path).map_err(|e| AdapterError::InvalidResponse {
		reason: format!("failed to join '{path}' to '{base_url}': {e}"),
	})?;

	Ok(joined.to_string())
}
