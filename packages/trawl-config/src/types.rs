use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub backend: Backend,
	#[serde(default)]
	pub indexing: Indexing,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Backend {
	pub url: String,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
	/// Optional. Sent with every backend request, e.g. an Authorization
	/// header. Values must be strings.
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Indexing {
	/// Whether bulk writes block until the index is queryable again.
	#[serde(default = "default_refresh_writes")]
	pub refresh_writes: bool,
	/// Page size used when a paginating caller does not supply one.
	#[serde(default = "default_per_page")]
	pub default_per_page: u64,
}
impl Default for Indexing {
	fn default() -> Self {
		Self { refresh_writes: default_refresh_writes(), default_per_page: default_per_page() }
	}
}

fn default_timeout_ms() -> u64 {
	30_000
}

fn default_refresh_writes() -> bool {
	true
}

fn default_per_page() -> u64 {
	15
}
