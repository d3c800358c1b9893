use std::time::Duration;

use reqwest::{
	Client,
	header::{CONTENT_TYPE, HeaderMap, HeaderName},
};
use serde_json::{Map, Value, json};

use crate::{
	BoxFuture, BulkCall, CountCall, DeleteByQueryCall, Error, Result, SearchBackend, SearchCall,
};

/// HTTP implementation of the backend boundary.
pub struct HttpBackend {
	client: Client,
	base_url: String,
}
impl HttpBackend {
	pub fn new(cfg: &trawl_config::Backend) -> Result<Self> {
		let client = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(default_headers(&cfg.default_headers)?)
			.build()?;

		Ok(Self { client, base_url: cfg.url.trim_end_matches('/').to_string() })
	}

	fn url(&self, path: &str) -> String {
		format!("{}/{path}", self.base_url)
	}

	async fn post_json(&self, path: &str, query: &[(&str, String)], body: &Value) -> Result<Value> {
		let res = self.client.post(self.url(path)).query(query).json(body).send().await?;

		Ok(res.error_for_status()?.json().await?)
	}
}
impl SearchBackend for HttpBackend {
	fn search<'a>(&'a self, call: SearchCall) -> BoxFuture<'a, Result<Value>> {
		Box::pin(async move {
			let mut query = vec![("ignore_throttled", call.ignore_throttled.to_string())];

			if let Some(size) = call.size {
				query.push(("size", size.to_string()));
			}
			if let Some(from) = call.from {
				query.push(("from", from.to_string()));
			}

			self.post_json(&format!("{}/_search", call.index), &query, &call.body).await
		})
	}

	fn count<'a>(&'a self, call: CountCall) -> BoxFuture<'a, Result<Value>> {
		Box::pin(async move {
			let query = [("ignore_throttled", call.ignore_throttled.to_string())];

			self.post_json(&format!("{}/_count", call.index), &query, &call.body).await
		})
	}

	fn bulk<'a>(&'a self, call: BulkCall) -> BoxFuture<'a, Result<Value>> {
		Box::pin(async move {
			let payload = call.ndjson()?;
			let res = self
				.client
				.post(self.url("_bulk"))
				.query(&[("refresh", call.refresh.to_string())])
				.header(CONTENT_TYPE, "application/x-ndjson")
				.body(payload)
				.send()
				.await?;

			Ok(res.error_for_status()?.json().await?)
		})
	}

	fn delete_by_query<'a>(&'a self, call: DeleteByQueryCall) -> BoxFuture<'a, Result<Value>> {
		Box::pin(async move {
			let query = [("refresh", call.refresh.to_string())];

			self.post_json(&format!("{}/_delete_by_query", call.index), &query, &call.body).await
		})
	}

	fn create_index<'a>(
		&'a self,
		index: &'a str,
		settings: Option<Value>,
		mappings: Option<Value>,
	) -> BoxFuture<'a, Result<Value>> {
		Box::pin(async move {
			let mut body = Map::new();

			if let Some(settings) = settings {
				body.insert("settings".to_string(), settings);
			}
			if let Some(mappings) = mappings {
				body.insert("mappings".to_string(), mappings);
			}

			let res =
				self.client.put(self.url(index)).json(&Value::Object(body)).send().await?;

			Ok(res.error_for_status()?.json().await?)
		})
	}

	fn index_exists<'a>(&'a self, index: &'a str) -> BoxFuture<'a, Result<bool>> {
		Box::pin(async move {
			let res = self.client.head(self.url(index)).send().await?;

			match res.status().as_u16() {
				200 => Ok(true),
				404 => Ok(false),
				status =>
					Err(Error::UnexpectedStatus { status, context: format!("HEAD {index}") }),
			}
		})
	}

	fn delete_index<'a>(&'a self, index: &'a str) -> BoxFuture<'a, Result<Value>> {
		Box::pin(async move {
			let res = self.client.delete(self.url(index)).send().await?;

			Ok(res.error_for_status()?.json().await?)
		})
	}

	fn close_index<'a>(&'a self, index: &'a str) -> BoxFuture<'a, Result<Value>> {
		Box::pin(async move {
			self.post_json(&format!("{index}/_close"), &[], &json!({})).await
		})
	}

	fn open_index<'a>(&'a self, index: &'a str) -> BoxFuture<'a, Result<Value>> {
		Box::pin(async move { self.post_json(&format!("{index}/_open"), &[], &json!({})).await })
	}

	fn put_settings<'a>(&'a self, index: &'a str, settings: Value) -> BoxFuture<'a, Result<Value>> {
		Box::pin(async move {
			let res = self
				.client
				.put(self.url(&format!("{index}/_settings")))
				.json(&settings)
				.send()
				.await?;

			Ok(res.error_for_status()?.json().await?)
		})
	}

	fn put_mapping<'a>(&'a self, index: &'a str, mapping: Value) -> BoxFuture<'a, Result<Value>> {
		Box::pin(async move {
			let res = self
				.client
				.put(self.url(&format!("{index}/_mapping")))
				.json(&mapping)
				.send()
				.await?;

			Ok(res.error_for_status()?.json().await?)
		})
	}
}

fn default_headers(raw: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	for (name, value) in raw {
		let Some(text) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: format!("Header {name} must be a string."),
			});
		};

		headers.insert(HeaderName::from_bytes(name.as_bytes())?, text.parse()?);
	}

	Ok(headers)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn header_map_builds_from_string_values() {
		let mut raw = Map::new();

		raw.insert("authorization".to_string(), json!("ApiKey secret"));

		let headers = default_headers(&raw).expect("Headers must build.");

		assert_eq!(headers.get("authorization").and_then(|v| v.to_str().ok()), Some("ApiKey secret"));
	}

	#[test]
	fn non_string_header_values_are_rejected() {
		let mut raw = Map::new();

		raw.insert("x-attempts".to_string(), json!(3));

		let err = default_headers(&raw).expect_err("Numeric header values must be rejected.");

		assert!(matches!(err, Error::InvalidConfig { .. }));
	}
}
