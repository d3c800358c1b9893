use serde::Serialize;
use serde_json::{Value, json};

use crate::Result;

/// Assembled parameters for one search dispatch. This is also what a
/// pre-execution override receives in place of default dispatch.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchCall {
	pub index: String,
	pub body: Value,
	pub ignore_throttled: bool,
	pub size: Option<u64>,
	pub from: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CountCall {
	pub index: String,
	pub body: Value,
	pub ignore_throttled: bool,
}

/// One batched mutation: alternating action-metadata and document lines.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BulkCall {
	pub refresh: bool,
	pub body: Vec<Value>,
}
impl BulkCall {
	pub fn new(refresh: bool) -> Self {
		Self { refresh, body: Vec::new() }
	}

	/// Appends an update-or-insert action for one document.
	pub fn upsert(&mut self, index: &str, id: &str, doc: Value) {
		self.body.push(json!({ "update": { "_index": index, "_id": id } }));
		self.body.push(json!({ "doc": doc, "doc_as_upsert": true }));
	}

	/// Appends a delete action for one document.
	pub fn delete(&mut self, index: &str, id: &str) {
		self.body.push(json!({ "delete": { "_index": index, "_id": id } }));
	}

	pub fn is_empty(&self) -> bool {
		self.body.is_empty()
	}

	pub fn len(&self) -> usize {
		self.body.len()
	}

	/// Renders the newline-delimited wire payload.
	pub fn ndjson(&self) -> Result<String> {
		let mut out = String::new();

		for line in &self.body {
			out.push_str(&serde_json::to_string(line)?);
			out.push('\n');
		}

		Ok(out)
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DeleteByQueryCall {
	pub index: String,
	pub refresh: bool,
	pub body: Value,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn upsert_appends_an_action_and_document_pair() {
		let mut call = BulkCall::new(true);

		call.upsert("products", "p-1", json!({ "name": "boots" }));

		assert_eq!(call.len(), 2);
		assert_eq!(call.body[0], json!({ "update": { "_index": "products", "_id": "p-1" } }));
		assert_eq!(call.body[1], json!({ "doc": { "name": "boots" }, "doc_as_upsert": true }));
	}

	#[test]
	fn delete_appends_a_single_action_line() {
		let mut call = BulkCall::new(false);

		call.delete("products", "p-2");

		assert_eq!(call.body, vec![json!({ "delete": { "_index": "products", "_id": "p-2" } })]);
	}

	#[test]
	fn ndjson_emits_one_line_per_entry() {
		let mut call = BulkCall::new(true);

		call.upsert("products", "p-1", json!({ "name": "boots" }));
		call.delete("products", "p-2");

		let payload = call.ndjson().expect("Bulk payload must encode.");

		assert_eq!(payload.lines().count(), 3);
		assert!(payload.ends_with('\n'));
	}
}
