//! Test doubles for the trawl engine: a canned-response backend, an
//! in-memory record store, and a sample record type.

use std::{
	collections::{HashSet, VecDeque},
	sync::Mutex,
};

use serde_json::{Value, json};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use uuid::Uuid;

use trawl_client::{
	BoxFuture, BulkCall, CountCall, DeleteByQueryCall, Result as ClientResult, SearchBackend,
	SearchCall,
};
use trawl_engine::{BatchSource, Document, RecordStore, Result as EngineResult, Searchable};

/// Builds a backend search response carrying `keys` as ranked hits.
pub fn hits_response(keys: &[&str], total: u64) -> Value {
	let hits: Vec<Value> = keys.iter().map(|key| json!({ "_id": key })).collect();

	json!({ "hits": { "total": { "value": total }, "hits": hits } })
}

/// Every call the mock backend has served, in arrival order.
#[derive(Clone, Debug, Default)]
pub struct Recorded {
	pub searches: Vec<SearchCall>,
	pub counts: Vec<CountCall>,
	pub bulks: Vec<BulkCall>,
	pub deletes_by_query: Vec<DeleteByQueryCall>,
	pub admin_ops: Vec<String>,
}

/// Canned-response backend double that records every call.
pub struct MockBackend {
	search_response: Value,
	count_response: Value,
	bulk_response: Value,
	delete_by_query_response: Value,
	indices: Mutex<HashSet<String>>,
	recorded: Mutex<Recorded>,
}
impl MockBackend {
	pub fn new() -> Self {
		Self {
			search_response: hits_response(&[], 0),
			count_response: json!({ "count": 0 }),
			bulk_response: json!({ "errors": false, "items": [] }),
			delete_by_query_response: json!({ "deleted": 0 }),
			indices: Mutex::new(HashSet::new()),
			recorded: Mutex::new(Recorded::default()),
		}
	}

	pub fn with_search_response(mut self, response: Value) -> Self {
		self.search_response = response;

		self
	}

	pub fn with_count_response(mut self, response: Value) -> Self {
		self.count_response = response;

		self
	}

	pub fn with_bulk_response(mut self, response: Value) -> Self {
		self.bulk_response = response;

		self
	}

	pub fn with_existing_index(self, index: &str) -> Self {
		{
			let mut indices = self.indices.lock().unwrap_or_else(|err| err.into_inner());

			indices.insert(index.to_string());
		}

		self
	}

	pub fn recorded(&self) -> Recorded {
		self.recorded.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	fn record<F>(&self, f: F)
	where
		F: FnOnce(&mut Recorded),
	{
		let mut recorded = self.recorded.lock().unwrap_or_else(|err| err.into_inner());

		f(&mut recorded);
	}
}
impl Default for MockBackend {
	fn default() -> Self {
		Self::new()
	}
}
impl SearchBackend for MockBackend {
	fn search<'a>(&'a self, call: SearchCall) -> BoxFuture<'a, ClientResult<Value>> {
		self.record(|recorded| recorded.searches.push(call));

		Box::pin(async move { Ok(self.search_response.clone()) })
	}

	fn count<'a>(&'a self, call: CountCall) -> BoxFuture<'a, ClientResult<Value>> {
		self.record(|recorded| recorded.counts.push(call));

		Box::pin(async move { Ok(self.count_response.clone()) })
	}

	fn bulk<'a>(&'a self, call: BulkCall) -> BoxFuture<'a, ClientResult<Value>> {
		self.record(|recorded| recorded.bulks.push(call));

		Box::pin(async move { Ok(self.bulk_response.clone()) })
	}

	fn delete_by_query<'a>(&'a self, call: DeleteByQueryCall) -> BoxFuture<'a, ClientResult<Value>> {
		self.record(|recorded| recorded.deletes_by_query.push(call));

		Box::pin(async move { Ok(self.delete_by_query_response.clone()) })
	}

	fn create_index<'a>(
		&'a self,
		index: &'a str,
		_settings: Option<Value>,
		_mappings: Option<Value>,
	) -> BoxFuture<'a, ClientResult<Value>> {
		self.record(|recorded| recorded.admin_ops.push(format!("create {index}")));

		{
			let mut indices = self.indices.lock().unwrap_or_else(|err| err.into_inner());

			indices.insert(index.to_string());
		}

		Box::pin(async move { Ok(json!({ "acknowledged": true })) })
	}

	fn index_exists<'a>(&'a self, index: &'a str) -> BoxFuture<'a, ClientResult<bool>> {
		let exists = {
			let indices = self.indices.lock().unwrap_or_else(|err| err.into_inner());

			indices.contains(index)
		};

		Box::pin(async move { Ok(exists) })
	}

	fn delete_index<'a>(&'a self, index: &'a str) -> BoxFuture<'a, ClientResult<Value>> {
		self.record(|recorded| recorded.admin_ops.push(format!("delete {index}")));

		{
			let mut indices = self.indices.lock().unwrap_or_else(|err| err.into_inner());

			indices.remove(index);
		}

		Box::pin(async move { Ok(json!({ "acknowledged": true })) })
	}

	fn close_index<'a>(&'a self, index: &'a str) -> BoxFuture<'a, ClientResult<Value>> {
		self.record(|recorded| recorded.admin_ops.push(format!("close {index}")));

		Box::pin(async move { Ok(json!({ "acknowledged": true })) })
	}

	fn open_index<'a>(&'a self, index: &'a str) -> BoxFuture<'a, ClientResult<Value>> {
		self.record(|recorded| recorded.admin_ops.push(format!("open {index}")));

		Box::pin(async move { Ok(json!({ "acknowledged": true })) })
	}

	fn put_settings<'a>(&'a self, index: &'a str, _settings: Value) -> BoxFuture<'a, ClientResult<Value>> {
		self.record(|recorded| recorded.admin_ops.push(format!("put_settings {index}")));

		Box::pin(async move { Ok(json!({ "acknowledged": true })) })
	}

	fn put_mapping<'a>(&'a self, index: &'a str, _mapping: Value) -> BoxFuture<'a, ClientResult<Value>> {
		self.record(|recorded| recorded.admin_ops.push(format!("put_mapping {index}")));

		Box::pin(async move { Ok(json!({ "acknowledged": true })) })
	}
}

/// In-memory record store double. Returns records in insertion order, not
/// rank order, so reconciliation is actually exercised.
pub struct MemoryStore<R> {
	records: Vec<R>,
	loaded_relations: Mutex<Vec<String>>,
}
impl<R> MemoryStore<R>
where
	R: Searchable + Clone,
{
	pub fn new(records: Vec<R>) -> Self {
		Self { records, loaded_relations: Mutex::new(Vec::new()) }
	}

	/// Relation names every `load_relations` call asked for, in order.
	pub fn loaded_relations(&self) -> Vec<String> {
		self.loaded_relations.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}
impl<R> RecordStore<R> for MemoryStore<R>
where
	R: Searchable + Clone,
{
	fn find_by_keys<'a>(&'a self, keys: &'a [String]) -> BoxFuture<'a, EngineResult<Vec<R>>> {
		Box::pin(async move {
			Ok(self
				.records
				.iter()
				.filter(|record| keys.contains(&record.search_key()))
				.cloned()
				.collect())
		})
	}

	fn load_relations<'a>(
		&'a self,
		_records: &'a mut Vec<R>,
		relations: &'a [String],
	) -> BoxFuture<'a, EngineResult<()>> {
		{
			let mut loaded = self.loaded_relations.lock().unwrap_or_else(|err| err.into_inner());

			loaded.extend(relations.iter().cloned());
		}

		Box::pin(async move { Ok(()) })
	}
}

/// Batch source over pre-built batches, for import tests.
pub struct VecBatches<R> {
	batches: VecDeque<Vec<R>>,
}
impl<R> VecBatches<R> {
	pub fn new(batches: Vec<Vec<R>>) -> Self {
		Self { batches: batches.into() }
	}
}
impl<R> BatchSource<R> for VecBatches<R>
where
	R: Searchable,
{
	fn next_batch(&mut self) -> BoxFuture<'_, EngineResult<Option<Vec<R>>>> {
		let batch = self.batches.pop_front();

		Box::pin(async move { Ok(batch) })
	}
}

/// Sample record used by the integration tests.
#[derive(Clone, Debug)]
pub struct Product {
	pub id: Uuid,
	pub name: String,
	pub price: i64,
	pub deleted_at: Option<OffsetDateTime>,
	/// A hidden product projects to nothing and must never be indexed.
	pub hidden: bool,
}
impl Product {
	pub fn new(name: &str, price: i64) -> Self {
		Self { id: Uuid::new_v4(), name: name.to_string(), price, deleted_at: None, hidden: false }
	}

	pub fn hidden(name: &str, price: i64) -> Self {
		Self { hidden: true, ..Self::new(name, price) }
	}
}
impl Searchable for Product {
	fn default_index() -> String {
		"products".to_string()
	}

	fn deleted_at_field() -> Option<&'static str> {
		Some("deleted_at")
	}

	fn search_key(&self) -> String {
		self.id.to_string()
	}

	fn to_document(&self) -> Document {
		let mut doc = Document::new();

		if self.hidden {
			return doc;
		}

		doc.insert("name".to_string(), json!(self.name));
		doc.insert("price".to_string(), json!(self.price));

		if let Some(deleted_at) = self.deleted_at
			&& let Ok(formatted) = deleted_at.format(&Rfc3339)
		{
			doc.insert("deleted_at".to_string(), json!(formatted));
		}

		doc
	}
}
