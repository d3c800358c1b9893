use serde_json::Value;

use crate::{BoxFuture, BulkCall, CountCall, DeleteByQueryCall, Result, SearchCall};

/// Boundary to the document search backend.
///
/// Implementations must be safe for concurrent use: the engine holds one
/// instance across unlimited simultaneous requests. Transport errors
/// propagate unmodified; no retry, backoff, or deadline lives at this
/// layer.
pub trait SearchBackend
where
	Self: Send + Sync,
{
	fn search<'a>(&'a self, call: SearchCall) -> BoxFuture<'a, Result<Value>>;

	fn count<'a>(&'a self, call: CountCall) -> BoxFuture<'a, Result<Value>>;

	fn bulk<'a>(&'a self, call: BulkCall) -> BoxFuture<'a, Result<Value>>;

	fn delete_by_query<'a>(&'a self, call: DeleteByQueryCall) -> BoxFuture<'a, Result<Value>>;

	fn create_index<'a>(
		&'a self,
		index: &'a str,
		settings: Option<Value>,
		mappings: Option<Value>,
	) -> BoxFuture<'a, Result<Value>>;

	fn index_exists<'a>(&'a self, index: &'a str) -> BoxFuture<'a, Result<bool>>;

	fn delete_index<'a>(&'a self, index: &'a str) -> BoxFuture<'a, Result<Value>>;

	fn close_index<'a>(&'a self, index: &'a str) -> BoxFuture<'a, Result<Value>>;

	fn open_index<'a>(&'a self, index: &'a str) -> BoxFuture<'a, Result<Value>>;

	fn put_settings<'a>(&'a self, index: &'a str, settings: Value) -> BoxFuture<'a, Result<Value>>;

	fn put_mapping<'a>(&'a self, index: &'a str, mapping: Value) -> BoxFuture<'a, Result<Value>>;
}
