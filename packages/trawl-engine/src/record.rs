use serde_json::{Map, Value};

use crate::Result;
use trawl_client::BoxFuture;

/// A record's searchable projection: field name to indexable value. An
/// empty projection means "do not index this record".
pub type Document = Map<String, Value>;

/// Visibility of soft-deleted documents for one request.
///
/// Transitions only move away from `ActiveOnly`; a new request is the only
/// way back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SoftDeleteMode {
	#[default]
	ActiveOnly,
	IncludeTrashed,
	TrashedOnly,
}

/// A domain record that can be indexed and searched.
///
/// The record stays authoritative; only its projection is handed to the
/// backend.
pub trait Searchable
where
	Self: Send + Sync,
{
	/// Default index documents of this type live in.
	fn default_index() -> String;

	/// Field holding the soft-delete timestamp, when the type supports
	/// soft deletes.
	fn deleted_at_field() -> Option<&'static str> {
		None
	}

	/// Backend document identifier of this record.
	fn search_key(&self) -> String;

	/// Index this record is written to. Defaults to the type's index.
	fn index_name(&self) -> String {
		Self::default_index()
	}

	/// Searchable projection sent to the backend.
	fn to_document(&self) -> Document;
}

/// Authoritative record loading, owned by the caller's persistence layer.
pub trait RecordStore<R>
where
	Self: Send + Sync,
	R: Searchable,
{
	/// Bulk-loads records for the given document keys. Order is
	/// irrelevant; the engine restores backend rank order.
	fn find_by_keys<'a>(&'a self, keys: &'a [String]) -> BoxFuture<'a, Result<Vec<R>>>;

	/// Eager-loads the named relations onto an already loaded collection.
	fn load_relations<'a>(
		&'a self,
		records: &'a mut Vec<R>,
		relations: &'a [String],
	) -> BoxFuture<'a, Result<()>>;
}
