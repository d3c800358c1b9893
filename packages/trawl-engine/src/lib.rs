pub mod admin;
pub mod engine;
pub mod import;
pub mod page;
pub mod record;
pub mod request;

pub use engine::Engine;
pub use import::{BatchSource, ImportReport};
pub use page::{Page, RawPage};
pub use record::{Document, RecordStore, Searchable, SoftDeleteMode};
pub use request::{PreExecuteFn, SearchRequest};

pub use trawl_client::BoxFuture;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Backend(#[from] trawl_client::Error),
	#[error(transparent)]
	Query(#[from] trawl_query::Error),
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Record store error: {message}")]
	Store { message: String },
}
