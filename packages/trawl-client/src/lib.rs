pub mod backend;
pub mod calls;
pub mod http;

mod error;

pub use backend::SearchBackend;
pub use calls::{BulkCall, CountCall, DeleteByQueryCall, SearchCall};
pub use error::{Error, Result};
pub use http::HttpBackend;

use std::{future::Future, pin::Pin};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
