use serde::{Deserialize, Serialize};

use crate::{Engine, Result, Searchable};
use trawl_client::{BoxFuture, SearchBackend};

/// Source of record batches for a bulk import run. The caller's
/// persistence layer decides batch size and ordering.
pub trait BatchSource<R>
where
	Self: Send,
	R: Searchable,
{
	/// The next batch, or `None` once drained.
	fn next_batch(&mut self) -> BoxFuture<'_, Result<Option<Vec<R>>>>;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImportReport {
	pub batches: u64,
	pub records: u64,
}

impl<C> Engine<C>
where
	C: SearchBackend,
{
	/// Drains `source` into the index, one bulk call per batch, invoking
	/// `on_batch` with each batch after it was indexed.
	pub async fn import<R, S, F>(&self, mut source: S, mut on_batch: F) -> Result<ImportReport>
	where
		R: Searchable,
		S: BatchSource<R>,
		F: FnMut(&[R]),
	{
		let mut report = ImportReport { batches: 0, records: 0 };

		while let Some(batch) = source.next_batch().await? {
			if batch.is_empty() {
				continue;
			}

			self.update(&batch).await?;

			report.batches += 1;
			report.records += batch.len() as u64;

			on_batch(&batch);
		}

		Ok(report)
	}
}
