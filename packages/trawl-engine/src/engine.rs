use std::collections::HashMap;

use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::{Error, Page, RawPage, RecordStore, Result, Searchable, SearchRequest};
use trawl_client::{BulkCall, CountCall, DeleteByQueryCall, SearchBackend, SearchCall};

/// Executes search requests and bulk index mutation against the backend.
///
/// Holds no per-request state, only the client and write policy, so one
/// engine serves unlimited concurrent requests.
pub struct Engine<C> {
	client: C,
	refresh_writes: bool,
	default_per_page: u64,
}
impl<C> Engine<C>
where
	C: SearchBackend,
{
	pub fn new(client: C, cfg: &trawl_config::Indexing) -> Self {
		Self { client, refresh_writes: cfg.refresh_writes, default_per_page: cfg.default_per_page }
	}

	/// Backend client handle, exposed for collaborating tooling.
	pub fn client(&self) -> &C {
		&self.client
	}

	pub fn default_per_page(&self) -> u64 {
		self.default_per_page
	}

	/// Runs the request as-is. When the request carries an offset, both
	/// `size` and `from` are forwarded as execution options; otherwise
	/// neither is and backend defaults apply.
	pub async fn search<R>(&self, request: &SearchRequest<R>) -> Result<Value>
	where
		R: Searchable,
	{
		match request.offset_value() {
			Some(from) => self.perform_search(request, request.size_value(), Some(from)).await,
			None => self.perform_search(request, None, None).await,
		}
	}

	/// Runs the request for one 1-based page, overriding any offset set
	/// directly on the request.
	pub async fn paginate<R>(
		&self,
		request: &SearchRequest<R>,
		per_page: u64,
		page: u64,
	) -> Result<Value>
	where
		R: Searchable,
	{
		if per_page == 0 || page == 0 {
			return Err(Error::InvalidRequest {
				message: "Pagination requires per_page >= 1 and a 1-based page.".to_string(),
			});
		}

		self.perform_search(request, Some(per_page), Some((page - 1) * per_page)).await
	}

	/// Total matches for the request. A response without a count field
	/// means no matches.
	pub async fn count<R>(&self, request: &SearchRequest<R>) -> Result<u64>
	where
		R: Searchable,
	{
		let call = CountCall {
			index: request.effective_index(),
			body: request.render(),
			ignore_throttled: false,
		};
		let response = self.client.count(call).await?;

		Ok(response.get("count").and_then(Value::as_u64).unwrap_or(0))
	}

	async fn perform_search<R>(
		&self,
		request: &SearchRequest<R>,
		size: Option<u64>,
		from: Option<u64>,
	) -> Result<Value>
	where
		R: Searchable,
	{
		let call = SearchCall {
			index: request.effective_index(),
			body: request.render(),
			ignore_throttled: false,
			size,
			from,
		};

		debug!(index = call.index.as_str(), "Dispatching search.");

		if let Some(callback) = request.pre_execute_fn() {
			return Ok(callback(&self.client, call).await?);
		}

		Ok(self.client.search(call).await?)
	}

	/// Upserts the projections of `records` in one batched call. Records
	/// with an empty projection are skipped entirely: not indexed, not
	/// deleted. Returns `None` when nothing was sent. The raw response is
	/// returned as-is; per-item failures inside it are the caller's to
	/// inspect.
	pub async fn update<R>(&self, records: &[R]) -> Result<Option<Value>>
	where
		R: Searchable,
	{
		if records.is_empty() {
			return Ok(None);
		}

		let mut call = BulkCall::new(self.refresh_writes);

		for record in records {
			let doc = record.to_document();

			if doc.is_empty() {
				continue;
			}

			call.upsert(&record.index_name(), &record.search_key(), Value::Object(doc));
		}

		if call.is_empty() {
			return Ok(None);
		}

		Ok(Some(self.client.bulk(call).await?))
	}

	/// Deletes the documents of `records` in one batched call. Returns
	/// `None` on an empty batch.
	pub async fn delete<R>(&self, records: &[R]) -> Result<Option<Value>>
	where
		R: Searchable,
	{
		if records.is_empty() {
			return Ok(None);
		}

		let mut call = BulkCall::new(self.refresh_writes);

		for record in records {
			call.delete(&record.index_name(), &record.search_key());
		}

		Ok(Some(self.client.bulk(call).await?))
	}

	/// Deletes every document in `R`'s default index.
	pub async fn flush<R>(&self) -> Result<Value>
	where
		R: Searchable,
	{
		let call = DeleteByQueryCall {
			index: R::default_index(),
			refresh: self.refresh_writes,
			body: json!({ "query": { "match_all": {} } }),
		};

		Ok(self.client.delete_by_query(call).await?)
	}

	/// Hit identifiers in backend rank order.
	pub fn map_ids(&self, raw: &Value) -> Vec<String> {
		raw.pointer("/hits/hits")
			.and_then(Value::as_array)
			.map(|hits| {
				hits.iter()
					.filter_map(|hit| hit.get("_id").and_then(Value::as_str).map(str::to_string))
					.collect()
			})
			.unwrap_or_default()
	}

	/// The backend's authoritative total-match count.
	pub fn total_count(&self, raw: &Value) -> u64 {
		raw.pointer("/hits/total/value").and_then(Value::as_u64).unwrap_or(0)
	}

	/// Reconciles a raw response with the record store. Output order
	/// equals backend rank order; ties were already broken by the
	/// backend. Hits that no longer resolve to a record are dropped
	/// without leaving gaps.
	pub async fn map<R, S>(&self, raw: &Value, store: &S) -> Result<Vec<R>>
	where
		R: Searchable,
		S: RecordStore<R>,
	{
		if self.total_count(raw) == 0 {
			return Ok(Vec::new());
		}

		let keys = self.map_ids(raw);
		let positions: HashMap<&str, usize> =
			keys.iter().enumerate().map(|(position, key)| (key.as_str(), position)).collect();
		let mut ranked = Vec::new();

		for record in store.find_by_keys(&keys).await? {
			let key = record.search_key();

			match positions.get(key.as_str()) {
				Some(position) => ranked.push((*position, record)),
				None => {
					warn!(key = key.as_str(), "Loaded record key is absent from the hit list.");
				},
			}
		}

		if ranked.len() < keys.len() {
			debug!(
				missing = keys.len() - ranked.len(),
				"Some hits no longer resolve to records."
			);
		}

		ranked.sort_by_key(|(position, _)| *position);

		Ok(ranked.into_iter().map(|(_, record)| record).collect())
	}

	/// Search, reconcile, and eager-load the request's relations.
	pub async fn get<R, S>(&self, request: SearchRequest<R>, store: &S) -> Result<Vec<R>>
	where
		R: Searchable,
		S: RecordStore<R>,
	{
		let raw = self.search(&request).await?;
		let mut records = self.map(&raw, store).await?;

		if !request.relations().is_empty() && !records.is_empty() {
			store.load_relations(&mut records, request.relations()).await?;
		}

		Ok(records)
	}

	/// Hit identifiers for the request, without loading records.
	pub async fn keys<R>(&self, request: &SearchRequest<R>) -> Result<Vec<String>>
	where
		R: Searchable,
	{
		let raw = self.search(request).await?;

		Ok(self.map_ids(&raw))
	}

	pub async fn paginate_records<R, S>(
		&self,
		request: SearchRequest<R>,
		store: &S,
		per_page: Option<u64>,
		page: u64,
	) -> Result<Page<R>>
	where
		R: Searchable,
		S: RecordStore<R>,
	{
		let per_page = per_page.unwrap_or(self.default_per_page);
		let raw = self.paginate(&request, per_page, page).await?;
		let mut items = self.map(&raw, store).await?;

		if !request.relations().is_empty() && !items.is_empty() {
			store.load_relations(&mut items, request.relations()).await?;
		}

		Ok(Page::new(items, self.total_count(&raw), per_page, page))
	}

	pub async fn paginate_raw<R>(
		&self,
		request: &SearchRequest<R>,
		per_page: Option<u64>,
		page: u64,
	) -> Result<RawPage>
	where
		R: Searchable,
	{
		let per_page = per_page.unwrap_or(self.default_per_page);
		let raw = self.paginate(request, per_page, page).await?;
		let total = self.total_count(&raw);

		Ok(RawPage::new(raw, total, per_page, page))
	}
}
