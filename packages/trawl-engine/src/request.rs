use std::{fmt, marker::PhantomData, sync::Arc};

use serde_json::Value;

use crate::{
	Engine, Error, Page, RawPage, RecordStore, Result, Searchable, SoftDeleteMode,
};
use trawl_client::{BoxFuture, SearchBackend, SearchCall};
use trawl_query::{
	Clause, ExtensionRegistry, FieldSort, QueryFragments, SortDirection, SortOptions,
};

/// Caller-supplied override that fully replaces default search dispatch.
/// Receives the backend client and the assembled call, and owns the shape
/// of what comes back.
pub type PreExecuteFn = Arc<
	dyn for<'a> Fn(&'a dyn SearchBackend, SearchCall) -> BoxFuture<'a, trawl_client::Result<Value>>
		+ Send
		+ Sync,
>;

/// Accumulates search criteria for one execution against `R`'s index.
///
/// A request is single-use: chained mutation while building, read-only
/// once handed to the engine, discarded after execution. It must not be
/// shared between logical operations.
pub struct SearchRequest<R> {
	query: Option<String>,
	fragments: QueryFragments,
	index: Option<String>,
	raw: Option<Value>,
	soft_delete: SoftDeleteMode,
	relations: Vec<String>,
	pre_execute: Option<PreExecuteFn>,
	_record: PhantomData<R>,
}
impl<R> SearchRequest<R>
where
	R: Searchable,
{
	/// Starts a request; a non-empty query seeds a full-text clause.
	pub fn new(query: impl Into<String>) -> Self {
		let query = query.into();
		let mut fragments = QueryFragments::new();

		if !query.is_empty() {
			fragments.must(Clause::query_string(query.as_str()));
		}

		Self {
			query: (!query.is_empty()).then_some(query),
			fragments,
			index: None,
			raw: None,
			soft_delete: SoftDeleteMode::default(),
			relations: Vec::new(),
			pre_execute: None,
			_record: PhantomData,
		}
	}

	pub fn with_registry(mut self, registry: ExtensionRegistry) -> Self {
		self.fragments.set_registry(registry);

		self
	}

	/// Sets the pagination offset. Negative values clamp to zero.
	pub fn from(mut self, value: i64) -> Self {
		self.fragments.set_from(value.max(0) as u64);

		self
	}

	/// Alias for [`Self::from`].
	pub fn skip(self, value: i64) -> Self {
		self.from(value)
	}

	/// Alias for [`Self::from`].
	pub fn offset(self, value: i64) -> Self {
		self.from(value)
	}

	/// Sets the page size. Negative values leave the prior value
	/// unchanged.
	pub fn size(mut self, value: i64) -> Self {
		if value >= 0 {
			self.fragments.set_size(value as u64);
		}

		self
	}

	/// Alias for [`Self::size`].
	pub fn take(self, value: i64) -> Self {
		self.size(value)
	}

	/// Alias for [`Self::size`].
	pub fn limit(self, value: i64) -> Self {
		self.size(value)
	}

	/// Sets the score floor. Negative values are ignored.
	pub fn min_score(mut self, value: f64) -> Self {
		if value >= 0.0 {
			self.fragments.set_min_score(value);
		}

		self
	}

	/// Appends a sort clause. An unset direction defers to the backend
	/// default.
	pub fn order_by(
		mut self,
		field: impl Into<String>,
		direction: Option<SortDirection>,
		options: SortOptions,
	) -> Self {
		self.fragments.add_sort(FieldSort::new(field, direction, options));

		self
	}

	/// Overrides the index for this request only.
	pub fn within_index(mut self, index: impl Into<String>) -> Self {
		self.index = Some(index.into());

		self
	}

	/// Replaces the rendered query document entirely. Pagination
	/// parameters forwarded by the engine still apply.
	pub fn raw(mut self, body: Value) -> Self {
		self.raw = Some(body);

		self
	}

	/// Includes soft-deleted documents in the results.
	pub fn with_trashed(mut self) -> Self {
		self.soft_delete = SoftDeleteMode::IncludeTrashed;

		self
	}

	/// Restricts the results to soft-deleted documents.
	pub fn only_trashed(mut self) -> Self {
		self.soft_delete = SoftDeleteMode::TrashedOnly;

		self
	}

	/// Merges one relation name into the eager-load set.
	pub fn with(mut self, relation: impl Into<String>) -> Self {
		self.relations.push(relation.into());

		self
	}

	/// Merges a list of relation names into the eager-load set.
	pub fn with_relations<I, S>(mut self, relations: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.relations.extend(relations.into_iter().map(Into::into));

		self
	}

	pub fn must(mut self, clause: Clause) -> Self {
		self.fragments.must(clause);

		self
	}

	pub fn must_not(mut self, clause: Clause) -> Self {
		self.fragments.must_not(clause);

		self
	}

	pub fn filter(mut self, clause: Clause) -> Self {
		self.fragments.filter(clause);

		self
	}

	pub fn should(mut self, clause: Clause) -> Self {
		self.fragments.should(clause);

		self
	}

	/// Applies a named operation: fixed operations first, then the
	/// extension registry.
	pub fn operation(mut self, name: &str, args: Value) -> Result<Self> {
		self.fragments.apply(name, args)?;

		Ok(self)
	}

	/// Installs an override that fully replaces default search dispatch.
	pub fn before_execute<F>(mut self, callback: F) -> Self
	where
		F: for<'a> Fn(&'a dyn SearchBackend, SearchCall) -> BoxFuture<'a, trawl_client::Result<Value>>
			+ Send
			+ Sync
			+ 'static,
	{
		self.pre_execute = Some(Arc::new(callback));

		self
	}

	/// Renders the backend query document. A raw override wins outright;
	/// otherwise the soft-delete mode composes its predicate over the
	/// accumulated fragments. Pure: the request is not mutated.
	pub fn render(&self) -> Value {
		if let Some(raw) = &self.raw {
			return raw.clone();
		}

		let Some(field) = R::deleted_at_field() else {
			return self.fragments.render();
		};

		match self.soft_delete {
			SoftDeleteMode::ActiveOnly => {
				let mut fragments = self.fragments.clone();

				fragments.must_not(Clause::exists(field));

				fragments.render()
			},
			SoftDeleteMode::TrashedOnly => {
				let mut fragments = self.fragments.clone();

				fragments.filter(Clause::exists(field));

				fragments.render()
			},
			SoftDeleteMode::IncludeTrashed => self.fragments.render(),
		}
	}

	pub fn query(&self) -> Option<&str> {
		self.query.as_deref()
	}

	pub fn soft_delete_mode(&self) -> SoftDeleteMode {
		self.soft_delete
	}

	pub fn index(&self) -> Option<&str> {
		self.index.as_deref()
	}

	/// Index this request executes against: the override if set, else
	/// `R`'s default.
	pub fn effective_index(&self) -> String {
		self.index.clone().unwrap_or_else(R::default_index)
	}

	pub fn offset_value(&self) -> Option<u64> {
		self.fragments.from()
	}

	pub fn size_value(&self) -> Option<u64> {
		self.fragments.size()
	}

	pub fn relations(&self) -> &[String] {
		&self.relations
	}

	pub(crate) fn pre_execute_fn(&self) -> Option<&PreExecuteFn> {
		self.pre_execute.as_ref()
	}
}

impl<R> SearchRequest<R>
where
	R: Searchable,
{
	/// Executes the search and reconciles hits into records, eager-loading
	/// the configured relations once the collection is non-empty.
	pub async fn get<C, S>(self, engine: &Engine<C>, store: &S) -> Result<Vec<R>>
	where
		C: SearchBackend,
		S: RecordStore<R>,
	{
		engine.get(self, store).await
	}

	/// The head of a one-record page. Fails with [`Error::NotFound`] when
	/// nothing matched.
	pub async fn first<C, S>(self, engine: &Engine<C>, store: &S) -> Result<R>
	where
		C: SearchBackend,
		S: RecordStore<R>,
	{
		let mut records = self.size(1).get(engine, store).await?;

		if records.is_empty() {
			return Err(Error::NotFound { message: "No record matched the search.".to_string() });
		}

		Ok(records.remove(0))
	}

	pub async fn count<C>(self, engine: &Engine<C>) -> Result<u64>
	where
		C: SearchBackend,
	{
		engine.count(&self).await
	}

	/// Hit identifiers in backend rank order, without loading records.
	pub async fn keys<C>(self, engine: &Engine<C>) -> Result<Vec<String>>
	where
		C: SearchBackend,
	{
		engine.keys(&self).await
	}

	/// The raw backend response for this request.
	pub async fn get_raw<C>(self, engine: &Engine<C>) -> Result<Value>
	where
		C: SearchBackend,
	{
		engine.search(&self).await
	}

	/// One reconciled page. `per_page` falls back to the engine's
	/// configured default.
	pub async fn paginate<C, S>(
		self,
		engine: &Engine<C>,
		store: &S,
		per_page: Option<u64>,
		page: u64,
	) -> Result<Page<R>>
	where
		C: SearchBackend,
		S: RecordStore<R>,
	{
		engine.paginate_records(self, store, per_page, page).await
	}

	/// One page of raw backend payload, without record loading.
	pub async fn paginate_raw<C>(
		self,
		engine: &Engine<C>,
		per_page: Option<u64>,
		page: u64,
	) -> Result<RawPage>
	where
		C: SearchBackend,
	{
		engine.paginate_raw(&self, per_page, page).await
	}
}

impl<R> fmt::Debug for SearchRequest<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SearchRequest")
			.field("query", &self.query)
			.field("fragments", &self.fragments)
			.field("index", &self.index)
			.field("raw", &self.raw)
			.field("soft_delete", &self.soft_delete)
			.field("relations", &self.relations)
			.field("pre_execute", &self.pre_execute.is_some())
			.finish()
	}
}
