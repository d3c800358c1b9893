use serde_json::{Map, Value, json};

/// Section of the rendered bool query a clause lands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoolSection {
	Must,
	MustNot,
	Filter,
	Should,
}
impl BoolSection {
	pub const ALL: [Self; 4] = [Self::Must, Self::MustNot, Self::Filter, Self::Should];

	pub fn key(self) -> &'static str {
		match self {
			Self::Must => "must",
			Self::MustNot => "must_not",
			Self::Filter => "filter",
			Self::Should => "should",
		}
	}
}

/// Bounds of a range clause. Unset bounds are omitted from the rendered
/// document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RangeBounds {
	pub gt: Option<Value>,
	pub gte: Option<Value>,
	pub lt: Option<Value>,
	pub lte: Option<Value>,
}

/// A typed query clause.
#[derive(Clone, Debug, PartialEq)]
pub enum Clause {
	QueryString { query: String },
	Term { field: String, value: Value },
	Range { field: String, bounds: RangeBounds },
	Exists { field: String },
}
impl Clause {
	pub fn query_string(query: impl Into<String>) -> Self {
		Self::QueryString { query: query.into() }
	}

	pub fn term(field: impl Into<String>, value: impl Into<Value>) -> Self {
		Self::Term { field: field.into(), value: value.into() }
	}

	pub fn range(field: impl Into<String>, bounds: RangeBounds) -> Self {
		Self::Range { field: field.into(), bounds }
	}

	pub fn exists(field: impl Into<String>) -> Self {
		Self::Exists { field: field.into() }
	}

	pub fn render(&self) -> Value {
		match self {
			Self::QueryString { query } => json!({ "query_string": { "query": query } }),
			Self::Term { field, value } => json!({ "term": { field.as_str(): value } }),
			Self::Range { field, bounds } => {
				let mut body = Map::new();

				for (key, bound) in [
					("gt", &bounds.gt),
					("gte", &bounds.gte),
					("lt", &bounds.lt),
					("lte", &bounds.lte),
				] {
					if let Some(value) = bound {
						body.insert(key.to_string(), value.clone());
					}
				}

				json!({ "range": { field.as_str(): body } })
			},
			Self::Exists { field } => json!({ "exists": { "field": field } }),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn renders_each_clause_kind() {
		assert_eq!(
			Clause::query_string("red shoes").render(),
			json!({ "query_string": { "query": "red shoes" } }),
		);
		assert_eq!(
			Clause::term("status", "active").render(),
			json!({ "term": { "status": "active" } }),
		);
		assert_eq!(
			Clause::exists("deleted_at").render(),
			json!({ "exists": { "field": "deleted_at" } }),
		);
	}

	#[test]
	fn range_omits_unset_bounds() {
		let clause = Clause::range(
			"price",
			RangeBounds { gte: Some(json!(10)), lt: Some(json!(50)), ..Default::default() },
		);

		assert_eq!(clause.render(), json!({ "range": { "price": { "gte": 10, "lt": 50 } } }));
	}
}
