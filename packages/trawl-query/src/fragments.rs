use serde_json::{Map, Value, json};

use crate::{
	BoolSection, Clause, Error, ExtensionRegistry, FieldSort, RangeBounds, Result, SortDirection,
	SortMode, SortOptions,
};

/// Names resolved directly by [`QueryFragments::apply`]; the extension
/// registry is consulted only for names outside this set.
const FIXED_OPERATIONS: [&str; 5] = ["query_string", "term", "range", "exists", "sort"];

/// Accumulates query clauses, sorts, and body-level parameters, and renders
/// them into the backend query document.
///
/// Rendering is pure: two renders with no mutation in between yield
/// identical output.
#[derive(Clone, Debug, Default)]
pub struct QueryFragments {
	clauses: Vec<(BoolSection, Clause)>,
	sorts: Vec<FieldSort>,
	from: Option<u64>,
	size: Option<u64>,
	min_score: Option<f64>,
	registry: ExtensionRegistry,
}
impl QueryFragments {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set_registry(&mut self, registry: ExtensionRegistry) {
		self.registry = registry;
	}

	pub fn add(&mut self, section: BoolSection, clause: Clause) {
		self.clauses.push((section, clause));
	}

	pub fn must(&mut self, clause: Clause) {
		self.add(BoolSection::Must, clause);
	}

	pub fn must_not(&mut self, clause: Clause) {
		self.add(BoolSection::MustNot, clause);
	}

	pub fn filter(&mut self, clause: Clause) {
		self.add(BoolSection::Filter, clause);
	}

	pub fn should(&mut self, clause: Clause) {
		self.add(BoolSection::Should, clause);
	}

	pub fn add_sort(&mut self, sort: FieldSort) {
		self.sorts.push(sort);
	}

	pub fn set_from(&mut self, value: u64) {
		self.from = Some(value);
	}

	pub fn set_size(&mut self, value: u64) {
		self.size = Some(value);
	}

	pub fn set_min_score(&mut self, value: f64) {
		self.min_score = Some(value);
	}

	pub fn from(&self) -> Option<u64> {
		self.from
	}

	pub fn size(&self) -> Option<u64> {
		self.size
	}

	pub fn min_score(&self) -> Option<f64> {
		self.min_score
	}

	pub fn is_empty(&self) -> bool {
		self.clauses.is_empty()
			&& self.sorts.is_empty()
			&& self.from.is_none()
			&& self.size.is_none()
			&& self.min_score.is_none()
	}

	/// Two-stage named dispatch: fixed operations first, then the
	/// extension registry. Unknown names fail; nothing is inferred from
	/// failures.
	pub fn apply(&mut self, name: &str, args: Value) -> Result<()> {
		if FIXED_OPERATIONS.contains(&name) {
			return self.apply_fixed(name, &args);
		}

		let Some(op) = self.registry.get(name) else {
			return Err(Error::UnknownOperation { name: name.to_string() });
		};

		op(self, args)
	}

	fn apply_fixed(&mut self, name: &str, args: &Value) -> Result<()> {
		match name {
			"query_string" => {
				let query = args
					.as_str()
					.or_else(|| args.get("query").and_then(Value::as_str))
					.ok_or_else(|| invalid(name, "expected a query string"))?;

				self.must(Clause::query_string(query));
			},
			"term" => {
				let field = required_str(args, "field", name)?;
				let value =
					args.get("value").cloned().ok_or_else(|| invalid(name, "missing value"))?;

				self.add(section_from(args, name)?, Clause::Term { field, value });
			},
			"range" => {
				let field = required_str(args, "field", name)?;
				let bounds = RangeBounds {
					gt: args.get("gt").cloned(),
					gte: args.get("gte").cloned(),
					lt: args.get("lt").cloned(),
					lte: args.get("lte").cloned(),
				};

				if bounds == RangeBounds::default() {
					return Err(invalid(name, "at least one bound is required"));
				}

				self.add(section_from(args, name)?, Clause::Range { field, bounds });
			},
			"exists" => {
				let field = required_str(args, "field", name)?;

				self.add(section_from(args, name)?, Clause::Exists { field });
			},
			"sort" => {
				let field = required_str(args, "field", name)?;
				let direction = match args.get("direction").and_then(Value::as_str) {
					Some(raw) => Some(
						SortDirection::parse(raw)
							.ok_or_else(|| invalid(name, "direction must be asc or desc"))?,
					),
					None => None,
				};
				let mode = match args.get("mode").and_then(Value::as_str) {
					Some(raw) => Some(SortMode::parse(raw).ok_or_else(|| {
						invalid(name, "mode must be one of min, max, sum, avg, or median")
					})?),
					None => None,
				};
				let options = SortOptions {
					nested_path: args
						.get("nested_path")
						.and_then(Value::as_str)
						.map(str::to_string),
					missing: args.get("missing").cloned(),
					unmapped_type: args
						.get("unmapped_type")
						.and_then(Value::as_str)
						.map(str::to_string),
					mode,
				};

				self.add_sort(FieldSort::new(field, direction, options));
			},
			_ => unreachable!("apply_fixed is only called for fixed operation names"),
		}

		Ok(())
	}

	pub fn render(&self) -> Value {
		let mut body = Map::new();
		let mut bool_body = Map::new();

		for section in BoolSection::ALL {
			let rendered: Vec<Value> = self
				.clauses
				.iter()
				.filter(|(candidate, _)| *candidate == section)
				.map(|(_, clause)| clause.render())
				.collect();

			if !rendered.is_empty() {
				bool_body.insert(section.key().to_string(), Value::Array(rendered));
			}
		}

		if !bool_body.is_empty() {
			body.insert("query".to_string(), json!({ "bool": bool_body }));
		}
		if !self.sorts.is_empty() {
			body.insert(
				"sort".to_string(),
				Value::Array(self.sorts.iter().map(FieldSort::render).collect()),
			);
		}
		if let Some(min_score) = self.min_score {
			body.insert("min_score".to_string(), json!(min_score));
		}
		if let Some(from) = self.from {
			body.insert("from".to_string(), json!(from));
		}
		if let Some(size) = self.size {
			body.insert("size".to_string(), json!(size));
		}

		Value::Object(body)
	}
}

fn invalid(name: &str, message: &str) -> Error {
	Error::InvalidArguments { name: name.to_string(), message: message.to_string() }
}

fn required_str(args: &Value, key: &str, name: &str) -> Result<String> {
	args.get(key)
		.and_then(Value::as_str)
		.map(str::to_string)
		.ok_or_else(|| invalid(name, &format!("missing {key}")))
}

fn section_from(args: &Value, name: &str) -> Result<BoolSection> {
	let Some(raw) = args.get("section").and_then(Value::as_str) else {
		return Ok(BoolSection::Filter);
	};

	match raw {
		"must" => Ok(BoolSection::Must),
		"must_not" => Ok(BoolSection::MustNot),
		"filter" => Ok(BoolSection::Filter),
		"should" => Ok(BoolSection::Should),
		_ => Err(invalid(name, "section must be one of must, must_not, filter, or should")),
	}
}
