use serde_json::{Map, Value, json};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
	Asc,
	Desc,
}
impl SortDirection {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Asc => "asc",
			Self::Desc => "desc",
		}
	}

	pub fn parse(value: &str) -> Option<Self> {
		match value {
			"asc" => Some(Self::Asc),
			"desc" => Some(Self::Desc),
			_ => None,
		}
	}
}

/// Aggregation applied when sorting on a multi-valued field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortMode {
	Min,
	Max,
	Sum,
	Avg,
	Median,
}
impl SortMode {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Min => "min",
			Self::Max => "max",
			Self::Sum => "sum",
			Self::Avg => "avg",
			Self::Median => "median",
		}
	}

	pub fn parse(value: &str) -> Option<Self> {
		match value {
			"min" => Some(Self::Min),
			"max" => Some(Self::Max),
			"sum" => Some(Self::Sum),
			"avg" => Some(Self::Avg),
			"median" => Some(Self::Median),
			_ => None,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SortOptions {
	pub nested_path: Option<String>,
	/// Placement of documents missing the sort field.
	pub missing: Option<Value>,
	pub unmapped_type: Option<String>,
	pub mode: Option<SortMode>,
}

/// One entry of the rendered sort array.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSort {
	pub field: String,
	pub direction: Option<SortDirection>,
	pub options: SortOptions,
}
impl FieldSort {
	pub fn new(
		field: impl Into<String>,
		direction: Option<SortDirection>,
		options: SortOptions,
	) -> Self {
		Self { field: field.into(), direction, options }
	}

	pub fn render(&self) -> Value {
		let mut body = Map::new();

		if let Some(direction) = self.direction {
			body.insert("order".to_string(), json!(direction.as_str()));
		}
		if let Some(path) = &self.options.nested_path {
			body.insert("nested_path".to_string(), json!(path));
		}
		if let Some(missing) = &self.options.missing {
			body.insert("missing".to_string(), missing.clone());
		}
		if let Some(unmapped) = &self.options.unmapped_type {
			body.insert("unmapped_type".to_string(), json!(unmapped));
		}
		if let Some(mode) = self.options.mode {
			body.insert("mode".to_string(), json!(mode.as_str()));
		}

		if body.is_empty() {
			return Value::String(self.field.clone());
		}

		json!({ self.field.as_str(): body })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bare_field_renders_as_string() {
		let sort = FieldSort::new("updated_at", None, SortOptions::default());

		assert_eq!(sort.render(), json!("updated_at"));
	}

	#[test]
	fn direction_and_options_render_in_the_field_body() {
		let sort = FieldSort::new(
			"price",
			Some(SortDirection::Desc),
			SortOptions {
				missing: Some(json!("_last")),
				unmapped_type: Some("long".to_string()),
				mode: Some(SortMode::Avg),
				..Default::default()
			},
		);

		assert_eq!(
			sort.render(),
			json!({
				"price": {
					"order": "desc",
					"missing": "_last",
					"unmapped_type": "long",
					"mode": "avg",
				}
			}),
		);
	}
}
