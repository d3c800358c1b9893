use std::{collections::HashMap, fmt, sync::Arc};

use serde_json::Value;

use crate::{QueryFragments, Result};

/// A registered named operation. Mutates the fragments it is applied to.
pub type ExtensionFn = Arc<dyn Fn(&mut QueryFragments, Value) -> Result<()> + Send + Sync>;

/// Extension operations consulted only when a name is not among the fixed
/// set handled by [`QueryFragments::apply`].
#[derive(Clone, Default)]
pub struct ExtensionRegistry {
	ops: HashMap<String, ExtensionFn>,
}
impl ExtensionRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register<F>(&mut self, name: impl Into<String>, op: F)
	where
		F: Fn(&mut QueryFragments, Value) -> Result<()> + Send + Sync + 'static,
	{
		self.ops.insert(name.into(), Arc::new(op));
	}

	pub fn get(&self, name: &str) -> Option<ExtensionFn> {
		self.ops.get(name).cloned()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.ops.contains_key(name)
	}

	pub fn is_empty(&self) -> bool {
		self.ops.is_empty()
	}
}
impl fmt::Debug for ExtensionRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut names: Vec<&str> = self.ops.keys().map(String::as_str).collect();

		names.sort_unstable();

		f.debug_struct("ExtensionRegistry").field("ops", &names).finish()
	}
}
