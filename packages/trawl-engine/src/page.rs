use serde_json::Value;

/// One page of reconciled records.
#[derive(Clone, Debug)]
pub struct Page<T> {
	pub items: Vec<T>,
	pub total: u64,
	pub per_page: u64,
	pub current_page: u64,
	pub last_page: u64,
}
impl<T> Page<T> {
	pub fn new(items: Vec<T>, total: u64, per_page: u64, current_page: u64) -> Self {
		Self { items, total, per_page, current_page, last_page: last_page(total, per_page) }
	}

	pub fn has_more_pages(&self) -> bool {
		self.current_page < self.last_page
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}

/// One page of raw backend payload.
#[derive(Clone, Debug)]
pub struct RawPage {
	pub raw: Value,
	pub total: u64,
	pub per_page: u64,
	pub current_page: u64,
	pub last_page: u64,
}
impl RawPage {
	pub fn new(raw: Value, total: u64, per_page: u64, current_page: u64) -> Self {
		Self { raw, total, per_page, current_page, last_page: last_page(total, per_page) }
	}
}

// An empty result still has page 1.
fn last_page(total: u64, per_page: u64) -> u64 {
	total.div_ceil(per_page).max(1)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn last_page_rounds_up() {
		assert_eq!(Page::new(Vec::<u8>::new(), 31, 15, 1).last_page, 3);
		assert_eq!(Page::new(Vec::<u8>::new(), 30, 15, 1).last_page, 2);
	}

	#[test]
	fn empty_results_still_have_one_page() {
		let page = Page::new(Vec::<u8>::new(), 0, 15, 1);

		assert_eq!(page.last_page, 1);
		assert!(!page.has_more_pages());
		assert!(page.is_empty());
	}

	#[test]
	fn has_more_pages_compares_against_the_last_page() {
		assert!(Page::new(vec![1, 2], 10, 2, 3).has_more_pages());
		assert!(!Page::new(vec![1, 2], 10, 2, 5).has_more_pages());
	}
}
