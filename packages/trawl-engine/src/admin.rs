use serde_json::Value;
use tracing::info;

use crate::{Engine, Error, Result, Searchable};
use trawl_client::SearchBackend;

impl<C> Engine<C>
where
	C: SearchBackend,
{
	/// Creates `R`'s default index with optional settings and mappings.
	/// Fails fast when the index already exists.
	pub async fn create_index<R>(&self, settings: Option<Value>, mappings: Option<Value>) -> Result<Value>
	where
		R: Searchable,
	{
		let index = R::default_index();

		if self.client().index_exists(&index).await? {
			return Err(Error::Conflict { message: format!("The index {index} already exists.") });
		}

		let response = self.client().create_index(&index, settings, mappings).await?;

		info!(index = index.as_str(), "Index created.");

		Ok(response)
	}

	/// Drops `R`'s default index. Fails fast when the index does not
	/// exist.
	pub async fn drop_index<R>(&self) -> Result<Value>
	where
		R: Searchable,
	{
		let index = R::default_index();

		if !self.client().index_exists(&index).await? {
			return Err(Error::NotFound { message: format!("The index {index} does not exist.") });
		}

		let response = self.client().delete_index(&index).await?;

		info!(index = index.as_str(), "Index dropped.");

		Ok(response)
	}

	/// Applies new settings to `R`'s default index. The index is closed
	/// for the update and reopened even when the update fails.
	pub async fn update_index<R>(&self, settings: Value) -> Result<()>
	where
		R: Searchable,
	{
		let index = R::default_index();

		if !self.client().index_exists(&index).await? {
			return Err(Error::NotFound { message: format!("The index {index} does not exist.") });
		}

		self.client().close_index(&index).await?;

		let updated = self.client().put_settings(&index, settings).await;
		let reopened = self.client().open_index(&index).await;

		updated?;
		reopened?;

		info!(index = index.as_str(), "Index settings updated.");

		Ok(())
	}

	/// Replaces the mapping of `R`'s default index.
	pub async fn update_mapping<R>(&self, mapping: Value) -> Result<Value>
	where
		R: Searchable,
	{
		if mapping.as_object().map(|mapping| mapping.is_empty()).unwrap_or(true) {
			return Err(Error::InvalidRequest {
				message: "No mapping was supplied.".to_string(),
			});
		}

		let index = R::default_index();

		if !self.client().index_exists(&index).await? {
			return Err(Error::NotFound { message: format!("The index {index} does not exist.") });
		}

		let response = self.client().put_mapping(&index, mapping).await?;

		info!(index = index.as_str(), "Index mapping updated.");

		Ok(response)
	}
}
