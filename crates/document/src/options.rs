//! Document adapter options.
//!
//! Options are plain TOML:
//!
//! ```toml
//! initial-version = 1
//! count-noop-changes = true
//! fallback-language = "plaintext"
//!
//! [languages]
//! rs = "rust"
//! py = "python"
//! ```

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::Result;

/// Tunables shared by every adapter a registry creates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct DocumentOptions {
	/// Version reported before the first change.
	pub initial_version: i32,
	/// Whether a change notification that leaves the text untouched still
	/// bumps the version.
	pub count_noop_changes: bool,
	/// File extension to language id overrides.
	pub languages: HashMap<String, String>,
	/// Language id used when neither an override nor the host names one.
	pub fallback_language: String,
}

impl Default for DocumentOptions {
	fn default() -> Self {
		Self {
			initial_version: 1,
			count_noop_changes: true,
			languages: HashMap::new(),
			fallback_language: "plaintext".to_string(),
		}
	}
}

impl DocumentOptions {
	/// Parses options from TOML. Missing keys keep their defaults.
	pub fn from_toml_str(source: &str) -> Result<Self> {
		Ok(toml::from_str(source)?)
	}

	/// Resolves the language id for a resource.
	///
	/// Extension overrides win over the host's hint, which wins over the fallback.
	pub fn resolve_language(&self, file_name: &str, host_hint: Option<String>) -> String {
		let by_extension = file_name
			.rsplit_once('.')
			.and_then(|(_, ext)| self.languages.get(&ext.to_ascii_lowercase()))
			.cloned();
		by_extension
			.or(host_hint.filter(|hint| !hint.is_empty()))
			.unwrap_or_else(|| self.fallback_language.clone())
	}
}
