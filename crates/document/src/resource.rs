//! Resource identifiers derived from host locators.

use std::path::Path;

use url::Url;

use crate::error::{DocumentError, Result};

/// Builds a resource identifier from a host-native locator.
///
/// Absolute filesystem paths become `file://` URLs; anything else must
/// already be a URL (for example `untitled:Untitled-1`).
pub fn resource_from_locator(locator: &str) -> Result<Url> {
	let path = Path::new(locator);
	if path.is_absolute() {
		return Url::from_file_path(path).map_err(|()| DocumentError::InvalidLocator {
			locator: locator.to_string(),
			reason: "path cannot be expressed as a file url".to_string(),
		});
	}
	Url::parse(locator).map_err(|err| DocumentError::InvalidLocator {
		locator: locator.to_string(),
		reason: err.to_string(),
	})
}

/// The last path segment of a resource, used as its display name.
pub fn display_name(uri: &Url) -> String {
	uri.path_segments()
		.and_then(|mut segments| segments.next_back())
		.filter(|name| !name.is_empty())
		.map(str::to_string)
		.unwrap_or_else(|| uri.path().to_string())
}

/// Returns true for resources that have never been saved to disk.
pub fn is_untitled(uri: &Url) -> bool {
	uri.scheme() == "untitled"
}
