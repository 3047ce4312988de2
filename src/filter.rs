//! Named regex fragments constraining pattern parameters.
//!
//! A filter is a name bound to a regex fragment. Patterns reference filters
//! inline (`:id[d]`, `[az]`) and the fragment is baked into the compiled
//! matcher, so the registry is only consulted at compile time. Each
//! [`Router`](crate::Router) owns its registry; there is no process-wide
//! state.

use std::collections::HashMap;

use tracing::debug;

/// Fragment used for parameters without an explicit filter: any run of
/// characters except the path separator.
pub(crate) const DEFAULT_PARAM_FRAGMENT: &str = "[^/]+";

/// Built-in filters available in every registry.
const BUILTIN_FILTERS: &[(&str, &str)] = &[
	("d", r"\d+"),
	("D", r"\D+"),
	("az", "[a-z]+"),
	("AZ", "[A-Z]+"),
	("aZ", "[a-zA-Z]+"),
];

/// Registry of named regex fragments usable inside route patterns.
///
/// Starts with the built-in set (`d`, `D`, `az`, `AZ`, `aZ`). User
/// registrations may shadow built-ins; the last registration wins. Entries
/// are never removed.
///
/// # Examples
///
/// ```
/// use junction::FilterRegistry;
///
/// let mut filters = FilterRegistry::new();
/// assert_eq!(filters.resolve("d"), Some(r"\d+"));
///
/// filters.register("only_number", r"\d+");
/// assert_eq!(filters.resolve("only_number"), Some(r"\d+"));
/// assert_eq!(filters.resolve("xxx"), None);
/// ```
#[derive(Debug, Clone)]
pub struct FilterRegistry {
	filters: HashMap<String, String>,
}

impl Default for FilterRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl FilterRegistry {
	/// Creates a registry seeded with the built-in filters.
	pub fn new() -> Self {
		let filters = BUILTIN_FILTERS
			.iter()
			.map(|(name, fragment)| (name.to_string(), fragment.to_string()))
			.collect();
		Self { filters }
	}

	/// Registers a named fragment, replacing any previous entry.
	pub fn register(&mut self, name: impl Into<String>, fragment: impl Into<String>) {
		let name = name.into();
		let fragment = fragment.into();
		debug!(filter = %name, %fragment, "registering filter");
		self.filters.insert(name, fragment);
	}

	/// Looks up the fragment registered under `name`.
	pub fn resolve(&self, name: &str) -> Option<&str> {
		self.filters.get(name).map(String::as_str)
	}
}
