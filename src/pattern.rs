//! Route pattern compilation and matching.
//!
//! A pattern is a `/`-delimited path template. Each segment is one of:
//!
//! - literal text, matched exactly;
//! - `:name` - a parameter capturing one segment (`[^/]+` by default);
//! - `:name[filter]` - a parameter constrained by a named filter fragment;
//! - `[filter]` - a bare filter, matched but not bound to a name;
//! - `*` as the final segment - a greedy, uncaptured wildcard matching the
//!   remainder of the path.
//!
//! Patterns compile to an anchored regex (full-path match, no partial
//! matches) plus the ordered list of parameter names, so bound values can
//! be associated back to names positionally.

use std::collections::HashMap;
use std::fmt;

use regex::Regex;

use crate::error::SyntaxError;
use crate::filter::{DEFAULT_PARAM_FRAGMENT, FilterRegistry};

/// Parameter name reserved for the execution context sentinel.
const RESERVED_PARAM_NAME: &str = "context";

/// A compiled route pattern: anchored matcher plus ordered parameter names.
///
/// # Examples
///
/// ```
/// use junction::{FilterRegistry, RoutePattern};
///
/// let filters = FilterRegistry::new();
/// let pattern = RoutePattern::compile("/user/:id[d]", &filters).unwrap();
///
/// assert!(pattern.is_match("/user/42"));
/// assert!(!pattern.is_match("/user/abc"));
///
/// let params = pattern.capture("/user/42").unwrap();
/// assert_eq!(params.get("id").map(String::as_str), Some("42"));
/// ```
#[derive(Debug, Clone)]
pub struct RoutePattern {
	raw: String,
	regex: Regex,
	params: Vec<String>,
}

impl RoutePattern {
	/// Compiles a pattern string against the given filter registry.
	///
	/// # Errors
	///
	/// - [`SyntaxError::DuplicateParamName`] - two parameters share a name;
	/// - [`SyntaxError::ReservedParamName`] - a parameter is named `context`;
	/// - [`SyntaxError::FilterNotImplemented`] - a referenced filter is not
	///   registered;
	/// - [`SyntaxError::InvalidPattern`] - a registered filter fragment
	///   makes the compiled regex invalid.
	pub fn compile(pattern: &str, filters: &FilterRegistry) -> Result<Self, SyntaxError> {
		let mut regex_str = String::from("^");
		let mut params: Vec<String> = Vec::new();

		let segments: Vec<&str> = pattern.split('/').collect();
		let last = segments.len() - 1;

		for (index, segment) in segments.iter().enumerate() {
			if index > 0 {
				regex_str.push('/');
			}
			if *segment == "*" && index == last {
				// Trailing wildcard: greedy, uncaptured remainder.
				regex_str.push_str(".*");
			} else if let Some(spec) = segment.strip_prefix(':') {
				Self::compile_param(spec, segment, filters, &mut regex_str, &mut params)?;
			} else if let Some(name) = segment
				.strip_prefix('[')
				.and_then(|rest| rest.strip_suffix(']'))
			{
				// Bare filter: matched but not bound. Wrapped non-capturing
				// so fragments with their own groups cannot disturb the
				// named captures.
				let fragment = filters
					.resolve(name)
					.ok_or_else(|| SyntaxError::FilterNotImplemented(name.to_string()))?;
				regex_str.push_str("(?:");
				regex_str.push_str(fragment);
				regex_str.push(')');
			} else {
				regex_str.push_str(&regex::escape(segment));
			}
		}
		regex_str.push('$');

		let regex = Regex::new(&regex_str).map_err(|e| SyntaxError::InvalidPattern {
			pattern: pattern.to_string(),
			reason: e.to_string(),
		})?;

		Ok(Self {
			raw: pattern.to_string(),
			regex,
			params,
		})
	}

	/// Compiles one `:name` or `:name[filter]` segment.
	fn compile_param(
		spec: &str,
		segment: &str,
		filters: &FilterRegistry,
		regex_str: &mut String,
		params: &mut Vec<String>,
	) -> Result<(), SyntaxError> {
		let (name, filter) = match spec.find('[') {
			Some(open) if spec.ends_with(']') => (&spec[..open], Some(&spec[open + 1..spec.len() - 1])),
			_ => (spec, None),
		};

		if name.is_empty() {
			// A lone ":" segment is literal text, not a parameter.
			regex_str.push_str(&regex::escape(segment));
			return Ok(());
		}
		if name == RESERVED_PARAM_NAME {
			return Err(SyntaxError::ReservedParamName);
		}
		if params.iter().any(|existing| existing == name) {
			return Err(SyntaxError::DuplicateParamName(name.to_string()));
		}

		let fragment = match filter {
			Some(filter) => filters
				.resolve(filter)
				.ok_or_else(|| SyntaxError::FilterNotImplemented(filter.to_string()))?,
			None => DEFAULT_PARAM_FRAGMENT,
		};

		regex_str.push_str("(?P<");
		regex_str.push_str(name);
		regex_str.push('>');
		regex_str.push_str(fragment);
		regex_str.push(')');
		params.push(name.to_string());
		Ok(())
	}

	/// Returns the original pattern string.
	pub fn raw(&self) -> &str {
		&self.raw
	}

	/// Returns the parameter names in pattern order.
	pub fn params(&self) -> &[String] {
		&self.params
	}

	/// Checks whether the full path matches this pattern.
	pub fn is_match(&self, path: &str) -> bool {
		self.regex.is_match(path)
	}

	/// Matches `path` and extracts the bound parameter values.
	///
	/// Returns `None` if the path does not match.
	pub fn capture(&self, path: &str) -> Option<HashMap<String, String>> {
		self.regex.captures(path).map(|caps| {
			self.params
				.iter()
				.filter_map(|name| {
					caps.name(name)
						.map(|m| (name.clone(), m.as_str().to_string()))
				})
				.collect()
		})
	}
}

impl PartialEq for RoutePattern {
	fn eq(&self, other: &Self) -> bool {
		self.raw == other.raw
	}
}

impl Eq for RoutePattern {}

impl fmt::Display for RoutePattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.raw)
	}
}
