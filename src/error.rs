//! Error types for route registration and request dispatch.
//!
//! The router distinguishes two error kinds:
//!
//! - [`SyntaxError`] - configuration-time failures raised while registering
//!   routes or filters. These are fatal to the registration call and should
//!   abort startup; a misconfigured route must simply not be added.
//! - [`RuntimeError`] - request-time failures raised while matching or
//!   executing a single request. Callers catch these per request and
//!   translate them into a response; they must never crash the serving
//!   process.
//!
//! Each error carries a numeric classification mirroring HTTP semantics
//! (400 bad input, 404 not found, 405 not allowed, 500 internal) purely as
//! data on the error - this crate does not produce HTTP responses itself.
//! The message text is part of the public contract and is asserted by the
//! integration tests.

use thiserror::Error;

/// Configuration-time errors raised during route or filter registration.
///
/// Every syntax error classifies as 500 (internal): the problem is in the
/// application's route table, not in any request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SyntaxError {
	/// The method string passed to `add_route` is not a recognized HTTP
	/// verb or the `ANY` marker.
	#[error("Http method \"{0}\" invalid")]
	InvalidHttpMethod(String),

	/// Two parameter segments in one pattern share a name.
	#[error("Param with duplicate name \":{0}\"")]
	DuplicateParamName(String),

	/// A pattern references a filter name missing from the registry.
	#[error("Filter \"{0}\" not implemented")]
	FilterNotImplemented(String),

	/// A pattern uses the reserved parameter name `context`.
	#[error("Param with reserved name \":context\"")]
	ReservedParamName,

	/// The compiled pattern is not a valid regex. This can only happen
	/// when a user-registered filter fragment is itself malformed.
	#[error("Pattern \"{pattern}\" invalid: {reason}")]
	InvalidPattern {
		/// The offending route pattern.
		pattern: String,
		/// Compilation failure reported by the regex engine.
		reason: String,
	},
}

impl SyntaxError {
	/// Numeric classification of this error.
	pub fn code(&self) -> u16 {
		500
	}
}

/// Request-time errors raised while matching or executing a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RuntimeError {
	/// The request method is not a recognized HTTP verb.
	#[error("Http method \"{0}\" invalid")]
	InvalidHttpMethod(String),

	/// No registered pattern matches the request path.
	#[error("Route \"{0}\" not found!")]
	NotFound(String),

	/// Patterns match the path, but none for the requested method.
	#[error("Method \"{method}\" not allowed for route \"{path}\"!")]
	MethodNotAllowed {
		/// The requested HTTP method.
		method: String,
		/// The request path (after any friendly-alias substitution).
		path: String,
	},

	/// A handler declares a required parameter with no matching route
	/// parameter and no default.
	#[error("Required argument \"{name}\" for invoke \"{handler}\"!")]
	RequiredArgument {
		/// The declared parameter name.
		name: String,
		/// Descriptor of the handler being invoked.
		handler: String,
	},

	/// A named handler references a class absent from the registry.
	#[error("Class \"{0}\" does not exist")]
	ClassNotFound(String),

	/// A named handler references a method absent from its class.
	#[error("Method {class}::{method}() does not exist")]
	MethodNotFound {
		/// The registered class name.
		class: String,
		/// The missing method name.
		method: String,
	},

	/// A named handler references an unregistered free function.
	#[error("Function {0}() does not exist")]
	FunctionNotFound(String),
}

impl RuntimeError {
	/// Numeric classification of this error.
	pub fn code(&self) -> u16 {
		match self {
			Self::InvalidHttpMethod(_) => 400,
			Self::NotFound(_) => 404,
			Self::MethodNotAllowed { .. } => 405,
			Self::RequiredArgument { .. }
			| Self::ClassNotFound(_)
			| Self::MethodNotFound { .. }
			| Self::FunctionNotFound(_) => 500,
		}
	}
}
