//! HTTP method set, route entries and handler chains.

use std::fmt;
use std::sync::Arc;

use crate::handler::{Callable, Handler, Invokable};
use crate::pattern::RoutePattern;

/// The recognized HTTP verbs.
///
/// The `ANY` registration marker is not a verb; routes registered for any
/// method carry `None` instead of a `Method`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
	Get,
	Post,
	Put,
	Patch,
	Delete,
	Options,
	Head,
}

impl Method {
	/// All recognized verbs, in a fixed order.
	pub const ALL: [Method; 7] = [
		Method::Get,
		Method::Post,
		Method::Put,
		Method::Patch,
		Method::Delete,
		Method::Options,
		Method::Head,
	];

	/// Parses an exact uppercase verb token.
	pub fn parse(method: &str) -> Option<Self> {
		match method {
			"GET" => Some(Self::Get),
			"POST" => Some(Self::Post),
			"PUT" => Some(Self::Put),
			"PATCH" => Some(Self::Patch),
			"DELETE" => Some(Self::Delete),
			"OPTIONS" => Some(Self::Options),
			"HEAD" => Some(Self::Head),
			_ => None,
		}
	}

	/// The verb as its wire token.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Put => "PUT",
			Self::Patch => "PATCH",
			Self::Delete => "DELETE",
			Self::Options => "OPTIONS",
			Self::Head => "HEAD",
		}
	}
}

impl fmt::Display for Method {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A registered route: method, compiled pattern and ordered handler chain.
///
/// Routes are immutable after registration and owned by the
/// [`Router`](crate::Router) for the application lifetime.
#[derive(Debug)]
pub struct Route {
	pub(crate) method: Option<Method>,
	pub(crate) pattern: RoutePattern,
	pub(crate) handlers: Vec<Handler>,
}

impl Route {
	/// The route's method, or `None` when registered for any method.
	pub fn method(&self) -> Option<Method> {
		self.method
	}

	/// The compiled pattern.
	pub fn pattern(&self) -> &RoutePattern {
		&self.pattern
	}

	/// The ordered handler chain.
	pub fn handlers(&self) -> &[Handler] {
		&self.handlers
	}

	/// Whether this route serves the given request method.
	pub(crate) fn accepts(&self, method: Method) -> bool {
		self.method.is_none_or(|own| own == method)
	}
}

/// An ordered chain of one or more handlers for a single route.
///
/// Built through `From` conversions so registration accepts a single
/// handler, a handler name, a vector, or a mixed tuple of up to four
/// handlers.
#[derive(Debug, Clone, Default)]
pub struct HandlerChain(pub(crate) Vec<Handler>);

impl HandlerChain {
	/// The handlers in chain order.
	pub fn handlers(&self) -> &[Handler] {
		&self.0
	}
}

impl From<Handler> for HandlerChain {
	fn from(handler: Handler) -> Self {
		Self(vec![handler])
	}
}

impl From<Callable> for HandlerChain {
	fn from(callable: Callable) -> Self {
		Self(vec![Handler::Callable(callable)])
	}
}

impl From<&str> for HandlerChain {
	fn from(name: &str) -> Self {
		Self(vec![Handler::Named(name.to_string())])
	}
}

impl From<String> for HandlerChain {
	fn from(name: String) -> Self {
		Self(vec![Handler::Named(name)])
	}
}

impl From<Arc<dyn Invokable>> for HandlerChain {
	fn from(obj: Arc<dyn Invokable>) -> Self {
		Self(vec![Handler::Invokable(obj)])
	}
}

impl From<Vec<Handler>> for HandlerChain {
	fn from(handlers: Vec<Handler>) -> Self {
		Self(handlers)
	}
}

impl<A, B> From<(A, B)> for HandlerChain
where
	A: Into<Handler>,
	B: Into<Handler>,
{
	fn from((a, b): (A, B)) -> Self {
		Self(vec![a.into(), b.into()])
	}
}

impl<A, B, C> From<(A, B, C)> for HandlerChain
where
	A: Into<Handler>,
	B: Into<Handler>,
	C: Into<Handler>,
{
	fn from((a, b, c): (A, B, C)) -> Self {
		Self(vec![a.into(), b.into(), c.into()])
	}
}

impl<A, B, C, D> From<(A, B, C, D)> for HandlerChain
where
	A: Into<Handler>,
	B: Into<Handler>,
	C: Into<Handler>,
	D: Into<Handler>,
{
	fn from((a, b, c, d): (A, B, C, D)) -> Self {
		Self(vec![a.into(), b.into(), c.into(), d.into()])
	}
}
