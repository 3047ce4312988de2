//! Route registration and request dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::context::{Context, RouteMatch, Step};
use crate::error::{RuntimeError, SyntaxError};
use crate::filter::FilterRegistry;
use crate::handler::{Callable, HandlerRegistry};
use crate::pattern::RoutePattern;
use crate::route::{HandlerChain, Method, Route};

/// Registration marker matching every HTTP method.
const ANY_METHOD: &str = "ANY";

/// The request router: route table, filter registry, friendly aliases and
/// named-handler registry.
///
/// Routes are matched in registration order. Registration happens through
/// `&mut Router` during a configuration phase; [`dispatch`](Self::dispatch)
/// takes `&Router`, so Rust's aliasing rules keep registration and dispatch
/// from interleaving. The named-handler registry is handed to each
/// dispatched context as an [`Arc`] snapshot.
///
/// # Examples
///
/// ```
/// use junction::{Args, Callable, Context, Router};
/// use serde_json::json;
///
/// let mut router = Router::new();
/// router
///     .get(
///         "/user/:id[d]",
///         Callable::new(|_ctx: &mut Context, args: &Args| {
///             Some(json!(format!("user {}", args.str("id").unwrap())))
///         })
///         .param("id"),
///     )
///     .unwrap();
///
/// let mut ctx = router.dispatch("GET", "/user/42").unwrap();
/// ctx.execute().unwrap();
/// assert_eq!(ctx.result, Some(json!("user 42")));
/// ```
#[derive(Debug, Default)]
pub struct Router {
	filters: FilterRegistry,
	routes: Vec<Route>,
	aliases: HashMap<String, String>,
	handlers: Arc<HandlerRegistry>,
}

impl Router {
	/// Creates an empty router with the built-in filters.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a named filter fragment for use in patterns. Chainable;
	/// the last registration under a name wins.
	pub fn add_filter(&mut self, name: impl Into<String>, fragment: impl Into<String>) -> &mut Self {
		self.filters.register(name, fragment);
		self
	}

	/// Registers a friendly alias: requests for `alias` are dispatched as
	/// if made to `target`, preserving the original method.
	pub fn friendly(&mut self, alias: impl Into<String>, target: impl Into<String>) -> &mut Self {
		let alias = alias.into();
		let target = target.into();
		debug!(%alias, %target, "registering friendly alias");
		self.aliases.insert(alias, target);
		self
	}

	/// Registers a free function invocable by name from a route.
	pub fn register_function(&mut self, name: impl Into<String>, callable: Callable) -> &mut Self {
		Arc::make_mut(&mut self.handlers).register_function(name, callable);
		self
	}

	/// Registers a class method invocable as `"Class::method"` from a
	/// route.
	pub fn register_method(
		&mut self,
		class: impl Into<String>,
		method: impl Into<String>,
		callable: Callable,
	) -> &mut Self {
		Arc::make_mut(&mut self.handlers).register_method(class, method, callable);
		self
	}

	/// Registers a route for `method` (an uppercase verb token or `"ANY"`).
	///
	/// # Errors
	///
	/// [`SyntaxError::InvalidHttpMethod`] for an unrecognized method token,
	/// or any pattern-compilation error; a failed registration adds
	/// nothing to the table.
	pub fn add_route(
		&mut self,
		method: &str,
		pattern: &str,
		handlers: impl Into<HandlerChain>,
	) -> Result<&mut Self, SyntaxError> {
		let method = if method == ANY_METHOD {
			None
		} else {
			Some(
				Method::parse(method)
					.ok_or_else(|| SyntaxError::InvalidHttpMethod(method.to_string()))?,
			)
		};
		self.register(method, pattern, handlers.into())
	}

	/// Registers a route matched regardless of method.
	pub fn any(
		&mut self,
		pattern: &str,
		handlers: impl Into<HandlerChain>,
	) -> Result<&mut Self, SyntaxError> {
		self.register(None, pattern, handlers.into())
	}

	fn register(
		&mut self,
		method: Option<Method>,
		pattern: &str,
		chain: HandlerChain,
	) -> Result<&mut Self, SyntaxError> {
		let pattern = RoutePattern::compile(pattern, &self.filters)?;
		debug!(
			method = method.map(|m| m.as_str()).unwrap_or(ANY_METHOD),
			pattern = pattern.raw(),
			handlers = chain.handlers().len(),
			"registering route"
		);
		self.routes.push(Route {
			method,
			pattern,
			handlers: chain.0,
		});
		Ok(self)
	}

	/// The registered routes, in registration order.
	pub fn routes(&self) -> &[Route] {
		&self.routes
	}

	/// Resolves a request to a pending [`Context`] over the concatenated
	/// handler chains of every matching route.
	///
	/// # Errors
	///
	/// - [`RuntimeError::InvalidHttpMethod`] (400) - unrecognized verb;
	/// - [`RuntimeError::NotFound`] (404) - no pattern matches the path;
	/// - [`RuntimeError::MethodNotAllowed`] (405) - patterns match the
	///   path, but only for other methods.
	pub fn dispatch(&self, method: &str, path: &str) -> Result<Context, RuntimeError> {
		let verb = Method::parse(method)
			.ok_or_else(|| RuntimeError::InvalidHttpMethod(method.to_string()))?;

		let path = match self.aliases.get(path) {
			Some(target) => {
				debug!(alias = path, %target, "rewriting friendly alias");
				target.as_str()
			}
			None => path,
		};

		let mut steps: Vec<Step> = Vec::new();
		let mut path_matched = false;
		for route in &self.routes {
			let Some(params) = route.pattern.capture(path) else {
				continue;
			};
			path_matched = true;
			if !route.accepts(verb) {
				continue;
			}
			let pattern: Arc<str> = Arc::from(route.pattern.raw());
			let params = Arc::new(params);
			for handler in &route.handlers {
				steps.push(Step {
					route: RouteMatch::new(Arc::clone(&pattern), Arc::clone(&params)),
					handler: handler.clone(),
				});
			}
		}

		if steps.is_empty() {
			return if path_matched {
				debug!(%verb, path, "method not allowed");
				Err(RuntimeError::MethodNotAllowed {
					method: verb.to_string(),
					path: path.to_string(),
				})
			} else {
				debug!(%verb, path, "no route matched");
				Err(RuntimeError::NotFound(path.to_string()))
			};
		}

		debug!(%verb, path, steps = steps.len(), "dispatched");
		Ok(Context::new(steps, Arc::clone(&self.handlers)))
	}

	// Per-verb registration sugar over `add_route`.

	/// Registers a GET route.
	pub fn get(
		&mut self,
		pattern: &str,
		handlers: impl Into<HandlerChain>,
	) -> Result<&mut Self, SyntaxError> {
		self.register(Some(Method::Get), pattern, handlers.into())
	}

	/// Registers a POST route.
	pub fn post(
		&mut self,
		pattern: &str,
		handlers: impl Into<HandlerChain>,
	) -> Result<&mut Self, SyntaxError> {
		self.register(Some(Method::Post), pattern, handlers.into())
	}

	/// Registers a PUT route.
	pub fn put(
		&mut self,
		pattern: &str,
		handlers: impl Into<HandlerChain>,
	) -> Result<&mut Self, SyntaxError> {
		self.register(Some(Method::Put), pattern, handlers.into())
	}

	/// Registers a PATCH route.
	pub fn patch(
		&mut self,
		pattern: &str,
		handlers: impl Into<HandlerChain>,
	) -> Result<&mut Self, SyntaxError> {
		self.register(Some(Method::Patch), pattern, handlers.into())
	}

	/// Registers a DELETE route.
	pub fn delete(
		&mut self,
		pattern: &str,
		handlers: impl Into<HandlerChain>,
	) -> Result<&mut Self, SyntaxError> {
		self.register(Some(Method::Delete), pattern, handlers.into())
	}

	/// Registers an OPTIONS route.
	pub fn options(
		&mut self,
		pattern: &str,
		handlers: impl Into<HandlerChain>,
	) -> Result<&mut Self, SyntaxError> {
		self.register(Some(Method::Options), pattern, handlers.into())
	}

	/// Registers a HEAD route.
	pub fn head(
		&mut self,
		pattern: &str,
		handlers: impl Into<HandlerChain>,
	) -> Result<&mut Self, SyntaxError> {
		self.register(Some(Method::Head), pattern, handlers.into())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_add_route_invalid_method() {
		let mut router = Router::new();
		let err = router
			.add_route("XXX", "/", Callable::new(|_, _| None))
			.unwrap_err();
		assert_eq!(err, SyntaxError::InvalidHttpMethod("XXX".to_string()));
		assert!(router.routes().is_empty());
	}

	#[test]
	fn test_failed_registration_adds_nothing() {
		let mut router = Router::new();
		assert!(router.get("/:var1/:var1", Callable::new(|_, _| None)).is_err());
		assert!(router.routes().is_empty());
	}

	#[test]
	fn test_dispatch_invalid_method_is_request_error() {
		let router = Router::new();
		let err = router.dispatch("XXX", "/100").unwrap_err();
		assert_eq!(err, RuntimeError::InvalidHttpMethod("XXX".to_string()));
		assert_eq!(err.code(), 400);
	}

	#[test]
	fn test_any_marker_is_not_a_request_method() {
		let mut router = Router::new();
		router.any("/", Callable::new(|_, _| None)).unwrap();
		let err = router.dispatch("ANY", "/").unwrap_err();
		assert_eq!(err.code(), 400);
	}

	#[test]
	fn test_dispatch_concatenates_chains_in_order() {
		let mut router = Router::new();
		router
			.get(
				"/user/:uid",
				(
					Callable::new(|_, _| Some(json!("m1"))),
					Callable::new(|_, _| Some(json!("m2"))),
				),
			)
			.unwrap()
			.any("/user/:uid", Callable::new(|_, _| Some(json!("m3"))))
			.unwrap()
			.get("/user/:user_id", Callable::new(|_, _| Some(json!("m4"))))
			.unwrap();

		let mut ctx = router.dispatch("GET", "/user/1").unwrap();
		ctx.execute().unwrap();
		// The final result is whatever the last chain step produced.
		assert_eq!(ctx.result, Some(json!("m4")));
	}

	#[test]
	fn test_first_match_populates_current() {
		let mut router = Router::new();
		router
			.get("/user/:uid", Callable::new(|_, _| None))
			.unwrap();

		let ctx = router.dispatch("GET", "/user/7").unwrap();
		assert_eq!(ctx.current().pattern(), "/user/:uid");
		assert_eq!(ctx.current().param("uid"), Some("7"));
	}

	#[test]
	fn test_alias_rewrites_before_matching() {
		let mut router = Router::new();
		router
			.get("/user/:id", Callable::new(|_, _| None))
			.unwrap()
			.friendly("/vitor", "/user/111");

		let ctx = router.dispatch("GET", "/vitor").unwrap();
		assert_eq!(ctx.current().param("id"), Some("111"));
	}

	#[test]
	fn test_alias_to_unserved_target_is_not_found() {
		let mut router = Router::new();
		router
			.get("/aaa", Callable::new(|_, _| None))
			.unwrap()
			.friendly("/short", "/missing");

		let err = router.dispatch("GET", "/short").unwrap_err();
		assert_eq!(err, RuntimeError::NotFound("/missing".to_string()));
	}
}
