//! # Junction
//!
//! An embeddable HTTP request-routing and middleware-dispatch engine.
//! Given a registered set of (method, path-pattern) → handler-chain
//! bindings, the router resolves an incoming (method, path) to an ordered
//! chain of handlers, executes the chain against a shared per-request
//! [`Context`], and reports failures through a structured error taxonomy.
//!
//! The crate performs no I/O and serializes no HTTP messages: the network
//! listener that supplies (method, path) and consumes the final result is
//! an external collaborator. Junction only decides *which* handlers run,
//! in *what* order, with *which* parameters, and what happens on failure.
//!
//! # Routing
//!
//! Patterns mix literal segments, named parameters, filtered parameters
//! and a trailing wildcard:
//!
//! ```
//! use junction::{Args, Callable, Context, Router};
//! use serde_json::json;
//!
//! let mut router = Router::new();
//! router
//!     .get(
//!         "/:var1/xxx/:var2",
//!         Callable::new(|_ctx: &mut Context, args: &Args| {
//!             Some(json!(format!(
//!                 "{}:{}",
//!                 args.str("var1").unwrap(),
//!                 args.str("var2").unwrap()
//!             )))
//!         })
//!         .param("var1")
//!         .param("var2"),
//!     )
//!     .unwrap();
//!
//! let mut ctx = router.dispatch("GET", "/AAA/xxx/111").unwrap();
//! ctx.execute().unwrap();
//! assert_eq!(ctx.result, Some(json!("AAA:111")));
//! ```
//!
//! # Middleware chains
//!
//! A route registers one or more handlers; every route matching a request
//! contributes its chain, in registration order. Handlers share the
//! request's [`Context`]: its data bag, its `result`, and the cooperative
//! [`Context::stop`] signal:
//!
//! ```
//! use junction::{Callable, Context, ContextState, Router};
//! use serde_json::json;
//!
//! let mut router = Router::new();
//! router
//!     .get(
//!         "/jobs",
//!         (
//!             Callable::new(|ctx: &mut Context, _args: &junction::Args| {
//!                 ctx.set("seen", json!(true));
//!                 ctx.stop();
//!                 Some(json!("halted"))
//!             }),
//!             Callable::new(|_ctx: &mut Context, _args: &junction::Args| {
//!                 Some(json!("never runs"))
//!             }),
//!         ),
//!     )
//!     .unwrap();
//!
//! let mut ctx = router.dispatch("GET", "/jobs").unwrap();
//! ctx.execute().unwrap();
//! assert_eq!(ctx.state(), ContextState::Stopped);
//! assert_eq!(ctx.result, Some(json!("halted")));
//! ```
//!
//! # Error taxonomy
//!
//! Registration failures are [`SyntaxError`]s (configuration-time, always
//! 500); matching and execution failures are [`RuntimeError`]s carrying an
//! HTTP-like code (400/404/405/500) as data.

pub mod context;
pub mod error;
pub mod filter;
pub mod handler;
pub mod pattern;
pub mod route;
pub mod router;

pub use context::{Context, ContextState, RouteMatch};
pub use error::{RuntimeError, SyntaxError};
pub use filter::FilterRegistry;
pub use handler::{Args, Callable, Handler, HandlerFn, HandlerRegistry, Invokable, ParamSpec};
pub use pattern::RoutePattern;
pub use route::{HandlerChain, Method, Route};
pub use router::Router;

/// Value type carried through handler results and the context data bag.
pub use serde_json::Value;
