//! Per-dispatch execution context and its state machine.
//!
//! A [`Context`] is produced by a successful
//! [`Router::dispatch`](crate::Router::dispatch) in the
//! [`ContextState::Pending`] state and consumed by exactly one
//! [`execute`](Context::execute) call. The handler chain runs strictly
//! sequentially; each step rebinds the current match to its own route's
//! parameters, invokes the handler with the context by exclusive
//! reference, and overwrites [`result`](Context::result) with whatever the
//! handler returned, including nothing. A handler may call
//! [`stop`](Context::stop) to end the chain cooperatively at the next step
//! boundary.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::trace;

use crate::error::RuntimeError;
use crate::handler::{Handler, HandlerRegistry};

/// Lifecycle of a dispatched context.
///
/// Transitions are `Pending → Completed` or `Pending → Stopped`, each
/// exactly once and never reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
	/// Matched but not yet executed.
	Pending,
	/// The chain ran to completion.
	Completed,
	/// A handler stopped the chain early.
	Stopped,
}

/// One resolved correspondence between a request and a registered route:
/// the route's pattern and its extracted parameter values.
#[derive(Clone)]
pub struct RouteMatch {
	pattern: Arc<str>,
	params: Arc<HashMap<String, String>>,
}

impl RouteMatch {
	pub(crate) fn new(pattern: Arc<str>, params: Arc<HashMap<String, String>>) -> Self {
		Self { pattern, params }
	}

	/// The matched route's pattern string.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// The extracted parameter values.
	pub fn params(&self) -> &HashMap<String, String> {
		&self.params
	}

	/// Looks up one parameter value.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}
}

impl fmt::Debug for RouteMatch {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteMatch")
			.field("pattern", &self.pattern)
			.field("params", &self.params)
			.finish()
	}
}

/// One step of the flattened handler chain: the handler plus the match
/// info of the route that contributed it.
#[derive(Debug, Clone)]
pub(crate) struct Step {
	pub(crate) route: RouteMatch,
	pub(crate) handler: Handler,
}

/// The per-dispatch mutable state threaded through a handler chain.
pub struct Context {
	state: ContextState,
	current: RouteMatch,
	steps: Vec<Step>,
	data: HashMap<String, Value>,
	registry: Arc<HandlerRegistry>,
	stop_requested: bool,
	/// Last value produced by an executed handler, overwritten on every
	/// step; a finisher passed to [`execute_with`](Self::execute_with) may
	/// overwrite it one final time.
	pub result: Option<Value>,
}

impl Context {
	/// Builds a pending context over a non-empty chain.
	pub(crate) fn new(steps: Vec<Step>, registry: Arc<HandlerRegistry>) -> Self {
		debug_assert!(!steps.is_empty());
		let current = steps[0].route.clone();
		Self {
			state: ContextState::Pending,
			current,
			steps,
			data: HashMap::new(),
			registry,
			stop_requested: false,
			result: None,
		}
	}

	/// The context's lifecycle state.
	pub fn state(&self) -> ContextState {
		self.state
	}

	/// Match info of the route whose handler is (or was) executing; before
	/// execution, the first matched route.
	pub fn current(&self) -> &RouteMatch {
		&self.current
	}

	/// Reads a value from the user data bag.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.data.get(key)
	}

	/// Reads a value from the user data bag, or a default.
	pub fn get_or(&self, key: &str, default: Value) -> Value {
		self.data.get(key).cloned().unwrap_or(default)
	}

	/// Writes a value into the user data bag. Chainable.
	pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
		self.data.insert(key.into(), value.into());
		self
	}

	/// Requests a cooperative stop: the chain ends after the handler
	/// currently running finishes. Calling it on a pending context latches
	/// the request, ending the next `execute` after its first step.
	pub fn stop(&mut self) {
		self.stop_requested = true;
	}

	/// Runs the handler chain to a terminal state.
	///
	/// Executing an already-terminal context is a no-op returning the
	/// context unchanged.
	///
	/// # Errors
	///
	/// Propagates handler-resolution and argument-binding failures; see
	/// [`RuntimeError`].
	pub fn execute(&mut self) -> Result<&mut Self, RuntimeError> {
		self.run(None::<fn(&mut Context)>)
	}

	/// Runs the handler chain, then invokes `finisher` once with the
	/// terminal context. The finisher may read or overwrite
	/// [`result`](Self::result); its mutation is the final observable
	/// value.
	pub fn execute_with<F>(&mut self, finisher: F) -> Result<&mut Self, RuntimeError>
	where
		F: FnOnce(&mut Context),
	{
		self.run(Some(finisher))
	}

	fn run<F>(&mut self, finisher: Option<F>) -> Result<&mut Self, RuntimeError>
	where
		F: FnOnce(&mut Context),
	{
		if self.state != ContextState::Pending {
			return Ok(self);
		}

		for index in 0..self.steps.len() {
			let step = self.steps[index].clone();
			trace!(step = index, pattern = step.route.pattern(), "executing chain step");
			self.current = step.route.clone();

			let callable = self.registry.resolve(&step.handler)?;
			let args = callable.bind(step.route.params())?;
			self.result = callable.invoke(self, &args);

			if self.stop_requested {
				self.state = ContextState::Stopped;
				break;
			}
		}

		if self.state == ContextState::Pending {
			self.state = ContextState::Completed;
		}
		if let Some(finisher) = finisher {
			finisher(self);
		}
		Ok(self)
	}
}

impl fmt::Debug for Context {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Context")
			.field("state", &self.state)
			.field("current", &self.current)
			.field("steps", &self.steps.len())
			.field("data", &self.data)
			.field("result", &self.result)
			.finish()
	}
}
