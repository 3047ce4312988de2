//! Handler descriptors, resolution and argument binding.
//!
//! Handlers reach the router in heterogeneous shapes, modeled as a closed
//! set of descriptor variants:
//!
//! - [`Handler::Callable`] - a closure or function pointer wrapped in a
//!   [`Callable`] together with its declared parameter list. Rust has no
//!   signature reflection, so the ordered parameter names are declared
//!   explicitly at construction.
//! - [`Handler::Named`] - a string naming a registered free function
//!   (`"sum"`) or class method (`"Totals::add"`), resolved against the
//!   router's [`HandlerRegistry`] when the chain executes.
//! - [`Handler::Invokable`] - an object whose call operator is the entry
//!   point, via the [`Invokable`] trait.
//!
//! Every handler is resolved into a uniform [`Callable`] before invocation.
//! Argument binding is a pure name lookup against the current chain step's
//! route parameters: required parameters missing from the route fail with
//! a 500 naming the parameter and the handler descriptor; a declared
//! context slot binds no positional value because every invocation already
//! receives the [`Context`] by exclusive reference.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::context::Context;
use crate::error::RuntimeError;

/// Invocation signature shared by every resolved handler.
pub type HandlerFn = Arc<dyn Fn(&mut Context, &Args) -> Option<Value> + Send + Sync>;

/// Descriptor used for closures without an explicit name.
const CLOSURE_DESCRIPTOR: &str = "{closure}";

/// One declared handler parameter, bound by name per chain step.
#[derive(Debug, Clone)]
pub enum ParamSpec {
	/// Bind the route parameter with this name; missing is an error.
	Required(String),
	/// Bind the route parameter with this name, or fall back to a default.
	Optional(String, Value),
	/// The execution context itself. Binds no positional value; the
	/// context is always passed by exclusive reference.
	Context,
}

/// Arguments bound for one handler invocation, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Args {
	values: Vec<(String, Value)>,
}

impl Args {
	/// Looks up a bound argument by its declared name.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.values
			.iter()
			.find(|(bound, _)| bound == name)
			.map(|(_, value)| value)
	}

	/// Looks up a bound argument by declaration position.
	pub fn at(&self, index: usize) -> Option<&Value> {
		self.values.get(index).map(|(_, value)| value)
	}

	/// Convenience accessor for string-valued arguments.
	pub fn str(&self, name: &str) -> Option<&str> {
		self.get(name).and_then(Value::as_str)
	}

	/// Number of bound arguments.
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Whether no arguments were bound.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Iterates over `(name, value)` pairs in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.values
			.iter()
			.map(|(name, value)| (name.as_str(), value))
	}
}

/// A uniform invocable handler: function plus declared parameter list.
///
/// # Examples
///
/// ```
/// use junction::{Args, Callable, Context};
/// use serde_json::{Value, json};
///
/// let handler = Callable::new(|_ctx: &mut Context, args: &Args| {
///     Some(json!(format!("user {}", args.str("id").unwrap())))
/// })
/// .param("id");
/// ```
#[derive(Clone)]
pub struct Callable {
	descriptor: String,
	params: Vec<ParamSpec>,
	func: HandlerFn,
}

impl Callable {
	/// Wraps a function with an empty parameter list.
	pub fn new<F>(func: F) -> Self
	where
		F: Fn(&mut Context, &Args) -> Option<Value> + Send + Sync + 'static,
	{
		Self {
			descriptor: CLOSURE_DESCRIPTOR.to_string(),
			params: Vec::new(),
			func: Arc::new(func),
		}
	}

	/// Sets the descriptor used in error messages.
	pub fn with_descriptor(mut self, descriptor: impl Into<String>) -> Self {
		self.descriptor = descriptor.into();
		self
	}

	/// Declares a required parameter bound from the route by name.
	pub fn param(mut self, name: impl Into<String>) -> Self {
		self.params.push(ParamSpec::Required(name.into()));
		self
	}

	/// Declares a parameter bound from the route or a default value.
	pub fn param_or(mut self, name: impl Into<String>, default: Value) -> Self {
		self.params.push(ParamSpec::Optional(name.into(), default));
		self
	}

	/// Declares the execution context sentinel.
	pub fn context(mut self) -> Self {
		self.params.push(ParamSpec::Context);
		self
	}

	/// Returns the descriptor used in error messages.
	pub fn descriptor(&self) -> &str {
		&self.descriptor
	}

	/// Returns the declared parameter list.
	pub fn params(&self) -> &[ParamSpec] {
		&self.params
	}

	/// Binds the declared parameters against one step's route parameters.
	pub(crate) fn bind(
		&self,
		route_params: &HashMap<String, String>,
	) -> Result<Args, RuntimeError> {
		let mut values = Vec::new();
		for spec in &self.params {
			match spec {
				ParamSpec::Required(name) => match route_params.get(name) {
					Some(value) => values.push((name.clone(), Value::String(value.clone()))),
					None => {
						return Err(RuntimeError::RequiredArgument {
							name: name.clone(),
							handler: self.descriptor.clone(),
						});
					}
				},
				ParamSpec::Optional(name, default) => {
					let value = route_params
						.get(name)
						.map(|value| Value::String(value.clone()))
						.unwrap_or_else(|| default.clone());
					values.push((name.clone(), value));
				}
				ParamSpec::Context => {}
			}
		}
		Ok(Args { values })
	}

	/// Invokes the handler with the bound arguments.
	pub(crate) fn invoke(&self, ctx: &mut Context, args: &Args) -> Option<Value> {
		(self.func)(ctx, args)
	}
}

impl fmt::Debug for Callable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Callable")
			.field("descriptor", &self.descriptor)
			.field("params", &self.params)
			.finish()
	}
}

/// An object whose call operator is the single entry point.
pub trait Invokable: Send + Sync {
	/// Descriptor used in error messages.
	fn descriptor(&self) -> &str {
		"{invokable}"
	}

	/// Declared parameters, bound like any other handler's.
	fn params(&self) -> Vec<ParamSpec> {
		Vec::new()
	}

	/// Invokes the object against the current context and bound arguments.
	fn call(&self, ctx: &mut Context, args: &Args) -> Option<Value>;
}

/// One handler as supplied at registration time.
#[derive(Clone)]
pub enum Handler {
	/// A closure or function with declared parameters.
	Callable(Callable),
	/// A registered name: `"function"` or `"Class::method"`.
	Named(String),
	/// A call-operator object.
	Invokable(Arc<dyn Invokable>),
}

impl fmt::Debug for Handler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Callable(callable) => f.debug_tuple("Callable").field(callable).finish(),
			Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
			Self::Invokable(obj) => f.debug_tuple("Invokable").field(&obj.descriptor()).finish(),
		}
	}
}

impl From<Callable> for Handler {
	fn from(callable: Callable) -> Self {
		Self::Callable(callable)
	}
}

impl From<&str> for Handler {
	fn from(name: &str) -> Self {
		Self::Named(name.to_string())
	}
}

impl From<String> for Handler {
	fn from(name: String) -> Self {
		Self::Named(name)
	}
}

impl From<Arc<dyn Invokable>> for Handler {
	fn from(obj: Arc<dyn Invokable>) -> Self {
		Self::Invokable(obj)
	}
}

/// Registered named handlers: free functions and class methods.
///
/// The router keeps its registry behind an [`Arc`]; every dispatched
/// context receives a snapshot clone, so late registrations never affect
/// an in-flight chain.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
	functions: HashMap<String, Callable>,
	classes: HashMap<String, HashMap<String, Callable>>,
}

impl HandlerRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a free function under `name`.
	///
	/// The registered name becomes the callable's descriptor.
	pub fn register_function(&mut self, name: impl Into<String>, callable: Callable) {
		let name = name.into();
		let callable = callable.with_descriptor(name.clone());
		self.functions.insert(name, callable);
	}

	/// Registers a method under `class::method`.
	///
	/// A bound method is a callable capturing an `Arc` of its receiver; a
	/// static method is the same without captures. Both resolve through
	/// this table.
	pub fn register_method(
		&mut self,
		class: impl Into<String>,
		method: impl Into<String>,
		callable: Callable,
	) {
		let class = class.into();
		let method = method.into();
		let callable = callable.with_descriptor(format!("{class}::{method}"));
		self.classes.entry(class).or_default().insert(method, callable);
	}

	/// Resolves a handler descriptor into a uniform [`Callable`].
	///
	/// # Errors
	///
	/// Named handlers fail with [`RuntimeError::ClassNotFound`],
	/// [`RuntimeError::MethodNotFound`] or [`RuntimeError::FunctionNotFound`]
	/// (all code 500) when the target is not registered.
	pub fn resolve(&self, handler: &Handler) -> Result<Callable, RuntimeError> {
		match handler {
			Handler::Callable(callable) => Ok(callable.clone()),
			Handler::Invokable(obj) => {
				let obj = Arc::clone(obj);
				let params = obj.params();
				let descriptor = obj.descriptor().to_string();
				let func: HandlerFn = Arc::new(move |ctx, args| obj.call(ctx, args));
				Ok(Callable {
					descriptor,
					params,
					func,
				})
			}
			Handler::Named(name) => match name.split_once("::") {
				Some((class, method)) => {
					let methods = self
						.classes
						.get(class)
						.ok_or_else(|| RuntimeError::ClassNotFound(class.to_string()))?;
					methods
						.get(method)
						.cloned()
						.ok_or_else(|| RuntimeError::MethodNotFound {
							class: class.to_string(),
							method: method.to_string(),
						})
				}
				None => self
					.functions
					.get(name)
					.cloned()
					.ok_or_else(|| RuntimeError::FunctionNotFound(name.clone())),
			},
		}
	}
}

impl fmt::Debug for HandlerRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HandlerRegistry")
			.field("functions", &self.functions.keys().collect::<Vec<_>>())
			.field("classes", &self.classes.keys().collect::<Vec<_>>())
			.finish()
	}
}
