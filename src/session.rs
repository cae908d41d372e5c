//! The binding session facade.
//!
//! A [`BindingSession`] is constructed once per render pass from the
//! shared [`StateCell`]. It captures the snapshot current at that
//! moment and never learns about a newer one: change handlers write
//! through the cell, and the surrounding scheduler rebuilds the
//! session on the next pass.
//!
//! ## Example
//!
//! ```
//! use pagebind::{BindingSession, Element, State, StateCell, Value};
//!
//! let cell = StateCell::new(State::from([(
//! 	"username".to_string(),
//! 	Value::Str("ada".into()),
//! )]));
//! let session = BindingSession::new(&cell);
//!
//! let input = Element::new("input")
//! 	.attr("type", "text")
//! 	.name("username")
//! 	.bind();
//! let bound = session.bind(&input).unwrap();
//! assert_eq!(bound.prop("value"), Some(&Value::Str("ada".into())));
//! ```

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::binder::KnownBinder;
use crate::diag::{BindError, Diagnostic, DiagnosticSink, TracingSink};
use crate::node::{ChangeHandler, ChangePayload, Element, Node, Selector, Transform};
use crate::resolve::resolve_camel_case;
use crate::state::{State, StateCell};
use crate::value::Value;

/// The decision for a single element.
#[derive(Debug, Clone)]
pub enum BindOutcome {
	/// The element does not participate; it is left unchanged.
	Unbound,
	/// The element was bound; the transformed clone replaces it.
	Bound(Element),
}

/// Configuration for an explicit binding, independent of any element.
///
/// All optional pieces default independently; only the field name and
/// the callback key are required.
#[derive(Clone)]
pub struct PropBinding {
	name: String,
	callback: String,
	property: Option<String>,
	selector: Option<Selector>,
	transform: Option<Transform>,
}

impl PropBinding {
	/// Creates a binding for the named field, delivering changes
	/// through the given callback key.
	pub fn new(name: impl Into<String>, callback: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			callback: callback.into(),
			property: None,
			selector: None,
			transform: None,
		}
	}

	/// Mirrors the current state value onto the named property.
	pub fn property(mut self, property: impl Into<String>) -> Self {
		self.property = Some(property.into());
		self
	}

	/// Overrides payload handling with a custom selector.
	pub fn selector(mut self, selector: impl Fn(&ChangePayload) -> Value + 'static) -> Self {
		self.selector = Some(Rc::new(selector));
		self
	}

	/// Formats the state value before it is mirrored onto the target
	/// property.
	pub fn transform(mut self, transform: impl Fn(&Value) -> Value + 'static) -> Self {
		self.transform = Some(Rc::new(transform));
		self
	}
}

impl std::fmt::Debug for PropBinding {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PropBinding")
			.field("name", &self.name)
			.field("callback", &self.callback)
			.field("property", &self.property)
			.field("selector", &self.selector.as_ref().map(|_| "<fn>"))
			.field("transform", &self.transform.as_ref().map(|_| "<fn>"))
			.finish()
	}
}

/// A standalone attribute set produced by
/// [`BindingSession::bind_props`].
///
/// Splice it onto any element with
/// [`Element::merge_props`]; this is the escape hatch for element
/// types the engine cannot classify (custom components).
pub struct BoundProps {
	name: String,
	props: BTreeMap<String, Value>,
	handlers: BTreeMap<String, ChangeHandler>,
}

impl BoundProps {
	/// The resolved field name this binding targets.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The concrete value props to set.
	pub fn props(&self) -> &BTreeMap<String, Value> {
		&self.props
	}

	/// Decomposes into name, props, and handlers.
	pub fn into_parts(
		self,
	) -> (
		String,
		BTreeMap<String, Value>,
		BTreeMap<String, ChangeHandler>,
	) {
		(self.name, self.props, self.handlers)
	}
}

impl std::fmt::Debug for BoundProps {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BoundProps")
			.field("name", &self.name)
			.field("props", &self.props)
			.field("handler_keys", &self.handlers.keys().collect::<Vec<_>>())
			.finish()
	}
}

/// Stateful binding facade for one render pass.
pub struct BindingSession {
	snapshot: Rc<State>,
	cell: StateCell,
	sink: Rc<dyn DiagnosticSink>,
	known: OnceCell<KnownBinder>,
}

impl BindingSession {
	/// Creates a session over the cell's current snapshot, with
	/// advisories going to the default tracing sink.
	pub fn new(cell: &StateCell) -> Self {
		Self::with_sink(cell, Rc::new(TracingSink))
	}

	/// Creates a session with a caller-supplied diagnostic sink.
	pub fn with_sink(cell: &StateCell, sink: Rc<dyn DiagnosticSink>) -> Self {
		Self {
			snapshot: Rc::new(cell.get()),
			cell: cell.clone(),
			sink,
			known: OnceCell::new(),
		}
	}

	/// The snapshot this session was constructed with.
	pub fn snapshot(&self) -> &State {
		&self.snapshot
	}

	/// The shared cell, for programmatic reads and writes.
	pub fn updater(&self) -> StateCell {
		self.cell.clone()
	}

	/// Binds a single element or, if it carries the recurse marker,
	/// its whole subtree.
	///
	/// Direct requests must succeed: an element with neither marker
	/// fails with [`BindError::MissingBindDirective`], and a decision
	/// of `Unbound` or unbindable escalates to
	/// [`BindError::BindingFailed`]. Inside a subtree the same
	/// outcomes merely leave the descendant unchanged.
	pub fn bind(&self, element: &Element) -> Result<Element, BindError> {
		let name = element.target_name().unwrap_or("(no name)").to_string();

		if element.directives().bind_children {
			return Ok(self.bind_subtree(element));
		}
		if !element.directives().bind {
			return Err(BindError::MissingBindDirective { name });
		}

		match self.decide(element) {
			Ok(BindOutcome::Bound(bound)) => Ok(bound),
			Ok(BindOutcome::Unbound) => Err(BindError::BindingFailed { name }),
			// The coercion table's own failure keeps its identity.
			Err(err @ BindError::UnknownInputKind { .. }) => Err(err),
			Err(_) => Err(BindError::BindingFailed { name }),
		}
	}

	/// Decides the binding for one element.
	///
	/// An element without a usable name or without the participation
	/// marker is `Unbound`. An explicit callback always wins over
	/// automatic binding; otherwise the element must be a known
	/// control kind.
	pub fn decide(&self, element: &Element) -> Result<BindOutcome, BindError> {
		let Some(name) = element.target_name() else {
			return Ok(BindOutcome::Unbound);
		};
		if name.trim().is_empty() {
			return Ok(BindOutcome::Unbound);
		}
		if !element.directives().bind {
			return Ok(BindOutcome::Unbound);
		}

		let directives = element.directives();
		if let Some(callback) = directives.callback.as_ref().filter(|c| !c.is_empty()) {
			let binding = PropBinding {
				name: name.to_string(),
				callback: callback.clone(),
				property: directives.property.clone(),
				selector: directives.selector.clone(),
				transform: directives.transform.clone(),
			};
			let bound = element.clone().merge_props(self.bind_props(binding));
			return Ok(BindOutcome::Bound(bound));
		}

		match self.known_binder().try_bind(element)? {
			Some(bound) => Ok(BindOutcome::Bound(bound)),
			None => Err(BindError::Unbindable {
				tag: element.tag().to_string(),
			}),
		}
	}

	/// Builds the explicit-binding attribute set for a named field.
	///
	/// The returned handler derives a raw value (selector, else the
	/// configured target property of a recognized input event, else
	/// the raw payload) and replaces the state snapshot with a copy
	/// where only the resolved field changed. If a target property is
	/// configured, it is preloaded with the transformed current value.
	pub fn bind_props(&self, binding: PropBinding) -> BoundProps {
		let field = resolve_camel_case(&binding.name).into_owned();
		if !self.snapshot.contains_key(&field) {
			self.sink.report(&Diagnostic::NameMismatch {
				field: field.clone(),
			});
		}

		let handler: ChangeHandler = {
			let cell = self.cell.clone();
			let field = field.clone();
			let selector = binding.selector.clone();
			let property = binding.property.clone();
			Rc::new(move |payload: &ChangePayload| {
				let value = if let Some(selector) = &selector {
					selector(payload)
				} else {
					match payload {
						ChangePayload::Event(event) => property
							.as_deref()
							.and_then(|p| event.target().get(p))
							.cloned()
							.unwrap_or(Value::Null),
						ChangePayload::Raw(value) => value.clone(),
					}
				};
				cell.update(|prev| {
					let mut next = prev.clone();
					next.insert(field.clone(), value.clone());
					next
				});
			})
		};

		let mut props = BTreeMap::new();
		if let Some(property) = &binding.property {
			let current = self.snapshot.get(&field).cloned().unwrap_or(Value::Null);
			let display = match &binding.transform {
				Some(transform) => transform(&current),
				None => current,
			};
			props.insert(property.clone(), display);
		}

		let mut handlers = BTreeMap::new();
		handlers.insert(binding.callback, handler);

		BoundProps {
			name: field,
			props,
			handlers,
		}
	}

	/// Depth-first pre-order walk of a subtree.
	///
	/// Descendants that bind are replaced; everything else stays as
	/// written, and the parent shell is reproduced unchanged around
	/// the rebuilt child sequence.
	fn bind_subtree(&self, parent: &Element) -> Element {
		let children = parent
			.child_nodes()
			.iter()
			.map(|child| match child {
				Node::Element(el) => {
					let resolved = match self.decide(el) {
						Ok(BindOutcome::Bound(bound)) => bound,
						// One malformed descendant must not abort the
						// whole tree; only direct requests escalate.
						Ok(BindOutcome::Unbound) | Err(_) => el.clone(),
					};
					let resolved = if resolved.child_nodes().is_empty() {
						resolved
					} else {
						self.bind_subtree(&resolved)
					};
					Node::Element(resolved)
				}
				other => other.clone(),
			})
			.collect();
		parent.with_children(children)
	}

	/// The lazily-built automatic binder scoped to this snapshot.
	fn known_binder(&self) -> &KnownBinder {
		self.known.get_or_init(|| {
			KnownBinder::new(self.snapshot.clone(), self.cell.clone(), self.sink.clone())
		})
	}
}

impl std::fmt::Debug for BindingSession {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BindingSession")
			.field("snapshot", &self.snapshot)
			.finish()
	}
}
