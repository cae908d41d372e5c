//! Declarative two-way data binding between an element tree and a
//! plain key-value state container.
//!
//! The consumer owns a [`StateCell`] and rebuilds its element tree on
//! every render pass; `pagebind` resolves the binding markers in that
//! tree into concrete value props and change handlers. Known leaf
//! controls (text inputs, checkboxes, selects and friends) bind
//! automatically through a type coercion table; anything else binds
//! explicitly through a callback key and optional selector/transform
//! pair.
//!
//! ## Example
//!
//! ```
//! use pagebind::{
//! 	BindingSession, ChangePayload, Element, Node, State, StateCell, Value,
//! };
//!
//! let cell = StateCell::new(State::from([
//! 	("firstName".to_string(), Value::Str("Ada".into())),
//! 	("subscribed".to_string(), Value::Bool(true)),
//! ]));
//!
//! let form = Element::new("form")
//! 	.bind_children()
//! 	.child(
//! 		Element::new("input")
//! 			.attr("type", "text")
//! 			.name("first-name")
//! 			.bind(),
//! 	)
//! 	.child(
//! 		Element::new("input")
//! 			.attr("type", "checkbox")
//! 			.name("subscribed")
//! 			.bind(),
//! 	)
//! 	.child(Node::text("subscribe?"));
//!
//! let session = BindingSession::new(&cell);
//! let bound = session.bind(&form).unwrap();
//!
//! let first = bound.child_nodes()[0].as_element().unwrap();
//! assert_eq!(first.prop("value"), Some(&Value::Str("Ada".into())));
//!
//! // User input flows back through the shared cell.
//! first.emit("change", &ChangePayload::value_event("first-name", "Grace"));
//! assert_eq!(cell.get()["firstName"], Value::Str("Grace".into()));
//! ```
//!
//! Binding never mutates an input tree: the output is a rebuilt clone
//! with the directives stripped. A session is scoped to one snapshot;
//! construct a fresh one after every state change.

#![warn(missing_docs)]

mod binder;
pub mod diag;
pub mod kinds;
pub mod node;
pub mod providers;
pub mod resolve;
pub mod session;
pub mod state;
pub mod value;

pub use diag::{BindError, CollectingSink, Diagnostic, DiagnosticSink, TracingSink};
pub use kinds::{ChangeStrategy, Coercion, KnownKind};
pub use node::{
	CHANGE_EVENT, ChangeHandler, ChangePayload, Directives, Element, EventTarget, InputEvent, Node,
	Selector, Transform,
};
pub use providers::{bound_with_name, input_binding};
pub use resolve::resolve_camel_case;
pub use session::{BindOutcome, BindingSession, BoundProps, PropBinding};
pub use state::{State, StateCell};
pub use value::{FileList, FileRef, Value};
