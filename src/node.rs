//! Element tree.
//!
//! The consumer builds a tree of [`Node`]s for each render pass, marks
//! the controls that participate in binding, and hands the tree (or a
//! single element) to the session. Binding never mutates an input
//! element: the output is a rebuilt clone with the binding directives
//! stripped and concrete value props plus change handlers in place.
//!
//! ## Example
//!
//! ```
//! use pagebind::{Element, Node};
//!
//! let form = Element::new("div")
//! 	.bind_children()
//! 	.child(
//! 		Element::new("input")
//! 			.attr("type", "text")
//! 			.name("first-name")
//! 			.bind(),
//! 	)
//! 	.child(Node::text("static content"));
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::value::{FileList, Value};

/// Event key automatic bindings install their change handler under.
pub const CHANGE_EVENT: &str = "change";

/// Derives a raw value from a change payload, overriding the default
/// event handling of the explicit-binding path.
pub type Selector = Rc<dyn Fn(&ChangePayload) -> Value>;

/// Formats the current state value for display on a target property.
pub type Transform = Rc<dyn Fn(&Value) -> Value>;

/// A change handler wired onto a bound element.
pub type ChangeHandler = Rc<dyn Fn(&ChangePayload)>;

/// The origin of a change notification.
///
/// Mirrors the shape of a native input event target: a control name
/// plus named properties (`value`, `checked`, `files`, or anything a
/// custom component exposes).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventTarget {
	name: String,
	props: BTreeMap<String, Value>,
}

impl EventTarget {
	/// Creates a target with the given control name and no properties.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			props: BTreeMap::new(),
		}
	}

	/// The `name` attribute of the originating control.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Sets a named property, builder style.
	pub fn set(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
		self.props.insert(property.into(), value.into());
		self
	}

	/// Reads a named property.
	pub fn get(&self, property: &str) -> Option<&Value> {
		self.props.get(property)
	}

	/// The `value` property rendered as a string, or empty.
	pub fn value_string(&self) -> String {
		self.get("value").map(Value::display_string).unwrap_or_default()
	}

	/// The `checked` flag, defaulting to false for non-boolean content.
	pub fn checked(&self) -> bool {
		matches!(self.get("checked"), Some(Value::Bool(true)))
	}

	/// The `files` property as a native list, or an empty list.
	pub fn files(&self) -> FileList {
		match self.get("files") {
			Some(Value::Files(files)) => files.clone(),
			Some(Value::Array(values)) => FileList(
				values
					.iter()
					.filter_map(|v| match v {
						Value::File(f) => Some(f.clone()),
						_ => None,
					})
					.collect(),
			),
			_ => FileList::default(),
		}
	}
}

/// A change notification from an input control.
#[derive(Debug, Clone, PartialEq)]
pub struct InputEvent {
	target: EventTarget,
}

impl InputEvent {
	/// Wraps an event target.
	pub fn new(target: EventTarget) -> Self {
		Self { target }
	}

	/// Event carrying a `value` property.
	pub fn with_value(name: impl Into<String>, value: impl Into<Value>) -> Self {
		Self::new(EventTarget::new(name).set("value", value))
	}

	/// Event carrying a `checked` property.
	pub fn with_checked(name: impl Into<String>, checked: bool) -> Self {
		Self::new(EventTarget::new(name).set("checked", checked))
	}

	/// Event carrying a `files` property.
	pub fn with_files(name: impl Into<String>, files: FileList) -> Self {
		Self::new(EventTarget::new(name).set("files", files))
	}

	/// The originating target.
	pub fn target(&self) -> &EventTarget {
		&self.target
	}
}

/// What a change handler receives when it fires.
///
/// Recognized input events get their value read off the target; any
/// other payload is treated as the raw value itself, which is how
/// custom components deliver already-extracted data.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangePayload {
	/// A recognized input event.
	Event(InputEvent),
	/// A raw value delivered directly.
	Raw(Value),
}

impl ChangePayload {
	/// Shorthand for a value-carrying input event.
	pub fn value_event(name: impl Into<String>, value: impl Into<Value>) -> Self {
		ChangePayload::Event(InputEvent::with_value(name, value))
	}

	/// Shorthand for a checked-flag input event.
	pub fn checked_event(name: impl Into<String>, checked: bool) -> Self {
		ChangePayload::Event(InputEvent::with_checked(name, checked))
	}

	/// Shorthand for a raw value payload.
	pub fn raw(value: impl Into<Value>) -> Self {
		ChangePayload::Raw(value.into())
	}
}

/// Binding directives declared on an element.
///
/// This is the attribute surface the engine consumes; all of it is
/// stripped from bound output. Fields default independently so call
/// sites only set what they need.
#[derive(Clone, Default)]
pub struct Directives {
	/// Participation marker: consider this element for binding.
	pub bind: bool,
	/// Recurse marker: walk this element's descendants instead.
	pub bind_children: bool,
	/// Explicit callback key; takes priority over automatic binding.
	pub callback: Option<String>,
	/// Target property to mirror the current state value onto.
	pub property: Option<String>,
	/// Custom payload-to-value selector.
	pub selector: Option<Selector>,
	/// Custom state-to-display transform.
	pub transform: Option<Transform>,
}

impl Directives {
	/// Whether any directive is set.
	pub fn is_empty(&self) -> bool {
		!self.bind
			&& !self.bind_children
			&& self.callback.is_none()
			&& self.property.is_none()
			&& self.selector.is_none()
			&& self.transform.is_none()
	}
}

impl std::fmt::Debug for Directives {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Directives")
			.field("bind", &self.bind)
			.field("bind_children", &self.bind_children)
			.field("callback", &self.callback)
			.field("property", &self.property)
			.field("selector", &self.selector.as_ref().map(|_| "<fn>"))
			.field("transform", &self.transform.as_ref().map(|_| "<fn>"))
			.finish()
	}
}

/// A node in the element tree.
#[derive(Debug, Clone)]
pub enum Node {
	/// A structural element.
	Element(Element),
	/// Plain text content; passes through binding untouched.
	Text(Cow<'static, str>),
	/// Renders nothing.
	Empty,
}

impl Node {
	/// Creates a text node.
	pub fn text(content: impl Into<Cow<'static, str>>) -> Self {
		Node::Text(content.into())
	}

	/// Borrows the element, if this node is one.
	pub fn as_element(&self) -> Option<&Element> {
		match self {
			Node::Element(el) => Some(el),
			_ => None,
		}
	}
}

impl From<Element> for Node {
	fn from(el: Element) -> Self {
		Node::Element(el)
	}
}

impl From<&'static str> for Node {
	fn from(text: &'static str) -> Self {
		Node::Text(Cow::Borrowed(text))
	}
}

impl From<String> for Node {
	fn from(text: String) -> Self {
		Node::Text(Cow::Owned(text))
	}
}

/// A structural element in the tree.
///
/// Carries a tag, plain pass-through attributes, the binding target
/// `name`, the binding [`Directives`], and on bound output the
/// concrete value `props` and change `handlers` the binding produced.
#[derive(Clone)]
pub struct Element {
	tag: Cow<'static, str>,
	attrs: Vec<(Cow<'static, str>, Cow<'static, str>)>,
	name: Option<String>,
	directives: Directives,
	props: BTreeMap<String, Value>,
	handlers: BTreeMap<String, ChangeHandler>,
	children: Vec<Node>,
}

impl Element {
	/// Creates an element with the given tag.
	pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
		Self {
			tag: tag.into(),
			attrs: Vec::new(),
			name: None,
			directives: Directives::default(),
			props: BTreeMap::new(),
			handlers: BTreeMap::new(),
			children: Vec::new(),
		}
	}

	/// Adds a plain attribute.
	pub fn attr(
		mut self,
		name: impl Into<Cow<'static, str>>,
		value: impl Into<Cow<'static, str>>,
	) -> Self {
		self.attrs.push((name.into(), value.into()));
		self
	}

	/// Sets the binding target field name.
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Marks the element as participating in binding.
	pub fn bind(mut self) -> Self {
		self.directives.bind = true;
		self
	}

	/// Marks the element's descendants for binding instead of itself.
	pub fn bind_children(mut self) -> Self {
		self.directives.bind_children = true;
		self
	}

	/// Requests explicit binding through the named callback key.
	pub fn on_bind_callback(mut self, callback: impl Into<String>) -> Self {
		self.directives.callback = Some(callback.into());
		self
	}

	/// Names the property the current state value is mirrored onto.
	pub fn bind_property(mut self, property: impl Into<String>) -> Self {
		self.directives.property = Some(property.into());
		self
	}

	/// Overrides payload handling with a custom selector.
	pub fn bind_selector(mut self, selector: impl Fn(&ChangePayload) -> Value + 'static) -> Self {
		self.directives.selector = Some(Rc::new(selector));
		self
	}

	/// Sets the state-to-display transform for the target property.
	pub fn bind_transform(mut self, transform: impl Fn(&Value) -> Value + 'static) -> Self {
		self.directives.transform = Some(Rc::new(transform));
		self
	}

	/// Adds a child node.
	pub fn child(mut self, child: impl Into<Node>) -> Self {
		self.children.push(child.into());
		self
	}

	/// Adds multiple child nodes.
	pub fn children(mut self, children: impl IntoIterator<Item = impl Into<Node>>) -> Self {
		self.children.extend(children.into_iter().map(Into::into));
		self
	}

	/// The tag name.
	pub fn tag(&self) -> &str {
		&self.tag
	}

	/// Reads a plain attribute.
	pub fn get_attr(&self, name: &str) -> Option<&str> {
		self.attrs
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, v)| v.as_ref())
	}

	/// The plain attributes.
	pub fn attrs(&self) -> &[(Cow<'static, str>, Cow<'static, str>)] {
		&self.attrs
	}

	/// The binding target field name, if any.
	pub fn target_name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// The binding directives.
	pub fn directives(&self) -> &Directives {
		&self.directives
	}

	/// Reads a concrete value prop produced by binding.
	pub fn prop(&self, key: &str) -> Option<&Value> {
		self.props.get(key)
	}

	/// The concrete value props produced by binding.
	pub fn props(&self) -> &BTreeMap<String, Value> {
		&self.props
	}

	/// Looks up a change handler by event key.
	pub fn handler(&self, key: &str) -> Option<&ChangeHandler> {
		self.handlers.get(key)
	}

	/// The event keys that have handlers installed.
	pub fn handler_keys(&self) -> impl Iterator<Item = &str> {
		self.handlers.keys().map(String::as_str)
	}

	/// The child nodes.
	pub fn child_nodes(&self) -> &[Node] {
		&self.children
	}

	/// Fires the handler registered under `key`, if present.
	///
	/// Returns whether a handler was found. This is how a rendering
	/// runtime (or a test) delivers user input back into the binding.
	pub fn emit(&self, key: &str, payload: &ChangePayload) -> bool {
		match self.handlers.get(key) {
			Some(handler) => {
				handler(payload);
				true
			}
			None => false,
		}
	}

	/// Splices a standalone attribute set produced by
	/// [`BindingSession::bind_props`](crate::BindingSession::bind_props)
	/// onto this element, stripping any binding directives.
	pub fn merge_props(mut self, bound: crate::session::BoundProps) -> Self {
		let (name, props, handlers) = bound.into_parts();
		if self.name.is_none() {
			self.name = Some(name);
		}
		self.props.extend(props);
		self.handlers.extend(handlers);
		self.directives = Directives::default();
		self
	}

	/// Replaces the child sequence, keeping the shell identical.
	pub(crate) fn with_children(&self, children: Vec<Node>) -> Self {
		let mut rebuilt = self.clone();
		rebuilt.children = children;
		rebuilt
	}

	pub(crate) fn set_prop(&mut self, key: impl Into<String>, value: Value) {
		self.props.insert(key.into(), value);
	}

	pub(crate) fn set_handler(&mut self, key: impl Into<String>, handler: ChangeHandler) {
		self.handlers.insert(key.into(), handler);
	}

	pub(crate) fn strip_directives(&mut self) {
		self.directives = Directives::default();
	}
}

impl std::fmt::Debug for Element {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Element")
			.field("tag", &self.tag)
			.field("attrs", &self.attrs)
			.field("name", &self.name)
			.field("directives", &self.directives)
			.field("props", &self.props)
			.field("handler_keys", &self.handlers.keys().collect::<Vec<_>>())
			.field("children", &self.children)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builder_collects_attrs_and_children() {
		let el = Element::new("div")
			.attr("class", "row")
			.child(Element::new("input").attr("type", "text"))
			.child(Node::text("label"));

		assert_eq!(el.tag(), "div");
		assert_eq!(el.get_attr("class"), Some("row"));
		assert_eq!(el.child_nodes().len(), 2);
	}

	#[test]
	fn directives_default_empty() {
		let el = Element::new("input");
		assert!(el.directives().is_empty());

		let el = el.bind().name("field");
		assert!(el.directives().bind);
		assert_eq!(el.target_name(), Some("field"));
	}

	#[test]
	fn emit_reports_missing_handlers() {
		let el = Element::new("input");
		assert!(!el.emit(CHANGE_EVENT, &ChangePayload::raw("x")));
	}

	#[test]
	fn event_target_reads_typed_properties() {
		let target = EventTarget::new("field")
			.set("value", "42")
			.set("checked", true);

		assert_eq!(target.value_string(), "42");
		assert!(target.checked());
		assert!(target.files().is_empty());
	}

	#[test]
	fn event_target_files_accepts_array_form() {
		use crate::value::FileRef;

		let files = vec![
			Value::File(FileRef::new("a.txt", 1)),
			Value::Str("not a file".into()),
			Value::File(FileRef::new("b.txt", 2)),
		];
		let target = EventTarget::new("upload").set("files", Value::Array(files));
		let list = target.files();
		assert_eq!(list.len(), 2);
		assert_eq!(list.0[1].name, "b.txt");
	}
}
