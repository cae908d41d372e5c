//! Subtree binding through the recurse marker.

use pagebind::{
	BindingSession, ChangePayload, Element, Node, State, StateCell, Value, CHANGE_EVENT,
};

fn form_state() -> State {
	State::from([
		("firstName".to_string(), Value::Str("Ada".into())),
		("lastName".to_string(), Value::Str("Lovelace".into())),
		("subscribed".to_string(), Value::Bool(false)),
	])
}

#[test]
fn every_marked_descendant_binds() {
	let cell = StateCell::new(form_state());
	let session = BindingSession::new(&cell);

	let form = Element::new("form")
		.attr("class", "signup")
		.bind_children()
		.child(Element::new("input").name("first-name").bind())
		.child(Element::new("input").name("last-name").bind())
		.child(
			Element::new("input")
				.attr("type", "checkbox")
				.name("subscribed")
				.bind(),
		);

	let bound = session.bind(&form).unwrap();

	// The parent shell is untouched apart from the rebuilt children.
	assert_eq!(bound.tag(), "form");
	assert_eq!(bound.get_attr("class"), Some("signup"));

	let children: Vec<_> = bound
		.child_nodes()
		.iter()
		.filter_map(Node::as_element)
		.collect();
	assert_eq!(children[0].prop("value"), Some(&Value::Str("Ada".into())));
	assert_eq!(
		children[1].prop("value"),
		Some(&Value::Str("Lovelace".into()))
	);
	assert_eq!(children[2].prop("checked"), Some(&Value::Bool(false)));

	children[1].emit(
		CHANGE_EVENT,
		&ChangePayload::value_event("last-name", "King"),
	);
	assert_eq!(cell.get()["lastName"], Value::Str("King".into()));
}

#[test]
fn binding_reaches_nested_containers() {
	let cell = StateCell::new(form_state());
	let session = BindingSession::new(&cell);

	let form = Element::new("form").bind_children().child(
		Element::new("fieldset")
			.child(Element::new("legend").child(Node::text("name")))
			.child(Element::new("input").name("first-name").bind()),
	);

	let bound = session.bind(&form).unwrap();
	let fieldset = bound.child_nodes()[0].as_element().unwrap();
	let input = fieldset.child_nodes()[1].as_element().unwrap();
	assert_eq!(input.prop("value"), Some(&Value::Str("Ada".into())));
}

#[test]
fn unmarked_and_unbindable_descendants_pass_through() {
	let cell = StateCell::new(form_state());
	let session = BindingSession::new(&cell);

	let form = Element::new("form")
		.bind_children()
		.child(Node::text("fill in your details"))
		// No participation marker: stays as written.
		.child(Element::new("input").name("first-name"))
		// Marked but not a known control: kept unchanged, not fatal.
		.child(Element::new("canvas").name("last-name").bind())
		// Marked input with a broken type: also kept unchanged.
		.child(
			Element::new("input")
				.attr("type", "submit")
				.name("subscribed")
				.bind(),
		)
		.child(Element::new("input").name("last-name").bind());

	let bound = session.bind(&form).unwrap();
	let nodes = bound.child_nodes();

	assert!(matches!(&nodes[0], Node::Text(t) if t == "fill in your details"));

	let unmarked = nodes[1].as_element().unwrap();
	assert!(unmarked.prop("value").is_none());

	let canvas = nodes[2].as_element().unwrap();
	assert!(canvas.prop("value").is_none());
	assert!(canvas.directives().bind);

	let submit = nodes[3].as_element().unwrap();
	assert!(submit.prop("value").is_none());

	// The healthy sibling still binds.
	let input = nodes[4].as_element().unwrap();
	assert_eq!(input.prop("value"), Some(&Value::Str("Lovelace".into())));
}

#[test]
fn recurse_marker_wins_over_the_participation_marker() {
	let cell = StateCell::new(form_state());
	let session = BindingSession::new(&cell);

	// Both markers on the root: the subtree walk takes priority, so the
	// root itself is not bound even though it names a field.
	let form = Element::new("form")
		.name("first-name")
		.bind()
		.bind_children()
		.child(Element::new("input").name("last-name").bind());

	let bound = session.bind(&form).unwrap();
	assert!(bound.prop("value").is_none());

	let input = bound.child_nodes()[0].as_element().unwrap();
	assert_eq!(input.prop("value"), Some(&Value::Str("Lovelace".into())));
}

#[test]
fn subtree_binding_sees_one_snapshot() {
	let cell = StateCell::new(form_state());
	let session = BindingSession::new(&cell);

	let form = Element::new("form")
		.bind_children()
		.child(Element::new("input").name("first-name").bind())
		.child(Element::new("input").name("last-name").bind());
	let bound = session.bind(&form).unwrap();

	let children: Vec<_> = bound
		.child_nodes()
		.iter()
		.filter_map(Node::as_element)
		.collect();

	// Both handlers update against the live cell, not the snapshot.
	children[0].emit(
		CHANGE_EVENT,
		&ChangePayload::value_event("first-name", "Grace"),
	);
	children[1].emit(
		CHANGE_EVENT,
		&ChangePayload::value_event("last-name", "Hopper"),
	);

	let state = cell.get();
	assert_eq!(state["firstName"], Value::Str("Grace".into()));
	assert_eq!(state["lastName"], Value::Str("Hopper".into()));
	assert_eq!(state["subscribed"], Value::Bool(false));
}
