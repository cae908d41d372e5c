//! Prebuilt binding configurations.
//!
//! These helpers cover the common case where a custom component wraps
//! a native control: [`input_binding`] yields a [`PropBinding`] with
//! the same property wiring, payload parsing, and display formatting
//! the automatic binder would use for that control kind, ready to pass
//! to [`BindingSession::bind_props`](crate::BindingSession::bind_props).

use crate::kinds::{ChangeStrategy, KnownKind, format_date, format_datetime_local};
use crate::node::{CHANGE_EVENT, ChangePayload, Element};
use crate::session::PropBinding;
use crate::value::Value;

/// Marks an element as a binding target for the given field.
///
/// Shorthand for `.name(name).bind()`, for call sites that attach the
/// markers after construction.
pub fn bound_with_name(element: Element, name: impl Into<String>) -> Element {
	element.name(name).bind()
}

/// Builds the explicit-binding configuration matching a known control
/// kind.
///
/// The callback key is always `change`. Checkbox and radio kinds mirror
/// onto `checked`, the file kind onto `files`, everything else onto
/// `value`. Kinds with a non-trivial change strategy get a selector
/// applying it; date and numeric kinds also get a display transform so
/// typed state values render the way the control expects.
pub fn input_binding(name: impl Into<String>, kind: KnownKind) -> PropBinding {
	let binding = PropBinding::new(name, CHANGE_EVENT);
	match kind {
		KnownKind::Checkbox | KnownKind::Radio => binding
			.property("checked")
			.selector(strategy_selector(ChangeStrategy::Checked)),
		KnownKind::File => binding
			.property("files")
			.selector(strategy_selector(ChangeStrategy::File)),
		KnownKind::Number | KnownKind::Range => binding
			.property("value")
			.selector(strategy_selector(ChangeStrategy::Number))
			.transform(|value| match value {
				Value::Num(n) if n.is_nan() => Value::Str(String::new()),
				other => other.clone(),
			}),
		KnownKind::Date => binding
			.property("value")
			.selector(strategy_selector(ChangeStrategy::Date))
			.transform(|value| match value {
				Value::Date(date) => Value::Str(format_date(date)),
				other => Value::Str(other.display_string()),
			}),
		KnownKind::DatetimeLocal => binding
			.property("value")
			.selector(strategy_selector(ChangeStrategy::Date))
			.transform(|value| match value {
				Value::Date(date) => Value::Str(format_datetime_local(date)),
				other => Value::Str(other.display_string()),
			}),
		_ => binding.property("value"),
	}
}

/// Wraps a change strategy as a payload selector.
///
/// Raw payloads bypass the strategy entirely; the file strategy loses
/// the shape-preservation it has in automatic binding because a
/// selector cannot see the previous state value.
fn strategy_selector(strategy: ChangeStrategy) -> impl Fn(&ChangePayload) -> Value {
	move |payload| match payload {
		ChangePayload::Event(event) => strategy.parse(event.target(), None),
		ChangePayload::Raw(value) => value.clone(),
	}
}
