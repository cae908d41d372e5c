//! Automatic binding for known control kinds.
//!
//! The [`KnownBinder`] closes over one state snapshot and wires a
//! recognized leaf control to its state field without any caller
//! configuration: the coercion table picks the display formatting and
//! the change strategy from the control kind and the snapshot value's
//! runtime type.

use std::cell::Cell;
use std::rc::Rc;

use crate::diag::{BindError, Diagnostic, DiagnosticSink};
use crate::kinds::{ChangeStrategy, KnownKind, format_date, format_datetime_local};
use crate::node::{CHANGE_EVENT, ChangeHandler, ChangePayload, Element};
use crate::resolve::resolve_camel_case;
use crate::state::{State, StateCell};
use crate::value::Value;

/// Snapshot-scoped automatic binder.
///
/// Constructed lazily once per session; always reads the snapshot the
/// session was built with, while handlers write through the shared
/// cell against whatever snapshot is current when they fire.
pub(crate) struct KnownBinder {
	state: Rc<State>,
	cell: StateCell,
	sink: Rc<dyn DiagnosticSink>,
	datetime_warned: Cell<bool>,
}

impl KnownBinder {
	pub(crate) fn new(state: Rc<State>, cell: StateCell, sink: Rc<dyn DiagnosticSink>) -> Self {
		Self {
			state,
			cell,
			sink,
			datetime_warned: Cell::new(false),
		}
	}

	/// Attempts to bind a known leaf control.
	///
	/// Returns `Ok(None)` when the tag is not a recognized control,
	/// leaving the decision to the caller. The element must already
	/// carry a non-empty target name.
	pub(crate) fn try_bind(&self, element: &Element) -> Result<Option<Element>, BindError> {
		let Some(kind) = KnownKind::classify(element)? else {
			return Ok(None);
		};

		let raw_name = element.target_name().unwrap_or_default();
		let field = resolve_camel_case(raw_name).into_owned();
		if !self.state.contains_key(&field) {
			self.sink.report(&Diagnostic::NameMismatch {
				field: field.clone(),
			});
		}

		let current = self.state.get(&field).cloned().unwrap_or(Value::Null);
		if !kind.accepts(&current) {
			self.sink.report(&Diagnostic::TypeMismatch {
				field: field.clone(),
				accepted: kind.coercion().accepted.to_string(),
				actual: current.type_name().to_string(),
			});
		}

		let mut bound = element.clone();
		bound.strip_directives();

		match kind {
			KnownKind::Checkbox | KnownKind::Radio => {
				// Non-boolean state cannot drive the checked flag;
				// fall back to a plain value handler.
				let strategy = if matches!(current, Value::Bool(_)) {
					ChangeStrategy::Checked
				} else {
					ChangeStrategy::Text
				};
				bound.set_prop("checked", current);
				bound.set_handler(CHANGE_EVENT, self.handler(&field, strategy));
			}
			KnownKind::File => {
				// No value prop: a file control's selection cannot be
				// programmed from state.
				bound.set_handler(CHANGE_EVENT, self.handler(&field, ChangeStrategy::File));
			}
			KnownKind::Date => match &current {
				Value::Date(date) => {
					bound.set_prop("value", Value::Str(format_date(date)));
					bound.set_handler(CHANGE_EVENT, self.handler(&field, ChangeStrategy::Date));
				}
				_ => self.string_bind(&mut bound, &field, current),
			},
			KnownKind::DatetimeLocal => match &current {
				Value::Date(date) => {
					bound.set_prop("value", Value::Str(format_datetime_local(date)));
					bound.set_handler(CHANGE_EVENT, self.handler(&field, ChangeStrategy::Date));
				}
				_ => self.string_bind(&mut bound, &field, current),
			},
			KnownKind::Number | KnownKind::Range => match &current {
				Value::Num(n) => {
					// NaN cannot be the value of a numeric control.
					let display = if n.is_nan() {
						Value::Str(String::new())
					} else {
						current.clone()
					};
					bound.set_prop("value", display);
					bound.set_handler(CHANGE_EVENT, self.handler(&field, ChangeStrategy::Number));
				}
				Value::BigInt(n) => {
					bound.set_prop("value", Value::Str(n.to_string()));
					bound.set_handler(CHANGE_EVENT, self.handler(&field, ChangeStrategy::BigInt));
				}
				_ => self.string_bind(&mut bound, &field, current),
			},
			KnownKind::Datetime => {
				if !self.datetime_warned.replace(true) {
					self.sink.report(&Diagnostic::DeprecatedKind {
						kind: kind.input_type().to_string(),
					});
				}
				self.string_bind(&mut bound, &field, current);
			}
			_ => self.string_bind(&mut bound, &field, current),
		}

		Ok(Some(bound))
	}

	/// Identity binding: the state value is the display value.
	fn string_bind(&self, bound: &mut Element, field: &str, current: Value) {
		bound.set_prop("value", current);
		bound.set_handler(CHANGE_EVENT, self.handler(field, ChangeStrategy::Text));
	}

	/// Builds a change handler for the given strategy.
	///
	/// The field is re-resolved from the event target's name at event
	/// time; the bind-time name is the fallback for raw payloads and
	/// nameless targets.
	fn handler(&self, field: &str, strategy: ChangeStrategy) -> ChangeHandler {
		let cell = self.cell.clone();
		let fallback = field.to_string();
		Rc::new(move |payload: &ChangePayload| match payload {
			ChangePayload::Event(event) => {
				let target_name = event.target().name();
				let field = if target_name.is_empty() {
					fallback.clone()
				} else {
					resolve_camel_case(target_name).into_owned()
				};
				cell.update(|prev| {
					let value = strategy.parse(event.target(), prev.get(&field));
					let mut next = prev.clone();
					next.insert(field.clone(), value);
					next
				});
			}
			ChangePayload::Raw(value) => {
				cell.update(|prev| {
					let mut next = prev.clone();
					next.insert(fallback.clone(), value.clone());
					next
				});
			}
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::diag::CollectingSink;

	fn binder_for(state: State) -> (KnownBinder, StateCell, Rc<CollectingSink>) {
		let cell = StateCell::new(state);
		let sink = Rc::new(CollectingSink::new());
		let binder = KnownBinder::new(Rc::new(cell.get()), cell.clone(), sink.clone());
		(binder, cell, sink)
	}

	#[test]
	fn text_input_gets_value_and_change_handler() {
		let (binder, cell, _sink) = binder_for(State::from([(
			"firstName".to_string(),
			Value::Str("Ada".into()),
		)]));

		let el = Element::new("input")
			.attr("type", "text")
			.name("first-name")
			.bind();
		let bound = binder.try_bind(&el).unwrap().unwrap();

		assert!(bound.directives().is_empty());
		assert_eq!(bound.prop("value"), Some(&Value::Str("Ada".into())));

		bound.emit(
			CHANGE_EVENT,
			&ChangePayload::value_event("first-name", "Grace"),
		);
		assert_eq!(cell.get()["firstName"], Value::Str("Grace".into()));
	}

	#[test]
	fn nan_displays_as_empty_string() {
		let (binder, _cell, _sink) =
			binder_for(State::from([("n".to_string(), Value::Num(f64::NAN))]));

		let el = Element::new("input").attr("type", "number").name("n").bind();
		let bound = binder.try_bind(&el).unwrap().unwrap();
		assert_eq!(bound.prop("value"), Some(&Value::Str(String::new())));
	}

	#[test]
	fn checkbox_with_string_state_falls_back_to_value_handler() {
		let (binder, cell, sink) =
			binder_for(State::from([("flag".to_string(), Value::Str("x".into()))]));

		let el = Element::new("input")
			.attr("type", "checkbox")
			.name("flag")
			.bind();
		let bound = binder.try_bind(&el).unwrap().unwrap();

		assert!(
			sink.entries()
				.iter()
				.any(|d| matches!(d, Diagnostic::TypeMismatch { field, .. } if field == "flag"))
		);

		// The fallback handler stores the raw value string, not the
		// checked flag.
		bound.emit(CHANGE_EVENT, &ChangePayload::value_event("flag", "y"));
		assert_eq!(cell.get()["flag"], Value::Str("y".into()));
	}

	#[test]
	fn unknown_tag_yields_none() {
		let (binder, _cell, _sink) = binder_for(State::new());
		let el = Element::new("canvas").name("c").bind();
		assert!(binder.try_bind(&el).unwrap().is_none());
	}

	#[test]
	fn missing_field_reports_name_mismatch_but_binds() {
		let (binder, _cell, sink) = binder_for(State::new());
		let el = Element::new("input").name("late-field").bind();
		let bound = binder.try_bind(&el).unwrap();
		assert!(bound.is_some());
		assert!(sink.entries().contains(&Diagnostic::NameMismatch {
			field: "lateField".into()
		}));
	}

	#[test]
	fn deprecated_datetime_warns_once() {
		let (binder, _cell, sink) =
			binder_for(State::from([("d".to_string(), Value::Str("x".into()))]));
		let el = Element::new("input").attr("type", "datetime").name("d").bind();

		binder.try_bind(&el).unwrap();
		binder.try_bind(&el).unwrap();

		let deprecations = sink
			.entries()
			.into_iter()
			.filter(|d| matches!(d, Diagnostic::DeprecatedKind { .. }))
			.count();
		assert_eq!(deprecations, 1);
	}
}
