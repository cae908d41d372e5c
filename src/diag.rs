//! Diagnostics and fatal errors.
//!
//! Two severities exist and they never mix: [`Diagnostic`] advisories
//! report suspicious-but-workable situations (a field name missing from
//! state, a value type the control does not expect) and never alter
//! binding behavior; [`BindError`] is the fatal taxonomy for requests
//! that cannot be satisfied at all.
//!
//! Advisories flow through a caller-suppliable [`DiagnosticSink`] so
//! tests can assert on them deterministically. The default sink logs
//! through `tracing`.

use std::cell::RefCell;

/// A non-fatal advisory emitted during binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
	/// The resolved field name is absent from the current snapshot.
	///
	/// Non-fatal because state may be populated asynchronously after
	/// the first bind.
	NameMismatch {
		/// The resolved field name that was looked up.
		field: String,
	},
	/// The current state value's runtime type does not match the
	/// control kind's accepted set. Binding proceeds regardless.
	TypeMismatch {
		/// The resolved field name.
		field: String,
		/// Human description of the accepted types.
		accepted: String,
		/// Runtime type word of the actual value.
		actual: String,
	},
	/// A deprecated control kind was bound. Emitted once per session.
	DeprecatedKind {
		/// The deprecated kind's input type word.
		kind: String,
	},
}

impl std::fmt::Display for Diagnostic {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Diagnostic::NameMismatch { field } => write!(
				f,
				"state does not contain a '{field}' member; the binding might behave unexpectedly"
			),
			Diagnostic::TypeMismatch {
				field,
				accepted,
				actual,
			} => write!(
				f,
				"state member '{field}' might have the wrong type for its control: accepted {accepted}, got {actual}"
			),
			Diagnostic::DeprecatedKind { kind } => write!(
				f,
				"<input type=\"{kind}\"> is deprecated; use \"date\" or \"datetime-local\" instead"
			),
		}
	}
}

/// Receives non-fatal advisories.
pub trait DiagnosticSink {
	/// Reports one advisory.
	fn report(&self, diagnostic: &Diagnostic);
}

/// Default sink: forwards advisories to `tracing::warn!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
	fn report(&self, diagnostic: &Diagnostic) {
		tracing::warn!(target: "pagebind", "{diagnostic}");
	}
}

/// Test sink that records advisories in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
	entries: RefCell<Vec<Diagnostic>>,
}

impl CollectingSink {
	/// Creates an empty sink.
	pub fn new() -> Self {
		Self::default()
	}

	/// Clones the recorded advisories.
	pub fn entries(&self) -> Vec<Diagnostic> {
		self.entries.borrow().clone()
	}

	/// Drains the recorded advisories.
	pub fn take(&self) -> Vec<Diagnostic> {
		self.entries.take()
	}
}

impl DiagnosticSink for CollectingSink {
	fn report(&self, diagnostic: &Diagnostic) {
		self.entries.borrow_mut().push(diagnostic.clone());
	}
}

/// Fatal binding errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
	/// A direct bind request carried neither the participation marker
	/// nor the recurse marker.
	#[error("could not bind the element '{name}': missing bind directive")]
	MissingBindDirective {
		/// Target field name, or `(no name)`.
		name: String,
	},
	/// A direct bind request resolved to no binding.
	#[error("could not bind the element '{name}'")]
	BindingFailed {
		/// Target field name, or `(no name)`.
		name: String,
	},
	/// The element's structural kind is not recognized and no explicit
	/// callback was given. Swallowed during subtree recursion;
	/// surfaces as [`BindError::BindingFailed`] at the top level.
	#[error("the <{tag}> element does not hold dynamic input")]
	Unbindable {
		/// The element's tag.
		tag: String,
	},
	/// An `input` element's `type` has no coercion-table entry.
	#[error("unknown <input> type: {kind}")]
	UnknownInputKind {
		/// The unrecognized `type` attribute value.
		kind: String,
	},
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn collecting_sink_records_in_order() {
		let sink = CollectingSink::new();
		sink.report(&Diagnostic::NameMismatch { field: "a".into() });
		sink.report(&Diagnostic::DeprecatedKind {
			kind: "datetime".into(),
		});

		let entries = sink.take();
		assert_eq!(entries.len(), 2);
		assert_eq!(entries[0], Diagnostic::NameMismatch { field: "a".into() });
		assert!(sink.entries().is_empty());
	}

	#[test]
	fn diagnostics_render_readable_messages() {
		let text = Diagnostic::TypeMismatch {
			field: "age".into(),
			accepted: "number or bigint or string".into(),
			actual: "boolean".into(),
		}
		.to_string();
		assert!(text.contains("age"));
		assert!(text.contains("boolean"));
	}

	#[test]
	fn errors_name_the_failed_element() {
		let err = BindError::BindingFailed {
			name: "field".into(),
		};
		assert_eq!(err.to_string(), "could not bind the element 'field'");
	}
}
