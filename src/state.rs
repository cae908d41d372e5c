//! State container and snapshot cell.
//!
//! State is an opaque mapping from field name to [`Value`], replaced
//! wholesale on every update. [`StateCell`] is the mutable-snapshot
//! primitive the surrounding render scheduler owns: reading clones the
//! current snapshot, writing replaces it. The engine never mutates a
//! snapshot in place and never invents or removes fields on its own.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

/// The state object: field name to value.
pub type State = HashMap<String, Value>;

/// Shared, replaceable state snapshot.
///
/// Clones share the same underlying cell, so a handler closing over a
/// clone proposes updates against whatever snapshot is current when it
/// fires. Single-threaded by design: every operation completes
/// synchronously and the surrounding scheduler serializes writers.
///
/// # Example
///
/// ```
/// use pagebind::{StateCell, Value};
///
/// let cell = StateCell::new([("count".to_string(), Value::Num(0.0))].into());
/// cell.update(|prev| {
/// 	let mut next = prev.clone();
/// 	next.insert("count".to_string(), Value::Num(1.0));
/// 	next
/// });
/// assert_eq!(cell.get()["count"], Value::Num(1.0));
/// ```
#[derive(Clone, Default)]
pub struct StateCell {
	value: Rc<RefCell<State>>,
}

impl StateCell {
	/// Creates a cell holding the given initial state.
	pub fn new(initial: State) -> Self {
		Self {
			value: Rc::new(RefCell::new(initial)),
		}
	}

	/// Clones the current snapshot.
	pub fn get(&self) -> State {
		self.value.borrow().clone()
	}

	/// Replaces the state wholesale.
	pub fn set(&self, next: State) {
		*self.value.borrow_mut() = next;
	}

	/// Replaces the state with a function of the previous snapshot.
	///
	/// Sequential application keeps queued updates safe: each proposal
	/// sees the snapshot left by the one before it.
	pub fn update<F>(&self, f: F)
	where
		F: FnOnce(&State) -> State,
	{
		let next = {
			let current = self.value.borrow();
			f(&current)
		};
		*self.value.borrow_mut() = next;
	}

	/// Programmatic overwrite: only the listed fields change, all
	/// others persist.
	pub fn merge(&self, patch: State) {
		self.update(|prev| {
			let mut next = prev.clone();
			next.extend(patch);
			next
		});
	}
}

impl std::fmt::Debug for StateCell {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StateCell")
			.field("value", &self.value.borrow())
			.finish()
	}
}
