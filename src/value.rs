//! State value model.
//!
//! A bound field can hold any of the semantic types a form control can
//! produce: strings, numbers, big integers, booleans, dates, file
//! selections, arrays, or arbitrary structured data. [`Value`] is the
//! closed union of those types; the coercion table keys its formatting
//! and parsing decisions off the active variant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque handle to a file picked through a file control.
///
/// The binding engine never reads file contents; it only moves handles
/// between the element tree and the state container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
	/// File name as reported by the picker.
	pub name: String,
	/// Size in bytes.
	pub size: u64,
}

impl FileRef {
	/// Creates a file handle.
	pub fn new(name: impl Into<String>, size: u64) -> Self {
		Self {
			name: name.into(),
			size,
		}
	}
}

/// The native list type produced by a file control.
///
/// Distinct from [`Value::Array`]: a change handler keeps the native
/// list form unless the previous state value was an array, in which
/// case the selection is converted to an array (an initial state cannot
/// contain a native list, so array-typed fields stay array-typed).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileList(pub Vec<FileRef>);

impl FileList {
	/// Number of files in the list.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether the list is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates over the file handles.
	pub fn iter(&self) -> std::slice::Iter<'_, FileRef> {
		self.0.iter()
	}
}

impl From<Vec<FileRef>> for FileList {
	fn from(files: Vec<FileRef>) -> Self {
		Self(files)
	}
}

/// A single state value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Absent or explicitly empty value.
	Null,
	/// Boolean, the natural type of checkbox and radio controls.
	Bool(bool),
	/// Floating-point number. `NaN` is representable; numeric controls
	/// display it as the empty string.
	Num(f64),
	/// Big integer, kept exact through numeric controls.
	BigInt(i128),
	/// Plain string.
	Str(String),
	/// A point in time, stored as UTC.
	Date(DateTime<Utc>),
	/// A single file handle (element of an array-typed file field).
	File(FileRef),
	/// Native file list.
	Files(FileList),
	/// Array of values.
	Array(Vec<Value>),
	/// Arbitrary structured value the engine passes through untouched.
	Json(serde_json::Value),
}

impl Value {
	/// Runtime type word used in type-mismatch advisories.
	pub fn type_name(&self) -> &'static str {
		match self {
			Value::Null => "null",
			Value::Bool(_) => "boolean",
			Value::Num(_) => "number",
			Value::BigInt(_) => "bigint",
			Value::Str(_) => "string",
			Value::Date(_) => "Date",
			Value::File(_) => "File",
			Value::Files(_) => "FileList",
			Value::Array(_) => "Array",
			Value::Json(_) => "object",
		}
	}

	/// Borrows the string content, if this is a string value.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Str(s) => Some(s),
			_ => None,
		}
	}

	/// Stringifies the value the way a display surface would.
	///
	/// This is the fallback rendering for values that reach a string
	/// slot: numbers print in decimal (including `NaN`), booleans as
	/// `true`/`false`, dates as RFC 3339, arrays comma-joined.
	pub fn display_string(&self) -> String {
		match self {
			Value::Null => String::new(),
			Value::Bool(b) => b.to_string(),
			Value::Num(n) => n.to_string(),
			Value::BigInt(n) => n.to_string(),
			Value::Str(s) => s.clone(),
			Value::Date(d) => d.to_rfc3339(),
			Value::File(f) => f.name.clone(),
			Value::Files(files) => files
				.iter()
				.map(|f| f.name.as_str())
				.collect::<Vec<_>>()
				.join(","),
			Value::Array(values) => values
				.iter()
				.map(Value::display_string)
				.collect::<Vec<_>>()
				.join(","),
			Value::Json(v) => v.to_string(),
		}
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Value::Str(s.to_string())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::Str(s)
	}
}

impl From<f64> for Value {
	fn from(n: f64) -> Self {
		Value::Num(n)
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Value::Bool(b)
	}
}

impl From<DateTime<Utc>> for Value {
	fn from(d: DateTime<Utc>) -> Self {
		Value::Date(d)
	}
}

impl From<FileList> for Value {
	fn from(files: FileList) -> Self {
		Value::Files(files)
	}
}
