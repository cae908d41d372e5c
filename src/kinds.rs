//! Known control kinds and the type coercion table.
//!
//! Automatic binding only works for a closed set of leaf control kinds.
//! Each kind maps to one [`Coercion`] entry describing which state
//! value types it accepts, how state formats for display, and which
//! [`ChangeStrategy`] its change handler uses to parse user input back
//! into a state value.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};

use crate::diag::BindError;
use crate::node::{Element, EventTarget};
use crate::value::Value;

/// A leaf control kind recognized for automatic binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownKind {
	/// `<input type="text">` (also the default when `type` is absent).
	Text,
	/// `<input type="url">`.
	Url,
	/// `<input type="email">`.
	Email,
	/// `<input type="password">`.
	Password,
	/// `<input type="search">`.
	Search,
	/// `<input type="tel">`.
	Tel,
	/// `<input type="color">`.
	Color,
	/// `<input type="time">`.
	Time,
	/// `<input type="week">`.
	Week,
	/// `<input type="month">`.
	Month,
	/// `<input type="number">`.
	Number,
	/// `<input type="range">`; behaves exactly like `number`.
	Range,
	/// `<input type="checkbox">`.
	Checkbox,
	/// `<input type="radio">`.
	Radio,
	/// `<input type="date">`.
	Date,
	/// `<input type="datetime-local">`.
	DatetimeLocal,
	/// `<input type="datetime">`; deprecated, binds as free text.
	Datetime,
	/// `<input type="file">`.
	File,
	/// `<textarea>`.
	TextArea,
	/// `<select>`.
	Select,
}

/// How a change handler turns an event target into a state value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStrategy {
	/// Store the raw value string.
	Text,
	/// Parse a float; unparseable input stores `NaN`.
	Number,
	/// Parse a big integer; unparseable input degrades to the raw
	/// string.
	BigInt,
	/// Parse a date or datetime string; unparseable input degrades to
	/// the raw string.
	Date,
	/// Read the checked flag.
	Checked,
	/// Read the file selection, keeping the previous value's container
	/// shape (array stays array, anything else becomes a native list).
	File,
}

impl ChangeStrategy {
	/// Derives the next state value from an event target.
	///
	/// `previous` is the field's value in the snapshot the update is
	/// applied against; only the file strategy consults it.
	pub fn parse(self, target: &EventTarget, previous: Option<&Value>) -> Value {
		match self {
			ChangeStrategy::Text => Value::Str(target.value_string()),
			ChangeStrategy::Number => {
				let raw = target.value_string();
				Value::Num(raw.trim().parse::<f64>().unwrap_or(f64::NAN))
			}
			ChangeStrategy::BigInt => {
				let raw = target.value_string();
				match raw.trim().parse::<i128>() {
					Ok(n) => Value::BigInt(n),
					Err(_) => Value::Str(raw),
				}
			}
			ChangeStrategy::Date => {
				let raw = target.value_string();
				match parse_date_string(&raw) {
					Some(date) => Value::Date(date),
					None => Value::Str(raw),
				}
			}
			ChangeStrategy::Checked => Value::Bool(target.checked()),
			ChangeStrategy::File => {
				let files = target.files();
				if matches!(previous, Some(Value::Array(_))) {
					Value::Array(files.iter().cloned().map(Value::File).collect())
				} else {
					Value::Files(files)
				}
			}
		}
	}
}

/// One type-coercion table entry.
#[derive(Debug, Clone, Copy)]
pub struct Coercion {
	/// Human description of the accepted state value types, used in
	/// type-mismatch advisories.
	pub accepted: &'static str,
	/// The default change-handler strategy for the kind.
	pub strategy: ChangeStrategy,
}

impl KnownKind {
	/// Resolves an `<input>` `type` attribute to a kind.
	pub fn from_input_type(input_type: &str) -> Result<Self, BindError> {
		match input_type {
			"text" => Ok(KnownKind::Text),
			"url" => Ok(KnownKind::Url),
			"email" => Ok(KnownKind::Email),
			"password" => Ok(KnownKind::Password),
			"search" => Ok(KnownKind::Search),
			"tel" => Ok(KnownKind::Tel),
			"color" => Ok(KnownKind::Color),
			"time" => Ok(KnownKind::Time),
			"week" => Ok(KnownKind::Week),
			"month" => Ok(KnownKind::Month),
			"number" => Ok(KnownKind::Number),
			"range" => Ok(KnownKind::Range),
			"checkbox" => Ok(KnownKind::Checkbox),
			"radio" => Ok(KnownKind::Radio),
			"date" => Ok(KnownKind::Date),
			"datetime-local" => Ok(KnownKind::DatetimeLocal),
			"datetime" => Ok(KnownKind::Datetime),
			"file" => Ok(KnownKind::File),
			other => Err(BindError::UnknownInputKind {
				kind: other.to_string(),
			}),
		}
	}

	/// Classifies an element's structural kind.
	///
	/// `Ok(None)` means the tag is not a known leaf control; an
	/// `input` with an unrecognized `type` is an error because the
	/// tag itself promises dynamic input.
	pub fn classify(element: &Element) -> Result<Option<Self>, BindError> {
		match element.tag() {
			"input" => {
				let input_type = element.get_attr("type").unwrap_or("text");
				Self::from_input_type(input_type).map(Some)
			}
			"textarea" => Ok(Some(KnownKind::TextArea)),
			"select" => Ok(Some(KnownKind::Select)),
			_ => Ok(None),
		}
	}

	/// Looks up the kind's coercion-table entry.
	pub fn coercion(self) -> Coercion {
		match self {
			KnownKind::Checkbox | KnownKind::Radio => Coercion {
				accepted: "boolean",
				strategy: ChangeStrategy::Checked,
			},
			KnownKind::Date | KnownKind::DatetimeLocal => Coercion {
				accepted: "string or Date",
				strategy: ChangeStrategy::Date,
			},
			KnownKind::File => Coercion {
				accepted: "Array or FileList",
				strategy: ChangeStrategy::File,
			},
			KnownKind::Number | KnownKind::Range => Coercion {
				accepted: "number or bigint or string",
				strategy: ChangeStrategy::Number,
			},
			KnownKind::Text
			| KnownKind::Url
			| KnownKind::Email
			| KnownKind::Password
			| KnownKind::Search
			| KnownKind::Tel
			| KnownKind::Color
			| KnownKind::Time
			| KnownKind::Week
			| KnownKind::Month
			| KnownKind::Datetime
			| KnownKind::TextArea
			| KnownKind::Select => Coercion {
				accepted: "string",
				strategy: ChangeStrategy::Text,
			},
		}
	}

	/// Whether the given state value matches the kind's accepted set.
	pub fn accepts(self, value: &Value) -> bool {
		match self {
			KnownKind::Checkbox | KnownKind::Radio => matches!(value, Value::Bool(_)),
			KnownKind::Date | KnownKind::DatetimeLocal => {
				matches!(value, Value::Str(_) | Value::Date(_))
			}
			KnownKind::File => matches!(value, Value::Array(_) | Value::Files(_)),
			KnownKind::Number | KnownKind::Range => {
				matches!(value, Value::Num(_) | Value::BigInt(_) | Value::Str(_))
			}
			_ => matches!(value, Value::Str(_)),
		}
	}

	/// Whether the kind is deprecated.
	pub fn is_deprecated(self) -> bool {
		matches!(self, KnownKind::Datetime)
	}

	/// The `type` attribute word for the kind, for messages.
	pub fn input_type(self) -> &'static str {
		match self {
			KnownKind::Text => "text",
			KnownKind::Url => "url",
			KnownKind::Email => "email",
			KnownKind::Password => "password",
			KnownKind::Search => "search",
			KnownKind::Tel => "tel",
			KnownKind::Color => "color",
			KnownKind::Time => "time",
			KnownKind::Week => "week",
			KnownKind::Month => "month",
			KnownKind::Number => "number",
			KnownKind::Range => "range",
			KnownKind::Checkbox => "checkbox",
			KnownKind::Radio => "radio",
			KnownKind::Date => "date",
			KnownKind::DatetimeLocal => "datetime-local",
			KnownKind::Datetime => "datetime",
			KnownKind::File => "file",
			KnownKind::TextArea => "textarea",
			KnownKind::Select => "select",
		}
	}
}

/// Formats a date value for a `date` control: `YYYY-MM-DD` from UTC
/// calendar fields, zero-padded.
pub fn format_date(date: &DateTime<Utc>) -> String {
	format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Formats a date value for a `datetime-local` control:
/// `YYYY-MM-DDTHH:mm:ss.mmm` from local calendar fields, zero-padded
/// except for the millisecond part.
pub fn format_datetime_local(date: &DateTime<Utc>) -> String {
	let local = date.with_timezone(&Local);
	format!(
		"{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{}",
		local.year(),
		local.month(),
		local.day(),
		local.hour(),
		local.minute(),
		local.second(),
		local.timestamp_subsec_millis()
	)
}

/// Parses a display string back into a date value.
///
/// Date-only strings (`YYYY-MM-DD`) are read as UTC midnight; strings
/// with a time part are interpreted in local time, matching how the
/// two control kinds format. The digits after `.` are an integer
/// millisecond count, mirroring the unpadded formatting.
pub fn parse_date_string(raw: &str) -> Option<DateTime<Utc>> {
	if raw.contains('T') {
		parse_datetime_local(raw)
	} else {
		let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
		let midnight = date.and_hms_opt(0, 0, 0)?;
		Some(Utc.from_utc_datetime(&midnight))
	}
}

fn parse_datetime_local(raw: &str) -> Option<DateTime<Utc>> {
	let (head, millis) = match raw.split_once('.') {
		Some((head, frac)) => (head, frac.parse::<u32>().ok()?),
		None => (raw, 0),
	};
	let naive = NaiveDateTime::parse_from_str(head, "%Y-%m-%dT%H:%M:%S")
		.or_else(|_| NaiveDateTime::parse_from_str(head, "%Y-%m-%dT%H:%M"))
		.ok()?;
	let naive = naive + Duration::milliseconds(i64::from(millis));
	let local = Local.from_local_datetime(&naive).earliest()?;
	Some(local.with_timezone(&Utc))
}
