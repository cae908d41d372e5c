//! Field name resolution.
//!
//! Element `name` attributes follow the hyphenated attribute convention
//! (`date-of-birth`), while state fields follow the camel-case accessor
//! convention (`dateOfBirth`). [`resolve_camel_case`] maps the former
//! onto the latter.

use std::borrow::Cow;

/// Normalizes a hyphenated identifier to camel case.
///
/// The letter immediately following each hyphen is upper-cased and the
/// hyphen removed. Names without hyphens are returned borrowed and
/// unchanged, so the common case allocates nothing. Total: any input
/// string resolves to some output string.
///
/// # Examples
///
/// ```
/// use pagebind::resolve_camel_case;
///
/// assert_eq!(resolve_camel_case("data-x"), "dataX");
/// assert_eq!(resolve_camel_case("date-of-birth"), "dateOfBirth");
/// assert_eq!(resolve_camel_case("plain"), "plain");
/// ```
pub fn resolve_camel_case(raw: &str) -> Cow<'_, str> {
	if !raw.contains('-') {
		return Cow::Borrowed(raw);
	}

	let mut out = String::with_capacity(raw.len());
	let mut chars = raw.chars();
	while let Some(ch) = chars.next() {
		if ch == '-' {
			match chars.next() {
				Some(next) => out.extend(next.to_uppercase()),
				// A trailing hyphen has nothing to consume.
				None => out.push('-'),
			}
		} else {
			out.push(ch);
		}
	}

	Cow::Owned(out)
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;

	#[rstest]
	#[case("data-x", "dataX")]
	#[case("a-b-c", "aBC")]
	#[case("date-of-birth", "dateOfBirth")]
	#[case("plain", "plain")]
	#[case("", "")]
	#[case("-x", "X")]
	#[case("trailing-", "trailing-")]
	fn resolves(#[case] raw: &str, #[case] expected: &str) {
		assert_eq!(resolve_camel_case(raw), expected);
	}

	#[test]
	fn borrows_when_no_hyphen() {
		assert!(matches!(resolve_camel_case("plain"), Cow::Borrowed(_)));
	}

	proptest! {
		#[test]
		fn idempotent_on_hyphenated_identifiers(s in "[a-z]{1,8}(-[a-z]{1,8}){0,4}") {
			let once = resolve_camel_case(&s).into_owned();
			let twice = resolve_camel_case(&once).into_owned();
			prop_assert_eq!(once, twice);
		}
	}
}
