//! Syntactic validation of email-address lists and phone numbers.
//!
//! These checks are about well-formedness only. Whether an address can
//! receive mail or a number can be dialled is out of scope.

use std::sync::OnceLock;

use regex::Regex;

/// Fewest digits a phone number may have once separators are stripped.
pub const MIN_TEL_DIGITS: usize = 3;

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
        )
        .expect("valid regex")
    })
}

/// Validates a single address: `local-part@domain`, the domain holding at
/// least one dot, no whitespace anywhere.
#[must_use]
pub fn validate_email(address: &str) -> bool {
    email_re().is_match(address)
}

/// Validates every entry of an address list.
///
/// An empty list is invalid, as is a list with any malformed entry.
///
/// # Examples
/// ```
/// use mailgo_core::validate_emails;
///
/// assert!(validate_emails(&["a@b.com", "c@d.org"]));
/// assert!(!validate_emails(&["not-an-email"]));
/// assert!(!validate_emails::<&str>(&[]));
/// ```
#[must_use]
pub fn validate_emails<S: AsRef<str>>(list: &[S]) -> bool {
    !list.is_empty() && list.iter().all(|entry| validate_email(entry.as_ref()))
}

/// Validates a phone number.
///
/// Spaces, hyphens, dots, slashes and parentheses are separators and are
/// ignored, as is a single leading `+`. What remains must be at least
/// [`MIN_TEL_DIGITS`] ASCII digits.
///
/// # Examples
/// ```
/// use mailgo_core::validate_tel;
///
/// assert!(validate_tel("+1 (555) 123-4567"));
/// assert!(!validate_tel("call me"));
/// ```
#[must_use]
pub fn validate_tel(value: &str) -> bool {
    let trimmed = value.trim();
    let body = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let mut digits = 0usize;
    for ch in body.chars() {
        match ch {
            '0'..='9' => digits += 1,
            ' ' | '-' | '.' | '/' | '(' | ')' => {}
            _ => return false,
        }
    }
    digits >= MIN_TEL_DIGITS
}

/// Splits a comma-separated address list, trimming each entry.
///
/// Order is preserved; empty entries (from `a@b.com,,c@d.org` or a trailing
/// comma) are kept so that validation rejects them.
#[must_use]
pub fn split_address_list(list: &str) -> Vec<&str> {
    list.split(',').map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_common_addresses() {
        assert!(validate_email("a@b.com"));
        assert!(validate_email("first.last+tag@sub.example.co.uk"));
        assert!(validate_email("o'neil@example.ie"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!validate_email(""));
        assert!(!validate_email("not-an-email"));
        assert!(!validate_email("no-dot@localhost"));
        assert!(!validate_email("two@@example.com"));
        assert!(!validate_email("spa ce@example.com"));
        assert!(!validate_email("a@-bad.com"));
        assert!(!validate_email("undefined@undefined"));
    }

    #[test]
    fn list_validation_is_all_or_nothing() {
        assert!(validate_emails(&["a@b.com", "c@d.org"]));
        assert!(!validate_emails(&["a@b.com", "nope"]));
        assert!(!validate_emails::<String>(&[]));
    }

    #[test]
    fn tel_accepts_formatted_numbers() {
        assert!(validate_tel("+1 (555) 123-4567"));
        assert!(validate_tel("5551234"));
        assert!(validate_tel("+39 02.1234.5678"));
        assert!(validate_tel("112"));
    }

    #[test]
    fn tel_rejects_letters_and_short_values() {
        assert!(!validate_tel(""));
        assert!(!validate_tel("+"));
        assert!(!validate_tel("12"));
        assert!(!validate_tel("call me"));
        assert!(!validate_tel("555-CALL"));
        assert!(!validate_tel("++15551234"));
    }

    #[test]
    fn split_keeps_order_and_trims() {
        assert_eq!(
            split_address_list("a@b.com, c@d.org ,e@f.net"),
            vec!["a@b.com", "c@d.org", "e@f.net"]
        );
        assert_eq!(split_address_list("a@b.com,"), vec!["a@b.com", ""]);
    }

    proptest! {
        #[test]
        fn anything_with_a_letter_is_not_a_phone(prefix in "[0-9 ]{0,8}", letter in "[a-zA-Z]", suffix in "[0-9]{0,8}") {
            let value = format!("{prefix}{letter}{suffix}");
            prop_assert!(!validate_tel(&value));
        }

        #[test]
        fn digit_strings_are_phones(digits in "[0-9]{3,15}") {
            prop_assert!(validate_tel(&digits));
            let plus = format!("+{digits}");
            prop_assert!(validate_tel(&plus));
        }

        #[test]
        fn split_preserves_order(entries in proptest::collection::vec("[a-z]{1,6}@[a-z]{1,6}\\.com", 1..6)) {
            let joined = entries.join(", ");
            let split = split_address_list(&joined);
            prop_assert_eq!(&split, &entries.iter().map(String::as_str).collect::<Vec<_>>());
            prop_assert!(validate_emails(&split));
        }

        #[test]
        fn whitespace_never_validates(local in "[a-z]{1,8}", domain in "[a-z]{1,8}") {
            let spaced = format!("{local} @{domain}.com");
            prop_assert!(!validate_email(&spaced));
        }
    }
}
