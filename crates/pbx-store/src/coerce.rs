//! Coercions between the text scalars of the file format and typed values.
//!
//! The format has no number or boolean syntax: `buildActionMask = 2147483647;`
//! and `runOnlyForDeploymentPostprocessing = 0;` are both strings. These
//! helpers are the only place that interprets them.

use std::str::FromStr;

/// Parse a decimal integer written as text.
pub fn int_text<T: FromStr>(text: &str) -> Option<T> {
    text.trim().parse().ok()
}

/// Parse an integer-valued boolean: `"0"` is false, any other integer true.
pub fn int_bool(text: &str) -> Option<bool> {
    int_text::<i64>(text).map(|n| n != 0)
}

/// The text form of a boolean: `"1"` or `"0"`.
pub fn bool_text(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_text_parses_decimal() {
        assert_eq!(int_text::<u32>("2147483647"), Some(2_147_483_647));
        assert_eq!(int_text::<u32>("12"), Some(12));
        assert_eq!(int_text::<u32>("-1"), None);
        assert_eq!(int_text::<u32>("twelve"), None);
    }

    #[test]
    fn int_bool_is_lenient_about_nonzero() {
        assert_eq!(int_bool("1"), Some(true));
        assert_eq!(int_bool("0"), Some(false));
        assert_eq!(int_bool("2"), Some(true));
        assert_eq!(int_bool("YES"), None);
    }

    #[test]
    fn bool_text_forms() {
        assert_eq!(bool_text(true), "1");
        assert_eq!(bool_text(false), "0");
    }
}
