//! Free-text normalization for categorical and boolean-like inputs
//!
//! Categorical fields are trimmed and title-cased before the encoder
//! lookup; boolean-like fields map onto {0, 1} through a fixed table.

/// Trim the input and title-case every whitespace-separated word.
///
/// " north " becomes "North", "silty clay" becomes "Silty Clay". A
/// letter that follows any non-alphabetic character starts a new word,
/// so "semi-arid" becomes "Semi-Arid". This must match the casing the
/// encoders were trained with, so unknown-value errors only fire for
/// genuinely unsupported categories.
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for (i, word) in raw.split_whitespace().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let mut at_word_start = true;
        for c in word.chars() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = !c.is_alphabetic();
        }
    }
    out
}

/// Map a boolean-like field value onto 0/1.
///
/// The value is trimmed and upper-cased, then looked up in the fixed
/// table {"TRUE" => 1, "FALSE" => 0}. Anything else is unmapped and the
/// caller must reject the request before encoding starts.
pub fn parse_flag(raw: &str) -> Option<u8> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "TRUE" => Some(1),
        "FALSE" => Some(0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_trims_and_capitalizes() {
        assert_eq!(title_case(" north "), "North");
        assert_eq!(title_case("LOAM"), "Loam");
        assert_eq!(title_case("sunny"), "Sunny");
    }

    #[test]
    fn test_title_case_multi_word() {
        assert_eq!(title_case("silty clay"), "Silty Clay");
        assert_eq!(title_case("  partly   CLOUDY "), "Partly Cloudy");
    }

    #[test]
    fn test_title_case_capitalizes_after_non_alphabetic() {
        assert_eq!(title_case("semi-arid"), "Semi-Arid");
        assert_eq!(title_case("SEMI-ARID"), "Semi-Arid");
        assert_eq!(title_case("red-loam soil"), "Red-Loam Soil");
    }

    #[test]
    fn test_title_case_already_normalized() {
        assert_eq!(title_case("North"), "North");
    }

    #[test]
    fn test_title_case_empty() {
        assert_eq!(title_case(""), "");
        assert_eq!(title_case("   "), "");
    }

    #[test]
    fn test_parse_flag_accepted_spellings() {
        assert_eq!(parse_flag("true"), Some(1));
        assert_eq!(parse_flag("TRUE"), Some(1));
        assert_eq!(parse_flag(" True "), Some(1));
        assert_eq!(parse_flag("false"), Some(0));
        assert_eq!(parse_flag("FALSE"), Some(0));
    }

    #[test]
    fn test_parse_flag_rejects_everything_else() {
        assert_eq!(parse_flag("yes"), None);
        assert_eq!(parse_flag("1"), None);
        assert_eq!(parse_flag(""), None);
        assert_eq!(parse_flag("truthy"), None);
    }
}
