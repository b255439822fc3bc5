//! Field checks shared by the request types of every domain module.
//! Each helper returns `AppError::Validation` naming the offending field.

use crate::shared::AppError;

fn invalid(field: &str, message: impl std::fmt::Display) -> AppError {
    AppError::Validation(format!("{field}: {message}"))
}

/// Required text, non-blank and at most `max` characters
pub fn required_text(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(invalid(field, "is required"));
    }
    max_len(field, value, max)
}

pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> Result<(), AppError> {
    match value {
        Some(v) => max_len(field, v, max),
        None => Ok(()),
    }
}

fn max_len(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(invalid(field, format!("must be at most {max} characters")));
    }
    Ok(())
}

/// Turns `Some("")` and whitespace-only strings into `None`
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Season label in `YYYY-YY` form, e.g. `2024-25`
pub fn season(value: &str) -> Result<(), AppError> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 7
        && bytes[4] == b'-'
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[5..].iter().all(u8::is_ascii_digit);

    if !well_formed {
        return Err(invalid(
            "season",
            "must be in format YYYY-YY (e.g., 2024-25)",
        ));
    }
    Ok(())
}

/// `#RRGGBB`
pub fn hex_color(field: &str, value: Option<&str>) -> Result<(), AppError> {
    let Some(v) = value else {
        return Ok(());
    };
    let valid = v.len() == 7
        && v.starts_with('#')
        && v[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(invalid(field, "must be a valid hex color"));
    }
    Ok(())
}

pub fn url(field: &str, value: Option<&str>) -> Result<(), AppError> {
    let Some(v) = value else {
        return Ok(());
    };
    let rest = v
        .strip_prefix("https://")
        .or_else(|| v.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') && !v.contains(' ') => Ok(()),
        _ => Err(invalid(field, "must be a valid URL")),
    }
}

pub fn in_range(field: &str, value: Option<i32>, min: i32, max: i32) -> Result<(), AppError> {
    match value {
        Some(v) if v < min || v > max => {
            Err(invalid(field, format!("must be between {min} and {max}")))
        }
        _ => Ok(()),
    }
}

pub fn non_negative(field: &str, value: Option<i32>) -> Result<(), AppError> {
    match value {
        Some(v) if v < 0 => Err(invalid(field, "must not be negative")),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2024-25", true)]
    #[case("1999-00", true)]
    #[case("2024/25", false)]
    #[case("24-25", false)]
    #[case("2024-2025", false)]
    #[case("abcd-ef", false)]
    fn season_format(#[case] value: &str, #[case] ok: bool) {
        assert_eq!(season(value).is_ok(), ok);
    }

    #[rstest]
    #[case(Some("#FF00aa"), true)]
    #[case(Some("FF00AA"), false)]
    #[case(Some("#FF00A"), false)]
    #[case(Some("#GG0000"), false)]
    #[case(None, true)]
    fn hex_colors(#[case] value: Option<&str>, #[case] ok: bool) {
        assert_eq!(hex_color("primary_color", value).is_ok(), ok);
    }

    #[rstest]
    #[case(Some("https://example.com/logo.png"), true)]
    #[case(Some("http://cdn.example.org"), true)]
    #[case(Some("ftp://example.com"), false)]
    #[case(Some("https://"), false)]
    #[case(Some("not a url"), false)]
    #[case(None, true)]
    fn urls(#[case] value: Option<&str>, #[case] ok: bool) {
        assert_eq!(url("logo_url", value).is_ok(), ok);
    }

    #[test]
    fn required_text_rejects_blank_and_long_values() {
        assert!(required_text("name", "Premier", 100).is_ok());
        assert!(matches!(
            required_text("name", "   ", 100),
            Err(AppError::Validation(_))
        ));
        assert!(required_text("name", &"x".repeat(101), 100).is_err());
    }

    #[test]
    fn blank_optionals_become_none() {
        assert_eq!(blank_to_none(Some("".into())), None);
        assert_eq!(blank_to_none(Some("  ".into())), None);
        assert_eq!(blank_to_none(Some(" Wembley ".into())), Some("Wembley".into()));
        assert_eq!(blank_to_none(None), None);
    }

    #[test]
    fn ranges_are_inclusive() {
        assert!(in_range("jersey_number", Some(0), 0, 99).is_ok());
        assert!(in_range("jersey_number", Some(99), 0, 99).is_ok());
        assert!(in_range("jersey_number", Some(100), 0, 99).is_err());
        assert!(in_range("jersey_number", None, 0, 99).is_ok());
        assert!(non_negative("attendance", Some(-1)).is_err());
    }
}
