//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Up to two initials for an avatar.
///
/// Usage in templates: `{{ user.name|initials }}`
#[askama::filter_fn]
pub fn initials(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(initials_of(&value.to_string()))
}

fn initials_of(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    if initials.is_empty() {
        "?".to_string()
    } else {
        initials
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        assert_eq!(initials_of("Ada Lovelace"), "AL");
        assert_eq!(initials_of("grace brewster murray hopper"), "GB");
        assert_eq!(initials_of("Linus"), "L");
        assert_eq!(initials_of("   "), "?");
    }
}
