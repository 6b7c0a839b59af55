//! Filename formatting — pure functions, no I/O.
//!
//! Two strategies produce the file name for a saved image: templating the
//! user's pattern, or the bare counter value.

use chrono::NaiveDateTime;

pub const ID_TOKEN: &str = "{id}";
pub const TIMESTAMP_TOKEN: &str = "{timestamp}";
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
pub const PNG_EXTENSION: &str = ".png";

/// How the file name is derived from the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingStrategy {
    /// Substitute `{id}` and `{timestamp}` in the configured pattern.
    Pattern,
    /// Use the counter value alone.
    Counter,
}

impl NamingStrategy {
    pub fn from_flag(use_pattern: bool) -> Self {
        if use_pattern {
            Self::Pattern
        } else {
            Self::Counter
        }
    }
}

/// Replace every `{id}` and `{timestamp}` token. Anything else, braces
/// included, passes through untouched.
pub fn expand_pattern(pattern: &str, image_id: u64, now: NaiveDateTime) -> String {
    let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
    pattern
        .replace(ID_TOKEN, &image_id.to_string())
        .replace(TIMESTAMP_TOKEN, &timestamp)
}

/// Append `.png` unless the name already ends with it in any letter case.
pub fn ensure_png_extension(name: String) -> String {
    if has_png_extension(&name) {
        name
    } else {
        name + PNG_EXTENSION
    }
}

pub fn has_png_extension(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(PNG_EXTENSION)
}

/// Final file name (with extension) for the image numbered `image_id`.
pub fn file_name(
    strategy: NamingStrategy,
    pattern: &str,
    image_id: u64,
    now: NaiveDateTime,
) -> String {
    let stem = match strategy {
        NamingStrategy::Pattern => expand_pattern(pattern, image_id, now),
        NamingStrategy::Counter => image_id.to_string(),
    };
    ensure_png_extension(stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    #[test]
    fn expands_id_and_timestamp() {
        let stem = expand_pattern("shot_{id}_{timestamp}", 3, clock());
        assert_eq!(stem, "shot_3_20240102_030405");
        assert_eq!(
            file_name(NamingStrategy::Pattern, "shot_{id}_{timestamp}", 3, clock()),
            "shot_3_20240102_030405.png"
        );
    }

    #[test]
    fn replaces_every_id_occurrence() {
        assert_eq!(expand_pattern("{id}-{id}-{id}", 12, clock()), "12-12-12");
    }

    #[test]
    fn other_braces_pass_through() {
        assert_eq!(
            expand_pattern("{name}_{id}_{ID}_{", 7, clock()),
            "{name}_7_{ID}_{"
        );
    }

    #[test]
    fn pattern_without_tokens_is_unchanged() {
        assert_eq!(expand_pattern("fixed name", 99, clock()), "fixed name");
    }

    #[test]
    fn png_suffix_added_once() {
        assert_eq!(ensure_png_extension("a".into()), "a.png");
        assert_eq!(ensure_png_extension("a.png".into()), "a.png");
        assert_eq!(ensure_png_extension("a.PNG".into()), "a.PNG");
        assert_eq!(ensure_png_extension("a.PnG".into()), "a.PnG");
        assert_eq!(ensure_png_extension("a.jpg".into()), "a.jpg.png");
        assert_eq!(ensure_png_extension("png".into()), "png.png");
    }

    #[test]
    fn counter_strategy_ignores_pattern() {
        assert_eq!(
            file_name(NamingStrategy::Counter, "shot_{timestamp}", 41, clock()),
            "41.png"
        );
    }

    #[test]
    fn strategy_from_flag() {
        assert_eq!(NamingStrategy::from_flag(true), NamingStrategy::Pattern);
        assert_eq!(NamingStrategy::from_flag(false), NamingStrategy::Counter);
    }
}
