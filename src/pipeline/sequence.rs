//! Numeric filename sequencing for region crops.
//!
//! Region images are written as `rectangle_<i>.png` and later re-discovered
//! from the filesystem, so recognition order must be recovered from the
//! numeric index embedded in the filename. A plain lexicographic sort would
//! put `rectangle_10.png` before `rectangle_2.png` and scramble the output.

use once_cell::sync::Lazy;
use regex::Regex;

/// Sort key for filenames with no digit run: larger than any real index,
/// so such files sort last.
pub const NO_SEQUENCE: u64 = u64::MAX;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Extract the first maximal run of decimal digits from `filename` as the
/// sort key, or [`NO_SEQUENCE`] when the filename contains none (or the run
/// overflows `u64`).
///
/// Used only as a sort key; never fails.
pub fn sequence_key(filename: &str) -> u64 {
    DIGIT_RUN
        .find(filename)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(NO_SEQUENCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_digit_run() {
        assert_eq!(sequence_key("rectangle_9.png"), 9);
        assert_eq!(sequence_key("rectangle_10.png"), 10);
        assert_eq!(sequence_key("rectangle_007.png"), 7);
        // first run wins, not the longest or last
        assert_eq!(sequence_key("page2_rectangle_10.png"), 2);
    }

    #[test]
    fn no_digits_sorts_last() {
        assert_eq!(sequence_key("notes.png"), NO_SEQUENCE);
        assert_eq!(sequence_key(""), NO_SEQUENCE);
    }

    #[test]
    fn overflowing_run_sorts_last() {
        assert_eq!(sequence_key("rectangle_99999999999999999999999.png"), NO_SEQUENCE);
    }

    #[test]
    fn numeric_sort_beats_lexicographic() {
        let mut names = vec!["rectangle_10.png", "rectangle_2.png", "notes.png"];
        names.sort_by_key(|n| sequence_key(n));
        assert_eq!(names, vec!["rectangle_2.png", "rectangle_10.png", "notes.png"]);
    }
}
