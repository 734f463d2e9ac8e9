//! Problem list display.

use crate::models::ProblemTag;

/// Prefix marking a problem entry on the board.
pub const PROBLEM_MARKER: char = '#';

/// Build the `#`-prefixed problem list: selected tags first, then one entry
/// per non-blank line of free text.
///
/// Entries are not deduplicated across the two sources; a label picked from
/// the vocabulary and also typed by hand is shown twice.
pub fn combine_problems(selected: &[ProblemTag], free_text: &str) -> Vec<String> {
    let canonical = selected
        .iter()
        .map(|tag| format!("{}{}", PROBLEM_MARKER, tag.label()));

    let free = free_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            if line.starts_with(PROBLEM_MARKER) {
                line.to_string()
            } else {
                format!("{}{}", PROBLEM_MARKER, line)
            }
        });

    canonical.chain(free).collect()
}
