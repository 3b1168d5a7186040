//! Diff stats and compact unified diff formatting.

use std::fmt::Write as _;

use similar::{ChangeTag, TextDiff};

/// Line counts for a single file change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub additions: u32,
    pub deletions: u32,
}

/// Compute diff stats (lines added/removed) between old and new content.
#[must_use]
pub fn compute_diff_stats(old_text: &str, new_text: &str) -> DiffStats {
    let diff = TextDiff::from_lines(old_text, new_text);

    let mut stats = DiffStats::default();
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => stats.additions += 1,
            ChangeTag::Delete => stats.deletions += 1,
            ChangeTag::Equal => {}
        }
    }

    stats
}

/// Format a compact unified diff between old and new file content.
///
/// Changed lines are prefixed with `-`/`+` and carry their line number;
/// unchanged runs are elided. Intended for transcript display, not for
/// machine-applied patches.
#[must_use]
pub fn format_unified_diff(old_text: &str, new_text: &str) -> String {
    let diff = TextDiff::from_lines(old_text, new_text);

    let max_line = old_text.lines().count().max(new_text.lines().count());
    let width = if max_line == 0 {
        1
    } else {
        max_line.to_string().len()
    };

    let mut out = String::new();
    let mut elided = false;

    for change in diff.iter_all_changes() {
        let (sign, line_no) = match change.tag() {
            ChangeTag::Equal => {
                elided = true;
                continue;
            }
            ChangeTag::Delete => ('-', change.old_index()),
            ChangeTag::Insert => ('+', change.new_index()),
        };

        if elided && !out.is_empty() {
            let _ = writeln!(out, "{:>width$}", "...");
        }
        elided = false;

        let line_no = line_no.map_or(0, |i| i + 1);
        let _ = write!(out, "{line_no:>width$} {sign}");
        out.push_str(change.value().trim_end_matches('\n'));
        out.push('\n');
    }

    out
}
