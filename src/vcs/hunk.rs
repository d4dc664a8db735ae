//! Unified-diff hunk header parsing.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `@@ -a[,b] +c[,d] @@`, optionally followed by section context.
    static ref HUNK_HEADER: Regex = Regex::new(r"^@@ [^+@]*\+(\d+)(?:,(\d+))? @@").unwrap();
}

/// The new-file side of one hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkRange {
    pub start: usize,
    pub count: usize,
}

impl HunkRange {
    /// Added line numbers. Empty for pure deletions (`count == 0`).
    pub fn lines(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.count
    }
}

/// Parse a single hunk header. The count defaults to 1 when omitted.
pub fn parse_hunk_header(line: &str) -> Option<HunkRange> {
    let caps = HUNK_HEADER.captures(line)?;
    let start = caps.get(1)?.as_str().parse().ok()?;
    let count = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 1,
    };
    Some(HunkRange { start, count })
}

/// Line numbers introduced by a diff for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddedLineSet {
    lines: BTreeSet<usize>,
}

impl AddedLineSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the added lines of every hunk header in `diff`.
    pub fn from_diff(diff: &str) -> Self {
        diff.lines()
            .filter(|line| line.starts_with("@@"))
            .filter_map(parse_hunk_header)
            .flat_map(|hunk| hunk.lines())
            .collect()
    }

    pub fn contains(&self, line: usize) -> bool {
        self.lines.contains(&line)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines.iter().copied()
    }
}

impl FromIterator<usize> for AddedLineSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

/// Added line numbers of a unified diff, in ascending order.
pub fn parse_added_lines(diff: &str) -> Vec<usize> {
    AddedLineSet::from_diff(diff).iter().collect()
}
