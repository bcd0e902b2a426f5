use serde::Serialize;

/// A line interval whose syntax must be deleted.
///
/// A node is excluded when it starts on or after `start` and ends on or
/// before `end`. Ranges may overlap; consumers must tolerate that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ExclusionRange {
    pub start: usize,
    pub end: usize,
}

impl ExclusionRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Check whether a node spanning `start_line..=end_line` lies inside this range.
    pub fn contains(&self, start_line: usize, end_line: usize) -> bool {
        start_line >= self.start && end_line <= self.end
    }

    /// Check whether any range in `ranges` covers the node.
    pub fn any_contains(ranges: &[ExclusionRange], start_line: usize, end_line: usize) -> bool {
        ranges.iter().any(|r| r.contains(start_line, end_line))
    }
}
