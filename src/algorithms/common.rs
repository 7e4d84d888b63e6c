use crate::path::path_length;
use serde::Serialize;

/// Outcome of one search: the visitation order, the route, and an optional remark.
///
/// An empty `path` means no route was found; that is a normal result, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResult {
    pub expanded: Vec<usize>,
    pub path: Vec<usize>,
    pub note: Option<String>,
}

impl SearchResult {
    pub fn new(expanded: Vec<usize>, path: Vec<usize>) -> Self {
        SearchResult {
            expanded,
            path,
            note: None,
        }
    }

    /// Result for a search whose start is already the goal.
    pub fn trivial(cell: usize) -> Self {
        Self::new(vec![cell], vec![cell])
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn found(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn path_length(&self) -> usize {
        path_length(&self.path)
    }
}

/// Visitation log that keeps only the first visit of each cell.
#[derive(Debug, Clone)]
pub(crate) struct ExpansionLog {
    order: Vec<usize>,
    seen: Vec<bool>,
}

impl ExpansionLog {
    pub(crate) fn new(cells: usize) -> Self {
        ExpansionLog {
            order: Vec::new(),
            seen: vec![false; cells],
        }
    }

    pub(crate) fn record(&mut self, cell: usize) {
        if !self.seen[cell] {
            self.seen[cell] = true;
            self.order.push(cell);
        }
    }

    pub(crate) fn into_order(self) -> Vec<usize> {
        self.order
    }
}
