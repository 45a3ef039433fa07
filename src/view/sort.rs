//! Sort direction and the stable comparator stage.

use super::{ViewSchema, ViewState};

/// Sort polarity for the active column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Arrow glyph for column headers.
    pub fn indicator(&self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

/// Stable sort of borrowed records by the view state's active sort key.
///
/// `sort_by` is stable, so records comparing equal under the active
/// comparator keep their relative input order without extra bookkeeping.
pub fn sort_records<R>(records: &mut [&R], state: &ViewState, schema: &ViewSchema<R>) {
    let accessor = schema.accessor(&state.sort_key);
    records.sort_by(|a, b| {
        let ordering = accessor(a).compare(&accessor(b));
        match state.sort_direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}
