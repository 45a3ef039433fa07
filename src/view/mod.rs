//! Collection view types: view state, field access, and results.
//!
//! Every list page in the dashboard renders through the same contract: an
//! immutable slice of records plus a [`ViewState`] go into
//! [`pipeline::compute_view`], and the exact page to render plus counts come
//! out. Field access is indirected through a per-entity [`ViewSchema`] so the
//! pipeline never assumes a record shape.

pub mod filter;
pub mod page;
pub mod pipeline;
pub mod schemas;
pub mod sort;
pub mod summary;

pub use filter::FilterWidening;
pub use page::{clamp_page, total_pages};
pub use pipeline::compute_view;
pub use sort::SortDirection;

use crate::core::RiskLevel;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Sentinel filter value meaning "no filter for this category".
pub const FILTER_ALL: &str = "all";

/// A comparable value extracted from a record by a schema accessor.
///
/// Wire-shape normalization happens before records reach the view layer, so
/// accessors are infallible; a genuinely absent value is `Missing`, which
/// sorts before everything else.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Risk(RiskLevel),
    Timestamp(DateTime<Utc>),
    Bool(bool),
    Missing,
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn opt_text(value: Option<&str>) -> Self {
        match value {
            Some(v) => FieldValue::Text(v.to_string()),
            None => FieldValue::Missing,
        }
    }

    /// Compare two field values for sorting.
    ///
    /// Risk levels compare by their fixed rank table, text compares
    /// case-insensitively, and `Missing` sorts first. Values of mismatched
    /// variants compare equal; schemas keep each field homogeneous.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        use FieldValue::*;
        match (self, other) {
            (Missing, Missing) => Ordering::Equal,
            (Missing, _) => Ordering::Less,
            (_, Missing) => Ordering::Greater,
            (Text(a), Text(b)) => a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase()),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Risk(a), Risk(b)) => a.rank().cmp(&b.rank()),
            (Timestamp(a), Timestamp(b)) => a.cmp(b),
            (Bool(a), Bool(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }

    /// Whether this value matches a categorical filter selection.
    ///
    /// Matching is exact equality against the value's canonical string form,
    /// case-normalized. Non-categorical variants never match.
    pub fn matches(&self, selected: &str) -> bool {
        match self {
            FieldValue::Text(v) => v.eq_ignore_ascii_case(selected),
            FieldValue::Risk(r) => r.as_str().eq_ignore_ascii_case(selected),
            FieldValue::Integer(v) => v.to_string() == selected,
            FieldValue::Bool(v) => {
                let canonical = if *v { "true" } else { "false" };
                canonical.eq_ignore_ascii_case(selected)
            }
            FieldValue::Float(_) | FieldValue::Timestamp(_) | FieldValue::Missing => false,
        }
    }

    /// Lowercased text for substring search, for fields that carry text.
    pub fn search_key(&self) -> Option<String> {
        match self {
            FieldValue::Text(v) => Some(v.to_lowercase()),
            FieldValue::Integer(v) => Some(v.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(v) => write!(f, "{v}"),
            FieldValue::Integer(v) => write!(f, "{v}"),
            FieldValue::Float(v) => write!(f, "{v:.2}"),
            FieldValue::Risk(r) => write!(f, "{r}"),
            FieldValue::Timestamp(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M")),
            FieldValue::Bool(v) => write!(f, "{}", if *v { "yes" } else { "no" }),
            FieldValue::Missing => write!(f, "-"),
        }
    }
}

/// A named accessor over a record type.
pub struct FieldSpec<R> {
    pub name: &'static str,
    pub accessor: fn(&R) -> FieldValue,
    /// Whether the search stage consults this field.
    pub searchable: bool,
}

/// Per-entity view schema: named field accessors plus the explicitly
/// configured filter widenings for this view.
///
/// A schema must cover every category named by a view state's filters and
/// its sort key; asking for an unknown field is a programmer error and
/// panics immediately.
pub struct ViewSchema<R> {
    entity: &'static str,
    fields: Vec<FieldSpec<R>>,
    widenings: Vec<FilterWidening>,
}

impl<R> ViewSchema<R> {
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            fields: Vec::new(),
            widenings: Vec::new(),
        }
    }

    pub fn field(mut self, name: &'static str, accessor: fn(&R) -> FieldValue) -> Self {
        self.fields.push(FieldSpec {
            name,
            accessor,
            searchable: false,
        });
        self
    }

    pub fn searchable_field(mut self, name: &'static str, accessor: fn(&R) -> FieldValue) -> Self {
        self.fields.push(FieldSpec {
            name,
            accessor,
            searchable: true,
        });
        self
    }

    pub fn widen(mut self, widening: FilterWidening) -> Self {
        self.widenings.push(widening);
        self
    }

    /// Plural entity label used in empty-state copy, e.g. `"students"`.
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn fields(&self) -> &[FieldSpec<R>] {
        &self.fields
    }

    /// Accessor for a named field. Panics on an unknown name: a filter
    /// category or sort key without an accessor is a bug in the calling
    /// view, not a runtime condition.
    pub fn accessor(&self, name: &str) -> fn(&R) -> FieldValue {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.accessor)
            .unwrap_or_else(|| {
                panic!(
                    "no accessor named '{name}' in the {} schema (known: {})",
                    self.entity,
                    self.field_names().join(", ")
                )
            })
    }

    pub fn searchable_fields(&self) -> impl Iterator<Item = &FieldSpec<R>> {
        self.fields.iter().filter(|f| f.searchable)
    }

    /// The widening configured for a category/selection pair, if any.
    pub fn widening_for(&self, category: &str, selected: &str) -> Option<&FilterWidening> {
        self.widenings
            .iter()
            .find(|w| w.category == category && w.selected.eq_ignore_ascii_case(selected))
    }

    fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }
}

/// Presentation-owned view state for one collection page.
///
/// Reconstructed freely on each interaction and never persisted. Every edit
/// that changes which records are visible resets the page to 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub search_term: String,
    /// Category name to selected value; [`FILTER_ALL`] entries are inert.
    pub filters: BTreeMap<String, String>,
    pub sort_key: String,
    pub sort_direction: SortDirection,
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
}

impl ViewState {
    pub fn new(sort_key: impl Into<String>, page_size: usize) -> Self {
        Self {
            search_term: String::new(),
            filters: BTreeMap::new(),
            sort_key: sort_key.into(),
            sort_direction: SortDirection::Asc,
            page: 1,
            page_size,
        }
    }

    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.sort_direction = direction;
        self
    }

    pub fn search_active(&self) -> bool {
        !self.search_term.is_empty()
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.page = 1;
    }

    pub fn set_filter(&mut self, category: impl Into<String>, value: impl Into<String>) {
        self.filters.insert(category.into(), value.into());
        self.page = 1;
    }

    /// Current selection for a category; [`FILTER_ALL`] when unset.
    pub fn filter_value(&self, category: &str) -> &str {
        self.filters
            .get(category)
            .map(String::as_str)
            .unwrap_or(FILTER_ALL)
    }

    /// Filters with a real selection, in category order.
    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters
            .iter()
            .filter(|(_, v)| v.as_str() != FILTER_ALL)
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Column-click sort semantics: a repeated key flips the direction, a
    /// new key sorts ascending.
    pub fn toggle_sort(&mut self, key: impl Into<String>) {
        let key = key.into();
        if self.sort_key == key {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_key = key;
            self.sort_direction = SortDirection::Asc;
        }
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }
}

/// The visible page plus the counts pagination UI needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewResult<R> {
    pub page_items: Vec<R>,
    pub filtered_count: usize,
    pub total_count: usize,
    pub total_pages: usize,
}

/// Copy for the zero-row state. A filtered-out collection is not an error;
/// the wording only distinguishes whether a search is active.
pub fn empty_state_message(entity: &str, search_active: bool) -> String {
    if search_active {
        format!("No {entity} match your search")
    } else {
        format!("No {entity} found")
    }
}
