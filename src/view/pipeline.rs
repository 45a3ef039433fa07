//! Pure transformation pipeline for collection views.
//!
//! Every list page feeds its records through the same stages:
//!
//! ```text
//! records
//!    │
//!    ▼
//! ┌─────────────────┐
//! │ compute_view()  │ ← ViewState, ViewSchema
//! └─────────────────┘
//!    │
//!    ├─→ apply_search()    ← case-insensitive substring over searchable fields
//!    ├─→ apply_filters()   ← categorical filters, explicit widenings
//!    ├─→ sort stage        ← stable sort, rank table for risk levels
//!    └─→ page slice        ← [(page-1)*size, page*size)
//!    │
//!    ▼
//! ViewResult
//! ```
//!
//! # Purity Guarantee
//!
//! All stages are pure: no I/O, no shared state, deterministic results. The
//! input slice and its records are only read, never mutated; the result owns
//! clones of the visible page only. Recomputation happens on every relevant
//! UI event and there is no memoization.

use super::{filter, page, sort, ViewResult, ViewSchema, ViewState};

/// Computes the visible page and counts for one collection view.
///
/// This is the single entry point every list page uses; per-page filtering
/// logic lives in schemas, not in copies of this function.
///
/// Panics on a missing accessor or a zero `page_size` (programmer errors);
/// never fails on an empty collection.
pub fn compute_view<R: Clone>(
    records: &[R],
    state: &ViewState,
    schema: &ViewSchema<R>,
) -> ViewResult<R> {
    assert!(state.page_size > 0, "page_size must be positive");

    let total_count = records.len();

    // Stage 1: search (pure)
    let searched = apply_search(records, state, schema);

    // Stage 2: categorical filters (pure)
    let mut filtered = apply_filters(searched, state, schema);
    let filtered_count = filtered.len();

    // Stage 3: stable sort (pure)
    sort::sort_records(&mut filtered, state, schema);

    // Stage 4: page slice (pure)
    let total_pages = page::total_pages(filtered_count, state.page_size);
    let bounds = page::slice_bounds(state.page, state.page_size, filtered.len());
    let page_items = filtered[bounds].iter().copied().cloned().collect();

    ViewResult {
        page_items,
        filtered_count,
        total_count,
        total_pages,
    }
}

// ============================================================================
// STAGE 1: SEARCH
// ============================================================================

/// Retains records where any searchable field contains the lowercased term.
///
/// An empty term returns every record without touching a single field; the
/// no-search path is a short-circuit, not a match-everything substring scan.
fn apply_search<'a, R>(
    records: &'a [R],
    state: &ViewState,
    schema: &ViewSchema<R>,
) -> Vec<&'a R> {
    if !state.search_active() {
        return records.iter().collect();
    }

    let needle = state.search_term.to_lowercase();
    records
        .iter()
        .filter(|record| {
            schema.searchable_fields().any(|field| {
                (field.accessor)(record)
                    .search_key()
                    .is_some_and(|key| key.contains(&needle))
            })
        })
        .collect()
}

// ============================================================================
// STAGE 2: CATEGORICAL FILTERS
// ============================================================================

/// Applies every active filter in turn; `"all"` selections are inert and
/// were already skipped by [`ViewState::active_filters`].
fn apply_filters<'a, R>(
    records: Vec<&'a R>,
    state: &ViewState,
    schema: &ViewSchema<R>,
) -> Vec<&'a R> {
    let mut remaining = records;
    for (category, selected) in state.active_filters() {
        remaining.retain(|record| filter::record_passes(*record, category, selected, schema));
    }
    remaining
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RiskLevel;
    use crate::view::{FieldValue, FilterWidening, SortDirection};
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        name: String,
        department: &'static str,
        risk: RiskLevel,
        gpa: f64,
    }

    fn person(name: &str, department: &'static str, risk: RiskLevel, gpa: f64) -> Person {
        Person {
            name: name.to_string(),
            department,
            risk,
            gpa,
        }
    }

    fn schema() -> ViewSchema<Person> {
        ViewSchema::new("people")
            .searchable_field("name", |p: &Person| FieldValue::text(p.name.clone()))
            .field("department", |p: &Person| FieldValue::text(p.department))
            .field("risk_level", |p: &Person| FieldValue::Risk(p.risk))
            .field("gpa", |p: &Person| FieldValue::Float(p.gpa))
    }

    fn widened_schema() -> ViewSchema<Person> {
        schema().widen(FilterWidening::high_risk_includes_critical())
    }

    fn roster() -> Vec<Person> {
        vec![
            person("John Doe", "math", RiskLevel::High, 2.1),
            person("Jane Smith", "math", RiskLevel::Low, 3.8),
            person("Ana Silva", "physics", RiskLevel::Critical, 1.9),
        ]
    }

    // ========================================================================
    // SEARCH STAGE
    // ========================================================================

    #[test]
    fn test_search_matches_any_searchable_field() {
        let records = roster();
        let mut state = ViewState::new("name", 10);
        state.set_search("john");

        let result = compute_view(&records, &state, &schema());

        assert_eq!(result.filtered_count, 1);
        assert_eq!(result.page_items[0].name, "John Doe");
    }

    #[test]
    fn test_empty_search_retains_all() {
        let records = roster();
        let state = ViewState::new("name", 10);

        let result = compute_view(&records, &state, &schema());

        assert_eq!(result.filtered_count, 3);
        assert_eq!(result.total_count, 3);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let records = roster();
        let mut state = ViewState::new("name", 10);
        state.set_search("SMIT");

        let result = compute_view(&records, &state, &schema());

        assert_eq!(result.filtered_count, 1);
        assert_eq!(result.page_items[0].name, "Jane Smith");
    }

    // ========================================================================
    // FILTER STAGE
    // ========================================================================

    #[test]
    fn test_department_filter_exact() {
        let records = roster();
        let mut state = ViewState::new("name", 10);
        state.set_filter("department", "math");

        let result = compute_view(&records, &state, &schema());

        assert_eq!(result.filtered_count, 2);
    }

    #[test]
    fn test_high_filter_without_widening_excludes_critical() {
        let records = roster();
        let mut state = ViewState::new("name", 10);
        state.set_filter("risk_level", "high");

        let result = compute_view(&records, &state, &schema());

        assert_eq!(result.filtered_count, 1);
        assert_eq!(result.page_items[0].name, "John Doe");
    }

    #[test]
    fn test_high_filter_with_widening_admits_critical() {
        // The documented "high includes critical" special case: 2 of 3 retained.
        let records = roster();
        let mut state = ViewState::new("name", 10);
        state.set_filter("risk_level", "high");

        let result = compute_view(&records, &state, &widened_schema());

        assert_eq!(result.filtered_count, 2);
        let names: Vec<_> = result.page_items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ana Silva", "John Doe"]);
    }

    #[test]
    fn test_filters_and_search_compose() {
        let records = roster();
        let mut state = ViewState::new("name", 10);
        state.set_search("a");
        state.set_filter("department", "math");

        let result = compute_view(&records, &state, &schema());

        // "a" matches Jane Smith and Ana Silva; department keeps only Jane.
        assert_eq!(result.filtered_count, 1);
        assert_eq!(result.page_items[0].name, "Jane Smith");
    }

    // ========================================================================
    // SORT STAGE
    // ========================================================================

    #[test]
    fn test_sort_by_risk_rank_descending() {
        let records = roster();
        let mut state = ViewState::new("risk_level", 10);
        state.sort_direction = SortDirection::Desc;

        let result = compute_view(&records, &state, &schema());

        let names: Vec<_> = result.page_items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ana Silva", "John Doe", "Jane Smith"]);
    }

    #[test]
    fn test_sort_by_gpa_ascending() {
        let records = roster();
        let state = ViewState::new("gpa", 10);

        let result = compute_view(&records, &state, &schema());

        let names: Vec<_> = result.page_items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ana Silva", "John Doe", "Jane Smith"]);
    }

    #[test]
    fn test_sort_ties_preserve_input_order() {
        let records = vec![
            person("first", "math", RiskLevel::High, 2.0),
            person("second", "math", RiskLevel::High, 3.0),
            person("third", "math", RiskLevel::High, 1.0),
        ];
        let state = ViewState::new("risk_level", 10);

        let result = compute_view(&records, &state, &schema());

        let names: Vec<_> = result.page_items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    // ========================================================================
    // PAGE STAGE
    // ========================================================================

    fn many(count: usize) -> Vec<Person> {
        (0..count)
            .map(|i| person(&format!("person {i:03}"), "math", RiskLevel::Low, 2.0))
            .collect()
    }

    #[test]
    fn test_25_records_page_size_10_is_3_pages() {
        let records = many(25);
        let mut state = ViewState::new("name", 10);

        state.set_page(1);
        let first = compute_view(&records, &state, &schema());
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.page_items.len(), 10);

        state.set_page(3);
        let last = compute_view(&records, &state, &schema());
        assert_eq!(last.page_items.len(), 5);
    }

    #[test]
    fn test_page_past_end_renders_empty_without_clamping() {
        let records = many(25);
        let mut state = ViewState::new("name", 10);
        state.set_page(7);

        let result = compute_view(&records, &state, &schema());

        assert!(result.page_items.is_empty());
        assert_eq!(result.filtered_count, 25);
        assert_eq!(result.total_pages, 3);
    }

    #[test]
    fn test_empty_input_is_one_empty_page() {
        let records: Vec<Person> = vec![];
        let state = ViewState::new("name", 10);

        let result = compute_view(&records, &state, &schema());

        assert!(result.page_items.is_empty());
        assert_eq!(result.filtered_count, 0);
        assert_eq!(result.total_count, 0);
        assert_eq!(result.total_pages, 1);
    }

    // ========================================================================
    // FULL PIPELINE
    // ========================================================================

    #[test]
    fn test_compute_view_is_deterministic() {
        let records = roster();
        let mut state = ViewState::new("risk_level", 2);
        state.set_search("a");

        let first = compute_view(&records, &state, &widened_schema());
        let second = compute_view(&records, &state, &widened_schema());

        assert_eq!(first, second);
    }

    #[test]
    fn test_input_records_are_untouched() {
        let records = roster();
        let before = records.clone();
        let mut state = ViewState::new("risk_level", 2);
        state.sort_direction = SortDirection::Desc;
        state.set_filter("department", "math");

        let _ = compute_view(&records, &state, &schema());

        assert_eq!(records, before);
    }

    #[test]
    #[should_panic(expected = "page_size must be positive")]
    fn test_zero_page_size_panics() {
        let records = roster();
        let mut state = ViewState::new("name", 10);
        state.page_size = 0;
        let _ = compute_view(&records, &state, &schema());
    }

    #[test]
    #[should_panic(expected = "no accessor named")]
    fn test_unknown_sort_key_panics() {
        let records = roster();
        let state = ViewState::new("does_not_exist", 10);
        let _ = compute_view(&records, &state, &schema());
    }
}
