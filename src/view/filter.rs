//! Categorical filter matching, including explicit per-view widenings.

use super::{FieldValue, ViewSchema};

/// An explicitly configured widened match for one filter selection.
///
/// Example: on list pages configured for it, selecting the `high` risk
/// filter also admits `critical` records. Widenings are enumerated
/// per category and per view; nothing is ever inferred from level
/// ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterWidening {
    pub category: &'static str,
    /// The user-facing selection this widening applies to.
    pub selected: &'static str,
    /// Canonical values the selection admits, the selection itself included.
    pub admits: &'static [&'static str],
}

impl FilterWidening {
    pub const fn new(
        category: &'static str,
        selected: &'static str,
        admits: &'static [&'static str],
    ) -> Self {
        Self {
            category,
            selected,
            admits,
        }
    }

    /// The one widening observed in the product: a `high` risk selection
    /// that also admits `critical` records.
    pub const fn high_risk_includes_critical() -> Self {
        Self::new("risk_level", "high", &["high", "critical"])
    }

    /// Whether a record's field value falls inside the widened set.
    pub fn admits_value(&self, value: &FieldValue) -> bool {
        self.admits.iter().any(|admitted| value.matches(admitted))
    }
}

/// Whether a record passes one categorical filter under a schema.
///
/// A widening configured for this category/selection pair replaces plain
/// equality with the widened set; otherwise the match is exact.
pub fn record_passes<R>(
    record: &R,
    category: &str,
    selected: &str,
    schema: &ViewSchema<R>,
) -> bool {
    let value = (schema.accessor(category))(record);
    match schema.widening_for(category, selected) {
        Some(widening) => widening.admits_value(&value),
        None => value.matches(selected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RiskLevel;

    fn risk_schema(widened: bool) -> ViewSchema<RiskLevel> {
        let schema =
            ViewSchema::new("records").field("risk_level", |r: &RiskLevel| FieldValue::Risk(*r));
        if widened {
            schema.widen(FilterWidening::high_risk_includes_critical())
        } else {
            schema
        }
    }

    #[test]
    fn test_exact_match_without_widening() {
        let schema = risk_schema(false);
        assert!(record_passes(&RiskLevel::High, "risk_level", "high", &schema));
        assert!(!record_passes(
            &RiskLevel::Critical,
            "risk_level",
            "high",
            &schema
        ));
    }

    #[test]
    fn test_high_widens_to_critical_when_configured() {
        let schema = risk_schema(true);
        assert!(record_passes(&RiskLevel::High, "risk_level", "high", &schema));
        assert!(record_passes(
            &RiskLevel::Critical,
            "risk_level",
            "high",
            &schema
        ));
        assert!(!record_passes(&RiskLevel::Low, "risk_level", "high", &schema));
    }

    #[test]
    fn test_widening_does_not_leak_to_other_selections() {
        // Only the "high" selection is widened; "critical" stays exact.
        let schema = risk_schema(true);
        assert!(record_passes(
            &RiskLevel::Critical,
            "risk_level",
            "critical",
            &schema
        ));
        assert!(!record_passes(
            &RiskLevel::High,
            "risk_level",
            "critical",
            &schema
        ));
    }
}
