//! Aggregate risk counts for the dashboard's summary cards.

use crate::core::{RiskLevel, Student};

/// Per-level student counts, computed from the full (unfiltered) roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiskSummary {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub unknown: usize,
}

impl RiskSummary {
    pub fn from_students<'a>(students: impl IntoIterator<Item = &'a Student>) -> Self {
        let mut summary = Self::default();
        for student in students {
            match student.risk_level {
                RiskLevel::Critical => summary.critical += 1,
                RiskLevel::High => summary.high += 1,
                RiskLevel::Medium => summary.medium += 1,
                RiskLevel::Low => summary.low += 1,
                RiskLevel::Unknown => summary.unknown += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low + self.unknown
    }

    /// The "high risk" card figure. Whether critical students are folded in
    /// is the per-view widening choice from configuration, same knob the
    /// list filter uses.
    pub fn high_risk_total(&self, widen_high: bool) -> usize {
        if widen_high {
            self.high + self.critical
        } else {
            self.high
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(risk: RiskLevel) -> Student {
        Student {
            id: 0,
            name: String::new(),
            email: String::new(),
            year: None,
            department: None,
            gpa: None,
            risk_level: risk,
            advisor_id: None,
        }
    }

    #[test]
    fn test_counts_by_level() {
        let students = vec![
            student(RiskLevel::Critical),
            student(RiskLevel::High),
            student(RiskLevel::High),
            student(RiskLevel::Low),
        ];
        let summary = RiskSummary::from_students(&students);
        assert_eq!(summary.critical, 1);
        assert_eq!(summary.high, 2);
        assert_eq!(summary.low, 1);
        assert_eq!(summary.total(), 4);
    }

    #[test]
    fn test_high_risk_card_respects_widening() {
        let students = vec![
            student(RiskLevel::Critical),
            student(RiskLevel::High),
            student(RiskLevel::Medium),
        ];
        let summary = RiskSummary::from_students(&students);
        assert_eq!(summary.high_risk_total(false), 1);
        assert_eq!(summary.high_risk_total(true), 2);
    }
}
