use chrono::NaiveDate;

use super::domain::{CallStatus, Grant, GrantType, Order, UsmStatus};

/// User-entered criteria, AND-combined across fields. Unset fields match
/// every record, so the default filter is a pass-through.
#[derive(Debug, Default, Clone)]
pub struct GrantFilter {
    /// Case-insensitive substring matched against name, entity, or sector.
    pub search_term: String,
    pub order: Option<Order>,
    pub grant_type: Option<GrantType>,
    pub call_status: Option<CallStatus>,
    pub usm_status: Option<UsmStatus>,
    /// Inclusive bounds kept as raw user input; values that do not parse as
    /// numbers are ignored rather than rejected.
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
    /// Inclusive calendar-date bounds on the deadline.
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl GrantFilter {
    fn matches(&self, grant: &Grant) -> bool {
        let needle = self.search_term.trim().to_lowercase();
        if !needle.is_empty() {
            let hit = [&grant.name, &grant.entity, &grant.sector]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if self.order.is_some_and(|want| want != grant.order) {
            return false;
        }
        if self.grant_type.is_some_and(|want| want != grant.grant_type) {
            return false;
        }
        if self.call_status.is_some_and(|want| want != grant.call_status) {
            return false;
        }
        if self.usm_status.is_some_and(|want| want != grant.usm_status) {
            return false;
        }

        if let Some(min) = amount_bound(self.min_amount.as_deref()) {
            if grant.amount < min {
                return false;
            }
        }
        if let Some(max) = amount_bound(self.max_amount.as_deref()) {
            if grant.amount > max {
                return false;
            }
        }

        if let Some(start) = self.start_date {
            if grant.deadline < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if grant.deadline > end {
                return false;
            }
        }

        true
    }
}

fn amount_bound(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| !value.is_nan())
}

/// Pure filter pass: records satisfying every criterion, sorted ascending by
/// deadline. Stable sort, so equal deadlines keep their collection order.
pub fn filter_grants(grants: &[Grant], filter: &GrantFilter) -> Vec<Grant> {
    let mut matched: Vec<Grant> = grants
        .iter()
        .filter(|grant| filter.matches(grant))
        .cloned()
        .collect();
    matched.sort_by_key(|grant| grant.deadline);
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grants::domain::{Currency, GrantDraft, GrantId, RequirementStatus};

    fn grant(name: &str, entity: &str, amount: f64, deadline: &str) -> Grant {
        GrantDraft {
            name: name.to_string(),
            entity: entity.to_string(),
            order: Order::default(),
            grant_type: GrantType::default(),
            sector: "Education".to_string(),
            components: String::new(),
            amount,
            currency: Currency::default(),
            meets_requirements: RequirementStatus::default(),
            missing_requirements: String::new(),
            deadline: deadline.parse().expect("valid date"),
            link: String::new(),
            call_status: CallStatus::default(),
            usm_status: UsmStatus::default(),
        }
        .into_grant(GrantId::new())
    }

    fn sample() -> Vec<Grant> {
        vec![
            grant("Innovation Fund", "Acme Trust", 100.0, "2025-06-01"),
            grant("Rural Scholarship", "Campo Org", 50.0, "2025-01-01"),
        ]
    }

    #[test]
    fn default_filter_returns_everything_sorted_by_deadline() {
        let grants = sample();
        let result = filter_grants(&grants, &GrantFilter::default());
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Rural Scholarship");
        assert_eq!(result[1].name, "Innovation Fund");
    }

    #[test]
    fn min_amount_keeps_only_records_at_or_above_the_bound() {
        let grants = sample();
        let filter = GrantFilter {
            min_amount: Some("75".to_string()),
            ..GrantFilter::default()
        };
        let result = filter_grants(&grants, &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Innovation Fund");
    }

    #[test]
    fn inverted_amount_range_yields_the_empty_sequence() {
        let filter = GrantFilter {
            min_amount: Some("100".to_string()),
            max_amount: Some("50".to_string()),
            ..GrantFilter::default()
        };
        assert!(filter_grants(&sample(), &filter).is_empty());
    }

    #[test]
    fn unparseable_amount_bounds_are_ignored() {
        let filter = GrantFilter {
            min_amount: Some("abc".to_string()),
            max_amount: Some(String::new()),
            ..GrantFilter::default()
        };
        assert_eq!(filter_grants(&sample(), &filter).len(), 2);
    }

    #[test]
    fn search_matches_name_entity_or_sector_case_insensitively() {
        let grants = sample();
        for term in ["RURAL", "campo", "education"] {
            let filter = GrantFilter {
                search_term: term.to_string(),
                ..GrantFilter::default()
            };
            assert!(
                !filter_grants(&grants, &filter).is_empty(),
                "term {term:?} should match"
            );
        }

        let filter = GrantFilter {
            search_term: "nowhere".to_string(),
            ..GrantFilter::default()
        };
        assert!(filter_grants(&grants, &filter).is_empty());
    }

    #[test]
    fn date_bounds_are_inclusive_calendar_dates() {
        let grants = sample();
        let filter = GrantFilter {
            start_date: Some("2025-01-01".parse().unwrap()),
            end_date: Some("2025-01-01".parse().unwrap()),
            ..GrantFilter::default()
        };
        let result = filter_grants(&grants, &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Rural Scholarship");
    }

    #[test]
    fn enum_criteria_require_exact_matches() {
        let mut grants = sample();
        grants[0].call_status = CallStatus::Closed;
        let filter = GrantFilter {
            call_status: Some(CallStatus::Closed),
            ..GrantFilter::default()
        };
        let result = filter_grants(&grants, &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Innovation Fund");
    }
}
