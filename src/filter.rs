//! List filters parsed from query parameters.

use crate::model::Item;
use crate::validation::FieldErrors;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::HashMap;

/// Item list filter. Empty query values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub category: Option<String>,
    /// Compared verbatim; an unknown status simply matches nothing.
    pub stock_status: Option<String>,
    /// Inclusive `created_at` bounds.
    pub created_between: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl ItemFilter {
    /// `start_date` and `end_date` must be supplied together.
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, FieldErrors> {
        let get = |key: &str| query.get(key).filter(|v| !v.is_empty()).cloned();
        let mut errors = FieldErrors::default();
        let start = get("start_date");
        let end = get("end_date");
        let created_between = match (start, end) {
            (None, None) => None,
            (Some(_), None) => {
                errors.add("end_date", "This parameter is required when start_date is given.");
                None
            }
            (None, Some(_)) => {
                errors.add("start_date", "This parameter is required when end_date is given.");
                None
            }
            (Some(start), Some(end)) => {
                let from = parse_bound(start.trim());
                let to = parse_bound(end.trim());
                if from.is_none() {
                    errors.add("start_date", INVALID_DATE);
                }
                if to.is_none() {
                    errors.add("end_date", INVALID_DATE);
                }
                from.zip(to)
            }
        };
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ItemFilter {
            category: get("category"),
            stock_status: get("stock_status"),
            created_between,
        })
    }

    pub fn matches(&self, item: &Item) -> bool {
        self.category.as_deref().map_or(true, |c| item.category == c)
            && self
                .stock_status
                .as_deref()
                .map_or(true, |s| item.stock_status.as_str() == s)
            && self
                .created_between
                .map_or(true, |(from, to)| item.created_at >= from && item.created_at <= to)
    }
}

const INVALID_DATE: &str =
    "Enter a valid date (YYYY-MM-DD) or date-time (RFC 3339).";

/// Accepts RFC 3339, a naive date-time (taken as UTC), or a bare date.
/// A bare date means midnight UTC on either end, so an end date excludes the rest of that day.
fn parse_bound(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc());
        }
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    date.and_hms_opt(0, 0, 0).map(|t| t.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StockStatus;
    use chrono::TimeZone;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn item(category: &str, status: StockStatus, created_at: DateTime<Utc>) -> Item {
        Item {
            id: 1,
            sku: "S".into(),
            name: "n".into(),
            category: category.into(),
            tags: String::new(),
            stock_status: status,
            available_stock: 1,
            created_at,
        }
    }

    #[test]
    fn empty_query_matches_everything() {
        let filter = ItemFilter::from_query(&HashMap::new()).unwrap();
        assert_eq!(filter, ItemFilter::default());
        assert!(filter.matches(&item("A", StockStatus::OutOfStock, Utc::now())));
    }

    #[test]
    fn empty_values_are_ignored() {
        let filter = ItemFilter::from_query(&query(&[("category", ""), ("stock_status", "")]))
            .unwrap();
        assert_eq!(filter, ItemFilter::default());
    }

    #[test]
    fn padded_values_are_kept_verbatim() {
        let filter = ItemFilter::from_query(&query(&[("category", " Electronics ")])).unwrap();
        assert_eq!(filter.category.as_deref(), Some(" Electronics "));
        assert!(!filter.matches(&item("Electronics", StockStatus::InStock, Utc::now())));
    }

    #[test]
    fn exact_category_and_status() {
        let filter = ItemFilter::from_query(&query(&[
            ("category", "Clothing"),
            ("stock_status", "in_stock"),
        ]))
        .unwrap();
        let now = Utc::now();
        assert!(filter.matches(&item("Clothing", StockStatus::InStock, now)));
        assert!(!filter.matches(&item("Clothing", StockStatus::OutOfStock, now)));
        assert!(!filter.matches(&item("clothing", StockStatus::InStock, now)));
    }

    #[test]
    fn single_date_bound_is_rejected() {
        let errors = ItemFilter::from_query(&query(&[("start_date", "2024-01-01")])).unwrap_err();
        assert!(errors.contains("end_date"));
        let errors = ItemFilter::from_query(&query(&[("end_date", "2024-01-01")])).unwrap_err();
        assert!(errors.contains("start_date"));
    }

    #[test]
    fn unparseable_dates_are_rejected() {
        let errors = ItemFilter::from_query(&query(&[
            ("start_date", "yesterday"),
            ("end_date", "2024-01-01"),
        ]))
        .unwrap_err();
        assert!(errors.contains("start_date"));
        assert!(!errors.contains("end_date"));
    }

    #[test]
    fn bare_dates_are_midnight_on_both_ends() {
        let filter = ItemFilter::from_query(&query(&[
            ("start_date", "2024-03-01"),
            ("end_date", "2024-03-02"),
        ]))
        .unwrap();
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        assert_eq!(filter.created_between, Some((start, end)));
        let later_on_end_day = Utc.with_ymd_and_hms(2024, 3, 2, 23, 30, 0).unwrap();
        assert!(filter.matches(&item("A", StockStatus::InStock, start)));
        assert!(filter.matches(&item("A", StockStatus::InStock, end)));
        assert!(!filter.matches(&item("A", StockStatus::InStock, later_on_end_day)));
    }

    #[test]
    fn accepts_rfc3339_bounds() {
        let filter = ItemFilter::from_query(&query(&[
            ("start_date", "2024-03-01T10:00:00+02:00"),
            ("end_date", "2024-03-01 12:00:00"),
        ]))
        .unwrap();
        let (from, to) = filter.created_between.unwrap();
        assert_eq!(from, Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap());
        assert_eq!(to, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    }
}
