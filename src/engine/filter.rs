use std::borrow::Cow;

use chrono::NaiveDate;

use crate::engine::{parse_created_day, DatedRecord};

/// Inclusive calendar-day bounds; an absent bound is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.start.is_none_or(|start| day >= start) && self.end.is_none_or(|end| day <= end)
    }
}

/// Keep records whose `created_at` calendar day falls within `range`.
/// Records with a missing or unparsable timestamp are dropped. An unbounded
/// range returns the input borrowed, untouched.
pub fn filter_by_date<'a, T>(records: &'a [T], range: &DateRange) -> Cow<'a, [T]>
where
    T: DatedRecord + Clone,
{
    if range.is_unbounded() {
        return Cow::Borrowed(records);
    }

    let kept: Vec<T> = records
        .iter()
        .filter(|record| {
            record
                .created_at()
                .and_then(parse_created_day)
                .is_some_and(|day| range.contains_day(day))
        })
        .cloned()
        .collect();
    Cow::Owned(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::StoredVisitorLog;

    fn log(id: i64, created_at: Option<&str>) -> StoredVisitorLog {
        StoredVisitorLog {
            id,
            batch_id: "batch-1".to_string(),
            date_str: None,
            visitor_name: None,
            address: None,
            time_in: None,
            time_out: None,
            created_at: created_at.map(str::to_string),
        }
    }

    fn day(year: i32, month: u32, dom: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, dom).expect("date should construct")
    }

    #[test]
    fn unbounded_range_returns_the_input_by_reference() {
        let records = vec![log(1, Some("2024-01-05T10:00:00Z")), log(2, None)];
        let filtered = filter_by_date(&records, &DateRange::default());

        assert!(matches!(filtered, Cow::Borrowed(_)));
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn start_bound_drops_earlier_days_inclusively() {
        let records = vec![
            log(1, Some("2024-01-05T10:00:00Z")),
            log(2, Some("2024-01-07T10:00:00Z")),
        ];
        let range = DateRange {
            start: Some(day(2024, 1, 6)),
            end: None,
        };

        let filtered = filter_by_date(&records, &range);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 2);
    }

    #[test]
    fn bounds_are_inclusive_on_both_sides() {
        let records = vec![
            log(1, Some("2024-01-05T23:59:59Z")),
            log(2, Some("2024-01-06T00:00:00Z")),
            log(3, Some("2024-01-08T00:00:00Z")),
        ];
        let range = DateRange {
            start: Some(day(2024, 1, 5)),
            end: Some(day(2024, 1, 6)),
        };

        let filtered = filter_by_date(&records, &range);
        let ids: Vec<i64> = filtered.iter().map(|record| record.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn missing_or_unparsable_timestamps_are_dropped_when_bounded() {
        let records = vec![
            log(1, None),
            log(2, Some("not a date")),
            log(3, Some("2024-01-06T12:00:00Z")),
        ];
        let range = DateRange {
            start: Some(day(2024, 1, 1)),
            end: Some(day(2024, 12, 31)),
        };

        let filtered = filter_by_date(&records, &range);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 3);
    }

    #[test]
    fn filtering_is_idempotent_for_a_fixed_range() {
        let records = vec![
            log(1, Some("2024-01-05T10:00:00Z")),
            log(2, Some("2024-01-07T10:00:00Z")),
        ];
        let range = DateRange {
            start: Some(day(2024, 1, 6)),
            end: None,
        };

        let once = filter_by_date(&records, &range).into_owned();
        let twice = filter_by_date(&once, &range).into_owned();
        assert_eq!(once, twice);
    }
}
