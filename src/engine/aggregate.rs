use std::collections::{BTreeMap, BTreeSet};

use crate::engine::{parse_created_day, DatedRecord};

pub const CARD_SERIES_NAME: &str = "Business Cards Added";
pub const LOG_SERIES_NAME: &str = "Visitor Logs Added";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesValues {
    pub name: String,
    pub values: Vec<u64>,
}

/// Chart-ready data: one label per calendar day, series values aligned to the
/// labels with zeroes where a series has no records for that day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub series: Vec<SeriesValues>,
}

/// Bucket record counts per calendar day, keyed `YYYY-MM-DD`. Records with a
/// missing or unparsable timestamp are skipped.
pub fn count_by_day<T: DatedRecord>(records: &[T]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for record in records {
        let Some(raw) = record.created_at() else {
            continue;
        };
        match parse_created_day(raw) {
            Some(day) => {
                *counts.entry(day.format("%Y-%m-%d").to_string()).or_insert(0) += 1;
            }
            None => {
                tracing::debug!(created_at = raw, "skipping record with unparsable timestamp");
            }
        }
    }
    counts
}

/// Merge the two per-day bucket maps into aligned chart series. Labels are
/// the sorted union of both key sets; lexicographic order equals
/// chronological order for the fixed-width day format.
pub fn build_chart_series(
    card_counts: &BTreeMap<String, u64>,
    log_counts: &BTreeMap<String, u64>,
) -> ChartSeries {
    let labels: Vec<String> = card_counts
        .keys()
        .chain(log_counts.keys())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .cloned()
        .collect();

    let values_for = |counts: &BTreeMap<String, u64>| -> Vec<u64> {
        labels
            .iter()
            .map(|day| counts.get(day).copied().unwrap_or(0))
            .collect()
    };

    ChartSeries {
        series: vec![
            SeriesValues {
                name: CARD_SERIES_NAME.to_string(),
                values: values_for(card_counts),
            },
            SeriesValues {
                name: LOG_SERIES_NAME.to_string(),
                values: values_for(log_counts),
            },
        ],
        labels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::StoredBusinessCard;

    fn card(id: i64, created_at: Option<&str>) -> StoredBusinessCard {
        StoredBusinessCard {
            id,
            name: None,
            title: None,
            phone: None,
            email: None,
            website: None,
            address: None,
            created_at: created_at.map(str::to_string),
        }
    }

    #[test]
    fn count_by_day_buckets_on_the_calendar_day() {
        let records = vec![
            card(1, Some("2024-01-05T09:00:00Z")),
            card(2, Some("2024-01-05T18:30:00Z")),
            card(3, Some("2024-01-07T10:00:00Z")),
        ];

        let counts = count_by_day(&records);
        assert_eq!(counts.get("2024-01-05"), Some(&2));
        assert_eq!(counts.get("2024-01-07"), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn count_by_day_skips_missing_and_unparsable_timestamps() {
        let records = vec![
            card(1, None),
            card(2, Some("never")),
            card(3, Some("2024-02-01T00:00:00Z")),
        ];

        let counts = count_by_day(&records);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get("2024-02-01"), Some(&1));
    }

    #[test]
    fn chart_series_unions_labels_and_zero_fills_the_gaps() {
        let mut cards = BTreeMap::new();
        cards.insert("2024-01-05".to_string(), 2_u64);
        let mut logs = BTreeMap::new();
        logs.insert("2024-01-07".to_string(), 3_u64);

        let chart = build_chart_series(&cards, &logs);
        assert_eq!(chart.labels, vec!["2024-01-05", "2024-01-07"]);
        assert_eq!(chart.series[0].name, CARD_SERIES_NAME);
        assert_eq!(chart.series[0].values, vec![2, 0]);
        assert_eq!(chart.series[1].name, LOG_SERIES_NAME);
        assert_eq!(chart.series[1].values, vec![0, 3]);
    }

    #[test]
    fn chart_series_labels_are_sorted_chronologically() {
        let mut cards = BTreeMap::new();
        cards.insert("2024-03-01".to_string(), 1_u64);
        cards.insert("2023-12-31".to_string(), 1_u64);
        let logs = BTreeMap::new();

        let chart = build_chart_series(&cards, &logs);
        assert_eq!(chart.labels, vec!["2023-12-31", "2024-03-01"]);
    }

    #[test]
    fn empty_inputs_produce_an_empty_chart() {
        let chart = build_chart_series(&BTreeMap::new(), &BTreeMap::new());
        assert!(chart.labels.is_empty());
        assert_eq!(chart.series[0].values, Vec::<u64>::new());
    }
}
