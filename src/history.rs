//! Ride-history helpers: the year/month filter and per-day grouping the
//! history screen renders.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::backend::FinishedRide;

/// Year and month picked in the history filter. Rides are only filtered when
/// BOTH are selected; a partial selection shows everything.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HistoryFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl HistoryFilter {
    fn matches(&self, date: NaiveDate) -> bool {
        match (self.year, self.month) {
            (Some(year), Some(month)) => date.year() == year && date.month() == month,
            _ => true,
        }
    }
}

/// Distinct years present in the history, ascending.
pub fn distinct_years(rides: &[FinishedRide]) -> Vec<i32> {
    let mut years: Vec<i32> = rides.iter().map(|ride| ride.departed_at.year()).collect();
    years.sort_unstable();
    years.dedup();
    years
}

/// Distinct months present in the history, ascending.
pub fn distinct_months(rides: &[FinishedRide]) -> Vec<u32> {
    let mut months: Vec<u32> = rides.iter().map(|ride| ride.departed_at.month()).collect();
    months.sort_unstable();
    months.dedup();
    months
}

/// Apply the year/month filter.
pub fn filter_rides(rides: &[FinishedRide], filter: HistoryFilter) -> Vec<FinishedRide> {
    rides
        .iter()
        .filter(|ride| filter.matches(ride.departed_at.date()))
        .cloned()
        .collect()
}

/// Group rides by departure day, oldest day first.
pub fn group_by_day(rides: &[FinishedRide]) -> BTreeMap<NaiveDate, Vec<FinishedRide>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<FinishedRide>> = BTreeMap::new();
    for ride in rides {
        grouped
            .entry(ride.departed_at.date())
            .or_default()
            .push(ride.clone());
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn ride(id: i64, departed: &str) -> FinishedRide {
        serde_json::from_str(&format!(
            r#"{{"IdCorrida": {id}, "hr_saida": "{departed}", "endereco": "Rua A"}}"#
        ))
        .unwrap()
    }

    fn sample() -> Vec<FinishedRide> {
        vec![
            ride(1, "2024-05-03T08:00:00"),
            ride(2, "2024-05-03T19:30:00"),
            ride(3, "2024-06-10T12:00:00"),
            ride(4, "2023-12-24T22:00:00"),
        ]
    }

    #[test]
    fn years_and_months_are_distinct_and_sorted() {
        let rides = sample();
        assert_eq!(distinct_years(&rides), vec![2023, 2024]);
        assert_eq!(distinct_months(&rides), vec![5, 6, 12]);
    }

    #[test]
    fn partial_selection_shows_everything() {
        let rides = sample();
        let only_year = HistoryFilter {
            year: Some(2024),
            month: None,
        };
        assert_eq!(filter_rides(&rides, only_year).len(), 4);
        assert_eq!(filter_rides(&rides, HistoryFilter::default()).len(), 4);
    }

    #[test]
    fn full_selection_filters_by_year_and_month() {
        let rides = sample();
        let filter = HistoryFilter {
            year: Some(2024),
            month: Some(5),
        };
        let filtered = filter_rides(&rides, filter);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.departed_at.month() == 5));
    }

    #[test]
    fn grouping_collects_same_day_rides() {
        let grouped = group_by_day(&sample());
        assert_eq!(grouped.len(), 3);
        let may_third = NaiveDateTime::parse_from_str("2024-05-03T00:00:00", "%Y-%m-%dT%H:%M:%S")
            .unwrap()
            .date();
        assert_eq!(grouped[&may_third].len(), 2);
        // BTreeMap iterates oldest day first.
        assert_eq!(grouped.keys().next().unwrap().year(), 2023);
    }
}
