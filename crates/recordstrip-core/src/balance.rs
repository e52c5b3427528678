use std::collections::HashMap;

use uuid::Uuid;

use crate::model::{Trip, TripStatus};

/// Paid/pending totals for one passenger.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Balance {
    pub paid: f64,
    pub pending: f64,
}

impl Balance {
    pub fn total(&self) -> f64 {
        self.paid + self.pending
    }
}

/// Reduce trips into a per-passenger balance map.
///
/// A passenger with no trips is simply absent; consumers treat a missing
/// entry as a zero balance.
pub fn passenger_balances<'a, I>(trips: I) -> HashMap<Uuid, Balance>
where
    I: IntoIterator<Item = &'a Trip>,
{
    let mut balances: HashMap<Uuid, Balance> = HashMap::new();
    for trip in trips {
        let balance = balances.entry(trip.passenger_id).or_default();
        match trip.status {
            TripStatus::Paid => balance.paid += trip.amount,
            TripStatus::Pending => balance.pending += trip.amount,
        }
    }
    balances
}

/// Sum of pending amounts in `trips` (typically one passenger's rows).
pub fn pending_total<'a, I>(trips: I) -> f64
where
    I: IntoIterator<Item = &'a Trip>,
{
    trips
        .into_iter()
        .filter(|t| t.status == TripStatus::Pending)
        .map(|t| t.amount)
        .sum()
}

/// Pending balance owed to one driver, rolled up across their passengers.
///
/// Requires trips selected with the embedded passenger join; trips whose
/// passenger is missing or belongs to another driver are skipped.
pub fn driver_pending_total<'a, I>(trips: I, driver_id: Uuid) -> f64
where
    I: IntoIterator<Item = &'a Trip>,
{
    trips
        .into_iter()
        .filter(|t| t.status == TripStatus::Pending)
        .filter(|t| {
            t.passenger
                .as_ref()
                .is_some_and(|p| p.driver_id == Some(driver_id))
        })
        .map(|t| t.amount)
        .sum()
}

/// The Earnings dashboard numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EarningsSummary {
    pub total: f64,
    pub paid: f64,
    pub pending: f64,
    pub count: usize,
}

impl EarningsSummary {
    /// Average amount per trip, zero when there are no trips.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Reduce trips into the total/paid/pending/count summary.
pub fn earnings_summary<'a, I>(trips: I) -> EarningsSummary
where
    I: IntoIterator<Item = &'a Trip>,
{
    let mut summary = EarningsSummary::default();
    for trip in trips {
        summary.total += trip.amount;
        match trip.status {
            TripStatus::Paid => summary.paid += trip.amount,
            TripStatus::Pending => summary.pending += trip.amount,
        }
        summary.count += 1;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::model::Passenger;

    fn trip(passenger_id: Uuid, amount: f64, status: TripStatus) -> Trip {
        Trip {
            id: Uuid::new_v4(),
            passenger_id,
            trip_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            amount,
            status,
            notes: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
            passenger: None,
        }
    }

    fn passenger(driver_id: Option<Uuid>) -> Passenger {
        Passenger {
            id: Uuid::new_v4(),
            full_name: "Ana".into(),
            phone_number: String::new(),
            is_favorite: false,
            passenger_class: String::new(),
            avatar_url: None,
            driver_id,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn balances_split_paid_and_pending_per_passenger() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let trips = vec![
            trip(a, 50.0, TripStatus::Paid),
            trip(a, 30.0, TripStatus::Pending),
            trip(b, 20.0, TripStatus::Paid),
        ];
        let balances = passenger_balances(&trips);
        assert_eq!(balances[&a], Balance { paid: 50.0, pending: 30.0 });
        assert_eq!(balances[&b], Balance { paid: 20.0, pending: 0.0 });
        assert_eq!(balances.len(), 2);
    }

    #[test]
    fn balance_map_conserves_the_total_trip_sum() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let trips = vec![
            trip(a, 12.5, TripStatus::Paid),
            trip(a, 7.25, TripStatus::Pending),
            trip(b, 100.0, TripStatus::Pending),
            trip(b, 0.0, TripStatus::Paid),
            trip(a, 33.1, TripStatus::Paid),
        ];
        let total: f64 = trips.iter().map(|t| t.amount).sum();
        let mapped: f64 = passenger_balances(&trips)
            .values()
            .map(Balance::total)
            .sum();
        assert!((total - mapped).abs() < 1e-9);
    }

    #[test]
    fn empty_input_yields_an_empty_map() {
        assert!(passenger_balances(&[]).is_empty());
        assert_eq!(earnings_summary(&[]), EarningsSummary::default());
    }

    #[test]
    fn pending_total_ignores_paid_trips() {
        let p = Uuid::new_v4();
        let trips = vec![
            trip(p, 10.0, TripStatus::Paid),
            trip(p, 15.0, TripStatus::Pending),
            trip(p, 5.0, TripStatus::Pending),
        ];
        assert!((pending_total(&trips) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn driver_rollup_only_counts_its_own_passengers() {
        let driver = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mine = passenger(Some(driver));
        let theirs = passenger(Some(other));
        let orphan = passenger(None);

        let mut t1 = trip(mine.id, 40.0, TripStatus::Pending);
        t1.passenger = Some(mine);
        let mut t2 = trip(theirs.id, 99.0, TripStatus::Pending);
        t2.passenger = Some(theirs);
        let mut t3 = trip(orphan.id, 7.0, TripStatus::Pending);
        t3.passenger = Some(orphan);
        let t4 = trip(Uuid::new_v4(), 3.0, TripStatus::Pending); // no join

        let total = driver_pending_total(&[t1, t2, t3, t4], driver);
        assert!((total - 40.0).abs() < 1e-9);
    }

    #[test]
    fn summary_matches_the_dashboard_numbers() {
        let p = Uuid::new_v4();
        let trips = vec![
            trip(p, 50.0, TripStatus::Paid),
            trip(p, 30.0, TripStatus::Pending),
            trip(p, 20.0, TripStatus::Paid),
        ];
        let summary = earnings_summary(&trips);
        assert!((summary.total - 100.0).abs() < 1e-9);
        assert!((summary.paid - 70.0).abs() < 1e-9);
        assert!((summary.pending - 30.0).abs() < 1e-9);
        assert_eq!(summary.count, 3);
        assert!((summary.average() - 100.0 / 3.0).abs() < 1e-9);
    }
}
