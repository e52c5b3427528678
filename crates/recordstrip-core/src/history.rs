use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::model::{Passenger, Trip, TripStatus};

/// One passenger's row in the grouped history view.
///
/// `passenger` is absent when the joined row was deleted; the group still
/// exists, keyed by the stale `passenger_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct TripGroup {
    pub passenger_id: Uuid,
    pub passenger: Option<Passenger>,
    /// Sum over every trip in the group, paid and pending alike.
    pub total_amount: f64,
    pub latest_trip_date: NaiveDate,
    pub latest_created_at: DateTime<Utc>,
    pub has_pending_trip: bool,
    pub trip_ids: Vec<Uuid>,
}

impl TripGroup {
    /// Name to render for the group.
    pub fn display_name(&self) -> &str {
        self.passenger
            .as_ref()
            .map(|p| p.full_name.as_str())
            .unwrap_or("Desconhecido")
    }
}

/// Group trips per passenger, newest group first.
///
/// Groups are ordered descending by `latest_trip_date`; ties keep the
/// encounter order of the input (the sort is stable).
pub fn group_trips(trips: &[Trip]) -> Vec<TripGroup> {
    let mut groups: Vec<TripGroup> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for trip in trips {
        let slot = match index.get(&trip.passenger_id) {
            Some(&i) => i,
            None => {
                index.insert(trip.passenger_id, groups.len());
                groups.push(TripGroup {
                    passenger_id: trip.passenger_id,
                    passenger: trip.passenger.clone(),
                    total_amount: 0.0,
                    latest_trip_date: trip.trip_date,
                    latest_created_at: trip.created_at,
                    has_pending_trip: false,
                    trip_ids: Vec::new(),
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[slot];
        group.total_amount += trip.amount;
        group.trip_ids.push(trip.id);
        if trip.status == TripStatus::Pending {
            group.has_pending_trip = true;
        }
        if trip.trip_date > group.latest_trip_date {
            group.latest_trip_date = trip.trip_date;
        }
        if trip.created_at > group.latest_created_at {
            group.latest_created_at = trip.created_at;
        }
        if group.passenger.is_none() {
            group.passenger = trip.passenger.clone();
        }
    }

    groups.sort_by(|a, b| b.latest_trip_date.cmp(&a.latest_trip_date));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn passenger(name: &str) -> Passenger {
        Passenger {
            id: Uuid::new_v4(),
            full_name: name.into(),
            phone_number: String::new(),
            is_favorite: false,
            passenger_class: String::new(),
            avatar_url: None,
            driver_id: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn trip(
        passenger: Option<&Passenger>,
        passenger_id: Uuid,
        amount: f64,
        status: TripStatus,
        date: NaiveDate,
        hour: u32,
    ) -> Trip {
        Trip {
            id: Uuid::new_v4(),
            passenger_id,
            trip_date: date,
            amount,
            status,
            notes: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
            passenger: passenger.cloned(),
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn groups_keep_totals_latest_dates_and_pending_flags() {
        let a = passenger("Ana");
        let b = passenger("Bruno");
        let trips = vec![
            trip(Some(&a), a.id, 50.0, TripStatus::Paid, d(2024, 1, 1), 8),
            trip(Some(&a), a.id, 30.0, TripStatus::Pending, d(2024, 1, 3), 9),
            trip(Some(&b), b.id, 20.0, TripStatus::Paid, d(2024, 1, 2), 10),
        ];
        let groups = group_trips(&trips);

        assert_eq!(groups.len(), 2);
        // Ana has the most recent trip date and sorts first.
        assert_eq!(groups[0].display_name(), "Ana");
        assert!((groups[0].total_amount - 80.0).abs() < 1e-9);
        assert!(groups[0].has_pending_trip);
        assert_eq!(groups[0].latest_trip_date, d(2024, 1, 3));
        assert_eq!(groups[0].trip_ids.len(), 2);

        assert_eq!(groups[1].display_name(), "Bruno");
        assert!((groups[1].total_amount - 20.0).abs() < 1e-9);
        assert!(!groups[1].has_pending_trip);
    }

    #[test]
    fn missing_passenger_still_forms_a_group() {
        let ghost_id = Uuid::new_v4();
        let trips = vec![trip(None, ghost_id, 15.0, TripStatus::Pending, d(2024, 2, 1), 8)];
        let groups = group_trips(&trips);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].passenger_id, ghost_id);
        assert!(groups[0].passenger.is_none());
        assert_eq!(groups[0].display_name(), "Desconhecido");
    }

    #[test]
    fn grouping_is_idempotent_over_a_flattened_result() {
        let a = passenger("Ana");
        let b = passenger("Bruno");
        let trips = vec![
            trip(Some(&a), a.id, 50.0, TripStatus::Paid, d(2024, 1, 1), 8),
            trip(Some(&b), b.id, 20.0, TripStatus::Paid, d(2024, 1, 2), 9),
            trip(Some(&a), a.id, 30.0, TripStatus::Pending, d(2024, 1, 3), 10),
        ];
        let groups = group_trips(&trips);

        // Flatten back to the original trips in group order, then regroup.
        let by_id: HashMap<Uuid, &Trip> = trips.iter().map(|t| (t.id, t)).collect();
        let flattened: Vec<Trip> = groups
            .iter()
            .flat_map(|g| g.trip_ids.iter().map(|id| by_id[id].clone()))
            .collect();
        let regrouped = group_trips(&flattened);

        assert_eq!(groups, regrouped);
    }

    #[test]
    fn equal_dates_keep_encounter_order() {
        let a = passenger("Ana");
        let b = passenger("Bruno");
        let same_day = d(2024, 3, 5);
        let trips = vec![
            trip(Some(&a), a.id, 10.0, TripStatus::Paid, same_day, 8),
            trip(Some(&b), b.id, 12.0, TripStatus::Paid, same_day, 9),
        ];
        let groups = group_trips(&trips);
        assert_eq!(groups[0].display_name(), "Ana");
        assert_eq!(groups[1].display_name(), "Bruno");
    }
}
