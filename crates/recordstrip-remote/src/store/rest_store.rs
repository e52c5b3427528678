use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use recordstrip_core::model::{DriverProfile, Expense, NewDriverProfile, NewExpense,
    NewPassenger, NewTrip, Passenger, ProfileUpdate, Trip, TripStatus};

use crate::config::RemoteConfig;
use crate::errors::RemoteError;
use crate::rest::{Query, RestClient};

use super::{ExpenseStore, PassengerStore, ProfileStore, TripStore};

const PASSENGERS: &str = "passengers";
const TRIPS: &str = "trips";
const EXPENSES: &str = "expenses";
const DRIVER_PROFILE: &str = "driver_profile";

/// The trip select with its embedded passenger join.
const TRIP_WITH_PASSENGER: &str = "*,passenger:passengers(*)";

/// One REST client per table trait, all sharing a single request layer.
pub struct RestRowStore {
    pub passengers: Arc<RestPassengers>,
    pub trips: Arc<RestTrips>,
    pub expenses: Arc<RestExpenses>,
    pub profiles: Arc<RestProfiles>,
}

impl RestRowStore {
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let client = Arc::new(RestClient::new(config)?);
        Ok(Self {
            passengers: Arc::new(RestPassengers {
                client: client.clone(),
            }),
            trips: Arc::new(RestTrips {
                client: client.clone(),
            }),
            expenses: Arc::new(RestExpenses {
                client: client.clone(),
            }),
            profiles: Arc::new(RestProfiles { client }),
        })
    }
}

fn require_amount(amount: f64) -> Result<(), RemoteError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(RemoteError::Validation(
            "amount must be a non-negative number".into(),
        ));
    }
    Ok(())
}

/// REST implementation of [`PassengerStore`].
pub struct RestPassengers {
    client: Arc<RestClient>,
}

#[async_trait]
impl PassengerStore for RestPassengers {
    async fn list(&self) -> Result<Vec<Passenger>, RemoteError> {
        self.client
            .select(PASSENGERS, Query::new().select("*").order("full_name", false))
            .await
    }

    async fn create(&self, new: NewPassenger) -> Result<Passenger, RemoteError> {
        if new.full_name.trim().is_empty() {
            return Err(RemoteError::Validation("full name is required".into()));
        }
        self.client.insert(PASSENGERS, &new).await
    }
}

/// REST implementation of [`TripStore`].
pub struct RestTrips {
    client: Arc<RestClient>,
}

#[async_trait]
impl TripStore for RestTrips {
    async fn history(&self) -> Result<Vec<Trip>, RemoteError> {
        self.client
            .select(
                TRIPS,
                Query::new()
                    .select(TRIP_WITH_PASSENGER)
                    .order("trip_date", true),
            )
            .await
    }

    async fn for_passenger(&self, passenger_id: Uuid) -> Result<Vec<Trip>, RemoteError> {
        self.client
            .select(
                TRIPS,
                Query::new()
                    .select("*")
                    .eq("passenger_id", passenger_id)
                    .order("trip_date", true),
            )
            .await
    }

    async fn pending_for_passenger(&self, passenger_id: Uuid) -> Result<Vec<Trip>, RemoteError> {
        self.client
            .select(
                TRIPS,
                Query::new()
                    .select("*")
                    .eq("passenger_id", passenger_id)
                    .eq("status", TripStatus::Pending),
            )
            .await
    }

    async fn record(&self, new: NewTrip) -> Result<Trip, RemoteError> {
        require_amount(new.amount)?;
        self.client.insert(TRIPS, &new).await
    }

    async fn set_status(&self, trip_id: Uuid, status: TripStatus) -> Result<(), RemoteError> {
        self.client
            .update(TRIPS, &json!({ "status": status }), Query::new().eq("id", trip_id))
            .await
    }

    async fn settle_passenger(&self, passenger_id: Uuid) -> Result<(), RemoteError> {
        self.client
            .update(
                TRIPS,
                &json!({ "status": TripStatus::Paid }),
                Query::new()
                    .eq("passenger_id", passenger_id)
                    .eq("status", TripStatus::Pending),
            )
            .await
    }
}

/// REST implementation of [`ExpenseStore`].
pub struct RestExpenses {
    client: Arc<RestClient>,
}

#[async_trait]
impl ExpenseStore for RestExpenses {
    async fn for_driver(&self, driver_id: Uuid) -> Result<Vec<Expense>, RemoteError> {
        self.client
            .select(
                EXPENSES,
                Query::new()
                    .select("*")
                    .eq("driver_id", driver_id)
                    .order("expense_date", true),
            )
            .await
    }

    async fn create(&self, new: NewExpense) -> Result<Expense, RemoteError> {
        require_amount(new.amount)?;
        if new.category.trim().is_empty() {
            return Err(RemoteError::Validation("category is required".into()));
        }
        self.client.insert(EXPENSES, &new).await
    }
}

/// REST implementation of [`ProfileStore`].
pub struct RestProfiles {
    client: Arc<RestClient>,
}

#[async_trait]
impl ProfileStore for RestProfiles {
    async fn first(&self) -> Result<Option<DriverProfile>, RemoteError> {
        self.client
            .select_one(DRIVER_PROFILE, Query::new().select("*"))
            .await
    }

    async fn by_id(&self, id: Uuid) -> Result<Option<DriverProfile>, RemoteError> {
        self.client
            .select_one(DRIVER_PROFILE, Query::new().select("*").eq("id", id))
            .await
    }

    async fn by_auth_id(&self, auth_id: Uuid) -> Result<Option<DriverProfile>, RemoteError> {
        self.client
            .select_one(DRIVER_PROFILE, Query::new().select("*").eq("auth_id", auth_id))
            .await
    }

    async fn by_legacy_credentials(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<Option<DriverProfile>, RemoteError> {
        self.client
            .select_one(
                DRIVER_PROFILE,
                Query::new()
                    .select("*")
                    .or_eq(&["phone_number", "email"], identifier)
                    .eq("password", password),
            )
            .await
    }

    async fn list(&self) -> Result<Vec<DriverProfile>, RemoteError> {
        self.client
            .select(
                DRIVER_PROFILE,
                Query::new().select("*").order("full_name", false),
            )
            .await
    }

    async fn create(&self, new: NewDriverProfile) -> Result<DriverProfile, RemoteError> {
        if new.full_name.trim().is_empty() {
            return Err(RemoteError::Validation("full name is required".into()));
        }
        self.client.insert(DRIVER_PROFILE, &new).await
    }

    async fn link_auth_id(&self, profile_id: Uuid, auth_id: Uuid) -> Result<(), RemoteError> {
        self.client
            .update(
                DRIVER_PROFILE,
                &json!({ "auth_id": auth_id }),
                Query::new().eq("id", profile_id),
            )
            .await
    }

    async fn update_profile(
        &self,
        profile_id: Uuid,
        update: ProfileUpdate,
    ) -> Result<(), RemoteError> {
        if update.full_name.trim().is_empty() {
            return Err(RemoteError::Validation("full name is required".into()));
        }
        self.client
            .update(DRIVER_PROFILE, &update, Query::new().eq("id", profile_id))
            .await
    }

    async fn set_active(&self, profile_id: Uuid, active: bool) -> Result<(), RemoteError> {
        self.client
            .update(
                DRIVER_PROFILE,
                &json!({ "is_active": active }),
                Query::new().eq("id", profile_id),
            )
            .await
    }

    async fn delete(&self, profile_id: Uuid) -> Result<(), RemoteError> {
        self.client
            .delete(DRIVER_PROFILE, Query::new().eq("id", profile_id))
            .await
    }
}
