//! Table operations against the hosted row-store, one trait per table so
//! flows can run against in-memory mocks in tests.

mod rest_store;

use async_trait::async_trait;
use uuid::Uuid;

use recordstrip_core::model::{DriverProfile, Expense, NewDriverProfile, NewExpense,
    NewPassenger, NewTrip, Passenger, ProfileUpdate, Trip, TripStatus};

use crate::errors::RemoteError;

pub use rest_store::{RestExpenses, RestPassengers, RestProfiles, RestRowStore, RestTrips};

/// `passengers` table operations.
#[async_trait]
pub trait PassengerStore: Send + Sync {
    /// All passengers, ordered by full name.
    async fn list(&self) -> Result<Vec<Passenger>, RemoteError>;

    /// Register a passenger. The full name is required.
    async fn create(&self, new: NewPassenger) -> Result<Passenger, RemoteError>;
}

/// `trips` table operations.
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Every trip with its embedded passenger, newest trip date first.
    async fn history(&self) -> Result<Vec<Trip>, RemoteError>;

    /// One passenger's trips, newest trip date first.
    async fn for_passenger(&self, passenger_id: Uuid) -> Result<Vec<Trip>, RemoteError>;

    /// One passenger's unpaid trips.
    async fn pending_for_passenger(&self, passenger_id: Uuid) -> Result<Vec<Trip>, RemoteError>;

    /// Record a trip. The amount must be a non-negative number.
    async fn record(&self, new: NewTrip) -> Result<Trip, RemoteError>;

    /// Flip one trip between paid and pending.
    async fn set_status(&self, trip_id: Uuid, status: TripStatus) -> Result<(), RemoteError>;

    /// Settle: mark every pending trip of this passenger as paid.
    async fn settle_passenger(&self, passenger_id: Uuid) -> Result<(), RemoteError>;
}

/// `expenses` table operations.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// One driver's expenses, newest expense date first.
    async fn for_driver(&self, driver_id: Uuid) -> Result<Vec<Expense>, RemoteError>;

    /// Record an expense. Amount and category are required.
    async fn create(&self, new: NewExpense) -> Result<Expense, RemoteError>;
}

/// `driver_profile` table operations.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// First profile row, used by the legacy single-tenant boot path.
    async fn first(&self) -> Result<Option<DriverProfile>, RemoteError>;

    async fn by_id(&self, id: Uuid) -> Result<Option<DriverProfile>, RemoteError>;

    async fn by_auth_id(&self, auth_id: Uuid) -> Result<Option<DriverProfile>, RemoteError>;

    /// Legacy credential match: `identifier` against the phone or email
    /// column, `password` against the plaintext password column. Both
    /// predicates are evaluated by the row-store, not client-side.
    async fn by_legacy_credentials(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<Option<DriverProfile>, RemoteError>;

    /// All profiles, ordered by full name (admin view).
    async fn list(&self) -> Result<Vec<DriverProfile>, RemoteError>;

    /// Register a driver (admin operation). The full name is required.
    async fn create(&self, new: NewDriverProfile) -> Result<DriverProfile, RemoteError>;

    /// Persist the hosted-auth link after a silent migration.
    async fn link_auth_id(&self, profile_id: Uuid, auth_id: Uuid) -> Result<(), RemoteError>;

    async fn update_profile(
        &self,
        profile_id: Uuid,
        update: ProfileUpdate,
    ) -> Result<(), RemoteError>;

    /// Admin access gate toggle.
    async fn set_active(&self, profile_id: Uuid, active: bool) -> Result<(), RemoteError>;

    /// Admin driver deletion.
    async fn delete(&self, profile_id: Uuid) -> Result<(), RemoteError>;
}
