//! Domain model and aggregation engine for RecordsTrip.
//!
//! Everything here is pure and synchronous: the row types mirrored from the
//! hosted tables, plus the reductions that turn already-fetched rows into
//! per-passenger balances, time-bucketed chart series, and grouped trip
//! history. Remote access lives in `recordstrip-remote`.

/// Per-passenger paid/pending balances and earnings summaries.
pub mod balance;
/// Time-bucketed income/expense chart series.
pub mod chart;
/// Calendar helpers: Monday-first weekday indexing, month arithmetic.
pub mod date;
/// Trip history grouped per passenger.
pub mod history;
/// Row types mirrored from the hosted tables.
pub mod model;
/// Process-wide tracing bootstrap.
pub mod observability;

pub use balance::{Balance, EarningsSummary, driver_pending_total, earnings_summary,
    passenger_balances, pending_total};
pub use chart::{ChartBucket, ChartWindow, build_chart};
pub use history::{TripGroup, group_trips};
pub use model::{DocumentKind, DriverProfile, Expense, NewDriverProfile, NewExpense,
    NewPassenger, NewTrip, Passenger, ProfileDocuments, ProfileUpdate, Trip, TripStatus};
