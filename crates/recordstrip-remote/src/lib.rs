//! Typed async clients for the hosted services RecordsTrip consumes: the
//! row-store (filtered table reads/writes) and the authentication service
//! (password sign-in, sign-up, session), plus the login identity resolver
//! that reconciles the legacy credential rows with hosted-auth identities.
//!
//! Every remote seam is a trait (`PassengerStore`, `TripStore`,
//! `ExpenseStore`, `ProfileStore`, `AuthService`) with one REST
//! implementation, so flows are testable against in-memory mocks.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use recordstrip_remote::{LoginOutcome, LoginResolver, RemoteConfig, RestAuthClient,
//!     RestRowStore};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), recordstrip_remote::RemoteError> {
//! let config = RemoteConfig::from_env()?;
//! let store = RestRowStore::new(config.clone())?;
//! let auth = Arc::new(RestAuthClient::new(config)?);
//!
//! let resolver = LoginResolver::new(store.profiles.clone(), auth);
//! match resolver.resolve("driver@x.com", "secret").await? {
//!     LoginOutcome::Authenticated(profile) => println!("welcome {}", profile.full_name),
//!     LoginOutcome::Rejected(rejection) => eprintln!("{}", rejection.message()),
//! }
//! # Ok(())
//! # }
//! ```

/// Hosted authentication client and session types.
pub mod auth;
/// Local driver-profile snapshot cache.
pub mod cache;
/// Client configuration (base URL, API key, timeout).
pub mod config;
/// Public error types used by the remote clients.
pub mod errors;
/// Dual-mode login reconciliation.
pub mod login;
/// Low-level row-store request plumbing.
mod rest;
/// Explicit per-login driver context.
pub mod session;
/// Table operation traits and their REST implementation.
pub mod store;
/// WhatsApp deep-link builders.
pub mod whatsapp;

pub use auth::{AuthService, AuthSession, AuthUser, RestAuthClient};
pub use cache::ProfileCache;
pub use config::RemoteConfig;
pub use errors::RemoteError;
pub use login::{LoginOutcome, LoginRejection, LoginResolver};
pub use session::DriverSession;
pub use store::{ExpenseStore, PassengerStore, ProfileStore, RestRowStore, TripStore};
