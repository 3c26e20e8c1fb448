//! Persistence gateways for Everglen.
//!
//! [`InMemoryGateway`] is always available. With the `postgres` feature,
//! [`PostgresGateway`] stores the same data in five PostgreSQL tables via
//! Diesel, with migrations embedded in the binary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod memory;
mod seed;

pub use memory::InMemoryGateway;
pub use seed::{seed_demo_cast, DemoCast};

#[cfg(feature = "postgres")]
mod connection;
#[cfg(feature = "postgres")]
mod models;
#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "postgres")]
pub mod schema;

#[cfg(feature = "postgres")]
pub use connection::{establish_connection, run_migrations};
#[cfg(feature = "postgres")]
pub use postgres::PostgresGateway;
