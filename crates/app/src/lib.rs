//! Moonbeam ordering application: sessions, checkout and the services they depend on.

pub mod config;
pub mod errors;
pub mod identity;
pub mod loyalty;
pub mod observability;
pub mod payments;
pub mod persistence;
pub mod session;
