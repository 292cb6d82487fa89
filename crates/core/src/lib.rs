//! Moonbeam
//!
//! Moonbeam is the ordering engine behind the Moonbeam Cafe storefront: drink customization,
//! pricing, carts, checkout and order tracking.

pub mod cart;
pub mod catalog;
pub mod clock;
pub mod customization;
pub mod ids;
pub mod naming;
pub mod orders;
pub mod payment;
pub mod prelude;
pub mod pricing;
pub mod receipt;
pub mod rewards;
