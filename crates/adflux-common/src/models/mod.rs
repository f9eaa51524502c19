//! Domain models shared across AdFlux services.
//!
//! These are the types the database rows decode into and the API serializes.

pub mod ad;

pub use ad::*;
