//! Sponsor rotation library
//!
//! Loads a sponsor catalog through a TTL cache and rotates which sponsors are shown
//! based only on the current UTC time.

pub mod cache;
pub mod cli;
pub mod clock;
pub mod data;
pub mod rotation;
