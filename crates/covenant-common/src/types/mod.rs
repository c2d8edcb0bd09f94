//! Core data types for the Covenant lending protocol

pub mod keys;
pub mod loan;
pub mod money;
pub mod offer;
pub mod tracker;
