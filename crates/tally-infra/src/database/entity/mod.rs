//! SeaORM entities.

pub mod vote;
