//! Domain layer for the profile form.

pub mod aggregates;
pub mod commands;
pub mod events;
pub mod select;
pub mod summary;
pub mod validation;
pub mod values;
