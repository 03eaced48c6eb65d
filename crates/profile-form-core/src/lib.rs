//! Shared domain abstractions for the profile form.
//!
//! This crate defines the traits and types the form context and its
//! adapters depend on. It contains no infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod gateway;
pub mod repository;
