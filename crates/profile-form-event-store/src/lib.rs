//! In-memory event store and submit gateway for the profile form.

pub mod in_memory_event_repository;
pub mod simulated_submit_gateway;
