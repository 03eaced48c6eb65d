//! Personal details form.
//!
//! Owns the form's field values, validation rules, the repeatable tech
//! stack list, the submission lifecycle and the post-submit summary.

pub mod application;
pub mod domain;
