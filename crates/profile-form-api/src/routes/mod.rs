//! Route modules: health, the JSON form API and the rendered page.

pub mod forms;
pub mod health;
pub mod page;
