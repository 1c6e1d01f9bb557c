//! Named integer sequences stored in `sys_counters`

pub mod repository;

pub use repository::{allocate, allocate_display_id};
#[cfg(test)]
pub use repository::current_value;
