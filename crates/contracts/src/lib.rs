//! Types shared between the tailor shop backend and its API clients.

pub mod domain;
pub mod shared;
pub mod system;
