pub mod auth;
pub mod handlers;
pub mod middleware;
pub mod sys_counter;
pub mod tracing;
pub mod users;
