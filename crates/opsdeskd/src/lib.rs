//! Opsdesk daemon library - exposes modules for testing.

pub mod config;
pub mod routes;
#[cfg(test)]
mod routes_tests;
pub mod server;
