//! External system adapters.

pub mod api;
