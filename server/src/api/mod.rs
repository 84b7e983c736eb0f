//! HTTP API handlers.

pub mod auth;
pub mod movies;
pub mod reservations;
