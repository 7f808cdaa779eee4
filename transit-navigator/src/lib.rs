//! Transit navigator server.
//!
//! Finds Winnipeg Transit stops by name, number or proximity, reads their
//! live schedules, and turns trip itineraries into drawable paths.

pub mod domain;
pub mod geolocation;
pub mod resolve;
pub mod session;
pub mod upstream;
pub mod web;
