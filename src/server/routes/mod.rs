//! API route handlers, grouped by resource

pub mod clients;
pub mod servers;
pub mod settings;
