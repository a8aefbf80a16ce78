//! Protocol driver for the calendar pipeline resource.
//!
//! `check`, `in` and `out` each read one JSON request, talk to the configured
//! calendar backend and write one JSON response.

pub mod backend;
pub mod commands;
pub mod logging;
pub mod settings;
