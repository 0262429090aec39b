//! Configuration bridge: JSON models, endpoint locations and the service contract for the
//! shortcut, settings and icon-catalog endpoints served next to the shell.

pub mod endpoints;
pub mod models;
pub mod service;
