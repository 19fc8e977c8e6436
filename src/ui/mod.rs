//! # User Interface Module
//!
//! The web-facing side of the crate: `routes` holds the Actix handlers and the
//! server bootstrap, `templates` builds the HTML pages they return.

pub mod routes;
pub mod templates;
