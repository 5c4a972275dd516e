//! Daily Dashboard - a one-page news digest
//!
//! This crate fetches a fixed table of RSS feeds grouped by category and
//! renders their latest headlines into a single HTML page with client-side
//! filter pills and collapsible sections.

pub mod config;
pub mod dashboard;
pub mod fetcher;
pub mod registry;
pub mod routes;
pub mod view;
