//! HTTP routes

pub mod analytics;
