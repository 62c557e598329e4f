//! Single-user record manager for funding opportunities: a flat grant
//! collection persisted as one JSON document, with a multi-predicate
//! filter engine, a validating CSV bulk-import pipeline, and a small
//! mutation API on top.

pub mod config;
pub mod error;
pub mod grants;
pub mod telemetry;
