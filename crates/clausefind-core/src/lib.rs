//! # ClauseFind Core
//!
//! Shared logic for ClauseFind: data models, layout-aware page-text
//! reconstruction, deterministic clause scoring with verbatim excerpts,
//! the document store abstraction, and the regex extraction helpers the
//! tool layer builds on.
//!
//! This crate contains no tokio, axum, PDF, or other application-layer
//! dependencies. Everything in it is pure and deterministic: given the
//! same inputs, every function returns the same output, byte for byte.

pub mod deadline;
pub mod fields;
pub mod layout;
pub mod models;
pub mod normalize;
pub mod notice;
pub mod scoring;
pub mod store;
