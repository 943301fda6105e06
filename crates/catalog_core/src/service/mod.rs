//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into mapping-level use cases.
//! - Keep transport layers decoupled from storage details.

pub mod product_service;
