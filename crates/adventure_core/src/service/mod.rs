//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate codec, predicate building and repository calls into
//!   page-level APIs.
//! - Keep CLI callers decoupled from storage details.

pub mod catalog_service;
