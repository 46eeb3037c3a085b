//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and schedule queries into use-case APIs.
//! - Keep the HTTP and CLI layers decoupled from storage details.

pub mod calendar_service;
pub mod entry_service;
