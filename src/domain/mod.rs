//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `transcript` - Prompting, response sanitization, section parsing and rendering

pub mod transcript;
