//! Classroom Lens - Classroom dialogue analysis
//!
//! This crate turns a classroom dialogue transcript into a structured,
//! multi-stage analysis and follow-up teaching insights through an LLM
//! completion API, and serves both as a JSON API and a server-rendered
//! workbench page.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
