//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the client for the shop's REST backend.

pub mod backend;
