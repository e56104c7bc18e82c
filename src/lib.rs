//! ClassHub Backend Library
//!
//! Exposes the authentication modules for the server binary and tests.

pub mod auth;
pub mod config;
