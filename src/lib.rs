//! JWT authentication lab server.
//!
//! A deliberately weak HTTP API used as a security-training target: the
//! default signing secret is hardcoded, passwords are compared in plaintext,
//! CORS is open and the user table lives in memory.

pub mod config;
pub mod web;
