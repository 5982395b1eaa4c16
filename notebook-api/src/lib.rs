//! # Notebook API Server Library
//!
//! HTTP surface for the notebook collaboration backend: users, notes,
//! workspaces, follows, views, invitations, archive and stats.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Validating extractors and caller identity
//! - `middleware`: Security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
