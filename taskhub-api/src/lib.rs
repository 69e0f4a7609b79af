//! # TaskHub API Server
//!
//! The HTTP surface of the task tracker: session-authenticated page routes
//! with form posts and redirect flows, a JSON API mirror under `/api`, and
//! the admin overview pages.
//!
//! ## Module Organization
//!
//! - `app`: Application state, session middleware, and router assembly
//! - `config`: Environment-driven configuration
//! - `error`: The API error type and its HTTP mapping
//! - `routes`: Request handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
