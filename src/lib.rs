//! standin — a persona-driven auto-reply service for Instagram-style DMs.
//!
//! Single Rust binary. Webhook events in, replies out: a rule-based or
//! generative candidate reply, a humanization pass to obscure its synthetic
//! origin, and a typed-at-human-speed delivery pace.
//!
//! See `DESIGN.md` for architecture notes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod logging;
pub mod persona;
pub mod profile;
pub mod rng;

pub mod backend;
pub mod platform;
pub mod reply;

pub mod orchestrator;
pub mod server;
