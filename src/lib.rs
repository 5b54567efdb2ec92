//! # Remote Connect Four
//!
//! Connect Four against an opponent whose moves come from a remote model
//! API. Features a terminal UI built with Ratatui, a fallback policy when the
//! API misbehaves, and win/loss/draw tallies persisted per opponent variant.
//!
//! ## Modules
//!
//! - [`game`] — Core game logic: board, sides, per-game session
//! - [`controller`] — Turn state machine and the async opponent step
//! - [`oracle`] — Move oracle trait, HTTP client, offline random oracle
//! - [`stats`] — Outcome tallies and their stores
//! - [`ui`] — Terminal UI
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod oracle;
pub mod stats;
pub mod ui;
