//! Application configuration.
//!
//! A [`SessionConfig`] describes the grid, the reward strategy and the
//! trainer hyperparameters. It is the single input needed to build a
//! [`Session`](crate::session::Session), whether it comes from code, a JSON
//! file or CLI flags.

pub mod config;

pub use config::SessionConfig;
