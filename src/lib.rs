//! Feed server for koborin.ai.
//!
//! Loads the markdown corpus once and derives RSS, `llms.txt` and sidebar
//! documents from it.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
