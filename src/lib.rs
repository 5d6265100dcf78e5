// src/lib.rs

//! Wanted-listing display library.
//!
//! Polls the public wanted-persons listing, picks one record, lays it out on a
//! 1-bit canvas for an e-ink display and publishes the result to a plugin
//! webhook.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod render;
#[cfg(feature = "server")]
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;
