//! Pipeline entry points.
//!
//! - `run_push`: fetch → render → store → upload the bitmap
//! - `run_merge`: fetch → send merge variables
//! - `run_snapshot`: fetch → render → store, nothing published

pub mod run;

pub use run::{
    RunReport, Rendered, build_renderer, qr_code_url, render_wanted, run_merge, run_push,
    run_snapshot, write_artifacts,
};
