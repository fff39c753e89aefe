//! Filter-and-summarize pipeline behind the personality dashboard.
//!
//! The binary only renders; everything that can be computed without a
//! window lives here so it can be tested headless.

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
