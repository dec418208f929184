//! # Sweeper - CSV and Excel cleaning and conversion
//!
//! Sweeper loads uploaded CSV and Excel files into tables, applies optional
//! cleaning steps, and writes each table back out in either format.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sweeper::logic::{TargetFormat, UploadedFile};
//! use sweeper::session::Session;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut session = Session::default();
//! let id = session.upload(UploadedFile::from_path("sales.csv".as_ref())?);
//!
//! session.remove_duplicates(id)?;
//! session.fill_missing(id)?;
//! let output = session.convert(id, TargetFormat::Excel)?;
//! std::fs::write(&output.filename, &output.bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`logic`]: Format detection, decoding, cleaning, projection, charts
//!   and encoding. Every operation takes a table and returns a new one.
//! - [`session`]: Per-batch state keyed by [`session::FileId`], with the
//!   notices raised along the way.
//! - [`config`]: JSON settings.
//! - [`error`]: Error types and handling utilities
//! - [`logging`]: `tracing` subscriber setup
//!
//! ## Tables
//!
//! Tables are Polars `DataFrame`s. Cleaning runs through `LazyFrame` plans
//! that are collected immediately:
//!
//! ```no_run
//! use polars::prelude::*;
//!
//! let df = df!("x" => &[Some(1.0), None, Some(3.0)])?;
//! let filled = df
//!     .lazy()
//!     .with_column(col("x").fill_null(col("x").mean()))
//!     .collect()?;
//! # Ok::<(), PolarsError>(())
//! ```

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod logging;
pub mod logic;
pub mod session;
