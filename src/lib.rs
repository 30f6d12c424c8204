//! # edheader
//!
//! A tool that stamps source files with a copyright, SPDX and summary header
//! whose content depends on the directory each file lives in.
//!
//! Every file gets a block like:
//!
//! ```text
//! // Copyright © 2025 Texelation contributors
//! // SPDX-License-Identifier: AGPL-3.0-or-later
//! //
//! // File: protocol/codec.go
//! // Summary: Implements codec capabilities for the protocol definitions.
//! // Usage: Shared by clients and servers to encode codec messages over the wire.
//! // Notes: Keep changes backward-compatible; any additions require coordinated version bumps.
//! ```
//!
//! Metadata is resolved by longest directory prefix. Files whose first lines
//! already carry an SPDX marker are never touched, so running the tool twice
//! changes nothing the second time.
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! use edheader::config::Config;
//! use edheader::processor::{FileCollector, Processor, ProcessorConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let root = PathBuf::from(".");
//!     let config = Config::default();
//!
//!     let collector = FileCollector::new(root.clone(), &config.header.extensions, &[])?;
//!     let files = collector.collect(&["protocol".to_string()])?;
//!
//!     let processor = Processor::new(ProcessorConfig::from_config(&config, "2025".to_string(), root)?);
//!     let reports = processor.process_files(&files);
//!
//!     println!("Processed {} files", reports.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`rules`] - Directory rule table and longest-prefix resolution
//! * [`templates`] - Header synthesis from resolved metadata
//! * [`processor`] - Idempotent insertion and file handling
//! * [`config`] - Rule table loading from TOML
//! * [`logging`] - Logging utilities for verbose output
//!
//! [`rules`]: crate::rules
//! [`templates`]: crate::templates
//! [`processor`]: crate::processor
//! [`config`]: crate::config
//! [`logging`]: crate::logging

pub mod cli;
pub mod config;
pub mod diff;
pub mod git;
pub mod header_detection;
pub mod logging;
pub mod output;
pub mod processor;
pub mod report;
pub mod rules;
pub mod templates;
pub mod workspace;
