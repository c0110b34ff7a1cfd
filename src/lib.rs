//! # App Store Static
//!
//! Build-time copy of app-store static assets into the web app's public
//! directory.
//!
//! Every directory named `static` under the app-store packages is copied,
//! flattened, into `{output}/{app}/{file}`. Icon SVGs get a short MD5 hash
//! recorded in `svg-hashes.json` for cache-busting.
//!
//! ## Usage
//!
//! ```ignore
//! use app_store_static::scanner::find_static_files;
//!
//! let entries = find_static_files(&source_root)?;
//! ```

/// CLI configuration and argument parsing
pub mod config;

/// File copying operations
pub mod copier;

/// Error types for copy runs
pub mod error;

/// Icon SVG detection and hashing
pub mod hasher;

/// svg-hashes.json reading and writing
pub mod manifest;

/// Scan, copy and manifest orchestration
pub mod publisher;

/// Static directory discovery
pub mod scanner;
