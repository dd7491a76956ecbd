//! # Arena Development Tools
//!
//! Command-line tools for development:
//! - Map previews
//! - Round simulation
//! - Settings validators

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod error;
pub mod generate;
pub mod simulate;
pub mod validate;
