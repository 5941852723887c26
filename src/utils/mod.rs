//! Utility functions.
//!
//! - [`base62`] - Short code encoding and decoding

pub mod base62;
