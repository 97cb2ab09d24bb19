//! Shared utilities for FQL parsing

pub mod span;

pub use span::{Position, Span};
