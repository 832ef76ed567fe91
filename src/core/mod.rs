//! Core module - Fundamental data structures and utilities
//!
//! This module provides:
//! - Static selection and extraction rules
//! - The in-memory model of one extraction run
//! - Typed errors
//! - Rendering of structured results
//! - Path normalization and bounded file reading
//! - Token counting for prompt budgeting

pub mod error;
pub mod file_reader;
pub mod model;
pub mod paths;
pub mod render;
pub mod rules;
pub mod tokenizer;
pub mod util;
