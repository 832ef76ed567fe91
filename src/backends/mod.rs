//! Backends module - Filesystem traversal, content selection and git
//!
//! Provides:
//! - walk: Shared repository walker with the exclusion filter
//! - survey: Bounded-depth directory summary
//! - select: Candidate collection, ranking and budgeted selection
//! - structure: Structural extraction of large code files
//! - git: URL handling, validation and shallow clones
//! - doctor: Dependency checking

pub mod doctor;
pub mod git;
pub mod select;
pub mod structure;
pub mod survey;
pub mod walk;
