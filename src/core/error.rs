//! Typed errors for the git and file boundaries

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodedocError>;

#[derive(Error, Debug)]
pub enum CodedocError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("git is not installed or not on PATH")]
    GitNotFound,

    #[error("Failed to clone repository {url}: {stderr}")]
    CloneFailed { url: String, stderr: String },

    #[error("git {command} timed out after {secs}s")]
    Timeout { command: &'static str, secs: u64 },
}
