//! Token counts for prompt statistics
//!
//! Uses a tiktoken encoding when it loads and falls back to a bytes/4
//! estimate otherwise.

use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;
use tiktoken_rs::{cl100k_base, o200k_base, CoreBPE};

/// Average UTF-8 bytes per token used by the estimate
const BYTES_PER_TOKEN: usize = 4;

static CL100K: Lazy<Result<CoreBPE, String>> =
    Lazy::new(|| cl100k_base().map_err(|e| format!("cl100k_base unavailable: {}", e)));

static O200K: Lazy<Result<CoreBPE, String>> =
    Lazy::new(|| o200k_base().map_err(|e| format!("o200k_base unavailable: {}", e)));

/// Encoding used to count prompt tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenModel {
    #[default]
    Cl100k,
    O200k,
    /// bytes/4, no encoding loaded
    Heuristic,
}

impl TokenModel {
    fn encoding(self) -> Option<&'static Result<CoreBPE, String>> {
        match self {
            TokenModel::Cl100k => Some(&*CL100K),
            TokenModel::O200k => Some(&*O200K),
            TokenModel::Heuristic => None,
        }
    }
}

impl fmt::Display for TokenModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenModel::Cl100k => "cl100k",
            TokenModel::O200k => "o200k",
            TokenModel::Heuristic => "heuristic",
        })
    }
}

impl FromStr for TokenModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cl100k" | "cl100k_base" => Ok(TokenModel::Cl100k),
            "o200k" | "o200k_base" => Ok(TokenModel::O200k),
            "heuristic" => Ok(TokenModel::Heuristic),
            other => Err(format!(
                "Unknown token model: {} (expected cl100k, o200k or heuristic)",
                other
            )),
        }
    }
}

/// Whether the encoding for `model` loads, with the load error if not
pub fn check_tiktoken_model(model: TokenModel) -> (bool, Option<String>) {
    match model.encoding() {
        None | Some(Ok(_)) => (true, None),
        Some(Err(e)) => (false, Some(e.clone())),
    }
}

/// Count tokens of `text`, estimating when the encoding is unavailable
pub fn count_tokens(text: &str, model: TokenModel) -> usize {
    match model.encoding() {
        Some(Ok(bpe)) => bpe.encode_with_special_tokens(text).len(),
        _ => estimate_tokens(text),
    }
}

fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(BYTES_PER_TOKEN)
}
