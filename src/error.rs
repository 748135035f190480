use thiserror::Error;

use svgr::{MutationError, ParseError};

pub type Result<T> = std::result::Result<T, MorphError>;

#[derive(Debug, Error)]
pub enum MorphError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("mutation error: {0}")]
    Mutation(#[from] MutationError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("subpath counts differ: {from} against {to}")]
    SubPathCount { from: usize, to: usize },

    #[error("invalid options: {message}")]
    InvalidOptions { message: String },
}
