use thiserror::Error;

use crate::command::CommandKind;

pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Malformed path data.
    Syntax,
    /// Unreadable SVG document or malformed `transform` attribute.
    Document,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind:?} error at offset {position}: {message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: usize,
    pub message: String,
}

impl ParseError {
    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
	ParseError {
	    kind: ParseErrorKind::Syntax,
	    position,
	    message: message.into(),
	}
    }

    pub fn document(position: usize, message: impl Into<String>) -> Self {
	ParseError {
	    kind: ParseErrorKind::Document,
	    position,
	    message: message.into(),
	}
    }

    pub fn is_syntax(&self) -> bool {
	self.kind == ParseErrorKind::Syntax
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MutationError {
    #[error("subpath index {index} out of range (path has {len} subpaths)")]
    SubPathOutOfRange { index: usize, len: usize },

    #[error("command index {index} out of range in subpath {subpath} ({len} commands)")]
    CommandOutOfRange { subpath: usize, index: usize, len: usize },

    #[error("cannot split the move command of subpath {subpath}")]
    SplitMove { subpath: usize },

    #[error("split fraction {t} is outside (0, 1)")]
    InvalidSplit { t: f64 },

    #[error("cannot convert {from:?} into {to:?}")]
    Unconvertible { from: CommandKind, to: CommandKind },

    #[error("subpath {subpath} is open and cannot be shifted")]
    ShiftOpen { subpath: usize },

    #[error("paths are not structurally compatible: {reason}")]
    Incompatible { reason: String },
}
