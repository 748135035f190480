//! SVG path data as an immutable, editable command model.
//!
//! Path data parses into [`Path`], a list of [`SubPath`]s each led by a move.
//! Edits are batched through [`Path::mutate`] and never touch the original.

mod arc;
pub mod capability;
mod command;
pub mod document;
mod error;
pub mod mutate;
pub mod parse;
mod path;
pub mod serialize;
pub mod transform;
mod types;

pub use arc::ArcParams;
pub use capability::{ConversionTable, StandardConversions};
pub use command::{Command, CommandKind, Segment};
pub use document::{load_paths, open_paths, PathElement};
pub use error::{MutationError, ParseError, ParseErrorKind, Result};
pub use mutate::PathMutator;
pub use parse::{parse, parse_with_transforms};
pub use path::{Path, SubPath};
pub use serialize::{format_number, serialize};
pub use transform::parse_transform_list;
pub use types::{Point, Position, Transform};
