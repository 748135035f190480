//! Batch edits against an immutable [`Path`].
//!
//! ```
//! use svgr::{CommandKind, Path};
//!
//! let path: Path = "M 0 0 L 10 0 L 10 10 Z".parse().unwrap();
//! let edited = path
//!     .mutate()
//!     .split_evenly(0, 1, 1)
//!     .convert(0, 2, CommandKind::Cubic)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(edited.subpaths()[0].len(), 5);
//! assert_eq!(path.subpaths()[0].len(), 4);
//! ```

use std::collections::BTreeMap;

use crate::command::{Command, CommandKind};
use crate::error::MutationError;
use crate::path::{Path, SubPath};

#[derive(Debug, Clone, PartialEq)]
enum Edit {
    Split { subpath: usize, command: usize, ts: Vec<f64> },
    Convert { subpath: usize, command: usize, kind: CommandKind },
    Reverse { subpath: usize },
    Shift { subpath: usize, amount: usize },
}

impl Edit {
    fn subpath(&self) -> usize {
	match *self {
	    Edit::Split { subpath, .. }
	    | Edit::Convert { subpath, .. }
	    | Edit::Reverse { subpath }
	    | Edit::Shift { subpath, .. } => subpath,
	}
    }
}

/// Records edits addressed by indices into the borrowed path and applies them
/// all at once in [`PathMutator::build`].
///
/// Split and convert edits address commands of the original path, so their
/// order does not matter. They are applied first; reverse and shift edits
/// follow in the order they were recorded.
#[derive(Debug)]
pub struct PathMutator<'a> {
    path: &'a Path,
    edits: Vec<Edit>,
}

impl<'a> PathMutator<'a> {
    pub(crate) fn new(path: &'a Path) -> Self {
	PathMutator { path, edits: Vec::new() }
    }

    /// Splits a command at the fractions `ts`, each strictly between 0 and 1.
    pub fn split(mut self, subpath: usize, command: usize, ts: &[f64]) -> Self {
	self.edits.push(Edit::Split { subpath, command, ts: ts.to_vec() });
	self
    }

    /// Inserts `count` evenly spaced points into a command.
    pub fn split_evenly(self, subpath: usize, command: usize, count: usize) -> Self {
	let ts: Vec<f64> = (1..=count).map(|i| i as f64 / (count + 1) as f64).collect();
	self.split(subpath, command, &ts)
    }

    pub fn convert(mut self, subpath: usize, command: usize, kind: CommandKind) -> Self {
	self.edits.push(Edit::Convert { subpath, command, kind });
	self
    }

    pub fn reverse(mut self, subpath: usize) -> Self {
	self.edits.push(Edit::Reverse { subpath });
	self
    }

    /// Rotates a closed subpath so it starts `amount` commands later.
    pub fn shift(mut self, subpath: usize, amount: usize) -> Self {
	self.edits.push(Edit::Shift { subpath, amount });
	self
    }

    fn validate(&self) -> Result<(), MutationError> {
	let subpaths = self.path.subpaths();

	for edit in &self.edits {
	    let index = edit.subpath();
	    let sub = subpaths.get(index).ok_or(MutationError::SubPathOutOfRange { index, len: subpaths.len() })?;

	    match edit {
		Edit::Split { command, ts, .. } => {
		    check_command(index, *command, sub)?;
		    if *command == 0 {
			return Err(MutationError::SplitMove { subpath: index });
		    }
		    if let Some(&t) = ts.iter().find(|&&t| !(t > 0.0 && t < 1.0)) {
			return Err(MutationError::InvalidSplit { t });
		    }
		},
		Edit::Convert { command, kind, .. } => {
		    check_command(index, *command, sub)?;
		    let from = sub.commands()[*command].kind();
		    if sub.commands()[*command].convert_to(*kind).is_none() {
			return Err(MutationError::Unconvertible { from, to: *kind });
		    }
		},
		Edit::Reverse { .. } | Edit::Shift { .. } => (),
	    }
	}

	Ok(())
    }

    pub fn build(self) -> Result<Path, MutationError> {
	self.validate()?;

	let mut converts: BTreeMap<(usize, usize), CommandKind> = BTreeMap::new();
	let mut splits: BTreeMap<(usize, usize), Vec<f64>> = BTreeMap::new();
	for edit in &self.edits {
	    match edit {
		Edit::Convert { subpath, command, kind } => {
		    converts.insert((*subpath, *command), *kind);
		},
		Edit::Split { subpath, command, ts } => {
		    splits.entry((*subpath, *command)).or_default().extend_from_slice(ts);
		},
		_ => (),
	    }
	}

	let mut subpaths = Vec::with_capacity(self.path.subpaths().len());
	for (s, sub) in self.path.subpaths().iter().enumerate() {
	    let mut commands: Vec<Command> = Vec::with_capacity(sub.len());

	    for (c, command) in sub.commands().iter().enumerate() {
		let command = match converts.get(&(s, c)) {
		    Some(&kind) => command
			.convert_to(kind)
			.ok_or(MutationError::Unconvertible { from: command.kind(), to: kind })?,
		    None => *command,
		};

		match splits.get_mut(&(s, c)) {
		    Some(ts) => {
			ts.sort_by(|a, b| a.total_cmp(b));
			ts.dedup();
			commands.extend(command.split(ts));
		    },
		    None => commands.push(command),
		}
	    }

	    let mut edited = SubPath::new(commands);
	    for edit in self.edits.iter().filter(|e| e.subpath() == s) {
		match *edit {
		    Edit::Reverse { .. } => edited = edited.reversed(),
		    Edit::Shift { amount, .. } => {
			if !edited.is_closed() {
			    return Err(MutationError::ShiftOpen { subpath: s });
			}
			edited = edited.shifted(amount);
		    },
		    _ => (),
		}
	    }

	    subpaths.push(edited);
	}

	tracing::trace!(edits = self.edits.len(), "path mutation built");
	Ok(Path::from_subpaths(subpaths))
    }
}

fn check_command(subpath: usize, index: usize, sub: &SubPath) -> Result<(), MutationError> {
    if index >= sub.len() {
	return Err(MutationError::CommandOutOfRange { subpath, index, len: sub.len() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;
    use CommandKind::*;

    fn square() -> Path {
	"M 0 0 L 10 0 L 10 10 L 0 10 Z".parse().unwrap()
    }

    #[test]
    fn original_is_untouched() {
	let path = square();
	let edited = path.mutate().split_evenly(0, 1, 2).reverse(0).build().unwrap();

	assert_eq!(path, square());
	assert_eq!(edited.subpaths()[0].len(), 7);
    }

    #[test]
    fn splits_address_original_indices() {
	let edited = square().mutate().split_evenly(0, 1, 1).split_evenly(0, 3, 1).build().unwrap();
	let ends: Vec<Point> = edited.subpaths()[0].commands().iter().map(|c| c.end()).collect();

	assert_eq!(ends[1], Point::new(5.0, 0.0));
	assert_eq!(ends[4], Point::new(5.0, 10.0));
	assert!(edited.subpaths()[0].is_split());
	assert!(!square().subpaths()[0].is_split());
    }

    #[test]
    fn repeated_splits_of_one_command_merge() {
	let edited = square().mutate().split(0, 1, &[0.5]).split(0, 1, &[0.25, 0.5]).build().unwrap();
	assert_eq!(edited.subpaths()[0].len(), 7);
    }

    #[test]
    fn convert_then_split() {
	let edited = square().mutate().convert(0, 2, Cubic).split_evenly(0, 2, 1).build().unwrap();
	assert_eq!(edited.subpaths()[0].kinds(), vec![Move, Line, Cubic, Cubic, Line, Close]);
    }

    #[test]
    fn rejects_bad_indices() {
	assert_eq!(
	    square().mutate().reverse(3).build(),
	    Err(MutationError::SubPathOutOfRange { index: 3, len: 1 })
	);
	assert_eq!(
	    square().mutate().split(0, 9, &[0.5]).build(),
	    Err(MutationError::CommandOutOfRange { subpath: 0, index: 9, len: 5 })
	);
	assert_eq!(square().mutate().split(0, 0, &[0.5]).build(), Err(MutationError::SplitMove { subpath: 0 }));
	assert_eq!(square().mutate().split(0, 1, &[1.0]).build(), Err(MutationError::InvalidSplit { t: 1.0 }));
    }

    #[test]
    fn rejects_unconvertible_kind() {
	assert_eq!(
	    square().mutate().convert(0, 1, EllipticalArc).build(),
	    Err(MutationError::Unconvertible { from: Line, to: EllipticalArc })
	);
    }

    #[test]
    fn shift_requires_closed_subpath() {
	let open: Path = "M 0 0 L 10 0 L 10 10".parse().unwrap();
	assert_eq!(open.mutate().shift(0, 1).build(), Err(MutationError::ShiftOpen { subpath: 0 }));
    }

    #[test]
    fn moves_relink_after_reverse() {
	let path: Path = "M 0 0 L 10 0 M 20 0 L 30 0".parse().unwrap();
	let edited = path.mutate().reverse(0).build().unwrap();

	assert_eq!(edited.subpaths()[0].origin(), Point::new(10.0, 0.0));
	assert_eq!(edited.subpaths()[1].commands()[0].start(), Point::new(0.0, 0.0));
    }
}
