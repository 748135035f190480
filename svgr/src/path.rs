use std::fmt;
use std::str::FromStr;

use crate::command::{Command, CommandKind};
use crate::error::{MutationError, ParseError};
use crate::mutate::PathMutator;
use crate::parse;
use crate::serialize::serialize;
use crate::types::{Point, Transform};

/// A move followed by the commands drawn from it, optionally ending in a
/// close.
#[derive(Debug, Clone, PartialEq)]
pub struct SubPath {
    commands: Vec<Command>,
}

impl SubPath {
    pub(crate) fn new(commands: Vec<Command>) -> Self {
	debug_assert!(commands.first().map_or(false, |c| c.kind() == CommandKind::Move));
	SubPath { commands }
    }

    pub fn commands(&self) -> &[Command] {
	&self.commands
    }

    pub fn len(&self) -> usize {
	self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
	self.commands.is_empty()
    }

    pub fn kinds(&self) -> Vec<CommandKind> {
	self.commands.iter().map(|c| c.kind()).collect()
    }

    pub fn is_closed(&self) -> bool {
	self.commands.len() > 1 && self.commands.last().map_or(false, |c| c.kind() == CommandKind::Close)
    }

    /// True if any command came from a subdivision. Lets an editor tell apart
    /// overlapping subpaths by which one the user has been splitting.
    pub fn is_split(&self) -> bool {
	self.commands.iter().any(|c| c.is_split())
    }

    /// Target of the leading move.
    pub fn origin(&self) -> Point {
	self.commands[0].end()
    }

    pub fn end(&self) -> Point {
	self.commands[self.commands.len() - 1].end()
    }

    /// Number of distinct starting points a closed subpath can be rotated to.
    /// Zero for open subpaths.
    pub fn cycle_len(&self) -> usize {
	if self.is_closed() {
	    self.cycle().0.len()
	} else {
	    0
	}
    }

    /// Drawn segments of a closed subpath, plus the close when it has zero
    /// length. A close that draws something joins the cycle as a line.
    fn cycle(&self) -> (Vec<Command>, Option<Command>) {
	let mut cycle = self.commands[1..].to_vec();
	match cycle.pop() {
	    Some(close) if close.start() == close.end() => (cycle, Some(close)),
	    Some(close) => {
		cycle.push(Command::line(close.start(), close.end()).with_split(close.is_split()));
		(cycle, None)
	    },
	    None => (cycle, None),
	}
    }

    /// Same drawing traversed the other way. Open subpaths start at their old
    /// end; closed subpaths keep their origin and walk the cycle backwards.
    pub(crate) fn reversed(&self) -> SubPath {
	let lead = self.commands[0];
	let segments = &self.commands[1..];

	if self.is_closed() {
	    let (cycle, close) = self.cycle();
	    let cycle = cycle.iter().rev().map(|c| c.reversed()).collect();
	    return close_cycle(lead, self.origin(), cycle, close);
	}

	let mut commands = Vec::with_capacity(self.commands.len());
	commands.push(lead.with_endpoints(lead.start(), self.end()));
	commands.extend(segments.iter().rev().map(|c| c.reversed()));
	SubPath::new(commands)
    }

    /// Rotates a closed subpath so it starts at the end of segment `amount`.
    pub(crate) fn shifted(&self, amount: usize) -> SubPath {
	let lead = self.commands[0];
	let (cycle, close) = self.cycle();
	let count = cycle.len();
	if count == 0 || amount % count == 0 {
	    return self.clone();
	}
	let amount = amount % count;
	let origin = cycle[amount - 1].end();

	let rotated = cycle[amount..].iter().chain(cycle[..amount].iter()).copied().collect();
	close_cycle(lead, origin, rotated, close)
    }
}

/// Builds a closed subpath from a cycle of segments starting and ending at
/// `origin`. A zero-length `close` is kept as the final command. Otherwise the
/// final segment becomes the close when it is a straight line, and a
/// zero-length close is appended when it is not.
fn close_cycle(lead: Command, origin: Point, mut cycle: Vec<Command>, close: Option<Command>) -> SubPath {
    let mut commands = Vec::with_capacity(cycle.len() + 2);
    commands.push(lead.with_endpoints(lead.start(), origin));

    if let Some(close) = close {
	commands.extend(cycle);
	commands.push(Command::close(origin, origin).with_split(close.is_split()));
	return SubPath::new(commands);
    }

    match cycle.pop() {
	Some(last) if last.kind() == CommandKind::Line => {
	    commands.extend(cycle);
	    commands.push(Command::close(last.start(), origin).with_split(last.is_split()));
	},
	Some(last) => {
	    commands.extend(cycle);
	    commands.push(last);
	    commands.push(Command::close(origin, origin));
	},
	None => commands.push(Command::close(origin, origin)),
    }

    SubPath::new(commands)
}

/// Immutable sequence of subpaths. Structural edits go through
/// [`Path::mutate`] and produce a new path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    subpaths: Vec<SubPath>,
}

impl Path {
    pub fn parse(d: &str) -> Result<Path, ParseError> {
	Ok(Path::from_commands(parse::parse(d)?))
    }

    pub fn parse_with_transforms(d: &str, transforms: &[Transform]) -> Result<Path, ParseError> {
	Ok(Path::from_commands(parse::parse_with_transforms(d, transforms)?))
    }

    /// Groups a flat command list into subpaths, one per move. Commands ahead
    /// of the first move get an implicit move at their start.
    pub fn from_commands(commands: Vec<Command>) -> Path {
	let mut subpaths = Vec::new();
	let mut current: Vec<Command> = Vec::new();

	for command in commands {
	    if command.kind() == CommandKind::Move {
		if !current.is_empty() {
		    subpaths.push(SubPath::new(std::mem::take(&mut current)));
		}
	    } else if current.is_empty() {
		current.push(Command::move_to(command.start(), command.start()));
	    }
	    current.push(command);
	}
	if !current.is_empty() {
	    subpaths.push(SubPath::new(current));
	}

	Path { subpaths }
    }

    /// Re-links each leading move to the end of the previous subpath.
    pub(crate) fn from_subpaths(subpaths: Vec<SubPath>) -> Path {
	let mut linked = Vec::with_capacity(subpaths.len());
	let mut prev_end: Option<Point> = None;

	for mut subpath in subpaths {
	    let lead = subpath.commands[0];
	    let start = prev_end.unwrap_or(lead.end());
	    subpath.commands[0] = lead.with_endpoints(start, lead.end());
	    prev_end = Some(subpath.end());
	    linked.push(subpath);
	}

	Path { subpaths: linked }
    }

    pub fn subpaths(&self) -> &[SubPath] {
	&self.subpaths
    }

    pub fn subpath(&self, index: usize) -> Option<&SubPath> {
	self.subpaths.get(index)
    }

    pub fn commands(&self) -> impl Iterator<Item = &Command> + '_ {
	self.subpaths.iter().flat_map(|s| s.commands.iter())
    }

    pub fn is_empty(&self) -> bool {
	self.subpaths.is_empty()
    }

    pub fn mutate(&self) -> PathMutator<'_> {
	PathMutator::new(self)
    }

    pub fn transformed(&self, m: &Transform) -> Path {
	let subpaths = self
	    .subpaths
	    .iter()
	    .map(|s| SubPath::new(s.commands.iter().map(|c| c.transformed(m)).collect()))
	    .collect();
	Path { subpaths }
    }

    /// Same number of subpaths and the same command kinds at every position.
    pub fn is_compatible_with(&self, other: &Path) -> bool {
	self.subpaths.len() == other.subpaths.len()
	    && self.subpaths.iter().zip(&other.subpaths).all(|(a, b)| a.kinds() == b.kinds())
    }

    /// Point-wise blend of two compatible paths; `t = 0` is `self`.
    pub fn interpolate(&self, other: &Path, t: f64) -> Result<Path, MutationError> {
	if self.subpaths.len() != other.subpaths.len() {
	    return Err(MutationError::Incompatible {
		reason: format!("{} subpaths against {}", self.subpaths.len(), other.subpaths.len()),
	    });
	}

	let mut subpaths = Vec::with_capacity(self.subpaths.len());
	for (index, (a, b)) in self.subpaths.iter().zip(&other.subpaths).enumerate() {
	    if a.len() != b.len() {
		return Err(MutationError::Incompatible {
		    reason: format!("subpath {} has {} commands against {}", index, a.len(), b.len()),
		});
	    }
	    let commands = a
		.commands
		.iter()
		.zip(&b.commands)
		.enumerate()
		.map(|(i, (ca, cb))| {
		    ca.lerp(cb, t).ok_or_else(|| MutationError::Incompatible {
			reason: format!("subpath {} command {} is {:?} against {:?}", index, i, ca.kind(), cb.kind()),
		    })
		})
		.collect::<Result<Vec<_>, _>>()?;
	    subpaths.push(SubPath::new(commands));
	}

	Ok(Path { subpaths })
    }
}

impl FromStr for Path {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
	Path::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	let commands: Vec<Command> = self.commands().copied().collect();
	f.write_str(&serialize(&commands))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CommandKind::*;

    fn path(d: &str) -> Path {
	d.parse().unwrap()
    }

    #[test]
    fn subpaths_split_on_move() {
	let p = path("M0 0 L 1 1 Z M 5 5 L 6 6");
	assert_eq!(p.subpaths().len(), 2);
	assert!(p.subpaths()[0].is_closed());
	assert!(!p.subpaths()[1].is_closed());
	assert_eq!(p.subpaths()[1].origin(), Point::new(5.0, 5.0));
    }

    #[test]
    fn display_round_trips() {
	let p = path("M0,0 L10,0 L10,10 Z");
	assert_eq!(p.to_string(), "M 0 0 L 10 0 L 10 10 Z");
	assert_eq!(path(&p.to_string()), p);
    }

    #[test]
    fn reverse_open() {
	let rev = path("M 0 0 L 10 0 Q 15 5 10 10").subpaths()[0].reversed();
	assert_eq!(rev.kinds(), vec![Move, Quadratic, Line]);
	assert_eq!(rev.origin(), Point::new(10.0, 10.0));
	assert_eq!(rev.end(), Point::new(0.0, 0.0));
    }

    #[test]
    fn reverse_closed_keeps_origin_and_close() {
	let rev = path("M 0 0 L 10 0 L 10 10 Z").subpaths()[0].reversed();
	assert_eq!(rev.kinds(), vec![Move, Line, Line, Close]);
	let ends: Vec<Point> = rev.commands().iter().map(|c| c.end()).collect();
	assert_eq!(
	    ends,
	    vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0), Point::new(10.0, 0.0), Point::new(0.0, 0.0)]
	);
    }

    #[test]
    fn reverse_closed_curve_appends_close() {
	let rev = path("M 0 0 C 0 5 5 5 5 0 Z").subpaths()[0].reversed();
	assert_eq!(rev.kinds(), vec![Move, Line, Cubic, Close]);
	assert!(rev.is_closed());
    }

    #[test]
    fn reversing_a_curved_cycle_keeps_its_length() {
	let circle = path("M 0 0 C 0 -5 10 -5 10 0 C 10 5 0 5 0 0 Z");
	let sub = &circle.subpaths()[0];
	let rev = sub.reversed();

	assert_eq!(rev.kinds(), vec![Move, Cubic, Cubic, Close]);
	assert_eq!(rev.commands()[1].end(), Point::new(10.0, 0.0));
	assert_eq!(rev.reversed(), *sub);
	assert_eq!(sub.cycle_len(), 2);
    }

    #[test]
    fn rotating_a_curved_cycle_keeps_its_length() {
	let circle = path("M 0 0 C 0 -5 10 -5 10 0 C 10 5 0 5 0 0 Z");
	let sub = &circle.subpaths()[0];
	let shifted = sub.shifted(1);

	assert_eq!(shifted.kinds(), vec![Move, Cubic, Cubic, Close]);
	assert_eq!(shifted.origin(), Point::new(10.0, 0.0));
	assert_eq!(shifted.shifted(1), *sub);
	assert_eq!(sub.shifted(2), *sub);
    }

    #[test]
    fn reversing_twice_restores_the_subpath() {
	for d in ["M 0 0 L 10 0 L 10 10 Z", "M 0 0 C 0 5 5 5 5 0 L 0 0 Z", "M 0 0 L 10 0 Q 15 5 10 10"] {
	    let p = path(d);
	    let sub = &p.subpaths()[0];
	    assert_eq!(sub.reversed().reversed(), *sub, "{}", d);
	}
    }

    #[test]
    fn shift_square() {
	let square = path("M 0 0 L 10 0 L 10 10 L 0 10 Z");
	let shifted = square.subpaths()[0].shifted(1);

	assert_eq!(shifted.kinds(), vec![Move, Line, Line, Line, Close]);
	assert_eq!(shifted.origin(), Point::new(10.0, 0.0));
	let ends: Vec<Point> = shifted.commands().iter().map(|c| c.end()).collect();
	assert_eq!(ends[1], Point::new(10.0, 10.0));
	assert_eq!(ends[3], Point::new(0.0, 0.0));
	assert_eq!(ends[4], Point::new(10.0, 0.0));
    }

    #[test]
    fn full_shift_is_identity() {
	let sub = path("M 0 0 L 10 0 L 10 10 Z").subpaths()[0].clone();
	assert_eq!(sub.shifted(3), sub);
    }

    #[test]
    fn interpolate_midway() {
	let a = path("M 0 0 L 10 0");
	let b = path("M 0 10 L 10 10");
	assert_eq!(a.interpolate(&b, 0.5).unwrap(), path("M 0 5 L 10 5"));
    }

    #[test]
    fn interpolate_rejects_mismatched_kinds() {
	let a = path("M 0 0 L 10 0");
	let b = path("M 0 0 Q 5 5 10 0");
	assert!(matches!(a.interpolate(&b, 0.5), Err(MutationError::Incompatible { .. })));
	assert!(!a.is_compatible_with(&b));
    }
}
