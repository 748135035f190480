//! Path data parser.
//!
//! Scans the `d` attribute grammar one character at a time. Characters that
//! are neither a command letter nor the start of a number are separators and
//! are skipped. Number tokens are recognized with a `nom` combinator.

use nom::{
    character::complete::{char, digit0, digit1, one_of},
    combinator::{opt, recognize},
    sequence::{pair, tuple},
    IResult,
};

use crate::command::Command;
use crate::error::{ParseError, Result};
use crate::types::{Point, Position, Transform};

const COMMAND_LETTERS: &str = "MmLlHhVvCcSsQqTtAaZz";

fn is_command_letter(c: char) -> bool {
    COMMAND_LETTERS.contains(c)
}

fn is_number_start(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == '-'
}

/// `-? digits (. digits)? ([eE] [+-]? digits)?`
///
/// A `-` can only start the token or follow the exponent marker, so `1-2`
/// lexes as two numbers.
fn number_token(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
	opt(char('-')),
	digit0,
	opt(pair(char('.'), digit0)),
	opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)
}

/// Control point left behind by the previous curve, used by `S` and `T`.
#[derive(Debug, Clone, Copy)]
enum Control {
    Cubic(Point),
    Quadratic(Point),
}

struct PathParser<'a> {
    src: &'a str,
    pos: usize,
    current: Option<Point>,
    subpath_start: Point,
    control: Option<Control>,
    after_close: bool,
    commands: Vec<Command>,
}

impl<'a> PathParser<'a> {
    fn new(src: &'a str) -> Self {
	PathParser {
	    src,
	    pos: 0,
	    current: None,
	    subpath_start: Point::default(),
	    control: None,
	    after_close: false,
	    commands: Vec::new(),
	}
    }

    fn peek(&self) -> Option<char> {
	self.src[self.pos..].chars().next()
    }

    fn skip_separators(&mut self) {
	while let Some(c) = self.peek() {
	    if is_command_letter(c) || is_number_start(c) {
		break;
	    }
	    self.pos += c.len_utf8();
	}
    }

    fn has_number(&mut self) -> bool {
	self.skip_separators();
	self.peek().map_or(false, is_number_start)
    }

    fn next_number(&mut self) -> Result<f64> {
	self.skip_separators();
	let rest = &self.src[self.pos..];
	let token = match self.peek() {
	    Some(c) if is_number_start(c) => number_token(rest).map(|(_, token)| token).unwrap_or(""),
	    Some(c) => return Err(ParseError::syntax(self.pos, format!("expected a number, found '{}'", c))),
	    None => return Err(ParseError::syntax(self.pos, "expected a number, found end of input")),
	};

	let value = token
	    .parse::<f64>()
	    .map_err(|_| ParseError::syntax(self.pos, format!("malformed number '{}'", token)))?;
	self.pos += token.len();
	Ok(value)
    }

    fn next_pair(&mut self) -> Result<Point> {
	let x = self.next_number()?;
	let y = self.next_number()?;
	Ok(Point::new(x, y))
    }

    fn next_point(&mut self, position: Position) -> Result<Point> {
	let p = self.next_pair()?;
	Ok(position.resolve(self.current_point(), p))
    }

    fn current_point(&self) -> Point {
	self.current.unwrap_or_default()
    }

    fn emit(&mut self, command: Command, control: Option<Control>) {
	self.current = Some(command.end());
	self.control = control;
	self.commands.push(command);
    }

    fn parse(mut self) -> Result<Vec<Command>> {
	loop {
	    self.skip_separators();
	    let letter = match self.peek() {
		None => break,
		Some(c) if is_command_letter(c) => c,
		Some(c) => {
		    return Err(ParseError::syntax(self.pos, format!("expected a command letter, found '{}'", c)));
		},
	    };
	    let offset = self.pos;
	    self.pos += 1;
	    tracing::trace!(%letter, offset, "path command");

	    self.parse_command(letter, offset)?;
	}

	Ok(self.commands)
    }

    fn parse_command(&mut self, letter: char, offset: usize) -> Result<()> {
	let position = Position::of(letter);
	let upper = letter.to_ascii_uppercase();

	if upper != 'M' {
	    if self.current.is_none() {
		return Err(ParseError::syntax(offset, format!("'{}' needs a current point; path data must start with a move", letter)));
	    }
	    // drawing straight after a close starts a new subpath at the close target
	    if self.after_close {
		let start = self.subpath_start;
		self.emit(Command::move_to(start, start), None);
	    }
	}
	self.after_close = false;

	match upper {
	    'M' => {
		let first = self.current.is_none();
		let target = if first {
		    self.next_pair()?
		} else {
		    self.next_point(position)?
		};
		let start = self.current.unwrap_or(target);
		self.subpath_start = target;
		self.emit(Command::move_to(start, target), None);

		while self.has_number() {
		    let end = self.next_point(position)?;
		    self.emit(Command::line(self.current_point(), end), None);
		}
	    },
	    'Z' => {
		let start = self.current_point();
		let end = self.subpath_start;
		self.emit(Command::close(start, end), None);
		self.after_close = true;
	    },
	    _ => loop {
		self.parse_segment(upper, position)?;
		if !self.has_number() {
		    break;
		}
	    },
	}

	Ok(())
    }

    fn parse_segment(&mut self, upper: char, position: Position) -> Result<()> {
	let start = self.current_point();

	match upper {
	    'L' => {
		let end = self.next_point(position)?;
		self.emit(Command::line(start, end), None);
	    },
	    'H' => {
		let x = self.next_number()?;
		let x = if position == Position::Relative { start.x + x } else { x };
		self.emit(Command::line(start, Point::new(x, start.y)), None);
	    },
	    'V' => {
		let y = self.next_number()?;
		let y = if position == Position::Relative { start.y + y } else { y };
		self.emit(Command::line(start, Point::new(start.x, y)), None);
	    },
	    'C' => {
		let ctrl1 = self.next_point(position)?;
		let ctrl2 = self.next_point(position)?;
		let end = self.next_point(position)?;
		self.emit(Command::cubic(start, ctrl1, ctrl2, end), Some(Control::Cubic(ctrl2)));
	    },
	    'S' => {
		let ctrl2 = self.next_point(position)?;
		let end = self.next_point(position)?;
		let ctrl1 = match self.control {
		    Some(Control::Cubic(prev)) => prev.reflect(start),
		    _ => end,
		};
		self.emit(Command::cubic(start, ctrl1, ctrl2, end), Some(Control::Cubic(ctrl2)));
	    },
	    'Q' => {
		let ctrl = self.next_point(position)?;
		let end = self.next_point(position)?;
		self.emit(Command::quadratic(start, ctrl, end), Some(Control::Quadratic(ctrl)));
	    },
	    'T' => {
		let end = self.next_point(position)?;
		let ctrl = match self.control {
		    Some(Control::Quadratic(prev)) => prev.reflect(start),
		    _ => end,
		};
		self.emit(Command::quadratic(start, ctrl, end), Some(Control::Quadratic(ctrl)));
	    },
	    'A' => {
		let rx = self.next_number()?;
		let ry = self.next_number()?;
		let rotation = self.next_number()?;
		let large_arc = self.next_number()? != 0.0;
		let sweep = self.next_number()? != 0.0;
		let end = self.next_point(position)?;
		let params = crate::arc::ArcParams::new(rx, ry, rotation, large_arc, sweep);
		self.emit(Command::arc(start, params, end), None);
	    },
	    other => unreachable!("'{}' is not a drawing command", other),
	}

	Ok(())
    }
}

/// Parses SVG path data into a flat command list.
pub fn parse(text: &str) -> Result<Vec<Command>> {
    PathParser::new(text).parse()
}

/// Parses path data and maps every command through `transforms`, first
/// matrix first.
pub fn parse_with_transforms(text: &str, transforms: &[Transform]) -> Result<Vec<Command>> {
    let commands = parse(text)?;
    if transforms.is_empty() {
	return Ok(commands);
    }

    Ok(commands
	.iter()
	.map(|command| transforms.iter().fold(*command, |c, m| c.transformed(m)))
	.collect())
}
