use crate::arc::{self, ArcParams};
use crate::capability::{ConversionTable, StandardConversions};
use crate::types::{Point, Transform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Move,
    Line,
    Quadratic,
    Cubic,
    EllipticalArc,
    Close,
}

impl CommandKind {
    pub fn letter(self) -> char {
	match self {
	    CommandKind::Move => 'M',
	    CommandKind::Line => 'L',
	    CommandKind::Quadratic => 'Q',
	    CommandKind::Cubic => 'C',
	    CommandKind::EllipticalArc => 'A',
	    CommandKind::Close => 'Z',
	}
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Move { start: Point, end: Point },
    Line { start: Point, end: Point },
    Quadratic { start: Point, ctrl: Point, end: Point },
    Cubic { start: Point, ctrl1: Point, ctrl2: Point, end: Point },
    EllipticalArc { start: Point, params: ArcParams, end: Point },
    Close { start: Point, end: Point },
}

/// One drawing instruction. Commands are values: every edit builds a new one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Command {
    segment: Segment,
    is_split: bool,
}

impl From<Segment> for Command {
    fn from(segment: Segment) -> Self {
	Command { segment, is_split: false }
    }
}

impl Command {
    pub fn move_to(start: Point, end: Point) -> Self {
	Segment::Move { start, end }.into()
    }

    pub fn line(start: Point, end: Point) -> Self {
	Segment::Line { start, end }.into()
    }

    pub fn quadratic(start: Point, ctrl: Point, end: Point) -> Self {
	Segment::Quadratic { start, ctrl, end }.into()
    }

    pub fn cubic(start: Point, ctrl1: Point, ctrl2: Point, end: Point) -> Self {
	Segment::Cubic { start, ctrl1, ctrl2, end }.into()
    }

    pub fn arc(start: Point, params: ArcParams, end: Point) -> Self {
	Segment::EllipticalArc { start, params, end }.into()
    }

    pub fn close(start: Point, end: Point) -> Self {
	Segment::Close { start, end }.into()
    }

    pub fn segment(&self) -> &Segment {
	&self.segment
    }

    pub fn kind(&self) -> CommandKind {
	match self.segment {
	    Segment::Move { .. } => CommandKind::Move,
	    Segment::Line { .. } => CommandKind::Line,
	    Segment::Quadratic { .. } => CommandKind::Quadratic,
	    Segment::Cubic { .. } => CommandKind::Cubic,
	    Segment::EllipticalArc { .. } => CommandKind::EllipticalArc,
	    Segment::Close { .. } => CommandKind::Close,
	}
    }

    pub fn start(&self) -> Point {
	match self.segment {
	    Segment::Move { start, .. }
	    | Segment::Line { start, .. }
	    | Segment::Quadratic { start, .. }
	    | Segment::Cubic { start, .. }
	    | Segment::EllipticalArc { start, .. }
	    | Segment::Close { start, .. } => start,
	}
    }

    pub fn end(&self) -> Point {
	match self.segment {
	    Segment::Move { end, .. }
	    | Segment::Line { end, .. }
	    | Segment::Quadratic { end, .. }
	    | Segment::Cubic { end, .. }
	    | Segment::EllipticalArc { end, .. }
	    | Segment::Close { end, .. } => end,
	}
    }

    /// Every point of the command, start first.
    pub fn points(&self) -> Vec<Point> {
	match self.segment {
	    Segment::Move { start, end }
	    | Segment::Line { start, end }
	    | Segment::EllipticalArc { start, end, .. }
	    | Segment::Close { start, end } => vec![start, end],
	    Segment::Quadratic { start, ctrl, end } => vec![start, ctrl, end],
	    Segment::Cubic { start, ctrl1, ctrl2, end } => vec![start, ctrl1, ctrl2, end],
	}
    }

    /// True when this command was produced by subdividing another one rather
    /// than read from path data.
    pub fn is_split(&self) -> bool {
	self.is_split
    }

    pub fn with_split(mut self, is_split: bool) -> Self {
	self.is_split = is_split;
	self
    }

    pub fn can_convert_to(&self, kind: CommandKind) -> bool {
	StandardConversions.can_convert(self.kind(), kind)
    }

    /// Re-expresses this command as `kind` with the same endpoints, or `None`
    /// when no exact conversion exists.
    pub fn convert_to(&self, kind: CommandKind) -> Option<Command> {
	if kind == self.kind() {
	    return Some(*self);
	}

	let converted = match (self.segment, kind) {
	    (Segment::Line { start, end }, _) | (Segment::Close { start, end }, _) => match kind {
		CommandKind::Line => Command::line(start, end),
		CommandKind::Quadratic => Command::quadratic(start, start.lerp(end, 0.5), end),
		CommandKind::Cubic => Command::cubic(start, start.lerp(end, 1.0 / 3.0), start.lerp(end, 2.0 / 3.0), end),
		_ => return None,
	    },
	    (Segment::Quadratic { start, ctrl, end }, CommandKind::Cubic) => Command::cubic(
		start,
		start.lerp(ctrl, 2.0 / 3.0),
		end.lerp(ctrl, 2.0 / 3.0),
		end,
	    ),
	    _ => return None,
	};

	Some(converted.with_split(self.is_split))
    }

    /// Splits the command at the strictly increasing fractions `ts`, each in
    /// (0, 1). Returns `ts.len() + 1` commands covering the same geometry. All
    /// pieces but the last end on a new point and are flagged as split.
    ///
    /// A move has no extent and is returned unchanged.
    pub fn split(&self, ts: &[f64]) -> Vec<Command> {
	if ts.is_empty() {
	    return vec![*self];
	}

	let mut pieces: Vec<Command> = match self.segment {
	    Segment::Move { .. } => return vec![*self],
	    Segment::Line { start, end } => lerp_pieces(start, end, ts)
		.into_iter()
		.map(|(s, e)| Command::line(s, e))
		.collect(),
	    Segment::Close { start, end } => {
		let mut pieces: Vec<Command> = lerp_pieces(start, end, ts)
		    .into_iter()
		    .map(|(s, e)| Command::line(s, e))
		    .collect();
		if let Some(last) = pieces.pop() {
		    pieces.push(Command::close(last.start(), end));
		}
		pieces
	    },
	    Segment::Quadratic { .. } | Segment::Cubic { .. } => {
		let mut pieces = Vec::with_capacity(ts.len() + 1);
		let mut rest = *self;
		let mut consumed = 0.0;
		for &t in ts {
		    let local = (t - consumed) / (1.0 - consumed);
		    let (head, tail) = rest.split_curve_at(local);
		    pieces.push(head);
		    rest = tail;
		    consumed = t;
		}
		pieces.push(rest);
		pieces
	    },
	    Segment::EllipticalArc { start, params, end } => arc::split(start, end, &params, ts)
		.into_iter()
		.map(|(s, p, e)| Command::arc(s, p, e))
		.collect(),
	};

	let last = pieces.len() - 1;
	for (i, piece) in pieces.iter_mut().enumerate() {
	    piece.is_split = if i == last { self.is_split } else { true };
	}
	pieces
    }

    /// De Casteljau split of a quadratic or cubic at `t`.
    fn split_curve_at(&self, t: f64) -> (Command, Command) {
	match self.segment {
	    Segment::Quadratic { start, ctrl, end } => {
		let a = start.lerp(ctrl, t);
		let b = ctrl.lerp(end, t);
		let mid = a.lerp(b, t);
		(Command::quadratic(start, a, mid), Command::quadratic(mid, b, end))
	    },
	    Segment::Cubic { start, ctrl1, ctrl2, end } => {
		let a = start.lerp(ctrl1, t);
		let b = ctrl1.lerp(ctrl2, t);
		let c = ctrl2.lerp(end, t);
		let ab = a.lerp(b, t);
		let bc = b.lerp(c, t);
		let mid = ab.lerp(bc, t);
		(Command::cubic(start, a, ab, mid), Command::cubic(mid, bc, c, end))
	    },
	    _ => (*self, *self),
	}
    }

    /// The same geometry traversed end to start. A close comes back as a line
    /// since it no longer ends on the subpath's move target.
    pub fn reversed(&self) -> Command {
	let segment = match self.segment {
	    Segment::Move { start, end } => Segment::Move { start, end },
	    Segment::Line { start, end } | Segment::Close { start, end } => Segment::Line { start: end, end: start },
	    Segment::Quadratic { start, ctrl, end } => Segment::Quadratic { start: end, ctrl, end: start },
	    Segment::Cubic { start, ctrl1, ctrl2, end } => Segment::Cubic {
		start: end,
		ctrl1: ctrl2,
		ctrl2: ctrl1,
		end: start,
	    },
	    Segment::EllipticalArc { start, params, end } => Segment::EllipticalArc {
		start: end,
		params: ArcParams { sweep: !params.sweep, ..params },
		end: start,
	    },
	};
	Command { segment, is_split: self.is_split }
    }

    pub fn transformed(&self, m: &Transform) -> Command {
	let t = |p: Point| m.apply(p);
	let segment = match self.segment {
	    Segment::Move { start, end } => Segment::Move { start: t(start), end: t(end) },
	    Segment::Line { start, end } => Segment::Line { start: t(start), end: t(end) },
	    Segment::Close { start, end } => Segment::Close { start: t(start), end: t(end) },
	    Segment::Quadratic { start, ctrl, end } => Segment::Quadratic {
		start: t(start),
		ctrl: t(ctrl),
		end: t(end),
	    },
	    Segment::Cubic { start, ctrl1, ctrl2, end } => Segment::Cubic {
		start: t(start),
		ctrl1: t(ctrl1),
		ctrl2: t(ctrl2),
		end: t(end),
	    },
	    Segment::EllipticalArc { start, params, end } => Segment::EllipticalArc {
		start: t(start),
		params: arc::transform(&params, m),
		end: t(end),
	    },
	};
	Command { segment, is_split: self.is_split }
    }

    /// Same kind and geometry with new endpoints; control points are kept.
    pub(crate) fn with_endpoints(&self, new_start: Point, new_end: Point) -> Command {
	let segment = match self.segment {
	    Segment::Move { .. } => Segment::Move { start: new_start, end: new_end },
	    Segment::Line { .. } => Segment::Line { start: new_start, end: new_end },
	    Segment::Close { .. } => Segment::Close { start: new_start, end: new_end },
	    Segment::Quadratic { ctrl, .. } => Segment::Quadratic { start: new_start, ctrl, end: new_end },
	    Segment::Cubic { ctrl1, ctrl2, .. } => Segment::Cubic { start: new_start, ctrl1, ctrl2, end: new_end },
	    Segment::EllipticalArc { params, .. } => Segment::EllipticalArc { start: new_start, params, end: new_end },
	};
	Command { segment, is_split: self.is_split }
    }

    /// Point-wise interpolation between two commands of the same kind.
    pub fn lerp(&self, other: &Command, t: f64) -> Option<Command> {
	let l = |a: Point, b: Point| a.lerp(b, t);
	let mix = |a: f64, b: f64| a + (b - a) * t;

	let segment = match (self.segment, other.segment) {
	    (Segment::Move { start: s1, end: e1 }, Segment::Move { start: s2, end: e2 }) => Segment::Move {
		start: l(s1, s2),
		end: l(e1, e2),
	    },
	    (Segment::Line { start: s1, end: e1 }, Segment::Line { start: s2, end: e2 }) => Segment::Line {
		start: l(s1, s2),
		end: l(e1, e2),
	    },
	    (Segment::Close { start: s1, end: e1 }, Segment::Close { start: s2, end: e2 }) => Segment::Close {
		start: l(s1, s2),
		end: l(e1, e2),
	    },
	    (
		Segment::Quadratic { start: s1, ctrl: c1, end: e1 },
		Segment::Quadratic { start: s2, ctrl: c2, end: e2 },
	    ) => Segment::Quadratic {
		start: l(s1, s2),
		ctrl: l(c1, c2),
		end: l(e1, e2),
	    },
	    (
		Segment::Cubic { start: s1, ctrl1: a1, ctrl2: b1, end: e1 },
		Segment::Cubic { start: s2, ctrl1: a2, ctrl2: b2, end: e2 },
	    ) => Segment::Cubic {
		start: l(s1, s2),
		ctrl1: l(a1, a2),
		ctrl2: l(b1, b2),
		end: l(e1, e2),
	    },
	    (
		Segment::EllipticalArc { start: s1, params: p1, end: e1 },
		Segment::EllipticalArc { start: s2, params: p2, end: e2 },
	    ) => {
		// flags can't be blended; they flip halfway through
		let flags = if t < 0.5 { p1 } else { p2 };
		Segment::EllipticalArc {
		    start: l(s1, s2),
		    params: ArcParams {
			rx: mix(p1.rx, p2.rx),
			ry: mix(p1.ry, p2.ry),
			x_axis_rotation: mix(p1.x_axis_rotation, p2.x_axis_rotation),
			large_arc: flags.large_arc,
			sweep: flags.sweep,
		    },
		    end: l(e1, e2),
		}
	    },
	    _ => return None,
	};
	Some(Command { segment, is_split: self.is_split || other.is_split })
    }
}

fn lerp_pieces(start: Point, end: Point, ts: &[f64]) -> Vec<(Point, Point)> {
    let mut pieces = Vec::with_capacity(ts.len() + 1);
    let mut prev = start;
    for &t in ts {
	let p = start.lerp(end, t);
	pieces.push((prev, p));
	prev = p;
    }
    pieces.push((prev, end));
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
	Point::new(x, y)
    }

    #[test]
    fn line_split_thirds() {
	let pieces = Command::line(p(0.0, 0.0), p(9.0, 0.0)).split(&[1.0 / 3.0, 2.0 / 3.0]);

	assert_eq!(pieces.len(), 3);
	assert!(pieces[0].end().approx_eq(p(3.0, 0.0), 1e-12));
	assert!(pieces[1].end().approx_eq(p(6.0, 0.0), 1e-12));
	assert_eq!(pieces[2].end(), p(9.0, 0.0));
	assert!(pieces[0].is_split() && pieces[1].is_split());
	assert!(!pieces[2].is_split());
    }

    #[test]
    fn cubic_split_is_continuous() {
	let cubic = Command::cubic(p(0.0, 0.0), p(0.0, 10.0), p(10.0, 10.0), p(10.0, 0.0));
	let pieces = cubic.split(&[0.25, 0.5, 0.75]);

	assert_eq!(pieces.len(), 4);
	for pair in pieces.windows(2) {
	    assert_eq!(pair[0].end(), pair[1].start());
	}
	// symmetric curve: the midpoint lands on the axis of symmetry
	assert!(pieces[1].end().approx_eq(p(5.0, 7.5), 1e-9));
	assert_eq!(pieces[3].end(), p(10.0, 0.0));
    }

    #[test]
    fn split_close_keeps_trailing_close() {
	let pieces = Command::close(p(0.0, 10.0), p(0.0, 0.0)).split(&[0.5]);
	assert_eq!(pieces[0].kind(), CommandKind::Line);
	assert_eq!(pieces[1].kind(), CommandKind::Close);
	assert_eq!(pieces[1].start(), p(0.0, 5.0));
    }

    #[test]
    fn quadratic_to_cubic_keeps_shape() {
	let quad = Command::quadratic(p(0.0, 0.0), p(3.0, 3.0), p(6.0, 0.0));
	let cubic = quad.convert_to(CommandKind::Cubic).unwrap();

	assert_eq!(cubic.kind(), CommandKind::Cubic);
	let expected = [p(0.0, 0.0), p(2.0, 2.0), p(4.0, 2.0), p(6.0, 0.0)];
	for (got, want) in cubic.points().into_iter().zip(expected) {
	    assert!(got.approx_eq(want, 1e-12));
	}
    }

    #[test]
    fn arcs_do_not_convert() {
	let arc = Command::arc(p(0.0, 0.0), ArcParams::new(5.0, 5.0, 0.0, false, true), p(10.0, 0.0));
	assert!(arc.convert_to(CommandKind::Cubic).is_none());
	assert!(!arc.can_convert_to(CommandKind::Line));
    }

    #[test]
    fn reversing_a_cubic_swaps_controls() {
	let cubic = Command::cubic(p(0.0, 0.0), p(1.0, 1.0), p(2.0, 1.0), p(3.0, 0.0));
	let rev = cubic.reversed();
	assert_eq!(rev.points(), vec![p(3.0, 0.0), p(2.0, 1.0), p(1.0, 1.0), p(0.0, 0.0)]);
	assert_eq!(rev.reversed(), cubic);
    }

    #[test]
    fn lerp_requires_same_kind() {
	let a = Command::line(p(0.0, 0.0), p(10.0, 0.0));
	let b = Command::line(p(0.0, 10.0), p(10.0, 10.0));
	assert_eq!(a.lerp(&b, 0.5).unwrap().end(), p(10.0, 5.0));

	let c = Command::quadratic(p(0.0, 0.0), p(5.0, 5.0), p(10.0, 0.0));
	assert!(a.lerp(&c, 0.5).is_none());
    }
}
