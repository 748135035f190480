use std::fmt::Write;

use crate::command::{Command, Segment};
use crate::types::Point;

/// Rounds to three decimals and drops trailing zeros: `1`, `0.333`, `-2.5`.
pub fn format_number(value: f64) -> String {
    let scaled = value * 1000.0;
    // values this large have no fractional digits left to round
    let rounded = if scaled.is_finite() { scaled.round() / 1000.0 } else { value };
    // avoid printing "-0"
    if rounded == 0.0 {
	return String::from("0");
    }
    format!("{}", rounded)
}

fn push_point(out: &mut String, p: Point) {
    let _ = write!(out, " {} {}", format_number(p.x), format_number(p.y));
}

/// Writes commands back out as absolute path data, e.g. `M 0 0 L 10 0`.
pub fn serialize(commands: &[Command]) -> String {
    let mut out = String::new();

    for command in commands {
	if !out.is_empty() {
	    out.push(' ');
	}
	out.push(command.kind().letter());

	match *command.segment() {
	    Segment::Move { end, .. } | Segment::Line { end, .. } => push_point(&mut out, end),
	    Segment::Quadratic { ctrl, end, .. } => {
		push_point(&mut out, ctrl);
		push_point(&mut out, end);
	    },
	    Segment::Cubic { ctrl1, ctrl2, end, .. } => {
		push_point(&mut out, ctrl1);
		push_point(&mut out, ctrl2);
		push_point(&mut out, end);
	    },
	    Segment::EllipticalArc { params, end, .. } => {
		let _ = write!(
		    out,
		    " {} {} {} {} {}",
		    format_number(params.rx),
		    format_number(params.ry),
		    format_number(params.x_axis_rotation),
		    params.large_arc as u8,
		    params.sweep as u8,
		);
		push_point(&mut out, end);
	    },
	    Segment::Close { .. } => (),
	}
    }

    out
}
