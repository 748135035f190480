use crate::command::CommandKind;

/// Answers whether a command of one kind can be re-expressed as another kind
/// without moving its endpoints.
pub trait ConversionTable {
    fn can_convert(&self, from: CommandKind, to: CommandKind) -> bool;

    fn either_converts(&self, a: CommandKind, b: CommandKind) -> bool {
	self.can_convert(a, b) || self.can_convert(b, a)
    }
}

/// Lines raise to quadratics and cubics, quadratics raise to cubics, and a
/// close can be written out as any of the three. Moves and elliptical arcs
/// only match themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardConversions;

impl ConversionTable for StandardConversions {
    fn can_convert(&self, from: CommandKind, to: CommandKind) -> bool {
	use CommandKind::*;

	if from == to {
	    return true;
	}
	match (from, to) {
	    (Line, Quadratic) | (Line, Cubic) => true,
	    (Quadratic, Cubic) => true,
	    (Close, Line) | (Close, Quadratic) | (Close, Cubic) => true,
	    _ => false,
	}
    }
}

impl<F> ConversionTable for F
where F: Fn(CommandKind, CommandKind) -> bool
{
    fn can_convert(&self, from: CommandKind, to: CommandKind) -> bool {
	(self)(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CommandKind::*;

    #[test]
    fn raising_degree_is_one_way() {
	let table = StandardConversions;
	assert!(table.can_convert(Line, Cubic));
	assert!(!table.can_convert(Cubic, Line));
	assert!(table.either_converts(Cubic, Line));
    }

    #[test]
    fn arcs_and_moves_only_match_themselves() {
	let table = StandardConversions;
	for kind in [Line, Quadratic, Cubic, Close] {
	    assert!(!table.either_converts(EllipticalArc, kind));
	    assert!(!table.either_converts(Move, kind));
	}
	assert!(table.can_convert(EllipticalArc, EllipticalArc));
    }

    #[test]
    fn closures_act_as_tables() {
	let only_same = |a: CommandKind, b: CommandKind| a == b;
	assert!(!only_same.can_convert(Line, Cubic));
    }
}
