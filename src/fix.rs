//! Makes two paths interpolable.
//!
//! For every subpath index the side with more commands is reoriented (reversed
//! and, when closed, rotated) to best match the other side, both sides get new
//! points where the alignment left gaps, and a final pass unifies the command
//! kinds pair by pair.

use std::collections::BTreeMap;

use svgr::{CommandKind, ConversionTable, MutationError, Path, StandardConversions, SubPath};

use crate::align::{align, AlignedSlot, Alignment};
use crate::error::Result;
use crate::options::{Cancellation, FixOptions, Uncancellable};

/// A pair of commands left with different kinds because neither converts
/// into the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    pub subpath: usize,
    pub command: usize,
    pub from_kind: CommandKind,
    pub to_kind: CommandKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixOutcome {
    pub from: Path,
    pub to: Path,
    pub residual: Vec<Mismatch>,
}

impl FixOutcome {
    /// True when the two paths can be interpolated command by command.
    pub fn is_compatible(&self) -> bool {
	self.residual.is_empty() && self.from.is_compatible_with(&self.to)
    }
}

/// Orientation of one candidate: optionally reversed, then rotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Orientation {
    reversed: bool,
    shift: usize,
}

impl Orientation {
    const IDENTITY: Orientation = Orientation { reversed: false, shift: 0 };

    fn apply(&self, path: &Path, index: usize) -> Result<Path> {
	if *self == Orientation::IDENTITY {
	    return Ok(path.clone());
	}

	let mut mutator = path.mutate();
	if self.reversed {
	    mutator = mutator.reverse(index);
	}
	if self.shift > 0 {
	    mutator = mutator.shift(index, self.shift);
	}
	Ok(mutator.build()?)
    }
}

#[derive(Debug, Clone)]
pub struct Fixer<T = StandardConversions, C = Uncancellable> {
    options: FixOptions,
    table: T,
    cancellation: C,
}

impl Fixer {
    pub fn new(options: FixOptions) -> Self {
	Fixer {
	    options,
	    table: StandardConversions,
	    cancellation: Uncancellable,
	}
    }
}

impl Default for Fixer {
    fn default() -> Self {
	Fixer::new(FixOptions::default())
    }
}

impl<T: ConversionTable, C: Cancellation> Fixer<T, C> {
    pub fn with_table<U: ConversionTable>(self, table: U) -> Fixer<U, C> {
	Fixer {
	    options: self.options,
	    table,
	    cancellation: self.cancellation,
	}
    }

    pub fn with_cancellation<D: Cancellation>(self, cancellation: D) -> Fixer<T, D> {
	Fixer {
	    options: self.options,
	    table: self.table,
	    cancellation,
	}
    }

    pub fn options(&self) -> &FixOptions {
	&self.options
    }

    /// Fixes every subpath index both paths share, threading the updated
    /// paths from one index to the next.
    ///
    /// A pair that only became compatible during this call gets one more
    /// seam search, so fixing the outcome again leaves it as it is.
    pub fn auto_fix(&self, from: &Path, to: &Path) -> Result<FixOutcome> {
	self.options.validate()?;

	let shared = from.subpaths().len().min(to.subpaths().len());
	let mut from = from.clone();
	let mut to = to.clone();
	let mut residual = Vec::new();

	for index in 0..shared {
	    let was_compatible = same_kinds(&from, &to, index)?;
	    let mut outcome = self.fix_pair(&from, &to, index)?;

	    if !was_compatible && outcome.residual.is_empty() && same_kinds(&outcome.from, &outcome.to, index)? {
		tracing::trace!(index, "settling the seam of a newly compatible pair");
		outcome = self.fix_pair(&outcome.from, &outcome.to, index)?;
	    }

	    from = outcome.from;
	    to = outcome.to;
	    residual.extend(outcome.residual);
	}

	if !residual.is_empty() {
	    tracing::debug!(count = residual.len(), "unconvertible command pairs left");
	}
	Ok(FixOutcome { from, to, residual })
    }

    /// One pass over subpath `index` with the side holding more commands in
    /// the from role.
    fn fix_pair(&self, from: &Path, to: &Path, index: usize) -> Result<FixOutcome> {
	let swapped = subpath(to, index)?.len() > subpath(from, index)?.len();
	let (larger, smaller) = if swapped { (to, from) } else { (from, to) };

	let (larger, smaller) = self.auto_fix_subpath(larger, smaller, index)?;
	let outcome = self.auto_convert(&larger, &smaller, index)?;

	if !swapped {
	    return Ok(outcome);
	}
	Ok(FixOutcome {
	    from: outcome.to,
	    to: outcome.from,
	    residual: outcome
		.residual
		.into_iter()
		.map(|m| Mismatch {
		    from_kind: m.to_kind,
		    to_kind: m.from_kind,
		    ..m
		})
		.collect(),
	})
    }

    /// Reorients subpath `index` of `from` to best match the same subpath of
    /// `to` and inserts points into both until their alignments have no gaps.
    ///
    /// When both subpaths already have the same kind sequence only the seam
    /// moves: orientations that change the kind sequence are skipped and no
    /// points are inserted.
    pub fn auto_fix_subpath(&self, from: &Path, to: &Path, index: usize) -> Result<(Path, Path)> {
	let source = subpath(from, index)?;
	let target = subpath(to, index)?;

	if source.kinds() == target.kinds() {
	    let kinds = target.kinds();
	    let (candidate, _) = self.best_candidate(from, target, index, |c| c.kinds() == kinds)?;
	    return Ok((candidate, to.clone()));
	}

	let (candidate, alignment) = self.best_candidate(from, target, index, |_| true)?;

	let from_count = subpath(&candidate, index)?.len();
	let from_splits = streak_splits(&alignment.a, from_count);
	let to_splits = streak_splits(&alignment.b, target.len());
	tracing::debug!(index, from = ?from_splits, to = ?to_splits, "gap streaks");

	Ok((insert_points(&candidate, index, &from_splits)?, insert_points(to, index, &to_splits)?))
    }

    /// Aligns every orientation of `from` that passes `eligible` against
    /// `target` and keeps the strictly best one. The identity is always
    /// evaluated, so it wins ties.
    fn best_candidate<E>(&self, from: &Path, target: &SubPath, index: usize, eligible: E) -> Result<(Path, Alignment)>
    where E: Fn(&SubPath) -> bool
    {
	let evaluate = |candidate: &Path| -> Result<Alignment> {
	    Ok(align(
		subpath(candidate, index)?.commands(),
		target.commands(),
		self.options.gap_penalty,
		|a, b| self.options.score(&self.table, a, b),
	    ))
	};

	let orientations = self.orientations(from, index)?;
	let mut best = from.clone();
	let mut best_alignment = evaluate(&best)?;
	let mut chosen = Orientation::IDENTITY;

	for (n, orientation) in orientations.iter().enumerate().skip(1) {
	    if self.cancellation.is_cancelled() {
		tracing::debug!(index, evaluated = n, "candidate search cancelled");
		break;
	    }

	    let candidate = orientation.apply(from, index)?;
	    if !eligible(subpath(&candidate, index)?) {
		continue;
	    }
	    let alignment = evaluate(&candidate)?;
	    tracing::trace!(index, ?orientation, score = alignment.score, "candidate aligned");
	    if alignment.score > best_alignment.score {
		best = candidate;
		best_alignment = alignment;
		chosen = *orientation;
	    }
	}

	tracing::debug!(index, orientation = ?chosen, score = best_alignment.score, "chose candidate");
	Ok((best, best_alignment))
    }

    /// Identity, reversal, then for closed subpaths every rotation of the
    /// reversal. Rotations of the original follow those, so a truncated or
    /// cancelled search still covers the reversal's rotations first.
    fn orientations(&self, from: &Path, index: usize) -> Result<Vec<Orientation>> {
	let source = subpath(from, index)?;
	let mut orientations = vec![Orientation::IDENTITY, Orientation { reversed: true, shift: 0 }];

	if source.is_closed() {
	    let reversed = Orientation { reversed: true, shift: 0 }.apply(from, index)?;
	    let reversed_cycle = subpath(&reversed, index)?.cycle_len();
	    orientations.extend((1..reversed_cycle).map(|shift| Orientation { reversed: true, shift }));
	    orientations.extend((1..source.cycle_len()).map(|shift| Orientation { reversed: false, shift }));
	}

	if let Some(max) = self.options.max_candidates {
	    orientations.truncate(max.max(1));
	}
	Ok(orientations)
    }

    /// Unifies kinds pairwise on subpath `index`: the from side converts when
    /// it can, otherwise the to side, otherwise the pair is reported.
    pub fn auto_convert(&self, from: &Path, to: &Path, index: usize) -> Result<FixOutcome> {
	let a = subpath(from, index)?;
	let b = subpath(to, index)?;

	let mut from_edits = from.mutate();
	let mut to_edits = to.mutate();
	let mut residual = Vec::new();

	for (command, (ca, cb)) in a.commands().iter().zip(b.commands()).enumerate() {
	    let (ka, kb) = (ca.kind(), cb.kind());
	    if ka == kb {
		continue;
	    }

	    if self.table.can_convert(ka, kb) && ca.convert_to(kb).is_some() {
		from_edits = from_edits.convert(index, command, kb);
	    } else if self.table.can_convert(kb, ka) && cb.convert_to(ka).is_some() {
		to_edits = to_edits.convert(index, command, ka);
	    } else {
		residual.push(Mismatch {
		    subpath: index,
		    command,
		    from_kind: ka,
		    to_kind: kb,
		});
	    }
	}

	Ok(FixOutcome {
	    from: from_edits.build()?,
	    to: to_edits.build()?,
	    residual,
	})
    }
}

fn subpath(path: &Path, index: usize) -> Result<&SubPath> {
    let len = path.subpaths().len();
    Ok(path.subpath(index).ok_or(MutationError::SubPathOutOfRange { index, len })?)
}

fn same_kinds(from: &Path, to: &Path, index: usize) -> Result<bool> {
    Ok(subpath(from, index)?.kinds() == subpath(to, index)?.kinds())
}

/// Points to insert per command. A streak before index `c` splits command
/// `c`, clamped to `[1, count - 1]` since neither the move nor anything past
/// the last command can take new points.
fn streak_splits(slots: &[AlignedSlot], count: usize) -> BTreeMap<usize, usize> {
    let mut splits = BTreeMap::new();
    if count < 2 {
	return splits;
    }

    for (length, before) in Alignment::gap_streaks(slots, count) {
	*splits.entry(before.clamp(1, count - 1)).or_insert(0) += length;
    }
    splits
}

fn insert_points(path: &Path, index: usize, splits: &BTreeMap<usize, usize>) -> Result<Path> {
    if splits.is_empty() {
	return Ok(path.clone());
    }

    let mut mutator = path.mutate();
    for (&command, &count) in splits.iter().rev() {
	mutator = mutator.split_evenly(index, command, count);
    }
    Ok(mutator.build()?)
}

/// Fixes `from` against `to` with the standard conversion table.
pub fn auto_fix(from: &Path, to: &Path, options: &FixOptions) -> Result<FixOutcome> {
    Fixer::new(options.clone()).auto_fix(from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use svgr::Point;
    use CommandKind::*;

    fn path(d: &str) -> Path {
	d.parse().unwrap()
    }

    #[test]
    fn compatible_pair_is_untouched() {
	let a = path("M 0 0 L 10 0 L 10 10 Z");
	let b = path("M 5 5 L 20 0 L 0 20 Z");
	let outcome = Fixer::default().auto_fix(&a, &b).unwrap();

	assert_eq!(outcome.from, a);
	assert_eq!(outcome.to, b);
	assert!(outcome.is_compatible());
    }

    #[test]
    fn compatible_pair_still_moves_its_seam() {
	let from = path("M 0 0 L 10 0 L 10 10 L 0 10 Z");
	let to = path("M 10 10 L 0 10 L 0 0 L 10 0 Z");
	let (fixed, target) = Fixer::default().auto_fix_subpath(&from, &to, 0).unwrap();

	assert_eq!(fixed.subpaths()[0].origin(), Point::new(10.0, 10.0));
	assert_eq!(fixed.to_string(), "M 10 10 L 0 10 L 0 0 L 10 0 Z");
	assert_eq!(target, to);
    }

    #[test]
    fn reseamed_pair_is_stable() {
	let from = path("M 0 0 L 10 0 L 10 10 L 0 10 Z");
	let to = path("M 10 10 L 0 10 L 0 0 L 10 0 Z");
	let fixer = Fixer::default();

	let once = fixer.auto_fix(&from, &to).unwrap();
	assert_eq!(once.from.to_string(), to.to_string());
	assert_eq!(fixer.auto_fix(&once.from, &once.to).unwrap(), once);
    }

    #[test]
    fn compatible_pair_gets_no_new_points() {
	// the gapped alignment scores higher here, but the kinds already agree
	let from = path("M 0 0 L 10 0 L 10 10");
	let to = path("M 0 0 L 10 10 L 20 20");
	let outcome = Fixer::default().auto_fix(&from, &to).unwrap();

	assert_eq!(outcome.from, from);
	assert_eq!(outcome.to, to);
    }

    #[test]
    fn curved_cycle_keeps_its_length_when_reseamed() {
	let from = path("M 0 0 C 0 -5 10 -5 10 0 C 10 5 0 5 0 0 Z");
	let to = path("M 10 0 C 10 5 0 5 0 0 C 0 -5 10 -5 10 0 Z");
	let outcome = Fixer::default().auto_fix(&from, &to).unwrap();

	assert_eq!(outcome.from.subpaths()[0].kinds(), vec![Move, Cubic, Cubic, Close]);
	assert_eq!(outcome.from.subpaths()[0].origin(), Point::new(10.0, 0.0));
	assert_eq!(outcome.to, to);
    }

    #[test]
    fn streaks_merge_after_clamping() {
	let slots = [
	    AlignedSlot { index: None, matched_index: Some(0) },
	    AlignedSlot { index: Some(0), matched_index: Some(1) },
	    AlignedSlot { index: None, matched_index: Some(2) },
	    AlignedSlot { index: Some(1), matched_index: Some(3) },
	    AlignedSlot { index: None, matched_index: Some(4) },
	];
	let splits = streak_splits(&slots, 2);
	assert_eq!(splits.into_iter().collect::<Vec<_>>(), vec![(1, 3)]);
    }

    #[test]
    fn reversed_candidate_wins_for_reversed_open_path() {
	let from = path("M 10 10 L 10 0 L 5 0 L 0 0");
	let to = path("M 0 0 L 10 10");
	let (fixed, _) = Fixer::default().auto_fix_subpath(&from, &to, 0).unwrap();

	assert_eq!(fixed.subpaths()[0].origin(), Point::new(0.0, 0.0));
	assert_eq!(fixed.subpaths()[0].end(), Point::new(10.0, 10.0));
    }

    #[test]
    fn rotation_finds_the_seam() {
	let from = path("M 10 0 L 10 10 Q 5 12 0 10 L 0 5 L 0 0 Z");
	let to = path("M 0 0 L 10 0 L 10 10 L 0 10 Z");
	let outcome = Fixer::default().auto_fix(&from, &to).unwrap();

	assert!(outcome.is_compatible());
	assert_eq!(outcome.from.subpaths()[0].origin(), Point::new(0.0, 0.0));
    }

    #[test]
    fn max_candidates_limits_the_search() {
	let fixer = Fixer::new(FixOptions {
	    max_candidates: Some(1),
	    ..FixOptions::default()
	});
	let from = path("M 10 0 L 10 10 L 0 10 L 0 0 Z");
	let to = path("M 0 0 L 10 0 L 10 10 L 5 12 L 0 10 Z");
	let (fixed, _) = fixer.auto_fix_subpath(&from, &to, 0).unwrap();

	assert_eq!(fixed.subpaths()[0].origin(), Point::new(10.0, 0.0));
    }

    #[test]
    fn cancelled_search_keeps_identity() {
	let fixer = Fixer::default().with_cancellation(|| true);
	let from = path("M 10 10 L 10 0 L 5 0 L 0 0");
	let to = path("M 0 0 L 10 10");
	let (fixed, _) = fixer.auto_fix_subpath(&from, &to, 0).unwrap();

	assert_eq!(fixed.subpaths()[0].origin(), Point::new(10.0, 10.0));
    }

    #[test]
    fn convert_prefers_the_from_side() {
	let a = path("M 0 0 L 10 0 Q 15 5 10 10");
	let b = path("M 0 0 Q 5 5 10 0 L 10 10");
	let outcome = Fixer::default().auto_convert(&a, &b, 0).unwrap();

	assert_eq!(outcome.from.subpaths()[0].kinds(), vec![Move, Quadratic, Quadratic]);
	assert_eq!(outcome.to.subpaths()[0].kinds(), vec![Move, Quadratic, Quadratic]);
	assert!(outcome.residual.is_empty());
    }

    #[test]
    fn custom_table_can_forbid_conversions() {
	let fixer = Fixer::default().with_table(|from: CommandKind, to: CommandKind| from == to);
	let a = path("M 0 0 L 10 0");
	let b = path("M 0 0 Q 5 5 10 0");
	let outcome = fixer.auto_convert(&a, &b, 0).unwrap();

	assert_eq!(
	    outcome.residual,
	    vec![Mismatch { subpath: 0, command: 1, from_kind: Line, to_kind: Quadratic }]
	);
    }

    #[test]
    fn out_of_range_subpath() {
	let a = path("M 0 0 L 10 0");
	assert!(Fixer::default().auto_convert(&a, &a, 2).is_err());
    }
}
