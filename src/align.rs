//! Global sequence alignment (Needleman–Wunsch).

/// One position of an aligned sequence. `index` is this side's element, or
/// `None` for a gap; `matched_index` is the other side's element at the same
/// position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignedSlot {
    pub index: Option<usize>,
    pub matched_index: Option<usize>,
}

impl AlignedSlot {
    pub fn is_gap(&self) -> bool {
	self.index.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub a: Vec<AlignedSlot>,
    pub b: Vec<AlignedSlot>,
    pub score: f64,
}

impl Alignment {
    pub fn len(&self) -> usize {
	self.a.len()
    }

    pub fn is_empty(&self) -> bool {
	self.a.is_empty()
    }

    /// Maximal runs of gaps on one side, as `(length, index)` where `index`
    /// is the side's element right after the run, or the side's length when
    /// the run is at the end.
    pub fn gap_streaks(slots: &[AlignedSlot], count: usize) -> Vec<(usize, usize)> {
	let mut streaks = Vec::new();
	let mut run = 0;

	for slot in slots {
	    match slot.index {
		None => run += 1,
		Some(index) => {
		    if run > 0 {
			streaks.push((run, index));
			run = 0;
		    }
		},
	    }
	}
	if run > 0 {
	    streaks.push((run, count));
	}

	streaks
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Start,
    Diagonal,
    ConsumeA,
    ConsumeB,
}

/// Aligns `a` against `b`. Every gap costs `gap_penalty`; pairing two
/// elements earns `score(a, b)`. Ties prefer pairing, then consuming `a`.
pub fn align<T, F>(a: &[T], b: &[T], gap_penalty: f64, mut score: F) -> Alignment
where F: FnMut(&T, &T) -> f64
{
    let (m, n) = (a.len(), b.len());
    let width = n + 1;
    let mut table = vec![0.0f64; (m + 1) * width];
    let mut steps = vec![Step::Start; (m + 1) * width];

    for i in 1..=m {
	table[i * width] = table[(i - 1) * width] - gap_penalty;
	steps[i * width] = Step::ConsumeA;
    }
    for j in 1..=n {
	table[j] = table[j - 1] - gap_penalty;
	steps[j] = Step::ConsumeB;
    }

    for i in 1..=m {
	for j in 1..=n {
	    let diagonal = table[(i - 1) * width + j - 1] + score(&a[i - 1], &b[j - 1]);
	    let consume_a = table[(i - 1) * width + j] - gap_penalty;
	    let consume_b = table[i * width + j - 1] - gap_penalty;

	    let (best, step) = if diagonal >= consume_a && diagonal >= consume_b {
		(diagonal, Step::Diagonal)
	    } else if consume_a >= consume_b {
		(consume_a, Step::ConsumeA)
	    } else {
		(consume_b, Step::ConsumeB)
	    };
	    table[i * width + j] = best;
	    steps[i * width + j] = step;
	}
    }

    let mut slots_a = Vec::with_capacity(m.max(n));
    let mut slots_b = Vec::with_capacity(m.max(n));
    let (mut i, mut j) = (m, n);
    while i > 0 || j > 0 {
	match steps[i * width + j] {
	    Step::Diagonal => {
		i -= 1;
		j -= 1;
		slots_a.push(AlignedSlot { index: Some(i), matched_index: Some(j) });
		slots_b.push(AlignedSlot { index: Some(j), matched_index: Some(i) });
	    },
	    Step::ConsumeA => {
		i -= 1;
		slots_a.push(AlignedSlot { index: Some(i), matched_index: None });
		slots_b.push(AlignedSlot { index: None, matched_index: Some(i) });
	    },
	    Step::ConsumeB => {
		j -= 1;
		slots_a.push(AlignedSlot { index: None, matched_index: Some(j) });
		slots_b.push(AlignedSlot { index: Some(j), matched_index: None });
	    },
	    Step::Start => break,
	}
    }
    slots_a.reverse();
    slots_b.reverse();

    Alignment {
	a: slots_a,
	b: slots_b,
	score: table[m * width + n],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(a: &char, b: &char) -> f64 {
	if a == b {
	    1.0
	} else {
	    -1.0e9
	}
    }

    fn indices(slots: &[AlignedSlot]) -> Vec<Option<usize>> {
	slots.iter().map(|s| s.index).collect()
    }

    #[test]
    fn identical_sequences_align_diagonally() {
	let a = ['a', 'b', 'c'];
	let alignment = align(&a, &a, 0.0, exact);

	assert_eq!(alignment.score, 3.0);
	assert_eq!(indices(&alignment.a), vec![Some(0), Some(1), Some(2)]);
	assert_eq!(alignment.a, alignment.b);
    }

    #[test]
    fn missing_element_becomes_a_gap() {
	let alignment = align(&['a', 'b', 'c'], &['a', 'c'], 0.0, exact);

	assert_eq!(alignment.len(), 3);
	assert_eq!(indices(&alignment.b), vec![Some(0), None, Some(1)]);
	assert_eq!(alignment.b[1].matched_index, Some(1));
	assert_eq!(alignment.score, 2.0);
    }

    #[test]
    fn gap_penalty_is_charged() {
	let alignment = align(&['a', 'b', 'c'], &['a', 'c'], 0.25, exact);
	assert_eq!(alignment.score, 1.75);
    }

    #[test]
    fn empty_side() {
	let alignment = align(&['a', 'b'], &[], 1.0, exact);
	assert_eq!(alignment.score, -2.0);
	assert_eq!(indices(&alignment.b), vec![None, None]);

	let alignment = align::<char, _>(&[], &[], 1.0, exact);
	assert!(alignment.is_empty());
	assert_eq!(alignment.score, 0.0);
    }

    #[test]
    fn ties_prefer_the_diagonal_then_consuming_a() {
	let flat = |_: &char, _: &char| 0.0;
	let alignment = align(&['a', 'b'], &['c'], 0.0, flat);
	// diagonal at the corner, then the leftover `a` element
	assert_eq!(indices(&alignment.a), vec![Some(0), Some(1)]);
	assert_eq!(indices(&alignment.b), vec![None, Some(0)]);
    }

    #[test]
    fn streaks_point_at_the_following_element() {
	let alignment = align(&['a', 'x', 'y', 'b', 'z'], &['a', 'b'], 0.0, exact);
	assert_eq!(Alignment::gap_streaks(&alignment.b, 2), vec![(2, 1), (1, 2)]);
	assert!(Alignment::gap_streaks(&alignment.a, 5).is_empty());
    }
}
