//! Fixer tuning and cancellation.
//!
//! ```
//! use pathmorph::FixOptions;
//!
//! let options = FixOptions::from_json(r#"{ "gap_penalty": 0.5 }"#).unwrap();
//! assert_eq!(options.gap_penalty, 0.5);
//! assert_eq!(options.perfect_match_distance, FixOptions::default().perfect_match_distance);
//! ```

use std::time::Instant;

use serde::{Deserialize, Serialize};
use svgr::{Command, ConversionTable};

use crate::error::{MorphError, Result};

pub const DEFAULT_MISMATCH_SCORE: f64 = -1.0e9;
pub const DEFAULT_PERFECT_MATCH_DISTANCE: f64 = 1.0e-3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixOptions {
    /// Subtracted from the alignment score for every gap.
    pub gap_penalty: f64,

    /// Score of pairing two commands when neither kind converts into the
    /// other. Large and negative so such pairs are only chosen when nothing
    /// else fits.
    pub mismatch_score: f64,

    /// End anchors closer than this count as a perfect match.
    pub perfect_match_distance: f64,

    /// Upper bound on the orientations tried per subpath, identity included.
    pub max_candidates: Option<usize>,
}

impl Default for FixOptions {
    fn default() -> Self {
	FixOptions {
	    gap_penalty: 0.0,
	    mismatch_score: DEFAULT_MISMATCH_SCORE,
	    perfect_match_distance: DEFAULT_PERFECT_MATCH_DISTANCE,
	    max_candidates: None,
	}
    }
}

impl FixOptions {
    pub fn from_json(json: &str) -> Result<Self> {
	let options: FixOptions = serde_json::from_str(json)?;
	options.validate()?;
	Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
	if !(self.perfect_match_distance > 0.0 && self.perfect_match_distance.is_finite()) {
	    return Err(MorphError::InvalidOptions {
		message: format!("perfect_match_distance must be positive, got {}", self.perfect_match_distance),
	    });
	}
	if !self.gap_penalty.is_finite() || !self.mismatch_score.is_finite() {
	    return Err(MorphError::InvalidOptions {
		message: String::from("gap_penalty and mismatch_score must be finite"),
	    });
	}
	if self.max_candidates == Some(0) {
	    return Err(MorphError::InvalidOptions {
		message: String::from("max_candidates must allow at least one candidate"),
	    });
	}
	Ok(())
    }

    /// Pairing score used by the aligner: `mismatch_score` for kinds that do
    /// not convert either way, otherwise the inverse end-anchor distance
    /// floored at `perfect_match_distance`.
    pub fn score(&self, table: &impl ConversionTable, a: &Command, b: &Command) -> f64 {
	if !table.either_converts(a.kind(), b.kind()) {
	    return self.mismatch_score;
	}
	1.0 / a.end().distance(b.end()).max(self.perfect_match_distance)
    }
}

/// Cooperative cancellation, polled before each candidate alignment.
pub trait Cancellation {
    fn is_cancelled(&self) -> bool;
}

/// Never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uncancellable;

impl Cancellation for Uncancellable {
    fn is_cancelled(&self) -> bool {
	false
    }
}

/// A deadline: cancelled once it has passed.
impl Cancellation for Instant {
    fn is_cancelled(&self) -> bool {
	Instant::now() >= *self
    }
}

impl<F> Cancellation for F
where F: Fn() -> bool
{
    fn is_cancelled(&self) -> bool {
	(self)()
    }
}
