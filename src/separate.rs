//! Entry point choosing between the fixer and a subpath separator.
//!
//! Paths with the same number of subpaths are made compatible by the fixer.
//! Anything else is handed to a [`Separator`], which splits or merges
//! subpaths and returns its own interpolator.

use serde::{Deserialize, Serialize};
use svgr::{MutationError, Path};

use crate::error::Result;
use crate::fix::{FixOutcome, Fixer};
use crate::options::FixOptions;

/// Maps `t` in [0, 1] to path data.
pub type Interpolator = Box<dyn Fn(f64) -> String>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeparateOptions {
    /// Morph into a single combined target instead of one shape per target.
    pub single: bool,
}

pub trait Separator {
    fn separate(&self, from: &str, to: &[&str], options: SeparateOptions) -> Result<Interpolator>;
}

impl<F> Separator for F
where F: Fn(&str, &[&str], SeparateOptions) -> Result<Interpolator>
{
    fn separate(&self, from: &str, to: &[&str], options: SeparateOptions) -> Result<Interpolator> {
	(self)(from, to, options)
    }
}

pub enum Morph {
    Fixed(FixOutcome),
    Separated(Interpolator),
}

impl Morph {
    pub fn interpolator(self) -> Result<Interpolator> {
	match self {
	    Morph::Fixed(outcome) => {
		if !outcome.is_compatible() {
		    return Err(MutationError::Incompatible {
			reason: format!("{} command pairs could not be unified", outcome.residual.len()),
		    }
		    .into());
		}
		let FixOutcome { from, to, .. } = outcome;
		Ok(Box::new(move |t: f64| match from.interpolate(&to, t) {
		    Ok(path) => path.to_string(),
		    Err(_) => from.to_string(),
		}))
	    },
	    Morph::Separated(interpolator) => Ok(interpolator),
	}
    }
}

impl std::fmt::Debug for Morph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
	match self {
	    Morph::Fixed(outcome) => f.debug_tuple("Fixed").field(outcome).finish(),
	    Morph::Separated(_) => f.write_str("Separated(..)"),
	}
    }
}

/// Parses both paths, then fixes them when their subpath counts match and
/// separates them otherwise.
pub fn morph(from: &str, to: &str, options: &FixOptions, separator: &impl Separator) -> Result<Morph> {
    let from_path = Path::parse(from)?;
    let to_path = Path::parse(to)?;

    if from_path.subpaths().len() == to_path.subpaths().len() {
	let outcome = Fixer::new(options.clone()).auto_fix(&from_path, &to_path)?;
	return Ok(Morph::Fixed(outcome));
    }

    tracing::debug!(
	from = from_path.subpaths().len(),
	to = to_path.subpaths().len(),
	"subpath counts differ, separating"
    );
    let interpolator = separator.separate(from, &[to], SeparateOptions::default())?;
    Ok(Morph::Separated(interpolator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn refuse(_: &str, _: &[&str], _: SeparateOptions) -> Result<Interpolator> {
	Err(crate::error::MorphError::SubPathCount { from: 0, to: 0 })
    }

    #[test]
    fn matching_counts_go_through_the_fixer() {
	let morph = morph("M 0 0 L 10 0 L 10 10", "M 0 0 L 10 10", &FixOptions::default(), &refuse).unwrap();
	assert!(matches!(morph, Morph::Fixed(_)));

	let interpolate = morph.interpolator().unwrap();
	assert_eq!(interpolate(0.0), "M 0 0 L 10 0 L 10 10");
	assert_eq!(interpolate(1.0).split(' ').filter(|t| *t == "L").count(), 2);
    }

    #[test]
    fn differing_counts_go_to_the_separator() {
	let calls = Cell::new(0);
	let separator = |from: &str, to: &[&str], options: SeparateOptions| -> Result<Interpolator> {
	    calls.set(calls.get() + 1);
	    assert_eq!(to.len(), 1);
	    assert!(!options.single);
	    let (from, to) = (from.to_string(), to[0].to_string());
	    Ok(Box::new(move |t: f64| if t < 0.5 { from.clone() } else { to.clone() }))
	};

	let morph = morph("M 0 0 L 1 1 M 5 5 L 6 6", "M 0 0 L 2 2", &FixOptions::default(), &separator).unwrap();
	assert_eq!(calls.get(), 1);
	assert_eq!(morph.interpolator().unwrap()(1.0), "M 0 0 L 2 2");
    }

    #[test]
    fn residual_mismatch_has_no_interpolator() {
	let morph = morph("M 0 0 A 5 5 0 0 1 10 0", "M 0 0 L 10 0", &FixOptions::default(), &refuse).unwrap();
	assert!(morph.interpolator().is_err());
    }

    #[test]
    fn parse_errors_surface() {
	assert!(matches!(
	    morph("L 0 0", "M 0 0", &FixOptions::default(), &refuse),
	    Err(crate::error::MorphError::Parse(_))
	));
    }
}
