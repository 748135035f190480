//! Morphing between SVG paths.
//!
//! Two paths can only be interpolated when they have the same subpaths with
//! the same command kinds at every position. [`auto_fix`] gets them there by
//! aligning the commands of each subpath pair, inserting points where one
//! side has none, and converting command kinds into a shared one.
//!
//! ```
//! use pathmorph::{auto_fix, FixOptions};
//! use svgr::Path;
//!
//! let triangle: Path = "M 0 0 L 10 0 L 5 10 Z".parse().unwrap();
//! let square: Path = "M 0 0 L 10 0 L 10 10 L 0 10 Z".parse().unwrap();
//!
//! let outcome = auto_fix(&square, &triangle, &FixOptions::default()).unwrap();
//! assert!(outcome.is_compatible());
//! let halfway = outcome.from.interpolate(&outcome.to, 0.5).unwrap();
//! assert_eq!(halfway.subpaths()[0].len(), 5);
//! ```

pub mod align;
pub mod animation;
mod error;
pub mod fix;
pub mod options;
pub mod separate;

pub use align::{align, AlignedSlot, Alignment};
pub use animation::{Animatable, Animation};
pub use error::{MorphError, Result};
pub use fix::{auto_fix, FixOutcome, Fixer, Mismatch};
pub use options::{Cancellation, FixOptions, Uncancellable};
pub use separate::{morph, Interpolator, Morph, SeparateOptions, Separator};
