use std::time::{Duration, Instant};

use svgr::Path;
use timing::{linear, TimingFn};

pub trait Animatable {
    fn animate<'a>(&'a self, other: &'a Self, duration: Duration) -> Animation<'a, Self>
    where Self: Clone;

    /// Sets `self` to the blend of `v1` and `v2`; `at` is in [0, 1].
    fn apply_interpol<'a>(&'a mut self, v1: &'a Self, v2: &'a Self, at: f64);
}

impl Animatable for Path {
    fn animate<'a>(&'a self, other: &'a Self, duration: Duration) -> Animation<'a, Self> {
	let mut animation = Animation::new(self);
	animation.add_frame(other, duration);
	animation
    }

    /// Incompatible operands cannot be blended; the nearer keyframe is shown
    /// instead. Run them through the fixer first.
    fn apply_interpol<'a>(&'a mut self, v1: &'a Self, v2: &'a Self, at: f64) {
	match v1.interpolate(v2, at) {
	    Ok(path) => *self = path,
	    Err(err) => {
		tracing::warn!(%err, "interpolating incompatible paths");
		*self = if at < 0.5 { v1.clone() } else { v2.clone() };
	    },
	}
    }
}

struct Frame<'a, T: Animatable + ?Sized> {
    at: Duration,
    value: &'a T,
}

pub struct Animation<'a, T: Animatable + ?Sized> {
    inst_value: Box<T>,
    frames: Vec<Frame<'a, T>>,
    pub timing_fn: TimingFn<'a>,
    start: Option<Instant>,
}

impl<'a, T: Animatable + Clone> Animation<'a, T> {
    pub fn new(base: &'a T) -> Self {
	Animation {
	    inst_value: Box::new(base.clone()),
	    frames: vec![Frame {
		at: Duration::new(0, 0),
		value: base,
	    }],
	    timing_fn: TimingFn::from(linear),
	    start: None,
	}
    }

    /// Adds a keyframe, replacing any frame already at `at`.
    pub fn add_frame(&mut self, value: &'a T, at: Duration) {
	let order_of = |it: &Frame<'_, T>| it.at.cmp(&at);

	match self.frames.binary_search_by(order_of) {
	    Ok(i) => self.frames[i] = Frame { value, at },
	    Err(i) => self.frames.insert(i, Frame { value, at }),
	};
    }

    pub fn duration(&self) -> Duration {
	self.frames.last().map_or(Duration::new(0, 0), |frame| frame.at)
    }

    pub fn play(&mut self) {
	self.start = Some(Instant::now());
    }

    pub fn current_value(&mut self) -> &T {
	match self.start {
	    Some(start) => self.value_at(start.elapsed()),
	    None => self.frames[0].value,
	}
    }

    /// Value `elapsed` after the start, clamped to the first and last frames.
    pub fn value_at(&mut self, elapsed: Duration) -> &T {
	let frames_len = self.frames.len();
	if frames_len == 1 {
	    return self.frames[0].value;
	}

	let f1_index = match self.frames.binary_search_by(|it| it.at.cmp(&elapsed)) {
	    Ok(i) => i,
	    Err(i) => i.saturating_sub(1),
	};
	if f1_index >= frames_len - 1 {
	    return self.frames[frames_len - 1].value;
	}

	let f1 = &self.frames[f1_index];
	let f2 = &self.frames[f1_index + 1];
	let at = elapsed.saturating_sub(f1.at);
	let end_point = f2.at - f1.at;

	let at_normalized = self.timing_fn.call(at, end_point);
	self.inst_value.as_mut().apply_interpol(f1.value, f2.value, at_normalized);

	self.inst_value.as_ref()
    }
}

pub mod timing {
    use std::time::Duration;

    /// The first duration is the time since the frame started, the second
    /// the length of the frame.
    pub struct TimingFn<'a>(Box<dyn Fn(Duration, Duration) -> f64 + 'a>);

    impl<'a> TimingFn<'a> {
	pub fn call(&self, time: Duration, end_point: Duration) -> f64 {
	    (self.0)(time, end_point)
	}
    }

    impl<'a, F> From<F> for TimingFn<'a>
    where F: Fn(f64) -> f64 + 'a
    {
	fn from(f: F) -> Self {
	    TimingFn(Box::new(move |x, end_point| (f)(duration_to_ratio(x, end_point))))
	}
    }

    pub fn duration_to_ratio(x: Duration, end_point: Duration) -> f64 {
	let x = x.as_secs_f64();
	let end_point = end_point.as_secs_f64();

	if end_point <= 0.0 {
	    return 0.0;
	}

	(x / end_point).clamp(0.0, 1.0)
    }

    pub fn linear(x: f64) -> f64 {
	x
    }

    pub fn ease_in_out(x: f64) -> f64 {
	x * x * (3.0 - 2.0 * x)
    }
}
