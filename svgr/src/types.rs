use std::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
	Point { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
	(self.x - other.x).hypot(self.y - other.y)
    }

    pub fn lerp(self, other: Point, t: f64) -> Point {
	self + (other - self) * t
    }

    /// Reflection of `self` through `center`.
    pub fn reflect(self, center: Point) -> Point {
	center * 2.0 - self
    }

    pub fn approx_eq(self, other: Point, eps: f64) -> bool {
	(self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
	Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
	Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
	Point::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
	Point::new(x, y)
    }
}

/// Affine matrix in the same layout cairo uses:
///
/// x' = xx * x + xy * y + x0
/// y' = yx * x + yy * y + y0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub xx: f64,
    pub yx: f64,
    pub xy: f64,
    pub yy: f64,
    pub x0: f64,
    pub y0: f64,
}

impl Default for Transform {
    fn default() -> Self {
	Transform::identity()
    }
}

impl Transform {
    pub const fn new(xx: f64, yx: f64, xy: f64, yy: f64, x0: f64, y0: f64) -> Self {
	Transform { xx, yx, xy, yy, x0, y0 }
    }

    pub const fn identity() -> Self {
	Transform::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub const fn translate(dx: f64, dy: f64) -> Self {
	Transform::new(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
	Transform::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation by `degrees`, counter-clockwise in a y-up frame.
    pub fn rotate(degrees: f64) -> Self {
	let (sin, cos) = degrees.to_radians().sin_cos();
	Transform::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    pub fn apply(&self, p: Point) -> Point {
	Point::new(
	    self.xx * p.x + self.xy * p.y + self.x0,
	    self.yx * p.x + self.yy * p.y + self.y0,
	)
    }

    /// Applies only the linear part, ignoring translation.
    pub fn apply_vector(&self, p: Point) -> Point {
	Point::new(self.xx * p.x + self.xy * p.y, self.yx * p.x + self.yy * p.y)
    }

    pub fn determinant(&self) -> f64 {
	self.xx * self.yy - self.xy * self.yx
    }

    /// The transform that applies `self` first and `next` second.
    pub fn then(&self, next: &Transform) -> Transform {
	Transform {
	    xx: next.xx * self.xx + next.xy * self.yx,
	    yx: next.yx * self.xx + next.yy * self.yx,
	    xy: next.xx * self.xy + next.xy * self.yy,
	    yy: next.yx * self.xy + next.yy * self.yy,
	    x0: next.xx * self.x0 + next.xy * self.y0 + next.x0,
	    y0: next.yx * self.x0 + next.yy * self.y0 + next.y0,
	}
    }
}

/// Whether the coordinates of a path command are absolute or relative to the
/// current point. Decided by the case of the command letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Absolute,
    Relative,
}

impl Position {
    pub fn of(letter: char) -> Position {
	if letter.is_ascii_lowercase() {
	    Position::Relative
	} else {
	    Position::Absolute
	}
    }

    pub fn resolve(self, current: Point, p: Point) -> Point {
	match self {
	    Position::Absolute => p,
	    Position::Relative => current + p,
	}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn then_applies_in_order() {
	let a = Transform::translate(10.0, 0.0);
	let b = Transform::scale(2.0, 3.0);
	let p = Point::new(1.0, 1.0);

	let composed = a.then(&b).apply(p);
	assert_eq!(composed, b.apply(a.apply(p)));
	assert_eq!(composed, Point::new(22.0, 3.0));
    }

    #[test]
    fn rotate_quarter_turn() {
	let p = Transform::rotate(90.0).apply(Point::new(1.0, 0.0));
	assert!(p.approx_eq(Point::new(0.0, 1.0), 1e-12));
    }

    #[test]
    fn relative_positions_offset_current_point() {
	let current = Point::new(5.0, 5.0);
	assert_eq!(Position::of('l').resolve(current, Point::new(1.0, 2.0)), Point::new(6.0, 7.0));
	assert_eq!(Position::of('L').resolve(current, Point::new(1.0, 2.0)), Point::new(1.0, 2.0));
    }
}
