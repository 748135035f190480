//! Elliptical arc geometry: conversion from the SVG endpoint parameterization
//! to a center parameterization, subdivision, and affine transformation.

use std::f64::consts::PI;

use crate::types::{Point, Transform};

/// The parameters of an `A`/`a` command besides its endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcParams {
    pub rx: f64,
    pub ry: f64,
    /// Rotation of the ellipse's x axis, in degrees.
    pub x_axis_rotation: f64,
    pub large_arc: bool,
    pub sweep: bool,
}

impl ArcParams {
    pub fn new(rx: f64, ry: f64, x_axis_rotation: f64, large_arc: bool, sweep: bool) -> Self {
	ArcParams { rx, ry, x_axis_rotation, large_arc, sweep }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct CenterArc {
    center: Point,
    rx: f64,
    ry: f64,
    phi: f64,
    theta1: f64,
    d_theta: f64,
}

impl CenterArc {
    /// Endpoint to center conversion. Returns `None` for arcs that SVG renders
    /// as a straight line or not at all (zero radius, coincident endpoints).
    pub(crate) fn from_endpoints(start: Point, end: Point, params: &ArcParams) -> Option<CenterArc> {
	let mut rx = params.rx.abs();
	let mut ry = params.ry.abs();
	if rx == 0.0 || ry == 0.0 || start.approx_eq(end, 1e-12) {
	    return None;
	}

	let phi = params.x_axis_rotation.to_radians();
	let (sin, cos) = phi.sin_cos();

	let hx = (start.x - end.x) / 2.0;
	let hy = (start.y - end.y) / 2.0;
	let x1_prime = cos * hx + sin * hy;
	let y1_prime = -sin * hx + cos * hy;

	// out-of-range radii are scaled up until the ellipse fits
	let lambda = x1_prime.powi(2) / rx.powi(2) + y1_prime.powi(2) / ry.powi(2);
	if lambda > 1.0 {
	    let s = lambda.sqrt();
	    rx *= s;
	    ry *= s;
	}

	let num = rx.powi(2) * ry.powi(2) - rx.powi(2) * y1_prime.powi(2) - ry.powi(2) * x1_prime.powi(2);
	let den = rx.powi(2) * y1_prime.powi(2) + ry.powi(2) * x1_prime.powi(2);
	let mut r_scalar = (num / den).max(0.0).sqrt();
	if params.large_arc == params.sweep {
	    r_scalar = -r_scalar;
	}

	let xc_prime = r_scalar * rx * y1_prime / ry;
	let yc_prime = -r_scalar * ry * x1_prime / rx;

	let center = Point::new(
	    cos * xc_prime - sin * yc_prime + (start.x + end.x) / 2.0,
	    sin * xc_prime + cos * yc_prime + (start.y + end.y) / 2.0,
	);

	let u = Point::new((x1_prime - xc_prime) / rx, (y1_prime - yc_prime) / ry);
	let v = Point::new((-x1_prime - xc_prime) / rx, (-y1_prime - yc_prime) / ry);

	let theta1 = angle_between(Point::new(1.0, 0.0), u);
	let mut d_theta = angle_between(u, v) % (2.0 * PI);
	if !params.sweep && d_theta > 0.0 {
	    d_theta -= 2.0 * PI;
	} else if params.sweep && d_theta < 0.0 {
	    d_theta += 2.0 * PI;
	}

	Some(CenterArc { center, rx, ry, phi, theta1, d_theta })
    }

    pub(crate) fn point_at(&self, angle: f64) -> Point {
	let (sin_phi, cos_phi) = self.phi.sin_cos();
	let (sin, cos) = angle.sin_cos();
	let x = self.rx * cos;
	let y = self.ry * sin;
	Point::new(
	    self.center.x + cos_phi * x - sin_phi * y,
	    self.center.y + sin_phi * x + cos_phi * y,
	)
    }

    /// Parameters of the piece of this arc between fractions `t0` and `t1`.
    fn piece(&self, t0: f64, t1: f64) -> ArcParams {
	let sweep_angle = self.d_theta * (t1 - t0);
	ArcParams {
	    rx: self.rx,
	    ry: self.ry,
	    x_axis_rotation: self.phi.to_degrees(),
	    large_arc: sweep_angle.abs() > PI,
	    sweep: sweep_angle > 0.0,
	}
    }
}

fn angle_between(u: Point, v: Point) -> f64 {
    (u.x * v.y - u.y * v.x).atan2(u.x * v.x + u.y * v.y)
}

/// Splits an arc at the increasing fractions `ts`, returning `ts.len() + 1`
/// pieces as `(start, params, end)` triples. The last piece ends exactly at
/// `end`.
pub(crate) fn split(start: Point, end: Point, params: &ArcParams, ts: &[f64]) -> Vec<(Point, ArcParams, Point)> {
    let center = CenterArc::from_endpoints(start, end, params);

    let mut bounds = Vec::with_capacity(ts.len() + 2);
    bounds.push(0.0);
    bounds.extend_from_slice(ts);
    bounds.push(1.0);

    let point_at = |t: f64| -> Point {
	if t >= 1.0 {
	    return end;
	}
	if t <= 0.0 {
	    return start;
	}
	match &center {
	    Some(arc) => arc.point_at(arc.theta1 + arc.d_theta * t),
	    None => start.lerp(end, t),
	}
    };

    bounds
	.windows(2)
	.map(|w| {
	    let piece = match &center {
		Some(arc) => arc.piece(w[0], w[1]),
		None => *params,
	    };
	    (point_at(w[0]), piece, point_at(w[1]))
	})
	.collect()
}

/// Maps arc parameters through the linear part of `m`. The image of the
/// ellipse is recovered from the singular value decomposition of
/// `m * rotate(phi) * scale(rx, ry)`.
pub(crate) fn transform(params: &ArcParams, m: &Transform) -> ArcParams {
    let (sin, cos) = params.x_axis_rotation.to_radians().sin_cos();

    // columns of the ellipse matrix
    let a = m.xx * cos * params.rx + m.xy * sin * params.rx;
    let c = m.yx * cos * params.rx + m.yy * sin * params.rx;
    let b = -m.xx * sin * params.ry + m.xy * cos * params.ry;
    let d = -m.yx * sin * params.ry + m.yy * cos * params.ry;

    let e = (a + d) / 2.0;
    let f = (a - d) / 2.0;
    let g = (c + b) / 2.0;
    let h = (c - b) / 2.0;

    let q = e.hypot(h);
    let r = f.hypot(g);
    let a1 = g.atan2(f);
    let a2 = h.atan2(e);

    let sweep = if m.determinant() < 0.0 { !params.sweep } else { params.sweep };

    ArcParams {
	rx: q + r,
	ry: (q - r).abs(),
	x_axis_rotation: ((a2 + a1) / 2.0).to_degrees(),
	large_arc: params.large_arc,
	sweep,
    }
}
