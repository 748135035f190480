//! `transform` attribute parsing: `matrix`, `translate`, `scale`, `rotate`,
//! `skewX` and `skewY`.

use nom::{
    character::complete::{alpha1, char, multispace0},
    combinator::{all_consuming, opt},
    multi::{many0, many1},
    number::complete::double,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use crate::error::{ParseError, Result};
use crate::types::Transform;

fn list_separator(input: &str) -> IResult<&str, ()> {
    let (rest, _) = tuple((multispace0, opt(char(',')), multispace0))(input)?;
    Ok((rest, ()))
}

fn css_function(input: &str) -> IResult<&str, (&str, Vec<f64>)> {
    pair(
	terminated(alpha1, multispace0),
	delimited(
	    pair(char('('), multispace0),
	    many1(preceded(list_separator, double)),
	    pair(multispace0, char(')')),
	),
    )(input)
}

fn css_functions(input: &str) -> IResult<&str, Vec<(&str, Vec<f64>)>> {
    all_consuming(terminated(many0(preceded(list_separator, css_function)), list_separator))(input)
}

fn to_transform(name: &str, args: &[f64]) -> Option<Vec<Transform>> {
    let transforms = match (name, args) {
	("matrix", &[a, b, c, d, e, f]) => vec![Transform::new(a, b, c, d, e, f)],
	("translate", &[dx]) => vec![Transform::translate(dx, 0.0)],
	("translate", &[dx, dy]) => vec![Transform::translate(dx, dy)],
	("scale", &[s]) => vec![Transform::scale(s, s)],
	("scale", &[sx, sy]) => vec![Transform::scale(sx, sy)],
	("rotate", &[a]) => vec![Transform::rotate(a)],
	("rotate", &[a, cx, cy]) => vec![
	    Transform::translate(-cx, -cy),
	    Transform::rotate(a),
	    Transform::translate(cx, cy),
	],
	("skewX", &[a]) => vec![Transform::new(1.0, 0.0, a.to_radians().tan(), 1.0, 0.0, 0.0)],
	("skewY", &[a]) => vec![Transform::new(1.0, a.to_radians().tan(), 0.0, 1.0, 0.0, 0.0)],
	_ => return None,
    };
    Some(transforms)
}

/// Parses a `transform` attribute into matrices in application order. The
/// attribute lists its functions outermost first, so the last one written is
/// the first one applied.
pub fn parse_transform_list(attr: &str) -> Result<Vec<Transform>> {
    let (_, functions) = css_functions(attr)
	.map_err(|err| ParseError::document(0, format!("malformed transform '{}': {:?}", attr, err)))?;

    let mut transforms = Vec::new();
    for (name, args) in functions.iter().rev() {
	let parsed = to_transform(name, args)
	    .ok_or_else(|| ParseError::document(0, format!("unsupported transform {}({:?})", name, args)))?;
	transforms.extend(parsed);
    }
    Ok(transforms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    fn apply(transforms: &[Transform], p: Point) -> Point {
	transforms.iter().fold(p, |p, m| m.apply(p))
    }

    #[test]
    fn translate_with_one_argument() {
	assert_eq!(parse_transform_list("translate(5)").unwrap(), vec![Transform::translate(5.0, 0.0)]);
    }

    #[test]
    fn matrix_with_mixed_separators() {
	let transforms = parse_transform_list("matrix(1, 0 0,1 10 -20)").unwrap();
	assert_eq!(transforms, vec![Transform::new(1.0, 0.0, 0.0, 1.0, 10.0, -20.0)]);
    }

    #[test]
    fn last_function_applies_first() {
	let transforms = parse_transform_list("translate(10,0) scale(2)").unwrap();
	assert_eq!(apply(&transforms, Point::new(1.0, 1.0)), Point::new(12.0, 2.0));
    }

    #[test]
    fn rotate_about_a_point() {
	let transforms = parse_transform_list("rotate(180 5 5)").unwrap();
	assert!(apply(&transforms, Point::new(0.0, 0.0)).approx_eq(Point::new(10.0, 10.0), 1e-9));
    }

    #[test]
    fn rejects_unknown_functions_and_garbage() {
	assert!(parse_transform_list("wobble(1)").is_err());
	assert!(parse_transform_list("scale(1").is_err());
	assert!(parse_transform_list("matrix(1 2 3)").is_err());
    }

    #[test]
    fn empty_list_is_identity() {
	assert!(parse_transform_list("  ").unwrap().is_empty());
    }
}
