//! Pulls `<path>` elements out of an SVG document with the transforms of
//! their enclosing groups baked in.

use svg::node::element::tag;
use svg::node::Attributes;
use svg::parser::{Event, Parser};

use crate::error::{ParseError, Result};
use crate::path::Path;
use crate::transform::parse_transform_list;
use crate::types::Transform;

#[derive(Debug, Clone, PartialEq)]
pub struct PathElement {
    pub id: Option<String>,
    pub path: Path,
}

/// Reads every `<path>` in document order. Paths without a `d` attribute are
/// skipped.
pub fn load_paths(content: &str) -> Result<Vec<PathElement>> {
    let parser = svg::read(content).map_err(|err| ParseError::document(0, err.to_string()))?;
    collect_paths(parser)
}

pub fn open_paths(file: impl AsRef<std::path::Path>) -> Result<Vec<PathElement>> {
    let mut content = String::new();
    let parser = svg::open(file.as_ref(), &mut content).map_err(|err| ParseError::document(0, err.to_string()))?;
    collect_paths(parser)
}

fn collect_paths(parser: Parser<'_>) -> Result<Vec<PathElement>> {
    // one entry per open group, each in application order
    let mut groups: Vec<Vec<Transform>> = Vec::new();
    let mut elements = Vec::new();

    for event in parser {
	match event {
	    Event::Tag(tag::Group, tag::Type::Start, attributes) => {
		let own = match attribute(&attributes, "transform") {
		    Some(value) => parse_transform_list(&value)?,
		    None => Vec::new(),
		};
		groups.push(own);
	    },
	    Event::Tag(tag::Group, tag::Type::End, _) => {
		groups.pop();
	    },
	    Event::Tag(tag::Path, tag::Type::Start | tag::Type::Empty, attributes) => {
		let d = match attribute(&attributes, "d") {
		    Some(value) => value,
		    None => continue,
		};

		let mut transforms = match attribute(&attributes, "transform") {
		    Some(value) => parse_transform_list(&value)?,
		    None => Vec::new(),
		};
		for group in groups.iter().rev() {
		    transforms.extend_from_slice(group);
		}

		let path = Path::parse_with_transforms(&d, &transforms)?;
		let id = attribute(&attributes, "id");
		tracing::debug!(id = ?id, subpaths = path.subpaths().len(), "loaded path element");
		elements.push(PathElement { id, path });
	    },
	    _ => (),
	}
    }

    Ok(elements)
}

fn attribute(attributes: &Attributes, name: &str) -> Option<String> {
    attributes.get(name).map(|value| {
	let text: &str = value;
	text.to_string()
    })
}
