//! Depth-first traversal of a scene, producing draw commands.

use crate::command::{CircleCommand, Command, PathCommand, Style};
use crate::error::ElementError;
use crate::options::Options;
use crate::scene::{is_hidden, number, point_list, raw_style, translation, Element, ElementKind};
use crate::{Couple, Float, C_ZERO};

use svgtypes::{SimplePathSegment, SimplifyingPathParser};

use std::vec::Vec;

/// Outcome of walking a subtree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Walk {
    /// in render order
    pub commands: Vec<Command>,
    /// every diagnostic, including the invalid points that were kept
    pub errors: Vec<ElementError>,
    /// a command was dropped because of an invalid point
    pub failed: bool,
}

impl Walk {
    /// Whether any point of the subtree was off the grid, kept or not.
    pub fn has_invalid_points(&self) -> bool {
        self.errors.iter().any(|e| matches!(e, ElementError::InvalidPoint { .. }))
    }

    fn append(&mut self, other: Walk) {
        self.commands.extend(other.commands);
        self.errors.extend(other.errors);
        self.failed |= other.failed;
    }
}

/// Converts the children of `parent`, offsetting them by `translate`.
///
/// Each group's own translation is added to the offset handed to its
/// subtree only; siblings never see it.
pub fn walk<E: Element>(parent: &E, translate: Couple, options: &Options) -> Walk {
    let mut result = Walk::default();

    for child in parent.children() {
        if is_hidden(&child) {
            log::debug!("Skipping hidden <{}>", child.tag());
            continue;
        }

        let offset = translate + translation(&child);
        match child.kind() {
            ElementKind::Group => result.append(walk(&child, offset, options)),
            ElementKind::Other => match child.children().is_empty() {
                true => {
                    let error = ElementError::UnsupportedElement { tag: child.tag().into() };
                    log::warn!("{}", error);
                    result.errors.push(error);
                }
                false => log::debug!("Skipping unknown container <{}>", child.tag()),
            },
            kind => match shape(&child, kind, offset, options, &mut result.errors) {
                Ok(Some(command)) => result.commands.push(command),
                Ok(None) => log::debug!("Skipping invisible <{}>", child.tag()),
                Err(error @ ElementError::InvalidPoint { .. }) => {
                    result.failed = true;
                    result.errors.push(error);
                }
                Err(error) => {
                    log::warn!("{}", error);
                    result.errors.push(error);
                }
            },
        }
    }

    result
}

/// Builds the command of a leaf element; `Ok(None)` when nothing would be
/// drawn.
fn shape<E: Element>(
    element: &E,
    kind: ElementKind,
    translate: Couple,
    options: &Options,
    warnings: &mut Vec<ElementError>,
) -> Result<Option<Command>, ElementError> {
    let (stroke, width, fill) = raw_style(element, options.default_stroke_width, options.color_rounding);
    let style = match Style::new(stroke, width, fill) {
        Some(style) => style,
        None => return Ok(None),
    };

    let tag = element.tag();
    let optional = |name: &'static str| match element.attribute(name) {
        Some(_) => number(element, name),
        None => Ok(0.0),
    };

    let (points, open) = match kind {
        ElementKind::Circle => {
            let center = Couple::new(number(element, "cx")?, number(element, "cy")?);
            let radius = match element.attribute("r") {
                Some(_) => number(element, "r")?,
                None => number(element, "z").map_err(|_| ElementError::malformed(tag, "r"))?,
            };
            let circle = CircleCommand::new(center, radius, translate, style, options, warnings)?;
            return Ok(Some(Command::Circle(circle)));
        }
        ElementKind::Path => {
            let d = element.attribute("d").ok_or_else(|| ElementError::malformed(tag, "d"))?;
            path_outline(d).ok_or_else(|| ElementError::malformed(tag, "d"))?
        }
        ElementKind::Polyline | ElementKind::Polygon => {
            let points = element
                .attribute("points")
                .and_then(point_list)
                .filter(|p| !p.is_empty())
                .ok_or_else(|| ElementError::malformed(tag, "points"))?;
            (points, kind == ElementKind::Polyline)
        }
        ElementKind::Line => {
            let start = Couple::new(optional("x1")?, optional("y1")?);
            let end = Couple::new(optional("x2")?, optional("y2")?);
            (Vec::from([start, end]), true)
        }
        ElementKind::Rect => {
            let origin = Couple::new(optional("x")?, optional("y")?);
            let (w, h) = (number(element, "width")?, number(element, "height")?);
            if w < 0.0 || h < 0.0 {
                return Err(ElementError::malformed(tag, "negative size"));
            }
            let corners = [C_ZERO, Couple::new(w, 0.0), Couple::new(w, h), Couple::new(0.0, h)];
            (corners.iter().map(|c| origin + *c).collect(), false)
        }
        ElementKind::Group | ElementKind::Other => return Ok(None),
    };

    PathCommand::new(&points, open, translate, style, options, warnings).map(|path| Some(Command::Path(path)))
}

/// Start points of every segment of a path description, and whether the
/// outline is open.
///
/// Curves and arcs only contribute their end points. An open outline also
/// gets its final end point; a last point equal to the first is dropped.
pub fn path_outline(d: &str) -> Option<(Vec<Couple>, bool)> {
    let mut segments: Vec<(Couple, Couple)> = Vec::new();
    let mut current = C_ZERO;
    let mut start = C_ZERO;

    let couple = |x: f64, y: f64| Couple::new(x as Float, y as Float);

    for segment in SimplifyingPathParser::from(d) {
        let end = match segment.ok()? {
            SimplePathSegment::MoveTo { x, y } => {
                current = couple(x, y);
                start = current;
                continue;
            }
            SimplePathSegment::LineTo { x, y } => couple(x, y),
            SimplePathSegment::CurveTo { x, y, .. } | SimplePathSegment::Quadratic { x, y, .. } => {
                log::debug!("Reducing a curve to its end point ({}, {})", x, y);
                couple(x, y)
            }
            SimplePathSegment::ClosePath => match current == start {
                true => continue,
                false => start,
            },
        };
        segments.push((current, end));
        current = end;
    }

    let (first, _) = *segments.first()?;
    let (_, last) = *segments.last()?;

    let mut points: Vec<Couple> = segments.iter().map(|(s, _)| *s).collect();
    let open = last != first;
    if open {
        points.push(last);
    }

    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }

    Some((points, open))
}
