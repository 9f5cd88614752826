//! Element tree capability and typed attribute parsing.

use crate::color::{convert, ColorRounding, NONE};
use crate::error::ElementError;
use crate::{Couple, Float, C_ZERO};

use rgb::RGBA8;
use svgtypes::{Color, NumberListParser, TransformListParser, TransformListToken};
use vek::vec::Extent2;

use std::str::FromStr;
use std::string::String;
use std::vec::Vec;

/// Read-only view of one element of a scene document.
pub trait Element: Sized {
    /// local name, without namespace
    fn tag(&self) -> &str;

    fn attribute(&self, name: &str) -> Option<&str>;

    /// child elements, in document order
    fn children(&self) -> Vec<Self>;

    fn kind(&self) -> ElementKind {
        ElementKind::from_tag(self.tag())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// `g` and `layer`
    Group,
    Path,
    Circle,
    Polyline,
    Polygon,
    Line,
    Rect,
    Other,
}

impl ElementKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "g" | "layer" => ElementKind::Group,
            "path" => ElementKind::Path,
            "circle" => ElementKind::Circle,
            "polyline" => ElementKind::Polyline,
            "polygon" => ElementKind::Polygon,
            "line" => ElementKind::Line,
            "rect" => ElementKind::Rect,
            _ => ElementKind::Other,
        }
    }
}

/// Owned element, for scenes built in code.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneNode {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }
}

impl<'a> Element for &'a SceneNode {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn children(&self) -> Vec<Self> {
        let node: &'a SceneNode = *self;
        node.children.iter().collect()
    }
}

pub fn is_hidden<E: Element>(element: &E) -> bool {
    element.attribute("display") == Some("none")
}

pub fn number<E: Element>(element: &E, name: &'static str) -> Result<Float, ElementError> {
    let malformed = || ElementError::malformed(element.tag(), name);
    let value = element.attribute(name).ok_or_else(malformed)?;
    let value = value.trim().parse::<f64>().map_err(|_| malformed())?;
    match value.is_finite() {
        true => Ok(value as Float),
        false => Err(malformed()),
    }
}

/// `x,y x,y ...`; an odd number of values is an error.
pub fn point_list(value: &str) -> Option<Vec<Couple>> {
    let numbers = NumberListParser::from(value)
        .map(|n| n.map(|n| n as Float))
        .collect::<Result<Vec<_>, _>>()
        .ok()?;

    match numbers.len() % 2 {
        0 => Some(numbers.chunks(2).map(|c| Couple::new(c[0], c[1])).collect()),
        _ => None,
    }
}

/// Missing or unparsable opacities count as fully opaque.
pub fn opacity(value: Option<&str>) -> Float {
    value
        .and_then(|v| v.trim().parse::<Float>().ok())
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
        .unwrap_or(1.0)
}

/// Quantized and packed color, or `NONE` for `none`, missing and
/// unparsable values.
pub fn paint(value: Option<&str>, opacity: Float, rounding: ColorRounding) -> u8 {
    let color = match value.map(str::trim) {
        None | Some("none") => return NONE,
        Some(value) => match Color::from_str(value) {
            Ok(color) => color,
            Err(_) => {
                log::warn!("Unsupported color: {}", value);
                return NONE;
            }
        },
    };

    let alpha = (opacity * (color.alpha as Float / 255.0) * 255.0) as u8;
    convert(RGBA8::new(color.red, color.green, color.blue, alpha), rounding)
}

/// Stroke, fill and width of an element, before consistency checks.
pub fn raw_style<E: Element>(element: &E, default_width: u8, rounding: ColorRounding) -> (u8, u8, u8) {
    let width = match element.attribute("stroke-width") {
        None => default_width,
        Some(w) => w.trim().parse::<u8>().unwrap_or(0),
    };

    let global = opacity(element.attribute("opacity"));
    let stroke_opacity = global * opacity(element.attribute("stroke-opacity"));
    let fill_opacity = global * opacity(element.attribute("fill-opacity"));

    let stroke = paint(element.attribute("stroke"), stroke_opacity, rounding);
    let fill = paint(element.attribute("fill"), fill_opacity, rounding);

    (stroke, width, fill)
}

/// Offset of a group, from `transform="translate(..)"` or the older
/// `translate` attribute.
pub fn translation<E: Element>(element: &E) -> Couple {
    let value = match element.attribute("transform").or_else(|| element.attribute("translate")) {
        Some(value) => value,
        None => return C_ZERO,
    };

    let mut offset = C_ZERO;
    for token in TransformListParser::from(value) {
        match token {
            Ok(TransformListToken::Translate { tx, ty }) => offset += Couple::new(tx as Float, ty as Float),
            Ok(other) => log::warn!("Ignoring unsupported transform {:?} on <{}>", other, element.tag()),
            Err(e) => {
                log::warn!("Unparsable transform {:?} on <{}>: {}", value, element.tag(), e);
                return C_ZERO;
            }
        }
    }
    offset
}

/// Canvas placement read from a document root.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneInfo {
    /// brings the viewBox origin to (0, 0)
    pub translate: Couple,
    pub size: Extent2<Float>,
}

impl SceneInfo {
    pub fn from_root<E: Element>(root: &E) -> Self {
        let parsed = root.attribute("viewBox").and_then(|v| {
            NumberListParser::from(v)
                .map(|n| n.map(|n| n as Float))
                .collect::<Result<Vec<_>, _>>()
                .ok()
        });

        match parsed.as_deref() {
            Some(&[x, y, w, h]) => Self {
                translate: Couple::new(-x, -y),
                size: Extent2::new(w, h),
            },
            _ => {
                log::warn!("Missing or invalid viewBox, using an empty canvas");
                Self {
                    translate: C_ZERO,
                    size: Extent2::new(0.0, 0.0),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points() {
        assert_eq!(
            point_list("0,0 10.5,3  4,4"),
            Some(std::vec![Couple::new(0.0, 0.0), Couple::new(10.5, 3.0), Couple::new(4.0, 4.0)])
        );
        assert_eq!(point_list("1,2 3"), None);
        assert_eq!(point_list("1,a"), None);
    }

    #[test]
    fn colors() {
        let red = 0b1111_0000;
        assert_eq!(paint(Some("#FF0000"), 1.0, ColorRounding::Truncate), red);
        assert_eq!(paint(Some("#f00"), 1.0, ColorRounding::Truncate), red);
        assert_eq!(paint(Some("none"), 1.0, ColorRounding::Truncate), NONE);
        assert_eq!(paint(None, 1.0, ColorRounding::Truncate), NONE);
        assert_eq!(paint(Some("#FF0000"), 0.2, ColorRounding::Truncate), NONE);
        assert_eq!(paint(Some("#FF0000"), 0.5, ColorRounding::Truncate), 0b0111_0000);
    }

    #[test]
    fn opacities() {
        assert_eq!(opacity(None), 1.0);
        assert_eq!(opacity(Some("half")), 1.0);
        assert_eq!(opacity(Some("0.25")), 0.25);
        assert_eq!(opacity(Some("3")), 1.0);
    }

    #[test]
    fn stroke_width() {
        let node = SceneNode::new("rect").attr("stroke", "#000000");
        assert_eq!(raw_style(&&node, 1, ColorRounding::Truncate), (0b1100_0000, 1, NONE));
        assert_eq!(raw_style(&&node, 0, ColorRounding::Truncate).1, 0);

        let node = node.attr("stroke-width", "thick");
        assert_eq!(raw_style(&&node, 1, ColorRounding::Truncate).1, 0);
    }

    #[test]
    fn translations() {
        let node = SceneNode::new("g").attr("transform", "translate(10, -2.5)");
        assert_eq!(translation(&&node), Couple::new(10.0, -2.5));

        let node = SceneNode::new("g").attr("translate", "translate(3)");
        assert_eq!(translation(&&node), Couple::new(3.0, 0.0));

        let node = SceneNode::new("g").attr("transform", "scale(2) translate(1 1)");
        assert_eq!(translation(&&node), Couple::new(1.0, 1.0));

        assert_eq!(translation(&&SceneNode::new("g")), C_ZERO);
    }

    #[test]
    fn viewbox() {
        let root = SceneNode::new("svg").attr("viewBox", "-5 2 20.5 10");
        let info = SceneInfo::from_root(&&root);
        assert_eq!(info.translate, Couple::new(5.0, -2.0));
        assert_eq!(info.size, Extent2::new(20.5, 10.0));

        let info = SceneInfo::from_root(&&SceneNode::new("svg"));
        assert_eq!(info.size, Extent2::new(0.0, 0.0));
    }
}
