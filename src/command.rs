use crate::color::NONE;
use crate::coords::{normalize, to_scene, Grid};
use crate::error::{ElementError, EncodingError, EncodingResult, ParsingError, ParsingResult};
use crate::format::{read_i16, read_u16, read_u8};
use crate::options::{InvalidPointPolicy, Options, TypeScheme};
use crate::{Couple, Float, Point};

#[allow(unused_imports)]
use num_traits::real::Real;

use alloc::vec::Vec;
use core::fmt;

const LEGACY_PATH: u8 = 0;
const LEGACY_CIRCLE: u8 = 1;
const PATH: u8 = 1;
const CIRCLE: u8 = 2;
const PRECISE_PATH: u8 = 3;

/// type, reserved, stroke color, stroke width, fill color,
/// 2 type-specific bytes, point count
const COMMAND_HEADER_SIZE: usize = 9;
const POINT_SIZE: usize = 4;
const MAX_POINTS: usize = u16::MAX as usize;

/// Stroke and fill of a command.
///
/// A stroke color always comes with a non-zero width and the other way
/// around.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Style {
    stroke_color: u8,
    stroke_width: u8,
    fill_color: u8,
}

impl Style {
    /// Returns `None` when nothing would be drawn.
    pub fn new(stroke_color: u8, stroke_width: u8, fill_color: u8) -> Option<Self> {
        let (stroke_color, stroke_width) = match (stroke_color, stroke_width) {
            (NONE, _) | (_, 0) => (NONE, 0),
            stroke => stroke,
        };

        match stroke_color == NONE && fill_color == NONE {
            true => None,
            false => Some(Self {
                stroke_color,
                stroke_width,
                fill_color,
            }),
        }
    }

    pub fn stroke_color(&self) -> u8 {
        self.stroke_color
    }

    pub fn stroke_width(&self) -> u8 {
        self.stroke_width
    }

    pub fn fill_color(&self) -> u8 {
        self.fill_color
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCommand {
    pub points: Vec<Point>,
    pub open: bool,
    pub style: Style,
    /// points are in eighths of a pixel
    pub precise: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CircleCommand {
    pub center: Point,
    pub radius: u16,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Path(PathCommand),
    Circle(CircleCommand),
}

/// Translates and normalizes scene points.
///
/// Off-grid points are pushed to `warnings` or, with the fail-fast
/// policy, abort the whole list.
fn device_points(
    raw: &[Couple],
    translate: Couple,
    grid: Grid,
    options: &Options,
    warnings: &mut Vec<ElementError>,
) -> Result<Vec<Point>, ElementError> {
    let validation = options.validation(grid);
    let mut points = Vec::with_capacity(raw.len());

    for p in raw {
        let p = *p + translate;
        let normalized = normalize(p, grid, validation);
        if !normalized.valid {
            let error = ElementError::InvalidPoint {
                point: p,
                nearest: normalized.nearest,
            };
            log::warn!("{}", error);
            match options.invalid_points {
                InvalidPointPolicy::Warn => warnings.push(error),
                InvalidPointPolicy::Fail => return Err(error),
            }
        }
        points.push(normalized.point);
    }

    Ok(points)
}

impl PathCommand {
    pub fn new(
        raw: &[Couple],
        open: bool,
        translate: Couple,
        style: Style,
        options: &Options,
        warnings: &mut Vec<ElementError>,
    ) -> Result<Self, ElementError> {
        if raw.is_empty() {
            return Err(ElementError::malformed("path", "no points"));
        }
        if raw.len() > MAX_POINTS {
            return Err(ElementError::malformed("path", "too many points"));
        }

        let grid = options.path_grid();
        Ok(Self {
            points: device_points(raw, translate, grid, options, warnings)?,
            open,
            style,
            precise: grid == Grid::Precise,
        })
    }

    fn grid(&self) -> Grid {
        Grid::from_precise(self.precise)
    }
}

impl CircleCommand {
    /// The radius is used as is, only rounded to whole pixels.
    pub fn new(
        center: Couple,
        radius: Float,
        translate: Couple,
        style: Style,
        options: &Options,
        warnings: &mut Vec<ElementError>,
    ) -> Result<Self, ElementError> {
        let rounded = (radius + 0.5).floor();
        if !(rounded >= 0.0 && rounded <= u16::MAX as Float) {
            return Err(ElementError::malformed("circle", "radius out of range"));
        }

        let points = device_points(&[center], translate, Grid::Standard, options, warnings)?;
        Ok(Self {
            center: points[0],
            radius: rounded as u16,
            style,
        })
    }
}

impl Command {
    pub fn style(&self) -> &Style {
        match self {
            Command::Path(path) => &path.style,
            Command::Circle(circle) => &circle.style,
        }
    }

    pub fn points(&self) -> &[Point] {
        match self {
            Command::Path(path) => &path.points,
            Command::Circle(circle) => core::slice::from_ref(&circle.center),
        }
    }

    /// `None` for precise paths in the legacy scheme, which has no code
    /// for them.
    pub fn type_code(&self, scheme: TypeScheme) -> Option<u8> {
        match (self, scheme) {
            (Command::Path(path), TypeScheme::Legacy) => match path.precise {
                true => None,
                false => Some(LEGACY_PATH),
            },
            (Command::Circle(_), TypeScheme::Legacy) => Some(LEGACY_CIRCLE),
            (Command::Path(path), TypeScheme::Current) => match path.precise {
                true => Some(PRECISE_PATH),
                false => Some(PATH),
            },
            (Command::Circle(_), TypeScheme::Current) => Some(CIRCLE),
        }
    }

    pub fn size(&self) -> usize {
        COMMAND_HEADER_SIZE + self.points().len() * POINT_SIZE
    }

    /// Nothing is written when the command cannot be encoded.
    pub fn serialize(&self, scheme: TypeScheme, output: &mut Vec<u8>) -> EncodingResult<()> {
        let type_code = self.type_code(scheme).ok_or(EncodingError::PreciseUnsupported)?;
        let points = self.points();
        let count = u16::try_from(points.len()).map_err(|_| EncodingError::TooManyPoints)?;

        let style = self.style();
        output.extend_from_slice(&[
            type_code,
            0,
            style.stroke_color,
            style.stroke_width,
            style.fill_color,
        ]);

        match self {
            Command::Path(path) => output.extend_from_slice(&[path.open as u8, 0]),
            Command::Circle(circle) => output.extend_from_slice(&circle.radius.to_le_bytes()),
        }

        output.extend_from_slice(&count.to_le_bytes());
        for p in points {
            output.extend_from_slice(&p.x.to_le_bytes());
            output.extend_from_slice(&p.y.to_le_bytes());
        }
        Ok(())
    }

    pub fn parse(bytes: &[u8], i: &mut usize, scheme: TypeScheme) -> ParsingResult<Self> {
        let type_code = read_u8(bytes, i)?;
        let (is_path, precise) = match (scheme, type_code) {
            (TypeScheme::Legacy, LEGACY_PATH) => (true, false),
            (TypeScheme::Legacy, LEGACY_CIRCLE) => (false, false),
            (TypeScheme::Current, PATH) => (true, false),
            (TypeScheme::Current, CIRCLE) => (false, false),
            (TypeScheme::Current, PRECISE_PATH) => (true, true),
            _ => return Err(ParsingError::InvalidCommandType),
        };

        let _reserved = read_u8(bytes, i)?;
        let style = Style {
            stroke_color: read_u8(bytes, i)?,
            stroke_width: read_u8(bytes, i)?,
            fill_color: read_u8(bytes, i)?,
        };

        let specific = [read_u8(bytes, i)?, read_u8(bytes, i)?];

        let count = read_u16(bytes, i)? as usize;
        let mut points = Vec::with_capacity(count.min(bytes.len() / POINT_SIZE));
        for _ in 0..count {
            let x = read_i16(bytes, i)?;
            let y = read_i16(bytes, i)?;
            points.push(Point::new(x, y));
        }

        Ok(match is_path {
            true => Command::Path(PathCommand {
                points,
                open: specific[0] != 0,
                style,
                precise,
            }),
            false => Command::Circle(CircleCommand {
                center: points.first().copied().ok_or(ParsingError::TooShort)?,
                radius: u16::from_le_bytes(specific),
                style,
            }),
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = self.style();
        let (name, grid) = match self {
            Command::Path(path) => ("Path", path.grid()),
            Command::Circle(_) => ("Circle", Grid::Standard),
        };

        write!(
            f,
            "{}: [fill color:{}; stroke color:{}; stroke width:{}]",
            name, style.fill_color, style.stroke_color, style.stroke_width,
        )?;

        for p in self.points() {
            let p = to_scene(*p, grid);
            write!(f, " ({}, {})", p.x, p.y)?;
        }

        match self {
            Command::Path(path) => {
                write!(f, " {}", if path.open { "open" } else { "closed" })?;
                if path.precise {
                    f.write_str(" P")?;
                }
                Ok(())
            }
            Command::Circle(circle) => write!(f, " r={}", circle.radius),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn style_consistency() {
        assert_eq!(Style::new(0, 0, 0), None);
        assert_eq!(Style::new(0, 4, 0), None);
        // a stroke without width is no stroke
        assert_eq!(Style::new(0xC0, 0, 0), None);

        let s = Style::new(0, 3, 0xF0).unwrap();
        assert_eq!((s.stroke_color(), s.stroke_width(), s.fill_color()), (0, 0, 0xF0));

        let s = Style::new(0xC0, 0, 0xF0).unwrap();
        assert_eq!((s.stroke_color(), s.stroke_width()), (0, 0));

        let s = Style::new(0xC0, 2, 0).unwrap();
        assert_eq!((s.stroke_color(), s.stroke_width()), (0xC0, 2));
    }

    #[test]
    fn fail_fast_drops_command() {
        let style = Style::new(0xC0, 1, 0).unwrap();
        let options = Options::default().with_invalid_points(InvalidPointPolicy::Fail);
        let raw = [Couple::new(0.0, 0.0), Couple::new(1.3, 0.0)];
        let mut warnings = Vec::new();

        let result = PathCommand::new(&raw, true, Couple::zero(), style, &options, &mut warnings);
        assert!(matches!(result, Err(ElementError::InvalidPoint { .. })));

        let path = PathCommand::new(&raw, true, Couple::zero(), style, &Options::default(), &mut warnings).unwrap();
        assert_eq!(path.points, vec![Point::new(0, 0), Point::new(1, 0)]);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn path_layout() {
        let style = Style::new(0xC0, 2, 0xF0).unwrap();
        let path = Command::Path(PathCommand {
            points: vec![Point::new(1, -1), Point::new(258, 3)],
            open: true,
            style,
            precise: false,
        });

        let mut bytes = Vec::new();
        path.serialize(TypeScheme::Current, &mut bytes).unwrap();
        assert_eq!(bytes, [
            1, 0, 0xC0, 2, 0xF0, 1, 0, 2, 0,
            1, 0, 0xFF, 0xFF,
            2, 1, 3, 0,
        ]);
        assert_eq!(bytes.len(), path.size());

        let mut legacy = Vec::new();
        path.serialize(TypeScheme::Legacy, &mut legacy).unwrap();
        assert_eq!(legacy[0], 0);
        assert_eq!(legacy[1..], bytes[1..]);
    }

    #[test]
    fn circle_layout() {
        let style = Style::new(0, 0, 0xC3).unwrap();
        let mut warnings = Vec::new();
        let circle = CircleCommand::new(
            Couple::new(4.5, 4.5),
            300.4,
            Couple::new(1.0, 0.0),
            style,
            &Options::default().with_precise(true),
            &mut warnings,
        )
        .unwrap();
        assert!(warnings.is_empty());
        assert_eq!(circle.center, Point::new(5, 4));
        assert_eq!(circle.radius, 300);

        let circle = Command::Circle(circle);
        let mut bytes = Vec::new();
        circle.serialize(TypeScheme::Current, &mut bytes).unwrap();
        assert_eq!(bytes, [2, 0, 0, 0, 0xC3, 0x2C, 0x01, 1, 0, 5, 0, 4, 0]);

        let mut i = 0;
        assert_eq!(Command::parse(&bytes, &mut i, TypeScheme::Current), Ok(circle));
        assert_eq!(i, bytes.len());

        let mut i = 0;
        assert_eq!(Command::parse(&bytes, &mut i, TypeScheme::Legacy), Err(ParsingError::InvalidCommandType));
    }

    #[test]
    fn point_count_limit() {
        let style = Style::new(0xC0, 1, 0).unwrap();
        let raw = vec![Couple::new(1.0, 1.0); MAX_POINTS + 1];
        let mut warnings = Vec::new();

        let result = PathCommand::new(&raw, true, Couple::zero(), style, &Options::default(), &mut warnings);
        assert_eq!(result, Err(ElementError::malformed("path", "too many points")));

        let path = PathCommand::new(&raw[1..], true, Couple::zero(), style, &Options::default(), &mut warnings).unwrap();
        assert_eq!(path.points.len(), MAX_POINTS);

        let mut bytes = Vec::new();
        let oversized = Command::Path(PathCommand {
            points: vec![Point::new(0, 0); MAX_POINTS + 1],
            ..path
        });
        assert_eq!(oversized.serialize(TypeScheme::Current, &mut bytes), Err(EncodingError::TooManyPoints));
        assert!(bytes.is_empty());
    }

    #[test]
    fn precise_paths_need_current_codes() {
        let path = Command::Path(PathCommand {
            points: vec![Point::new(4, 4)],
            open: true,
            style: Style::new(0xC0, 1, 0).unwrap(),
            precise: true,
        });
        assert_eq!(path.type_code(TypeScheme::Current), Some(PRECISE_PATH));
        assert_eq!(path.type_code(TypeScheme::Legacy), None);

        let mut bytes = Vec::new();
        assert_eq!(path.serialize(TypeScheme::Legacy, &mut bytes), Err(EncodingError::PreciseUnsupported));
        assert!(bytes.is_empty());
    }
}
