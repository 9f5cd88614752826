use crate::color::ColorRounding;
use crate::coords::{Grid, Validation};

/// What happens when a point is not on the device grid
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum InvalidPointPolicy {
    /// log it, keep the snapped point
    #[default]
    Warn,
    /// drop the enclosing command and mark the source as failed
    Fail,
}

/// Command type codes written to the container.
///
/// `Legacy` is understood by older firmware (Path = 0, Circle = 1) and
/// has no precise paths. `Current` uses Path = 1, Circle = 2 and
/// PrecisePath = 3.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TypeScheme {
    Legacy,
    #[default]
    Current,
}

impl TypeScheme {
    pub fn supports_precise(self) -> bool {
        self == TypeScheme::Current
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Options {
    pub precise: bool,
    pub invalid_points: InvalidPointPolicy,
    pub color_rounding: ColorRounding,
    pub scheme: TypeScheme,
    /// used when `stroke-width` is absent; malformed widths are 0
    pub default_stroke_width: u8,
    /// milliseconds
    pub frame_duration: u16,
    pub play_count: u16,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            precise: false,
            invalid_points: InvalidPointPolicy::Warn,
            color_rounding: ColorRounding::Truncate,
            scheme: TypeScheme::Current,
            default_stroke_width: 1,
            frame_duration: 33,
            play_count: 1,
        }
    }
}

impl Options {
    pub fn with_precise(self, precise: bool) -> Self {
        Self { precise, ..self }
    }

    pub fn with_invalid_points(self, invalid_points: InvalidPointPolicy) -> Self {
        Self { invalid_points, ..self }
    }

    pub fn with_color_rounding(self, color_rounding: ColorRounding) -> Self {
        Self { color_rounding, ..self }
    }

    pub fn with_scheme(self, scheme: TypeScheme) -> Self {
        Self { scheme, ..self }
    }

    pub fn with_default_stroke_width(self, default_stroke_width: u8) -> Self {
        Self { default_stroke_width, ..self }
    }

    pub fn with_frame_duration(self, frame_duration: u16) -> Self {
        Self { frame_duration, ..self }
    }

    pub fn with_play_count(self, play_count: u16) -> Self {
        Self { play_count, ..self }
    }

    /// Grid used for path points; circles always use the standard grid.
    pub fn path_grid(&self) -> Grid {
        Grid::from_precise(self.precise)
    }

    /// Precise points and fail-fast conversions accept no shift at all.
    pub fn validation(&self, grid: Grid) -> Validation {
        match grid == Grid::Precise || self.invalid_points == InvalidPointPolicy::Fail {
            true => Validation::Exact,
            false => Validation::Tolerant,
        }
    }

    pub fn is_consistent(&self) -> bool {
        !self.precise || self.scheme.supports_precise()
    }
}
