use crate::{Couple, Float, Point};

#[allow(unused_imports)]
use num_traits::real::Real;

/// Maximum per-axis shift before a standard point is reported
pub const SHIFT_TOLERANCE: Float = 0.1;

/// Device pixels are addressed by their center
pub const PIXEL_CENTER: Couple = Couple::new(-0.5, -0.5);

/// Precise points are stored in eighths of a pixel
pub const PRECISE_SCALE: Float = 8.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Grid {
    /// half pixels
    Standard,
    /// eighths of a pixel
    Precise,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Validation {
    /// a shift below SHIFT_TOLERANCE on both axes is accepted
    Tolerant,
    /// any shift is reported
    Exact,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Normalized {
    pub point: Point,
    /// closest scene-space point on the grid
    pub nearest: Couple,
    pub valid: bool,
}

impl Grid {
    pub fn from_precise(precise: bool) -> Self {
        match precise {
            true => Grid::Precise,
            false => Grid::Standard,
        }
    }

    fn steps_per_unit(self) -> Float {
        match self {
            Grid::Standard => 2.0,
            Grid::Precise => 8.0,
        }
    }

    pub fn snap(self, p: Couple) -> Couple {
        let k = self.steps_per_unit();
        p.map(|v| (v * k).round() / k)
    }
}

/// Rounds half-way values up for both signs, so that -2.5 becomes -2
/// just like 2.5 becomes 3.
fn round_half_up(v: Float) -> Float {
    (v + 0.5).floor()
}

fn to_device(v: Float) -> Option<i16> {
    let v = round_half_up(v);
    match v >= i16::MIN as Float && v <= i16::MAX as Float {
        true => Some(v as i16),
        false => None,
    }
}

/// Maps a (translated) scene-space point to device space.
///
/// Points that cannot be represented in 16 bits are clamped and reported
/// as invalid regardless of the validation mode.
pub fn normalize(p: Couple, grid: Grid, validation: Validation) -> Normalized {
    let nearest = grid.snap(p);
    let shift = (p - nearest).map(|v| v.abs());

    let mut valid = match validation {
        Validation::Tolerant => shift.x < SHIFT_TOLERANCE && shift.y < SHIFT_TOLERANCE,
        Validation::Exact => shift.x == 0.0 && shift.y == 0.0,
    };

    let mut translated = nearest + PIXEL_CENTER;
    if grid == Grid::Precise {
        translated *= PRECISE_SCALE;
    }

    let x = to_device(translated.x);
    let y = to_device(translated.y);
    valid &= x.is_some() && y.is_some();

    let clamp = |v: Float| round_half_up(v).clamp(i16::MIN as Float, i16::MAX as Float) as i16;
    let point = Point::new(
        x.unwrap_or_else(|| clamp(translated.x)),
        y.unwrap_or_else(|| clamp(translated.y)),
    );

    Normalized { point, nearest, valid }
}

/// Scene-space value of a device point, used when listing commands.
pub fn to_scene(p: Point, grid: Grid) -> Couple {
    let p = Couple::new(p.x as Float, p.y as Float);
    let p = match grid {
        Grid::Standard => p,
        Grid::Precise => p / PRECISE_SCALE,
    };
    p - PIXEL_CENTER
}
