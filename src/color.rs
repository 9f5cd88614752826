use rgb::{ComponentMap, RGBA8};

/// Distance between two levels of the 2-bit palette
pub const PALETTE_STEP: u8 = 85;

/// Packed value of a fully transparent color, also used as "no color"
pub const NONE: u8 = 0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ColorRounding {
    /// next lower palette level
    #[default]
    Truncate,
    /// closest palette level
    Nearest,
}

fn truncate_channel(c: u8) -> u8 {
    (c / PALETTE_STEP) * PALETTE_STEP
}

fn nearest_channel(c: u8) -> u8 {
    let c = c as u16 + (PALETTE_STEP as u16 / 2);
    ((c / PALETTE_STEP as u16) * PALETTE_STEP as u16) as u8
}

/// Reduces every channel to one of {0, 85, 170, 255}.
///
/// Colors whose quantized alpha is zero come out as transparent black.
pub fn quantize(color: RGBA8, rounding: ColorRounding) -> RGBA8 {
    let quantized = match rounding {
        ColorRounding::Truncate => color.map(truncate_channel),
        ColorRounding::Nearest => color.map(nearest_channel),
    };

    match quantized.a {
        0 => RGBA8::new(0, 0, 0, 0),
        _ => quantized,
    }
}

/// Packs a quantized color as `0bAARRGGBB`.
pub fn pack(color: RGBA8) -> u8 {
    let [r, g, b, a] = [color.r >> 6, color.g >> 6, color.b >> 6, color.a >> 6];
    (a << 6) | (r << 4) | (g << 2) | b
}

/// Expands a packed byte back to 8 bits per channel.
pub fn unpack(packed: u8) -> RGBA8 {
    let level = |shift: u8| ((packed >> shift) & 0x3) * PALETTE_STEP;
    RGBA8::new(level(4), level(2), level(0), level(6))
}

pub fn convert(color: RGBA8, rounding: ColorRounding) -> u8 {
    pack(quantize(color, rounding))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVELS: [u8; 4] = [0, 85, 170, 255];

    #[test]
    fn channels_land_on_palette() {
        for c in 0..=255u8 {
            let t = truncate_channel(c);
            let n = nearest_channel(c);
            assert!(LEVELS.contains(&t));
            assert!(LEVELS.contains(&n));
            assert!(n == t || n == t + PALETTE_STEP);
        }
    }

    #[test]
    fn quantize_is_idempotent() {
        for rounding in [ColorRounding::Truncate, ColorRounding::Nearest] {
            for c in 0..=255u8 {
                let color = RGBA8::new(c, 255 - c, c / 2, 255);
                let once = quantize(color, rounding);
                assert_eq!(once, quantize(once, rounding));
            }
        }
    }

    #[test]
    fn transparent_is_black() {
        let ghost = RGBA8::new(255, 128, 3, 84);
        assert_eq!(convert(ghost, ColorRounding::Truncate), NONE);
        assert_eq!(convert(RGBA8::new(255, 255, 255, 42), ColorRounding::Nearest), NONE);
        // 43 rounds up to the first alpha level
        assert_ne!(convert(RGBA8::new(255, 255, 255, 43), ColorRounding::Nearest), NONE);
    }

    #[test]
    fn packing() {
        assert_eq!(convert(RGBA8::new(255, 0, 0, 255), ColorRounding::Truncate), 0b1111_0000);
        assert_eq!(convert(RGBA8::new(0, 0, 0, 255), ColorRounding::Truncate), 0b1100_0000);
        assert_eq!(convert(RGBA8::new(170, 85, 255, 170), ColorRounding::Truncate), 0b1010_0111);
        assert_eq!(unpack(0b1010_0111), RGBA8::new(170, 85, 255, 170));
    }

    #[test]
    fn nearest_rounds_up() {
        let color = RGBA8::new(200, 130, 40, 250);
        assert_eq!(quantize(color, ColorRounding::Truncate), RGBA8::new(170, 85, 0, 170));
        assert_eq!(quantize(color, ColorRounding::Nearest), RGBA8::new(170, 170, 0, 255));
    }
}
