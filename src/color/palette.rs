use crate::color::Color;

/// Dim/bright endpoints of one boot wave phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavePair {
    pub dim: Color,
    pub bright: Color,
}

/// Boot wave phases, played in order
pub const WAVE_PAIRS: [WavePair; 2] = [
    WavePair {
        dim: Color::GREEN_DIM,
        bright: Color::GREEN,
    },
    WavePair {
        dim: Color::AMBER_DIM,
        bright: Color::AMBER,
    },
];

/// Sweep trail, brightest (head) first
pub const TRAIL_PALETTE: [Color; 4] = [
    Color::AMBER,
    Color::ORANGE,
    Color::RED,
    Color::RED_DIM,
];

/// Blend two colors
///
/// # Arguments
/// * `a` - First color
/// * `b` - Second color
/// * `amount_of_b` - Blend factor (0 = all a, 255 = all b)
#[inline]
pub fn blend_colors(a: Color, b: Color, amount_of_b: u8) -> Color {
    Color::new(
        blend_channel(a.red(), b.red(), amount_of_b),
        blend_channel(a.green(), b.green(), amount_of_b),
    )
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn blend_channel(a: u8, b: u8, amount_of_b: u8) -> u8 {
    let a = a as i16;
    let delta = b as i16 - a;
    // Round half away from zero so 128 lands on the midpoint step.
    let scaled = delta * amount_of_b as i16;
    let rounded = if scaled >= 0 {
        (scaled + 127) / 255
    } else {
        (scaled - 127) / 255
    };
    (a + rounded) as u8
}
