//! Two-channel pad colors and the semantic state palette.
//!
//! Grid controllers of this family drive a red and a green LED per pad,
//! each with four intensity steps. Amber and yellow are mixes of the two.

mod palette;
mod state;

pub use palette::{TRAIL_PALETTE, WAVE_PAIRS, WavePair, blend_colors};
pub use state::LedState;

/// Highest intensity step of a single channel.
pub const MAX_INTENSITY: u8 = 3;

/// Pad color as a pair of channel intensities (`0..=3` each).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    red: u8,
    green: u8,
}

impl Color {
    pub const OFF: Self = Self::new(0, 0);

    pub const RED: Self = Self::new(3, 0);
    pub const RED_DIM: Self = Self::new(1, 0);
    pub const GREEN: Self = Self::new(0, 3);
    pub const GREEN_MID: Self = Self::new(0, 2);
    pub const GREEN_DIM: Self = Self::new(0, 1);
    pub const AMBER: Self = Self::new(3, 3);
    pub const AMBER_MID: Self = Self::new(2, 2);
    pub const AMBER_DIM: Self = Self::new(1, 1);
    pub const ORANGE: Self = Self::new(3, 1);
    pub const YELLOW: Self = Self::new(2, 3);

    /// Create a color, clamping each channel to [`MAX_INTENSITY`].
    pub const fn new(red: u8, green: u8) -> Self {
        Self {
            red: if red > MAX_INTENSITY { MAX_INTENSITY } else { red },
            green: if green > MAX_INTENSITY {
                MAX_INTENSITY
            } else {
                green
            },
        }
    }

    pub const fn red(self) -> u8 {
        self.red
    }

    pub const fn green(self) -> u8 {
        self.green
    }

    pub const fn is_off(self) -> bool {
        self.red == 0 && self.green == 0
    }
}
