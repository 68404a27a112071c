//! Packed colour helpers and HSL conversion.
//!
//! Colours travel as `0xRRGGBB` in the low 24 bits of a `u32`. Raster pixels
//! are packed ARGB with the alpha byte forced to `0xFF`.

/// Base colour used until a `color` frame arrives and after `clearColor`.
pub const DEFAULT_COLOUR: u32 = 0x00EC_843D;

pub const ALPHA_OPAQUE: u32 = 0xFF00_0000;
pub const RGB_MASK: u32 = 0x00FF_FFFF;

pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    ALPHA_OPAQUE | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Force the alpha byte of a packed colour to opaque.
pub const fn opaque(colour: u32) -> u32 {
    ALPHA_OPAQUE | (colour & RGB_MASK)
}

/// Black in the RGB channels, whatever the alpha byte says.
///
/// The compositor treats these as "no update": a deliberately black pixel is
/// indistinguishable from an unlit one.
pub const fn is_blank(colour: u32) -> bool {
    colour & RGB_MASK == 0
}

pub const fn red(colour: u32) -> u8 {
    (colour >> 16) as u8
}

pub const fn green(colour: u32) -> u8 {
    (colour >> 8) as u8
}

pub const fn blue(colour: u32) -> u8 {
    colour as u8
}

/// `#rrggbb` form of the RGB channels.
///
/// # Examples
/// ```
/// use dmdview_core::colour::to_hex;
///
/// assert_eq!(to_hex(0xFFEC_843D), "#ec843d");
/// ```
pub fn to_hex(colour: u32) -> String {
    format!("#{:06x}", colour & RGB_MASK)
}

/// Hue (degrees, `0..360`), saturation and lightness (`0..=1`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Hsl {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Hsl {
    pub fn from_rgb(colour: u32) -> Self {
        let r = f32::from(red(colour)) / 255.0;
        let g = f32::from(green(colour)) / 255.0;
        let b = f32::from(blue(colour)) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;
        let lightness = (max + min) / 2.0;

        let (hue, saturation) = if max == min {
            (0.0, 0.0)
        } else {
            let sector = if max == r {
                ((g - b) / delta) % 6.0
            } else if max == g {
                (b - r) / delta + 2.0
            } else {
                (r - g) / delta + 4.0
            };
            (sector, delta / (1.0 - (2.0 * lightness - 1.0).abs()))
        };

        let mut hue = (hue * 60.0) % 360.0;
        if hue < 0.0 {
            hue += 360.0;
        }

        Self {
            hue: hue.clamp(0.0, 360.0),
            saturation: saturation.clamp(0.0, 1.0),
            lightness: lightness.clamp(0.0, 1.0),
        }
    }

    /// Opaque packed ARGB.
    pub fn to_rgb(self) -> u32 {
        let chroma = (1.0 - (2.0 * self.lightness - 1.0).abs()) * self.saturation;
        let m = self.lightness - 0.5 * chroma;
        let x = chroma * (1.0 - ((self.hue / 60.0) % 2.0 - 1.0).abs());

        let (r, g, b) = match (self.hue / 60.0) as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };

        rgb(channel(r + m), channel(g + m), channel(b + m))
    }

    /// Same hue and saturation, lightness multiplied by `factor`.
    pub fn scale_lightness(self, factor: f32) -> Self {
        Self {
            lightness: self.lightness * factor,
            ..self
        }
    }
}

fn channel(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_COLOUR, Hsl, is_blank, opaque, rgb, to_hex};

    #[test]
    fn pure_red_to_hsl() {
        let hsl = Hsl::from_rgb(0xFF0000);
        assert_eq!(hsl.hue, 0.0);
        assert_eq!(hsl.saturation, 1.0);
        assert_eq!(hsl.lightness, 0.5);
        assert_eq!(hsl.to_rgb(), 0xFFFF_0000);
    }

    #[test]
    fn primaries_round_trip() {
        for colour in [0x00FF00, 0x0000FF, 0xFFFFFF, 0x808080, 0xFF4500] {
            assert_eq!(Hsl::from_rgb(colour).to_rgb(), opaque(colour), "{colour:06x}");
        }
    }

    #[test]
    fn default_colour_round_trips() {
        assert_eq!(Hsl::from_rgb(DEFAULT_COLOUR).to_rgb(), opaque(DEFAULT_COLOUR));
    }

    #[test]
    fn scaled_lightness_darkens_red() {
        let red = Hsl::from_rgb(0xFF0000);
        assert_eq!(red.scale_lightness(0.0).to_rgb(), 0xFF00_0000);
        assert_eq!(red.scale_lightness(0.25).to_rgb(), 0xFF40_0000);
        assert_eq!(red.scale_lightness(0.5).to_rgb(), 0xFF80_0000);
        assert_eq!(red.scale_lightness(0.75).to_rgb(), 0xFFBF_0000);
    }

    #[test]
    fn blank_ignores_alpha() {
        assert!(is_blank(0x0000_0000));
        assert!(is_blank(0xFF00_0000));
        assert!(!is_blank(0x0000_0001));
    }

    #[test]
    fn packing_helpers() {
        assert_eq!(rgb(0x12, 0x34, 0x56), 0xFF12_3456);
        assert_eq!(to_hex(0x0000_0000), "#000000");
    }
}
