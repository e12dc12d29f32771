//! 8-bit ARGB colors and their CIELAB coordinates.
//!
//! Conversions go through linear sRGB and CIE XYZ under the D65 white point.
//! The inverse direction clamps: lightness to `0..=100`, `a`/`b` to
//! `-128..=127`, and every output channel to `0..=255`.

/// D65 reference white, XYZ scaled so that `Y = 100`.
const WHITE_X: f64 = 95.047;
const WHITE_Y: f64 = 100.0;
const WHITE_Z: f64 = 108.883;

const EPSILON: f64 = 0.008856;
const KAPPA_SLOPE: f64 = 7.787;
const KAPPA_OFFSET: f64 = 16.0 / 116.0;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub alpha: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

/// A color in CIELAB, with its alpha carried along.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Lab {
    pub alpha: f64,
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color::argb(255, 0, 0, 0);
    pub const WHITE: Color = Color::argb(255, 255, 255, 255);
    pub const TRANSPARENT: Color = Color::argb(0, 0, 0, 0);

    pub const fn argb(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self {
            alpha,
            red,
            green,
            blue,
        }
    }

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::argb(255, red, green, blue)
    }

    pub const fn from_argb(packed: u32) -> Self {
        Self {
            alpha: (packed >> 24) as u8,
            red: (packed >> 16) as u8,
            green: (packed >> 8) as u8,
            blue: packed as u8,
        }
    }

    pub const fn to_argb(self) -> u32 {
        (self.alpha as u32) << 24 | (self.red as u32) << 16 | (self.green as u32) << 8 | self.blue as u32
    }

    pub fn to_lab(self) -> Lab {
        let r = srgb_to_linear(self.red);
        let g = srgb_to_linear(self.green);
        let b = srgb_to_linear(self.blue);

        let x = (0.4124564 * r + 0.3575761 * g + 0.1804375 * b) * 100.0;
        let y = (0.2126729 * r + 0.7151522 * g + 0.0721750 * b) * 100.0;
        let z = (0.0193339 * r + 0.1191920 * g + 0.9503041 * b) * 100.0;

        let fx = lab_f(x / WHITE_X);
        let fy = lab_f(y / WHITE_Y);
        let fz = lab_f(z / WHITE_Z);

        Lab {
            alpha: self.alpha as f64,
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }

    pub fn from_lab(lab: Lab) -> Self {
        let l = lab.l.clamp(0.0, 100.0);
        let a = lab.a.clamp(-128.0, 127.0);
        let b = lab.b.clamp(-128.0, 127.0);

        let fy = (l + 16.0) / 116.0;
        let fx = a / 500.0 + fy;
        let fz = fy - b / 200.0;

        let x = lab_f_inverse(fx) * WHITE_X / 100.0;
        let y = lab_f_inverse(fy) * WHITE_Y / 100.0;
        let z = lab_f_inverse(fz) * WHITE_Z / 100.0;

        let r = 3.2404542 * x - 1.5371385 * y - 0.4985314 * z;
        let g = -0.9692660 * x + 1.8760108 * y + 0.0415560 * z;
        let b = 0.0556434 * x - 0.2040259 * y + 1.0572252 * z;

        Self {
            alpha: channel(lab.alpha),
            red: linear_to_srgb(r),
            green: linear_to_srgb(g),
            blue: linear_to_srgb(b),
        }
    }
}

fn srgb_to_linear(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(linear: f64) -> u8 {
    let c = if linear <= 0.0031308 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    };
    channel(c * 255.0)
}

/// Rounds and clamps to an 8-bit channel.
pub(crate) fn channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

fn lab_f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        KAPPA_SLOPE * t + KAPPA_OFFSET
    }
}

fn lab_f_inverse(t: f64) -> f64 {
    let cubed = t * t * t;
    if cubed > EPSILON {
        cubed
    } else {
        (t - KAPPA_OFFSET) / KAPPA_SLOPE
    }
}

#[cfg(test)]
#[path = "tests/color_tests.rs"]
mod tests;
