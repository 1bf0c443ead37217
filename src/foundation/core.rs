use serde::{Deserialize, Serialize};

use crate::foundation::math::{channel_from_u8, channel_to_u8, clamp01};

/// Straight-alpha color with channels in the logical `[0, 1]` domain.
///
/// Values outside `[0, 1]` are allowed in intermediate arithmetic; they are clamped when written
/// into a raster.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rgba {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
    /// Alpha channel.
    pub a: f64,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Build a color from four channels.
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque color.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Channels as `[r, g, b, a]`.
    pub fn to_array(self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Clamp every channel into `[0, 1]`; NaN becomes `0`.
    pub fn clamped(self) -> Self {
        Self::new(clamp01(self.r), clamp01(self.g), clamp01(self.b), clamp01(self.a))
    }

    pub(crate) fn to_rgba8(self) -> [u8; 4] {
        [
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
            channel_to_u8(self.a),
        ]
    }

    pub(crate) fn from_rgba8(px: [u8; 4]) -> Self {
        Self::new(
            channel_from_u8(px[0]),
            channel_from_u8(px[1]),
            channel_from_u8(px[2]),
            channel_from_u8(px[3]),
        )
    }
}

impl From<[f64; 4]> for Rgba {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<[f64; 3]> for Rgba {
    fn from(v: [f64; 3]) -> Self {
        Self::rgb(v[0], v[1], v[2])
    }
}

impl From<(f64, f64, f64, f64)> for Rgba {
    fn from((r, g, b, a): (f64, f64, f64, f64)) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<(f64, f64, f64)> for Rgba {
    fn from((r, g, b): (f64, f64, f64)) -> Self {
        Self::rgb(r, g, b)
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Obj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "one")]
                a: f64,
            },
            Arr(Vec<f64>),
        }

        fn one() -> f64 {
            1.0
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::Obj { r, g, b, a } => Ok(Self::new(r, g, b, a)),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
                [r, g, b, a] => Ok(Self::new(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "color array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

fn parse_hex(s: &str) -> Result<Rgba, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err("hex color must be ASCII".to_owned());
    }
    let (r, g, b, a) = match s.len() {
        6 => (hex_byte(&s[0..2])?, hex_byte(&s[2..4])?, hex_byte(&s[4..6])?, 255),
        8 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        ),
        _ => {
            return Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned());
        }
    };

    Ok(Rgba::from_rgba8([r, g, b, a]))
}

/// Row-major 4x4 matrix applied to `[r, g, b, a]` column vectors.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorMatrix(pub [[f64; 4]; 4]);

impl ColorMatrix {
    /// Identity transform.
    pub const IDENTITY: Self = Self([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    /// Per-channel scale matrix.
    pub fn scale(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self([
            [r, 0.0, 0.0, 0.0],
            [0.0, g, 0.0, 0.0],
            [0.0, 0.0, b, 0.0],
            [0.0, 0.0, 0.0, a],
        ])
    }

    /// Compute `self · c` without clamping.
    pub fn transform(&self, c: Rgba) -> Rgba {
        let v = c.to_array();
        let row = |i: usize| {
            let m = self.0[i];
            m[0] * v[0] + m[1] * v[1] + m[2] * v[2] + m[3] * v[3]
        };
        Rgba::new(row(0), row(1), row(2), row(3))
    }
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Rectangle of virtual coordinates `[x, x + w) × [y, y + h)`.
///
/// The origin may be negative and the rectangle may extend past the raster; every coordinate is
/// resolved through the buffer's overflow policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Left edge.
    pub x: i64,
    /// Top edge.
    pub y: i64,
    /// Width in pixels.
    pub w: u32,
    /// Height in pixels.
    pub h: u32,
}

impl Region {
    /// Build a region.
    pub fn new(x: i64, y: i64, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Number of virtual coordinates covered.
    pub fn area(self) -> u64 {
        u64::from(self.w) * u64::from(self.h)
    }

    /// Whether every coordinate of the region fits in `i64`.
    pub fn is_representable(self) -> bool {
        let last = |origin: i64, len: u32| {
            len == 0 || origin.checked_add(i64::from(len) - 1).is_some()
        };
        last(self.x, self.w) && last(self.y, self.h)
    }

    /// Virtual coordinates in row-major order (outer loop over rows).
    ///
    /// Iteration stops at the edge of the `i64` range; see [`Region::is_representable`].
    pub fn coords(self) -> impl Iterator<Item = (i64, i64)> {
        (0..i64::from(self.h))
            .map_while(move |dy| self.y.checked_add(dy))
            .flat_map(move |y| {
                (0..i64::from(self.w))
                    .map_while(move |dx| self.x.checked_add(dx))
                    .map(move |x| (x, y))
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
