//! Colours, gradients and colour-or-gradient fills.
//!
//! This module provides:
//!
//! - [`Rgba`]: floating-point RGBA colour
//! - [`Gradient`]: directional multi-stop gradient
//! - [`ColorFill`]: either of the above, as used by text and background
//!   fills of a [`Style`](crate::Style)
//!
//! All three types carry a total, deterministic order so that styles built
//! from them can be deduplicated in an ordered set.
//!
//! # Examples
//!
//! ```
//! use neotext::{ColorFill, Gradient, Rgba};
//!
//! let solid = ColorFill::from(Rgba::from_hex("#1a1a2e").unwrap());
//! let fade = ColorFill::from(Gradient::new(Rgba::RED, Rgba::BLUE));
//!
//! // Solid fills order before gradients.
//! assert!(solid < fade);
//! assert_eq!(fade.color_at(0.0), Rgba::RED);
//! ```

use std::cmp::Ordering;

/// RGBA colour with f32 components in range [0.0, 1.0].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque red.
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);

    /// Create a new RGBA colour from f32 components.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque colour from f32 RGB components.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create an opaque colour from u8 RGB components.
    #[must_use]
    pub fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba_u8(r, g, b, 255)
    }

    /// Create a colour from u8 RGBA components.
    #[must_use]
    pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
            a: f32::from(a) / 255.0,
        }
    }

    /// Parse a hex colour string (`#RGB`, `#RRGGBB` or `#RRGGBBAA`, `#`
    /// optional).
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let byte = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();

        match hex.len() {
            3 => {
                let r = byte(0..1)?;
                let g = byte(1..2)?;
                let b = byte(2..3)?;
                Some(Self::from_rgb_u8(r * 17, g * 17, b * 17))
            }
            6 => Some(Self::from_rgb_u8(byte(0..2)?, byte(2..4)?, byte(4..6)?)),
            8 => Some(Self::from_rgba_u8(
                byte(0..2)?,
                byte(2..4)?,
                byte(4..6)?,
                byte(6..8)?,
            )),
            _ => None,
        }
    }

    /// Return a new colour with the specified alpha value.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { a: alpha, ..self }
    }

    /// Convert to a u8 RGBA tuple, clamping values to [0, 255].
    #[must_use]
    pub fn to_rgba_u8(self) -> (u8, u8, u8, u8) {
        let to_u8 = |value: f32| (value * 255.0).round().clamp(0.0, 255.0) as u8;
        (to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a))
    }

    /// Check if this colour is fully transparent.
    #[must_use]
    pub fn is_transparent(self) -> bool {
        self.a <= 0.0
    }

    /// Linearly interpolate between two colours.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: (other.r - self.r).mul_add(t, self.r),
            g: (other.g - self.g).mul_add(t, self.g),
            b: (other.b - self.b).mul_add(t, self.b),
            a: (other.a - self.a).mul_add(t, self.a),
        }
    }

    /// Total order over colours: component-wise `f32::total_cmp` on r, g,
    /// b, then a.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.r
            .total_cmp(&other.r)
            .then_with(|| self.g.total_cmp(&other.g))
            .then_with(|| self.b.total_cmp(&other.b))
            .then_with(|| self.a.total_cmp(&other.a))
    }
}

/// Axis along which a gradient runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GradientDirection {
    /// Top to bottom.
    #[default]
    Vertical,
    /// Left to right.
    Horizontal,
}

/// A colour stop at `position` in [0.0, 1.0].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub position: f32,
    pub color: Rgba,
}

impl GradientStop {
    #[must_use]
    pub const fn new(position: f32, color: Rgba) -> Self {
        Self { position, color }
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        self.position
            .total_cmp(&other.position)
            .then_with(|| self.color.total_cmp(&other.color))
    }
}

/// Multi-stop linear gradient.
///
/// Stops are kept sorted by position. A gradient always has at least two
/// stops.
#[derive(Clone, Debug)]
pub struct Gradient {
    direction: GradientDirection,
    stops: Vec<GradientStop>,
}

impl Gradient {
    /// Vertical two-stop gradient from `start` to `end`.
    #[must_use]
    pub fn new(start: Rgba, end: Rgba) -> Self {
        Self {
            direction: GradientDirection::Vertical,
            stops: vec![GradientStop::new(0.0, start), GradientStop::new(1.0, end)],
        }
    }

    /// Set the gradient direction.
    #[must_use]
    pub fn with_direction(mut self, direction: GradientDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Add an intermediate stop. Positions are clamped to [0.0, 1.0].
    #[must_use]
    pub fn with_stop(mut self, position: f32, color: Rgba) -> Self {
        let stop = GradientStop::new(position.clamp(0.0, 1.0), color);
        let idx = self
            .stops
            .partition_point(|s| s.position.total_cmp(&stop.position) != Ordering::Greater);
        self.stops.insert(idx, stop);
        self
    }

    #[must_use]
    pub fn direction(&self) -> GradientDirection {
        self.direction
    }

    #[must_use]
    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Colour at `t` along the gradient axis.
    #[must_use]
    pub fn color_at(&self, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let first = self.stops[0];
        if t <= first.position {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if t <= hi.position {
                let span = hi.position - lo.position;
                if span <= f32::EPSILON {
                    return hi.color;
                }
                return lo.color.lerp(hi.color, (t - lo.position) / span);
            }
        }
        self.stops[self.stops.len() - 1].color
    }

    /// Total order: direction, then stops lexicographically (position, then
    /// colour); a gradient that is a strict prefix of another sorts first.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.direction.cmp(&other.direction).then_with(|| {
            for (a, b) in self.stops.iter().zip(&other.stops) {
                let ord = a.total_cmp(b);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            self.stops.len().cmp(&other.stops.len())
        })
    }
}

impl PartialEq for Gradient {
    fn eq(&self, other: &Self) -> bool {
        self.total_cmp(other) == Ordering::Equal
    }
}

impl Eq for Gradient {}

impl PartialOrd for Gradient {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Gradient {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

/// A solid colour or a gradient.
#[derive(Clone, Debug)]
pub enum ColorFill {
    Solid(Rgba),
    Gradient(Gradient),
}

impl ColorFill {
    /// Colour at `t` along the fill; solid fills ignore `t`.
    #[must_use]
    pub fn color_at(&self, t: f32) -> Rgba {
        match self {
            Self::Solid(color) => *color,
            Self::Gradient(gradient) => gradient.color_at(t),
        }
    }

    /// A representative single colour (a gradient's first stop).
    #[must_use]
    pub fn primary(&self) -> Rgba {
        self.color_at(0.0)
    }

    #[must_use]
    pub fn is_gradient(&self) -> bool {
        matches!(self, Self::Gradient(_))
    }
}

impl From<Rgba> for ColorFill {
    fn from(color: Rgba) -> Self {
        Self::Solid(color)
    }
}

impl From<Gradient> for ColorFill {
    fn from(gradient: Gradient) -> Self {
        Self::Gradient(gradient)
    }
}

impl PartialEq for ColorFill {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ColorFill {}

impl PartialOrd for ColorFill {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ColorFill {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Solid(a), Self::Solid(b)) => a.total_cmp(b),
            (Self::Solid(_), Self::Gradient(_)) => Ordering::Less,
            (Self::Gradient(_), Self::Solid(_)) => Ordering::Greater,
            (Self::Gradient(a), Self::Gradient(b)) => a.total_cmp(b),
        }
    }
}
