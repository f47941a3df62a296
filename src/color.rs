use clap::ValueEnum;
use palette::{Hsl, IntoColor, Srgb};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::aids::AidKind;

pub type Rgb = (u8, u8, u8);

/// Share of the background mixed into the Spherical view's axes
pub const FADED_AXIS_BLEND: f32 = 0.5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn all() -> &'static [Axis] {
        &[Axis::X, Axis::Y, Axis::Z]
    }

    pub fn label(&self) -> char {
        match self {
            Axis::X => 'x',
            Axis::Y => 'y',
            Axis::Z => 'z',
        }
    }
}

fn hsl(h: f32, s: f32, l: f32) -> Rgb {
    let rgb: Srgb = Hsl::new(h, s, l).into_color();
    (
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

const RED_HUE: f32 = 0.0;
const GREEN_HUE: f32 = 120.0;
const BLUE_HUE: f32 = 220.0;

impl Theme {
    pub fn all() -> &'static [Theme] {
        &[Theme::Light, Theme::Dark]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn next(&self) -> Self {
        let all = Self::all();
        let current = all.iter().position(|t| t == self).unwrap_or(0);
        all[(current + 1) % all.len()]
    }

    /// Saturated hues read well on light backgrounds darker, on dark ones lighter
    fn lightness(&self) -> f32 {
        match self {
            Theme::Light => 0.42,
            Theme::Dark => 0.62,
        }
    }

    fn hue(&self, hue: f32) -> Rgb {
        hsl(hue, 0.85, self.lightness())
    }

    pub fn background(&self) -> Rgb {
        match self {
            Theme::Light => hsl(0.0, 0.0, 0.97),
            Theme::Dark => hsl(230.0, 0.15, 0.10),
        }
    }

    pub fn foreground(&self) -> Rgb {
        match self {
            Theme::Light => hsl(0.0, 0.0, 0.15),
            Theme::Dark => hsl(0.0, 0.0, 0.88),
        }
    }

    /// Help line and pane borders
    pub fn muted(&self) -> Rgb {
        hsl(0.0, 0.0, 0.55)
    }

    pub fn axis(&self, axis: Axis) -> Rgb {
        match axis {
            Axis::X => self.hue(RED_HUE),
            Axis::Y => self.hue(GREEN_HUE),
            Axis::Z => self.hue(BLUE_HUE),
        }
    }

    /// Axis color blended halfway into the background
    pub fn faded_axis(&self, axis: Axis) -> Rgb {
        lerp_color(self.axis(axis), self.background(), FADED_AXIS_BLEND)
    }

    pub fn aid(&self, kind: AidKind) -> Rgb {
        match kind {
            AidKind::CartesianRadius | AidKind::AzimuthArc => self.hue(BLUE_HUE),
            AidKind::Projection => hsl(0.0, 0.0, 0.55),
            AidKind::SphericalRadius => self.hue(RED_HUE),
            AidKind::PolarArc => self.hue(GREEN_HUE),
        }
    }

    pub fn marker(&self) -> Rgb {
        self.hue(RED_HUE)
    }
}

pub fn to_color((r, g, b): Rgb) -> Color {
    Color::Rgb(r, g, b)
}

/// Interpolate between two colors
pub fn lerp_color(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    (
        (a.0 as f32 + (b.0 as f32 - a.0 as f32) * t).round() as u8,
        (a.1 as f32 + (b.1 as f32 - a.1 as f32) * t).round() as u8,
        (a.2 as f32 + (b.2 as f32 - a.2 as f32) * t).round() as u8,
    )
}
