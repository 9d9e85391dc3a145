//! Named colours used by materials, lights and the clear colour.
//!
//! All colours are plain `wgpu::Color` values (linear `f64` rgba) so that the
//! same type flows from materials straight into the render surface.

use wgpu::Color;

const fn rgb8(r: u8, g: u8, b: u8) -> Color {
    Color {
        r: r as f64 / 255.0,
        g: g as f64 / 255.0,
        b: b as f64 / 255.0,
        a: 1.0,
    }
}

const fn white(level: f64) -> Color {
    Color {
        r: level,
        g: level,
        b: level,
        a: 1.0,
    }
}

pub const TRANSPARENT: Color = Color::TRANSPARENT;
pub const WHITE: Color = Color::WHITE;

pub const DARK_GRAY: Color = white(1.0 / 3.0);
pub const LIGHT_GRAY: Color = white(2.0 / 3.0);

pub const BLUE: Color = rgb8(0, 122, 255);
pub const YELLOW: Color = rgb8(255, 204, 0);
pub const GREEN: Color = rgb8(52, 199, 89);
pub const ORANGE: Color = rgb8(255, 149, 0);
pub const PURPLE: Color = rgb8(175, 82, 222);
pub const PINK: Color = rgb8(255, 45, 85);
pub const INDIGO: Color = rgb8(88, 86, 214);
pub const TEAL: Color = rgb8(48, 176, 199);

/// Soft fill used by the ambient light of composed scenes.
pub const AMBIENT_FILL: Color = white(0.9);

/// `[r, g, b]` as `f32`, the layout uniforms expect.
pub fn to_rgb(colour: Color) -> [f32; 3] {
    [colour.r as f32, colour.g as f32, colour.b as f32]
}

/// Inverse of [`to_rgb`] for importers handing over `f32` colour factors.
pub fn from_rgba(rgba: [f32; 4]) -> Color {
    Color {
        r: rgba[0] as f64,
        g: rgba[1] as f64,
        b: rgba[2] as f64,
        a: rgba[3] as f64,
    }
}

pub fn is_transparent(colour: Color) -> bool {
    colour.a == 0.0
}
