//! The parameter bundle each HUD state carries.
//!
//! Every state shares this one schema, so interpolation never meets a
//! missing field. Colours are linear `[0, 1]` RGB triples in whatever space
//! the table was authored in.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Appearance of the sphere, its ring and its bloom for one moment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParameterBundle {
    #[serde(deserialize_with = "color::deserialize")]
    pub sphere_color: Vec3,
    pub sphere_intensity: f32,
    pub sphere_opacity: f32,
    #[serde(deserialize_with = "color::deserialize")]
    pub ring_color: Vec3,
    pub ring_opacity: f32,
    /// Sphere spin in radians per reference frame, x and y axes.
    pub rotation_speed: Vec2,
    /// Multiplier on ring and particle orbit rates.
    pub orbit_speed: f32,
    /// Speed of the energy flow pattern on the sphere surface.
    pub energy_speed: f32,
    /// Angular frequency of the breathing and ring pulses.
    pub pulse_speed: f32,
    pub scale: f32,
    pub bloom_strength: f32,
    pub bloom_radius: f32,
}

impl Default for ParameterBundle {
    fn default() -> Self {
        Self {
            sphere_color: Vec3::new(0.0, 0.8, 1.0),
            sphere_intensity: 0.5,
            sphere_opacity: 0.7,
            ring_color: Vec3::new(0.0, 0.8, 1.0),
            ring_opacity: 0.5,
            rotation_speed: Vec2::new(0.002, 0.005),
            orbit_speed: 1.0,
            energy_speed: 1.0,
            pulse_speed: 1.0,
            scale: 1.0,
            bloom_strength: 1.0,
            bloom_radius: 0.4,
        }
    }
}

impl ParameterBundle {
    pub const COMPONENTS: usize = 17;

    const FIELD_NAMES: [&'static str; Self::COMPONENTS] = [
        "sphere_color",
        "sphere_color",
        "sphere_color",
        "sphere_intensity",
        "sphere_opacity",
        "ring_color",
        "ring_color",
        "ring_color",
        "ring_opacity",
        "rotation_speed",
        "rotation_speed",
        "orbit_speed",
        "energy_speed",
        "pulse_speed",
        "scale",
        "bloom_strength",
        "bloom_radius",
    ];

    /// Flattened view of every numeric component, in declaration order.
    pub fn components(&self) -> [f32; Self::COMPONENTS] {
        [
            self.sphere_color.x,
            self.sphere_color.y,
            self.sphere_color.z,
            self.sphere_intensity,
            self.sphere_opacity,
            self.ring_color.x,
            self.ring_color.y,
            self.ring_color.z,
            self.ring_opacity,
            self.rotation_speed.x,
            self.rotation_speed.y,
            self.orbit_speed,
            self.energy_speed,
            self.pulse_speed,
            self.scale,
            self.bloom_strength,
            self.bloom_radius,
        ]
    }

    /// Name of the first field holding a NaN or infinity, if any.
    pub fn non_finite_field(&self) -> Option<&'static str> {
        self.components()
            .iter()
            .position(|v| !v.is_finite())
            .map(|i| Self::FIELD_NAMES[i])
    }

    /// Largest absolute per-component difference to `other`.
    pub fn max_abs_delta(&self, other: &ParameterBundle) -> f32 {
        self.components()
            .iter()
            .zip(other.components().iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f32::max)
    }
}

/// Colour helpers and the serde adapter for colour fields.
pub mod color {
    use glam::Vec3;
    use serde::{Deserialize, Deserializer};

    pub fn from_rgb_u32(rgb: u32) -> Vec3 {
        let r = ((rgb >> 16) & 0xff) as f32 / 255.0;
        let g = ((rgb >> 8) & 0xff) as f32 / 255.0;
        let b = (rgb & 0xff) as f32 / 255.0;
        Vec3::new(r, g, b)
    }

    /// Parses `#rrggbb`, `rrggbb` or `0xrrggbb`.
    pub fn parse_hex(s: &str) -> Option<Vec3> {
        let s = s.trim();
        let digits = s
            .strip_prefix('#')
            .or_else(|| s.strip_prefix("0x"))
            .unwrap_or(s);
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(from_rgb_u32)
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Hex(String),
        Rgb([f32; 3]),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec3, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid hex colour `{s}`"))),
            Repr::Rgb(rgb) => Ok(Vec3::from(rgb)),
        }
    }
}
