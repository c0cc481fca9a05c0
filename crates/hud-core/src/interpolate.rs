use crate::bundle::ParameterBundle;
use glam::{Vec2, Vec3};

/// Field types that can be linearly interpolated.
///
/// `t` is not clamped: overshooting curves feed values outside `[0, 1]` and
/// expect extrapolation.
pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Vec2 {
    #[inline]
    fn lerp(self, to: Self, t: f32) -> Self {
        Vec2::new(Lerp::lerp(self.x, to.x, t), Lerp::lerp(self.y, to.y, t))
    }
}

impl Lerp for Vec3 {
    #[inline]
    fn lerp(self, to: Self, t: f32) -> Self {
        Vec3::new(
            Lerp::lerp(self.x, to.x, t),
            Lerp::lerp(self.y, to.y, t),
            Lerp::lerp(self.z, to.z, t),
        )
    }
}

/// Blend two bundles field by field. Total for every `t`; callers that need
/// displayable values clamp afterwards.
pub fn blend(from: &ParameterBundle, to: &ParameterBundle, t: f32) -> ParameterBundle {
    ParameterBundle {
        sphere_color: Lerp::lerp(from.sphere_color, to.sphere_color, t),
        sphere_intensity: Lerp::lerp(from.sphere_intensity, to.sphere_intensity, t),
        sphere_opacity: Lerp::lerp(from.sphere_opacity, to.sphere_opacity, t),
        ring_color: Lerp::lerp(from.ring_color, to.ring_color, t),
        ring_opacity: Lerp::lerp(from.ring_opacity, to.ring_opacity, t),
        rotation_speed: Lerp::lerp(from.rotation_speed, to.rotation_speed, t),
        orbit_speed: Lerp::lerp(from.orbit_speed, to.orbit_speed, t),
        energy_speed: Lerp::lerp(from.energy_speed, to.energy_speed, t),
        pulse_speed: Lerp::lerp(from.pulse_speed, to.pulse_speed, t),
        scale: Lerp::lerp(from.scale, to.scale, t),
        bloom_strength: Lerp::lerp(from.bloom_strength, to.bloom_strength, t),
        bloom_radius: Lerp::lerp(from.bloom_radius, to.bloom_radius, t),
    }
}
