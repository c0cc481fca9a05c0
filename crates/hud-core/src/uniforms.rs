//! GPU-side layouts packed from a `HudFrame`.
//!
//! Colours and opacities are clamped here, since overshooting easings can
//! push the blend outside displayable range.

use crate::engine::HudFrame;
use crate::modulate::OrbitSample;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct HudUniforms {
    /// rgb + opacity
    pub sphere: [f32; 4],
    /// rgb + opacity
    pub ring: [f32; 4],
    /// sphere rotation x, y; ring angle; scale
    pub rotation: [f32; 4],
    /// intensity, energy speed, pulse speed, time
    pub energy: [f32; 4],
    /// bloom strength, bloom radius, amplitude, transition progress
    pub bloom: [f32; 4],
    /// width, height, aspect, particle size scale
    pub resolution: [f32; 4],
}

impl HudUniforms {
    pub fn from_frame(frame: &HudFrame) -> Self {
        let p = &frame.params;
        let m = &frame.motion;
        let sphere = p.sphere_color.clamp(glam::Vec3::ZERO, glam::Vec3::ONE);
        let ring = p.ring_color.clamp(glam::Vec3::ZERO, glam::Vec3::ONE);
        Self {
            sphere: [sphere.x, sphere.y, sphere.z, unit(p.sphere_opacity)],
            ring: [ring.x, ring.y, ring.z, unit(p.ring_opacity)],
            rotation: [m.sphere_rotation.x, m.sphere_rotation.y, m.ring_angle, p.scale.max(0.0)],
            energy: [p.sphere_intensity.max(0.0), p.energy_speed, p.pulse_speed, m.time],
            bloom: [p.bloom_strength.max(0.0), p.bloom_radius.max(0.0), m.amplitude, frame.progress],
            resolution: [1.0, 1.0, 1.0, m.particle_size_scale],
        }
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        let w = width.max(1) as f32;
        let h = height.max(1) as f32;
        self.resolution[0] = w;
        self.resolution[1] = h;
        self.resolution[2] = w / h;
        self
    }

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(std::slice::from_ref(self))
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    pub pos: [f32; 3],
    pub size: f32,
}

impl From<&OrbitSample> for ParticleInstance {
    fn from(s: &OrbitSample) -> Self {
        Self {
            pos: s.position.to_array(),
            size: s.size.max(0.0),
        }
    }
}

fn unit(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}
