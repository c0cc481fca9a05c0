//! Continuous, time- and amplitude-driven motion layered on the state blend.
//!
//! Per-frame increments are authored against a 60 Hz reference and scaled by
//! `dt * REFERENCE_FPS`, so motion speed does not depend on the display rate.

use crate::amplitude::{clamp_amplitude, simulated_amplitude, AmplitudeSource};
use crate::bundle::ParameterBundle;
use crate::constants::*;
use crate::error::HudError;
use glam::{Vec2, Vec3};
use rand::prelude::*;
use serde::Serialize;
use smallvec::SmallVec;
use std::f32::consts::{PI, TAU};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitParticle {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
    pub speed: f32,
    pub size: f32,
}

impl OrbitParticle {
    fn random(rng: &mut StdRng) -> Self {
        Self {
            radius: ORBIT_RADIUS_MIN + rng.gen::<f32>() * ORBIT_RADIUS_SPAN,
            theta: rng.gen::<f32>() * TAU,
            phi: rng.gen::<f32>() * PI,
            speed: ORBIT_SPEED_MIN + rng.gen::<f32>() * ORBIT_SPEED_SPAN,
            size: ORBIT_SIZE_MIN + rng.gen::<f32>() * ORBIT_SIZE_SPAN,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OrbitSample {
    pub position: Vec3,
    pub size: f32,
}

/// Scalars the renderer needs besides the bundle itself.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Motion {
    pub time: f32,
    pub amplitude: f32,
    pub breathing: f32,
    pub ring_pulse: f32,
    pub sphere_rotation: Vec2,
    pub ring_angle: f32,
    pub ring_speed: f32,
    pub global_intensity: f32,
    pub particle_size_scale: f32,
}

/// Master intensity in `[0, 2]` that eases toward its target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlobalIntensity {
    current: f32,
    target: f32,
}

impl Default for GlobalIntensity {
    fn default() -> Self {
        Self {
            current: 1.0,
            target: 1.0,
        }
    }
}

impl GlobalIntensity {
    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, value: f32) -> Result<(), HudError> {
        if !(INTENSITY_MIN..=INTENSITY_MAX).contains(&value) {
            return Err(HudError::IntensityOutOfRange(value));
        }
        self.target = value;
        Ok(())
    }

    pub fn step(&mut self, dt: f32) -> f32 {
        let gap = self.target - self.current;
        if gap.abs() <= INTENSITY_SNAP_EPSILON {
            self.current = self.target;
        } else {
            let step = gap * (dt * INTENSITY_APPROACH_RATE).min(1.0);
            self.current += step;
        }
        self.current
    }
}

/// Output of one modulator tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Modulated {
    pub params: ParameterBundle,
    pub motion: Motion,
    pub particles: SmallVec<[OrbitSample; 32]>,
}

#[derive(Clone, Debug)]
pub struct ReactiveModulators {
    time: f64,
    sphere_rotation: Vec2,
    ring_angle: f32,
    ring_speed: f32,
    particles: Vec<OrbitParticle>,
    intensity: GlobalIntensity,
}

impl Default for ReactiveModulators {
    fn default() -> Self {
        Self::new(ORBIT_PARTICLE_COUNT, ORBIT_SEED)
    }
}

impl ReactiveModulators {
    pub fn new(particle_count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let particles = (0..particle_count)
            .map(|_| OrbitParticle::random(&mut rng))
            .collect();
        Self {
            time: 0.0,
            sphere_rotation: Vec2::ZERO,
            ring_angle: 0.0,
            ring_speed: 0.0,
            particles,
            intensity: GlobalIntensity::default(),
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn particles(&self) -> &[OrbitParticle] {
        &self.particles
    }

    pub fn intensity(&self) -> &GlobalIntensity {
        &self.intensity
    }

    pub fn set_intensity(&mut self, value: f32) -> Result<(), HudError> {
        self.intensity.set_target(value)
    }

    /// Advance time and accumulators by `dt` and perturb `blended`.
    ///
    /// `dt` must already be sanitized (finite, non-negative).
    pub fn tick(
        &mut self,
        dt: f32,
        source: Option<&mut dyn AmplitudeSource>,
        blended: &ParameterBundle,
    ) -> Modulated {
        self.time += dt as f64;
        let t = self.time as f32;
        let frames = dt * REFERENCE_FPS;

        let raw = source
            .and_then(|s| s.sample(t))
            .unwrap_or_else(|| simulated_amplitude(t));
        let amplitude = clamp_amplitude(raw);
        let g = self.intensity.step(dt);

        let wave = (t * blended.pulse_speed).sin();
        let breathing = wave * BREATH_DEPTH + BREATH_BASE;
        let ring_pulse = wave * RING_PULSE_DEPTH + RING_PULSE_BASE;

        let spin = self.sphere_rotation + blended.rotation_speed * frames;
        self.sphere_rotation = Vec2::new(spin.x.rem_euclid(TAU), spin.y.rem_euclid(TAU));

        let ring_target = RING_BASE_SPEED * blended.orbit_speed;
        let smoothing = 1.0 - (1.0 - RING_SPEED_SMOOTHING).powf(frames);
        self.ring_speed += (ring_target - self.ring_speed) * smoothing;
        self.ring_angle =
            (self.ring_angle + RING_ANGLE_STEP * self.ring_speed * frames).rem_euclid(TAU);

        let mut params = *blended;
        params.sphere_intensity = blended.sphere_intensity
            * g
            * (BREATH_INTENSITY_FLOOR + breathing * BREATH_INTENSITY_SPAN);
        params.ring_opacity = blended.ring_opacity * ring_pulse;
        params.bloom_strength = blended.bloom_strength * g;
        params.scale = blended.scale * (1.0 + (amplitude - 1.0) * ORBIT_RADIUS_AMPLITUDE_GAIN);

        let orbit = blended.orbit_speed * frames;
        let mut particles = SmallVec::with_capacity(self.particles.len());
        for p in &mut self.particles {
            p.theta = (p.theta + p.speed * orbit).rem_euclid(TAU);
            p.phi = (p.phi + p.speed * ORBIT_PHI_RATIO * orbit).rem_euclid(TAU);
            particles.push(OrbitSample {
                position: spherical(p.radius * params.scale, p.phi, p.theta),
                size: p.size * amplitude,
            });
        }

        Modulated {
            params,
            motion: Motion {
                time: t,
                amplitude,
                breathing,
                ring_pulse,
                sphere_rotation: self.sphere_rotation,
                ring_angle: self.ring_angle,
                ring_speed: self.ring_speed,
                global_intensity: g,
                particle_size_scale: amplitude,
            },
            particles,
        }
    }
}

/// Y-up spherical coordinates: `phi` from the +Y pole, `theta` around Y.
fn spherical(radius: f32, phi: f32, theta: f32) -> Vec3 {
    let s = phi.sin();
    Vec3::new(radius * s * theta.sin(), radius * phi.cos(), radius * s * theta.cos())
}
