// Shared tuning constants used by the engine and both front-ends.

// Transitions
pub const DEFAULT_TRANSITION_SECS: f32 = 2.0; // blend duration when a table does not set one
pub const REFERENCE_FPS: f32 = 60.0; // per-frame increments below were authored at this rate

// Amplitude signal (1.0 = silence, 3.0 = loudest)
pub const AMPLITUDE_MIN: f32 = 1.0;
pub const AMPLITUDE_MAX: f32 = 3.0;
pub const SIMULATED_AMPLITUDE_RATE: f32 = 2.0; // radians per second
pub const SIMULATED_AMPLITUDE_DEPTH: f32 = 0.5;
pub const SPECTRUM_BASS_BINS: usize = 10; // low bins averaged from an analyser spectrum
pub const SAMPLE_RMS_GAIN: f32 = 8.0; // maps microphone RMS into the amplitude span

// Breathing pulse on the sphere intensity
pub const BREATH_BASE: f32 = 0.9;
pub const BREATH_DEPTH: f32 = 0.1;
pub const BREATH_INTENSITY_FLOOR: f32 = 0.8;
pub const BREATH_INTENSITY_SPAN: f32 = 0.4;

// Ring
pub const RING_PULSE_BASE: f32 = 0.7;
pub const RING_PULSE_DEPTH: f32 = 0.3;
pub const RING_SPEED_SMOOTHING: f32 = 0.05; // fraction of the gap closed per reference frame
pub const RING_BASE_SPEED: f32 = 0.2; // ring speed target per unit of orbit speed
pub const RING_ANGLE_STEP: f32 = 0.01; // radians per reference frame at unit ring speed

// Orbiting particles
pub const ORBIT_PARTICLE_COUNT: usize = 30;
pub const ORBIT_SEED: u64 = 0x5EED_0F_0B17;
pub const ORBIT_RADIUS_MIN: f32 = 1.8;
pub const ORBIT_RADIUS_SPAN: f32 = 0.3;
pub const ORBIT_SPEED_MIN: f32 = 0.01;
pub const ORBIT_SPEED_SPAN: f32 = 0.02;
pub const ORBIT_SIZE_MIN: f32 = 0.05;
pub const ORBIT_SIZE_SPAN: f32 = 0.1;
pub const ORBIT_PHI_RATIO: f32 = 0.3; // polar drift relative to azimuthal speed
pub const ORBIT_RADIUS_AMPLITUDE_GAIN: f32 = 0.2;

// Global intensity
pub const INTENSITY_MIN: f32 = 0.0;
pub const INTENSITY_MAX: f32 = 2.0;
pub const INTENSITY_APPROACH_RATE: f32 = 3.0; // per second
pub const INTENSITY_SNAP_EPSILON: f32 = 0.01;

// Presence sequencing delays (seconds)
pub const GREETING_DELAY_SECS: f32 = 0.5;
pub const SPEECH_RETURN_DELAY_SECS: f32 = 0.3;
pub const SPEECH_FAILURE_HOLD_SECS: f32 = 3.0;
