use hud_core::*;

fn scenario_engine() -> HudEngine {
    let registry = StateRegistry::builder()
        .state(
            "idle",
            "",
            ParameterBundle {
                sphere_intensity: 0.4,
                ..ParameterBundle::default()
            },
        )
        .state(
            "active",
            "",
            ParameterBundle {
                sphere_intensity: 0.8,
                ..ParameterBundle::default()
            },
        )
        .build()
        .unwrap();
    HudEngine::with_registry(registry, 1.0, Easing::InOutCubic)
}

#[derive(Default)]
struct Recorder {
    frames: Vec<HudFrame>,
    fail: bool,
}

impl RendererAdapter for Recorder {
    fn apply(&mut self, frame: &HudFrame) -> Result<(), HudError> {
        if self.fail {
            return Err(HudError::RendererUnavailable("composer lost".into()));
        }
        self.frames.push(frame.clone());
        Ok(())
    }
}

#[derive(Default)]
struct Labels(Vec<String>);

impl StatusSink for Labels {
    fn show(&mut self, label: &str) {
        self.0.push(label.to_string());
    }
}

#[test]
fn blends_then_settles_on_active() {
    let mut engine = scenario_engine();
    engine.set_state("active").unwrap();
    let f = engine.tick(0.5, None);
    assert!((f.progress - 0.5).abs() < 1e-6);
    assert!(f.blended.sphere_intensity > 0.4 && f.blended.sphere_intensity < 0.8);
    assert_eq!(&*f.state, "active");
    assert_eq!(&*f.settled_state, "idle");

    let f = engine.tick(0.5, None);
    assert!(f.settled);
    assert_eq!(f.blended.sphere_intensity, 0.8);
    assert_eq!(engine.current_state(), "active");
}

#[test]
fn unknown_state_is_recorded_not_fatal() {
    let mut engine = scenario_engine();
    assert!(engine.set_state("bogus").is_err());
    assert_eq!(engine.diagnostics().unknown_states, 1);
    assert!(matches!(
        engine.diagnostics().last,
        Some(HudError::UnknownState { .. })
    ));
    assert_eq!(engine.phase(), Phase::Settled(engine.registry().default_state()));
    let f = engine.tick(0.1, None);
    assert!(f.settled);
    assert_eq!(&*f.state, "idle");
}

#[test]
fn invalid_delta_is_recorded_and_clamped() {
    let mut engine = scenario_engine();
    engine.set_state("active").unwrap();
    engine.tick(0.2, None);
    let t0 = engine.modulators().time();
    let f = engine.tick(-0.5, None);
    assert!((f.progress - 0.2).abs() < 1e-6);
    assert_eq!(engine.modulators().time(), t0);
    engine.tick(f32::NAN, None);
    assert_eq!(engine.diagnostics().invalid_deltas, 2);
}

#[test]
fn queued_commands_apply_on_next_tick() {
    let mut engine = scenario_engine();
    let tx = engine.command_sender();
    assert!(tx.set_state("active"));
    assert!(tx.set_state("nowhere"));
    assert!(tx.set_intensity(5.0));
    assert!(tx.set_intensity(1.5));
    assert_eq!(engine.target_state(), "idle");

    engine.tick(0.0, None);
    assert_eq!(engine.target_state(), "active");
    assert_eq!(engine.diagnostics().unknown_states, 1);
    assert_eq!(engine.diagnostics().rejected_intensities, 1);
    assert_eq!(engine.intensity_config().target, 1.5);
}

#[test]
fn queued_easing_and_duration_apply_without_a_jump() {
    let mut engine = scenario_engine();
    let tx = engine.command_sender();
    engine.set_state("active").unwrap();
    let before = engine.tick(0.3, None).blended;

    assert!(tx.set_easing(Easing::OutBack));
    assert!(tx.set_duration(f32::NAN));
    let frame = engine.tick(0.0, None);
    assert!(frame.blended.max_abs_delta(&before) < 1e-5);
    assert!(!frame.settled);
    assert_eq!(engine.controller().easing(), Easing::OutBack);
    assert_eq!(
        engine.controller().duration(),
        constants::DEFAULT_TRANSITION_SECS
    );
}

#[test]
fn intensity_scales_bloom_and_glow() {
    let mut engine = scenario_engine();
    engine.set_intensity(2.0).unwrap();
    let mut f = engine.tick(0.0, None);
    for _ in 0..300 {
        f = engine.tick(1.0 / 60.0, None);
    }
    assert_eq!(f.motion.global_intensity, 2.0);
    let blended = f.blended;
    assert!((f.params.bloom_strength - blended.bloom_strength * 2.0).abs() < 1e-5);
    let glow = blended.sphere_intensity * 2.0 * (0.8 + f.motion.breathing * 0.4);
    assert!((f.params.sphere_intensity - glow).abs() < 1e-5);

    assert_eq!(
        engine.set_intensity(-1.0),
        Err(HudError::IntensityOutOfRange(-1.0))
    );
    let cfg = engine.intensity_config();
    assert_eq!(cfg.target, 2.0);
    assert_eq!(cfg.state, "idle");
}

#[test]
fn renderer_failure_keeps_engine_running() {
    let mut engine = scenario_engine();
    let mut renderer = Recorder {
        fail: true,
        ..Recorder::default()
    };
    engine.set_state("active").unwrap();
    let f = engine.tick(0.25, None);
    assert!(!engine.present(&f, &mut renderer, None));
    assert_eq!(engine.diagnostics().renderer_failures, 1);

    renderer.fail = false;
    let f = engine.step(0.25, None, &mut renderer, None);
    assert_eq!(renderer.frames.len(), 1);
    assert!((f.progress - 0.5).abs() < 1e-6);
}

#[test]
fn status_sink_sees_label_changes_only() {
    let mut engine = scenario_engine();
    let mut renderer = Recorder::default();
    let mut labels = Labels::default();
    for _ in 0..3 {
        engine.step(0.1, None, &mut renderer, Some(&mut labels));
    }
    engine.set_state("active").unwrap();
    for _ in 0..20 {
        engine.step(0.1, None, &mut renderer, Some(&mut labels));
    }
    assert_eq!(labels.0, vec!["IDLE".to_string(), "ACTIVE".to_string()]);
    assert_eq!(renderer.frames.len(), 23);
}

#[test]
fn live_amplitude_drives_scale_and_particles() {
    let mut engine = scenario_engine();
    let cell = SharedAmplitude::new();
    let mut source = cell.clone();
    cell.store(3.0);
    let f = engine.tick(1.0 / 60.0, Some(&mut source));
    assert_eq!(f.motion.amplitude, 3.0);
    assert!((f.params.scale - f.blended.scale * 1.4).abs() < 1e-5);
    assert_eq!(f.particles.len(), constants::ORBIT_PARTICLE_COUNT);
    let sizes = engine.modulators().particles();
    for (sample, p) in f.particles.iter().zip(sizes) {
        assert!((sample.size - p.size * 3.0).abs() < 1e-6);
    }

    cell.clear();
    let f = engine.tick(1.0 / 60.0, Some(&mut source));
    let t = f.motion.time;
    assert!((f.motion.amplitude - clamp_amplitude(simulated_amplitude(t))).abs() < 1e-6);
}

#[test]
fn frames_pack_into_gpu_uniforms() {
    let mut engine = HudEngine::new(&HudConfig::preset(Preset::Zairo).unwrap()).unwrap();
    let f = engine.tick(0.016, None);
    let uniforms = HudUniforms::from_frame(&f).with_resolution(800, 600);
    assert_eq!(uniforms.as_floats().len(), 24);
    assert!((uniforms.resolution[2] - 800.0 / 600.0).abs() < 1e-6);
    assert!(uniforms.ring[3] <= 1.0);
}
