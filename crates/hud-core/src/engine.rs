use crate::amplitude::AmplitudeSource;
use crate::bundle::ParameterBundle;
use crate::command::{CommandQueue, CommandSender, HudCommand};
use crate::config::HudConfig;
use crate::easing::Easing;
use crate::error::{ConfigError, Diagnostics, HudError};
use crate::modulate::{Motion, OrbitSample, ReactiveModulators};
use crate::registry::StateRegistry;
use crate::transition::{Phase, StateChange, TransitionController, TransitionState};
use serde::Serialize;
use smallvec::SmallVec;
use std::sync::Arc;

/// Consumes one finished frame. Must not keep the frame between calls.
pub trait RendererAdapter {
    fn apply(&mut self, frame: &HudFrame) -> Result<(), HudError>;
}

/// Displays the label of the state being blended toward.
pub trait StatusSink {
    fn show(&mut self, label: &str);
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HudFrame {
    /// State being blended toward (or settled in).
    pub state: Arc<str>,
    /// Last settled state.
    pub settled_state: Arc<str>,
    pub label: Arc<str>,
    pub progress: f32,
    pub eased: f32,
    pub settled: bool,
    /// The eased blend before modulation.
    pub blended: ParameterBundle,
    /// The blend with breathing, pulse, intensity and amplitude applied.
    pub params: ParameterBundle,
    pub motion: Motion,
    pub particles: SmallVec<[OrbitSample; 32]>,
}

/// Read-out of the values the global intensity control affects.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IntensityConfig {
    pub global: f32,
    pub target: f32,
    pub bloom_strength: f32,
    pub bloom_radius: f32,
    pub sphere_glow: f32,
    pub state: String,
}

/// Owns the registry, the transition machine and the modulators, and turns
/// queued commands plus elapsed time into `HudFrame`s.
pub struct HudEngine {
    registry: StateRegistry,
    controller: TransitionController,
    modulators: ReactiveModulators,
    commands: CommandQueue,
    diagnostics: Diagnostics,
    last_label: Option<Arc<str>>,
}

impl HudEngine {
    pub fn new(config: &HudConfig) -> Result<Self, ConfigError> {
        let registry = config.build_registry()?;
        let controller = TransitionController::new(
            &registry,
            config.engine.transition_secs,
            config.engine.easing,
        );
        let modulators =
            ReactiveModulators::new(config.modulation.orbit_particles, config.modulation.seed);
        log::info!(
            "[hud] engine ready: {} states, {}s {} blends, starting in {}",
            registry.len(),
            controller.duration(),
            controller.easing(),
            registry.name(registry.default_state())
        );
        Ok(Self::from_parts(registry, controller, modulators))
    }

    pub fn with_registry(registry: StateRegistry, duration: f32, easing: Easing) -> Self {
        let controller = TransitionController::new(&registry, duration, easing);
        Self::from_parts(registry, controller, ReactiveModulators::default())
    }

    fn from_parts(
        registry: StateRegistry,
        controller: TransitionController,
        modulators: ReactiveModulators,
    ) -> Self {
        Self {
            registry,
            controller,
            modulators,
            commands: CommandQueue::default(),
            diagnostics: Diagnostics::default(),
            last_label: None,
        }
    }

    pub fn registry(&self) -> &StateRegistry {
        &self.registry
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn transition(&self) -> TransitionState {
        self.controller.state()
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn controller(&self) -> &TransitionController {
        &self.controller
    }

    pub fn modulators(&self) -> &ReactiveModulators {
        &self.modulators
    }

    pub fn current_state(&self) -> &str {
        self.registry.name(self.controller.current())
    }

    pub fn target_state(&self) -> &str {
        self.registry.name(self.controller.target())
    }

    /// Handle for callbacks that fire outside the frame loop.
    pub fn command_sender(&self) -> CommandSender {
        self.commands.sender()
    }

    /// Unknown names are recorded and leave the machine unchanged.
    pub fn set_state(&mut self, name: &str) -> Result<StateChange, HudError> {
        self.controller
            .set_state(&self.registry, name)
            .map_err(|e| self.record(e))
    }

    /// Out-of-range values are recorded and leave the target unchanged.
    pub fn set_intensity(&mut self, value: f32) -> Result<(), HudError> {
        self.modulators
            .set_intensity(value)
            .map(|()| log::info!("[hud] intensity target {value:.2}"))
            .map_err(|e| self.record(e))
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.controller.set_easing(&self.registry, easing);
        log::info!("[hud] easing {easing}");
    }

    pub fn set_duration(&mut self, secs: f32) {
        self.controller.set_duration(&self.registry, secs);
        log::info!("[hud] transition duration {}s", self.controller.duration());
    }

    /// Applies queued commands, then advances the blend and modulators.
    pub fn tick(&mut self, dt: f32, source: Option<&mut dyn AmplitudeSource>) -> HudFrame {
        let pending: SmallVec<[HudCommand; 4]> = self.commands.drain().collect();
        for cmd in pending {
            // Failures are already recorded.
            let _ = match cmd {
                HudCommand::SetState(name) => self.set_state(&name).map(|_| ()),
                HudCommand::SetIntensity(value) => self.set_intensity(value),
                HudCommand::SetEasing(easing) => {
                    self.set_easing(easing);
                    Ok(())
                }
                HudCommand::SetDuration(secs) => {
                    self.set_duration(secs);
                    Ok(())
                }
            };
        }

        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            self.record(HudError::InvalidDeltaTime(dt));
            0.0
        };

        let sample = self.controller.tick(&self.registry, dt);
        let modulated = self.modulators.tick(dt, source, &sample.bundle);
        let target = self.controller.target();
        HudFrame {
            state: self.registry.name(target).clone(),
            settled_state: self.registry.name(self.controller.current()).clone(),
            label: self.registry.label(target).clone(),
            progress: sample.state.progress,
            eased: sample.eased,
            settled: sample.settled,
            blended: sample.bundle,
            params: modulated.params,
            motion: modulated.motion,
            particles: modulated.particles,
        }
    }

    /// Hands `frame` to the renderer and, when the label changed, to the
    /// status sink. A failing renderer is recorded; engine state is kept.
    pub fn present(
        &mut self,
        frame: &HudFrame,
        renderer: &mut dyn RendererAdapter,
        status: Option<&mut dyn StatusSink>,
    ) -> bool {
        if self.last_label.as_deref() != Some(&*frame.label) {
            if let Some(sink) = status {
                sink.show(&frame.label);
            }
            self.last_label = Some(frame.label.clone());
        }
        match renderer.apply(frame) {
            Ok(()) => true,
            Err(e) => {
                self.record(e);
                false
            }
        }
    }

    /// `tick` followed by `present`.
    pub fn step(
        &mut self,
        dt: f32,
        source: Option<&mut dyn AmplitudeSource>,
        renderer: &mut dyn RendererAdapter,
        status: Option<&mut dyn StatusSink>,
    ) -> HudFrame {
        let frame = self.tick(dt, source);
        self.present(&frame, renderer, status);
        frame
    }

    pub fn intensity_config(&self) -> IntensityConfig {
        let bundle = self.controller.current_blend(&self.registry);
        let intensity = self.modulators.intensity();
        IntensityConfig {
            global: intensity.current(),
            target: intensity.target(),
            bloom_strength: bundle.bloom_strength * intensity.current(),
            bloom_radius: bundle.bloom_radius,
            sphere_glow: bundle.sphere_intensity,
            state: self.target_state().to_string(),
        }
    }

    fn record(&mut self, err: HudError) -> HudError {
        self.diagnostics.record(err.clone());
        err
    }
}
