//! State machine that blends between registry states over a fixed duration.
//!
//! `current` is always the last settled state. While a transition runs, the
//! emitted bundle blends from a source snapshot toward the target bundle.
//! The source is the settled bundle for a fresh transition, and the bundle
//! that was on screen at the moment of a retarget, so changing target in
//! flight never jumps.

use crate::bundle::ParameterBundle;
use crate::constants::DEFAULT_TRANSITION_SECS;
use crate::easing::Easing;
use crate::error::HudError;
use crate::interpolate::blend;
use crate::registry::{StateId, StateRegistry};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    Settled(StateId),
    Transitioning {
        from: StateId,
        to: StateId,
        progress: f32,
    },
}

/// Snapshot of the machine for inspection and display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionState {
    pub current: StateId,
    pub target: StateId,
    pub progress: f32,
    pub elapsed: f32,
}

/// Outcome of a `set_state` request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateChange {
    Unchanged,
    Started { from: StateId, to: StateId },
    Retargeted { from: StateId, to: StateId },
}

/// One tick's output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlendSample {
    pub state: TransitionState,
    pub eased: f32,
    pub bundle: ParameterBundle,
    pub settled: bool,
}

#[derive(Clone, Copy, Debug)]
struct Blend {
    source: ParameterBundle,
    elapsed: f32,
}

#[derive(Clone, Debug)]
pub struct TransitionController {
    current: StateId,
    target: StateId,
    blend: Option<Blend>,
    duration: f32,
    easing: Easing,
}

impl TransitionController {
    /// Starts settled in the registry's default state.
    pub fn new(registry: &StateRegistry, duration: f32, easing: Easing) -> Self {
        let initial = registry.default_state();
        Self {
            current: initial,
            target: initial,
            blend: None,
            duration: sanitize_duration(duration),
            easing,
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// A running transition restarts from the bundle on screen, so the new
    /// duration never moves it.
    pub fn set_duration(&mut self, registry: &StateRegistry, duration: f32) {
        let duration = sanitize_duration(duration);
        if duration != self.duration {
            self.rebase(registry);
            self.duration = duration;
        }
    }

    /// Same rebasing rule as `set_duration`.
    pub fn set_easing(&mut self, registry: &StateRegistry, easing: Easing) {
        if easing != self.easing {
            self.rebase(registry);
            self.easing = easing;
        }
    }

    /// Freezes the in-flight blend as the new source with no elapsed time.
    fn rebase(&mut self, registry: &StateRegistry) {
        if self.blend.is_some() {
            let snapshot = self.current_blend(registry);
            self.blend = Some(Blend {
                source: snapshot,
                elapsed: 0.0,
            });
        }
    }

    pub fn current(&self) -> StateId {
        self.current
    }

    pub fn target(&self) -> StateId {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        self.blend.is_none()
    }

    pub fn progress(&self) -> f32 {
        match &self.blend {
            Some(b) => (b.elapsed / self.duration).min(1.0),
            None => 1.0,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.blend {
            None => Phase::Settled(self.current),
            Some(_) => Phase::Transitioning {
                from: self.current,
                to: self.target,
                progress: self.progress(),
            },
        }
    }

    pub fn state(&self) -> TransitionState {
        TransitionState {
            current: self.current,
            target: self.target,
            progress: self.progress(),
            elapsed: self.blend.map_or(0.0, |b| b.elapsed),
        }
    }

    /// Requests a new target by name. Re-requesting the current target is a
    /// no-op and never resets progress. Unknown names leave the machine as is.
    pub fn set_state(
        &mut self,
        registry: &StateRegistry,
        name: &str,
    ) -> Result<StateChange, HudError> {
        let id = registry.resolve(name)?;
        Ok(self.set_target(registry, id))
    }

    pub fn set_target(&mut self, registry: &StateRegistry, id: StateId) -> StateChange {
        if id == self.target {
            return StateChange::Unchanged;
        }
        let previous = self.target;
        let change = match self.blend {
            None => {
                self.blend = Some(Blend {
                    source: *registry.bundle(self.current),
                    elapsed: 0.0,
                });
                log::info!(
                    "[hud] transition {} -> {}",
                    registry.name(self.current),
                    registry.name(id)
                );
                StateChange::Started {
                    from: self.current,
                    to: id,
                }
            }
            Some(_) => {
                let progress = self.progress();
                self.rebase(registry);
                log::info!(
                    "[hud] retarget {} -> {} at {:.0}%",
                    registry.name(previous),
                    registry.name(id),
                    progress * 100.0
                );
                StateChange::Retargeted {
                    from: previous,
                    to: id,
                }
            }
        };
        self.target = id;
        change
    }

    /// Advances the blend by `dt` seconds. Invalid `dt` counts as zero.
    pub fn tick(&mut self, registry: &StateRegistry, dt: f32) -> BlendSample {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        let Some(blend) = self.blend.as_mut() else {
            return self.settled_sample(registry);
        };
        blend.elapsed += dt;
        if blend.elapsed / self.duration >= 1.0 {
            self.blend = None;
            self.current = self.target;
            log::info!("[hud] settled in {}", registry.name(self.current));
            return self.settled_sample(registry);
        }
        let state = self.state();
        let eased = self.easing.apply(state.progress);
        BlendSample {
            state,
            eased,
            bundle: self.current_blend(registry),
            settled: false,
        }
    }

    /// The bundle for the current progress, without advancing time.
    pub fn current_blend(&self, registry: &StateRegistry) -> ParameterBundle {
        match &self.blend {
            None => *registry.bundle(self.current),
            Some(b) => {
                let eased = self.easing.apply((b.elapsed / self.duration).min(1.0));
                blend(&b.source, registry.bundle(self.target), eased)
            }
        }
    }

    fn settled_sample(&self, registry: &StateRegistry) -> BlendSample {
        BlendSample {
            state: self.state(),
            eased: 1.0,
            bundle: *registry.bundle(self.current),
            settled: true,
        }
    }
}

fn sanitize_duration(duration: f32) -> f32 {
    if duration.is_finite() && duration > 0.0 {
        duration
    } else {
        log::warn!(
            "[hud] invalid transition duration {duration}; using {DEFAULT_TRANSITION_SECS}s"
        );
        DEFAULT_TRANSITION_SECS
    }
}
