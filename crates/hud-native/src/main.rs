use std::path::PathBuf;
use std::time::Instant;

use hud_core::constants::{INTENSITY_MAX, INTENSITY_MIN};
use hud_core::{
    AmplitudeSource, CommandSender, DriverEffect, HudConfig, HudEngine, PresenceDriver,
    Preset, SharedAmplitude, StatusSink,
};
use winit::{
    event::*,
    event_loop::{EventLoop, EventLoopWindowTarget},
    window::{Window, WindowBuilder},
};

mod audio;
mod keys;
mod render;
mod speech;

use keys::{action_for_key, Action};
use render::GpuState;
use speech::SimulatedSpeech;

#[derive(Debug)]
struct Args {
    preset: Preset,
    config: Option<PathBuf>,
    speech: bool,
    microphone: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Args> {
    let mut out = Args {
        preset: Preset::Assistant,
        config: None,
        speech: true,
        microphone: true,
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--preset" => {
                let name = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--preset needs a value"))?;
                out.preset = name.parse::<Preset>().map_err(anyhow::Error::msg)?;
            }
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config needs a path"))?;
                out.config = Some(PathBuf::from(path));
            }
            "--no-speech" => out.speech = false,
            "--no-mic" => out.microphone = false,
            other => anyhow::bail!("unknown argument {other:?}"),
        }
    }
    Ok(out)
}

/// Mirrors the state label into the window title.
struct TitleSink<'w>(&'w Window);

impl StatusSink for TitleSink<'_> {
    fn show(&mut self, label: &str) {
        self.0.set_title(&format!("HUD - {label}"));
    }
}

/// Everything the frame loop drives besides the GPU.
struct Session {
    engine: HudEngine,
    commands: CommandSender,
    driver: PresenceDriver,
    speech: SimulatedSpeech,
    effects: Vec<DriverEffect>,
    mic: Option<(SharedAmplitude, cpal::Stream)>,
}

impl Session {
    fn new(config: &HudConfig, args: &Args) -> anyhow::Result<Self> {
        let engine = HudEngine::new(config)?;
        let commands = engine.command_sender();
        let mic = if args.microphone {
            let level = SharedAmplitude::new();
            audio::start_microphone(level.clone()).map(|stream| (level, stream))
        } else {
            None
        };
        if mic.is_none() {
            log::info!("[audio] using simulated amplitude");
        }
        Ok(Self {
            engine,
            commands,
            driver: PresenceDriver::new(config.presence.clone()),
            speech: SimulatedSpeech::new(args.speech),
            effects: Vec::new(),
            mic,
        })
    }

    fn on_action(&mut self, action: Action, elwt: &EventLoopWindowTarget<()>) {
        match action {
            Action::SelectState(n) => match self.engine.registry().nth(n) {
                Some(id) => {
                    let name = self.engine.registry().name(id).clone();
                    self.commands.set_state(&*name);
                }
                None => log::info!("[keys] no state #{}", n + 1),
            },
            Action::Presence(event) => {
                self.driver.handle(event, &mut self.effects);
                self.dispatch();
            }
            Action::NudgeIntensity(delta) => {
                let target = self.engine.modulators().intensity().target() + delta;
                self.commands
                    .set_intensity(target.clamp(INTENSITY_MIN, INTENSITY_MAX));
            }
            Action::CycleEasing => {
                let next = self.engine.controller().easing().next();
                self.commands.set_easing(next);
            }
            Action::Quit => elwt.exit(),
        }
    }

    /// Routes driver effects until none are left; speech outcomes feed back
    /// into the driver.
    fn dispatch(&mut self) {
        while !self.effects.is_empty() {
            let batch: Vec<DriverEffect> = self.effects.drain(..).collect();
            for effect in batch {
                match effect {
                    DriverEffect::SetState(name) => {
                        self.commands.set_state(name);
                    }
                    DriverEffect::Speak(text) => {
                        let outcome = self.speech.speak(&text);
                        self.driver.handle(outcome, &mut self.effects);
                    }
                }
            }
        }
    }

    fn frame(&mut self, dt: f32, gpu: &mut GpuState, title: &mut TitleSink) {
        if let Some(event) = self.speech.tick(dt) {
            self.driver.handle(event, &mut self.effects);
        }
        self.driver.tick(dt, &mut self.effects);
        self.dispatch();

        let source = self
            .mic
            .as_mut()
            .map(|(level, _)| level as &mut dyn AmplitudeSource);
        let frame = self.engine.tick(dt, source);
        self.engine
            .present(&frame, gpu, Some(title as &mut dyn StatusSink));
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(std::env::args().skip(1))?;
    let config = HudConfig::load_or_preset(args.config.as_deref(), args.preset)?;
    let mut session = Session::new(&config, &args)?;
    log::info!(
        "[hud] states: {}",
        session.engine.registry().names().collect::<Vec<_>>().join(", ")
    );

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("HUD")
        .build(&event_loop)?;

    let mut gpu = pollster::block_on(GpuState::new(&window))?;
    let mut title = TitleSink(&window);
    let mut last = Instant::now();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => gpu.resize(size),
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key,
                            state: ElementState::Pressed,
                            repeat: false,
                            ..
                        },
                    ..
                },
            ..
        } => {
            if let Some(action) = action_for_key(&logical_key) {
                session.on_action(action, elwt);
            }
        }
        Event::AboutToWait => {
            let now = Instant::now();
            let dt = (now - last).as_secs_f32();
            last = now;
            session.frame(dt, &mut gpu, &mut title);
            if gpu.out_of_memory() {
                log::error!("[render] out of GPU memory");
                elwt.exit();
            } else {
                gpu.window.request_redraw();
            }
        }
        _ => {}
    })?;
    Ok(())
}
