use crate::constants::ANALYSER_FFT_SIZE;
use hud_core::{amplitude_from_spectrum, AmplitudeSource};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Bass level of the microphone, read through an `AnalyserNode`.
///
/// Until the user grants microphone access the source reports `None`, so the
/// engine keeps using its simulated signal.
pub struct WebAmplitude {
    analyser: web::AnalyserNode,
    bins: Vec<u8>,
    connected: Rc<Cell<bool>>,
}

impl WebAmplitude {
    pub fn is_connected(&self) -> bool {
        self.connected.get()
    }
}

impl AmplitudeSource for WebAmplitude {
    fn sample(&mut self, _time: f32) -> Option<f32> {
        if !self.connected.get() {
            return None;
        }
        self.analyser.get_byte_frequency_data(&mut self.bins);
        amplitude_from_spectrum(&self.bins)
    }
}

/// Creates the analyser and asks for the microphone in the background.
pub fn open_microphone(audio_ctx: &web::AudioContext) -> Option<WebAmplitude> {
    let analyser = match audio_ctx.create_analyser() {
        Ok(a) => a,
        Err(e) => {
            log::warn!("[audio] AnalyserNode error: {:?}", e);
            return None;
        }
    };
    analyser.set_fft_size(ANALYSER_FFT_SIZE);
    let bins = vec![0u8; analyser.frequency_bin_count() as usize];
    let connected = Rc::new(Cell::new(false));

    let ctx = audio_ctx.clone();
    let target = analyser.clone();
    let flag = connected.clone();
    spawn_local(async move {
        match connect_microphone(&ctx, &target).await {
            Ok(()) => {
                flag.set(true);
                log::info!("[audio] microphone connected");
            }
            Err(e) => log::info!("[audio] microphone unavailable, using simulation: {:?}", e),
        }
    });

    Some(WebAmplitude {
        analyser,
        bins,
        connected,
    })
}

async fn connect_microphone(
    audio_ctx: &web::AudioContext,
    analyser: &web::AnalyserNode,
) -> Result<(), JsValue> {
    let window = web::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let devices = window.navigator().media_devices()?;
    let constraints = web::MediaStreamConstraints::new();
    constraints.set_audio(&JsValue::TRUE);
    let promise = devices.get_user_media_with_constraints(&constraints)?;
    let stream: web::MediaStream = JsFuture::from(promise).await?.dyn_into()?;
    let source = audio_ctx.create_media_stream_source(&stream)?;
    source.connect_with_audio_node(analyser)?;
    Ok(())
}
