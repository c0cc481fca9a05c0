// ---------------- Native microphone (cpal) ----------------

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use hud_core::{amplitude_from_samples, SharedAmplitude};

/// Opens the default input device and publishes block RMS into `level`.
/// Returns `None` when no microphone is usable; the HUD then falls back to
/// the simulated signal.
pub fn start_microphone(level: SharedAmplitude) -> Option<cpal::Stream> {
    let host = cpal::default_host();
    let device = host.default_input_device()?;
    let config = match device.default_input_config() {
        Ok(config) => config,
        Err(err) => {
            log::warn!("[audio] no input config: {err}");
            return None;
        }
    };
    let channels = config.channels() as usize;
    log::info!(
        "[audio] input {} @ {} Hz, {} ch, {:?}",
        device.name().unwrap_or_else(|_| "unknown".into()),
        config.sample_rate().0,
        channels,
        config.sample_format()
    );

    let err_fn = |err| log::warn!("[audio] input stream error: {err}");

    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => {
            build_stream_f32(&device, &config.into(), channels, level.clone(), err_fn)
        }
        cpal::SampleFormat::I16 => {
            build_stream_i16(&device, &config.into(), channels, level.clone(), err_fn)
        }
        cpal::SampleFormat::U16 => {
            build_stream_u16(&device, &config.into(), channels, level.clone(), err_fn)
        }
        other => {
            log::warn!("[audio] unsupported sample format {other:?}");
            return None;
        }
    };
    let stream = match stream {
        Ok(stream) => stream,
        Err(err) => {
            log::warn!("[audio] could not open microphone: {err}");
            return None;
        }
    };
    if let Err(err) = stream.play() {
        log::warn!("[audio] could not start microphone: {err}");
        level.clear();
        return None;
    }
    Some(stream)
}

/// Mono mix of one interleaved block, fed to the level cell.
fn publish(level: &SharedAmplitude, channels: usize, data: &[f32], mono: &mut Vec<f32>) {
    mono.clear();
    mono.extend(
        data.chunks(channels.max(1))
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32),
    );
    if let Some(a) = amplitude_from_samples(mono) {
        level.store(a);
    }
}

fn build_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    level: SharedAmplitude,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError> {
    let mut mono = Vec::new();
    device.build_input_stream(
        config,
        move |data: &[f32], _| publish(&level, channels, data, &mut mono),
        err_fn,
        None,
    )
}

fn build_stream_i16(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    level: SharedAmplitude,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError> {
    let mut scratch = Vec::new();
    let mut mono = Vec::new();
    device.build_input_stream(
        config,
        move |data: &[i16], _| {
            scratch.clear();
            scratch.extend(data.iter().map(|&s| s as f32 / i16::MAX as f32));
            publish(&level, channels, &scratch, &mut mono);
        },
        err_fn,
        None,
    )
}

fn build_stream_u16(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    level: SharedAmplitude,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError> {
    let mut scratch = Vec::new();
    let mut mono = Vec::new();
    device.build_input_stream(
        config,
        move |data: &[u16], _| {
            scratch.clear();
            scratch.extend(data.iter().map(|&s| (s as f32 - 32768.0) / 32768.0));
            publish(&level, channels, &scratch, &mut mono);
        },
        err_fn,
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_publishes_the_floor() {
        let level = SharedAmplitude::new();
        let mut mono = Vec::new();
        publish(&level, 2, &[0.0; 64], &mut mono);
        assert_eq!(level.load(), Some(1.0));
        assert_eq!(mono.len(), 32);
    }

    #[test]
    fn loud_stereo_block_raises_level() {
        let level = SharedAmplitude::new();
        let mut mono = Vec::new();
        let block: Vec<f32> = (0..256).map(|i| if i % 4 < 2 { 0.5 } else { -0.5 }).collect();
        publish(&level, 2, &block, &mut mono);
        let a = level.load().unwrap();
        assert!(a > 1.0 && a <= 3.0, "a={a}");
    }
}
