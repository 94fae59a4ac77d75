use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::{
    audio::noise::NoiseSequence,
    foundation::error::{MezzError, MezzResult},
};

/// Write `seq` as integer PCM WAV at `path`.
pub fn write_wav(seq: &NoiseSequence, path: &Path) -> MezzResult<()> {
    let spec = WavSpec {
        channels: seq.channels,
        sample_rate: seq.sample_rate,
        bits_per_sample: seq.bit_depth.bits(),
        sample_format: SampleFormat::Int,
    };
    let io_err = |e: hound::Error| MezzError::io(format!("write wav '{}': {e}", path.display()));

    let mut writer = WavWriter::create(path, spec).map_err(io_err)?;
    for &s in &seq.samples {
        writer.write_sample(s).map_err(io_err)?;
    }
    writer.finalize().map_err(io_err)?;
    tracing::info!(
        path = %path.display(),
        frames = seq.frames(),
        channels = seq.channels,
        "wrote noise wav"
    );
    Ok(())
}
