use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decoded, mono PCM audio. A zero sample rate means "no audio": the decoder
/// never fails hard, it degrades to this empty state instead.
#[derive(Clone, Debug, PartialEq)]
pub struct PcmAudio {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub channel_count: u16,
}

impl PcmAudio {
    pub fn empty() -> Self {
        Self {
            samples: Vec::new(),
            sample_rate: 0,
            channel_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sample_rate == 0 || self.samples.is_empty()
    }

    /// Whole seconds of audio, truncating.
    pub fn duration_seconds(&self) -> u32 {
        if self.sample_rate == 0 {
            return 0;
        }
        (self.samples.len() as u64 / self.sample_rate as u64) as u32
    }
}

pub fn decode_path(path: &Path) -> std::io::Result<PcmAudio> {
    let file = std::fs::File::open(path)?;
    Ok(decode(file))
}

/// Decode an MP3 byte stream to mono PCM.
///
/// Malformed packets are skipped; any unrecoverable stream error (including a
/// stream that is not MP3 at all) yields `PcmAudio::empty()` rather than an
/// error. Callers treat a zero sample rate as "no audio".
pub fn decode(source: impl MediaSource + 'static) -> PcmAudio {
    let mss = MediaSourceStream::new(Box::new(source), Default::default());

    let mut hint = Hint::new();
    hint.with_extension("mp3");

    let probed = match symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    ) {
        Ok(probed) => probed,
        Err(err) => {
            log::warn!("Failed to probe audio stream: {}", err);
            return PcmAudio::empty();
        }
    };

    let mut format = probed.format;

    let track = match format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
    {
        Some(track) => track,
        None => {
            log::warn!("No audio tracks found in stream");
            return PcmAudio::empty();
        }
    };

    let track_id = track.id;
    let channels = track.codec_params.channels.map_or(1, |c| c.count());
    let sample_rate = match track.codec_params.sample_rate {
        Some(rate) => rate,
        None => {
            log::warn!("Audio track has no sample rate");
            return PcmAudio::empty();
        }
    };

    let mut decoder = match symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
    {
        Ok(decoder) => decoder,
        Err(err) => {
            log::warn!("Failed to create audio decoder: {}", err);
            return PcmAudio::empty();
        }
    };

    let mut samples: Vec<i16> = Vec::new();
    let mut skipped = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(err) => {
                log::warn!("Unrecoverable stream error: {}", err);
                return PcmAudio::empty();
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            // A corrupt frame must not abort the whole decode.
            Err(symphonia::core::errors::Error::DecodeError(_)) => {
                skipped += 1;
                continue;
            }
            Err(err) => {
                log::warn!("Unrecoverable decode error: {}", err);
                return PcmAudio::empty();
            }
        };

        let spec = *decoded.spec();
        let num_frames = decoded.frames();

        let mut sample_buf = SampleBuffer::<i16>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);

        downmix_interleaved(sample_buf.samples(), channels, &mut samples);
    }

    if skipped > 0 {
        log::warn!("Skipped {} malformed MP3 frames", skipped);
    }

    log::info!(
        "Decoded audio: {} samples, {}Hz, {} channel(s), {:.1}s",
        samples.len(),
        sample_rate,
        channels,
        samples.len() as f32 / sample_rate as f32
    );

    PcmAudio {
        samples,
        sample_rate,
        channel_count: channels as u16,
    }
}

/// Average interleaved channels into mono, truncating toward zero. A trailing
/// partial inter-channel frame is dropped.
fn downmix_interleaved(interleaved: &[i16], channels: usize, out: &mut Vec<i16>) {
    if channels <= 1 {
        out.extend_from_slice(interleaved);
        return;
    }
    for frame in interleaved.chunks_exact(channels) {
        let sum: i32 = frame.iter().map(|&s| s as i32).sum();
        out.push((sum / channels as i32) as i16);
    }
}
