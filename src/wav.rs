//! Minimal WAV container reader.
//!
//! Reads just enough of RIFF/WAVE to stream canned prompts and sound
//! effects: the `fmt ` chunk for the stream parameters and the `data`
//! chunk for the samples. Unknown chunks (`LIST`, `fact`, cue points) are
//! skipped, honoring the even-byte chunk padding rule. Only uncompressed
//! 16-bit PCM is accepted.

use crate::error::Error;

/// Borrowed view of a parsed WAV file. `data` aliases the input buffer,
/// nothing is copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavAudio<'a> {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    /// Raw little-endian sample bytes from the `data` chunk.
    pub data: &'a [u8],
}

impl<'a> WavAudio<'a> {
    /// Frames in the data chunk.
    pub fn frame_count(&self) -> usize {
        let frame_bytes = self.channels as usize * 2;
        if frame_bytes == 0 {
            0
        } else {
            self.data.len() / frame_bytes
        }
    }
}

fn read_u32(bytes: &[u8], at: usize) -> Result<u32, Error> {
    let end = at.checked_add(4).ok_or(Error::InvalidArgument("wav truncated"))?;
    let raw = bytes
        .get(at..end)
        .ok_or(Error::InvalidArgument("wav truncated"))?;
    Ok(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

fn read_u16(bytes: &[u8], at: usize) -> Result<u16, Error> {
    let raw = bytes
        .get(at..at + 2)
        .ok_or(Error::InvalidArgument("wav truncated"))?;
    Ok(u16::from_le_bytes([raw[0], raw[1]]))
}

/// Parse a WAV image held fully in memory.
pub fn parse(bytes: &[u8]) -> Result<WavAudio<'_>, Error> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(Error::InvalidArgument("not a RIFF/WAVE file"));
    }

    let mut format: Option<(u16, u32, u16, u16)> = None;
    let mut data: Option<&[u8]> = None;

    let mut pos = 12;
    while pos + 8 <= bytes.len() {
        let id = &bytes[pos..pos + 4];
        let size = read_u32(bytes, pos + 4)? as usize;
        let body = pos + 8;
        let end = body
            .checked_add(size)
            .ok_or(Error::InvalidArgument("wav chunk overflows"))?;
        if end > bytes.len() {
            return Err(Error::InvalidArgument("wav chunk truncated"));
        }

        match id {
            b"fmt " => {
                if size < 16 {
                    return Err(Error::InvalidArgument("fmt chunk too short"));
                }
                let audio_format = read_u16(bytes, body)?;
                let channels = read_u16(bytes, body + 2)?;
                let sample_rate = read_u32(bytes, body + 4)?;
                let bits_per_sample = read_u16(bytes, body + 14)?;
                format = Some((audio_format, sample_rate, channels, bits_per_sample));
            }
            b"data" => {
                data = Some(&bytes[body..end]);
            }
            _ => {}
        }

        // Chunks are word-aligned; odd sizes carry a pad byte.
        pos = end + (size & 1);
    }

    let (audio_format, sample_rate, channels, bits_per_sample) =
        format.ok_or(Error::InvalidArgument("missing fmt chunk"))?;
    let data = data.ok_or(Error::InvalidArgument("missing data chunk"))?;

    if audio_format != 1 {
        return Err(Error::UnsupportedFormat("compressed wav"));
    }
    if bits_per_sample != 16 {
        return Err(Error::UnsupportedFormat("only 16-bit samples"));
    }
    if channels == 0 || channels > crate::constants::MAX_CHANNELS as u16 {
        return Err(Error::UnsupportedFormat("channel count"));
    }

    Ok(WavAudio {
        sample_rate,
        channels,
        bits_per_sample,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Assemble a WAV image in a fixed buffer, returning its length.
    fn build_wav(
        buf: &mut [u8],
        audio_format: u16,
        channels: u16,
        sample_rate: u32,
        bits: u16,
        samples: &[i16],
        junk_before_data: Option<usize>,
    ) -> usize {
        let mut pos = 0;
        let mut put = |bytes: &[u8], pos: &mut usize| {
            buf[*pos..*pos + bytes.len()].copy_from_slice(bytes);
            *pos += bytes.len();
        };

        put(b"RIFF", &mut pos);
        put(&0u32.to_le_bytes(), &mut pos); // riff size, patched below
        put(b"WAVE", &mut pos);

        put(b"fmt ", &mut pos);
        put(&16u32.to_le_bytes(), &mut pos);
        put(&audio_format.to_le_bytes(), &mut pos);
        put(&channels.to_le_bytes(), &mut pos);
        put(&sample_rate.to_le_bytes(), &mut pos);
        put(&(sample_rate * channels as u32 * 2).to_le_bytes(), &mut pos);
        put(&(channels * 2).to_le_bytes(), &mut pos);
        put(&bits.to_le_bytes(), &mut pos);

        if let Some(junk) = junk_before_data {
            put(b"LIST", &mut pos);
            put(&(junk as u32).to_le_bytes(), &mut pos);
            for _ in 0..junk {
                put(&[0xAA], &mut pos);
            }
            if junk & 1 == 1 {
                put(&[0x00], &mut pos); // pad byte
            }
        }

        put(b"data", &mut pos);
        put(&((samples.len() * 2) as u32).to_le_bytes(), &mut pos);
        for s in samples {
            put(&s.to_le_bytes(), &mut pos);
        }

        let riff_size = (pos - 8) as u32;
        buf[4..8].copy_from_slice(&riff_size.to_le_bytes());
        pos
    }

    #[test]
    fn parses_plain_mono_pcm() {
        let samples = [0i16, 100, -100, 32767, -32768];
        let mut buf = [0u8; 128];
        let len = build_wav(&mut buf, 1, 1, 16_000, 16, &samples, None);

        let wav = parse(&buf[..len]).unwrap();
        assert_eq!(wav.sample_rate, 16_000);
        assert_eq!(wav.channels, 1);
        assert_eq!(wav.bits_per_sample, 16);
        assert_eq!(wav.frame_count(), 5);
        assert_eq!(&wav.data[2..4], &100i16.to_le_bytes());
    }

    #[test]
    fn skips_unknown_chunks_including_odd_sizes() {
        let samples = [1i16, 2, 3];
        for junk in [4usize, 7] {
            let mut buf = [0u8; 160];
            let len = build_wav(&mut buf, 1, 2, 44_100, 16, &samples, Some(junk));
            let wav = parse(&buf[..len]).unwrap();
            assert_eq!(wav.sample_rate, 44_100);
            assert_eq!(wav.data.len(), 6);
        }
    }

    #[test]
    fn rejects_compressed_audio() {
        let mut buf = [0u8; 128];
        let len = build_wav(&mut buf, 3, 1, 16_000, 16, &[0i16; 4], None);
        assert_eq!(
            parse(&buf[..len]),
            Err(Error::UnsupportedFormat("compressed wav"))
        );
    }

    #[test]
    fn rejects_non_16_bit_samples() {
        let mut buf = [0u8; 128];
        let len = build_wav(&mut buf, 1, 1, 16_000, 8, &[0i16; 4], None);
        assert_eq!(
            parse(&buf[..len]),
            Err(Error::UnsupportedFormat("only 16-bit samples"))
        );
    }

    #[test]
    fn rejects_bad_magic() {
        assert!(matches!(
            parse(b"RIFXxxxxWAVE"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(parse(b"short"), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn rejects_truncated_data_chunk() {
        let mut buf = [0u8; 128];
        let len = build_wav(&mut buf, 1, 1, 16_000, 16, &[0i16; 8], None);
        // Drop the last 4 bytes of sample data.
        assert!(matches!(
            parse(&buf[..len - 4]),
            Err(Error::InvalidArgument(_))
        ));
    }
}
