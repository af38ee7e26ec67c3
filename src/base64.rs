//! Incremental base64 decoder.
//!
//! Synthesized speech arrives from the network as base64 text split at
//! arbitrary byte boundaries, so chunks rarely end on a 4-character group.
//! The decoder carries at most three leftover characters between calls and
//! decodes everything else straight out of the caller's input slice, so
//! throughput does not depend on chunk alignment.

use base64::engine::general_purpose::STANDARD;
use base64::{DecodeSliceError, Engine};

use crate::error::Error;

/// Streaming base64 decoder.
///
/// `decode` accepts input of any length; `finish` flushes a trailing
/// partial group once the stream ends. A malformed stream poisons the
/// instance: every later call fails until a fresh decoder is built.
#[derive(Debug, Clone)]
pub struct StreamingDecoder {
    /// Leftover characters of an incomplete 4-character group.
    pending: [u8; 4],
    pending_len: u8,
    started: bool,
    failed: bool,
}

impl StreamingDecoder {
    pub fn new() -> Self {
        Self {
            pending: [0; 4],
            pending_len: 0,
            started: false,
            failed: false,
        }
    }

    /// True once any input has been accepted. Lets a session distinguish
    /// "no speech arrived" from "empty speech".
    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Decode the complete groups available so far into `out`, stashing up
    /// to three trailing characters for the next call. Returns the number
    /// of bytes written.
    ///
    /// [`Error::Capacity`] is returned before any state changes, so the
    /// same input may be retried with a larger buffer. [`Error::Decode`]
    /// poisons the decoder.
    pub fn decode(&mut self, input: &[u8], out: &mut [u8]) -> Result<usize, Error> {
        if self.failed {
            return Err(Error::Decode("decoder poisoned by earlier failure"));
        }

        let total = self.pending_len as usize + input.len();
        let groups = total / 4;

        // Worst case each group yields 3 bytes. Checked up front so a
        // short buffer leaves pending state untouched.
        let needed = groups * 3;
        if out.len() < needed {
            return Err(Error::Capacity {
                needed,
                available: out.len(),
            });
        }

        if !input.is_empty() {
            self.started = true;
        }

        if total < 4 {
            self.pending[self.pending_len as usize..total].copy_from_slice(input);
            self.pending_len = total as u8;
            return Ok(0);
        }

        let mut written = 0;

        // Complete the carried group from the head of this input.
        let mut consumed = 0;
        if self.pending_len > 0 {
            let take = 4 - self.pending_len as usize;
            let mut group = self.pending;
            group[self.pending_len as usize..].copy_from_slice(&input[..take]);
            consumed = take;
            self.pending_len = 0;

            written += self.decode_groups(&group, out)?;
        }

        // Decode the aligned region straight from the input slice.
        let rest = &input[consumed..];
        let aligned = rest.len() / 4 * 4;
        if aligned > 0 {
            written += self.decode_groups(&rest[..aligned], &mut out[written..])?;
        }

        // Stash the tail.
        let tail = &rest[aligned..];
        self.pending[..tail.len()].copy_from_slice(tail);
        self.pending_len = tail.len() as u8;

        Ok(written)
    }

    /// Flush a trailing partial group by padding it out, returning the
    /// final decoded bytes. A single leftover character cannot encode a
    /// byte and fails the stream. Calling `finish` again after success
    /// returns `Ok(0)`.
    pub fn finish(&mut self, out: &mut [u8]) -> Result<usize, Error> {
        if self.failed {
            return Err(Error::Decode("decoder poisoned by earlier failure"));
        }
        match self.pending_len {
            0 => Ok(0),
            1 => {
                self.failed = true;
                Err(Error::Decode("stream ended inside a base64 group"))
            }
            _ => {
                let mut group = [b'='; 4];
                group[..self.pending_len as usize]
                    .copy_from_slice(&self.pending[..self.pending_len as usize]);

                // Decode into a scratch first: the final group may yield
                // fewer bytes than the engine's conservative estimate.
                let mut scratch = [0u8; 3];
                let n = match STANDARD.decode_slice(group, &mut scratch) {
                    Ok(n) => n,
                    Err(_) => {
                        self.failed = true;
                        return Err(Error::Decode("invalid trailing base64 group"));
                    }
                };
                if out.len() < n {
                    return Err(Error::Capacity {
                        needed: n,
                        available: out.len(),
                    });
                }
                out[..n].copy_from_slice(&scratch[..n]);
                self.pending_len = 0;
                Ok(n)
            }
        }
    }

    fn decode_groups(&mut self, groups: &[u8], out: &mut [u8]) -> Result<usize, Error> {
        match STANDARD.decode_slice(groups, out) {
            Ok(n) => Ok(n),
            Err(DecodeSliceError::OutputSliceTooSmall) => Err(Error::Capacity {
                needed: groups.len() / 4 * 3,
                available: out.len(),
            }),
            Err(DecodeSliceError::DecodeError(_)) => {
                self.failed = true;
                Err(Error::Decode("invalid base64 input"))
            }
        }
    }
}

impl Default for StreamingDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed `encoded` to a fresh decoder in `chunk`-sized slices and
    /// return the total decoded length in `out`.
    fn decode_chunked(encoded: &[u8], chunk: usize, out: &mut [u8]) -> usize {
        let mut dec = StreamingDecoder::new();
        let mut total = 0;
        for piece in encoded.chunks(chunk) {
            total += dec.decode(piece, &mut out[total..]).unwrap();
        }
        total += dec.finish(&mut out[total..]).unwrap();
        total
    }

    #[test]
    fn chunk_boundaries_do_not_change_output() {
        let payload = b"16-bit PCM audio does not align to base64 groups";
        let mut encoded = [0u8; 128];
        let enc_len = STANDARD.encode_slice(payload, &mut encoded).unwrap();

        for chunk in [1, 2, 3, 5, 7, enc_len] {
            let mut out = [0u8; 128];
            let n = decode_chunked(&encoded[..enc_len], chunk, &mut out);
            assert_eq!(&out[..n], payload, "chunk size {}", chunk);
        }
    }

    #[test]
    fn padded_stream_decodes_in_one_shot() {
        let mut dec = StreamingDecoder::new();
        let mut out = [0u8; 16];
        let n = dec.decode(b"SGVsbG8=", &mut out).unwrap();
        let n2 = dec.finish(&mut out[n..]).unwrap();
        assert_eq!(n + n2, 5);
        assert_eq!(&out[..5], b"Hello");
    }

    #[test]
    fn finish_flushes_two_and_three_leftovers() {
        // "TQ" -> "M" (1 byte), "TWE" -> "Ma" (2 bytes)
        let mut dec = StreamingDecoder::new();
        let mut out = [0u8; 8];
        assert_eq!(dec.decode(b"TQ", &mut out).unwrap(), 0);
        assert_eq!(dec.finish(&mut out).unwrap(), 1);
        assert_eq!(out[0], b'M');

        let mut dec = StreamingDecoder::new();
        assert_eq!(dec.decode(b"TWE", &mut out).unwrap(), 0);
        assert_eq!(dec.finish(&mut out).unwrap(), 2);
        assert_eq!(&out[..2], b"Ma");
    }

    #[test]
    fn single_leftover_fails_the_stream() {
        let mut dec = StreamingDecoder::new();
        let mut out = [0u8; 8];
        assert_eq!(dec.decode(b"TWFuT", &mut out).unwrap(), 3);
        assert!(matches!(dec.finish(&mut out), Err(Error::Decode(_))));
        // Poisoned from here on.
        assert!(matches!(dec.decode(b"TWFu", &mut out), Err(Error::Decode(_))));
    }

    #[test]
    fn finish_after_finish_is_empty() {
        let mut dec = StreamingDecoder::new();
        let mut out = [0u8; 8];
        dec.decode(b"TWE", &mut out).unwrap();
        assert_eq!(dec.finish(&mut out).unwrap(), 2);
        assert_eq!(dec.finish(&mut out).unwrap(), 0);
    }

    #[test]
    fn invalid_character_poisons_the_decoder() {
        let mut dec = StreamingDecoder::new();
        let mut out = [0u8; 16];
        assert!(matches!(
            dec.decode(b"TW\nu", &mut out),
            Err(Error::Decode(_))
        ));
        assert!(matches!(dec.decode(b"TWFu", &mut out), Err(Error::Decode(_))));
        assert!(matches!(dec.finish(&mut out), Err(Error::Decode(_))));
    }

    #[test]
    fn short_output_buffer_is_retryable() {
        let mut dec = StreamingDecoder::new();
        let mut tiny = [0u8; 2];
        let err = dec.decode(b"TWFuTWFu", &mut tiny);
        assert_eq!(
            err,
            Err(Error::Capacity {
                needed: 6,
                available: 2
            })
        );
        // Same input succeeds with enough room, state untouched.
        let mut out = [0u8; 8];
        assert_eq!(dec.decode(b"TWFuTWFu", &mut out).unwrap(), 6);
        assert_eq!(&out[..6], b"ManMan");
    }

    #[test]
    fn started_flag_tracks_first_input() {
        let mut dec = StreamingDecoder::new();
        let mut out = [0u8; 8];
        assert!(!dec.has_started());
        dec.decode(b"", &mut out).unwrap();
        assert!(!dec.has_started());
        dec.decode(b"T", &mut out).unwrap();
        assert!(dec.has_started());
    }
}
