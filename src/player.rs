//! Rate-aware chunked PCM writer.
//!
//! The writer owns the playback transport and feeds it through a small
//! stack buffer, 256 frames at a time, so arbitrarily large clips never
//! need a heap allocation. It caches the transport's current sample rate
//! and reclocks exactly once per rate change, which is what lets 24 kHz
//! synthesized speech and 48 kHz sound effects interleave cheaply on the
//! same stream.
//!
//! Backpressure comes from the transport itself: a full DMA ring returns
//! a short or zero-length write and the writer simply tries again, so
//! playback runs at the speaker's pace no matter how fast the network
//! delivers audio.

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;

use crate::constants::{CHUNK_FRAMES, MAX_CHANNELS};
#[cfg(feature = "eq")]
use crate::eq::EqChain;
use crate::error::Error;
use crate::transport::{AudioTransport, TransportConfig};
use crate::wav;

/// Default per-write wait for DMA room.
const WRITE_TIMEOUT: Duration = Duration::from_millis(100);

/// Receives playback progress, one callback per chunk.
///
/// `progress` runs from 0.0 to 1.0; `playing` flips to `false` on the
/// final callback after the last chunk is queued. Implemented for any
/// `FnMut(f32, bool)`.
pub trait ProgressSink {
    fn on_progress(&mut self, progress: f32, playing: bool);
}

impl<F: FnMut(f32, bool)> ProgressSink for F {
    fn on_progress(&mut self, progress: f32, playing: bool) {
        self(progress, playing)
    }
}

/// Streaming PCM writer over an [`AudioTransport`].
pub struct PcmWriter<T> {
    transport: T,
    /// Rate the transport is currently clocked to; 0 until configured.
    current_rate: u32,
    /// Transport channel count, fixed at configuration.
    channels: u8,
    write_timeout: Duration,
    /// Cooperative abort flag, settable from another context via `&self`.
    abort: AtomicBool,
    #[cfg(feature = "eq")]
    eq: Option<EqChain>,
}

impl<T: AudioTransport> PcmWriter<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            current_rate: 0,
            channels: 0,
            write_timeout: WRITE_TIMEOUT,
            abort: AtomicBool::new(false),
            #[cfg(feature = "eq")]
            eq: None,
        }
    }

    /// Install the transport driver and prime the rate cache.
    pub fn configure(&mut self, config: &TransportConfig) -> Result<(), Error> {
        if config.channels == 0 || config.channels as usize > MAX_CHANNELS {
            return Err(Error::InvalidArgument("transport channel count"));
        }
        self.transport.configure(config)?;
        self.current_rate = config.sample_rate;
        self.channels = config.channels;
        Ok(())
    }

    /// Queue a buffer of interleaved frames for playback.
    ///
    /// Mono input is duplicated onto every transport channel. Blocks until
    /// the last sample is handed to the DMA ring, honoring backpressure,
    /// and unwinds with [`Error::Aborted`] between chunks if an abort was
    /// requested.
    pub fn submit(&mut self, samples: &[i16], rate: u32, channels: u8) -> Result<(), Error> {
        if samples.is_empty() {
            return Err(Error::InvalidArgument("empty sample buffer"));
        }
        if channels != 1 && channels != 2 {
            return Err(Error::InvalidArgument("channel count"));
        }
        if samples.len() % channels as usize != 0 {
            return Err(Error::InvalidArgument("partial frame in buffer"));
        }
        if self.current_rate == 0 {
            return Err(Error::InvalidState("writer not configured"));
        }
        if channels > self.channels {
            return Err(Error::UnsupportedFormat("channel downmix"));
        }
        self.ensure_rate(rate)?;

        let in_ch = channels as usize;
        let out_ch = self.channels as usize;
        let total_frames = samples.len() / in_ch;
        let mut buf = [0i16; CHUNK_FRAMES * MAX_CHANNELS];

        let mut done = 0;
        while done < total_frames {
            self.check_abort()?;
            let n = (total_frames - done).min(CHUNK_FRAMES);
            for i in 0..n {
                let frame = &samples[(done + i) * in_ch..];
                for c in 0..out_ch {
                    let s = frame[c.min(in_ch - 1)];
                    buf[i * out_ch + c] = self.shape(c, s);
                }
            }
            self.write_chunk(&buf[..n * out_ch])?;
            done += n;
        }
        Ok(())
    }

    /// Play a complete in-memory WAV clip, reporting progress per chunk.
    ///
    /// The filter chain state is cleared first so one clip's tail never
    /// rings into the next, and the stream is reclocked to the clip's rate
    /// if needed.
    pub fn play_wav<S: ProgressSink>(&mut self, bytes: &[u8], sink: &mut S) -> Result<(), Error> {
        let clip = wav::parse(bytes)?;
        if self.current_rate == 0 {
            return Err(Error::InvalidState("writer not configured"));
        }
        if clip.channels > self.channels as u16 {
            return Err(Error::UnsupportedFormat("channel downmix"));
        }

        #[cfg(feature = "eq")]
        if let Some(eq) = self.eq.as_mut() {
            eq.reset();
        }
        self.ensure_rate(clip.sample_rate)?;

        let in_ch = clip.channels as usize;
        let out_ch = self.channels as usize;
        let total_frames = clip.frame_count();
        if total_frames == 0 {
            sink.on_progress(1.0, false);
            return Ok(());
        }

        let mut buf = [0i16; CHUNK_FRAMES * MAX_CHANNELS];
        let mut done = 0;
        while done < total_frames {
            self.check_abort()?;
            let n = (total_frames - done).min(CHUNK_FRAMES);
            for i in 0..n {
                let base = (done + i) * in_ch * 2;
                for c in 0..out_ch {
                    let at = base + c.min(in_ch - 1) * 2;
                    let s = i16::from_le_bytes([clip.data[at], clip.data[at + 1]]);
                    buf[i * out_ch + c] = self.shape(c, s);
                }
            }
            self.write_chunk(&buf[..n * out_ch])?;
            done += n;
            sink.on_progress(done as f32 / total_frames as f32, true);
        }
        sink.on_progress(1.0, false);
        Ok(())
    }

    /// Ask the current playback call to unwind at its next chunk boundary.
    /// Safe to call from another context; sticky until [`clear_abort`].
    ///
    /// [`clear_abort`]: PcmWriter::clear_abort
    pub fn request_abort(&self) {
        self.abort.store(true, Ordering::Relaxed);
    }

    pub fn clear_abort(&self) {
        self.abort.store(false, Ordering::Relaxed);
    }

    pub fn set_write_timeout(&mut self, timeout: Duration) {
        self.write_timeout = timeout;
    }

    /// Rate the transport is currently clocked to.
    pub fn current_rate(&self) -> u32 {
        self.current_rate
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Install a filter chain in the playback path. It is retuned
    /// automatically on every rate switch.
    #[cfg(feature = "eq")]
    pub fn set_eq(&mut self, mut eq: EqChain) {
        if self.current_rate != 0 {
            eq.retune(self.current_rate);
        }
        self.eq = Some(eq);
    }

    #[cfg(feature = "eq")]
    pub fn clear_eq(&mut self) -> Option<EqChain> {
        self.eq.take()
    }

    #[cfg(feature = "eq")]
    pub fn eq_mut(&mut self) -> Option<&mut EqChain> {
        self.eq.as_mut()
    }

    fn check_abort(&self) -> Result<(), Error> {
        if self.abort.load(Ordering::Relaxed) {
            return Err(Error::Aborted);
        }
        Ok(())
    }

    /// Reclock the transport if `rate` differs from the cached rate. The
    /// cache only advances on success, so a failed reclock is retried by
    /// the next call.
    fn ensure_rate(&mut self, rate: u32) -> Result<(), Error> {
        if rate == 0 {
            return Err(Error::InvalidArgument("zero sample rate"));
        }
        if rate == self.current_rate {
            return Ok(());
        }
        self.transport.set_sample_rate(rate)?;
        self.current_rate = rate;
        log::info!("playback rate -> {} Hz", rate);
        #[cfg(feature = "eq")]
        if let Some(eq) = self.eq.as_mut() {
            eq.retune(rate);
        }
        Ok(())
    }

    #[cfg(feature = "eq")]
    fn shape(&mut self, channel: usize, sample: i16) -> i16 {
        match self.eq.as_mut() {
            Some(eq) => {
                let y = eq.process(channel, sample as f32);
                if y >= i16::MAX as f32 {
                    i16::MAX
                } else if y <= i16::MIN as f32 {
                    i16::MIN
                } else {
                    y as i16
                }
            }
            None => sample,
        }
    }

    #[cfg(not(feature = "eq"))]
    fn shape(&mut self, _channel: usize, sample: i16) -> i16 {
        sample
    }

    /// Push one assembled chunk through the transport, retrying zero-length
    /// writes until every sample is queued.
    fn write_chunk(&mut self, mut chunk: &[i16]) -> Result<(), Error> {
        while !chunk.is_empty() {
            let written = self.transport.write(chunk, self.write_timeout)?;
            if written == 0 {
                // DMA ring full for the whole wait.
                log::trace!("transport write accepted 0 samples, retrying");
                continue;
            }
            chunk = &chunk[written..];
        }
        Ok(())
    }
}
