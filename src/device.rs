//! Owned device handle.
//!
//! [`AudioDevice`] ties one codec and one playback transport together
//! under a single lifecycle: `init` brings the pair up atomically, the
//! playback and capture operations check the lifecycle state, and
//! `deinit` tears everything down. Both halves are trait objects in
//! spirit only: the handle is generic, so hardware and mocks share the
//! same code path.

use core::time::Duration;

use crate::capture::{self, FrameSink};
use crate::config::DeviceConfig;
use crate::control::AudioControl;
use crate::error::Error;
use crate::player::{PcmWriter, ProgressSink};
use crate::transport::{AudioTransport, TransportConfig};

/// Default wait for captured frames.
const CAPTURE_TIMEOUT: Duration = Duration::from_millis(100);

/// One audio device: codec plus playback transport plus configuration.
pub struct AudioDevice<C, T> {
    codec: C,
    writer: PcmWriter<T>,
    config: DeviceConfig,
    initialized: bool,
}

impl<C, T> AudioDevice<C, T>
where
    C: AudioControl,
    T: AudioTransport,
{
    pub fn new(codec: C, transport: T, config: DeviceConfig) -> Self {
        Self {
            codec,
            writer: PcmWriter::new(transport),
            config,
            initialized: false,
        }
    }

    fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            sample_rate: self.config.default_sample_rate,
            bits_per_sample: self.config.bits_per_sample,
            channels: self.config.channels,
            dma_buffer_count: self.config.dma_buffer_count,
            dma_buffer_frames: self.config.dma_buffer_frames,
        }
    }

    /// Bring the device up: transport first, then the codec, then the
    /// configured initial volume.
    ///
    /// Idempotent. On failure everything already started is stopped again
    /// and the device stays uninitialized, so `init` can simply be
    /// retried.
    pub fn init(&mut self) -> Result<(), Error> {
        if self.initialized {
            return Ok(());
        }
        log::info!(
            "audio init: {} at {} Hz",
            self.config.board.name,
            self.config.default_sample_rate
        );

        self.writer.configure(&self.transport_config())?;

        if let Err(e) = self.codec.enable() {
            let _ = self.writer.transport_mut().stop();
            return Err(e);
        }
        if let Err(e) = self.codec.set_volume(self.config.volume) {
            let _ = self.codec.disable();
            let _ = self.writer.transport_mut().stop();
            return Err(e);
        }

        self.initialized = true;
        Ok(())
    }

    /// Tear the device down. Idempotent; errors from the codec are
    /// reported but the transport is stopped regardless.
    pub fn deinit(&mut self) -> Result<(), Error> {
        if !self.initialized {
            return Ok(());
        }
        self.initialized = false;
        let codec_result = self.codec.disable();
        let _ = self.writer.transport_mut().stop();
        codec_result
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // ── Volume ─────────────────────────────────────────────────────────

    pub fn set_volume(&mut self, volume: u8) -> Result<(), Error> {
        self.check_initialized()?;
        self.codec.set_volume(volume)
    }

    pub fn volume(&mut self) -> Result<u8, Error> {
        self.check_initialized()?;
        self.codec.volume()
    }

    // ── Playback ───────────────────────────────────────────────────────

    /// Queue interleaved PCM for playback. See [`PcmWriter::submit`].
    pub fn submit_pcm(&mut self, samples: &[i16], rate: u32, channels: u8) -> Result<(), Error> {
        self.check_initialized()?;
        self.writer.submit(samples, rate, channels)
    }

    /// Play an in-memory WAV clip without progress reporting.
    pub fn play_wav(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.play_wav_with_progress(bytes, &mut |_p: f32, _playing: bool| {})
    }

    /// Play an in-memory WAV clip, reporting per-chunk progress.
    pub fn play_wav_with_progress<S: ProgressSink>(
        &mut self,
        bytes: &[u8],
        sink: &mut S,
    ) -> Result<(), Error> {
        self.check_initialized()?;
        self.writer.play_wav(bytes, sink)
    }

    // ── Capture ────────────────────────────────────────────────────────

    /// Pull one batch of microphone samples into `scratch`, forwarding
    /// them to `sink`. Fails on boards without a microphone.
    pub fn capture_into<S: FrameSink>(
        &mut self,
        sink: &mut S,
        scratch: &mut [i16],
    ) -> Result<usize, Error> {
        self.check_initialized()?;
        if !self.config.board.capabilities.has_microphone {
            return Err(Error::InvalidState("board has no microphone"));
        }
        capture::drain(self.writer.transport_mut(), sink, scratch, CAPTURE_TIMEOUT)
    }

    // ── Access ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn writer(&self) -> &PcmWriter<T> {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut PcmWriter<T> {
        &mut self.writer
    }

    fn check_initialized(&self) -> Result<(), Error> {
        if !self.initialized {
            return Err(Error::InvalidState("device not initialized"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;

    /// Codec mock that records lifecycle calls.
    struct MockCodec {
        enabled: bool,
        enable_calls: usize,
        disable_calls: usize,
        volume: u8,
        fail_enable: bool,
        fail_volume: bool,
    }

    impl MockCodec {
        fn new() -> Self {
            MockCodec {
                enabled: false,
                enable_calls: 0,
                disable_calls: 0,
                volume: 0,
                fail_enable: false,
                fail_volume: false,
            }
        }
    }

    impl AudioControl for MockCodec {
        fn enable(&mut self) -> Result<(), Error> {
            if self.fail_enable {
                return Err(Error::Transport("mock codec enable"));
            }
            self.enabled = true;
            self.enable_calls += 1;
            Ok(())
        }

        fn disable(&mut self) -> Result<(), Error> {
            self.enabled = false;
            self.disable_calls += 1;
            Ok(())
        }

        fn set_volume(&mut self, volume: u8) -> Result<(), Error> {
            if self.fail_volume {
                return Err(Error::Transport("mock codec volume"));
            }
            self.volume = volume;
            Ok(())
        }

        fn volume(&mut self) -> Result<u8, Error> {
            Ok(self.volume)
        }
    }

    fn make_device() -> AudioDevice<MockCodec, MockTransport> {
        AudioDevice::new(
            MockCodec::new(),
            MockTransport::new(),
            DeviceConfig::m5_echo_base(),
        )
    }

    #[test]
    fn init_brings_up_codec_and_transport() {
        let mut dev = make_device();
        dev.init().unwrap();
        assert!(dev.is_initialized());
        assert!(dev.codec.enabled);
        assert_eq!(dev.codec.volume, 70);
        assert!(dev.writer.transport_mut().config.is_some());
    }

    #[test]
    fn init_is_idempotent() {
        let mut dev = make_device();
        dev.init().unwrap();
        dev.init().unwrap();
        assert_eq!(dev.codec.enable_calls, 1);
    }

    #[test]
    fn failed_codec_enable_leaves_device_down() {
        let mut dev = make_device();
        dev.codec.fail_enable = true;
        assert!(dev.init().is_err());
        assert!(!dev.is_initialized());
        assert!(dev.writer.transport_mut().stopped);

        dev.codec.fail_enable = false;
        dev.init().unwrap();
        assert!(dev.is_initialized());
    }

    #[test]
    fn failed_initial_volume_unwinds_the_codec() {
        let mut dev = make_device();
        dev.codec.fail_volume = true;
        assert!(dev.init().is_err());
        assert!(!dev.is_initialized());
        assert!(!dev.codec.enabled);
    }

    #[test]
    fn operations_require_initialization() {
        let mut dev = make_device();
        assert!(matches!(
            dev.submit_pcm(&[0i16; 8], 48_000, 1),
            Err(Error::InvalidState(_))
        ));
        assert!(matches!(dev.set_volume(50), Err(Error::InvalidState(_))));
        let mut sink = |_: &[i16]| {};
        let mut scratch = [0i16; 16];
        assert!(matches!(
            dev.capture_into(&mut sink, &mut scratch),
            Err(Error::InvalidState(_))
        ));
    }

    #[test]
    fn deinit_is_idempotent_and_stops_both_halves() {
        let mut dev = make_device();
        dev.init().unwrap();
        dev.deinit().unwrap();
        assert!(!dev.is_initialized());
        assert!(!dev.codec.enabled);
        assert!(dev.writer.transport_mut().stopped);

        dev.deinit().unwrap();
        assert_eq!(dev.codec.disable_calls, 1);
    }

    #[test]
    fn playback_flows_through_the_writer() {
        let mut dev = make_device();
        dev.init().unwrap();
        dev.submit_pcm(&[9i16; 32], 24_000, 1).unwrap();
        assert_eq!(dev.writer.transport_mut().written_len, 64);
        assert_eq!(dev.writer.current_rate(), 24_000);
    }

    #[test]
    fn capture_requires_a_microphone() {
        let mut config = DeviceConfig::m5_echo_base();
        config.board.capabilities.has_microphone = false;
        let mut dev = AudioDevice::new(MockCodec::new(), MockTransport::new(), config);
        dev.init().unwrap();

        let mut sink = |_: &[i16]| {};
        let mut scratch = [0i16; 16];
        assert_eq!(
            dev.capture_into(&mut sink, &mut scratch),
            Err(Error::InvalidState("board has no microphone"))
        );
    }

    #[test]
    fn capture_forwards_frames() {
        let mut dev = make_device();
        dev.init().unwrap();
        dev.writer.transport_mut().capture_pattern = 7;

        let mut total = 0usize;
        let mut sink = |samples: &[i16]| total += samples.len();
        let mut scratch = [0i16; 160];
        let n = dev.capture_into(&mut sink, &mut scratch).unwrap();
        assert_eq!(n, 160);
        assert_eq!(total, 160);
    }
}
