//! # echo-audio
//!
//! A `no_std` streaming audio pipeline for small voice-assistant devices
//! built around the ES8311 codec (M5 Atom Echo Base, Korvo1 and similar
//! boards). It captures microphone audio, plays back synthesized speech
//! arriving as base64-encoded PCM from a cloud speech pipeline, and keeps
//! hard real-time backpressure from fixed-size DMA buffers without touching
//! the heap.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Config | [`config`] | Board descriptors, pin roles, capability flags |
//! | Control | [`control`] / [`codec`] | `AudioControl` trait, ES8311 register driver |
//! | Transport | [`transport`] | DMA-backed serial audio transport contract |
//! | Playback | [`player`] / [`wav`] | Rate-aware chunked PCM writer, WAV ingestion |
//! | DSP | [`eq`] | Cascaded biquad EQ chain (feature-gated) |
//! | Network | [`base64`] | Incremental base64 → PCM decoder |
//! | Capture | [`capture`] | Microphone frame drain for the inference sink |
//! | Device | [`device`] | Owned device handle tying codec + transport together |
//!
//! All hardware access goes through traits (`embedded_hal::i2c::I2c` for
//! the codec control bus, [`AudioTransport`] for the sample transport), so
//! the whole pipeline runs under `cargo test` on the host against mock
//! peripherals.
//!
//! ## Quick start
//!
//! ```ignore
//! use echo_audio::{AudioDevice, DeviceConfig, Es8311};
//!
//! let config = DeviceConfig::m5_echo_base();
//! let codec = Es8311::new(i2c, delay, Some(pa_pin), config.control_address);
//! let mut device = AudioDevice::new(codec, i2s, config);
//!
//! device.init()?;
//! device.set_volume(70)?;
//!
//! // Synthesized speech arrives as base64 chunks over the network:
//! let mut decoder = echo_audio::StreamingDecoder::new();
//! let mut pcm = [0u8; 1024];
//! while let Some(chunk) = net.next_chunk() {
//!     let n = decoder.decode(chunk, &mut pcm)?;
//!     device.submit_pcm(as_samples(&pcm[..n]), 24_000, 1)?;
//! }
//! decoder.finish(&mut pcm)?;
//! ```
//!
//! ## Audio parameters
//!
//! - **Sample format:** `i16` (signed 16-bit, little-endian on the wire)
//! - **Chunk size:** 256 frames ([`constants::CHUNK_FRAMES`])
//! - **Transport channels:** up to 2 ([`constants::MAX_CHANNELS`])
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `es8311` | yes | ES8311 codec driver and device handle (requires `embedded-hal`) |
//! | `eq` | yes | Biquad EQ chain and its hook in the PCM writer |

#![no_std]

pub mod constants;
pub mod error;
pub mod config;
pub mod control;
pub mod transport;
pub mod wav;
pub mod base64;
pub mod player;
pub mod capture;

#[cfg(feature = "es8311")]
pub mod codec;

#[cfg(feature = "es8311")]
pub mod device;

#[cfg(feature = "eq")]
pub mod eq;

pub use base64::StreamingDecoder;
pub use capture::FrameSink;
pub use config::{BoardDescriptor, Capabilities, DeviceConfig, PinRoles};
pub use control::AudioControl;
pub use error::Error;
pub use player::{PcmWriter, ProgressSink};
pub use transport::{AudioTransport, TransportConfig};

#[cfg(feature = "es8311")]
pub use codec::Es8311;

#[cfg(feature = "es8311")]
pub use device::AudioDevice;

#[cfg(feature = "eq")]
pub use eq::{Biquad, EqChain};
