//! Serial audio transport contract.
//!
//! The transport is an I2S-class peripheral: synchronous, frame-clocked,
//! DMA-backed, moving interleaved signed 16-bit samples (little-endian on
//! the wire) through a fixed number of fixed-length DMA buffers. Buffer
//! count and length are configuration parameters, never negotiated at
//! runtime.
//!
//! Blocking is expressed as a plain [`Duration`] so implementations are
//! free to park on an RTOS primitive, a condition variable or a busy-wait
//! -- the writer never assumes a particular tick API.

use core::time::Duration;

use crate::error::Error;

/// Transport clock and framing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    /// Sample clock in Hz.
    pub sample_rate: u32,
    /// Sample width in bits (16 for this pipeline).
    pub bits_per_sample: u8,
    /// Interleaved channels per frame. Fixed once configured.
    pub channels: u8,
    /// Number of DMA buffers.
    pub dma_buffer_count: u8,
    /// Frames per DMA buffer.
    pub dma_buffer_frames: u16,
}

/// DMA-backed, fixed-frame sample transport.
///
/// One exclusive owner per instance; implementations keep no internal
/// locking and callers must serialize access externally.
pub trait AudioTransport {
    /// Install the driver with the given clock and framing. Called once at
    /// device bring-up.
    fn configure(&mut self, config: &TransportConfig) -> Result<(), Error>;

    /// Reclock the sample rate without touching framing. The writer calls
    /// this exactly once per rate switch.
    fn set_sample_rate(&mut self, sample_rate: u32) -> Result<(), Error>;

    /// Push interleaved samples toward the DMA buffers, blocking up to
    /// `timeout` for room.
    ///
    /// Returns the number of samples accepted, which may be less than
    /// `samples.len()`. `Ok(0)` means the DMA buffers were full for the
    /// whole wait -- the caller retries, it is not an error.
    fn write(&mut self, samples: &[i16], timeout: Duration) -> Result<usize, Error>;

    /// Pull captured samples out of the DMA buffers, blocking up to
    /// `timeout` for data. Returns the number of samples read.
    fn read(&mut self, samples: &mut [i16], timeout: Duration) -> Result<usize, Error>;

    /// Uninstall the driver. Idempotent.
    fn stop(&mut self) -> Result<(), Error>;
}
