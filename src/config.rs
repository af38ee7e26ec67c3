//! Board descriptors and device configuration.
//!
//! Board differences are data, not compile-time branches: a
//! [`BoardDescriptor`] carries transport identifiers, pin roles and
//! capability flags, and a [`DeviceConfig`] wraps one together with the
//! audio parameters the pipeline is brought up with. Presets are provided
//! for the two reference boards.

use crate::constants::{
    CAPTURE_SAMPLE_RATE, DEFAULT_CONTROL_FREQ_HZ, DEFAULT_DMA_BUFFER_COUNT,
    DEFAULT_DMA_BUFFER_FRAMES, DEFAULT_SAMPLE_RATE,
};

/// GPIO assignments for the serial audio transport and control bus.
///
/// `None` marks a role the board does not wire up (e.g. no dedicated MCLK).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinRoles {
    /// Master clock out to the codec.
    pub mclk: Option<u8>,
    /// Bit clock.
    pub bclk: u8,
    /// Frame sync / word select.
    pub lrclk: u8,
    /// Sample data out (speaker path).
    pub dout: u8,
    /// Sample data in (microphone path).
    pub din: Option<u8>,
    /// Control-bus data line.
    pub sda: u8,
    /// Control-bus clock line.
    pub scl: u8,
    /// External amplifier gate line, if the board has one.
    pub amp_enable: Option<u8>,
}

/// What the board hardware can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// A microphone is wired to the capture transport.
    pub has_microphone: bool,
    /// Capture shares pins with the playback transport (no concurrent use).
    pub shared_pins: bool,
    /// Independent transports allow record + playback at the same time.
    pub simultaneous_capture_playback: bool,
}

/// Everything the pipeline needs to know about one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardDescriptor {
    /// Human-readable board name, for logs only.
    pub name: &'static str,
    /// Playback transport peripheral index.
    pub transport_id: u8,
    /// Capture transport peripheral index.
    pub capture_transport_id: u8,
    pub pins: PinRoles,
    pub capabilities: Capabilities,
}

/// Immutable device configuration, fixed once passed to `init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig {
    pub board: BoardDescriptor,
    /// Sample rate the transport clock starts at.
    pub default_sample_rate: u32,
    /// Sample width in bits. The pipeline handles 16 only.
    pub bits_per_sample: u8,
    /// Transport channel count, fixed at configuration time.
    pub channels: u8,
    /// 7-bit codec address on the control bus.
    pub control_address: u8,
    /// Control-bus clock frequency in Hz.
    pub control_freq_hz: u32,
    /// `true` if the codec receives an external master clock; `false` if it
    /// synthesizes one from the bit clock.
    pub use_mclk: bool,
    pub dma_buffer_count: u8,
    pub dma_buffer_frames: u16,
    /// Initial playback volume, 0-100.
    pub volume: u8,
}

/// 7-bit control-bus address of the ES8311 with AD0 low.
pub const ES8311_ADDRESS: u8 = 0x18;

impl DeviceConfig {
    /// Preset for the M5 Atom Echo Base (ESP32-PICO-D4, ES8311, full-duplex
    /// transport on shared pins).
    pub const fn m5_echo_base() -> Self {
        DeviceConfig {
            board: BoardDescriptor {
                name: "M5 Atom Echo Base",
                transport_id: 0,
                capture_transport_id: 1,
                pins: PinRoles {
                    mclk: Some(0),
                    bclk: 23,
                    lrclk: 33,
                    dout: 22,
                    din: Some(23),
                    sda: 19,
                    scl: 33,
                    amp_enable: None,
                },
                capabilities: Capabilities {
                    has_microphone: true,
                    shared_pins: true,
                    simultaneous_capture_playback: false,
                },
            },
            default_sample_rate: DEFAULT_SAMPLE_RATE,
            bits_per_sample: 16,
            channels: 2,
            control_address: ES8311_ADDRESS,
            control_freq_hz: DEFAULT_CONTROL_FREQ_HZ,
            use_mclk: false,
            dma_buffer_count: DEFAULT_DMA_BUFFER_COUNT,
            dma_buffer_frames: DEFAULT_DMA_BUFFER_FRAMES,
            volume: 70,
        }
    }

    /// Preset for the Korvo1 (ESP32-S3, ES8311, independent PDM capture
    /// transport, amplifier gate on GPIO 38).
    pub const fn korvo1() -> Self {
        DeviceConfig {
            board: BoardDescriptor {
                name: "Korvo1",
                transport_id: 0,
                capture_transport_id: 1,
                pins: PinRoles {
                    mclk: Some(42),
                    bclk: 40,
                    lrclk: 41,
                    dout: 39,
                    din: Some(35),
                    sda: 1,
                    scl: 2,
                    amp_enable: Some(38),
                },
                capabilities: Capabilities {
                    has_microphone: true,
                    shared_pins: false,
                    simultaneous_capture_playback: true,
                },
            },
            default_sample_rate: DEFAULT_SAMPLE_RATE,
            bits_per_sample: 16,
            channels: 2,
            control_address: ES8311_ADDRESS,
            control_freq_hz: DEFAULT_CONTROL_FREQ_HZ,
            use_mclk: false,
            dma_buffer_count: DEFAULT_DMA_BUFFER_COUNT,
            dma_buffer_frames: DEFAULT_DMA_BUFFER_FRAMES,
            volume: 70,
        }
    }

    /// Capture rate used by the speech front-end on both reference boards.
    pub const fn capture_sample_rate(&self) -> u32 {
        CAPTURE_SAMPLE_RATE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_self_consistent() {
        for cfg in [DeviceConfig::m5_echo_base(), DeviceConfig::korvo1()] {
            assert_eq!(cfg.control_address, ES8311_ADDRESS);
            assert_eq!(cfg.bits_per_sample, 16);
            assert!(cfg.channels >= 1 && cfg.channels <= 2);
            assert!(cfg.board.capabilities.has_microphone);
            assert!(cfg.dma_buffer_count > 0);
            assert!(cfg.dma_buffer_frames > 0);
        }
    }

    #[test]
    fn shared_pin_board_forbids_simultaneous_io() {
        let cfg = DeviceConfig::m5_echo_base();
        assert!(cfg.board.capabilities.shared_pins);
        assert!(!cfg.board.capabilities.simultaneous_capture_playback);

        let cfg = DeviceConfig::korvo1();
        assert!(!cfg.board.capabilities.shared_pins);
        assert!(cfg.board.capabilities.simultaneous_capture_playback);
    }
}
