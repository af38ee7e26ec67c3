/// Frames per chunk moved through the PCM writer's stack buffer.
pub const CHUNK_FRAMES: usize = 256;

/// Maximum channel count supported by the transport framing.
pub const MAX_CHANNELS: usize = 2;

/// Playback sample rate the transport is clocked to at bring-up.
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Capture sample rate used by the speech pipeline.
pub const CAPTURE_SAMPLE_RATE: u32 = 16_000;

/// Number of DMA buffers handed to the transport driver.
pub const DEFAULT_DMA_BUFFER_COUNT: u8 = 6;

/// Frames per DMA buffer.
pub const DEFAULT_DMA_BUFFER_FRAMES: u16 = 256;

/// Control-bus frequency for the codec register protocol.
pub const DEFAULT_CONTROL_FREQ_HZ: u32 = 100_000;
