use crate::error::Error;

/// Trait for audio components that support runtime control (e.g. codec
/// chips). The device handle drives its codec exclusively through this
/// seam, so bring-up is testable against a mock.
pub trait AudioControl {
    /// Bring the component up. Must be idempotent: a second call while
    /// already enabled is a no-op success.
    fn enable(&mut self) -> Result<(), Error>;

    /// Tear the component down. Idempotent.
    fn disable(&mut self) -> Result<(), Error>;

    /// Set the output volume (0 = silent, 100 = full scale).
    fn set_volume(&mut self, volume: u8) -> Result<(), Error>;

    /// Read the output volume back in the same 0-100 scale, rounded to the
    /// nearest step the hardware can represent.
    fn volume(&mut self) -> Result<u8, Error>;
}
