//! Codec drivers.
//!
//! Each driver owns its control-bus handle and implements
//! [`AudioControl`](crate::control::AudioControl) so the device handle
//! never touches chip registers directly.

pub(crate) mod registers;

mod es8311;

pub use es8311::Es8311;
