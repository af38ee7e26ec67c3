//! Microphone frame drain.
//!
//! Capture is pull-based: the speech front-end calls [`drain`] from its
//! own task loop with a scratch buffer sized to its hop length, and the
//! sink sees frames as soon as the DMA ring has them. No frames are
//! buffered here.

use core::time::Duration;

use crate::error::Error;
use crate::transport::AudioTransport;

/// Receives captured sample frames.
pub trait FrameSink {
    fn on_frames(&mut self, samples: &[i16]);
}

impl<F: FnMut(&[i16])> FrameSink for F {
    fn on_frames(&mut self, samples: &[i16]) {
        self(samples)
    }
}

/// Pull one batch of captured samples from the transport into `scratch`
/// and forward whatever arrived to the sink. Returns the sample count,
/// which is 0 when the wait timed out with nothing captured.
pub fn drain<T, S>(
    transport: &mut T,
    sink: &mut S,
    scratch: &mut [i16],
    timeout: Duration,
) -> Result<usize, Error>
where
    T: AudioTransport,
    S: FrameSink,
{
    if scratch.is_empty() {
        return Err(Error::InvalidArgument("empty capture buffer"));
    }
    let n = transport.read(scratch, timeout)?;
    if n > 0 {
        sink.on_frames(&scratch[..n]);
    }
    Ok(n)
}
