//! Second-order IIR filter section.

use core::f32::consts::PI;

use libm::{cosf, powf, sinf};

/// One biquad section in transposed direct form II. Two words of state,
/// five coefficients, already normalized by `a0`.
#[derive(Debug, Clone, Copy)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    z1: f32,
    z2: f32,
}

impl Biquad {
    /// Build a section from normalized coefficients.
    pub fn new(b0: f32, b1: f32, b2: f32, a1: f32, a2: f32) -> Self {
        Self {
            b0,
            b1,
            b2,
            a1,
            a2,
            z1: 0.0,
            z2: 0.0,
        }
    }

    /// Second-order Butterworth-style high-pass at `fc` Hz for sample rate
    /// `fs`, with quality factor `q`.
    pub fn high_pass(fc: f32, fs: f32, q: f32) -> Self {
        let w = 2.0 * PI * fc / fs;
        let cos_w = cosf(w);
        let alpha = sinf(w) / (2.0 * q);

        let a0 = 1.0 + alpha;
        Self::new(
            ((1.0 + cos_w) / 2.0) / a0,
            (-(1.0 + cos_w)) / a0,
            ((1.0 + cos_w) / 2.0) / a0,
            (-2.0 * cos_w) / a0,
            (1.0 - alpha) / a0,
        )
    }

    /// Peaking equalizer at `fc` Hz with `gain_db` of boost (negative for
    /// cut) and bandwidth set by `q`.
    pub fn peaking(fc: f32, fs: f32, gain_db: f32, q: f32) -> Self {
        let w = 2.0 * PI * fc / fs;
        let cos_w = cosf(w);
        let a = powf(10.0, gain_db / 40.0);
        let alpha = sinf(w) / (2.0 * q);

        let a0 = 1.0 + alpha / a;
        Self::new(
            (1.0 + alpha * a) / a0,
            (-2.0 * cos_w) / a0,
            (1.0 - alpha * a) / a0,
            (-2.0 * cos_w) / a0,
            (1.0 - alpha / a) / a0,
        )
    }

    /// Clear the delay line, keeping the coefficients.
    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }

    /// Run one sample through the section.
    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.z1;
        self.z1 = self.b1 * x - self.a1 * y + self.z2;
        self.z2 = self.b2 * x - self.a2 * y;
        y
    }
}
