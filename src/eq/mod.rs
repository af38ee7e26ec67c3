//! Playback equalizer.
//!
//! A fixed three-stage biquad cascade tuned to tame the small speaker
//! enclosures these boards ship with: a 90 Hz high-pass ahead of two
//! midrange cuts, followed by a -3 dB global gain to leave headroom for
//! the boosted filters' transients.
//!
//! Each channel carries its own filter state, so stereo material does not
//! smear between channels. Coefficients depend on the sample rate; the
//! writer retunes the chain whenever its stream rate changes.

mod biquad;

pub use biquad::Biquad;

use crate::constants::MAX_CHANNELS;

/// Sections in the cascade.
pub const EQ_STAGES: usize = 3;

/// High-pass corner frequency in Hz.
const HPF_FREQ: f32 = 90.0;
/// Midrange cut centers in Hz and their gains in dB.
const PEAK1_FREQ: f32 = 320.0;
const PEAK1_GAIN_DB: f32 = -4.0;
const PEAK2_FREQ: f32 = 500.0;
const PEAK2_GAIN_DB: f32 = -2.0;
/// Post-chain gain, -3 dB.
const DEFAULT_GAIN: f32 = 0.707;

/// Cascaded biquad chain with per-channel state.
#[derive(Debug, Clone)]
pub struct EqChain {
    stages: [[Biquad; EQ_STAGES]; MAX_CHANNELS],
    gain: f32,
    enabled: bool,
    sample_rate: u32,
}

fn design(sample_rate: u32) -> [Biquad; EQ_STAGES] {
    let fs = sample_rate as f32;
    [
        Biquad::high_pass(HPF_FREQ, fs, 0.7),
        Biquad::peaking(PEAK1_FREQ, fs, PEAK1_GAIN_DB, 1.0),
        Biquad::peaking(PEAK2_FREQ, fs, PEAK2_GAIN_DB, 1.0),
    ]
}

impl EqChain {
    /// Build an enabled chain tuned for `sample_rate`.
    pub fn new(sample_rate: u32) -> Self {
        let stages = design(sample_rate);
        Self {
            stages: [stages; MAX_CHANNELS],
            gain: DEFAULT_GAIN,
            enabled: true,
            sample_rate,
        }
    }

    /// Run one sample through the chain for `channel`.
    ///
    /// When disabled this is a true bypass: the input comes back
    /// bit-identical and no filter state moves.
    #[inline]
    pub fn process(&mut self, channel: usize, sample: f32) -> f32 {
        if !self.enabled {
            return sample;
        }
        debug_assert!(channel < MAX_CHANNELS);
        let mut x = sample;
        for stage in self.stages[channel].iter_mut() {
            x = stage.process(x);
        }
        x * self.gain
    }

    /// Clear all delay lines without touching the tuning. Called at the
    /// start of every playback session so one stream's tail never rings
    /// into the next.
    pub fn reset(&mut self) {
        for channel in self.stages.iter_mut() {
            for stage in channel.iter_mut() {
                stage.reset();
            }
        }
    }

    /// Recompute coefficients for a new sample rate and clear the state.
    /// No-op when the rate is unchanged.
    pub fn retune(&mut self, sample_rate: u32) {
        if sample_rate == self.sample_rate {
            return;
        }
        let stages = design(sample_rate);
        self.stages = [stages; MAX_CHANNELS];
        self.sample_rate = sample_rate;
        log::debug!("eq retuned for {} Hz", sample_rate);
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Override the post-chain gain (1.0 = unity).
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_in_is_silence_out() {
        let mut eq = EqChain::new(48_000);
        for _ in 0..64 {
            assert_eq!(eq.process(0, 0.0), 0.0);
        }
    }

    #[test]
    fn bypass_is_exact() {
        let mut eq = EqChain::new(48_000);
        eq.set_enabled(false);
        for i in 0..32 {
            let x = (i as f32) * 0.371 - 4.0;
            assert_eq!(eq.process(0, x).to_bits(), x.to_bits());
        }
        // No state moved while bypassed
        eq.set_enabled(true);
        let mut fresh = EqChain::new(48_000);
        assert_eq!(eq.process(0, 1.0).to_bits(), fresh.process(0, 1.0).to_bits());
    }

    #[test]
    fn reset_makes_processing_deterministic() {
        let mut eq = EqChain::new(48_000);
        let mut first = [0.0f32; 32];
        for (i, y) in first.iter_mut().enumerate() {
            *y = eq.process(0, (i as f32 * 0.1).min(1.0));
        }
        eq.reset();
        for (i, y) in first.iter().enumerate() {
            let again = eq.process(0, (i as f32 * 0.1).min(1.0));
            assert_eq!(again.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn channels_keep_independent_state() {
        let mut eq = EqChain::new(48_000);
        // Drive channel 0 hard, leave channel 1 untouched.
        for _ in 0..64 {
            eq.process(0, 1.0);
        }
        let mut fresh = EqChain::new(48_000);
        assert_eq!(eq.process(1, 0.5).to_bits(), fresh.process(1, 0.5).to_bits());
    }

    #[test]
    fn retune_changes_rate_and_clears_state() {
        let mut eq = EqChain::new(48_000);
        eq.process(0, 1.0);
        eq.retune(24_000);
        assert_eq!(eq.sample_rate(), 24_000);

        let mut fresh = EqChain::new(24_000);
        assert_eq!(eq.process(0, 1.0).to_bits(), fresh.process(0, 1.0).to_bits());
    }

    #[test]
    fn retune_to_same_rate_keeps_state() {
        let mut eq = EqChain::new(48_000);
        let mut twin = EqChain::new(48_000);
        eq.process(0, 1.0);
        twin.process(0, 1.0);
        eq.retune(48_000);
        assert_eq!(eq.process(0, 0.5).to_bits(), twin.process(0, 0.5).to_bits());
    }
}
