//! ES8311 audio codec driver.
//!
//! Mono low-power codec used on the M5 Atom Echo Base and Korvo1. The
//! driver brings the chip up for 16-bit slave-mode playback on the speaker
//! path, with the master clock either supplied externally or synthesized
//! from the bit clock.
//!
//! The driver is generic over any [`embedded_hal::i2c::I2c`],
//! [`embedded_hal::delay::DelayNs`] and (for the amplifier gate)
//! [`embedded_hal::digital::OutputPin`] implementation.
//!
//! # Example
//!
//! ```ignore
//! let mut codec = Es8311::new(i2c, delay, Some(pa_pin), ES8311_ADDRESS);
//! codec.enable()?;        // Register program + amplifier gate
//! codec.set_volume(70)?;
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;

use super::registers as reg;
use crate::control::AudioControl;
use crate::error::Error;

/// One step of a codec register program.
#[derive(Debug, Clone, Copy)]
enum RegOp {
    /// Write `value` to `reg`.
    Write(u8, u8),
    /// Read `reg`, keep the bits in `mask`, set `bits`, write back.
    Update { reg: u8, mask: u8, bits: u8 },
    /// Let the analog side settle.
    DelayMs(u32),
}

/// Register program run before the clock source is selected. Ends with a
/// chip reset into slave mode.
const BRING_UP: &[RegOp] = &[
    // First write can be lost while the chip wakes, so it is repeated.
    RegOp::Write(reg::GPIO_44, 0x08),
    RegOp::Write(reg::GPIO_44, 0x08),
    RegOp::Write(reg::CLK_MANAGER1, 0x30),
    RegOp::Write(reg::CLK_MANAGER2, 0x00),
    RegOp::Write(reg::CLK_MANAGER3, 0x10),
    RegOp::Write(reg::ADC_16, 0x24),
    RegOp::Write(reg::CLK_MANAGER4, 0x10),
    RegOp::Write(reg::CLK_MANAGER5, 0x00),
    RegOp::Write(reg::SYSTEM_0B, 0x00),
    RegOp::Write(reg::SYSTEM_0C, 0x00),
    RegOp::Write(reg::SYSTEM_10, 0x00),
    RegOp::Write(reg::SYSTEM_11, 0x80),
    RegOp::Write(reg::RESET, 0x80),
    RegOp::DelayMs(10),
];

/// Clock dividers and serial port framing, then the playback start section.
/// Runs after the clock source and pre-multiplier are programmed.
const START_UP: &[RegOp] = &[
    RegOp::Write(reg::CLK_MANAGER5, 0x00),
    RegOp::Update { reg: reg::CLK_MANAGER3, mask: 0x80, bits: 0x10 },
    RegOp::Update { reg: reg::CLK_MANAGER4, mask: 0x80, bits: 0x10 },
    RegOp::Update { reg: reg::CLK_MANAGER7, mask: 0xC0, bits: 0x00 },
    RegOp::Write(reg::CLK_MANAGER8, 0xFF),
    RegOp::Update { reg: reg::CLK_MANAGER6, mask: 0xE0, bits: 0x03 },
    // Serial data ports: I2S format, 16-bit, interface enabled (bit 6 low).
    RegOp::Update { reg: reg::SDP_IN, mask: 0xBF, bits: 0x0C },
    RegOp::Update { reg: reg::SDP_OUT, mask: 0xBF, bits: 0x0C },
    RegOp::Write(reg::ADC_17, 0xBF),
    RegOp::Write(reg::SYSTEM_0E, 0x02),
    RegOp::Write(reg::SYSTEM_12, 0x00),
    RegOp::Write(reg::SYSTEM_14, 0x1A),
    RegOp::Write(reg::SYSTEM_0D, 0x01),
    // Output path: everything off, settle, then speaker only. The
    // headphone path stays disabled (SYSTEM_10 = 0x00 from bring-up).
    RegOp::Write(reg::SYSTEM_0F, 0x00),
    RegOp::DelayMs(10),
    RegOp::Write(reg::SYSTEM_0F, 0x0C),
    RegOp::Write(reg::ADC_15, 0x40),
    RegOp::Write(reg::DAC_37, 0x08),
    RegOp::Write(reg::GP_45, 0x00),
    RegOp::Write(reg::DAC_31, 0x00),
    RegOp::Write(reg::DAC_VOLUME, 0xC0),
    RegOp::Write(reg::SYSTEM_13, 0x30),
    RegOp::Write(reg::ADC_1B, 0x0A),
    RegOp::Write(reg::ADC_1C, 0x6A),
    RegOp::DelayMs(50),
];

/// ES8311 codec driver.
///
/// `pa_pin` is the external power amplifier gate (GPIO 38 on Korvo1);
/// boards whose amplifier is always on pass `None`.
pub struct Es8311<I2C, D, P> {
    i2c: I2C,
    delay: D,
    pa_pin: Option<P>,
    address: u8,
    use_mclk: bool,
    initialized: bool,
}

impl<I2C, D, P> Es8311<I2C, D, P>
where
    I2C: I2c,
    D: DelayNs,
    P: OutputPin,
{
    /// Create a driver for a codec without an external master clock (the
    /// chip synthesizes MCLK from BCLK).
    pub fn new(i2c: I2C, delay: D, pa_pin: Option<P>, address: u8) -> Self {
        Self {
            i2c,
            delay,
            pa_pin,
            address,
            use_mclk: false,
            initialized: false,
        }
    }

    /// Select the master clock source before `enable`. `true` means an
    /// external MCLK is wired to the chip.
    pub fn with_external_mclk(mut self, use_mclk: bool) -> Self {
        self.use_mclk = use_mclk;
        self
    }

    /// Release the bus handles, consuming the driver.
    pub fn release(self) -> (I2C, D, Option<P>) {
        (self.i2c, self.delay, self.pa_pin)
    }

    // ── Low-level register protocol ────────────────────────────────────

    fn write_reg(&mut self, register: u8, value: u8) -> Result<(), Error> {
        self.i2c.write(self.address, &[register, value]).map_err(|_| {
            log::warn!("es8311: write of reg {:#04x} failed", register);
            Error::Transport("codec register write")
        })
    }

    fn read_reg(&mut self, register: u8) -> Result<u8, Error> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut buf)
            .map_err(|_| {
                log::warn!("es8311: read of reg {:#04x} failed", register);
                Error::Transport("codec register read")
            })?;
        Ok(buf[0])
    }

    fn run_program(&mut self, ops: &[RegOp]) -> Result<(), Error> {
        for op in ops {
            match *op {
                RegOp::Write(register, value) => self.write_reg(register, value)?,
                RegOp::Update { reg, mask, bits } => {
                    let current = self.read_reg(reg)?;
                    self.write_reg(reg, (current & mask) | bits)?;
                }
                RegOp::DelayMs(ms) => self.delay.delay_ms(ms),
            }
        }
        Ok(())
    }

    /// Read the chip identification registers. Absence is logged but not
    /// fatal: some board revisions NAK the ID reads yet accept the program.
    fn probe(&mut self) {
        match (self.read_reg(reg::CHIP_ID1), self.read_reg(reg::CHIP_ID2)) {
            (Ok(id1), Ok(id2)) => {
                log::info!(
                    "es8311 at {:#04x}: chip id {:#04x} {:#04x}",
                    self.address,
                    id1,
                    id2
                );
            }
            _ => log::warn!("es8311 probe failed at {:#04x}, continuing", self.address),
        }
    }

    // ── Bring-up ───────────────────────────────────────────────────────

    /// Run the full playback bring-up program and open the amplifier gate.
    ///
    /// Idempotent. On any register failure the chip is left untouched from
    /// the caller's point of view: `initialized` stays false and a retry
    /// reruns the whole program.
    pub fn enable(&mut self) -> Result<(), Error> {
        if self.initialized {
            return Ok(());
        }
        self.probe();

        self.run_program(BRING_UP)?;

        // Clock source select, then the BCLK pre-multiplier that matches
        // it (x8 when MCLK is synthesized from BCLK, x1 otherwise).
        let (clk_source, pre_multi) = if self.use_mclk {
            (0x3F, 0 << 3)
        } else {
            (0xBF, 3 << 3)
        };
        self.write_reg(reg::CLK_MANAGER1, clk_source)?;
        let current = self.read_reg(reg::CLK_MANAGER2)?;
        self.write_reg(reg::CLK_MANAGER2, (current & 0x07) | pre_multi)?;

        self.run_program(START_UP)?;

        if let Some(pin) = self.pa_pin.as_mut() {
            pin.set_high()
                .map_err(|_| Error::Transport("amplifier gate"))?;
        }

        self.initialized = true;
        log::info!("es8311: speaker path enabled");
        Ok(())
    }

    /// Mute the DAC and close the amplifier gate. Idempotent.
    pub fn disable(&mut self) -> Result<(), Error> {
        if !self.initialized {
            return Ok(());
        }
        if let Some(pin) = self.pa_pin.as_mut() {
            pin.set_low()
                .map_err(|_| Error::Transport("amplifier gate"))?;
        }
        self.write_reg(reg::DAC_31, 0x20)?;
        self.initialized = false;
        Ok(())
    }

    // ── Volume ─────────────────────────────────────────────────────────

    /// Set playback volume on the user 0-100 scale. The hardware resolves
    /// 31 steps, so nearby inputs can land on the same step.
    pub fn set_volume(&mut self, volume: u8) -> Result<(), Error> {
        if volume > 100 {
            return Err(Error::InvalidArgument("volume above 100"));
        }
        let step = (volume as u16 * reg::VOLUME_STEPS as u16 / 100) as u8;
        self.write_reg(reg::DAC_VOLUME, step)
    }

    /// Read the volume back, rounded to the nearest point of the 0-100
    /// scale. Register values above the step range saturate at 100.
    pub fn volume(&mut self) -> Result<u8, Error> {
        let step = self.read_reg(reg::DAC_VOLUME)? as u16;
        let steps = reg::VOLUME_STEPS as u16;
        Ok(((step * 100 + steps / 2) / steps).min(100) as u8)
    }
}

impl<I2C, D, P> AudioControl for Es8311<I2C, D, P>
where
    I2C: I2c,
    D: DelayNs,
    P: OutputPin,
{
    fn enable(&mut self) -> Result<(), Error> {
        Es8311::enable(self)
    }

    fn disable(&mut self) -> Result<(), Error> {
        Es8311::disable(self)
    }

    fn set_volume(&mut self, volume: u8) -> Result<(), Error> {
        Es8311::set_volume(self, volume)
    }

    fn volume(&mut self) -> Result<u8, Error> {
        Es8311::volume(self)
    }
}
