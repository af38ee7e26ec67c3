//! ES8311 register map.
//!
//! Addresses follow the datasheet naming. Only the registers the driver
//! touches are listed; the chip has more.

#![allow(dead_code)]

/// Reset and chip power control.
pub const RESET: u8 = 0x00;

/// Clock manager: MCLK source select, clock gates.
pub const CLK_MANAGER1: u8 = 0x01;
/// Clock manager: MCLK prescaler and pre-multiplier.
pub const CLK_MANAGER2: u8 = 0x02;
/// Clock manager: ADC oversample ratio.
pub const CLK_MANAGER3: u8 = 0x03;
/// Clock manager: DAC oversample ratio.
pub const CLK_MANAGER4: u8 = 0x04;
/// Clock manager: ADC/DAC clock dividers.
pub const CLK_MANAGER5: u8 = 0x05;
/// Clock manager: BCLK divider.
pub const CLK_MANAGER6: u8 = 0x06;
/// Clock manager: LRCK divider, high bits.
pub const CLK_MANAGER7: u8 = 0x07;
/// Clock manager: LRCK divider, low bits.
pub const CLK_MANAGER8: u8 = 0x08;

/// Serial data port, input (DAC) format and word length.
pub const SDP_IN: u8 = 0x09;
/// Serial data port, output (ADC) format and word length.
pub const SDP_OUT: u8 = 0x0A;

/// System: power-up state machine.
pub const SYSTEM_0B: u8 = 0x0B;
/// System: power-up state machine.
pub const SYSTEM_0C: u8 = 0x0C;
/// System: bias and reference power.
pub const SYSTEM_0D: u8 = 0x0D;
/// System: analog block power-down bits.
pub const SYSTEM_0E: u8 = 0x0E;
/// System: low-power mode selects.
pub const SYSTEM_0F: u8 = 0x0F;
/// System: output driver bias.
pub const SYSTEM_10: u8 = 0x10;
/// System: internal voltage reference tuning.
pub const SYSTEM_11: u8 = 0x11;
/// System: DAC output enable.
pub const SYSTEM_12: u8 = 0x12;
/// System: headphone / line output select.
pub const SYSTEM_13: u8 = 0x13;
/// System: microphone PGA and input select.
pub const SYSTEM_14: u8 = 0x14;

/// ADC: soft ramp and sample-rate mode.
pub const ADC_15: u8 = 0x15;
/// ADC: anti-alias filter and bias.
pub const ADC_16: u8 = 0x16;
/// ADC: digital volume.
pub const ADC_17: u8 = 0x17;
/// ADC: automatic level control, window size.
pub const ADC_1B: u8 = 0x1B;
/// ADC: automatic level control, rate.
pub const ADC_1C: u8 = 0x1C;

/// DAC: mute and soft ramp.
pub const DAC_31: u8 = 0x31;
/// DAC: digital volume, 0x00 = mute, 0xFF = +32 dB.
pub const DAC_VOLUME: u8 = 0x32;
/// DAC: ramp rate and offset.
pub const DAC_37: u8 = 0x37;

/// GPIO / test mode control.
pub const GPIO_44: u8 = 0x44;
/// General purpose control.
pub const GP_45: u8 = 0x45;

/// Chip identification, first byte (0x83).
pub const CHIP_ID1: u8 = 0xFD;
/// Chip identification, second byte (0x11).
pub const CHIP_ID2: u8 = 0xFE;

/// Hardware volume resolution used for the 0-100 user scale.
pub const VOLUME_STEPS: u8 = 31;
