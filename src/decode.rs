/*
 * This file is part of nctprobe.
 *
 * Copyright (C) 2025 nctprobe contributors
 *
 * nctprobe is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 2 of the License, or
 * (at your option) any later version.
 *
 * nctprobe is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with nctprobe. If not, see <https://www.gnu.org/licenses/>.
 */

//! Raw register groups to physical readings.
//!
//! Temperatures are 11-bit values: an 8-bit integer part in the channel
//! register and a 3-bit fraction (0.125 °C steps) in bits 7..5 of an LSB
//! register. Voltages are 10-bit ADC values: 8 bits in the channel register
//! and the top 2 bits of the shared VOLTAGE_LOW register.
//!
//! Channels that are unpopulated or whose registers cannot be read are left
//! out of the result.

use serde::Serialize;
use serde_json::json;

use crate::chip::{regs, TemperatureChannel, VoltageChannel, TEMPERATURE_CHANNELS, VOLTAGE_CHANNELS};
use crate::logger;
use crate::transport::RegisterTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingKind {
    Temperature,
    Voltage,
}

impl ReadingKind {
    pub fn unit(self) -> &'static str {
        match self {
            ReadingKind::Temperature => "°C",
            ReadingKind::Voltage => "V",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub label: String,
    pub kind: ReadingKind,
    /// Milli-degrees for temperatures, scaled ADC counts for voltages
    pub raw: u32,
    pub value: f64,
}

fn skipped(label: &str, reason: &str) {
    logger::log_event("channel_skipped", json!({ "label": label, "reason": reason }));
}

/// Combine an integer byte and an optional LSB byte into milli-degrees Celsius.
pub fn temperature_millidegrees(high: u8, low: Option<u8>) -> u32 {
    let fraction = low.map_or(0, |l| u32::from((l & 0xE0) >> 5) * 125);
    (u32::from(high) << 8) / 32 * 125 + fraction
}

/// Rebuild the 10-bit ADC value and apply the channel's LSB multiplier.
/// Channel 0 steps in 4 mV, every other channel in 2 mV.
pub fn voltage_accumulator(index: usize, high: u8, low: u8) -> u32 {
    let adc = (u32::from(high) << 2) | u32::from(low >> 6);
    if index == 0 {
        adc * 4
    } else {
        adc * 2
    }
}

pub fn decode_temperature_channel<T: RegisterTransport + ?Sized>(
    dev: &mut T,
    channel: &TemperatureChannel,
) -> Option<Reading> {
    let high = match dev.read_byte(channel.high_byte_register) {
        Ok(0) => {
            skipped(channel.label, "not populated");
            return None;
        }
        Ok(v) => v,
        Err(_) => {
            skipped(channel.label, "high byte read failed");
            return None;
        }
    };

    let low = if channel.shares_low_byte {
        // A zero LSB means the PECI agent never reported a value
        match dev.read_byte(regs::TEMP_PECI_LSB) {
            Ok(0) => {
                skipped(channel.label, "low byte empty");
                return None;
            }
            Ok(v) => Some(v),
            Err(_) => {
                skipped(channel.label, "low byte read failed");
                return None;
            }
        }
    } else {
        None
    };

    let raw = temperature_millidegrees(high, low);
    Some(Reading {
        label: channel.label.to_string(),
        kind: ReadingKind::Temperature,
        raw,
        value: f64::from(raw) / 1000.0,
    })
}

/// Decode every temperature channel in table order.
pub fn decode_temperatures<T: RegisterTransport + ?Sized>(dev: &mut T) -> Vec<Reading> {
    TEMPERATURE_CHANNELS
        .iter()
        .filter_map(|ch| decode_temperature_channel(dev, ch))
        .collect()
}

pub fn decode_voltage_channel<T: RegisterTransport + ?Sized>(
    dev: &mut T,
    index: usize,
    channel: &VoltageChannel,
) -> Option<Reading> {
    let high = match dev.read_byte(channel.high_byte_register) {
        Ok(v) => v,
        Err(_) => {
            skipped(channel.label, "high byte read failed");
            return None;
        }
    };
    let low = dev.read_byte(regs::VOLTAGE_LOW).unwrap_or(0);

    let raw = voltage_accumulator(index, high, low);
    let value = (f64::from(raw) / 1000.0) * channel.scale_factor;
    if value == 0.0 {
        skipped(channel.label, "zero");
        return None;
    }

    Some(Reading {
        label: channel.label.to_string(),
        kind: ReadingKind::Voltage,
        raw,
        value,
    })
}

/// Decode every voltage channel in table order.
pub fn decode_voltages<T: RegisterTransport + ?Sized>(dev: &mut T) -> Vec<Reading> {
    VOLTAGE_CHANNELS
        .iter()
        .enumerate()
        .filter_map(|(i, ch)| decode_voltage_channel(dev, i, ch))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::{assert_approx_eq, FakeChip};
    use crate::transport::MockRegisterTransport;
    use mockall::predicate::eq;
    use std::io;

    fn labels(readings: &[Reading]) -> Vec<&str> {
        readings.iter().map(|r| r.label.as_str()).collect()
    }

    #[test]
    fn test_temperature_millidegrees() {
        assert_eq!(temperature_millidegrees(45, None), 45_000);
        assert_eq!(temperature_millidegrees(0x64, Some(0x20)), (0x64 << 8) / 32 * 125 + 125);
        assert_eq!(temperature_millidegrees(0x64, Some(0x20)), 100_125);
        assert_eq!(temperature_millidegrees(0x64, Some(0xE0)), 100_875);
        // Reserved low bits never leak into the fraction
        assert_eq!(temperature_millidegrees(0x64, Some(0x1F)), 100_000);
        assert_eq!(temperature_millidegrees(0xFF, Some(0xFF)), 255_875);
    }

    #[test]
    fn test_voltage_accumulator_channel_zero_doubles() {
        for (high, low) in [(0x00, 0x40), (0x01, 0x00), (0xCE, 0x80), (0xFF, 0xFF)] {
            let first = voltage_accumulator(0, high, low);
            for index in 1..5 {
                assert_eq!(first, 2 * voltage_accumulator(index, high, low));
            }
        }
        assert_eq!(voltage_accumulator(0, 0xFF, 0xC0), 1023 * 4);
        assert_eq!(voltage_accumulator(1, 0xCE, 0x80), ((0xCE << 2) | 2) * 2);
    }

    #[test]
    fn test_decode_temperatures_all_populated() {
        let mut chip = FakeChip::populated_nct7802().with(regs::TEMP_PECI_LSB, 0x20);
        let readings = decode_temperatures(&mut chip);

        assert_eq!(
            labels(&readings),
            vec!["Remote Diode 1 PCH", "Remote Diode 2", "Remote Diode 3", "Local Diode SYS", "PECI 0 CPU", "PECI 1"]
        );
        assert!(readings.iter().all(|r| r.kind == ReadingKind::Temperature));
        assert_eq!(readings[0].raw, 45_000);
        assert_eq!(readings[0].value, 45.0);
        assert_eq!(readings[4].raw, 100_125);
        assert_eq!(readings[4].value, 100.125);
        assert_eq!(readings[5].raw, 52_125);
    }

    #[test]
    fn test_non_peci_channels_ignore_low_byte() {
        // A stale LSB from a PECI read must not show up on a diode channel
        let mut chip = FakeChip::new()
            .with(0x06, 60)
            .with(0x01, 30)
            .with(regs::TEMP_PECI_LSB, 0xE0)
            .with(regs::TEMP_LSB, 0xE0);
        let readings = decode_temperatures(&mut chip);
        let diode = readings.iter().find(|r| r.label == "Remote Diode 1 PCH").unwrap();
        assert_eq!(diode.raw, 30_000);
        let peci = readings.iter().find(|r| r.label == "PECI 0 CPU").unwrap();
        assert_eq!(peci.raw, 60_875);
        assert_eq!(chip.read_count(regs::TEMP_LSB), 0);
    }

    #[test]
    fn test_zero_or_failed_temperature_is_skipped() {
        let mut chip = FakeChip::populated_nct7802()
            .with(0x02, 0)
            .failing(0x03);
        let readings = decode_temperatures(&mut chip);
        assert_eq!(
            labels(&readings),
            vec!["Remote Diode 1 PCH", "Local Diode SYS", "PECI 0 CPU", "PECI 1"]
        );
    }

    #[test]
    fn test_failed_peci_low_byte_skips_peci_channels_only() {
        let mut chip = FakeChip::populated_nct7802().failing(regs::TEMP_PECI_LSB);
        let readings = decode_temperatures(&mut chip);
        assert_eq!(readings.len(), 4);
        assert!(readings.iter().all(|r| !r.label.starts_with("PECI")));
    }

    #[test]
    fn test_peci_zero_low_byte_skips_channel() {
        let mut chip = FakeChip::new()
            .with(0x06, 60)
            .with(regs::TEMP_LSB, 0)
            .with(regs::TEMP_PECI_LSB, 0);
        assert!(decode_temperatures(&mut chip).is_empty());
        assert_eq!(chip.read_count(regs::TEMP_PECI_LSB), 1);
        assert_eq!(chip.read_count(regs::TEMP_LSB), 0);
    }

    #[test]
    fn test_peci_zero_low_byte_leaves_diodes_alone() {
        let mut chip = FakeChip::new().with(0x04, 33).with(0x07, 0x40);
        let readings = decode_temperatures(&mut chip);
        assert_eq!(labels(&readings), vec!["Local Diode SYS"]);
    }

    #[test]
    fn test_temperature_decode_is_repeatable() {
        let mut chip = FakeChip::new().with(0x06, 0x64).with(regs::TEMP_PECI_LSB, 0x20);
        let first = decode_temperatures(&mut chip);
        let second = decode_temperatures(&mut chip);
        assert_eq!(first, second);
        assert_eq!(first[0].raw, (0x64 << 8) / 32 * 125 + ((0x20 & 0xe0) >> 5) * 125);
    }

    #[test]
    fn test_decode_voltages() {
        let mut chip = FakeChip::populated_nct7802().with(regs::VOLTAGE_LOW, 0x80);
        let readings = decode_voltages(&mut chip);

        // VSEN1 and VSEN2 have a zero scale factor
        assert_eq!(labels(&readings), vec!["VCore 3V3", "VCC VBAT", "VSEN3 12V"]);
        assert!(readings.iter().all(|r| r.kind == ReadingKind::Voltage));

        let vcore = &readings[0];
        assert_eq!(vcore.raw, ((0xCE << 2) | 2) * 4);
        assert_approx_eq(vcore.value, 3.304, 1e-9);

        let vbat = &readings[1];
        assert_eq!(vbat.raw, ((0x6E << 2) | 2) * 2);
        assert_approx_eq(vbat.value, 0.884 * 1.698947368, 1e-9);

        let v12 = &readings[2];
        assert_eq!(v12.raw, ((0xD1 << 2) | 2) * 2);
        assert_approx_eq(v12.value, 1.676 * 7.17, 1e-9);
    }

    #[test]
    fn test_zero_voltage_is_skipped() {
        let mut chip = FakeChip::nct7802().with(0x0A, 0x6E);
        let readings = decode_voltages(&mut chip);
        assert_eq!(labels(&readings), vec!["VCC VBAT"]);
    }

    #[test]
    fn test_failed_voltage_reads() {
        // High byte failure drops the channel, a failed low byte only loses 2 bits
        let mut chip = FakeChip::populated_nct7802()
            .failing(0x09)
            .failing(regs::VOLTAGE_LOW);
        let readings = decode_voltages(&mut chip);
        assert_eq!(labels(&readings), vec!["VCC VBAT", "VSEN3 12V"]);
        assert_eq!(readings[0].raw, (0x6E << 2) * 2);
    }

    #[test]
    fn test_decode_survives_dead_bus() {
        let mut mock = MockRegisterTransport::new();
        mock.expect_read_byte()
            .returning(|_| Err(io::Error::new(io::ErrorKind::TimedOut, "timeout")));
        assert!(decode_temperatures(&mut mock).is_empty());
        assert!(decode_voltages(&mut mock).is_empty());
    }

    #[test]
    fn test_unpopulated_diode_reads_only_high_byte() {
        let mut mock = MockRegisterTransport::new();
        mock.expect_read_byte()
            .with(eq(0x01))
            .times(1)
            .returning(|_| Ok(0));
        let channel = &TEMPERATURE_CHANNELS[0];
        assert!(decode_temperature_channel(&mut mock, channel).is_none());
    }

    #[test]
    fn test_reading_serialization() {
        let reading = Reading {
            label: "VCore 3V3".to_string(),
            kind: ReadingKind::Voltage,
            raw: 3304,
            value: 3.304,
        };
        let json = serde_json::to_string(&reading).unwrap();
        assert!(json.contains("\"kind\":\"voltage\""));
        assert!(json.contains("\"raw\":3304"));
    }
}
