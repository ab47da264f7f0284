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

//! NCT7802 register map, identity constants and channel tables.
//!
//! Everything here is bank 0. The channel tables are ordered: decoders walk
//! them front to back and emit readings in the same order.

/// SMBus address of the monitor on the COMe-bHL6 carrier.
pub const DEFAULT_ADDRESS: u8 = 0x2C;

/// Bank 0 register addresses
pub mod regs {
    pub const BANK: u8 = 0x00;
    pub const TEMP_LSB: u8 = 0x05;
    pub const TEMP_PECI_LSB: u8 = 0x08;
    pub const VOLTAGE_LOW: u8 = 0x0F;
    pub const START: u8 = 0x21;
    pub const MODE: u8 = 0x22;
    pub const VMON_ENABLE: u8 = 0x25;
    pub const VENDOR_ID: u8 = 0xFD;
    pub const CHIP_ID: u8 = 0xFE;
    pub const VERSION_ID: u8 = 0xFF;
}

/// Signature values and must-be-zero masks the detector checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipIdentity {
    pub name: &'static str,
    pub vendor_id: u8,
    pub chip_id: u8,
    pub version_mask: u8,
    pub version_expected: u8,
    pub temp_lsb_reserved: u8,
    pub peci_lsb_reserved: u8,
    pub voltage_lsb_reserved: u8,
}

pub const NCT7802: ChipIdentity = ChipIdentity {
    name: "nct7802",
    vendor_id: 0x50,
    chip_id: 0xC3,
    version_mask: 0xF0,
    version_expected: 0x20,
    temp_lsb_reserved: 0x1F,
    peci_lsb_reserved: 0x3F,
    voltage_lsb_reserved: 0x3F,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureChannel {
    pub label: &'static str,
    pub high_byte_register: u8,
    /// PECI channels take their fraction from the shared PECI LSB register.
    pub shares_low_byte: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoltageChannel {
    pub label: &'static str,
    pub high_byte_register: u8,
    /// Divider ratio from the board's sensors.conf; 0 marks an unwired input.
    pub scale_factor: f64,
}

pub const TEMPERATURE_CHANNELS: [TemperatureChannel; 6] = [
    TemperatureChannel { label: "Remote Diode 1 PCH", high_byte_register: 0x01, shares_low_byte: false },
    TemperatureChannel { label: "Remote Diode 2", high_byte_register: 0x02, shares_low_byte: false },
    TemperatureChannel { label: "Remote Diode 3", high_byte_register: 0x03, shares_low_byte: false },
    TemperatureChannel { label: "Local Diode SYS", high_byte_register: 0x04, shares_low_byte: false },
    TemperatureChannel { label: "PECI 0 CPU", high_byte_register: 0x06, shares_low_byte: true },
    TemperatureChannel { label: "PECI 1", high_byte_register: 0x07, shares_low_byte: true },
];

pub const VOLTAGE_CHANNELS: [VoltageChannel; 5] = [
    VoltageChannel { label: "VCore 3V3", high_byte_register: 0x09, scale_factor: 1.0 },
    VoltageChannel { label: "VCC VBAT", high_byte_register: 0x0A, scale_factor: 1.698947368 },
    VoltageChannel { label: "VSEN1", high_byte_register: 0x0C, scale_factor: 0.0 },
    VoltageChannel { label: "VSEN2", high_byte_register: 0x0D, scale_factor: 0.0 },
    VoltageChannel { label: "VSEN3 12V", high_byte_register: 0x0E, scale_factor: 7.17 },
];
