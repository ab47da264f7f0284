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

//! Chip identification.
//!
//! The identification registers are only meaningful in bank 0, so bank
//! selection is checked first. Vendor and chip ids alone can collide, so the
//! reserved low bits of three data registers are checked as well.

use std::fmt;

use serde::Serialize;

use crate::chip::{regs, ChipIdentity};
use crate::transport::RegisterTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectStep {
    Bank,
    VendorId,
    ChipId,
    Version,
    TempLsb,
    PeciLsb,
    VoltageLsb,
}

impl DetectStep {
    /// Steps in the order they are run
    pub const ALL: [DetectStep; 7] = [
        DetectStep::Bank,
        DetectStep::VendorId,
        DetectStep::ChipId,
        DetectStep::Version,
        DetectStep::TempLsb,
        DetectStep::PeciLsb,
        DetectStep::VoltageLsb,
    ];

    /// 1-based position in the sequence
    pub fn index(self) -> usize {
        DetectStep::ALL.iter().position(|s| *s == self).map(|i| i + 1).unwrap_or(0)
    }

    pub fn register(self) -> u8 {
        match self {
            DetectStep::Bank => regs::BANK,
            DetectStep::VendorId => regs::VENDOR_ID,
            DetectStep::ChipId => regs::CHIP_ID,
            DetectStep::Version => regs::VERSION_ID,
            DetectStep::TempLsb => regs::TEMP_LSB,
            DetectStep::PeciLsb => regs::TEMP_PECI_LSB,
            DetectStep::VoltageLsb => regs::VOLTAGE_LOW,
        }
    }

    fn accepts(self, value: u8, id: &ChipIdentity) -> bool {
        match self {
            DetectStep::Bank => value == 0,
            DetectStep::VendorId => value == id.vendor_id,
            DetectStep::ChipId => value == id.chip_id,
            DetectStep::Version => value & id.version_mask == id.version_expected,
            DetectStep::TempLsb => value & id.temp_lsb_reserved == 0,
            DetectStep::PeciLsb => value & id.peci_lsb_reserved == 0,
            DetectStep::VoltageLsb => value & id.voltage_lsb_reserved == 0,
        }
    }
}

impl fmt::Display for DetectStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DetectStep::Bank => "bank select",
            DetectStep::VendorId => "vendor id",
            DetectStep::ChipId => "chip id",
            DetectStep::Version => "version id",
            DetectStep::TempLsb => "temperature LSB reserved bits",
            DetectStep::PeciLsb => "PECI temperature LSB reserved bits",
            DetectStep::VoltageLsb => "voltage LSB reserved bits",
        };
        write!(f, "step {} ({})", self.index(), name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    Confirmed,
    /// `value` is `None` when the register read itself failed.
    NotDetected { step: DetectStep, value: Option<u8> },
}

impl Detection {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Detection::Confirmed)
    }
}

/// Run the identification sequence, stopping at the first failed check.
pub fn detect<T: RegisterTransport + ?Sized>(dev: &mut T, id: &ChipIdentity) -> Detection {
    for step in DetectStep::ALL {
        let value = dev.read_byte(step.register()).ok();
        match value {
            Some(v) if step.accepts(v, id) => continue,
            _ => return Detection::NotDetected { step, value },
        }
    }
    Detection::Confirmed
}
