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

//! Register writes that start the monitors before a decode pass.
//!
//! Failed writes are logged and counted. The decoder runs regardless and
//! simply finds empty channels if the chip never armed.

use serde_json::json;

use crate::chip::regs;
use crate::logger;
use crate::transport::RegisterTransport;

/// START: begin monitoring
const START_MONITOR: u8 = 0x01;
/// MODE: all remote diode inputs in voltage/diode mode
const MODE_VOLTAGE: u8 = 0x3F;
/// MODE: local temperature sensor enabled
const MODE_LOCAL_TEMP: u8 = 0x40;
/// VMON_ENABLE: Vcore and VCC
const VMON_VCORE_VCC: u8 = 0x03;

pub const VOLTAGE_SEQUENCE: [(u8, u8); 4] = [
    (regs::BANK, 0x00),
    (regs::START, START_MONITOR),
    (regs::MODE, MODE_VOLTAGE),
    (regs::VMON_ENABLE, VMON_VCORE_VCC),
];

pub const TEMPERATURE_SEQUENCE: [(u8, u8); 1] = [(regs::MODE, MODE_LOCAL_TEMP)];

/// Outcome of a write sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetupReport {
    pub written: usize,
    pub failed: usize,
}

impl SetupReport {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

fn apply<T: RegisterTransport + ?Sized>(dev: &mut T, sequence: &[(u8, u8)]) -> SetupReport {
    let mut report = SetupReport::default();
    for &(register, value) in sequence {
        match dev.write_byte(register, value) {
            Ok(()) => report.written += 1,
            Err(e) => {
                report.failed += 1;
                logger::log_event("setup_write_failed", json!({
                    "register": register,
                    "value": value,
                    "error": e.to_string(),
                }));
            }
        }
    }
    report
}

/// Select bank 0, start the chip and enable Vcore/VCC monitoring.
pub fn arm_voltage_monitoring<T: RegisterTransport + ?Sized>(dev: &mut T) -> SetupReport {
    apply(dev, &VOLTAGE_SEQUENCE)
}

/// Switch the mode register over to the local temperature sensor.
pub fn arm_temperature_monitoring<T: RegisterTransport + ?Sized>(dev: &mut T) -> SetupReport {
    apply(dev, &TEMPERATURE_SEQUENCE)
}
