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

//! Bus discovery and the per-bus detect/setup/decode session.
//!
//! Buses are handled one at a time; a bus is finished (including printing)
//! before the next node is opened.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::chip::{regs, NCT7802};
use crate::config::ProbeConfig;
use crate::decode::{decode_temperatures, decode_voltages};
use crate::detect::{detect, Detection};
use crate::error::{ProbeError, Result};
use crate::logger;
use crate::report::{Pacer, Report};
use crate::setup::{arm_temperature_monitoring, arm_voltage_monitoring};
use crate::transport::RegisterTransport;

/// Existing `<prefix>0..=<prefix><max_bus>` nodes, in bus order.
pub fn candidate_paths(prefix: &str, max_bus: u8) -> Vec<PathBuf> {
    (0..=max_bus)
        .map(|n| PathBuf::from(format!("{}{}", prefix, n)))
        .filter(|p| p.exists())
        .collect()
}

/// Open each candidate bus in turn and hand it to `visit`.
///
/// Returns the number of buses that opened. Fails with `NoBusFound` when not
/// a single one did; per-bus open errors are only logged.
pub fn scan_buses<T, O, V>(cfg: &ProbeConfig, mut open: O, mut visit: V) -> Result<usize>
where
    O: FnMut(&Path) -> Result<T>,
    V: FnMut(&Path, &mut T) -> Result<()>,
{
    let mut opened = 0;
    for path in candidate_paths(&cfg.dev_prefix, cfg.max_bus) {
        let mut dev = match open(&path) {
            Ok(dev) => dev,
            Err(e) => {
                logger::log_event("bus_open_failed", json!({
                    "bus": path.display().to_string(),
                    "error": e.to_string(),
                }));
                continue;
            }
        };
        opened += 1;
        logger::log_event("bus_opened", json!({ "bus": path.display().to_string() }));
        visit(&path, &mut dev)?;
    }

    if opened == 0 {
        logger::log_event("no_bus_found", json!({
            "prefix": cfg.dev_prefix,
            "max_bus": cfg.max_bus,
        }));
        return Err(ProbeError::NoBusFound {
            prefix: cfg.dev_prefix.clone(),
            max_bus: cfg.max_bus,
        });
    }
    Ok(opened)
}

/// Does anything acknowledge a read at the bound address?
pub fn probe_presence<T: RegisterTransport + ?Sized>(dev: &mut T) -> bool {
    dev.read_byte(regs::BANK).is_ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub present: bool,
    pub detection: Detection,
    /// False when `--strict` withheld the readout
    pub decoded: bool,
    pub voltages: usize,
    pub temperatures: usize,
    pub failed_writes: usize,
}

/// Detect, arm and read out the chip on one bus, printing to `out`.
pub fn run_session<T, W>(bus: &Path, dev: &mut T, cfg: &ProbeConfig, out: W) -> io::Result<SessionSummary>
where
    T: RegisterTransport + ?Sized,
    W: Write,
{
    let bus_name = bus.display().to_string();
    let mut report = Report::new(out, cfg.json, bus_name.clone(), Pacer::new(cfg.delay()));
    report.bus_found()?;

    let present = probe_presence(dev);
    report.presence(cfg.address, present)?;

    let chip_id = dev.read_byte(regs::CHIP_ID).ok();
    let version = dev.read_byte(regs::VERSION_ID).ok();
    report.identity_banner(chip_id, version)?;

    let detection = detect(dev, &NCT7802);
    let (failed_step, failed_value) = match detection {
        Detection::Confirmed => (None, None),
        Detection::NotDetected { step, value } => (Some(step), value),
    };
    logger::log_event("detect", json!({
        "bus": bus_name,
        "address": cfg.address,
        "confirmed": detection.is_confirmed(),
        "failed_step": failed_step,
        "failed_step_index": failed_step.map(|s| s.index()),
        "value": failed_value,
    }));
    report.detection(NCT7802.name, &detection)?;

    let mut summary = SessionSummary {
        present,
        detection,
        decoded: false,
        voltages: 0,
        temperatures: 0,
        failed_writes: 0,
    };

    if cfg.strict && !detection.is_confirmed() {
        report.skipped_decode()?;
        return Ok(summary);
    }

    let armed = arm_voltage_monitoring(dev);
    let voltages = decode_voltages(dev);
    report.voltages(&voltages)?;

    let armed_temp = arm_temperature_monitoring(dev);
    let temperatures = decode_temperatures(dev);
    report.temperatures(&temperatures)?;

    if logger::is_enabled() {
        for r in voltages.iter().chain(temperatures.iter()) {
            logger::log_event("reading", json!({ "bus": bus_name, "reading": r }));
        }
    }

    summary.decoded = true;
    summary.voltages = voltages.len();
    summary.temperatures = temperatures.len();
    summary.failed_writes = armed.failed + armed_temp.failed;
    Ok(summary)
}
