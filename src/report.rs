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

//! Console output: plain text sections or one JSON object per reading.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use serde_json::json;

use crate::decode::Reading;
use crate::detect::Detection;

/// Fixed pause between printed readings.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn pause(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

pub struct Report<W: Write> {
    out: W,
    json: bool,
    bus: String,
    pacer: Pacer,
}

fn hex_or_unknown(v: Option<u8>) -> String {
    v.map(|b| format!("0x{:02X}", b)).unwrap_or_else(|| "??".to_string())
}

impl<W: Write> Report<W> {
    pub fn new(out: W, json: bool, bus: impl Into<String>, pacer: Pacer) -> Self {
        Self { out, json, bus: bus.into(), pacer }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn bus_found(&mut self) -> io::Result<()> {
        if self.json {
            return Ok(());
        }
        writeln!(self.out, "Found SMBus {}", self.bus)
    }

    pub fn presence(&mut self, address: u8, present: bool) -> io::Result<()> {
        if self.json || !present {
            return Ok(());
        }
        writeln!(self.out, "    Found device presence at address 0x{:02X}", address)
    }

    pub fn identity_banner(&mut self, chip_id: Option<u8>, version: Option<u8>) -> io::Result<()> {
        if self.json {
            return Ok(());
        }
        writeln!(
            self.out,
            "REG_CHIP_ID = {} Version = {}",
            hex_or_unknown(chip_id),
            hex_or_unknown(version)
        )
    }

    pub fn detection(&mut self, chip: &str, detection: &Detection) -> io::Result<()> {
        if self.json {
            return Ok(());
        }
        match detection {
            Detection::Confirmed => writeln!(self.out, "\nDetected chip sensor {}", chip),
            Detection::NotDetected { step, value } => writeln!(
                self.out,
                "\nNo {} signature: {} read {}",
                chip,
                step,
                hex_or_unknown(*value)
            ),
        }
    }

    pub fn skipped_decode(&mut self) -> io::Result<()> {
        if self.json {
            return Ok(());
        }
        writeln!(self.out, "Skipping readout (--strict)")
    }

    fn json_line(&mut self, reading: &Reading) -> io::Result<()> {
        let line = json!({
            "bus": self.bus,
            "label": reading.label,
            "kind": reading.kind,
            "unit": reading.kind.unit(),
            "raw": reading.raw,
            "value": reading.value,
        });
        writeln!(self.out, "{}", line)
    }

    pub fn voltages(&mut self, readings: &[Reading]) -> io::Result<()> {
        if !self.json {
            writeln!(self.out, "\n****VOLTAGE******")?;
            writeln!(self.out, "Name\t\tCompute val\tRaw value")?;
        }
        for r in readings {
            if self.json {
                self.json_line(r)?;
            } else {
                writeln!(self.out, "{}\t{}\t\t{}", r.label, r.value, r.raw)?;
            }
            self.pacer.pause();
        }
        if !self.json {
            writeln!(self.out, "*****************")?;
        }
        Ok(())
    }

    pub fn temperatures(&mut self, readings: &[Reading]) -> io::Result<()> {
        if !self.json {
            writeln!(self.out, "\n*******TEMPERATURE********")?;
        }
        for r in readings {
            if self.json {
                self.json_line(r)?;
            } else {
                writeln!(self.out, "{} \tVal = {}", r.label, r.value)?;
            }
            self.pacer.pause();
        }
        if !self.json {
            writeln!(self.out, "**************************")?;
        }
        Ok(())
    }
}
