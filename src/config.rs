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

use std::env;
use std::time::Duration;

use serde::Serialize;

use crate::chip::DEFAULT_ADDRESS;
use crate::error::{ProbeError, Result};

pub const DEFAULT_DEV_PREFIX: &str = "/dev/i2c-";
pub const DEFAULT_MAX_BUS: u8 = 99;
pub const DEFAULT_DELAY_MS: u64 = 100;

const MAX_DELAY_MS: u64 = 10_000;

pub const USAGE: &str = "\
Usage: nctprobe [options]

Scan SMBus adapters for an NCT7802 monitor and print its readings.

Options:
  --address <addr>     device address, hex (0x2c) or decimal [default: 0x2c]
  --dev-prefix <path>  bus node prefix [default: /dev/i2c-, env NCTPROBE_DEV_PREFIX]
  --max-bus <n>        highest bus number to try [default: 99]
  --delay-ms <n>       pause after each printed reading [default: 100]
  --strict             only decode when the chip is positively identified
  --force              claim the address even if a kernel driver owns it
  --json               print one JSON object per reading
  --logging            append events to /var/log/nctprobe/events.json
  -h, --help           show this help
";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProbeConfig {
    pub dev_prefix: String,
    pub max_bus: u8,
    pub address: u8,
    pub delay_ms: u64,
    /// Skip setup and decode unless detection confirmed the chip
    pub strict: bool,
    pub force: bool,
    pub json: bool,
    pub logging: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            dev_prefix: default_dev_prefix(),
            max_bus: DEFAULT_MAX_BUS,
            address: DEFAULT_ADDRESS,
            delay_ms: DEFAULT_DELAY_MS,
            strict: false,
            force: false,
            json: false,
            logging: false,
        }
    }
}

impl ProbeConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// True when scanning the real /dev nodes rather than a test prefix
    pub fn uses_system_buses(&self) -> bool {
        self.dev_prefix.starts_with("/dev/")
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Run(ProbeConfig),
    Help,
}

pub fn default_dev_prefix() -> String {
    match env::var("NCTPROBE_DEV_PREFIX") {
        Ok(p) if !p.trim().is_empty() => p,
        _ => DEFAULT_DEV_PREFIX.to_string(),
    }
}

/// Accepts `0x2c`, `0X2C` or `44`.
pub fn parse_number(s: &str) -> Option<u64> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        s.parse::<u64>().ok()
    }
}

fn value_for<'a>(flag: &str, it: &mut impl Iterator<Item = &'a String>) -> Result<&'a str> {
    it.next()
        .map(|s| s.as_str())
        .ok_or_else(|| ProbeError::InvalidArgument(format!("{} needs a value", flag)))
}

fn number_for<'a>(flag: &str, it: &mut impl Iterator<Item = &'a String>) -> Result<u64> {
    let raw = value_for(flag, it)?;
    parse_number(raw)
        .ok_or_else(|| ProbeError::InvalidArgument(format!("{}: '{}' is not a number", flag, raw)))
}

/// Parse command-line arguments (without the program name).
pub fn parse_args(args: &[String]) -> Result<Command> {
    let mut cfg = ProbeConfig::default();
    let mut it = args.iter();

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--strict" => cfg.strict = true,
            "--force" => cfg.force = true,
            "--json" => cfg.json = true,
            "--logging" => cfg.logging = true,
            "--dev-prefix" => cfg.dev_prefix = value_for(arg, &mut it)?.to_string(),
            "--address" => {
                let v = number_for(arg, &mut it)?;
                cfg.address = u8::try_from(v).map_err(|_| {
                    ProbeError::InvalidArgument(format!("--address {} out of range", v))
                })?;
            }
            "--max-bus" => {
                let v = number_for(arg, &mut it)?;
                cfg.max_bus = u8::try_from(v).map_err(|_| {
                    ProbeError::InvalidArgument(format!("--max-bus {} out of range", v))
                })?;
            }
            "--delay-ms" => cfg.delay_ms = number_for(arg, &mut it)?,
            other => {
                return Err(ProbeError::InvalidArgument(format!("unknown option '{}'", other)));
            }
        }
    }

    validate_config(&cfg).map_err(ProbeError::InvalidArgument)?;
    Ok(Command::Run(cfg))
}

pub fn validate_config(cfg: &ProbeConfig) -> std::result::Result<(), String> {
    if cfg.dev_prefix.trim().is_empty() {
        return Err("bus node prefix must not be empty".to_string());
    }
    // 0x00-0x02 and 0x78-0x7f are reserved 7-bit addresses
    if !(0x03..=0x77).contains(&cfg.address) {
        return Err(format!("address 0x{:02x} is not a usable 7-bit address (0x03..0x77)", cfg.address));
    }
    if cfg.delay_ms > MAX_DELAY_MS {
        return Err(format!("delay {} ms too long (max {} ms)", cfg.delay_ms, MAX_DELAY_MS));
    }
    Ok(())
}
