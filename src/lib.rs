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

//! nctprobe - find an NCT7802 hardware monitor on SMBus and read it out
//!
//! The library splits into the identification and decode core (`chip`,
//! `detect`, `decode`, `setup`), which only ever talks to a
//! `RegisterTransport`, and the pieces that make it a tool: the Linux
//! i2c-dev transport, bus scanning, console report, CLI config and logging.

pub mod chip;
pub mod config;
pub mod decode;
pub mod detect;
pub mod error;
pub mod logger;
pub mod report;
pub mod scan;
pub mod setup;
pub mod transport;

#[cfg(test)]
pub mod test_utils;
