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

use std::io;
use std::process;

use nctprobe::config::{self, Command};
use nctprobe::error::ProbeError;
use nctprobe::logger;
use nctprobe::scan::{run_session, scan_buses};
use nctprobe::transport::SmbusDevice;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let cfg = match config::parse_args(&args) {
        Ok(Command::Run(cfg)) => cfg,
        Ok(Command::Help) => {
            print!("{}", config::USAGE);
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Try: nctprobe --help");
            process::exit(2);
        }
    };

    // /dev/i2c-* nodes are root-only on most systems
    if cfg.uses_system_buses() && unsafe { libc::geteuid() } != 0 {
        eprintln!("Error: nctprobe requires root privileges to access SMBus adapters.");
        eprintln!("Please run with: sudo nctprobe");
        process::exit(1);
    }

    if cfg.logging {
        if logger::init_logging().is_none() {
            eprintln!("warning: could not open {}, logging disabled", logger::DEFAULT_LOG_PATH);
        }
        logger::log_event("startup", serde_json::json!({
            "args": args,
            "config": cfg,
        }));
    }

    let result = scan_buses(
        &cfg,
        |path| SmbusDevice::open(path, cfg.address, cfg.force),
        |path, dev| {
            run_session(path, dev, &cfg, io::stdout().lock())?;
            Ok(())
        },
    );

    match result {
        Ok(_) => Ok(()),
        Err(e @ ProbeError::NoBusFound { .. }) => {
            eprintln!("{}", e);
            process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
