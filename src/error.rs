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

//! Error type shared by the scanner, transport and CLI layers.
//!
//! The detection and decode core never returns these: a failed register
//! transaction is recovered locally (the channel is skipped or the
//! detection step fails). Only bus discovery and argument handling can
//! surface a `ProbeError`.

use std::io;

use thiserror::Error;

/// Result type alias using ProbeError
pub type Result<T> = std::result::Result<T, ProbeError>;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Can't find any SMBus device! (tried {prefix}0..={max_bus})")]
    NoBusFound { prefix: String, max_bus: u8 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Permission denied - need root")]
    PermissionDenied,

    #[error("SMBus access is only supported on Linux")]
    Unsupported,
}
