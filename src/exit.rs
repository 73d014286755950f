// src/exit.rs
//! Standardized process exit codes for `ouro`.
//!
//! CI scripts only need 0 vs non-0; the distinct codes help debug.

use colored::Colorize;
use std::process::Termination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum OuroExit {
    /// No circular imports remained after filtering.
    Success = 0,
    /// At least one circular import was reported.
    CyclesFound = 1,
    /// Fatal error (missing root, bad config, export failure).
    Error = 2,
}

impl OuroExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    #[must_use]
    pub fn from_cycle_count(count: usize) -> Self {
        if count == 0 {
            Self::Success
        } else {
            Self::CyclesFound
        }
    }

    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }
}

impl Termination for OuroExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}

impl From<anyhow::Result<OuroExit>> for OuroExit {
    fn from(res: anyhow::Result<OuroExit>) -> Self {
        match res {
            Ok(code) => code,
            Err(e) => {
                eprintln!("{} {e:#}", "Error:".red());
                Self::Error
            }
        }
    }
}
