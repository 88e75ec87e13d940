//! Runtime configuration
//!
//! Two named environments select the credential variable, the data root
//! and the default log level. Running against production asks for an
//! explicit y/n first.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::ValueEnum;

use crate::storage::StorageConfig;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    #[default]
    Dev,
    Prod,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Dev => "dev",
            Mode::Prod => "prod",
        }
    }

    /// Environment variable holding the bot credential
    pub fn token_var(&self) -> &'static str {
        match self {
            Mode::Dev => "DEV_TOKEN",
            Mode::Prod => "PROD_TOKEN",
        }
    }

    pub fn data_root(&self) -> PathBuf {
        PathBuf::from(format!("data-{}", self.as_str()))
    }

    /// Level used when `RUST_LOG` is not set
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Mode::Dev => "debug",
            Mode::Prod => "info",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved settings for one run
#[derive(Clone)]
pub struct BotConfig {
    pub mode: Mode,
    pub storage: StorageConfig,
    /// Credential handed to the gateway collaborator
    pub token: Option<String>,
}

impl BotConfig {
    /// Resolve from the mode, an optional data root override and the
    /// process environment
    pub fn resolve(mode: Mode, data_root: Option<PathBuf>) -> Self {
        let token = std::env::var(mode.token_var())
            .ok()
            .filter(|t| !t.trim().is_empty());
        Self::with_token(mode, data_root, token)
    }

    pub fn with_token(mode: Mode, data_root: Option<PathBuf>, token: Option<String>) -> Self {
        let data_root = data_root.unwrap_or_else(|| mode.data_root());
        Self {
            mode,
            storage: StorageConfig::new(data_root),
            token,
        }
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("mode", &self.mode)
            .field("data_root", &self.storage.data_root())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Ask whether to continue in production until the answer is y or n
///
/// Returns `Ok(false)` on "n" or when input ends without an answer.
pub fn confirm_production<R: BufRead, W: Write>(mut input: R, mut output: W) -> io::Result<bool> {
    let mut answer = String::new();
    loop {
        write!(output, "Bot about to run in production, continue? (y/n) ")?;
        output.flush()?;

        answer.clear();
        if input.read_line(&mut answer)? == 0 {
            return Ok(false);
        }
        match answer.trim().to_ascii_lowercase().as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => {}
        }
    }
}
