use std::fs;
use std::path::Path;

use identisaurus_counter::{MatchMode, DEFAULT_TAG};
use identisaurus_embed::{validate_symbol, DEFAULT_SYMBOL};
use identisaurus_ledger::{LockConfig, SaveMode};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StampError};

/// Hidden ledger file placed next to the sources it counts. *Rawr.*
pub const DEFAULT_LEDGER_FILE_NAME: &str = ".identisaurus.rawr";

/// Settings for a [`Stamper`](crate::Stamper).
///
/// Every field has a default, so a TOML file only needs the keys it
/// changes:
///
/// ```toml
/// tag = "myproject"
/// save_mode = "atomic_replace"
///
/// [lock]
/// timeout_ms = 2000
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StampConfig {
    /// Literal wrapped around the version string: `<tag>...</tag>`.
    pub tag: String,
    /// Ledger file name, resolved in each source's directory.
    pub ledger_file_name: String,
    /// Symbol name handed to the embedder.
    pub symbol: String,
    /// How ledger records are matched to the unit's base name.
    pub match_mode: MatchMode,
    /// How the ledger is written back.
    pub save_mode: SaveMode,
    /// Advisory locking around load/save. Off unless set.
    pub lock: Option<LockConfig>,
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            tag: DEFAULT_TAG.into(),
            ledger_file_name: DEFAULT_LEDGER_FILE_NAME.into(),
            symbol: DEFAULT_SYMBOL.into(),
            match_mode: MatchMode::default(),
            save_mode: SaveMode::default(),
            lock: None,
        }
    }
}

impl StampConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| StampError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| StampError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Reject values that would produce an unreadable ledger location or an
    /// unembeddable string.
    pub fn validate(&self) -> Result<()> {
        if self.tag.is_empty() {
            return Err(StampError::Config("tag must not be empty".into()));
        }
        if self.tag.contains(['<', '>', '/']) {
            return Err(StampError::Config(format!(
                "tag {:?} must not contain '<', '>' or '/'",
                self.tag
            )));
        }
        if self.ledger_file_name.is_empty()
            || self.ledger_file_name.contains(['/', '\\'])
            || matches!(self.ledger_file_name.as_str(), "." | "..")
        {
            return Err(StampError::Config(format!(
                "ledger_file_name {:?} must be a plain file name",
                self.ledger_file_name
            )));
        }
        validate_symbol(&self.symbol).map_err(|e| StampError::Config(e.to_string()))?;
        Ok(())
    }
}
