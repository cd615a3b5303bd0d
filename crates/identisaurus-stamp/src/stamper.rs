use std::path::{Path, PathBuf};

use identisaurus_counter::{CounterEngine, VersionString};
use identisaurus_embed::Embedder;
use identisaurus_ledger::{LedgerFile, LedgerLock};
use serde::Serialize;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::config::StampConfig;
use crate::error::Result;
use crate::paths;

/// Result of stamping one compiled unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StampOutcome {
    /// Name the unit is counted under in the ledger.
    pub base_name: String,
    /// Ledger file that was updated.
    pub ledger_path: PathBuf,
    /// Build count after the increment.
    pub count: u64,
    /// The string handed to the embedder.
    pub version: VersionString,
}

/// Runs the load → increment → compose → embed → save sequence.
///
/// A `Stamper` holds no ledger state: each call reloads the ledger from disk
/// and drops it after saving.
#[derive(Clone, Debug)]
pub struct Stamper<C = SystemClock> {
    config: StampConfig,
    engine: CounterEngine,
    clock: C,
}

impl Default for Stamper<SystemClock> {
    fn default() -> Self {
        Self::new(StampConfig::default())
    }
}

impl Stamper<SystemClock> {
    pub fn new(config: StampConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Stamper<C> {
    pub fn with_clock(config: StampConfig, clock: C) -> Self {
        let engine = CounterEngine::new(config.match_mode);
        Self {
            config,
            engine,
            clock,
        }
    }

    pub fn config(&self) -> &StampConfig {
        &self.config
    }

    /// Ledger file used for `source`.
    pub fn ledger_path(&self, source: &Path) -> PathBuf {
        paths::ledger_path(source, &self.config.ledger_file_name)
    }

    /// Stamp `source`, displaying it by its final path segment.
    pub fn stamp(&self, source: &Path, embedder: &mut dyn Embedder) -> Result<StampOutcome> {
        let display_name = paths::display_name(source)?;
        self.stamp_as(source, &display_name, embedder)
    }

    /// Stamp `source`, using `display_name` inside the version string.
    ///
    /// The ledger is saved only after the embedder accepts the string, so a
    /// failed embed never persists an increment.
    pub fn stamp_as(
        &self,
        source: &Path,
        display_name: &str,
        embedder: &mut dyn Embedder,
    ) -> Result<StampOutcome> {
        let base_name = paths::base_name(source)?;
        let ledger_path = self.ledger_path(source);
        let _lock = self.lock(&ledger_path)?;

        let file = LedgerFile::new(&ledger_path);
        let mut ledger = file.load()?;
        self.engine.increment(&mut ledger, &base_name);
        let count = self.engine.current_count(&ledger, &base_name);

        let version = VersionString::new(
            self.config.tag.as_str(),
            display_name,
            count,
            self.clock.now_secs(),
        );
        let rendered = version.to_string();
        info!(
            build_string = rendered.trim_end(),
            file = %base_name,
            "inserting build string"
        );
        embedder.embed(&self.config.symbol, rendered.as_bytes())?;

        file.save_with(&ledger, self.config.save_mode)?;

        Ok(StampOutcome {
            base_name,
            ledger_path,
            count,
            version,
        })
    }

    /// Current count for `source` without changing anything. A missing
    /// ledger reads as 0 and is not created.
    pub fn peek(&self, source: &Path) -> Result<u64> {
        let base_name = paths::base_name(source)?;
        let ledger_path = self.ledger_path(source);
        if !ledger_path.exists() {
            debug!(path = %ledger_path.display(), "no ledger yet");
            return Ok(0);
        }
        let ledger = LedgerFile::new(&ledger_path).load()?;
        Ok(self.engine.current_count(&ledger, &base_name))
    }

    /// Overwrite the count for `source`. Any value is accepted, including
    /// one lower than the current count.
    pub fn set(&self, source: &Path, build_count: u64) -> Result<PathBuf> {
        let base_name = paths::base_name(source)?;
        let ledger_path = self.ledger_path(source);
        let _lock = self.lock(&ledger_path)?;

        let file = LedgerFile::new(&ledger_path);
        let mut ledger = file.load()?;
        self.engine.set(&mut ledger, &base_name, build_count);
        file.save_with(&ledger, self.config.save_mode)?;
        debug!(name = %base_name, build_count, "count set");
        Ok(ledger_path)
    }

    fn lock(&self, ledger_path: &Path) -> Result<Option<LedgerLock>> {
        let lock = self
            .config
            .lock
            .as_ref()
            .map(|config| LedgerLock::acquire(ledger_path, config))
            .transpose()?;
        Ok(lock)
    }
}
