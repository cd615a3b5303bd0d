//! Per-unit build stamping for Identisaurus.
//!
//! [`Stamper::stamp`] is the single entry point a build pipeline calls once
//! per compiled unit. Given the unit's source path it:
//!
//! 1. derives the base name (`src/foo.c` → `foo`) and the ledger path
//!    (`src/.identisaurus.rawr`)
//! 2. optionally takes the advisory ledger lock
//! 3. loads the ledger, bumps the unit's count, and reads it back
//! 4. composes the version string and hands it to an [`Embedder`]
//! 5. saves the ledger, only if embedding succeeded
//!
//! From a Cargo build script:
//!
//! ```no_run
//! use std::path::PathBuf;
//! use identisaurus_embed::RustSourceEmbedder;
//! use identisaurus_stamp::Stamper;
//!
//! let out = PathBuf::from(std::env::var("OUT_DIR").unwrap()).join("identisaurus.rs");
//! let mut embedder = RustSourceEmbedder::new(out);
//! Stamper::default().stamp("src/main.rs".as_ref(), &mut embedder).unwrap();
//! ```
//!
//! [`Embedder`]: identisaurus_embed::Embedder

pub mod clock;
pub mod config;
pub mod error;
pub mod paths;
pub mod stamper;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{StampConfig, DEFAULT_LEDGER_FILE_NAME};
pub use error::{Result, StampError};
pub use paths::{base_name, display_name, ledger_path};
pub use stamper::{StampOutcome, Stamper};
