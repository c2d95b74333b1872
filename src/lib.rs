//! # Perch
//!
//! An embedded, in-memory key-value data engine with Redis-shaped
//! semantics: strings with expiry, lists, sets, sorted sets, hashes, a
//! geospatial index, a HyperLogLog cardinality estimator, and atomic
//! batched operations.
//!
//! Perch is a library, not a server; there is no wire protocol and no
//! network surface. A command-dispatch layer (or a test) constructs an
//! [`Engine`] and calls its typed methods:
//!
//! ```no_run
//! # async fn demo() -> perch::EngineResult<()> {
//! use perch::{Config, Engine};
//! use std::time::Duration;
//!
//! let engine = Engine::new(Config::default());
//! engine.set_ex("greeting", "hello", Duration::from_secs(3)).await?;
//! assert_eq!(engine.get("greeting").await?, Some("hello".to_string()));
//! # Ok(())
//! # }
//! ```
//!
//! Misses (absent or expired keys) come back as `None` or empty
//! collections; only type mismatches, unknown geo members, and malformed
//! arguments are errors.

pub mod clock;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod store;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use command::batch::BatchPolicy;
pub use command::{Command, Output};
pub use config::Config;
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use types::geo::Unit;
