//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or code
//!     → loader.rs (parse & deserialize)
//!     → MatomoConfig (plain data)
//!     → MatomoCore::new (normalize URLs, compile patterns)
//!     → shared via Arc by the middleware
//! ```
//!
//! # Design Decisions
//! - Config is immutable once handed to `MatomoCore`; no runtime reconfiguration
//! - All fields have defaults to allow minimal configs
//! - Semantic checks (empty URL, bad regex) happen in `MatomoCore::new`

pub mod loader;
pub mod schema;

pub use loader::load_config;
pub use schema::{AllowedMethods, MatomoConfig, SiteId};
