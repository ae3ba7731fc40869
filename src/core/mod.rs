//! Core module - configuration shared by the library and the `xfpgn` binary
//!
//! # Resources
//!
//! - [`NotationSettings`] - Output preferences (line width, tag block, default result)
//!
//! Settings live as JSON in the platform configuration directory; see
//! [`settings_persistence`] for the lookup and fallback rules.

pub mod error;
pub mod settings_persistence;

pub use error::{CoreError, CoreResult};
pub use settings_persistence::{
    load_settings, read_settings, save_settings, settings_path, NotationSettings,
};
