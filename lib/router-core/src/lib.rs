//! Core configuration model and HAProxy rendering for the service router
//!
//! This library provides:
//! - ConfigurationStore: desired listeners keyed by (IP, port), with validation
//! - Deterministic rendering of the store into an HAProxy configuration
//! - ListenerSource: the seam through which discovery feeds listener requests

pub mod error;
pub mod listener;
pub mod render;
pub mod source;
pub mod store;

pub use error::{CoreError, Result, ValidationError};
pub use listener::{ListenAddress, Listener};
pub use render::render;
pub use source::{build_configuration, BuildReport, ListenerSource, StaticListenerSource};
pub use store::{Admission, ConfigurationStore};
