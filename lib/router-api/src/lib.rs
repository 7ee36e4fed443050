//! Service router API types
//!
//! This library defines the declarative values fed into the configuration compiler:
//! - Backend / BackendServer: pools of servers and their load-balancing/TLS policy
//! - ListenerRequest: a desired (IP, port, hostname) route to a backend
//! - Mode: protocol handling for a listener

pub mod backend;
pub mod listener;

pub use backend::{Backend, BackendServer, NodeAddresses};
pub use listener::{ListenerRequest, Mode, UnknownMode};
