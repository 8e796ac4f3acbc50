//! Vanilla flavor plugin
//!
//! The flavor itself plus the pieces needed to run it as a standalone
//! plugin process: JSON-RPC server, configuration, logging and shutdown.

pub mod config;
pub mod error;
pub mod logging;
pub mod rpc;
pub mod shutdown;
pub mod vanilla;

pub use vanilla::{new_plugin, Spec, VanillaFlavor};
