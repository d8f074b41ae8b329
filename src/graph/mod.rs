//! Shader and geometry node-graph construction.
//!
//! [`GraphBuilder`] creates and updates nodes, interface sockets, panels and
//! links; [`catalog`] holds the per-version socket tables it draws from.

pub mod builder;
pub mod catalog;

pub use builder::{GraphBuilder, NodeParams, PanelAttrs, SocketAttrs};
