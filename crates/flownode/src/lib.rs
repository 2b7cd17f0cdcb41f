//! Plugin boundary for flow-engine nodes.
//!
//! A node implements [`Node`] and embeds a [`NodeBase`], which carries its
//! identity and the host handle injected at construction. All host
//! services (routing, logging, peer subscription, persisted data) go
//! through the [`HostCallbacks`] trait; when no host is attached,
//! request-style calls return the conventional error value instead of
//! failing.

mod host;
mod info;
mod node;
mod output;

pub use host::{DataScope, HostCallbacks};
pub use info::{NodeInfo, Wire};
pub use node::{LocalRpcMethod, Node, NodeBase};
pub use output::{LogLevel, Output};
