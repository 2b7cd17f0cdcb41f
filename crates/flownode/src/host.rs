use flowvalue::Value;

/// Scope of the host-side key/value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataScope {
    /// Private to one node instance.
    Node,
    /// Shared by all nodes of one flow.
    Flow,
    /// Shared engine-wide.
    Global,
}

/// Callbacks a hosting flow engine offers its nodes.
///
/// The host injects one implementation at node construction; nodes reach
/// it through [`NodeBase`](crate::NodeBase), which returns the
/// conventional error value when no host is attached. Every method has a
/// default, so a host only implements what it supports: notifications
/// default to no-ops and request-style methods to the "No callback method
/// set." error value, which callers check with
/// [`Value::is_error`](flowvalue::Value::is_error) rather than catching
/// anything.
pub trait HostCallbacks: Send + Sync {
    /// Writes one log line attributed to the given node.
    fn log(&self, _node_id: &str, _level: i32, _message: &str) {}

    /// Subscribes the node to a peer's variable events.
    fn subscribe_peer(&self, _node_id: &str, _peer_id: u64, _channel: i32, _variable: &str) {}

    fn unsubscribe_peer(&self, _node_id: &str, _peer_id: u64, _channel: i32, _variable: &str) {}

    /// Routes a message out of the given output port.
    fn output(&self, _node_id: &str, _index: u32, _message: Value) {}

    /// Invokes an RPC method on the host.
    fn invoke(&self, _method: &str, _parameters: Vec<Value>) -> Value {
        no_callback()
    }

    /// Invokes an RPC method exposed by another node.
    fn invoke_node_method(&self, _node_id: &str, _method: &str, _parameters: Vec<Value>) -> Value {
        no_callback()
    }

    /// Publishes an event on a topic.
    fn node_event(&self, _node_id: &str, _topic: &str, _value: Value) {}

    /// Reads from the persisted key/value store.
    fn get_data(&self, _scope: DataScope, _key: &str) -> Value {
        no_callback()
    }

    /// Writes to the persisted key/value store.
    fn set_data(&self, _scope: DataScope, _key: &str, _value: Value) {}

    /// Replaces the node's internal message shown in the frontend.
    fn set_internal_message(&self, _node_id: &str, _message: Value) {}

    /// Reads a configuration parameter of another node.
    fn get_config_parameter(&self, _node_id: &str, _name: &str) -> Value {
        no_callback()
    }
}

pub(crate) fn no_callback() -> Value {
    Value::error(-32500, "No callback method set.")
}
