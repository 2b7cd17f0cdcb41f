use crate::host::{no_callback, DataScope, HostCallbacks};
use crate::info::NodeInfo;
use crate::output::Output;
use async_trait::async_trait;
use flowvalue::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// An RPC method a node exposes to its peers.
pub type LocalRpcMethod = Box<dyn Fn(Vec<Value>) -> Value + Send + Sync>;

/// Core trait all flow nodes implement.
///
/// Lifecycle methods run in order: `init` with the node's wiring info,
/// `start`, then `config_nodes_started` and `startup_complete` once the
/// whole flow is up. `stop` must not block; set shutdown flags there and
/// join workers in `wait_for_stop`, which runs serially for all nodes.
#[async_trait]
pub trait Node: Send + Sync {
    /// Type identifier within its namespace (e.g. "switch", "http-in").
    fn node_type(&self) -> &str;

    async fn init(&mut self, _info: &NodeInfo) -> bool {
        true
    }

    async fn start(&mut self) -> bool {
        true
    }

    /// Mustn't block.
    async fn stop(&mut self) {}

    /// Join worker tasks here; keep the wait short.
    async fn wait_for_stop(&mut self) {}

    /// Mustn't block.
    async fn config_nodes_started(&mut self) {}

    /// Mustn't block.
    async fn startup_complete(&mut self) {}

    /// Handles a message arriving on the input port `index`. Mustn't
    /// block for long; offload heavy work to a task.
    async fn input(&mut self, _info: &NodeInfo, _index: u32, _message: Value) {}

    /// A subscribed peer variable changed.
    async fn variable_event(&mut self, _peer_id: u64, _channel: i32, _variable: &str, _value: Value) {
    }

    /// The frontend changed a node-scoped variable.
    async fn set_node_variable(&mut self, _variable: &str, _value: Value) {}

    fn get_config_parameter_incoming(&self, _name: &str) -> Value {
        Value::Void
    }

    /// Executes a local RPC method; implementations usually delegate to
    /// [`NodeBase::call_local_rpc`].
    async fn invoke_local(&self, _method: &str, _parameters: Vec<Value>) -> Value {
        Value::error(-32601, "Requested method not found.")
    }
}

/// Common state shared by node implementations: identity, the injected
/// host handle and the forwarding helpers that talk to it.
///
/// Every request-style forwarder returns the conventional error value
/// when no host is attached; callers check with
/// [`Value::is_error`](flowvalue::Value::is_error).
pub struct NodeBase {
    path: String,
    namespace: String,
    node_type: String,
    id: String,
    flow_id: String,
    host: Option<Arc<dyn HostCallbacks>>,
    out: Output,
    local_rpc: HashMap<String, LocalRpcMethod>,
    input_mutex: tokio::sync::Mutex<()>,
}

impl NodeBase {
    pub fn new(
        path: impl Into<String>,
        namespace: impl Into<String>,
        node_type: impl Into<String>,
        host: Option<Arc<dyn HostCallbacks>>,
    ) -> Self {
        Self {
            path: path.into(),
            namespace: namespace.into(),
            node_type: node_type.into(),
            id: String::new(),
            flow_id: String::new(),
            out: Output::new(String::new(), host.clone()),
            host,
            local_rpc: HashMap::new(),
            input_mutex: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, value: impl Into<String>) {
        self.id = value.into();
        self.out.set_node_id(self.id.clone());
    }

    pub fn flow_id(&self) -> &str {
        &self.flow_id
    }

    pub fn set_flow_id(&mut self, value: impl Into<String>) {
        self.flow_id = value.into();
    }

    /// The node's logger.
    pub fn out(&self) -> &Output {
        &self.out
    }

    /// Serializes input processing when a node needs it.
    pub fn input_mutex(&self) -> &tokio::sync::Mutex<()> {
        &self.input_mutex
    }

    /// Registers an RPC method callable by peers through
    /// [`call_local_rpc`](NodeBase::call_local_rpc).
    pub fn register_local_rpc(&mut self, name: impl Into<String>, method: LocalRpcMethod) {
        self.local_rpc.insert(name.into(), method);
    }

    /// Dispatches a registered local RPC method; unknown names yield the
    /// conventional "method not found" error value.
    pub fn call_local_rpc(&self, method: &str, parameters: Vec<Value>) -> Value {
        match self.local_rpc.get(method) {
            Some(callback) => callback(parameters),
            None => Value::error(-32601, "Requested method not found."),
        }
    }

    pub fn log(&self, level: i32, message: &str) {
        if let Some(host) = &self.host {
            host.log(&self.id, level, message);
        }
    }

    pub fn subscribe_peer(&self, peer_id: u64, channel: i32, variable: &str) {
        if let Some(host) = &self.host {
            host.subscribe_peer(&self.id, peer_id, channel, variable);
        }
    }

    pub fn unsubscribe_peer(&self, peer_id: u64, channel: i32, variable: &str) {
        if let Some(host) = &self.host {
            host.unsubscribe_peer(&self.id, peer_id, channel, variable);
        }
    }

    /// Sends a message out of the given output port.
    pub fn output(&self, index: u32, message: Value) {
        if let Some(host) = &self.host {
            host.output(&self.id, index, message);
        }
    }

    pub fn invoke(&self, method: &str, parameters: Vec<Value>) -> Value {
        match &self.host {
            Some(host) => host.invoke(method, parameters),
            None => no_callback(),
        }
    }

    pub fn invoke_node_method(&self, node_id: &str, method: &str, parameters: Vec<Value>) -> Value {
        match &self.host {
            Some(host) => host.invoke_node_method(node_id, method, parameters),
            None => no_callback(),
        }
    }

    pub fn node_event(&self, topic: &str, value: Value) {
        if let Some(host) = &self.host {
            host.node_event(&self.id, topic, value);
        }
    }

    pub fn get_node_data(&self, key: &str) -> Value {
        self.get_data(DataScope::Node, key)
    }

    pub fn set_node_data(&self, key: &str, value: Value) {
        self.set_data(DataScope::Node, key, value);
    }

    pub fn get_flow_data(&self, key: &str) -> Value {
        self.get_data(DataScope::Flow, key)
    }

    pub fn set_flow_data(&self, key: &str, value: Value) {
        self.set_data(DataScope::Flow, key, value);
    }

    pub fn get_global_data(&self, key: &str) -> Value {
        self.get_data(DataScope::Global, key)
    }

    pub fn set_global_data(&self, key: &str, value: Value) {
        self.set_data(DataScope::Global, key, value);
    }

    fn get_data(&self, scope: DataScope, key: &str) -> Value {
        match &self.host {
            Some(host) => host.get_data(scope, key),
            None => no_callback(),
        }
    }

    fn set_data(&self, scope: DataScope, key: &str, value: Value) {
        if let Some(host) = &self.host {
            host.set_data(scope, key, value);
        }
    }

    pub fn set_internal_message(&self, message: Value) {
        if let Some(host) = &self.host {
            host.set_internal_message(&self.id, message);
        }
    }

    pub fn get_config_parameter(&self, node_id: &str, name: &str) -> Value {
        match &self.host {
            Some(host) => host.get_config_parameter(node_id, name),
            None => no_callback(),
        }
    }
}
