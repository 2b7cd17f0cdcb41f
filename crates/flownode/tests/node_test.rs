use async_trait::async_trait;
use flownode::{DataScope, HostCallbacks, LogLevel, Node, NodeBase, NodeInfo, Output, Wire};
use flowvalue::{json, PropertyPath, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Initialize tracing for tests
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    let _ = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_test_writer()
        .try_init();
}

/// Host double recording everything the node forwards to it.
#[derive(Default)]
struct MockHost {
    log_lines: Mutex<Vec<(String, i32, String)>>,
    outputs: Mutex<Vec<(String, u32, Value)>>,
    data: Mutex<HashMap<String, Value>>,
}

impl MockHost {
    fn data_key(scope: DataScope, key: &str) -> String {
        format!("{:?}:{}", scope, key)
    }
}

impl HostCallbacks for MockHost {
    fn log(&self, node_id: &str, level: i32, message: &str) {
        self.log_lines
            .lock()
            .unwrap()
            .push((node_id.to_string(), level, message.to_string()));
    }

    fn output(&self, node_id: &str, index: u32, message: Value) {
        self.outputs
            .lock()
            .unwrap()
            .push((node_id.to_string(), index, message));
    }

    fn invoke(&self, method: &str, parameters: Vec<Value>) -> Value {
        let mut result = vec![Value::from(method)];
        result.extend(parameters);
        Value::Array(result)
    }

    fn get_data(&self, scope: DataScope, key: &str) -> Value {
        self.data
            .lock()
            .unwrap()
            .get(&Self::data_key(scope, key))
            .cloned()
            .unwrap_or(Value::Void)
    }

    fn set_data(&self, scope: DataScope, key: &str, value: Value) {
        self.data
            .lock()
            .unwrap()
            .insert(Self::data_key(scope, key), value);
    }
}

fn base_with_host(host: Arc<MockHost>) -> NodeBase {
    let mut base = NodeBase::new("/nodes/switch", "core", "switch", Some(host));
    base.set_id("n1");
    base.set_flow_id("f1");
    base
}

#[test]
fn test_identity_accessors() {
    let base = base_with_host(Arc::new(MockHost::default()));
    assert_eq!(base.path(), "/nodes/switch");
    assert_eq!(base.namespace(), "core");
    assert_eq!(base.node_type(), "switch");
    assert_eq!(base.id(), "n1");
    assert_eq!(base.flow_id(), "f1");
}

#[test]
fn test_output_forwards_with_node_id() {
    let host = Arc::new(MockHost::default());
    let base = base_with_host(host.clone());

    base.output(2, Value::from("payload"));

    let outputs = host.outputs.lock().unwrap();
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0], ("n1".to_string(), 2, Value::from("payload")));
}

#[test]
fn test_invoke_forwards_to_host() {
    let host = Arc::new(MockHost::default());
    let base = base_with_host(host);

    let result = base.invoke("listFlows", vec![Value::Integer(1)]);
    assert_eq!(
        result,
        Value::Array(vec![Value::from("listFlows"), Value::Integer(1)])
    );
    assert!(!result.is_error());
}

#[test]
fn test_missing_host_yields_error_value() {
    let base = NodeBase::new("/nodes/switch", "core", "switch", None);

    let result = base.invoke("listFlows", Vec::new());
    assert!(result.is_error());
    assert_eq!(result.fault_code(), Some(-32500));
    assert_eq!(result.fault_string(), Some("No callback method set."));

    assert!(base.get_node_data("state").is_error());
    assert!(base.get_config_parameter("n2", "topic").is_error());
    // notifications without a host are silently dropped
    base.output(0, Value::Void);
    base.set_node_data("state", Value::Integer(1));
}

#[test]
fn test_default_host_callbacks_report_no_callback() {
    struct EmptyHost;
    impl HostCallbacks for EmptyHost {}

    let base = NodeBase::new("", "core", "switch", Some(Arc::new(EmptyHost)));
    assert!(base.invoke("anything", Vec::new()).is_error());
    assert!(base.get_flow_data("key").is_error());
    // defaulted notifications are no-ops
    base.node_event("topic", Value::Void);
}

#[test]
fn test_data_scopes_are_distinct() {
    let host = Arc::new(MockHost::default());
    let base = base_with_host(host);

    base.set_node_data("key", Value::Integer(1));
    base.set_flow_data("key", Value::Integer(2));
    base.set_global_data("key", Value::Integer(3));

    assert_eq!(base.get_node_data("key"), Value::Integer(1));
    assert_eq!(base.get_flow_data("key"), Value::Integer(2));
    assert_eq!(base.get_global_data("key"), Value::Integer(3));
    assert_eq!(base.get_node_data("other"), Value::Void);
}

#[test]
fn test_local_rpc_dispatch() {
    let mut base = NodeBase::new("", "core", "config", None);
    base.register_local_rpc(
        "getValue",
        Box::new(|parameters| parameters.into_iter().next().unwrap_or(Value::Void)),
    );

    assert_eq!(
        base.call_local_rpc("getValue", vec![Value::Integer(9)]),
        Value::Integer(9)
    );

    let missing = base.call_local_rpc("unknown", Vec::new());
    assert!(missing.is_error());
    assert_eq!(missing.fault_code(), Some(-32601));
}

#[test]
fn test_logger_forwards_levels() {
    let host = Arc::new(MockHost::default());
    let out = Output::new("n1", Some(host.clone()));

    out.print_warning("watch out");
    out.print_debug("details");
    out.print_message(LogLevel::Critical, "bad");

    let lines = host.log_lines.lock().unwrap();
    assert_eq!(lines[0], ("n1".to_string(), 3, "watch out".to_string()));
    assert_eq!(lines[1], ("n1".to_string(), 5, "details".to_string()));
    assert_eq!(lines[2], ("n1".to_string(), 1, "bad".to_string()));
}

#[test]
fn test_print_ex_formats_location() {
    let host = Arc::new(MockHost::default());
    let out = Output::new("n1", Some(host.clone()));

    out.print_ex("switch.rs", 42, "input", "bad payload");
    out.print_ex("switch.rs", 43, "input", "");

    let lines = host.log_lines.lock().unwrap();
    assert_eq!(lines[0].1, 2);
    assert_eq!(
        lines[0].2,
        "Error in file switch.rs line 42 in function input: bad payload"
    );
    assert_eq!(
        lines[1].2,
        "Unknown error in file switch.rs line 43 in function input."
    );
}

#[test]
fn test_node_info_serializes_through_the_codec() {
    let info = NodeInfo {
        id: "n1".to_string(),
        flow_id: "f1".to_string(),
        namespace: "core".to_string(),
        node_type: "switch".to_string(),
        info: Value::Void,
        wires_in: vec![vec![Wire {
            id: "n0".to_string(),
            port: 0,
        }]],
        wires_out: vec![vec![Wire {
            id: "n2".to_string(),
            port: 1,
        }]],
    };

    assert_eq!(
        json::to_string(&info.serialize()),
        "{\"flowId\":\"f1\",\"id\":\"n1\",\"info\":null,\"namespace\":\"core\",\
         \"type\":\"switch\",\"wiresIn\":[[{\"id\":\"n0\",\"port\":0}]],\
         \"wiresOut\":[[{\"id\":\"n2\",\"port\":1}]]}"
    );
}

#[test]
fn test_node_info_loads_from_frontend_json() {
    let text = "{\"id\":\"n1\",\"flowId\":\"f1\",\"namespace\":\"core\",\
                \"type\":\"debug\",\"info\":{\"active\":true},\
                \"wiresIn\":[],\"wiresOut\":[[{\"id\":\"n3\",\"port\":0}]]}";
    let info: NodeInfo = serde_json::from_str(text).unwrap();

    assert_eq!(info.node_type, "debug");
    assert_eq!(info.flow_id, "f1");
    assert_eq!(
        info.info.as_struct().and_then(|map| map.get("active")),
        Some(&Value::Bool(true))
    );
    assert_eq!(info.wires_out[0][0].id, "n3");
}

/// Routes the configured property of each incoming message to output 0.
struct RouteNode {
    base: NodeBase,
    route: PropertyPath,
}

#[async_trait]
impl Node for RouteNode {
    fn node_type(&self) -> &str {
        self.base.node_type()
    }

    async fn input(&mut self, _info: &NodeInfo, _index: u32, message: Value) {
        match self.route.find(&message) {
            Some(value) => self.base.output(0, value.clone()),
            None => self.base.out().print_debug("no matching property"),
        }
    }
}

#[tokio::test]
async fn test_node_routes_message_property() {
    init_tracing();

    let host = Arc::new(MockHost::default());
    let mut base = NodeBase::new("/nodes/route", "core", "route", Some(host.clone()));
    base.set_id("n1");
    let mut node = RouteNode {
        base,
        route: PropertyPath::parse("payload.items[1]"),
    };

    let message: Value =
        serde_json::from_str("{\"payload\":{\"items\":[\"a\",\"b\"]}}").unwrap();
    node.input(&NodeInfo::default(), 0, message).await;

    // default lifecycle hooks are usable as-is
    assert!(node.init(&NodeInfo::default()).await);
    assert!(node.start().await);
    let unknown = node.invoke_local("missing", Vec::new()).await;
    assert_eq!(unknown.fault_code(), Some(-32601));

    let outputs = host.outputs.lock().unwrap();
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].2, Value::from("b"));
}
