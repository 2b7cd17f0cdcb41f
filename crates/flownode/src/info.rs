use flowvalue::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One connection endpoint: the target node and its input port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wire {
    pub id: String,
    pub port: u32,
}

/// Wiring and configuration record for one node instance, as loaded from
/// the frontend's flow description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    pub id: String,
    pub flow_id: String,
    pub namespace: String,
    #[serde(rename = "type")]
    pub node_type: String,
    /// Node configuration as entered in the editor.
    #[serde(default)]
    pub info: Value,
    /// Wires feeding each input port, outer index = port.
    #[serde(default)]
    pub wires_in: Vec<Vec<Wire>>,
    /// Wires leaving each output port, outer index = port.
    #[serde(default)]
    pub wires_out: Vec<Vec<Wire>>,
}

impl NodeInfo {
    /// Renders the record as a value tree for transport through the codec.
    pub fn serialize(&self) -> Value {
        let mut map = BTreeMap::new();
        map.insert("id".to_string(), Value::from(self.id.as_str()));
        map.insert("flowId".to_string(), Value::from(self.flow_id.as_str()));
        map.insert("namespace".to_string(), Value::from(self.namespace.as_str()));
        map.insert("type".to_string(), Value::from(self.node_type.as_str()));
        map.insert("info".to_string(), self.info.clone());
        map.insert("wiresIn".to_string(), serialize_wires(&self.wires_in));
        map.insert("wiresOut".to_string(), serialize_wires(&self.wires_out));
        Value::Struct(map)
    }
}

fn serialize_wires(ports: &[Vec<Wire>]) -> Value {
    let mut outer = Vec::with_capacity(ports.len());
    for port in ports {
        let wires = port
            .iter()
            .map(|wire| {
                let mut entry = BTreeMap::new();
                entry.insert("id".to_string(), Value::from(wire.id.as_str()));
                entry.insert("port".to_string(), Value::from(wire.port));
                Value::Struct(entry)
            })
            .collect();
        outer.push(Value::Array(wires));
    }
    Value::Array(outer)
}
