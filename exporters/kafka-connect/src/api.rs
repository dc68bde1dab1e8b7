//! Payloads returned by the Kafka Connect REST API.

use serde::Deserialize;

/// Body of `GET /connectors`.
pub type ConnectorList = Vec<String>;

/// Body of `GET /connectors/{name}/status`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConnectorStatus {
    pub name: String,
    pub connector: ConnectorInfo,
    pub tasks: Vec<TaskInfo>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConnectorInfo {
    pub state: String,
    // Missing while a connector is being (re)assigned.
    #[serde(default)]
    pub worker_id: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TaskInfo {
    pub id: u32,
    pub state: String,
    #[serde(default)]
    pub worker_id: String,
}
