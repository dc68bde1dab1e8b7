//! Prometheus exporter for Kafka Connect.
//!
//! Every scrape of the metrics endpoint lists the connectors known to the
//! Kafka Connect REST API and exports, under the `kafka_connect` namespace:
//!
//! ```text
//! kafka_connect_up                                                  1 if the connector listing succeeded
//! kafka_connect_connectors_count                                    number of deployed connectors
//! kafka_connect_connector_state_running{connector,state,worker}     1 if the connector is running
//! kafka_connect_connector_tasks_state{connector,state,worker_id,id}  0-failed, 1-running, 2-unassigned, 3-paused
//! ```

pub mod api;
pub mod collector;
pub mod config;
pub mod error;
pub mod metrics;
pub mod server;

pub use collector::Exporter;
pub use config::Config;
pub use metrics::{Sample, TaskState};
