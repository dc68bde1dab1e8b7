//! Sample taxonomy and Prometheus text rendering.
//!
//! A collection cycle produces a `Vec<Sample>`; [`render`] turns it into the
//! text exposition format through a registry that lives only for that cycle,
//! so nothing is shared between overlapping scrapes.

use prometheus::{Encoder, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};

use crate::api::{ConnectorStatus, TaskInfo};

pub const NAMESPACE: &str = "kafka_connect";

/// Lifecycle state of a connector task, as far as the exported code cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Running,
    Unassigned,
    Paused,
    /// `FAILED`, `RESTARTING`, empty, or anything the API may add later.
    Other,
}

impl TaskState {
    /// Case-insensitive mapping of the API's free-text state.
    pub fn from_api(state: &str) -> Self {
        match state.to_lowercase().as_str() {
            "running" => Self::Running,
            "unassigned" => Self::Unassigned,
            "paused" => Self::Paused,
            _ => Self::Other,
        }
    }

    /// Numeric value exported in `kafka_connect_connector_tasks_state`.
    pub fn code(self) -> i64 {
        match self {
            Self::Other => 0,
            Self::Running => 1,
            Self::Unassigned => 2,
            Self::Paused => 3,
        }
    }
}

/// Returns true when a connector state case-folds to `running`.
pub fn is_running(state: &str) -> bool {
    state.to_lowercase() == "running"
}

/// One exported value, with its labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sample {
    Up(bool),
    ConnectorsCount(usize),
    ConnectorRunning {
        connector: String,
        state: String,
        worker: String,
        running: bool,
    },
    TaskState {
        connector: String,
        state: String,
        worker_id: String,
        id: u32,
        code: TaskState,
    },
}

impl Sample {
    pub fn connector_running(status: &ConnectorStatus) -> Self {
        Self::ConnectorRunning {
            connector: status.name.clone(),
            state: status.connector.state.to_lowercase(),
            worker: status.connector.worker_id.clone(),
            running: is_running(&status.connector.state),
        }
    }

    pub fn task_state(connector: &str, task: &TaskInfo) -> Self {
        Self::TaskState {
            connector: connector.to_owned(),
            state: task.state.to_lowercase(),
            worker_id: task.worker_id.clone(),
            id: task.id,
            code: TaskState::from_api(&task.state),
        }
    }

    /// Fully qualified metric name this sample is exported under.
    pub fn metric_name(&self) -> &'static str {
        match self {
            Self::Up(_) => "kafka_connect_up",
            Self::ConnectorsCount(_) => "kafka_connect_connectors_count",
            Self::ConnectorRunning { .. } => "kafka_connect_connector_state_running",
            Self::TaskState { .. } => "kafka_connect_connector_tasks_state",
        }
    }

    pub fn value(&self) -> i64 {
        match self {
            Self::Up(up) => i64::from(*up),
            Self::ConnectorsCount(n) => i64::try_from(*n).unwrap_or(i64::MAX),
            Self::ConnectorRunning { running, .. } => i64::from(*running),
            Self::TaskState { code, .. } => code.code(),
        }
    }
}

/// Metric handles for a single cycle.
struct Families {
    registry: Registry,
    up: IntGauge,
    connectors_count: IntGauge,
    connector_running: IntGaugeVec,
    tasks_state: IntGaugeVec,
}

impl Families {
    fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let up = IntGauge::with_opts(
            Opts::new("up", "was the last scrape of kafka connect successful?")
                .namespace(NAMESPACE),
        )?;
        let connectors_count = IntGauge::with_opts(
            Opts::new("count", "number of deployed connectors")
                .namespace(NAMESPACE)
                .subsystem("connectors"),
        )?;
        let connector_running = IntGaugeVec::new(
            Opts::new("state_running", "is the connector running?")
                .namespace(NAMESPACE)
                .subsystem("connector"),
            &["connector", "state", "worker"],
        )?;
        let tasks_state = IntGaugeVec::new(
            Opts::new(
                "tasks_state",
                "the state of tasks. 0-failed, 1-running, 2-unassigned, 3-paused",
            )
            .namespace(NAMESPACE)
            .subsystem("connector"),
            &["connector", "state", "worker_id", "id"],
        )?;

        // Vectors without children are pruned on gather, so only the plain
        // gauges need conditional registration.
        registry.register(Box::new(connector_running.clone()))?;
        registry.register(Box::new(tasks_state.clone()))?;

        Ok(Self {
            registry,
            up,
            connectors_count,
            connector_running,
            tasks_state,
        })
    }

    fn record(&self, sample: &Sample) -> prometheus::Result<()> {
        match sample {
            Sample::Up(_) => {
                self.registry.register(Box::new(self.up.clone()))?;
                self.up.set(sample.value());
                Ok(())
            }
            Sample::ConnectorsCount(_) => {
                self.registry
                    .register(Box::new(self.connectors_count.clone()))?;
                self.connectors_count.set(sample.value());
                Ok(())
            }
            Sample::ConnectorRunning {
                connector,
                state,
                worker,
                ..
            } => {
                self.connector_running
                    .get_metric_with_label_values(&[
                        connector.as_str(),
                        state.as_str(),
                        worker.as_str(),
                    ])?
                    .set(sample.value());
                Ok(())
            }
            Sample::TaskState {
                connector,
                state,
                worker_id,
                id,
                ..
            } => {
                let id = id.to_string();
                self.tasks_state
                    .get_metric_with_label_values(&[
                        connector.as_str(),
                        state.as_str(),
                        worker_id.as_str(),
                        id.as_str(),
                    ])?
                    .set(sample.value());
                Ok(())
            }
        }
    }
}

/// Encodes a sample set in the Prometheus text format.
///
/// Only families that appear in `samples` are written, so a failed listing
/// renders `kafka_connect_up 0` and nothing else.
pub fn render(samples: &[Sample]) -> prometheus::Result<Vec<u8>> {
    let families = Families::new()?;
    for sample in samples {
        match families.record(sample) {
            Ok(()) => {}
            // Repeated top-level gauge; the first value wins.
            Err(prometheus::Error::AlreadyReg) => {
                tracing::warn!(metric = sample.metric_name(), "duplicate sample dropped");
            }
            Err(e) => return Err(e),
        }
    }

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&families.registry.gather(), &mut buffer)?;
    Ok(buffer)
}

/// Content type of the bodies produced by [`render`].
pub fn content_type() -> String {
    TextEncoder::new().format_type().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ConnectorInfo;

    #[test]
    fn task_state_mapping_is_case_insensitive() {
        for state in ["Running", "RUNNING", "running"] {
            assert_eq!(TaskState::from_api(state).code(), 1, "{state}");
        }
        assert_eq!(TaskState::from_api("Unassigned").code(), 2);
        assert_eq!(TaskState::from_api("PAUSED").code(), 3);
    }

    #[test]
    fn unknown_task_states_fall_back_to_zero() {
        for state in ["failed", "FAILED", "", "foo", "restarting"] {
            assert_eq!(TaskState::from_api(state), TaskState::Other, "{state}");
            assert_eq!(TaskState::from_api(state).code(), 0);
        }
    }

    #[test]
    fn connector_running_mapping() {
        assert!(is_running("RUNNING"));
        assert!(is_running("Running"));
        assert!(!is_running("PAUSED"));
        assert!(!is_running("FAILED"));
        assert!(!is_running(""));
    }

    #[test]
    fn samples_keep_the_state_label_lowercased_verbatim() {
        let status = ConnectorStatus {
            name: "jdbc".into(),
            connector: ConnectorInfo {
                state: "RESTARTING".into(),
                worker_id: "w1:8083".into(),
            },
            tasks: vec![TaskInfo {
                id: 4,
                state: "Failed".into(),
                worker_id: "w2:8083".into(),
            }],
        };

        assert_eq!(
            Sample::connector_running(&status),
            Sample::ConnectorRunning {
                connector: "jdbc".into(),
                state: "restarting".into(),
                worker: "w1:8083".into(),
                running: false,
            }
        );
        let task = Sample::task_state(&status.name, &status.tasks[0]);
        assert_eq!(task.value(), 0);
        assert!(matches!(task, Sample::TaskState { ref state, id: 4, .. } if state == "failed"));
    }

    #[test]
    fn render_down_only_emits_up() {
        let text = String::from_utf8(render(&[Sample::Up(false)]).unwrap()).unwrap();
        assert!(text.contains("kafka_connect_up 0"));
        assert!(!text.contains("kafka_connect_connectors_count"));
        assert!(!text.contains("kafka_connect_connector_state_running"));
        assert!(!text.contains("kafka_connect_connector_tasks_state"));
    }

    #[test]
    fn render_full_cycle() {
        let samples = vec![
            Sample::Up(true),
            Sample::ConnectorsCount(1),
            Sample::ConnectorRunning {
                connector: "test-changesets".into(),
                state: "running".into(),
                worker: "kafka-connect:8083".into(),
                running: true,
            },
            Sample::TaskState {
                connector: "test-changesets".into(),
                state: "paused".into(),
                worker_id: "kafka-connect:8083".into(),
                id: 0,
                code: TaskState::Paused,
            },
        ];

        let text = String::from_utf8(render(&samples).unwrap()).unwrap();
        assert!(text.contains("# TYPE kafka_connect_up gauge"));
        assert!(text.contains("kafka_connect_up 1"));
        assert!(text.contains("kafka_connect_connectors_count 1"));
        assert!(text.contains(
            r#"kafka_connect_connector_state_running{connector="test-changesets",state="running",worker="kafka-connect:8083"} 1"#
        ));
        assert!(text.contains(
            r#"kafka_connect_connector_tasks_state{connector="test-changesets",id="0",state="paused",worker_id="kafka-connect:8083"} 3"#
        ));
    }

    #[test]
    fn render_keeps_first_duplicate_top_level_gauge() {
        let text =
            String::from_utf8(render(&[Sample::Up(true), Sample::Up(false)]).unwrap()).unwrap();
        assert!(text.contains("kafka_connect_up 1"));
        assert!(!text.contains("kafka_connect_up 0"));
    }
}
