//! Run attribute recording
//!
//! Failure summaries can be pushed to the hosting monitor as key/value
//! attributes on the current run. The sink is optional; when disabled,
//! failures surface only in the log stream.

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;

use crate::common::Result;

pub(crate) const ATTR_HARD_FAILURE_STEP: &str = "hardFailureStep";
pub(crate) const ATTR_HARD_FAILURE_DESCRIPTION: &str = "hardFailureDescription";
pub(crate) const ATTR_SOFT_FAILURE_STEPS: &str = "softFailureSteps";
pub(crate) const ATTR_OPTIONAL_FAILURE_STEPS: &str = "optionalFailureSteps";

/// Records a named key/value attribute on the current run
#[async_trait]
pub trait AttributeSink: Send + Sync {
    async fn set_attribute(&self, key: &str, value: &str) -> Result<()>;
}

/// Sink that writes attributes to the log stream
#[derive(Debug, Default)]
pub struct LogAttributeSink;

#[async_trait]
impl AttributeSink for LogAttributeSink {
    async fn set_attribute(&self, key: &str, value: &str) -> Result<()> {
        info!("Run attribute {key} = {value}");
        Ok(())
    }
}

/// Sink that stores attributes in memory, for tests
#[derive(Debug, Default)]
pub struct RecordingAttributeSink {
    attributes: Mutex<Vec<(String, String)>>,
}

impl RecordingAttributeSink {
    /// Attributes recorded so far, in order
    pub fn recorded(&self) -> Vec<(String, String)> {
        self.attributes.lock().unwrap().clone()
    }
}

#[async_trait]
impl AttributeSink for RecordingAttributeSink {
    async fn set_attribute(&self, key: &str, value: &str) -> Result<()> {
        self.attributes
            .lock()
            .unwrap()
            .push((key.to_string(), value.to_string()));
        Ok(())
    }
}

/// Format a list of step numbers as a comma-joined attribute value
pub(crate) fn join_sequence(steps: &[usize]) -> String {
    steps
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_sequence() {
        assert_eq!(join_sequence(&[1, 3, 7]), "1,3,7");
        assert_eq!(join_sequence(&[2]), "2");
        assert_eq!(join_sequence(&[]), "");
    }

    #[tokio::test]
    async fn test_recording_sink_keeps_order() {
        let sink = RecordingAttributeSink::default();
        sink.set_attribute("a", "1").await.unwrap();
        sink.set_attribute("b", "2").await.unwrap();
        assert_eq!(
            sink.recorded(),
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
            ]
        );
    }
}
