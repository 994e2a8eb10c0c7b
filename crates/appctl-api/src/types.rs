//! Wire types returned by the platform API.

use serde::{Deserialize, Serialize};

/// Resource usage of a single container at the time of the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerStat {
    /// Container identifier, e.g. `web-1`.
    pub id: String,
    /// CPU usage in percent.
    #[serde(default)]
    pub cpu_usage: i64,
    /// Memory in use, in bytes.
    #[serde(default)]
    pub memory_usage: u64,
    /// Memory limit, in bytes.
    #[serde(default)]
    pub memory_limit: u64,
    /// Swap in use, in bytes.
    #[serde(default)]
    pub swap_usage: u64,
    /// Swap limit, in bytes.
    #[serde(default)]
    pub swap_limit: u64,
    /// Highest memory usage observed by the platform, in bytes.
    #[serde(default)]
    pub highest_memory_usage: u64,
    /// Highest swap usage observed by the platform, in bytes.
    #[serde(default)]
    pub highest_swap_usage: u64,
}

/// Response envelope of the stats endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStats {
    /// One entry per running container.
    #[serde(default)]
    pub stats: Vec<ContainerStat>,
}

impl AppStats {
    /// Look up the stats of one container.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ContainerStat> {
        self.stats.iter().find(|s| s.id == id)
    }

    /// Whether the application has no running container.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_stats_envelope() {
        let body = r#"{
            "stats": [
                {
                    "id": "web-1",
                    "cpu_usage": 12,
                    "memory_usage": 104857600,
                    "memory_limit": 536870912,
                    "swap_usage": 0,
                    "swap_limit": 536870912,
                    "highest_memory_usage": 209715200,
                    "highest_swap_usage": 1024
                }
            ]
        }"#;

        let stats: AppStats = serde_json::from_str(body).expect("valid json");
        assert_eq!(stats.stats.len(), 1);
        let web = stats.get("web-1").expect("web-1 present");
        assert_eq!(web.cpu_usage, 12);
        assert_eq!(web.memory_limit, 536_870_912);
        assert_eq!(web.highest_swap_usage, 1024);
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let stats: AppStats =
            serde_json::from_str(r#"{"stats":[{"id":"worker-1"}]}"#).expect("valid json");
        let worker = stats.get("worker-1").expect("worker-1 present");
        assert_eq!(worker.cpu_usage, 0);
        assert_eq!(worker.swap_limit, 0);
    }

    #[test]
    fn missing_envelope_is_empty() {
        let stats: AppStats = serde_json::from_str("{}").expect("valid json");
        assert!(stats.is_empty());
        assert!(stats.get("web-1").is_none());
    }
}
