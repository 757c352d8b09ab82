//! API request/response types

use crate::manager::{EngineInfoView, StatusView};
use serde::{Deserialize, Serialize};

/// Body for `POST /start`. The whole body is optional.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StartRequest {
    /// Image to run; the manager's default image when absent
    #[serde(default)]
    pub image: Option<String>,
}

/// Envelope returned by `/start` and `/stop`.
#[derive(Debug, Serialize, Deserialize)]
pub struct OpResponse {
    pub success: bool,
    pub message: String,
    pub status: StatusView,
}

/// Wrapper for `/engine-info`.
pub type EngineInfoResponse = EngineInfoView;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_status_serializes_to_running_false_only() {
        let status = StatusView {
            running: false,
            container_id: None,
            status: None,
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json, serde_json::json!({"running": false}));
    }

    #[test]
    fn active_status_carries_id_and_engine_status() {
        let status = StatusView {
            running: true,
            container_id: Some("0123456789ab".to_string()),
            status: Some("running".to_string()),
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "running": true,
                "container_id": "0123456789ab",
                "status": "running",
            })
        );
    }

    #[test]
    fn start_request_accepts_empty_and_image_bodies() {
        let request: StartRequest = serde_json::from_str("{}").unwrap();
        assert!(request.image.is_none());

        let request: StartRequest = serde_json::from_str(r#"{"image": "nginx"}"#).unwrap();
        assert_eq!(request.image.as_deref(), Some("nginx"));
    }

    #[test]
    fn disconnected_engine_info_omits_version_and_counts() {
        let info = EngineInfoView {
            connected: false,
            engine_version: None,
            containers_running: None,
            containers_total: None,
            error: Some("no daemon".to_string()),
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"connected": false, "error": "no daemon"})
        );
    }
}
