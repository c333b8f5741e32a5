//! Process-level entry point: configuration, run, and the exit status.
//!
//! This is the only place that decides how the process ends. Every lower
//! layer returns its error instead of exiting.

use log::{debug, error};
use std::ffi::OsString;

use crate::configuration::config::Config;
use crate::controller::Controller;
use crate::error_handling::types::{ConfigError, ErrorClass};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// Loads the configuration from `args` and the environment, then performs a
/// full run. Returns the process exit status.
pub async fn run<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    debug!("Importing configuration");
    let config = match Config::load_from(args) {
        Ok(config) => config,
        Err(ConfigError::Arguments(e)) => {
            // clap renders its own usage message, and handles --help/--version
            let _ = e.print();
            return e.exit_code();
        }
        Err(e) => {
            error!("{}", e);
            return EXIT_FAILURE;
        }
    };

    let controller = match Controller::from_config(&config) {
        Ok(controller) => controller,
        Err(e) => {
            error!("Unable to create a controller instance: {}", e);
            return EXIT_FAILURE;
        }
    };

    execute(&controller).await
}

/// Runs `controller` once, reporting any failure through its notifier.
pub async fn execute(controller: &Controller) -> i32 {
    match controller.run().await {
        Ok(summary) => {
            debug!("Run summary: {:?}", summary);
            EXIT_SUCCESS
        }
        Err(e) => {
            controller.report_failure(&e).await;
            match e.class() {
                ErrorClass::Fatal => error!("{}", e),
                ErrorClass::Local => error!("Pruning aborted: {}", e),
            }
            EXIT_FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;
    use wiremock::matchers::{any, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VARS: [&str; 8] = [
        "DO_TOKEN",
        "DO_VOLUMES",
        "DO_SNAPSHOT_COUNT",
        "SLACK_TOKEN",
        "SLACK_CHANNEL_ID",
        "SUCCESS_COMMAND",
        "DO_API_URL",
        "SLACK_API_URL",
    ];

    // Runs the future on a fresh runtime with every snapshotter variable unset.
    fn block_on_clean_env<F: std::future::Future<Output = R>, R>(future: F) -> R {
        let unset: Vec<(&str, Option<&str>)> = VARS.iter().map(|v| (*v, None)).collect();
        temp_env::with_vars(unset, || {
            tokio::runtime::Runtime::new().unwrap().block_on(future)
        })
    }

    fn snapshot(id: &str, created_at: &str) -> serde_json::Value {
        json!({"id": id, "name": id, "created_at": created_at, "resource_id": "vol-1"})
    }

    #[test]
    #[serial]
    fn missing_configuration_makes_no_backend_call() {
        let code = block_on_clean_env(async {
            let server = MockServer::start().await;
            Mock::given(any())
                .respond_with(ResponseTemplate::new(500))
                .expect(0)
                .mount(&server)
                .await;

            let code = run([
                "snapshotter".to_string(),
                "--do-api-url".to_string(),
                server.uri(),
                "--volumes".to_string(),
                "vol-1".to_string(),
                "--snapshot-count".to_string(),
                "3".to_string(),
            ])
            .await;

            server.verify().await;
            code
        });

        // clap's status for usage errors
        assert_eq!(code, 2);
    }

    #[test]
    #[serial]
    fn full_run_against_http_collaborators() {
        let code = block_on_clean_env(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/v2/volumes/vol-1"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "volume": {"id": "vol-1", "name": "data"}
                })))
                .expect(1)
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path("/v2/volumes/vol-1/snapshots"))
                .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                    "snapshot": snapshot("new", "2024-03-03T04:00:00Z")
                })))
                .expect(1)
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/v2/volumes/vol-1/snapshots"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "snapshots": [
                        snapshot("old", "2024-03-01T04:00:00Z"),
                        snapshot("new", "2024-03-03T04:00:00Z")
                    ],
                    "links": {}
                })))
                .expect(1)
                .mount(&server)
                .await;
            Mock::given(method("DELETE"))
                .and(path("/v2/snapshots/old"))
                .respond_with(ResponseTemplate::new(204))
                .expect(1)
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path("/slack/chat.postMessage"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
                .expect(1)
                .mount(&server)
                .await;

            let code = run([
                "snapshotter".to_string(),
                "--do-token".to_string(),
                "tok".to_string(),
                "--do-api-url".to_string(),
                server.uri(),
                "--volumes".to_string(),
                "vol-1".to_string(),
                "--snapshot-count".to_string(),
                "1".to_string(),
                "--slack-token".to_string(),
                "xoxb-1".to_string(),
                "--slack-channel-id".to_string(),
                "C1".to_string(),
                "--slack-api-url".to_string(),
                format!("{}/slack", server.uri()),
            ])
            .await;

            server.verify().await;
            code
        });

        assert_eq!(code, EXIT_SUCCESS);
    }

    #[test]
    #[serial]
    fn backend_failure_is_notified_and_exits_non_zero() {
        let code = block_on_clean_env(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/v2/volumes/vol-1"))
                .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                    "id": "unauthorized",
                    "message": "Unable to authenticate you."
                })))
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path("/slack/chat.postMessage"))
                .and(wiremock::matchers::body_partial_json(json!({
                    "attachments": [{"color": "danger"}]
                })))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
                .expect(1)
                .mount(&server)
                .await;

            let code = run([
                "snapshotter".to_string(),
                "--do-token".to_string(),
                "bad".to_string(),
                "--do-api-url".to_string(),
                server.uri(),
                "--volumes".to_string(),
                "vol-1".to_string(),
                "--snapshot-count".to_string(),
                "1".to_string(),
                "--slack-token".to_string(),
                "xoxb-1".to_string(),
                "--slack-channel-id".to_string(),
                "C1".to_string(),
                "--slack-api-url".to_string(),
                format!("{}/slack", server.uri()),
            ])
            .await;

            server.verify().await;
            code
        });

        assert_eq!(code, EXIT_FAILURE);
    }

    #[test]
    #[serial]
    fn deletion_failure_exits_with_failure() {
        let code = block_on_clean_env(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/v2/volumes/vol-1"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "volume": {"id": "vol-1", "name": "data"}
                })))
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path("/v2/volumes/vol-1/snapshots"))
                .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                    "snapshot": snapshot("new", "2024-03-03T04:00:00Z")
                })))
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/v2/volumes/vol-1/snapshots"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "snapshots": [
                        snapshot("old", "2024-03-01T04:00:00Z"),
                        snapshot("new", "2024-03-03T04:00:00Z")
                    ],
                    "links": {}
                })))
                .mount(&server)
                .await;
            Mock::given(method("DELETE"))
                .and(path("/v2/snapshots/old"))
                .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                    "id": "server_error",
                    "message": "Server was unable to give you a response."
                })))
                .expect(1)
                .mount(&server)
                .await;

            let code = run([
                "snapshotter".to_string(),
                "--do-token".to_string(),
                "tok".to_string(),
                "--do-api-url".to_string(),
                server.uri(),
                "--volumes".to_string(),
                "vol-1".to_string(),
                "--snapshot-count".to_string(),
                "1".to_string(),
            ])
            .await;

            server.verify().await;
            code
        });

        assert_eq!(code, EXIT_FAILURE);
    }
}
