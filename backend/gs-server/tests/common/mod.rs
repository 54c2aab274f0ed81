#![allow(dead_code)]

//! Test infrastructure for gs-server API tests

use gs_server::{AppState, build_router};

use gs_auth::{Claims, JwtValidator, OPERATOR_ROLE};
use gs_config::{Config, InstanceConfig};
use gs_core::{ExitStatus, InstanceKey, LaunchSpec};
use gs_db::{Database, InstanceRecordRepository};
use gs_process::{ExitPublisher, ExitWatch, ProcessHandle, ProcessManager, SharedProcessHandle};
use gs_supervisor::launch::{ENV_INSTANCE_KEY, ENV_SECRET_TOKEN};
use gs_supervisor::{
    HttpStopRequester, InstancePhase, InstanceSetup, InstanceStatus, LogNotifier,
    SupervisorDeps, SupervisorRegistry, SupervisorSettings, UpdateProviderFactory,
};

use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, Bytes},
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use tempfile::TempDir;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "api-test-secret-that-is-32-bytes-long";

/// A pretend server process that runs until killed.
#[derive(Debug)]
pub struct TestProcess {
    id: u32,
    exit: ExitWatch,
    publisher: ExitPublisher,
}

impl TestProcess {
    pub fn exit(&self, status: ExitStatus) {
        self.publisher.publish(status);
    }
}

#[async_trait]
impl ProcessHandle for TestProcess {
    fn describe(&self) -> String {
        format!("test process {}", self.id)
    }

    async fn kill(&self) -> gs_process::Result<()> {
        self.publisher.publish(ExitStatus::Signaled(9));
        Ok(())
    }

    async fn wait_for_exit(&self) -> ExitStatus {
        self.exit.wait().await
    }

    fn exit_status(&self) -> Option<ExitStatus> {
        self.exit.current()
    }

    async fn dump_process(&self, _path: &Path) -> gs_process::Result<()> {
        Ok(())
    }
}

/// Process manager that records launches instead of spawning.
#[derive(Default)]
pub struct TestProcesses {
    next_id: AtomicU32,
    spawned: Mutex<Vec<(Arc<TestProcess>, LaunchSpec)>>,
}

impl TestProcesses {
    pub fn spawn_count(&self, key: &str) -> usize {
        self.spawned
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, spec)| spec.env_value(ENV_INSTANCE_KEY) == Some(key))
            .count()
    }

    /// Secret handed to the latest process started for `key`.
    pub fn secret_for(&self, key: &str) -> String {
        self.spawned
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(_, spec)| spec.env_value(ENV_INSTANCE_KEY) == Some(key))
            .and_then(|(_, spec)| spec.env_value(ENV_SECRET_TOKEN).map(str::to_string))
            .expect("instance was never started")
    }
}

#[async_trait]
impl ProcessManager for TestProcesses {
    fn can_persist(&self) -> bool {
        false
    }

    async fn start_server(
        &self,
        _key: &InstanceKey,
        spec: &LaunchSpec,
    ) -> gs_process::Result<SharedProcessHandle> {
        let (exit, publisher) = ExitWatch::channel();
        let process = Arc::new(TestProcess {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            exit,
            publisher,
        });
        self.spawned
            .lock()
            .unwrap()
            .push((process.clone(), spec.clone()));
        Ok(process)
    }

    async fn try_get_persisted_server(
        &self,
        _key: &InstanceKey,
        _expected_program: &Path,
    ) -> gs_process::Result<Option<SharedProcessHandle>> {
        Ok(None)
    }

    async fn forget_persisted_server(&self, _key: &InstanceKey) -> gs_process::Result<()> {
        Ok(())
    }
}

/// Router wired to a live registry over test processes.
pub struct TestApp {
    pub router: Router,
    pub registry: Arc<SupervisorRegistry>,
    pub processes: Arc<TestProcesses>,
    _database: Database,
    _root: TempDir,
}

impl TestApp {
    pub async fn start(keys: &[&str]) -> Self {
        Self::build(keys, false).await
    }

    pub async fn start_with_auth(keys: &[&str]) -> Self {
        Self::build(keys, true).await
    }

    async fn build(keys: &[&str], auth: bool) -> Self {
        let root = TempDir::new().unwrap();
        let database = Database::in_memory().await.unwrap();
        let processes = Arc::new(TestProcesses::default());

        let setups = keys
            .iter()
            .map(|key| InstanceSetup {
                config: InstanceConfig::new(
                    InstanceKey::new(*key).unwrap(),
                    root.path().join(key).to_str().unwrap(),
                    "server",
                ),
                updates: UpdateProviderFactory::new()
                    .create(&Default::default())
                    .unwrap(),
                check_interval: None,
            })
            .collect();

        let deps = SupervisorDeps {
            processes: processes.clone(),
            store: Arc::new(InstanceRecordRepository::new(database.pool().clone())),
            notifier: Arc::new(LogNotifier),
            stop_requester: Arc::new(HttpStopRequester::new(Duration::from_secs(1)).unwrap()),
        };
        let registry = Arc::new(
            SupervisorRegistry::start(
                setups,
                SupervisorSettings::from_config(&Config::default()),
                deps,
            )
            .await,
        );

        let state = AppState {
            registry: registry.clone(),
            jwt_validator: auth.then(|| Arc::new(JwtValidator::with_hs256(JWT_SECRET.as_bytes()))),
        };

        let app = Self {
            router: build_router(state),
            registry,
            processes,
            _database: database,
            _root: root,
        };
        for key in keys {
            app.wait_for_phase(key, InstancePhase::Running).await;
        }
        app
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Bytes) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body)
    }

    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.send(request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    /// Poll until the instance reaches `phase`, panicking after two seconds.
    pub async fn wait_for_phase(&self, key: &str, phase: InstancePhase) -> InstanceStatus {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        loop {
            let status = self.registry.status(key).unwrap();
            if status.phase == phase {
                return status;
            }
            if tokio::time::Instant::now() >= deadline {
                panic!("'{key}' stuck in {:?}, expected {:?}", status.phase, phase);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Poll until `key` has been started `count` times.
    pub async fn wait_for_spawns(&self, key: &str, count: usize) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while self.processes.spawn_count(key) < count {
            if tokio::time::Instant::now() >= deadline {
                panic!(
                    "'{key}' started {} time(s), expected {count}",
                    self.processes.spawn_count(key)
                );
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn with_header(mut request: Request<Body>, name: &'static str, value: &str) -> Request<Body> {
    request
        .headers_mut()
        .insert(name, value.parse().unwrap());
    request
}

pub fn bearer(roles: &[&str]) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: "ops-1".to_string(),
        exp: now + 3600,
        iat: now,
        roles: roles.iter().map(|role| role.to_string()).collect(),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {token}")
}

pub fn operator_bearer() -> String {
    bearer(&[OPERATOR_ROLE])
}
