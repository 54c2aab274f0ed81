mod api;

use crate::AppState;

use gs_auth::{Claims, JwtValidator, OPERATOR_ROLE};
use gs_config::Config;
use gs_db::{Database, InstanceRecordRepository};
use gs_process::ProcessManagerFactory;
use gs_supervisor::{
    HttpStopRequester, LogNotifier, SupervisorDeps, SupervisorRegistry, SupervisorSettings,
};

use std::env;
use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

pub(crate) const JWT_SECRET: &str = "server-test-secret-at-least-32-bytes";

/// RAII guard for environment variables - automatically restores on drop
pub(crate) struct EnvGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvGuard {
    pub(crate) fn set(key: &'static str, value: &str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::set_var(key, value);
            Self { key, original }
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            match &self.original {
                Some(val) => env::set_var(self.key, val),
                None => env::remove_var(self.key),
            }
        }
    }
}

/// State backed by a registry that supervises nothing.
pub(crate) async fn empty_state(auth: bool) -> AppState {
    let database = Database::in_memory().await.unwrap();
    let deps = SupervisorDeps {
        processes: ProcessManagerFactory::default().create(None),
        store: Arc::new(InstanceRecordRepository::new(database.pool().clone())),
        notifier: Arc::new(LogNotifier),
        stop_requester: Arc::new(HttpStopRequester::new(Duration::from_secs(1)).unwrap()),
    };
    let registry =
        SupervisorRegistry::start(vec![], SupervisorSettings::from_config(&Config::default()), deps)
            .await;

    AppState {
        registry: Arc::new(registry),
        jwt_validator: auth.then(|| Arc::new(JwtValidator::with_hs256(JWT_SECRET.as_bytes()))),
    }
}

pub(crate) fn bearer(roles: &[&str]) -> String {
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

pub(crate) fn operator_bearer() -> String {
    bearer(&[OPERATOR_ROLE])
}
