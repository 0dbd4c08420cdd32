//! Shared application state for the csrhub gateway.
//!
//! Built once from config: compiles the policy table, seeds the store with
//! the configured accounts, and registers their bearer tokens.

use std::sync::Arc;

use csrhub_core::error::{CsrError, Result};
use csrhub_core::model::{Caller, EntityKind, Operation, Record, User};
use csrhub_core::policy::PolicyEngine;

use crate::config::AppConfig;
use crate::identity::{IdentityProvider, StaticTokenIdentity};
use crate::obs::GatewayMetrics;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: AppConfig,
    store: Store,
    policy: PolicyEngine,
    identity: Arc<dyn IdentityProvider>,
    metrics: GatewayMetrics,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: AppConfig) -> Result<Self> {
        // 1) Compile the policy table
        let table = cfg.policy.compile().map_err(|e| {
            CsrError::BadRequest(format!("policy compile failed: {e}"))
        })?;
        let policy = PolicyEngine::new(table);

        // 2) Seed configured accounts and their tokens
        let store = Store::new();
        let tokens = Arc::new(StaticTokenIdentity::new());
        for seed in &cfg.users {
            let user = store.users.try_insert_with(|id| {
                store.claim_username(&seed.username, id)?;
                Ok(User {
                    id,
                    username: seed.username.clone(),
                    email: seed.email.clone(),
                    first_name: seed.first_name.clone(),
                    last_name: seed.last_name.clone(),
                    role: seed.role,
                    avatar: None,
                    is_superuser: seed.superuser,
                })
            })?;
            tokens.insert(seed.token.clone(), user.id);
            tracing::info!(user = %user.username, id = user.id, role = %user.role, superuser = user.is_superuser, "account seeded");
        }

        for entry in &cfg.policy.overrides {
            tracing::info!(%entry, "policy override active");
        }

        let identity: Arc<dyn IdentityProvider> = tokens;
        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                store,
                policy,
                identity,
                metrics: GatewayMetrics::default(),
            }),
        })
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.inner.cfg
    }

    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    pub fn policy(&self) -> &PolicyEngine {
        &self.inner.policy
    }

    pub fn identity(&self) -> &dyn IdentityProvider {
        self.inner.identity.as_ref()
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.inner.metrics
    }

    /// Authorize a mutation and record the decision.
    pub fn authorize<R: Record>(&self, caller: &Caller, target: Option<&R>, op: Operation) -> Result<()> {
        let allowed = self.inner.policy.authorize_mutation(caller, target, op);
        self.record_decision(R::KIND, op, allowed);
        if allowed {
            return Ok(());
        }
        tracing::debug!(caller = caller.id, kind = %R::KIND, %op, row = ?target.map(|t| t.id()), "mutation denied");
        Err(CsrError::NotAllowed(format!("{op} on {} denied", R::KIND)))
    }

    fn record_decision(&self, kind: EntityKind, op: Operation, allowed: bool) {
        let outcome = if allowed { "allow" } else { "deny" };
        self.inner.metrics.policy_decisions.inc(&[
            ("kind", kind.as_str()),
            ("op", op.as_str()),
            ("outcome", outcome),
        ]);
    }

    pub fn set_draining(&self) {
        self.inner.metrics.set_draining();
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }

    /// Row counts per collection, exported as gauges.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        let s = &self.inner.store;
        vec![
            ("csrhub_users", s.users.len() as u64),
            ("csrhub_projects", s.projects.len() as u64),
            ("csrhub_reports", s.reports.len() as u64),
            ("csrhub_surveys", s.surveys.len() as u64),
            ("csrhub_notifications", s.notifications.len() as u64),
            ("csrhub_requests", s.requests.len() as u64),
        ]
    }
}
