//! Tenant-scoped dashboard data orchestration with stale-response guards.

use std::sync::Arc;

use shared::domain::{ActionItem, FetchState, FinancialRecord, TenantId};
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

use crate::{StateEvent, TenantDataBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardCollection {
    Financials,
    ActionItems,
}

#[derive(Default)]
struct DashboardData {
    /// Bumped on every `load_dashboard`; completions carrying an older
    /// generation are dropped instead of overwriting current state.
    generation: u64,
    tenant: Option<TenantId>,
    financials: FetchState<Vec<FinancialRecord>>,
    actions: FetchState<Vec<ActionItem>>,
}

/// Fetches the two dashboard collections for the active tenant. The fetches
/// are independent: they complete in either order and fail independently,
/// and a failure in one never rolls back the other. Failures are terminal
/// for the attempt; retry is an explicit re-invocation by the caller.
pub struct DataOrchestrator {
    backend: Arc<dyn TenantDataBackend>,
    inner: Mutex<DashboardData>,
    events: broadcast::Sender<StateEvent>,
}

impl DataOrchestrator {
    pub fn new(backend: Arc<dyn TenantDataBackend>, events: broadcast::Sender<StateEvent>) -> Self {
        Self {
            backend,
            inner: Mutex::new(DashboardData::default()),
            events,
        }
    }

    /// Discards any prior fetch state and loads both collections for
    /// `tenant`. Returns once both attempts settle; each collection is
    /// published the moment its own fetch completes. An in-flight load whose
    /// generation was superseded (tenant switch, refresh) leaves no trace.
    pub async fn load_dashboard(&self, tenant: TenantId) {
        let generation = {
            let mut data = self.inner.lock().await;
            data.generation += 1;
            data.tenant = Some(tenant.clone());
            data.financials = FetchState::Loading;
            data.actions = FetchState::Loading;
            data.generation
        };
        let _ = self
            .events
            .send(StateEvent::DashboardChanged(DashboardCollection::Financials));
        let _ = self
            .events
            .send(StateEvent::DashboardChanged(DashboardCollection::ActionItems));
        info!(tenant = %tenant, generation, "dashboard load started");

        let financials = async {
            let result = self.backend.fetch_financials(&tenant).await;
            self.publish_financials(generation, result).await;
        };
        let actions = async {
            let result = self.backend.fetch_action_items(&tenant).await;
            self.publish_actions(generation, result).await;
        };
        tokio::join!(financials, actions);
    }

    /// Back to Idle, e.g. after logout. Also invalidates in-flight fetches.
    pub async fn reset(&self) {
        {
            let mut data = self.inner.lock().await;
            data.generation += 1;
            data.tenant = None;
            data.financials = FetchState::Idle;
            data.actions = FetchState::Idle;
        }
        let _ = self
            .events
            .send(StateEvent::DashboardChanged(DashboardCollection::Financials));
        let _ = self
            .events
            .send(StateEvent::DashboardChanged(DashboardCollection::ActionItems));
    }

    pub async fn financials(&self) -> FetchState<Vec<FinancialRecord>> {
        self.inner.lock().await.financials.clone()
    }

    pub async fn action_items(&self) -> FetchState<Vec<ActionItem>> {
        self.inner.lock().await.actions.clone()
    }

    pub async fn active_tenant(&self) -> Option<TenantId> {
        self.inner.lock().await.tenant.clone()
    }

    async fn publish_financials(
        &self,
        generation: u64,
        result: Result<Vec<FinancialRecord>, shared::error::FetchError>,
    ) {
        let mut data = self.inner.lock().await;
        if data.generation != generation {
            info!(generation, "stale financials fetch discarded");
            return;
        }
        data.financials = match result {
            Ok(records) => FetchState::Ready(records),
            Err(err) => {
                warn!(generation, "financials fetch failed: {err}");
                FetchState::Failed(err.0)
            }
        };
        drop(data);
        let _ = self
            .events
            .send(StateEvent::DashboardChanged(DashboardCollection::Financials));
    }

    async fn publish_actions(
        &self,
        generation: u64,
        result: Result<Vec<ActionItem>, shared::error::FetchError>,
    ) {
        let mut data = self.inner.lock().await;
        if data.generation != generation {
            info!(generation, "stale action-item fetch discarded");
            return;
        }
        data.actions = match result {
            Ok(items) => FetchState::Ready(items),
            Err(err) => {
                warn!(generation, "action-item fetch failed: {err}");
                FetchState::Failed(err.0)
            }
        };
        drop(data);
        let _ = self
            .events
            .send(StateEvent::DashboardChanged(DashboardCollection::ActionItems));
    }
}
