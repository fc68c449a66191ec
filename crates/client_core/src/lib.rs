//! Application state coordinator for the church administration dashboard.
//!
//! Owns session lifecycle, persisted presentation preferences, and the
//! asynchronous fetch/insight orchestration feeding the dashboard view. The
//! presentation layer consumes snapshots and mutators and listens on the
//! broadcast event channel; it never holds its own copy of this state.

use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::{
        ActionItem, ColorVariant, DisplayMode, FetchState, FinancialRecord, Identity, InsightState,
        Preferences, TenantId,
    },
    error::AuthError,
};
use storage::KeyValueStore;
use tokio::sync::broadcast;
use tracing::info;

pub mod backend;
pub mod dashboard;
pub mod insight;
pub mod mock;
pub mod preferences;
pub mod session;

pub use dashboard::{DashboardCollection, DataOrchestrator};
pub use insight::InsightRequester;
pub use preferences::{EffectiveTheme, PreferenceError, PresentationController};
pub use session::{SessionManager, SessionState};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Change notifications from the state container to the presentation layer.
/// Subscribers re-read the relevant snapshot; events carry no stale payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum StateEvent {
    SessionChanged,
    PreferencesChanged,
    DashboardChanged(DashboardCollection),
    InsightChanged,
}

/// Authentication backend seam.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, email: &str) -> Result<(String, Identity), AuthError>;
    /// Resolves a persisted session token. `None` means the token is unknown
    /// or expired, which is not an error.
    async fn resolve(&self, token: &str) -> Result<Option<Identity>, AuthError>;
}

/// Tenant-scoped dashboard data backend seam.
#[async_trait]
pub trait TenantDataBackend: Send + Sync {
    async fn fetch_financials(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<FinancialRecord>, shared::error::FetchError>;
    async fn fetch_action_items(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<ActionItem>, shared::error::FetchError>;
}

/// External text-insight backend seam. A missing credential is a distinct
/// non-error condition probed through `is_configured`.
#[async_trait]
pub trait InsightBackend: Send + Sync {
    fn is_configured(&self) -> bool;
    async fn summarize(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Read-only ambient signal: does the host system prefer a dark appearance?
/// Consulted only when no persisted display mode exists.
pub trait SystemAppearance: Send + Sync {
    fn prefers_dark(&self) -> bool;
}

pub struct FixedSystemAppearance(pub bool);

impl SystemAppearance for FixedSystemAppearance {
    fn prefers_dark(&self) -> bool {
        self.0
    }
}

pub struct MissingAuthBackend;

#[async_trait]
impl AuthBackend for MissingAuthBackend {
    async fn login(&self, _email: &str) -> Result<(String, Identity), AuthError> {
        Err(AuthError::Backend("auth backend unavailable".to_string()))
    }

    async fn resolve(&self, _token: &str) -> Result<Option<Identity>, AuthError> {
        Err(AuthError::Backend("auth backend unavailable".to_string()))
    }
}

pub struct MissingTenantDataBackend;

#[async_trait]
impl TenantDataBackend for MissingTenantDataBackend {
    async fn fetch_financials(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<FinancialRecord>, shared::error::FetchError> {
        Err(shared::error::FetchError(format!(
            "tenant data backend unavailable for tenant {tenant_id}"
        )))
    }

    async fn fetch_action_items(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<ActionItem>, shared::error::FetchError> {
        Err(shared::error::FetchError(format!(
            "tenant data backend unavailable for tenant {tenant_id}"
        )))
    }
}

pub struct MissingInsightBackend;

#[async_trait]
impl InsightBackend for MissingInsightBackend {
    fn is_configured(&self) -> bool {
        false
    }

    async fn summarize(&self, _prompt: &str) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("insight backend unavailable"))
    }
}

/// The single owned state container handed to the presentation layer.
/// Created at startup, disposed at shutdown; no ambient singletons.
pub struct DashboardController {
    session: SessionManager,
    presentation: PresentationController,
    orchestrator: DataOrchestrator,
    insight: InsightRequester,
    events: broadcast::Sender<StateEvent>,
}

impl DashboardController {
    pub fn new(
        auth: Arc<dyn AuthBackend>,
        data: Arc<dyn TenantDataBackend>,
        insight: Arc<dyn InsightBackend>,
        store: Arc<dyn KeyValueStore>,
        system: Arc<dyn SystemAppearance>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            session: SessionManager::new(auth, Arc::clone(&store), events.clone()),
            presentation: PresentationController::new(store, system, events.clone()),
            orchestrator: DataOrchestrator::new(data, events.clone()),
            insight: InsightRequester::new(insight, events.clone()),
            events,
        })
    }

    /// Controller with every collaborator absent. Useful before real
    /// backends are wired; operations fail gracefully instead of panicking.
    pub fn new_detached(store: Arc<dyn KeyValueStore>) -> Arc<Self> {
        Self::new(
            Arc::new(MissingAuthBackend),
            Arc::new(MissingTenantDataBackend),
            Arc::new(MissingInsightBackend),
            store,
            Arc::new(FixedSystemAppearance(false)),
        )
    }

    /// Startup sequence: preferences first (synchronous from the caller's
    /// point of view), then session resolution, then — only with an active
    /// tenant — the dashboard load. The orchestrator is never invoked
    /// unauthenticated.
    pub async fn initialize(&self) {
        let prefs = self.presentation.load_initial().await;
        info!(
            mode = prefs.mode.as_str(),
            variant = prefs.variant.as_str(),
            "presentation preferences applied"
        );

        if let Some(identity) = self.session.resolve_session().await {
            info!(tenant = %identity.tenant_id, user = %identity.id, "session restored");
            self.orchestrator
                .load_dashboard(identity.tenant_id.clone())
                .await;
        }
    }

    pub async fn login(&self, email: &str) -> Result<Identity, AuthError> {
        let identity = self.session.login(email).await?;
        self.orchestrator
            .load_dashboard(identity.tenant_id.clone())
            .await;
        Ok(identity)
    }

    pub async fn logout(&self) {
        self.session.logout().await;
        self.orchestrator.reset().await;
        self.insight.reset().await;
    }

    /// Explicit re-fetch of both collections for the active tenant. Retry
    /// after a failed fetch goes through here; nothing retries on its own.
    pub async fn refresh_dashboard(&self) -> Result<(), AuthError> {
        let Some(identity) = self.session.active_identity().await else {
            return Err(AuthError::Backend(
                "no active session to refresh".to_string(),
            ));
        };
        self.orchestrator.load_dashboard(identity.tenant_id).await;
        Ok(())
    }

    /// Generates the narrative insight from the current financial snapshot.
    /// Always resolves to displayable text; see `InsightRequester`.
    pub async fn request_insight(&self) -> String {
        let records = self
            .orchestrator
            .financials()
            .await
            .ready()
            .cloned()
            .unwrap_or_default();
        self.insight.request_insight(&records).await
    }

    pub async fn toggle_mode(&self) -> DisplayMode {
        self.presentation.toggle_mode().await
    }

    pub async fn set_variant(&self, variant: ColorVariant) {
        self.presentation.set_variant(variant).await;
    }

    pub async fn set_variant_name(&self, name: &str) -> Result<ColorVariant, PreferenceError> {
        self.presentation.set_variant_name(name).await
    }

    pub async fn session_state(&self) -> SessionState {
        self.session.state().await
    }

    pub async fn active_identity(&self) -> Option<Identity> {
        self.session.active_identity().await
    }

    pub async fn preferences(&self) -> Preferences {
        self.presentation.preferences().await
    }

    pub async fn effective_theme(&self) -> EffectiveTheme {
        self.presentation.effective_theme().await
    }

    pub async fn financials(&self) -> FetchState<Vec<FinancialRecord>> {
        self.orchestrator.financials().await
    }

    pub async fn action_items(&self) -> FetchState<Vec<ActionItem>> {
        self.orchestrator.action_items().await
    }

    pub async fn insight(&self) -> InsightState {
        self.insight.state().await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
