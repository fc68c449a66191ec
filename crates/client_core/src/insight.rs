//! Narrative insight generation over the financial trend.

use std::sync::Arc;

use shared::domain::{FinancialRecord, InsightState};
use tokio::sync::{broadcast, Mutex};
use tracing::warn;

use crate::{InsightBackend, StateEvent};

/// How many trailing reporting periods feed the summarizer. Bounds the
/// payload sent to the external service; slicing is by sequence order, not
/// by date parsing.
pub const TREND_WINDOW: usize = 3;

/// Deterministic texts for the non-success outcomes. The insight boundary
/// resolves every call to a displayable string; raw errors never escape.
pub const MSG_NOT_CONFIGURED: &str = "AI configuration missing. Please set an API key.";
pub const MSG_NO_DATA: &str = "No financial data available to analyze.";
pub const MSG_NO_TEXT: &str = "No insight generated.";
pub const MSG_UNAVAILABLE: &str = "Unable to generate AI insight at this moment.";

struct InsightInner {
    /// Bumped per request; a late completion from a superseded request
    /// compares generations and is discarded.
    generation: u64,
    state: InsightState,
}

/// Requests a natural-language insight from the external summarizer.
///
/// Re-entrancy policy: supersede. A second request while one is outstanding
/// takes over; the earlier call still resolves for its caller, but its
/// result never overwrites the newer request's state.
pub struct InsightRequester {
    backend: Arc<dyn InsightBackend>,
    inner: Mutex<InsightInner>,
    events: broadcast::Sender<StateEvent>,
}

impl InsightRequester {
    pub fn new(backend: Arc<dyn InsightBackend>, events: broadcast::Sender<StateEvent>) -> Self {
        Self {
            backend,
            inner: Mutex::new(InsightInner {
                generation: 0,
                state: InsightState::Idle,
            }),
            events,
        }
    }

    pub async fn request_insight(&self, records: &[FinancialRecord]) -> String {
        let generation = {
            let mut inner = self.inner.lock().await;
            inner.generation += 1;
            inner.state = InsightState::Pending;
            inner.generation
        };
        let _ = self.events.send(StateEvent::InsightChanged);

        // Missing credential is a configuration state, not an error: resolve
        // deterministically without attempting any external call.
        if !self.backend.is_configured() {
            self.publish(generation, InsightState::Unavailable(MSG_NOT_CONFIGURED.into()))
                .await;
            return MSG_NOT_CONFIGURED.to_string();
        }

        // Nothing to analyze; resolve locally instead of sending an empty
        // payload to the summarizer.
        if records.is_empty() {
            self.publish(generation, InsightState::Unavailable(MSG_NO_DATA.into()))
                .await;
            return MSG_NO_DATA.to_string();
        }

        let prompt = build_prompt(records);
        let resolved = match self.backend.summarize(&prompt).await {
            Ok(text) if !text.trim().is_empty() => InsightState::Available(text),
            Ok(_) => InsightState::Unavailable(MSG_NO_TEXT.into()),
            Err(err) => {
                warn!("insight backend call failed: {err:#}");
                InsightState::Unavailable(MSG_UNAVAILABLE.into())
            }
        };

        let text = resolved
            .text()
            .unwrap_or(MSG_UNAVAILABLE)
            .to_string();
        self.publish(generation, resolved).await;
        text
    }

    pub async fn state(&self) -> InsightState {
        self.inner.lock().await.state.clone()
    }

    pub async fn reset(&self) {
        {
            let mut inner = self.inner.lock().await;
            inner.generation += 1;
            inner.state = InsightState::Idle;
        }
        let _ = self.events.send(StateEvent::InsightChanged);
    }

    async fn publish(&self, generation: u64, state: InsightState) {
        {
            let mut inner = self.inner.lock().await;
            if inner.generation != generation {
                // Superseded while in flight; drop the stale result.
                return;
            }
            inner.state = state;
        }
        let _ = self.events.send(StateEvent::InsightChanged);
    }
}

/// Renders the analyst prompt over the most recent [`TREND_WINDOW`] records.
pub fn build_prompt(records: &[FinancialRecord]) -> String {
    let start = records.len().saturating_sub(TREND_WINDOW);
    let recent = &records[start..];
    let data = serde_json::to_string(recent).unwrap_or_else(|_| "[]".to_string());

    format!(
        "Analyze the following church financial data (most recent periods):\n\
         {data}\n\n\
         Provide a 2-sentence strategic insight about the trend in tithes vs \
         offerings. Be encouraging but analytical. Use \"Tithes\" and \
         \"Offerings\" terminology."
    )
}
