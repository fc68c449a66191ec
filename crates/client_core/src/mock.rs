//! Seeded in-process collaborators for demos and tests. No network involved;
//! small artificial latencies keep completion interleaving realistic.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{
    domain::{
        ActionCategory, ActionItem, ActionItemId, ActionStatus, FinancialRecord, Identity, Member,
        MemberId, MemberStatus, Role, TenantId, UserId,
    },
    error::{AuthError, FetchError},
};
use tokio::time::sleep;

use crate::{AuthBackend, InsightBackend, TenantDataBackend};

pub const MOCK_TENANT_ID: &str = "tenant_123";
pub const MOCK_SESSION_TOKEN: &str = "mock_token_123";

const LOGIN_LATENCY: Duration = Duration::from_millis(40);
const FINANCIALS_LATENCY: Duration = Duration::from_millis(25);
const ACTIONS_LATENCY: Duration = Duration::from_millis(20);

pub fn mock_identity() -> Identity {
    Identity {
        id: UserId::new("u1"),
        email: "pastor@innovation.church".to_string(),
        display_name: "Rev. Cooper Levin".to_string(),
        role: Role::Pastor,
        tenant_id: TenantId::new(MOCK_TENANT_ID),
        avatar_url: Some("https://picsum.photos/seed/pastor/200/200".to_string()),
    }
}

pub fn mock_financials() -> Vec<FinancialRecord> {
    let rows: [(&str, f64, f64, f64); 12] = [
        ("Jan", 12000.0, 4000.0, 10000.0),
        ("Feb", 13500.0, 4200.0, 11000.0),
        ("Mar", 11000.0, 3800.0, 9500.0),
        ("Apr", 14000.0, 5000.0, 12000.0),
        ("May", 18500.0, 6200.0, 13000.0),
        ("Jun", 16000.0, 5500.0, 11500.0),
        ("Jul", 15000.0, 5100.0, 11000.0),
        ("Aug", 13000.0, 4500.0, 10500.0),
        ("Sep", 14500.0, 4800.0, 11200.0),
        ("Oct", 15500.0, 5200.0, 11800.0),
        ("Nov", 17000.0, 6000.0, 12500.0),
        ("Dec", 22000.0, 8000.0, 15000.0),
    ];

    rows.iter()
        .map(|(period, tithes, offerings, expenses)| FinancialRecord {
            period: period.to_string(),
            tithes: *tithes,
            offerings: *offerings,
            expenses: *expenses,
        })
        .collect()
}

pub fn mock_action_items() -> Vec<ActionItem> {
    vec![
        ActionItem {
            id: ActionItemId::new("1"),
            category: ActionCategory::Counseling,
            status: ActionStatus::Pending,
            date: NaiveDate::from_ymd_opt(2023, 10, 25).unwrap_or_default(),
            requester: Member {
                id: MemberId::new("m1"),
                name: "Anika Rosser".to_string(),
                role_label: "Worship Team".to_string(),
                ministry: "Music".to_string(),
                status: MemberStatus::Active,
                avatar_url: Some("https://picsum.photos/seed/anika/200/200".to_string()),
            },
        },
        ActionItem {
            id: ActionItemId::new("2"),
            category: ActionCategory::VolunteerSignup,
            status: ActionStatus::InProgress,
            date: NaiveDate::from_ymd_opt(2023, 10, 24).unwrap_or_default(),
            requester: Member {
                id: MemberId::new("m2"),
                name: "Charlie Korsgaard".to_string(),
                role_label: "Member".to_string(),
                ministry: "Tech".to_string(),
                status: MemberStatus::Active,
                avatar_url: Some("https://picsum.photos/seed/charlie/200/200".to_string()),
            },
        },
        ActionItem {
            id: ActionItemId::new("3"),
            category: ActionCategory::Prayer,
            status: ActionStatus::Completed,
            date: NaiveDate::from_ymd_opt(2023, 10, 22).unwrap_or_default(),
            requester: Member {
                id: MemberId::new("m3"),
                name: "Livia Madsen".to_string(),
                role_label: "Usher".to_string(),
                ministry: "Hospitality".to_string(),
                status: MemberStatus::Active,
                avatar_url: Some("https://picsum.photos/seed/livia/200/200".to_string()),
            },
        },
    ]
}

/// Accepts any plausible email and issues the fixed demo identity.
pub struct MockAuthBackend;

#[async_trait]
impl AuthBackend for MockAuthBackend {
    async fn login(&self, email: &str) -> Result<(String, Identity), AuthError> {
        sleep(LOGIN_LATENCY).await;
        if email.trim().is_empty() || !email.contains('@') {
            return Err(AuthError::InvalidCredentials);
        }
        Ok((MOCK_SESSION_TOKEN.to_string(), mock_identity()))
    }

    async fn resolve(&self, token: &str) -> Result<Option<Identity>, AuthError> {
        if token == MOCK_SESSION_TOKEN {
            Ok(Some(mock_identity()))
        } else {
            Ok(None)
        }
    }
}

pub struct MockTenantBackend;

#[async_trait]
impl TenantDataBackend for MockTenantBackend {
    async fn fetch_financials(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<FinancialRecord>, FetchError> {
        sleep(FINANCIALS_LATENCY).await;
        if tenant_id.as_str() != MOCK_TENANT_ID {
            return Err(FetchError(format!("unknown tenant {tenant_id}")));
        }
        Ok(mock_financials())
    }

    async fn fetch_action_items(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<ActionItem>, FetchError> {
        sleep(ACTIONS_LATENCY).await;
        if tenant_id.as_str() != MOCK_TENANT_ID {
            return Err(FetchError(format!("unknown tenant {tenant_id}")));
        }
        Ok(mock_action_items())
    }
}

pub struct MockInsightBackend;

#[async_trait]
impl InsightBackend for MockInsightBackend {
    fn is_configured(&self) -> bool {
        true
    }

    async fn summarize(&self, _prompt: &str) -> anyhow::Result<String> {
        Ok("Tithes climbed through the most recent periods while Offerings grew \
            alongside them, a healthy sign of engaged regular givers. Keep \
            highlighting year-end generosity so the momentum carries into the \
            new year."
            .to_string())
    }
}
