use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use client_core::{
    backend::{HttpAuthBackend, HttpInsightBackend, HttpTenantBackend},
    mock::{MockAuthBackend, MockInsightBackend, MockTenantBackend},
    DashboardController, FixedSystemAppearance, SessionState,
};
use shared::domain::FetchState;
use storage::{KeyValueStore, MemoryKvStore, SqliteKvStore};
use tracing::warn;

mod config;

#[derive(Parser, Debug)]
struct Args {
    /// Use seeded in-process backends instead of the HTTP server.
    #[arg(long)]
    mock: bool,
    /// Sign in with this email before rendering the dashboard.
    #[arg(long)]
    email: Option<String>,
    /// Apply a color variant by name (blue, red, green, glass).
    #[arg(long)]
    variant: Option<String>,
    /// Flip the light/dark mode before rendering.
    #[arg(long)]
    toggle_mode: bool,
    /// Sign out and clear the persisted session, then exit.
    #[arg(long)]
    logout: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();
    let settings = config::load_settings();

    let store: Arc<dyn KeyValueStore> = match SqliteKvStore::open(&settings.database_url).await {
        Ok(store) => Arc::new(store),
        Err(err) => {
            warn!("sqlite store unavailable, preferences will not persist: {err:#}");
            Arc::new(MemoryKvStore::new())
        }
    };

    let controller = if args.mock {
        DashboardController::new(
            Arc::new(MockAuthBackend),
            Arc::new(MockTenantBackend),
            Arc::new(MockInsightBackend),
            store,
            Arc::new(FixedSystemAppearance(false)),
        )
    } else {
        DashboardController::new(
            Arc::new(HttpAuthBackend::new(settings.server_url.clone())),
            Arc::new(HttpTenantBackend::new(settings.server_url.clone())),
            Arc::new(HttpInsightBackend::new(
                settings.insight_endpoint.clone(),
                settings.insight_model.clone(),
                settings.insight_api_key.clone(),
            )),
            store,
            Arc::new(FixedSystemAppearance(false)),
        )
    };

    controller.initialize().await;

    if args.logout {
        controller.logout().await;
        println!("Signed out.");
        return Ok(());
    }

    if let Some(name) = &args.variant {
        match controller.set_variant_name(name).await {
            Ok(variant) => println!("Color variant set to {}.", variant.as_str()),
            Err(err) => println!("{err}"),
        }
    }
    if args.toggle_mode {
        let mode = controller.toggle_mode().await;
        println!("Display mode is now {}.", mode.as_str());
    }

    if let Some(email) = &args.email {
        let identity = controller.login(email).await?;
        println!(
            "Signed in as {} ({})",
            identity.display_name, identity.email
        );
    }

    match controller.session_state().await {
        SessionState::Authenticated(identity) => {
            println!("Tenant: {}", identity.tenant_id);
        }
        _ => {
            println!("No active session. Pass --email to sign in.");
            return Ok(());
        }
    }

    match controller.financials().await {
        FetchState::Ready(records) => {
            println!("Financial periods: {}", records.len());
            if let Some(latest) = records.last() {
                println!(
                    "Latest ({}): tithes {:.2}, offerings {:.2}, expenses {:.2}",
                    latest.period, latest.tithes, latest.offerings, latest.expenses
                );
            }
        }
        FetchState::Failed(reason) => println!("Financials unavailable: {reason}"),
        _ => println!("Financials not loaded."),
    }

    match controller.action_items().await {
        FetchState::Ready(items) => {
            println!("Action items: {}", items.len());
            for item in &items {
                println!(
                    "  [{:?}] {:?} requested by {} on {}",
                    item.status, item.category, item.requester.name, item.date
                );
            }
        }
        FetchState::Failed(reason) => println!("Action items unavailable: {reason}"),
        _ => println!("Action items not loaded."),
    }

    let theme = controller.effective_theme().await;
    println!(
        "Theme: {} / {}{}",
        if theme.dark { "dark" } else { "light" },
        theme.variant.as_str(),
        if theme.translucent { " (translucent)" } else { "" }
    );

    println!("Insight: {}", controller.request_insight().await);

    Ok(())
}
