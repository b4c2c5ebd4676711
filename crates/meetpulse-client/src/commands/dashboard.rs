//! Dashboard command.

use std::sync::Arc;

use meetpulse_api::DashboardSource;
use meetpulse_session::{DashboardView, DashboardWatcher};

use super::{Context, print_json};
use crate::error::{ClientError, ClientResult};

/// Restores the session and prints the first complete dashboard view.
pub async fn show(ctx: &Context) -> ClientResult<()> {
    let store = ctx.session_store();
    store.initialize().await;

    let state = store.snapshot();
    let Some(identity) = state.identity else {
        return Err(ClientError::NotSignedIn);
    };

    let source: Arc<dyn DashboardSource> = ctx.client.clone();
    let watcher = DashboardWatcher::spawn(source, store.subscribe());
    let mut views = watcher.subscribe();
    let view = views
        .wait_for(|view| !view.loading && view.updated_at.is_some())
        .await
        .map_err(|_| ClientError::Internal("dashboard watcher stopped".to_string()))?
        .clone();

    if ctx.json {
        return print_json(&view);
    }
    print_view(&identity.name, &view);
    Ok(())
}

fn print_view(name: &str, view: &DashboardView) {
    println!("Dashboard for {name}");
    println!("  meetings:       {}", view.stats.total_meetings);
    println!("  average rating: {}", view.stats.average_rating);
    if let Some(updated_at) = view.updated_at {
        println!("  updated:        {}", updated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
}
