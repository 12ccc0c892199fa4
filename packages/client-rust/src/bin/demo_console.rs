//! Demo console: drives a Gridline container against the in-memory
//! backend the way an admin-console page would — load, filter, select,
//! batch-delete with a partial failure, and print the shareable
//! view-state query string.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use gridline_client::container::{ContainerRegistry, EntityListContainer};
use gridline_client::notify::TracingNotifier;
use gridline_client::source::memory::InMemoryListSource;
use gridline_core::{
    EntitySchema, FilterClause, FilterExpression, JsonRow, ListSource, Notifier, Row, ViewState,
};

#[derive(Parser, Debug)]
#[command(name = "demo-console", about = "Gridline list-controller walkthrough")]
struct Args {
    /// Number of test runs to seed.
    #[arg(long, default_value_t = 40, env = "GRIDLINE_DEMO_ROWS")]
    rows: usize,
    /// Grid page size.
    #[arg(long, default_value_t = 10, env = "GRIDLINE_DEMO_PAGE_SIZE")]
    page_size: u32,
}

fn test_runs_schema() -> EntitySchema {
    EntitySchema::new("test-runs")
        .text("name", true)
        .text("status", false)
        .number("priority")
}

fn seed(source: &InMemoryListSource<JsonRow>, rows: usize) -> anyhow::Result<()> {
    let suites = ["smoke", "regression", "load"];
    let statuses = ["passed", "failed", "running"];
    for i in 0..rows {
        let row = JsonRow::from_value(serde_json::json!({
            "id": uuid::Uuid::new_v4().to_string(),
            "name": format!("{} suite {i}", suites[i % suites.len()]),
            "status": statuses[i % statuses.len()],
            "priority": (i % 4) as i64,
        }))
        .context("seed row")?;
        source.insert(row);
    }
    Ok(())
}

fn print_page(container: &EntityListContainer<JsonRow>) {
    let Some(page) = container.rows() else {
        println!("  (no data loaded)");
        return;
    };
    let model = container.pagination();
    println!(
        "  page {} ({} rows of {} total)",
        model.page(),
        page.len(),
        page.total_count
    );
    for row in &page.rows {
        let name = row.field("name").and_then(|v| v.as_str().map(String::from));
        let status = row.field("status").and_then(|v| v.as_str().map(String::from));
        println!(
            "    [{}] {:30} {}",
            if container.is_selected(row.id()) { "x" } else { " " },
            name.unwrap_or_default(),
            status.unwrap_or_default()
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let source = Arc::new(InMemoryListSource::new(test_runs_schema(), |row: &JsonRow, field| {
        row.field(field)
    }));
    seed(&source, args.rows)?;

    let container = Arc::new(EntityListContainer::new(
        test_runs_schema(),
        Arc::clone(&source) as Arc<dyn ListSource<JsonRow>>,
        Arc::new(TracingNotifier) as Arc<dyn Notifier>,
    ));

    let registry = ContainerRegistry::new();
    registry.register(Arc::clone(&container));
    tracing::info!(entities = ?registry.entities(), "registered list pages");

    println!("== initial page ==");
    container.set_pagination(0, args.page_size).await;
    print_page(&container);

    println!("== filtered to smoke suites ==");
    let filter = FilterExpression::new().and(FilterClause::contains("name", "smoke"));
    container.set_filter(filter).await?;
    print_page(&container);

    println!("== batch delete with one conflict ==");
    container.select_visible();
    let selected = container.selected_ids();
    let conflict_id = selected.first().cloned().unwrap_or_default();
    let delete_source = Arc::clone(&source);
    let outcome = container
        .run_selected(move |id| {
            let source = Arc::clone(&delete_source);
            let conflict_id = conflict_id.clone();
            async move {
                if id == conflict_id {
                    Err("409 conflict: referenced by a report".to_string())
                } else {
                    source.remove(&id);
                    Ok(())
                }
            }
        })
        .await?;
    println!("  outcome: {}", outcome.summary());
    print_page(&container);

    let view = ViewState {
        tab: None,
        pagination: container.pagination(),
        sort: container.sort(),
        filter_text: Some("smoke".to_string()),
    };
    let query: Vec<String> = view
        .to_pairs()
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    println!("== shareable view state ==");
    println!("  /test-runs?{}", query.join("&"));

    Ok(())
}
