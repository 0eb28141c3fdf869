use day_planner::dates::today;
use day_planner::storage::save_data;
use day_planner::todos::rollover_todos;
use day_planner::{AppState, load_data, resolve_data_path, router};
use std::{env, net::SocketAddr};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let data_path = resolve_data_path()?;
    if let Some(parent) = data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut data = load_data(&data_path).await;
    info!(
        tasks = data.tasks.len(),
        todos = data.todos.len(),
        path = %data_path.display(),
        "loaded planner data"
    );

    if data.rollover_settings.enabled {
        let todos = rollover_todos(&data.todos, today(), data.rollover_settings.max_days);
        if todos != data.todos {
            let moved = todos.iter().zip(&data.todos).filter(|(a, b)| a != b).count();
            info!(moved, "rolled over unfinished todos");
            data.todos = todos;
            save_data(&data_path, &data).await;
        }
    }

    let app = router(AppState::new(data_path, data));

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
