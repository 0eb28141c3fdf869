use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/day/:date", get(handlers::get_day))
        .route("/api/schedule/:date/:hour", put(handlers::put_schedule_hour))
        .route("/api/schedule/:date/:hour/toggle", post(handlers::toggle_schedule_hour))
        .route("/api/recurring/:hour", put(handlers::put_recurring_hour))
        .route("/api/recurring/:hour/toggle", post(handlers::toggle_recurring_hour))
        .route("/api/records/:date/:hour", put(handlers::put_record_hour))
        .route("/api/records/:date/:hour/toggle", post(handlers::toggle_record_hour))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/stats/week", get(handlers::get_week_stats))
        .route("/api/stats/month", get(handlers::get_month_stats))
        .route("/api/stats/matrix", get(handlers::get_matrix))
        .route("/api/goals", get(handlers::get_goals))
        .route("/api/points", get(handlers::get_points))
        .route("/api/redeem", post(handlers::redeem))
        .route("/api/ratings/trend", get(handlers::get_rating_trend))
        .route("/api/ratings/:date", put(handlers::put_rating))
        .route("/api/rating-items", post(handlers::create_rating_item))
        .route(
            "/api/rating-items/:id",
            put(handlers::update_rating_item).delete(handlers::delete_rating_item),
        )
        .route("/api/shop-items", post(handlers::create_shop_item))
        .route(
            "/api/shop-items/:id",
            put(handlers::update_shop_item).delete(handlers::delete_shop_item),
        )
        .route("/api/settings/rollover", put(handlers::put_rollover_settings))
        .route("/api/tasks", post(handlers::create_task))
        .route(
            "/api/tasks/:id",
            put(handlers::update_task).delete(handlers::delete_task),
        )
        .route("/api/objectives", post(handlers::create_objective))
        .route(
            "/api/objectives/:id",
            put(handlers::update_objective).delete(handlers::delete_objective),
        )
        .route("/api/todos", get(handlers::list_todos).post(handlers::create_todo))
        .route("/api/todos/heatmap", get(handlers::get_heatmap))
        .route("/api/todos/from-task/:id", post(handlers::todo_from_template))
        .route(
            "/api/todos/:id",
            put(handlers::update_todo).delete(handlers::delete_todo),
        )
        .route("/api/todos/:id/toggle", post(handlers::toggle_todo))
        .route("/api/export", get(handlers::export_data))
        .route("/api/import", post(handlers::import_data))
        .route("/api/reset", post(handlers::reset_data))
        .with_state(state)
}
