use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use chrono::{Days, Local, NaiveDate};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoalProgress {
    current: f64,
    target: f64,
    percentage: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskGoal {
    task_id: String,
    rolling: GoalProgress,
}

#[derive(Debug, Deserialize)]
struct DayData {
    hours: BTreeMap<u8, Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DayView {
    date: String,
    plan: DayData,
    actual: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TodoResponse {
    id: String,
    start_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemResponse {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Balance {
    lifetime_score: i64,
    balance: i64,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("day_planner_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/points")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    spawn_server_at(&unique_data_path()).await
}

/// Starts a server of its own over `data_path`, which may already hold data.
async fn spawn_server_at(data_path: &str) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_day_planner"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn create_task(client: &Client, base_url: &str, body: Value) -> String {
    let task: TaskResponse = client
        .post(format!("{base_url}/api/tasks"))
        .json(&body)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    task.id
}

#[tokio::test]
async fn http_recorded_hours_drive_goal_progress() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    let t = create_task(
        &client,
        base,
        json!({
            "name": "Deep work",
            "color": "#3b82f6",
            "category": "Work",
            "targets": { "mode": "duration", "value": 2, "frequency": 1 }
        }),
    )
    .await;
    let u = create_task(&client, base, json!({ "name": "Email", "color": "#f59e0b" })).await;

    let response = client
        .put(format!("{base}/api/records/2031-03-10/9"))
        .json(&json!({ "taskIds": [t] }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let day: DayView = client
        .put(format!("{base}/api/records/2031-03-10/10"))
        .json(&json!({ "taskIds": [t, u] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(day.date, "2031-03-10");
    assert_eq!(day.actual[&t], 1.5);
    assert_eq!(day.actual[&u], 0.5);

    let goals: Vec<TaskGoal> = client
        .get(format!("{base}/api/goals?date=2031-03-10"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let goal = goals.iter().find(|g| g.task_id == t).expect("missing goal");
    assert_eq!(goal.rolling.current, 1.5);
    assert_eq!(goal.rolling.target, 2.0);
    assert_eq!(goal.rolling.percentage, 75.0);
    assert!(goals.iter().all(|g| g.task_id != u));

    let bad_hour = client
        .put(format!("{base}/api/records/2031-03-10/24"))
        .json(&json!({ "taskIds": [t] }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_hour.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_recurring_tasks_merge_into_day_plan() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    let a = create_task(&client, base, json!({ "name": "Stretch", "color": "#10b981" })).await;
    let b = create_task(&client, base, json!({ "name": "Commute", "color": "#64748b" })).await;

    let response = client
        .post(format!("{base}/api/recurring/8/toggle"))
        .json(&json!({ "taskId": a }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let day: DayView = client
        .post(format!("{base}/api/schedule/2031-04-02/8/toggle"))
        .json(&json!({ "taskId": b }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let hour = &day.plan.hours[&8];
    assert!(hour.contains(&a));
    assert!(hour.contains(&b));
    assert_eq!(hour.len(), 2);

    let other_day: DayView = client
        .get(format!("{base}/api/day/2031-04-03"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(other_day.plan.hours[&8].contains(&a));
    assert!(!other_day.plan.hours[&8].contains(&b));

    let response = client
        .post(format!("{base}/api/recurring/8/toggle"))
        .json(&json!({ "taskId": a }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

#[tokio::test]
async fn http_redeem_requires_enough_points() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    let before: Balance = client
        .get(format!("{base}/api/points"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    for (date, scores) in [
        ("2031-05-01", json!({ "r1": 2, "r2": 2 })),
        ("2031-05-02", json!({ "r1": 2, "r2": 2 })),
        ("2031-05-03", json!({ "r1": 2 })),
    ] {
        let response = client
            .put(format!("{base}/api/ratings/{date}"))
            .json(&json!({ "scores": scores, "comment": "" }))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    let earned: Balance = client
        .get(format!("{base}/api/points"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(earned.lifetime_score, before.lifetime_score + 10);
    assert_eq!(earned.balance, before.balance + 10);

    let out_of_range = client
        .put(format!("{base}/api/ratings/2031-05-04"))
        .json(&json!({ "scores": { "r1": 3 }, "comment": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(out_of_range.status(), StatusCode::BAD_REQUEST);

    if earned.balance >= 10 {
        let after: Balance = client
            .post(format!("{base}/api/redeem"))
            .json(&json!({ "shopItemId": "s1" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(after.balance, earned.balance - 10);
    }

    let too_expensive = client
        .post(format!("{base}/api/redeem"))
        .json(&json!({ "shopItemId": "s5" }))
        .send()
        .await
        .unwrap();
    assert_eq!(too_expensive.status(), StatusCode::BAD_REQUEST);

    let unknown = client
        .post(format!("{base}/api/redeem"))
        .json(&json!({ "shopItemId": "does-not-exist" }))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_failed_import_keeps_state() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    let export = client.get(format!("{base}/api/export")).send().await.unwrap();
    assert!(export.status().is_success());
    let disposition = export
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains("day_planner_data_"));
    let before: Value = export.json().await.unwrap();

    for body in ["{ not json", "[1, 2, 3]", r#"{ "records": {} }"#] {
        let response = client
            .post(format!("{base}/api/import"))
            .body(body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let after: Value = client
        .get(format!("{base}/api/export"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(before, after);

    let response = client
        .post(format!("{base}/api/import"))
        .body(before.to_string())
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let reimported: Value = client
        .get(format!("{base}/api/export"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(before, reimported);
}

#[tokio::test]
async fn http_goal_frequency_is_bounded() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    for frequency in [0, 100_000] {
        let response = client
            .post(format!("{base}/api/tasks"))
            .json(&json!({
                "name": "Marathon",
                "color": "#ef4444",
                "targets": { "mode": "duration", "value": 5, "frequency": frequency }
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let t = create_task(
        &client,
        base,
        json!({
            "name": "Long run",
            "color": "#ef4444",
            "targets": { "mode": "count", "value": 4, "frequency": 3660 }
        }),
    )
    .await;

    let response = client
        .put(format!("{base}/api/tasks/{t}"))
        .json(&json!({
            "name": "Long run",
            "color": "#ef4444",
            "targets": { "mode": "count", "value": 4, "frequency": u32::MAX }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let goals: Vec<TaskGoal> = client
        .get(format!("{base}/api/goals?date=2031-06-01"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(goals.iter().any(|g| g.task_id == t));

    let day = client.get(format!("{base}/api/day/2031-06-01")).send().await.unwrap();
    assert!(day.status().is_success());
}

#[tokio::test]
async fn http_stats_ranges_are_capped() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    for path in ["/api/stats", "/api/stats/matrix"] {
        let too_wide = client
            .get(format!("{base}{path}?start=0001-01-01&end=9999-12-31"))
            .send()
            .await
            .unwrap();
        assert_eq!(too_wide.status(), StatusCode::BAD_REQUEST);

        let year = client
            .get(format!("{base}{path}?start=2031-01-01&end=2031-12-31"))
            .send()
            .await
            .unwrap();
        assert!(year.status().is_success());
    }
}

#[tokio::test]
async fn http_rating_items_can_be_managed() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    let created: ItemResponse = client
        .post(format!("{base}/api/rating-items"))
        .json(&json!({ "name": "Mood", "reasons": { "-2": "Grim", "2": "Bright" } }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created.name, "Mood");

    let bad_reason = client
        .post(format!("{base}/api/rating-items"))
        .json(&json!({ "name": "Sleep", "reasons": { "3": "Too good" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_reason.status(), StatusCode::BAD_REQUEST);

    let renamed: ItemResponse = client
        .put(format!("{base}/api/rating-items/{}", created.id))
        .json(&json!({ "name": "Mood of the day" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(renamed.id, created.id);
    assert_eq!(renamed.name, "Mood of the day");

    let export: Value = client.get(format!("{base}/api/export")).send().await.unwrap().json().await.unwrap();
    let names: Vec<&str> = export["ratingItems"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|item| item["name"].as_str())
        .collect();
    assert!(names.contains(&"Mood of the day"));

    let deleted = client
        .delete(format!("{base}/api/rating-items/{}", created.id))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let again = client
        .delete(format!("{base}/api/rating-items/{}", created.id))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_shop_items_can_be_managed() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    let negative = client
        .post(format!("{base}/api/shop-items"))
        .json(&json!({ "name": "Debt", "cost": -5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(negative.status(), StatusCode::BAD_REQUEST);

    let created: ItemResponse = client
        .post(format!("{base}/api/shop-items"))
        .json(&json!({ "name": "Walk", "cost": 0, "icon": "🚶" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let updated: ItemResponse = client
        .put(format!("{base}/api/shop-items/{}", created.id))
        .json(&json!({ "name": "Long walk", "cost": 0, "icon": "🚶" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated.name, "Long walk");

    let redeemed = client
        .post(format!("{base}/api/redeem"))
        .json(&json!({ "shopItemId": created.id }))
        .send()
        .await
        .unwrap();
    assert!(redeemed.status().is_success());

    let deleted = client
        .delete(format!("{base}/api/shop-items/{}", created.id))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = client
        .post(format!("{base}/api/redeem"))
        .json(&json!({ "shopItemId": created.id }))
        .send()
        .await
        .unwrap();
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);

    let missing = client
        .put(format!("{base}/api/shop-items/{}", created.id))
        .json(&json!({ "name": "Walk", "cost": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let export: Value = client.get(format!("{base}/api/export")).send().await.unwrap().json().await.unwrap();
    let redemption = export["redemptions"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["shopItemId"] == json!(created.id))
        .expect("missing redemption");
    assert_eq!(redemption["itemName"], "Long walk");
}

#[tokio::test]
async fn http_rollover_settings_can_be_changed() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    let saved: Value = client
        .put(format!("{base}/api/settings/rollover"))
        .json(&json!({ "enabled": false, "maxDays": 3 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(saved, json!({ "enabled": false, "maxDays": 3 }));

    let export: Value = client.get(format!("{base}/api/export")).send().await.unwrap().json().await.unwrap();
    assert_eq!(export["rolloverSettings"], saved);

    let response = client
        .put(format!("{base}/api/settings/rollover"))
        .json(&json!({ "enabled": true, "maxDays": 7 }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

fn stale_todos_file(enabled: bool, today: NaiveDate) -> String {
    let day = |back: u64| (today - Days::new(back)).format("%Y-%m-%d").to_string();
    let data = json!({
        "version": 4,
        "tasks": [],
        "rolloverSettings": { "enabled": enabled, "maxDays": 7 },
        "todos": [
            { "id": "recent", "title": "Call the bank", "startDate": day(2) },
            { "id": "ancient", "title": "Fix the fence", "startDate": day(30) },
            { "id": "done", "title": "Pay rent", "startDate": day(1), "isCompleted": true }
        ]
    });
    let path = unique_data_path();
    std::fs::write(&path, data.to_string()).expect("write seeded data file");
    path
}

async fn todo_dates(base: &str) -> BTreeMap<String, Option<String>> {
    let todos: Vec<TodoResponse> = Client::new()
        .get(format!("{base}/api/todos?filter=all"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    todos.into_iter().map(|todo| (todo.id, todo.start_date)).collect()
}

#[tokio::test]
async fn http_startup_rolls_recent_todos_onto_today() {
    let _guard = TEST_LOCK.lock().await;
    let today = Local::now().date_naive();
    let key = |back: u64| Some((today - Days::new(back)).format("%Y-%m-%d").to_string());

    let path = stale_todos_file(true, today);
    let server = spawn_server_at(&path).await;
    let dates = todo_dates(&server.base_url).await;
    assert_eq!(dates["recent"], key(0));
    assert_eq!(dates["ancient"], key(30));
    assert_eq!(dates["done"], key(1));

    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(saved["todos"].as_array().unwrap().iter().any(|t| t["startDate"] == json!(key(0))));
    drop(server);
    let _ = std::fs::remove_file(&path);

    let path = stale_todos_file(false, today);
    let server = spawn_server_at(&path).await;
    let dates = todo_dates(&server.base_url).await;
    assert_eq!(dates["recent"], key(2));
    assert_eq!(dates["ancient"], key(30));
    drop(server);
    let _ = std::fs::remove_file(&path);
}
