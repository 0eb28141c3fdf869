use crate::models::{AppData, Balance, DayView, TargetMode};
use crate::schedule::HOURS_PER_DAY;
use std::fmt::Write;

pub fn render_index(data: &AppData, view: &DayView, balance: &Balance) -> String {
    INDEX_HTML
        .replace("{{DATE}}", &view.date)
        .replace("{{BALANCE}}", &balance.balance.to_string())
        .replace("{{LIFETIME}}", &balance.lifetime_score.to_string())
        .replace("{{ROWS}}", &render_rows(data, view))
        .replace("{{GOALS}}", &render_goals(view))
}

fn render_rows(data: &AppData, view: &DayView) -> String {
    let mut rows = String::new();
    for hour in 0..HOURS_PER_DAY {
        let _ = write!(
            rows,
            "<tr><td class=\"hour\">{hour:02}:00</td><td>{}</td><td>{}</td></tr>",
            render_chips(data, view.plan.tasks_at(hour)),
            render_chips(data, view.record.tasks_at(hour)),
        );
    }
    rows
}

fn render_chips(data: &AppData, ids: &[String]) -> String {
    ids.iter()
        .map(|id| match data.task(id) {
            Some(task) => format!(
                "<span class=\"chip\" style=\"background:{}\">{}</span>",
                escape(&task.color),
                escape(&task.name)
            ),
            None => format!("<span class=\"chip missing\">{}</span>", escape(id)),
        })
        .collect()
}

fn render_goals(view: &DayView) -> String {
    if view.goals.is_empty() {
        return "<p class=\"hint\">No goals set.</p>".to_string();
    }

    let mut out = String::new();
    for goal in &view.goals {
        let unit = match goal.mode {
            TargetMode::Duration => "h",
            TargetMode::Count => "",
        };
        let _ = write!(
            out,
            "<div class=\"goal\"><div class=\"goal-head\"><span>{}</span><span>{:.1}{unit} / {:.1}{unit}</span></div>\
             <div class=\"bar\"><div style=\"width:{:.0}%\"></div></div></div>",
            escape(&goal.name),
            goal.rolling.current,
            goal.rolling.target,
            goal.rolling.percentage,
        );
    }
    out
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Day Planner</title>
  <style>
    :root {
      --bg: #f5f5f4;
      --ink: #292524;
      --muted: #78716c;
      --accent: #4f46e5;
      --card: #ffffff;
      --shadow: 0 24px 60px rgba(41, 37, 36, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    header {
      display: flex;
      justify-content: space-between;
      align-items: baseline;
      gap: 12px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
    }

    .points {
      color: var(--muted);
    }

    .points strong {
      color: var(--accent);
      font-size: 1.4rem;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th, td {
      padding: 6px 8px;
      border-bottom: 1px solid #f0efee;
      text-align: left;
      vertical-align: top;
    }

    th {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: var(--muted);
    }

    .hour {
      font-family: monospace;
      color: var(--muted);
      width: 70px;
    }

    .chip {
      display: inline-block;
      color: white;
      border-radius: 999px;
      padding: 2px 10px;
      margin: 0 4px 4px 0;
      font-size: 0.85rem;
    }

    .chip.missing {
      background: #a8a29e;
    }

    .goal {
      display: grid;
      gap: 6px;
      margin-bottom: 12px;
    }

    .goal-head {
      display: flex;
      justify-content: space-between;
      font-size: 0.9rem;
    }

    .bar {
      height: 10px;
      background: #f5f5f4;
      border-radius: 999px;
      overflow: hidden;
    }

    .bar div {
      height: 100%;
      background: var(--accent);
    }

    .hint {
      margin: 0;
      color: var(--muted);
      font-size: 0.9rem;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>{{DATE}}</h1>
      <span class="points">Balance <strong>{{BALANCE}}</strong> · lifetime {{LIFETIME}}</span>
    </header>

    <section>
      <h2>Goals</h2>
      {{GOALS}}
    </section>

    <section>
      <table>
        <thead>
          <tr><th>Hour</th><th>Plan</th><th>Record</th></tr>
        </thead>
        <tbody>
          {{ROWS}}
        </tbody>
      </table>
    </section>

    <p class="hint">Plans include the recurring template. Edit through the JSON API under /api.</p>
  </main>
</body>
</html>
"#;
