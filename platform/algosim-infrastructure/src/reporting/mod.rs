use algosim_domain::entities::backtest_result::BacktestResult;
use algosim_domain::entities::run_meta::RunMeta;
use algosim_domain::services::kpi::{kpi_tiles, KpiTone};
use algosim_domain::value_objects::chart_point::ChartPoint;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

pub const PRICE_CAPTION: &str =
    "* Price reconstructed from benchmark equity curve. Markers indicate trade entries/exits.";

pub fn write_json_pretty<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
    what: &str,
) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|err| format!("failed to serialize {what}: {err}"))?;
    let mut file = fs::File::create(path)
        .map_err(|err| format!("failed to create {what} {}: {}", path.display(), err))?;
    file.write_all(json.as_bytes())
        .map_err(|err| format!("failed to write {what}: {err}"))
}

pub fn read_response_json(path: &Path) -> Result<BacktestResult, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("failed to read response {}: {}", path.display(), err))?;
    serde_json::from_str(&raw)
        .map_err(|err| format!("failed to parse response {}: {}", path.display(), err))
}

fn opt_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn write_chart_csv(path: &Path, points: &[ChartPoint]) -> Result<(), String> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|err| format!("failed to create chart csv {}: {}", path.display(), err))?;
    wtr.write_record([
        "date",
        "equity",
        "benchmark",
        "price",
        "buy_marker",
        "sell_marker",
        "action",
    ])
    .map_err(|err| format!("failed to write chart csv header: {}", err))?;

    for point in points {
        wtr.write_record([
            point.date.clone(),
            point.equity.to_string(),
            opt_cell(point.benchmark),
            point.price.to_string(),
            opt_cell(point.buy_marker),
            opt_cell(point.sell_marker),
            point
                .action
                .map(|a| a.as_str().to_string())
                .unwrap_or_default(),
        ])
        .map_err(|err| format!("failed to write chart row: {}", err))?;
    }

    wtr.flush()
        .map_err(|err| format!("failed to flush chart csv: {}", err))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON that is safe to inline inside a `<script>` element.
fn script_json<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<String, String> {
    serde_json::to_string(value)
        .map(|json| json.replace("</", "<\\/"))
        .map_err(|err| format!("failed to serialize {what}: {err}"))
}

fn kpi_grid_html(metrics: &serde_json::Value) -> String {
    kpi_tiles(metrics)
        .iter()
        .map(|tile| {
            let tone = match tile.tone {
                KpiTone::Positive => "positive",
                KpiTone::Negative => "negative",
                KpiTone::Neutral => "neutral",
            };
            format!(
                "      <div class=\"kpi {tone}\" data-key=\"{key}\"><div class=\"label\">{label}</div><div class=\"value\">{value}</div></div>\n",
                key = escape_html(&tile.key),
                label = escape_html(&tile.label),
                value = escape_html(&tile.value),
            )
        })
        .collect()
}

pub fn write_dashboard_html(
    path: &Path,
    meta: Option<&RunMeta>,
    metrics: &serde_json::Value,
    points: &[ChartPoint],
) -> Result<(), String> {
    let (run_id, ticker, strategy, period, capital) = match meta {
        Some(meta) => (
            escape_html(&meta.run_id),
            escape_html(&meta.ticker),
            escape_html(&meta.strategy),
            format!(
                "{} to {}",
                escape_html(&meta.start_date),
                escape_html(&meta.end_date)
            ),
            format!("${:.2}", meta.initial_capital),
        ),
        None => (
            "unknown".to_string(),
            "unknown".to_string(),
            "unknown".to_string(),
            "unknown".to_string(),
            "unknown".to_string(),
        ),
    };

    let points_json = script_json(points, "chart points")?;
    let kpis = kpi_grid_html(metrics);

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>Backtest Results - {ticker}</title>
  <style>
    body {{ font-family: ui-sans-serif, system-ui; padding: 24px; background: #f7f8fa; }}
    code {{ background: #eef0f3; padding: 2px 6px; border-radius: 4px; }}
    .kpis {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(160px, 1fr)); gap: 12px; margin-bottom: 16px; }}
    .kpi {{ border: 1px solid #ddd; border-radius: 10px; padding: 12px; background: #fff; }}
    .kpi .label {{ color: #666; font-size: 12px; }}
    .kpi .value {{ font-size: 20px; font-weight: 600; margin-top: 4px; }}
    .kpi.positive .value {{ color: #2f855a; }}
    .kpi.negative .value {{ color: #c53030; }}
    .card {{ border: 1px solid #ddd; border-radius: 10px; padding: 16px; background: #fff; margin-bottom: 16px; }}
    canvas {{ width: 100%; height: 300px; border: 1px solid #eee; border-radius: 8px; }}
    .muted {{ color: #666; }}
    .caption {{ color: #666; font-size: 12px; font-style: italic; }}
  </style>
</head>
<body>
  <h1>Backtest Results</h1>
  <p class="muted">
    run_id: <code>{run_id}</code> · ticker: <code>{ticker}</code> · strategy: <code>{strategy}</code>
    · period: <code>{period}</code> · initial capital: <code>{capital}</code>
  </p>

  <div class="kpis">
{kpis}  </div>

  <div class="card">
    <h2>Equity vs Benchmark</h2>
    <canvas id="equity"></canvas>
  </div>

  <div class="card">
    <h2>Price (Reconstructed)</h2>
    <canvas id="price"></canvas>
    <p class="caption">{caption}</p>
  </div>

  <script>
    const points = {points_json};

    function frame(canvas) {{
      const ctx = canvas.getContext('2d');
      const w = canvas.width = canvas.clientWidth * window.devicePixelRatio;
      const h = canvas.height = canvas.clientHeight * window.devicePixelRatio;
      ctx.clearRect(0, 0, w, h);
      const pad = 24 * window.devicePixelRatio;
      return {{ ctx, x0: pad, y0: pad, x1: w - pad, y1: h - pad }};
    }}

    function scale(f, values) {{
      const finite = values.filter(v => v !== null && v !== undefined && Number.isFinite(v));
      const minV = Math.min(...finite);
      const maxV = Math.max(...finite);
      const n = points.length;
      return {{
        x: i => n < 2 ? (f.x0 + f.x1) / 2 : f.x0 + (i / (n - 1)) * (f.x1 - f.x0),
        y: v => maxV === minV ? (f.y0 + f.y1) / 2 : f.y1 - ((v - minV) / (maxV - minV)) * (f.y1 - f.y0),
      }};
    }}

    function line(f, s, values, color, dashed) {{
      f.ctx.strokeStyle = color;
      f.ctx.lineWidth = 2 * window.devicePixelRatio;
      f.ctx.setLineDash(dashed ? [6, 4] : []);
      f.ctx.beginPath();
      let open = false;
      values.forEach((v, i) => {{
        if (v === null || v === undefined) {{ open = false; return; }}
        if (open) f.ctx.lineTo(s.x(i), s.y(v)); else f.ctx.moveTo(s.x(i), s.y(v));
        open = true;
      }});
      f.ctx.stroke();
      f.ctx.setLineDash([]);
    }}

    function marker(f, x, y, up, color) {{
      const r = 6 * window.devicePixelRatio;
      f.ctx.fillStyle = color;
      f.ctx.beginPath();
      if (up) {{
        f.ctx.moveTo(x, y - r); f.ctx.lineTo(x - r, y + r); f.ctx.lineTo(x + r, y + r);
      }} else {{
        f.ctx.moveTo(x, y + r); f.ctx.lineTo(x - r, y - r); f.ctx.lineTo(x + r, y - r);
      }}
      f.ctx.closePath();
      f.ctx.fill();
    }}

    function empty(f, text) {{
      f.ctx.fillStyle = '#666';
      f.ctx.fillText(text, 10, 20);
    }}

    function drawEquity() {{
      const f = frame(document.getElementById('equity'));
      if (points.length === 0) return empty(f, 'no equity data');
      const equity = points.map(p => p.equity);
      const bench = points.map(p => p.benchmark ?? null);
      const s = scale(f, equity.concat(bench));
      line(f, s, bench, '#a0aec0', true);
      line(f, s, equity, '#2b6cb0', false);
    }}

    function drawPrice() {{
      const f = frame(document.getElementById('price'));
      if (!points.some(p => p.benchmark !== undefined)) return empty(f, 'no benchmark data');
      const price = points.map(p => p.price);
      const s = scale(f, price);
      line(f, s, price, '#4a5568', false);
      points.forEach((p, i) => {{
        if (p.buy_marker !== undefined) marker(f, s.x(i), s.y(p.buy_marker), true, '#2f855a');
        if (p.sell_marker !== undefined) marker(f, s.x(i), s.y(p.sell_marker), false, '#c53030');
      }});
    }}

    function draw() {{ drawEquity(); drawPrice(); }}
    draw();
    window.addEventListener('resize', draw);
  </script>
</body>
</html>"#,
        caption = escape_html(PRICE_CAPTION),
    );

    let mut file = fs::File::create(path)
        .map_err(|err| format!("failed to create dashboard {}: {}", path.display(), err))?;
    file.write_all(html.as_bytes())
        .map_err(|err| format!("failed to write dashboard: {}", err))
}
