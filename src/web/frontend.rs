//! Embedded HTML/CSS/JS frontend for the socialflow dashboard.
//!
//! The whole page is compiled into the binary as a string constant. Charts
//! are drawn as inline SVG from the `ChartSpec` JSON, so the page needs no
//! external assets.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Social Flow Chat Dashboard</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --green: #3fb950;
  --yellow: #d29922;
  --red: #f85149;
  --purple: #bc8cff;
  --cyan: #39d2c0;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

.app { max-width: 1200px; margin: 0 auto; padding: 24px; }

header { text-align: center; margin-bottom: 24px; padding-bottom: 16px; border-bottom: 1px solid var(--border); }
header h1 { font-size: 28px; font-weight: 600; }
header .subtitle { color: var(--text-muted); font-size: 13px; }

.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  margin-bottom: 16px;
}
.card h2 { font-size: 16px; font-weight: 600; margin-bottom: 12px; }

label { display: block; color: var(--text-muted); margin-bottom: 8px; }
textarea {
  width: 100%;
  min-height: 90px;
  background: var(--bg);
  color: var(--text);
  border: 1px solid var(--border);
  border-radius: 6px;
  padding: 10px;
  font-family: var(--font);
  font-size: 14px;
  resize: vertical;
}
button {
  margin-top: 12px;
  padding: 8px 20px;
  border: none;
  border-radius: 6px;
  background: var(--accent);
  color: #fff;
  font-weight: 600;
  cursor: pointer;
}
button:disabled { opacity: 0.5; cursor: wait; }

.banner { display: none; padding: 10px 14px; border-radius: 6px; margin-top: 12px; }
.banner.error { display: block; border: 1px solid var(--red); color: var(--red); background: rgba(248,81,73,0.08); }
.banner.loading { display: block; border: 1px solid var(--yellow); color: var(--yellow); }

#answer { white-space: pre-wrap; font-size: 15px; min-height: 24px; }

.stats-grid {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
  gap: 16px;
  margin-bottom: 16px;
}
.stat-card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  text-align: center;
  opacity: 0;
  transition: opacity 0.3s;
}
.stat-card.shown { opacity: 1; }
.stat-card .value { font-size: 30px; font-weight: 700; font-family: var(--mono); color: var(--accent); }
.stat-card .label { font-size: 12px; color: var(--text-muted); text-transform: uppercase; letter-spacing: 0.5px; }

.chart-row { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; }
.chart { opacity: 0; transition: opacity 0.3s; }
.chart.shown { opacity: 1; }
.chart svg { width: 100%; height: auto; }
.chart text { fill: var(--text-muted); font-size: 11px; font-family: var(--font); }
.legend { display: flex; gap: 14px; flex-wrap: wrap; font-size: 12px; color: var(--text-muted); margin-top: 6px; }
.legend i { display: inline-block; width: 10px; height: 10px; border-radius: 3px; margin-right: 4px; vertical-align: middle; }

.hidden { display: none; }
@media (max-width: 800px) { .chart-row { grid-template-columns: 1fr; } }
</style>
</head>
<body>
<div class="app">
  <header>
    <h1>&#128202; Social Flow Chat Dashboard</h1>
    <div class="subtitle">Ask about your social media performance</div>
  </header>

  <div class="card">
    <label for="question">Ask me anything about your social media performance:</label>
    <textarea id="question" placeholder="E.g., What type of content performs best?"></textarea>
    <button id="analyze">Analyze</button>
    <div id="banner" class="banner"></div>
  </div>

  <div id="results" class="hidden">
    <div class="card">
      <h2>AI Analysis</h2>
      <div id="answer"></div>
    </div>

    <div id="metrics-section" class="hidden">
      <h2 style="margin: 8px 0 12px">Key Metrics</h2>
      <div id="metrics" class="stats-grid"></div>
    </div>

    <div id="charts-section" class="hidden">
      <h2 style="margin: 8px 0 12px">Performance Visualizations</h2>
      <div id="chart-0" class="card chart"></div>
      <div id="chart-1" class="card chart"></div>
      <div class="chart-row">
        <div id="chart-2" class="card chart"></div>
        <div id="chart-3" class="card chart"></div>
      </div>
    </div>
  </div>
</div>

<script>
const PALETTE = ['#58a6ff', '#f85149', '#3fb950', '#bc8cff', '#d29922', '#39d2c0'];
const CURSOR = '▌';
const $ = (id) => document.getElementById(id);
const sleep = (ms) => ms > 0 ? new Promise(r => setTimeout(r, ms)) : Promise.resolve();

function esc(s) {
  return String(s).replace(/[&<>"]/g, c => ({'&':'&amp;','<':'&lt;','>':'&gt;','"':'&quot;'}[c]));
}

function fmt(v) {
  if (Math.abs(v) >= 1000) return Math.round(v).toLocaleString();
  return Number(v.toFixed(2)).toString();
}

function banner(kind, text) {
  const b = $('banner');
  b.className = 'banner' + (kind ? ' ' + kind : '');
  b.textContent = text || '';
}

// --- charts -----------------------------------------------------------------

function legend(names) {
  return '<div class="legend">' + names.map((n, i) =>
    `<span><i style="background:${PALETTE[i % PALETTE.length]}"></i>${esc(n)}</span>`).join('') + '</div>';
}

function barChart(spec) {
  const W = 760, H = 320, L = 60, B = 40, T = 10;
  const max = Math.max(1e-9, ...spec.series.flatMap(s => s.values));
  const slot = (W - L) / spec.categories.length;
  const bw = (slot * 0.8) / spec.series.length;
  let svg = `<svg viewBox="0 0 ${W} ${H}">`;
  for (let g = 0; g <= 4; g++) {
    const y = T + (H - B - T) * (1 - g / 4);
    svg += `<line x1="${L}" x2="${W}" y1="${y}" y2="${y}" stroke="#30363d"/>`;
    svg += `<text x="${L - 6}" y="${y + 4}" text-anchor="end">${fmt(max * g / 4)}</text>`;
  }
  spec.categories.forEach((cat, ci) => {
    spec.series.forEach((s, si) => {
      const v = s.values[ci];
      const h = (H - B - T) * v / max;
      const x = L + ci * slot + slot * 0.1 + si * bw;
      svg += `<rect x="${x}" y="${H - B - h}" width="${bw - 2}" height="${h}" fill="${PALETTE[si % PALETTE.length]}"><title>${esc(s.name)}: ${fmt(v)}</title></rect>`;
    });
    svg += `<text x="${L + ci * slot + slot / 2}" y="${H - B + 16}" text-anchor="middle">${esc(cat)}</text>`;
  });
  svg += `<text x="${L + (W - L) / 2}" y="${H - 4}" text-anchor="middle">${esc(spec.x_label)}</text></svg>`;
  return svg + (spec.series.length > 1 ? legend(spec.series.map(s => s.name)) : '');
}

function scatterChart(spec) {
  const W = 760, H = 320, L = 60, B = 40, T = 10;
  const pts = spec.groups.flatMap(g => g.points);
  const maxX = Math.max(1, ...pts.map(p => p.x));
  const maxY = Math.max(1e-9, ...pts.map(p => p.y));
  let svg = `<svg viewBox="0 0 ${W} ${H}">`;
  for (let g = 0; g <= 4; g++) {
    const y = T + (H - B - T) * (1 - g / 4);
    svg += `<line x1="${L}" x2="${W}" y1="${y}" y2="${y}" stroke="#30363d"/>`;
    svg += `<text x="${L - 6}" y="${y + 4}" text-anchor="end">${fmt(maxY * g / 4)}</text>`;
    const x = L + (W - L - 10) * g / 4;
    svg += `<text x="${x}" y="${H - B + 16}" text-anchor="middle">${fmt(maxX * g / 4)}</text>`;
  }
  spec.groups.forEach((grp, gi) => {
    grp.points.forEach(p => {
      const cx = L + (W - L - 10) * p.x / maxX;
      const cy = T + (H - B - T) * (1 - p.y / maxY);
      svg += `<circle cx="${cx}" cy="${cy}" r="6" fill="${PALETTE[gi % PALETTE.length]}"><title>post_id ${p.post_id}\n${esc(spec.x_label)}: ${p.x}\n${esc(spec.y_label)}: ${p.y}</title></circle>`;
    });
  });
  svg += `<text x="${L + (W - L) / 2}" y="${H - 4}" text-anchor="middle">${esc(spec.x_label)}</text></svg>`;
  return svg + legend(spec.groups.map(g => g.name));
}

function pieChart(spec) {
  const R = 120, C = 150;
  const total = spec.slices.reduce((a, s) => a + s.value, 0) || 1;
  let angle = -Math.PI / 2;
  let svg = `<svg viewBox="0 0 300 300">`;
  spec.slices.forEach((s, i) => {
    const sweep = 2 * Math.PI * s.value / total;
    const x1 = C + R * Math.cos(angle), y1 = C + R * Math.sin(angle);
    angle += sweep;
    const x2 = C + R * Math.cos(angle), y2 = C + R * Math.sin(angle);
    const large = sweep > Math.PI ? 1 : 0;
    const pct = (100 * s.value / total).toFixed(1);
    svg += `<path d="M${C},${C} L${x1},${y1} A${R},${R} 0 ${large} 1 ${x2},${y2} Z" fill="${PALETTE[i % PALETTE.length]}" stroke="#161b22"><title>${esc(s.label)}: ${s.value} (${pct}%)</title></path>`;
  });
  svg += '</svg>';
  return svg + legend(spec.slices.map(s => `${s.label} (${s.value})`));
}

function renderChart(spec) {
  const body = spec.kind === 'bar' ? barChart(spec)
    : spec.kind === 'scatter' ? scatterChart(spec)
    : pieChart(spec);
  return `<h2>${esc(spec.title)}</h2>` + body;
}

// --- cycle ------------------------------------------------------------------

async function reveal(text, delay) {
  const el = $('answer');
  const chars = Array.from(text);
  for (let i = 0; i <= chars.length; i++) {
    el.textContent = chars.slice(0, i).join('') + CURSOR;
    await sleep(delay);
  }
  el.textContent = text;
}

async function render(data) {
  const p = data.pacing;
  $('results').classList.remove('hidden');
  await reveal(data.answer, p.reveal_delay_ms);

  $('metrics-section').classList.remove('hidden');
  const metrics = $('metrics');
  metrics.innerHTML = data.cards.map(c =>
    `<div class="stat-card"><div class="value">${esc(c.value)}</div><div class="label">${esc(c.label)}</div></div>`).join('');
  const cards = metrics.querySelectorAll('.stat-card');
  for (let i = 0; i < cards.length; i++) {
    await sleep(i === 0 ? p.lead_pause_ms : p.section_pause_ms);
    cards[i].classList.add('shown');
  }

  $('charts-section').classList.remove('hidden');
  for (let i = 0; i < data.charts.length; i++) {
    await sleep(i === 0 ? p.lead_pause_ms : p.section_pause_ms);
    const el = $('chart-' + i);
    el.innerHTML = renderChart(data.charts[i]);
    el.classList.add('shown');
  }
}

function reset() {
  $('results').classList.add('hidden');
  $('metrics-section').classList.add('hidden');
  $('charts-section').classList.add('hidden');
  $('answer').textContent = '';
  $('metrics').innerHTML = '';
  for (let i = 0; i < 4; i++) {
    const el = $('chart-' + i);
    el.innerHTML = '';
    el.classList.remove('shown');
  }
}

async function analyze() {
  const message = $('question').value;
  if (!message.trim()) {
    banner('error', 'Please enter a question');
    return;
  }

  const button = $('analyze');
  button.disabled = true;
  reset();
  banner('loading', 'Getting AI analysis... Please wait, could take up to 30 seconds');

  try {
    const resp = await fetch('/api/analyze', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ message }),
    });
    const data = await resp.json();
    if (!resp.ok) {
      banner('error', data.error || ('HTTP ' + resp.status));
      return;
    }
    banner(null, '');
    await render(data);
  } catch (e) {
    banner('error', 'An error occurred: ' + e.message);
  } finally {
    button.disabled = false;
  }
}

$('analyze').addEventListener('click', analyze);
</script>
</body>
</html>
"##;
