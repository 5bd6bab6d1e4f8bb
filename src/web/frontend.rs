//! Embedded HTML/CSS/JS frontend for the sportsviz dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! Charts are plain DOM (bars) and a CSS conic gradient (pie); no external
//! assets, no build tools, no CDN dependencies.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>sportsviz Dashboard</title>
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

header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}

header h1 { font-size: 24px; font-weight: 600; }
header h1 .logo { color: var(--accent); font-family: var(--mono); font-weight: 700; }
header .subtitle { color: var(--text-muted); font-size: 13px; }

.health-badges { display: flex; gap: 8px; }
.badge {
  display: inline-flex;
  align-items: center;
  gap: 4px;
  padding: 4px 10px;
  border-radius: 12px;
  font-size: 12px;
  font-weight: 500;
  background: var(--surface);
  border: 1px solid var(--border);
}
.badge.ok { border-color: var(--green); color: var(--green); }
.badge.warn { border-color: var(--yellow); color: var(--yellow); }
.badge.err { border-color: var(--red); color: var(--red); }

/* Navigation */
nav {
  display: flex;
  flex-wrap: wrap;
  gap: 4px;
  margin-bottom: 24px;
  background: var(--surface);
  border-radius: var(--radius);
  padding: 4px;
  border: 1px solid var(--border);
}
nav button {
  flex: 1;
  padding: 8px 12px;
  border: none;
  border-radius: 6px;
  background: transparent;
  color: var(--text-muted);
  font-size: 13px;
  font-weight: 500;
  cursor: pointer;
  white-space: nowrap;
}
nav button:hover { color: var(--text); background: rgba(255,255,255,0.04); }
nav button.active { background: var(--accent); color: #fff; }

.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  margin-bottom: 16px;
}
.card h2 { font-size: 18px; font-weight: 600; }
.card h3 { font-size: 13px; font-weight: 500; color: var(--text-muted); margin-bottom: 12px; }

/* Selectors */
.controls { display: flex; flex-wrap: wrap; gap: 16px; margin-bottom: 16px; }
.controls label { display: flex; flex-direction: column; gap: 4px; font-size: 12px; color: var(--text-muted); }
select, input[type="text"], input[type="number"] {
  background: var(--bg);
  color: var(--text);
  border: 1px solid var(--border);
  border-radius: 6px;
  padding: 6px 10px;
  font-size: 13px;
  min-width: 140px;
}

/* Bar charts */
.plot { display: flex; gap: 8px; }
.y-label {
  writing-mode: vertical-rl;
  transform: rotate(180deg);
  font-size: 12px;
  color: var(--text-muted);
  text-align: center;
}
.chart {
  flex: 1;
  display: flex;
  align-items: flex-end;
  gap: 6px;
  height: 320px;
  padding-top: 28px;
  border-bottom: 1px solid var(--border);
}
.chart .slot {
  flex: 1;
  display: flex;
  align-items: flex-end;
  justify-content: center;
  gap: 2px;
  height: 100%;
}
.chart .stack {
  display: flex;
  flex-direction: column-reverse;
  width: 100%;
  max-width: 48px;
  position: relative;
}
.chart .bar {
  width: 100%;
  max-width: 48px;
  border-radius: 3px 3px 0 0;
  position: relative;
  cursor: default;
}
.chart .stack .bar { border-radius: 0; }
.chart .bar:hover { opacity: 0.8; }
.chart .bar-value, .chart .stack-total {
  position: absolute;
  bottom: 100%;
  left: 50%;
  transform: translateX(-50%);
  font-size: 10px;
  font-family: var(--mono);
  color: var(--text);
  white-space: nowrap;
  padding-bottom: 2px;
}
.ticks { display: flex; gap: 6px; margin-left: 20px; }
.ticks div { flex: 1; text-align: center; font-size: 11px; color: var(--text-muted); padding-top: 4px; }
.x-label { text-align: center; font-size: 12px; color: var(--text-muted); margin-top: 4px; }

.chart-tooltip {
  position: fixed;
  background: #333;
  color: #fff;
  padding: 6px 10px;
  border-radius: 4px;
  font-size: 11px;
  pointer-events: none;
  opacity: 0;
  transition: opacity 0.1s;
  z-index: 900;
}
.chart-tooltip.show { opacity: 1; }
.chart-tooltip table td { padding: 1px 6px 1px 0; }
.chart-tooltip table td:first-child { color: #bbb; }

/* Pie */
.pie-wrap { display: flex; align-items: center; gap: 32px; flex-wrap: wrap; }
.pie { width: 300px; height: 300px; border-radius: 50%; border: 1px solid var(--border); }

.legend { display: flex; flex-wrap: wrap; gap: 12px; margin-top: 12px; font-size: 12px; }
.legend .swatch { display: inline-block; width: 12px; height: 12px; border-radius: 2px; margin-right: 4px; vertical-align: middle; }
.pie-wrap .legend { flex-direction: column; }

/* Config page */
.config-section { margin-bottom: 24px; }
.config-section h3 { margin-bottom: 12px; padding-bottom: 8px; border-bottom: 1px solid var(--border); }
.config-row { display: flex; align-items: center; padding: 8px 0; gap: 12px; }
.config-row label { flex: 0 0 240px; font-size: 13px; }
.config-row .hint { font-size: 12px; color: var(--text-muted); }

.btn {
  padding: 8px 16px;
  border-radius: 6px;
  border: 1px solid var(--border);
  background: var(--surface);
  color: var(--text);
  font-size: 13px;
  cursor: pointer;
}
.btn.primary { background: var(--accent); border-color: var(--accent); color: #fff; }
.btn.danger { color: var(--red); border-color: var(--red); }
.btn-group { display: flex; gap: 8px; margin-top: 16px; }

.toast {
  position: fixed;
  bottom: 24px;
  right: 24px;
  padding: 12px 20px;
  border-radius: var(--radius);
  background: var(--green);
  color: #fff;
  font-weight: 500;
  font-size: 13px;
  transform: translateY(80px);
  opacity: 0;
  transition: all 0.3s;
  z-index: 1000;
}
.toast.show { transform: translateY(0); opacity: 1; }
.toast.error { background: var(--red); }

.panel { display: none; }
.panel.active { display: block; }

.empty { text-align: center; padding: 40px 20px; color: var(--text-muted); }

@media (max-width: 768px) {
  .config-row { flex-direction: column; align-items: flex-start; }
  .config-row label { flex: none; }
}
</style>
</head>
<body>
<div class="app">

  <header>
    <div>
      <h1><span class="logo">sportsviz</span> Dashboard</h1>
      <div class="subtitle">Running, walking and cycling statistics</div>
    </div>
    <div class="health-badges" id="health-badges"></div>
  </header>

  <nav id="nav">
    <button class="active" data-panel="yearly">Yearly Statistics</button>
    <button data-panel="monthly">Monthly Statistics</button>
    <button data-panel="year-comparison">Yearly Comparison</button>
    <button data-panel="activity-comparison">Activity Comparison</button>
    <button data-panel="recent">Recent Years</button>
    <button data-panel="time-share">Time Share</button>
    <button data-panel="evolution">Evolution</button>
    <button data-panel="config">Configuration</button>
  </nav>

  <!-- Every chart page shares this panel -->
  <div class="panel active" id="panel-chart">
    <div class="card">
      <div class="controls" id="controls"></div>
      <h2 id="chart-title"></h2>
      <h3 id="chart-subtitle"></h3>
      <div id="chart-body"></div>
    </div>
  </div>

  <div class="panel" id="panel-config">
    <div class="card">
      <div class="config-section">
        <h3>Data</h3>
        <div class="config-row">
          <label for="cfg-data-path">CSV file</label>
          <input type="text" id="cfg-data-path" data-key="data.path">
        </div>
      </div>
      <div class="config-section">
        <h3>Views</h3>
        <div class="config-row">
          <label for="cfg-views-recent_years">Recent years</label>
          <input type="number" min="1" id="cfg-views-recent_years" data-key="views.recent_years">
        </div>
        <div class="config-row">
          <label for="cfg-views-default_statistic">Default statistic</label>
          <select id="cfg-views-default_statistic" data-key="views.default_statistic">
            <option value="count">count</option>
            <option value="distance">distance</option>
            <option value="time">time</option>
          </select>
        </div>
      </div>
      <div class="config-section">
        <h3>Palette</h3>
        <div id="palette-rows"></div>
      </div>
      <div class="config-section">
        <h3>Logging</h3>
        <div class="config-row">
          <label for="cfg-logging-enabled">Render log</label>
          <input type="checkbox" id="cfg-logging-enabled" data-key="logging.enabled">
        </div>
        <div class="config-row">
          <label for="cfg-logging-level">Level</label>
          <select id="cfg-logging-level" data-key="logging.level">
            <option value="debug">debug</option>
            <option value="info">info</option>
            <option value="warn">warn</option>
            <option value="error">error</option>
          </select>
        </div>
      </div>
      <div class="btn-group">
        <button class="btn primary" id="btn-save-config">Save</button>
        <button class="btn danger" id="btn-reset-config">Reset to defaults</button>
      </div>
    </div>
  </div>

</div>
<div class="chart-tooltip" id="tooltip"></div>
<div class="toast" id="toast"></div>

<script>
// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------
let currentPanel = 'yearly';
let options = null;
let configData = null;
// Selections survive switching pages.
const selection = {};

const PAGES = {
  'yearly': ['activity', 'statistic'],
  'monthly': ['activity', 'year', 'statistic'],
  'year-comparison': ['activity', 'base_year', 'comparison_year', 'statistic'],
  'activity-comparison': ['year_any', 'base_activity', 'comparison_activity', 'statistic'],
  'recent': ['activity', 'statistic'],
  'time-share': ['year_any'],
  'evolution': ['magnitude'],
};

const PALETTE_KEYS = [
  'rank.max', 'rank.min', 'rank.other',
  'comparison.base', 'comparison.comparison',
  'span.earliest', 'span.latest', 'span.between',
  'activities.running', 'activities.walking', 'activities.cycling', 'activities.other',
];

// ---------------------------------------------------------------------------
// API helpers
// ---------------------------------------------------------------------------
async function api(method, path, body) {
  const opts = { method, headers: {} };
  if (body) {
    opts.headers['Content-Type'] = 'application/json';
    opts.body = JSON.stringify(body);
  }
  const res = await fetch(path, opts);
  const json = await res.json();
  if (!res.ok) throw new Error(json.error || res.statusText);
  return json;
}

function toast(msg, isError) {
  const el = document.getElementById('toast');
  el.textContent = msg;
  el.className = 'toast show' + (isError ? ' error' : '');
  setTimeout(() => el.className = 'toast', 3000);
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------
document.getElementById('nav').addEventListener('click', e => {
  if (e.target.tagName !== 'BUTTON') return;
  const panel = e.target.dataset.panel;
  if (!panel) return;

  document.querySelectorAll('nav button').forEach(b => b.classList.remove('active'));
  e.target.classList.add('active');

  document.querySelectorAll('.panel').forEach(p => p.classList.remove('active'));
  document.getElementById(panel === 'config' ? 'panel-config' : 'panel-chart').classList.add('active');

  currentPanel = panel;
  if (panel === 'config') {
    loadConfig();
  } else {
    renderControls();
    loadChart();
  }
});

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------
function activityYears() {
  return options.years_by_activity[selection.activity] || [];
}

function yearActivities() {
  return options.activities_by_year[selection.year_any] || [];
}

// Keep a selection valid for its option list, falling back to `fallback`.
function keep(key, values, fallback) {
  const strs = values.map(String);
  if (!strs.includes(String(selection[key]))) {
    selection[key] = fallback !== undefined ? fallback : strs[0];
  }
}

function controlSpec(name) {
  switch (name) {
    case 'activity':
      keep('activity', options.activities);
      return { label: 'Activity', key: 'activity', values: options.activities };
    case 'statistic':
      keep('statistic', options.statistics, options.default_statistic);
      return { label: 'Statistic', key: 'statistic', values: options.statistics };
    case 'year':
      keep('year', activityYears());
      return { label: 'Year', key: 'year', values: activityYears() };
    case 'year_any':
      keep('year_any', options.years);
      return { label: 'Year', key: 'year_any', values: options.years };
    case 'base_year':
      keep('base_year', activityYears());
      return { label: 'Base year', key: 'base_year', values: activityYears() };
    case 'comparison_year': {
      const rest = activityYears().filter(y => String(y) !== String(selection.base_year));
      keep('comparison_year', rest);
      return { label: 'Comparison year', key: 'comparison_year', values: rest };
    }
    case 'base_activity':
      keep('base_activity', yearActivities());
      return { label: 'Base activity', key: 'base_activity', values: yearActivities() };
    case 'comparison_activity': {
      const rest = yearActivities().filter(a => a !== selection.base_activity);
      keep('comparison_activity', rest);
      return { label: 'Comparison activity', key: 'comparison_activity', values: rest };
    }
    case 'magnitude':
      keep('magnitude', options.magnitudes);
      return { label: 'Magnitude', key: 'magnitude', values: options.magnitudes };
  }
}

function renderControls() {
  if (!options) return;
  const el = document.getElementById('controls');
  el.innerHTML = PAGES[currentPanel].map(name => {
    const control = controlSpec(name);
    const opts = control.values.map(v =>
      `<option value="${esc(String(v))}" ${String(v) === String(selection[control.key]) ? 'selected' : ''}>${esc(String(v))}</option>`
    ).join('');
    return `<label>${control.label}<select data-sel="${control.key}">${opts}</select></label>`;
  }).join('');
}

document.getElementById('controls').addEventListener('change', e => {
  const key = e.target.dataset.sel;
  if (!key) return;
  selection[key] = e.target.value;
  // Dependent option lists may have changed.
  renderControls();
  loadChart();
});

function viewQuery() {
  const q = new URLSearchParams();
  const set = (k, v) => { if (v !== undefined && v !== null && v !== '') q.set(k, v); };
  switch (currentPanel) {
    case 'yearly':
    case 'recent':
      set('activity', selection.activity);
      set('statistic', selection.statistic);
      break;
    case 'monthly':
      set('activity', selection.activity);
      set('year', selection.year);
      set('statistic', selection.statistic);
      break;
    case 'year-comparison':
      set('activity', selection.activity);
      set('base', selection.base_year);
      set('comparison', selection.comparison_year);
      set('statistic', selection.statistic);
      break;
    case 'activity-comparison':
      set('year', selection.year_any);
      set('base', selection.base_activity);
      set('comparison', selection.comparison_activity);
      set('statistic', selection.statistic);
      break;
    case 'time-share':
      set('year', selection.year_any);
      break;
    case 'evolution':
      set('magnitude', selection.magnitude);
      break;
  }
  return q.toString();
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------
async function loadChart() {
  const body = document.getElementById('chart-body');
  try {
    const chart = await api('GET', `/api/views/${currentPanel}?${viewQuery()}`);
    renderChart(chart);
  } catch (e) {
    document.getElementById('chart-title').textContent = '';
    document.getElementById('chart-subtitle').textContent = '';
    body.innerHTML = `<div class="empty">${esc(e.message)}</div>`;
  }
}

function renderChart(chart) {
  document.getElementById('chart-title').textContent = chart.title;
  document.getElementById('chart-subtitle').textContent = chart.subtitle || '';
  const body = document.getElementById('chart-body');
  switch (chart.kind) {
    case 'bar': body.innerHTML = barChart(chart); break;
    case 'grouped-bar': body.innerHTML = groupedChart(chart); break;
    case 'stacked-bar': body.innerHTML = stackedChart(chart); break;
    case 'pie': body.innerHTML = pieChart(chart); bindPie(chart); break;
  }
  bindTooltips(chart);
}

function distinct(values) {
  return values.filter((v, i) => values.indexOf(v) === i);
}

function frame(chart, columns, categories, legend) {
  return `
    <div class="plot">
      <div class="y-label">${esc(chart.y_axis_label)}</div>
      <div class="chart">${columns}</div>
    </div>
    <div class="ticks">${categories.map(c => `<div>${esc(c)}</div>`).join('')}</div>
    <div class="x-label">${esc(chart.x_axis_label)}</div>
    ${legend || ''}
  `;
}

function bar(row, index, height) {
  const color = row.color || 'transparent';
  const label = row.label ? `<div class="bar-value">${esc(row.label)}</div>` : '';
  return `<div class="bar" data-row="${index}" style="height:${height}%;background:${esc(color)}">${label}</div>`;
}

function barChart(chart) {
  const max = Math.max(...chart.rows.map(r => r.value), 0) || 1;
  const columns = chart.rows.map((r, i) =>
    `<div class="slot">${bar(r, i, (r.value / max) * 100)}</div>`
  ).join('');
  return frame(chart, columns, chart.rows.map(r => r.category));
}

function groupedChart(chart) {
  const max = Math.max(...chart.rows.map(r => r.value), 0) || 1;
  const categories = distinct(chart.rows.map(r => r.category));
  const groups = distinct(chart.rows.map(r => r.group));
  const columns = categories.map(c => {
    const bars = groups.map(g => {
      const i = chart.rows.findIndex(r => r.category === c && r.group === g);
      return i < 0 ? '' : bar(chart.rows[i], i, (chart.rows[i].value / max) * 100);
    }).join('');
    return `<div class="slot">${bars}</div>`;
  }).join('');
  const legend = `<div class="legend">${groups.map(g => {
    const row = chart.rows.find(r => r.group === g && r.color);
    return `<span><span class="swatch" style="background:${esc(row ? row.color : 'gray')}"></span>${esc(g)}</span>`;
  }).join('')}</div>`;
  return frame(chart, columns, categories, legend);
}

function legendColor(chart, name) {
  const entry = (chart.legend || []).find(l => l.name === name);
  return entry ? entry.color : 'gray';
}

function stackedChart(chart) {
  const categories = distinct(chart.rows.map(r => r.category));
  const sums = categories.map(c =>
    chart.rows.filter(r => r.category === c).reduce((s, r) => s + r.value, 0));
  const max = Math.max(...sums, 0) || 1;
  const columns = categories.map((c, ci) => {
    const segments = chart.rows.map((r, i) => {
      if (r.category !== c || r.value <= 0) return '';
      const h = (r.value / sums[ci]) * 100;
      return `<div class="bar" data-row="${i}" style="height:${h}%;background:${esc(legendColor(chart, r.group))}"></div>`;
    }).join('');
    const total = (chart.totals || []).find(t => t.category === c);
    const label = total ? `<div class="stack-total">${esc(total.label)}</div>` : '';
    return `<div class="slot"><div class="stack" style="height:${(sums[ci] / max) * 100}%">${segments}${label}</div></div>`;
  }).join('');
  const legend = `<div class="legend">${(chart.legend || []).map(l =>
    `<span><span class="swatch" style="background:${esc(l.color)}"></span>${esc(l.name)}</span>`
  ).join('')}</div>`;
  return frame(chart, columns, categories, legend);
}

function pieChart(chart) {
  const deg = rad => (rad * 180 / Math.PI).toFixed(3);
  const stops = chart.rows
    .filter(r => r.end_angle > r.start_angle)
    .map(r => `${legendColor(chart, r.category)} ${deg(r.start_angle)}deg ${deg(r.end_angle)}deg`);
  const background = stops.length ? `conic-gradient(${stops.join(', ')})` : 'var(--bg)';
  const legend = chart.rows.map(r =>
    `<span><span class="swatch" style="background:${esc(legendColor(chart, r.category))}"></span>${esc(r.category)} ${esc(r.label || '0.00%')}</span>`
  ).join('');
  return `<div class="pie-wrap"><div class="pie" id="pie" style="background:${background}"></div><div class="legend">${legend}</div></div>`;
}

// Wedge under the pointer, by angle clockwise from 12 o'clock.
function bindPie(chart) {
  const pie = document.getElementById('pie');
  pie.addEventListener('mousemove', e => {
    const box = pie.getBoundingClientRect();
    const x = e.clientX - box.left - box.width / 2;
    const y = e.clientY - box.top - box.height / 2;
    if (Math.hypot(x, y) > box.width / 2) return hideTooltip();
    let angle = Math.atan2(x, -y);
    if (angle < 0) angle += 2 * Math.PI;
    const row = chart.rows.find(r => angle >= r.start_angle && angle < r.end_angle);
    if (row) showTooltip(row, e); else hideTooltip();
  });
  pie.addEventListener('mouseleave', hideTooltip);
}

function bindTooltips(chart) {
  document.querySelectorAll('#chart-body .bar').forEach(el => {
    const row = chart.rows[Number(el.dataset.row)];
    el.addEventListener('mousemove', e => showTooltip(row, e));
    el.addEventListener('mouseleave', hideTooltip);
  });
}

function showTooltip(row, e) {
  const el = document.getElementById('tooltip');
  const head = row.group ? `${row.group} ${row.category}` : row.category;
  el.innerHTML = `<strong>${esc(head)}</strong><table>${row.tooltip.map(f =>
    `<tr><td>${esc(f.name)}</td><td>${esc(f.value)}</td></tr>`).join('')}</table>`;
  el.style.left = (e.clientX + 12) + 'px';
  el.style.top = (e.clientY + 12) + 'px';
  el.classList.add('show');
}

function hideTooltip() {
  document.getElementById('tooltip').classList.remove('show');
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------
function renderPaletteRows() {
  document.getElementById('palette-rows').innerHTML = PALETTE_KEYS.map(k => `
    <div class="config-row">
      <label for="cfg-palette-${k}">${esc(k)}</label>
      <input type="text" id="cfg-palette-${k}" data-key="palette.${k}">
    </div>
  `).join('');
}

async function loadConfig() {
  try {
    configData = await api('GET', '/api/config');
    renderConfig();
  } catch (e) {
    toast('Failed to load config: ' + e.message, true);
  }
}

function renderConfig() {
  const c = configData.config;
  setText('cfg-data-path', c.data.path);
  setText('cfg-views-recent_years', c.views.recent_years);
  setText('cfg-views-default_statistic', c.views.default_statistic);
  setToggle('cfg-logging-enabled', c.logging.enabled);
  setText('cfg-logging-level', c.logging.level);
  PALETTE_KEYS.forEach(k => {
    const [section, name] = k.split('.');
    setText('cfg-palette-' + k, c.palette[section][name]);
  });
}

function setToggle(id, val) {
  const el = document.getElementById(id);
  if (el) el.checked = !!val;
}

function setText(id, val) {
  const el = document.getElementById(id);
  if (el) el.value = val === undefined || val === null ? '' : val;
}

document.getElementById('btn-save-config').addEventListener('click', async () => {
  const updates = [];
  document.querySelectorAll('[data-key]').forEach(el => {
    const value = el.type === 'checkbox' ? (el.checked ? 'true' : 'false') : el.value;
    updates.push({ key: el.dataset.key, value });
  });

  try {
    const result = await api('PUT', '/api/config', { updates });
    if (result.success) {
      toast('Configuration saved');
      await loadOptions();
    } else {
      toast('Some settings failed: ' + result.errors.join(', '), true);
    }
  } catch (e) {
    toast('Failed to save config: ' + e.message, true);
  }
});

document.getElementById('btn-reset-config').addEventListener('click', async () => {
  if (!confirm('Reset all configuration to defaults? This will overwrite your config.toml file.')) return;

  try {
    await api('POST', '/api/config/reset');
    toast('Configuration reset to defaults');
    loadConfig();
  } catch (e) {
    toast('Failed to reset config: ' + e.message, true);
  }
});

// ---------------------------------------------------------------------------
// Health badges
// ---------------------------------------------------------------------------
async function loadHealth() {
  try {
    const h = await api('GET', '/api/health');
    document.getElementById('health-badges').innerHTML = [
      badge(h.data_ok ? `${h.records} records` : 'Data file', h.data_ok ? 'ok' : 'err'),
      badge('Config', h.config_exists ? 'ok' : 'warn'),
      badge('Log', h.logging_enabled ? 'ok' : 'warn'),
    ].join('');
  } catch (e) {
    // Badges are cosmetic
  }
}

function badge(label, cls) {
  const dot = cls === 'ok' ? '●' : cls === 'warn' ? '○' : '✕';
  return `<span class="badge ${cls}">${dot} ${esc(label)}</span>`;
}

// ---------------------------------------------------------------------------
// Utility
// ---------------------------------------------------------------------------
function esc(s) {
  if (s === undefined || s === null) return '';
  return String(s).replace(/&/g,'&amp;').replace(/</g,'&lt;').replace(/>/g,'&gt;').replace(/"/g,'&quot;');
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------
async function loadOptions() {
  try {
    options = await api('GET', '/api/options');
    if (currentPanel !== 'config') {
      renderControls();
      loadChart();
    }
  } catch (e) {
    document.getElementById('chart-body').innerHTML = `<div class="empty">${esc(e.message)}</div>`;
  }
}

renderPaletteRows();
loadHealth();
loadOptions();
</script>
</body>
</html>"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_page_has_a_nav_button() {
        for page in [
            "yearly",
            "monthly",
            "year-comparison",
            "activity-comparison",
            "recent",
            "time-share",
            "evolution",
            "config",
        ] {
            assert!(
                INDEX_HTML.contains(&format!("data-panel=\"{page}\"")),
                "missing nav button for {page}"
            );
        }
    }
}
