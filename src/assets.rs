//! Embedded styles and page script for the dashboard shell.
//!
//! Everything ships inside the binary as string constants; no external
//! assets, no build tooling.

pub const STYLES_CSS: &str = r#"
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
  max-width: 1100px;
  margin: 0 auto;
  padding: 24px;
}

header {
  display: flex;
  align-items: baseline;
  gap: 12px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}
header h1 { font-size: 22px; font-weight: 600; }
header .subtitle { color: var(--text-muted); font-size: 13px; }

.tabs { display: flex; gap: 8px; margin: 16px 0; }
.tab, .filter, .cal-nav button {
  background: var(--surface);
  color: var(--text);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 6px 14px;
  cursor: pointer;
  font-size: 13px;
}
.tab.active, .filter.active { border-color: var(--accent); color: var(--accent); }

.panel { display: none; }
.panel.active { display: block; }

.stats { display: flex; gap: 12px; margin-bottom: 16px; }
.stat {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 10px 16px;
  display: flex;
  flex-direction: column;
  min-width: 96px;
}
.stat-value { font-size: 20px; font-weight: 600; }
.stat-label { color: var(--text-muted); font-size: 12px; }

.filters { display: flex; gap: 8px; margin-bottom: 12px; }

.feed { list-style: none; }
.feed-item {
  display: flex;
  gap: 12px;
  padding: 8px 10px;
  border-bottom: 1px solid var(--border);
}
.feed-when { color: var(--text-muted); white-space: nowrap; min-width: 72px; }
.feed-content { font-family: var(--mono); font-size: 13px; word-break: break-word; }
.kind-tool .feed-content { color: var(--accent); }
.kind-cron .feed-content { color: var(--yellow); }

.empty, .load-error {
  color: var(--text-muted);
  padding: 32px;
  text-align: center;
}
.load-error { color: var(--red); }

.cal-header {
  display: flex;
  justify-content: space-between;
  align-items: center;
  margin-bottom: 12px;
}
.cal-title { font-size: 16px; font-weight: 600; }
.cal-nav { display: flex; gap: 6px; }
.cal-grid {
  display: grid;
  grid-template-columns: repeat(7, 1fr);
  gap: 6px;
}
.cal-day {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  min-height: 110px;
  padding: 6px;
}
.cal-day.today { border-color: var(--accent); }
.cal-day-head { color: var(--text-muted); font-size: 12px; margin-bottom: 6px; }
.event {
  display: block;
  width: 100%;
  text-align: left;
  background: none;
  border: none;
  border-left: 3px solid var(--green);
  color: var(--text);
  font-size: 12px;
  padding: 3px 6px;
  margin-bottom: 4px;
  cursor: pointer;
}
.event.recurring { border-left-color: var(--accent); }
.event-time { color: var(--text-muted); }

.job-detail {
  margin-top: 16px;
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 16px;
}
.job-head { display: flex; justify-content: space-between; align-items: center; }
.job-name { font-size: 16px; font-weight: 600; }
.job-schedule { color: var(--accent); margin: 4px 0 8px; }
.job-description { color: var(--text-muted); margin-bottom: 12px; }
.job-row { padding: 4px 0; }
.job-row .label {
  display: inline-block;
  min-width: 88px;
  color: var(--text-muted);
  font-size: 12px;
  text-transform: uppercase;
}
.job-script {
  font-family: var(--mono);
  font-size: 12px;
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 10px;
  margin-top: 10px;
  overflow-x: auto;
}
.status {
  font-size: 12px;
  padding: 2px 10px;
  border-radius: 10px;
  border: 1px solid var(--border);
}
.status-ok { color: var(--green); }
.status-error { color: var(--red); }
.status-pending { color: var(--yellow); }

#search-input {
  width: 100%;
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  color: var(--text);
  padding: 10px 14px;
  font-size: 14px;
  margin-bottom: 12px;
}
.result {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 10px 14px;
  margin-bottom: 8px;
}
.result-meta { display: flex; gap: 10px; margin-bottom: 4px; }
.result-file { color: var(--accent); font-family: var(--mono); font-size: 12px; }
.result-kind { color: var(--text-muted); font-size: 12px; }
.snippet { font-size: 13px; word-break: break-word; }
.snippet mark { background: var(--yellow); color: var(--bg); border-radius: 2px; }
"#;

pub const PAGE_JS: &str = r#"
(function () {
  'use strict';

  function fill(id, html) {
    document.getElementById(id).innerHTML = html;
  }

  function fetchInto(id, url) {
    fetch(url)
      .then(function (res) { return res.text(); })
      .then(function (html) { fill(id, html); })
      .catch(function () {});
  }

  // Tabs
  document.querySelectorAll('.tab').forEach(function (tab) {
    tab.addEventListener('click', function () {
      document.querySelectorAll('.tab').forEach(function (t) { t.classList.remove('active'); });
      document.querySelectorAll('.panel').forEach(function (p) { p.classList.remove('active'); });
      tab.classList.add('active');
      document.getElementById('panel-' + tab.dataset.tab).classList.add('active');
    });
  });

  // Activity filters
  document.querySelectorAll('.filter').forEach(function (button) {
    button.addEventListener('click', function () {
      document.querySelectorAll('.filter').forEach(function (b) { b.classList.remove('active'); });
      button.classList.add('active');
      fetchInto('activity-body', '/fragment/activity?filter=' + button.dataset.filter);
    });
  });

  // Calendar navigation; the grid carries its own week start.
  var DAY_MS = 86400000;
  var weekStartMs = null;

  function currentWeekStart() {
    if (weekStartMs !== null) return weekStartMs;
    var grid = document.querySelector('.cal-grid');
    if (grid && grid.dataset.weekStart) {
      return new Date(grid.dataset.weekStart + 'T12:00:00').getTime();
    }
    return Date.now();
  }

  document.addEventListener('click', function (ev) {
    var nav = ev.target.closest('[data-week]');
    if (nav) {
      var mode = nav.dataset.week;
      if (mode === 'today') {
        weekStartMs = null;
        fetchInto('calendar-body', '/fragment/calendar');
      } else {
        var delta = mode === 'prev' ? -7 * DAY_MS : 7 * DAY_MS;
        weekStartMs = currentWeekStart() + delta;
        fetchInto('calendar-body', '/fragment/calendar?start=' + weekStartMs);
      }
      return;
    }
    var event = ev.target.closest('.event[data-job]');
    if (event) {
      fetchInto('job-detail', '/fragment/job/' + encodeURIComponent(event.dataset.job));
    }
  });

  // Debounced search: a keystroke cancels the pending evaluation and a
  // search only runs 300ms after the last one.
  var searchTimer = null;
  var input = document.getElementById('search-input');
  if (input) {
    input.addEventListener('input', function () {
      if (searchTimer !== null) clearTimeout(searchTimer);
      var query = input.value;
      searchTimer = setTimeout(function () {
        searchTimer = null;
        fetchInto('search-body', '/fragment/search?q=' + encodeURIComponent(query));
      }, 300);
    });
  }
})();
"#;
