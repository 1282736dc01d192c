use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::config::AppConfig;
use crate::server::api::{self, ApiError};

pub struct HttpResponse {
    pub status_code: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

pub fn route_request(config: &AppConfig, method: &str, path: &str, body: &str) -> HttpResponse {
    let route = path.split('?').next().unwrap_or(path);
    match (method, route) {
        ("GET", "/") => HttpResponse {
            status_code: 200,
            content_type: "text/html; charset=utf-8",
            body: index_html(&config.default_url),
        },
        ("GET", "/api/health") => match api::health_payload() {
            Ok(payload) => json_response(payload),
            Err(err) => error_response(500, &err.to_string()),
        },
        ("POST", "/api/catalog/normalize") => match api::normalize_payload(body) {
            Ok(payload) => json_response(payload),
            Err(err) => api_error_response(err),
        },
        ("POST", "/api/catalog/fetch") => match api::fetch_payload(body, &config.source) {
            Ok(payload) => json_response(payload),
            Err(err) => api_error_response(err),
        },
        _ => error_response(404, &format!("No route for {method} {route}")),
    }
}

fn json_response(body: String) -> HttpResponse {
    HttpResponse {
        status_code: 200,
        content_type: "application/json",
        body,
    }
}

fn api_error_response(err: ApiError) -> HttpResponse {
    let status_code = match &err {
        ApiError::BadRequest(_) => 400,
        ApiError::Load(_) => 502,
        ApiError::Report(_) => 500,
    };
    warn!(status = status_code, error = %err, "catalog request failed");
    error_response(status_code, &err.to_string())
}

fn error_response(status_code: u16, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}

fn index_html(default_url: &str) -> String {
    let default_url = serde_json::to_string(default_url).unwrap_or_else(|_| "\"\"".to_string());
    INDEX_TEMPLATE.replace("__DEFAULT_URL__", &default_url)
}

const INDEX_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>Metadata Viewer</title>
  <style>
    body { font-family: Arial, sans-serif; max-width: 1200px; margin: 24px auto; padding: 0 12px; }
    .card { border: 1px solid #ddd; border-radius: 8px; padding: 14px; margin: 14px 0; }
    label { display:block; margin: 8px 0 4px; font-weight: 600; }
    input[type=text] { width: 100%; padding: 8px; box-sizing: border-box; }
    button { margin-top: 12px; padding: 8px 14px; }
    .notice { padding: 10px; border-radius: 6px; margin: 12px 0; }
    .success { background: #e6f4ea; color: #1e4620; }
    .warning { background: #fff4e5; color: #663c00; }
    .error { background: #fdecea; color: #611a15; }
    .table-wrap { overflow: auto; max-height: 70vh; }
    table { border-collapse: collapse; font-size: 0.85rem; }
    th, td { border: 1px solid #ddd; padding: 4px 6px; vertical-align: top; white-space: nowrap; max-width: 360px; overflow: hidden; text-overflow: ellipsis; }
    th { background: #f5f5f5; position: sticky; top: 0; }
  </style>
</head>
<body>
  <h1>Metadata Viewer</h1>

  <div class="card">
    <label><input type="radio" name="source" value="url" checked /> From URL</label>
    <label><input type="radio" name="source" value="file" /> From local file (.json)</label>
    <div id="url-source">
      <label for="url">Enter the URL to data.json:</label>
      <input id="url" type="text" />
      <button id="load-btn">Load Catalog</button>
    </div>
    <div id="file-source" style="display:none">
      <label for="file">Upload data.json</label>
      <input id="file" type="file" accept=".json,application/json" />
    </div>
  </div>

  <div id="notice"></div>
  <h2 id="table-title" style="display:none">Metadata</h2>
  <div class="table-wrap"><table id="table"></table></div>

  <script>
    const urlEl = document.getElementById('url');
    const noticeEl = document.getElementById('notice');
    const tableEl = document.getElementById('table');
    const titleEl = document.getElementById('table-title');
    urlEl.value = __DEFAULT_URL__;

    document.querySelectorAll('input[name=source]').forEach(radio => {
      radio.addEventListener('change', () => {
        const fromUrl = radio.value === 'url' && radio.checked;
        document.getElementById('url-source').style.display = fromUrl ? '' : 'none';
        document.getElementById('file-source').style.display = fromUrl ? 'none' : '';
      });
    });

    function showNotice(kind, text) {
      noticeEl.className = 'notice ' + kind;
      noticeEl.textContent = text;
    }

    function renderTable(payload) {
      tableEl.replaceChildren();
      titleEl.style.display = payload.rows.length ? '' : 'none';
      if (!payload.rows.length) return;
      const head = tableEl.createTHead().insertRow();
      payload.columns.forEach(column => {
        const th = document.createElement('th');
        th.textContent = column;
        head.appendChild(th);
      });
      const body = tableEl.createTBody();
      payload.rows.forEach(row => {
        const tr = body.insertRow();
        payload.columns.forEach(column => {
          const value = row[column];
          tr.insertCell().textContent = value === null || value === undefined ? '' : String(value);
        });
      });
    }

    async function submit(path, body) {
      showNotice('warning', 'Loading…');
      try {
        const response = await fetch(path, { method: 'POST', headers: { 'Content-Type': 'application/json' }, body });
        const payload = await response.json();
        if (!response.ok) {
          showNotice('error', 'Error: ' + payload.message);
          renderTable({ columns: [], rows: [] });
          return;
        }
        showNotice(payload.status === 'last_updated' ? 'success' : 'warning', payload.notice);
        renderTable(payload);
      } catch (err) {
        showNotice('error', 'Error: ' + err);
      }
    }

    document.getElementById('load-btn').addEventListener('click', () => {
      submit('/api/catalog/fetch', JSON.stringify({ url: urlEl.value }));
    });

    document.getElementById('file').addEventListener('change', event => {
      const file = event.target.files[0];
      if (!file) return;
      file.text().then(text => submit('/api/catalog/normalize', text));
    });
  </script>
</body>
</html>
"#;
