//! UI routes - HTML entry page for cinedex-mi
//!
//! Minimal vanilla HTML/JS; charts and richer presentation live with the
//! review service.

use axum::{
    response::{Html, IntoResponse},
    routing::get,
    Router,
};

use crate::AppState;

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new().route("/", get(root_page))
}

/// Root page - search and batch entry
async fn root_page() -> impl IntoResponse {
    Html(
        r##"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>cinedex - Movie Ingest</title>
    <style>
        body {
            font-family: system-ui, -apple-system, sans-serif;
            max-width: 800px;
            margin: 40px auto;
            padding: 20px;
            line-height: 1.6;
        }
        h1 {
            color: #333;
            border-bottom: 2px solid #0066cc;
            padding-bottom: 10px;
        }
        textarea, input[type=text] {
            width: 100%;
            box-sizing: border-box;
            font: inherit;
            padding: 8px;
        }
        .button {
            display: inline-block;
            padding: 10px 20px;
            background: #0066cc;
            color: white;
            border: none;
            border-radius: 4px;
            cursor: pointer;
            margin-top: 10px;
        }
        pre {
            background: #f5f5f5;
            padding: 12px;
            overflow-x: auto;
        }
    </style>
</head>
<body>
    <h1>cinedex - Movie Ingest</h1>

    <h2>Search one title</h2>
    <input type="text" id="search-title" placeholder="Inception">
    <button class="button" onclick="searchTitle()">Search</button>

    <h2>Batch ingest</h2>
    <p>One title per line:</p>
    <textarea id="batch-titles" rows="6" placeholder="Inception&#10;Alien&#10;Heat"></textarea>
    <button class="button" onclick="startBatch()">Start batch</button>

    <h2>Output</h2>
    <pre id="output">-</pre>

    <script>
        const output = document.getElementById('output');

        async function searchTitle() {
            const title = document.getElementById('search-title').value;
            const resp = await fetch('/api/search?title=' + encodeURIComponent(title));
            output.textContent = JSON.stringify(await resp.json(), null, 2);
        }

        async function startBatch() {
            const titles = document.getElementById('batch-titles').value;
            const resp = await fetch('/api/ingest/start', {
                method: 'POST',
                headers: {'Content-Type': 'application/json'},
                body: JSON.stringify({titles})
            });
            const started = await resp.json();
            output.textContent = JSON.stringify(started, null, 2);
            if (started.session_id) pollStatus(started.session_id);
        }

        async function pollStatus(sessionId) {
            const resp = await fetch('/api/ingest/status/' + sessionId);
            const status = await resp.json();
            output.textContent = JSON.stringify(status, null, 2);
            if (status.state === 'RUNNING') {
                setTimeout(() => pollStatus(sessionId), 1000);
            } else {
                const result = await fetch('/api/ingest/result/' + sessionId);
                output.textContent = JSON.stringify(await result.json(), null, 2);
            }
        }
    </script>
</body>
</html>
"##,
    )
}
