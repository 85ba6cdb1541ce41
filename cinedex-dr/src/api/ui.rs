//! UI route - HTML index for cinedex-dr
//!
//! Single page that renders the listing and the stats endpoints as plain
//! tables. Chart styling is left to richer frontends.

use axum::response::{Html, IntoResponse};

/// GET /
pub async fn serve_index() -> impl IntoResponse {
    Html(
        r##"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>cinedex - Database Review</title>
    <style>
        body {
            font-family: system-ui, -apple-system, sans-serif;
            max-width: 960px;
            margin: 40px auto;
            padding: 20px;
            line-height: 1.6;
        }
        h1 {
            color: #333;
            border-bottom: 2px solid #0066cc;
            padding-bottom: 10px;
        }
        table { border-collapse: collapse; width: 100%; }
        th, td { border: 1px solid #ddd; padding: 6px 10px; text-align: left; }
        th { background: #f5f5f5; }
        .links a { margin-right: 16px; }
    </style>
</head>
<body>
    <h1>cinedex - Database Review</h1>
    <p class="links">
        <a href="#" onclick="loadMovies(); return false;">Movies</a>
        <a href="#" onclick="loadStats('summary'); return false;">Summary</a>
        <a href="#" onclick="loadStats('genres'); return false;">Genres</a>
        <a href="#" onclick="loadStats('ratings'); return false;">Ratings</a>
        <a href="#" onclick="loadStats('years'); return false;">Years</a>
        <a href="/api/export/movies.csv">Export CSV</a>
    </p>
    <div id="content">Loading...</div>

    <script>
        const content = document.getElementById('content');

        function renderTable(rows) {
            if (!rows.length) { content.textContent = 'No data'; return; }
            const cols = Object.keys(rows[0]);
            let html = '<table><tr>' + cols.map(c => '<th>' + c + '</th>').join('') + '</tr>';
            for (const row of rows) {
                html += '<tr>' + cols.map(c => '<td>' + JSON.stringify(row[c] ?? '') + '</td>').join('') + '</tr>';
            }
            content.innerHTML = html + '</table>';
        }

        async function loadMovies() {
            const resp = await fetch('/api/movies');
            const data = await resp.json();
            renderTable(data.movies);
        }

        async function loadStats(kind) {
            const resp = await fetch('/api/stats/' + kind);
            const data = await resp.json();
            renderTable(Array.isArray(data) ? data : [data]);
        }

        loadMovies();
    </script>
</body>
</html>
"##,
    )
}
