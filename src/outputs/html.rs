//! The index page served at `/`.
//!
//! A single self-contained HTML document: a source picker, a category
//! picker and a results list filled from `/fetch_news`, plus a probe link
//! per source pointing at `/test_feed/{source}`.

use crate::models::Category;
use crate::pipeline::ALL;
use crate::utils::escape_html;

const SCRIPT: &str = r#"
async function loadNews() {
  const source = document.getElementById('source').value;
  const category = document.getElementById('category').value;
  const params = new URLSearchParams({ source, category });
  const list = document.getElementById('articles');
  list.innerHTML = '<li>Loading…</li>';
  const response = await fetch('/fetch_news?' + params);
  const articles = response.ok ? await response.json() : [];
  list.innerHTML = '';
  if (articles.length === 0) {
    list.innerHTML = '<li>No articles found.</li>';
    return;
  }
  for (const article of articles) {
    const item = document.createElement('li');
    const link = document.createElement('a');
    if (/^https?:/i.test(article.link)) {
      link.href = article.link;
    }
    link.textContent = article.title;
    const meta = document.createElement('small');
    meta.textContent = ` ${article.source} · ${article.category} · ${article.timestamp}`;
    const summary = document.createElement('p');
    summary.textContent = article.summary;
    item.append(link, meta, summary);
    list.appendChild(item);
  }
}
"#;

fn option(value: &str, label: &str) -> String {
    format!(
        "      <option value=\"{}\">{}</option>\n",
        escape_html(value),
        escape_html(label)
    )
}

/// Render the index page for the given source names, in order.
pub fn render_index<'a>(source_names: impl IntoIterator<Item = &'a str>) -> String {
    let names: Vec<&str> = source_names.into_iter().collect();

    let mut html = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\">\n  <title>News</title>\n</head>\n<body>\n  <h1>News</h1>\n",
    );

    html.push_str("  <form onsubmit=\"loadNews(); return false;\">\n");
    html.push_str("    <select id=\"source\" name=\"source\">\n");
    html.push_str(&option(ALL, "All sources"));
    for name in &names {
        html.push_str(&option(name, name));
    }
    html.push_str("    </select>\n");

    html.push_str("    <select id=\"category\" name=\"category\">\n");
    html.push_str(&option(ALL, "All categories"));
    for category in Category::ALL {
        html.push_str(&option(category.as_str(), category.as_str()));
    }
    html.push_str("    </select>\n    <button type=\"submit\">Fetch</button>\n  </form>\n");

    html.push_str("  <ul id=\"articles\"></ul>\n");

    html.push_str("  <h2>Sources</h2>\n  <ul id=\"sources\">\n");
    for name in &names {
        html.push_str(&format!(
            "    <li>{} (<a href=\"/test_feed/{}\">test feed</a>)</li>\n",
            escape_html(name),
            urlencoding::encode(name)
        ));
    }
    html.push_str("  </ul>\n");

    html.push_str(&format!("  <script>{SCRIPT}</script>\n</body>\n</html>\n"));
    html
}
