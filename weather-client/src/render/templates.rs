//! Embedded page templates, compiled once with HTML autoescaping.

use std::sync::LazyLock;
use tera::{Context, Tera};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template rendering failed: {0}")]
    Render(String),

    #[error("Template compilation failed: {0}")]
    Compile(String),
}

impl From<tera::Error> for TemplateError {
    fn from(e: tera::Error) -> Self {
        match e.kind {
            tera::ErrorKind::TemplateNotFound(name) => Self::NotFound(name),
            _ => Self::Render(e.to_string()),
        }
    }
}

pub const NO_DATA: &str = "no_data.html";
pub const CURRENT: &str = "current.html";
pub const DAY_CARDS: &str = "day_cards.html";
pub const SEARCH_ERROR: &str = "search_error.html";
pub const SEARCHES: &str = "searches.html";
pub const RECORDS: &str = "records.html";
pub const RECORD_RANGE: &str = "record_range.html";
pub const PAGE: &str = "page.html";

mod embedded {
    pub const NO_DATA: &str = "<p class='text-xs text-neutral-500'>No data</p>";

    pub const CURRENT: &str = "{% for stat in stats %}<div>\
        <div class='text-[10px] text-neutral-400 uppercase'>{{ stat.label }}</div>\
        {% if stat.large %}<div class='text-lg'>{% else %}<div>{% endif %}{{ stat.value }}</div>\
        </div>{% endfor %}";

    pub const DAY_CARDS: &str = "{% for day in days %}<div class='p-2 rounded bg-neutral-800/40'>\
        <div class='text-[10px] text-neutral-400'>{{ day.label }}</div>\
        <div class='text-sm'>{{ day.max }}/{{ day.min }}°C</div>\
        <div class='text-[10px] text-neutral-500'>W {{ day.wind }}</div>\
        </div>{% endfor %}";

    pub const SEARCH_ERROR: &str = "<p class='text-red-400 text-xs'>{{ message }}</p>";

    pub const SEARCHES: &str = "{% for s in searches %}<div class='flex items-center justify-between group border border-neutral-800 hover:border-neutral-600 rounded px-2 py-1 text-[11px]'>\
        <div class='flex-1 overflow-hidden truncate'>\
        <a href='{{ s.href | safe }}' class='text-neutral-200 hover:underline'>{{ s.query }}</a>\
        <span class='text-neutral-500 ml-2'>{{ s.when }}</span>\
        </div>\
        <button data-del-search='{{ s.id }}' class='opacity-0 group-hover:opacity-100 text-[10px] px-2 py-0.5 border border-neutral-700 rounded hover:border-red-500 hover:text-red-400'>x</button>\
        </div>{% endfor %}";

    pub const RECORDS: &str = "{% for r in records %}<div class='flex items-center justify-between group border border-neutral-800 hover:border-neutral-600 rounded px-2 py-1 text-[11px]' data-id='{{ r.id }}'>\
        <div class='flex-1 overflow-hidden'>\
        <a href='{{ r.href | safe }}' class='text-neutral-200 hover:underline'>{{ r.name }}</a>\
        <span class='text-neutral-500 ml-2'>{{ r.start }}→{{ r.end }}</span>\
        </div>\
        <div class='flex gap-1 opacity-0 group-hover:opacity-100'>\
        <button data-view='{{ r.id }}' class='px-2 py-0.5 border border-neutral-700 rounded hover:border-neutral-500'>quick</button>\
        <button data-del='{{ r.id }}' class='px-2 py-0.5 border border-neutral-700 rounded hover:border-red-500 hover:text-red-400'>x</button>\
        </div>\
        </div>{% endfor %}";

    pub const RECORD_RANGE: &str =
        "<p class='text-xs text-neutral-400'>Range: {{ start }} → {{ end }}</p>";

    pub const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Weather</title>
</head>
<body>
<form id="search-form"><input id="location-input" value="{{ location }}"></form>
<h2><span id="place">{{ place | safe }}</span></h2>
<div id="current">{{ current | safe }}</div>
<div id="forecast">{{ forecast | safe }}</div>
<div id="searches">{{ searches | safe }}</div>
<form id="record-form"><input id="rec-location" value="{{ rec_location }}"><input id="rec-start" value="{{ rec_start }}"><input id="rec-end" value="{{ rec_end }}"></form>
<div id="records">{{ records | safe }}</div>
</body>
</html>
"#;
}

static TEMPLATES: LazyLock<Result<Tera, String>> =
    LazyLock::new(|| compile().map_err(|e| e.to_string()));

fn compile() -> tera::Result<Tera> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![".html"]);
    tera.add_raw_templates(vec![
        (NO_DATA, embedded::NO_DATA),
        (CURRENT, embedded::CURRENT),
        (DAY_CARDS, embedded::DAY_CARDS),
        (SEARCH_ERROR, embedded::SEARCH_ERROR),
        (SEARCHES, embedded::SEARCHES),
        (RECORDS, embedded::RECORDS),
        (RECORD_RANGE, embedded::RECORD_RANGE),
        (PAGE, embedded::PAGE),
    ])?;
    Ok(tera)
}

pub fn render(name: &str, context: &Context) -> Result<String, TemplateError> {
    let tera = TEMPLATES.as_ref().map_err(|e| TemplateError::Compile(e.clone()))?;
    Ok(tera.render(name, context)?)
}
