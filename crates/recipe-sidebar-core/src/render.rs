use std::fmt::Display;

use serde::Serialize;

use crate::grouping::CategoryIndex;
use crate::html::escape_html;
use crate::models::{RecipeRecord, ViewContext};

pub const NO_MATCHES_HTML: &str = r#"<div class="text-muted">No matches.</div>"#;

pub const ALL_RECIPES_INTRO_HTML: &str = r#"<p>Ingredients first. Procedures second.</p>
<p class="text-muted">
  This collection focuses on simple, whole-food recipes inspired by longevity traditions and everyday cooking.
</p>
<ul class="text-muted">
  <li>Browse by category on the left</li>
  <li>Search by name or ingredient</li>
  <li>Click any recipe for a clean, printable format</li>
</ul>"#;

pub const ALL_RECIPES_FAILURE_HTML: &str =
    r#"<div class="text-muted">Failed to load recipes.</div>"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionSummary {
    pub category: String,
    pub matches: usize,
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarMarkup {
    pub html: String,
    pub sections: Vec<SectionSummary>,
    /// True when a link was marked `aria-current="page"`.
    pub current_link_rendered: bool,
}

impl SidebarMarkup {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Trimmed, lowercased search text. Empty means "no filter".
#[must_use]
pub fn normalize_filter(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Literal substring test over title and slug; `query` must already be
/// normalized.
#[must_use]
pub fn record_matches(record: &RecipeRecord, query: &str) -> bool {
    query.is_empty()
        || record.title().to_lowercase().contains(query)
        || record.slug().to_lowercase().contains(query)
}

#[must_use]
pub fn render_sidebar(
    filter: &str,
    index: &CategoryIndex,
    view: &ViewContext,
    collapse_by_default: bool,
) -> SidebarMarkup {
    let query = normalize_filter(filter);
    let mut html = String::new();
    let mut sections = Vec::new();
    let mut current_link_rendered = false;

    for bucket in index.buckets() {
        let rows = bucket
            .recipes
            .iter()
            .filter(|record| record_matches(record, &query))
            .collect::<Vec<_>>();
        if rows.is_empty() {
            continue;
        }

        let open = section_starts_open(&bucket.name, &query, view, collapse_by_default);

        let mut list_html = String::new();
        for record in &rows {
            let is_current = view.is_current(record);
            current_link_rendered |= is_current;
            list_html.push_str(&render_link_row(record, view, is_current));
        }

        html.push_str(&format!(
            "<details class=\"collapsible\"{open_attr}>\n  <summary>{name} <span class=\"cat-count\">({count})</span></summary>\n  <div class=\"collapsible-body\">\n    <ul>{list_html}</ul>\n  </div>\n</details>\n",
            open_attr = if open { " open" } else { "" },
            name = escape_html(&bucket.name),
            count = rows.len(),
        ));
        sections.push(SectionSummary {
            category: bucket.name.clone(),
            matches: rows.len(),
            open,
        });
    }

    if sections.is_empty() {
        html.push_str(NO_MATCHES_HTML);
    }

    tracing::debug!(
        operation = "render",
        query = %query,
        sections = sections.len(),
        current_link_rendered,
        "rendered sidebar"
    );

    SidebarMarkup {
        html,
        sections,
        current_link_rendered,
    }
}

/// A non-empty query opens every rendered section. Without one, only the
/// current recipe's section opens, and only when the page does not ask for
/// everything collapsed.
#[must_use]
pub fn section_starts_open(
    category: &str,
    query: &str,
    view: &ViewContext,
    collapse_by_default: bool,
) -> bool {
    if !query.is_empty() {
        return true;
    }
    !collapse_by_default
        && view.is_recipe_page
        && view.current_category.as_deref() == Some(category)
}

fn render_link_row(record: &RecipeRecord, view: &ViewContext, is_current: bool) -> String {
    let href = format!("{}{}", view.link_prefix, record.path());
    format!(
        "\n      <li><a href=\"{href}\"{current}>{title}</a></li>",
        href = escape_html(&href),
        current = if is_current {
            " aria-current=\"page\""
        } else {
            ""
        },
        title = escape_html(record.title()),
    )
}

/// Inline notice shown in place of the sidebar when the manifest could not
/// be loaded.
#[must_use]
pub fn render_load_failure(error: &dyn Display) -> String {
    format!(
        "<div class=\"text-muted\">\n  Sidebar failed to load.<br />\n  <code>{}</code>\n</div>",
        escape_html(&error.to_string())
    )
}
