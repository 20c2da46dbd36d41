use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use recipe_sidebar_core::SidebarConfig;
use tempfile::tempdir;

use super::support::SiteLocation;
use super::{render_page, run_search, write_render};
use crate::cli::{PageArgs, RenderArgs};

const MANIFEST: &str = r#"[
  {"title": "Miso Soup", "slug": "miso-garbanzo", "category": "Soups", "path": "recipes/miso-garbanzo.html"},
  {"title": "Tomato Soup", "slug": "tomato-soup", "category": "Soups", "path": "recipes/tomato-soup.html"},
  {"title": "Roasted Garlic", "slug": "roasted-garlic", "category": "Sides", "path": "recipes/roasted-garlic.html"}
]"#;

fn write_site(temp: &Path) -> PathBuf {
    let root = temp.join("site");
    fs::create_dir_all(root.join("data")).expect("data dir");
    fs::create_dir_all(root.join("recipes")).expect("recipes dir");
    fs::write(root.join("data/recipes.json"), MANIFEST).expect("manifest");
    root
}

fn render_args(page: &str, filter: Option<&str>) -> RenderArgs {
    RenderArgs {
        page: PageArgs {
            page: page.to_string(),
        },
        filter: filter.map(ToString::to_string),
        collapsed: false,
        with_panel: true,
    }
}

#[test]
fn site_location_distinguishes_urls_from_directories() {
    assert_eq!(
        SiteLocation::parse("https://example.com/cookbook/"),
        SiteLocation::Url("https://example.com/cookbook".to_string())
    );
    assert_eq!(
        SiteLocation::parse("public"),
        SiteLocation::Dir(PathBuf::from("public"))
    );
}

#[test]
fn render_page_marks_current_recipe_and_requests_scroll() {
    let temp = tempdir().expect("tempdir");
    let site = SiteLocation::Dir(write_site(temp.path()));

    let (host, controller) = render_page(
        &site,
        &SidebarConfig::default(),
        &render_args("/recipes/miso-garbanzo.html", None),
    )
    .expect("render");

    assert!(!controller.is_failed());
    assert!(host.scroll_requested);
    let html = host.sidebar_html.as_deref().expect("sidebar html");
    assert!(html.contains("aria-current=\"page\""));
    assert!(html.contains("href=\"../recipes/tomato-soup.html\""));
    assert!(host.panel_html.is_some());
}

#[test]
fn render_page_applies_filter_and_writes_panel_after_separator() {
    let temp = tempdir().expect("tempdir");
    let site = SiteLocation::Dir(write_site(temp.path()));

    let (host, _controller) = render_page(
        &site,
        &SidebarConfig::default(),
        &render_args("/index.html", Some("garlic")),
    )
    .expect("render");
    assert!(!host.scroll_requested);

    let mut out = Vec::new();
    write_render(&host, true, &mut out).expect("write");
    let text = String::from_utf8(out).expect("utf8");
    assert!(text.contains("Roasted Garlic"));
    assert!(!text.contains("Miso Soup"));
    let (sidebar, panel) = text.split_once(super::PANEL_SEPARATOR).expect("separator");
    assert!(sidebar.contains("<details class=\"collapsible\" open>"));
    assert!(panel.contains("Ingredients first."));
}

#[test]
fn render_page_reports_failure_markup_when_manifest_missing() {
    let temp = tempdir().expect("tempdir");
    let site = SiteLocation::Dir(temp.path().join("site"));

    let (host, controller) = render_page(
        &site,
        &SidebarConfig::default(),
        &render_args("/index.html", None),
    )
    .expect("render");
    assert!(controller.is_failed());
    assert!(
        host.sidebar_html
            .as_deref()
            .is_some_and(|html| html.contains("Sidebar failed to load."))
    );
}

#[test]
fn run_search_emits_one_json_line_per_filter() {
    let temp = tempdir().expect("tempdir");
    let site = SiteLocation::Dir(write_site(temp.path()));
    let args = PageArgs {
        page: "/recipes/miso-garbanzo.html".to_string(),
    };

    let mut out = Vec::new();
    run_search(
        &site,
        &SidebarConfig::default(),
        &args,
        Cursor::new("gar\n\nzzz\n"),
        &mut out,
    )
    .expect("search");

    let lines = String::from_utf8(out).expect("utf8");
    let values = lines
        .lines()
        .map(|line| serde_json::from_str::<serde_json::Value>(line).expect("json line"))
        .collect::<Vec<_>>();
    assert_eq!(values.len(), 3);

    assert_eq!(values[0]["filter"], "gar");
    assert_eq!(values[0]["sections"].as_array().map(Vec::len), Some(2));
    assert_eq!(values[0]["scroll_to_current"], false);

    assert_eq!(values[1]["filter"], "");
    assert_eq!(values[1]["scroll_to_current"], true);

    assert_eq!(values[2]["sections"].as_array().map(Vec::len), Some(0));
    assert!(
        values[2]["html"]
            .as_str()
            .is_some_and(|html| html.contains("No matches."))
    );
}

#[test]
fn run_search_fails_when_manifest_cannot_load() {
    let temp = tempdir().expect("tempdir");
    let site = SiteLocation::Dir(temp.path().join("site"));
    let args = PageArgs {
        page: "/index.html".to_string(),
    };
    let mut out = Vec::new();
    let err = run_search(
        &site,
        &SidebarConfig::default(),
        &args,
        Cursor::new("soup\n"),
        &mut out,
    )
    .expect_err("must fail");
    assert!(err.to_string().contains("could not be loaded"));
    assert!(out.is_empty());
}
