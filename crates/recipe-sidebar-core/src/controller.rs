use crate::config::SidebarConfig;
use crate::error::{Result, SidebarError};
use crate::grouping::CategoryIndex;
use crate::manifest::{ManifestFetcher, load_manifest};
use crate::models::{ManifestLoad, ViewContext};
use crate::render::{
    ALL_RECIPES_FAILURE_HTML, ALL_RECIPES_INTRO_HTML, SidebarMarkup, normalize_filter,
    render_load_failure, render_sidebar,
};

/// The page the sidebar lives on. Implementations own the real elements
/// (a DOM, a captured buffer, a test recorder) and apply markup verbatim.
pub trait SidebarHost {
    fn has_sidebar_container(&self) -> bool;
    fn has_search_input(&self) -> bool;
    /// The "all recipes" description panel, present on the index page only.
    fn has_all_recipes_panel(&self) -> bool;
    /// Value of the body's `data-sidebar-collapsed` attribute, if present.
    fn sidebar_collapsed_attribute(&self) -> Option<String>;
    fn location_path(&self) -> String;
    fn set_sidebar_html(&mut self, html: &str);
    fn set_all_recipes_html(&mut self, html: &str);
    /// Scroll the `aria-current` link to the vertical centre of the sidebar.
    fn scroll_current_link_into_view(&mut self);
}

#[must_use]
pub fn parse_collapse_flag(raw: Option<&str>) -> bool {
    raw == Some("true")
}

#[derive(Debug, Clone)]
enum ControllerState {
    Loading,
    Ready {
        index: CategoryIndex,
        view: ViewContext,
    },
    Failed,
}

/// Search controller: owns the filter text and the loaded index, and
/// re-renders the host's sidebar for every input event.
#[derive(Debug, Clone)]
pub struct SidebarController {
    collapse_by_default: bool,
    filter: String,
    state: ControllerState,
}

impl SidebarController {
    /// `None` when the page has no sidebar container or no search input;
    /// the sidebar simply does not apply there.
    pub fn mount<H: SidebarHost + ?Sized>(host: &H) -> Option<Self> {
        if !host.has_sidebar_container() || !host.has_search_input() {
            tracing::debug!(operation = "mount", "sidebar elements absent; skipping");
            return None;
        }
        Some(Self {
            collapse_by_default: parse_collapse_flag(host.sidebar_collapsed_attribute().as_deref()),
            filter: String::new(),
            state: ControllerState::Loading,
        })
    }

    #[must_use]
    pub fn with_collapse_override(mut self, collapse_by_default: Option<bool>) -> Self {
        if let Some(value) = collapse_by_default {
            self.collapse_by_default = value;
        }
        self
    }

    pub fn on_load_complete<H: SidebarHost + ?Sized>(
        &mut self,
        host: &mut H,
        result: Result<ManifestLoad>,
    ) -> Option<SidebarMarkup> {
        if !matches!(self.state, ControllerState::Loading) {
            tracing::warn!(operation = "load_complete", "manifest already settled; ignoring");
            return None;
        }

        match result {
            Ok(loaded) => {
                let index = CategoryIndex::build(&loaded.items);
                let view = ViewContext::resolve(&loaded.source, &host.location_path(), &loaded.items);
                self.state = ControllerState::Ready { index, view };
                if host.has_all_recipes_panel() {
                    host.set_all_recipes_html(ALL_RECIPES_INTRO_HTML);
                }
                self.filter.clear();
                self.render_into(host)
            }
            Err(err) => {
                self.fail(host, &err);
                None
            }
        }
    }

    /// Replaces the filter with `text` and re-renders immediately.
    pub fn on_filter_changed<H: SidebarHost + ?Sized>(
        &mut self,
        host: &mut H,
        text: &str,
    ) -> Option<SidebarMarkup> {
        if !matches!(self.state, ControllerState::Ready { .. }) {
            return None;
        }
        text.clone_into(&mut self.filter);
        self.render_into(host)
    }

    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    #[must_use]
    pub fn collapse_by_default(&self) -> bool {
        self.collapse_by_default
    }

    #[must_use]
    pub fn index(&self) -> Option<&CategoryIndex> {
        match &self.state {
            ControllerState::Ready { index, .. } => Some(index),
            _ => None,
        }
    }

    #[must_use]
    pub fn view(&self) -> Option<&ViewContext> {
        match &self.state {
            ControllerState::Ready { view, .. } => Some(view),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.state, ControllerState::Failed)
    }

    fn render_into<H: SidebarHost + ?Sized>(&self, host: &mut H) -> Option<SidebarMarkup> {
        let ControllerState::Ready { index, view } = &self.state else {
            return None;
        };
        let markup = render_sidebar(&self.filter, index, view, self.collapse_by_default);
        host.set_sidebar_html(&markup.html);
        if view.is_recipe_page
            && normalize_filter(&self.filter).is_empty()
            && markup.current_link_rendered
        {
            host.scroll_current_link_into_view();
        }
        Some(markup)
    }

    fn fail<H: SidebarHost + ?Sized>(&mut self, host: &mut H, err: &SidebarError) {
        tracing::error!(operation = "load_complete", error = %err, "sidebar failed to load");
        self.state = ControllerState::Failed;
        host.set_sidebar_html(&render_load_failure(err));
        if host.has_all_recipes_panel() {
            host.set_all_recipes_html(ALL_RECIPES_FAILURE_HTML);
        }
    }
}

/// Mounts on `host`, loads the manifest through `fetcher`, and performs the
/// initial render. Returns the controller for subsequent input events.
pub fn run<H, F>(host: &mut H, fetcher: &F, config: &SidebarConfig) -> Option<SidebarController>
where
    H: SidebarHost + ?Sized,
    F: ManifestFetcher + ?Sized,
{
    let mut controller =
        SidebarController::mount(host)?.with_collapse_override(config.collapse_by_default);
    let result = load_manifest(fetcher, &config.manifest_candidates);
    controller.on_load_complete(host, result);
    Some(controller)
}
