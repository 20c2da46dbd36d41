use recipe_sidebar_core::SidebarHost;

/// Host that captures markup instead of mutating a page.
#[derive(Debug, Clone, Default)]
pub(crate) struct CaptureHost {
    location: String,
    with_panel: bool,
    pub(crate) sidebar_html: Option<String>,
    pub(crate) panel_html: Option<String>,
    pub(crate) scroll_requested: bool,
}

impl CaptureHost {
    pub(crate) fn new(location: &str, with_panel: bool) -> Self {
        Self {
            location: location.to_string(),
            with_panel,
            ..Self::default()
        }
    }
}

impl SidebarHost for CaptureHost {
    fn has_sidebar_container(&self) -> bool {
        true
    }

    fn has_search_input(&self) -> bool {
        true
    }

    fn has_all_recipes_panel(&self) -> bool {
        self.with_panel
    }

    fn sidebar_collapsed_attribute(&self) -> Option<String> {
        None
    }

    fn location_path(&self) -> String {
        self.location.clone()
    }

    fn set_sidebar_html(&mut self, html: &str) {
        self.sidebar_html = Some(html.to_string());
        self.scroll_requested = false;
    }

    fn set_all_recipes_html(&mut self, html: &str) {
        self.panel_html = Some(html.to_string());
    }

    fn scroll_current_link_into_view(&mut self) {
        self.scroll_requested = true;
    }
}
