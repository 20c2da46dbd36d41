use clap::Args;

#[derive(Debug, Clone, Args)]
pub struct PageArgs {
    /// Location path of the page being viewed, e.g. `/recipes/miso-soup.html`.
    #[arg(long, default_value = "/index.html")]
    pub page: String,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub page: PageArgs,
    /// Search text applied after the initial render.
    #[arg(long, allow_hyphen_values = true)]
    pub filter: Option<String>,
    /// Start every section collapsed, as `data-sidebar-collapsed="true"` does.
    #[arg(long, default_value_t = false)]
    pub collapsed: bool,
    /// Also print the "all recipes" panel markup.
    #[arg(long, default_value_t = false)]
    pub with_panel: bool,
}
