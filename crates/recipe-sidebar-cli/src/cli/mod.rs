use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod args;


pub use args::{PageArgs, RenderArgs};

#[derive(Debug, Parser)]
#[command(name = "recipe-sidebar")]
#[command(about = "Preview the recipe sidebar for a static recipe site", version)]
pub struct Cli {
    /// Site root directory, or the base URL of a deployed site.
    #[arg(long, default_value = ".")]
    pub site: String,

    /// TOML file with manifest candidates, fetch timeout, and collapse flag.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the sidebar markup for a page.
    Render(RenderArgs),
    /// Read one plain-text filter per stdin line; print one JSON object per render.
    Search(PageArgs),
    /// Print the grouped recipe index as JSON.
    Index(PageArgs),
    /// Print the resolved view context for a page as JSON.
    Resolve(PageArgs),
}
