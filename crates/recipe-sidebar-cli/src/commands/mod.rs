use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use recipe_sidebar_core::controller::{self as sidebar, SidebarController};
use recipe_sidebar_core::grouping::CategoryBucket;
use recipe_sidebar_core::render::SectionSummary;
use recipe_sidebar_core::{
    CategoryIndex, ManifestLoad, SidebarConfig, ViewContext, load_manifest,
};
use serde::Serialize;

use crate::cli::{Cli, Commands, PageArgs, RenderArgs};

mod host;
mod support;

#[cfg(test)]
mod tests;

use self::host::CaptureHost;
use self::support::{SiteLocation, print_json};

const PANEL_SEPARATOR: &str = "<!-- all-recipes -->";

pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = SidebarConfig::load(cli.config.as_deref())
        .context("failed to load sidebar configuration")?;
    let site = SiteLocation::parse(&cli.site);
    run_command(&site, &config, cli.command)
}

fn run_command(site: &SiteLocation, config: &SidebarConfig, command: Commands) -> Result<()> {
    match command {
        Commands::Render(args) => {
            let (host, controller) = render_page(site, config, &args)?;
            let mut stdout = io::stdout().lock();
            write_render(&host, args.with_panel, &mut stdout)?;
            if controller.is_failed() {
                anyhow::bail!("recipe manifest could not be loaded for {}", args.page.page);
            }
        }
        Commands::Search(args) => {
            let stdin = io::stdin();
            let mut stdout = io::stdout().lock();
            run_search(site, config, &args, stdin.lock(), &mut stdout)?;
        }
        Commands::Index(args) => {
            let loaded = load(site, config, &args)?;
            let index = CategoryIndex::build(&loaded.items);
            print_json(&IndexReport {
                source: &loaded.source,
                recipe_count: index.recipe_count(),
                categories: index.buckets(),
            })?;
        }
        Commands::Resolve(args) => {
            let loaded = load(site, config, &args)?;
            let view = ViewContext::resolve(&loaded.source, &args.page, &loaded.items);
            print_json(&ResolveReport {
                source: &loaded.source,
                view,
            })?;
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct IndexReport<'a> {
    source: &'a str,
    recipe_count: usize,
    categories: &'a [CategoryBucket],
}

#[derive(Debug, Serialize)]
struct ResolveReport<'a> {
    source: &'a str,
    view: ViewContext,
}

#[derive(Debug, Serialize)]
struct SearchLine<'a> {
    filter: &'a str,
    sections: &'a [SectionSummary],
    scroll_to_current: bool,
    html: &'a str,
}

fn load(site: &SiteLocation, config: &SidebarConfig, args: &PageArgs) -> Result<ManifestLoad> {
    let fetcher = site.fetcher_for(&args.page, config)?;
    load_manifest(fetcher.as_ref(), &config.manifest_candidates).map_err(|err| {
        let payload = serde_json::to_string(&err.to_payload("load_manifest"))
            .unwrap_or_else(|_| err.code().to_string());
        anyhow::Error::new(err).context(payload)
    })
}

fn mount_page(
    site: &SiteLocation,
    config: &SidebarConfig,
    page: &str,
    collapsed: bool,
    with_panel: bool,
) -> Result<(CaptureHost, SidebarController)> {
    let fetcher = site.fetcher_for(page, config)?;
    let mut config = config.clone();
    if collapsed {
        config.collapse_by_default = Some(true);
    }
    let mut host = CaptureHost::new(page, with_panel);
    let controller = sidebar::run(&mut host, fetcher.as_ref(), &config)
        .context("sidebar container or search input is missing")?;
    Ok((host, controller))
}

fn render_page(
    site: &SiteLocation,
    config: &SidebarConfig,
    args: &RenderArgs,
) -> Result<(CaptureHost, SidebarController)> {
    let (mut host, mut controller) =
        mount_page(site, config, &args.page.page, args.collapsed, args.with_panel)?;
    if let Some(filter) = &args.filter {
        controller.on_filter_changed(&mut host, filter);
    }
    Ok((host, controller))
}

fn write_render<W: Write>(host: &CaptureHost, with_panel: bool, out: &mut W) -> Result<()> {
    if let Some(html) = &host.sidebar_html {
        writeln!(out, "{html}")?;
    }
    if with_panel && let Some(html) = &host.panel_html {
        writeln!(out, "{PANEL_SEPARATOR}")?;
        writeln!(out, "{html}")?;
    }
    Ok(())
}

/// One JSON line per input line; each line is a complete filter value.
fn run_search<R: BufRead, W: Write>(
    site: &SiteLocation,
    config: &SidebarConfig,
    args: &PageArgs,
    input: R,
    out: &mut W,
) -> Result<()> {
    let (mut host, mut controller) = mount_page(site, config, &args.page, false, false)?;
    if controller.is_failed() {
        anyhow::bail!("recipe manifest could not be loaded for {}", args.page);
    }

    for line in input.lines() {
        let filter = line.context("failed to read filter from stdin")?;
        let Some(markup) = controller.on_filter_changed(&mut host, &filter) else {
            break;
        };
        serde_json::to_writer(
            &mut *out,
            &SearchLine {
                filter: &filter,
                sections: &markup.sections,
                scroll_to_current: host.scroll_requested,
                html: &markup.html,
            },
        )?;
        writeln!(out)?;
        out.flush()?;
    }
    Ok(())
}
