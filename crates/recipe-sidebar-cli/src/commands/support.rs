use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use recipe_sidebar_core::{FsFetcher, HttpFetcher, ManifestFetcher, SidebarConfig};

pub(super) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// Where the site lives: a built directory on disk or a deployed base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum SiteLocation {
    Dir(PathBuf),
    Url(String),
}

impl SiteLocation {
    pub(super) fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed.trim_end_matches('/').to_string())
        } else {
            Self::Dir(PathBuf::from(trimmed))
        }
    }

    pub(super) fn fetcher_for(
        &self,
        page: &str,
        config: &SidebarConfig,
    ) -> Result<Box<dyn ManifestFetcher>> {
        match self {
            Self::Dir(root) => Ok(Box::new(FsFetcher::for_page(root, page))),
            Self::Url(base) => {
                let page_url = format!("{base}/{}", page.trim_start_matches('/'));
                let fetcher = HttpFetcher::new(&page_url, config.fetch_timeout())
                    .with_context(|| format!("invalid page url {page_url}"))?;
                Ok(Box::new(fetcher))
            }
        }
    }
}
