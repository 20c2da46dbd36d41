use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA};

use crate::error::{Result, SidebarError};
use crate::models::{ManifestLoad, RecipeRecord};

/// Parent-relative first: recipe pages live one directory below the index.
pub const DEFAULT_MANIFEST_CANDIDATES: [&str; 2] = ["../data/recipes.json", "data/recipes.json"];

/// Retrieves and parses the manifest at one candidate location.
pub trait ManifestFetcher {
    fn fetch(&self, candidate: &str) -> Result<Vec<RecipeRecord>>;
}

/// Tries each candidate in order and returns the first manifest that loads.
///
/// Every failure is remembered; when all candidates fail the last one is
/// reported inside `LoadFailure`. An empty list fails with `NoCandidates`.
pub fn load_manifest<F, S>(fetcher: &F, candidates: &[S]) -> Result<ManifestLoad>
where
    F: ManifestFetcher + ?Sized,
    S: AsRef<str>,
{
    let mut last_error = None::<SidebarError>;

    for candidate in candidates {
        let candidate = candidate.as_ref();
        tracing::debug!(
            operation = "load_manifest",
            candidate,
            "trying manifest candidate"
        );
        match fetcher.fetch(candidate) {
            Ok(items) => {
                tracing::info!(
                    operation = "load_manifest",
                    candidate,
                    recipes = items.len(),
                    "recipe manifest loaded"
                );
                return Ok(ManifestLoad {
                    items,
                    source: candidate.to_string(),
                });
            }
            Err(err) => {
                tracing::warn!(
                    operation = "load_manifest",
                    candidate,
                    error = %err,
                    "manifest candidate failed"
                );
                last_error = Some(err);
            }
        }
    }

    Err(SidebarError::LoadFailure(Box::new(
        last_error.unwrap_or(SidebarError::NoCandidates),
    )))
}

pub fn parse_manifest(raw: &[u8]) -> Result<Vec<RecipeRecord>> {
    Ok(serde_json::from_slice(raw)?)
}

/// Fetches candidates over HTTP(S), resolved against the page URL, with
/// caching disabled so a fresh deploy is always seen.
#[derive(Clone)]
pub struct HttpFetcher {
    page_url: Url,
    http: Client,
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("page_url", &self.page_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpFetcher {
    pub fn new(page_url: &str, timeout: Duration) -> Result<Self> {
        let page_url = parse_page_url(page_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache, no-store"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { page_url, http })
    }

    pub fn resolve(&self, candidate: &str) -> Result<Url> {
        self.page_url
            .join(candidate)
            .map_err(|err| SidebarError::InvalidLocation(format!("{candidate}: {err}")))
    }
}

impl ManifestFetcher for HttpFetcher {
    fn fetch(&self, candidate: &str) -> Result<Vec<RecipeRecord>> {
        let url = self.resolve(candidate)?;
        let resp = self.http.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SidebarError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }
        let body = resp.bytes()?;
        parse_manifest(&body)
    }
}

fn parse_page_url(raw: &str) -> Result<Url> {
    let url =
        Url::parse(raw).map_err(|err| SidebarError::InvalidLocation(format!("{raw}: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(SidebarError::InvalidLocation(format!(
            "unsupported scheme for {raw}: {other}"
        ))),
    }
}

/// Reads candidates from a built site on disk, relative to the directory of
/// the page being previewed.
///
/// Resolution is lexical and confined to `site_root`: a candidate whose `..`
/// segments climb above the root fails with `InvalidLocation` instead of
/// reading outside the site. A root-level page therefore behaves like a site
/// deployed under a sub-path, where `../data/recipes.json` is not found and
/// the loader falls through to `data/recipes.json`.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    site_root: PathBuf,
    page_segments: Vec<String>,
}

impl FsFetcher {
    /// Fetcher for a page that sits directly in `site_root`.
    pub fn new(site_root: impl Into<PathBuf>) -> Self {
        Self {
            site_root: site_root.into(),
            page_segments: Vec::new(),
        }
    }

    /// Fetcher for the page at `location_path` inside `site_root`. A path
    /// ending in `/` names a directory index.
    #[must_use]
    pub fn for_page(site_root: &Path, location_path: &str) -> Self {
        let mut segments = Vec::<String>::new();
        for segment in location_path.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other.to_string()),
            }
        }
        if !location_path.ends_with('/') {
            segments.pop();
        }
        Self {
            site_root: site_root.to_path_buf(),
            page_segments: segments,
        }
    }

    #[must_use]
    pub fn site_root(&self) -> &Path {
        &self.site_root
    }

    #[must_use]
    pub fn page_dir(&self) -> PathBuf {
        self.site_root.join(self.page_segments.iter().collect::<PathBuf>())
    }

    pub fn resolve(&self, candidate: &str) -> Result<PathBuf> {
        let mut segments = self.page_segments.clone();
        for component in Path::new(candidate).components() {
            match component {
                Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                Component::RootDir => segments.clear(),
                Component::ParentDir => {
                    if segments.pop().is_none() {
                        return Err(SidebarError::InvalidLocation(format!(
                            "{candidate} escapes the site root"
                        )));
                    }
                }
                Component::Prefix(_) => {
                    return Err(SidebarError::InvalidLocation(format!(
                        "{candidate} is not a site-relative path"
                    )));
                }
            }
        }
        Ok(self.site_root.join(segments.iter().collect::<PathBuf>()))
    }
}

impl ManifestFetcher for FsFetcher {
    fn fetch(&self, candidate: &str) -> Result<Vec<RecipeRecord>> {
        let path = self.resolve(candidate)?;
        let raw = fs::read(&path).map_err(|err| {
            SidebarError::Io(std::io::Error::new(
                err.kind(),
                format!("{}: {err}", path.display()),
            ))
        })?;
        parse_manifest(&raw)
    }
}
