// Every fallible function returns `SidebarError`; its variants document the failures.
#![allow(
    clippy::missing_errors_doc,
    reason = "all fallible APIs share SidebarError"
)]

pub mod config;
pub mod controller;
pub mod cook_mode;
pub mod error;
pub mod grouping;
pub mod html;
pub mod manifest;
pub mod models;
pub mod page;
pub mod render;

pub use config::SidebarConfig;
pub use controller::{SidebarController, SidebarHost};
pub use error::{Result, SidebarError};
pub use grouping::CategoryIndex;
pub use manifest::{FsFetcher, HttpFetcher, ManifestFetcher, load_manifest};
pub use models::{ManifestLoad, RecipeRecord, ViewContext};
