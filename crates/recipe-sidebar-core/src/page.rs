use crate::models::{RecipeRecord, ViewContext};

const RECIPE_PAGE_LINK_PREFIX: &str = "../";

impl ViewContext {
    /// Works out where the viewer is from the manifest location that loaded
    /// and the current location path.
    ///
    /// A manifest reached through a parent-directory candidate means the page
    /// sits one level below the site root, i.e. it is a recipe page. The
    /// current recipe is the first record whose path ends with the last two
    /// location segments; that suffix match tolerates differing base paths
    /// and can collide when two recipes share a two-segment tail.
    #[must_use]
    pub fn resolve(manifest_source: &str, location_path: &str, records: &[RecipeRecord]) -> Self {
        let is_recipe_page = manifest_source.starts_with("..");
        let current_path = current_path_tail(location_path);
        let current_category = find_current_record(records, &current_path)
            .map(|record| record.category_key().to_string());

        tracing::debug!(
            operation = "resolve_page",
            is_recipe_page,
            current_path = %current_path,
            current_category = current_category.as_deref().unwrap_or("-"),
            "resolved view context"
        );

        Self {
            is_recipe_page,
            link_prefix: if is_recipe_page {
                RECIPE_PAGE_LINK_PREFIX.to_string()
            } else {
                String::new()
            },
            current_path,
            current_category,
        }
    }

    /// Whether a rendered link for `record` points at the page being viewed.
    #[must_use]
    pub fn is_current(&self, record: &RecipeRecord) -> bool {
        self.is_recipe_page && path_matches_current(record.path(), &self.current_path)
    }
}

/// Last two `/`-separated segments of a location path, rejoined.
#[must_use]
pub fn current_path_tail(location_path: &str) -> String {
    let segments = location_path.split('/').collect::<Vec<_>>();
    let start = segments.len().saturating_sub(2);
    segments[start..].join("/")
}

#[must_use]
pub fn find_current_record<'a>(
    records: &'a [RecipeRecord],
    current_path: &str,
) -> Option<&'a RecipeRecord> {
    records
        .iter()
        .find(|record| path_matches_current(record.path(), current_path))
}

fn path_matches_current(record_path: &str, current_path: &str) -> bool {
    !current_path.is_empty() && record_path.ends_with(current_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, category: Option<&str>) -> RecipeRecord {
        RecipeRecord {
            title: Some(path.to_string()),
            slug: None,
            category: category.map(ToString::to_string),
            path: Some(path.to_string()),
        }
    }

    #[test]
    fn current_path_tail_keeps_last_two_segments() {
        assert_eq!(
            current_path_tail("/site/recipes/miso-soup.html"),
            "recipes/miso-soup.html"
        );
        assert_eq!(current_path_tail("/index.html"), "/index.html");
        assert_eq!(current_path_tail("miso.html"), "miso.html");
        assert_eq!(current_path_tail(""), "");
    }

    #[test]
    fn resolve_detects_recipe_page_from_parent_manifest_candidate() {
        let records = vec![
            record("recipes/miso-soup.html", Some("Soups")),
            record("recipes/flatbread.html", Some("Breads")),
        ];
        let view = ViewContext::resolve(
            "../data/recipes.json",
            "/cookbook/recipes/miso-soup.html",
            &records,
        );
        assert!(view.is_recipe_page);
        assert_eq!(view.link_prefix, "../");
        assert_eq!(view.current_path, "recipes/miso-soup.html");
        assert_eq!(view.current_category.as_deref(), Some("Soups"));
        assert!(view.is_current(&records[0]));
        assert!(!view.is_current(&records[1]));
    }

    #[test]
    fn resolve_on_index_page_has_no_prefix_and_no_current_link() {
        let records = vec![record("recipes/miso-soup.html", None)];
        let view = ViewContext::resolve("data/recipes.json", "/index.html", &records);
        assert!(!view.is_recipe_page);
        assert_eq!(view.link_prefix, "");
        assert_eq!(view.current_category, None);
        assert!(!view.is_current(&records[0]));
    }

    #[test]
    fn resolve_uses_first_suffix_match_and_defaults_category() {
        let records = vec![
            record("a/recipes/dal.html", None),
            record("b/recipes/dal.html", Some("Lentils")),
        ];
        let view = ViewContext::resolve("../data/recipes.json", "/recipes/dal.html", &records);
        assert_eq!(view.current_category.as_deref(), Some("Uncategorized"));
        assert!(view.is_current(&records[0]));
        assert!(view.is_current(&records[1]));
    }

    #[test]
    fn empty_location_matches_nothing() {
        let records = vec![record("recipes/dal.html", Some("Lentils"))];
        assert!(find_current_record(&records, "").is_none());
        let view = ViewContext::resolve("../data/recipes.json", "", &records);
        assert_eq!(view.current_category, None);
    }
}
