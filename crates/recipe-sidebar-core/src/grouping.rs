use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::models::RecipeRecord;

/// One category bucket: the key and its recipes in title order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBucket {
    pub name: String,
    pub recipes: Vec<RecipeRecord>,
}

/// Recipes partitioned by category, with buckets and their contents sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryIndex {
    buckets: Vec<CategoryBucket>,
}

impl CategoryIndex {
    #[must_use]
    pub fn build(records: &[RecipeRecord]) -> Self {
        let mut slots = HashMap::<&str, usize>::new();
        let mut buckets = Vec::<CategoryBucket>::new();

        for record in records {
            let key = record.category_key();
            let slot = *slots.entry(key).or_insert_with(|| {
                buckets.push(CategoryBucket {
                    name: key.to_string(),
                    recipes: Vec::new(),
                });
                buckets.len() - 1
            });
            buckets[slot].recipes.push(record.clone());
        }

        buckets.sort_by(|a, b| compare_labels(&a.name, &b.name));
        for bucket in &mut buckets {
            bucket
                .recipes
                .sort_by(|a, b| compare_labels(a.title(), b.title()));
        }

        tracing::debug!(
            operation = "group",
            records = records.len(),
            categories = buckets.len(),
            "grouped recipe manifest"
        );

        Self { buckets }
    }

    #[must_use]
    pub fn buckets(&self) -> &[CategoryBucket] {
        &self.buckets
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|bucket| bucket.name.as_str())
    }

    #[must_use]
    pub fn get(&self, category: &str) -> Option<&[RecipeRecord]> {
        self.buckets
            .iter()
            .find(|bucket| bucket.name == category)
            .map(|bucket| bucket.recipes.as_slice())
    }

    #[must_use]
    pub fn recipe_count(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.recipes.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Locale-style label order: base letters first, ignoring case and accents.
/// Ties go unaccented before accented, then lowercase before uppercase, then
/// code-point order so the result is total.
#[must_use]
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| folded_letters(a).cmp(folded_letters(b)))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

fn base_letters(label: &str) -> impl Iterator<Item = char> + '_ {
    label
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
}

fn folded_letters(label: &str) -> impl Iterator<Item = char> + '_ {
    label.nfd().flat_map(char::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, category: Option<&str>) -> RecipeRecord {
        RecipeRecord {
            title: Some(title.to_string()),
            slug: Some(title.to_lowercase().replace(' ', "-")),
            category: category.map(ToString::to_string),
            path: Some(format!("recipes/{}.html", title.to_lowercase().replace(' ', "-"))),
        }
    }

    fn sample() -> Vec<RecipeRecord> {
        vec![
            record("Tomato Soup", Some("soups")),
            record("apple crumble", Some("Desserts")),
            record("Miso Soup", Some("soups")),
            record("Plain Rice", None),
            record("Banana Bread", Some("Desserts")),
            record("Flatbread", Some("")),
        ]
    }

    #[test]
    fn build_places_each_record_in_exactly_one_bucket() {
        let records = sample();
        let index = CategoryIndex::build(&records);

        assert_eq!(index.recipe_count(), records.len());
        for record in &records {
            let hits = index
                .buckets()
                .iter()
                .filter(|bucket| bucket.recipes.contains(record))
                .count();
            assert_eq!(hits, 1, "record {:?} must land in one bucket", record.title);
        }
    }

    #[test]
    fn build_sorts_categories_and_titles_case_insensitively() {
        let index = CategoryIndex::build(&sample());
        let names = index.category_names().collect::<Vec<_>>();
        assert_eq!(names, vec!["Desserts", "soups", "Uncategorized"]);

        let desserts = index.get("Desserts").expect("desserts");
        let titles = desserts.iter().map(RecipeRecord::title).collect::<Vec<_>>();
        assert_eq!(titles, vec!["apple crumble", "Banana Bread"]);

        let soups = index.get("soups").expect("soups");
        let titles = soups.iter().map(RecipeRecord::title).collect::<Vec<_>>();
        assert_eq!(titles, vec!["Miso Soup", "Tomato Soup"]);
    }

    #[test]
    fn missing_and_empty_categories_share_the_uncategorized_bucket() {
        let index = CategoryIndex::build(&sample());
        let bucket = index.get("Uncategorized").expect("uncategorized");
        let titles = bucket.iter().map(RecipeRecord::title).collect::<Vec<_>>();
        assert_eq!(titles, vec!["Flatbread", "Plain Rice"]);
    }

    #[test]
    fn build_is_idempotent_for_identical_input() {
        let records = sample();
        assert_eq!(CategoryIndex::build(&records), CategoryIndex::build(&records));

        let mut reversed = records.clone();
        reversed.reverse();
        let a = CategoryIndex::build(&records);
        let b = CategoryIndex::build(&reversed);
        assert_eq!(
            a.category_names().collect::<Vec<_>>(),
            b.category_names().collect::<Vec<_>>()
        );
    }

    #[test]
    fn equal_titles_keep_manifest_order() {
        let mut first = record("Pesto", Some("Sauces"));
        first.slug = Some("pesto-genovese".to_string());
        let mut second = record("Pesto", Some("Sauces"));
        second.slug = Some("pesto-rosso".to_string());
        let index = CategoryIndex::build(&[first, second]);
        let slugs = index
            .get("Sauces")
            .expect("sauces")
            .iter()
            .map(RecipeRecord::slug)
            .collect::<Vec<_>>();
        assert_eq!(slugs, vec!["pesto-genovese", "pesto-rosso"]);
    }

    #[test]
    fn compare_labels_puts_lowercase_first_on_case_ties() {
        assert_eq!(compare_labels("apple", "Apple"), Ordering::Less);
        assert_eq!(compare_labels("Apple", "apple"), Ordering::Greater);
        assert_eq!(compare_labels("b", "A"), Ordering::Greater);
        assert_eq!(compare_labels("", "a"), Ordering::Less);
        assert_eq!(compare_labels("Same", "Same"), Ordering::Equal);
    }

    #[test]
    fn accented_labels_sort_with_their_base_letters() {
        let index = CategoryIndex::build(&[
            record("Crepes", Some("Fish")),
            record("Crème Brûlée", Some("Fish")),
            record("Éclair au Café", Some("Éclairs")),
            record("Shakshuka", Some("Eggs")),
            record("Jalapeño Poppers", Some("Fish")),
        ]);
        assert_eq!(
            index.category_names().collect::<Vec<_>>(),
            vec!["Éclairs", "Eggs", "Fish"]
        );
        let titles = index
            .get("Fish")
            .expect("fish")
            .iter()
            .map(RecipeRecord::title)
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["Crème Brûlée", "Crepes", "Jalapeño Poppers"]);
    }

    #[test]
    fn compare_labels_breaks_accent_ties_unaccented_first() {
        assert_eq!(compare_labels("Eclairs", "Éclairs"), Ordering::Less);
        assert_eq!(compare_labels("éclairs", "Eclairs"), Ordering::Greater);
        assert_eq!(compare_labels("Sautéed", "sauteed"), Ordering::Greater);
        assert_eq!(compare_labels("Crème", "Crème"), Ordering::Equal);
    }

    #[test]
    fn build_handles_an_empty_manifest() {
        let index = CategoryIndex::build(&[]);
        assert!(index.is_empty());
        assert_eq!(index.recipe_count(), 0);
    }
}
