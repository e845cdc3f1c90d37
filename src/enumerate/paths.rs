// src/enumerate/paths.rs
// =============================================================================
// Turns catalog entries into the list of pages to crawl.
//
// For every entry the sources are asked in order; the first one that knows
// the entry wins and the others are not consulted (no merging). An entry
// nobody knows is skipped. The result is deduplicated and sorted so two
// runs over the same catalog produce the same output in the same order.
// =============================================================================

use super::sources::MetadataSource;
use crate::output::normalize_url_path;
use std::collections::{BTreeSet, HashSet};

// Every crawlable unit page of the catalog, as sorted URL paths
pub fn enumerate(entries: &[String], sources: &[Box<dyn MetadataSource>]) -> Vec<String> {
    let mut paths = BTreeSet::new();

    for entry in entries {
        let mut found = false;

        for source in sources {
            match source.unit_paths(entry) {
                Ok(units) => {
                    tracing::debug!(entry = %entry, source = source.name(), units = units.len(), "entry enumerated");
                    for unit in units {
                        let path = normalize_url_path(&unit);
                        // "/" is the homepage, which is always crawled anyway
                        if path != "/" {
                            paths.insert(path);
                        }
                    }
                    found = true;
                    break;
                }
                Err(e) => {
                    tracing::debug!(entry = %entry, "{}", e);
                }
            }
        }

        if !found {
            tracing::debug!(entry = %entry, "no source knows this entry, skipping");
        }
    }

    paths.into_iter().collect()
}

// The full crawl order: homepage, static pages, then unit pages.
// A path is only kept the first time it appears, so no two pages can be
// written to the same file.
pub fn plan_pages(static_pages: &[String], unit_paths: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut plan = Vec::with_capacity(1 + static_pages.len() + unit_paths.len());

    let candidates = std::iter::once("/".to_string())
        .chain(static_pages.iter().map(|p| normalize_url_path(p)))
        .chain(unit_paths.iter().map(|p| normalize_url_path(p)));

    for path in candidates {
        if seen.insert(path.clone()) {
            plan.push(path);
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerate::ManifestSource;
    use std::collections::BTreeMap;

    fn manifest(name: &str, pairs: Vec<(&str, Vec<&str>)>) -> Box<dyn MetadataSource> {
        let map: BTreeMap<String, Vec<String>> = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect();
        Box::new(ManifestSource::from_map(name, map))
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_enumerate_sorts_and_dedupes() {
        let sources = vec![manifest(
            "m",
            vec![("a", vec!["net/http", "fmt", "net"]), ("b", vec!["fmt", "zip"])],
        )];

        let paths = enumerate(&strings(&["a", "b"]), &sources);
        assert_eq!(paths, strings(&["/fmt", "/net", "/net/http", "/zip"]));
    }

    #[test]
    fn test_first_answering_source_wins() {
        let sources = vec![
            manifest("first", vec![("a", vec!["from-first"])]),
            manifest("second", vec![("a", vec!["from-second"]), ("b", vec!["only-second"])]),
        ];

        let paths = enumerate(&strings(&["a", "b"]), &sources);
        assert_eq!(paths, strings(&["/from-first", "/only-second"]));
    }

    #[test]
    fn test_unknown_entries_are_skipped() {
        let sources = vec![manifest("m", vec![("a", vec!["x"])])];
        let paths = enumerate(&strings(&["missing", "a"]), &sources);
        assert_eq!(paths, strings(&["/x"]));
    }

    #[test]
    fn test_units_are_normalized() {
        let sources = vec![manifest("m", vec![("a", vec!["/x/", "y//z", ""])])];
        let paths = enumerate(&strings(&["a"]), &sources);
        assert_eq!(paths, strings(&["/x", "/y/z"]));
    }

    #[test]
    fn test_plan_pages_order_and_uniqueness() {
        let plan = plan_pages(
            &strings(&["/about", "/search-help", "/about/"]),
            &strings(&["/about", "/fmt", "/net"]),
        );
        assert_eq!(plan, strings(&["/", "/about", "/search-help", "/fmt", "/net"]));
    }
}
