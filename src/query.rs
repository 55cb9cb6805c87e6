// Read-side helpers over a built manifest: the same search, year filter and
// year bucketing the document list applies in the browser.
use crate::types::{DocumentRecord, Manifest};
use std::collections::BTreeSet;

/// Items whose title contains `query` (case-insensitive, trimmed; empty keeps
/// everything) and, when `year` is set, whose `contentYear` equals it.
/// Manifest order is preserved.
pub fn filter<'a>(manifest: &'a Manifest, query: &str, year: Option<i32>) -> Vec<&'a DocumentRecord> {
    let needle = query.trim().to_lowercase();
    manifest
        .items
        .iter()
        .filter(|item| year.map_or(true, |y| item.content_year == y))
        .filter(|item| needle.is_empty() || item.title.to_lowercase().contains(&needle))
        .collect()
}

/// Distinct content years, newest first.
pub fn years(manifest: &Manifest) -> Vec<i32> {
    let set: BTreeSet<i32> = manifest.items.iter().map(|i| i.content_year).collect();
    set.into_iter().rev().collect()
}

/// Bucket items by content year, newest year first; items keep their
/// incoming order inside a bucket.
pub fn group_by_year<'a>(items: &[&'a DocumentRecord]) -> Vec<(i32, Vec<&'a DocumentRecord>)> {
    let mut groups: Vec<(i32, Vec<&'a DocumentRecord>)> = Vec::new();
    for &item in items {
        match groups.iter_mut().find(|(y, _)| *y == item.content_year) {
            Some((_, bucket)) => bucket.push(item),
            None => groups.push((item.content_year, vec![item])),
        }
    }
    groups.sort_by(|a, b| b.0.cmp(&a.0));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::at_noon_utc;

    fn record(title: &str, year: i32) -> DocumentRecord {
        let display = at_noon_utc(year, 12, 31).unwrap();
        DocumentRecord {
            title: title.to_string(),
            year,
            folder_year: Some(year),
            href: format!("/reports/{year}/{title}.pdf"),
            size_bytes: 2048,
            modified: display,
            inferred_iso: Some(display),
            display_iso: display,
            content_year: year,
            featured: false,
            pin: None,
        }
    }

    fn sample() -> Manifest {
        Manifest::new(vec![
            record("Annual Report 2024", 2024),
            record("Q4 2023 Results", 2023),
            record("ESG Report 2024", 2024),
            record("Annual Report 2022", 2022),
        ])
    }

    #[test]
    fn search_is_case_insensitive_and_ordered() {
        let manifest = sample();
        let hits: Vec<&str> = filter(&manifest, "  annual ", None)
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(hits, vec!["Annual Report 2024", "Annual Report 2022"]);
    }

    #[test]
    fn year_filter_uses_content_year() {
        let manifest = sample();
        let hits: Vec<&str> = filter(&manifest, "", Some(2024))
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(hits, vec!["Annual Report 2024", "ESG Report 2024"]);
        assert!(filter(&manifest, "results", Some(2024)).is_empty());
    }

    #[test]
    fn years_newest_first() {
        assert_eq!(years(&sample()), vec![2024, 2023, 2022]);
    }

    #[test]
    fn groups_keep_item_order() {
        let manifest = sample();
        let all = filter(&manifest, "", None);
        let groups = group_by_year(&all);
        let shape: Vec<(i32, usize)> = groups.iter().map(|(y, g)| (*y, g.len())).collect();
        assert_eq!(shape, vec![(2024, 2), (2023, 1), (2022, 1)]);
        assert_eq!(groups[0].1[1].title, "ESG Report 2024");
    }
}
