//! Link-header pagination
//!
//! List endpoints answer with a `Link` header such as
//!
//! ```text
//! </api/blog-entries?page=1&size=20>; rel="next",</api/blog-entries?page=4&size=20>; rel="last"
//! ```
//!
//! and an `X-Total-Count` header. [`parse_link_header`] turns the former into
//! a `rel -> page` map, [`merge_page`] folds a freshly fetched page into the
//! list already on screen (infinite scroll).

use std::collections::BTreeMap;

use tracing::warn;

/// Page numbers keyed by link relation (`next`, `prev`, `first`, `last`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageLinks(BTreeMap<String, u32>);

impl PageLinks {
    /// Links of a container that has not fetched anything yet: `{next: 0}`.
    pub fn initial() -> Self {
        let mut links = Self::default();
        links.insert("next", 0);
        links
    }

    pub fn insert(&mut self, rel: impl Into<String>, page: u32) {
        self.0.insert(rel.into(), page);
    }

    pub fn get(&self, rel: &str) -> Option<u32> {
        self.0.get(rel).copied()
    }

    pub fn next(&self) -> Option<u32> {
        self.get("next")
    }

    pub fn first(&self) -> Option<u32> {
        self.get("first")
    }

    pub fn last(&self) -> Option<u32> {
        self.get("last")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether another page exists after the ones already loaded.
    ///
    /// `current_page` is the last page that was fetched.
    pub fn has_more(&self, current_page: u32) -> bool {
        self.last().is_some_and(|last| current_page < last)
    }
}

/// Parse a `Link` header into a [`PageLinks`] map.
///
/// An empty header yields no links. Sections that do not look like
/// `<url>; rel="name"` or whose URL has no numeric `page` parameter are
/// skipped.
pub fn parse_link_header(header: &str) -> PageLinks {
    let mut links = PageLinks::default();
    if header.trim().is_empty() {
        return links;
    }

    for section in split_sections(header) {
        let mut parts = section.split(';');
        let (Some(url_part), Some(rel_part), None) = (parts.next(), parts.next(), parts.next())
        else {
            warn!(section = %section, "skipping malformed link section");
            continue;
        };

        let url = url_part
            .trim()
            .trim_start_matches('<')
            .trim_end_matches('>');
        let Some(rel) = rel_part.trim().strip_prefix("rel=") else {
            warn!(section = %section, "link section has no rel");
            continue;
        };
        let rel = rel.trim_matches('"');

        match query_value(url, "page").and_then(|page| page.parse::<u32>().ok()) {
            Some(page) => links.insert(rel, page),
            None => warn!(rel = %rel, url = %url, "link section has no page parameter"),
        }
    }

    links
}

/// Sections are comma-separated, but a URL may itself contain commas
/// (`sort=id,asc`), so a piece only starts a new section when it opens with `<`.
fn split_sections(header: &str) -> Vec<String> {
    let mut sections: Vec<String> = Vec::new();
    for piece in header.split(',') {
        match sections.last_mut() {
            Some(current) if !piece.trim_start().starts_with('<') => {
                current.push(',');
                current.push_str(piece);
            }
            _ => sections.push(piece.to_string()),
        }
    }
    sections
}

fn query_value<'a>(url: &'a str, name: &str) -> Option<&'a str> {
    let (_, query) = url.split_once('?')?;
    query.split('&').find_map(|pair| match pair.split_once('=') {
        Some((key, value)) if key == name => Some(value),
        _ => None,
    })
}

/// Parse the `X-Total-Count` header. Absent or malformed values count as 0.
pub fn parse_total_count(header: &str) -> u64 {
    header.trim().parse().unwrap_or(0)
}

/// Fold a fetched page into the current list.
///
/// The page replaces the list when the result fits on a single page
/// (`first == last`, which includes "no links at all") or when nothing is
/// loaded yet; otherwise it is appended.
pub fn merge_page<T>(mut current: Vec<T>, fetched: Vec<T>, links: &PageLinks) -> Vec<T> {
    if links.first() == links.last() || current.is_empty() {
        return fetched;
    }
    current.extend(fetched);
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "</api/blog-entries?page=1&size=20>; rel=\"next\",</api/blog-entries?page=3&size=20>; rel=\"last\",</api/blog-entries?page=0&size=20>; rel=\"first\"";

    #[test]
    fn test_parse_link_header() {
        let links = parse_link_header(HEADER);
        assert_eq!(links.next(), Some(1));
        assert_eq!(links.last(), Some(3));
        assert_eq!(links.first(), Some(0));
        assert_eq!(links.get("prev"), None);
    }

    #[test]
    fn test_parse_empty_header() {
        assert!(parse_link_header("").is_empty());
        assert!(parse_link_header("   ").is_empty());
    }

    #[test]
    fn test_parse_url_with_sort_comma() {
        let header = "</api/tags?page=2&size=20&sort=id,asc>; rel=\"next\",</api/tags?page=5&size=20&sort=id,asc>; rel=\"last\"";
        let links = parse_link_header(header);
        assert_eq!(links.next(), Some(2));
        assert_eq!(links.last(), Some(5));
    }

    #[test]
    fn test_malformed_sections_are_skipped() {
        let header = "garbage,</api/tags?size=20>; rel=\"next\",</api/tags?page=4>; rel=\"last\"";
        let links = parse_link_header(header);
        assert_eq!(links.next(), None);
        assert_eq!(links.last(), Some(4));
    }

    #[test]
    fn test_initial_links() {
        assert_eq!(PageLinks::initial().next(), Some(0));
    }

    #[test]
    fn test_has_more() {
        let links = parse_link_header(HEADER);
        assert!(links.has_more(0));
        assert!(!links.has_more(3));
        assert!(!PageLinks::default().has_more(0));
    }

    #[test]
    fn test_parse_total_count() {
        assert_eq!(parse_total_count("42"), 42);
        assert_eq!(parse_total_count(" 7 "), 7);
        assert_eq!(parse_total_count(""), 0);
        assert_eq!(parse_total_count("many"), 0);
    }

    #[test]
    fn test_merge_single_page_replaces() {
        let merged = merge_page(vec![1, 2], vec![3], &PageLinks::default());
        assert_eq!(merged, vec![3]);
    }

    #[test]
    fn test_merge_into_empty_replaces() {
        let links = parse_link_header(HEADER);
        let merged = merge_page(Vec::new(), vec![1, 2], &links);
        assert_eq!(merged, vec![1, 2]);
    }

    #[test]
    fn test_merge_multi_page_appends() {
        let links = parse_link_header(HEADER);
        let merged = merge_page(vec![1, 2], vec![3, 4], &links);
        assert_eq!(merged, vec![1, 2, 3, 4]);
    }
}
