//! Heuristic extraction of breaking-change records from page markup.
//!
//! The compatibility pages list their entries in tables, but the
//! markup is unversioned third-party HTML. The pass here is
//! deliberately permissive: every table row on the page is scanned,
//! and rows that do not look like an entry are skipped without a
//! diagnostic. Keeping the heuristic behind this one function means it
//! can be hardened or swapped without touching the aggregation logic.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::fetch::DOCS_HOST;
use crate::version::VersionToken;

/// Category assigned when neither the row nor its enclosing section
/// carries one.
pub const FALLBACK_CATEGORY: &str = "General";

/// One breaking-change entry scraped from a compatibility table row.
///
/// `title` acts as the natural unique key when merging records across
/// pages; see [`crate::aggregate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakingChange {
    /// The version token the record was scraped under.
    pub version: VersionToken,
    /// Human-readable name of the change.
    pub title: String,
    /// Token of the predecessor release, `"<major - 1>.0"`.
    #[serde(rename = "basedOn")]
    pub based_on: String,
    /// Free-text classification, resolved via the fallback chain.
    pub category: String,
    /// Absolute URL to further documentation.
    pub link: String,
}

/// The fixed selector set the extraction pass runs with.
struct Selectors {
    row: Selector,
    cell: Selector,
    anchor: Selector,
    heading: Selector,
}

impl Selectors {
    fn new() -> Option<Self> {
        Some(Self {
            row: Selector::parse("table tbody tr").ok()?,
            cell: Selector::parse("td").ok()?,
            anchor: Selector::parse("a").ok()?,
            heading: Selector::parse("h2").ok()?,
        })
    }
}

/// Extracts one record per qualifying table row, in encounter order.
///
/// A row qualifies when it has at least one cell and its first cell
/// holds an anchor with non-empty text and a non-empty `href`.
/// Everything else is skipped silently. The category falls back from
/// the row's second cell to the enclosing section's first `h2` to
/// [`FALLBACK_CATEGORY`]; relative links are absolutized against
/// [`DOCS_HOST`].
pub fn extract_changes(html: &str, version: VersionToken) -> Vec<BreakingChange> {
    let Some(selectors) = Selectors::new() else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let based_on = version.based_on();
    let mut records = Vec::new();

    for row in document.select(&selectors.row) {
        let cells: Vec<ElementRef<'_>> = row.select(&selectors.cell).collect();
        let Some(first_cell) = cells.first() else {
            continue;
        };
        let Some(anchor) = first_cell.select(&selectors.anchor).next() else {
            continue;
        };

        let title = collect_text(anchor);
        let href = anchor.value().attr("href").unwrap_or_default();
        if title.is_empty() || href.is_empty() {
            continue;
        }

        let category = cells
            .get(1)
            .map(|cell| collect_text(*cell))
            .filter(|text| !text.is_empty())
            .or_else(|| section_heading(row, &selectors.heading))
            .unwrap_or_else(|| FALLBACK_CATEGORY.to_string());

        let link = if href.starts_with("http") {
            href.to_string()
        } else {
            format!("{DOCS_HOST}{href}")
        };

        records.push(BreakingChange {
            version,
            title,
            based_on: based_on.clone(),
            category,
            link,
        });
    }

    records
}

/// Concatenated, trimmed text of an element and its descendants.
fn collect_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text of the first `h2` inside the nearest enclosing `<section>`.
///
/// Only the nearest section is consulted; a section without a usable
/// heading does not defer to an outer one.
fn section_heading(row: ElementRef<'_>, heading: &Selector) -> Option<String> {
    let mut node = row.parent();
    while let Some(parent) = node {
        if let Some(element) = ElementRef::wrap(parent) {
            if element.value().name() == "section" {
                return element
                    .select(heading)
                    .next()
                    .map(collect_text)
                    .filter(|text| !text.is_empty());
            }
        }
        node = parent.parent();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> Vec<BreakingChange> {
        extract_changes(html, VersionToken::new(9))
    }

    #[test]
    fn extracts_title_link_and_based_on() {
        let html = r#"
            <table><tbody>
                <tr>
                    <td><a href="/dotnet/core/compatibility/sdk/9.0/terminal-logger">Terminal logger on by default</a></td>
                    <td>SDK</td>
                </tr>
            </tbody></table>
        "#;

        let records = extract(html);
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.version, VersionToken::new(9));
        assert_eq!(record.title, "Terminal logger on by default");
        assert_eq!(record.based_on, "8.0");
        assert_eq!(record.category, "SDK");
        assert_eq!(
            record.link,
            "https://learn.microsoft.com/dotnet/core/compatibility/sdk/9.0/terminal-logger"
        );
    }

    #[test]
    fn absolute_links_pass_through_unmodified() {
        let html = r#"
            <table><tr>
                <td><a href="https://external.example/y">External change</a></td>
                <td>Core</td>
            </tr></table>
        "#;

        let records = extract(html);
        assert_eq!(records[0].link, "https://external.example/y");
    }

    #[test]
    fn row_without_anchor_is_skipped() {
        let html = r#"
            <table>
                <tr><td>No anchor in sight</td><td>SDK</td></tr>
                <tr><td><a href="/x">Kept</a></td><td>SDK</td></tr>
            </table>
        "#;

        let records = extract(html);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Kept");
    }

    #[test]
    fn anchor_without_href_or_title_is_skipped() {
        let html = r#"
            <table>
                <tr><td><a>No href at all</a></td></tr>
                <tr><td><a href="/x">   </a></td></tr>
                <tr><td><a href="">Empty href</a></td></tr>
            </table>
        "#;

        assert!(extract(html).is_empty());
    }

    #[test]
    fn category_prefers_second_cell() {
        let html = r#"
            <section>
                <h2>Ignored heading</h2>
                <table><tr>
                    <td><a href="/x">Change</a></td>
                    <td>  Globalization  </td>
                </tr></table>
            </section>
        "#;

        assert_eq!(extract(html)[0].category, "Globalization");
    }

    #[test]
    fn category_falls_back_to_section_heading() {
        let html = r#"
            <section>
                <h2>Foo</h2>
                <table><tr>
                    <td><a href="/x">Change</a></td>
                    <td>   </td>
                </tr></table>
            </section>
        "#;

        assert_eq!(extract(html)[0].category, "Foo");
    }

    #[test]
    fn category_consults_only_the_nearest_section() {
        let html = r#"
            <section>
                <h2>Outer heading</h2>
                <section>
                    <table><tr>
                        <td><a href="/x">Change</a></td>
                    </tr></table>
                </section>
            </section>
        "#;

        // The nearest section has no heading of its own; the outer
        // one is not consulted.
        assert_eq!(extract(html)[0].category, FALLBACK_CATEGORY);
    }

    #[test]
    fn category_defaults_to_general() {
        let html = r#"
            <table><tr>
                <td><a href="/x">Change</a></td>
            </tr></table>
        "#;

        assert_eq!(extract(html)[0].category, FALLBACK_CATEGORY);
    }

    #[test]
    fn rows_keep_encounter_order_across_tables() {
        let html = r#"
            <table><tr><td><a href="/a">First</a></td></tr></table>
            <p>Unrelated prose between tables.</p>
            <table><tr><td><a href="/b">Second</a></td></tr></table>
        "#;

        let records = extract(html);
        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn serializes_with_original_field_names() {
        let record = BreakingChange {
            version: VersionToken::new(9),
            title: "Change".into(),
            based_on: "8.0".into(),
            category: "SDK".into(),
            link: "https://learn.microsoft.com/x".into(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["version"], "9.0");
        assert_eq!(json["basedOn"], "8.0");
        assert!(json.get("based_on").is_none());
    }
}
