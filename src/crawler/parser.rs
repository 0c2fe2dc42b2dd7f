//! HTML parser for extracting the navigation link and table aggregate
//!
//! This module handles parsing fetched page bytes to extract:
//! - The "Next" pagination link
//! - The sum of one numeric column of the page's data table
//!
//! Absence of either is a normal result, not an error.

use crate::ParseError;
use scraper::{ElementRef, Html, Selector};

/// What one page contributes to the crawl
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    /// Raw `href` of the "Next" link, if the page has one
    pub next_link: Option<String>,

    /// Sum of the configured table column (0.0 without a table)
    pub aggregate: f64,
}

/// Turns page bytes into a document and queries it
///
/// Shared by every worker, so implementations must be `Sync`. The document
/// itself stays on the worker that parsed it.
pub trait PageParser: Sync {
    /// Parsed document tree
    type Document;

    /// Builds a document from raw page bytes
    ///
    /// # Errors
    ///
    /// * `ParseError` - The input cannot produce any document
    fn parse(&self, bytes: &[u8]) -> Result<Self::Document, ParseError>;

    /// Returns the `href` of the navigation link labelled "Next"
    fn find_next_link(&self, document: &Self::Document) -> Option<String>;

    /// Sums the numeric cells of `column` (zero-based) across table rows
    fn sum_table_column(&self, document: &Self::Document, column: usize) -> f64;

    /// Parses `bytes` and runs both extractions
    fn extract(&self, bytes: &[u8], column: usize) -> Result<PageResult, ParseError> {
        let document = self.parse(bytes)?;
        Ok(PageResult {
            next_link: self.find_next_link(&document),
            aggregate: self.sum_table_column(&document, column),
        })
    }
}

impl<T: PageParser + ?Sized> PageParser for &T {
    type Document = T::Document;

    fn parse(&self, bytes: &[u8]) -> Result<Self::Document, ParseError> {
        (**self).parse(bytes)
    }

    fn find_next_link(&self, document: &Self::Document) -> Option<String> {
        (**self).find_next_link(document)
    }

    fn sum_table_column(&self, document: &Self::Document, column: usize) -> f64 {
        (**self).sum_table_column(document, column)
    }
}

/// Label of the pagination link
const NEXT_LABEL: &str = "Next";

/// `PageParser` built on `scraper` (html5ever)
///
/// html5ever recovers from any markup, so the only parse failure is an
/// empty document.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlPageParser;

impl HtmlPageParser {
    pub fn new() -> Self {
        Self
    }
}

impl PageParser for HtmlPageParser {
    type Document = Html;

    fn parse(&self, bytes: &[u8]) -> Result<Html, ParseError> {
        let text = String::from_utf8_lossy(bytes);
        if text.trim().is_empty() {
            return Err(ParseError::EmptyDocument);
        }
        Ok(Html::parse_document(&text))
    }

    fn find_next_link(&self, document: &Html) -> Option<String> {
        let anchor_selector = Selector::parse("a[href]").ok()?;

        document
            .select(&anchor_selector)
            .find(|element| element_text(element) == NEXT_LABEL)
            .and_then(|element| element.value().attr("href"))
            .map(str::to_string)
    }

    fn sum_table_column(&self, document: &Html, column: usize) -> f64 {
        let (Ok(table_selector), Ok(row_selector), Ok(cell_selector)) = (
            Selector::parse("table"),
            Selector::parse("tr"),
            Selector::parse("td"),
        ) else {
            return 0.0;
        };

        let Some(table) = document.select(&table_selector).next() else {
            return 0.0;
        };

        // Header rows are made of <th> and have no <td> to contribute
        table
            .select(&row_selector)
            .filter_map(|row| row.select(&cell_selector).nth(column))
            .filter_map(|cell| element_text(&cell).parse::<f64>().ok())
            .filter(|value| value.is_finite())
            .sum()
    }
}

/// Concatenated, trimmed text content of an element
fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> Html {
        HtmlPageParser::new().parse(html.as_bytes()).unwrap()
    }

    #[test]
    fn test_find_next_link() {
        let doc = parse(r#"<html><body><a href="page_1.html">Next</a></body></html>"#);
        assert_eq!(
            HtmlPageParser.find_next_link(&doc),
            Some("page_1.html".to_string())
        );
    }

    #[test]
    fn test_next_link_ignores_other_anchors() {
        let doc = parse(
            r#"<html><body>
                <a href="index.html">Home</a>
                <a href="page_3.html">Previous</a>
                <a href="page_5.html"> Next </a>
            </body></html>"#,
        );
        assert_eq!(
            HtmlPageParser.find_next_link(&doc),
            Some("page_5.html".to_string())
        );
    }

    #[test]
    fn test_next_link_requires_exact_label() {
        let doc = parse(r#"<html><body><a href="p.html">Next page</a></body></html>"#);
        assert_eq!(HtmlPageParser.find_next_link(&doc), None);
    }

    #[test]
    fn test_next_anchor_without_href() {
        let doc = parse(r#"<html><body><a>Next</a></body></html>"#);
        assert_eq!(HtmlPageParser.find_next_link(&doc), None);
    }

    #[test]
    fn test_terminal_page_has_no_link() {
        let doc = parse("<html><body><p>The end</p></body></html>");
        assert_eq!(HtmlPageParser.find_next_link(&doc), None);
    }

    #[test]
    fn test_sum_fifth_column() {
        let doc = parse(
            r#"<table>
                <tr><th>Date</th><th>Open</th><th>High</th><th>Low</th><th>Close</th></tr>
                <tr><td>d1</td><td>1</td><td>2</td><td>0</td><td>1.5</td></tr>
                <tr><td>d2</td><td>1</td><td>3</td><td>0</td><td>2.5</td></tr>
            </table>"#,
        );
        assert_eq!(HtmlPageParser.sum_table_column(&doc, 4), 4.0);
    }

    #[test]
    fn test_sum_without_header_row() {
        let doc = parse(
            r#"<table>
                <tr><td>a</td><td>b</td><td>c</td><td>d</td><td>1.5</td></tr>
                <tr><td>a</td><td>b</td><td>c</td><td>d</td><td>2.5</td></tr>
            </table>"#,
        );
        assert_eq!(HtmlPageParser.sum_table_column(&doc, 4), 4.0);
    }

    #[test]
    fn test_malformed_cells_contribute_zero() {
        let doc = parse(
            r#"<table>
                <tr><td>a</td><td>b</td><td>c</td><td>d</td><td>n/a</td></tr>
                <tr><td>a</td><td>b</td></tr>
                <tr><td>a</td><td>b</td><td>c</td><td>d</td><td> 3.25 </td></tr>
            </table>"#,
        );
        assert_eq!(HtmlPageParser.sum_table_column(&doc, 4), 3.25);
    }

    #[test]
    fn test_missing_table_is_zero() {
        let doc = parse("<html><body><a href=\"x.html\">Next</a></body></html>");
        assert_eq!(HtmlPageParser.sum_table_column(&doc, 4), 0.0);
    }

    #[test]
    fn test_only_first_table_is_summed() {
        let doc = parse(
            r#"<table><tr><td>7</td></tr></table>
               <table><tr><td>100</td></tr></table>"#,
        );
        assert_eq!(HtmlPageParser.sum_table_column(&doc, 0), 7.0);
    }

    #[test]
    fn test_empty_document_is_parse_error() {
        assert_eq!(
            HtmlPageParser.parse(b"  \n ").unwrap_err(),
            ParseError::EmptyDocument
        );
    }

    #[test]
    fn test_broken_markup_still_parses() {
        let doc = parse("<html><body><a href='page_2.html'>Next</a><table><tr><td>");
        assert_eq!(
            HtmlPageParser.find_next_link(&doc),
            Some("page_2.html".to_string())
        );
    }

    #[test]
    fn test_extract_combines_both() {
        let html = r#"<html><body>
            <table><tr><td>a</td><td>b</td><td>c</td><td>d</td><td>2.0</td></tr></table>
            <a href="page_1.html">Next</a>
        </body></html>"#;
        let page = HtmlPageParser.extract(html.as_bytes(), 4).unwrap();
        assert_eq!(page.next_link.as_deref(), Some("page_1.html"));
        assert_eq!(page.aggregate, 2.0);
    }
}
