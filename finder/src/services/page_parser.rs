//! HTML page parser backed by the `scraper` crate
//!
//! Selectors and the label map come from [`SiteConfig`], so a layout change on
//! the directory site is a configuration change rather than a code change.

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

use crate::config::SiteConfig;
use crate::core::candidate::candidate_from_href;
use crate::core::labels::collapse_whitespace;
use crate::core::{Field, FieldSet, LabelMap};
use crate::error::{FinderError, FinderResult};
use crate::traits::{ListingPage, PageParser};

/// Elements that start a new contact line
const LINE_BREAKING: &[&str] = &[
    "br", "p", "div", "li", "tr", "td", "dd", "dt", "address", "section", "ul", "ol", "table", "h1", "h2", "h3",
    "h4",
];

pub struct HtmlPageParser {
    base: Url,
    labels: LabelMap,
    listing_link: Selector,
    end_of_results: Option<Selector>,
    next_page: Option<Selector>,
    contact_block: Selector,
    address: Option<Selector>,
    email_link: Option<Selector>,
    name: Selector,
    description: Option<Selector>,
    category: Option<Selector>,
}

impl HtmlPageParser {
    pub fn new(site: &SiteConfig) -> FinderResult<Self> {
        let selectors = &site.selectors;
        Ok(Self {
            base: site.base()?,
            labels: site.labels.clone(),
            listing_link: compile("selectors.listing_link", &selectors.listing_link)?,
            end_of_results: compile_optional("selectors.end_of_results", &selectors.end_of_results)?,
            next_page: match &selectors.next_page {
                Some(css) => compile_optional("selectors.next_page", css)?,
                None => None,
            },
            contact_block: compile("selectors.contact_block", &selectors.contact_block)?,
            address: compile_optional("selectors.address", &selectors.address)?,
            email_link: compile_optional("selectors.email_link", &selectors.email_link)?,
            name: compile("selectors.name", &selectors.name)?,
            description: compile_optional("selectors.description", &selectors.description)?,
            category: compile_optional("selectors.category", &selectors.category)?,
        })
    }
}

impl PageParser for HtmlPageParser {
    fn parse_listing(&self, body: &str, _page_url: &str) -> FinderResult<ListingPage> {
        let document = Html::parse_document(body);

        let mut seen = HashSet::new();
        let candidates = document
            .select(&self.listing_link)
            .filter_map(|link| link.value().attr("href"))
            .filter_map(|href| candidate_from_href(&self.base, href))
            .filter(|candidate| seen.insert(candidate.id.clone()))
            .collect();

        let ended = self
            .end_of_results
            .as_ref()
            .is_some_and(|marker| document.select(marker).next().is_some());
        let next_present = self
            .next_page
            .as_ref()
            .map_or(true, |next| document.select(next).next().is_some());

        Ok(ListingPage { candidates, has_more: !ended && next_present })
    }

    fn parse_detail(&self, body: &str, page_url: &str) -> FinderResult<FieldSet> {
        let document = Html::parse_document(body);
        let block = document
            .select(&self.contact_block)
            .next()
            .ok_or_else(|| FinderError::parse_structure(page_url, "contact block not found"))?;

        let mut fields = FieldSet::new();
        for line in contact_lines(block) {
            if let Some((field, value)) = self.labels.match_line(&line) {
                fields.set(field, value);
            }
        }

        if !fields.contains(Field::Address) {
            if let Some(element) = first_match(block, self.address.as_ref()) {
                fields.set(Field::Address, &joined_text(element));
            }
        }
        if !fields.contains(Field::Email) {
            if let Some(href) = first_match(block, self.email_link.as_ref()).and_then(|a| a.value().attr("href")) {
                let address = href.trim_start_matches("mailto:").split('?').next().unwrap_or_default();
                fields.set(Field::Email, address);
            }
        }

        let root = document.root_element();
        if let Some(element) = first_match(root, Some(&self.name)) {
            fields.set(Field::Name, &joined_text(element));
        }
        if let Some(element) = first_match(root, self.description.as_ref()) {
            fields.set(Field::Description, &joined_text(element));
        }
        if let Some(element) = first_match(root, self.category.as_ref()) {
            fields.set(Field::Category, &joined_text(element));
        }

        Ok(fields)
    }
}

fn compile(field: &str, css: &str) -> FinderResult<Selector> {
    compile_optional(field, css)?.ok_or_else(|| FinderError::config(format!("{field} is empty")))
}

/// An empty selector disables the lookup
fn compile_optional(field: &str, css: &str) -> FinderResult<Option<Selector>> {
    if css.trim().is_empty() {
        return Ok(None);
    }
    Selector::parse(css)
        .map(Some)
        .map_err(|e| FinderError::config(format!("{field}: invalid selector '{css}': {e}")))
}

fn first_match<'a>(scope: ElementRef<'a>, selector: Option<&Selector>) -> Option<ElementRef<'a>> {
    scope.select(selector?).next()
}

/// All text nodes of an element joined by single spaces
fn joined_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Split a contact block into visual lines
///
/// Label and value often sit in separate inline elements
/// (`<li><b>T:</b> 0664 123</li>`), so text is accumulated per block-level
/// element and `<br>` rather than per text node.
pub fn contact_lines(block: ElementRef<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    collect_lines(block, &mut lines, &mut current);
    flush_line(&mut lines, &mut current);
    lines
}

fn collect_lines(element: ElementRef<'_>, lines: &mut Vec<String>, current: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => current.push_str(text),
            Node::Element(el) => {
                let breaks = LINE_BREAKING.contains(&el.name());
                if breaks {
                    flush_line(lines, current);
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_lines(child_element, lines, current);
                }
                if breaks {
                    flush_line(lines, current);
                }
            }
            _ => {}
        }
    }
}

fn flush_line(lines: &mut Vec<String>, current: &mut String) {
    for part in current.split('\n') {
        let line = collapse_whitespace(part);
        if !line.is_empty() {
            lines.push(line);
        }
    }
    current.clear();
}
