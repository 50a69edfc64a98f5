//! Test fixtures and data for finder tests
//!
//! Pages are rendered in the directory's markup so the real HTML parser runs
//! end to end.

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use finder::config::SiteConfig;

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const BASE: &'static str = "https://www.firmenabc.at";

    pub fn start_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    pub fn run_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    /// Url of a firm's detail page
    pub fn firm_url(id: &str) -> String {
        format!("{}/firma-{}_{}", Self::BASE, id.to_lowercase(), id)
    }

    /// Url the paginator requests for `keyword` and `page`
    pub fn listing_url(keyword: &str, page: u32) -> String {
        SiteConfig::default().listing_url(keyword, page).unwrap().to_string()
    }

    /// Search result page linking to the given firm ids
    pub fn listing_page(ids: &[&str]) -> String {
        let items: String = ids
            .iter()
            .map(|id| {
                format!(
                    r#"<li class="result"><a class="company-name" href="/firma-{}_{}">Firma {}</a></li>"#,
                    id.to_lowercase(),
                    id,
                    id
                )
            })
            .collect();
        format!(r#"<html><body><ul class="results">{items}</ul></body></html>"#)
    }

    /// Search result page without results
    pub fn empty_listing() -> String {
        r#"<html><body><div class="no-results">Keine Ergebnisse gefunden</div></body></html>"#.to_string()
    }

    /// Detail page of a firm without a website
    pub fn detail_without_website(id: &str) -> String {
        Self::detail_page(
            id,
            &format!(
                "A: Hauptplatz {}, 8010 Graz<br>T: +43 316 1000{}<br>E: office@{}.at",
                id.len(),
                id.len(),
                id.to_lowercase()
            ),
        )
    }

    /// Detail page of a firm that lists a website
    pub fn detail_with_website(id: &str) -> String {
        Self::detail_page(
            id,
            &format!("A: Annenstraße 2, 8020 Graz<br>W: www.{}.at<br>T: +43 316 2000", id.to_lowercase()),
        )
    }

    fn detail_page(id: &str, contact: &str) -> String {
        format!(
            r#"<html><body>
                <h1 class="company-name">Firma {id}</h1>
                <div class="contact-info">{contact}</div>
            </body></html>"#
        )
    }
}
