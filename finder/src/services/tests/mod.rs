//! Service-specific tests
//!
//! Each real service has its own test file with dedicated fixtures.

#[cfg(test)]
mod file_system;

// Common test utilities for services
#[cfg(test)]
pub mod common {
    use chrono::NaiveDate;
    use shared::{FirmId, FirmRecord};

    pub fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid test date")
    }

    /// A minimal qualifying record for `id`
    pub fn test_record(id: &str) -> FirmRecord {
        FirmRecord {
            id: FirmId::new(id).expect("valid test id"),
            url: format!("https://www.firmenabc.at/firma_{id}"),
            name: format!("Firma {id}"),
            address: "Hauptplatz 1, 8010 Graz".to_string(),
            phone: Some("+43 316 123456".to_string()),
            email: None,
            description: None,
            category: "Coach".to_string(),
            found_date: test_date(),
        }
    }
}
