//! Website-absence classification
//!
//! Pure decision over a parsed [`FieldSet`]. A [`FirmRecord`] can only be
//! built from a set that classifies as [`Classification::Qualifying`].

use chrono::NaiveDate;
use shared::{Candidate, FirmRecord};

use crate::core::labels::{Field, FieldSet};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classification {
    /// No website label, name and address present
    Qualifying,
    /// The page lists a website
    HasWebsite,
    /// No website, but required fields are missing
    Incomplete { missing: Vec<Field> },
}

impl Classification {
    pub fn is_qualifying(&self) -> bool {
        matches!(self, Self::Qualifying)
    }
}

/// True iff no website-labeled field was found
pub fn website_absent(fields: &FieldSet) -> bool {
    !fields.has_website()
}

pub fn classify(fields: &FieldSet) -> Classification {
    if !website_absent(fields) {
        return Classification::HasWebsite;
    }

    let missing: Vec<Field> = [Field::Name, Field::Address]
        .into_iter()
        .filter(|f| !fields.contains(*f))
        .collect();

    if missing.is_empty() {
        Classification::Qualifying
    } else {
        Classification::Incomplete { missing }
    }
}

/// Build the record for a qualifying page, or hand back the rejection
///
/// `fallback_category` is used when the page carries no category block.
pub fn into_record(
    candidate: &Candidate,
    mut fields: FieldSet,
    fallback_category: &str,
    found_date: NaiveDate,
) -> Result<FirmRecord, Classification> {
    let verdict = classify(&fields);
    if !verdict.is_qualifying() {
        return Err(verdict);
    }

    // classify() guarantees name and address
    let (Some(name), Some(address)) = (fields.take(Field::Name), fields.take(Field::Address)) else {
        return Err(Classification::Incomplete { missing: vec![Field::Name, Field::Address] });
    };

    Ok(FirmRecord {
        id: candidate.id.clone(),
        url: candidate.url.clone(),
        name,
        address,
        phone: fields.take(Field::Phone),
        email: fields.take(Field::Email),
        description: fields.take(Field::Description),
        category: fields
            .take(Field::Category)
            .unwrap_or_else(|| fallback_category.to_string()),
        found_date,
    })
}
