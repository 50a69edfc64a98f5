//! Detail page extraction

use shared::Candidate;

use crate::core::FieldSet;
use crate::error::FinderResult;
use crate::pipeline::fetch::PoliteFetcher;
use crate::traits::{Clock, PageFetcher, PageParser};

/// Fetch a candidate's detail page and parse its labeled fields
///
/// A missing contact block surfaces as `FinderError::ParseStructure`; the
/// caller decides to skip the candidate.
pub async fn extract_details<F, P, C>(
    candidate: &Candidate,
    parser: &P,
    fetch: &mut PoliteFetcher<'_, F, C>,
) -> FinderResult<FieldSet>
where
    F: PageFetcher,
    P: PageParser,
    C: Clock,
{
    let body = fetch.fetch(&candidate.url).await?;
    parser.parse_detail(&body, &candidate.url)
}
