//! Record families that can be browsed.

mod authority;
mod call_number;
mod classification;
mod contributor;
mod subject;

pub use authority::{AuthRefType, AuthorityDomain, AuthorityRecord};
pub use call_number::{CallNumberDomain, CallNumberRecord};
pub use classification::{ClassificationDomain, ClassificationRecord};
pub use contributor::{ContributorDomain, ContributorRecord};
pub use subject::{SubjectDomain, SubjectRecord};

/// Joins the present, non-blank parts with single spaces.
pub(crate) fn join_present<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    parts
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
