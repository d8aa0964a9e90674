//! Facet groups for leaf listings.

use crate::compose::{QueryDescriptor, Route, Variation};
use crate::href::{QueryParams, build_url};
use crate::opds::{Facet, Link};
use folio_search::constants::{LANGUAGES, MAIN_CLASSES, OrderBy, SortDirection};
use folio_search::{Format, Rights, Scope, TopSubject};

type SortOption = (&'static str, OrderBy, Option<SortDirection>);

const SORT_OPTIONS: [SortOption; 5] = [
    ("Most Popular", OrderBy::Downloads, Some(SortDirection::Desc)),
    ("Relevance", OrderBy::Relevance, None),
    ("Title (A-Z)", OrderBy::Title, Some(SortDirection::Asc)),
    ("Author (A-Z)", OrderBy::Author, Some(SortDirection::Asc)),
    ("Random", OrderBy::Random, None),
];

/// Builds every facet group for a leaf listing.
///
/// Each option links to `descriptor` with exactly one dimension changed and
/// the page reset to 1. The output depends on nothing but the arguments.
pub fn build_facets(descriptor: &QueryDescriptor, base_path: &str, top_subjects: Option<&[TopSubject]>) -> Vec<Facet> {
    let option = |variation: Variation, title: &str, active: bool| {
        Link::facet(descriptor.vary(variation).url(base_path), title, active)
    };
    let mut facets = Vec::with_capacity(7);

    // ===== Sort =====
    let sort = SORT_OPTIONS
        .iter()
        .map(|&(title, order, direction)| {
            let active = descriptor.sort() == Some(order) || (order == OrderBy::Downloads && descriptor.sort().is_none());
            option(Variation::Sort(Some(order), direction), title, active)
        })
        .collect();
    facets.push(Facet::new("Sort By", sort));

    // ===== Subjects =====
    if let Some(subjects) = top_subjects.filter(|subjects| !subjects.is_empty()) {
        let links = subjects
            .iter()
            .map(|subject| {
                let href = build_url(&format!("{base_path}/subjects"), &QueryParams::new().with("id", subject.id.to_string()));
                Link::untyped(href, format!("{} ({})", subject.name, subject.count))
            })
            .collect();
        facets.push(Facet::new("Top Subjects in Results", links));
    }

    // ===== Main Category =====
    if descriptor.route() == Route::Search && *descriptor.scope() == Scope::Unscoped {
        let links = MAIN_CLASSES
            .iter()
            .map(|class| option(Variation::Scope(Scope::Classification(class.code.to_string())), class.label, false))
            .collect();
        facets.push(Facet::new("Main Category", links));
    }

    // ===== Filters =====
    let rights = [
        ("Any", Rights::Any),
        ("Public Domain", Rights::PublicDomain),
        ("Copyrighted", Rights::Copyrighted),
    ];
    facets.push(Facet::new(
        "Copyright Status",
        rights
            .into_iter()
            .map(|(title, rights)| option(Variation::Rights(rights), title, descriptor.rights() == rights))
            .collect(),
    ));

    let formats = [("Any", Format::Any), ("Text", Format::Text), ("Audiobook", Format::Audiobook)];
    facets.push(Facet::new(
        "Format",
        formats
            .into_iter()
            .map(|(title, format)| option(Variation::Format(format), title, descriptor.format() == format))
            .collect(),
    ));

    let mut languages = vec![option(Variation::Language(None), "Any", descriptor.language().is_none())];
    languages.extend(LANGUAGES.iter().map(|lang| {
        option(
            Variation::Language(Some(lang.code.to_string())),
            lang.label,
            descriptor.language() == Some(lang.code),
        )
    }));
    facets.push(Facet::new("Language", languages));

    facets
}
