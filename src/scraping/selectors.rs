// src/scraping/selectors.rs
//! Site markup knowledge: which selectors to try, in which order.
//!
//! The site renames classes often, so every field is read through an ordered
//! list of selectors. The first selector that yields non-empty text wins; if
//! they all fail the field is empty.

use scraper::{ElementRef, Html, Selector};

/// Ordered selectors for one field of a listing.
#[derive(Debug, Clone, Copy)]
pub struct FieldStrategy {
    pub field: &'static str,
    pub selectors: &'static [&'static str],
}

impl FieldStrategy {
    pub const fn new(field: &'static str, selectors: &'static [&'static str]) -> Self {
        Self { field, selectors }
    }

    /// Text of the first matching selector, or an empty string.
    pub fn extract(&self, document: &Html) -> String {
        first_text(document, self.selectors).unwrap_or_default()
    }
}

/// Strategies used to read a listing's detail view.
#[derive(Debug, Clone, Copy)]
pub struct ListingStrategies {
    pub title: FieldStrategy,
    pub company: FieldStrategy,
    pub description: FieldStrategy,
}

impl Default for ListingStrategies {
    fn default() -> Self {
        Self {
            title: TITLE,
            company: COMPANY,
            description: DESCRIPTION,
        }
    }
}

pub const TITLE: FieldStrategy = FieldStrategy::new(
    "title",
    &[
        ".job-details-jobs-unified-top-card__job-title",
        "h1.top-card-layout__title",
        ".jobs-unified-top-card__job-title",
        "h1[data-test-id='job-title']",
        "h1.t-24",
    ],
);

pub const COMPANY: FieldStrategy = FieldStrategy::new(
    "company",
    &[
        ".job-details-jobs-unified-top-card__company-name",
        ".jobs-unified-top-card__company-name",
        "a.topcard__org-name-link",
        ".top-card-layout__card .top-card-layout__second-subline",
        "a[data-test-id='job-poster-name']",
    ],
);

pub const DESCRIPTION: FieldStrategy = FieldStrategy::new(
    "description",
    &[
        ".jobs-box__html-content",
        ".jobs-description-content__text",
        ".jobs-description__container",
        ".show-more-less-html__markup",
        "[data-test-id='job-description']",
        "#job-details",
    ],
);

pub const LOGIN_IDENTIFIER_INPUT: &str = "#username";
pub const LOGIN_SECRET_INPUT: &str = "#password";
pub const LOGIN_SUBMIT: &str = "button[type='submit']";

pub const LANDING_INDICATORS: &[&str] = &["#global-nav", ".global-nav", "[data-test-global-nav]"];

pub const CREDENTIAL_ERRORS: &[&str] = &[
    "#error-for-password",
    "#error-for-username",
    ".form__label--error",
    ".alert-content",
];

pub const CHALLENGE_INDICATORS: &[&str] = &[
    "#captcha-internal",
    ".challenge-dialog",
    "iframe[title*='captcha' i]",
    "form#captcha-challenge",
];

pub const RESULTS_CONTAINERS: &[&str] = &[
    ".jobs-search-results-list",
    ".scaffold-layout__list",
    "ul.jobs-search__results-list",
];

pub const NO_RESULTS_INDICATORS: &[&str] =
    &[".jobs-search-no-results-banner", ".jobs-search-two-pane__no-results-banner"];

/// `(selector, attribute)` pairs that carry a card's job id.
pub const JOB_CARD_IDS: &[(&str, &str)] = &[
    ("[data-occludable-job-id]", "data-occludable-job-id"),
    ("[data-job-id]", "data-job-id"),
    ("div.base-card[data-entity-urn]", "data-entity-urn"),
];

pub const NEXT_PAGE_CONTROLS: &[&str] = &[
    "button[aria-label='View next page']:not([disabled])",
    ".jobs-search-pagination__button--next:not([disabled])",
    ".artdeco-pagination__button--next:not([disabled])",
    "li.artdeco-pagination__indicator--number.active + li",
];

/// Parses selectors, skipping any that are malformed.
pub fn parse_all(selectors: &[&str]) -> Vec<Selector> {
    selectors
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .collect()
}

pub fn matches_any(document: &Html, selectors: &[&str]) -> bool {
    parse_all(selectors)
        .iter()
        .any(|selector| document.select(selector).next().is_some())
}

/// Like [`matches_any`] but only counts elements with visible text.
pub fn has_text_any(document: &Html, selectors: &[&str]) -> bool {
    parse_all(selectors).iter().any(|selector| {
        document
            .select(selector)
            .any(|element| !element_text(element).is_empty())
    })
}

pub fn first_text(document: &Html, selectors: &[&str]) -> Option<String> {
    for selector in parse_all(selectors) {
        if let Some(text) = document
            .select(&selector)
            .map(element_text)
            .find(|text| !text.is_empty())
        {
            return Some(text);
        }
    }
    None
}

pub fn element_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<Vec<_>>().join(" "))
}

/// Collapses all whitespace runs into single spaces.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
