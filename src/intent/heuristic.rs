use super::types::*;

/// Keyword rules, checked in order. The first rule with a matching phrase wins,
/// so the more specific phrases must come before the generic ones.
const RULES: &[(&[&str], &[(&str, &str)])] = &[
    (
        &["mind-bending", "sci-fi"],
        &[(WITH_GENRES, "878"), (VOTE_AVERAGE_GTE, "7.5")],
    ),
    (
        &["best of 2024", "newest hits"],
        &[(VOTE_AVERAGE_GTE, "7"), (PRIMARY_RELEASE_YEAR, "2024")],
    ),
    (
        &["best", "top rated"],
        &[(VOTE_AVERAGE_GTE, "8.5"), (SORT_BY, "vote_count.desc")],
    ),
];

/// Offline translation of a search term, used when no language model is
/// configured. Terms matching no rule become a keyword search for the
/// original, unnormalized text.
pub fn keyword_intent(search_term: &str) -> SearchIntent {
    let normalized = search_term.trim().to_lowercase();

    for (phrases, params) in RULES {
        if phrases.iter().any(|p| normalized.contains(p)) {
            return params
                .iter()
                .fold(SearchIntent::new(CatalogRoute::Discover), |intent, (k, v)| {
                    intent.with(k, v)
                });
        }
    }

    SearchIntent::keyword_search(search_term)
}
