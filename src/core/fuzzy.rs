use crate::core::aliases;

/// Fragments this short must match a whole word, not any substring
const SHORT_FRAGMENT_LEN: usize = 3;

#[inline]
fn clean(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Region comparison form: lower-case with hyphens, underscores and spaces removed
#[inline]
fn normalize_region(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '-' | '_') && !c.is_whitespace())
        .collect()
}

/// Check whether an alias fragment occurs in already lower-cased text
#[inline]
fn contains_fragment(text: &str, fragment: &str) -> bool {
    if fragment.is_empty() {
        return false;
    }

    if fragment.len() <= SHORT_FRAGMENT_LEN {
        text.split(|c: char| !c.is_alphanumeric())
            .any(|word| word == fragment)
    } else {
        text.contains(fragment)
    }
}

fn region_fragment_hit(location: &str, fragment: &str) -> bool {
    let fragment_norm = normalize_region(fragment);
    if fragment_norm.len() <= SHORT_FRAGMENT_LEN {
        contains_fragment(&clean(location), &clean(fragment))
            || normalize_region(location) == fragment_norm
    } else {
        normalize_region(location).contains(&fragment_norm)
    }
}

/// Check if a required industry is served by any of the vendor's segments
///
/// Matches on case-insensitive equality, substring containment in either
/// direction, or the industry alias table (consulted for the required value
/// when it is a table key, and for each segment that is a table key).
pub fn industry_matches(required: &str, segments: &[String]) -> bool {
    let required = clean(required);
    if required.is_empty() {
        return false;
    }

    let required_aliases = aliases::industry_aliases(&required);

    segments
        .iter()
        .map(|segment| clean(segment))
        .filter(|segment| !segment.is_empty())
        .any(|segment| {
            segment.contains(&required)
                || required.contains(&segment)
                || required_aliases
                    .is_some_and(|fragments| fragments.iter().any(|f| contains_fragment(&segment, f)))
                || aliases::industry_aliases(&segment)
                    .is_some_and(|fragments| fragments.iter().any(|f| contains_fragment(&required, f)))
        })
}

/// Check if a required region is covered by any candidate location
///
/// Both sides are normalized (lower-case, no hyphens/underscores/spaces) and
/// compared by containment in either direction before falling back to the
/// region alias table. The table only widens a required region key to its
/// keywords; a location that is itself a region key does not satisfy the
/// keywords listed under it.
pub fn region_matches(required: &str, candidate_locations: &[String]) -> bool {
    let required_norm = normalize_region(required);
    if required_norm.is_empty() {
        return false;
    }

    let required_key = clean(required);
    let required_aliases = aliases::region_aliases(&required_key).or_else(|| {
        aliases::region_keys()
            .find(|key| normalize_region(key) == required_norm)
            .and_then(aliases::region_aliases)
    });

    candidate_locations
        .iter()
        .filter(|location| !normalize_region(location).is_empty())
        .any(|location| {
            let location_norm = normalize_region(location);

            location_norm.contains(&required_norm)
                || required_norm.contains(&location_norm)
                || required_aliases.is_some_and(|fragments| {
                    fragments.iter().any(|f| region_fragment_hit(location, f))
                })
        })
}

/// Check if a required city has a facility among the candidate locations
///
/// Substring containment in either direction, plus the metro alias table in
/// both directions ("silicon valley" matches a "Santa Clara" facility and
/// "santa clara" matches a "Silicon Valley" facility).
pub fn city_matches(required: &str, candidate_locations: &[String]) -> bool {
    let required = clean(required);
    if required.is_empty() {
        return false;
    }

    let members = aliases::city_aliases(&required);

    candidate_locations
        .iter()
        .map(|location| clean(location))
        .filter(|location| !location.is_empty())
        .any(|location| {
            location.contains(&required)
                || required.contains(&location)
                || members.is_some_and(|cities| cities.iter().any(|c| contains_fragment(&location, c)))
                || aliases::city_keys().any(|metro| {
                    contains_fragment(&location, metro)
                        && aliases::city_aliases(metro)
                            .is_some_and(|cities| cities.contains(&required.as_str()))
                })
        })
}

/// Find the first service descriptor satisfying a required service token
///
/// The token is expanded through the service keyword table; any expanded
/// keyword that is a case-insensitive substring of a descriptor is a match.
/// Returns the descriptor as held by the vendor.
pub fn service_matches<'a>(required: &str, service_descriptors: &'a [String]) -> Option<&'a str> {
    let required = clean(required);
    if required.is_empty() {
        return None;
    }

    let mut keywords: Vec<&str> = vec![required.as_str()];
    if let Some(expanded) = aliases::service_keywords(&required) {
        keywords.extend(expanded.iter().copied());
    }

    service_descriptors
        .iter()
        .find(|descriptor| {
            let descriptor = clean(descriptor);
            keywords.iter().any(|k| descriptor.contains(k))
        })
        .map(String::as_str)
}

/// Find the first held certification containing the required one
///
/// Case-insensitive, required inside held: "SOC 2" matches "SOC 2 Type II".
pub fn certification_matches<'a>(required: &str, held: &'a [String]) -> Option<&'a str> {
    let required = clean(required);
    if required.is_empty() {
        return None;
    }

    held.iter()
        .find(|cert| cert.to_lowercase().contains(&required))
        .map(String::as_str)
}
