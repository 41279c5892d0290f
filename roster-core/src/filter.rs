//! Free-text filter for the available list.
//!
//! Only narrows what is shown. The underlying list is never reordered
//! or trimmed by a filter.

use crate::Actor;

/// `true` when `query` is empty or the actor's display name contains it,
/// ignoring case.
pub fn matches(query: &str, actor: &Actor) -> bool {
    query.is_empty() || name_contains(&query.to_lowercase(), actor)
}

/// The visible subset of `actors` for `query`, in original order.
pub fn visible<'a>(query: &str, actors: &'a [Actor]) -> Vec<&'a Actor> {
    if query.is_empty() {
        return actors.iter().collect();
    }
    let needle = query.to_lowercase();
    actors.iter().filter(|a| name_contains(&needle, a)).collect()
}

/// `needle` must already be lowercased.
fn name_contains(needle: &str, actor: &Actor) -> bool {
    actor.display_name().to_lowercase().contains(needle)
}
