//! Record normalizer: raw provider volumes into canonical candidates.
//!
//! A record without a provider id cannot be deduplicated or referenced
//! downstream, so it is dropped. Every other field is best-effort.

use crate::models::Candidate;
use crate::provider::Volume;
use std::collections::BTreeSet;

/// Maps one raw volume into the canonical candidate shape.
///
/// Returns `None` iff the record carries no provider identifier.
pub fn normalize(raw: &Volume) -> Option<Candidate> {
    if raw.id.trim().is_empty() {
        return None;
    }

    let info = &raw.volume_info;
    let thumbnail_url = pick_thumbnail(raw);

    Some(Candidate {
        id: raw.id.clone(),
        title: info.title.clone().unwrap_or_default(),
        subtitle: info.subtitle.clone().unwrap_or_default(),
        authors: info.authors.clone().unwrap_or_default(),
        categories: info
            .categories
            .clone()
            .unwrap_or_default()
            .into_iter()
            .collect::<BTreeSet<String>>(),
        description: info.description.clone().unwrap_or_default(),
        published_date: info.published_date.clone().unwrap_or_default(),
        has_cover: !thumbnail_url.is_empty(),
        thumbnail_url,
        info_link: info.info_link.clone().unwrap_or_default(),
        page_count: info.page_count.and_then(|n| u32::try_from(n).ok()),
        average_rating: info.average_rating,
        ratings_count: info.ratings_count,
    })
}

/// First available image field, in preference order.
fn pick_thumbnail(raw: &Volume) -> String {
    let Some(links) = &raw.volume_info.image_links else {
        return String::new();
    };

    [
        &links.thumbnail,
        &links.small_thumbnail,
        &links.small,
        &links.medium,
        &links.large,
    ]
    .into_iter()
    .flatten()
    .find(|url| !url.is_empty())
    .cloned()
    .unwrap_or_default()
}
