//! Field normalizer - turns raw stored documents into typed `Post`s.

use chrono::{DateTime, Datelike};

use crate::domain::{DERIVED_FIELDS, Document, INT_FIELDS, Post};

/// Epoch milliseconds to `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// Years outside `0..=9999` use the signed six-digit form (`+010000`,
/// `-000001`). Values chrono cannot represent give an empty string.
pub fn to_iso_string(epoch_ms: i64) -> String {
    let Some(dt) = DateTime::from_timestamp_millis(epoch_ms) else {
        return String::new();
    };

    let year = match dt.year() {
        y @ 0..=9999 => format!("{y:04}"),
        y if y < 0 => format!("-{:06}", y.unsigned_abs()),
        y => format!("+{y:06}"),
    };
    format!("{year}{}", dt.format("-%m-%dT%H:%M:%S%.3fZ"))
}

/// Moves every entry of `doc` into a `Post`.
///
/// Names in `int_fields` are coerced into their typed slot when `requested`
/// is empty or names them; every other entry, including integer fields the
/// projection left out, is kept verbatim in `extra`. Stored copies of
/// derived fields are dropped.
pub fn parse_int_fields(doc: Document, int_fields: &[&str], requested: &[String]) -> Post {
    let mut post = Post::default();

    for (name, value) in doc {
        if DERIVED_FIELDS.contains(&name.as_str()) {
            continue;
        }

        let wanted = int_fields.contains(&name.as_str())
            && (requested.is_empty() || requested.iter().any(|f| *f == name));

        if wanted {
            if let Some(slot) = post.int_slot_mut(&name) {
                *slot = Some(value.to_int_lenient());
                continue;
            }
        }
        post.extra.insert(name, value);
    }

    post
}

/// Normalizes one fetched record. Absent records stay absent.
pub fn normalize_post(doc: Option<Document>, requested: &[String]) -> Option<Post> {
    let mut post = parse_int_fields(doc?, &INT_FIELDS, requested);

    if let (Some(up), Some(down)) = (post.int_value("upvotes"), post.int_value("downvotes")) {
        post.votes = Some(up.saturating_sub(down));
    }

    if let Some(timestamp) = post.int_value("timestamp") {
        post.timestamp_iso = Some(to_iso_string(timestamp));
    }

    if let Some(edited) = post.int_value("edited") {
        post.edited_iso = Some(if edited != 0 {
            to_iso_string(edited)
        } else {
            String::new()
        });
    }

    Some(post)
}
