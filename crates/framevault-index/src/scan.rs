//! Linear-scan ranking shared by the in-memory and file backends.

use std::cmp::Ordering;

use framevault_core::{cosine_similarity, IndexEntry};

/// Top-k entries by descending cosine similarity, with `similarity` set.
///
/// Ties break by `(document_id, frame_number)` so repeated queries return
/// an identical order; a larger k therefore always extends a smaller k's
/// result as a prefix.
pub(crate) fn rank(entries: &[IndexEntry], query: &[f32], k: usize) -> Vec<IndexEntry> {
    if k == 0 || entries.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(f32, &IndexEntry)> = entries
        .iter()
        .map(|entry| (cosine_similarity(query, &entry.embedding), entry))
        .collect();

    scored.sort_by(|(sim_a, a), (sim_b, b)| {
        sim_b
            .partial_cmp(sim_a)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.document_id.cmp(&b.document_id))
            .then_with(|| a.frame_number.cmp(&b.frame_number))
    });

    scored
        .into_iter()
        .take(k)
        .map(|(similarity, entry)| {
            let mut hit = entry.clone();
            hit.similarity = Some(similarity);
            hit
        })
        .collect()
}

/// Replace-or-append `incoming` into `entries` keyed on
/// `(document_id, frame_number)`.
pub(crate) fn upsert_into(entries: &mut Vec<IndexEntry>, incoming: Vec<IndexEntry>) {
    for entry in incoming {
        match entries
            .iter_mut()
            .find(|e| e.document_id == entry.document_id && e.frame_number == entry.frame_number)
        {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
    }
}
