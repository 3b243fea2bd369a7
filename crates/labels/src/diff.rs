//! Reference-set arithmetic on embedded reference lists.
//!
//! Both `Label.objects` and `Object.labels` are stored as ordered arrays with
//! set semantics. Every function here preserves the original order of the
//! surviving entries, appends new entries at the end, and never emits the
//! same reference twice.

use std::collections::HashSet;

use labelsync_core::DocumentRef;

/// Drops every reference whose id is in `ids` (and any duplicate entry).
pub fn remove_ids(refs: &[DocumentRef], ids: &HashSet<&str>) -> Vec<DocumentRef> {
    let mut seen: HashSet<&DocumentRef> = HashSet::with_capacity(refs.len());
    refs.iter()
        .filter(|r| !ids.contains(r.id()))
        .filter(|r| seen.insert(*r))
        .cloned()
        .collect()
}

/// Drops every reference equal (full path) to one of `targets` (and any
/// duplicate entry).
pub fn remove_refs(refs: &[DocumentRef], targets: &HashSet<&DocumentRef>) -> Vec<DocumentRef> {
    let mut seen: HashSet<&DocumentRef> = HashSet::with_capacity(refs.len());
    refs.iter()
        .filter(|r| !targets.contains(r))
        .filter(|r| seen.insert(*r))
        .cloned()
        .collect()
}

/// Drops every occurrence of exactly `target` (and any duplicate entry).
pub fn remove_ref(refs: &[DocumentRef], target: &DocumentRef) -> Vec<DocumentRef> {
    remove_refs(refs, &HashSet::from([target]))
}

/// Appends each of `extra` whose id is not already present.
pub fn union_by_id<'a>(
    refs: Vec<DocumentRef>,
    extra: impl IntoIterator<Item = &'a DocumentRef>,
) -> Vec<DocumentRef> {
    let mut out = refs;
    for r in extra {
        if !out.iter().any(|existing| existing.id() == r.id()) {
            out.push(r.clone());
        }
    }
    out
}

/// New `labels` list for an object.
///
/// `(current \ remove) ∪ add`, with removal evaluated against the current
/// list: a label that is both removed and added ends up attached.
pub fn relabel(
    current: &[DocumentRef],
    remove: &HashSet<&str>,
    add: &[DocumentRef],
) -> Vec<DocumentRef> {
    union_by_id(remove_ids(current, remove), add)
}
