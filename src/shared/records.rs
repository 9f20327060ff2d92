//! Id-keyed helpers shared by the flat record collections (tasks, todos).
//!
//! Every helper is a pure transformation: it reads the old collection and
//! returns a new one, leaving the caller to commit and persist the result.

/// A record addressed by an opaque string id, unique within its collection.
pub trait Record: Clone {
    fn id(&self) -> &str;
}

/// Generate a fresh record id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn find<'a, T: Record>(records: &'a [T], id: &str) -> Option<&'a T> {
    records.iter().find(|record| record.id() == id)
}

pub fn contains<T: Record>(records: &[T], id: &str) -> bool {
    find(records, id).is_some()
}

/// Copy of `records` with the matching record passed through `change`.
/// Returns an unchanged copy when no record matches.
pub fn update_by_id<T, F>(records: &[T], id: &str, change: F) -> Vec<T>
where
    T: Record,
    F: FnOnce(&T) -> T,
{
    let mut change = Some(change);
    records
        .iter()
        .map(|record| {
            if record.id() == id {
                if let Some(apply) = change.take() {
                    return apply(record);
                }
            }
            record.clone()
        })
        .collect()
}

/// Copy of `records` without the matching record.
pub fn remove_by_id<T: Record>(records: &[T], id: &str) -> Vec<T> {
    records
        .iter()
        .filter(|record| record.id() != id)
        .cloned()
        .collect()
}
