use std::collections::HashMap;

use benchview_protocol::{OrderedResultRecord, ResultRecord};

/// Selection bookkeeping supplied by the table's owner.
///
/// Records are identified by `id`. The bulk operations default to looping
/// over the single-record ones.
pub trait Selection {
    fn is_selected(&self, record: &ResultRecord) -> bool;

    fn select(&mut self, record: &OrderedResultRecord);

    fn deselect(&mut self, record: &ResultRecord);

    fn select_multiple(&mut self, records: &[OrderedResultRecord]) {
        for record in records {
            self.select(record);
        }
    }

    fn deselect_multiple(&mut self, records: &[OrderedResultRecord]) {
        for record in records {
            self.deselect(record);
        }
    }
}

/// In-memory selection keyed by record id, remembering the absolute
/// position each record had when it was selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    by_id: HashMap<String, usize>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn order_index(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn clear(&mut self) {
        self.by_id.clear();
    }

    /// Flip one record; returns whether it is now selected.
    pub fn toggle(&mut self, record: &OrderedResultRecord) -> bool {
        if self.is_selected(record) {
            self.deselect(record);
            false
        } else {
            self.select(record);
            true
        }
    }

    /// Selected ids ordered by their absolute position.
    pub fn ids_in_order(&self) -> Vec<&str> {
        let mut entries: Vec<(&str, usize)> =
            self.by_id.iter().map(|(id, idx)| (id.as_str(), *idx)).collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        entries.into_iter().map(|(id, _)| id).collect()
    }
}

impl Selection for SelectionSet {
    fn is_selected(&self, record: &ResultRecord) -> bool {
        self.by_id.contains_key(&record.id)
    }

    fn select(&mut self, record: &OrderedResultRecord) {
        self.by_id.insert(record.id.clone(), record.order_index);
    }

    fn deselect(&mut self, record: &ResultRecord) {
        self.by_id.remove(&record.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ordered(id: &str, order_index: usize) -> OrderedResultRecord {
        OrderedResultRecord {
            record: ResultRecord::with_json(id, json!({})),
            order_index,
        }
    }

    #[test]
    fn select_and_deselect_by_id() {
        let mut set = SelectionSet::new();
        let r = ordered("r1", 4);
        set.select(&r);
        assert!(set.is_selected(&r));
        assert_eq!(set.order_index("r1"), Some(4));

        // Same id at a different position is the same record.
        let moved = ordered("r1", 9);
        assert!(set.is_selected(&moved));
        set.deselect(&moved);
        assert!(set.is_empty());
    }

    #[test]
    fn toggle_flips() {
        let mut set = SelectionSet::new();
        let r = ordered("r1", 0);
        assert!(set.toggle(&r));
        assert!(!set.toggle(&r));
        assert!(!set.contains("r1"));
    }

    #[test]
    fn ids_sorted_by_position() {
        let mut set = SelectionSet::new();
        set.select_multiple(&[ordered("c", 12), ordered("a", 3), ordered("b", 7)]);
        assert_eq!(set.ids_in_order(), ["a", "b", "c"]);

        set.deselect_multiple(&[ordered("a", 3), ordered("c", 12)]);
        assert_eq!(set.ids_in_order(), ["b"]);
    }
}
