//! Linear undo/redo history

/// Committed snapshots plus a cursor
///
/// Entries are never mutated after commit; undo and redo only move the
/// cursor. Committing while the cursor is behind the end discards the redo
/// tail.
#[derive(Clone, Debug, PartialEq)]
pub struct EditHistory<T> {
    entries: Vec<T>,
    index: usize,
}

impl<T: Clone> EditHistory<T> {
    /// Start a history whose only entry is `initial`
    pub fn new(initial: T) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    /// Append a snapshot after the cursor, dropping any redo tail
    pub fn commit(&mut self, entry: T) {
        self.entries.truncate(self.index + 1);
        self.entries.push(entry);
        self.index = self.entries.len() - 1;
        tracing::debug!("History commit: {} entries", self.entries.len());
    }

    /// Step back; returns the new current entry, or `None` at the start
    pub fn undo(&mut self) -> Option<&T> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(&self.entries[self.index])
    }

    /// Step forward; returns the new current entry, or `None` at the end
    pub fn redo(&mut self) -> Option<&T> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.index])
    }

    pub fn current(&self) -> &T {
        &self.entries[self.index]
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_advances() {
        let mut history = EditHistory::new("start");
        history.commit("a");
        assert_eq!(*history.current(), "a");
        assert_eq!(history.index(), 1);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_redo_moves_forward() {
        let mut history = EditHistory::new(0);
        history.commit(1);
        history.commit(2);
        assert_eq!(history.undo(), Some(&1));
        assert_eq!(history.undo(), Some(&0));
        assert_eq!(history.redo(), Some(&1));
        assert_eq!(history.redo(), Some(&2));
        assert_eq!(history.redo(), None);
        assert_eq!(*history.current(), 2);
    }

    #[test]
    fn test_commit_truncates_redo_tail() {
        let mut history = EditHistory::new("init");
        history.commit("A");
        history.commit("B");
        history.undo();
        history.commit("C");
        assert_eq!(history.entries(), ["init", "A", "C"]);
        assert_eq!(history.redo(), None);
        assert_eq!(*history.current(), "C");
    }

    #[test]
    fn test_undo_at_start_is_noop() {
        let mut history = EditHistory::new(());
        assert_eq!(history.undo(), None);
        assert_eq!(history.index(), 0);
        assert_eq!(history.len(), 1);
    }
}
