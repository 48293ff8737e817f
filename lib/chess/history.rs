/// A cursor-addressed sequence of applied entries that supports undo and redo.
///
/// Entries before the cursor are applied, entries at or after it form the redo branch.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct History<T> {
    entries: Vec<T>,
    cursor: usize,
}

impl<T> Default for History<T> {
    #[inline(always)]
    fn default() -> Self {
        History {
            entries: Vec::new(),
            cursor: 0,
        }
    }
}

impl<T> History<T> {
    /// Constructs an empty history.
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of applied entries.
    #[inline(always)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The number of entries, applied or not.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries at all.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends an applied entry, discarding the redo branch.
    pub fn push(&mut self, entry: T) {
        self.entries.truncate(self.cursor);
        self.entries.push(entry);
        self.cursor += 1;
    }

    /// Steps back and returns the entry to undo, if any.
    pub fn back(&mut self) -> Option<&T> {
        self.cursor = self.cursor.checked_sub(1)?;
        self.entries.get(self.cursor)
    }

    /// Steps forward and returns the entry to redo, if any.
    pub fn forward(&mut self) -> Option<&T> {
        let entry = self.entries.get(self.cursor)?;
        self.cursor += 1;
        Some(entry)
    }

    /// The most recently applied entry, if any.
    #[inline(always)]
    pub fn top(&self) -> Option<&T> {
        self.entries[..self.cursor].last()
    }

    /// An iterator over the applied entries, oldest first.
    #[inline(always)]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.entries[..self.cursor].iter()
    }
}
