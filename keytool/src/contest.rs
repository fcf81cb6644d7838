/// Keeps up to `capacity` distinct entries with the highest scores,
/// ordered from best to worst.
pub struct Contest<T> {
    capacity: usize,
    winners: Vec<(usize, T)>,
}

impl<T> Contest<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            winners: Vec::with_capacity(capacity),
        }
    }

    /// Inserts `value` unless an entry that is `equal` to it already has at
    /// least the same score, or the contest is full of better entries.
    pub fn insert_unique(&mut self, score: usize, value: T, equal: impl Fn(&T, &T) -> bool) {
        if let Some(i) = self.winners.iter().position(|(_, w)| equal(w, &value)) {
            if self.winners[i].0 >= score {
                return;
            }
            self.winners.remove(i);
        }

        // Ties keep the earlier entry ahead.
        let at = self
            .winners
            .iter()
            .position(|(other, _)| score > *other)
            .unwrap_or_else(|| self.winners.len());
        if at >= self.capacity {
            return;
        }
        self.winners.insert(at, (score, value));
        self.winners.truncate(self.capacity);
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.winners.iter().map(|(_, item)| item)
    }

    pub fn take(self) -> Vec<T> {
        self.winners.into_iter().map(|(_, item)| item).collect()
    }
}
