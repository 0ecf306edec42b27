//! Enumerable view over decoded records
//!
//! A `Query` owns a snapshot of the store's records and filters them in
//! memory. There is no planning; every predicate is a linear pass.

/// Iterator over a snapshot of decoded records.
#[derive(Debug, Clone)]
pub struct Query<T> {
    records: std::vec::IntoIter<T>,
}

impl<T> Query<T> {
    pub(crate) fn new(records: Vec<T>) -> Self {
        Self {
            records: records.into_iter(),
        }
    }

    /// Keeps only the records matching `predicate`.
    pub fn matching<P>(self, mut predicate: P) -> Query<T>
    where
        P: FnMut(&T) -> bool,
    {
        Query::new(self.records.filter(|r| predicate(r)).collect())
    }

    /// First record matching `predicate`.
    pub fn first_where<P>(mut self, mut predicate: P) -> Option<T>
    where
        P: FnMut(&T) -> bool,
    {
        self.records.find(|r| predicate(r))
    }

    pub fn into_vec(self) -> Vec<T> {
        self.records.collect()
    }
}

impl<T> Iterator for Query<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.records.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

impl<T> DoubleEndedIterator for Query<T> {
    fn next_back(&mut self) -> Option<T> {
        self.records.next_back()
    }
}

impl<T> ExactSizeIterator for Query<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_and_len() {
        let query = Query::new(vec![1, 2, 3, 4, 5]).matching(|n| n % 2 == 1);
        assert_eq!(query.len(), 3);
        assert_eq!(query.into_vec(), vec![1, 3, 5]);
    }

    #[test]
    fn test_first_where() {
        let query = Query::new(vec!["a", "bb", "cc"]);
        assert_eq!(query.first_where(|s| s.len() == 2), Some("bb"));
    }

    #[test]
    fn test_iterator_adapters() {
        let query = Query::new(vec![1, 2, 3]);
        assert_eq!(query.rev().map(|n| n * 10).collect::<Vec<_>>(), vec![30, 20, 10]);
    }
}
