use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Ranking key of a candidate: larger size wins, on equal size the earlier sequence number wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Rank {
    size: u64,
    seq: Reverse<usize>,
}

/// Bounded selection of the `capacity` largest items seen so far.
///
/// Items are identified by their encounter sequence number, so the caller keeps
/// ownership of the records themselves. Internally a min-heap: the root is the
/// weakest member and the one evicted when a stronger candidate arrives.
#[derive(Debug)]
pub struct TopN {
    heap: BinaryHeap<Reverse<Rank>>,
    capacity: usize,
}

impl TopN {
    pub fn new(capacity: usize) -> Self {
        Self { heap: BinaryHeap::with_capacity(capacity + 1), capacity }
    }

    /// Offers the item with encounter index `seq`. Returns whether it was admitted.
    pub fn offer(&mut self, seq: usize, size: u64) -> bool {
        if self.capacity == 0 {
            return false;
        }
        let rank = Rank { size, seq: Reverse(seq) };
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(rank));
            return true;
        }
        let admit = self.heap.peek().is_some_and(|Reverse(min)| rank > *min);
        if admit {
            self.heap.pop();
            self.heap.push(Reverse(rank));
        }
        admit
    }

    /// Encounter indices ordered by size descending, ties by encounter order.
    pub fn into_sorted_indices(self) -> Vec<usize> {
        let mut ranks: Vec<Rank> = self.heap.into_iter().map(|Reverse(r)| r).collect();
        ranks.sort_unstable_by(|a, b| b.cmp(a));
        ranks.into_iter().map(|r| r.seq.0).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_largest() {
        let mut top = TopN::new(3);
        for (seq, size) in [5u64, 2, 8, 10, 1].into_iter().enumerate() {
            top.offer(seq, size);
        }
        assert_eq!(top.heap.len(), 3);
        // sizes 10, 8, 5
        assert_eq!(top.into_sorted_indices(), vec![3, 2, 0]);
    }

    #[test]
    fn ties_favor_earlier_items() {
        let mut top = TopN::new(2);
        assert!(top.offer(0, 7));
        assert!(top.offer(1, 7));
        assert!(!top.offer(2, 7));
        assert_eq!(top.into_sorted_indices(), vec![0, 1]);
    }

    #[test]
    fn tie_at_boundary_keeps_first_seen() {
        let mut top = TopN::new(2);
        top.offer(0, 3);
        top.offer(1, 9);
        top.offer(2, 3);
        top.offer(3, 4);
        assert_eq!(top.into_sorted_indices(), vec![1, 3]);
    }

    #[test]
    fn zero_capacity_admits_nothing() {
        let mut top = TopN::new(0);
        assert!(!top.offer(0, 100));
        assert!(top.heap.is_empty());
    }

    #[test]
    fn fewer_items_than_capacity() {
        let mut top = TopN::new(10);
        top.offer(0, 1);
        top.offer(1, 3);
        assert_eq!(top.into_sorted_indices(), vec![1, 0]);
    }
}
