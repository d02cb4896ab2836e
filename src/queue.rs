//! Binary min-heap keyed by an explicit cost extractor.
//!
//! The search layers keep their nodes in a `visited` map and push lightweight
//! entries here, so the heap only needs the cost, not full node ordering.
//! Equal-cost entries pop in unspecified order.

use serde::{Deserialize, Serialize};

/// Cost extraction for heap entries. Costs must never be NaN.
pub trait Prioritized {
    type Cost: PartialOrd + Copy;

    fn cost(&self) -> Self::Cost;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriorityQueue<T> {
    heap: Vec<T>,
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        PriorityQueue { heap: Vec::new() }
    }
}

impl<T: Prioritized> PriorityQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn peek(&self) -> Option<&T> {
        self.heap.first()
    }

    pub fn push(&mut self, item: T) {
        self.heap.push(item);
        self.sift_up(self.heap.len() - 1);
    }

    /// Removes and returns the minimum-cost entry.
    pub fn pop(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let min = self.heap.pop();
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        min
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.heap[idx].cost() < self.heap[parent].cost() {
                self.heap.swap(idx, parent);
                idx = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * idx + 1;
            let right = left + 1;
            let mut smallest = idx;
            if left < len && self.heap[left].cost() < self.heap[smallest].cost() {
                smallest = left;
            }
            if right < len && self.heap[right].cost() < self.heap[smallest].cost() {
                smallest = right;
            }
            if smallest == idx {
                return;
            }
            self.heap.swap(idx, smallest);
            idx = smallest;
        }
    }
}
