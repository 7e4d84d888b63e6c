/// Binary min-heap keyed by an `f64` priority.
///
/// Items with equal priority come out in an order fixed by the heap layout, which is
/// deterministic for a given push/pop sequence but not FIFO.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    data: Vec<(T, f64)>,
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        MinHeap { data: Vec::new() }
    }
}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: T, priority: f64) {
        self.data.push((item, priority));
        self.sift_up(self.data.len() - 1);
    }

    /// Removes and returns the entry with the lowest priority.
    pub fn pop(&mut self) -> Option<(T, f64)> {
        if self.data.is_empty() {
            return None;
        }
        let last = self.data.len() - 1;
        self.data.swap(0, last);
        let top = self.data.pop();
        if !self.data.is_empty() {
            self.sift_down(0);
        }
        top
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.data[parent].1 <= self.data[i].1 {
                break;
            }
            self.data.swap(parent, i);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.data.len();
        loop {
            let mut smallest = i;
            let left = 2 * i + 1;
            let right = left + 1;
            if left < n && self.data[left].1 < self.data[smallest].1 {
                smallest = left;
            }
            if right < n && self.data[right].1 < self.data[smallest].1 {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.data.swap(i, smallest);
            i = smallest;
        }
    }
}
