use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Routes documents to a fixed number of workers by hashing their id.
///
/// Documents sharing an id always land on the same worker, which applies them in input
/// order; the last one wins.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPartitioner {
    num_workers: usize,
}

impl WorkerPartitioner {
    pub fn new(num_workers: usize) -> Self {
        Self {
            num_workers: num_workers.max(1),
        }
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    pub fn worker_for(&self, document_id: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        document_id.hash(&mut hasher);
        (hasher.finish() % self.num_workers as u64) as usize
    }
}
