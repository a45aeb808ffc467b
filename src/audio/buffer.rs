/// Ordered, append-only collection of raw PCM fragments for one turn
///
/// Single writer: only the turn loop appends, so no interior locking.
#[derive(Debug, Default, Clone)]
pub struct FragmentBuffer {
    chunks: Vec<Vec<u8>>,
    total_len: usize,
}

impl FragmentBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment in arrival order
    pub fn append(&mut self, bytes: Vec<u8>) {
        self.total_len += bytes.len();
        self.chunks.push(bytes);
    }

    /// Sum of all fragment lengths
    pub fn total_len(&self) -> usize {
        self.total_len
    }

    /// Number of fragments received
    pub fn fragment_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// All fragments, oldest first
    pub fn snapshot(&self) -> &[Vec<u8>] {
        &self.chunks
    }

    /// Drop all fragments (start of a new turn)
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.total_len = 0;
    }
}
