//! Receive buffer
//!
//! Holds the bytes fetched by the last read transaction and hands them out
//! through a read cursor.

use heapless::Vec;

/// Fixed-capacity receive buffer with a read cursor
///
/// Invariant: `cursor <= data.len() <= N`.
#[derive(Debug, Clone)]
pub struct RxBuffer<const N: usize> {
    data: Vec<u8, N>,
    cursor: usize,
}

impl<const N: usize> Default for RxBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RxBuffer<N> {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            cursor: 0,
        }
    }

    /// Maximum number of bytes one read transaction can deliver
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Replace the contents and rewind the cursor
    ///
    /// Bytes beyond the capacity are dropped.
    pub fn fill(&mut self, bytes: &[u8]) {
        let len = bytes.len().min(N);
        self.data.clear();
        // Cannot fail, the slice is clamped to the capacity
        let _ = self.data.extend_from_slice(&bytes[..len]);
        self.cursor = 0;
    }

    /// Drop all contents
    pub fn clear(&mut self) {
        self.data.clear();
        self.cursor = 0;
    }

    /// Number of valid bytes from the last fill
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the last fill delivered no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left to read
    pub fn available(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Take the byte at the cursor
    pub fn read(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.cursor += 1;
        Some(byte)
    }

    /// Look at the byte at the cursor without consuming it
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.cursor).copied()
    }

    /// Copy as many unread bytes as fit into `buf`
    ///
    /// Returns the number of bytes copied.
    pub fn read_into(&mut self, buf: &mut [u8]) -> usize {
        let unread = &self.data[self.cursor..];
        let n = unread.len().min(buf.len());
        buf[..n].copy_from_slice(&unread[..n]);
        self.cursor += n;
        n
    }
}
