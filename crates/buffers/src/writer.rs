//! Auto-growing binary writer.

/// A binary writer backed by a growable buffer.
///
/// The writer is meant to be reused: [`Writer::reset`] rewinds the cursor
/// without releasing the allocation, and [`Writer::flush`] copies out the
/// bytes written since the previous flush.
///
/// # Example
///
/// ```
/// use polycodec_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(0xcb);
/// writer.f64(1.5);
/// assert_eq!(writer.flush().len(), 9);
///
/// writer.reset();
/// writer.u16(0xbeef);
/// assert_eq!(writer.flush(), vec![0xbe, 0xef]);
/// ```
pub struct Writer {
    /// The underlying buffer. Bytes past `x` are scratch space.
    pub uint8: Vec<u8>,
    /// Start of the current (not yet flushed) frame.
    pub x0: usize,
    /// Current cursor position.
    pub x: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Creates a writer with the default allocation size.
    pub fn new() -> Self {
        Self::with_alloc_size(64 * 1024)
    }

    /// Creates a writer with a custom initial allocation size.
    pub fn with_alloc_size(alloc_size: usize) -> Self {
        Self {
            uint8: vec![0; alloc_size],
            x0: 0,
            x: 0,
        }
    }

    /// Rewinds the writer to an empty frame, keeping the allocation.
    pub fn reset(&mut self) {
        self.x0 = 0;
        self.x = 0;
    }

    /// Makes sure at least `capacity` bytes can be written past the cursor.
    #[inline]
    pub fn ensure_capacity(&mut self, capacity: usize) {
        let required = self.x + capacity;
        if required > self.uint8.len() {
            let grown = required.max(self.uint8.len() * 2);
            self.uint8.resize(grown, 0);
        }
    }

    /// Returns the bytes written since the last flush and starts a new frame.
    pub fn flush(&mut self) -> Vec<u8> {
        let out = self.uint8[self.x0..self.x].to_vec();
        self.x0 = self.x;
        out
    }

    /// Number of bytes in the current frame.
    pub fn len(&self) -> usize {
        self.x - self.x0
    }

    /// Returns `true` if nothing was written since the last flush.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn put(&mut self, bytes: &[u8]) {
        self.ensure_capacity(bytes.len());
        let x = self.x;
        self.uint8[x..x + bytes.len()].copy_from_slice(bytes);
        self.x = x + bytes.len();
    }

    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.put(&[val]);
    }

    #[inline]
    pub fn u16(&mut self, val: u16) {
        self.put(&val.to_be_bytes());
    }

    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.put(&val.to_be_bytes());
    }

    #[inline]
    pub fn u64(&mut self, val: u64) {
        self.put(&val.to_be_bytes());
    }

    #[inline]
    pub fn i8(&mut self, val: i8) {
        self.put(&val.to_be_bytes());
    }

    #[inline]
    pub fn i16(&mut self, val: i16) {
        self.put(&val.to_be_bytes());
    }

    #[inline]
    pub fn i32(&mut self, val: i32) {
        self.put(&val.to_be_bytes());
    }

    #[inline]
    pub fn i64(&mut self, val: i64) {
        self.put(&val.to_be_bytes());
    }

    #[inline]
    pub fn f64(&mut self, val: f64) {
        self.put(&val.to_be_bytes());
    }

    /// Writes a one-byte prefix followed by a big-endian `u16`.
    #[inline]
    pub fn u8u16(&mut self, prefix: u8, val: u16) {
        self.ensure_capacity(3);
        self.u8(prefix);
        self.u16(val);
    }

    /// Writes a one-byte prefix followed by a big-endian `u32`.
    #[inline]
    pub fn u8u32(&mut self, prefix: u8, val: u32) {
        self.ensure_capacity(5);
        self.u8(prefix);
        self.u32(val);
    }

    /// Writes a one-byte prefix followed by a big-endian `u64`.
    #[inline]
    pub fn u8u64(&mut self, prefix: u8, val: u64) {
        self.ensure_capacity(9);
        self.u8(prefix);
        self.u64(val);
    }

    /// Writes a one-byte prefix followed by a big-endian `f64`.
    #[inline]
    pub fn u8f64(&mut self, prefix: u8, val: f64) {
        self.ensure_capacity(9);
        self.u8(prefix);
        self.f64(val);
    }

    /// Writes raw bytes.
    pub fn buf(&mut self, bytes: &[u8]) {
        self.put(bytes);
    }

    /// Writes the UTF-8 bytes of `s` with no length prefix.
    pub fn utf8(&mut self, s: &str) {
        self.put(s.as_bytes());
    }
}
