//! Port allocation for launched processes.

/// Default first port handed out when neither `MONGO_PORT` nor a CLI override is given.
pub const DEFAULT_START_PORT: u16 = 27017;

/// Hands out strictly increasing port numbers, one per process.
///
/// The allocator never repeats a port within its lifetime; [`PortAllocator::reset`]
/// reseeds it explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortAllocator {
    next: Option<u16>,
}

impl PortAllocator {
    /// Create an allocator whose first port is `start`.
    #[must_use]
    pub const fn new(start: u16) -> Self {
        Self { next: Some(start) }
    }

    /// Reseed the allocator so the next port handed out is `start`.
    pub fn reset(&mut self, start: u16) {
        self.next = Some(start);
    }

    /// Peek at the port the next call to [`PortAllocator::next_port`] returns.
    #[must_use]
    pub const fn peek(&self) -> Option<u16> {
        self.next
    }

    /// Take the next free port.
    ///
    /// # Panics
    ///
    /// Panics once the 16-bit port range has been exhausted.
    pub fn next_port(&mut self) -> u16 {
        let port = self.next.expect("port range exhausted");
        self.next = port.checked_add(1);
        port
    }
}

impl Default for PortAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_START_PORT)
    }
}
