/// Identifies a primitive registered in a scene's primitive collection.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrimitiveId(pub u64);

impl PrimitiveId {
    pub fn index(&self) -> u64 {
        self.0
    }
}

/// Monotonic id source. Ids are never reused within one allocator.
#[derive(Debug, Default)]
pub struct PrimitiveIdAllocator {
    next: u64,
}

impl PrimitiveIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> PrimitiveId {
        let id = PrimitiveId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}
