/// Locally assigned shape identifier.
pub type ShapeId = u64;

/// Monotonic source of [`ShapeId`]s; identifiers are never handed out twice,
/// even after the shape that used one is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdCounter {
    next: ShapeId,
}

impl Default for IdCounter {
    fn default() -> Self {
        Self { next: Self::FIRST_ID }
    }
}

impl IdCounter {
    pub const FIRST_ID: ShapeId = 1;
    /// Largest identifier accepted from the store. Anything above this leaves
    /// no room to keep counting.
    pub const MAX_ID: ShapeId = (1 << 53) - 1;

    pub fn starting_at(next: ShapeId) -> Self {
        Self {
            next: next.max(Self::FIRST_ID),
        }
    }

    /// Parse the stored string form of the counter.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim()
            .parse::<ShapeId>()
            .ok()
            .filter(|next| *next <= Self::MAX_ID)
            .map(Self::starting_at)
    }

    /// String form written to the store.
    pub fn encode(&self) -> String {
        self.next.to_string()
    }

    /// The identifier the next call to [`IdCounter::next_id`] returns.
    pub fn peek(&self) -> ShapeId {
        self.next
    }

    pub fn next_id(&mut self) -> ShapeId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Make sure `id` can never be handed out again.
    pub fn ensure_above(&mut self, id: ShapeId) {
        self.next = self.next.max(id.saturating_add(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_strictly_increase() {
        let mut ids = IdCounter::default();
        let issued: Vec<_> = (0..5).map(|_| ids.next_id()).collect();
        assert_eq!(issued, vec![1, 2, 3, 4, 5]);
        assert_eq!(ids.peek(), 6);
    }

    #[test]
    fn test_parse_and_encode() {
        let ids = IdCounter::parse(" 42 ").unwrap();
        assert_eq!(ids.peek(), 42);
        assert_eq!(ids.encode(), "42");
        assert!(IdCounter::parse("forty-two").is_none());
        assert_eq!(IdCounter::parse("0").unwrap().peek(), 1);
    }

    #[test]
    fn test_ensure_above_never_lowers() {
        let mut ids = IdCounter::starting_at(10);
        ids.ensure_above(3);
        assert_eq!(ids.peek(), 10);
        ids.ensure_above(12);
        assert_eq!(ids.peek(), 13);
    }

    #[test]
    fn test_parse_rejects_counter_at_the_limit() {
        assert!(IdCounter::parse(&u64::MAX.to_string()).is_none());
        assert!(IdCounter::parse(&(IdCounter::MAX_ID + 1).to_string()).is_none());

        let mut ids = IdCounter::parse(&IdCounter::MAX_ID.to_string()).unwrap();
        assert_eq!(ids.next_id(), IdCounter::MAX_ID);
        assert_eq!(ids.next_id(), IdCounter::MAX_ID + 1);
    }
}
