//! Emitted - an operation result plus the events it produced

/// Value returned by an operation together with the events it emitted.
///
/// Events are the audit trail consumed by indexers and alerting. A failed
/// operation returns an error instead, so it never emits anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted<T, E> {
    pub value: T,
    pub events: Vec<E>,
}

impl<T, E> Emitted<T, E> {
    pub fn new(value: T, events: Vec<E>) -> Self {
        Self { value, events }
    }

    /// Split into value and events
    pub fn into_parts(self) -> (T, Vec<E>) {
        (self.value, self.events)
    }
}
