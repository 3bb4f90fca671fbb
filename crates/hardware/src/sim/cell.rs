//! Double-buffered state cell.
//!
//! Every piece of cross-unit state lives in a [`Staged`] cell. During the
//! compute phase other units see only the committed slot; the owner writes
//! the pending slot. `commit` copies pending into committed for the whole
//! machine at the clock edge, so the order in which units compute within a
//! cycle cannot change the outcome.

/// A committed value plus the value staged for the next cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Staged<T> {
    current: T,
    next: T,
}

impl<T: Clone> Staged<T> {
    /// Creates a cell whose committed and pending slots both hold `value`.
    pub fn new(value: T) -> Self {
        Self {
            current: value.clone(),
            next: value,
        }
    }

    /// Committed value, as seen by every unit this cycle.
    #[inline]
    pub const fn read(&self) -> &T {
        &self.current
    }

    /// Value staged for the next cycle. Only the owner should look at this.
    #[inline]
    pub const fn pending(&self) -> &T {
        &self.next
    }

    /// Mutable access to the staged value.
    #[inline]
    pub const fn pending_mut(&mut self) -> &mut T {
        &mut self.next
    }

    /// Replaces the staged value.
    #[inline]
    pub fn stage(&mut self, value: T) {
        self.next = value;
    }

    /// Copies the staged value into the committed slot (clock edge).
    ///
    /// The staged slot keeps its value, so state persists until restaged.
    #[inline]
    pub fn commit(&mut self) {
        self.current.clone_from(&self.next);
    }

    /// Overwrites both slots immediately, bypassing the clock edge.
    pub fn force(&mut self, value: T) {
        self.current.clone_from(&value);
        self.next = value;
    }
}
