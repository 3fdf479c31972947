use std::fmt;
use std::num::NonZero;

// Narrow slots in tests so the capacity edge is reachable.
#[cfg(test)]
type Slot = u16;
#[cfg(not(test))]
type Slot = u32;

/// A node's position in its tree's [`Arena`](super::Arena).
///
/// The slot number is kept shifted up by one, which leaves zero free as the niche for
/// `None`: a missing parent or child link is the same width as a present one.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<Slot>);

impl Handle {
    /// How many slots an arena can address.
    pub(crate) const CAPACITY: usize = Slot::MAX as usize;

    /// The handle for `slot`, or `None` once `slot` is past [`Handle::CAPACITY`].
    pub(crate) fn for_slot(slot: usize) -> Option<Self> {
        let shifted = Slot::try_from(slot.checked_add(1)?).ok()?;
        NonZero::new(shifted).map(Self)
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.slot())
    }
}
