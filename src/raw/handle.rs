use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Address of a node slot in the [`Arena`](super::arena::Arena).
///
/// Slot `i` is stored as `i + 1`, so an absent child link (`Option<Handle>`) takes no more room
/// than a present one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    /// Number of distinct slots a handle can address.
    pub(crate) const CAPACITY: usize = RawHandle::MAX as usize;

    /// Addresses `slot`, or `None` if it lies beyond [`Handle::CAPACITY`].
    #[inline]
    pub(crate) const fn for_slot(slot: usize) -> Option<Self> {
        if slot >= Self::CAPACITY {
            return None;
        }
        #[allow(clippy::cast_possible_truncation)]
        let stored = (slot + 1) as RawHandle;
        match NonZero::new(stored) {
            Some(stored) => Some(Self(stored)),
            None => None,
        }
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self.0.get() as usize - 1
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    // Child links are as small as the index they wrap.
    assert_eq_size!(Handle, Option<Handle>);
    assert_eq_size!(Handle, RawHandle);

    #[test]
    fn addressable_range() {
        assert_eq!(Handle::for_slot(0).map(Handle::slot), Some(0));
        assert_eq!(Handle::for_slot(Handle::CAPACITY - 1).map(Handle::slot), Some(Handle::CAPACITY - 1));
        assert_eq!(Handle::for_slot(Handle::CAPACITY), None);
        assert_eq!(Handle::for_slot(usize::MAX), None);
    }

    proptest! {
        #[test]
        fn slot_survives_handle(slot in 0..Handle::CAPACITY) {
            prop_assert_eq!(Handle::for_slot(slot).map(Handle::slot), Some(slot));
        }
    }
}
