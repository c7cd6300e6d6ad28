/// A scalar key with extremal sentinels and checked stepping.
///
/// [`DualAvlTree::minimum`](crate::DualAvlTree::minimum) and
/// [`DualAvlTree::maximum`](crate::DualAvlTree::maximum) answer with [`Key::MIN`] and
/// [`Key::MAX`] on an empty tree, and the range operations walk arithmetic progressions with
/// [`Key::checked_add`]. Implemented for every primitive integer type.
pub trait Key: Copy + Ord {
    /// The most negative representable key.
    const MIN: Self;
    /// The most positive representable key.
    const MAX: Self;
    /// The additive identity; a range step must be strictly greater.
    const ZERO: Self;

    /// `self + step`, or `None` if the result is not representable.
    fn checked_add(self, step: Self) -> Option<Self>;
}

macro_rules! impl_key {
    ($($t:ty),* $(,)?) => {
        $(
            impl Key for $t {
                const MIN: Self = <$t>::MIN;
                const MAX: Self = <$t>::MAX;
                const ZERO: Self = 0;

                #[inline]
                fn checked_add(self, step: Self) -> Option<Self> {
                    <$t>::checked_add(self, step)
                }
            }
        )*
    };
}

impl_key!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// The keys `start, start + step, …` that do not exceed `end`.
///
/// A non-positive `step` yields nothing, and the walk stops rather than wrap when the next key
/// would overflow.
#[derive(Clone, Debug)]
pub(crate) struct Progression<K> {
    next: Option<K>,
    end: K,
    step: K,
}

impl<K: Key> Progression<K> {
    pub(crate) fn new(start: K, end: K, step: K) -> Self {
        Self {
            next: (step > K::ZERO).then_some(start),
            end,
            step,
        }
    }
}

impl<K: Key> Iterator for Progression<K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let key = self.next.filter(|key| *key <= self.end)?;
        self.next = key.checked_add(self.step);
        Some(key)
    }
}

impl<K: Key> core::iter::FusedIterator for Progression<K> {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    fn collect<K: Key>(start: K, end: K, step: K) -> Vec<K> {
        Progression::new(start, end, step).collect()
    }

    #[test]
    fn end_is_inclusive() {
        assert_eq!(collect(0, 10, 2), [0, 2, 4, 6, 8, 10]);
        assert_eq!(collect(0, 9, 3), [0, 3, 6, 9]);
        assert_eq!(collect(1, 10, 4), [1, 5, 9]);
    }

    #[test]
    fn single_key_when_start_equals_end() {
        assert_eq!(collect(5, 5, 100), [5]);
    }

    #[test]
    fn start_past_end_is_empty() {
        assert!(collect(6, 5, 1).is_empty());
    }

    #[test]
    fn non_positive_step_is_empty() {
        assert!(collect(0, 10, 0).is_empty());
        assert!(collect(0, 10, -1).is_empty());
        assert!(collect(0u8, 10, 0).is_empty());
    }

    #[test]
    fn stops_before_overflow() {
        assert_eq!(collect(i8::MAX - 4, i8::MAX, 3), [123, 126]);
        assert_eq!(collect(250u8, u8::MAX, 5), [250, 255]);
        assert_eq!(collect(i32::MAX, i32::MAX, 1), [i32::MAX]);
    }

    #[test]
    fn sentinels_match_primitive_bounds() {
        assert_eq!(<i32 as Key>::MIN, i32::MIN);
        assert_eq!(<i32 as Key>::MAX, i32::MAX);
        assert_eq!(<u64 as Key>::MIN, 0);
        assert_eq!(<i128 as Key>::ZERO, 0);
    }

    proptest! {
        #[test]
        fn progression_matches_step_by(start in -1_000i64..1_000, len in 0i64..2_000, step in 1i64..50) {
            let end = start + len;
            let expected: Vec<i64> = (start..=end).step_by(usize::try_from(step).unwrap()).collect();
            prop_assert_eq!(collect(start, end, step), expected);
        }
    }
}
