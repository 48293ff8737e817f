use std::iter::FusedIterator;

/// Trait for fieldless enums that represent a contiguous sequence.
pub trait Enum: Copy + Ord + 'static {
    /// All variants, in order.
    const VARIANTS: &'static [Self];

    /// This variant's position in the sequence.
    fn index(&self) -> usize;

    /// The variant at a position in the sequence, or `None` if out of range.
    #[inline(always)]
    fn from_index(i: usize) -> Option<Self> {
        Self::VARIANTS.get(i).copied()
    }

    /// An iterator over all variants.
    #[inline(always)]
    fn iter() -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator + FusedIterator {
        Self::VARIANTS.iter().copied()
    }
}
