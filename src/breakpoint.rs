use num_traits::Float;
use core::cmp::Ordering;
use alloc::collections::BinaryHeap;
use alloc::vec::Vec;
use alloc::vec;

//

/// Breakpoint \\(l_j / a_j\\) or \\(u_j / a_j\\) of a single variable \\(j\\).
pub fn breakpoints<F: Float>(a: &[F], bound: &[F]) -> Vec<F>
{
    a.iter().zip(bound).map(|(aj, bj)| *bj / *aj).collect()
}

// popped smallest value first, then smaller index
#[derive(Debug, Clone, Copy)]
struct MinEntry<F>(F, usize);

// popped largest value first, then smaller index
#[derive(Debug, Clone, Copy)]
struct MaxEntry<F>(F, usize);

impl<F: Float> Ord for MinEntry<F>
{
    fn cmp(&self, other: &Self) -> Ordering
    {
        other.0.partial_cmp(&self.0).unwrap_or(Ordering::Equal)
            .then_with(|| other.1.cmp(&self.1))
    }
}

impl<F: Float> Ord for MaxEntry<F>
{
    fn cmp(&self, other: &Self) -> Ordering
    {
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
            .then_with(|| other.1.cmp(&self.1))
    }
}

impl<F: Float> PartialOrd for MinEntry<F>
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {Some(self.cmp(other))}
}

impl<F: Float> PartialOrd for MaxEntry<F>
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {Some(self.cmp(other))}
}

impl<F: Float> PartialEq for MinEntry<F>
{
    fn eq(&self, other: &Self) -> bool {self.cmp(other) == Ordering::Equal}
}

impl<F: Float> PartialEq for MaxEntry<F>
{
    fn eq(&self, other: &Self) -> bool {self.cmp(other) == Ordering::Equal}
}

impl<F: Float> Eq for MinEntry<F> {}
impl<F: Float> Eq for MaxEntry<F> {}

//

/// Min-heap and max-heap pair over the same set of breakpoints.
///
/// A breakpoint is keyed by its variable index and removed lazily:
/// removing it through one heap marks the index,
/// and the stale entry in the other heap is skipped when it surfaces.
/// Each index can be pushed at most once.
#[derive(Debug, Clone)]
pub struct BreakpointHeap<F: Float>
{
    min: BinaryHeap<MinEntry<F>>,
    max: BinaryHeap<MaxEntry<F>>,
    removed: Vec<bool>,
    num: usize,
}

impl<F: Float> BreakpointHeap<F>
{
    /// Creates an empty instance for indices `0..n`.
    ///
    /// Returns [`BreakpointHeap`] instance.
    pub fn new(n: usize) -> Self
    {
        BreakpointHeap {
            min: BinaryHeap::new(),
            max: BinaryHeap::new(),
            removed: vec![false; n],
            num: 0,
        }
    }

    /// Number of live breakpoints.
    pub fn len(&self) -> usize
    {
        self.num
    }

    pub fn is_empty(&self) -> bool
    {
        self.num == 0
    }

    /// Inserts breakpoint `val` of variable `idx`.
    pub fn push(&mut self, val: F, idx: usize)
    {
        assert!(!self.removed[idx]);

        self.min.push(MinEntry(val, idx));
        self.max.push(MaxEntry(val, idx));
        self.num += 1;
    }

    /// Smallest live breakpoint as `(value, index)`.
    pub fn peek_min(&mut self) -> Option<(F, usize)>
    {
        if self.num == 0 {
            return None;
        }

        while let Some(&MinEntry(val, idx)) = self.min.peek() {
            if self.removed[idx] {
                self.min.pop();
            }
            else {
                return Some((val, idx));
            }
        }
        None
    }

    /// Largest live breakpoint as `(value, index)`.
    pub fn peek_max(&mut self) -> Option<(F, usize)>
    {
        if self.num == 0 {
            return None;
        }

        while let Some(&MaxEntry(val, idx)) = self.max.peek() {
            if self.removed[idx] {
                self.max.pop();
            }
            else {
                return Some((val, idx));
            }
        }
        None
    }

    /// Removes the smallest live breakpoint.
    pub fn remove_min(&mut self) -> Option<(F, usize)>
    {
        let top = self.peek_min()?;
        self.min.pop();
        self.removed[top.1] = true;
        self.num -= 1;
        Some(top)
    }

    /// Removes the largest live breakpoint.
    pub fn remove_max(&mut self) -> Option<(F, usize)>
    {
        let top = self.peek_max()?;
        self.max.pop();
        self.removed[top.1] = true;
        self.num -= 1;
        Some(top)
    }
}

//
