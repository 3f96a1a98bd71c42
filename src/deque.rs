//! An [`ArrayDeque`] is a double-ended queue that keeps its elements in one contiguous run in the middle of its buffer.
//! Its API follows Python's `collections.deque` (`append`, `appendleft`, `popleft`, `rotate`, `maxlen`, ...),
//! but because there is never any wraparound the whole deque is always available as a plain slice.
//!
//! A grown buffer always has its elements centered, so growth pays for future pushes on *both* ends.
//!
//! Growth is not a plain "double whenever an edge is reached" policy. A push that reaches an edge of a
//! buffer that is less than half full re-centers the elements in place instead of doubling, and only a
//! buffer that is at least half full is doubled. Without this a FIFO queue or a bounded sliding window
//! drifts toward one edge and keeps doubling. The observable element order is the same either way;
//! only [`capacity`](ArrayDeque::capacity) and the free space on each side differ.

use crate::error::{DequeError, DequeResult, TryReserveError, TryReserveErrorKind};
use crate::settings::{DropBehavior, FrontToBack, INITIAL_CAPACITY};
use std::alloc::Layout;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

/// A double-ended queue backed by a single contiguous buffer, with an optional maximum length.
///
/// # Examples
/// ```
/// use arraydeque::ArrayDeque;
/// let mut deque = ArrayDeque::new();
/// deque.append(2);
/// deque.appendleft(1);
/// deque.append(3);
/// assert_eq!(&*deque, &[1, 2, 3]);
/// assert_eq!(deque.popleft(), Ok(1));
/// ```
///
/// # Bounded length
/// A deque built with [`with_maxlen`](ArrayDeque::with_maxlen) never holds more than `maxlen` elements.
/// Pushing onto a full deque drops the element at the opposite end, so an append-only bounded deque
/// is a sliding window over the most recent values.
/// ```
/// use arraydeque::ArrayDeque;
/// let mut window = ArrayDeque::with_maxlen(3);
/// window.extend([1, 2, 3, 4, 5]);
/// assert_eq!(window, [3, 4, 5]);
/// ```
///
/// # Drop Order
/// The default drop order is front-to-back, meaning that elements are dropped in the same order as iteration would happen.
/// This can be changed to back-to-front by using the [`BackToFront`](crate::BackToFront) drop order.
pub struct ArrayDeque<T, DropOrder = FrontToBack>
where
    DropOrder: DropBehavior,
{
    pub(crate) ptr: NonNull<T>,
    pub(crate) cap: usize,
    pub(crate) head: usize,
    pub(crate) tail: usize,
    pub(crate) maxlen: Option<usize>,
    pub(crate) drop_order: DropOrder,
    marker: PhantomData<T>,
}

impl<T: Debug, DropOrder> Debug for ArrayDeque<T, DropOrder>
where
    DropOrder: DropBehavior,
{
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self.as_slice(), f)
    }
}

// debug representation is allowed to not be used elsewhere
#[allow(dead_code)]
#[derive(Debug)]
pub(crate) struct DequeDebug<DropOrder> {
    pub(crate) cap: usize,
    pub(crate) head: usize,
    pub(crate) tail: usize,
    pub(crate) maxlen: Option<usize>,
    pub(crate) drop_order: DropOrder,
}

impl<T, DropOrder> ArrayDeque<T, DropOrder>
where
    DropOrder: DropBehavior,
{
    #[allow(dead_code)]
    pub(crate) fn debug(&self) -> DequeDebug<DropOrder> {
        DequeDebug {
            cap: self.cap,
            head: self.head,
            tail: self.tail,
            maxlen: self.maxlen,
            drop_order: self.drop_order,
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let raw = self.debug();
        assert!(raw.head <= raw.tail, "head past tail: {:?}", raw);
        assert!(raw.tail <= raw.cap, "tail past capacity: {:?}", raw);
        assert_eq!(self.len(), raw.tail - raw.head);
        if let Some(maxlen) = raw.maxlen {
            assert!(self.len() <= maxlen, "length over maxlen: {:?}", raw);
        }
        assert!(raw.cap >= INITIAL_CAPACITY, "capacity below initial: {:?}", raw);
    }
}

unsafe impl<T: Send, DropOrder> Send for ArrayDeque<T, DropOrder> where DropOrder: DropBehavior {}
unsafe impl<T: Sync, DropOrder> Sync for ArrayDeque<T, DropOrder> where DropOrder: DropBehavior {}

impl<T> ArrayDeque<T, FrontToBack> {
    /// Creates a new, empty, unbounded `ArrayDeque` with room for 8 elements, centered in its buffer.
    /// The default is to drop items from front to back.
    ///
    /// # Panics
    /// Diverges through [`std::alloc::handle_alloc_error`] if the initial buffer cannot be allocated.
    ///
    /// # Examples
    /// ```
    /// # use arraydeque::ArrayDeque;
    /// let mut deque = ArrayDeque::new();
    /// deque.append(1);
    /// deque.append(2);
    /// assert_eq!(&*deque, &[1, 2]);
    /// assert_eq!(deque.capacity(), 8);
    /// assert_eq!(deque.maxlen(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty `ArrayDeque` with a specified drop order.
    ///
    /// # Examples
    /// ```
    /// use arraydeque::{ArrayDeque, BackToFront};
    /// let mut deque = ArrayDeque::new_with_drop_order::<BackToFront>();
    /// deque.append(1);
    /// deque.append(2);
    /// assert_eq!(&*deque, &[1, 2]);
    /// ```
    #[inline]
    #[must_use]
    pub fn new_with_drop_order<D>() -> ArrayDeque<T, D>
    where
        D: DropBehavior,
    {
        ArrayDeque::default()
    }

    /// Creates an empty `ArrayDeque` that can hold at least `cap` elements without reallocating.
    /// Capacities below 8 are rounded up to 8.
    ///
    /// # Examples
    /// ```
    /// # use arraydeque::ArrayDeque;
    /// let deque: ArrayDeque<i32> = ArrayDeque::with_capacity(100);
    /// assert!(deque.capacity() >= 100);
    /// assert!(deque.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn with_capacity(cap: usize) -> Self {
        Self::try_with_capacity(cap).unwrap_or_else(|err| err.handle())
    }

    /// Fallible version of [`with_capacity`](ArrayDeque::with_capacity).
    ///
    /// # Examples
    /// ```
    /// # use arraydeque::ArrayDeque;
    /// assert!(ArrayDeque::<u64>::try_with_capacity(usize::MAX).is_err());
    /// ```
    #[inline]
    pub fn try_with_capacity(cap: usize) -> Result<Self, TryReserveError> {
        Self::try_allocate_empty(cap)
    }

    /// Creates an empty deque that never holds more than `maxlen` elements.
    /// A `maxlen` of 0 makes every push a no-op.
    ///
    /// # Examples
    /// ```
    /// # use arraydeque::ArrayDeque;
    /// let mut deque = ArrayDeque::with_maxlen(2);
    /// deque.append('a');
    /// deque.append('b');
    /// deque.append('c');
    /// assert_eq!(deque, ['b', 'c']);
    /// assert_eq!(deque.maxlen(), Some(2));
    /// ```
    #[inline]
    #[must_use]
    pub fn with_maxlen(maxlen: usize) -> Self {
        let mut deque = Self::new();
        deque.maxlen = Some(maxlen);
        deque
    }

    /// Creates an empty bounded deque from a signed length, rejecting negative values
    /// with [`DequeError::InvalidArgument`].
    ///
    /// # Examples
    /// ```
    /// # use arraydeque::{ArrayDeque, DequeError};
    /// let deque = ArrayDeque::<i32>::try_with_maxlen(4).unwrap();
    /// assert_eq!(deque.maxlen(), Some(4));
    /// assert!(matches!(
    ///     ArrayDeque::<i32>::try_with_maxlen(-1),
    ///     Err(DequeError::InvalidArgument { .. })
    /// ));
    /// ```
    pub fn try_with_maxlen(maxlen: isize) -> DequeResult<Self> {
        let maxlen = usize::try_from(maxlen).map_err(|_| DequeError::negative_maxlen(maxlen))?;
        let mut deque = Self::try_with_capacity(INITIAL_CAPACITY)?;
        deque.maxlen = Some(maxlen);
        Ok(deque)
    }

    /// Creates a deque seeded from `iter`, optionally bounded.
    /// When the iterator yields more than `maxlen` elements, the trailing ones are kept.
    ///
    /// # Examples
    /// ```
    /// # use arraydeque::ArrayDeque;
    /// let deque = ArrayDeque::from_iter_bounded(0..10, Some(5));
    /// assert_eq!(deque, [5, 6, 7, 8, 9]);
    /// let deque = ArrayDeque::from_iter_bounded(0..3, None);
    /// assert_eq!(deque, [0, 1, 2]);
    /// ```
    #[must_use]
    pub fn from_iter_bounded<I>(iter: I, maxlen: Option<usize>) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self::try_collect_bounded(iter, maxlen).unwrap_or_else(|err| err.handle())
    }

    /// Fallible, signed version of [`from_iter_bounded`](ArrayDeque::from_iter_bounded).
    /// A negative `maxlen` is rejected before any element is consumed; an allocation failure
    /// part-way through the iterator is returned as [`DequeError::AllocationFailure`].
    pub fn try_from_iter_bounded<I>(iter: I, maxlen: Option<isize>) -> DequeResult<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let maxlen = match maxlen {
            Some(maxlen) => {
                Some(usize::try_from(maxlen).map_err(|_| DequeError::negative_maxlen(maxlen))?)
            }
            None => None,
        };
        Ok(Self::try_collect_bounded(iter, maxlen)?)
    }

    // Shared by the bounded constructors and deserialization.
    pub(crate) fn try_collect_bounded<I>(
        iter: I,
        maxlen: Option<usize>,
    ) -> Result<Self, TryReserveError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut deque = Self::try_with_capacity(INITIAL_CAPACITY)?;
        deque.maxlen = maxlen;
        deque.try_extend(iter)?;
        Ok(deque)
    }
}

impl<T, DropOrder> ArrayDeque<T, DropOrder>
where
    DropOrder: DropBehavior,
{
    // Allocates `cap` slots (at least the initial capacity) with the cursor parked in the middle.
    pub(crate) fn try_allocate_empty(cap: usize) -> Result<Self, TryReserveError> {
        let cap = cap.max(INITIAL_CAPACITY);
        let ptr = Self::allocate(cap)?;
        let head = cap / 2;
        Ok(ArrayDeque {
            ptr,
            cap,
            head,
            tail: head,
            maxlen: None,
            drop_order: Default::default(),
            marker: PhantomData,
        })
    }

    /// Changes the drop order of the `ArrayDeque` to the specified order in-place.
    ///
    /// # Examples
    /// ```
    /// use arraydeque::{ArrayDeque, BackToFront};
    /// let mut deque = ArrayDeque::new();
    /// deque.append(1);
    /// deque.append(2);
    /// let deque = deque.with_drop_order::<BackToFront>();
    /// assert_eq!(&*deque, &[1, 2]);
    /// ```
    #[inline]
    #[must_use = "This ArrayDeque's drop order has been changed. Please make sure to use the new ArrayDeque or drop it explicitly."]
    pub fn with_drop_order<D>(self) -> ArrayDeque<T, D>
    where
        D: DropBehavior,
    {
        let this = std::mem::ManuallyDrop::new(self);
        ArrayDeque {
            ptr: this.ptr,
            cap: this.cap,
            head: this.head,
            tail: this.tail,
            maxlen: this.maxlen,
            drop_order: Default::default(),
            marker: PhantomData,
        }
    }
}

// =============================================================================
// Buffer management
// =============================================================================

// Lets tests make the next growths fail, since the global allocator never does in practice.
#[cfg(test)]
thread_local! {
    static BLOCK_GROWTH: std::cell::Cell<bool> = std::cell::Cell::new(false);
}

#[cfg(test)]
fn growth_blocked() -> bool {
    BLOCK_GROWTH.with(|blocked| blocked.get())
}

#[cfg(not(test))]
#[inline(always)]
fn growth_blocked() -> bool {
    false
}

impl<T, DropOrder> ArrayDeque<T, DropOrder>
where
    DropOrder: DropBehavior,
{
    fn allocate(cap: usize) -> Result<NonNull<T>, TryReserveError> {
        // zero-sized elements never touch the allocator
        if std::mem::size_of::<T>() == 0 {
            return Ok(NonNull::dangling());
        }
        let layout =
            Layout::array::<T>(cap).map_err(|_| TryReserveErrorKind::CapacityOverflow)?;
        let ptr = unsafe { std::alloc::alloc(layout) };
        NonNull::new(ptr as *mut T).ok_or_else(|| TryReserveErrorKind::AllocError { layout }.into())
    }

    /// # Safety
    /// `ptr` must come from `allocate(cap)` and must not be used afterwards.
    unsafe fn deallocate(ptr: NonNull<T>, cap: usize) {
        if std::mem::size_of::<T>() == 0 {
            return;
        }
        if let Ok(layout) = Layout::array::<T>(cap) {
            std::alloc::dealloc(ptr.as_ptr() as *mut u8, layout);
        }
    }

    /// Moves `value` into the vacant slot at physical index `idx`.
    ///
    /// # Safety
    /// `idx < cap` and the slot must not hold a live element.
    #[inline]
    unsafe fn write_slot(&mut self, idx: usize, value: T) {
        std::ptr::write(self.ptr.as_ptr().add(idx), value);
    }

    /// Moves the element out of the slot at physical index `idx`, leaving it vacant.
    ///
    /// # Safety
    /// `idx < cap`, the slot must hold a live element, and the caller must shrink `[head, tail)`
    /// so the slot is no longer counted as live.
    #[inline]
    unsafe fn take_slot(&mut self, idx: usize) -> T {
        std::ptr::read(self.ptr.as_ptr().add(idx))
    }

    // Moves the live run into a fresh buffer of `new_cap` slots, centered.
    // On failure nothing has been touched.
    fn try_resize(&mut self, new_cap: usize) -> Result<(), TryReserveError> {
        let len = self.len();
        debug_assert!(new_cap >= len);
        let new_ptr = Self::allocate(new_cap)?;
        let new_head = (new_cap - len) / 2;
        unsafe {
            std::ptr::copy_nonoverlapping(
                self.ptr.as_ptr().add(self.head),
                new_ptr.as_ptr().add(new_head),
                len,
            );
            Self::deallocate(self.ptr, self.cap);
        }
        self.ptr = new_ptr;
        self.cap = new_cap;
        self.head = new_head;
        self.tail = new_head + len;
        Ok(())
    }

    // Grows the buffer by doubling the capacity.
    #[inline]
    fn try_grow(&mut self) -> Result<(), TryReserveError> {
        if growth_blocked() {
            return Err(TryReserveErrorKind::CapacityOverflow.into());
        }
        let new_cap = self
            .cap
            .checked_mul(2)
            .ok_or(TryReserveErrorKind::CapacityOverflow)?;
        self.try_resize(new_cap)
    }

    // Makes sure `tail < cap`. A buffer that is at most half full is re-centered in place
    // instead of grown, so a queue that drifts to one side does not keep doubling.
    #[inline]
    fn try_make_room_back(&mut self) -> Result<(), TryReserveError> {
        if self.tail < self.cap {
            return Ok(());
        }
        if self.len() < self.cap / 2 {
            self.rebalance();
            Ok(())
        } else {
            self.try_grow()
        }
    }

    // Makes sure `head > 0`.
    #[inline]
    fn try_make_room_front(&mut self) -> Result<(), TryReserveError> {
        if self.head > 0 {
            return Ok(());
        }
        if self.len() < self.cap / 2 {
            self.rebalance();
            Ok(())
        } else {
            self.try_grow()
        }
    }

    #[inline]
    pub(crate) fn take_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        self.tail -= 1;
        unsafe { Some(self.take_slot(self.tail)) }
    }

    #[inline]
    pub(crate) fn take_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let value = unsafe { self.take_slot(self.head) };
        self.head += 1;
        Some(value)
    }

    // Drops every live element in the configured order.
    fn release_all(&mut self) {
        while (if DropOrder::IS_INVERTED {
            self.take_back()
        } else {
            self.take_front()
        })
        .is_some()
        {
            // drop the element
        }
    }

    /// Reserves room for at least `additional` more elements at the back without reallocating.
    ///
    /// # Panics
    /// Panics on capacity overflow, diverges through [`std::alloc::handle_alloc_error`] on allocation failure.
    ///
    /// # Examples
    /// ```
    /// # use arraydeque::ArrayDeque;
    /// let mut deque = ArrayDeque::new();
    /// deque.extend([1, 2]);
    /// deque.reserve_back(10);
    /// assert!(deque.space_back() >= 10);
    /// ```
    #[inline]
    pub fn reserve_back(&mut self, additional: usize) {
        if let Err(err) = self.try_reserve_back(additional) {
            err.handle()
        }
    }

    /// Fallible version of [`reserve_back`](ArrayDeque::reserve_back).
    pub fn try_reserve_back(&mut self, additional: usize) -> Result<(), TryReserveError> {
        while self.space_back() < additional {
            self.try_grow()?;
        }
        Ok(())
    }

    /// Reserves room for at least `additional` more elements at the front without reallocating.
    ///
    /// # Examples
    /// ```
    /// # use arraydeque::ArrayDeque;
    /// let mut deque = ArrayDeque::new();
    /// deque.extend([1, 2]);
    /// deque.reserve_front(10);
    /// assert!(deque.space_front() >= 10);
    /// ```
    #[inline]
    pub fn reserve_front(&mut self, additional: usize) {
        if let Err(err) = self.try_reserve_front(additional) {
            err.handle()
        }
    }

    /// Fallible version of [`reserve_front`](ArrayDeque::reserve_front).
    pub fn try_reserve_front(&mut self, additional: usize) -> Result<(), TryReserveError> {
        while self.space_front() < additional {
            self.try_grow()?;
        }
        Ok(())
    }

    /// Shifts the elements so they are centered in the current buffer, without reallocating.
    /// This can address imbalances in the buffer that may have been caused by repeated pushes or removals on one side.
    ///
    /// # Examples
    /// ```
    /// # use arraydeque::ArrayDeque;
    /// let mut deque = ArrayDeque::with_capacity(16);
    /// deque.extend([1, 2, 3, 4]);
    /// let old_space_back = deque.space_back();
    /// deque.rebalance();
    /// assert!(deque.space_back() >= old_space_back);
    /// assert_eq!(deque.space_front(), 6);
    /// ```
    #[inline]
    pub fn rebalance(&mut self) {
        let len = self.len();
        let new_head = (self.cap - len) / 2;
        if self.head == new_head {
            return;
        }
        unsafe {
            std::ptr::copy(
                self.ptr.as_ptr().add(self.head),
                self.ptr.as_ptr().add(new_head),
                len,
            );
        }
        self.head = new_head;
        self.tail = new_head + len;
    }

    /// Shifts the elements so the first one sits at physical slot `index`.
    ///
    /// # Panics
    /// Panics if the elements would not fit in the buffer starting at `index`.
    ///
    /// # Examples
    /// ```
    /// # use arraydeque::ArrayDeque;
    /// let mut deque = ArrayDeque::with_capacity(8);
    /// deque.extend([1, 2, 3]);
    /// deque.rebalance_to(5);
    /// assert_eq!(deque.space_front(), 5);
    /// assert_eq!(deque.space_back(), 0);
    /// assert_eq!(deque, [1, 2, 3]);
    /// ```
    #[inline]
    pub fn rebalance_to(&mut self, index: usize) {
        if self.head == index {
            return;
        }
        let len = self.len();
        assert!(
            index <= self.cap && (self.cap - index) >= len,
            "attempt to rebalance ArrayDeque of len={}, cap={} with index {} would write out of bounds",
            len,
            self.cap,
            index
        );
        unsafe {
            std::ptr::copy(
                self.ptr.as_ptr().add(self.head),
                self.ptr.as_ptr().add(index),
                len,
            );
        }
        self.head = index;
        self.tail = index + len;
    }
}

// =============================================================================
// Push / pop
// =============================================================================

impl<T, DropOrder> ArrayDeque<T, DropOrder>
where
    DropOrder: DropBehavior,
{
    /// Adds an element to the right end.
    /// On a full bounded deque the leftmost element is dropped first; with `maxlen == 0` the value is dropped.
    ///
    /// # Panics
    /// Panics on capacity overflow, diverges through [`std::alloc::handle_alloc_error`] on allocation failure.
    /// Use [`try_append`](ArrayDeque::try_append) to handle those instead.
    ///
    /// # Examples
    /// ```
    /// # use arraydeque::ArrayDeque;
    /// let mut deque = ArrayDeque::from([42, 10]);
    /// deque.append(100);
    /// assert_eq!(deque.pop(), Ok(100));
    /// ```
    #[inline]
    pub fn append(&mut self, value: T) {
        if let Err(err) = self.try_append(value) {
            err.handle()
        }
    }

    /// Adds an element to the right end, returning an error instead of aborting if the buffer cannot grow.
    /// On error the deque is unchanged, including any element that would have been evicted.
    pub fn try_append(&mut self, value: T) -> Result<(), TryReserveError> {
        let evicted = match self.maxlen {
            Some(0) => return Ok(()),
            Some(maxlen) if self.len() >= maxlen => self.take_front(),
            _ => None,
        };
        if let Err(err) = self.try_make_room_back() {
            if let Some(evicted) = evicted {
                // head was just advanced past this slot
                self.head -= 1;
                unsafe { self.write_slot(self.head, evicted) };
            }
            return Err(err);
        }
        unsafe { self.write_slot(self.tail, value) };
        self.tail += 1;
        drop(evicted);
        Ok(())
    }

    /// Adds an element to the left end.
    /// On a full bounded deque the rightmost element is dropped first; with `maxlen == 0` the value is dropped.
    ///
    /// # Examples
    /// ```
    /// # use arraydeque::ArrayDeque;
    /// let mut deque = ArrayDeque::from([42, 10]);
    /// deque.appendleft(100);
    /// assert_eq!(deque.popleft(), Ok(100));
    /// ```
    #[inline]
    pub fn appendleft(&mut self, value: T) {
        if let Err(err) = self.try_appendleft(value) {
            err.handle()
        }
    }

    /// Fallible version of [`appendleft`](ArrayDeque::appendleft).
    pub fn try_appendleft(&mut self, value: T) -> Result<(), TryReserveError> {
        let evicted = match self.maxlen {
            Some(0) => return Ok(()),
            Some(maxlen) if self.len() >= maxlen => self.take_back(),
            _ => None,
        };
        if let Err(err) = self.try_make_room_front() {
            if let Some(evicted) = evicted {
                unsafe { self.write_slot(self.tail, evicted) };
                self.tail += 1;
            }
            return Err(err);
        }
        self.head -= 1;
        unsafe { self.write_slot(self.head, value) };
        drop(evicted);
        Ok(())
    }

    /// Removes and returns the rightmost element.
    ///
    /// # Errors
    /// [`DequeError::Underflow`] if the deque is empty.
    ///
    /// # Examples
    /// ```
    /// # use arraydeque::{ArrayDeque, DequeError};
    /// let mut deque = ArrayDeque::from([42, 10]);
    /// assert_eq!(deque.pop(), Ok(10));
    /// assert_eq!(deque.pop(), Ok(42));
    /// assert_eq!(deque.pop(), Err(DequeError::Underflow));
    /// ```
    #[inline]
    pub fn pop(&mut self) -> DequeResult<T> {
        self.take_back().ok_or(DequeError::Underflow)
    }

    /// Removes and returns the leftmost element.
    ///
    /// # Errors
    /// [`DequeError::Underflow`] if the deque is empty.
    ///
    /// # Examples
    /// ```
    /// # use arraydeque::{ArrayDeque, DequeError};
    /// let mut deque = ArrayDeque::from([42, 10]);
    /// assert_eq!(deque.popleft(), Ok(42));
    /// assert_eq!(deque.popleft(), Ok(10));
    /// assert_eq!(deque.popleft(), Err(DequeError::Underflow));
    /// ```
    #[inline]
    pub fn popleft(&mut self) -> DequeResult<T> {
        self.take_front().ok_or(DequeError::Underflow)
    }

    /// Appends every element of `iter` to the right end, stopping at the first allocation failure.
    /// Elements appended before the failure stay in the deque.
    pub fn try_extend<I>(&mut self, iter: I) -> Result<(), TryReserveError>
    where
        I: IntoIterator<Item = T>,
    {
        for item in iter {
            self.try_append(item)?;
        }
        Ok(())
    }

    /// Appends every element of `iter` to the left end, one at a time in iteration order.
    /// Each element lands before the previous one, so the extended run ends up reversed.
    /// The iterator is drained before the first push, so a panicking iterator leaves the deque untouched.
    ///
    /// # Examples
    /// ```
    /// # use arraydeque::ArrayDeque;
    /// let mut deque = ArrayDeque::from([0]);
    /// deque.extendleft([1, 2, 3]);
    /// assert_eq!(deque, [3, 2, 1, 0]);
    /// ```
    #[inline]
    pub fn extendleft<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        if let Err(err) = self.try_extendleft(iter) {
            err.handle()
        }
    }

    /// Fallible version of [`extendleft`](ArrayDeque::extendleft).
    /// Elements pushed before a failure stay in the deque.
    pub fn try_extendleft<I>(&mut self, iter: I) -> Result<(), TryReserveError>
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = iter.into_iter().collect();
        for item in items {
            self.try_appendleft(item)?;
        }
        Ok(())
    }

    /// Removes all elements from the `ArrayDeque` and drops them in the order specified by the drop order,
    /// then parks the empty cursor in the middle of the buffer. The allocation is kept.
    ///
    /// # Examples
    /// ```
    /// # use arraydeque::ArrayDeque;
    /// let mut deque = ArrayDeque::from([1, 2, 3, 4, 5, 6, 7, 8, 9]);
    /// let cap = deque.capacity();
    /// deque.clear();
    /// assert!(deque.is_empty());
    /// assert_eq!(deque.capacity(), cap);
    /// assert_eq!(deque.space_front(), cap / 2);
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        self.release_all();
        self.head = self.cap / 2;
        self.tail = self.head;
    }
}

// =============================================================================
// Rotation, search, indexed access
// =============================================================================

impl<T, DropOrder> ArrayDeque<T, DropOrder>
where
    DropOrder: DropBehavior,
{
    /// Rotates the deque `n` steps to the right (or `-n` steps to the left when `n` is negative).
    /// Rotating one step to the right is equivalent to `d.appendleft(d.pop())`.
    ///
    /// When the shorter of the two runs fits into the spare room on the receiving side it is
    /// moved there in one copy; otherwise the elements are rotated in place. Rotation never
    /// evicts, even on a full bounded deque.
    ///
    /// # Examples
    /// ```
    /// # use arraydeque::ArrayDeque;
    /// let mut deque = ArrayDeque::from(['a', 'b', 'c', 'd']);
    /// deque.rotate(1);
    /// assert_eq!(deque, ['d', 'a', 'b', 'c']);
    /// deque.rotate(-2);
    /// assert_eq!(deque, ['b', 'c', 'd', 'a']);
    /// ```
    pub fn rotate(&mut self, n: isize) {
        let len = self.len();
        if len <= 1 {
            return;
        }
        let right = n.rem_euclid(len as isize) as usize;
        if right == 0 {
            return;
        }
        let left = len - right;
        let base = self.ptr.as_ptr();
        if right <= left && right <= self.space_front() {
            // the last `right` elements move in front of the head
            unsafe {
                std::ptr::copy_nonoverlapping(
                    base.add(self.tail - right),
                    base.add(self.head - right),
                    right,
                );
            }
            self.head -= right;
            self.tail -= right;
        } else if left < right && left <= self.space_back() {
            // the first `left` elements move behind the tail
            unsafe {
                std::ptr::copy_nonoverlapping(base.add(self.head), base.add(self.tail), left);
            }
            self.head += left;
            self.tail += left;
        } else {
            self.as_mut_slice().rotate_right(right);
        }
    }

    /// Removes the first element equal to `value`, shifting the elements after it one slot to the left.
    ///
    /// # Errors
    /// [`DequeError::NotFound`] if no element is equal to `value`.
    ///
    /// # Examples
    /// ```
    /// # use arraydeque::{ArrayDeque, DequeError};
    /// let mut deque = ArrayDeque::from(['a', 'b', 'c', 'b', 'c']);
    /// deque.remove(&'b').unwrap();
    /// assert_eq!(deque, ['a', 'c', 'b', 'c']);
    /// assert_eq!(deque.remove(&'z'), Err(DequeError::NotFound));
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> DequeResult<()>
    where
        T: PartialEq<Q>,
        Q: ?Sized,
    {
        let index = self
            .as_slice()
            .iter()
            .position(|elem| elem == value)
            .ok_or(DequeError::NotFound)?;
        let idx = self.head + index;
        unsafe {
            let removed = self.take_slot(idx);
            let slot = self.ptr.as_ptr().add(idx);
            std::ptr::copy(slot.add(1), slot, self.tail - idx - 1);
            self.tail -= 1;
            drop(removed);
        }
        Ok(())
    }

    /// Counts the elements equal to `value`.
    ///
    /// # Examples
    /// ```
    /// # use arraydeque::ArrayDeque;
    /// let deque: ArrayDeque<char> = "abbccc".chars().collect();
    /// assert_eq!(deque.count(&'c'), 3);
    /// assert_eq!(deque.count(&'z'), 0);
    /// ```
    pub fn count<Q>(&self, value: &Q) -> usize
    where
        T: PartialEq<Q>,
        Q: ?Sized,
    {
        self.as_slice().iter().filter(|elem| *elem == value).count()
    }

    /// Returns `true` if some element is equal to `value`.
    ///
    /// # Examples
    /// ```
    /// # use arraydeque::ArrayDeque;
    /// let deque = ArrayDeque::from([String::from("x"), String::from("y")]);
    /// assert!(deque.contains("y"));
    /// assert!(!deque.contains("z"));
    /// ```
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: PartialEq<Q>,
        Q: ?Sized,
    {
        self.as_slice().iter().any(|elem| elem == value)
    }

    // Maps a possibly negative logical index to `0..len`.
    #[inline]
    fn normalize_index(&self, index: isize) -> DequeResult<usize> {
        let len = self.len();
        let normalized = if index < 0 {
            index + len as isize
        } else {
            index
        };
        if normalized >= 0 && (normalized as usize) < len {
            Ok(normalized as usize)
        } else {
            Err(DequeError::OutOfRange { index, len })
        }
    }

    /// Returns the element at logical position `index`; negative indices count from the right end.
    ///
    /// # Errors
    /// [`DequeError::OutOfRange`] if `index` is not in `-len..len`.
    ///
    /// # Examples
    /// ```
    /// # use arraydeque::{ArrayDeque, DequeError};
    /// let deque = ArrayDeque::from([100, 200, 300]);
    /// assert_eq!(deque.get(0), Ok(&100));
    /// assert_eq!(deque.get(-1), Ok(&300));
    /// assert_eq!(deque.get(3), Err(DequeError::OutOfRange { index: 3, len: 3 }));
    /// ```
    #[inline]
    pub fn get(&self, index: isize) -> DequeResult<&T> {
        let index = self.normalize_index(index)?;
        Ok(&self.as_slice()[index])
    }

    /// Mutable version of [`get`](ArrayDeque::get).
    #[inline]
    pub fn get_mut(&mut self, index: isize) -> DequeResult<&mut T> {
        let index = self.normalize_index(index)?;
        Ok(&mut self.as_mut_slice()[index])
    }

    /// Replaces the element at logical position `index`, dropping the old one.
    ///
    /// # Errors
    /// [`DequeError::OutOfRange`] if `index` is not in `-len..len`; `value` is dropped.
    ///
    /// # Examples
    /// ```
    /// # use arraydeque::ArrayDeque;
    /// let mut deque = ArrayDeque::from([100, 200, 300, 400]);
    /// deque.set(0, 111).unwrap();
    /// deque.set(-1, 444).unwrap();
    /// assert_eq!(deque, [111, 200, 300, 444]);
    /// assert!(deque.set(-5, 999).is_err());
    /// ```
    #[inline]
    pub fn set(&mut self, index: isize, value: T) -> DequeResult<()> {
        *self.get_mut(index)? = value;
        Ok(())
    }
}

// =============================================================================
// Accessors
// =============================================================================

impl<T, DropOrder> ArrayDeque<T, DropOrder>
where
    DropOrder: DropBehavior,
{
    /// Returns the number of elements in the `ArrayDeque`.
    ///
    /// # Examples
    /// ```
    /// # use arraydeque::ArrayDeque;
    /// let mut deque = ArrayDeque::new();
    /// deque.append(42);
    /// assert_eq!(deque.len(), 1);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.tail - self.head
    }

    /// Returns true if the deque contains no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Returns the bound on the length of the deque, or `None` if it is unbounded.
    #[inline]
    pub fn maxlen(&self) -> Option<usize> {
        self.maxlen
    }

    /// Returns the total number of slots in the buffer.
    /// Elements sit in the middle of the buffer, so fewer than `capacity - len` pushes on a single side fit without moving anything.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Returns the number of free slots before the first element.
    #[inline]
    pub fn space_front(&self) -> usize {
        self.head
    }

    /// Returns the number of free slots after the last element.
    #[inline]
    pub fn space_back(&self) -> usize {
        self.cap - self.tail
    }

    /// Extracts a slice containing the entire deque, in logical order.
    /// # Examples
    /// ```
    /// # use arraydeque::ArrayDeque;
    /// let mut deque = ArrayDeque::new();
    /// deque.appendleft(2);
    /// deque.appendleft(1);
    /// assert_eq!(deque.as_slice(), &[1, 2]);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        self
    }

    /// Extracts a mutable slice containing the entire deque.
    /// # Examples
    /// ```
    /// # use arraydeque::ArrayDeque;
    /// let mut deque = ArrayDeque::from([1, 2]);
    /// deque.as_mut_slice()[0] = 3;
    /// assert_eq!(deque.as_slice(), &[3, 2]);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }

    /// Returns an iterator over the elements from left to right.
    /// The iterator borrows the deque, so the deque cannot be mutated while it is alive.
    ///
    /// # Examples
    /// ```
    /// # use arraydeque::ArrayDeque;
    /// let deque = ArrayDeque::from([1, 2, 3]);
    /// let doubled: Vec<i32> = deque.iter().map(|x| x * 2).collect();
    /// assert_eq!(doubled, [2, 4, 6]);
    /// assert_eq!(deque.iter().rev().next(), Some(&3));
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, DropOrder> {
        Iter {
            deque: self,
            front: 0,
            back: self.len(),
        }
    }
}

impl<T, DropOrder> Default for ArrayDeque<T, DropOrder>
where
    DropOrder: DropBehavior,
{
    #[inline]
    fn default() -> Self {
        Self::try_allocate_empty(INITIAL_CAPACITY).unwrap_or_else(|err| err.handle())
    }
}

impl<T, DropOrder> Drop for ArrayDeque<T, DropOrder>
where
    DropOrder: DropBehavior,
{
    #[inline]
    fn drop(&mut self) {
        self.release_all();
        unsafe { Self::deallocate(self.ptr, self.cap) };
    }
}

impl<T, DropOrder> Clone for ArrayDeque<T, DropOrder>
where
    T: Clone,
    DropOrder: DropBehavior,
{
    /// Clones the elements into a new, centered buffer. The clone keeps the same `maxlen`.
    #[inline]
    fn clone(&self) -> Self {
        let mut new = Self::try_allocate_empty(self.cap).unwrap_or_else(|err| err.handle());
        new.maxlen = self.maxlen;
        new.rebalance_to((new.cap - self.len()) / 2);
        // `new.tail` only advances after each write, so a panicking clone drops what was already cloned.
        for elem in self.iter() {
            new.append(elem.clone());
        }
        new
    }
}

impl<T, DropOrder> Deref for ArrayDeque<T, DropOrder>
where
    DropOrder: DropBehavior,
{
    type Target = [T];
    #[inline]
    fn deref(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr().add(self.head), self.len()) }
    }
}

impl<T, DropOrder> DerefMut for ArrayDeque<T, DropOrder>
where
    DropOrder: DropBehavior,
{
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr().add(self.head), self.len()) }
    }
}

impl<T, DropOrder> AsRef<[T]> for ArrayDeque<T, DropOrder>
where
    DropOrder: DropBehavior,
{
    #[inline]
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T, DropOrder> AsMut<[T]> for ArrayDeque<T, DropOrder>
where
    DropOrder: DropBehavior,
{
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T, DropOrder> std::borrow::Borrow<[T]> for ArrayDeque<T, DropOrder>
where
    DropOrder: DropBehavior,
{
    #[inline]
    fn borrow(&self) -> &[T] {
        self
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// A borrowing iterator over the elements of an [`ArrayDeque`].
/// It keeps its own front and back positions; the deque itself is untouched.
/// This struct is created by the [`iter`](ArrayDeque::iter) method.
pub struct Iter<'a, T, DropOrder>
where
    DropOrder: DropBehavior,
{
    deque: &'a ArrayDeque<T, DropOrder>,
    front: usize,
    back: usize,
}

impl<'a, T, DropOrder> Iterator for Iter<'a, T, DropOrder>
where
    DropOrder: DropBehavior,
{
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let deque: &'a ArrayDeque<T, DropOrder> = self.deque;
        let item = &deque.as_slice()[self.front];
        self.front += 1;
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<'a, T, DropOrder> DoubleEndedIterator for Iter<'a, T, DropOrder>
where
    DropOrder: DropBehavior,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        let deque: &'a ArrayDeque<T, DropOrder> = self.deque;
        Some(&deque.as_slice()[self.back])
    }
}

impl<'a, T, DropOrder> ExactSizeIterator for Iter<'a, T, DropOrder> where DropOrder: DropBehavior {}

impl<'a, T, DropOrder> std::iter::FusedIterator for Iter<'a, T, DropOrder> where
    DropOrder: DropBehavior
{
}

/// An iterator over the elements owned by an [`ArrayDeque`]. It pops them from the appropriate side as it goes,
/// and the remaining elements are dropped with the deque when it is dropped.
pub struct IntoIter<T, DropOrder>
where
    DropOrder: DropBehavior,
{
    deque: ArrayDeque<T, DropOrder>,
}

impl<T, DropOrder> IntoIterator for ArrayDeque<T, DropOrder>
where
    DropOrder: DropBehavior,
{
    type Item = T;
    type IntoIter = IntoIter<T, DropOrder>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter { deque: self }
    }
}

impl<'a, T, DropOrder> IntoIterator for &'a ArrayDeque<T, DropOrder>
where
    DropOrder: DropBehavior,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, DropOrder>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, DropOrder> IntoIterator for &'a mut ArrayDeque<T, DropOrder>
where
    DropOrder: DropBehavior,
{
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<T, DropOrder> Iterator for IntoIter<T, DropOrder>
where
    DropOrder: DropBehavior,
{
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.deque.take_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.deque.len(), Some(self.deque.len()))
    }
}

impl<T, DropOrder> DoubleEndedIterator for IntoIter<T, DropOrder>
where
    DropOrder: DropBehavior,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.deque.take_back()
    }
}

impl<T, DropOrder> ExactSizeIterator for IntoIter<T, DropOrder>
where
    DropOrder: DropBehavior,
{
    #[inline]
    fn len(&self) -> usize {
        self.deque.len()
    }
}

impl<T, DropOrder> std::iter::FusedIterator for IntoIter<T, DropOrder> where DropOrder: DropBehavior {}

impl<T, DropOrder> FromIterator<T> for ArrayDeque<T, DropOrder>
where
    DropOrder: DropBehavior,
{
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut deque = Self::default();
        deque.extend(iter);
        deque
    }
}

impl<T, DropOrder> Extend<T> for ArrayDeque<T, DropOrder>
where
    DropOrder: DropBehavior,
{
    /// Appends every element to the right end, evicting from the left if the deque is bounded.
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        if let Err(err) = self.try_extend(iter) {
            err.handle()
        }
    }
}

impl<'a, T, DropOrder> Extend<&'a T> for ArrayDeque<T, DropOrder>
where
    T: Copy + 'a,
    DropOrder: DropBehavior,
{
    #[inline]
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> From<Vec<T>> for ArrayDeque<T> {
    #[inline]
    fn from(vec: Vec<T>) -> Self {
        let mut deque = ArrayDeque::with_capacity(vec.len());
        deque.rebalance_to((deque.cap - vec.len()) / 2);
        deque.extend(vec);
        deque
    }
}

impl<T, const N: usize> From<[T; N]> for ArrayDeque<T> {
    #[inline]
    fn from(array: [T; N]) -> Self {
        From::from(Vec::from(array))
    }
}

// =============================================================================
// Comparison and hashing
// =============================================================================

// Equality only looks at the elements in logical order; `maxlen` and the drop order are ignored.
impl<T, U, D1, D2> PartialEq<ArrayDeque<U, D2>> for ArrayDeque<T, D1>
where
    T: PartialEq<U>,
    D1: DropBehavior,
    D2: DropBehavior,
{
    #[inline]
    fn eq(&self, other: &ArrayDeque<U, D2>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, DropOrder> Eq for ArrayDeque<T, DropOrder>
where
    T: Eq,
    DropOrder: DropBehavior,
{
}

impl<T, U, DropOrder> PartialEq<[U]> for ArrayDeque<T, DropOrder>
where
    T: PartialEq<U>,
    DropOrder: DropBehavior,
{
    #[inline]
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U, DropOrder> PartialEq<&[U]> for ArrayDeque<T, DropOrder>
where
    T: PartialEq<U>,
    DropOrder: DropBehavior,
{
    #[inline]
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, DropOrder> PartialEq<Vec<U>> for ArrayDeque<T, DropOrder>
where
    T: PartialEq<U>,
    DropOrder: DropBehavior,
{
    #[inline]
    fn eq(&self, other: &Vec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U, DropOrder, const N: usize> PartialEq<[U; N]> for ArrayDeque<T, DropOrder>
where
    T: PartialEq<U>,
    DropOrder: DropBehavior,
{
    #[inline]
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == &other[..]
    }
}

impl<T, U, DropOrder> PartialEq<std::collections::VecDeque<U>> for ArrayDeque<T, DropOrder>
where
    T: PartialEq<U>,
    DropOrder: DropBehavior,
{
    #[inline]
    fn eq(&self, other: &std::collections::VecDeque<U>) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T, U, DropOrder> PartialEq<ArrayDeque<U, DropOrder>> for Vec<T>
where
    T: PartialEq<U>,
    DropOrder: DropBehavior,
{
    #[inline]
    fn eq(&self, other: &ArrayDeque<U, DropOrder>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, DropOrder> PartialOrd for ArrayDeque<T, DropOrder>
where
    T: PartialOrd,
    DropOrder: DropBehavior,
{
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T, DropOrder> Ord for ArrayDeque<T, DropOrder>
where
    T: Ord,
    DropOrder: DropBehavior,
{
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T, DropOrder> std::hash::Hash for ArrayDeque<T, DropOrder>
where
    T: std::hash::Hash,
    DropOrder: DropBehavior,
{
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

/// A version of the [`vec!`] macro but for [`ArrayDeque`]. The result is unbounded and uses the default drop order.
/// # Examples
/// ```
/// # use arraydeque::arraydeque;
/// let deque = arraydeque![1, 2, 3, 4, 5];
/// assert_eq!(deque.len(), 5);
/// assert_eq!(deque.as_slice(), &[1, 2, 3, 4, 5]);
/// ```
/// ```
/// # use arraydeque::arraydeque;
/// let deque = arraydeque![1; 5];
/// assert_eq!(deque.as_slice(), &[1, 1, 1, 1, 1]);
/// ```
/// ```
/// # use arraydeque::{ArrayDeque, arraydeque};
/// let deque: ArrayDeque<i32> = arraydeque![];
/// assert!(deque.is_empty());
/// assert_eq!(deque.capacity(), 8);
/// ```
#[macro_export]
macro_rules! arraydeque {
    () => {
        $crate::ArrayDeque::new()
    };
    ($elem:expr; $n:expr) => {
        <$crate::ArrayDeque<_> as ::std::iter::FromIterator<_>>::from_iter(
            ::std::iter::repeat($elem).take($n),
        )
    };
    ($($x:expr),+ $(,)?) => {
        $crate::ArrayDeque::from([$($x),+])
    };
}

#[cfg(test)]
mod deque_tests {
    use super::*;
    use crate::BackToFront;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn new_deque_is_centered() {
        let deque: ArrayDeque<i32> = ArrayDeque::new();
        let raw = deque.debug();
        assert_eq!(raw.cap, 8);
        assert_eq!(raw.head, 4);
        assert_eq!(raw.tail, 4);
        assert_eq!(raw.maxlen, None);
        deque.assert_invariants();
    }

    #[test]
    fn append_order() {
        let mut deque = ArrayDeque::new();
        deque.append(1);
        deque.append(2);
        deque.append(3);
        assert_eq!(&*deque, &[1, 2, 3]);
    }

    #[test]
    fn pop_order() {
        let mut deque = ArrayDeque::new();
        deque.append(1);
        deque.append(2);
        deque.append(3);
        assert_eq!(deque.pop(), Ok(3));
        assert_eq!(deque.pop(), Ok(2));
        assert_eq!(deque.pop(), Ok(1));
        assert_eq!(deque.pop(), Err(DequeError::Underflow));
    }

    #[test]
    fn appendleft_order() {
        let mut deque = ArrayDeque::new();
        deque.appendleft(1);
        deque.appendleft(2);
        deque.appendleft(3);
        assert_eq!(&*deque, &[3, 2, 1]);
        assert_eq!(deque.popleft(), Ok(3));
        assert_eq!(deque.popleft(), Ok(2));
        assert_eq!(deque.popleft(), Ok(1));
        assert_eq!(deque.popleft(), Err(DequeError::Underflow));
    }

    #[test]
    fn opposite_ends_are_fifo() {
        let mut deque = ArrayDeque::new();
        deque.append("x");
        assert_eq!(deque.popleft(), Ok("x"));
        deque.appendleft("y");
        assert_eq!(deque.pop(), Ok("y"));
    }

    #[test]
    fn interleaved_push_and_pop() {
        let mut deque = ArrayDeque::new();
        deque.appendleft(1i32);
        deque.append(2);
        deque.appendleft(3);
        deque.append(4);
        deque.appendleft(5);
        deque.append(6);
        assert_eq!(&*deque, &[5, 3, 1, 2, 4, 6]);
        assert_eq!(deque.popleft(), Ok(5));
        assert_eq!(deque.pop(), Ok(6));
        assert_eq!(deque.popleft(), Ok(3));
        assert_eq!(deque.popleft(), Ok(1));
        assert_eq!(deque.pop(), Ok(4));
        assert_eq!(deque.pop(), Ok(2));
        assert!(deque.is_empty());
    }

    #[test]
    fn growth_centers_elements() {
        let mut deque = ArrayDeque::new();
        for i in 0..4 {
            deque.append(i);
        }
        // tail hit the end of a half-full buffer, so this push doubles it
        deque.append(4);
        let raw = deque.debug();
        assert_eq!(raw.cap, 16);
        assert_eq!(raw.head, (16 - 4) / 2);
        assert_eq!(raw.tail, raw.head + 5);
        assert_eq!(deque, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn drifting_queue_recenters_instead_of_growing() {
        let mut deque = ArrayDeque::new();
        for i in 0..10_000 {
            deque.append(i);
            assert_eq!(deque.popleft(), Ok(i));
            deque.assert_invariants();
        }
        assert_eq!(deque.capacity(), 8);
    }

    #[test]
    fn thousand_elements_survive_growth() {
        let mut deque = ArrayDeque::new();
        for i in 0..1000 {
            deque.append(i);
        }
        deque.assert_invariants();
        for i in 0..1000 {
            assert_eq!(deque.popleft(), Ok(i));
        }
        assert!(deque.is_empty());

        let mut deque = ArrayDeque::new();
        for i in 0..1000 {
            deque.appendleft(i);
        }
        for i in 0..1000 {
            assert_eq!(deque.pop(), Ok(i));
        }
    }

    #[test]
    fn bounded_append_evicts_oldest() {
        let mut deque = ArrayDeque::with_maxlen(3);
        deque.append(1);
        deque.append(2);
        deque.append(3);
        assert_eq!(deque, [1, 2, 3]);
        deque.append(4);
        assert_eq!(deque, [2, 3, 4]);
        deque.assert_invariants();
    }

    #[test]
    fn bounded_appendleft_evicts_rightmost() {
        let mut deque = ArrayDeque::with_maxlen(3);
        deque.appendleft(1);
        deque.appendleft(2);
        deque.appendleft(3);
        assert_eq!(deque, [3, 2, 1]);
        deque.appendleft(4);
        assert_eq!(deque, [4, 3, 2]);
    }

    #[test]
    fn bounded_window_does_not_grow_forever() {
        let mut deque = ArrayDeque::with_maxlen(5);
        for i in 0..100_000 {
            deque.append(i);
        }
        assert_eq!(deque, [99_995, 99_996, 99_997, 99_998, 99_999]);
        assert!(deque.capacity() <= 16);
    }

    #[test]
    fn zero_maxlen_ignores_pushes() {
        let mut deque = ArrayDeque::with_maxlen(0);
        deque.append(1);
        deque.appendleft(2);
        deque.extend([3, 4]);
        assert!(deque.is_empty());
        assert_eq!(deque.pop(), Err(DequeError::Underflow));
        assert_eq!(deque.popleft(), Err(DequeError::Underflow));
    }

    #[test]
    fn seeding_keeps_trailing_elements() {
        let deque = ArrayDeque::from_iter_bounded(0..10, Some(5));
        assert_eq!(deque, [5, 6, 7, 8, 9]);
        assert_eq!(deque.maxlen(), Some(5));
        let deque = ArrayDeque::try_from_iter_bounded(0..10, Some(5)).unwrap();
        assert_eq!(deque, [5, 6, 7, 8, 9]);
    }

    #[test]
    fn negative_maxlen_is_rejected() {
        let err = ArrayDeque::try_from_iter_bounded([1, 2], Some(-1)).unwrap_err();
        assert!(matches!(err, DequeError::InvalidArgument { .. }));
    }

    #[test]
    fn extendleft_drains_iterator_before_pushing() {
        let mut deque = ArrayDeque::from([0]);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            deque.extendleft((1..=3).map(|x| if x == 3 { panic!("source failed") } else { x }));
        }));
        assert!(result.is_err());
        assert_eq!(deque, [0]);
        deque.assert_invariants();
    }

    // Fills a bounded deque of 9 so that the next push evicts down to 8 of 16 slots and must grow.
    fn full_window_at_edge(head: usize) -> ArrayDeque<Rc<i32>> {
        let mut deque = ArrayDeque::with_maxlen(9);
        deque.extend((0..9).map(Rc::new));
        assert_eq!(deque.capacity(), 16);
        deque.rebalance_to(head);
        deque
    }

    #[test]
    fn failed_growth_restores_evicted_element() {
        let mut deque = full_window_at_edge(7);
        let first = deque.get(0).unwrap().clone();
        BLOCK_GROWTH.with(|blocked| blocked.set(true));
        let pushed = Rc::new(99);
        let result = deque.try_append(pushed.clone());
        BLOCK_GROWTH.with(|blocked| blocked.set(false));

        assert_eq!(
            result.map_err(|err| err.kind()),
            Err(TryReserveErrorKind::CapacityOverflow)
        );
        assert_eq!(deque, (0..9).map(Rc::new).collect::<Vec<_>>());
        assert!(Rc::ptr_eq(deque.get(0).unwrap(), &first));
        assert_eq!(Rc::strong_count(&pushed), 1);
        let raw = deque.debug();
        assert_eq!((raw.cap, raw.head, raw.tail), (16, 7, 16));
        deque.assert_invariants();
    }

    #[test]
    fn failed_growth_on_the_left_restores_evicted_element() {
        let mut deque = full_window_at_edge(0);
        let last = deque.get(-1).unwrap().clone();
        BLOCK_GROWTH.with(|blocked| blocked.set(true));
        let result = deque.try_appendleft(Rc::new(-1));
        BLOCK_GROWTH.with(|blocked| blocked.set(false));

        assert!(result.is_err());
        assert_eq!(deque, (0..9).map(Rc::new).collect::<Vec<_>>());
        assert!(Rc::ptr_eq(deque.get(-1).unwrap(), &last));
        let raw = deque.debug();
        assert_eq!((raw.cap, raw.head, raw.tail), (16, 0, 9));

        // growth works again once unblocked
        deque.appendleft(Rc::new(-1));
        assert_eq!(deque.len(), 9);
        assert_eq!(**deque.get(0).unwrap(), -1);
        assert_eq!(**deque.get(-1).unwrap(), 7);
    }

    #[test]
    fn extend_and_extendleft() {
        let mut deque = ArrayDeque::new();
        deque.extend([10, 20, 30]);
        assert_eq!(deque, [10, 20, 30]);

        let mut deque = ArrayDeque::new();
        deque.extendleft([1, 2, 3]);
        assert_eq!(deque, [3, 2, 1]);
    }

    #[test]
    fn clear_then_reuse() {
        let mut deque = ArrayDeque::from([1, 2, 3, 4]);
        deque.clear();
        assert!(deque.is_empty());
        assert_eq!(deque.space_front(), deque.capacity() / 2);
        deque.append(99);
        assert_eq!(deque, [99]);
        deque.assert_invariants();
    }

    #[test]
    fn clear_and_drop_release_each_element_once() {
        let counter = Rc::new(Cell::new(0));
        struct Counted(Rc<Cell<usize>>);
        impl Drop for Counted {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        let mut deque = ArrayDeque::new();
        for _ in 0..20 {
            deque.append(Counted(counter.clone()));
        }
        deque.clear();
        assert_eq!(counter.get(), 20);

        for _ in 0..5 {
            deque.appendleft(Counted(counter.clone()));
        }
        let popped = deque.pop().unwrap();
        assert_eq!(counter.get(), 20);
        drop(popped);
        assert_eq!(counter.get(), 21);
        drop(deque);
        assert_eq!(counter.get(), 25);
    }

    #[test]
    fn eviction_and_set_release_the_replaced_element() {
        let value = Rc::new(());
        let mut deque = ArrayDeque::with_maxlen(1);
        deque.append(value.clone());
        assert_eq!(Rc::strong_count(&value), 2);
        deque.append(Rc::new(()));
        assert_eq!(Rc::strong_count(&value), 1);

        deque.set(0, value.clone()).unwrap();
        assert_eq!(Rc::strong_count(&value), 2);
        deque.set(-1, Rc::new(())).unwrap();
        assert_eq!(Rc::strong_count(&value), 1);
    }

    #[test]
    fn rotate_right_and_left() {
        let mut deque: ArrayDeque<char> = "abcde".chars().collect();
        deque.rotate(1);
        assert_eq!(deque, ['e', 'a', 'b', 'c', 'd']);
        let mut deque: ArrayDeque<char> = "abcde".chars().collect();
        deque.rotate(-1);
        assert_eq!(deque, ['b', 'c', 'd', 'e', 'a']);
    }

    #[test]
    fn rotate_round_trips() {
        let original: ArrayDeque<i32> = (0..7).collect();
        for n in -20..20 {
            let mut deque = original.clone();
            deque.rotate(n);
            deque.assert_invariants();
            deque.rotate(-n);
            assert_eq!(deque, original, "rotate({n}) then rotate({})", -n);
        }
    }

    #[test]
    fn rotate_matches_single_steps() {
        for n in -12isize..12 {
            let mut bulk: ArrayDeque<i32> = (0..9).collect();
            let mut steps = bulk.clone();
            bulk.rotate(n);
            for _ in 0..n.unsigned_abs() {
                if n > 0 {
                    let x = steps.pop().unwrap();
                    steps.appendleft(x);
                } else {
                    let x = steps.popleft().unwrap();
                    steps.append(x);
                }
            }
            assert_eq!(bulk, steps, "rotate({n})");
        }
    }

    #[test]
    fn rotate_without_spare_room_falls_back_to_in_place() {
        let mut deque: ArrayDeque<i32> = ArrayDeque::with_capacity(8);
        deque.extend(0..8);
        assert_eq!(deque.capacity(), 16);
        // no free slot in front, and the left run is longer than the right one
        deque.rebalance_to(0);
        deque.rotate(3);
        assert_eq!(deque, [5, 6, 7, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn rotate_empty_and_bounded() {
        let mut empty: ArrayDeque<i32> = ArrayDeque::new();
        empty.rotate(5);
        assert!(empty.is_empty());

        let mut full = ArrayDeque::from_iter_bounded([1, 2, 3], Some(3));
        full.rotate(isize::MIN);
        full.rotate(1);
        assert_eq!(full.len(), 3);
        assert_eq!(full.maxlen(), Some(3));
    }

    #[test]
    fn remove_first_occurrence_only() {
        let mut deque = ArrayDeque::from(['a', 'v', 'b', 'v', 'c']);
        deque.remove(&'v').unwrap();
        assert_eq!(deque, ['a', 'b', 'v', 'c']);
        deque.assert_invariants();
        assert_eq!(deque.remove(&'z'), Err(DequeError::NotFound));
        assert_eq!(deque, ['a', 'b', 'v', 'c']);
    }

    #[test]
    fn count_agrees_with_get() {
        let deque = ArrayDeque::from([1, 2, 1, 3, 1]);
        for value in 0..5 {
            let by_index = (0..deque.len() as isize)
                .filter(|&i| deque.get(i) == Ok(&value))
                .count();
            assert_eq!(deque.count(&value), by_index);
            assert_eq!(deque.contains(&value), by_index > 0);
        }
    }

    #[test]
    fn negative_indexing() {
        let mut deque = ArrayDeque::from([100, 200, 300, 400]);
        assert_eq!(deque.get(-1), deque.get(3));
        assert_eq!(deque.get(-2), Ok(&300));
        assert_eq!(deque.get(4), Err(DequeError::OutOfRange { index: 4, len: 4 }));
        assert_eq!(deque.get(-5), Err(DequeError::OutOfRange { index: -5, len: 4 }));
        *deque.get_mut(1).unwrap() += 1;
        assert_eq!(deque, [100, 201, 300, 400]);
        assert!(deque.set(4, 0).is_err());

        let empty: ArrayDeque<i32> = ArrayDeque::new();
        assert!(empty.get(0).is_err());
        assert!(empty.get(-1).is_err());
    }

    #[test]
    fn equality_ignores_maxlen_and_drop_order() {
        let bounded = ArrayDeque::from_iter_bounded([1, 2, 3], Some(10));
        let unbounded = ArrayDeque::from([1, 2, 3]);
        let inverted = ArrayDeque::from([1, 2, 3]).with_drop_order::<BackToFront>();
        assert_eq!(bounded, unbounded);
        assert_eq!(unbounded, bounded);
        assert_eq!(bounded, bounded);
        assert_eq!(unbounded, inverted);
        assert_eq!(unbounded, vec![1, 2, 3]);
        assert_eq!(vec![1, 2, 3], unbounded);
        assert_eq!(unbounded, &[1, 2, 3][..]);
        assert_ne!(unbounded, ArrayDeque::from([1, 2, 3, 4]));
    }

    #[test]
    fn clone_keeps_maxlen_and_is_independent() {
        let mut deque = ArrayDeque::from_iter_bounded([String::from("x"), String::from("y")], Some(3));
        let copy = deque.clone();
        assert_eq!(copy, deque);
        assert_eq!(copy.maxlen(), Some(3));
        deque.append(String::from("z"));
        assert_ne!(copy, deque);
        copy.assert_invariants();
    }

    #[test]
    fn iterators() {
        let mut deque = ArrayDeque::from([1, 2, 3, 4, 5]);
        assert_eq!(deque.iter().len(), 5);
        assert_eq!(deque.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4, 5]);
        let mut iter = deque.iter();
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&5));
        assert_eq!(iter.len(), 3);

        for x in &mut deque {
            *x *= 10;
        }
        let owned: Vec<i32> = deque.into_iter().rev().collect();
        assert_eq!(owned, [50, 40, 30, 20, 10]);
    }

    #[test]
    fn zero_sized_elements() {
        let mut deque = ArrayDeque::<()>::new();
        for _ in 0..20 {
            deque.append(());
            deque.appendleft(());
        }
        assert_eq!(deque.len(), 40);
        assert_eq!(deque.popleft(), Ok(()));
        deque.rotate(3);
        deque.remove(&()).unwrap();
        assert_eq!(deque.len(), 38);
        deque.assert_invariants();
    }

    #[test]
    fn collect_and_macro() {
        let deque: ArrayDeque<i32> = (0..10).collect();
        assert_eq!(&*deque, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        let deque = crate::arraydeque![7; 3];
        assert_eq!(deque, [7, 7, 7]);
    }

    #[test]
    fn try_with_capacity_reports_overflow() {
        let err = ArrayDeque::<u64>::try_with_capacity(usize::MAX).unwrap_err();
        assert_eq!(err.kind(), TryReserveErrorKind::CapacityOverflow);
    }
}
