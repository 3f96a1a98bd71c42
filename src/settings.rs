use std::fmt::Debug;

/// Number of slots allocated by a freshly constructed deque.
/// Elements start out centered in this buffer, so both ends have room.
pub const INITIAL_CAPACITY: usize = 8;

/// Releases elements starting at the front (the order iteration would visit them).
#[derive(Copy, Clone, Debug, Default)]
pub struct FrontToBack;

/// Releases elements starting at the back.
#[derive(Copy, Clone, Debug, Default)]
pub struct BackToFront;

/// The order in which [`ArrayDeque::clear`](crate::ArrayDeque::clear) and the destructor release elements.
pub trait DropBehavior: seal_drop_behavior::Sealed + Debug + Copy + Default {}
pub(crate) mod seal_drop_behavior {
    pub trait Sealed {
        const IS_INVERTED: bool;
    }
}

impl DropBehavior for FrontToBack {}
impl DropBehavior for BackToFront {}

impl seal_drop_behavior::Sealed for FrontToBack {
    const IS_INVERTED: bool = false;
}
impl seal_drop_behavior::Sealed for BackToFront {
    const IS_INVERTED: bool = true;
}
