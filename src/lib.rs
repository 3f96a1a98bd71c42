//! A double-ended queue that lives in a single contiguous buffer.
//!
//! [`ArrayDeque`] keeps its elements centered in the buffer instead of wrapping around a ring, so
//! pushes and pops at either end are amortized O(1), indexing is a plain offset, and the whole deque
//! can always be borrowed as a slice. It follows the shape of Python's `collections.deque`:
//! an optional `maxlen` turns it into a sliding window, and `rotate`, `remove`, `count` and negative
//! indices behave the same way.
//!
//! ```
//! use arraydeque::ArrayDeque;
//!
//! let mut recent = ArrayDeque::with_maxlen(3);
//! for reading in [10, 11, 12, 13] {
//!     recent.append(reading);
//! }
//! assert_eq!(recent, [11, 12, 13]);
//! assert_eq!(recent.get(-1), Ok(&13));
//!
//! recent.rotate(1);
//! assert_eq!(recent.as_slice(), &[13, 11, 12]);
//! ```

pub mod deque;
pub mod error;
pub mod settings;
pub mod state;

pub use deque::{ArrayDeque, IntoIter, Iter};
pub use error::{DequeError, DequeResult, TryReserveError, TryReserveErrorKind};
pub use settings::{BackToFront, DropBehavior, FrontToBack, INITIAL_CAPACITY};
pub use state::DequeState;
