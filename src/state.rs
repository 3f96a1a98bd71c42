//! The serialized form of an [`ArrayDeque`]: its elements in logical order plus its `maxlen`.
//! Feeding a [`DequeState`] back through [`ArrayDeque::from_state`] rebuilds an equal deque with the same bound.

use crate::deque::ArrayDeque;
use crate::settings::{DropBehavior, FrontToBack};

/// Elements in logical order and the length bound (`None` for unbounded).
///
/// # Examples
/// ```
/// use arraydeque::{ArrayDeque, DequeState};
/// let deque = ArrayDeque::from_iter_bounded([1, 2, 3], Some(5));
/// let state = deque.to_state();
/// assert_eq!(state, DequeState { items: vec![1, 2, 3], maxlen: Some(5) });
/// let rebuilt = ArrayDeque::from_state(state);
/// assert_eq!(rebuilt, deque);
/// assert_eq!(rebuilt.maxlen(), Some(5));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DequeState<T> {
    pub items: Vec<T>,
    pub maxlen: Option<usize>,
}

impl<T, DropOrder> ArrayDeque<T, DropOrder>
where
    DropOrder: DropBehavior,
{
    /// Copies the elements out into a [`DequeState`].
    pub fn to_state(&self) -> DequeState<T>
    where
        T: Clone,
    {
        DequeState {
            items: self.as_slice().to_vec(),
            maxlen: self.maxlen,
        }
    }

    /// Moves the elements out into a [`DequeState`].
    pub fn into_state(self) -> DequeState<T> {
        let maxlen = self.maxlen;
        DequeState {
            items: self.into_iter().collect(),
            maxlen,
        }
    }
}

impl<T> ArrayDeque<T, FrontToBack> {
    /// Rebuilds a deque from its serialized form.
    /// If the state lists more than `maxlen` items only the trailing ones are kept, as with any bounded construction.
    #[must_use]
    pub fn from_state(state: DequeState<T>) -> Self {
        ArrayDeque::from_iter_bounded(state.items, state.maxlen)
    }
}

impl<T> From<DequeState<T>> for ArrayDeque<T> {
    #[inline]
    fn from(state: DequeState<T>) -> Self {
        ArrayDeque::from_state(state)
    }
}

impl<T, DropOrder> From<ArrayDeque<T, DropOrder>> for DequeState<T>
where
    DropOrder: DropBehavior,
{
    #[inline]
    fn from(deque: ArrayDeque<T, DropOrder>) -> Self {
        deque.into_state()
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[doc(hidden)]
pub(crate) mod serde_impls {
    use super::*;
    use crate::error::{DequeError, DequeResult};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    // Same field layout as `DequeState`, borrowing the elements instead of cloning them.
    #[derive(Serialize)]
    struct StateRef<'a, T> {
        items: &'a [T],
        maxlen: Option<usize>,
    }

    #[derive(Deserialize)]
    struct RawState<T> {
        items: Vec<T>,
        maxlen: Option<RawMaxlen>,
    }

    // Any unsigned bound the serializer can write, plus negative ones so they are reported
    // as an invalid argument instead of a type mismatch.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawMaxlen {
        Unsigned(u64),
        Signed(i64),
    }

    impl RawMaxlen {
        fn into_maxlen(self) -> DequeResult<usize> {
            match self {
                RawMaxlen::Unsigned(maxlen) => {
                    usize::try_from(maxlen).map_err(|_| DequeError::InvalidArgument {
                        message: format!("maxlen {} does not fit in usize", maxlen),
                    })
                }
                RawMaxlen::Signed(maxlen) => {
                    usize::try_from(maxlen).map_err(|_| DequeError::negative_maxlen(maxlen))
                }
            }
        }
    }

    impl<T, DropOrder> Serialize for ArrayDeque<T, DropOrder>
    where
        T: Serialize,
        DropOrder: DropBehavior,
    {
        #[inline]
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            StateRef {
                items: self.as_slice(),
                maxlen: self.maxlen,
            }
            .serialize(serializer)
        }
    }

    impl<'src, T, DropOrder> Deserialize<'src> for ArrayDeque<T, DropOrder>
    where
        T: Deserialize<'src>,
        DropOrder: DropBehavior,
    {
        #[inline]
        fn deserialize<D: Deserializer<'src>>(deserializer: D) -> Result<Self, D::Error> {
            let raw = RawState::<T>::deserialize(deserializer)?;
            let maxlen = raw
                .maxlen
                .map(RawMaxlen::into_maxlen)
                .transpose()
                .map_err(D::Error::custom)?;
            let deque = ArrayDeque::try_collect_bounded(raw.items, maxlen)
                .map_err(|err| D::Error::custom(DequeError::from(err)))?;
            Ok(deque.with_drop_order())
        }
    }

}
