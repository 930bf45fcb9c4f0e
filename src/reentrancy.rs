//! Debug-only reentrancy check for table operations.
//!
//! Lookups and inserts call user `Eq`/`Hash` implementations while a chain
//! is being walked or relinked. A key whose `eq` reaches back into the same
//! table would observe a half-linked chain, so debug builds panic on the
//! nested entry. Release builds compile the check away.

#[cfg(debug_assertions)]
use core::cell::Cell;
use core::marker::PhantomData;

/// Embedded in `BucketTable`; each guarded method starts with
/// `let _op = self.ops.begin();`.
#[derive(Debug)]
pub(crate) struct OpCheck {
    #[cfg(debug_assertions)]
    active: Cell<bool>,
    // Raw-pointer marker keeps the owning table !Send + !Sync.
    _single_thread: PhantomData<*mut ()>,
}

impl OpCheck {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(false),
            _single_thread: PhantomData,
        }
    }

    /// Mark an operation as running until the returned guard drops.
    #[inline]
    pub(crate) fn begin(&self) -> OpGuard<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.active.replace(true),
                "reentrant call into BucketTable while an operation is in progress"
            );
            OpGuard { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            OpGuard { _owner: PhantomData }
        }
    }
}

impl Default for OpCheck {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct OpGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a OpCheck,
    #[cfg(not(debug_assertions))]
    _owner: PhantomData<&'a OpCheck>,
}

impl Drop for OpGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.owner.active.set(false);
    }
}
