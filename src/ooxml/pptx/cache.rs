//! Resettable memoization cell.
//!
//! Derived values (frame text, paragraph alignment, level font maps, fills)
//! are computed on first access and kept until a mutation explicitly resets
//! the cell. There is no dependency tracking: a mutator resets exactly the
//! cells whose source it changed.

use once_cell::unsync::OnceCell;

/// A lazily computed value that can be discarded and recomputed.
#[derive(Debug, Clone)]
pub struct ResettableLazy<T> {
    cell: OnceCell<T>,
}

impl<T> ResettableLazy<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// The stored value, computing it with `init` if the cell is empty.
    #[inline]
    pub fn get(&self, init: impl FnOnce() -> T) -> &T {
        self.cell.get_or_init(init)
    }

    /// Fallible variant of [`get`](Self::get); nothing is stored on error.
    #[inline]
    pub fn get_or_try_init<E>(&self, init: impl FnOnce() -> Result<T, E>) -> Result<&T, E> {
        self.cell.get_or_try_init(init)
    }

    /// Mutable access to the value, computing it first if needed.
    pub fn get_mut(&mut self, init: impl FnOnce() -> T) -> &mut T {
        self.cell.get_or_init(init);
        self.cell.get_mut().unwrap_or_else(|| unreachable!("cell initialised above"))
    }

    /// The stored value without computing it.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.cell.get()
    }

    /// Store `value`, replacing anything computed before.
    pub fn set(&mut self, value: T) {
        self.cell = OnceCell::from(value);
    }

    /// Discard the stored value; the next access recomputes it.
    #[inline]
    pub fn reset(&mut self) -> Option<T> {
        self.cell.take()
    }

    #[inline]
    pub fn is_computed(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Default for ResettableLazy<T> {
    fn default() -> Self {
        Self::new()
    }
}
