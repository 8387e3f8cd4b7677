//! Reads of typed slots stored as `MaybeUninit<T>`.
//!
//! Together with the call site in `Stack::peek`, this is the only `unsafe`
//! code in the crate.

#![allow(unsafe_code)]

use std::mem::MaybeUninit;

/// Copy the value out of a slot that a push has initialised.
///
/// # Safety
///
/// `slot` must have been written with a `T` since it was last handed out
/// by a push. [`Stack`](crate::Stack) only reads the top slot, and every
/// slot below the top was filled by the push that created it.
pub(crate) unsafe fn read_slot<T: Copy>(slot: &MaybeUninit<T>) -> T {
    // SAFETY: the caller guarantees the slot is initialised, and `T: Copy`
    // means reading it leaves no ownership behind.
    unsafe { slot.assume_init_read() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_back_written_value() {
        let slot = MaybeUninit::new((7u8, 0xdead_beef_u32));
        // SAFETY: initialised on the line above.
        let value = unsafe { read_slot(&slot) };
        assert_eq!(value, (7, 0xdead_beef));
    }
}
