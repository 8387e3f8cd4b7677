//! Stack lifecycle and element FFI: create, push, pop, peek, clear, destroy.
//!
//! All stacks live in one global handle table. The table lock is held for
//! the duration of each call, which also serialises access to a single
//! stack from multiple C threads.
//!
//! Element pointers handed out by [`chunkstack_push_reserve`] and
//! [`chunkstack_peek`] point into chunk storage, which never moves. They
//! stay valid until that element is removed, the stack is cleared, or the
//! stack is destroyed.

use std::ffi::c_void;
use std::sync::Mutex;

use chunkstack::{RawStack, StackConfig};

use crate::handle::HandleTable;
use crate::status::StackStatus;

static STACKS: Mutex<HandleTable<RawStack>> = Mutex::new(HandleTable::new());

/// Label attached to log events of stacks created through the C API.
const FFI_LABEL: &str = "ffi";

fn create_from(config: StackConfig, out: *mut u64) -> i32 {
    if out.is_null() {
        return StackStatus::InvalidArgument as i32;
    }
    let stack = match RawStack::from_config(config) {
        Ok(s) => s,
        Err(e) => return StackStatus::from(&e) as i32,
    };
    let mut table = ffi_lock!(STACKS);
    let handle = table.insert(stack);
    tracing::debug!(handle, live = table.len(), "created stack");
    write_out(out, handle);
    StackStatus::Ok as i32
}

#[allow(unsafe_code)]
fn write_out<T>(out: *mut T, value: T) {
    // SAFETY: callers check `out` for null; validity and alignment are the
    // C caller's contract.
    unsafe { out.write(value) };
}

// ── FFI functions ───────────────────────────────────────────────

/// Create a stack of `elem_size`-byte elements, `chunk_capacity` per chunk.
///
/// On success, writes the handle to `out`. Zero sizes return `CONFIG_ERROR`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkstack_create(
    elem_size: usize,
    chunk_capacity: usize,
    out: *mut u64,
) -> i32 {
    ffi_guard!({
        let config = StackConfig::new(elem_size)
            .with_chunk_capacity(chunk_capacity)
            .with_label(FFI_LABEL);
        create_from(config, out)
    })
}

/// Create a stack with the default chunk capacity (65536 elements).
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkstack_create_default(elem_size: usize, out: *mut u64) -> i32 {
    ffi_guard!({ create_from(StackConfig::new(elem_size).with_label(FFI_LABEL), out) })
}

/// Destroy a stack, returning all of its chunks to the allocator.
///
/// Destroying an already-destroyed handle returns `INVALID_HANDLE`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkstack_destroy(handle: u64) -> i32 {
    ffi_guard!({
        let removed = ffi_lock!(STACKS).remove(handle);
        match removed {
            Some(stack) => {
                drop(stack);
                StackStatus::Ok as i32
            }
            None => StackStatus::InvalidHandle as i32,
        }
    })
}

/// Reserve a new top element and write its address to `slot_out`.
///
/// The caller fills exactly `elem_size` bytes at that address.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkstack_push_reserve(handle: u64, slot_out: *mut *mut c_void) -> i32 {
    ffi_guard!({
        if slot_out.is_null() {
            return StackStatus::InvalidArgument as i32;
        }
        let mut table = ffi_lock!(STACKS);
        let Some(stack) = table.get_mut(handle) else {
            return StackStatus::InvalidHandle as i32;
        };
        let slot = stack.push_reserve().as_mut_ptr().cast::<c_void>();
        write_out(slot_out, slot);
        StackStatus::Ok as i32
    })
}

/// Push a copy of the `elem_size` bytes at `src`.
///
/// `src` may point into this stack's own storage (e.g. a `peek` result).
/// The bytes are copied out before a slot is reserved.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkstack_push(handle: u64, src: *const c_void) -> i32 {
    ffi_guard!({
        if src.is_null() {
            return StackStatus::InvalidArgument as i32;
        }
        let mut table = ffi_lock!(STACKS);
        let Some(stack) = table.get_mut(handle) else {
            return StackStatus::InvalidHandle as i32;
        };
        // SAFETY: src points to `elem_size` readable bytes per caller
        // contract. The borrow ends at `to_vec`, before a slot is reserved.
        let bytes = unsafe { std::slice::from_raw_parts(src.cast::<u8>(), stack.elem_size()) }
            .to_vec();
        stack.push(&bytes);
        StackStatus::Ok as i32
    })
}

/// Copy the top element to `dst` and remove it.
///
/// Returns `STACK_EMPTY` without touching `dst` if there is no element.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkstack_pop(handle: u64, dst: *mut c_void) -> i32 {
    ffi_guard!({
        if dst.is_null() {
            return StackStatus::InvalidArgument as i32;
        }
        let mut table = ffi_lock!(STACKS);
        let Some(stack) = table.get_mut(handle) else {
            return StackStatus::InvalidHandle as i32;
        };
        if stack.is_empty() {
            return StackStatus::StackEmpty as i32;
        }
        let top = stack.peek();
        // SAFETY: dst points to `elem_size` writable bytes per caller contract.
        unsafe { std::ptr::copy(top.as_ptr(), dst.cast::<u8>(), top.len()) };
        stack.discard();
        StackStatus::Ok as i32
    })
}

/// Write the address of the top element to `out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkstack_peek(handle: u64, out: *mut *mut c_void) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return StackStatus::InvalidArgument as i32;
        }
        let mut table = ffi_lock!(STACKS);
        let Some(stack) = table.get_mut(handle) else {
            return StackStatus::InvalidHandle as i32;
        };
        if stack.is_empty() {
            return StackStatus::StackEmpty as i32;
        }
        write_out(out, stack.peek_mut().as_mut_ptr().cast::<c_void>());
        StackStatus::Ok as i32
    })
}

/// Remove the top element without reading it.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkstack_discard(handle: u64) -> i32 {
    ffi_guard!({
        let mut table = ffi_lock!(STACKS);
        let Some(stack) = table.get_mut(handle) else {
            return StackStatus::InvalidHandle as i32;
        };
        if stack.is_empty() {
            return StackStatus::StackEmpty as i32;
        }
        stack.discard();
        StackStatus::Ok as i32
    })
}

/// Remove every element, keeping chunk memory for reuse.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkstack_clear(handle: u64) -> i32 {
    ffi_guard!({
        let mut table = ffi_lock!(STACKS);
        let Some(stack) = table.get_mut(handle) else {
            return StackStatus::InvalidHandle as i32;
        };
        stack.clear();
        StackStatus::Ok as i32
    })
}

/// Number of elements, or 0 for an invalid handle.
///
/// Use [`chunkstack_count_get`] to tell the two apart.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkstack_count(handle: u64) -> usize {
    read_stack(handle, RawStack::len).unwrap_or(0)
}

/// Whether the stack is empty; `true` for an invalid handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkstack_is_empty(handle: u64) -> bool {
    read_stack(handle, RawStack::is_empty).unwrap_or(true)
}

fn read_stack<R>(handle: u64, f: impl FnOnce(&RawStack) -> R) -> Option<R> {
    let table = STACKS.lock().ok()?;
    table.get(handle).map(f)
}

fn get_field<T>(handle: u64, out: *mut T, f: impl FnOnce(&RawStack) -> T) -> i32 {
    if out.is_null() {
        return StackStatus::InvalidArgument as i32;
    }
    let table = ffi_lock!(STACKS);
    match table.get(handle) {
        Some(stack) => {
            write_out(out, f(stack));
            StackStatus::Ok as i32
        }
        None => StackStatus::InvalidHandle as i32,
    }
}

/// Write the element count to `out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkstack_count_get(handle: u64, out: *mut usize) -> i32 {
    ffi_guard!({ get_field(handle, out, RawStack::len) })
}

/// Write whether the stack is empty to `out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkstack_is_empty_get(handle: u64, out: *mut bool) -> i32 {
    ffi_guard!({ get_field(handle, out, RawStack::is_empty) })
}

/// Write the element size in bytes to `out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkstack_elem_size_get(handle: u64, out: *mut usize) -> i32 {
    ffi_guard!({ get_field(handle, out, RawStack::elem_size) })
}
