//! Container lifecycle and element FFI.
//!
//! Containers live in the global `ARRAYS` table and are addressed by
//! [`DaHandle`]. Elements are stored as bare `void*` values: the container
//! never reads through them and never frees them, so every handle still
//! stored at [`da_destroy`] time must already have been released by the
//! caller.
//!
//! The table lock is held for the whole of each call. Calls on different
//! containers are therefore serialised, which keeps one container's
//! mutation from interleaving with another's resize.

use std::os::raw::c_void;
use std::ptr;
use std::sync::Mutex;

use dynarr::{ArrayConfig, DynArray};
use tracing::debug;

use crate::handle::HandleTable;
use crate::status::DaStatus;

/// Opaque container handle. `0` never refers to a container.
pub type DaHandle = u64;

/// The absent container.
pub const DA_NULL_HANDLE: DaHandle = 0;

/// Caller-owned element address, stored but never dereferenced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(transparent)]
struct ElementHandle(*mut c_void);

// SAFETY: the array only moves the address value around; it never reads
// or writes through it, so no data is shared across threads by storing it.
#[allow(unsafe_code)]
unsafe impl Send for ElementHandle {}

type Array = DynArray<ElementHandle>;

static ARRAYS: Mutex<HandleTable<Array>> = Mutex::new(HandleTable::new());

/// C view of [`ArrayConfig`].
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DaConfig {
    /// Capacity floor.
    pub min_capacity: usize,
    /// Capacity multiplier on growth.
    pub growth_factor: usize,
    /// Occupancy fraction that triggers a shrink.
    pub shrink_threshold: f64,
    /// Capacity multiplier on shrink.
    pub shrink_factor: f64,
}

impl From<DaConfig> for ArrayConfig {
    fn from(c: DaConfig) -> Self {
        ArrayConfig {
            min_capacity: c.min_capacity,
            growth_factor: c.growth_factor,
            shrink_threshold: c.shrink_threshold,
            shrink_factor: c.shrink_factor,
        }
    }
}

impl From<&ArrayConfig> for DaConfig {
    fn from(c: &ArrayConfig) -> Self {
        DaConfig {
            min_capacity: c.min_capacity,
            growth_factor: c.growth_factor,
            shrink_threshold: c.shrink_threshold,
            shrink_factor: c.shrink_factor,
        }
    }
}

/// Run `f` on the container behind `handle`.
///
/// Returns `None` if the handle is absent or the table is poisoned.
fn with_array<R>(handle: DaHandle, f: impl FnOnce(&mut Array) -> R) -> Option<R> {
    let mut table = ARRAYS.lock().ok()?;
    table.get_mut(handle).map(f)
}

#[allow(unsafe_code)]
fn create(config: ArrayConfig, capacity: usize, out: *mut DaHandle) -> i32 {
    if out.is_null() {
        return DaStatus::InvalidArgument as i32;
    }
    let array = match Array::with_config(config, capacity) {
        Ok(array) => array,
        Err(e) => return DaStatus::from(&e) as i32,
    };
    let capacity = array.capacity();
    let mut table = ffi_lock!(ARRAYS);
    let handle = table.insert(array);
    debug!(handle, capacity, live = table.live_count(), "container created");
    // SAFETY: `out` is non-null; caller guarantees it is aligned and writable.
    unsafe { *out = handle };
    DaStatus::Ok as i32
}

// ── FFI functions ───────────────────────────────────────────────

/// The default resize policy.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_config_default() -> DaConfig {
    DaConfig::from(&ArrayConfig::default())
}

/// Create an empty container with room for `max(capacity, 8)` elements.
///
/// Writes the handle to `*out` and returns `DA_STATUS_OK`. Returns
/// `AllocationFailure` if storage cannot be reserved, or
/// `InvalidArgument` if `out` is null; `*out` is untouched on failure.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_create(capacity: usize, out: *mut DaHandle) -> i32 {
    ffi_guard!({ create(ArrayConfig::default(), capacity, out) })
}

/// Create an empty container with a custom resize policy.
///
/// Returns `InvalidArgument` if `config` or `out` is null or the policy
/// fails validation.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_create_with_config(
    config: *const DaConfig,
    capacity: usize,
    out: *mut DaHandle,
) -> i32 {
    ffi_guard!({
        if config.is_null() {
            return DaStatus::InvalidArgument as i32;
        }
        // SAFETY: `config` is non-null; caller guarantees it points to a valid DaConfig.
        let config = unsafe { *config };
        create(config.into(), capacity, out)
    })
}

/// Append `item` at index `size`, growing storage if full.
///
/// `item` is stored as-is, including null. Returns `AllocationFailure`
/// if growth fails (the container is unchanged) or `InvalidArgument` for
/// an absent container.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_push(handle: DaHandle, item: *mut c_void) -> i32 {
    ffi_guard!({
        match with_array(handle, |a| a.push(ElementHandle(item))) {
            Some(Ok(())) => DaStatus::Ok as i32,
            Some(Err(rejected)) => DaStatus::from(rejected.error()) as i32,
            None => DaStatus::InvalidArgument as i32,
        }
    })
}

/// Element handle at `index`, or null if `index >= size` or the
/// container is absent.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_get(handle: DaHandle, index: usize) -> *mut c_void {
    ffi_guard_or!(ptr::null_mut(), {
        with_array(handle, |a| a.get(index).map(|e| e.0))
            .flatten()
            .unwrap_or(ptr::null_mut())
    })
}

/// Overwrite the element handle at `index`.
///
/// The previous handle is dropped from the container without being
/// freed; retrieve it with [`da_get`] first if it still needs releasing.
/// Returns `OutOfBounds` if `index >= size`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_set(handle: DaHandle, index: usize, item: *mut c_void) -> i32 {
    ffi_guard!({
        match with_array(handle, |a| a.set(index, ElementHandle(item))) {
            Some(Ok(_previous)) => DaStatus::Ok as i32,
            Some(Err(rejected)) => DaStatus::from(rejected.error()) as i32,
            None => DaStatus::InvalidArgument as i32,
        }
    })
}

/// Remove the element at `index`, shifting later elements left, and
/// return its handle to the caller.
///
/// Returns null if `index >= size` or the container is absent. Storage
/// may shrink afterwards; a failed shrink does not affect the result.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_delete(handle: DaHandle, index: usize) -> *mut c_void {
    ffi_guard_or!(ptr::null_mut(), {
        with_array(handle, |a| a.remove(index).map(|e| e.0))
            .flatten()
            .unwrap_or(ptr::null_mut())
    })
}

/// Number of live elements, or 0 for an absent container.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_size(handle: DaHandle) -> usize {
    ffi_guard_or!(0, { with_array(handle, |a| a.len()).unwrap_or(0) })
}

/// Reserved slot count, or 0 for an absent container.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_capacity(handle: DaHandle) -> usize {
    ffi_guard_or!(0, { with_array(handle, |a| a.capacity()).unwrap_or(0) })
}

/// Release a container's storage.
///
/// Stored element handles are not visited or freed. Destroying an absent
/// or already-destroyed container is a no-op that returns
/// `InvalidArgument`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_destroy(handle: DaHandle) -> i32 {
    ffi_guard!({
        let mut table = ffi_lock!(ARRAYS);
        match table.remove(handle) {
            Some(array) => {
                debug!(
                    handle,
                    abandoned = array.len(),
                    live = table.live_count(),
                    "container destroyed"
                );
                DaStatus::Ok as i32
            }
            None => DaStatus::InvalidArgument as i32,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(v: usize) -> *mut c_void {
        v as *mut c_void
    }

    fn new_array(capacity: usize) -> DaHandle {
        let mut h = DA_NULL_HANDLE;
        assert_eq!(da_create(capacity, &mut h), DaStatus::Ok as i32);
        assert_ne!(h, DA_NULL_HANDLE);
        h
    }

    fn contents(h: DaHandle) -> Vec<usize> {
        (0..da_size(h)).map(|i| da_get(h, i) as usize).collect()
    }

    #[test]
    fn exports_have_c_abi_signatures() {
        let config_default: extern "C" fn() -> DaConfig = da_config_default;
        let create: extern "C" fn(usize, *mut DaHandle) -> i32 = da_create;
        let create_with_config: extern "C" fn(*const DaConfig, usize, *mut DaHandle) -> i32 =
            da_create_with_config;
        let push: extern "C" fn(DaHandle, *mut c_void) -> i32 = da_push;
        let get: extern "C" fn(DaHandle, usize) -> *mut c_void = da_get;
        let set: extern "C" fn(DaHandle, usize, *mut c_void) -> i32 = da_set;
        let delete: extern "C" fn(DaHandle, usize) -> *mut c_void = da_delete;
        let size: extern "C" fn(DaHandle) -> usize = da_size;
        let capacity: extern "C" fn(DaHandle) -> usize = da_capacity;
        let destroy: extern "C" fn(DaHandle) -> i32 = da_destroy;

        let mut h = DA_NULL_HANDLE;
        assert_eq!(create(0, &mut h), DaStatus::Ok as i32);
        assert_eq!(destroy(h), DaStatus::Ok as i32);

        let config = config_default();
        assert_eq!(create_with_config(&config, 0, &mut h), DaStatus::Ok as i32);
        assert_eq!(push(h, addr(1)), DaStatus::Ok as i32);
        assert_eq!(set(h, 0, addr(2)), DaStatus::Ok as i32);
        assert_eq!(get(h, 0) as usize, 2);
        assert_eq!((size(h), capacity(h)), (1, 8));
        assert_eq!(delete(h, 0) as usize, 2);
        assert_eq!(destroy(h), DaStatus::Ok as i32);
    }

    #[test]
    fn full_lifecycle_through_every_export() {
        let config = da_config_default();
        let mut h = DA_NULL_HANDLE;
        assert_eq!(da_create_with_config(&config, 0, &mut h), DaStatus::Ok as i32);
        assert_eq!(da_destroy(h), DaStatus::Ok as i32);

        let h = new_array(0);
        assert_eq!(da_push(h, addr(1)), DaStatus::Ok as i32);
        assert_eq!(da_push(h, addr(2)), DaStatus::Ok as i32);
        assert_eq!(da_set(h, 0, addr(10)), DaStatus::Ok as i32);
        assert_eq!(da_get(h, 0) as usize, 10);
        assert_eq!(da_delete(h, 1) as usize, 2);
        assert_eq!((da_size(h), da_capacity(h)), (1, 8));
        assert_eq!(da_destroy(h), DaStatus::Ok as i32);
    }

    #[test]
    fn create_raises_capacity_to_floor() {
        let h = new_array(4);
        assert_eq!(da_size(h), 0);
        assert_eq!(da_capacity(h), 8);
        assert_eq!(da_destroy(h), DaStatus::Ok as i32);
    }

    #[test]
    fn create_with_null_out_is_invalid_argument() {
        assert_eq!(
            da_create(8, ptr::null_mut()),
            DaStatus::InvalidArgument as i32
        );
    }

    #[test]
    fn create_with_unsatisfiable_capacity_reports_allocation_failure() {
        let mut h = 12345;
        assert_eq!(
            da_create(usize::MAX, &mut h),
            DaStatus::AllocationFailure as i32
        );
        assert_eq!(h, 12345, "out must not be written on error");
    }

    #[test]
    fn five_users_scenario() {
        let h = new_array(4);
        for v in [100, 200, 300, 400, 500] {
            assert_eq!(da_push(h, addr(v)), DaStatus::Ok as i32);
        }
        assert_eq!(da_size(h), 5);
        assert!(da_capacity(h) >= 8);

        assert_eq!(da_delete(h, 2) as usize, 300);
        assert_eq!(contents(h), vec![100, 200, 400, 500]);
        assert!(da_get(h, 10).is_null());

        while !da_delete(h, 0).is_null() {}
        assert_eq!(da_size(h), 0);
        assert_eq!(da_destroy(h), DaStatus::Ok as i32);
    }

    #[test]
    fn ninth_push_doubles_capacity() {
        let h = new_array(8);
        for v in 1..=8 {
            da_push(h, addr(v));
        }
        assert_eq!((da_size(h), da_capacity(h)), (8, 8));
        da_push(h, addr(9));
        assert_eq!((da_size(h), da_capacity(h)), (9, 16));
        da_destroy(h);
    }

    #[test]
    fn set_overwrites_without_touching_old_handle() {
        let h = new_array(0);
        da_push(h, addr(1));
        da_push(h, addr(2));
        assert_eq!(da_set(h, 1, addr(20)), DaStatus::Ok as i32);
        assert_eq!(contents(h), vec![1, 20]);
        assert_eq!(da_set(h, 2, addr(3)), DaStatus::OutOfBounds as i32);
        assert_eq!(contents(h), vec![1, 20]);
        da_destroy(h);
    }

    #[test]
    fn null_items_are_stored() {
        let h = new_array(0);
        da_push(h, ptr::null_mut());
        da_push(h, addr(7));
        assert_eq!(da_size(h), 2);
        assert!(da_get(h, 0).is_null());
        assert_eq!(da_get(h, 1) as usize, 7);
        da_destroy(h);
    }

    #[test]
    fn absent_container_signals() {
        assert_eq!(
            da_push(DA_NULL_HANDLE, addr(1)),
            DaStatus::InvalidArgument as i32
        );
        assert_eq!(
            da_set(DA_NULL_HANDLE, 0, addr(1)),
            DaStatus::InvalidArgument as i32
        );
        assert!(da_get(DA_NULL_HANDLE, 0).is_null());
        assert!(da_delete(DA_NULL_HANDLE, 0).is_null());
        assert_eq!(da_size(DA_NULL_HANDLE), 0);
        assert_eq!(da_capacity(DA_NULL_HANDLE), 0);
        assert_eq!(da_destroy(DA_NULL_HANDLE), DaStatus::InvalidArgument as i32);
    }

    #[test]
    fn destroyed_handle_is_absent_and_double_destroy_is_noop() {
        let h = new_array(0);
        da_push(h, addr(1));
        assert_eq!(da_destroy(h), DaStatus::Ok as i32);

        assert_eq!(da_size(h), 0);
        assert!(da_get(h, 0).is_null());
        assert_eq!(da_push(h, addr(2)), DaStatus::InvalidArgument as i32);
        assert_eq!(da_destroy(h), DaStatus::InvalidArgument as i32);
    }

    #[test]
    #[allow(unsafe_code)]
    fn destroy_leaves_caller_memory_alone() {
        let boxed: Vec<*mut c_void> = (0..3u64)
            .map(|v| Box::into_raw(Box::new(v)) as *mut c_void)
            .collect();
        let h = new_array(0);
        for &p in &boxed {
            da_push(h, p);
        }
        da_destroy(h);

        for p in boxed {
            // SAFETY: each pointer came from Box::into_raw above and is freed once.
            let value = unsafe { Box::from_raw(p as *mut u64) };
            assert!(*value < 3);
        }
    }

    #[test]
    fn custom_config_round_trip() {
        let mut config = da_config_default();
        assert_eq!(config.min_capacity, 8);
        assert_eq!(config.growth_factor, 2);
        config.min_capacity = 2;

        let mut h = DA_NULL_HANDLE;
        assert_eq!(
            da_create_with_config(&config, 0, &mut h),
            DaStatus::Ok as i32
        );
        assert_eq!(da_capacity(h), 2);
        da_push(h, addr(1));
        da_push(h, addr(2));
        da_push(h, addr(3));
        assert_eq!(da_capacity(h), 4);
        da_destroy(h);
    }

    #[test]
    fn invalid_config_rejected() {
        let config = DaConfig {
            growth_factor: 1,
            ..da_config_default()
        };
        let mut h = DA_NULL_HANDLE;
        assert_eq!(
            da_create_with_config(&config, 0, &mut h),
            DaStatus::InvalidArgument as i32
        );
        assert_eq!(h, DA_NULL_HANDLE);
        assert_eq!(
            da_create_with_config(ptr::null(), 0, &mut h),
            DaStatus::InvalidArgument as i32
        );
    }

    #[test]
    fn shrink_follows_deletes() {
        let h = new_array(0);
        for v in 1..=33 {
            da_push(h, addr(v));
        }
        assert_eq!(da_capacity(h), 64);
        while da_size(h) > 16 {
            da_delete(h, 0);
        }
        assert_eq!(da_capacity(h), 32);
        while da_size(h) > 1 {
            da_delete(h, 0);
        }
        assert_eq!(da_capacity(h), 8);
        assert_eq!(contents(h), vec![33]);
        da_destroy(h);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn scan_after_pushes_matches_push_order(
                values in proptest::collection::vec(1usize..usize::MAX, 0..100),
            ) {
                let h = new_array(0);
                for &v in &values {
                    prop_assert_eq!(da_push(h, addr(v)), DaStatus::Ok as i32);
                    prop_assert!(da_capacity(h) >= da_size(h));
                }
                prop_assert_eq!(contents(h), values);
                prop_assert_eq!(da_destroy(h), DaStatus::Ok as i32);
            }

            #[test]
            fn delete_shifts_tail_down_by_one(
                len in 1usize..50,
                pick in any::<proptest::sample::Index>(),
            ) {
                let h = new_array(0);
                for v in 1..=len {
                    da_push(h, addr(v));
                }
                let before = contents(h);
                let i = pick.index(len);

                prop_assert_eq!(da_delete(h, i) as usize, before[i]);
                let after = contents(h);
                prop_assert_eq!(after.len(), len - 1);
                prop_assert_eq!(&after[..i], &before[..i]);
                prop_assert_eq!(&after[i..], &before[i + 1..]);
                da_destroy(h);
            }
        }
    }
}
