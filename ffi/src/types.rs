//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, pointer + length instead of `Vec`, and
//! a tag enum with explicit discriminants instead of a Rust enum. Conversion
//! and release helpers live here to keep `lib.rs` focused on the
//! `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use amphibians_core::{Amphibian, AmphibiansViewModel, ViewState};

/// Opaque handle to a view model and the runtime its fetches run on.
/// C callers receive a pointer to this and pass it back into every call.
pub struct FfiViewModel {
    // Declared first so it is dropped, and its fetches abandoned, before the
    // runtime shuts down.
    pub(crate) inner: AmphibiansViewModel,
    pub(crate) runtime: tokio::runtime::Runtime,
}

/// Which variant a `FfiViewState` snapshot holds.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiViewStateTag {
    Loading = 0,
    Success = 1,
    Error = 2,
}

/// One amphibian exposed to C. All strings are NUL-terminated UTF-8.
#[repr(C)]
pub struct FfiAmphibian {
    pub name: *mut c_char,
    pub kind: *mut c_char,
    pub description: *mut c_char,
    pub img_src: *mut c_char,
}

/// Snapshot of the view state.
///
/// `items` and `len` are only meaningful when `tag` is `Success`; otherwise
/// `items` is null and `len` is 0. A `Success` with an empty list also has a
/// null `items`.
#[repr(C)]
pub struct FfiViewState {
    pub tag: FfiViewStateTag,
    pub items: *mut FfiAmphibian,
    pub len: u32,
}

/// Convert to a C string, dropping interior NULs rather than failing.
fn c_string(s: String) -> *mut c_char {
    let s = if s.contains('\0') { s.replace('\0', "") } else { s };
    CString::new(s).unwrap_or_default().into_raw()
}

impl FfiAmphibian {
    fn from_core(amphibian: Amphibian) -> Self {
        Self {
            name: c_string(amphibian.name),
            kind: c_string(amphibian.kind),
            description: c_string(amphibian.description),
            img_src: c_string(amphibian.img_src),
        }
    }

    /// Free the strings owned by this item.
    ///
    /// # Safety
    /// Every pointer must come from `from_core` and not be freed already.
    unsafe fn free_fields(&self) {
        for ptr in [self.name, self.kind, self.description, self.img_src] {
            if !ptr.is_null() {
                drop(unsafe { CString::from_raw(ptr) });
            }
        }
    }
}

impl FfiViewState {
    /// Convert a core `ViewState` into a heap-allocated snapshot.
    pub(crate) fn from_core(state: ViewState) -> *mut Self {
        let snapshot = match state {
            ViewState::Loading => FfiViewState::empty(FfiViewStateTag::Loading),
            ViewState::Error => FfiViewState::empty(FfiViewStateTag::Error),
            ViewState::Success(amphibians) => {
                let len = amphibians.len() as u32;
                let items = if amphibians.is_empty() {
                    std::ptr::null_mut()
                } else {
                    let boxed: Box<[FfiAmphibian]> =
                        amphibians.into_iter().map(FfiAmphibian::from_core).collect();
                    Box::into_raw(boxed) as *mut FfiAmphibian
                };
                FfiViewState {
                    tag: FfiViewStateTag::Success,
                    items,
                    len,
                }
            }
        };
        Box::into_raw(Box::new(snapshot))
    }

    fn empty(tag: FfiViewStateTag) -> Self {
        Self {
            tag,
            items: std::ptr::null_mut(),
            len: 0,
        }
    }

    /// Release a snapshot produced by `from_core`, including its items.
    ///
    /// # Safety
    /// `state` must come from `from_core` and not be freed already.
    pub(crate) unsafe fn free(state: *mut Self) {
        let state = unsafe { Box::from_raw(state) };
        if !state.items.is_null() {
            let slice = std::ptr::slice_from_raw_parts_mut(state.items, state.len as usize);
            let items = unsafe { Box::from_raw(slice) };
            for item in items.iter() {
                unsafe { item.free_fields() };
            }
        }
    }
}
