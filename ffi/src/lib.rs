//! C-ABI wrapper around `amphibians-core`.
//!
//! # Overview
//! Exposes the amphibians view model through `extern "C"` functions so a
//! native host (the presentation layer) can create it, read state snapshots,
//! and trigger retries without linking to Rust's async runtime directly.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Each `FfiViewModel` owns a multi-threaded tokio runtime; fetches run
//!   there while the host thread only reads snapshots.
//! - The host owns all returned pointers and must call the matching
//!   `amphibians_*_free` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use amphibians_core::{AmphibiansViewModel, ClientConfig, NetworkAmphibiansRepository};
use tracing_subscriber::EnvFilter;

use types::*;

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Install a stderr `tracing` subscriber.
///
/// `filter` uses `RUST_LOG` syntax; null means "use `RUST_LOG`, else `info`".
/// Returns false if the filter is invalid or a subscriber is already set.
#[unsafe(no_mangle)]
pub extern "C" fn amphibians_init_logging(filter: *const c_char) -> bool {
    catch_unwind(|| {
        let filter = if filter.is_null() {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        } else {
            let directives = unsafe { CStr::from_ptr(filter) }.to_str().unwrap_or("");
            match EnvFilter::try_new(directives) {
                Ok(f) => f,
                Err(_) => return false,
            }
        };
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok()
    })
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// View model lifecycle
// ---------------------------------------------------------------------------

/// Create a view model and start the initial fetch.
///
/// `base_url` may be null, in which case the configuration comes from
/// `AMPHIBIANS_BASE_URL` / `AMPHIBIANS_TIMEOUT_SECS` or the defaults. A
/// non-null `base_url` wins over `AMPHIBIANS_BASE_URL`, which is then not
/// read at all.
/// Returns null if the configuration is invalid, the runtime cannot be
/// started, or an internal panic occurs. The caller must free the returned
/// pointer with `amphibians_view_model_free`.
#[unsafe(no_mangle)]
pub extern "C" fn amphibians_view_model_new(base_url: *const c_char) -> *mut FfiViewModel {
    catch_unwind(|| {
        let config = if base_url.is_null() {
            ClientConfig::from_env()
        } else {
            let url = unsafe { CStr::from_ptr(base_url) }.to_str().unwrap_or("");
            ClientConfig::from_env_with_base_url(url)
        };
        let config = match config {
            Ok(c) => c,
            Err(err) => {
                tracing::error!(error = %err, "invalid amphibians client configuration");
                return std::ptr::null_mut();
            }
        };

        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("amphibians")
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(err) => {
                tracing::error!(error = %err, "failed to start runtime");
                return std::ptr::null_mut();
            }
        };

        let repository = Arc::new(NetworkAmphibiansRepository::from_config(&config));
        let (inner, _initial) = AmphibiansViewModel::launch(repository, runtime.handle().clone());
        tracing::info!(base_url = %config.base_url, "view model created");
        Box::into_raw(Box::new(FfiViewModel { inner, runtime }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a view model created by `amphibians_view_model_new`, abandoning any
/// fetch still in flight. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn amphibians_view_model_free(vm: *mut FfiViewModel) {
    if !vm.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            let vm = unsafe { Box::from_raw(vm) };
            let FfiViewModel { inner, runtime } = *vm;
            drop(inner);
            runtime.shutdown_background();
        }));
    }
}

// ---------------------------------------------------------------------------
// State and retry
// ---------------------------------------------------------------------------

/// Snapshot the current view state.
///
/// Returns null if `vm` is null. The caller must free the returned pointer
/// with `amphibians_free_state`.
#[unsafe(no_mangle)]
pub extern "C" fn amphibians_view_model_state(vm: *const FfiViewModel) -> *mut FfiViewState {
    catch_unwind(AssertUnwindSafe(|| {
        if vm.is_null() {
            return std::ptr::null_mut();
        }
        let vm = unsafe { &*vm };
        FfiViewState::from_core(vm.inner.current_state())
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Start another fetch. The current state stays visible until it resolves.
///
/// Returns false if `vm` is null.
#[unsafe(no_mangle)]
pub extern "C" fn amphibians_view_model_retry(vm: *const FfiViewModel) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if vm.is_null() {
            return false;
        }
        let vm = unsafe { &*vm };
        // Fire-and-forget: unhandled failures are logged by the task.
        drop(vm.inner.retry());
        true
    }))
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a snapshot returned by `amphibians_view_model_state`. Safe to call
/// with null.
#[unsafe(no_mangle)]
pub extern "C" fn amphibians_free_state(state: *mut FfiViewState) {
    if state.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe { FfiViewState::free(state) });
}

#[cfg(test)]
mod tests {
    use std::ffi::CString;
    use std::time::{Duration, Instant};

    use amphibians_core::config::BASE_URL_ENV;
    use mock_server::{seed_catalog, Behavior, MockState};

    use super::*;

    fn start_server() -> String {
        start_server_with_state(Arc::new(MockState::default()))
    }

    /// Start the mock server on a random port and return its base URL.
    fn start_server_with_state(state: Arc<MockState>) -> String {
        let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = std_listener.local_addr().unwrap();
        std_listener.set_nonblocking(true).unwrap();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
                mock_server::run_with_state(listener, state).await
            })
            .unwrap();
        });

        format!("http://{addr}")
    }

    fn unused_port_url() -> String {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        format!("http://127.0.0.1:{port}")
    }

    /// Poll snapshots until the tag is no longer `Loading` or 10s pass.
    fn wait_settled(vm: *const FfiViewModel) -> *mut FfiViewState {
        wait_for(vm, |s| s.tag != FfiViewStateTag::Loading)
    }

    /// Poll snapshots until `done` holds or 10s pass; returns the last one.
    fn wait_for(vm: *const FfiViewModel, done: impl Fn(&FfiViewState) -> bool) -> *mut FfiViewState {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            let state = amphibians_view_model_state(vm);
            assert!(!state.is_null());
            if done(unsafe { &*state }) || Instant::now() > deadline {
                return state;
            }
            amphibians_free_state(state);
            std::thread::sleep(Duration::from_millis(20));
        }
    }

    fn c_str(ptr: *const c_char) -> &'static str {
        unsafe { CStr::from_ptr(ptr) }.to_str().unwrap()
    }

    #[test]
    fn view_model_loads_seed_catalog() {
        let url = CString::new(start_server()).unwrap();
        let vm = amphibians_view_model_new(url.as_ptr());
        assert!(!vm.is_null());

        let state = wait_settled(vm);
        let s = unsafe { &*state };
        assert_eq!(s.tag, FfiViewStateTag::Success);
        assert_eq!(s.len as usize, mock_server::seed_catalog().len());

        let items = unsafe { std::slice::from_raw_parts(s.items, s.len as usize) };
        let expected = mock_server::seed_catalog();
        for (item, want) in items.iter().zip(&expected) {
            assert_eq!(c_str(item.name), want.name);
            assert_eq!(c_str(item.kind), want.kind);
            assert_eq!(c_str(item.description), want.description);
            assert_eq!(c_str(item.img_src), want.img_src);
        }

        amphibians_free_state(state);
        amphibians_view_model_free(vm);
    }

    #[test]
    fn unreachable_server_settles_on_error_and_retry_keeps_it() {
        let url = CString::new(unused_port_url()).unwrap();
        let vm = amphibians_view_model_new(url.as_ptr());
        assert!(!vm.is_null());

        let state = wait_settled(vm);
        let s = unsafe { &*state };
        assert_eq!(s.tag, FfiViewStateTag::Error);
        assert!(s.items.is_null());
        assert_eq!(s.len, 0);
        amphibians_free_state(state);

        assert!(amphibians_view_model_retry(vm));
        std::thread::sleep(Duration::from_millis(200));
        let state = amphibians_view_model_state(vm);
        assert_eq!(unsafe { (*state).tag }, FfiViewStateTag::Error);

        amphibians_free_state(state);
        amphibians_view_model_free(vm);
    }

    #[test]
    fn retry_issues_a_new_request_and_publishes_its_result() {
        let first = vec![mock_server::Amphibian::new("Toad C", "Toad", "d3", "u3")];
        let server = Arc::new(MockState::new(Behavior::Serve(first)));
        let url = CString::new(start_server_with_state(server.clone())).unwrap();
        let vm = amphibians_view_model_new(url.as_ptr());
        assert!(!vm.is_null());

        let state = wait_settled(vm);
        let s = unsafe { &*state };
        assert_eq!(s.tag, FfiViewStateTag::Success);
        assert_eq!(s.len, 1);
        amphibians_free_state(state);
        assert_eq!(server.hits(), 1);

        *server.behavior.blocking_write() = Behavior::Serve(seed_catalog());
        assert!(amphibians_view_model_retry(vm));

        let want = seed_catalog().len() as u32;
        let state = wait_for(vm, |s| s.len == want);
        let s = unsafe { &*state };
        assert_eq!(s.tag, FfiViewStateTag::Success);
        assert_eq!(s.len, want);
        let items = unsafe { std::slice::from_raw_parts(s.items, s.len as usize) };
        assert_eq!(c_str(items[0].name), seed_catalog()[0].name);
        assert_eq!(server.hits(), 2);

        amphibians_free_state(state);
        amphibians_view_model_free(vm);
    }

    // The only test that touches AMPHIBIANS_BASE_URL; every other test passes
    // an explicit URL, which never reads it.
    #[test]
    fn base_url_variable_applies_only_without_explicit_url() {
        let server_url = start_server();

        std::env::set_var(BASE_URL_ENV, "garbage");
        let explicit = CString::new(unused_port_url()).unwrap();
        let vm = amphibians_view_model_new(explicit.as_ptr());
        assert!(!vm.is_null());
        amphibians_view_model_free(vm);
        assert!(amphibians_view_model_new(std::ptr::null()).is_null());

        std::env::set_var(BASE_URL_ENV, &server_url);
        let vm = amphibians_view_model_new(std::ptr::null());
        std::env::remove_var(BASE_URL_ENV);
        assert!(!vm.is_null());

        let state = wait_settled(vm);
        let s = unsafe { &*state };
        assert_eq!(s.tag, FfiViewStateTag::Success);
        assert_eq!(s.len as usize, seed_catalog().len());

        amphibians_free_state(state);
        amphibians_view_model_free(vm);
    }

    #[test]
    fn invalid_base_url_returns_null() {
        let url = CString::new("localhost:3000").unwrap();
        assert!(amphibians_view_model_new(url.as_ptr()).is_null());
    }

    #[test]
    fn loading_snapshot_has_no_items() {
        let ptr = FfiViewState::from_core(amphibians_core::ViewState::Loading);
        let s = unsafe { &*ptr };
        assert_eq!(s.tag, FfiViewStateTag::Loading);
        assert!(s.items.is_null());
        assert_eq!(s.len, 0);
        amphibians_free_state(ptr);
    }

    #[test]
    fn empty_success_snapshot_has_null_items() {
        let ptr = FfiViewState::from_core(amphibians_core::ViewState::Success(Vec::new()));
        let s = unsafe { &*ptr };
        assert_eq!(s.tag, FfiViewStateTag::Success);
        assert!(s.items.is_null());
        assert_eq!(s.len, 0);
        amphibians_free_state(ptr);
    }

    #[test]
    fn interior_nul_is_dropped() {
        let ptr = FfiViewState::from_core(amphibians_core::ViewState::Success(vec![
            amphibians_core::Amphibian::new("Fr\0og", "Frog", "d", "u"),
        ]));
        let s = unsafe { &*ptr };
        let items = unsafe { std::slice::from_raw_parts(s.items, s.len as usize) };
        assert_eq!(c_str(items[0].name), "Frog");
        amphibians_free_state(ptr);
    }

    #[test]
    fn null_arguments_are_tolerated() {
        assert!(amphibians_view_model_state(std::ptr::null()).is_null());
        assert!(!amphibians_view_model_retry(std::ptr::null()));
        amphibians_view_model_free(std::ptr::null_mut());
        amphibians_free_state(std::ptr::null_mut());
    }

    #[test]
    fn init_logging_rejects_bad_filter() {
        let filter = CString::new("amphibians=[").unwrap();
        assert!(!amphibians_init_logging(filter.as_ptr()));
    }
}
