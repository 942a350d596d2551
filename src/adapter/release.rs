use alloc::boxed::Box;
use core::ffi::c_void;

/// A closure called with the pixel buffer when an image no longer needs it.
pub type ReleaseFn = Box<dyn FnOnce(*mut c_void) + Send + 'static>;

/// Moves `release` behind an opaque pointer that can be handed to a `DataProvider` as its info
/// token. Returns null for `None`.
///
/// The returned pointer owns the closure, and must be given back to `take_release()` exactly once.
pub(crate) fn into_info(release: Option<ReleaseFn>) -> *mut c_void {
  match release {
    // The closure is a fat pointer, so it's boxed a second time to fit in a thin one.
    Some(f) => Box::into_raw(Box::new(f)) as *mut c_void,
    None => core::ptr::null_mut(),
  }
}

/// Takes back ownership of the closure behind `info`.
///
/// # Safety
///
/// `info` must have come from `into_info()`, and must not have been passed here before.
pub(crate) unsafe fn take_release(info: *mut c_void) -> Option<ReleaseFn> {
  if info.is_null() {
    None
  } else {
    Some(*Box::from_raw(info as *mut ReleaseFn))
  }
}

/// The `ReleaseDataCallback` given to data providers built by this crate.
///
/// The `info` token is consumed here, so the closure it holds runs at most once.
pub(crate) unsafe extern "C" fn release_trampoline(
  info: *mut c_void,
  data: *const c_void,
  _size: usize,
) {
  if let Some(release) = take_release(info) {
    tracing::trace!("running release callback for {:p}", data);
    release(data as *mut c_void)
  }
}
