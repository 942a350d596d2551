use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ffi::c_void;
use core::ptr::NonNull;

use super::error::Error;

/// The C function called when a `DataProvider` no longer needs the memory it was given.
///
/// It receives the `info` token and the `data` pointer that were passed to `DataProvider::new()`,
/// and the number of bytes the provider was given.
pub type ReleaseDataCallback =
  unsafe extern "C" fn(info: *mut c_void, data: *const c_void, size: usize);

enum Contents {
  /// Memory owned by someone else, handed back through `release` when the provider is dropped.
  External {
    info: *mut c_void,
    data: NonNull<u8>,
    size: usize,
    release: Option<ReleaseDataCallback>,
  },
  /// A copy of pixel data that the provider owns.
  Owned(Box<[u8]>),
}

/// Supplies the raw bytes behind an `Image`.
///
/// A provider is shared by every clone of the images built on it. When the last reference goes
/// away, the provider calls its release callback, exactly once.
pub struct DataProvider {
  contents: Contents,
}

// SAFETY: The external memory is only ever read, and the caller of `DataProvider::new()` promised
// that reading it and calling `release` is valid from any thread.
unsafe impl Send for DataProvider {}
unsafe impl Sync for DataProvider {}

impl DataProvider {
  /// Constructs a provider over `size` bytes at `data`.
  ///
  /// When the provider is dropped, `release` is called with `info` and `data`. If this function
  /// returns an error, the provider was never built and `release` will not be called, so the
  /// caller still owns both `info` and `data`.
  ///
  /// # Safety
  ///
  /// `data` must be valid for reads of `size` bytes, and must not be written to, until `release`
  /// is called. Reading `data` and calling `release` must be valid from any thread.
  pub unsafe fn new(
    info: *mut c_void,
    data: *const u8,
    size: usize,
    release: Option<ReleaseDataCallback>,
  ) -> Result<Arc<DataProvider>, Error> {
    let data = NonNull::new(data as *mut u8).ok_or(Error::NullData)?;
    if size == 0 {
      return Err(Error::EmptyData);
    }
    Ok(Arc::new(DataProvider {
      contents: Contents::External {
        info,
        data,
        size,
        release,
      },
    }))
  }

  /// Constructs a provider that owns a copy of pixel data.
  pub fn from_vec(bytes: Vec<u8>) -> Arc<DataProvider> {
    Arc::new(DataProvider {
      contents: Contents::Owned(bytes.into_boxed_slice()),
    })
  }

  /// The bytes supplied by the provider.
  pub fn bytes(&self) -> &[u8] {
    match &self.contents {
      Contents::External { data, size, .. } => unsafe {
        core::slice::from_raw_parts(data.as_ptr(), *size)
      },
      Contents::Owned(bytes) => &bytes[..],
    }
  }

  /// The number of bytes supplied by the provider.
  pub fn len(&self) -> usize {
    self.bytes().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl Drop for DataProvider {
  fn drop(&mut self) {
    if let Contents::External {
      info,
      data,
      size,
      release: Some(release),
    } = self.contents
    {
      tracing::trace!("releasing {} provider bytes at {:p}", size, data);
      unsafe { release(info, data.as_ptr() as *const c_void, size) }
    }
  }
}

impl core::fmt::Debug for DataProvider {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match &self.contents {
      Contents::External { data, size, .. } => {
        write!(f, "DataProvider(External({:p}, {}))", data, size)
      }
      Contents::Owned(bytes) => write!(f, "DataProvider(Owned({}))", bytes.len()),
    }
  }
}
