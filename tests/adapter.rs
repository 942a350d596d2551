use std::ffi::c_void;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bitmap_buffer::native::{AlphaInfo, ContextDescriptor};
use bitmap_buffer::*;
use euclid::default::{Rect, Size2D};

/// Leaks a zeroed buffer, and returns a release closure that frees it again and counts calls.
fn leaked_buffer(len: usize, calls: &Arc<AtomicUsize>) -> (*mut u8, ReleaseFn) {
  let ptr = Box::into_raw(vec![0u8; len].into_boxed_slice()) as *mut u8;
  let calls = calls.clone();
  let addr = ptr as usize;
  let release: ReleaseFn = Box::new(move |data: *mut c_void| {
    assert_eq!(data as usize, addr);
    calls.fetch_add(1, Ordering::SeqCst);
    drop(unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(data as *mut u8, len)) });
  });
  (ptr, release)
}

#[test]
fn draw_then_wrap_buffer_as_image() {
  let calls = Arc::new(AtomicUsize::new(0));
  let logical = Size2D::new(2.0, 1.5);
  let scale = 2.0;

  let layout = context_with_logical_size(logical, false, scale).unwrap();
  assert_eq!(layout.size(), Size2D::new(4, 3));
  let (ptr, release) = leaked_buffer(layout.bytes(), &calls);

  // Paint into the leaked buffer through a context over it.
  let mut paint = context_with_logical_size(Size2D::new(1.0, 1.0), false, 1.0).unwrap();
  paint.data_mut().copy_from_slice(&[40, 30, 20, 255]);
  let red = paint.make_image().unwrap();
  {
    let descriptor = ContextDescriptor {
      width: layout.width(),
      height: layout.height(),
      bits_per_component: layout.bits_per_component(),
      bytes_per_row: layout.bytes_per_row(),
      color_space: layout.color_space(),
      bitmap_info: layout.bitmap_info(),
    };
    let mut ctx = unsafe { BitmapContext::with_external_buffer(ptr, descriptor) }.unwrap();
    ctx.draw_image(&red, Rect::from_size(Size2D::new(4.0, 3.0)));
  }

  let image = unsafe { image_from_raw_parts(|| ptr, || layout, Some(release)) }.unwrap();
  assert_eq!(image.size(), Size2D::new(4, 3));
  assert_eq!(image.bytes_per_pixel(), 4);
  assert_eq!(image.bytes_per_row(), 16);
  assert_eq!(image.bytes(), 48);
  assert!(image.data_provider().bytes().chunks(4).all(|px| px == [40, 30, 20, 255]));

  // Copying the image into a new context reorders the channels to premultiplied first.
  let copy = image.to_context().unwrap();
  assert_eq!(copy.size(), image.size());
  assert!(copy.data().chunks(4).all(|px| px == [255, 20, 30, 40]));

  assert_eq!(calls.load(Ordering::SeqCst), 0);
  drop(image);
  assert_eq!(calls.load(Ordering::SeqCst), 1);
  drop(copy);
  assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn release_runs_on_the_thread_dropping_the_last_image() {
  let calls = Arc::new(AtomicUsize::new(0));
  let layout = context_with_logical_size(Size2D::new(3.0, 3.0), true, 1.0).unwrap();
  let (ptr, release) = leaked_buffer(layout.bytes(), &calls);
  let image = unsafe { image_from_raw_parts(|| ptr, || layout, Some(release)) }.unwrap();

  let clone = image.clone();
  drop(image);
  std::thread::spawn(move || {
    assert_eq!(clone.width(), 3);
    drop(clone);
  })
  .join()
  .unwrap();
  assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn context_without_color_space_makes_no_image() {
  let calls = Arc::new(AtomicUsize::new(0));
  let mask = BitmapContext::new(ContextDescriptor {
    width: 4,
    height: 4,
    bits_per_component: 8,
    bytes_per_row: 0,
    color_space: None,
    bitmap_info: AlphaInfo::Only.into(),
  })
  .unwrap();
  let (ptr, release) = leaked_buffer(mask.bytes(), &calls);

  let image = unsafe { image_from_raw_parts(|| ptr, || mask, Some(release)) };
  assert!(image.is_none());
  assert_eq!(calls.load(Ordering::SeqCst), 0);
  // The release closure was dropped unused, so the buffer is still ours to free.
  drop(unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, 16)) });
}

#[test]
fn sized_image_wraps_context_snapshot() {
  let ctx = context_with_logical_size(Size2D::new(5.0, 2.0), true, 2.0).unwrap();
  let image = ctx.make_image().unwrap();
  let sized = SizedImage::with_size(image, Size2D::new(5.0, 2.0));
  assert_eq!((sized.width(), sized.height()), (5.0, 2.0));
  assert_eq!(sized.image().size(), Size2D::new(10, 4));
}
