//! C ABI for camera hosts.
//!
//! A host links the `cdylib`, forwards its capture callbacks to
//! [`spectra_process_frame`] and its UI events to the `spectra_set_*`
//! commands. All calls share one process-wide [`Pipeline`], created on
//! first use. Logging goes through `tracing`; installing a subscriber is
//! up to the host.
#![allow(unsafe_code)]
// Exported functions take raw host buffers and C strings.

use std::ffi::{CStr, c_char};
use std::path::Path;
use std::slice;
use std::sync::OnceLock;

use spectra_core::{ChromaLayout, Frame, Pipeline, PlaneView};

/// Returned by [`spectra_process_frame`] when the output was written.
pub const SPECTRA_FRAME_RENDERED: i32 = 1;
/// Returned by [`spectra_process_frame`] when the frame was skipped.
pub const SPECTRA_FRAME_DROPPED: i32 = 0;

static PIPELINE: OnceLock<Pipeline> = OnceLock::new();

/// The shared pipeline behind every exported call.
pub fn pipeline() -> &'static Pipeline {
    PIPELINE.get_or_init(|| {
        tracing::debug!("creating process-wide pipeline");
        Pipeline::default()
    })
}

/// Select the chroma layout by code: 0 unknown, 1 planar, 2 NV12, 3 NV21.
/// Other codes select unknown. Clears any pending planar swap.
#[unsafe(no_mangle)]
pub extern "C" fn spectra_set_chroma_layout(code: i32) {
    pipeline().set_chroma_layout(ChromaLayout::from_code(code));
}

/// Exchange the planar chroma planes until the next layout change.
#[unsafe(no_mangle)]
pub extern "C" fn spectra_set_planar_swap(swap: bool) {
    pipeline().set_planar_swap(swap);
}

/// Activate a registered filter. `"None"` selects bypass.
///
/// Returns `false` and keeps the current filter when the name is unknown,
/// null or not UTF-8.
///
/// # Safety
///
/// `name` must be null or point to a NUL-terminated string that stays
/// valid for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn spectra_set_active_filter(name: *const c_char) -> bool {
    // SAFETY: forwarded from the caller's contract.
    let Some(name) = (unsafe { c_str(name) }) else {
        return false;
    };
    pipeline().set_active_filter(name)
}

/// Load a `.cube` file and register it under `name`.
///
/// # Safety
///
/// `name` and `path` must each be null or point to a NUL-terminated string
/// that stays valid for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn spectra_register_cube_filter(
    name: *const c_char,
    path: *const c_char,
) -> bool {
    // SAFETY: forwarded from the caller's contract.
    let (Some(name), Some(path)) = (unsafe { c_str(name) }, unsafe { c_str(path) }) else {
        return false;
    };
    match pipeline().registry().load_cube(name, Path::new(path)) {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!(filter = name, path, %err, "failed to register filter");
            false
        }
    }
}

/// Convert one captured frame into packed pixels.
///
/// `u` is chroma-a and `v` chroma-b. Returns [`SPECTRA_FRAME_RENDERED`]
/// when `out` was fully written and [`SPECTRA_FRAME_DROPPED`] otherwise;
/// a dropped frame leaves `out` untouched. Null buffers, negative
/// dimensions or strides, and buffers too short for the given geometry
/// all drop the frame.
///
/// # Safety
///
/// Each non-null pointer must be valid for its stated length (`out_len`
/// counts `u32` pixels) for the duration of the call, and `out` must not
/// overlap any input buffer.
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn spectra_process_frame(
    y: *const u8,
    y_len: usize,
    u: *const u8,
    u_len: usize,
    v: *const u8,
    v_len: usize,
    width: i32,
    height: i32,
    y_row_stride: i32,
    u_row_stride: i32,
    v_row_stride: i32,
    u_pixel_stride: i32,
    v_pixel_stride: i32,
    out: *mut u32,
    out_len: usize,
) -> i32 {
    let Some(
        [width, height, y_row_stride, u_row_stride, v_row_stride, u_pixel_stride, v_pixel_stride],
    ) = non_negative([
        width,
        height,
        y_row_stride,
        u_row_stride,
        v_row_stride,
        u_pixel_stride,
        v_pixel_stride,
    ])
    else {
        tracing::debug!(width, height, "negative frame geometry, dropping frame");
        return SPECTRA_FRAME_DROPPED;
    };

    // SAFETY: each pointer is null or valid for its length per the caller's
    // contract, and `out` is disjoint from the inputs.
    let mut frame = unsafe {
        Frame {
            width,
            height,
            luma: plane(y, y_len, y_row_stride, 1),
            chroma_a: plane(u, u_len, u_row_stride, u_pixel_stride),
            chroma_b: plane(v, v_len, v_row_stride, v_pixel_stride),
            output: (!out.is_null()).then(|| slice::from_raw_parts_mut(out, out_len)),
        }
    };

    if pipeline().process(&mut frame).is_rendered() {
        SPECTRA_FRAME_RENDERED
    } else {
        SPECTRA_FRAME_DROPPED
    }
}

fn non_negative<const N: usize>(values: [i32; N]) -> Option<[usize; N]> {
    let mut out = [0usize; N];
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = usize::try_from(value).ok()?;
    }
    Some(out)
}

/// # Safety
///
/// `ptr` must be null or valid for reads of `len` bytes for `'a`.
unsafe fn plane<'a>(
    ptr: *const u8,
    len: usize,
    row_stride: usize,
    pixel_stride: usize,
) -> PlaneView<'a> {
    if ptr.is_null() {
        return PlaneView::missing();
    }
    // SAFETY: non-null and valid for `len` bytes per the function contract.
    let data = unsafe { slice::from_raw_parts(ptr, len) };
    PlaneView::new(data, row_stride, pixel_stride)
}

/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string valid for `'a`.
unsafe fn c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: non-null and NUL-terminated per the function contract.
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}
