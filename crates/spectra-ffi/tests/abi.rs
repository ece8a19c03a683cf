//! Drives the exported functions the way a camera host would.
//!
//! The pipeline is process-wide, so only `test_host_session` issues
//! commands; the other tests exercise paths that drop before any
//! configuration is read.
#![allow(unsafe_code)]
// Calls into the exported functions pass raw pointers.

use std::ffi::CString;
use std::ptr;

use spectra_core::{ChromaLayout, ColorGrid};
use spectra_ffi::{
    SPECTRA_FRAME_DROPPED, SPECTRA_FRAME_RENDERED, pipeline, spectra_process_frame,
    spectra_register_cube_filter, spectra_set_active_filter, spectra_set_chroma_layout,
    spectra_set_planar_swap,
};

/// 2×2 NV21 frame as a camera stack exposes it: `u` and `v` views into one
/// interleaved VU buffer.
struct Nv21 {
    luma: [u8; 4],
    vu: [u8; 2],
}

impl Nv21 {
    fn process(&self, out: &mut [u32]) -> i32 {
        // SAFETY: every pointer is valid for its length during the call.
        unsafe {
            spectra_process_frame(
                self.luma.as_ptr(),
                self.luma.len(),
                self.vu[1..].as_ptr(),
                1,
                self.vu.as_ptr(),
                2,
                2,
                2,
                2,
                2,
                2,
                2,
                2,
                out.as_mut_ptr(),
                out.len(),
            )
        }
    }
}

#[test]
fn test_host_session() {
    let frame = Nv21 {
        luma: [16, 81, 145, 235],
        vu: [128, 128],
    };
    let mut out = [0u32; 4];

    spectra_set_chroma_layout(3);
    assert_eq!(pipeline().snapshot().layout, ChromaLayout::SemiPlanarBa);
    assert_eq!(frame.process(&mut out), SPECTRA_FRAME_RENDERED);
    assert_eq!(out, [0xFF00_0000, 0xFF4C_4C4C, 0xFF96_9696, 0xFFFF_FFFF]);

    let dir = tempfile::tempdir().unwrap();
    let cube = dir.path().join("red.cube");
    ColorGrid::from_fn(|_| [1.0, 0.0, 0.0])
        .save_cube(&cube, Some("Red"))
        .unwrap();
    let name = CString::new("Red").unwrap();
    let path = CString::new(cube.to_str().unwrap()).unwrap();
    // SAFETY: both strings outlive the calls.
    unsafe {
        assert!(spectra_register_cube_filter(name.as_ptr(), path.as_ptr()));
        assert!(spectra_set_active_filter(name.as_ptr()));
    }
    assert_eq!(frame.process(&mut out), SPECTRA_FRAME_RENDERED);
    assert_eq!(out, [0xFF00_00FF; 4]);

    let unknown = CString::new("Missing").unwrap();
    // SAFETY: as above; null is accepted.
    unsafe {
        assert!(!spectra_set_active_filter(unknown.as_ptr()));
        assert!(!spectra_set_active_filter(ptr::null()));
        assert!(!spectra_register_cube_filter(unknown.as_ptr(), unknown.as_ptr()));
    }
    assert_eq!(pipeline().snapshot().filter_name, "Red");

    let bypass = CString::new("None").unwrap();
    // SAFETY: as above.
    assert!(unsafe { spectra_set_active_filter(bypass.as_ptr()) });

    spectra_set_chroma_layout(1);
    spectra_set_planar_swap(true);
    assert!(pipeline().snapshot().planar_swap);
    spectra_set_chroma_layout(99);
    let config = pipeline().snapshot();
    assert_eq!(config.layout, ChromaLayout::Unknown);
    assert!(!config.planar_swap);
}

#[test]
fn test_null_luma_drops_frame() {
    let chroma = [128u8; 2];
    let mut out = [0xDEAD_BEEFu32; 4];
    // SAFETY: non-null pointers are valid for their lengths.
    let status = unsafe {
        spectra_process_frame(
            ptr::null(),
            0,
            chroma[1..].as_ptr(),
            1,
            chroma.as_ptr(),
            2,
            2,
            2,
            2,
            2,
            2,
            2,
            2,
            out.as_mut_ptr(),
            out.len(),
        )
    };
    assert_eq!(status, SPECTRA_FRAME_DROPPED);
    assert_eq!(out, [0xDEAD_BEEF; 4]);
}

#[test]
fn test_negative_geometry_drops_frame() {
    let bytes = [128u8; 8];
    let mut out = [0xDEAD_BEEFu32; 4];
    // SAFETY: all pointers are valid for their lengths.
    let status = unsafe {
        spectra_process_frame(
            bytes.as_ptr(),
            bytes.len(),
            bytes.as_ptr(),
            bytes.len(),
            bytes.as_ptr(),
            bytes.len(),
            2,
            -2,
            2,
            2,
            2,
            2,
            2,
            out.as_mut_ptr(),
            out.len(),
        )
    };
    assert_eq!(status, SPECTRA_FRAME_DROPPED);
    assert_eq!(out, [0xDEAD_BEEF; 4]);
}

#[test]
fn test_short_output_drops_frame() {
    let bytes = [128u8; 8];
    let mut out = [0xDEAD_BEEFu32; 3];
    // SAFETY: all pointers are valid for their lengths.
    let status = unsafe {
        spectra_process_frame(
            bytes.as_ptr(),
            bytes.len(),
            bytes.as_ptr(),
            bytes.len(),
            bytes.as_ptr(),
            bytes.len(),
            2,
            2,
            2,
            2,
            2,
            2,
            2,
            out.as_mut_ptr(),
            out.len(),
        )
    };
    assert_eq!(status, SPECTRA_FRAME_DROPPED);
    assert_eq!(out, [0xDEAD_BEEF; 3]);
}
