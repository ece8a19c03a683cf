//! BT.601 studio-swing YCbCr to RGB conversion.
//!
//! Uses the 8-bit integer-scaled coefficients common to camera pipelines:
//! ```text
//! C = Y  - 16
//! D = Cb - 128
//! E = Cr - 128
//! R = (298·C         + 409·E + 128) / 256
//! G = (298·C − 100·D − 208·E + 128) / 256
//! B = (298·C + 516·D         + 128) / 256
//! ```
//! The division is carried out in floating point, then each channel is
//! normalized by 255 and clamped to [0, 1].

/// Luma black level for studio-swing video.
const LUMA_OFFSET: f32 = 16.0;
/// Chroma zero point.
const CHROMA_OFFSET: f32 = 128.0;

const Y_GAIN: f32 = 298.0;
const CR_TO_R: f32 = 409.0;
const CB_TO_G: f32 = 100.0;
const CR_TO_G: f32 = 208.0;
const CB_TO_B: f32 = 516.0;
/// Rounding bias applied before the /256 scale.
const ROUNDING: f32 = 128.0;
const SCALE: f32 = 256.0;

/// Convert one luma/chroma triple to normalized RGB.
///
/// `cb` is the blue-difference channel (chroma-a, conventionally "U") and
/// `cr` the red-difference channel (chroma-b, "V"). Inputs are nominally
/// 8-bit code values; anything outside the representable range is clamped
/// on output, never rejected.
#[inline(always)]
pub fn ycbcr_to_rgb(y: f32, cb: f32, cr: f32) -> [f32; 3] {
    let c = y - LUMA_OFFSET;
    let d = cb - CHROMA_OFFSET;
    let e = cr - CHROMA_OFFSET;

    let r = (Y_GAIN * c + CR_TO_R * e + ROUNDING) / SCALE;
    let g = (Y_GAIN * c - CB_TO_G * d - CR_TO_G * e + ROUNDING) / SCALE;
    let b = (Y_GAIN * c + CB_TO_B * d + ROUNDING) / SCALE;

    [normalize(r), normalize(g), normalize(b)]
}

#[inline(always)]
fn normalize(v: f32) -> f32 {
    // `max`/`min` rather than `clamp` so NaN collapses to 0.
    (v / 255.0).max(0.0).min(1.0)
}
