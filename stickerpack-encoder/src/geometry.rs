//! Canvas fitting arithmetic

/// Scales `(width, height)` so the longer side becomes exactly `side`.
///
/// The shorter side is truncated (`floor(short * side / long)`) and never
/// drops below one pixel. Square inputs map to `(side, side)`. Both input
/// dimensions must be non-zero.
pub fn fit_to_square(width: u32, height: u32, side: u32) -> (u32, u32) {
    if width > height {
        let scaled = (height as u64 * side as u64 / width as u64) as u32;
        (side, scaled.max(1))
    } else {
        let scaled = (width as u64 * side as u64 / height as u64) as u32;
        (scaled.max(1), side)
    }
}

/// Top-left offset that centers a `(width, height)` block on a square canvas
pub fn center_offset(width: u32, height: u32, side: u32) -> (u32, u32) {
    (
        side.saturating_sub(width) / 2,
        side.saturating_sub(height) / 2,
    )
}
