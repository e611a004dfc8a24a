// Chunked relocation of a byte span inside an arena image.

/// Number of chunk copies needed to move `len` bytes.
#[inline]
pub fn chunk_count(len: usize, chunk: usize) -> usize {
    len.div_ceil(chunk)
}

/// Move `buf[start..start + len]` by `distance` bytes (positive = toward
/// higher addresses) using `chunk`-wide copies.
///
/// Forward shifts walk from the end of the span toward its start, backward
/// shifts walk from the start toward the end, so no chunk overwrites bytes a
/// later chunk still has to read.
///
/// Because `len` need not be a multiple of `chunk`, the final copy may carry
/// up to `chunk - 1` bytes from outside the span:
/// - forward: bytes below `start` are copied into
///   `[start + distance - (chunk - 1), start + distance)`, so the caller must
///   own that much slack ahead of the span;
/// - backward: bytes past `start + len` are copied into the region just
///   past the relocated span's new end.
///
/// The overrun is clamped to `[0, buf.len())`; no access ever leaves the
/// buffer.
///
/// # Panics
/// If `chunk` is zero, or the relocated span would not fit in `buf`.
pub fn shift(buf: &mut [u8], start: usize, len: usize, distance: isize, chunk: usize) {
    assert!(chunk > 0, "shift: chunk width must be non-zero");
    if len == 0 || distance == 0 {
        return;
    }

    let end = start + len;
    assert!(
        end <= buf.len(),
        "shift: span {start}..{end} exceeds buffer of {} bytes",
        buf.len()
    );

    let copies = chunk_count(len, chunk);

    if distance > 0 {
        let distance = distance as usize;
        assert!(
            end + distance <= buf.len(),
            "shift: forward move by {distance} overruns buffer of {} bytes",
            buf.len()
        );

        for k in 0..copies {
            let src_end = end - k * chunk;
            let src = src_end.saturating_sub(chunk);
            buf.copy_within(src..src_end, src + distance);
        }
    } else {
        let distance = distance.unsigned_abs();
        assert!(
            distance <= start,
            "shift: backward move by {distance} underruns buffer start (span at {start})"
        );

        let limit = buf.len();
        for k in 0..copies {
            let src = start + k * chunk;
            let src_end = (src + chunk).min(limit);
            buf.copy_within(src..src_end, src - distance);
        }
    }
}
