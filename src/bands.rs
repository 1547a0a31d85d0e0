// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Splits an image into horizontal bands, one per worker.
//!
//! Every band is as wide as the image.  The rows are dealt out in
//! chunks of `ceil(height / nthreads)`, first band first, so when the
//! thread count does not divide the height the last non-empty band is
//! short, and when there are more threads than rows the trailing bands
//! are empty.  Bands never overlap, neither in rows nor in bytes of the
//! pixel buffer, which is what lets the workers write without locks.

use escape::iterate;
use errors::MandelbrotError;
use num::Complex;
use planes::PlaneMapper;

/// A contiguous run of rows and the region of the complex plane they
/// cover.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Band {
    /// Width of the band in pixels; always the image width.
    pub width: usize,
    /// Number of rows in the band.  May be zero.
    pub height: usize,
    /// Index of the first row within the whole image.
    pub top: usize,
    /// Byte offset of the band's first pixel within the pixel buffer.
    pub offset: usize,
    /// Left-lower corner of the band.
    pub leftlower: Complex<f64>,
    /// Right-upper corner of the band, computed from the band's own
    /// origin and height rather than sliced out of the image region.
    pub rightupper: Complex<f64>,
}

impl Band {
    /// The whole image as one band.  This is what a single-threaded
    /// generation fills.
    pub fn whole(plane: &PlaneMapper) -> Band {
        let (dx, dy) = plane.deltas();
        let leftlower = plane.complex_plane.0;
        Band {
            width: plane.width(),
            height: plane.height(),
            top: 0,
            offset: 0,
            leftlower,
            rightupper: Complex::new(
                leftlower.re + (plane.width() as f64) * dx,
                leftlower.im + (plane.height() as f64) * dy,
            ),
        }
    }

    /// Number of bytes of the pixel buffer this band owns.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// True for the trailing bands handed out when there are more
    /// workers than rows.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Fills `pixels`, which must be exactly this band's slice of the
    /// image, with escape-time counts.  The steps are the image-wide
    /// deltas, so a band reproduces the same coordinates the
    /// single-threaded walk would have reached.
    pub fn fill(&self, pixels: &mut [u8], deltas: (f64, f64)) {
        assert_eq!(pixels.len(), self.len());
        if self.is_empty() {
            return;
        }

        let (dx, dy) = deltas;
        let mut y = self.leftlower.im;
        for row in pixels.chunks_mut(self.width) {
            let mut x = self.leftlower.re;
            for pixel in row.iter_mut() {
                *pixel = iterate(x, y);
                x += dx;
            }
            y += dy;
        }
    }
}

/// Rows per band: `height / nthreads`, rounded up.
fn chunk_rows(height: usize, nthreads: usize) -> usize {
    height / nthreads + if height % nthreads == 0 { 0 } else { 1 }
}

/// Divides the plane into exactly `nthreads` bands.  `nthreads` of zero
/// is treated as one.
///
/// Each band starts on the row after the previous band's last row and
/// at the byte after the previous band's last byte.  Its `leftlower.im`
/// is reached by stepping `dy` once per preceding row, the same walk
/// the single-threaded fill performs, so band boundaries fall on
/// exactly the coordinates the unbanded image uses.
pub fn partition(plane: &PlaneMapper, nthreads: usize) -> Result<Vec<Band>, MandelbrotError> {
    let nthreads = nthreads.max(1);
    let (width, height) = (plane.width(), plane.height());
    let (dx, dy) = plane.deltas();

    let mut bands: Vec<Band> = Vec::new();
    bands
        .try_reserve_exact(nthreads)
        .map_err(|_| MandelbrotError::allocation("band table", width, height))?;

    let chunk = chunk_rows(height, nthreads);
    let x0 = plane.complex_plane.0.re;
    let x1 = x0 + (width as f64) * dx;

    let mut y0 = plane.complex_plane.0.im;
    let mut top = 0;
    let mut offset = 0;
    let mut remain = height;
    for _ in 0..nthreads {
        let rows = chunk.min(remain);
        bands.push(Band {
            width,
            height: rows,
            top,
            offset,
            leftlower: Complex::new(x0, y0),
            rightupper: Complex::new(x1, y0 + (rows as f64) * dy),
        });

        for _ in 0..rows {
            y0 += dy;
        }
        top += rows;
        offset += width * rows;
        remain -= rows;
    }

    Ok(bands)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane(width: usize, height: usize) -> PlaneMapper {
        PlaneMapper::new(
            width,
            height,
            Complex::new(-2.0, -1.5),
            Complex::new(1.0, 1.5),
        )
    }

    fn heights(bands: &[Band]) -> Vec<usize> {
        bands.iter().map(|b| b.height).collect()
    }

    #[test]
    fn even_division() {
        let bands = partition(&plane(5, 12), 4).unwrap();
        assert_eq!(heights(&bands), vec![3, 3, 3, 3]);
    }

    #[test]
    fn uneven_division_shortens_the_last_band() {
        let bands = partition(&plane(5, 10), 3).unwrap();
        assert_eq!(heights(&bands), vec![4, 4, 2]);
        assert_eq!(bands.iter().map(|b| b.height).sum::<usize>(), 10);
    }

    #[test]
    fn ceiling_chunks_can_leave_trailing_bands_empty() {
        let bands = partition(&plane(5, 10), 4).unwrap();
        assert_eq!(heights(&bands), vec![3, 3, 3, 1]);
        let bands = partition(&plane(5, 9), 6).unwrap();
        assert_eq!(heights(&bands), vec![2, 2, 2, 2, 1, 0]);
    }

    #[test]
    fn more_threads_than_rows() {
        let bands = partition(&plane(3, 2), 5).unwrap();
        assert_eq!(bands.len(), 5);
        assert_eq!(heights(&bands), vec![1, 1, 0, 0, 0]);
        assert!(bands[2..].iter().all(|b| b.is_empty() && b.len() == 0));
    }

    #[test]
    fn zero_threads_means_one_band() {
        let pm = plane(4, 4);
        let bands = partition(&pm, 0).unwrap();
        assert_eq!(bands, vec![Band::whole(&pm)]);
    }

    #[test]
    fn rows_and_bytes_are_covered_exactly_once() {
        for nthreads in 1..12 {
            let bands = partition(&plane(7, 10), nthreads).unwrap();
            let mut row = 0;
            let mut offset = 0;
            for band in &bands {
                assert_eq!(band.top, row);
                assert_eq!(band.offset, offset);
                assert_eq!(band.width, 7);
                row += band.height;
                offset += band.len();
            }
            assert_eq!(row, 10);
            assert_eq!(offset, 70);
        }
    }

    #[test]
    fn band_origins_follow_the_row_walk() {
        let pm = plane(4, 10);
        let (_, dy) = pm.deltas();
        let bands = partition(&pm, 3).unwrap();
        for band in &bands {
            let mut y = pm.complex_plane.0.im;
            for _ in 0..band.top {
                y += dy;
            }
            assert_eq!(band.leftlower.im, y);
            assert_eq!(band.leftlower.re, pm.complex_plane.0.re);
        }
    }

    #[test]
    fn band_upper_bound_is_band_local() {
        let pm = plane(4, 10);
        let (dx, dy) = pm.deltas();
        for band in partition(&pm, 3).unwrap() {
            assert_eq!(
                band.rightupper.im,
                band.leftlower.im + (band.height as f64) * dy
            );
            assert_eq!(band.rightupper.re, band.leftlower.re + 4.0 * dx);
        }
    }

    #[test]
    fn empty_band_fill_is_a_no_op() {
        let bands = partition(&plane(3, 2), 5).unwrap();
        let mut nothing: [u8; 0] = [];
        bands[4].fill(&mut nothing, plane(3, 2).deltas());
    }

    #[test]
    fn whole_band_fill_matches_the_kernel() {
        let pm = PlaneMapper::new(4, 4, Complex::new(-2.0, -2.0), Complex::new(2.0, 2.0));
        let mut pixels = vec![0; 16];
        Band::whole(&pm).fill(&mut pixels, pm.deltas());
        assert_eq!(pixels[0], iterate(-2.0, -2.0));
        assert_eq!(pixels[2 * 4 + 2], iterate(0.0, 0.0));
        assert_eq!(pixels[3], iterate(1.0, -2.0));
    }

    #[test]
    fn huge_thread_counts_fail_to_allocate_the_band_table() {
        let err = partition(&plane(4, 4), usize::max_value()).unwrap_err();
        assert_eq!(err, MandelbrotError::allocation("band table", 4, 4));
    }
}
