// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The MandelbrotSet owns one fully generated image.  All of the work
//! happens in the constructor: allocate the pixel buffer, fill it
//! (inline, or spread across a set of scoped worker threads, one per
//! band), and only then hand the object back.  There is no way to see
//! a partly filled buffer and no way to regenerate into an existing
//! one; build a new MandelbrotSet instead.

extern crate crossbeam;

use std::mem;
use std::panic;
use std::slice::Chunks;

use bands::{partition, Band};
use errors::MandelbrotError;
use num::Complex;
use planes::PlaneMapper;

/// A generated Mandelbrot image.  Each byte of the buffer is the
/// escape-time count of one pixel, row-major, `width` bytes per row
/// and no padding.  The buffer is released when the set is dropped.
pub struct MandelbrotSet {
    plane: PlaneMapper,
    threads: usize,
    buffer: Vec<u8>,
}

impl MandelbrotSet {
    /// Requires the width and height of the image, the left-lower and
    /// right-upper corners of the complex plane to render, and the
    /// number of worker threads.  A thread count of 0 or 1 renders on
    /// the calling thread; anything larger splits the image into that
    /// many horizontal bands, each filled by its own thread.  Either
    /// way the bytes produced are identical.
    ///
    /// Fails only if memory for the image could not be obtained, which
    /// includes images with a zero dimension.
    pub fn new(
        width: usize,
        height: usize,
        leftlower: Complex<f64>,
        rightupper: Complex<f64>,
        threads: usize,
    ) -> Result<Self, MandelbrotError> {
        let plane = PlaneMapper::new(width, height, leftlower, rightupper);
        let mut buffer = allocate(&plane)?;

        info!(
            "generating {}x{} over {} .. {} with {} thread(s)",
            width, height, leftlower, rightupper, threads
        );

        if threads <= 1 {
            Band::whole(&plane).fill(&mut buffer, plane.deltas());
        } else {
            fill_threaded(&plane, &mut buffer, threads)?;
        }

        Ok(MandelbrotSet {
            plane,
            threads,
            buffer,
        })
    }

    /// The image buffer and its length in bytes.
    pub fn get_buffer(&self) -> (&[u8], usize) {
        (&self.buffer, self.buffer.len())
    }

    /// The image buffer.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Gives up the set and keeps its buffer.
    pub fn into_buffer(self) -> Vec<u8> {
        self.buffer
    }

    /// Buffer length; always `width * height`.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// A constructed set is never empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.plane.width()
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.plane.height()
    }

    /// The thread count the set was generated with.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// The geometry the image was generated over.
    pub fn plane(&self) -> &PlaneMapper {
        &self.plane
    }

    /// Walks the image one row at a time, starting from `leftlower.im`.
    pub fn rows(&self) -> Chunks<u8> {
        self.buffer.chunks(self.plane.width())
    }
}

impl AsRef<[u8]> for MandelbrotSet {
    fn as_ref(&self) -> &[u8] {
        &self.buffer
    }
}

impl std::fmt::Debug for MandelbrotSet {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("MandelbrotSet")
            .field("plane", &self.plane)
            .field("threads", &self.threads)
            .field("len", &self.buffer.len())
            .finish()
    }
}

/// Gets a zeroed buffer of `width * height` bytes, or reports why not.
fn allocate(plane: &PlaneMapper) -> Result<Vec<u8>, MandelbrotError> {
    let failed = || MandelbrotError::allocation("pixel buffer", plane.width(), plane.height());
    if plane.is_empty() {
        return Err(failed());
    }

    let size = plane.checked_len().ok_or_else(failed)?;
    let mut buffer: Vec<u8> = Vec::new();
    buffer.try_reserve_exact(size).map_err(|_| failed())?;
    buffer.resize(size, 0);
    Ok(buffer)
}

/// Hands each band its own slice of the buffer and fills them all in
/// parallel.  Returns once every worker has been joined.
fn fill_threaded(
    plane: &PlaneMapper,
    buffer: &mut [u8],
    threads: usize,
) -> Result<(), MandelbrotError> {
    let bands = partition(plane, threads)?;
    if threads > plane.height() {
        warn!(
            "{} threads for {} rows; {} band(s) will be empty",
            threads,
            plane.height(),
            threads - plane.height()
        );
    }

    let deltas = plane.deltas();
    let mut rest: &mut [u8] = buffer;
    let joined = crossbeam::scope(|spawner| {
        for (i, band) in bands.iter().enumerate() {
            let (pixels, tail) = mem::take(&mut rest).split_at_mut(band.len());
            rest = tail;
            debug!(
                "band {}: rows {}..{}, offset {}, {} .. {}",
                i,
                band.top,
                band.top + band.height,
                band.offset,
                band.leftlower,
                band.rightupper
            );
            spawner.spawn(move |_| band.fill(pixels, deltas));
        }
    });

    if let Err(cause) = joined {
        panic::resume_unwind(cause);
    }
    trace!("all {} bands joined", bands.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use escape::MAX_ITERATIONS;
    use planes::Pixel;

    fn square(threads: usize) -> MandelbrotSet {
        MandelbrotSet::new(
            4,
            4,
            Complex::new(-2.0, -2.0),
            Complex::new(2.0, 2.0),
            threads,
        )
        .unwrap()
    }

    #[test]
    fn small_square_scenario() {
        let set = square(0);
        let (buffer, len) = set.get_buffer();
        assert_eq!(len, 16);
        assert_eq!(buffer.len(), 16);
        assert_eq!(buffer[2 * 4 + 2], MAX_ITERATIONS);
        assert!(buffer[0] <= 5);
    }

    #[test]
    fn zero_and_one_thread_agree() {
        assert_eq!(square(0).buffer(), square(1).buffer());
    }

    #[test]
    fn banded_square_matches_inline_square() {
        let inline = square(0);
        for threads in 2..9 {
            assert_eq!(square(threads).buffer(), inline.buffer());
        }
    }

    #[test]
    fn every_pixel_is_the_kernel_at_its_point() {
        let set = MandelbrotSet::new(
            9,
            7,
            Complex::new(-2.1, -1.3),
            Complex::new(0.7, 1.3),
            3,
        )
        .unwrap();
        for (row, pixels) in set.rows().enumerate() {
            for (col, &count) in pixels.iter().enumerate() {
                let point = set.plane().pixel_to_point(&Pixel(col, row));
                assert_eq!(count, ::escape::iterate(point.re, point.im));
            }
        }
    }

    #[test]
    fn more_threads_than_rows_still_completes() {
        let set = MandelbrotSet::new(
            6,
            2,
            Complex::new(-2.0, -1.0),
            Complex::new(1.0, 1.0),
            5,
        )
        .unwrap();
        assert_eq!(set.len(), 12);
        assert_eq!(set.threads(), 5);
    }

    #[test]
    fn accessors_describe_the_image() {
        let set = square(2);
        assert_eq!((set.width(), set.height()), (4, 4));
        assert!(!set.is_empty());
        assert_eq!(set.rows().count(), 4);
        assert_eq!(set.as_ref(), set.buffer());
        assert_eq!(set.into_buffer().len(), 16);
    }

    #[test]
    fn zero_dimensions_fail_to_allocate() {
        let err = MandelbrotSet::new(0, 4, Complex::new(-2.0, -2.0), Complex::new(2.0, 2.0), 0)
            .unwrap_err();
        assert_eq!(err, MandelbrotError::allocation("pixel buffer", 0, 4));
        assert!(
            MandelbrotSet::new(4, 0, Complex::new(-2.0, -2.0), Complex::new(2.0, 2.0), 3).is_err()
        );
    }

    #[test]
    fn overflowing_dimensions_fail_to_allocate() {
        let err = MandelbrotSet::new(
            usize::max_value(),
            2,
            Complex::new(-2.0, -2.0),
            Complex::new(2.0, 2.0),
            0,
        )
        .unwrap_err();
        assert_eq!(
            err,
            MandelbrotError::allocation("pixel buffer", usize::max_value(), 2)
        );
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn impossibly_large_buffers_fail_to_allocate() {
        let result = MandelbrotSet::new(
            1 << 40,
            1 << 20,
            Complex::new(-2.0, -2.0),
            Complex::new(2.0, 2.0),
            4,
        );
        match result {
            Err(MandelbrotError::AllocationFailure { what, .. }) => assert_eq!(what, "pixel buffer"),
            Ok(_) => panic!("a 2^60 byte buffer was allocated"),
        }
    }
}
