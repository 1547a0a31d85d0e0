// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can go wrong while building a Mandelbrot set.

/// The generator has one way to fail: it could not get the memory it
/// needed.  Nothing is ever half-generated; if construction fails there
/// is no buffer to look at.
#[derive(Debug, Fail, Clone, PartialEq)]
pub enum MandelbrotError {
    /// Either the pixel buffer or the table of work bands could not be
    /// allocated.  An image with a zero dimension, or one whose byte
    /// count does not fit in a `usize`, is reported the same way.
    #[fail(
        display = "Failed to allocate the {} for a {}x{} image",
        what, width, height
    )]
    AllocationFailure {
        /// Which allocation failed.
        what: &'static str,
        /// Requested image width.
        width: usize,
        /// Requested image height.
        height: usize,
    },
}

impl MandelbrotError {
    pub(crate) fn allocation(what: &'static str, width: usize, height: usize) -> Self {
        MandelbrotError::AllocationFailure {
            what,
            width,
            height,
        }
    }
}
