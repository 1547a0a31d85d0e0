// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time kernel.  Takes a single point on the complex plane
//! and reports how many times `z = z * z + c` could be applied,
//! starting from zero, before `z` left the circle of radius 2.

/// The largest count the kernel will report.  Points that reach it are
/// treated as members of the set.  The count has to fit in one byte of
/// the output image, so this is not a tunable.
pub const MAX_ITERATIONS: u8 = 255;

/// The square of the escape radius.
pub const ESCAPE_RADIUS_SQR: f64 = 4.0;

/// Iterates the point `x + yi` and returns the escape-time count.
///
/// The complex arithmetic is written out by hand over the real and
/// imaginary parts, and the squares are carried from one step to the
/// next, so the operation order (and with it the rounding) never
/// changes between callers.  At least one step is always taken, so the
/// smallest possible count is 1.
#[inline]
pub fn iterate(x: f64, y: f64) -> u8 {
    let mut iter: u8 = 0;

    let (mut u, mut v) = (0.0_f64, 0.0_f64);
    let (mut u2, mut v2) = (0.0_f64, 0.0_f64);

    while u2 + v2 < ESCAPE_RADIUS_SQR && iter < MAX_ITERATIONS {
        v = 2.0 * u * v + y;
        u = u2 - v2 + x;
        u2 = u * u;
        v2 = v * v;
        iter += 1;
    }

    iter
}
