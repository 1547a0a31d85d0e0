#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot set generator
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which `z = z * z + c`, started at zero, never goes to infinity.
//! In practice we iterate each point a bounded number of times and
//! record how quickly it left the circle of radius 2; that count, its
//! "escape time," is what gets rendered.
//!
//! This crate maps a rectangle of the complex plane onto a grid of
//! pixels and produces one byte per pixel, the escape time capped at
//! 255.  The image can be generated on the calling thread or split into
//! horizontal bands and generated by several threads at once; the bytes
//! are the same either way.
//!
//! ```
//! extern crate mbrot;
//! extern crate num;
//!
//! let set = mbrot::MandelbrotSet::new(
//!     4, 4,
//!     num::Complex::new(-2.0, -2.0),
//!     num::Complex::new(2.0, 2.0),
//!     2,
//! ).unwrap();
//! assert_eq!(set.len(), 16);
//! ```

extern crate crossbeam;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
extern crate num;

pub mod bands;
pub mod engine;
pub mod errors;
pub mod escape;
pub mod planes;

pub use engine::MandelbrotSet;
pub use errors::MandelbrotError;
pub use escape::iterate;
pub use planes::{ComplexPlane, IntegralPlane, Pixel, PlaneMapper};
