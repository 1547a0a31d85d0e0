//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a rectangle on the complex plane with an arbitrary pair of
//! corners defining the leftlower and rightupper corners of the
//! region being rendered.
use num::Complex;

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.  For that reason,
/// the lower-left-hand corner is not included.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the lower-left corner and upper-right corner of the
/// Complex plane, treating the real part of each value as the
/// x-component and the imaginary part of each value as the
/// y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComplexPlane(pub Complex<f64>, pub Complex<f64>);

/// Describes the column, row of a pixel in the integral plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Contains the definitions of the two planes and the size of one
/// pixel measured on the complex plane.
///
/// Pixel `(col, row)` maps to `leftlower + (col * dx, row * dy)`, but
/// the multiplication is never performed: the engine walks the plane
/// by adding `dx` once per column and `dy` once per row, and every
/// piece of code that needs a pixel's coordinate has to walk the same
/// way to get the same bits.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    /// The right-upper hand corner of the integral cartesian plane.
    /// The left-lower is assumed to be at 0,0
    pub integral_plane: IntegralPlane,
    /// The two coordinates defining the complex cartesian plane,
    /// left-lower and right-upper
    pub complex_plane: ComplexPlane,
    // Width and height of a single pixel on the complex plane.
    deltas: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  The corners are expected to be ordered, with
    /// `leftlower` strictly below and to the left of `rightupper`;
    /// that is not checked here.  A reversed region simply produces a
    /// mirrored image.
    pub fn new(
        width: usize,
        height: usize,
        leftlower: Complex<f64>,
        rightupper: Complex<f64>,
    ) -> PlaneMapper {
        let deltas = (
            (rightupper.re - leftlower.re) / (width as f64),
            (rightupper.im - leftlower.im) / (height as f64),
        );

        PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            complex_plane: ComplexPlane(leftlower, rightupper),
            deltas,
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.integral_plane.0
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.integral_plane.1
    }

    /// The total number of points in the integral grid.  Returns
    /// `None` if that does not fit in a `usize`.
    pub fn checked_len(&self) -> Option<usize> {
        self.integral_plane.0.checked_mul(self.integral_plane.1)
    }

    /// The total number of points in the integral grid.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// The `(x, y)` step between neighbouring pixels.
    pub fn deltas(&self) -> (f64, f64) {
        self.deltas
    }

    /// Given a pixel on the integral plane, return the point the
    /// engine iterated for it.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        let mut point = self.complex_plane.0;
        for _ in 0..pixel.0 {
            point.re += self.deltas.0;
        }
        for _ in 0..pixel.1 {
            point.im += self.deltas.1;
        }
        point
    }
}
