use std::{fmt, ops::Index};

use nalgebra::DVector;

use crate::{Error, Result};

/// A point with a fixed number of `f64` coordinates.
///
/// The dimension is set when the point is created and never changes; only the
/// coordinate values can be updated with [`Point::set`].
///
/// Coordinates may be NaN or infinite here, but the trees only store points
/// whose coordinates are all finite (see [`Point::is_finite`]).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    coords: DVector<f64>,
}

impl Point {
    /// Create a point from its coordinates
    pub fn new(coords: Vec<f64>) -> Self {
        Self {
            coords: DVector::from_vec(coords),
        }
    }

    /// Create a point at the origin of a `dim`-dimensional space
    pub fn zeros(dim: usize) -> Self {
        Self {
            coords: DVector::zeros(dim),
        }
    }

    /// Create a point by copying a slice of coordinates
    pub fn from_slice(coords: &[f64]) -> Self {
        Self {
            coords: DVector::from_vec(coords.to_vec()),
        }
    }

    /// Number of coordinates
    pub fn dimension(&self) -> usize {
        self.coords.len()
    }

    /// Get the coordinate along axis `i`
    ///
    /// # Panics
    /// If `i >= self.dimension()`.
    pub fn get(&self, i: usize) -> f64 {
        self.coords[i]
    }

    /// Set the coordinate along axis `i`
    ///
    /// # Panics
    /// If `i >= self.dimension()`.
    pub fn set(&mut self, i: usize, value: f64) {
        self.coords[i] = value;
    }

    /// Borrow the underlying coordinate vector
    pub fn coords(&self) -> &DVector<f64> {
        &self.coords
    }

    /// Whether every coordinate is neither NaN nor infinite
    pub fn is_finite(&self) -> bool {
        self.coords.iter().all(|c| c.is_finite())
    }

    /// Euclidean distance to another point of the same dimension
    pub fn distance_to(&self, other: &Point) -> Result<f64> {
        self.check_dimension(other.dimension())?;
        Ok((&self.coords - &other.coords).norm())
    }

    pub(crate) fn check_dimension(&self, expected: usize) -> Result<()> {
        if self.dimension() == expected {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected,
                found: self.dimension(),
            })
        }
    }

    pub(crate) fn check_finite(&self) -> Result<()> {
        if self.is_finite() {
            Ok(())
        } else {
            Err(Error::NonFinite(self.to_string()))
        }
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.dimension() == other.dimension()
            && self.coords.iter().zip(other.coords.iter()).all(|(a, b)| a == b)
    }
}

impl Index<usize> for Point {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.coords[i]
    }
}

impl From<Vec<f64>> for Point {
    fn from(coords: Vec<f64>) -> Self {
        Self::new(coords)
    }
}

impl<const N: usize> From<[f64; N]> for Point {
    fn from(coords: [f64; N]) -> Self {
        Self::from_slice(&coords)
    }
}

impl From<DVector<f64>> for Point {
    fn from(coords: DVector<f64>) -> Self {
        Self { coords }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.coords.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use crate::util::tests::make_point;

    use super::*;

    #[test]
    fn dimension_and_coordinates() {
        let mut p = Point::zeros(3);
        assert_eq!(p.dimension(), 3, "Zero point should keep its dimension");
        p.set(0, 1.0);
        p.set(2, 3.0);
        assert_eq!(p.get(0), 1.0);
        assert_eq!(p.get(1), 0.0);
        assert_eq!(p[2], 3.0, "Indexing should match get");
    }

    #[test]
    fn equality_is_element_wise() {
        let p1 = make_point(&[1.0, 2.0, 3.0]);
        let p2 = make_point(&[4.0, 5.0, 6.0]);
        let p3 = make_point(&[1.0, 2.0, 3.0]);
        let p4 = make_point(&[1.0, 2.0]);
        assert_ne!(p1, p2, "Points with different coordinates differ");
        assert_eq!(p1, p3, "Points with equal coordinates are equal");
        assert_ne!(p1, p4, "Points of different dimension are never equal");
    }

    #[test]
    fn distance() {
        let p1 = make_point(&[1.0, 2.0, 3.0]);
        let p2 = make_point(&[4.0, 6.0, 3.0]);
        assert_eq!(p1.distance_to(&p2), Ok(5.0));
        assert_eq!(p2.distance_to(&p1), Ok(5.0), "Distance is symmetric");
    }

    #[test]
    fn distance_dimension_mismatch() {
        let p1 = make_point(&[1.0, 2.0, 3.0]);
        let p4 = make_point(&[7.0, 8.0, 9.0, 10.0]);
        assert_eq!(
            p1.distance_to(&p4),
            Err(Error::DimensionMismatch {
                expected: 4,
                found: 3
            })
        );
    }

    #[test]
    fn display() {
        assert_eq!(make_point(&[12.0, 6.0]).to_string(), "(12,6)");
        assert_eq!(make_point(&[1.5, -2.0, 0.25]).to_string(), "(1.5,-2,0.25)");
        assert_eq!(Point::zeros(0).to_string(), "()");
    }

    #[test]
    fn finiteness() {
        assert!(make_point(&[1.0, -2.0]).is_finite());
        assert!(Point::zeros(0).is_finite());
        assert!(!make_point(&[f64::NAN, 0.0]).is_finite());
        assert!(!make_point(&[0.0, f64::NEG_INFINITY]).is_finite());
        assert_eq!(
            make_point(&[f64::NAN, 0.0]).check_finite(),
            Err(Error::NonFinite("(NaN,0)".into()))
        );
    }

    #[test]
    fn conversions() {
        let from_array = Point::from([3.0, 4.0]);
        let from_vec = Point::from(vec![3.0, 4.0]);
        let from_vector = Point::from(DVector::from_vec(vec![3.0, 4.0]));
        assert_eq!(from_array, from_vec);
        assert_eq!(from_vec, from_vector);
        assert_eq!(from_array.coords().len(), 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let p = make_point(&[1.0, 2.5]);
        let json = serde_json::to_string(&p).unwrap();
        let back: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
