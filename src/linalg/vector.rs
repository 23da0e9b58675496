//! Growable 1-D numeric vector.
//!
//! The buffer grows by rounding the requested capacity up to the next power
//! of two, so `append` is amortized O(1). Slots between the logical length
//! and the physical capacity are zeroed and never observable through `get`.

use crate::linalg::LinalgError;
use std::fmt;

/// Resizable vector of `f64` components.
#[derive(Debug, Clone, Default)]
pub struct Vector {
    data: Vec<f64>,
    len: usize,
}

impl Vector {
    /// Create an empty vector.
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            len: 0,
        }
    }

    /// Create a vector by deep-copying a slice.
    pub fn from_slice(values: &[f64]) -> Self {
        let mut result = Self::new();
        result.grow_to(values.len().max(1));
        for &value in values {
            result.append(value);
        }
        result
    }

    /// Number of components set so far.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no component has been set.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Physical slots allocated, always >= `len()`.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// View of the logical components.
    pub fn as_slice(&self) -> &[f64] {
        &self.data[..self.len]
    }

    /// Copy of the logical components.
    pub fn to_vec(&self) -> Vec<f64> {
        self.as_slice().to_vec()
    }

    /// Component at `index`.
    ///
    /// # Errors
    /// [`LinalgError::IndexOutOfRange`] outside `[0, len)`.
    pub fn get(&self, index: usize) -> Result<f64, LinalgError> {
        if index >= self.len {
            return Err(LinalgError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(self.data[index])
    }

    /// Set the component at `index`, growing the buffer and extending the
    /// logical length when `index` lies beyond them.
    pub fn set(&mut self, index: usize, value: f64) {
        if index >= self.data.len() {
            self.grow_to(index + 1);
        }
        self.data[index] = value;
        if index >= self.len {
            self.len = index + 1;
        }
    }

    /// Append a component at the end.
    pub fn append(&mut self, value: f64) {
        if self.len >= self.data.len() {
            self.grow_to(self.len + 1);
        }
        self.data[self.len] = value;
        self.len += 1;
    }

    /// Insert a component at the front, shifting the rest up.
    pub fn prepend(&mut self, value: f64) {
        if self.len >= self.data.len() {
            self.grow_to(self.len + 1);
        }
        for i in (1..=self.len).rev() {
            self.data[i] = self.data[i - 1];
        }
        self.data[0] = value;
        self.len += 1;
    }

    /// True when some component equals `value` exactly.
    pub fn contains(&self, value: f64) -> bool {
        self.as_slice().contains(&value)
    }

    /// Index of the first component equal to `value`, or `None`.
    pub fn find(&self, value: f64) -> Option<usize> {
        self.as_slice().iter().position(|&x| x == value)
    }

    /// Remove every component equal to `value`, compacting the rest.
    pub fn remove(&mut self, value: f64) {
        let mut kept = 0;
        for i in 0..self.len {
            if self.data[i] != value {
                self.data[kept] = self.data[i];
                kept += 1;
            }
        }
        for slot in &mut self.data[kept..self.len] {
            *slot = 0.0;
        }
        self.len = kept;
    }

    /// Element-wise sum.
    ///
    /// # Errors
    /// [`LinalgError::DimensionMismatch`] when lengths differ.
    pub fn plus(&self, other: &Vector) -> Result<Vector, LinalgError> {
        self.check_same_length(other)?;
        let summed: Vec<f64> = self
            .as_slice()
            .iter()
            .zip(other.as_slice())
            .map(|(a, b)| a + b)
            .collect();
        Ok(Vector::from_slice(&summed))
    }

    /// Element-wise difference (`self - other`).
    pub fn minus(&self, other: &Vector) -> Result<Vector, LinalgError> {
        self.plus(&other.negate())
    }

    /// Every component multiplied by -1.
    pub fn negate(&self) -> Vector {
        self.scale(-1.0)
    }

    /// Every component multiplied by `scalar`.
    pub fn scale(&self, scalar: f64) -> Vector {
        let scaled: Vec<f64> = self.as_slice().iter().map(|x| x * scalar).collect();
        Vector::from_slice(&scaled)
    }

    /// Dot product.
    ///
    /// # Errors
    /// [`LinalgError::DimensionMismatch`] when lengths differ.
    pub fn dot(&self, other: &Vector) -> Result<f64, LinalgError> {
        self.check_same_length(other)?;
        Ok(self
            .as_slice()
            .iter()
            .zip(other.as_slice())
            .map(|(a, b)| a * b)
            .sum())
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Squared Euclidean norm.
    pub fn norm_squared(&self) -> f64 {
        self.as_slice().iter().map(|x| x * x).sum()
    }

    fn check_same_length(&self, other: &Vector) -> Result<(), LinalgError> {
        if self.len != other.len {
            return Err(LinalgError::DimensionMismatch {
                expected: self.len.to_string(),
                got: other.len.to_string(),
            });
        }
        Ok(())
    }

    // Rounds the capacity up to the next power of two at or above `minimum`.
    fn grow_to(&mut self, minimum: usize) {
        let mut capacity = self.data.len().max(1);
        while capacity < minimum {
            capacity *= 2;
        }
        self.data.resize(capacity, 0.0);
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.as_slice().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_get() {
        let mut v = Vector::new();
        v.append(2.0);
        v.append(3.0);
        v.append(5.0);
        assert_eq!(v.len(), 3);
        assert_eq!(v.get(0).unwrap(), 2.0);
        assert_eq!(v.get(2).unwrap(), 5.0);
    }

    #[test]
    fn test_get_out_of_range() {
        let v = Vector::from_slice(&[1.0, 2.0]);
        assert_eq!(
            v.get(2),
            Err(LinalgError::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_capacity_doubles() {
        let mut v = Vector::new();
        for i in 0..9 {
            v.append(i as f64);
        }
        // 9 appends land in a 16-slot buffer under the doubling policy.
        assert_eq!(v.capacity(), 16);
        assert_eq!(v.len(), 9);
    }

    #[test]
    fn test_set_beyond_capacity_extends_length() {
        let mut v = Vector::new();
        v.set(5, 7.0);
        assert_eq!(v.len(), 6);
        assert_eq!(v.get(5).unwrap(), 7.0);
        // Slots below the written index read back as zero.
        assert_eq!(v.get(0).unwrap(), 0.0);
    }

    #[test]
    fn test_plus_negate_is_zero() {
        let v = Vector::from_slice(&[1.5, -2.0, 3.25]);
        let sum = v.plus(&v.negate()).unwrap();
        for i in 0..sum.len() {
            assert!(sum.get(i).unwrap().abs() < 1e-12);
        }
    }

    #[test]
    fn test_minus() {
        let a = Vector::from_slice(&[5.0, 3.0]);
        let b = Vector::from_slice(&[2.0, 1.0]);
        assert_eq!(a.minus(&b).unwrap(), Vector::from_slice(&[3.0, 2.0]));
    }

    #[test]
    fn test_dot_and_norm() {
        let a = Vector::from_slice(&[3.0, 4.0]);
        assert_eq!(a.dot(&a).unwrap(), 25.0);
        assert_eq!(a.norm_squared(), 25.0);
        assert!((a.norm() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_dot_dimension_mismatch() {
        let a = Vector::from_slice(&[1.0, 2.0]);
        let b = Vector::from_slice(&[1.0, 2.0, 3.0]);
        assert!(matches!(
            a.dot(&b),
            Err(LinalgError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_scale() {
        let v = Vector::from_slice(&[1.0, -2.0]);
        assert_eq!(v.scale(3.0), Vector::from_slice(&[3.0, -6.0]));
    }

    #[test]
    fn test_prepend() {
        let mut v = Vector::from_slice(&[2.0, 3.0]);
        v.prepend(1.0);
        assert_eq!(v, Vector::from_slice(&[1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_contains_and_find() {
        let v = Vector::from_slice(&[2.0, 3.0, 5.0]);
        assert!(v.contains(3.0));
        assert!(!v.contains(4.0));
        assert_eq!(v.find(5.0), Some(2));
        assert_eq!(v.find(7.0), None);
    }

    #[test]
    fn test_remove() {
        let mut v = Vector::from_slice(&[1.0, 2.0, 1.0, 3.0]);
        v.remove(1.0);
        assert_eq!(v, Vector::from_slice(&[2.0, 3.0]));
    }

    #[test]
    fn test_equality_is_elementwise_exact() {
        let a = Vector::from_slice(&[1.0, 2.0]);
        let b = Vector::from_slice(&[1.0, 2.0]);
        let c = Vector::from_slice(&[1.0, 2.0 + 1e-15]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display() {
        let v = Vector::from_slice(&[2.0, 3.5]);
        assert_eq!(v.to_string(), "[2, 3.5]");
        assert_eq!(Vector::new().to_string(), "[]");
    }
}
