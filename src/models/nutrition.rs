//! Shared nutrition data structure
//!
//! Used by atomic foods, recipes, log entries and daily totals.

use serde::{Deserialize, Serialize};

/// Nutritional information per serving
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub fat: f64,     // grams
    pub carbs: f64,   // grams
    pub protein: f64, // grams
}

impl Nutrition {
    pub fn new(calories: f64, fat: f64, carbs: f64, protein: f64) -> Self {
        Self {
            calories,
            fat,
            carbs,
            protein,
        }
    }

    /// Create a new Nutrition with all zeros
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale nutrition values by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            calories: self.calories * multiplier,
            fat: self.fat * multiplier,
            carbs: self.carbs * multiplier,
            protein: self.protein * multiplier,
        }
    }

    /// Add another nutrition to this one
    pub fn add(&self, other: &Nutrition) -> Self {
        Self {
            calories: self.calories + other.calories,
            fat: self.fat + other.fat,
            carbs: self.carbs + other.carbs,
            protein: self.protein + other.protein,
        }
    }

    /// True if no value is negative or NaN
    pub fn is_valid(&self) -> bool {
        [self.calories, self.fat, self.carbs, self.protein]
            .iter()
            .all(|v| *v >= 0.0)
    }
}

impl std::ops::Add for Nutrition {
    type Output = Nutrition;

    fn add(self, other: Nutrition) -> Nutrition {
        Nutrition::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for Nutrition {
    type Output = Nutrition;

    fn mul(self, multiplier: f64) -> Nutrition {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for Nutrition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrition::zero(), |acc, n| acc + n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_and_sum() {
        let apple = Nutrition::new(95.0, 0.3, 25.0, 0.5);
        let total: Nutrition = vec![apple * 2.0, Nutrition::new(105.0, 0.4, 27.0, 1.3)]
            .into_iter()
            .sum();
        assert!((total.calories - 295.0).abs() < 1e-9);
        assert!((total.fat - 1.0).abs() < 1e-9);
        assert!((total.carbs - 77.0).abs() < 1e-9);
        assert!((total.protein - 2.3).abs() < 1e-9);
    }

    #[test]
    fn test_is_valid() {
        assert!(Nutrition::zero().is_valid());
        assert!(!Nutrition::new(-1.0, 0.0, 0.0, 0.0).is_valid());
        assert!(!Nutrition::new(f64::NAN, 0.0, 0.0, 0.0).is_valid());
    }
}
