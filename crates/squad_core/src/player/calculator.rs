//! Attribute -> category -> overall scoring engine
//!
//! Forward:
//! - category = round(average(group ratings) * attribute_scale)
//! - overall  = round(sum(category * weight) / overall_divisor)
//!
//! Inverse (best-effort projection, clamped):
//! - set_category_score rescales a group by target / current
//! - set_overall_score rescales the four categories by target / current
//!
//! All rounding is half-up on exact integer arithmetic.

use crate::error::{Result, SquadError};
use crate::models::{AttributeSet, Category, CategoryScores, Rating, Score, ScoreCard};
use crate::player::validation::AttributeValidator;
use crate::rules::{get_rules, SquadRules};
use tracing::debug;

/// round(numerator / denominator), halves rounded up.
#[inline]
fn div_round_half_up(numerator: u64, denominator: u64) -> u64 {
    (2 * numerator + denominator) / (2 * denominator)
}

/// Stateless scoring engine bound to a rules table.
#[derive(Debug, Clone, Copy)]
pub struct ScoreCalculator<'a> {
    rules: &'a SquadRules,
}

impl Default for ScoreCalculator<'static> {
    fn default() -> Self {
        Self::new(get_rules())
    }
}

impl<'a> ScoreCalculator<'a> {
    pub fn new(rules: &'a SquadRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'a SquadRules {
        self.rules
    }

    /// Category score of one group of ratings.
    pub fn compute_category_score(&self, ratings: &[Rating]) -> Result<Score> {
        if ratings.is_empty() {
            return Err(SquadError::EmptyGroup);
        }
        AttributeValidator::validate_ratings(self.rules, ratings)?;

        let sum: u64 = ratings.iter().map(|r| *r as u64).sum();
        let scaled = sum * self.rules.attribute_scale as u64;
        Ok(div_round_half_up(scaled, ratings.len() as u64) as Score)
    }

    /// Weighted overall score of four category scores.
    pub fn compute_overall_score(&self, categories: &CategoryScores) -> Result<Score> {
        AttributeValidator::validate_categories(self.rules, categories)?;

        let weighted: u64 = categories
            .iter()
            .map(|(category, score)| score as u64 * self.rules.weight(category) as u64)
            .sum();
        let overall = div_round_half_up(weighted, self.rules.overall_divisor as u64);

        // A validated rules table cannot produce this; it signals weight drift.
        AttributeValidator::validate_overall(self.rules, overall as i64)
    }

    /// Forward recomputation of every derived score.
    pub fn score_card(&self, attributes: &AttributeSet) -> Result<ScoreCard> {
        let mut categories = CategoryScores::default();
        for category in Category::ALL {
            let score = self.compute_category_score(&attributes.ratings(self.rules, category))?;
            categories.set(category, score);
        }
        let overall = self.compute_overall_score(&categories)?;
        Ok(ScoreCard { categories, overall })
    }

    /// Rescale a group so that its average reproduces `target`.
    ///
    /// Each rating is multiplied by target / current, rounded and clamped back
    /// into the attribute range. When ratings saturate, the realized category
    /// score can miss `target` by a small residual.
    pub fn set_category_score(&self, ratings: &[Rating], target: i64) -> Result<Vec<Rating>> {
        let target = AttributeValidator::validate_category(self.rules, target)? as u64;
        let current = self.compute_category_score(ratings)? as u64;

        let rescaled: Vec<Rating> = ratings
            .iter()
            .map(|r| {
                let value = div_round_half_up(*r as u64 * target, current);
                self.rules.attribute_range.clamp(value as i64) as Rating
            })
            .collect();

        debug!(current, target, size = ratings.len(), "category redistributed");
        Ok(rescaled)
    }

    /// Rescale the four category scores so that their weighted overall reproduces `target`.
    ///
    /// Callers re-derive attributes per category afterwards with
    /// [`ScoreCalculator::set_category_score`].
    pub fn set_overall_score(
        &self,
        categories: &CategoryScores,
        target: i64,
    ) -> Result<CategoryScores> {
        let target = AttributeValidator::validate_overall(self.rules, target)? as u64;
        let current = self.compute_overall_score(categories)? as u64;

        let mut rescaled = CategoryScores::default();
        for (category, score) in categories.iter() {
            let value = div_round_half_up(score as u64 * target, current);
            rescaled.set(category, self.rules.category_range.clamp(value as i64));
        }

        debug!(current, target, "overall redistributed");
        Ok(rescaled)
    }

    /// Set one rating exactly and rescale the other ratings of the group by
    /// new_total / old_total, clamped into the attribute range.
    pub fn adjust_attribute(
        &self,
        ratings: &[Rating],
        index: usize,
        new_value: i64,
    ) -> Result<Vec<Rating>> {
        let Some(old_value) = ratings.get(index).copied() else {
            return Err(SquadError::UnknownAttribute(format!("#{}", index)));
        };
        let new_value =
            AttributeValidator::validate_rating(self.rules, &format!("#{}", index), new_value)?;
        AttributeValidator::validate_ratings(self.rules, ratings)?;

        let old_total: u64 = ratings.iter().map(|r| *r as u64).sum();
        let new_total = old_total - old_value as u64 + new_value as u64;

        Ok(ratings
            .iter()
            .enumerate()
            .map(|(i, r)| {
                if i == index {
                    new_value
                } else {
                    let value = div_round_half_up(*r as u64 * new_total, old_total);
                    self.rules.attribute_range.clamp(value as i64) as Rating
                }
            })
            .collect())
    }

    /// [`ScoreCalculator::adjust_attribute`] addressed by attribute name.
    pub fn adjust_attribute_in_set(
        &self,
        attributes: &AttributeSet,
        name: &str,
        new_value: i64,
    ) -> Result<AttributeSet> {
        let category = self
            .rules
            .category_of(name)
            .ok_or_else(|| SquadError::UnknownAttribute(name.to_string()))?;
        let index = self
            .rules
            .attributes(category)
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| SquadError::UnknownAttribute(name.to_string()))?;

        let ratings = attributes.ratings(self.rules, category);
        let adjusted = match self.adjust_attribute(&ratings, index, new_value) {
            Err(SquadError::InvalidAttributeRange { value, min, max, .. }) => {
                return Err(SquadError::InvalidAttributeRange {
                    attribute: name.to_string(),
                    value,
                    min,
                    max,
                })
            }
            other => other?,
        };

        let mut updated = attributes.clone();
        updated.replace_group(self.rules, category, &adjusted);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc() -> ScoreCalculator<'static> {
        ScoreCalculator::default()
    }

    #[test]
    fn test_div_round_half_up() {
        assert_eq!(div_round_half_up(5, 2), 3);
        assert_eq!(div_round_half_up(4, 2), 2);
        assert_eq!(div_round_half_up(7, 3), 2);
        assert_eq!(div_round_half_up(8, 3), 3);
    }

    #[test]
    fn test_category_score_is_scaled_average() {
        let c = calc();
        assert_eq!(c.compute_category_score(&[10; 14]).unwrap(), 50);
        assert_eq!(c.compute_category_score(&[1; 8]).unwrap(), 5);
        assert_eq!(c.compute_category_score(&[20; 5]).unwrap(), 100);
        // average 10.5 -> 52.5 -> 53
        assert_eq!(c.compute_category_score(&[10, 11]).unwrap(), 53);
        // average 13/3 -> 21.67 -> 22
        assert_eq!(c.compute_category_score(&[4, 4, 5]).unwrap(), 22);
    }

    #[test]
    fn test_category_score_rejects_bad_input() {
        let c = calc();
        assert_eq!(c.compute_category_score(&[]).unwrap_err(), SquadError::EmptyGroup);
        let err = c.compute_category_score(&[10, 21]).unwrap_err();
        assert_eq!(err.code(), "INVALID_ATTRIBUTE_RANGE");
        assert!(c.compute_category_score(&[0, 10]).is_err());
    }

    #[test]
    fn test_overall_score_weights() {
        let c = calc();
        assert_eq!(c.compute_overall_score(&CategoryScores::uniform(5)).unwrap(), 10);
        assert_eq!(c.compute_overall_score(&CategoryScores::uniform(100)).unwrap(), 200);
        assert_eq!(c.compute_overall_score(&CategoryScores::uniform(50)).unwrap(), 100);
        // (80*3 + 60*2 + 70*3 + 10*2) / 5 = 590 / 5 = 118
        let mixed = CategoryScores::new(80, 60, 70, 10);
        assert_eq!(c.compute_overall_score(&mixed).unwrap(), 118);
        // (51*3 + 50*2 + 50*3 + 50*2) / 5 = 503 / 5 = 100.6 -> 101
        let skewed = CategoryScores::new(51, 50, 50, 50);
        assert_eq!(c.compute_overall_score(&skewed).unwrap(), 101);
    }

    #[test]
    fn test_overall_score_rejects_bad_category() {
        let c = calc();
        let err = c.compute_overall_score(&CategoryScores::new(4, 50, 50, 50)).unwrap_err();
        assert_eq!(err, SquadError::InvalidCategoryRange { value: 4, min: 5, max: 100 });
    }

    #[test]
    fn test_set_category_score_round_trip_on_uniform_group() {
        let c = calc();
        for rating in 1..=20u8 {
            let group = vec![rating; 14];
            let current = c.compute_category_score(&group).unwrap();
            let result = c.set_category_score(&group, current as i64).unwrap();
            assert_eq!(result, group, "rating {} should be unchanged", rating);
        }
    }

    #[test]
    fn test_set_category_score_saturates_at_clamp() {
        let c = calc();
        let group = vec![10u8; 14];
        assert_eq!(c.compute_category_score(&group).unwrap(), 50);

        let result = c.set_category_score(&group, 100).unwrap();
        assert!(result.iter().all(|r| *r == 20));
        assert!(c.compute_category_score(&result).unwrap() <= 100);
    }

    #[test]
    fn test_set_category_score_is_proportional() {
        let c = calc();
        // average 12 -> category 60; halve it
        let group = vec![8, 12, 16, 12];
        let result = c.set_category_score(&group, 30).unwrap();
        assert_eq!(result, vec![4, 6, 8, 6]);
        assert_eq!(c.compute_category_score(&result).unwrap(), 30);
    }

    #[test]
    fn test_set_category_score_clamps_low_end() {
        let c = calc();
        let group = vec![2, 10, 18];
        let result = c.set_category_score(&group, 5).unwrap();
        // factor 5/50: 0.2 -> 1 (clamped), 1, 1.8 -> 2
        assert_eq!(result, vec![1, 1, 2]);
    }

    #[test]
    fn test_set_category_score_rejects_target() {
        let c = calc();
        let err = c.set_category_score(&[10; 5], 101).unwrap_err();
        assert!(matches!(err, SquadError::InvalidCategoryRange { value: 101, .. }));
        assert!(c.set_category_score(&[10; 5], 4).is_err());
    }

    #[test]
    fn test_set_overall_score_scales_categories() {
        let c = calc();
        let categories = CategoryScores::uniform(50);
        let result = c.set_overall_score(&categories, 150).unwrap();
        assert_eq!(result, CategoryScores::uniform(75));
        assert_eq!(c.compute_overall_score(&result).unwrap(), 150);
    }

    #[test]
    fn test_set_overall_score_saturates() {
        let c = calc();
        let categories = CategoryScores::new(90, 60, 60, 20);
        // current overall = (270 + 120 + 180 + 40) / 5 = 122
        assert_eq!(c.compute_overall_score(&categories).unwrap(), 122);
        let result = c.set_overall_score(&categories, 200).unwrap();
        assert_eq!(result.technical, 100);
        assert!(c.compute_overall_score(&result).unwrap() <= 200);
    }

    #[test]
    fn test_set_overall_score_rejects_target() {
        let c = calc();
        let categories = CategoryScores::uniform(50);
        let err = c.set_overall_score(&categories, 9).unwrap_err();
        assert!(matches!(err, SquadError::InvalidOverallRange { value: 9, .. }));
        assert!(c.set_overall_score(&categories, 201).is_err());
    }

    #[test]
    fn test_adjust_attribute_rescales_group() {
        let c = calc();
        // total 40 -> 60; others scale by 1.5
        let group = vec![10, 10, 10, 10];
        let result = c.adjust_attribute(&group, 0, 30).unwrap_err();
        assert_eq!(result.code(), "INVALID_ATTRIBUTE_RANGE");

        let result = c.adjust_attribute(&group, 0, 20).unwrap();
        // total 40 -> 50; others 10 * 1.25 = 12.5 -> 13
        assert_eq!(result, vec![20, 13, 13, 13]);
    }

    #[test]
    fn test_adjust_attribute_unknown_index() {
        let c = calc();
        assert!(matches!(
            c.adjust_attribute(&[10, 10], 5, 12),
            Err(SquadError::UnknownAttribute(_))
        ));
    }

    #[test]
    fn test_adjust_attribute_in_set_by_name() {
        let c = calc();
        let rules = c.rules();
        let set = AttributeSet::uniform(rules, 10).unwrap();
        let updated = c.adjust_attribute_in_set(&set, "pace", 18).unwrap();
        assert_eq!(updated.get("pace"), Some(18));
        // physical total 80 -> 88, others 10 * 1.1 = 11
        assert_eq!(updated.get("stamina"), Some(11));
        // other groups untouched
        assert_eq!(updated.get("vision"), Some(10));

        let err = c.adjust_attribute_in_set(&set, "pace", 0).unwrap_err();
        assert!(matches!(
            err,
            SquadError::InvalidAttributeRange { ref attribute, .. } if attribute == "pace"
        ));
        assert!(c.adjust_attribute_in_set(&set, "shooting", 10).is_err());
    }

    #[test]
    fn test_score_card_on_uniform_set() {
        let c = calc();
        let set = AttributeSet::uniform(c.rules(), 10).unwrap();
        let card = c.score_card(&set).unwrap();
        assert_eq!(card.categories, CategoryScores::uniform(50));
        assert_eq!(card.overall, 100);
    }
}
