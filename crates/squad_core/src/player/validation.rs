//! Range validation for ratings and scores
//!
//! All checks read their bounds from the rules table and fail with the
//! matching `SquadError` range variant. Nothing is silently clamped here.

use crate::error::{Result, SquadError};
use crate::models::{AttributeSet, CategoryScores, Rating, Score};
use crate::rules::SquadRules;

/// Range checks shared by the forward and inverse scoring operations.
pub struct AttributeValidator;

impl AttributeValidator {
    /// Validate a single attribute rating (1-20 by default).
    pub fn validate_rating(rules: &SquadRules, attribute: &str, value: i64) -> Result<Rating> {
        let range = rules.attribute_range;
        if !range.contains(value) {
            return Err(SquadError::InvalidAttributeRange {
                attribute: attribute.to_string(),
                value,
                min: range.min,
                max: range.max,
            });
        }
        Ok(value as Rating)
    }

    /// Validate a category score (5-100 by default).
    pub fn validate_category(rules: &SquadRules, value: i64) -> Result<Score> {
        let range = rules.category_range;
        if !range.contains(value) {
            return Err(SquadError::InvalidCategoryRange {
                value,
                min: range.min,
                max: range.max,
            });
        }
        Ok(value as Score)
    }

    /// Validate an overall score (10-200 by default).
    pub fn validate_overall(rules: &SquadRules, value: i64) -> Result<Score> {
        let range = rules.overall_range;
        if !range.contains(value) {
            return Err(SquadError::InvalidOverallRange {
                value,
                min: range.min,
                max: range.max,
            });
        }
        Ok(value as Score)
    }

    pub fn validate_ratings(rules: &SquadRules, ratings: &[Rating]) -> Result<()> {
        for (i, rating) in ratings.iter().enumerate() {
            Self::validate_rating(rules, &format!("#{}", i), *rating as i64)?;
        }
        Ok(())
    }

    pub fn validate_categories(rules: &SquadRules, categories: &CategoryScores) -> Result<()> {
        for (_, score) in categories.iter() {
            Self::validate_category(rules, score as i64)?;
        }
        Ok(())
    }

    pub fn validate_attribute_set(rules: &SquadRules, attributes: &AttributeSet) -> Result<()> {
        for (name, rating) in attributes.iter() {
            if rules.category_of(name).is_none() {
                return Err(SquadError::UnknownAttribute(name.to_string()));
            }
            Self::validate_rating(rules, name, rating as i64)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::get_rules;

    #[test]
    fn test_validate_rating() {
        let rules = get_rules();
        assert_eq!(AttributeValidator::validate_rating(rules, "pace", 1).unwrap(), 1);
        assert_eq!(AttributeValidator::validate_rating(rules, "pace", 20).unwrap(), 20);

        assert!(AttributeValidator::validate_rating(rules, "pace", 0).is_err());
        assert!(AttributeValidator::validate_rating(rules, "pace", 21).is_err());
        assert!(AttributeValidator::validate_rating(rules, "pace", -4).is_err());
    }

    #[test]
    fn test_validate_category() {
        let rules = get_rules();
        assert!(AttributeValidator::validate_category(rules, 5).is_ok());
        assert!(AttributeValidator::validate_category(rules, 100).is_ok());

        let err = AttributeValidator::validate_category(rules, 4).unwrap_err();
        assert_eq!(err, SquadError::InvalidCategoryRange { value: 4, min: 5, max: 100 });
        assert!(AttributeValidator::validate_category(rules, 101).is_err());
    }

    #[test]
    fn test_validate_overall() {
        let rules = get_rules();
        assert!(AttributeValidator::validate_overall(rules, 10).is_ok());
        assert!(AttributeValidator::validate_overall(rules, 200).is_ok());

        assert!(AttributeValidator::validate_overall(rules, 9).is_err());
        let err = AttributeValidator::validate_overall(rules, 201).unwrap_err();
        assert_eq!(err.code(), "INVALID_OVERALL_RANGE");
    }

    #[test]
    fn test_validate_ratings_reports_position() {
        let rules = get_rules();
        assert!(AttributeValidator::validate_ratings(rules, &[10, 12, 20]).is_ok());

        let err = AttributeValidator::validate_ratings(rules, &[10, 0, 20]).unwrap_err();
        assert!(matches!(
            err,
            SquadError::InvalidAttributeRange { ref attribute, value: 0, .. } if attribute == "#1"
        ));
    }

    #[test]
    fn test_validate_categories() {
        let rules = get_rules();
        let good = CategoryScores::uniform(50);
        assert!(AttributeValidator::validate_categories(rules, &good).is_ok());
        let bad = CategoryScores::new(50, 50, 120, 50);
        assert!(AttributeValidator::validate_categories(rules, &bad).is_err());
    }

    #[test]
    fn test_validate_attribute_set() {
        let rules = get_rules();
        let set = AttributeSet::uniform(rules, 10).unwrap();
        assert!(AttributeValidator::validate_attribute_set(rules, &set).is_ok());
    }
}
