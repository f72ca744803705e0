//! Per-player skill ratings.
//!
//! An `AttributeSet` is the single source of truth for a player's scores.
//! It always holds every attribute named by the rules table.

use crate::error::{Result, SquadError};
use crate::models::Category;
use crate::player::validation::AttributeValidator;
use crate::rules::{get_rules, SquadRules};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single attribute rating.
pub type Rating = u8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, i64>", into = "BTreeMap<String, Rating>")]
pub struct AttributeSet(BTreeMap<String, Rating>);

impl AttributeSet {
    /// Every attribute at the same rating.
    pub fn uniform(rules: &SquadRules, rating: Rating) -> Result<Self> {
        AttributeValidator::validate_rating(rules, "uniform", rating as i64)?;
        Ok(Self(rules.attribute_names().map(|name| (name.to_string(), rating)).collect()))
    }

    /// Build from a partial sheet. Missing attributes take the neutral rating.
    pub fn from_ratings<I, K>(rules: &SquadRules, ratings: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, i64)>,
        K: Into<String>,
    {
        let mut set = Self::uniform(rules, rules.neutral_rating)?;
        for (name, value) in ratings {
            set.set(rules, name, value)?;
        }
        Ok(set)
    }

    pub fn get(&self, name: &str) -> Option<Rating> {
        self.0.get(name).copied()
    }

    /// Overwrite one rating after range-checking it.
    pub fn set(&mut self, rules: &SquadRules, name: impl Into<String>, value: i64) -> Result<()> {
        let name = name.into();
        if rules.category_of(&name).is_none() {
            return Err(SquadError::UnknownAttribute(name));
        }
        let rating = AttributeValidator::validate_rating(rules, &name, value)?;
        self.0.insert(name, rating);
        Ok(())
    }

    /// Ratings of one group, in the rules table's display order.
    pub fn ratings(&self, rules: &SquadRules, category: Category) -> Vec<Rating> {
        rules
            .attributes(category)
            .iter()
            .map(|name| self.0.get(name).copied().unwrap_or(rules.neutral_rating))
            .collect()
    }

    /// Named ratings of one group, in display order.
    pub fn group<'a>(&self, rules: &'a SquadRules, category: Category) -> Vec<(&'a str, Rating)> {
        rules
            .attributes(category)
            .iter()
            .map(|name| {
                (name.as_str(), self.0.get(name).copied().unwrap_or(rules.neutral_rating))
            })
            .collect()
    }

    /// Write back a whole group produced by a redistribution.
    pub(crate) fn replace_group(
        &mut self,
        rules: &SquadRules,
        category: Category,
        ratings: &[Rating],
    ) {
        for (name, rating) in rules.attributes(category).iter().zip(ratings) {
            self.0.insert(name.clone(), *rating);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Rating)> {
        self.0.iter().map(|(name, rating)| (name.as_str(), *rating))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<BTreeMap<String, i64>> for AttributeSet {
    type Error = SquadError;

    fn try_from(ratings: BTreeMap<String, i64>) -> Result<Self> {
        Self::from_ratings(get_rules(), ratings)
    }
}

impl From<AttributeSet> for BTreeMap<String, Rating> {
    fn from(set: AttributeSet) -> Self {
        set.0
    }
}
