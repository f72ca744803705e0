//! Static rules table shared by the scoring and allocation engines.
//!
//! The table is embedded YAML parsed once and validated once; every range,
//! weight and quota ratio used elsewhere is read from here.

use crate::error::{Result, SquadError};
use crate::models::{Category, Position, Rating};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

const SQUAD_RULES_YAML: &str = include_str!("squad_rules_v1.yaml");
static SQUAD_RULES: OnceLock<SquadRules> = OnceLock::new();

/// Expected group sizes, in `Category::ALL` order.
const GROUP_SIZES: [usize; 4] = [14, 14, 8, 5];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RangeSpec {
    pub min: u16,
    pub max: u16,
}

impl RangeSpec {
    pub fn contains(&self, value: i64) -> bool {
        (self.min as i64..=self.max as i64).contains(&value)
    }

    pub fn clamp(&self, value: i64) -> u16 {
        value.clamp(self.min as i64, self.max as i64) as u16
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub weight: u16,
    pub attributes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTable {
    pub technical: CategoryGroup,
    pub mental: CategoryGroup,
    pub physical: CategoryGroup,
    pub goalkeeper: CategoryGroup,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRules {
    pub goalkeepers_per_team: usize,
    pub defender_ratio: f64,
    pub midfielder_ratio: f64,
    pub max_rebalance_iterations: usize,
    /// Fill open outfield slots with overflow outfield players of another position.
    #[serde(default = "default_backfill")]
    pub backfill_outfield: bool,
}

fn default_backfill() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadRules {
    pub version: u8,
    pub attribute_range: RangeSpec,
    pub category_range: RangeSpec,
    pub overall_range: RangeSpec,
    pub attribute_scale: u16,
    pub overall_divisor: u16,
    pub neutral_rating: u8,
    pub categories: CategoryTable,
    pub allocation: AllocationRules,
}

impl SquadRules {
    /// Parse and validate a rules document.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let rules: SquadRules =
            serde_yaml::from_str(source).map_err(|e| SquadError::InvalidRules(e.to_string()))?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn group(&self, category: Category) -> &CategoryGroup {
        match category {
            Category::Technical => &self.categories.technical,
            Category::Mental => &self.categories.mental,
            Category::Physical => &self.categories.physical,
            Category::Goalkeeper => &self.categories.goalkeeper,
        }
    }

    pub fn attributes(&self, category: Category) -> &[String] {
        &self.group(category).attributes
    }

    pub fn weight(&self, category: Category) -> u16 {
        self.group(category).weight
    }

    pub fn total_weight(&self) -> u32 {
        Category::ALL.iter().map(|c| self.weight(*c) as u32).sum()
    }

    pub fn category_of(&self, attribute: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|c| self.attributes(*c).iter().any(|name| name == attribute))
    }

    /// All attribute names in display order (Technical, Mental, Physical, Goalkeeper).
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        Category::ALL
            .into_iter()
            .flat_map(move |c| self.attributes(c).iter().map(|s| s.as_str()))
    }

    /// Target starter ratio for an outfield position; goalkeepers use a fixed count.
    pub fn position_ratio(&self, position: Position) -> Option<f64> {
        match position {
            Position::Goalkeeper => None,
            Position::Defender => Some(self.allocation.defender_ratio),
            Position::Midfielder => Some(self.allocation.midfielder_ratio),
            Position::Forward => {
                Some(1.0 - self.allocation.defender_ratio - self.allocation.midfielder_ratio)
            }
        }
    }

    fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(SquadError::InvalidRules(msg));

        if self.attribute_range.min == 0 || self.attribute_range.min > self.attribute_range.max {
            return fail("attribute_range must be a non-empty range above zero".to_string());
        }
        if self.attribute_range.max > Rating::MAX as u16 {
            return fail(format!(
                "attribute_range max {} exceeds {}",
                self.attribute_range.max,
                Rating::MAX
            ));
        }
        if self.attribute_scale == 0 || self.overall_divisor == 0 {
            return fail("attribute_scale and overall_divisor must be positive".to_string());
        }
        let scale = self.attribute_scale as u32;
        if self.attribute_range.min as u32 * scale != self.category_range.min as u32
            || self.attribute_range.max as u32 * scale != self.category_range.max as u32
        {
            return fail("category_range must equal attribute_range scaled".to_string());
        }
        if !self.attribute_range.contains(self.neutral_rating as i64) {
            return fail(format!("neutral_rating {} out of range", self.neutral_rating));
        }

        let total_weight = self.total_weight();
        if total_weight == 0 {
            return fail("category weights sum to zero".to_string());
        }
        // [category.min, category.max] must land exactly on [overall.min, overall.max]
        let low = total_weight * self.category_range.min as u32;
        let high = total_weight * self.category_range.max as u32;
        let divisor = self.overall_divisor as u32;
        if low != self.overall_range.min as u32 * divisor
            || high != self.overall_range.max as u32 * divisor
        {
            return fail(format!(
                "weights {} / divisor {} do not map categories onto the overall range",
                total_weight, divisor
            ));
        }

        let mut seen = HashSet::new();
        for (category, expected) in Category::ALL.into_iter().zip(GROUP_SIZES) {
            let names = self.attributes(category);
            if names.len() != expected {
                return fail(format!(
                    "{} has {} attributes, expected {}",
                    category,
                    names.len(),
                    expected
                ));
            }
            for name in names {
                if !seen.insert(name.as_str()) {
                    return fail(format!("attribute {} listed twice", name));
                }
            }
        }

        let alloc = &self.allocation;
        if !(0.0..=1.0).contains(&alloc.defender_ratio)
            || !(0.0..=1.0).contains(&alloc.midfielder_ratio)
            || alloc.defender_ratio + alloc.midfielder_ratio > 1.0
        {
            return fail("position ratios must lie in [0, 1] and sum to at most 1".to_string());
        }
        if alloc.max_rebalance_iterations == 0 {
            return fail("max_rebalance_iterations must be at least 1".to_string());
        }

        Ok(())
    }
}

/// The embedded rules table.
pub fn get_rules() -> &'static SquadRules {
    SQUAD_RULES.get_or_init(|| {
        SquadRules::from_yaml_str(SQUAD_RULES_YAML).expect("embedded squad rules invalid")
    })
}
