use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category and overall scores share one integer type; ranges come from the rules table.
pub type Score = u16;

/// The four fixed attribute groups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Technical,
    Mental,
    Physical,
    Goalkeeper,
}

impl Category {
    pub const ALL: [Category; 4] =
        [Category::Technical, Category::Mental, Category::Physical, Category::Goalkeeper];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technical => "technical",
            Category::Mental => "mental",
            Category::Physical => "physical",
            Category::Goalkeeper => "goalkeeper",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "technical" | "tech" => Ok(Category::Technical),
            "mental" => Ok(Category::Mental),
            "physical" | "phys" => Ok(Category::Physical),
            "goalkeeper" | "gk" | "goalkeeping" => Ok(Category::Goalkeeper),
            _ => Err(format!("Invalid category: {}", s)),
        }
    }
}

/// One computed score per category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CategoryScores {
    pub technical: Score,
    pub mental: Score,
    pub physical: Score,
    pub goalkeeper: Score,
}

impl CategoryScores {
    pub fn new(technical: Score, mental: Score, physical: Score, goalkeeper: Score) -> Self {
        Self { technical, mental, physical, goalkeeper }
    }

    pub fn uniform(score: Score) -> Self {
        Self::new(score, score, score, score)
    }

    pub fn get(&self, category: Category) -> Score {
        match category {
            Category::Technical => self.technical,
            Category::Mental => self.mental,
            Category::Physical => self.physical,
            Category::Goalkeeper => self.goalkeeper,
        }
    }

    pub fn set(&mut self, category: Category, score: Score) {
        match category {
            Category::Technical => self.technical = score,
            Category::Mental => self.mental = score,
            Category::Physical => self.physical = score,
            Category::Goalkeeper => self.goalkeeper = score,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, Score)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// Derived scores for one attribute set. Never edited directly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ScoreCard {
    pub categories: CategoryScores,
    pub overall: Score,
}
