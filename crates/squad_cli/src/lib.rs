//! Squad CLI Library
//!
//! File loading and text rendering around squad_core.

use anyhow::{Context, Result};
use serde::Deserialize;
use squad_core::{
    get_rules, AllocationResult, AttributeSet, AttributeValidator, Category, Player, PlayerId,
    Position, RosterEntry, ScoreCalculator, SquadRules,
};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Player sheet as stored on disk. Attributes are resolved against the
/// active rules table, so custom tables may rename attributes.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerFile {
    pub id: PlayerId,
    pub name: String,
    pub position: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, i64>,
}

/// Pre-scored roster line. The name is informational only.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryFile {
    pub id: PlayerId,
    #[serde(default)]
    pub name: Option<String>,
    pub position: String,
    pub overall: i64,
}

/// One roster line: either a pre-scored entry or a full player sheet.
/// A line carrying both `overall` and `attributes` matches neither.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RosterItem {
    Entry(EntryFile),
    Player(PlayerFile),
}

/// Embedded rules, or the YAML document at `path`.
pub fn load_rules(path: Option<&Path>) -> Result<SquadRules> {
    let Some(path) = path else {
        return Ok(get_rules().clone());
    };
    let yaml = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rules file: {}", path.display()))?;
    SquadRules::from_yaml_str(&yaml)
        .with_context(|| format!("Failed to load rules from {}", path.display()))
}

fn parse_position(id: PlayerId, position: &str) -> Result<Position> {
    position.parse().map_err(|e: String| anyhow::anyhow!("player {id}: {e}"))
}

pub fn build_player(calculator: &ScoreCalculator, file: PlayerFile) -> Result<Player> {
    let position = parse_position(file.id, &file.position)?;
    let attributes = AttributeSet::from_ratings(calculator.rules(), file.attributes)
        .with_context(|| format!("player {}: invalid attributes", file.id))?;
    Ok(Player::new(calculator, file.id, file.name, position, attributes)?)
}

pub fn load_player(calculator: &ScoreCalculator, path: &Path) -> Result<Player> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read player file: {}", path.display()))?;
    let file: PlayerFile = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse player file: {}", path.display()))?;
    build_player(calculator, file)
}

/// Read a JSON array of roster items; full player sheets are scored on the way in.
pub fn load_roster(calculator: &ScoreCalculator, path: &Path) -> Result<Vec<RosterEntry>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster file: {}", path.display()))?;
    let items: Vec<RosterItem> = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse roster file: {}", path.display()))?;

    items
        .into_iter()
        .map(|item| match item {
            RosterItem::Player(file) => {
                build_player(calculator, file).map(|player| RosterEntry::from(&player))
            }
            RosterItem::Entry(EntryFile { id, position, overall, .. }) => {
                let position = parse_position(id, &position)?;
                let overall = AttributeValidator::validate_overall(calculator.rules(), overall)
                    .with_context(|| format!("player {id}: invalid overall"))?;
                Ok(RosterEntry::new(id, position, overall))
            }
        })
        .collect()
}

/// Parse `NAME=VALUE`, e.g. `technical=80`.
pub fn parse_category_edit(raw: &str) -> Result<(Category, i64)> {
    let (name, value) = raw
        .split_once('=')
        .with_context(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let category: Category = name.trim().parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let value: i64 = value
        .trim()
        .parse()
        .with_context(|| format!("invalid score in '{raw}'"))?;
    Ok((category, value))
}

/// Text score card for one player.
pub struct ScoreCardView<'a>(pub &'a Player);

impl fmt::Display for ScoreCardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let player = self.0;
        writeln!(f, "{} (#{}, {})", player.name, player.id, player.position)?;
        for (category, score) in player.scores().categories.iter() {
            writeln!(f, "  {:<12} {:>3}", category.as_str(), score)?;
        }
        writeln!(f, "  {:<12} {:>3}", "overall", player.overall())
    }
}

/// Text team sheets, score gap and shortfalls for an allocation.
pub struct AllocationView<'a>(pub &'a AllocationResult);

impl fmt::Display for AllocationView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        for team in &result.teams {
            writeln!(
                f,
                "Team {} - total {} ({} starters, {} open)",
                team.index + 1,
                team.total_score,
                team.starters.len(),
                team.open_slots
            )?;
            for entry in &team.starters {
                let code = entry.position.short_code();
                writeln!(f, "  {} #{:<5} {:>3}", code, entry.id, entry.overall)?;
            }
            if !team.substitutes.is_empty() {
                let subs = team
                    .substitutes
                    .iter()
                    .map(|e| format!("{} #{}", e.position.short_code(), e.id))
                    .collect::<Vec<_>>()
                    .join(", ");
                writeln!(f, "  subs: {subs}")?;
            }
        }
        if result.teams.len() == 2 {
            writeln!(f, "Score gap: {}", result.score_gap())?;
        }
        for shortfall in &result.shortfalls {
            writeln!(
                f,
                "Team {} short of {}: {}/{}",
                shortfall.team + 1,
                shortfall.position,
                shortfall.filled,
                shortfall.required
            )?;
        }
        Ok(())
    }
}

pub fn render_score_card(player: &Player) -> String {
    ScoreCardView(player).to_string()
}

pub fn render_allocation(result: &AllocationResult) -> String {
    AllocationView(result).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use squad_core::allocate_teams;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(contents.as_bytes())?;
        Ok(file)
    }

    #[test]
    fn test_load_player_fills_missing_attributes() -> Result<()> {
        let file = write_temp(
            r#"{"id": 4, "name": "Stopper", "position": "DF",
                "attributes": {"tackling": 18, "marking": 18}}"#,
        )?;
        let calculator = ScoreCalculator::default();
        let player = load_player(&calculator, file.path())?;

        assert_eq!(player.position, Position::Defender);
        assert_eq!(player.attributes().get("pace"), Some(10));
        // technical: twelve 10s and two 18s -> 156 * 5 / 14 = 55.7 -> 56
        assert_eq!(player.category_score(Category::Technical), 56);
        Ok(())
    }

    #[test]
    fn test_load_player_reports_bad_rating() -> Result<()> {
        let file = write_temp(
            r#"{"id": 4, "name": "Stopper", "position": "DF", "attributes": {"pace": 30}}"#,
        )?;
        let err = load_player(&ScoreCalculator::default(), file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid attribute pace: 30"));
        Ok(())
    }

    #[test]
    fn test_load_mixed_roster() -> Result<()> {
        let file = write_temp(
            r#"[
                {"id": 1, "position": "GK", "overall": 120},
                {"id": 2, "name": "Nine", "position": "Forward", "attributes": {}},
                {"id": 3, "position": "mid", "overall": 95}
            ]"#,
        )?;
        let calculator = ScoreCalculator::default();
        let roster = load_roster(&calculator, file.path())?;

        assert_eq!(
            roster,
            vec![
                RosterEntry::new(1, Position::Goalkeeper, 120),
                RosterEntry::new(2, Position::Forward, 100),
                RosterEntry::new(3, Position::Midfielder, 95),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_named_roster_entry_keeps_overall() -> Result<()> {
        let file = write_temp(r#"[{"id": 1, "name": "Bob", "position": "GK", "overall": 150}]"#)?;
        let roster = load_roster(&ScoreCalculator::default(), file.path())?;
        assert_eq!(roster, vec![RosterEntry::new(1, Position::Goalkeeper, 150)]);
        Ok(())
    }

    #[test]
    fn test_roster_line_with_overall_and_attributes_is_rejected() -> Result<()> {
        let file = write_temp(
            r#"[{"id": 1, "name": "Bob", "position": "GK", "overall": 150,
                 "attributes": {"reflexes": 18}}]"#,
        )?;
        assert!(load_roster(&ScoreCalculator::default(), file.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_load_roster_rejects_bad_overall() -> Result<()> {
        let file = write_temp(r#"[{"id": 1, "position": "GK", "overall": 250}]"#)?;
        let err = load_roster(&ScoreCalculator::default(), file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("player 1"));
        Ok(())
    }

    #[test]
    fn test_custom_rules_file() -> Result<()> {
        let yaml = include_str!("../../squad_core/src/squad_rules_v1.yaml")
            .replace("max_rebalance_iterations: 100", "max_rebalance_iterations: 3");
        let file = write_temp(&yaml)?;
        let rules = load_rules(Some(file.path()))?;
        assert_eq!(rules.allocation.max_rebalance_iterations, 3);

        let broken = write_temp("version: [")?;
        assert!(load_rules(Some(broken.path())).is_err());
        assert!(load_rules(None).is_ok());
        Ok(())
    }

    #[test]
    fn test_parse_category_edit() -> Result<()> {
        assert_eq!(parse_category_edit("technical=80")?, (Category::Technical, 80));
        assert_eq!(parse_category_edit(" gk = 40 ")?, (Category::Goalkeeper, 40));
        assert!(parse_category_edit("technical").is_err());
        assert!(parse_category_edit("speed=50").is_err());
        assert!(parse_category_edit("mental=lots").is_err());
        Ok(())
    }

    #[test]
    fn test_render_allocation() -> Result<()> {
        let roster = vec![
            RosterEntry::new(1, Position::Goalkeeper, 120),
            RosterEntry::new(2, Position::Forward, 100),
            RosterEntry::new(3, Position::Forward, 90),
        ];
        let result = allocate_teams(roster, 1, 2)?;
        let text = render_allocation(&result);

        assert!(text.contains("Team 1 - total 220 (2 starters, 0 open)"));
        assert!(text.contains("subs: FW #3"));
        assert!(!text.contains("Score gap"));
        Ok(())
    }

    #[test]
    fn test_render_two_teams_with_shortfall() -> Result<()> {
        let roster = vec![
            RosterEntry::new(1, Position::Goalkeeper, 120),
            RosterEntry::new(2, Position::Forward, 100),
            RosterEntry::new(3, Position::Forward, 90),
        ];
        let result = allocate_teams(roster, 2, 2)?;
        let text = format!("{}", AllocationView(&result));

        assert_eq!(text, render_allocation(&result));
        assert!(text.contains("Team 2 short of Goalkeeper: 0/1"));
        assert!(text.contains("Score gap: "));
        assert!(text.ends_with('\n'));
        Ok(())
    }

    #[test]
    fn test_render_score_card() -> Result<()> {
        let calculator = ScoreCalculator::default();
        let attributes = AttributeSet::uniform(calculator.rules(), 10)?;
        let player = Player::new(&calculator, 7, "Seven", Position::Midfielder, attributes)?;
        let text = render_score_card(&player);

        assert!(text.starts_with("Seven (#7, Midfielder)"));
        assert!(text.contains("technical     50"));
        assert!(text.contains("overall      100"));
        Ok(())
    }
}
