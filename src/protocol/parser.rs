//! Warlight command parser.
//!
//! Parses incoming server lines into structured `Command` variants that the
//! engine loop dispatches on.

use thiserror::Error;

use crate::board::{Move, Owner, RegionId, RegionUpdate, SuperRegionId};
use crate::state::Setting;

/// Errors that can occur when parsing a server line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("empty line")]
    EmptyLine,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("unknown setting: {0}")]
    UnknownSetting(String),

    #[error("unknown setup_map section: {0}")]
    UnknownMapSection(String),

    #[error("unknown go phase: {0}")]
    UnknownPhase(String),

    #[error("unexpected end of input, expected {0}")]
    MissingToken(&'static str),

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("malformed neighbor list: {0}")]
    MalformedNeighbors(String),

    #[error("unknown move kind: {0}")]
    UnknownMoveKind(String),
}

/// A parsed server-to-bot command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `settings <key> <value..>`
    Settings(Setting),

    /// `setup_map super_regions [<id> <reward>]*`
    SetupSuperRegions(Vec<(SuperRegionId, u32)>),

    /// `setup_map regions [<id> <super_region>]*`
    SetupRegions(Vec<(RegionId, SuperRegionId)>),

    /// `setup_map neighbors [<id> <a,b,c>]*`
    SetupNeighbors(Vec<(RegionId, Vec<RegionId>)>),

    /// `setup_map wastelands <id>*`
    SetupWastelands(Vec<RegionId>),

    /// `update_map [<id> <owner> <armies>]*`
    UpdateMap(Vec<RegionUpdate>),

    /// `opponent_moves <move>*`
    OpponentMoves(Vec<Move>),

    /// `pick_starting_region <timeout> <id>*`
    PickStartingRegion { timeout_ms: u64, regions: Vec<RegionId> },

    /// `go place_armies <timeout>`
    GoPlaceArmies { timeout_ms: u64 },

    /// `go attack/transfer <timeout>`
    GoAttackTransfer { timeout_ms: u64 },
}

/// Parses a single line of input into a `Command`.
pub fn parse_command(line: &str) -> Result<Command, ProtocolError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(&head) = tokens.first() else {
        return Err(ProtocolError::EmptyLine);
    };

    match head {
        "settings" => parse_settings(&tokens[1..]),
        "setup_map" => parse_setup_map(&tokens[1..]),
        "update_map" => parse_update_map(&tokens[1..]),
        "opponent_moves" => parse_moves(&tokens[1..]).map(Command::OpponentMoves),
        "pick_starting_region" => {
            let timeout_ms = number(token(&tokens, 1, "timeout")?)?;
            let regions = ids(&tokens[2..])?;
            Ok(Command::PickStartingRegion { timeout_ms, regions })
        }
        "go" => {
            let phase = token(&tokens, 1, "phase")?;
            let timeout_ms = number(token(&tokens, 2, "timeout")?)?;
            match phase {
                "place_armies" => Ok(Command::GoPlaceArmies { timeout_ms }),
                "attack/transfer" => Ok(Command::GoAttackTransfer { timeout_ms }),
                other => Err(ProtocolError::UnknownPhase(other.to_string())),
            }
        }
        other => Err(ProtocolError::UnknownCommand(other.to_string())),
    }
}

fn token<'a>(tokens: &[&'a str], idx: usize, expected: &'static str) -> Result<&'a str, ProtocolError> {
    tokens
        .get(idx)
        .copied()
        .ok_or(ProtocolError::MissingToken(expected))
}

fn number<T: std::str::FromStr>(s: &str) -> Result<T, ProtocolError> {
    s.parse()
        .map_err(|_| ProtocolError::InvalidNumber(s.to_string()))
}

fn ids(tokens: &[&str]) -> Result<Vec<RegionId>, ProtocolError> {
    tokens.iter().map(|t| number(t).map(RegionId)).collect()
}

/// Parses `<key> <value..>` after `settings`.
fn parse_settings(tokens: &[&str]) -> Result<Command, ProtocolError> {
    let key = token(tokens, 0, "setting name")?;
    let value = || token(tokens, 1, "setting value");
    let setting = match key {
        "your_bot" => Setting::YourBot(value()?.to_string()),
        "opponent_bot" => Setting::OpponentBot(value()?.to_string()),
        "max_rounds" => Setting::MaxRounds(number(value()?)?),
        "timebank" => Setting::Timebank(number(value()?)?),
        "time_per_move" => Setting::TimePerMove(number(value()?)?),
        "starting_armies" => Setting::StartingArmies(number(value()?)?),
        "starting_pick_amount" => Setting::StartingPickAmount(number(value()?)?),
        "starting_regions" => Setting::StartingRegions(ids(&tokens[1..])?),
        other => return Err(ProtocolError::UnknownSetting(other.to_string())),
    };
    Ok(Command::Settings(setting))
}

/// Parses the section name and its pairs after `setup_map`.
fn parse_setup_map(tokens: &[&str]) -> Result<Command, ProtocolError> {
    let section = token(tokens, 0, "setup_map section")?;
    let rest = &tokens[1..];
    match section {
        "super_regions" => pairs(rest, "super-region reward")?
            .into_iter()
            .map(|(id, reward)| -> Result<_, ProtocolError> {
                Ok((SuperRegionId(number(id)?), number(reward)?))
            })
            .collect::<Result<_, _>>()
            .map(Command::SetupSuperRegions),
        "regions" => pairs(rest, "region super-region")?
            .into_iter()
            .map(|(id, sr)| -> Result<_, ProtocolError> {
                Ok((RegionId(number(id)?), SuperRegionId(number(sr)?)))
            })
            .collect::<Result<_, _>>()
            .map(Command::SetupRegions),
        "neighbors" => pairs(rest, "neighbor list")?
            .into_iter()
            .map(|(id, list)| -> Result<_, ProtocolError> {
                Ok((RegionId(number(id)?), neighbor_list(list)?))
            })
            .collect::<Result<_, _>>()
            .map(Command::SetupNeighbors),
        "wastelands" => ids(rest).map(Command::SetupWastelands),
        other => Err(ProtocolError::UnknownMapSection(other.to_string())),
    }
}

fn pairs<'a>(tokens: &[&'a str], expected: &'static str) -> Result<Vec<(&'a str, &'a str)>, ProtocolError> {
    if tokens.len() % 2 != 0 {
        return Err(ProtocolError::MissingToken(expected));
    }
    Ok(tokens.chunks(2).map(|c| (c[0], c[1])).collect())
}

fn neighbor_list(list: &str) -> Result<Vec<RegionId>, ProtocolError> {
    list.split(',')
        .map(|s| {
            s.parse()
                .map(RegionId)
                .map_err(|_| ProtocolError::MalformedNeighbors(list.to_string()))
        })
        .collect()
}

/// Parses `[<id> <owner> <armies>]*` after `update_map`.
fn parse_update_map(tokens: &[&str]) -> Result<Command, ProtocolError> {
    if tokens.len() % 3 != 0 {
        return Err(ProtocolError::MissingToken("region owner armies"));
    }
    tokens
        .chunks(3)
        .map(|c| -> Result<_, ProtocolError> {
            Ok(RegionUpdate {
                region: RegionId(number(c[0])?),
                owner: Owner::from_name(c[1]),
                armies: number(c[2])?,
            })
        })
        .collect::<Result<_, _>>()
        .map(Command::UpdateMap)
}

/// Parses a space-separated sequence of moves, each starting with the
/// player name.
pub fn parse_moves(tokens: &[&str]) -> Result<Vec<Move>, ProtocolError> {
    let mut moves = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let player = tokens[i];
        let kind = token(tokens, i + 1, "move kind")?;
        match kind {
            "place_armies" => {
                let region = number(token(tokens, i + 2, "region")?)?;
                let armies = number(token(tokens, i + 3, "armies")?)?;
                moves.push(Move::place(player, RegionId(region), armies));
                i += 4;
            }
            "attack/transfer" => {
                let from = number(token(tokens, i + 2, "source region")?)?;
                let to = number(token(tokens, i + 3, "target region")?)?;
                let armies = number(token(tokens, i + 4, "armies")?)?;
                moves.push(Move::attack(player, RegionId(from), RegionId(to), armies));
                i += 5;
            }
            other => return Err(ProtocolError::UnknownMoveKind(other.to_string())),
        }
    }
    Ok(moves)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_settings_lines() {
        assert_eq!(
            parse_command("settings your_bot player1"),
            Ok(Command::Settings(Setting::YourBot("player1".into())))
        );
        assert_eq!(
            parse_command("settings timebank 10000"),
            Ok(Command::Settings(Setting::Timebank(10000)))
        );
        assert_eq!(
            parse_command("settings starting_regions 3 7 12"),
            Ok(Command::Settings(Setting::StartingRegions(vec![
                RegionId(3),
                RegionId(7),
                RegionId(12)
            ])))
        );
        assert_eq!(
            parse_command("settings starting_armies 5"),
            Ok(Command::Settings(Setting::StartingArmies(5)))
        );
    }

    #[test]
    fn parse_setup_map_sections() {
        assert_eq!(
            parse_command("setup_map super_regions 1 2 2 5"),
            Ok(Command::SetupSuperRegions(vec![
                (SuperRegionId(1), 2),
                (SuperRegionId(2), 5)
            ]))
        );
        assert_eq!(
            parse_command("setup_map regions 1 1 2 1 3 2"),
            Ok(Command::SetupRegions(vec![
                (RegionId(1), SuperRegionId(1)),
                (RegionId(2), SuperRegionId(1)),
                (RegionId(3), SuperRegionId(2)),
            ]))
        );
        assert_eq!(
            parse_command("setup_map neighbors 1 2,3 2 3"),
            Ok(Command::SetupNeighbors(vec![
                (RegionId(1), vec![RegionId(2), RegionId(3)]),
                (RegionId(2), vec![RegionId(3)]),
            ]))
        );
        assert_eq!(
            parse_command("setup_map wastelands 3"),
            Ok(Command::SetupWastelands(vec![RegionId(3)]))
        );
    }

    #[test]
    fn parse_update_map_line() {
        assert_eq!(
            parse_command("update_map 1 player1 2 2 neutral 2 3 player2 5"),
            Ok(Command::UpdateMap(vec![
                RegionUpdate { region: RegionId(1), owner: Owner::Player("player1".into()), armies: 2 },
                RegionUpdate { region: RegionId(2), owner: Owner::Neutral, armies: 2 },
                RegionUpdate { region: RegionId(3), owner: Owner::Player("player2".into()), armies: 5 },
            ]))
        );
        assert_eq!(parse_command("update_map"), Ok(Command::UpdateMap(vec![])));
    }

    #[test]
    fn parse_opponent_moves_line() {
        assert_eq!(
            parse_command("opponent_moves player2 place_armies 3 2 player2 attack/transfer 3 1 6"),
            Ok(Command::OpponentMoves(vec![
                Move::place("player2", RegionId(3), 2),
                Move::attack("player2", RegionId(3), RegionId(1), 6),
            ]))
        );
        assert_eq!(parse_command("opponent_moves"), Ok(Command::OpponentMoves(vec![])));
    }

    #[test]
    fn parse_requests() {
        assert_eq!(
            parse_command("pick_starting_region 10000 4 9"),
            Ok(Command::PickStartingRegion {
                timeout_ms: 10000,
                regions: vec![RegionId(4), RegionId(9)]
            })
        );
        assert_eq!(
            parse_command("go place_armies 500"),
            Ok(Command::GoPlaceArmies { timeout_ms: 500 })
        );
        assert_eq!(
            parse_command("  go attack/transfer 500  "),
            Ok(Command::GoAttackTransfer { timeout_ms: 500 })
        );
    }

    #[test]
    fn malformed_lines_are_errors() {
        assert_eq!(parse_command("   "), Err(ProtocolError::EmptyLine));
        assert_eq!(
            parse_command("bogus 1 2"),
            Err(ProtocolError::UnknownCommand("bogus".into()))
        );
        assert_eq!(
            parse_command("settings favourite_color blue"),
            Err(ProtocolError::UnknownSetting("favourite_color".into()))
        );
        assert_eq!(
            parse_command("settings max_rounds lots"),
            Err(ProtocolError::InvalidNumber("lots".into()))
        );
        assert_eq!(
            parse_command("setup_map regions 1"),
            Err(ProtocolError::MissingToken("region super-region"))
        );
        assert_eq!(
            parse_command("setup_map neighbors 1 2,x"),
            Err(ProtocolError::MalformedNeighbors("2,x".into()))
        );
        assert_eq!(
            parse_command("update_map 1 player1"),
            Err(ProtocolError::MissingToken("region owner armies"))
        );
        assert_eq!(
            parse_command("opponent_moves player2 retreat 3"),
            Err(ProtocolError::UnknownMoveKind("retreat".into()))
        );
        assert_eq!(
            parse_command("go sideways 10"),
            Err(ProtocolError::UnknownPhase("sideways".into()))
        );
        assert_eq!(parse_command("go place_armies"), Err(ProtocolError::MissingToken("timeout")));
    }
}
