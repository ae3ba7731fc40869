//! Game result tokens

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result written at the end of movetext
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameOutcome {
    #[serde(rename = "1-0")]
    WhiteWins,
    #[serde(rename = "0-1")]
    BlackWins,
    #[serde(rename = "1/2-1/2")]
    Draw,
    #[default]
    #[serde(rename = "*")]
    Unknown,
}

impl GameOutcome {
    pub fn token(self) -> &'static str {
        match self {
            GameOutcome::WhiteWins => "1-0",
            GameOutcome::BlackWins => "0-1",
            GameOutcome::Draw => "1/2-1/2",
            GameOutcome::Unknown => "*",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "1-0" => Some(GameOutcome::WhiteWins),
            "0-1" => Some(GameOutcome::BlackWins),
            "1/2-1/2" => Some(GameOutcome::Draw),
            "*" => Some(GameOutcome::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for GameOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameOutcome::from_token(s).ok_or_else(|| format!("unknown result token: {s:?}"))
    }
}
