use serde::{Deserialize, Serialize};

use super::Address;
use crate::constants::MEDAL_RANKS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub address: Address,
    pub stars: u64,
}

impl RankingEntry {
    pub fn new(address: Address, stars: u64) -> Self {
        Self { address, stars }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    fn for_position(index: usize) -> Option<Self> {
        match index {
            0 => Some(Medal::Gold),
            1 => Some(Medal::Silver),
            2 => Some(Medal::Bronze),
            _ => None,
        }
    }
}

/// A leaderboard row as shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedUser {
    pub rank: usize,
    pub address: Address,
    pub stars: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medal: Option<Medal>,
}

/// Assign positional ranks 1..N in the order given. Does not re-sort, so
/// ties keep whatever order the store produced.
pub fn rank_users(entries: Vec<RankingEntry>) -> Vec<RankedUser> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| RankedUser {
            rank: index + 1,
            address: entry.address,
            stars: entry.stars,
            medal: if index < MEDAL_RANKS {
                Medal::for_position(index)
            } else {
                None
            },
        })
        .collect()
}
