//! # Pass Network
//!
//! Counts completed passes between each unordered pair of teammates.

use crate::events::pass_classifier::{ChangeKind, PassClassification};
use crate::types::{EntityId, Team};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One link of the network: an unordered player pair and its pass count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassLink {
    pub players: (EntityId, EntityId),
    pub passes: u32,
}

/// Pass counts per unordered pair, keyed `(lower id, higher id)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassNetwork {
    pub home: BTreeMap<(EntityId, EntityId), u32>,
    pub away: BTreeMap<(EntityId, EntityId), u32>,
}

impl PassNetwork {
    pub fn team(&self, team: Team) -> &BTreeMap<(EntityId, EntityId), u32> {
        match team {
            Team::Home => &self.home,
            Team::Away => &self.away,
        }
    }

    /// Strongest links, descending by count then ascending by pair.
    pub fn top_links(&self, team: Team, n: usize) -> Vec<PassLink> {
        let mut links: Vec<PassLink> = self
            .team(team)
            .iter()
            .map(|(&players, &passes)| PassLink { players, passes })
            .collect();
        links.sort_by(|a, b| b.passes.cmp(&a.passes).then(a.players.cmp(&b.players)));
        links.truncate(n);
        links
    }

    /// All links of one team in pair order (map keys are tuples, so the
    /// serialised form is a list).
    pub fn links(&self, team: Team) -> Vec<PassLink> {
        self.team(team)
            .iter()
            .map(|(&players, &passes)| PassLink { players, passes })
            .collect()
    }
}

impl Serialize for PassNetwork {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("PassNetwork", 2)?;
        s.serialize_field("home", &self.links(Team::Home))?;
        s.serialize_field("away", &self.links(Team::Away))?;
        s.end()
    }
}

/// Build the network from classified passes.
pub fn pass_network(classification: &PassClassification) -> PassNetwork {
    let mut network = PassNetwork::default();
    for event in classification
        .events
        .iter()
        .filter(|e| e.kind == ChangeKind::Pass)
    {
        let Some(team) = event.from_team else {
            continue;
        };
        let (a, b) = (event.passer(), event.receiver());
        let key = (a.min(b), a.max(b));
        let links = match team {
            Team::Home => &mut network.home,
            Team::Away => &mut network.away,
        };
        *links.entry(key).or_insert(0) += 1;
    }
    network
}
