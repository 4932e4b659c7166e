use serde::Serialize;

use crate::belief::BeliefState;
use crate::model::location::TargetLocation;
use crate::search::effectiveness::RoundEffectiveness;
use crate::search::executor::SearchOutcome;

/// Everything the presentation layer needs to describe one round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundReport {
    pub round: u32,
    pub outcomes: [SearchOutcome; 2],
    /// Effectiveness per area; zero for the areas not searched this round.
    pub effectiveness: RoundEffectiveness,
    /// Revised belief, absent when the target was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub belief: Option<BeliefState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found: Option<TargetLocation>,
}

impl RoundReport {
    pub fn is_found(&self) -> bool {
        self.found.is_some()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::game::session::{SearchSession, SessionConfig};
    use crate::model::area::{AreaId, Cell};
    use crate::model::location::TargetLocation;
    use crate::search::effectiveness::FixedEffectiveness;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn unsuccessful_round_serializes_belief_without_cells() {
        let mut session = SearchSession::with_target(
            SessionConfig::floorplan(),
            TargetLocation::new(AreaId::new(4), Cell::new(3, 3)),
            FixedEffectiveness::new(vec![0.5, 0.25, 0.5, 0.5]),
            SmallRng::seed_from_u64(8),
        )
        .unwrap();
        let report = session
            .submit_area_pair(AreaId::new(1), AreaId::new(2))
            .unwrap();
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["round"], 1);
        assert_eq!(value["outcomes"][0]["result"], "not_found");
        assert_eq!(value["outcomes"][0]["scanned_count"], 16_500);
        assert!(value["outcomes"][0].get("scanned").is_none());
        assert_eq!(value["effectiveness"][2], 0.0);
        assert_eq!(value["belief"].as_array().map(Vec::len), Some(4));
        assert!(value.get("found").is_none());
    }

    #[test]
    fn found_round_serializes_location() {
        let mut session = SearchSession::with_target(
            SessionConfig::floorplan(),
            TargetLocation::new(AreaId::new(3), Cell::new(10, 20)),
            FixedEffectiveness::new(vec![0.5, 0.5, 1.0, 0.5]),
            SmallRng::seed_from_u64(8),
        )
        .unwrap();
        let report = session
            .submit_area_pair(AreaId::new(3), AreaId::new(4))
            .unwrap();
        assert!(report.is_found());
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["found"]["area"], 3);
        assert_eq!(value["found"]["cell"]["x"], 10);
        assert_eq!(value["found"]["cell"]["y"], 20);
        assert!(value.get("belief").is_none());
    }
}
