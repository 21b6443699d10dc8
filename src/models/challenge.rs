// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Challenge (achievement) model.

use serde::{Deserialize, Serialize};

/// The closed set of achievement kinds.
///
/// New kinds are added here and registered in the achievement engine's rule
/// table; call sites never grow ad hoc checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKind {
    /// Exactly ten finished runs.
    TenRuns,
    /// Fifty kilometers summed over all finished runs.
    FiftyKilometers,
    /// A single run of at least 2 km finished within 10 minutes.
    TwoKmInTenMinutes,
}

impl ChallengeKind {
    /// Every registered kind, in award-evaluation order.
    pub const ALL: [ChallengeKind; 3] = [
        ChallengeKind::TenRuns,
        ChallengeKind::FiftyKilometers,
        ChallengeKind::TwoKmInTenMinutes,
    ];

    /// Human-readable name shown in listings and summaries.
    pub fn display_name(&self) -> &'static str {
        match self {
            ChallengeKind::TenRuns => "Complete 10 runs!",
            ChallengeKind::FiftyKilometers => "Run 50 kilometers!",
            ChallengeKind::TwoKmInTenMinutes => "2 kilometers in 10 minutes!",
        }
    }

    /// Whether the store enforces at most one award per athlete for this kind.
    ///
    /// `TwoKmInTenMinutes` is a per-run feat and recurs for every qualifying
    /// run, so it is exempt from the (athlete, kind) uniqueness constraint.
    pub fn dedup_per_athlete(&self) -> bool {
        !matches!(self, ChallengeKind::TwoKmInTenMinutes)
    }
}

/// A recorded fact that an athlete met a milestone predicate.
///
/// Created only by the achievement engine; never mutated or deleted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub id: u64,
    pub athlete_id: u64,
    pub kind: ChallengeKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for kind in ChallengeKind::ALL {
            assert!(seen.insert(kind.display_name()), "duplicate display name");
        }
    }

    #[test]
    fn only_the_sprint_kind_repeats() {
        assert!(ChallengeKind::TenRuns.dedup_per_athlete());
        assert!(ChallengeKind::FiftyKilometers.dedup_per_athlete());
        assert!(!ChallengeKind::TwoKmInTenMinutes.dedup_per_athlete());
    }
}
