// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Achievement rule engine.
//!
//! Every award predicate lives in one closed registry; a new achievement
//! kind is added by registering a rule here, not by editing call sites.
//! The post-finish sweep in [`crate::services::RunLifecycle`] is the single
//! evaluation point for the whole table.

use crate::error::{AppError, Result};
use crate::models::{Challenge, ChallengeKind, Run};
use crate::store::Store;

/// Inputs a rule predicate may consult.
struct RuleContext<'a> {
    athlete_id: u64,
    /// The run whose finish triggered the sweep, when there is one.
    run: Option<&'a Run>,
}

/// How a rule keeps its award from recurring, if at all.
enum AwardPolicy {
    /// The predicate itself stops matching once the award exists; the
    /// store's (athlete, kind) index is the only other guard.
    PredicateGated,
    /// Check the store for an existing award before evaluating.
    SkipIfAwarded,
    /// Award on every qualifying evaluation, never deduplicated.
    Repeatable,
}

struct Rule {
    kind: ChallengeKind,
    policy: AwardPolicy,
    predicate: fn(&AchievementEngine, &RuleContext) -> bool,
}

/// The closed rule table, in evaluation order.
const RULES: [Rule; 3] = [
    Rule {
        kind: ChallengeKind::TenRuns,
        policy: AwardPolicy::PredicateGated,
        predicate: AchievementEngine::ten_runs_completed,
    },
    Rule {
        kind: ChallengeKind::FiftyKilometers,
        policy: AwardPolicy::SkipIfAwarded,
        predicate: AchievementEngine::fifty_km_total,
    },
    Rule {
        kind: ChallengeKind::TwoKmInTenMinutes,
        policy: AwardPolicy::Repeatable,
        predicate: AchievementEngine::two_km_in_ten_minutes,
    },
];

/// Evaluates achievement predicates against an athlete's run history.
///
/// The engine itself is stateless; every evaluator is idempotent and safe
/// to call repeatedly.
#[derive(Clone)]
pub struct AchievementEngine {
    store: Store,
}

impl AchievementEngine {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Evaluate every registered rule after a run finishes.
    ///
    /// Returns the challenges awarded by this sweep, possibly empty.
    pub fn evaluate_after_finish(&self, run: &Run) -> Result<Vec<Challenge>> {
        self.require_athlete(run.athlete_id)?;

        let ctx = RuleContext {
            athlete_id: run.athlete_id,
            run: Some(run),
        };

        let mut awarded = Vec::new();
        for rule in &RULES {
            if let Some(challenge) = self.evaluate_rule(rule, &ctx)? {
                awarded.push(challenge);
            }
        }
        Ok(awarded)
    }

    /// Re-check the ten-runs milestone for an athlete.
    pub fn check_ten_runs(&self, athlete_id: u64) -> Result<Option<Challenge>> {
        self.check_kind(athlete_id, ChallengeKind::TenRuns)
    }

    /// Re-check the fifty-kilometer milestone for an athlete.
    pub fn check_fifty_km(&self, athlete_id: u64) -> Result<Option<Challenge>> {
        self.check_kind(athlete_id, ChallengeKind::FiftyKilometers)
    }

    fn check_kind(&self, athlete_id: u64, kind: ChallengeKind) -> Result<Option<Challenge>> {
        self.require_athlete(athlete_id)?;

        let ctx = RuleContext {
            athlete_id,
            run: None,
        };
        match RULES.iter().find(|rule| rule.kind == kind) {
            Some(rule) => self.evaluate_rule(rule, &ctx),
            None => Ok(None),
        }
    }

    fn evaluate_rule(&self, rule: &Rule, ctx: &RuleContext) -> Result<Option<Challenge>> {
        if matches!(rule.policy, AwardPolicy::SkipIfAwarded)
            && self.store.has_challenge(ctx.athlete_id, rule.kind)
        {
            return Ok(None);
        }

        if !(rule.predicate)(self, ctx) {
            return Ok(None);
        }

        self.award(ctx.athlete_id, rule.kind)
    }

    /// Record an award, translating a uniqueness collision into a quiet
    /// "already awarded" outcome.
    fn award(&self, athlete_id: u64, kind: ChallengeKind) -> Result<Option<Challenge>> {
        match self.store.create_challenge(athlete_id, kind) {
            Ok(challenge) => {
                tracing::info!(athlete_id, kind = kind.display_name(), "Challenge awarded");
                Ok(Some(challenge))
            }
            Err(AppError::AlreadyExists(_)) => {
                tracing::debug!(
                    athlete_id,
                    kind = kind.display_name(),
                    "Challenge already awarded"
                );
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn require_athlete(&self, athlete_id: u64) -> Result<()> {
        if self.store.get_user(athlete_id).is_none() {
            return Err(AppError::NotFound(format!("athlete {athlete_id}")));
        }
        Ok(())
    }

    // ─── Predicates ──────────────────────────────────────────────

    /// Exactly ten finished runs. Equality is the sole gate: once the count
    /// moves past ten the predicate stays false, which is what keeps this
    /// award from recurring.
    fn ten_runs_completed(&self, ctx: &RuleContext) -> bool {
        self.store.finished_run_count(ctx.athlete_id) == 10
    }

    /// At least fifty kilometers summed over all finished runs.
    fn fifty_km_total(&self, ctx: &RuleContext) -> bool {
        self.store.finished_distance_total(ctx.athlete_id) >= 50.0
    }

    /// The finished run itself covered 2 km within 10 minutes.
    fn two_km_in_ten_minutes(&self, ctx: &RuleContext) -> bool {
        ctx.run.is_some_and(|run| {
            run.distance.is_some_and(|d| d >= 2.0)
                && run.run_time_seconds.is_some_and(|t| t <= 600)
        })
    }
}
