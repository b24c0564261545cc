// A round in progress. The engine only stores the base plan and the outcome
// log; the effective plan (base plan plus the Skeet option slot) is derived
// from the log every time it is needed, so undo never leaves a stale option
// slot behind.

use serde::Serialize;
use tracing::{debug, info, warn};

use super::catalog::{normalize_starting_station, plan_for, plan_for_course, CourseLayout};
use super::errors::ScoringError;
use super::models::{Discipline, Gauge, ScoreRecord, ShotOutcome, ShotSlot, Station};

/// Where the Skeet option slot sits for a given outcome log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OptionPlacement {
    /// No miss yet and the base shots are not all recorded.
    Pending,
    /// Directly after the round's first miss, repeating its station.
    AfterMiss { index: usize, station: Station },
    /// Clean run through the base plan: a final shot at the last station.
    Appended { station: Station },
}

impl OptionPlacement {
    /// Decides the option slot from the outcome log.
    ///
    /// The first trigger wins and stays put: once a clean run has appended
    /// the slot, a miss on the option shot itself does not move it.
    pub fn derive(base_plan: &[ShotSlot], outcomes: &[ShotOutcome]) -> Self {
        let Some(last) = base_plan.last() else {
            return OptionPlacement::Pending;
        };

        let first_miss = outcomes.iter().position(|o| *o == ShotOutcome::Miss);
        match first_miss {
            Some(index) if index < base_plan.len() => OptionPlacement::AfterMiss {
                index,
                station: base_plan[index].station,
            },
            _ if outcomes.len() >= base_plan.len() => OptionPlacement::Appended {
                station: last.station,
            },
            _ => OptionPlacement::Pending,
        }
    }

    pub fn apply(&self, base_plan: &[ShotSlot]) -> Vec<ShotSlot> {
        let mut plan = base_plan.to_vec();
        match *self {
            OptionPlacement::Pending => {}
            OptionPlacement::AfterMiss { index, station } => {
                plan.insert(index + 1, ShotSlot::option(station));
            }
            OptionPlacement::Appended { station } => plan.push(ShotSlot::option(station)),
        }
        plan
    }
}

/// Effective plan for a discipline given the outcomes recorded so far.
/// Only Skeet ever grows an option slot.
pub fn effective_plan(
    discipline: Discipline,
    base_plan: &[ShotSlot],
    outcomes: &[ShotOutcome],
) -> Vec<ShotSlot> {
    if !discipline.has_option_shot() {
        return base_plan.to_vec();
    }
    OptionPlacement::derive(base_plan, outcomes).apply(base_plan)
}

/// Snapshot handed back after every change to a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundProgress {
    pub recorded: usize,
    pub required: usize,
    pub current_station: Option<Station>,
    pub next_is_option: bool,
    pub total_score: usize,
    pub complete: bool,
}

#[derive(Debug, Clone)]
pub struct ScoringEngine {
    discipline: Discipline,
    starting_station: Option<Station>,
    base_plan: Vec<ShotSlot>,
    outcomes: Vec<ShotOutcome>,
}

impl ScoringEngine {
    pub fn new(discipline: Discipline, starting_station: Station) -> Result<Self, ScoringError> {
        let base_plan = plan_for(discipline, starting_station)?;
        let starting_station = normalize_starting_station(discipline, starting_station)?;
        Ok(Self {
            discipline,
            starting_station,
            base_plan,
            outcomes: Vec::new(),
        })
    }

    /// Sporting Clays round over a course configured for the field.
    pub fn for_course(layout: &CourseLayout) -> Result<Self, ScoringError> {
        Ok(Self {
            discipline: Discipline::SportingClays,
            starting_station: None,
            base_plan: plan_for_course(layout)?,
            outcomes: Vec::new(),
        })
    }

    /// Rebuilds a round from a stored outcome log, applying the same checks
    /// as shot-by-shot entry.
    pub fn replay(
        discipline: Discipline,
        starting_station: Station,
        outcomes: &[ShotOutcome],
    ) -> Result<Self, ScoringError> {
        let mut engine = Self::new(discipline, starting_station)?;
        for outcome in outcomes {
            engine.record_outcome(*outcome)?;
        }
        Ok(engine)
    }

    pub fn discipline(&self) -> Discipline {
        self.discipline
    }

    pub fn starting_station(&self) -> Option<Station> {
        self.starting_station
    }

    pub fn base_plan(&self) -> &[ShotSlot] {
        &self.base_plan
    }

    pub fn outcomes(&self) -> &[ShotOutcome] {
        &self.outcomes
    }

    /// Only allowed before the first shot. Ignored for disciplines that do
    /// not rotate.
    pub fn set_starting_station(&mut self, starting_station: Station) -> Result<(), ScoringError> {
        if !self.outcomes.is_empty() {
            warn!(
                discipline = %self.discipline,
                starting_station,
                "Starting station change after first shot"
            );
            return Err(ScoringError::StartingStationLocked);
        }
        if !self.discipline.is_rotatable() {
            return Ok(());
        }

        self.base_plan = plan_for(self.discipline, starting_station)?;
        self.starting_station = Some(starting_station);
        Ok(())
    }

    pub fn effective_plan(&self) -> Vec<ShotSlot> {
        effective_plan(self.discipline, &self.base_plan, &self.outcomes)
    }

    pub fn option_placement(&self) -> Option<OptionPlacement> {
        self.discipline
            .has_option_shot()
            .then(|| OptionPlacement::derive(&self.base_plan, &self.outcomes))
    }

    pub fn current_slot(&self) -> Option<ShotSlot> {
        self.effective_plan().get(self.outcomes.len()).copied()
    }

    pub fn current_station(&self) -> Option<Station> {
        self.current_slot().map(|slot| slot.station)
    }

    pub fn is_complete(&self) -> bool {
        self.outcomes.len() == self.effective_plan().len()
    }

    pub fn total_score(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_hit()).count()
    }

    pub fn progress(&self) -> RoundProgress {
        let plan = self.effective_plan();
        let next = plan.get(self.outcomes.len());
        RoundProgress {
            recorded: self.outcomes.len(),
            required: plan.len(),
            current_station: next.map(|slot| slot.station),
            next_is_option: next.is_some_and(|slot| slot.is_option),
            total_score: self.total_score(),
            complete: next.is_none(),
        }
    }

    pub fn record_outcome(&mut self, outcome: ShotOutcome) -> Result<RoundProgress, ScoringError> {
        let Some(slot) = self.current_slot() else {
            warn!(
                discipline = %self.discipline,
                recorded = self.outcomes.len(),
                "Shot recorded after round completion"
            );
            return Err(ScoringError::RoundAlreadyComplete);
        };

        let placement_before = self.option_placement();
        self.outcomes.push(outcome);
        debug!(
            discipline = %self.discipline,
            shot = self.outcomes.len(),
            station = slot.station,
            option = slot.is_option,
            %outcome,
            "Recorded shot"
        );

        let placement_after = self.option_placement();
        if placement_after != placement_before {
            debug!(placement = ?placement_after, "Option slot placed");
        }

        Ok(self.progress())
    }

    /// Quick-entry boundary: parses a raw outcome label before recording it.
    pub fn record_raw(&mut self, raw: &str) -> Result<RoundProgress, ScoringError> {
        let outcome = ShotOutcome::try_from(raw).inspect_err(|_| {
            warn!(raw, "Rejected shot outcome");
        })?;
        self.record_outcome(outcome)
    }

    pub fn undo_last(&mut self) -> Result<RoundProgress, ScoringError> {
        let removed = self.outcomes.pop().ok_or(ScoringError::NothingToUndo)?;
        debug!(
            discipline = %self.discipline,
            shot = self.outcomes.len() + 1,
            outcome = %removed,
            "Undid shot"
        );
        Ok(self.progress())
    }

    pub fn finish(&self, gauge: Gauge) -> Result<ScoreRecord, ScoringError> {
        let required = self.effective_plan().len();
        if self.outcomes.len() != required {
            return Err(ScoringError::RoundIncomplete {
                recorded: self.outcomes.len(),
                required,
            });
        }

        let record = ScoreRecord::new(
            self.discipline,
            gauge,
            self.starting_station,
            self.outcomes.clone(),
        );
        info!(
            discipline = %record.discipline(),
            gauge = %record.gauge(),
            total_score = record.total_score(),
            shots = record.outcomes().len(),
            "Round finished"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::catalog::CourseStation;
    use crate::scoring::models::parse_tally;
    use rstest::rstest;

    fn record_all(engine: &mut ScoringEngine, outcomes: &[ShotOutcome]) {
        for outcome in outcomes {
            engine.record_outcome(*outcome).unwrap();
        }
    }

    fn hits(n: usize) -> Vec<ShotOutcome> {
        vec![ShotOutcome::Hit; n]
    }

    #[test]
    fn test_new_engine_starts_at_first_slot() {
        let engine = ScoringEngine::new(Discipline::Skeet, 1).unwrap();
        assert_eq!(engine.current_station(), Some(1));
        assert_eq!(engine.total_score(), 0);
        assert!(!engine.is_complete());
        assert_eq!(engine.effective_plan().len(), 24);
        assert_eq!(engine.option_placement(), Some(OptionPlacement::Pending));
    }

    #[test]
    fn test_skeet_clean_run_appends_option_at_station_eight() {
        let mut engine = ScoringEngine::new(Discipline::Skeet, 1).unwrap();
        record_all(&mut engine, &hits(23));
        assert_eq!(engine.effective_plan().len(), 24);

        let progress = engine.record_outcome(ShotOutcome::Hit).unwrap();
        assert!(!progress.complete);
        assert!(progress.next_is_option);
        assert_eq!(progress.required, 25);

        let plan = engine.effective_plan();
        assert_eq!(plan.len(), 25);
        assert_eq!(plan[24], ShotSlot::option(8));
        assert_eq!(engine.current_station(), Some(8));

        let progress = engine.record_outcome(ShotOutcome::Hit).unwrap();
        assert!(progress.complete);
        assert!(engine.is_complete());
        assert_eq!(engine.total_score(), 25);
        assert_eq!(engine.current_station(), None);
    }

    #[test]
    fn test_skeet_missed_option_after_clean_run_stays_appended() {
        let mut engine = ScoringEngine::new(Discipline::Skeet, 1).unwrap();
        record_all(&mut engine, &hits(24));
        let progress = engine.record_outcome(ShotOutcome::Miss).unwrap();

        assert!(progress.complete);
        assert_eq!(engine.effective_plan()[24], ShotSlot::option(8));
        assert_eq!(engine.total_score(), 24);
    }

    #[test]
    fn test_skeet_first_miss_inserts_option_after_it() {
        let mut engine = ScoringEngine::new(Discipline::Skeet, 1).unwrap();
        record_all(&mut engine, &parse_tally("XXO").unwrap());

        let plan = engine.effective_plan();
        assert_eq!(plan.len(), 25);
        assert_eq!(plan[3], ShotSlot::option(1));
        assert_eq!(plan[4], ShotSlot::new(1));
        assert_eq!(engine.current_slot(), Some(ShotSlot::option(1)));
        assert_eq!(
            engine.option_placement(),
            Some(OptionPlacement::AfterMiss { index: 2, station: 1 })
        );

        record_all(&mut engine, &hits(22));
        assert!(engine.is_complete());
        assert_eq!(engine.outcomes().len(), 25);
        assert_eq!(engine.total_score(), 24);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(9, 3)]
    #[case(15, 6)]
    #[case(23, 8)]
    fn test_skeet_option_repeats_station_of_first_miss(
        #[case] miss_index: usize,
        #[case] station: Station,
    ) {
        let mut engine = ScoringEngine::new(Discipline::Skeet, 1).unwrap();
        record_all(&mut engine, &hits(miss_index));
        engine.record_outcome(ShotOutcome::Miss).unwrap();

        let plan = engine.effective_plan();
        assert_eq!(plan[miss_index + 1], ShotSlot::option(station));
        assert_eq!(plan.iter().filter(|s| s.is_option).count(), 1);
    }

    #[test]
    fn test_skeet_later_misses_do_not_move_option() {
        let mut engine = ScoringEngine::new(Discipline::Skeet, 1).unwrap();
        record_all(&mut engine, &parse_tally("XXXXXO XO XXXO").unwrap());

        let plan = engine.effective_plan();
        assert_eq!(plan.len(), 25);
        assert_eq!(plan[6], ShotSlot::option(2));
        assert_eq!(plan.iter().filter(|s| s.is_option).count(), 1);
    }

    #[test]
    fn test_effective_plan_is_idempotent() {
        let mut engine = ScoringEngine::new(Discipline::Skeet, 1).unwrap();
        record_all(&mut engine, &parse_tally("XXXXO").unwrap());
        assert_eq!(engine.effective_plan(), engine.effective_plan());

        let base = engine.base_plan().to_vec();
        assert_eq!(
            effective_plan(Discipline::Skeet, &base, engine.outcomes()),
            engine.effective_plan()
        );
    }

    #[test]
    fn test_undo_of_triggering_miss_removes_option() {
        let mut engine = ScoringEngine::new(Discipline::Skeet, 1).unwrap();
        record_all(&mut engine, &parse_tally("XXO").unwrap());
        assert_eq!(engine.effective_plan().len(), 25);

        let progress = engine.undo_last().unwrap();
        assert_eq!(progress.required, 24);
        assert!(engine.effective_plan().iter().all(|s| !s.is_option));
        assert_eq!(engine.current_station(), Some(1));
    }

    #[test]
    fn test_undo_of_clean_run_trigger_removes_appended_option() {
        let mut engine = ScoringEngine::new(Discipline::Skeet, 1).unwrap();
        record_all(&mut engine, &hits(24));
        assert_eq!(engine.effective_plan().len(), 25);

        engine.undo_last().unwrap();
        assert_eq!(engine.effective_plan().len(), 24);
        assert_eq!(engine.current_slot(), Some(ShotSlot::new(8)));
    }

    #[test]
    fn test_undo_on_empty_round_fails() {
        let mut engine = ScoringEngine::new(Discipline::Trap, 2).unwrap();
        assert_eq!(engine.undo_last(), Err(ScoringError::NothingToUndo));
    }

    #[rstest]
    #[case(Discipline::Trap, 25)]
    #[case(Discipline::FiveStand, 25)]
    #[case(Discipline::DoublesSkeet, 23)]
    fn test_no_option_outside_skeet(#[case] discipline: Discipline, #[case] shots: usize) {
        let mut engine = ScoringEngine::new(discipline, 1).unwrap();
        engine.record_outcome(ShotOutcome::Miss).unwrap();
        assert_eq!(engine.effective_plan().len(), shots);
        assert_eq!(engine.option_placement(), None);

        record_all(&mut engine, &hits(shots - 1));
        assert!(engine.is_complete());
        assert_eq!(engine.total_score(), shots - 1);
    }

    #[test]
    fn test_recording_past_completion_fails() {
        let mut engine = ScoringEngine::new(Discipline::Trap, 1).unwrap();
        record_all(&mut engine, &hits(25));
        assert_eq!(
            engine.record_outcome(ShotOutcome::Hit),
            Err(ScoringError::RoundAlreadyComplete)
        );
        assert_eq!(engine.outcomes().len(), 25);
        assert_eq!(engine.total_score(), 25);
    }

    #[test]
    fn test_trap_current_station_follows_rotation() {
        let mut engine = ScoringEngine::new(Discipline::Trap, 4).unwrap();
        assert_eq!(engine.current_station(), Some(4));
        record_all(&mut engine, &hits(5));
        assert_eq!(engine.current_station(), Some(5));
        record_all(&mut engine, &hits(5));
        assert_eq!(engine.current_station(), Some(1));
    }

    #[test]
    fn test_record_raw() {
        let mut engine = ScoringEngine::new(Discipline::FiveStand, 1).unwrap();
        engine.record_raw("hit").unwrap();
        engine.record_raw("O").unwrap();
        assert_eq!(
            engine.record_raw("lost"),
            Err(ScoringError::InvalidOutcome("lost".to_string()))
        );
        assert_eq!(engine.outcomes(), &[ShotOutcome::Hit, ShotOutcome::Miss]);
    }

    #[test]
    fn test_starting_station_locked_after_first_shot() {
        let mut engine = ScoringEngine::new(Discipline::Trap, 1).unwrap();
        engine.set_starting_station(3).unwrap();
        assert_eq!(engine.starting_station(), Some(3));
        assert_eq!(engine.current_station(), Some(3));

        assert!(matches!(
            engine.set_starting_station(9),
            Err(ScoringError::InvalidStartingStation { station: 9, .. })
        ));
        assert_eq!(engine.starting_station(), Some(3));

        engine.record_outcome(ShotOutcome::Hit).unwrap();
        assert_eq!(
            engine.set_starting_station(2),
            Err(ScoringError::StartingStationLocked)
        );
    }

    #[test]
    fn test_starting_station_ignored_for_skeet() {
        let mut engine = ScoringEngine::new(Discipline::Skeet, 5).unwrap();
        assert_eq!(engine.starting_station(), None);
        engine.set_starting_station(3).unwrap();
        assert_eq!(engine.starting_station(), None);
        assert_eq!(engine.current_station(), Some(1));
    }

    #[test]
    fn test_invalid_construction() {
        assert!(matches!(
            ScoringEngine::new(Discipline::Trap, 0),
            Err(ScoringError::InvalidStartingStation { .. })
        ));
        assert!(matches!(
            ScoringEngine::new(Discipline::SportingClays, 1),
            Err(ScoringError::CourseLayoutRequired)
        ));
    }

    #[test]
    fn test_course_round() {
        let layout = CourseLayout::new(vec![
            CourseStation { station_number: 1, birds: 2 },
            CourseStation { station_number: 2, birds: 3 },
        ]);
        let mut engine = ScoringEngine::for_course(&layout).unwrap();
        assert_eq!(engine.discipline(), Discipline::SportingClays);
        engine.record_outcome(ShotOutcome::Miss).unwrap();
        record_all(&mut engine, &hits(4));
        assert!(engine.is_complete());
        assert_eq!(engine.total_score(), 4);
    }

    #[test]
    fn test_finish_requires_complete_round() {
        let mut engine = ScoringEngine::new(Discipline::Trap, 2).unwrap();
        record_all(&mut engine, &hits(10));
        assert_eq!(
            engine.finish(Gauge::Twelve),
            Err(ScoringError::RoundIncomplete {
                recorded: 10,
                required: 25
            })
        );

        record_all(&mut engine, &hits(14));
        engine.record_outcome(ShotOutcome::Miss).unwrap();
        let record = engine.finish(Gauge::Twelve).unwrap();
        assert_eq!(record.discipline(), Discipline::Trap);
        assert_eq!(record.starting_station(), Some(2));
        assert_eq!(record.total_score(), 24);
        assert_eq!(record.outcomes().len(), 25);
    }

    #[test]
    fn test_replay_matches_manual_entry() {
        let outcomes = parse_tally("XXXXO").unwrap();
        let engine = ScoringEngine::replay(Discipline::Skeet, 1, &outcomes).unwrap();
        assert_eq!(engine.outcomes(), outcomes.as_slice());
        assert_eq!(engine.current_slot(), Some(ShotSlot::option(2)));

        let too_many = hits(26);
        assert_eq!(
            ScoringEngine::replay(Discipline::Trap, 1, &too_many).unwrap_err(),
            ScoringError::RoundAlreadyComplete
        );
    }
}
