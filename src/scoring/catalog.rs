// The discipline catalog maps a discipline (and, for Trap and 5-Stand, a
// starting station) to the ordered list of shots a round requires.
//
// Skeet's base plan has 24 shots; the 25th is the option shot which the
// engine places once the round's outcomes decide where it goes.

use serde::{Deserialize, Serialize};
use tracing::warn;

use std::ops::RangeInclusive;

use super::errors::ScoringError;
use super::models::{Discipline, ShotSlot, Station};

const SKEET_STATIONS: [Station; 24] = [
    1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 6, 6, 7, 7, 7, 7, 8, 8,
];

// Out to station 7 in pairs, back to station 3 in pairs, single at 2.
const DOUBLES_SKEET_STATIONS: [Station; 23] = [
    1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 6, 6, 5, 5, 4, 4, 3, 3, 2,
];

pub const ROTATION_STATIONS: Station = 5;
pub const SHOTS_PER_ROTATION_STATION: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseStation {
    pub station_number: Station,
    pub birds: usize,
}

/// Station layout of a Sporting Clays course, supplied by the field's
/// configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseLayout {
    pub stations: Vec<CourseStation>,
}

impl CourseLayout {
    pub fn new(stations: Vec<CourseStation>) -> Self {
        Self { stations }
    }

    pub fn total_birds(&self) -> usize {
        self.stations.iter().map(|s| s.birds).sum()
    }

    fn validate(&self) -> Result<(), ScoringError> {
        if self.stations.is_empty() {
            return Err(ScoringError::InvalidCourseLayout(
                "course has no stations".to_string(),
            ));
        }
        if let Some(empty) = self.stations.iter().find(|s| s.birds == 0) {
            return Err(ScoringError::InvalidCourseLayout(format!(
                "station {} has no birds",
                empty.station_number
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationTemplate {
    Fixed(&'static [Station]),
    Rotating { start: Station },
    Course(CourseLayout),
}

impl StationTemplate {
    /// Template for a fixed or rotating discipline. Sporting Clays has no
    /// built-in template; use [`StationTemplate::Course`].
    pub fn for_discipline(
        discipline: Discipline,
        starting_station: Station,
    ) -> Result<Self, ScoringError> {
        match discipline {
            Discipline::Skeet => Ok(StationTemplate::Fixed(&SKEET_STATIONS)),
            Discipline::DoublesSkeet => Ok(StationTemplate::Fixed(&DOUBLES_SKEET_STATIONS)),
            Discipline::Trap | Discipline::FiveStand => {
                validate_starting_station(discipline, starting_station)?;
                Ok(StationTemplate::Rotating {
                    start: starting_station,
                })
            }
            Discipline::SportingClays => Err(ScoringError::CourseLayoutRequired),
        }
    }

    pub fn slots(&self) -> Vec<ShotSlot> {
        match self {
            StationTemplate::Fixed(stations) => {
                stations.iter().copied().map(ShotSlot::new).collect()
            }
            StationTemplate::Rotating { start } => {
                let start = *start;
                (0..ROTATION_STATIONS)
                    .flat_map(move |block| {
                        let station = (start - 1 + block) % ROTATION_STATIONS + 1;
                        std::iter::repeat(ShotSlot::new(station))
                            .take(SHOTS_PER_ROTATION_STATION)
                    })
                    .collect()
            }
            StationTemplate::Course(layout) => layout
                .stations
                .iter()
                .flat_map(|s| std::iter::repeat(ShotSlot::new(s.station_number)).take(s.birds))
                .collect(),
        }
    }
}

pub fn validate_starting_station(
    discipline: Discipline,
    starting_station: Station,
) -> Result<(), ScoringError> {
    if discipline.is_rotatable() && !(1..=ROTATION_STATIONS).contains(&starting_station) {
        warn!(%discipline, starting_station, "Rejected starting station");
        return Err(ScoringError::InvalidStartingStation {
            discipline,
            station: starting_station,
        });
    }
    Ok(())
}

/// Validates the starting station and keeps it only where it means something.
pub(crate) fn normalize_starting_station(
    discipline: Discipline,
    starting_station: Station,
) -> Result<Option<Station>, ScoringError> {
    validate_starting_station(discipline, starting_station)?;
    Ok(discipline.is_rotatable().then_some(starting_station))
}

/// Base shot plan for a fixed or rotating discipline.
pub fn plan_for(
    discipline: Discipline,
    starting_station: Station,
) -> Result<Vec<ShotSlot>, ScoringError> {
    Ok(StationTemplate::for_discipline(discipline, starting_station)?.slots())
}

/// Outcome counts a finished round of a fixed or rotating discipline may
/// hold. Skeet always shoots its option, and bulk entry records it as an
/// extra outcome after the first miss, so a Skeet round is 25 or 26 long.
pub fn round_lengths(discipline: Discipline) -> Result<RangeInclusive<usize>, ScoringError> {
    let base = StationTemplate::for_discipline(discipline, 1)?.slots().len();
    if discipline.has_option_shot() {
        Ok(base + 1..=base + 2)
    } else {
        Ok(base..=base)
    }
}

/// Base shot plan for a Sporting Clays course.
pub fn plan_for_course(layout: &CourseLayout) -> Result<Vec<ShotSlot>, ScoringError> {
    layout.validate()?;
    Ok(StationTemplate::Course(layout.clone()).slots())
}
