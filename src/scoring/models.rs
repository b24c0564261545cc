use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use super::catalog::{
    normalize_starting_station, plan_for_course, round_lengths, CourseLayout,
};
use super::errors::ScoringError;

/// A numbered shooting position. Skeet uses 1-8, Trap and 5-Stand 1-5,
/// Sporting Clays whatever the course defines.
pub type Station = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter)]
pub enum Discipline {
    Skeet,
    #[serde(rename = "Doubles Skeet")]
    DoublesSkeet,
    Trap,
    #[serde(rename = "5-Stand")]
    FiveStand,
    #[serde(rename = "Sporting Clays")]
    SportingClays,
}

impl Discipline {
    /// Round size advertised to shooters. Sporting Clays has no fixed size.
    pub fn nominal_shots(&self) -> Option<usize> {
        match self {
            Discipline::SportingClays => None,
            _ => Some(25),
        }
    }

    /// Trap and 5-Stand squads rotate through the stations, so a shooter can
    /// start anywhere from 1 to 5.
    pub fn is_rotatable(&self) -> bool {
        matches!(self, Discipline::Trap | Discipline::FiveStand)
    }

    pub fn has_option_shot(&self) -> bool {
        matches!(self, Discipline::Skeet)
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Discipline::Skeet => "Skeet",
                Discipline::DoublesSkeet => "Doubles Skeet",
                Discipline::Trap => "Trap",
                Discipline::FiveStand => "5-Stand",
                Discipline::SportingClays => "Sporting Clays",
            }
        )
    }
}

impl FromStr for Discipline {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Discipline::iter()
            .find(|discipline| discipline.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScoringError::UnknownDiscipline(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter)]
pub enum Gauge {
    #[serde(rename = "12")]
    Twelve,
    #[serde(rename = "20")]
    Twenty,
    #[serde(rename = "28")]
    TwentyEight,
    #[serde(rename = ".410")]
    FourTen,
}

impl fmt::Display for Gauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Gauge::Twelve => "12",
                Gauge::Twenty => "20",
                Gauge::TwentyEight => "28",
                Gauge::FourTen => ".410",
            }
        )
    }
}

impl FromStr for Gauge {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "12" => Ok(Gauge::Twelve),
            "20" => Ok(Gauge::Twenty),
            "28" => Ok(Gauge::TwentyEight),
            ".410" | "410" => Ok(Gauge::FourTen),
            other => Err(ScoringError::UnknownGauge(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShotOutcome {
    Hit,
    Miss,
}

impl ShotOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, ShotOutcome::Hit)
    }

    /// Tally mark used on paper score sheets.
    pub fn mark(&self) -> char {
        match self {
            ShotOutcome::Hit => 'X',
            ShotOutcome::Miss => 'O',
        }
    }
}

impl fmt::Display for ShotOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ShotOutcome::Hit => "hit",
                ShotOutcome::Miss => "miss",
            }
        )
    }
}

impl TryFrom<&str> for ShotOutcome {
    type Error = ScoringError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hit" | "x" => Ok(ShotOutcome::Hit),
            "miss" | "o" => Ok(ShotOutcome::Miss),
            _ => Err(ScoringError::InvalidOutcome(s.to_string())),
        }
    }
}

impl TryFrom<char> for ShotOutcome {
    type Error = ScoringError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'X' => Ok(ShotOutcome::Hit),
            'O' => Ok(ShotOutcome::Miss),
            _ => Err(ScoringError::InvalidOutcome(c.to_string())),
        }
    }
}

/// Parses a tally such as `XXOX` into outcomes. Whitespace is ignored.
pub fn parse_tally(tally: &str) -> Result<Vec<ShotOutcome>, ScoringError> {
    tally
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(ShotOutcome::try_from)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotSlot {
    pub station: Station,
    #[serde(default)]
    pub is_option: bool,
}

impl ShotSlot {
    pub fn new(station: Station) -> Self {
        Self {
            station,
            is_option: false,
        }
    }

    pub fn option(station: Station) -> Self {
        Self {
            station,
            is_option: true,
        }
    }
}

/// A finished round, ready to hand to the score store. The total is always
/// the number of hits; deserialized records are checked the same way as
/// bulk-entered ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScoreRecordFields")]
pub struct ScoreRecord {
    discipline: Discipline,
    gauge: Gauge,
    #[serde(skip_serializing_if = "Option::is_none")]
    starting_station: Option<Station>,
    outcomes: Vec<ShotOutcome>,
    total_score: usize,
}

#[derive(Deserialize)]
struct ScoreRecordFields {
    discipline: Discipline,
    gauge: Gauge,
    #[serde(default)]
    starting_station: Option<Station>,
    outcomes: Vec<ShotOutcome>,
}

impl TryFrom<ScoreRecordFields> for ScoreRecord {
    type Error = ScoringError;

    // Course rounds are stored without their layout, so only a fixed
    // discipline's length can be checked here.
    fn try_from(fields: ScoreRecordFields) -> Result<Self, Self::Error> {
        let discipline = fields.discipline;
        let starting_station = fields
            .starting_station
            .map(|station| normalize_starting_station(discipline, station))
            .transpose()?
            .flatten();
        if discipline == Discipline::SportingClays {
            if fields.outcomes.is_empty() {
                return Err(ScoringError::ShotCountMismatch {
                    discipline,
                    actual: 0,
                });
            }
        } else {
            check_round_length(discipline, fields.outcomes.len())?;
        }
        Ok(Self::new(discipline, fields.gauge, starting_station, fields.outcomes))
    }
}

fn check_round_length(discipline: Discipline, actual: usize) -> Result<(), ScoringError> {
    if round_lengths(discipline)?.contains(&actual) {
        Ok(())
    } else {
        Err(ScoringError::ShotCountMismatch { discipline, actual })
    }
}

impl ScoreRecord {
    pub(crate) fn new(
        discipline: Discipline,
        gauge: Gauge,
        starting_station: Option<Station>,
        outcomes: Vec<ShotOutcome>,
    ) -> Self {
        let total_score = outcomes.iter().filter(|o| o.is_hit()).count();
        Self {
            discipline,
            gauge,
            starting_station,
            outcomes,
            total_score,
        }
    }

    /// Builds a record from a bulk-entry outcome sequence (see
    /// [`from_bulk`](crate::scoring::from_bulk)). The starting station is
    /// validated for rotatable disciplines and dropped for the others, and
    /// the outcomes must fill a whole round.
    pub fn from_bulk(
        discipline: Discipline,
        gauge: Gauge,
        starting_station: Station,
        outcomes: Vec<ShotOutcome>,
    ) -> Result<Self, ScoringError> {
        let starting_station = normalize_starting_station(discipline, starting_station)?;
        check_round_length(discipline, outcomes.len())?;
        Ok(Self::new(discipline, gauge, starting_station, outcomes))
    }

    /// Builds a Sporting Clays record; one outcome per bird on the course.
    pub fn from_course(
        layout: &CourseLayout,
        gauge: Gauge,
        outcomes: Vec<ShotOutcome>,
    ) -> Result<Self, ScoringError> {
        let birds = plan_for_course(layout)?.len();
        if outcomes.len() != birds {
            return Err(ScoringError::ShotCountMismatch {
                discipline: Discipline::SportingClays,
                actual: outcomes.len(),
            });
        }
        Ok(Self::new(Discipline::SportingClays, gauge, None, outcomes))
    }

    pub fn discipline(&self) -> Discipline {
        self.discipline
    }

    pub fn gauge(&self) -> Gauge {
        self.gauge
    }

    pub fn starting_station(&self) -> Option<Station> {
        self.starting_station
    }

    pub fn outcomes(&self) -> &[ShotOutcome] {
        &self.outcomes
    }

    pub fn total_score(&self) -> usize {
        self.total_score
    }

    pub fn misses(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| **o == ShotOutcome::Miss)
            .count()
    }

    /// A straight: every target broken.
    pub fn is_perfect(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(ShotOutcome::is_hit)
    }

    /// Longest run of consecutive hits within this round.
    pub fn longest_run(&self) -> usize {
        let mut best = 0;
        let mut current = 0;
        for outcome in &self.outcomes {
            if outcome.is_hit() {
                current += 1;
                best = best.max(current);
            } else {
                current = 0;
            }
        }
        best
    }

    pub fn tally(&self) -> String {
        self.outcomes.iter().map(ShotOutcome::mark).collect()
    }
}
