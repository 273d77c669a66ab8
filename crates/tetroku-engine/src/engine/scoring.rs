use serde::{Deserialize, Serialize};

/// Which counter measures cell age.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, derive_more::IsVariant,
)]
#[serde(rename_all = "lowercase")]
pub enum ScoringClock {
    /// Advances on every successful placement.
    Turn,
    /// Advances on every hand refill (every few placements).
    #[default]
    Round,
}

/// One step of the age-to-points function: cells at least `min_age` old
/// are worth `points` (unless a later bucket applies).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct AgeBucket {
    pub min_age: u32,
    pub points: u32,
}

impl AgeBucket {
    #[must_use]
    pub const fn new(min_age: u32, points: u32) -> Self {
        Self { min_age, points }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ScoringRuleError {
    #[display("scoring thresholds must not be empty")]
    Empty,
    #[display("the first threshold must start at age 0 and award 0 points")]
    NonZeroBase,
    #[display("threshold ages must be strictly increasing (age {age} follows {previous})")]
    UnorderedAges { previous: u32, age: u32 },
    #[display("threshold points must not decrease (age {age} awards {points} after {previous})")]
    DecreasingPoints { age: u32, points: u32, previous: u32 },
}

/// Age-based scoring: a clock plus a monotonic step function from age to
/// points.
///
/// Every cleared cell is worth the points of the last bucket whose
/// `min_age` does not exceed its age. The first bucket always starts at age
/// `0` with `0` points, so freshly placed tiles never score.
///
/// # Example
///
/// ```
/// use tetroku_engine::{ScoringClock, ScoringRule};
///
/// let rule = ScoringRule::round_based();
/// assert_eq!(rule.clock(), ScoringClock::Round);
/// assert_eq!(rule.points_for_age(4), 0);
/// assert_eq!(rule.points_for_age(5), 20);
/// assert_eq!(rule.points_for_age(9), 30);
/// assert_eq!(rule.points_for_age(42), 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "ScoringRuleRepr", into = "ScoringRuleRepr")]
pub struct ScoringRule {
    clock: ScoringClock,
    buckets: Vec<AgeBucket>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct ScoringRuleRepr {
    clock: ScoringClock,
    thresholds: Vec<AgeBucket>,
}

impl TryFrom<ScoringRuleRepr> for ScoringRule {
    type Error = ScoringRuleError;

    fn try_from(repr: ScoringRuleRepr) -> Result<Self, Self::Error> {
        Self::new(repr.clock, repr.thresholds)
    }
}

impl From<ScoringRule> for ScoringRuleRepr {
    fn from(rule: ScoringRule) -> Self {
        Self {
            clock: rule.clock,
            thresholds: rule.buckets,
        }
    }
}

impl Default for ScoringRule {
    fn default() -> Self {
        Self::round_based()
    }
}

impl ScoringRule {
    pub fn new(clock: ScoringClock, buckets: Vec<AgeBucket>) -> Result<Self, ScoringRuleError> {
        let first = buckets.first().ok_or(ScoringRuleError::Empty)?;
        if first.min_age != 0 || first.points != 0 {
            return Err(ScoringRuleError::NonZeroBase);
        }
        for pair in buckets.windows(2) {
            let [prev, next] = [pair[0], pair[1]];
            if next.min_age <= prev.min_age {
                return Err(ScoringRuleError::UnorderedAges {
                    previous: prev.min_age,
                    age: next.min_age,
                });
            }
            if next.points < prev.points {
                return Err(ScoringRuleError::DecreasingPoints {
                    age: next.min_age,
                    points: next.points,
                    previous: prev.points,
                });
            }
        }
        Ok(Self { clock, buckets })
    }

    /// Ages measured in rounds: 5+ rounds → 20, 8+ → 30, 10+ → 50.
    #[must_use]
    pub fn round_based() -> Self {
        Self {
            clock: ScoringClock::Round,
            buckets: vec![
                AgeBucket::new(0, 0),
                AgeBucket::new(5, 20),
                AgeBucket::new(8, 30),
                AgeBucket::new(10, 50),
            ],
        }
    }

    /// Ages measured in turns, calibrated to three placements per round:
    /// 15+ turns → 20, 24+ → 30, 30+ → 50.
    #[must_use]
    pub fn turn_based() -> Self {
        Self {
            clock: ScoringClock::Turn,
            buckets: vec![
                AgeBucket::new(0, 0),
                AgeBucket::new(15, 20),
                AgeBucket::new(24, 30),
                AgeBucket::new(30, 50),
            ],
        }
    }

    /// Preset for the given clock.
    #[must_use]
    pub fn preset(clock: ScoringClock) -> Self {
        match clock {
            ScoringClock::Turn => Self::turn_based(),
            ScoringClock::Round => Self::round_based(),
        }
    }

    #[must_use]
    pub fn clock(&self) -> ScoringClock {
        self.clock
    }

    #[must_use]
    pub fn buckets(&self) -> &[AgeBucket] {
        &self.buckets
    }

    #[must_use]
    pub fn points_for_age(&self, age: u32) -> u32 {
        self.buckets
            .iter()
            .rev()
            .find(|bucket| bucket.min_age <= age)
            .map_or(0, |bucket| bucket.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_based_buckets() {
        let rule = ScoringRule::round_based();
        let expected = [
            (0, 0),
            (2, 0),
            (4, 0),
            (5, 20),
            (7, 20),
            (8, 30),
            (9, 30),
            (10, 50),
            (100, 50),
        ];
        for (age, points) in expected {
            assert_eq!(rule.points_for_age(age), points, "age {age}");
        }
    }

    #[test]
    fn test_presets_are_monotonic_and_start_at_zero() {
        for rule in [ScoringRule::round_based(), ScoringRule::turn_based()] {
            assert_eq!(rule.points_for_age(0), 0);
            let mut prev = 0;
            for age in 0..200 {
                let points = rule.points_for_age(age);
                assert!(points >= prev, "age {age}: {points} < {prev}");
                prev = points;
            }
            // Presets must also pass validation.
            assert_eq!(
                ScoringRule::new(rule.clock(), rule.buckets().to_vec()),
                Ok(rule.clone())
            );
        }
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(
            ScoringRule::new(ScoringClock::Turn, vec![]),
            Err(ScoringRuleError::Empty)
        );
        assert_eq!(
            ScoringRule::new(ScoringClock::Turn, vec![AgeBucket::new(1, 0)]),
            Err(ScoringRuleError::NonZeroBase)
        );
        assert_eq!(
            ScoringRule::new(ScoringClock::Turn, vec![AgeBucket::new(0, 5)]),
            Err(ScoringRuleError::NonZeroBase)
        );
        assert_eq!(
            ScoringRule::new(
                ScoringClock::Turn,
                vec![AgeBucket::new(0, 0), AgeBucket::new(3, 10), AgeBucket::new(3, 20)]
            ),
            Err(ScoringRuleError::UnorderedAges {
                previous: 3,
                age: 3
            })
        );
        assert_eq!(
            ScoringRule::new(
                ScoringClock::Turn,
                vec![AgeBucket::new(0, 0), AgeBucket::new(3, 10), AgeBucket::new(5, 5)]
            ),
            Err(ScoringRuleError::DecreasingPoints {
                age: 5,
                points: 5,
                previous: 10
            })
        );
    }

    #[test]
    fn test_deserialize_rule() {
        let json = r#"{
            "clock": "turn",
            "thresholds": [
                { "min_age": 0, "points": 0 },
                { "min_age": 2, "points": 10 }
            ]
        }"#;
        let rule: ScoringRule = serde_json::from_str(json).unwrap();
        assert!(rule.clock().is_turn());
        assert_eq!(rule.points_for_age(1), 0);
        assert_eq!(rule.points_for_age(2), 10);
    }

    #[test]
    fn test_deserialize_rejects_invalid_rule() {
        let json = r#"{ "clock": "round", "thresholds": [{ "min_age": 3, "points": 1 }] }"#;
        let err = serde_json::from_str::<ScoringRule>(json).unwrap_err();
        assert!(err.to_string().contains("age 0"), "{err}");
    }

    #[test]
    fn test_serialize_rule() {
        let json = serde_json::to_value(ScoringRule::round_based()).unwrap();
        assert_eq!(json["clock"], "round");
        assert_eq!(json["thresholds"][1]["min_age"], 5);
        assert_eq!(json["thresholds"][1]["points"], 20);
    }
}
