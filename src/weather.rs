use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Chance per tick that the simulated weather is re-rolled.
pub const WEATHER_SHIFT_PROBABILITY: f64 = 0.1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Fog,
}

impl Weather {
    pub const ALL: [Weather; 3] = [Weather::Clear, Weather::Rain, Weather::Fog];

    pub fn as_str(self) -> &'static str {
        match self {
            Weather::Clear => "clear",
            Weather::Rain => "rain",
            Weather::Fog => "fog",
        }
    }

    /// One tick of weather drift. The re-roll is uniform over all three
    /// conditions, so it can land on the current one.
    pub fn drift<R: Rng + ?Sized>(self, rng: &mut R) -> Weather {
        if rng.gen_bool(WEATHER_SHIFT_PROBABILITY) {
            Weather::ALL[rng.gen_range(0..Weather::ALL.len())]
        } else {
            self
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weather {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clear" => Ok(Weather::Clear),
            "rain" => Ok(Weather::Rain),
            "fog" => Ok(Weather::Fog),
            other => Err(CatalogError::UnknownWeather(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Rain".parse::<Weather>().unwrap(), Weather::Rain);
        assert_eq!(" fog ".parse::<Weather>().unwrap(), Weather::Fog);
        assert!(matches!(
            "snow".parse::<Weather>(),
            Err(CatalogError::UnknownWeather(_))
        ));
    }

    #[test]
    fn drift_mostly_keeps_current_condition() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut changed = 0;
        for _ in 0..1_000 {
            if Weather::Clear.drift(&mut rng) != Weather::Clear {
                changed += 1;
            }
        }
        // Expected around 1000 * 0.1 * 2/3.
        assert!(changed > 20 && changed < 150, "changed {changed} times");
    }
}
