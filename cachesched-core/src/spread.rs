//! Random TTL deviation, so entries that went stale together don't all expire
//! on the same second.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Inclusive range `[min, max]` of seconds added to a stale TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SpreadRange", into = "SpreadRange")]
pub struct ExpirationSpread {
    min: i64,
    max: i64,
}

#[derive(Serialize, Deserialize)]
struct SpreadRange {
    min: i64,
    max: i64,
}

impl ExpirationSpread {
    pub fn new(min: i64, max: i64) -> Result<Self, Error> {
        if min < 0 || min > max {
            return Err(Error::InvalidSpreadRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn determine_deviation(&self) -> i64 {
        self.determine_deviation_with(&mut rand::thread_rng())
    }

    pub fn determine_deviation_with<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        rng.gen_range(self.min..=self.max)
    }
}

impl TryFrom<SpreadRange> for ExpirationSpread {
    type Error = Error;

    fn try_from(range: SpreadRange) -> Result<Self, Self::Error> {
        Self::new(range.min, range.max)
    }
}

impl From<ExpirationSpread> for SpreadRange {
    fn from(spread: ExpirationSpread) -> Self {
        Self { min: spread.min, max: spread.max }
    }
}
