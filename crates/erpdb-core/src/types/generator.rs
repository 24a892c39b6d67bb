use crate::error::{ErrorClass, ErrorOrigin, InternalError};
use rand_chacha::{
    ChaCha20Rng,
    rand_core::{RngCore, SeedableRng},
};
use thiserror::Error as ThisError;
use ulid::Ulid;

///
/// IdError
///

#[derive(Debug, ThisError)]
pub enum IdError {
    #[error("id generator overflowed within a single millisecond")]
    GeneratorOverflow,
}

impl From<IdError> for InternalError {
    fn from(err: IdError) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Store, err.to_string())
    }
}

///
/// Generator
///
/// Monotonic ULID generator; ids increase strictly even when several are
/// drawn within the same millisecond or the clock steps backwards.
///

pub struct Generator {
    previous: Ulid,
    rng: ChaCha20Rng,
}

impl Generator {
    /// Create a generator with a fixed random seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            previous: Ulid::nil(),
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    // generate
    /// Monotonic ULID generation; increments within the same millisecond.
    pub fn generate(&mut self, now_ms: u64) -> Result<Ulid, IdError> {
        let last_ts = self.previous.timestamp_ms();

        // maybe time went backward, or it is the same ms.
        // increment instead of generating a new random so that it is monotonic
        if now_ms <= last_ts {
            let next = self.previous.increment().ok_or(IdError::GeneratorOverflow)?;
            self.previous = next;

            return Ok(next);
        }

        let rand = (u128::from(self.rng.next_u64()) << 64) | u128::from(self.rng.next_u64());
        let ulid = Ulid::from_parts(now_ms, rand);
        self.previous = ulid;

        Ok(ulid)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_within_same_millisecond() {
        let mut g = Generator::seeded(7);
        let a = g.generate(1_000).unwrap();
        let b = g.generate(1_000).unwrap();

        assert!(a < b);
        assert_eq!(a.timestamp_ms(), 1_000);
    }

    #[test]
    fn monotonic_when_clock_goes_backwards() {
        let mut g = Generator::seeded(7);
        let a = g.generate(5_000).unwrap();
        let b = g.generate(4_000).unwrap();

        assert!(a < b);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Generator::seeded(99);
        let mut b = Generator::seeded(99);

        assert_eq!(a.generate(10).unwrap(), b.generate(10).unwrap());
        assert_eq!(a.generate(20).unwrap(), b.generate(20).unwrap());
    }
}
