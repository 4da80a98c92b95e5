use crate::common::Int;

pub type DefaultRoller = rand::rngs::ThreadRng;

/// A source of die rolls. Implemented for every [`rand::Rng`], so thread
/// RNGs, seeded RNGs, and deterministic test doubles are interchangeable.
pub trait Roller {
    /// Rolls a die with the given number of sides. Callers guarantee
    /// `sides >= 1`; the result is in `1..=sides`.
    fn roll(&mut self, sides: Int) -> Int;
}

impl<R> Roller for R
where
    R: rand::Rng,
{
    fn roll(&mut self, sides: Int) -> Int {
        self.gen_range(1..=sides)
    }
}

#[cfg(test)]
pub(crate) use test_rollers::{FixedRoller, StepRoller};

#[cfg(test)]
mod test_rollers {
    use super::*;

    /// Yields 1, 2, 3, ... wrapping to fit the requested die.
    pub struct StepRoller(pub Int);

    impl Roller for StepRoller {
        fn roll(&mut self, sides: Int) -> Int {
            let value = (self.0 - 1) % sides + 1;
            self.0 += 1;
            value
        }
    }

    /// Replays a fixed sequence of rolls, cycling when exhausted.
    pub struct FixedRoller {
        values: Vec<Int>,
        at: usize,
    }

    impl FixedRoller {
        pub fn new(values: impl Into<Vec<Int>>) -> Self {
            Self {
                values: values.into(),
                at: 0,
            }
        }
    }

    impl Roller for FixedRoller {
        fn roll(&mut self, _sides: Int) -> Int {
            let value = self.values[self.at % self.values.len()];
            self.at += 1;
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn rng_rolls_stay_in_range() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let roll = rng.roll(6);
            assert!((1..=6).contains(&roll));
        }
    }

    #[test]
    fn step_roller_wraps_around_the_die() {
        let mut roller = StepRoller(1);
        let rolls: Vec<_> = (0..5).map(|_| roller.roll(3)).collect();
        assert_eq!(rolls, vec![1, 2, 3, 1, 2]);
    }

    #[test]
    fn fixed_roller_replays_its_sequence() {
        let mut roller = FixedRoller::new([6, 6, 3]);
        let rolls: Vec<_> = (0..4).map(|_| roller.roll(6)).collect();
        assert_eq!(rolls, vec![6, 6, 3, 6]);
    }
}
