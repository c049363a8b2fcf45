//! Human-readable friendcode generation. A friendcode is three words drawn
//! from fixed dictionaries (adjective, color, animal) joined by a separator,
//! e.g. `brave-amber-otter`. Uniqueness is not a property of the generator;
//! callers must check candidates against the store and resample on collision.

use crate::threadrand::SecureRng;

mod words;

pub const SEPARATOR: &str = "-";

#[derive(Clone, Debug)]
pub struct Generator {
    adjectives: &'static [&'static str],
    colors: &'static [&'static str],
    animals: &'static [&'static str],
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(words::ADJECTIVES, words::COLORS, words::ANIMALS)
    }
}

impl Generator {
    /// # Panics
    ///
    /// Panics if any dictionary is empty.
    pub fn new(
        adjectives: &'static [&'static str],
        colors: &'static [&'static str],
        animals: &'static [&'static str],
    ) -> Self {
        assert!(!adjectives.is_empty(), "adjective dictionary is empty");
        assert!(!colors.is_empty(), "color dictionary is empty");
        assert!(!animals.is_empty(), "animal dictionary is empty");

        Self {
            adjectives,
            colors,
            animals,
        }
    }

    /// The number of distinct codes this generator can produce.
    pub fn candidate_space(&self) -> usize {
        self.adjectives.len() * self.colors.len() * self.animals.len()
    }

    pub fn sample(&self) -> String {
        let adjective = self.adjectives[SecureRng::index(self.adjectives.len())];
        let color = self.colors[SecureRng::index(self.colors.len())];
        let animal = self.animals[SecureRng::index(self.animals.len())];

        format!("{adjective}{SEPARATOR}{color}{SEPARATOR}{animal}")
    }
}
