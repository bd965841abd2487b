//! Random starter questions.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::builtin::SUGGESTIONS;

/// `count` distinct suggestions in random order (at most all eight).
pub fn random_suggestions(count: usize) -> Vec<String> {
    random_suggestions_with(&mut rand::rng(), count)
}

pub fn random_suggestions_with<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<String> {
    let mut pool: Vec<&str> = SUGGESTIONS.to_vec();
    pool.shuffle(rng);
    pool.into_iter().take(count).map(str::to_string).collect()
}
