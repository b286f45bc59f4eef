use crate::data::validate_word;
use crate::results::GuessResult;
use crate::results::LetterResult;
use crate::results::WordleError;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::iter::zip;
use std::result::Result;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What is known about how often, and where, a letter occurs in the answer.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct LetterCounts {
    /// The letter must appear at least this many times.
    min_count: u8,
    /// The letter must appear at most this many times, if known. `Some(0)` means the letter is
    /// absent.
    max_count: Option<u8>,
    /// Locations where the letter was marked present but not here.
    not_here: BTreeSet<u8>,
}

/// Constraints accumulated from every guess result so far in a game.
///
/// Constraints are only ever added. Adding a constraint that contradicts a known one fails with
/// [`WordleError::InconsistentFeedback`].
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KnownConstraints {
    word_length: u8,
    /// The letter known to be at each location.
    here: Vec<Option<char>>,
    letters: BTreeMap<char, LetterCounts>,
}

impl KnownConstraints {
    /// Creates a `KnownConstraints` object for the given word length with all letters unknown.
    pub fn new(word_length: usize) -> KnownConstraints {
        KnownConstraints {
            word_length: word_length as u8,
            here: vec![None; word_length],
            letters: BTreeMap::new(),
        }
    }

    /// Returns the constraints imposed by the given result.
    pub fn from_result(result: &GuessResult) -> Result<KnownConstraints, WordleError> {
        let mut constraints = KnownConstraints::new(result.guess.len());
        constraints.update(result)?;
        Ok(constraints)
    }

    /// The length of words these constraints apply to.
    pub fn word_length(&self) -> usize {
        self.word_length as usize
    }

    /// Returns `true` iff nothing is known yet.
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// Adds the constraints arising from the given guess result.
    ///
    /// Every copy of a letter that was not marked [`LetterResult::NotPresent`] raises the minimum
    /// count of that letter. A `NotPresent` copy of a letter caps its count at the number of
    /// copies that were not `NotPresent`, which is zero for a letter that is absent entirely. The
    /// location of a `NotPresent` copy is not recorded, so a word with exactly the allowed number
    /// of copies may use that location.
    pub fn update(&mut self, guess_result: &GuessResult) -> Result<(), WordleError> {
        if guess_result.results.len() != self.word_length() {
            return Err(WordleError::MalformedFeedback(format!(
                "expected {} results but got {}",
                self.word_length,
                guess_result.results.len()
            )));
        }
        validate_word(guess_result.guess, self.word_length())?;
        for ((index, letter), result) in
            zip(guess_result.guess.char_indices(), guess_result.results.iter())
        {
            let num_times_present = count_num_times_in_guess(letter, guess_result);
            match result {
                LetterResult::Correct => {
                    self.set_must_be_at(letter, index)?;
                    self.bump_min_count(letter, num_times_present)?;
                }
                LetterResult::PresentNotHere => {
                    self.set_must_not_be_at(letter, index)?;
                    self.bump_min_count(letter, num_times_present)?;
                }
                LetterResult::NotPresent => self.set_max_count(letter, num_times_present)?,
            }
        }
        Ok(())
    }

    /// Adds the given constraints to these ones.
    pub fn merge(&mut self, other: &KnownConstraints) -> Result<(), WordleError> {
        if self.word_length != other.word_length {
            return Err(WordleError::InconsistentFeedback);
        }
        for (index, letter) in other.greens() {
            self.set_must_be_at(letter, index)?;
        }
        for (letter, counts) in &other.letters {
            if counts.min_count > 0 {
                self.bump_min_count(*letter, counts.min_count)?;
            }
            if let Some(max_count) = counts.max_count {
                self.set_max_count(*letter, max_count)?;
            }
            for index in &counts.not_here {
                self.set_must_not_be_at(*letter, *index as usize)?;
            }
        }
        Ok(())
    }

    /// Records that `letter` must be at `index`.
    pub fn set_must_be_at(&mut self, letter: char, index: usize) -> Result<(), WordleError> {
        self.check_index(index)?;
        match self.here[index] {
            Some(known) if known == letter => return Ok(()),
            Some(_) => return Err(WordleError::InconsistentFeedback),
            None => {}
        }
        if self
            .letters
            .get(&letter)
            .map_or(false, |counts| counts.not_here.contains(&(index as u8)))
        {
            return Err(WordleError::InconsistentFeedback);
        }
        self.here[index] = Some(letter);
        let num_here = self.here.iter().filter(|known| **known == Some(letter)).count() as u8;
        self.bump_min_count(letter, num_here)
    }

    /// Records that `letter` must not be at `index`.
    pub fn set_must_not_be_at(&mut self, letter: char, index: usize) -> Result<(), WordleError> {
        self.check_index(index)?;
        if self.here[index] == Some(letter) {
            return Err(WordleError::InconsistentFeedback);
        }
        self.letters
            .entry(letter)
            .or_default()
            .not_here
            .insert(index as u8);
        Ok(())
    }

    /// Records that `letter` appears at least `count` times.
    pub fn bump_min_count(&mut self, letter: char, count: u8) -> Result<(), WordleError> {
        let counts = self.letters.entry(letter).or_default();
        if counts.max_count.map_or(false, |max_count| count > max_count) {
            return Err(WordleError::InconsistentFeedback);
        }
        if count > counts.min_count {
            counts.min_count = count;
        }
        Ok(())
    }

    /// Records that `letter` appears at most `count` times.
    ///
    /// Feedback only ever reveals the exact number of copies, so a different maximum than one
    /// already known is a contradiction.
    pub fn set_max_count(&mut self, letter: char, count: u8) -> Result<(), WordleError> {
        let counts = self.letters.entry(letter).or_default();
        match counts.max_count {
            Some(existing) if existing != count => return Err(WordleError::InconsistentFeedback),
            _ => {}
        }
        if counts.min_count > count {
            return Err(WordleError::InconsistentFeedback);
        }
        counts.max_count = Some(count);
        Ok(())
    }

    /// The locations with a known letter.
    pub fn greens(&self) -> impl Iterator<Item = (usize, char)> + '_ {
        self.here
            .iter()
            .enumerate()
            .filter_map(|(index, known)| known.map(|letter| (index, letter)))
    }

    /// Letters that must be in the word, along with each location they are excluded from.
    pub fn yellows(&self) -> impl Iterator<Item = (char, usize)> + '_ {
        self.letters
            .iter()
            .filter(|(_, counts)| counts.min_count > 0)
            .flat_map(|(letter, counts)| {
                counts
                    .not_here
                    .iter()
                    .map(move |index| (*letter, *index as usize))
            })
    }

    /// Letters that must not be in the word at all.
    pub fn absent_letters(&self) -> impl Iterator<Item = char> + '_ {
        self.letters
            .iter()
            .filter(|(_, counts)| counts.max_count == Some(0))
            .map(|(letter, _)| *letter)
    }

    /// The minimum number of times `letter` must appear.
    pub fn min_count(&self, letter: char) -> u8 {
        self.letters
            .get(&letter)
            .map_or(0, |counts| counts.min_count)
    }

    /// The maximum number of times `letter` may appear, if known.
    pub fn max_count(&self, letter: char) -> Option<u8> {
        self.letters
            .get(&letter)
            .and_then(|counts| counts.max_count)
    }

    /// Returns `true` iff the given word satisfies these constraints.
    pub fn is_satisfied_by(&self, word: &str) -> bool {
        let bytes = word.as_bytes();
        bytes.len() == self.word_length()
            && zip(bytes, &self.here)
                .all(|(word_letter, known)| known.map_or(true, |letter| letter as u8 == *word_letter))
            && self.letters.iter().all(|(letter, counts)| {
                let letter = *letter as u8;
                let count = bytes.iter().filter(|word_letter| **word_letter == letter).count();
                count >= counts.min_count as usize
                    && counts
                        .max_count
                        .map_or(true, |max_count| count <= max_count as usize)
                    && counts
                        .not_here
                        .iter()
                        .all(|index| bytes[*index as usize] != letter)
            })
    }

    fn check_index(&self, index: usize) -> Result<(), WordleError> {
        if index >= self.word_length() {
            return Err(WordleError::MalformedFeedback(format!(
                "location {} is outside a {}-letter word",
                index, self.word_length
            )));
        }
        Ok(())
    }
}

fn count_num_times_in_guess(letter: char, guess_result: &GuessResult) -> u8 {
    zip(guess_result.guess.chars(), guess_result.results.iter())
        .filter(|(other_letter, result)| {
            *other_letter == letter && **result != LetterResult::NotPresent
        })
        .count() as u8
}

/// Restricts the guess pool to the words that reuse everything revealed so far, as hard mode
/// requires.
///
/// This filters the pool of allowed guesses, not the possible answers.
pub fn apply_hard_mode(pool: &[Arc<str>], known: &KnownConstraints) -> Vec<Arc<str>> {
    if known.is_empty() {
        return pool.to_vec();
    }
    pool.iter()
        .filter(|word| known.is_satisfied_by(word))
        .map(Arc::clone)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn result<'a>(guess: &'a str, feedback: &str) -> GuessResult<'a> {
        GuessResult {
            guess,
            results: crate::results::parse_feedback(feedback).unwrap(),
        }
    }

    #[test]
    fn new_constraints_allow_any_word_of_the_right_length() {
        let constraints = KnownConstraints::new(4);

        assert!(constraints.is_empty());
        assert!(constraints.is_satisfied_by("abcd"));
        assert!(constraints.is_satisfied_by("zzzz"));

        // Wrong length
        assert_eq!(constraints.is_satisfied_by(""), false);
        assert_eq!(constraints.is_satisfied_by("abcde"), false);
    }

    #[test]
    fn set_must_be_at_can_be_repeated() -> Result<(), WordleError> {
        let mut constraints = KnownConstraints::new(3);

        constraints.set_must_be_at('a', 1)?;
        constraints.set_must_be_at('a', 1)?;

        assert_eq!(constraints.greens().collect::<Vec<_>>(), vec![(1, 'a')]);
        assert_eq!(constraints.min_count('a'), 1);
        Ok(())
    }

    #[test]
    fn set_must_be_at_counts_each_location() -> Result<(), WordleError> {
        let mut constraints = KnownConstraints::new(3);

        constraints.set_must_be_at('a', 0)?;
        constraints.set_must_be_at('a', 2)?;

        assert_eq!(constraints.min_count('a'), 2);
        Ok(())
    }

    #[test]
    fn set_must_be_at_conflicting_letter_errors() -> Result<(), WordleError> {
        let mut constraints = KnownConstraints::new(3);

        constraints.set_must_be_at('a', 0)?;

        assert_matches!(
            constraints.set_must_be_at('b', 0),
            Err(WordleError::InconsistentFeedback)
        );
        Ok(())
    }

    #[test]
    fn here_after_not_here_errors() -> Result<(), WordleError> {
        let mut constraints = KnownConstraints::new(3);

        constraints.set_must_not_be_at('a', 0)?;

        assert_matches!(
            constraints.set_must_be_at('a', 0),
            Err(WordleError::InconsistentFeedback)
        );
        Ok(())
    }

    #[test]
    fn not_here_after_here_errors() -> Result<(), WordleError> {
        let mut constraints = KnownConstraints::new(3);

        constraints.set_must_be_at('a', 0)?;

        assert_matches!(
            constraints.set_must_not_be_at('a', 0),
            Err(WordleError::InconsistentFeedback)
        );
        Ok(())
    }

    #[test]
    fn max_count_less_than_min_count_errors() -> Result<(), WordleError> {
        let mut constraints = KnownConstraints::new(3);

        constraints.bump_min_count('a', 2)?;

        assert_matches!(
            constraints.set_max_count('a', 1),
            Err(WordleError::InconsistentFeedback)
        );
        Ok(())
    }

    #[test]
    fn min_count_more_than_max_count_errors() -> Result<(), WordleError> {
        let mut constraints = KnownConstraints::new(3);

        constraints.set_max_count('a', 0)?;

        assert_matches!(
            constraints.bump_min_count('a', 1),
            Err(WordleError::InconsistentFeedback)
        );
        Ok(())
    }

    #[test]
    fn location_outside_word_errors() {
        let mut constraints = KnownConstraints::new(3);

        assert_matches!(
            constraints.set_must_be_at('a', 3),
            Err(WordleError::MalformedFeedback(_))
        );
    }

    #[test]
    fn update_with_wrong_length_errors() {
        let mut constraints = KnownConstraints::new(5);

        assert_matches!(
            constraints.update(&result("abbc", "YYG.")),
            Err(WordleError::MalformedFeedback(_))
        );
    }

    #[test]
    fn is_satisfied_by_with_restrictions() -> Result<(), WordleError> {
        let constraints = KnownConstraints::from_result(&result("abbc", "YYG."))?;

        assert!(constraints.is_satisfied_by("bdba"));
        assert!(constraints.is_satisfied_by("dabb"));

        assert_eq!(constraints.is_satisfied_by("bbba"), false);
        assert_eq!(constraints.is_satisfied_by("bcba"), false);
        assert_eq!(constraints.is_satisfied_by("adbd"), false);
        assert_eq!(constraints.is_satisfied_by("bdbd"), false);
        Ok(())
    }

    #[test]
    fn is_satisfied_by_with_known_max_count() -> Result<(), WordleError> {
        let constraints = KnownConstraints::from_result(&result("abbc", "Y.G."))?;

        assert!(constraints.is_satisfied_by("edba"));
        assert!(constraints.is_satisfied_by("dabe"));
        assert!(constraints.is_satisfied_by("daba"));

        assert_eq!(constraints.is_satisfied_by("bdba"), false);
        assert_eq!(constraints.is_satisfied_by("dcba"), false);
        assert_eq!(constraints.is_satisfied_by("adbd"), false);
        Ok(())
    }

    #[test]
    fn grey_copy_of_present_letter_keeps_words_with_exact_count() -> Result<(), WordleError> {
        // "geese" against "those".
        let constraints = KnownConstraints::from_result(&result("geese", "...GG"))?;

        assert_eq!(constraints.min_count('e'), 1);
        assert_eq!(constraints.max_count('e'), Some(1));
        assert_eq!(constraints.absent_letters().collect::<Vec<_>>(), vec!['g']);

        assert!(constraints.is_satisfied_by("those"));
        assert!(constraints.is_satisfied_by("prose"));
        assert_eq!(constraints.is_satisfied_by("terse"), false);
        assert_eq!(constraints.is_satisfied_by("goose"), false);
        Ok(())
    }

    #[test]
    fn grey_copy_location_is_not_excluded() -> Result<(), WordleError> {
        // "eerie" against "sleep".
        let constraints = KnownConstraints::from_result(&result("eerie", "YY..."))?;
        let pool: Vec<Arc<str>> = ["stele", "sleep", "creme", "tepee"]
            .iter()
            .map(|word| Arc::from(*word))
            .collect();

        assert_eq!(constraints.min_count('e'), 2);
        assert_eq!(constraints.max_count('e'), Some(2));
        assert_eq!(
            constraints.yellows().collect::<Vec<_>>(),
            vec![('e', 0), ('e', 1)]
        );
        assert_eq!(
            apply_hard_mode(&pool, &constraints),
            vec![Arc::<str>::from("stele"), Arc::<str>::from("sleep")]
        );
        Ok(())
    }

    #[test]
    fn yellows_lists_excluded_locations() -> Result<(), WordleError> {
        let constraints = KnownConstraints::from_result(&result("grain", ".YY.Y"))?;

        assert_eq!(
            constraints.yellows().collect::<Vec<_>>(),
            vec![('a', 2), ('n', 4), ('r', 1)]
        );
        assert_eq!(constraints.greens().count(), 0);
        assert_eq!(constraints.absent_letters().collect::<Vec<_>>(), vec!['g', 'i']);
        Ok(())
    }

    #[test]
    fn empty_then_merge() -> Result<(), WordleError> {
        let mut constraints = KnownConstraints::new(4);
        let other = KnownConstraints::from_result(&result("abbc", "YYG."))?;

        constraints.merge(&other)?;

        assert_eq!(constraints, other);
        assert!(constraints.is_satisfied_by("babd"));
        assert_eq!(constraints.is_satisfied_by("badb"), false);
        Ok(())
    }

    #[test]
    fn merge() -> Result<(), WordleError> {
        let mut constraints = KnownConstraints::from_result(&result("bade", "GG.G"))?;
        let other = KnownConstraints::from_result(&result("abbc", "YYG."))?;

        constraints.merge(&other)?;

        assert!(constraints.is_satisfied_by("babe"));
        assert_eq!(constraints.is_satisfied_by("baee"), false);
        Ok(())
    }

    #[test]
    fn merge_wrong_length() {
        let mut constraints = KnownConstraints::new(4);
        let other = KnownConstraints::new(5);

        assert_matches!(
            constraints.merge(&other),
            Err(WordleError::InconsistentFeedback)
        );
    }

    #[test]
    fn conflicting_merge_present_then_not_present() -> Result<(), WordleError> {
        let mut constraints = KnownConstraints::from_result(&result("abcd", "YYY."))?;
        let other = KnownConstraints::from_result(&result("abbc", "YYG."))?;

        assert_matches!(
            constraints.merge(&other),
            Err(WordleError::InconsistentFeedback)
        );
        Ok(())
    }

    #[test]
    fn conflicting_merge_present_different_place() -> Result<(), WordleError> {
        let mut constraints = KnownConstraints::from_result(&result("abbc", "YGG."))?;
        let other = KnownConstraints::from_result(&result("abbc", "YYG."))?;

        assert_matches!(
            constraints.merge(&other),
            Err(WordleError::InconsistentFeedback)
        );
        Ok(())
    }

    #[test]
    fn apply_hard_mode_requires_known_letters() -> Result<(), WordleError> {
        let mut known = KnownConstraints::new(5);
        known.set_must_be_at('c', 0)?;
        known.bump_min_count('r', 1)?;
        let pool: Vec<Arc<str>> = ["train", "crane", "cider", "clamp"]
            .iter()
            .map(|word| Arc::from(*word))
            .collect();

        let allowed = apply_hard_mode(&pool, &known);

        assert_eq!(allowed, vec![Arc::<str>::from("crane"), Arc::<str>::from("cider")]);
        Ok(())
    }

    #[test]
    fn apply_hard_mode_without_constraints_keeps_pool() {
        let pool: Vec<Arc<str>> = vec![Arc::from("train"), Arc::from("crane")];

        assert_eq!(apply_hard_mode(&pool, &KnownConstraints::new(5)), pool);
    }
}
