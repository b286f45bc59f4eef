use crate::data::validate_word;
use std::fmt;
use std::io;
use std::sync::Arc;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The longest word supported by the solver.
pub const MAX_WORD_LENGTH: usize = 10;

/// The result of a given letter at a specific location.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LetterResult {
    /// The letter is in the word at this location (green).
    Correct,
    /// The letter is in the word, but not at this location (yellow).
    PresentNotHere,
    /// The letter is not in the word, or every copy of it was already accounted for (grey).
    NotPresent,
}

impl LetterResult {
    /// Parses a single feedback character.
    ///
    /// `g`, `G`, or `2` mean [`LetterResult::Correct`], `y`, `Y`, or `1` mean
    /// [`LetterResult::PresentNotHere`], and `.`, `b`, `x`, `-`, or `0` mean
    /// [`LetterResult::NotPresent`].
    pub fn from_char(c: char) -> Option<LetterResult> {
        match c.to_ascii_lowercase() {
            'g' | '2' => Some(LetterResult::Correct),
            'y' | '1' => Some(LetterResult::PresentNotHere),
            '.' | 'b' | 'x' | '-' | '0' => Some(LetterResult::NotPresent),
            _ => None,
        }
    }

    /// The canonical character for this result: `G`, `Y`, or `.`.
    pub fn to_char(self) -> char {
        match self {
            LetterResult::Correct => 'G',
            LetterResult::PresentNotHere => 'Y',
            LetterResult::NotPresent => '.',
        }
    }

    fn to_digit(self) -> u32 {
        match self {
            LetterResult::NotPresent => 0,
            LetterResult::PresentNotHere => 1,
            LetterResult::Correct => 2,
        }
    }
}

impl fmt::Display for LetterResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Indicates that an error occurred while trying to solve the game.
#[derive(Debug, Error)]
pub enum WordleError {
    /// No remaining answer is consistent with all of the feedback received so far. This usually
    /// means that feedback was misread.
    #[error("no possible answer is consistent with the feedback received so far")]
    InconsistentFeedback,
    /// A word had the wrong length or contained characters other than `a`-`z`.
    #[error("malformed word {word:?}: expected {expected_length} letters from 'a' to 'z'")]
    MalformedWord { word: String, expected_length: usize },
    /// Feedback had the wrong length or contained unknown symbols.
    #[error("malformed feedback: {0}")]
    MalformedFeedback(String),
    /// A word list that must not be empty was empty.
    #[error("the word list is empty")]
    EmptyWordList,
    /// The game has already been solved or has run out of attempts.
    #[error("the game is already over")]
    GameOver,
    /// Feedback was requested before any guess was submitted.
    #[error("no guess has been submitted yet")]
    NoPendingGuess,
    /// Reading input failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// The result of a single word guess.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct GuessResult<'a> {
    /// The guess that was made.
    pub guess: &'a str,
    /// The result of each letter, provided in the same letter order as in the guess.
    pub results: Vec<LetterResult>,
}

/// One submitted guess along with the feedback it received.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attempt {
    pub guess: Arc<str>,
    pub results: Vec<LetterResult>,
}

impl Attempt {
    /// Returns `true` iff every letter was [`LetterResult::Correct`].
    pub fn is_solved(&self) -> bool {
        is_all_correct(&self.results)
    }

    /// Borrows this attempt as a [`GuessResult`].
    pub fn as_guess_result(&self) -> GuessResult<'_> {
        GuessResult {
            guess: &self.guess,
            results: self.results.clone(),
        }
    }
}

/// How a game ended.
#[derive(Debug, Eq, PartialEq)]
pub enum GameResult {
    /// The answer was found. Provides every attempt, the last of which is the answer.
    Solved(Vec<Attempt>),
    /// Every attempt was used without finding the answer.
    Exhausted(Vec<Attempt>),
    /// The given objective is not in the answer list.
    UnknownWord,
}

/// A guess result packed into a single integer, with one base-3 digit per letter.
///
/// This is much cheaper to hash and compare than a `Vec<LetterResult>`, which matters when
/// partitioning thousands of candidates for thousands of guesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompressedGuessResult {
    data: u32,
}

impl CompressedGuessResult {
    /// Packs the given letter results.
    pub fn from_results(results: &[LetterResult]) -> Result<CompressedGuessResult, WordleError> {
        if results.len() > MAX_WORD_LENGTH {
            return Err(WordleError::MalformedFeedback(format!(
                "{} letters is more than the supported maximum of {}",
                results.len(),
                MAX_WORD_LENGTH
            )));
        }
        Ok(Self::pack(results))
    }

    /// Computes the packed result of `guess` against `objective`.
    ///
    /// Both words must already be validated and of equal length.
    pub fn compute(objective: &str, guess: &str) -> CompressedGuessResult {
        debug_assert_eq!(objective.len(), guess.len());
        let mut results = [LetterResult::NotPresent; MAX_WORD_LENGTH];
        let length = guess.len();
        fill_results(objective.as_bytes(), guess.as_bytes(), &mut results[..length]);
        Self::pack(&results[..length])
    }

    /// The number of distinct results possible for words of the given length.
    pub fn num_patterns(word_length: usize) -> usize {
        3usize.pow(word_length as u32)
    }

    /// A dense index for this result, below [`CompressedGuessResult::num_patterns`].
    pub fn index(self) -> usize {
        self.data as usize
    }

    /// Unpacks this into one result per letter.
    pub fn to_results(self, word_length: usize) -> Vec<LetterResult> {
        let mut remaining = self.data;
        let mut results = Vec::with_capacity(word_length);
        for _ in 0..word_length {
            results.push(match remaining % 3 {
                2 => LetterResult::Correct,
                1 => LetterResult::PresentNotHere,
                _ => LetterResult::NotPresent,
            });
            remaining /= 3;
        }
        results
    }

    fn pack(results: &[LetterResult]) -> CompressedGuessResult {
        let mut data = 0;
        for result in results.iter().rev() {
            data = data * 3 + result.to_digit();
        }
        CompressedGuessResult { data }
    }
}

/// Determines the result of the given `guess` when applied to the given `objective`.
///
/// Letters are scored in two passes. Exact matches are marked first and consume their letter
/// from the objective. Only then are the remaining guess letters matched, left to right, against
/// whatever copies of the letter the objective has left. A repeated guess letter therefore only
/// earns as many non-grey results as the objective has copies of it.
///
/// ```
/// use wordle_autosolver::*;
///
/// let result = get_result_for_guess("speed", "sheep").unwrap();
/// assert_eq!(feedback_to_string(&result.results), "G.GGY");
/// ```
pub fn get_result_for_guess<'a>(
    objective: &str,
    guess: &'a str,
) -> Result<GuessResult<'a>, WordleError> {
    validate_word(objective, objective.len())?;
    validate_word(guess, objective.len())?;
    let mut results = vec![LetterResult::NotPresent; guess.len()];
    fill_results(objective.as_bytes(), guess.as_bytes(), &mut results);
    Ok(GuessResult { guess, results })
}

fn fill_results(objective: &[u8], guess: &[u8], results: &mut [LetterResult]) {
    let mut unmatched_counts = [0u8; 26];
    for &letter in objective {
        unmatched_counts[(letter - b'a') as usize] += 1;
    }
    for (index, (&guess_letter, &objective_letter)) in guess.iter().zip(objective).enumerate() {
        if guess_letter == objective_letter {
            results[index] = LetterResult::Correct;
            unmatched_counts[(guess_letter - b'a') as usize] -= 1;
        }
    }
    for (index, &guess_letter) in guess.iter().enumerate() {
        if results[index] == LetterResult::Correct {
            continue;
        }
        let count = &mut unmatched_counts[(guess_letter - b'a') as usize];
        if *count > 0 {
            *count -= 1;
            results[index] = LetterResult::PresentNotHere;
        } else {
            results[index] = LetterResult::NotPresent;
        }
    }
}

/// Returns `true` iff every result is [`LetterResult::Correct`].
pub fn is_all_correct(results: &[LetterResult]) -> bool {
    results.iter().all(|result| *result == LetterResult::Correct)
}

/// Parses feedback text such as `"G.YY."` into letter results. See [`LetterResult::from_char`]
/// for the accepted symbols. Surrounding whitespace is ignored.
pub fn parse_feedback(input: &str) -> Result<Vec<LetterResult>, WordleError> {
    input
        .trim()
        .chars()
        .map(|c| {
            LetterResult::from_char(c).ok_or_else(|| {
                WordleError::MalformedFeedback(format!(
                    "unexpected symbol {:?} in {:?}; use 'g', 'y', or '.'",
                    c,
                    input.trim()
                ))
            })
        })
        .collect()
}

/// Renders letter results as text, using `G`, `Y`, and `.`.
pub fn feedback_to_string(results: &[LetterResult]) -> String {
    results.iter().map(|result| result.to_char()).collect()
}
