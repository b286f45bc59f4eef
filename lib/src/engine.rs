use crate::data::*;
use crate::restrictions::*;
use crate::results::*;
use crate::scorers::*;
use log::{debug, info, warn};
use std::result::Result;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The number of guesses allowed in one game.
pub const MAX_ATTEMPTS: usize = 6;

/// The surface the game is actually played on, such as a web page, a terminal, or a simulation.
///
/// The solver only submits guesses and reads back the feedback. Retrying a failed read, or giving
/// up after a timeout, is up to the implementation.
pub trait GameSurface {
    /// Submits the given guess to the game.
    fn provide_guess(&mut self, guess: &str) -> Result<(), WordleError>;

    /// Returns the feedback for the most recently submitted guess.
    fn read_feedback(&mut self) -> Result<Vec<LetterResult>, WordleError>;
}

/// Plays against a known objective word, computing feedback locally.
///
/// ```
/// use wordle_autosolver::*;
///
/// let mut game = LocalGame::new("crane").unwrap();
/// game.provide_guess("grain").unwrap();
/// assert_eq!(feedback_to_string(&game.read_feedback().unwrap()), ".GG.Y");
/// ```
#[derive(Debug, Clone)]
pub struct LocalGame {
    objective: Arc<str>,
    pending_guess: Option<Arc<str>>,
}

impl LocalGame {
    pub fn new(objective: &str) -> Result<LocalGame, WordleError> {
        validate_word(objective, objective.len())?;
        Ok(LocalGame {
            objective: Arc::from(objective),
            pending_guess: None,
        })
    }
}

impl GameSurface for LocalGame {
    fn provide_guess(&mut self, guess: &str) -> Result<(), WordleError> {
        validate_word(guess, self.objective.len())?;
        self.pending_guess = Some(Arc::from(guess));
        Ok(())
    }

    fn read_feedback(&mut self) -> Result<Vec<LetterResult>, WordleError> {
        let guess = self
            .pending_guess
            .take()
            .ok_or(WordleError::NoPendingGuess)?;
        Ok(get_result_for_guess(&self.objective, &guess)?.results)
    }
}

/// Options for a new game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverConfig {
    /// Whether every guess must reuse all of the letters revealed so far.
    pub hard_mode: bool,
    /// A fixed first guess. The best first guess does not depend on the answer, so it can be
    /// computed once with [`compute_opening_guess`] and reused across games.
    pub opening_guess: Option<Arc<str>>,
}

/// Where a game is up to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameStatus {
    /// A guess is waiting for feedback.
    Guessing,
    /// The last guess was the answer.
    Solved,
    /// Every attempt was used without finding the answer.
    Exhausted,
}

/// Everything the solver knows about one game.
///
/// States are never modified in place: [`SolverState::step`] returns the next state, leaving the
/// current one untouched.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverState {
    hard_mode: bool,
    /// Every word that may be guessed: the answers, then any extra guess-only words.
    all_guesses: Vec<Arc<str>>,
    /// The answers that are still consistent with every attempt.
    possible_answers: Vec<Arc<str>>,
    known: KnownConstraints,
    attempts: Vec<Attempt>,
    current_guess: Option<Arc<str>>,
    status: GameStatus,
}

impl SolverState {
    /// Starts a new game and selects its first guess.
    ///
    /// Every word in `answers` and `guesses` must have the same length. `guesses` lists the extra
    /// words that may be guessed but can never be the answer, and may be empty. Repeated words are
    /// only counted once.
    pub fn new(
        answers: &[Arc<str>],
        guesses: &[Arc<str>],
        config: SolverConfig,
    ) -> Result<SolverState, WordleError> {
        let word_length = answers.first().ok_or(WordleError::EmptyWordList)?.len();
        for word in answers.iter().chain(guesses.iter()) {
            validate_word(word, word_length)?;
        }
        let mut state = SolverState {
            hard_mode: config.hard_mode,
            all_guesses: combine_word_lists(answers, guesses),
            possible_answers: combine_word_lists(answers, &[]),
            known: KnownConstraints::new(word_length),
            attempts: Vec::with_capacity(MAX_ATTEMPTS),
            current_guess: None,
            status: GameStatus::Guessing,
        };
        let first_guess = match config.opening_guess {
            Some(opening_guess) => {
                if !state
                    .all_guesses
                    .iter()
                    .any(|word| *word == opening_guess)
                {
                    return Err(WordleError::MalformedWord {
                        word: opening_guess.to_string(),
                        expected_length: word_length,
                    });
                }
                debug!("Opening with the fixed guess {}", opening_guess);
                opening_guess
            }
            None => state.select_guess()?,
        };
        state.current_guess = Some(first_guess);
        Ok(state)
    }

    /// Applies the feedback for the current guess, and returns the next guess along with the
    /// resulting state.
    ///
    /// The next guess is `None` once the game is over, which happens when every letter is
    /// correct, or after [`MAX_ATTEMPTS`] guesses.
    ///
    /// Fails with [`WordleError::InconsistentFeedback`] if no possible answer could have produced
    /// this feedback along with all the earlier feedback.
    pub fn step(
        &self,
        results: &[LetterResult],
    ) -> Result<(Option<Arc<str>>, SolverState), WordleError> {
        let guess = match (&self.status, &self.current_guess) {
            (GameStatus::Guessing, Some(guess)) => Arc::clone(guess),
            _ => return Err(WordleError::GameOver),
        };
        if results.len() != guess.len() {
            return Err(WordleError::MalformedFeedback(format!(
                "expected {} results for {} but got {}",
                guess.len(),
                guess,
                results.len()
            )));
        }

        let mut next = self.clone();
        next.current_guess = None;
        next.attempts.push(Attempt {
            guess: Arc::clone(&guess),
            results: results.to_vec(),
        });
        if is_all_correct(results) {
            info!("Solved with {} after {} guesses", guess, next.attempts.len());
            next.status = GameStatus::Solved;
            return Ok((None, next));
        }

        let guess_result = GuessResult {
            guess: &guess,
            results: results.to_vec(),
        };
        if let Err(err) = next
            .known
            .merge(&KnownConstraints::from_result(&guess_result)?)
        {
            warn!(
                "Feedback {} for {} contradicts earlier feedback",
                feedback_to_string(results),
                guess
            );
            return Err(err);
        }
        next.possible_answers = filter_candidates(&self.possible_answers, &guess, results)?;
        if next.possible_answers.is_empty() {
            warn!(
                "No possible answer gives feedback {} for {}",
                feedback_to_string(results),
                guess
            );
            return Err(WordleError::InconsistentFeedback);
        }
        debug!(
            "{} possible answers remain after {} guesses",
            next.possible_answers.len(),
            next.attempts.len()
        );

        if next.attempts.len() >= MAX_ATTEMPTS {
            info!("Out of guesses after {}", guess);
            next.status = GameStatus::Exhausted;
            return Ok((None, next));
        }
        let next_guess = next.select_guess()?;
        next.current_guess = Some(Arc::clone(&next_guess));
        Ok((Some(next_guess), next))
    }

    /// The guess waiting for feedback, if the game is not over.
    pub fn current_guess(&self) -> Option<&Arc<str>> {
        self.current_guess.as_ref()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Every guess made so far, along with its feedback.
    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    /// The answers that are still consistent with every attempt.
    pub fn possible_answers(&self) -> &[Arc<str>] {
        &self.possible_answers
    }

    /// Every word that may be guessed.
    pub fn all_guesses(&self) -> &[Arc<str>] {
        &self.all_guesses
    }

    pub fn known_constraints(&self) -> &KnownConstraints {
        &self.known
    }

    pub fn is_hard_mode(&self) -> bool {
        self.hard_mode
    }

    /// The words the next guess will be chosen from.
    ///
    /// In hard mode, this only includes words that satisfy the known constraints. Words that have
    /// already been guessed are never included.
    pub fn guess_pool(&self) -> Vec<Arc<str>> {
        let mut pool = if self.hard_mode {
            apply_hard_mode(&self.all_guesses, &self.known)
        } else {
            self.all_guesses.clone()
        };
        if !self.attempts.is_empty() {
            pool.retain(|word| !self.attempts.iter().any(|attempt| attempt.guess == *word));
        }
        pool
    }

    /// The `n` best next guesses, best first.
    pub fn top_guesses(&self, n: usize) -> Result<Vec<ScoredGuess>, WordleError> {
        rank_guesses(&self.guess_pool(), &self.possible_answers, n)
    }

    fn select_guess(&self) -> Result<Arc<str>, WordleError> {
        let pool = self.guess_pool();
        let best = best_guess(&pool, &self.possible_answers)?
            .ok_or(WordleError::InconsistentFeedback)?;
        debug!(
            "Selected {} ({:.3} bits) from {} words with {} possible answers",
            best.word,
            best.entropy,
            pool.len(),
            self.possible_answers.len()
        );
        Ok(best.word)
    }
}

/// Starts a new game with the default options, apart from `hard_mode`.
pub fn new_game(
    answers: &[Arc<str>],
    guesses: &[Arc<str>],
    hard_mode: bool,
) -> Result<SolverState, WordleError> {
    SolverState::new(
        answers,
        guesses,
        SolverConfig {
            hard_mode,
            ..SolverConfig::default()
        },
    )
}

/// Applies the feedback for the state's current guess. See [`SolverState::step`].
pub fn step(
    state: &SolverState,
    results: &[LetterResult],
) -> Result<(Option<Arc<str>>, SolverState), WordleError> {
    state.step(results)
}

/// Plays the game on the given surface until it is solved or out of attempts.
///
/// ```
/// use wordle_autosolver::*;
///
/// let answers = WordBank::from_iterator(["crane", "slate", "trace", "crate"]).unwrap();
/// let state = new_game(&answers, &[], false).unwrap();
///
/// let result = run(state, &mut LocalGame::new("trace").unwrap()).unwrap();
/// assert!(matches!(result, GameResult::Solved(_)));
/// ```
pub fn run<G>(state: SolverState, surface: &mut G) -> Result<GameResult, WordleError>
where
    G: GameSurface + ?Sized,
{
    let mut state = state;
    loop {
        match state.status {
            GameStatus::Solved => return Ok(GameResult::Solved(state.attempts)),
            GameStatus::Exhausted => return Ok(GameResult::Exhausted(state.attempts)),
            GameStatus::Guessing => {}
        }
        let guess = state.current_guess.clone().ok_or(WordleError::GameOver)?;
        surface.provide_guess(&guess)?;
        let results = surface.read_feedback()?;
        let (_, next) = state.step(&results)?;
        state = next;
    }
}

/// Computes the best first guess for the given word lists. This is the same for every answer.
pub fn compute_opening_guess(
    answers: &[Arc<str>],
    guesses: &[Arc<str>],
) -> Result<Option<ScoredGuess>, WordleError> {
    best_guess(
        &combine_word_lists(answers, guesses),
        &combine_word_lists(answers, &[]),
    )
}

/// Attempts to guess the given objective within [`MAX_ATTEMPTS`] guesses.
///
/// Returns [`GameResult::UnknownWord`] if `objective` is not one of the `answers`.
pub fn play_game(
    objective: &str,
    answers: &[Arc<str>],
    guesses: &[Arc<str>],
    config: SolverConfig,
) -> Result<GameResult, WordleError> {
    if !answers.iter().any(|answer| answer.as_ref() == objective) {
        return Ok(GameResult::UnknownWord);
    }
    let state = SolverState::new(answers, guesses, config)?;
    run(state, &mut LocalGame::new(objective)?)
}
