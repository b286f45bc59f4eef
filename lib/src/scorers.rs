use crate::data::{validate_word, validate_words};
use crate::results::{CompressedGuessResult, WordleError};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

/// Entropies are compared at this resolution. Different partitions can have the same entropy, and
/// summing their terms can round differently.
const ENTROPY_RESOLUTION: f64 = 1e9;

/// A possible guess along with how much information it is expected to reveal.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredGuess {
    pub word: Arc<str>,
    /// The expected information, in bits, revealed by playing this word.
    pub entropy: f64,
    /// Whether this word could itself be the answer.
    pub is_candidate: bool,
}

impl ScoredGuess {
    /// The number of candidates expected to remain after playing this word.
    pub fn expected_remaining(&self, num_candidates: usize) -> f64 {
        num_candidates as f64 / self.entropy.exp2()
    }
}

/// Orders guesses from worst to best.
///
/// Higher entropy wins. Equal entropies prefer a word that could be the answer, and then the
/// lexicographically smallest word. This is a total order, so a parallel max-reduction always
/// picks the same word.
pub fn compare_guesses(a: &ScoredGuess, b: &ScoredGuess) -> Ordering {
    quantize(a.entropy)
        .cmp(&quantize(b.entropy))
        .then(a.is_candidate.cmp(&b.is_candidate))
        .then_with(|| b.word.cmp(&a.word))
}

fn quantize(entropy: f64) -> i64 {
    (entropy * ENTROPY_RESOLUTION).round() as i64
}

/// Computes the Shannon entropy, in bits, of the partition of `candidates` by the result each
/// would give for `guess`.
///
/// Fails with [`WordleError::MalformedWord`] unless every candidate has the guess's length and
/// only contains letters from `a` to `z`.
pub fn compute_entropy(guess: &str, candidates: &[Arc<str>]) -> Result<f64, WordleError> {
    validate_word(guess, guess.len())?;
    validate_words(candidates, guess.len())?;
    let mut buffers = PartitionBuffers::new(guess.len());
    Ok(compute_entropy_with_buffers(guess, candidates, &mut buffers))
}

/// Scratch space for partitioning candidates, reused across guesses.
struct PartitionBuffers {
    /// Candidates per result, indexed by [`CompressedGuessResult::index`]. All zero between uses.
    counts: Vec<u32>,
    /// The non-empty partition sizes, sorted so that the sum does not depend on which results
    /// the partitions belong to.
    sizes: Vec<u32>,
}

impl PartitionBuffers {
    fn new(word_length: usize) -> PartitionBuffers {
        PartitionBuffers {
            counts: vec![0; CompressedGuessResult::num_patterns(word_length)],
            sizes: Vec::new(),
        }
    }
}

/// All words must be validated and have the same length.
fn compute_entropy_with_buffers(
    guess: &str,
    candidates: &[Arc<str>],
    buffers: &mut PartitionBuffers,
) -> f64 {
    if candidates.is_empty() {
        return 0.0;
    }
    for candidate in candidates {
        buffers.counts[CompressedGuessResult::compute(candidate, guess).index()] += 1;
    }
    buffers.sizes.clear();
    for count in buffers.counts.iter_mut() {
        if *count > 0 {
            buffers.sizes.push(*count);
            *count = 0;
        }
    }
    buffers.sizes.sort_unstable();
    // H = log2(n) - sum(c * log2(c)) / n
    let total = candidates.len() as f64;
    let weighted_sum: f64 = buffers
        .sizes
        .iter()
        .map(|size| {
            let size = *size as f64;
            size * size.log2()
        })
        .sum();
    total.log2() - weighted_sum / total
}

fn score_pool<'a>(
    guess_pool: &'a [Arc<str>],
    candidates: &'a [Arc<str>],
    candidate_set: &'a HashSet<&'a str>,
) -> impl ParallelIterator<Item = ScoredGuess> + 'a {
    let word_length = candidates[0].len();
    guess_pool.par_iter().map_init(
        move || PartitionBuffers::new(word_length),
        move |buffers, word| ScoredGuess {
            word: Arc::clone(word),
            entropy: compute_entropy_with_buffers(word, candidates, buffers),
            is_candidate: candidate_set.contains(word.as_ref()),
        },
    )
}

/// Checks the candidates, and returns the early answer for fewer than two of them. Otherwise
/// checks the pool too.
fn check_words(
    guess_pool: &[Arc<str>],
    candidates: &[Arc<str>],
) -> Result<Option<Vec<ScoredGuess>>, WordleError> {
    let word_length = match candidates.first() {
        Some(first) => first.len(),
        None => return Ok(Some(Vec::new())),
    };
    validate_words(candidates, word_length)?;
    if candidates.len() == 1 {
        return Ok(Some(vec![ScoredGuess {
            word: Arc::clone(&candidates[0]),
            entropy: 0.0,
            is_candidate: true,
        }]));
    }
    validate_words(guess_pool, word_length)?;
    Ok(None)
}

/// Selects the guess from `guess_pool` that maximizes the expected information about which of
/// the `candidates` is the answer. See [`compare_guesses`] for how ties are broken.
///
/// When only one candidate remains, it is returned without scoring the pool. Returns `None` if
/// there are no candidates, or no guesses to choose from. Fails with
/// [`WordleError::MalformedWord`] if any word it would score is malformed or of a different
/// length than the candidates.
///
/// ```
/// use std::sync::Arc;
/// use wordle_autosolver::scorers::best_guess;
///
/// let candidates: Vec<Arc<str>> = vec![Arc::from("apple")];
/// let best = best_guess(&[], &candidates).unwrap().unwrap();
/// assert_eq!(&*best.word, "apple");
/// ```
pub fn best_guess(
    guess_pool: &[Arc<str>],
    candidates: &[Arc<str>],
) -> Result<Option<ScoredGuess>, WordleError> {
    if let Some(early) = check_words(guess_pool, candidates)? {
        return Ok(early.into_iter().next());
    }
    let candidate_set: HashSet<&str> = candidates.iter().map(|word| word.as_ref()).collect();
    Ok(score_pool(guess_pool, candidates, &candidate_set).max_by(compare_guesses))
}

/// Scores every word in `guess_pool` and returns the best `n`, best first.
pub fn rank_guesses(
    guess_pool: &[Arc<str>],
    candidates: &[Arc<str>],
    n: usize,
) -> Result<Vec<ScoredGuess>, WordleError> {
    let mut scored = match check_words(guess_pool, candidates)? {
        Some(early) => early,
        None => {
            let candidate_set: HashSet<&str> =
                candidates.iter().map(|word| word.as_ref()).collect();
            let mut scored: Vec<ScoredGuess> =
                score_pool(guess_pool, candidates, &candidate_set).collect();
            scored.sort_unstable_by(|a, b| compare_guesses(b, a));
            scored
        }
    };
    scored.truncate(n);
    Ok(scored)
}
