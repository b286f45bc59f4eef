use crate::results::*;
use std::collections::HashSet;
use std::io::BufRead;
use std::ops::Deref;
use std::result::Result;
use std::sync::Arc;

/// Checks that `word` has exactly `expected_length` letters, all from `a` to `z`.
pub fn validate_word(word: &str, expected_length: usize) -> Result<(), WordleError> {
    if word.len() != expected_length
        || expected_length == 0
        || expected_length > MAX_WORD_LENGTH
        || !word.bytes().all(|letter| letter.is_ascii_lowercase())
    {
        return Err(WordleError::MalformedWord {
            word: word.to_string(),
            expected_length,
        });
    }
    Ok(())
}

/// Checks every word with [`validate_word`].
pub fn validate_words(words: &[Arc<str>], expected_length: usize) -> Result<(), WordleError> {
    words
        .iter()
        .try_for_each(|word| validate_word(word, expected_length))
}

/// An immutable list of words that all have the same length.
///
/// Dereferences to a slice of the words, in the order they were given.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordBank {
    all_words: Vec<Arc<str>>,
    word_length: usize,
}

impl WordBank {
    /// Constructs a new `WordBank` by reading words from the given reader.
    ///
    /// The reader should provide one word per line. Each word is trimmed and converted to lower
    /// case, and blank lines are skipped. Every word must have the same length as the first one.
    pub fn from_reader<R: BufRead>(word_reader: R) -> Result<Self, WordleError> {
        let mut words = Vec::new();
        for maybe_line in word_reader.lines() {
            let line = maybe_line?;
            let word = line.trim();
            if !word.is_empty() {
                words.push(word.to_lowercase());
            }
        }
        WordBank::from_iterator(words)
    }

    /// Constructs a new `WordBank` using the words from the given iterator.
    ///
    /// Each word is trimmed and converted to lower case. Empty words are skipped.
    ///
    /// ```
    /// use wordle_autosolver::WordBank;
    ///
    /// let bank = WordBank::from_iterator(["Crane", "slate"]).unwrap();
    /// assert_eq!(bank.word_length(), 5);
    /// assert_eq!(&*bank[0], "crane");
    /// ```
    pub fn from_iterator<I, S>(words: I) -> Result<Self, WordleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut word_length = 0;
        let mut all_words = Vec::new();
        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            if word.is_empty() {
                continue;
            }
            if word_length == 0 {
                word_length = word.len();
            }
            validate_word(&word, word_length)?;
            all_words.push(Arc::from(word.as_str()));
        }
        Ok(WordBank {
            all_words,
            word_length,
        })
    }

    /// Returns the length of every word in the bank, or 0 if the bank is empty.
    pub fn word_length(&self) -> usize {
        self.word_length
    }

    /// Returns `true` iff the bank holds exactly this word.
    pub fn contains(&self, word: &str) -> bool {
        self.all_words.iter().any(|other| other.as_ref() == word)
    }
}

impl Deref for WordBank {
    type Target = [Arc<str>];

    fn deref(&self) -> &Self::Target {
        &self.all_words
    }
}

/// Combines the answer list with the extra guess-only words, keeping the answers first and
/// dropping duplicates.
pub fn combine_word_lists(answers: &[Arc<str>], guesses: &[Arc<str>]) -> Vec<Arc<str>> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(answers.len() + guesses.len());
    let mut combined = Vec::with_capacity(answers.len() + guesses.len());
    for word in answers.iter().chain(guesses.iter()) {
        if seen.insert(word.as_ref()) {
            combined.push(Arc::clone(word));
        }
    }
    combined
}

/// Returns the candidates that would have produced exactly these `results` had they been the
/// answer when `guess` was played.
///
/// The returned words keep their original order. An empty result means the feedback cannot be
/// explained by any of the candidates. Fails with [`WordleError::MalformedWord`] if any candidate
/// does not have the guess's length or contains characters other than `a`-`z`.
pub fn filter_candidates(
    candidates: &[Arc<str>],
    guess: &str,
    results: &[LetterResult],
) -> Result<Vec<Arc<str>>, WordleError> {
    validate_word(guess, results.len())?;
    validate_words(candidates, guess.len())?;
    let expected = CompressedGuessResult::from_results(results)?;
    Ok(candidates
        .iter()
        .filter(|candidate| CompressedGuessResult::compute(candidate, guess) == expected)
        .map(Arc::clone)
        .collect())
}

#[cfg(test)]
mod tests {

    use super::*;
    use assert_matches::assert_matches;
    use std::io::Cursor;

    macro_rules! assert_arc_eq {
        ($arc_vec:expr, $non_arc_vec:expr) => {
            assert_eq!(
                $arc_vec,
                $non_arc_vec
                    .iter()
                    .map(|thing| Arc::from(*thing))
                    .collect::<Vec<Arc<str>>>()
            );
        };
    }

    #[test]
    fn validate_word_accepts_lowercase_letters() {
        assert_matches!(validate_word("crane", 5), Ok(()));
    }

    #[test]
    fn validate_word_rejects_bad_words() {
        assert_matches!(
            validate_word("cran", 5),
            Err(WordleError::MalformedWord { expected_length: 5, .. })
        );
        assert_matches!(validate_word("cr4ne", 5), Err(WordleError::MalformedWord { .. }));
        assert_matches!(validate_word("CRANE", 5), Err(WordleError::MalformedWord { .. }));
        assert_matches!(validate_word("", 0), Err(WordleError::MalformedWord { .. }));
        assert_matches!(
            validate_word("abcdefghijk", 11),
            Err(WordleError::MalformedWord { .. })
        );
    }

    #[test]
    fn word_bank_from_reader() -> Result<(), WordleError> {
        let cursor = Cursor::new(String::from("worda\n Wordb \n\nother\nsmore\n"));

        let bank = WordBank::from_reader(cursor)?;

        assert_arc_eq!(bank.to_vec(), vec!["worda", "wordb", "other", "smore"]);
        assert_eq!(bank.word_length(), 5);
        Ok(())
    }

    #[test]
    fn word_bank_from_reader_rejects_mixed_lengths() {
        let cursor = Cursor::new(String::from("worda\nword\n"));

        assert_matches!(
            WordBank::from_reader(cursor),
            Err(WordleError::MalformedWord { expected_length: 5, .. })
        );
    }

    #[test]
    fn word_bank_empty() -> Result<(), WordleError> {
        let bank = WordBank::from_iterator(Vec::<String>::new())?;

        assert!(bank.is_empty());
        assert_eq!(bank.word_length(), 0);
        Ok(())
    }

    #[test]
    fn combine_word_lists_keeps_answers_first_without_duplicates() -> Result<(), WordleError> {
        let answers = WordBank::from_iterator(["crane", "slate"])?;
        let guesses = WordBank::from_iterator(["aahed", "slate", "zonal", "aahed"])?;

        assert_arc_eq!(
            combine_word_lists(&answers, &guesses),
            vec!["crane", "slate", "aahed", "zonal"]
        );
        Ok(())
    }

    #[test]
    fn filter_candidates_keeps_consistent_words() -> Result<(), WordleError> {
        let candidates = WordBank::from_iterator(["crane", "crate", "trace", "slate"])?;
        let results = get_result_for_guess("crate", "crane")?.results;

        let remaining = filter_candidates(&candidates, "crane", &results)?;

        assert_arc_eq!(remaining, vec!["crate"]);
        Ok(())
    }

    #[test]
    fn filter_candidates_rejects_mismatched_feedback() {
        let candidates = WordBank::from_iterator(["crane"]).unwrap();

        assert_matches!(
            filter_candidates(&candidates, "crane", &[LetterResult::Correct; 4]),
            Err(WordleError::MalformedWord { .. })
        );
    }
}
