//! Solves Wordle-style puzzles by repeatedly choosing the guess that maximizes the expected
//! information about the answer.
//!
//! The solver never touches the game itself. It hands each guess to a [`GameSurface`] and reads
//! the feedback back, so the same engine can drive a simulation, a terminal, or a browser.
//!
//! ```
//! use wordle_autosolver::*;
//!
//! let answers = WordBank::from_iterator(["crane", "slate", "trace", "crate", "react"]).unwrap();
//! let result = play_game("react", &answers, &[], SolverConfig::default()).unwrap();
//!
//! if let GameResult::Solved(attempts) = result {
//!     assert_eq!(&*attempts.last().unwrap().guess, "react");
//! } else {
//!     panic!("expected to solve the game");
//! }
//! ```

mod data;
mod engine;
mod restrictions;
mod results;
pub mod scorers;

pub use data::combine_word_lists;
pub use data::filter_candidates;
pub use data::validate_word;
pub use data::validate_words;
pub use data::WordBank;
pub use engine::*;
pub use restrictions::apply_hard_mode;
pub use restrictions::KnownConstraints;
pub use results::*;
