use clap::{Parser, Subcommand};
use log::{info, warn};
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use std::error::Error;
use std::fs::File;
use std::io;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use wordle_autosolver::*;

/// Plays Wordle in reverse: you pick the word, and the computer guesses it.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Path to a file that lists every possible answer, with one word on each line.
    #[clap(short = 'a', long)]
    answers_file: String,

    /// Path to a file that lists extra words that may be guessed but are never the answer.
    #[clap(short = 'g', long)]
    guesses_file: Option<String>,

    /// Only guess words that use every letter revealed so far.
    #[clap(long)]
    hard_mode: bool,

    /// Always open with this word instead of computing the best opening guess.
    #[clap(long)]
    opening_guess: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play against a word that you choose, entering the feedback for each guess.
    Interactive,
    /// Run a single game with the given word.
    Single { word: String },
    /// Run games against randomly chosen answers.
    Random {
        /// The number of games to play.
        #[clap(short, long, default_value_t = 1)]
        count: usize,
    },
    /// Solve every answer in the answers file and report how many guesses each took.
    Benchmark,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let start_time = Instant::now();
    let args = Args::parse();

    let answers = load_word_bank(&args.answers_file)?;
    let guesses = match &args.guesses_file {
        Some(path) => load_word_bank(path)?,
        None => WordBank::default(),
    };
    println!(
        "There are {} possible answers and {} extra guesses.",
        answers.len(),
        guesses.len()
    );
    let config = SolverConfig {
        hard_mode: args.hard_mode,
        opening_guess: args.opening_guess.as_deref().map(Arc::from),
    };

    match args.command {
        Command::Interactive => play_interactive_game(&answers, &guesses, config)?,
        Command::Single { word } => play_single_game(&word, &answers, &guesses, config)?,
        Command::Random { count } => play_random_games(count, &answers, &guesses, config)?,
        Command::Benchmark => run_benchmark(&answers, &guesses, config)?,
    }

    println!(
        "Command executed in {:.3}s.",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

fn load_word_bank(path: &str) -> Result<WordBank, WordleError> {
    info!("Loading words from {}", path);
    let reader = io::BufReader::new(File::open(path)?);
    WordBank::from_reader(reader)
}

/// Computes the opening guess once, so that it isn't recomputed for every game.
fn with_opening_guess(
    answers: &WordBank,
    guesses: &WordBank,
    config: SolverConfig,
) -> Result<SolverConfig, WordleError> {
    if config.opening_guess.is_some() {
        return Ok(config);
    }
    let opening_guess = compute_opening_guess(answers, guesses)?.map(|guess| {
        info!("Opening with {} ({:.3} bits)", guess.word, guess.entropy);
        guess.word
    });
    Ok(SolverConfig {
        opening_guess,
        ..config
    })
}

fn print_attempts(attempts: &[Attempt]) {
    for attempt in attempts {
        println!("\t{} {}", attempt.guess, feedback_to_string(&attempt.results));
    }
}

fn play_single_game(
    word: &str,
    answers: &WordBank,
    guesses: &WordBank,
    config: SolverConfig,
) -> Result<(), WordleError> {
    match play_game(word, answers, guesses, config)? {
        GameResult::Solved(attempts) => {
            println!("Solved it! It took me {} guesses.", attempts.len());
            print_attempts(&attempts);
        }
        GameResult::Exhausted(attempts) => {
            println!(
                "I still couldn't solve it after {} guesses :(",
                attempts.len()
            );
            print_attempts(&attempts);
        }
        GameResult::UnknownWord => {
            eprintln!("Error: given word not in the answers list.");
            std::process::exit(1);
        }
    }
    Ok(())
}

fn play_random_games(
    count: usize,
    answers: &WordBank,
    guesses: &WordBank,
    config: SolverConfig,
) -> Result<(), WordleError> {
    let config = with_opening_guess(answers, guesses, config)?;
    let mut rng = rand::thread_rng();
    for _ in 0..count {
        let answer = answers.choose(&mut rng).ok_or(WordleError::EmptyWordList)?;
        println!("Playing {}:", answer);
        play_single_game(answer, answers, guesses, config.clone())?;
    }
    Ok(())
}

fn run_benchmark(
    answers: &WordBank,
    guesses: &WordBank,
    config: SolverConfig,
) -> Result<(), WordleError> {
    let config = with_opening_guess(answers, guesses, config)?;
    let mut num_guesses_per_game: Vec<u32> = Vec::with_capacity(answers.len());
    let mut num_exhausted = 0;
    for answer in answers.iter() {
        match play_game(answer, answers, guesses, config.clone())? {
            GameResult::Solved(attempts) => num_guesses_per_game.push(attempts.len() as u32),
            GameResult::Exhausted(_) => {
                info!("Failed to solve {}", answer);
                num_exhausted += 1;
            }
            GameResult::UnknownWord => warn!("{} is not in the answers list", answer),
        }
    }
    println!(
        "Solved {} of {} words. Results:",
        num_guesses_per_game.len(),
        answers.len()
    );

    let mut num_games_per_round: BTreeMap<u32, u32> = BTreeMap::new();
    for num_guesses in num_guesses_per_game.iter() {
        *(num_games_per_round.entry(*num_guesses).or_insert(0)) += 1;
    }

    println!("|Num guesses|Num games|");
    println!("|-----------|---------|");
    for (num_round, num_games) in num_games_per_round.iter() {
        println!("|{}|{}|", num_round, num_games);
    }
    println!("|Unsolved|{}|", num_exhausted);

    if num_guesses_per_game.is_empty() {
        return Ok(());
    }
    let average: f64 = num_guesses_per_game.iter().sum::<u32>() as f64
        / num_guesses_per_game.len() as f64;
    let std_dev: f64 = (num_guesses_per_game
        .iter()
        .map(|num_guesses| (*num_guesses as f64 - average).powi(2))
        .sum::<f64>()
        / num_guesses_per_game.len() as f64)
        .sqrt();

    println!(
        "\n**Average number of guesses:** {:.2} +/- {:.2}",
        average, std_dev
    );
    Ok(())
}

/// Shows each guess on the terminal and reads the feedback typed back by the player.
struct StdinSurface {
    guess_length: usize,
}

impl GameSurface for StdinSurface {
    fn provide_guess(&mut self, guess: &str) -> Result<(), WordleError> {
        self.guess_length = guess.len();
        println!("I'm guessing: {}. How did I do?", guess);
        Ok(())
    }

    fn read_feedback(&mut self) -> Result<Vec<LetterResult>, WordleError> {
        loop {
            print!("> ");
            io::stdout().flush()?;
            let mut buffer = String::new();
            if io::stdin().read_line(&mut buffer)? == 0 {
                return Err(WordleError::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input closed before the game finished",
                )));
            }
            match parse_feedback(&buffer) {
                Ok(results) if results.len() == self.guess_length => return Ok(results),
                Ok(results) => println!(
                    "Expected {} letters but got {}. Try again.",
                    self.guess_length,
                    results.len()
                ),
                Err(err) => println!("{}. Try again.", err),
            }
        }
    }
}

fn play_interactive_game(
    answers: &WordBank,
    guesses: &WordBank,
    config: SolverConfig,
) -> Result<(), WordleError> {
    let mut state = SolverState::new(answers, guesses, config)?;
    println!("Choose a word from the answers list. Press enter once you've chosen.");
    {
        let mut buffer = String::new();
        io::stdin().read_line(&mut buffer)?;
    }

    println!(
        "I will now try to guess your word.\n\n\
         For each guess, enter the correctness of each letter as:\n\n\
           * '.' = this letter is not in the word\n\
           * 'y' = this letter is in the word, but not in this location\n\
           * 'g' = this letter is in the word and in the right location.\n\n\
         For example, if your word was \"spade\" and the guess was \"soapy\", you would enter \"g.gy.\""
    );

    let mut surface = StdinSurface { guess_length: 0 };
    while let Some(guess) = state.current_guess().cloned() {
        if state.possible_answers().len() > 1 {
            let top: Vec<String> = state
                .top_guesses(5)?
                .iter()
                .map(|scored| format!("{} ({:.2} bits)", scored.word, scored.entropy))
                .collect();
            println!(
                "{} possible answers remain. Top guesses: {}",
                state.possible_answers().len(),
                top.join(", ")
            );
        }
        surface.provide_guess(&guess)?;
        let results = surface.read_feedback()?;
        match state.step(&results) {
            Ok((_, next)) => state = next,
            Err(WordleError::InconsistentFeedback) => {
                println!("No word in my list fits that feedback. Please check it and try again.");
            }
            Err(err) => return Err(err),
        }
    }

    match state.status() {
        GameStatus::Solved => println!("I did it! It took me {} guesses.", state.attempts().len()),
        _ => println!("I couldn't guess it :("),
    }
    Ok(())
}
