#[cfg(test)]
mod tests {

    use std::error::Error;
    use std::sync::Arc;

    use ron;
    use wordle_autosolver::*;

    fn answers() -> Result<WordBank, WordleError> {
        WordBank::from_iterator([
            "crane", "slate", "trace", "crate", "react", "grain", "brain", "drain", "train",
            "stain", "pound", "round", "sound", "mound", "wound", "bound", "found", "hound",
        ])
    }

    #[test]
    fn letter_result_serde() -> Result<(), Box<dyn Error>> {
        let results = parse_feedback("GY.")?;

        let ser = ron::to_string(&results)?;
        let deser = ron::from_str::<Vec<LetterResult>>(&ser)?;

        assert_eq!(deser, results);
        Ok(())
    }

    #[test]
    fn solver_config_serde() -> Result<(), Box<dyn Error>> {
        let config = SolverConfig {
            hard_mode: true,
            opening_guess: Some(Arc::from("crane")),
        };

        let ser = ron::to_string(&config)?;
        let deser = ron::from_str::<SolverConfig>(&ser)?;

        assert_eq!(deser, config);
        Ok(())
    }

    #[test]
    fn solver_state_serde_resumes_game() -> Result<(), Box<dyn Error>> {
        let answers = answers()?;
        let state = new_game(&answers, &[], true)?;
        let guess = Arc::clone(state.current_guess().ok_or(WordleError::GameOver)?);
        let (_, state) = state.step(&get_result_for_guess("wound", &guess)?.results)?;

        let ser = ron::to_string(&state);
        assert!(ser.is_ok());
        let deser = ron::from_str::<SolverState>(&ser.unwrap());
        assert!(deser.is_ok());
        let deser = deser.unwrap();

        assert_eq!(deser, state);
        assert_eq!(deser.known_constraints(), state.known_constraints());
        assert_eq!(deser.top_guesses(3)?, state.top_guesses(3)?);
        let next_guess = Arc::clone(state.current_guess().ok_or(WordleError::GameOver)?);
        let feedback = get_result_for_guess("wound", &next_guess)?.results;
        assert_eq!(deser.step(&feedback)?, state.step(&feedback)?);
        Ok(())
    }
}
