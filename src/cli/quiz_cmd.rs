//! Quiz command: build a multiple-choice question for a card.

use rand::Rng;
use serde::Serialize;

use crate::quiz::build_options;
use crate::storage::StudyStore;

/// Options for the quiz command.
#[derive(Debug, Clone, Default)]
pub struct QuizOptions {
    /// Number of wrong answers; the configured count when absent.
    pub distractor_count: Option<usize>,
    /// Quiz back-to-front instead of front-to-back.
    pub reversed: bool,
}

/// Output format for the quiz command.
#[derive(Debug, Clone, Serialize)]
pub struct QuizOutput {
    /// Whether the question was built.
    pub success: bool,
    /// The card being quizzed.
    pub card_id: String,
    /// The question text (card front, or back when reversed).
    pub question: String,
    /// Shuffled answer options.
    pub options: Vec<String>,
    /// The correct answer.
    pub answer: String,
    /// Error message if the question could not be built.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QuizOutput {
    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            card_id: String::new(),
            question: String::new(),
            options: Vec::new(),
            answer: String::new(),
            error: Some(error.into()),
        }
    }

    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        match &self.error {
            Some(error) => format!("error: {}", error),
            None => {
                let mut lines = vec![self.question.clone()];
                for (i, option) in self.options.iter().enumerate() {
                    lines.push(format!("  {}) {}", i + 1, option));
                }
                lines.join("\n")
            }
        }
    }
}

/// The quiz command implementation.
pub struct QuizCommand<S: StudyStore> {
    store: S,
    default_distractor_count: usize,
}

impl<S: StudyStore> QuizCommand<S> {
    /// Create a new quiz command with the configured distractor count.
    pub fn new(store: S, default_distractor_count: usize) -> Self {
        Self {
            store,
            default_distractor_count,
        }
    }

    /// Build a question for `card_id`, drawing distractors from its deck.
    pub fn run<R: Rng + ?Sized>(
        &self,
        card_id: &str,
        options: &QuizOptions,
        rng: &mut R,
    ) -> QuizOutput {
        let card = match self.store.get_card(card_id) {
            Ok(Some(card)) => card,
            Ok(None) => return QuizOutput::failure(format!("card not found: {}", card_id)),
            Err(err) => return QuizOutput::failure(err.to_string()),
        };

        let siblings = match self.store.list_deck_cards(&card.deck_id) {
            Ok(cards) => cards,
            Err(err) => return QuizOutput::failure(err.to_string()),
        };

        let (question, answer) = if options.reversed {
            (card.back.clone(), card.front.clone())
        } else {
            (card.front.clone(), card.back.clone())
        };

        let pool: Vec<String> = siblings
            .iter()
            .filter(|c| c.id != card.id)
            .map(|c| {
                if options.reversed {
                    c.front.clone()
                } else {
                    c.back.clone()
                }
            })
            .collect();

        let count = options
            .distractor_count
            .unwrap_or(self.default_distractor_count);
        let choices = build_options(&answer, &pool, count, rng);

        QuizOutput {
            success: true,
            card_id: card.id,
            question,
            options: choices,
            answer,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::Card;
    use crate::quiz::DEFAULT_DISTRACTOR_COUNT;
    use crate::storage::MemoryStudyStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded_store() -> MemoryStudyStore {
        let store = MemoryStudyStore::new();
        for (id, front, back) in [
            ("card-1", "2 + 2", "4"),
            ("card-2", "3 + 3", "6"),
            ("card-3", "4 + 4", "8"),
            ("card-4", "5 + 5", "10"),
        ] {
            store
                .put_card(&Card::new(id, "alice", "deck-1", front, back))
                .unwrap();
        }
        store
    }

    fn command(store: &MemoryStudyStore) -> QuizCommand<&MemoryStudyStore> {
        QuizCommand::new(store, DEFAULT_DISTRACTOR_COUNT)
    }

    #[test]
    fn test_quiz_builds_question() {
        let store = seeded_store();
        let mut rng = StdRng::seed_from_u64(7);
        let output = command(&store).run("card-1", &QuizOptions::default(), &mut rng);

        assert!(output.success, "{:?}", output.error);
        assert_eq!(output.question, "2 + 2");
        assert_eq!(output.answer, "4");
        assert_eq!(output.options.len(), 4);
        assert!(output.options.contains(&"4".to_string()));
        assert!(output
            .options
            .iter()
            .all(|o| ["4", "6", "8", "10"].contains(&o.as_str())));
    }

    #[test]
    fn test_quiz_reversed_flips_question_and_pool() {
        let store = seeded_store();
        let mut rng = StdRng::seed_from_u64(7);
        let options = QuizOptions {
            reversed: true,
            ..QuizOptions::default()
        };
        let output = command(&store).run("card-1", &options, &mut rng);

        assert_eq!(output.question, "4");
        assert_eq!(output.answer, "2 + 2");
        assert!(output
            .options
            .iter()
            .all(|o| ["2 + 2", "3 + 3", "4 + 4", "5 + 5"].contains(&o.as_str())));
    }

    #[test]
    fn test_quiz_respects_count_override() {
        let store = seeded_store();
        let mut rng = StdRng::seed_from_u64(7);
        let options = QuizOptions {
            distractor_count: Some(1),
            ..QuizOptions::default()
        };
        let output = command(&store).run("card-1", &options, &mut rng);
        assert_eq!(output.options.len(), 2);
    }

    #[test]
    fn test_quiz_missing_card_fails() {
        let store = seeded_store();
        let mut rng = StdRng::seed_from_u64(7);
        let output = command(&store).run("card-9", &QuizOptions::default(), &mut rng);
        assert!(!output.success);
        assert!(output.error.unwrap().contains("card not found"));
    }

    #[test]
    fn test_format_text_numbers_options() {
        let store = seeded_store();
        let mut rng = StdRng::seed_from_u64(7);
        let output = command(&store).run("card-1", &QuizOptions::default(), &mut rng);
        let text = output.format_text();
        assert!(text.starts_with("2 + 2"));
        assert!(text.contains("  1) "));
        assert!(text.contains("  4) "));
    }
}
