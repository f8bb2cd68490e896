use crate::models::domain::Difficulty;
use crate::services::evaluation::Mistake;

/// Prompt for a batch of questions at a single difficulty tier. The
/// schema is strict on purpose: the parser discards any batch that does
/// not come back as the requested JSON array.
pub fn question_batch_prompt(
    grade: i32,
    subject: &str,
    count: i32,
    difficulty: Difficulty,
) -> String {
    format!(
        r#"Generate {count} {difficulty} level quiz questions for grade {grade} students in the subject of {subject}.
Respond with ONLY a JSON array, no prose, in this exact format:
[
  {{
    "text": "question here",
    "options": ["A. ...", "B. ...", "C. ...", "D. ..."],
    "correctOption": "A",
    "hint": "short hint here",
    "difficulty": "{difficulty}"
  }}
]"#
    )
}

pub fn hint_prompt(question_text: &str) -> String {
    format!(
        "Provide a short hint for this quiz question: \"{}\". Do not reveal the answer.",
        question_text
    )
}

pub fn suggestions_prompt(mistakes: &[Mistake]) -> String {
    let mistake_list = mistakes
        .iter()
        .enumerate()
        .map(|(i, m)| format!("{}. {}", i + 1, m.text))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "A student answered these quiz questions incorrectly:\n{}\n\nSuggest exactly 2 concrete improvement tips, one per line.",
        mistake_list
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_prompt_names_grade_subject_and_tier() {
        let prompt = question_batch_prompt(5, "Maths", 3, Difficulty::Hard);
        assert!(prompt.contains("3 HARD level quiz questions"));
        assert!(prompt.contains("grade 5"));
        assert!(prompt.contains("Maths"));
        assert!(prompt.contains("correctOption"));
    }

    #[test]
    fn suggestions_prompt_enumerates_mistakes() {
        let mistakes = vec![
            Mistake {
                question_id: "q1".into(),
                text: "What is 2 + 2?".into(),
                correct_option: "B".into(),
                user_response: "A".into(),
            },
            Mistake {
                question_id: "q2".into(),
                text: "What is 3 x 3?".into(),
                correct_option: "C".into(),
                user_response: "D".into(),
            },
        ];

        let prompt = suggestions_prompt(&mistakes);
        assert!(prompt.contains("1. What is 2 + 2?"));
        assert!(prompt.contains("2. What is 3 x 3?"));
    }
}
