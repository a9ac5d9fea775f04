pub mod session;
pub mod source;

use serde::Deserialize;

/// A quiz as served by the quiz endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Quiz {
    pub title: String,
    #[serde(default)]
    pub topic: String,
    pub questions: Vec<Question>,
    /// Time limit in minutes
    pub duration: u32,
    pub max_mistake_count: u32,
    pub correct_answer_marks: i64,
    pub negative_marks: i64,
    #[serde(default)]
    pub shuffle: bool,
}

impl Quiz {
    pub fn time_limit_secs(&self) -> u32 {
        self.duration.saturating_mul(60)
    }

    /// Best attainable score
    pub fn max_score(&self) -> i64 {
        self.questions.len() as i64 * self.correct_answer_marks
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Question {
    /// Prompt text
    pub description: String,
    pub options: Vec<QuizOption>,
    /// Markdown explanation shown after answering
    #[serde(default)]
    pub detailed_solution: Option<String>,
}

impl Question {
    /// Index of the first correct option
    pub fn correct_option(&self) -> Option<usize> {
        self.options.iter().position(|o| o.is_correct)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuizOption {
    pub id: u64,
    pub description: String,
    pub is_correct: bool,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// `count` questions with three options each; the correct one is index 1
    pub fn quiz(count: usize, correct: i64, penalty: i64, lives: u32, minutes: u32) -> Quiz {
        Quiz {
            title: "Genetics and Evolution".to_string(),
            topic: "Molecular Basis of Inheritance".to_string(),
            questions: (0..count).map(question).collect(),
            duration: minutes,
            max_mistake_count: lives,
            correct_answer_marks: correct,
            negative_marks: penalty,
            shuffle: false,
        }
    }

    pub fn question(n: usize) -> Question {
        Question {
            description: format!("Question {}", n),
            options: (0..3)
                .map(|i| QuizOption {
                    id: (n * 10 + i) as u64,
                    description: format!("Option {}", i),
                    is_correct: i == 1,
                })
                .collect(),
            detailed_solution: Some(format!("Solution {}", n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_endpoint_shape_and_ignores_extra_fields() {
        let json = r#"{
            "id": 60,
            "title": "Genetics",
            "topic": "Inheritance",
            "duration": 15,
            "max_mistake_count": 9,
            "correct_answer_marks": "4",
            "negative_marks": "1",
            "shuffle": true,
            "questions": [{
                "description": "Which base pairs with adenine in DNA?",
                "detailed_solution": "**Thymine** pairs with adenine.",
                "options": [
                    {"id": 1, "description": "Thymine", "is_correct": true},
                    {"id": 2, "description": "Uracil", "is_correct": false}
                ]
            }]
        }"#;
        // marks given as strings are not accepted
        assert!(serde_json::from_str::<Quiz>(json).is_err());

        let json = json
            .replace(r#""4""#, "4")
            .replace(r#""1""#, "1");
        let quiz: Quiz = serde_json::from_str(&json).unwrap();
        assert_eq!(quiz.correct_answer_marks, 4);
        assert_eq!(quiz.time_limit_secs(), 900);
        assert_eq!(quiz.max_score(), 4);
        assert_eq!(quiz.questions[0].correct_option(), Some(0));
        assert!(quiz.shuffle);
    }

    #[test]
    fn solution_and_topic_are_optional() {
        let json = r#"{
            "title": "t", "duration": 1, "max_mistake_count": 1,
            "correct_answer_marks": 1, "negative_marks": 0,
            "questions": [{"description": "q", "options": []}]
        }"#;
        let quiz: Quiz = serde_json::from_str(json).unwrap();
        assert_eq!(quiz.topic, "");
        assert!(!quiz.shuffle);
        assert_eq!(quiz.questions[0].detailed_solution, None);
        assert_eq!(quiz.questions[0].correct_option(), None);
    }
}
