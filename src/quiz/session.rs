use super::{Question, Quiz};
use crate::config::Palette;
use crate::error::{QuizLoadError, SessionError};
use crate::field::ColorSink;
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load quiz. Please try again later.";

/// Percentage at or above which the top badge is awarded
pub const TOP_TIER_PERCENT: i64 = 90;

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Loading,
    Error(String),
    InProgress,
    Completed(Summary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionReason {
    OutOfLives,
    OutOfTime,
    Finished,
}

/// Final result of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub score: i64,
    pub percentage: i64,
    pub lives_left: u32,
    pub top_tier: bool,
    pub reason: CompletionReason,
}

/// The answer recorded for the current question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub chosen: usize,
    /// Correct option, so both can be highlighted
    pub correct: Option<usize>,
}

impl Selection {
    pub fn is_correct(&self) -> bool {
        self.correct == Some(self.chosen)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
    /// Incorrect and the last life is gone; the session is completed
    OutOfLives,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextOutcome {
    /// Moved on to the question at this index
    Advanced(usize),
    Completed,
}

type CompletionCallback = Box<dyn FnOnce(&Summary)>;

/// `Loading -> Error` or `Loading -> InProgress -> Completed`. Every
/// transition sends a color command through the [`ColorSink`]; completion
/// runs the callback exactly once.
pub struct Session<S: ColorSink> {
    phase: Phase,
    quiz: Option<Quiz>,
    questions: Vec<Question>,
    index: usize,
    score: i64,
    streak: u32,
    lives: u32,
    time_left: u32,
    selection: Option<Selection>,
    solution_visible: bool,
    colors: S,
    palette: Palette,
    on_complete: Option<CompletionCallback>,
}

impl<S: ColorSink> Session<S> {
    /// New session waiting for quiz data
    pub fn new(colors: S, palette: Palette, on_complete: impl FnOnce(&Summary) + 'static) -> Self {
        let session = Session {
            phase: Phase::Loading,
            quiz: None,
            questions: Vec::new(),
            index: 0,
            score: 0,
            streak: 0,
            lives: 0,
            time_left: 0,
            selection: None,
            solution_visible: false,
            colors,
            palette,
            on_complete: Some(Box::new(on_complete)),
        };
        session.neutral();
        session
    }

    /// Delivers the outcome of the quiz request
    pub fn load<R: Rng + ?Sized>(
        &mut self,
        result: Result<Quiz, QuizLoadError>,
        rng: &mut R,
    ) -> Result<(), SessionError> {
        if self.phase != Phase::Loading {
            return Err(SessionError::AlreadyLoaded);
        }
        let quiz = match result {
            Ok(quiz) => quiz,
            Err(e) => {
                warn!("Quiz retrieval failed: {}", e);
                self.phase = Phase::Error(LOAD_FAILED_MESSAGE.to_string());
                return Ok(());
            }
        };

        let mut questions = quiz.questions.clone();
        if quiz.shuffle {
            questions.shuffle(rng);
        }
        self.questions = questions;
        self.lives = quiz.max_mistake_count;
        self.time_left = quiz.time_limit_secs();
        self.index = 0;
        self.score = 0;
        self.streak = 0;
        self.phase = Phase::InProgress;
        info!(
            "Quiz started: {} questions, {} lives, {}s",
            self.questions.len(),
            self.lives,
            self.time_left
        );
        self.quiz = Some(quiz);

        if self.questions.is_empty() {
            self.complete(CompletionReason::Finished);
        }
        Ok(())
    }

    /// One second of the countdown; returns the remaining time
    pub fn tick(&mut self) -> Result<u32, SessionError> {
        self.ensure_in_progress()?;
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.complete(CompletionReason::OutOfTime);
        }
        Ok(self.time_left)
    }

    /// Answers the current question with the option at `index`
    pub fn answer(&mut self, index: usize) -> Result<AnswerOutcome, SessionError> {
        self.ensure_in_progress()?;
        if self.selection.is_some() {
            return Err(SessionError::AlreadyAnswered);
        }
        let (chosen_correct, correct) = {
            let question = &self.questions[self.index];
            let count = question.options.len();
            let option = question
                .options
                .get(index)
                .ok_or(SessionError::NoSuchOption { index, count })?;
            (option.is_correct, question.correct_option())
        };
        let (reward, penalty) = self
            .quiz
            .as_ref()
            .map(|q| (q.correct_answer_marks, q.negative_marks))
            .unwrap_or_default();

        self.solution_visible = true;
        if chosen_correct {
            self.score += reward;
            self.streak += 1;
            self.selection = Some(Selection {
                chosen: index,
                correct: Some(index),
            });
            debug!("Correct answer, streak {}", self.streak);
            self.colors
                .change_color(self.palette.success, None, self.palette.duration);
            return Ok(AnswerOutcome::Correct);
        }

        self.score -= penalty;
        self.streak = 0;
        self.lives = self.lives.saturating_sub(1);
        self.selection = Some(Selection {
            chosen: index,
            correct,
        });
        debug!("Incorrect answer, {} lives left", self.lives);
        self.colors
            .change_color(self.palette.failure, None, self.palette.duration);

        if self.lives == 0 {
            self.complete(CompletionReason::OutOfLives);
            return Ok(AnswerOutcome::OutOfLives);
        }
        Ok(AnswerOutcome::Incorrect)
    }

    /// Moves past an answered question
    pub fn next(&mut self) -> Result<NextOutcome, SessionError> {
        self.ensure_in_progress()?;
        if self.selection.is_none() {
            return Err(SessionError::NotAnswered);
        }
        if self.index + 1 >= self.questions.len() {
            self.complete(CompletionReason::Finished);
            return Ok(NextOutcome::Completed);
        }
        self.index += 1;
        self.selection = None;
        self.solution_visible = false;
        self.neutral();
        Ok(NextOutcome::Advanced(self.index))
    }

    fn complete(&mut self, reason: CompletionReason) {
        if self.phase != Phase::InProgress {
            return;
        }
        let max = self.quiz.as_ref().map(Quiz::max_score).unwrap_or(0);
        let percentage = percentage(self.score, max);
        let summary = Summary {
            score: self.score,
            percentage,
            lives_left: self.lives,
            top_tier: percentage >= TOP_TIER_PERCENT,
            reason,
        };
        info!(
            "Quiz completed ({:?}): {} points, {}%",
            reason, summary.score, summary.percentage
        );
        self.phase = Phase::Completed(summary);
        self.neutral();
        if let Some(callback) = self.on_complete.take() {
            callback(&summary);
        }
    }

    fn ensure_in_progress(&self) -> Result<(), SessionError> {
        match self.phase {
            Phase::InProgress => Ok(()),
            _ => Err(SessionError::NotInProgress),
        }
    }

    fn neutral(&self) {
        self.colors
            .change_color(self.palette.neutral, None, self.palette.duration);
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::InProgress
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.quiz.as_ref()
    }

    /// Questions in presentation order
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn solution_visible(&self) -> bool {
        self.solution_visible
    }

    /// Whether "next" is offered
    pub fn can_advance(&self) -> bool {
        self.is_running() && self.selection.is_some()
    }
}

/// Score as a percentage of `max`, rounded half up; 0 when nothing is attainable
pub fn percentage(score: i64, max: i64) -> i64 {
    if max <= 0 {
        return 0;
    }
    (200 * score + max).div_euclid(2 * max)
}
