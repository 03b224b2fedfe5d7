//! The quiz collaborator seam and a question-bank implementation of it.
//!
//! The session only talks to the [`Quiz`] trait: it asks for a question when
//! the avatar interacts with a gate or the boss, then polls once per frame
//! until a result arrives. [`BankQuiz`] is the implementation the front end
//! uses; tests drive the session with scripted fakes instead.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

use crate::entities::GateId;
use crate::error::BankError;
use crate::gate::GateKind;

/// What the question is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Challenge {
    Gate { id: GateId, kind: GateKind },
    Boss,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizResult {
    /// Nothing answered yet.
    None,
    Correct,
    Incorrect,
}

pub trait Quiz {
    /// Begin a question. Returns `false` if one is already in flight or
    /// nothing can be asked.
    fn start_question(&mut self, challenge: Challenge, level: u32) -> bool;

    /// Result of the question in flight, reported exactly once.
    fn poll_result(&mut self) -> QuizResult;
}

// ── Statistics ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuizStats {
    pub correct: u32,
    pub incorrect: u32,
    pub streak: u32,
    pub best_streak: u32,
}

impl QuizStats {
    pub fn record(&mut self, correct: bool) {
        if correct {
            self.correct += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.incorrect += 1;
            self.streak = 0;
        }
    }

    pub fn total(&self) -> u32 {
        self.correct + self.incorrect
    }

    /// Percentage of correct answers, 0 before the first answer.
    pub fn accuracy(&self) -> f32 {
        match self.total() {
            0 => 0.0,
            total => self.correct as f32 * 100.0 / total as f32,
        }
    }
}

// ── Question bank ─────────────────────────────────────────────────────────────

pub const MAX_TIER: u32 = 5;

/// Every question offers exactly this many answers.
pub const OPTIONS_PER_QUESTION: usize = 4;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Question {
    pub tier: u32,
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options` before any shuffling.
    pub answer: usize,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct QuestionBank {
    #[serde(rename = "question", default)]
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        let bank = Self { questions };
        bank.validate()?;
        Ok(bank)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, BankError> {
        let bank: QuestionBank =
            toml::from_str(text).map_err(|e| BankError::Parse(e.to_string()))?;
        bank.validate()?;
        Ok(bank)
    }

    /// The grammar bank shipped with the game.
    pub fn builtin() -> Result<Self, BankError> {
        Self::from_toml_str(include_str!("../assets/questions.toml"))
    }

    fn validate(&self) -> Result<(), BankError> {
        if self.questions.is_empty() {
            return Err(BankError::Empty);
        }
        for (index, question) in self.questions.iter().enumerate() {
            if question.options.len() != OPTIONS_PER_QUESTION {
                return Err(BankError::WrongOptionCount {
                    index,
                    options: question.options.len(),
                    expected: OPTIONS_PER_QUESTION,
                });
            }
            if question.answer >= question.options.len() {
                return Err(BankError::AnswerOutOfRange {
                    index,
                    answer: question.answer,
                    options: question.options.len(),
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Tiers asked on `level`. Special-key gates past level 2 ask from one
    /// level higher.
    pub fn tiers_for(level: u32, challenge: Challenge) -> (u32, u32) {
        let level = match challenge {
            Challenge::Gate {
                kind: GateKind::SpecialKey,
                ..
            } if level > 2 => level + 1,
            Challenge::Boss => level + 1,
            _ => level,
        };
        let high = level.clamp(1, MAX_TIER);
        let low = high.saturating_sub(1).max(1);
        (low, high)
    }

    /// Candidates for a challenge, falling back to the whole bank if no
    /// question sits in the wanted tiers.
    pub fn candidates(&self, level: u32, challenge: Challenge) -> Vec<&Question> {
        let (low, high) = Self::tiers_for(level, challenge);
        let tiered: Vec<&Question> = self
            .questions
            .iter()
            .filter(|q| q.tier >= low && q.tier <= high)
            .collect();
        if tiered.is_empty() {
            self.questions.iter().collect()
        } else {
            tiered
        }
    }
}

// ── Bank-backed quiz ──────────────────────────────────────────────────────────

/// A question on screen, options already shuffled.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveQuestion {
    pub challenge: Challenge,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct: usize,
    pub explanation: String,
}

/// Outcome of the last answered question, kept for the overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct Feedback {
    pub correct: bool,
    pub explanation: String,
}

pub struct BankQuiz<R: Rng> {
    bank: QuestionBank,
    rng: R,
    active: Option<ActiveQuestion>,
    pending: Option<bool>,
    feedback: Option<Feedback>,
}

impl<R: Rng> BankQuiz<R> {
    pub fn new(bank: QuestionBank, rng: R) -> Self {
        Self {
            bank,
            rng,
            active: None,
            pending: None,
            feedback: None,
        }
    }

    pub fn active_question(&self) -> Option<&ActiveQuestion> {
        self.active.as_ref()
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn clear_feedback(&mut self) {
        self.feedback = None;
    }

    /// Choose an option of the active question. Returns whether it was
    /// right, or `None` when no question is on screen or the index is not
    /// one of the options.
    pub fn answer(&mut self, index: usize) -> Option<bool> {
        let question = self.active.as_ref()?;
        if index >= question.options.len() {
            return None;
        }
        let correct = index == question.correct;
        self.feedback = Some(Feedback {
            correct,
            explanation: question.explanation.clone(),
        });
        self.active = None;
        self.pending = Some(correct);
        debug!("answered option {index}: correct={correct}");
        Some(correct)
    }
}

impl<R: Rng> Quiz for BankQuiz<R> {
    fn start_question(&mut self, challenge: Challenge, level: u32) -> bool {
        if self.active.is_some() || self.pending.is_some() {
            return false;
        }
        let Some(question) = self
            .bank
            .candidates(level, challenge)
            .choose(&mut self.rng)
            .map(|q| (*q).clone())
        else {
            return false;
        };

        let mut order: Vec<usize> = (0..question.options.len()).collect();
        order.shuffle(&mut self.rng);
        let correct = order
            .iter()
            .position(|&i| i == question.answer)
            .unwrap_or(question.answer);
        let options = order.iter().map(|&i| question.options[i].clone()).collect();

        self.feedback = None;
        self.active = Some(ActiveQuestion {
            challenge,
            prompt: question.prompt,
            options,
            correct,
            explanation: question.explanation,
        });
        true
    }

    fn poll_result(&mut self) -> QuizResult {
        match self.pending.take() {
            Some(true) => QuizResult::Correct,
            Some(false) => QuizResult::Incorrect,
            None => QuizResult::None,
        }
    }
}
