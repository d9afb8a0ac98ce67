use crate::dto::quiz_dto::QuizResult;
use crate::models::question::Question;
use crate::models::user::level_for_xp;
use std::collections::{BTreeSet, HashSet};

pub const XP_PER_QUESTION: i32 = 10;

#[derive(Debug, Default)]
pub struct QuizTally {
    // Includes answers to unknown questions.
    total_answers: usize,
    correct: usize,
    xp_earned: i32,
    touched_modules: BTreeSet<i32>,
    failed_modules: BTreeSet<i32>,
    solved_now: HashSet<i32>,
}

impl QuizTally {
    pub fn new(total_answers: usize) -> Self {
        Self {
            total_answers,
            ..Default::default()
        }
    }

    /// Records one answer and returns whether it was correct. XP is only
    /// awarded the first time a question is ever solved.
    pub fn record(&mut self, question: &Question, selected_index: i32, solved_before: bool) -> bool {
        self.touched_modules.insert(question.module_id);

        let is_correct = question.is_correct(selected_index);
        if is_correct {
            self.correct += 1;
            if !solved_before && self.solved_now.insert(question.id) {
                self.xp_earned += XP_PER_QUESTION;
            }
        } else {
            self.failed_modules.insert(question.module_id);
        }
        is_correct
    }

    pub fn score_percent(&self) -> f64 {
        if self.total_answers == 0 {
            return 0.0;
        }
        100.0 * self.correct as f64 / self.total_answers as f64
    }

    pub fn xp_earned(&self) -> i32 {
        self.xp_earned
    }

    pub fn touched_modules(&self) -> impl Iterator<Item = i32> + '_ {
        self.touched_modules.iter().copied()
    }

    pub fn needs_revision(&self, module_id: i32) -> bool {
        self.failed_modules.contains(&module_id)
    }

    pub fn into_result(self, current_level: i32) -> QuizResult {
        QuizResult {
            score_percent: self.score_percent(),
            failed_module_ids: self.failed_modules.into_iter().collect(),
            xp_earned: self.xp_earned,
            current_level,
        }
    }
}

/// Level after reaching `xp`; never lower than `current_level`.
pub fn next_level(current_level: i32, xp: i32) -> i32 {
    current_level.max(level_for_xp(xp))
}
