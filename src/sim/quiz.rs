/// Quiz widget (levels 3 and 5): one answer per question, in order.
///
/// The question index lives in `QuizProgress::answered`. Because the shell
/// records the answer right away, `answered` already points at the next
/// question while the feedback is still open; `showing` pins the question
/// the feedback belongs to until it is acknowledged.
///
/// Options are displayed in a seeded shuffled order. Validation always maps
/// the display position back to the table index, so the verdict does not
/// depend on the order.

use crate::domain::content::{self, Question, QuizOption};
use crate::domain::level::LevelId;
use crate::domain::order;
use crate::sim::feedback::{Feedback, Signal, Verdict};
use crate::sim::game::QuizProgress;

pub struct QuizWidget {
    questions: &'static [Question],
    seed: u64,
    showing: Option<usize>,
    feedback: Option<Feedback>,
}

impl QuizWidget {
    pub fn new(level: LevelId, seed: u64) -> Self {
        QuizWidget {
            questions: content::quiz_for(level),
            seed,
            showing: None,
            feedback: None,
        }
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Index of the question on screen, if any is left.
    pub fn current(&self, progress: &QuizProgress) -> Option<usize> {
        let idx = self.showing.unwrap_or(progress.answered);
        (idx < self.questions.len()).then_some(idx)
    }

    pub fn question(&self, progress: &QuizProgress) -> Option<&'static Question> {
        self.current(progress).map(|i| &self.questions[i])
    }

    /// Display order of question `q`'s options (table indices).
    pub fn order(&self, q: usize) -> Vec<usize> {
        let len = self.questions.get(q).map_or(0, |qq| qq.options.len());
        order::shuffled(len, self.seed.wrapping_add(q as u64))
    }

    /// Options of the current question, in display order.
    pub fn options(&self, progress: &QuizProgress) -> Vec<&'static QuizOption> {
        match self.current(progress) {
            Some(q) => {
                let opts = self.questions[q].options;
                self.order(q).into_iter().map(|i| &opts[i]).collect()
            }
            None => Vec::new(),
        }
    }

    /// Answer the current question with the option shown at `pos`.
    pub fn answer(&mut self, pos: usize, progress: &QuizProgress) -> Option<Verdict> {
        if self.feedback.is_some() {
            return None;
        }
        let q = self.current(progress)?;
        let question = &self.questions[q];
        let idx = *self.order(q).get(pos)?;

        self.showing = Some(q);
        if question.options[idx].correct {
            self.feedback = Some(Feedback::hit(content::QUIZ_HIT_TITLE, question.on_correct));
            Some(Verdict::Correct)
        } else {
            self.feedback = Some(Feedback::miss(content::QUIZ_MISS_TITLE, question.on_wrong));
            Some(Verdict::Wrong)
        }
    }

    pub fn acknowledge(&mut self, progress: &QuizProgress) -> Signal {
        if self.feedback.take().is_none() {
            return Signal::Idle;
        }
        self.showing = None;
        if progress.answered >= self.questions.len() {
            Signal::Complete
        } else {
            Signal::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn correct_pos(w: &QuizWidget, p: &QuizProgress) -> usize {
        w.options(p).iter().position(|o| o.correct).unwrap()
    }

    fn wrong_pos(w: &QuizWidget, p: &QuizProgress) -> usize {
        w.options(p).iter().position(|o| !o.correct).unwrap()
    }

    #[test]
    fn completion_signalled_exactly_once() {
        let mut w = QuizWidget::new(LevelId::FramingQuiz, 9);
        let mut p = QuizProgress::default();
        let mut signals = Vec::new();
        for i in 0..w.len() {
            let pos = if i == 1 { wrong_pos(&w, &p) } else { correct_pos(&w, &p) };
            let v = w.answer(pos, &p).unwrap();
            p.answered += 1;
            if v == Verdict::Correct {
                p.correct += 1;
            }
            signals.push(w.acknowledge(&p));
        }
        assert_eq!(signals, vec![Signal::Idle, Signal::Idle, Signal::Complete]);
        assert_eq!(p.correct, 2);

        // Nothing left to answer or acknowledge
        assert_eq!(w.answer(0, &p), None);
        assert_eq!(w.acknowledge(&p), Signal::Idle);
        assert!(w.question(&p).is_none());
    }

    #[test]
    fn feedback_stays_on_answered_question() {
        let mut w = QuizWidget::new(LevelId::DataLab, 1);
        let mut p = QuizProgress::default();
        let pos = correct_pos(&w, &p);
        w.answer(pos, &p);
        p.answered = 1;
        assert_eq!(w.current(&p), Some(0));
        assert_eq!(w.feedback().unwrap().text, content::DATA_QUESTIONS[0].on_correct);
        w.acknowledge(&p);
        assert_eq!(w.current(&p), Some(1));
    }

    #[test]
    fn second_answer_while_feedback_open_is_ignored() {
        let mut w = QuizWidget::new(LevelId::DataLab, 1);
        let p = QuizProgress::default();
        assert!(w.answer(0, &p).is_some());
        assert_eq!(w.answer(1, &p), None);
    }

    #[test]
    fn out_of_range_position_is_ignored() {
        let mut w = QuizWidget::new(LevelId::DataLab, 1);
        assert_eq!(w.answer(7, &QuizProgress::default()), None);
        assert!(w.feedback().is_none());
    }

    #[test]
    fn verdict_independent_of_display_order() {
        let p = QuizProgress::default();
        for seed in 0..16 {
            let mut w = QuizWidget::new(LevelId::FramingQuiz, seed);
            let pos = correct_pos(&w, &p);
            assert_eq!(w.answer(pos, &p), Some(Verdict::Correct), "seed {seed}");
            assert_eq!(w.feedback().unwrap().text, content::FRAMING_QUESTIONS[0].on_correct);
        }
    }
}
