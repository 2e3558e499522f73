/// Level 4 widget: place story blocks onto the hero's-journey timeline.
///
/// Two-step interaction: `select_block(b)` then `place(slot)`.
///
/// ┌───────────────────────────────┬─────────┬────────────────────────┐
/// │ Placement                      │ Verdict │ Effect                  │
/// ├───────────────────────────────┼─────────┼────────────────────────┤
/// │ block belongs to this slot     │ Correct │ slot filled, block used │
/// │ distractor block               │ Wrong   │ "boring" feedback       │
/// │ story block, wrong slot        │ Wrong   │ "wrong order" feedback  │
/// └───────────────────────────────┴─────────┴────────────────────────┘
///
/// Wrong placements change nothing but the feedback. The selection is
/// cleared after every validation either way.

use crate::domain::content::{self, STORY_BLOCKS, TIMELINE_SLOTS};
use crate::sim::feedback::{Feedback, Signal, Verdict};
use crate::sim::game::TimelineProgress;

pub struct TimelineWidget {
    selected: Option<usize>,
    used: Vec<bool>,
    /// Block index per slot, once filled.
    slots: Vec<Option<usize>>,
    feedback: Option<Feedback>,
}

impl TimelineWidget {
    pub fn new() -> Self {
        TimelineWidget {
            selected: None,
            used: vec![false; STORY_BLOCKS.len()],
            slots: vec![None; TIMELINE_SLOTS.len()],
            feedback: None,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn is_used(&self, block: usize) -> bool {
        self.used.get(block).copied().unwrap_or(true)
    }

    pub fn slot(&self, slot: usize) -> Option<usize> {
        self.slots.get(slot).copied().flatten()
    }

    pub fn select_block(&mut self, block: usize) -> bool {
        if self.feedback.is_some() || self.is_used(block) {
            return false;
        }
        self.selected = Some(block);
        true
    }

    pub fn cancel(&mut self) {
        self.selected = None;
    }

    pub fn place(&mut self, slot: usize) -> Option<Verdict> {
        if self.feedback.is_some() || slot >= self.slots.len() || self.slots[slot].is_some() {
            return None;
        }
        let block = self.selected.take()?;
        let b = &STORY_BLOCKS[block];

        if !b.correct {
            self.feedback = Some(Feedback::miss(content::STORY_DULL_TITLE, content::STORY_DULL_TEXT));
            return Some(Verdict::Wrong);
        }
        if TIMELINE_SLOTS[slot].block != b.id {
            self.feedback = Some(Feedback::miss(content::STORY_ORDER_TITLE, content::STORY_ORDER_TEXT));
            return Some(Verdict::Wrong);
        }

        self.slots[slot] = Some(block);
        self.used[block] = true;
        self.feedback = Some(Feedback::hit(content::STORY_HIT_TITLE, content::STORY_HIT_TEXT));
        Some(Verdict::Correct)
    }

    pub fn acknowledge(&mut self, progress: &TimelineProgress) -> Signal {
        if self.feedback.take().is_none() {
            return Signal::Idle;
        }
        if progress.placed >= TIMELINE_SLOTS.len() {
            Signal::Complete
        } else {
            Signal::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(id: &str) -> usize {
        STORY_BLOCKS.iter().position(|b| b.id == id).unwrap()
    }

    #[test]
    fn correct_placement_fills_slot() {
        let mut w = TimelineWidget::new();
        assert!(w.select_block(block("world")));
        assert_eq!(w.place(0), Some(Verdict::Correct));
        assert_eq!(w.slot(0), Some(block("world")));
        assert!(w.is_used(block("world")));
        assert_eq!(w.selected(), None);
        assert!(w.feedback().unwrap().success);
    }

    #[test]
    fn wrong_slot_changes_nothing() {
        let mut w = TimelineWidget::new();
        w.select_block(block("mentor"));
        assert_eq!(w.place(0), Some(Verdict::Wrong));
        assert_eq!(w.feedback().unwrap().title, content::STORY_ORDER_TITLE);
        assert_eq!(w.slot(0), None);
        assert!(!w.is_used(block("mentor")));
        assert_eq!(w.selected(), None);

        assert_eq!(w.acknowledge(&TimelineProgress::default()), Signal::Idle);
        assert!(w.select_block(block("mentor")));
        assert_eq!(w.selected(), Some(block("mentor")));
    }

    #[test]
    fn distractor_gets_its_own_text() {
        let mut w = TimelineWidget::new();
        w.select_block(block("api-spec"));
        assert_eq!(w.place(2), Some(Verdict::Wrong));
        assert_eq!(w.feedback().unwrap().title, content::STORY_DULL_TITLE);
        assert!(!w.is_used(block("api-spec")));
    }

    #[test]
    fn used_block_and_filled_slot_are_noops() {
        let mut w = TimelineWidget::new();
        w.select_block(block("world"));
        w.place(0);
        w.acknowledge(&TimelineProgress { placed: 1 });

        assert!(!w.select_block(block("world")));
        assert!(w.select_block(block("call")));
        assert_eq!(w.place(0), None);
        assert_eq!(w.selected(), Some(block("call")));
    }

    #[test]
    fn place_without_selection_is_noop() {
        let mut w = TimelineWidget::new();
        assert_eq!(w.place(1), None);
        assert!(w.feedback().is_none());
    }

    #[test]
    fn completes_after_last_acknowledge() {
        let mut w = TimelineWidget::new();
        let mut p = TimelineProgress::default();
        let mut last = Signal::Idle;
        for (i, slot) in TIMELINE_SLOTS.iter().enumerate().rev() {
            w.select_block(block(slot.block));
            assert_eq!(w.place(i), Some(Verdict::Correct));
            p.placed += 1;
            last = w.acknowledge(&p);
        }
        assert_eq!(last, Signal::Complete);
        assert_eq!(p.placed, 5);
    }
}
