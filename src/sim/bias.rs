/// Level 1 widget: label the biased passages of the data-protection e-mail.
///
/// Two-step interaction:
///   1. `select_zone(z)`   pick a passage
///   2. `choose_bias(l)`   attach a label to it
///
/// A correctly labelled zone is resolved for good, and so is the label that
/// resolved it. Neither can be picked again, so the found-counter can never
/// be bumped twice for the same zone.

use crate::domain::content::{self, BIAS_LABELS, BIAS_ZONES};
use crate::sim::feedback::{Feedback, Signal, Verdict};
use crate::sim::game::BiasProgress;

pub struct BiasWidget {
    selected: Option<usize>,
    resolved: Vec<bool>,
    used_labels: Vec<bool>,
    feedback: Option<Feedback>,
}

impl BiasWidget {
    pub fn new() -> Self {
        BiasWidget {
            selected: None,
            resolved: vec![false; BIAS_ZONES.len()],
            used_labels: vec![false; BIAS_LABELS.len()],
            feedback: None,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn is_resolved(&self, zone: usize) -> bool {
        self.resolved.get(zone).copied().unwrap_or(true)
    }

    pub fn is_label_used(&self, label: usize) -> bool {
        self.used_labels.get(label).copied().unwrap_or(true)
    }

    /// Returns false when nothing changed.
    pub fn select_zone(&mut self, zone: usize) -> bool {
        if self.feedback.is_some() || self.is_resolved(zone) {
            return false;
        }
        self.selected = Some(zone);
        true
    }

    pub fn cancel(&mut self) {
        self.selected = None;
    }

    /// Validate `label` against the selected zone. `None` when there is
    /// nothing to validate.
    pub fn choose_bias(&mut self, label: usize) -> Option<Verdict> {
        if self.feedback.is_some() || self.is_label_used(label) {
            return None;
        }
        let zone = self.selected.take()?;
        let expected = BIAS_ZONES[zone].bias;

        if BIAS_LABELS[label].id == expected {
            self.resolved[zone] = true;
            self.used_labels[label] = true;
            self.feedback = Some(match content::bias_by_id(expected) {
                Some(b) => Feedback::hit(b.name, b.explanation),
                None => Feedback::hit(BIAS_LABELS[label].label, ""),
            });
            Some(Verdict::Correct)
        } else {
            self.feedback = Some(Feedback::miss(content::BIAS_MISS_TITLE, content::BIAS_MISS_TEXT));
            Some(Verdict::Wrong)
        }
    }

    pub fn acknowledge(&mut self, progress: &BiasProgress) -> Signal {
        if self.feedback.take().is_none() {
            return Signal::Idle;
        }
        if progress.found >= BIAS_ZONES.len() {
            Signal::Complete
        } else {
            Signal::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label_for(zone: usize) -> usize {
        BIAS_LABELS.iter().position(|l| l.id == BIAS_ZONES[zone].bias).unwrap()
    }

    /// Drive the widget through `zones` in order, counting correct verdicts
    /// the way the shell would.
    fn solve(order: &[usize]) -> (BiasWidget, BiasProgress, Vec<Signal>) {
        let mut w = BiasWidget::new();
        let mut p = BiasProgress::default();
        let mut signals = Vec::new();
        for &z in order {
            assert!(w.select_zone(z));
            assert_eq!(w.choose_bias(label_for(z)), Some(Verdict::Correct));
            p.found += 1;
            signals.push(w.acknowledge(&p));
        }
        (w, p, signals)
    }

    #[test]
    fn order_of_zones_does_not_matter() {
        for order in [[0, 1, 2], [2, 0, 1], [1, 2, 0]] {
            let (w, p, signals) = solve(&order);
            assert_eq!(p.found, 3);
            assert!((0..3).all(|z| w.is_resolved(z)));
            assert_eq!(signals, vec![Signal::Idle, Signal::Idle, Signal::Complete]);
        }
    }

    #[test]
    fn resolved_zone_cannot_be_selected_again() {
        let (mut w, _, _) = solve(&[1]);
        assert!(!w.select_zone(1));
        assert_eq!(w.choose_bias(label_for(1)), None);
    }

    #[test]
    fn used_label_is_disabled() {
        let (mut w, _, _) = solve(&[0]);
        assert!(w.select_zone(2));
        assert_eq!(w.choose_bias(label_for(0)), None);
        assert_eq!(w.selected(), Some(2));
    }

    #[test]
    fn wrong_label_leaves_zone_open() {
        let mut w = BiasWidget::new();
        w.select_zone(0);
        let decoy = BIAS_LABELS.iter().position(|l| l.id == "anchoring").unwrap();
        assert_eq!(w.choose_bias(decoy), Some(Verdict::Wrong));
        assert!(!w.feedback().unwrap().success);
        assert!(!w.is_resolved(0));
        assert!(!w.is_label_used(decoy));
        assert_eq!(w.selected(), None);
        assert_eq!(w.acknowledge(&BiasProgress::default()), Signal::Idle);
        assert!(w.select_zone(0));
    }

    #[test]
    fn open_feedback_blocks_input() {
        let mut w = BiasWidget::new();
        w.select_zone(0);
        w.choose_bias(label_for(0));
        assert!(!w.select_zone(1));
        assert_eq!(w.feedback().unwrap().title, "Loss Aversion");
    }

    #[test]
    fn choose_without_selection_is_noop() {
        let mut w = BiasWidget::new();
        assert_eq!(w.choose_bias(0), None);
        assert!(w.feedback().is_none());
    }

    #[test]
    fn acknowledge_without_feedback_is_idle() {
        let mut w = BiasWidget::new();
        let done = BiasProgress { found: 3 };
        assert_eq!(w.acknowledge(&done), Signal::Idle);
    }

    #[test]
    fn cancel_drops_selection() {
        let mut w = BiasWidget::new();
        w.select_zone(2);
        w.cancel();
        assert_eq!(w.selected(), None);
    }
}
