/// Deferred timers for the session.
///
/// The session never sleeps. Anything that should happen "a bit later"
/// (the enemy's turn, settling after a card, the level-complete banner) is
/// scheduled here and fired from the game loop's tick.
///
/// `cancel_all()` is called on every screen change and restart, so a timer
/// can never reach a widget that has already been torn down.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Timer {
    /// Opponent attacks the player.
    EnemyTurn,
    /// Card resolution finished; hand control back to the opponent.
    Settle,
    /// Level-complete banner elapsed; go to the next screen.
    AdvanceScreen,
}

pub trait Scheduler {
    fn schedule(&mut self, delay_ticks: u32, timer: Timer);
    fn cancel_all(&mut self);
    /// Advance one tick and return the timers that are due, in schedule order.
    fn tick(&mut self) -> Vec<Timer>;
    fn is_idle(&self) -> bool;
}

/// Production scheduler counting game-loop ticks.
#[derive(Default)]
pub struct TickScheduler {
    pending: Vec<(u32, Timer)>,
}

impl TickScheduler {
    pub fn new() -> Self {
        TickScheduler::default()
    }
}

impl Scheduler for TickScheduler {
    fn schedule(&mut self, delay_ticks: u32, timer: Timer) {
        self.pending.push((delay_ticks.max(1), timer));
    }

    fn cancel_all(&mut self) {
        self.pending.clear();
    }

    fn tick(&mut self) -> Vec<Timer> {
        let mut due = Vec::new();
        self.pending.retain_mut(|(left, timer)| {
            *left -= 1;
            if *left == 0 {
                due.push(*timer);
                false
            } else {
                true
            }
        });
        due
    }

    fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Fires every scheduled timer on the next tick, whatever its delay.
#[cfg(test)]
#[derive(Default)]
pub struct InstantScheduler {
    pending: Vec<Timer>,
}

#[cfg(test)]
impl Scheduler for InstantScheduler {
    fn schedule(&mut self, _delay_ticks: u32, timer: Timer) {
        self.pending.push(timer);
    }

    fn cancel_all(&mut self) {
        self.pending.clear();
    }

    fn tick(&mut self) -> Vec<Timer> {
        std::mem::take(&mut self.pending)
    }

    fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}
