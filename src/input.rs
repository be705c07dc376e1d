use crate::entity::Direction;

/// Reconciles asynchronous keystrokes against the discrete movement grid.
///
/// Each simulation step accepts at most one committed direction change, plus
/// one queued look-ahead change. Two quick taps around a corner both land:
/// the first commits for the next step, the second queues for the step after,
/// and neither is applied mid-step or silently dropped.
#[derive(Debug)]
pub struct InputDirector {
    /// Heading as of the last completed step.
    current: Direction,
    /// Direction the next step will commit.
    pending: Direction,
    /// Single look-ahead slot; a newer request overwrites an older one.
    queued: Option<Direction>,
    /// Set once a change has been committed this step.
    locked: bool,
}

impl InputDirector {
    pub fn new(initial: Direction) -> Self {
        Self {
            current: initial,
            pending: initial,
            queued: None,
            locked: false,
        }
    }

    /// Direction the next step will take; the scheduler consults this for
    /// the vertical interval stretch.
    pub fn pending(&self) -> Direction {
        self.pending
    }

    /// Handle a direction keypress. Illegal 180-degree reversals are
    /// rejected here so the simulation core never sees them.
    pub fn request(&mut self, d: Direction) {
        if !self.locked {
            if !d.is_opposite(self.current) {
                self.pending = d;
                self.locked = true;
            }
        } else if !d.is_opposite(self.pending) && d != self.pending {
            self.queued = Some(d);
        }
    }

    /// Called once per simulation step boundary. Returns the direction the
    /// step should commit, then promotes the queued direction if it is still
    /// legal against the direction just taken. A promoted direction occupies
    /// the new step's commit slot, so a later keypress cannot displace it.
    pub fn begin_step(&mut self) -> Direction {
        let committed = self.pending;
        self.current = committed;
        self.locked = false;
        if let Some(q) = self.queued.take() {
            if !q.is_opposite(committed) && q != committed {
                self.pending = q;
                self.locked = true;
            }
        }
        committed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::*;

    #[test]
    fn first_request_commits_for_next_step() {
        let mut director = InputDirector::new(Right);
        director.request(Up);
        assert_eq!(director.pending(), Up);
        assert_eq!(director.begin_step(), Up);
    }

    #[test]
    fn reversal_is_rejected() {
        let mut director = InputDirector::new(Right);
        director.request(Left);
        assert_eq!(director.pending(), Right);
        assert_eq!(director.begin_step(), Right);
    }

    #[test]
    fn second_request_in_same_step_queues() {
        let mut director = InputDirector::new(Right);
        director.request(Up);
        director.request(Left);
        // First step turns up, the queued left turn lands on the next one.
        assert_eq!(director.begin_step(), Up);
        assert_eq!(director.pending(), Left);
        assert_eq!(director.begin_step(), Left);
    }

    #[test]
    fn queued_duplicate_of_pending_is_ignored() {
        let mut director = InputDirector::new(Right);
        director.request(Up);
        director.request(Up);
        assert_eq!(director.begin_step(), Up);
        assert_eq!(director.begin_step(), Up);
    }

    #[test]
    fn queued_reversal_of_pending_is_ignored() {
        let mut director = InputDirector::new(Right);
        director.request(Up);
        director.request(Down);
        assert_eq!(director.begin_step(), Up);
        assert_eq!(director.pending(), Up);
    }

    #[test]
    fn newer_queued_request_overwrites_older() {
        let mut director = InputDirector::new(Right);
        director.request(Up);
        director.request(Left);
        director.request(Right);
        assert_eq!(director.begin_step(), Up);
        assert_eq!(director.begin_step(), Right);
    }

    #[test]
    fn promoted_direction_survives_a_later_keypress() {
        let mut director = InputDirector::new(Right);
        director.request(Up);
        director.request(Left);
        assert_eq!(director.begin_step(), Up);
        // The promoted left turn holds the commit slot; this request queues.
        director.request(Up);
        assert_eq!(director.begin_step(), Left);
        assert_eq!(director.begin_step(), Up);
    }

    #[test]
    fn corner_tap_sequence_navigates_a_corner() {
        // Heading right, tap up then left in one step: the snake turns up,
        // then left, one step apart, exactly as tapped.
        let mut director = InputDirector::new(Right);
        director.request(Up);
        director.request(Left);
        assert_eq!(director.begin_step(), Up);
        assert_eq!(director.begin_step(), Left);
        // With no further input the heading holds.
        assert_eq!(director.begin_step(), Left);
    }

    #[test]
    fn commit_slot_unlocks_at_step_boundary() {
        let mut director = InputDirector::new(Right);
        director.request(Up);
        assert_eq!(director.begin_step(), Up);
        director.request(Right);
        assert_eq!(director.begin_step(), Right);
    }
}
