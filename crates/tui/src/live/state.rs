/// Whether the detail view sticks to the newest messages of a live session.
#[derive(Debug, Clone)]
pub struct FollowTailState {
    pub is_following: bool,
    pub detached_by_user: bool,
    pub was_near_tail_before_update: bool,
}

impl Default for FollowTailState {
    fn default() -> Self {
        Self {
            is_following: true,
            detached_by_user: false,
            was_near_tail_before_update: true,
        }
    }
}

impl FollowTailState {
    /// Fresh state for a newly opened session, which starts at the top.
    pub fn reset(&mut self) {
        *self = Self {
            was_near_tail_before_update: false,
            ..Self::default()
        };
    }

    pub fn detach(&mut self) {
        self.is_following = false;
        self.detached_by_user = true;
    }

    pub fn reattach(&mut self) {
        self.is_following = true;
        self.detached_by_user = false;
        self.was_near_tail_before_update = true;
    }

    pub fn mark_before_update(&mut self, near_tail: bool) {
        self.was_near_tail_before_update = near_tail;
    }

    pub fn should_follow_after_update(&self) -> bool {
        self.is_following && !self.detached_by_user && self.was_near_tail_before_update
    }

    pub fn label(&self) -> &'static str {
        if self.should_follow_after_update() {
            "following"
        } else if self.detached_by_user {
            "detached"
        } else {
            "idle"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FollowTailState;

    #[test]
    fn follow_state_detach_and_reattach_roundtrip() {
        let mut state = FollowTailState::default();
        assert!(state.should_follow_after_update());

        state.detach();
        state.mark_before_update(true);
        assert!(!state.should_follow_after_update());

        state.reattach();
        assert!(state.should_follow_after_update());
    }

    #[test]
    fn reset_session_only_follows_once_at_tail() {
        let mut state = FollowTailState::default();
        state.reset();
        assert!(!state.should_follow_after_update());
        assert_eq!(state.label(), "idle");

        state.mark_before_update(true);
        assert!(state.should_follow_after_update());
    }
}
