use std::{collections::VecDeque, iter::FromIterator};

use crate::action::Action;

/// Actions in the order they were first asked for. Asking for an action that is already waiting
/// does nothing, so `clean build clean` cleans once, then builds.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ActionQueue {
    actions: VecDeque<Action>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if `action` was already queued.
    pub fn enqueue(&mut self, action: Action) -> bool {
        if self.contains(action) {
            return false;
        }
        self.actions.push_back(action);
        true
    }

    pub fn pop_front(&mut self) -> Option<Action> {
        self.actions.pop_front()
    }

    pub fn contains(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        self.actions.iter().copied()
    }
}

impl FromIterator<Action> for ActionQueue {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut queue = ActionQueue::new();
        for action in iter {
            queue.enqueue(action);
        }
        queue
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_repeat_is_dropped() {
        let mut queue = ActionQueue::new();
        assert!(queue.enqueue(Action::Build));
        assert!(!queue.enqueue(Action::Build));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_first_mention_wins() {
        let queue: ActionQueue = vec![Action::Clean, Action::Build, Action::Clean]
            .into_iter()
            .collect();
        assert_eq!(
            queue.iter().collect::<Vec<_>>(),
            vec![Action::Clean, Action::Build]
        );
    }

    #[test]
    fn test_popped_action_can_be_queued_again() {
        let mut queue = ActionQueue::new();
        queue.enqueue(Action::Run);
        assert_eq!(queue.pop_front(), Some(Action::Run));
        assert!(queue.is_empty());
        assert!(queue.enqueue(Action::Run));
    }

    fn action_strategy() -> impl Strategy<Value = Action> {
        prop::sample::select(Action::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn drains_in_first_occurrence_order(requested in prop::collection::vec(action_strategy(), 0..20)) {
            let mut expected = vec![];
            for action in &requested {
                if !expected.contains(action) {
                    expected.push(*action);
                }
            }

            let mut queue: ActionQueue = requested.into_iter().collect();
            let mut drained = vec![];
            while let Some(action) = queue.pop_front() {
                drained.push(action);
            }
            prop_assert_eq!(drained, expected);
        }
    }
}
