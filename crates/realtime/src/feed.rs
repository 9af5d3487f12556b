use insights_core::types::RealTimeActivity;
use serde::Serialize;
use std::collections::VecDeque;

/// Bounded activity list, newest first. Pushing past `max` evicts the oldest.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityFeed {
    max: usize,
    items: VecDeque<RealTimeActivity>,
}

impl ActivityFeed {
    pub fn new(max: usize) -> Self {
        Self {
            max,
            items: VecDeque::with_capacity(max),
        }
    }

    pub fn push(&mut self, activity: RealTimeActivity) {
        self.items.push_front(activity);
        self.items.truncate(self.max);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn latest(&self) -> Option<&RealTimeActivity> {
        self.items.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RealTimeActivity> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max
    }
}
