//! Latest live pose, shared with renderers
//!
//! Owned by the session: set on every processed frame, cleared on stop.
//! Readers either poll [`PoseFeed::latest`] or subscribe for pushes.

use std::fmt;

use crate::pose::Pose;

/// Handle returned by [`PoseFeed::subscribe`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(Option<&Pose>)>;

#[derive(Default)]
pub struct PoseFeed {
    latest: Option<Pose>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl PoseFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<&Pose> {
        self.latest.as_ref()
    }

    /// Register a listener. It receives `Some(pose)` for each frame and
    /// `None` when the feed is cleared.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(Option<&Pose>) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn publish(&mut self, pose: Pose) {
        let latest = self.latest.insert(pose);
        for (_, listener) in self.listeners.iter_mut() {
            listener(Some(&*latest));
        }
    }

    pub fn clear(&mut self) {
        if self.latest.take().is_some() {
            for (_, listener) in self.listeners.iter_mut() {
                listener(None);
            }
        }
    }
}

impl fmt::Debug for PoseFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoseFeed")
            .field("latest", &self.latest)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
