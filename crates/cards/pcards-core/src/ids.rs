//! Identifiers and a simple allocator for fade cleanup subscriptions.

use serde::{Deserialize, Serialize};

/// Handle for a one-shot transition-end subscription held by the host.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u32);

/// Monotonic allocator for [`SubscriptionId`].
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_subscription: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_subscription(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription = self.next_subscription.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_increasing_ids() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.alloc_subscription(), SubscriptionId(0));
        assert_eq!(ids.alloc_subscription(), SubscriptionId(1));
    }
}
