//! Boot order state

use crate::config::BootOrderPolicy;
use biosconf_api::BootOrder;

/// Authoritative and proposed boot order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootOrderState {
    order: BootOrder,
    pending: BootOrder,
}

impl BootOrderState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap persisted orders
    pub fn from_parts(order: BootOrder, pending: BootOrder) -> Self {
        Self { order, pending }
    }

    pub fn order(&self) -> &BootOrder {
        &self.order
    }

    pub fn pending(&self) -> &BootOrder {
        &self.pending
    }

    /// Install a new boot order, updating the pending order per `policy`
    pub fn set_order(&mut self, order: BootOrder, policy: BootOrderPolicy) -> &BootOrder {
        self.pending = match policy {
            BootOrderPolicy::CopyToPending => order.clone(),
            BootOrderPolicy::ClearPending => BootOrder::new(),
        };
        self.order = order;
        &self.order
    }

    pub fn set_pending(&mut self, pending: BootOrder) -> &BootOrder {
        self.pending = pending;
        &self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(keys: &[&str]) -> BootOrder {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_copy_to_pending() {
        let mut state = BootOrderState::from_parts(order(&["a"]), order(&["z"]));
        state.set_order(order(&["b", "a"]), BootOrderPolicy::CopyToPending);
        assert_eq!(state.order(), &order(&["b", "a"]));
        assert_eq!(state.pending(), &order(&["b", "a"]));
    }

    #[test]
    fn test_clear_pending() {
        let mut state = BootOrderState::new();
        state.set_pending(order(&["x", "y"]));
        state.set_order(order(&["y"]), BootOrderPolicy::ClearPending);
        assert_eq!(state.order(), &order(&["y"]));
        assert!(state.pending().is_empty());
    }

    #[test]
    fn test_set_pending_leaves_order() {
        let mut state = BootOrderState::from_parts(order(&["a", "b"]), BootOrder::new());
        state.set_pending(order(&["b", "a"]));
        assert_eq!(state.order(), &order(&["a", "b"]));
        assert_eq!(state.pending(), &order(&["b", "a"]));
    }
}
