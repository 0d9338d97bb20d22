//! Graph state: one shared state type per topology, merged additively.
//!
//! Each graph declares a single state struct whose field set is closed at
//! graph-construction time. Nodes return a partial update; `apply` merges it
//! into the running state by overwriting only the fields the update carries.

use std::fmt::Debug;

/// State type flowing through a graph.
///
/// `Update` is the partial-update type returned by nodes: typically a struct
/// of `Option` fields where `Some` overwrites and `None` leaves the running
/// value unchanged. The engine owns the state for the duration of a
/// super-step and applies each node's update in place; it clones a snapshot
/// only at the suspension point when writing the checkpoint.
pub trait GraphState: Clone + Send + Sync + Debug + 'static {
    /// Partial update produced by one node execution.
    type Update: Send;

    /// Merges a partial update into this state. Fields the update does not
    /// carry must be left unchanged.
    fn apply(&mut self, update: Self::Update);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Pair {
        left: Option<String>,
        right: Option<String>,
    }

    #[derive(Default)]
    struct PairUpdate {
        left: Option<String>,
        right: Option<String>,
    }

    impl GraphState for Pair {
        type Update = PairUpdate;

        fn apply(&mut self, update: Self::Update) {
            if let Some(v) = update.left {
                self.left = Some(v);
            }
            if let Some(v) = update.right {
                self.right = Some(v);
            }
        }
    }

    /// **Scenario**: apply overwrites carried fields and leaves omitted fields unchanged.
    #[test]
    fn apply_merges_only_carried_fields() {
        let mut state = Pair {
            left: Some("a".into()),
            right: None,
        };
        state.apply(PairUpdate {
            left: None,
            right: Some("b".into()),
        });
        assert_eq!(state.left.as_deref(), Some("a"));
        assert_eq!(state.right.as_deref(), Some("b"));
    }
}
