use crate::maze::NodeId;

/// Walks the predecessor links backward from `to` until `from` is reached and returns the nodes
/// from `from` to `to`, in that order.
///
/// Panics if the chain of predecessors ends before reaching `from`. Callers only ask for paths to
/// nodes the search itself reached from `from`, so a broken chain is a bug.
pub(crate) fn path_from_to<F>(from: NodeId, to: NodeId, mut predecessor: F) -> Vec<NodeId>
where
    F: FnMut(NodeId) -> Option<NodeId>,
{
    let mut path = vec![to];
    let mut node = to;

    while node != from {
        node = predecessor(node).unwrap_or_else(|| {
            panic!("no predecessor recorded for node {node} on the way from {to} back to {from}")
        });
        path.push(node);
    }

    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn single_node() {
        assert_eq!(path_from_to(4, 4, |_| None), vec![4]);
    }

    #[test]
    fn follows_chain() {
        let predecessors = HashMap::from([(1, 0), (2, 1), (3, 1), (4, 3)]);
        let path = path_from_to(0, 4, |n| predecessors.get(&n).copied());
        assert_eq!(path, vec![0, 1, 3, 4]);
    }

    #[test]
    fn stops_at_intermediate_origin() {
        let predecessors = HashMap::from([(1, 0), (2, 1), (3, 2)]);
        let path = path_from_to(1, 3, |n| predecessors.get(&n).copied());
        assert_eq!(path, vec![1, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "no predecessor recorded for node 0")]
    fn broken_chain_panics() {
        let predecessors = HashMap::from([(1, 0), (2, 1)]);
        path_from_to(5, 2, |n| predecessors.get(&n).copied());
    }
}
