use crate::graph::Edge;
use crate::identity::IdentityIndex;

/// Maximum number of linked accounts surfaced per response.
pub const LINKED_LIMIT: usize = 3;

/// Label for neighbors appended during the current request; they have no
/// persisted identifier to resolve.
const UNKNOWN_LABEL: &str = "unknown";

/// Collect up to `limit` accounts the scored node pays into, in edge-list
/// order, resolving each target index back through the identity index.
pub fn linked_accounts(
    edges: &[Edge],
    source_index: usize,
    identity: &IdentityIndex,
    limit: usize,
) -> Vec<String> {
    edges
        .iter()
        .filter(|e| e.source as usize == source_index)
        .take(limit)
        .map(|e| match identity.resolve(e.target) {
            Some(id) => format!("Card_{id}"),
            None => format!("Card_{UNKNOWN_LABEL}"),
        })
        .collect()
}
