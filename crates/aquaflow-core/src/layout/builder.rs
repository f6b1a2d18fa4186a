//! The recursive layout pass.
//!
//! Each chain is laid out left-to-right along a fixed row; linked chains are
//! placed on rows below their parent revision, recursively. Node ids are
//! revision hashes and edge ids are `source-target` pairs, both deduplicated
//! across the whole recursion so a revision shared between chains appears
//! exactly once.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::chain::{ChainError, SuccessorIndex, find_genesis};
use crate::model::{AquaTree, ChainDocument, Revision};

use super::LayoutError;
use super::key::{LinkKey, parse_linked_chains};

/// Horizontal distance between consecutive revisions of a chain.
pub const HORIZONTAL_SPACING: f64 = 300.0;

/// Vertical distance between a chain and the linked chains below it.
pub const VERTICAL_SPACING: f64 = 150.0;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// A node's position in layout space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    /// Horizontal coordinate, grows rightwards along a chain.
    pub x: f64,
    /// Vertical coordinate, grows downwards per linked-chain row.
    pub y: f64,
}

/// One positioned revision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutNode {
    /// The revision hash (unique across the whole layout).
    pub id: String,
    /// Where to draw the node.
    pub position: Position,
    /// The revision record, carried along for the renderer.
    pub revision: Revision,
}

/// What an edge means, replacing the upstream inline styling: `Sequence`
/// joins consecutive revisions of one chain, `Link` joins a parent revision
/// to the genesis of an attached chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Consecutive revisions within one chain.
    Sequence,
    /// Parent revision to the genesis of a linked chain.
    Link,
}

/// One directed edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutEdge {
    /// Unique edge identifier (`source-target`, `link-` prefixed for links).
    pub id: String,
    /// Node id the edge leaves from.
    pub source: String,
    /// Node id the edge points at.
    pub target: String,
    /// What the edge means.
    pub kind: EdgeKind,
}

/// The finished layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainLayout {
    /// All nodes, in placement order (main chain first, then linked chains
    /// in expansion order).
    pub nodes: Vec<LayoutNode>,
    /// All edges, in creation order.
    pub edges: Vec<LayoutEdge>,
    /// The largest y coordinate used. A caller stacking sibling layouts
    /// should start the next one below this plus [`VERTICAL_SPACING`].
    pub max_y: f64,
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Lay out a main chain and its linked chains.
///
/// # Errors
///
/// - [`LayoutError::MainChain`] / [`LayoutError::LinkedChain`] when any
///   chain fails reconstruction (no genesis, ambiguity, disconnection).
/// - [`LayoutError::CyclicLinkedChainReference`] when expanding a linked
///   chain loops back into a chain still being expanded.
pub fn build_layout(
    tree: &AquaTree,
    linked: &BTreeMap<LinkKey, AquaTree>,
) -> Result<ChainLayout, LayoutError> {
    let mut builder = Builder::new(linked);
    let max_y = builder.place_chain(tree, None, 0.0, 0.0)?;
    tracing::debug!(
        nodes = builder.nodes.len(),
        edges = builder.edges.len(),
        "layout complete"
    );
    Ok(ChainLayout {
        nodes: builder.nodes,
        edges: builder.edges,
        max_y,
    })
}

/// Lay out a whole [`ChainDocument`], parsing its raw compound keys first.
///
/// # Errors
///
/// Everything [`build_layout`] reports, plus
/// [`LayoutError::AmbiguousCompoundKey`] for unparseable keys.
pub fn layout_document(doc: &ChainDocument) -> Result<ChainLayout, LayoutError> {
    let linked = parse_linked_chains(&doc.linked_chains)?;
    build_layout(&doc.tree, &linked)
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Working state for one layout pass.
struct Builder<'a> {
    linked: &'a BTreeMap<LinkKey, AquaTree>,
    /// Parent revision hash → keys of the chains attached to it, in
    /// `BTreeMap` order (sorted by linked id), for deterministic expansion.
    by_parent: HashMap<&'a str, Vec<&'a LinkKey>>,
    /// Where each revision hash was first placed.
    placed: HashMap<String, Position>,
    nodes: Vec<LayoutNode>,
    edges: Vec<LayoutEdge>,
    edge_ids: HashSet<String>,
    /// Keys fully expanded; a key is expanded at most once.
    processed: HashSet<&'a LinkKey>,
    /// Keys currently being expanded; re-entry means a reference cycle.
    in_flight: HashSet<&'a LinkKey>,
}

impl<'a> Builder<'a> {
    fn new(linked: &'a BTreeMap<LinkKey, AquaTree>) -> Self {
        let mut by_parent: HashMap<&'a str, Vec<&'a LinkKey>> = HashMap::new();
        for key in linked.keys() {
            by_parent.entry(key.parent.as_str()).or_default().push(key);
        }
        Self {
            linked,
            by_parent,
            placed: HashMap::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            edge_ids: HashSet::new(),
            processed: HashSet::new(),
            in_flight: HashSet::new(),
        }
    }

    /// Lay out one chain at `(start_x, start_y)`, recursing into linked
    /// chains. Returns the maximum y extent used by this chain and
    /// everything below it.
    fn place_chain(
        &mut self,
        chain: &'a AquaTree,
        attach: Option<(&str, &'a LinkKey)>,
        start_x: f64,
        start_y: f64,
    ) -> Result<f64, LayoutError> {
        let genesis = find_genesis(chain).map_err(|e| Self::wrap(attach, e))?;

        // A linked chain hangs off its parent revision via a distinguished
        // link edge into the sub-chain's genesis.
        if let Some((parent, _)) = attach {
            self.push_edge(format!("link-{parent}-{genesis}"), parent, genesis, EdgeKind::Link);
        }

        let index = SuccessorIndex::build(chain);
        let mut order: Vec<&str> = Vec::with_capacity(chain.len());
        let mut seen: HashSet<&str> = HashSet::with_capacity(chain.len());
        let mut max_y = start_y;
        let mut x = start_x;
        let mut current = genesis;

        loop {
            let Some(revision) = chain.get(current) else {
                break;
            };
            seen.insert(current);
            order.push(current);

            // Place the node, or reuse the one another chain already placed.
            if self.placed.contains_key(current) {
                tracing::debug!(hash = %current, "revision already placed; reusing node");
            } else {
                let position = Position { x, y: start_y };
                self.placed.insert(current.to_string(), position);
                self.nodes.push(LayoutNode {
                    id: current.to_string(),
                    position,
                    revision: revision.clone(),
                });
            }

            let next = index.successor_of(current);
            if let Some(next) = next {
                self.push_edge(
                    format!("{current}-{next}"),
                    current,
                    next,
                    EdgeKind::Sequence,
                );
            }

            // Expand linked chains attached to this revision, stacking each
            // sibling below the extent of the previous one.
            let keys: Vec<&'a LinkKey> = self
                .by_parent
                .get(current)
                .cloned()
                .unwrap_or_default();
            for key in keys {
                if self.in_flight.contains(key) {
                    return Err(LayoutError::CyclicLinkedChainReference { key: key.clone() });
                }
                if self.processed.contains(key) {
                    tracing::debug!(key = %key, "linked chain already expanded; skipping");
                    continue;
                }
                let Some(sub) = self.linked.get(key) else {
                    continue;
                };
                let parent_x = self.placed.get(current).map_or(x, |p| p.x);
                let child_y = max_y + VERTICAL_SPACING;

                self.in_flight.insert(key);
                let sub_max = self.place_chain(sub, Some((current, key)), parent_x, child_y)?;
                self.in_flight.remove(key);
                self.processed.insert(key);

                max_y = max_y.max(sub_max);
            }

            match next {
                Some(next) if !seen.contains(next) => {
                    current = next;
                    x += HORIZONTAL_SPACING;
                }
                _ => break,
            }
        }

        // The walk must have covered the whole chain; strays are an error,
        // never silently absent nodes.
        if order.len() < chain.len() {
            let mut unreached: Vec<String> = chain
                .hashes()
                .filter(|hash| !seen.contains(hash))
                .map(ToString::to_string)
                .collect();
            unreached.sort_unstable();
            let err = ChainError::Disconnected {
                reached: order.iter().map(ToString::to_string).collect(),
                unreached,
            };
            return Err(Self::wrap(attach, err));
        }

        Ok(max_y)
    }

    fn push_edge(&mut self, id: String, source: &str, target: &str, kind: EdgeKind) {
        if self.edge_ids.insert(id.clone()) {
            self.edges.push(LayoutEdge {
                id,
                source: source.to_string(),
                target: target.to_string(),
                kind,
            });
        }
    }

    fn wrap(attach: Option<(&str, &LinkKey)>, err: ChainError) -> LayoutError {
        match attach {
            None => LayoutError::MainChain(err),
            Some((_, key)) => LayoutError::LinkedChain {
                key: key.clone(),
                source: err,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RevisionType;

    // -------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------

    fn tree_of(pairs: &[(&str, &str)]) -> AquaTree {
        let mut tree = AquaTree::default();
        for (hash, prev) in pairs {
            tree.revisions
                .insert((*hash).to_string(), Revision::new(*prev, RevisionType::File));
        }
        tree
    }

    fn no_links() -> BTreeMap<LinkKey, AquaTree> {
        BTreeMap::new()
    }

    fn node_pos<'l>(layout: &'l ChainLayout, id: &str) -> &'l Position {
        &layout
            .nodes
            .iter()
            .find(|n| n.id == id)
            .unwrap_or_else(|| panic!("node {id} not in layout"))
            .position
    }

    fn edge<'l>(layout: &'l ChainLayout, id: &str) -> &'l LayoutEdge {
        layout
            .edges
            .iter()
            .find(|e| e.id == id)
            .unwrap_or_else(|| panic!("edge {id} not in layout"))
    }

    // -------------------------------------------------------------------
    // Flat chains
    // -------------------------------------------------------------------

    #[test]
    fn lays_out_linear_chain() {
        let tree = tree_of(&[("A", ""), ("B", "A"), ("C", "B")]);
        let layout = build_layout(&tree, &no_links()).expect("layout");

        assert_eq!(layout.nodes.len(), 3);
        assert_eq!(layout.edges.len(), 2);
        assert_eq!(layout.max_y, 0.0);

        assert_eq!(node_pos(&layout, "A").x, 0.0);
        assert_eq!(node_pos(&layout, "B").x, 300.0);
        assert_eq!(node_pos(&layout, "C").x, 600.0);
        for id in ["A", "B", "C"] {
            assert_eq!(node_pos(&layout, id).y, 0.0);
        }

        let ab = edge(&layout, "A-B");
        assert_eq!(ab.source, "A");
        assert_eq!(ab.target, "B");
        assert_eq!(ab.kind, EdgeKind::Sequence);
        assert_eq!(edge(&layout, "B-C").kind, EdgeKind::Sequence);
    }

    #[test]
    fn node_and_edge_counts_for_longer_chain() {
        let mut tree = AquaTree::default();
        for i in 0..20 {
            let prev = if i == 0 {
                String::new()
            } else {
                format!("r{}", i - 1)
            };
            tree.revisions
                .insert(format!("r{i}"), Revision::new(prev, RevisionType::File));
        }
        let layout = build_layout(&tree, &no_links()).expect("layout");
        assert_eq!(layout.nodes.len(), 20);
        assert_eq!(layout.edges.len(), 19);
    }

    #[test]
    fn singleton_chain_has_no_edges() {
        let tree = tree_of(&[("A", "")]);
        let layout = build_layout(&tree, &no_links()).expect("layout");
        assert_eq!(layout.nodes.len(), 1);
        assert!(layout.edges.is_empty());
    }

    #[test]
    fn nodes_carry_their_revision() {
        let mut tree = AquaTree::default();
        tree.revisions
            .insert("A".to_string(), Revision::new("", RevisionType::Signature));
        let layout = build_layout(&tree, &no_links()).expect("layout");
        assert_eq!(layout.nodes[0].revision.revision_type, RevisionType::Signature);
    }

    #[test]
    fn malformed_main_chain_is_reported() {
        let tree = tree_of(&[("A", "B"), ("B", "A")]);
        let err = build_layout(&tree, &no_links()).unwrap_err();
        assert_eq!(err, LayoutError::MainChain(ChainError::NoGenesis));
    }

    // -------------------------------------------------------------------
    // Linked chains
    // -------------------------------------------------------------------

    #[test]
    fn linked_chain_hangs_below_its_parent() {
        let tree = tree_of(&[("A", ""), ("B", "A")]);
        let mut linked = no_links();
        linked.insert(LinkKey::new("A", "X"), tree_of(&[("X", ""), ("Y", "X")]));

        let layout = build_layout(&tree, &linked).expect("layout");

        assert_eq!(layout.nodes.len(), 4);
        // Edges: A-B, X-Y, link-A-X.
        assert_eq!(layout.edges.len(), 3);

        assert_eq!(node_pos(&layout, "A").y, 0.0);
        assert_eq!(node_pos(&layout, "B").y, 0.0);
        assert_eq!(node_pos(&layout, "X").y, VERTICAL_SPACING);
        assert_eq!(node_pos(&layout, "Y").y, VERTICAL_SPACING);

        // Sub-chain starts at its parent's x.
        assert_eq!(node_pos(&layout, "X").x, node_pos(&layout, "A").x);
        assert_eq!(node_pos(&layout, "Y").x, node_pos(&layout, "A").x + HORIZONTAL_SPACING);

        let link = edge(&layout, "link-A-X");
        assert_eq!(link.source, "A");
        assert_eq!(link.target, "X");
        assert_eq!(link.kind, EdgeKind::Link);

        assert_eq!(layout.max_y, VERTICAL_SPACING);
    }

    #[test]
    fn sibling_linked_chains_stack_downwards() {
        let tree = tree_of(&[("A", "")]);
        let mut linked = no_links();
        linked.insert(LinkKey::new("A", "X"), tree_of(&[("X", "")]));
        linked.insert(LinkKey::new("A", "Y"), tree_of(&[("Y", "")]));

        let layout = build_layout(&tree, &linked).expect("layout");

        // BTreeMap order: X expands before Y.
        assert_eq!(node_pos(&layout, "X").y, VERTICAL_SPACING);
        assert_eq!(node_pos(&layout, "Y").y, 2.0 * VERTICAL_SPACING);
        assert_eq!(layout.max_y, 2.0 * VERTICAL_SPACING);
    }

    #[test]
    fn nested_linked_chains_recurse() {
        // A's linked chain X has its own linked chain at X.
        let tree = tree_of(&[("A", "")]);
        let mut linked = no_links();
        linked.insert(LinkKey::new("A", "X"), tree_of(&[("X", "")]));
        linked.insert(LinkKey::new("X", "Z"), tree_of(&[("Z", "")]));

        let layout = build_layout(&tree, &linked).expect("layout");

        assert_eq!(layout.nodes.len(), 3);
        assert_eq!(node_pos(&layout, "X").y, VERTICAL_SPACING);
        assert_eq!(node_pos(&layout, "Z").y, 2.0 * VERTICAL_SPACING);
        assert_eq!(edge(&layout, "link-X-Z").kind, EdgeKind::Link);
    }

    #[test]
    fn shared_revision_is_not_duplicated() {
        // The linked chain contains revision B, which the main chain also
        // holds. The node must appear once, at its first placement.
        let tree = tree_of(&[("A", ""), ("B", "A")]);
        let mut linked = no_links();
        linked.insert(LinkKey::new("A", "B"), tree_of(&[("B", "")]));

        let layout = build_layout(&tree, &linked).expect("layout");

        let ids: Vec<&str> = layout.nodes.iter().map(|n| n.id.as_str()).collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len(), "duplicate node ids: {ids:?}");
        assert_eq!(layout.nodes.len(), 2);
        // B keeps its main-chain position.
        assert_eq!(node_pos(&layout, "B").y, 0.0);
    }

    #[test]
    fn linked_chain_expanded_at_most_once() {
        // Key A_X is reachable both from the main walk over A and from the
        // linked chain that contains its own copy of A. The second
        // encounter must reuse, not re-expand.
        let tree = tree_of(&[("A", ""), ("B", "A")]);
        let mut linked = no_links();
        linked.insert(LinkKey::new("B", "L"), tree_of(&[("A", "")]));
        linked.insert(LinkKey::new("A", "X"), tree_of(&[("X", "")]));

        let layout = build_layout(&tree, &linked).expect("layout");

        let x_nodes = layout.nodes.iter().filter(|n| n.id == "X").count();
        assert_eq!(x_nodes, 1);
    }

    #[test]
    fn self_referential_linked_chain_is_cyclic() {
        // The linked chain attached at A contains A itself, so expanding it
        // re-encounters key A_X while A_X is still in flight.
        let tree = tree_of(&[("A", "")]);
        let mut linked = no_links();
        linked.insert(LinkKey::new("A", "X"), tree_of(&[("A", "")]));

        let err = build_layout(&tree, &linked).unwrap_err();
        assert_eq!(
            err,
            LayoutError::CyclicLinkedChainReference {
                key: LinkKey::new("A", "X")
            }
        );
    }

    #[test]
    fn malformed_linked_chain_names_its_key() {
        let tree = tree_of(&[("A", "")]);
        let mut linked = no_links();
        linked.insert(LinkKey::new("A", "X"), tree_of(&[("X", "Y"), ("Y", "X")]));

        let err = build_layout(&tree, &linked).unwrap_err();
        assert_eq!(
            err,
            LayoutError::LinkedChain {
                key: LinkKey::new("A", "X"),
                source: ChainError::NoGenesis
            }
        );
    }

    #[test]
    fn disconnected_main_chain_is_reported() {
        let tree = tree_of(&[("A", ""), ("B", "A"), ("C", "Z")]);
        match build_layout(&tree, &no_links()).unwrap_err() {
            LayoutError::MainChain(ChainError::Disconnected { reached, unreached }) => {
                assert_eq!(reached, vec!["A", "B"]);
                assert_eq!(unreached, vec!["C"]);
            }
            other => panic!("expected disconnected main chain, got: {other:?}"),
        }
    }

    #[test]
    fn link_edge_for_unplaced_parent_chain_keys_is_ignored() {
        // A key whose parent hash never occurs in any chain simply never
        // expands; it is not an error.
        let tree = tree_of(&[("A", "")]);
        let mut linked = no_links();
        linked.insert(LinkKey::new("NOPE", "X"), tree_of(&[("X", "")]));

        let layout = build_layout(&tree, &linked).expect("layout");
        assert_eq!(layout.nodes.len(), 1);
        assert!(layout.edges.is_empty());
    }

    // -------------------------------------------------------------------
    // Documents
    // -------------------------------------------------------------------

    #[test]
    fn layout_document_parses_compound_keys() {
        let json = r#"{
            "revisions": {
                "A": {"previous_verification_hash": "", "revision_type": "file"},
                "B": {"previous_verification_hash": "A", "revision_type": "link"}
            },
            "linkedChains": {
                "B_X": {
                    "revisions": {
                        "X": {"previous_verification_hash": "", "revision_type": "file"}
                    }
                }
            }
        }"#;
        let doc: ChainDocument = serde_json::from_str(json).expect("deserialize");
        let layout = layout_document(&doc).expect("layout");

        assert_eq!(layout.nodes.len(), 3);
        assert_eq!(edge(&layout, "link-B-X").kind, EdgeKind::Link);
    }

    #[test]
    fn layout_document_rejects_bad_keys() {
        let json = r#"{
            "revisions": {
                "A": {"previous_verification_hash": "", "revision_type": "file"}
            },
            "linkedChains": {
                "nodelimiter": {"revisions": {}}
            }
        }"#;
        let doc: ChainDocument = serde_json::from_str(json).expect("deserialize");
        let err = layout_document(&doc).unwrap_err();
        assert!(matches!(err, LayoutError::AmbiguousCompoundKey { .. }));
    }

    // -------------------------------------------------------------------
    // Serialization of output
    // -------------------------------------------------------------------

    #[test]
    fn layout_serializes_for_renderers() {
        let tree = tree_of(&[("A", ""), ("B", "A")]);
        let layout = build_layout(&tree, &no_links()).expect("layout");
        let json = serde_json::to_value(&layout).expect("serialize");

        assert_eq!(json["nodes"][0]["id"], "A");
        assert_eq!(json["nodes"][1]["position"]["x"], 300.0);
        assert_eq!(json["edges"][0]["kind"], "sequence");
    }
}
