use super::SchemaNode;
use crate::path::FieldPath;

/// Depth-first, parent-before-children walk over a schema tree.
///
/// Children are visited in their declared order, so the sequence is stable
/// for a given tree.
pub struct Traverse<'a> {
    stack: Vec<(FieldPath, &'a SchemaNode)>,
}

impl<'a> Iterator for Traverse<'a> {
    type Item = (FieldPath, &'a SchemaNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, node) = self.stack.pop()?;
        for child in node.children().iter().rev() {
            self.stack.push((path.child(child.name()), child));
        }
        Some((path, node))
    }
}

/// Walks every node of `tree`, yielding each node with its dotted path.
pub fn traverse(tree: &SchemaNode) -> Traverse<'_> {
    Traverse {
        stack: vec![(FieldPath::root_only(tree.name()), tree)],
    }
}

/// Looks up the node addressed by `path`; the first segment must be the root name.
pub fn find_by_path<'a>(tree: &'a SchemaNode, path: &FieldPath) -> Option<&'a SchemaNode> {
    if tree.name() != path.root() {
        return None;
    }
    path.document_segments()
        .iter()
        .try_fold(tree, |node, segment| {
            node.children()
                .iter()
                .find(|child| child.name() == segment.as_str())
        })
}

/// Paths of every field node, in traversal order.
pub fn field_paths(tree: &SchemaNode) -> Vec<FieldPath> {
    traverse(tree)
        .filter(|(_, node)| matches!(node, SchemaNode::Field(_)))
        .map(|(path, _)| path)
        .collect()
}

/// Whether `path` names a field node (not a root or parent) of `tree`.
pub fn has_field(tree: &SchemaNode, path: &FieldPath) -> bool {
    matches!(find_by_path(tree, path), Some(SchemaNode::Field(_)))
}
