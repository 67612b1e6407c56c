//! tree-sitter helpers shared by the complexity and rule passes

use tree_sitter::{Node, Parser, Tree};

/// Parse Python source. `None` only if the grammar cannot be loaded.
pub(crate) fn parse_python(code: &str) -> Option<Tree> {
    let mut parser = Parser::new();
    let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
    if let Err(e) = parser.set_language(&language) {
        tracing::error!("Failed to load Python grammar: {}", e);
        return None;
    }
    parser.parse(code, None)
}

pub(crate) fn node_text<'a>(node: Node, src: &'a str) -> &'a str {
    node.utf8_text(src.as_bytes()).unwrap_or("")
}

/// 1-based start line
pub(crate) fn line_of(node: Node) -> u32 {
    node.start_position().row as u32 + 1
}

pub(crate) fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Pre-order visit of every named node under `node`, inclusive.
///
/// Uses an explicit stack, so nesting depth is bounded by the heap.
pub(crate) fn visit<'t>(node: Node<'t>, f: &mut impl FnMut(Node<'t>)) {
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        f(current);
        stack.extend(named_children(current).into_iter().rev());
    }
}

/// Concatenated literal parts of a `string` node, without quotes or prefixes
pub(crate) fn string_value(node: Node, src: &str) -> String {
    named_children(node)
        .into_iter()
        .filter(|c| c.kind() == "string_content")
        .map(|c| node_text(c, src))
        .collect()
}
