//! Block-level cyclomatic complexity for Python
//!
//! Every function, method, and class is a block. A function scores 1 plus one
//! per decision point in its own body (nested definitions are scored as their
//! own blocks). A class scores the rounded-up mean of its methods, or 1 plus
//! its body's decision points when it has none. The snippet's complexity is
//! the sum over all blocks, so module-level statements alone score 0.
//!
//! Decision points: `if`, `elif`, loops (+1 more with an `else`), each
//! `except`, a `try`'s `else`, `with`, `assert`, boolean operators, conditional
//! expressions, comprehension `for`/`if` clauses, and `case` arms.

use super::parser::{line_of, named_children, node_text, parse_python};
use super::ComplexityScore;
use serde::Serialize;
use tree_sitter::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Function,
    Method,
    Class,
}

/// Complexity of one function, method, or class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockComplexity {
    pub name: String,
    pub kind: BlockKind,
    pub line: u32,
    pub complexity: u32,
}

/// Sum of block complexities, or `Unavailable` when the source does not parse
pub fn cyclomatic_complexity(code: &str) -> ComplexityScore {
    match complexity_blocks(code) {
        Some(blocks) => ComplexityScore::Score(blocks.iter().map(|b| b.complexity).sum()),
        None => ComplexityScore::Unavailable,
    }
}

/// Per-block complexity in source order; `None` on syntax errors
pub fn complexity_blocks(code: &str) -> Option<Vec<BlockComplexity>> {
    let tree = parse_python(code)?;
    let root = tree.root_node();
    if root.has_error() {
        return None;
    }

    let mut blocks = Vec::new();
    collect_blocks(root, code, &mut blocks);
    Some(blocks)
}

/// Pending step of the block walk
enum Work<'t> {
    Visit { node: Node<'t>, in_class: bool },
    FinishClass { index: usize, first_nested: usize, body: Node<'t> },
}

/// Push `node`'s named children so they pop in source order
fn push_children<'t>(stack: &mut Vec<Work<'t>>, node: Node<'t>, in_class: bool) {
    stack.extend(
        named_children(node)
            .into_iter()
            .rev()
            .map(|node| Work::Visit { node, in_class }),
    );
}

/// Find definitions under `node`, not descending into the definitions themselves.
///
/// Blocks come out in source order. The walk keeps its own stack so deeply
/// nested input cannot exhaust the thread's stack.
fn collect_blocks(node: Node, src: &str, out: &mut Vec<BlockComplexity>) {
    let mut stack = Vec::new();
    push_children(&mut stack, node, false);

    while let Some(work) = stack.pop() {
        match work {
            Work::Visit { node, in_class } => match node.kind() {
                "function_definition" => {
                    out.push(BlockComplexity {
                        name: definition_name(node, src),
                        kind: if in_class {
                            BlockKind::Method
                        } else {
                            BlockKind::Function
                        },
                        line: line_of(node),
                        complexity: 1 + node
                            .child_by_field_name("body")
                            .map(decision_points)
                            .unwrap_or(0),
                    });
                    if let Some(body) = node.child_by_field_name("body") {
                        push_children(&mut stack, body, false);
                    }
                }
                "class_definition" => {
                    let index = out.len();
                    out.push(BlockComplexity {
                        name: definition_name(node, src),
                        kind: BlockKind::Class,
                        line: line_of(node),
                        complexity: 1,
                    });
                    if let Some(body) = node.child_by_field_name("body") {
                        stack.push(Work::FinishClass {
                            index,
                            first_nested: index + 1,
                            body,
                        });
                        push_children(&mut stack, body, true);
                    }
                }
                _ => push_children(&mut stack, node, in_class),
            },
            Work::FinishClass {
                index,
                first_nested,
                body,
            } => {
                out[index].complexity = class_score(&out[first_nested..], body);
            }
        }
    }
}

fn definition_name(node: Node, src: &str) -> String {
    node.child_by_field_name("name")
        .map(|n| node_text(n, src).to_string())
        .unwrap_or_default()
}

/// Rounded-up mean of the methods in `nested`, or 1 plus the body's decision points
fn class_score(nested: &[BlockComplexity], body: Node) -> u32 {
    // Methods of nested classes are also in this range and count too.
    let method_scores: Vec<u32> = nested
        .iter()
        .filter(|b| b.kind == BlockKind::Method)
        .map(|b| b.complexity)
        .collect();

    if method_scores.is_empty() {
        1 + decision_points(body)
    } else {
        let total: u32 = method_scores.iter().sum();
        total.div_ceil(method_scores.len() as u32)
    }
}

/// Decision points under `node`, skipping nested definitions
fn decision_points(node: Node) -> u32 {
    let mut total = 0;
    let mut stack = named_children(node);
    while let Some(child) = stack.pop() {
        total += match child.kind() {
            "function_definition" | "class_definition" => continue,
            "if_statement" | "elif_clause" | "conditional_expression" | "with_statement"
            | "assert_statement" | "boolean_operator" | "for_in_clause" | "if_clause"
            | "case_clause" | "except_clause" | "except_group_clause" => 1,
            "for_statement" | "while_statement" => 1 + has_child(child, "else_clause") as u32,
            "try_statement" => has_child(child, "else_clause") as u32,
            _ => 0,
        };
        stack.extend(named_children(child));
    }
    total
}

fn has_child(node: Node, kind: &str) -> bool {
    named_children(node).iter().any(|c| c.kind() == kind)
}
