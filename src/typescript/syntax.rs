//! TSX syntax trees for container sources.
//!
//! Files are often mid-edit, so input cut off by the end of the file is
//! completed before parsing: every bracket, brace or template literal still
//! open at the end gets its closer appended. Nodes ending past the original
//! input are the ones that were cut off.
use tree_sitter::{Node, Parser, Tree};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unable to load the TSX grammar: {0}")]
    Language(String),
    #[error("the TSX parser gave up on the source")]
    Parse,
}

fn parse_tsx(text: &str) -> Result<Tree, Error> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_typescript::LANGUAGE_TSX.into())
        .map_err(|error| Error::Language(error.to_string()))?;
    parser.parse(text, None).ok_or(Error::Parse)
}

/// Closers for everything left open at the end of `root`, innermost first.
///
/// Only leaves are looked at. String, comment, regex and JSX text contents are
/// single leaves, so brackets inside them never count. Inside a template
/// literal only `${` and the closing backtick matter.
fn missing_closers(root: Node<'_>) -> String {
    let mut open: Vec<&'static str> = Vec::new();
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.child_count() == 0 && !node.is_missing() {
            match (open.last().copied(), node.kind()) {
                (Some("`"), "`") => {
                    open.pop();
                }
                (Some("`"), "${") => open.push("}"),
                (Some("`"), _) => {}
                (_, "`") => open.push("`"),
                (_, "(") => open.push(")"),
                (_, "[") => open.push("]"),
                (_, "{") | (_, "${") => open.push("}"),
                (Some(expected), kind) if expected == kind => {
                    open.pop();
                }
                _ => {}
            }
        }
        if cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return open.iter().rev().copied().collect();
            }
        }
    }
}

/// A source file and its syntax tree. Offsets are bytes into the source.
pub struct SourceDocument<'a> {
    source: &'a str,
    text: String,
    tree: Tree,
}

impl<'a> SourceDocument<'a> {
    pub fn parse(source: &'a str) -> Result<Self, Error> {
        let tree = parse_tsx(source)?;
        let closers = if tree.root_node().has_error() {
            missing_closers(tree.root_node())
        } else {
            String::new()
        };
        if closers.is_empty() {
            return Ok(SourceDocument {
                source,
                text: source.to_string(),
                tree,
            });
        }
        tracing::debug!(%closers, "completing source cut off by end of input");
        let text = format!("{source}{closers}");
        let tree = parse_tsx(&text)?;
        Ok(SourceDocument { source, text, tree })
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Text of `node`, clipped to the source as given.
    pub fn text(&self, node: Node<'_>) -> &str {
        self.slice(node.start_byte(), node.end_byte())
    }

    pub fn slice(&self, start: usize, end: usize) -> &str {
        let end = end.min(self.source.len());
        self.text.get(start.min(end)..end).unwrap_or_default()
    }

    /// Whether `node` ends in a closer that the source does not contain.
    pub fn is_cut_off(&self, node: Node<'_>) -> bool {
        node.end_byte() > self.source.len()
            || node
                .child(node.child_count().saturating_sub(1))
                .map_or(false, |last| last.is_missing())
    }
}

/// Named children of `node` other than comments.
pub fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let children = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect();
    children
}

/// Every node under `node`, including `node` itself, in source order.
pub fn descendants(node: Node<'_>) -> Vec<Node<'_>> {
    let mut found = Vec::new();
    let mut cursor = node.walk();
    loop {
        found.push(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.node() == node {
                return found;
            }
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return found;
            }
        }
    }
}
