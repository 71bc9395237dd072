use std::fmt::{self, Write};

use crate::node::{Fragment, Node};

/// Write an indented dump of `node` and its descendants.
///
/// Elements print as `<type key=value ...>`, text as a quoted string with
/// newlines escaped and spaces shown as `·`.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_tree(out: &mut impl Write, node: &Node, indent: usize) -> fmt::Result {
    let mut stack = vec![(node, indent)];
    while let Some((node, depth)) = stack.pop() {
        let prefix = "  ".repeat(depth);
        match node {
            Node::Text(data) => {
                let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
                writeln!(out, "{prefix}\"{display}\"")?;
            }
            Node::Element(element) => {
                if element.props.is_empty() {
                    writeln!(out, "{prefix}<{}>", element.kind)?;
                } else {
                    let attrs: Vec<String> = element
                        .props
                        .iter()
                        .map(|(k, v)| format!("{k}={v}"))
                        .collect();
                    writeln!(out, "{prefix}<{} {}>", element.kind, attrs.join(" "))?;
                }
                stack.extend(element.children.iter().rev().map(|child| (child, depth + 1)));
            }
        }
    }
    Ok(())
}

/// Print every top-level node of `fragment` to stdout.
pub fn print_tree(fragment: &Fragment) {
    let mut out = String::new();
    for node in fragment.nodes() {
        if write_tree(&mut out, node, 0).is_err() {
            return;
        }
    }
    print!("{out}");
}
