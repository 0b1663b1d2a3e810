//! Java ingress
//!
//! Parses an existing test class with tree-sitter and lifts it into a
//! [`TestClass`]. Anything the model cannot vouch for (syntax errors, a
//! missing class declaration) is reported as a corrupt artifact rather than
//! merged partially.

use std::path::Path;

use crate::error::ArtifactError;
use crate::method::body_fingerprint;
use crate::model::{Member, MemberKind, TestClass};

/// Parse `source` and extract the class named `class_name`
///
/// # Errors
/// - [`ArtifactError::Corrupt`] on syntax errors or if the class is absent
/// - [`ArtifactError::ParserInit`] if the Java grammar cannot be loaded
pub fn parse_test_class(
    source: &str,
    class_name: &str,
    path: &Path,
) -> Result<TestClass, ArtifactError> {
    let language: tree_sitter::Language = tree_sitter_java::LANGUAGE.into();
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| ArtifactError::ParserInit(e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ArtifactError::corrupt(path, "parser produced no syntax tree"))?;
    let root = tree.root_node();

    if root.has_error() {
        let at = first_error(root).map_or(root.start_position(), |n| n.start_position());
        return Err(ArtifactError::corrupt(
            path,
            format!("syntax error at {}:{}", at.row + 1, at.column + 1),
        ));
    }

    let class = find_class(root, source, class_name)
        .ok_or_else(|| ArtifactError::corrupt(path, format!("class {class_name} not found")))?;
    let body = class
        .child_by_field_name("body")
        .ok_or_else(|| ArtifactError::corrupt(path, format!("class {class_name} has no body")))?;

    // Body spans `{ ... }`; the preamble keeps the opening brace.
    let preamble = &source[..=body.start_byte()];
    let trailer = &source[body.end_byte()..];
    let members = collect_members(body, source);

    tracing::debug!(
        path = %path.display(),
        class = class_name,
        members = members.len(),
        "parsed existing test class"
    );

    Ok(TestClass::from_parts(class_name, preamble, members, trailer))
}

fn first_error(node: tree_sitter::Node<'_>) -> Option<tree_sitter::Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            if child.has_error() {
                if let Some(found) = first_error(child) {
                    return Some(found);
                }
            }
        }
    }
    None
}

fn find_class<'t>(
    root: tree_sitter::Node<'t>,
    source: &str,
    class_name: &str,
) -> Option<tree_sitter::Node<'t>> {
    for i in 0..root.named_child_count() {
        let Some(child) = root.named_child(i) else {
            continue;
        };
        if child.kind() != "class_declaration" {
            continue;
        }
        let name = child
            .child_by_field_name("name")
            .and_then(|n| n.utf8_text(source.as_bytes()).ok());
        if name == Some(class_name) {
            return Some(child);
        }
    }
    None
}

fn collect_members(body: tree_sitter::Node<'_>, source: &str) -> Vec<Member> {
    let mut members: Vec<Member> = Vec::new();
    // Comments attach to the member that follows them, unless they start on
    // the last row of the previous member.
    let mut pending_comment: Option<usize> = None;
    // (source start, last row) of the previous member
    let mut previous: Option<(usize, usize)> = None;

    for i in 0..body.named_child_count() {
        let Some(node) = body.named_child(i) else {
            continue;
        };

        let kind = match node.kind() {
            "line_comment" | "block_comment" => {
                match (previous, members.last_mut()) {
                    (Some((start, row)), Some(last))
                        if pending_comment.is_none() && row == node.start_position().row =>
                    {
                        last.set_source(&source[start..node.end_byte()]);
                        previous = Some((start, node.end_position().row));
                    }
                    _ => {
                        pending_comment.get_or_insert(node.start_byte());
                    }
                }
                continue;
            }
            "method_declaration" => MemberKind::Method,
            "constructor_declaration" => MemberKind::Constructor,
            _ => MemberKind::Other,
        };

        let start = pending_comment.take().unwrap_or(node.start_byte());
        let text = &source[start..node.end_byte()];

        let name = match kind {
            MemberKind::Method | MemberKind::Constructor => node
                .child_by_field_name("name")
                .and_then(|n| n.utf8_text(source.as_bytes()).ok())
                .map(str::to_string),
            _ => None,
        };

        let fingerprint = match kind {
            MemberKind::Method => node
                .child_by_field_name("body")
                .and_then(|b| b.utf8_text(source.as_bytes()).ok())
                .map(body_fingerprint),
            _ => None,
        };

        members.push(Member::new(kind, name, text, fingerprint));
        previous = Some((start, node.end_position().row));
    }

    if let Some(start) = pending_comment {
        let end = body.end_byte().saturating_sub(1);
        let text = source[start..end].trim_end();
        members.push(Member::new(MemberKind::Comment, None, text, None));
    }

    members
}
