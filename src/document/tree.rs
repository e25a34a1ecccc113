//! Conversion between the block model and the document tree.
//!
//! The document tree is the nested JSON interchange shape
//! (`{root: {children: [...]}}`) that notes persist. Serialization is
//! type-driven; deserialization walks raw JSON defensively so malformed
//! input can never fail, only degrade to paragraphs.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::{Block, BlockKind, Document, HeadingLevel, ListKind};

#[derive(Debug, Serialize)]
pub struct DocumentTree {
    pub root: RootNode,
}

#[derive(Debug, Serialize)]
pub struct RootNode {
    pub children: Vec<ElementNode>,
    pub direction: &'static str,
    pub format: &'static str,
    pub indent: u32,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub version: u32,
}

#[derive(Debug, Serialize)]
pub struct ElementNode {
    pub direction: &'static str,
    pub format: &'static str,
    pub indent: u32,
    pub version: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub children: Vec<ChildNode>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ChildNode {
    Text(TextLeaf),
    ListItem(ListItemNode),
}

#[derive(Debug, Serialize)]
pub struct TextLeaf {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<&'static str>,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

impl TextLeaf {
    /// Leaf with the full field set, used under paragraphs and headings.
    fn full(text: &str) -> Self {
        Self {
            detail: Some(0),
            format: Some(0),
            mode: Some("normal"),
            style: Some(""),
            text: text.to_string(),
            kind: "text",
            version: Some(1),
        }
    }

    /// Bare `{text, type}` leaf, used under lists, quotes, and code.
    fn bare(text: &str) -> Self {
        Self {
            detail: None,
            format: None,
            mode: None,
            style: None,
            text: text.to_string(),
            kind: "text",
            version: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListItemNode {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub value: u32,
    pub children: Vec<TextLeaf>,
}

/// Encode a document as its JSON tree.
pub fn serialize(doc: &Document) -> DocumentTree {
    let children = doc.blocks().iter().map(element_for_block).collect();

    DocumentTree {
        root: RootNode {
            children,
            direction: "ltr",
            format: "",
            indent: 0,
            kind: "root",
            version: 1,
        },
    }
}

/// Encode a document straight to a JSON string.
pub fn to_json(doc: &Document) -> crate::Result<String> {
    Ok(serde_json::to_string(&serialize(doc))?)
}

fn element_for_block(block: &Block) -> ElementNode {
    let (kind, children) = match block.kind {
        BlockKind::Paragraph => (
            "paragraph".to_string(),
            vec![ChildNode::Text(TextLeaf::full(&block.text))],
        ),
        BlockKind::Heading(level) => (
            level.to_string(),
            vec![ChildNode::Text(TextLeaf::full(&block.text))],
        ),
        BlockKind::ListItem(list) => {
            let tag = match list {
                ListKind::Bullet => "ul",
                ListKind::Number => "ol",
            };
            (
                tag.to_string(),
                vec![ChildNode::ListItem(ListItemNode {
                    kind: "listitem",
                    value: 1,
                    children: vec![TextLeaf::bare(&block.text)],
                })],
            )
        }
        BlockKind::Quote => (
            "quote".to_string(),
            vec![ChildNode::Text(TextLeaf::bare(&block.text))],
        ),
        BlockKind::Code => (
            "code".to_string(),
            vec![ChildNode::Text(TextLeaf::bare(&block.text))],
        ),
    };

    ElementNode {
        direction: "ltr",
        format: "",
        indent: 0,
        version: 1,
        kind,
        children,
    }
}

/// Decode a JSON string into a document. Total: malformed input falls back
/// to a single empty paragraph and is logged, never surfaced.
pub fn deserialize(json: &str) -> Document {
    match serde_json::from_str::<Value>(json) {
        Ok(value) => from_tree(&value),
        Err(e) => {
            warn!(error = %e, "failed to parse document tree, falling back to empty document");
            Document::empty()
        }
    }
}

/// Decode an already-parsed JSON tree into a document.
///
/// Unknown or malformed node kinds become paragraphs with best-effort
/// extracted text. A missing or empty `root.children` yields the seeded
/// single-paragraph document.
pub fn from_tree(value: &Value) -> Document {
    let children = match value.pointer("/root/children").and_then(Value::as_array) {
        Some(children) => children,
        None => {
            warn!("document tree has no root children, falling back to empty document");
            return Document::empty();
        }
    };

    let blocks = children.iter().map(block_for_node).collect();
    Document::from_blocks(blocks)
}

fn block_for_node(node: &Value) -> Block {
    let kind = node.get("type").and_then(Value::as_str).unwrap_or("");

    match kind {
        "paragraph" => Block::paragraph(first_child_text(node)),
        "h1" => Block::new(BlockKind::Heading(HeadingLevel::H1), first_child_text(node)),
        "h2" => Block::new(BlockKind::Heading(HeadingLevel::H2), first_child_text(node)),
        "h3" => Block::new(BlockKind::Heading(HeadingLevel::H3), first_child_text(node)),
        "ul" => Block::new(BlockKind::ListItem(ListKind::Bullet), nested_text(node)),
        "ol" => Block::new(BlockKind::ListItem(ListKind::Number), nested_text(node)),
        "quote" => Block::new(BlockKind::Quote, first_child_text(node)),
        "code" => Block::new(BlockKind::Code, first_child_text(node)),
        // Unknown node kinds degrade to a paragraph.
        _ => Block::paragraph(extract_text(node)),
    }
}

fn first_child(node: &Value) -> Option<&Value> {
    node.get("children").and_then(Value::as_array)?.first()
}

/// Text of the node's first child, or empty.
fn first_child_text(node: &Value) -> String {
    first_child(node)
        .and_then(|child| child.get("text"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

/// Text behind one intermediate wrapper (the `listitem` level).
fn nested_text(node: &Value) -> String {
    first_child(node)
        .map(first_child_text)
        .unwrap_or_default()
}

/// Best-effort text for unknown shapes: the first child's text, descending
/// one wrapper level when the child has no text of its own.
fn extract_text(node: &Value) -> String {
    let Some(child) = first_child(node) else {
        return String::new();
    };
    match child.get("text").and_then(Value::as_str) {
        Some(text) => text.to_string(),
        None => first_child_text(child),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialize_heading() {
        let doc = Document::from_blocks(vec![Block::new(
            BlockKind::Heading(HeadingLevel::H2),
            "Title",
        )]);
        let tree = serde_json::to_value(serialize(&doc)).unwrap();

        let node = &tree["root"]["children"][0];
        assert_eq!(node["type"], "h2");
        assert_eq!(node["children"][0]["type"], "text");
        assert_eq!(node["children"][0]["text"], "Title");
    }

    #[test]
    fn test_serialize_list_item_wraps_listitem() {
        let doc = Document::from_blocks(vec![Block::new(
            BlockKind::ListItem(ListKind::Number),
            "first",
        )]);
        let tree = serde_json::to_value(serialize(&doc)).unwrap();

        let node = &tree["root"]["children"][0];
        assert_eq!(node["type"], "ol");
        assert_eq!(node["children"][0]["type"], "listitem");
        assert_eq!(node["children"][0]["children"][0]["text"], "first");
    }

    #[test]
    fn test_serialize_root_metadata() {
        let tree = serde_json::to_value(serialize(&Document::empty())).unwrap();
        assert_eq!(tree["root"]["type"], "root");
        assert_eq!(tree["root"]["direction"], "ltr");
        assert_eq!(tree["root"]["indent"], 0);
        assert_eq!(tree["root"]["version"], 1);
    }

    #[test]
    fn test_paragraph_leaf_carries_full_fields() {
        let doc = Document::from_blocks(vec![Block::paragraph("hi")]);
        let tree = serde_json::to_value(serialize(&doc)).unwrap();

        let leaf = &tree["root"]["children"][0]["children"][0];
        assert_eq!(leaf["mode"], "normal");
        assert_eq!(leaf["detail"], 0);
        assert_eq!(leaf["version"], 1);
    }

    #[test]
    fn test_code_leaf_is_bare() {
        let doc = Document::from_blocks(vec![Block::new(BlockKind::Code, "x = 1")]);
        let tree = serde_json::to_value(serialize(&doc)).unwrap();

        let leaf = &tree["root"]["children"][0]["children"][0];
        assert_eq!(leaf["text"], "x = 1");
        assert!(leaf.get("mode").is_none());
    }

    #[test]
    fn test_deserialize_bullet_list() {
        let json = r#"{"root":{"children":[{"type":"ul","children":[{"type":"listitem","children":[{"type":"text","text":"milk"}]}]}]}}"#;
        let doc = deserialize(json);

        assert_eq!(doc.len(), 1);
        assert_eq!(doc.blocks()[0].kind, BlockKind::ListItem(ListKind::Bullet));
        assert_eq!(doc.blocks()[0].text, "milk");
    }

    #[test]
    fn test_deserialize_malformed_json_never_fails() {
        for input in ["not json", "", "{", "[1,2,3", "{\"root\":"] {
            let doc = deserialize(input);
            assert_eq!(doc.len(), 1);
            assert_eq!(doc.blocks()[0].kind, BlockKind::Paragraph);
            assert_eq!(doc.blocks()[0].text, "");
        }
    }

    #[test]
    fn test_deserialize_missing_root_falls_back() {
        let doc = deserialize(r#"{"something":"else"}"#);
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.blocks()[0].kind, BlockKind::Paragraph);
    }

    #[test]
    fn test_deserialize_empty_children_seeds_paragraph() {
        let doc = deserialize(r#"{"root":{"children":[]}}"#);
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.blocks()[0].text, "");
    }

    #[test]
    fn test_unknown_node_kind_degrades_to_paragraph() {
        let tree = json!({"root":{"children":[
            {"type":"table","children":[{"type":"text","text":"cell"}]}
        ]}});
        let doc = from_tree(&tree);

        assert_eq!(doc.blocks()[0].kind, BlockKind::Paragraph);
        assert_eq!(doc.blocks()[0].text, "cell");
    }

    #[test]
    fn test_unknown_node_descends_one_wrapper() {
        let tree = json!({"root":{"children":[
            {"type":"mystery","children":[{"children":[{"text":"deep"}]}]}
        ]}});
        let doc = from_tree(&tree);
        assert_eq!(doc.blocks()[0].text, "deep");
    }

    #[test]
    fn test_round_trip_preserves_count_kind_text() {
        let doc = Document::from_blocks(vec![
            Block::new(BlockKind::Heading(HeadingLevel::H1), "Title"),
            Block::paragraph("body text"),
            Block::new(BlockKind::ListItem(ListKind::Bullet), "item"),
            Block::new(BlockKind::Quote, "wise words"),
            Block::new(BlockKind::Code, "fn main() {}"),
        ]);

        let round = deserialize(&to_json(&doc).unwrap());

        assert_eq!(round.len(), doc.len());
        for (a, b) in doc.blocks().iter().zip(round.blocks()) {
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.text, b.text);
        }
    }
}
