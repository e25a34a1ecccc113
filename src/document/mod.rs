//! The in-memory block model.
//!
//! A document is an ordered sequence of typed blocks. Every block carries an
//! opaque id (never serialized into the document tree), its text, and a set
//! of formatting flags. A document always holds at least one block; empty
//! input is seeded with a single empty paragraph.

mod tree;

pub use tree::{deserialize, from_tree, serialize, to_json, DocumentTree};

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeadingLevel::H1 => write!(f, "h1"),
            HeadingLevel::H2 => write!(f, "h2"),
            HeadingLevel::H3 => write!(f, "h3"),
        }
    }
}

impl std::str::FromStr for HeadingLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "h1" => Ok(HeadingLevel::H1),
            "h2" => Ok(HeadingLevel::H2),
            "h3" => Ok(HeadingLevel::H3),
            _ => Err(format!("Invalid heading level: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Number,
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListKind::Bullet => write!(f, "bullet"),
            ListKind::Number => write!(f, "number"),
        }
    }
}

impl std::str::FromStr for ListKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bullet" | "ul" => Ok(ListKind::Bullet),
            "number" | "ol" => Ok(ListKind::Number),
            _ => Err(format!("Invalid list kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alignment::Left => write!(f, "left"),
            Alignment::Center => write!(f, "center"),
            Alignment::Right => write!(f, "right"),
        }
    }
}

impl std::str::FromStr for Alignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" => Ok(Alignment::Left),
            "center" => Ok(Alignment::Center),
            "right" => Ok(Alignment::Right),
            _ => Err(format!("Invalid alignment: {}", s)),
        }
    }
}

/// Character-level format flags a toolbar can toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Bold,
    Italic,
    Underline,
    Strikethrough,
}

impl std::str::FromStr for TextFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bold" => Ok(TextFormat::Bold),
            "italic" => Ok(TextFormat::Italic),
            "underline" => Ok(TextFormat::Underline),
            "strikethrough" | "strike" => Ok(TextFormat::Strikethrough),
            _ => Err(format!("Invalid text format: {}", s)),
        }
    }
}

/// What kind of block this is, with the kind-specific payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Heading(HeadingLevel),
    ListItem(ListKind),
    Quote,
    Code,
}

/// Formatting flags attached to a block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockFormats {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub alignment: Alignment,
    pub indent: u32,
    pub link: bool,
}

impl BlockFormats {
    pub fn flag(&self, format: TextFormat) -> bool {
        match format {
            TextFormat::Bold => self.bold,
            TextFormat::Italic => self.italic,
            TextFormat::Underline => self.underline,
            TextFormat::Strikethrough => self.strikethrough,
        }
    }

    pub fn toggle(&mut self, format: TextFormat) {
        match format {
            TextFormat::Bold => self.bold = !self.bold,
            TextFormat::Italic => self.italic = !self.italic,
            TextFormat::Underline => self.underline = !self.underline,
            TextFormat::Strikethrough => self.strikethrough = !self.strikethrough,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: Uuid,
    pub kind: BlockKind,
    pub text: String,
    pub formats: BlockFormats,
}

impl Block {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph, text)
    }

    pub fn new(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            text: text.into(),
            formats: BlockFormats::default(),
        }
    }
}

/// Ordered block sequence. Always holds at least one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// A document with a single empty paragraph.
    pub fn empty() -> Self {
        Self {
            blocks: vec![Block::paragraph("")],
        }
    }

    /// Build from a block list, seeding one empty paragraph when it is empty.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            Self::empty()
        } else {
            Self { blocks }
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.blocks.get_mut(index)
    }

    /// Append a block and return its index.
    pub fn push(&mut self, block: Block) -> usize {
        self.blocks.push(block);
        self.blocks.len() - 1
    }

    /// Concatenated block text, one line per block. Used for plain previews.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            if !block.text.is_empty() {
                out.push_str(&block.text);
                out.push('\n');
            }
        }
        out.trim_end().to_string()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}
