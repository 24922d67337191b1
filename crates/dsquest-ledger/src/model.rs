//! Wire types for the game backend.

use serde::{Deserialize, Serialize};

/// Progress of one map node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Locked,
    Unlocked,
    Completed,
}

impl NodeStatus {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Locked => "🔒",
            Self::Unlocked => "⭐",
            Self::Completed => "✅",
        }
    }
}

/// Kind of node as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Lesson,
    Quiz,
    Challenge,
    /// Sent by `/api/node` once every node is done.
    Complete,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Lesson => "lesson",
            Self::Quiz => "quiz",
            Self::Challenge => "challenge",
            Self::Complete => "complete",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapNode {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub status: NodeStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapZone {
    pub title: String,
    #[serde(default)]
    pub nodes: Vec<MapNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapChapter {
    pub title: String,
    #[serde(default)]
    pub zones: Vec<MapZone>,
}

/// Response of `GET /api/map`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldMap {
    #[serde(default)]
    pub chapters: Vec<MapChapter>,
    #[serde(default)]
    pub current_chapter_idx: usize,
    #[serde(default)]
    pub current_zone_idx: usize,
    #[serde(default)]
    pub current_node_idx: usize,
}

impl WorldMap {
    /// One-based chapter number for the header badge.
    pub fn chapter_number(&self) -> usize {
        self.current_chapter_idx + 1
    }

    /// The node the player can enter next, if any.
    pub fn current_node(&self) -> Option<&MapNode> {
        self.chapters
            .get(self.current_chapter_idx)?
            .zones
            .get(self.current_zone_idx)?
            .nodes
            .get(self.current_node_idx)
    }
}

/// `GET /api/node` body. Every payload field is optional on the wire.
#[derive(Debug, Clone, Deserialize)]
struct NodeWire {
    title: String,
    #[serde(rename = "type")]
    kind: NodeKind,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    options: Option<Vec<String>>,
    #[serde(default)]
    description: Option<String>,
}

/// The node the player is currently on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "NodeWire")]
pub enum Node {
    Lesson {
        title: String,
        content: String,
    },
    Quiz {
        title: String,
        question: String,
        options: Vec<String>,
    },
    Challenge {
        title: String,
        description: String,
    },
    Complete {
        title: String,
        content: String,
    },
    Unknown {
        title: String,
    },
}

impl From<NodeWire> for Node {
    fn from(wire: NodeWire) -> Self {
        let title = wire.title;
        match wire.kind {
            NodeKind::Lesson => Node::Lesson {
                title,
                content: wire.content.unwrap_or_default(),
            },
            NodeKind::Quiz => Node::Quiz {
                title,
                question: wire.question.unwrap_or_default(),
                options: wire.options.unwrap_or_default(),
            },
            NodeKind::Challenge => Node::Challenge {
                title,
                description: wire.description.unwrap_or_default(),
            },
            NodeKind::Complete => Node::Complete {
                title,
                content: wire.content.unwrap_or_default(),
            },
            NodeKind::Unknown => Node::Unknown { title },
        }
    }
}

impl Node {
    pub fn title(&self) -> &str {
        match self {
            Node::Lesson { title, .. }
            | Node::Quiz { title, .. }
            | Node::Challenge { title, .. }
            | Node::Complete { title, .. }
            | Node::Unknown { title } => title,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Lesson { .. } => NodeKind::Lesson,
            Node::Quiz { .. } => NodeKind::Quiz,
            Node::Challenge { .. } => NodeKind::Challenge,
            Node::Complete { .. } => NodeKind::Complete,
            Node::Unknown { .. } => NodeKind::Unknown,
        }
    }

    /// Label of the submit button for this node.
    pub fn button_label(&self) -> &'static str {
        match self {
            Node::Lesson { .. } => "Let's Go! ▸",
            Node::Quiz { .. } => "Check Answer!",
            Node::Challenge { .. } => "Run Code ⚡",
            Node::Complete { .. } | Node::Unknown { .. } => "Submit",
        }
    }
}

/// Body of `POST /api/submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Submission {
    /// Finish reading a lesson: `{}`.
    Continue {},
    Quiz { quiz_index: usize },
    Code { code: String },
}

impl Submission {
    pub fn quiz(index: usize) -> Self {
        Submission::Quiz { quiz_index: index }
    }

    pub fn code(code: impl Into<String>) -> Self {
        Submission::Code { code: code.into() }
    }
}

/// Response of `POST /api/submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub next_node_id: Option<String>,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
