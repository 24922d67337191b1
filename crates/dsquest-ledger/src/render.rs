//! Plain-text views of the world map and node card.

use std::fmt::Write;

use crate::error::LedgerError;
use crate::model::{Node, SubmitResponse, WorldMap};

/// Shown while the first map request is in flight.
pub const LOADING_TEXT: &str = "Loading Adventure...";

/// Header line: the map title plus the current chapter badge.
pub fn render_header(map: Option<&WorldMap>, in_level: bool) -> String {
    let chapter = map.map(WorldMap::chapter_number).unwrap_or(1);
    let left = if in_level { "◂ Map" } else { "🗺️ Adventure Map" };
    format!("{left}    [Chapter {chapter}]")
}

/// The world map: chapter banners, then one line per node with its status glyph.
pub fn render_map(map: &WorldMap) -> String {
    let mut out = render_header(Some(map), false);
    out.push_str("\n\n");

    for chapter in &map.chapters {
        let _ = writeln!(out, "== {} ==", chapter.title.to_uppercase());
        for zone in &chapter.zones {
            let _ = writeln!(out, "  {}", zone.title);
            for node in &zone.nodes {
                let _ = writeln!(out, "    {} {} ({})", node.status.glyph(), node.title, node.kind);
            }
        }
        out.push('\n');
    }

    out.push_str("✨ More adventures coming soon...\n");
    out
}

/// The node card: title, kind, body text, quiz options and the submit label.
pub fn render_node(node: &Node) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}", node.title());
    let _ = writeln!(out, "[{}]", node.kind());
    out.push('\n');

    match node {
        Node::Lesson { content, .. } | Node::Complete { content, .. } => {
            let _ = writeln!(out, "{content}");
        }
        Node::Quiz {
            question, options, ..
        } => {
            let _ = writeln!(out, "{question}");
            out.push('\n');
            for (idx, option) in options.iter().enumerate() {
                let _ = writeln!(out, "  {idx}) {option}");
            }
        }
        Node::Challenge { description, .. } => {
            let _ = writeln!(out, "{description}");
        }
        Node::Unknown { .. } => {}
    }

    if !matches!(node, Node::Complete { .. }) {
        out.push('\n');
        let _ = writeln!(out, "[ {} ]", node.button_label());
    }
    out
}

/// The feedback toast after a submission, with program output on failure.
pub fn render_feedback(result: &SubmitResponse) -> String {
    if result.success {
        return format!("🎉 {}", result.message);
    }

    let mut out = format!("❌ {}", result.message);
    if let Some(stdout) = result.stdout.as_deref().filter(|s| !s.is_empty()) {
        let _ = write!(out, "\n\n{}", stdout.trim_end());
    }
    if let Some(error) = result.error.as_deref().filter(|s| !s.is_empty()) {
        let _ = write!(out, "\n\n{}", error.trim_end());
    }
    out
}

/// The toast for a request that failed outright.
pub fn render_request_error(err: &LedgerError) -> String {
    format!("❌ {}", err.toast())
}
