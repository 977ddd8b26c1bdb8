use std::io::{self, Write};

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use super::{id::NodeId, router::Router, world::Core};
use crate::{
    error::{Error, Result},
    geom::BoundingBox,
};

/// Render a subtree as indented text showing each node's name, box, clip
/// region and router roles. This is a debug function.
pub fn dump(core: &Core, root: NodeId) -> Result<String> {
    if !core.nodes.contains_key(root) {
        return Err(Error::NodeNotFound(root));
    }
    let mut buffer = Buffer::no_color();
    dump_node(&mut buffer, core, root, 0).map_err(|e| Error::Internal(e.to_string()))?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Like [`dump`], with ANSI colors for terminals.
pub fn dump_ansi(core: &Core, root: NodeId) -> Result<String> {
    if !core.nodes.contains_key(root) {
        return Err(Error::NodeNotFound(root));
    }
    let mut buffer = Buffer::ansi();
    dump_node(&mut buffer, core, root, 0).map_err(|e| Error::Internal(e.to_string()))?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Format a box compactly.
fn fmt_box(b: &BoundingBox) -> String {
    format!("{},{} {}x{}", b.x, b.y, b.width, b.height)
}

/// Write an indented, colored label followed by a value.
fn write_field(buffer: &mut Buffer, indent: &str, label: &str, value: &str) -> io::Result<()> {
    write!(buffer, "{indent}  ")?;
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(buffer, "{label}")?;
    buffer.reset()?;
    writeln!(buffer, " {value}")
}

/// Walk a node subtree and emit formatted debug output.
fn dump_node(buffer: &mut Buffer, core: &Core, node_id: NodeId, level: usize) -> io::Result<()> {
    let Some(node) = core.nodes.get(node_id) else {
        return Ok(());
    };
    let indent = "    ".repeat(level);

    write!(buffer, "{indent}")?;
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    write!(buffer, "{}", node.name)?;
    buffer.reset()?;
    write!(buffer, " {node_id:?}")?;

    let mut indicators = Vec::new();
    if core.focus_id() == Some(node_id) {
        indicators.push(("focus", Color::Magenta));
    }
    if core.hover_id() == Some(node_id) {
        indicators.push(("hover", Color::Blue));
    }
    if core.drag_id() == Some(node_id) {
        indicators.push(("drag", Color::Red));
    }
    if node.hidden {
        indicators.push(("hidden", Color::Yellow));
    }
    if !node.rendering {
        indicators.push(("not rendering", Color::Yellow));
    }
    for (i, (indicator, color)) in indicators.iter().enumerate() {
        write!(buffer, "{}", if i == 0 { " " } else { ", " })?;
        buffer.set_color(ColorSpec::new().set_fg(Some(*color)))?;
        write!(buffer, "{indicator}")?;
        buffer.reset()?;
    }
    writeln!(buffer)?;

    write_field(buffer, &indent, "box:", &fmt_box(&node.bbox))?;
    if node.clip != node.bbox {
        write_field(buffer, &indent, "clip:", &fmt_box(&node.clip))?;
    }

    if !node.hidden {
        for child in &node.children {
            dump_node(buffer, core, *child, level + 1)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{testing::Harness, widgets::Frame};

    #[test]
    fn shows_names_boxes_and_roles() {
        let mut h = Harness::new();
        let shown = h.add(Frame::new().fixed(50.0, 40.0)).unwrap();
        let hidden = h.add(Frame::new().fixed(10.0, 10.0)).unwrap();
        h.core_mut().set_hidden(hidden, true);
        h.move_to(10.0, 10.0).unwrap();

        let out = dump(h.core(), h.core().root_id()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("window "));
        assert_eq!(lines[1], "  box: 0,0 400x300");
        assert!(lines.contains(&"          box: 0,0 50x40"));
        let frames: Vec<&&str> = lines.iter().filter(|l| l.starts_with("        frame ")).collect();
        assert_eq!(frames.len(), 2);
        assert!(frames[0].ends_with("hover"));
        assert!(frames[1].ends_with("hidden, not rendering"));
        assert!(lines.iter().any(|l| l.starts_with("    overlay_layer ")));
        assert!(!out.contains('\u{1b}'));

        let content = h.core().content_id();
        h.core_mut().remove_subtree(shown).unwrap();
        assert!(dump(h.core(), shown.into()).is_err());
        assert!(dump_ansi(h.core(), content).unwrap().contains('\u{1b}'));
    }
}
