//! Snapshot helpers: plain-text renderings of trees and frames.
//!
//! Both helpers produce deterministic strings for `insta` snapshots and
//! plain assertions: one line per node (or pixel row), rows right-trimmed,
//! joined with `'\n'`.

use std::fmt::Write;

use crate::color::Color;
use crate::gadget::{GadgetId, NodeKind, SceneTree};
use crate::geometry::Point;
use crate::render::PixelBuffer;
use crate::window::Window;

/// Describe the subtree at `root`, two spaces of indent per level.
///
/// Each line reads `name [kind] WxH @ x,y`, followed by the layout manager's
/// name for widgets.
pub fn dump_tree(tree: &SceneTree, root: GadgetId) -> String {
    let mut out = String::new();
    let mut stack = vec![(root, 0usize)];
    while let Some((id, depth)) = stack.pop() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        let kind = match node.kind() {
            NodeKind::Gadget => "gadget",
            NodeKind::Singlet => "singlet",
            NodeKind::Widget => "widget",
            NodeKind::Screen { .. } => "screen",
        };
        let clip = node.metrics().clip_rect().size;
        let at = node.metrics().draw_location();
        let _ = write!(
            out,
            "{:indent$}{} [{kind}] {}x{} @ {},{}",
            "",
            node.name(),
            clip.width,
            clip.height,
            at.x,
            at.y,
            indent = depth * 2
        );
        if let Some(layout) = node.layout_manager() {
            let _ = write!(out, " {}", layout.name());
        }
        out.push('\n');
        for &child in node.children().iter().rev() {
            stack.push((child, depth + 1));
        }
    }
    out.trim_end().to_owned()
}

/// [`dump_tree`] for every screen of `window`, in drawing order.
pub fn dump_window(window: &Window) -> String {
    window
        .screens()
        .iter()
        .map(|&screen| dump_tree(window.tree(), screen))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a frame as characters. Pixels matching a `legend` color use its
/// character; any other pixel is `'?'`.
pub fn frame_to_ascii(frame: &PixelBuffer, legend: &[(Color, char)]) -> String {
    let size = frame.size();
    let mut lines = Vec::with_capacity(size.height as usize);
    for y in 0..size.height {
        let row: String = (0..size.width)
            .map(|x| {
                let color = frame.get(Point::new(x, y)).unwrap_or(Color::TRANSPARENT);
                legend
                    .iter()
                    .find(|(c, _)| *c == color)
                    .map_or('?', |&(_, ch)| ch)
            })
            .collect();
        lines.push(row.trim_end().to_owned());
    }
    lines.join("\n")
}
