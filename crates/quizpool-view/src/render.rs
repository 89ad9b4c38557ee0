//! Tree renderer.
//!
//! Builds the on-screen view model from a composed quiz tree: a nested
//! item list (one control per exercise, one header per pool, indented by
//! depth) and a frame set (one display frame per exercise, addressed by the
//! exercise path). Rendering happens once per session; afterwards the view
//! only changes through the result bridge and frame visibility switches.

use std::collections::HashMap;

use quizpool_core::model::Node;

/// Pixels of indentation per tree level.
pub const INDENT_STEP_PX: usize = 24;

/// Visual scoring state of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Styling {
    /// No result reported yet.
    Unscored,
    /// Latest result reached at least half of the max score.
    Pass,
    /// Latest result fell below half of the max score.
    Fail,
}

/// The interactive control for one exercise leaf.
#[derive(Debug, Clone)]
pub struct Control {
    /// Path of the exercise; the key correlating frame messages to this control.
    pub path: String,
    /// Short exercise name.
    pub name: String,
    /// Tree depth, for indentation.
    pub depth: usize,
    /// Current display label (name, plus the score pair once reported).
    pub label: String,
    /// Current pass/fail styling.
    pub styling: Styling,
}

/// The non-interactive grouping header for one pool.
#[derive(Debug, Clone)]
pub struct PoolLabel {
    pub path: String,
    pub title: String,
    pub depth: usize,
}

/// One row of the rendered list.
#[derive(Debug, Clone)]
pub enum ListEntry {
    Header(PoolLabel),
    Control(Control),
}

impl ListEntry {
    pub fn path(&self) -> &str {
        match self {
            ListEntry::Header(h) => &h.path,
            ListEntry::Control(c) => &c.path,
        }
    }

    /// Indentation in pixels, proportional to tree depth.
    pub fn indent_px(&self) -> usize {
        let depth = match self {
            ListEntry::Header(h) => h.depth,
            ListEntry::Control(c) => c.depth,
        };
        depth * INDENT_STEP_PX
    }
}

/// The rendered nested list, with controls addressable by path.
#[derive(Debug)]
pub struct ListView {
    entries: Vec<ListEntry>,
    controls: HashMap<String, usize>,
}

impl ListView {
    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    pub fn control(&self, path: &str) -> Option<&Control> {
        self.controls.get(path).map(|&i| match &self.entries[i] {
            ListEntry::Control(c) => c,
            ListEntry::Header(_) => unreachable!("controls index points at a header"),
        })
    }

    pub(crate) fn control_mut(&mut self, path: &str) -> Option<&mut Control> {
        let &i = self.controls.get(path)?;
        match &mut self.entries[i] {
            ListEntry::Control(c) => Some(c),
            ListEntry::Header(_) => unreachable!("controls index points at a header"),
        }
    }
}

/// One display frame, addressed by the exercise path.
#[derive(Debug, Clone)]
pub struct Frame {
    pub path: String,
    pub url: String,
    pub visible: bool,
}

/// All display frames. Visibility is exclusive system-wide: at most one
/// frame is visible at a time.
#[derive(Debug)]
pub struct FrameSet {
    frames: Vec<Frame>,
    index: HashMap<String, usize>,
}

impl FrameSet {
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The currently visible frame, if any.
    pub fn visible(&self) -> Option<&Frame> {
        self.frames.iter().find(|f| f.visible)
    }

    /// Make the frame for `path` visible and hide all others.
    ///
    /// A pure visibility transition with no effect on scores. Returns false
    /// (changing nothing) when no frame exists for the path.
    pub fn show(&mut self, path: &str) -> bool {
        let Some(&target) = self.index.get(path) else {
            return false;
        };
        for (i, frame) in self.frames.iter_mut().enumerate() {
            frame.visible = i == target;
        }
        true
    }
}

/// Render the composed tree into the item list and frame set.
///
/// Frame URLs are `<frame_base>/<path>`; the first leaf's frame starts
/// visible so the view is never blank.
pub fn render(root: &Node, frame_base: &str) -> (ListView, FrameSet) {
    let base = frame_base.trim_end_matches('/');

    let mut entries = Vec::new();
    let mut controls = HashMap::new();
    let mut frames = Vec::new();
    let mut frame_index = HashMap::new();

    for (node, depth) in root.traverse() {
        match node {
            Node::Pool(_) => entries.push(ListEntry::Header(PoolLabel {
                path: node.path().to_string(),
                title: node.label().to_string(),
                depth,
            })),
            Node::Exercise(e) => {
                controls.insert(e.path.clone(), entries.len());
                entries.push(ListEntry::Control(Control {
                    path: e.path.clone(),
                    name: e.name.clone(),
                    depth,
                    label: e.name.clone(),
                    styling: Styling::Unscored,
                }));
                frame_index.insert(e.path.clone(), frames.len());
                frames.push(Frame {
                    path: e.path.clone(),
                    url: format!("{base}/{}", e.path),
                    visible: frames.is_empty(),
                });
            }
        }
    }

    (
        ListView { entries, controls },
        FrameSet {
            frames,
            index: frame_index,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizpool_core::compose::compose;
    use quizpool_core::parser::parse_quiz_str;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::Path;

    fn tree(toml: &str) -> Node {
        let raw = parse_quiz_str(toml, Path::new("quiz.toml")).unwrap();
        compose(&raw, &mut StdRng::seed_from_u64(0)).unwrap()
    }

    const NESTED: &str = r#"
title = "Q"

[[items]]
type = "exercise"
name = "A"

[[items]]
type = "pool"
title = "Sub"

[[items.items]]
type = "exercise"
name = "B"
"#;

    #[test]
    fn renders_headers_and_controls_with_depth() {
        let (list, _) = render(&tree(NESTED), "http://localhost:8866");
        let rows: Vec<(&str, usize)> = list
            .entries()
            .iter()
            .map(|e| (e.path(), e.indent_px()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Q", 0),
                ("Q/A", INDENT_STEP_PX),
                ("Q/Sub", INDENT_STEP_PX),
                ("Q/Sub/B", 2 * INDENT_STEP_PX),
            ]
        );
        assert!(list.control("Q/A").is_some());
        assert!(list.control("Q/Sub").is_none(), "pools get no control");
    }

    #[test]
    fn control_starts_unscored_with_name_label() {
        let (list, _) = render(&tree(NESTED), "http://localhost:8866");
        let control = list.control("Q/A").unwrap();
        assert_eq!(control.label, "A");
        assert_eq!(control.styling, Styling::Unscored);
    }

    #[test]
    fn one_frame_per_leaf_with_base_url() {
        let (_, frames) = render(&tree(NESTED), "http://localhost:8866/");
        let urls: Vec<&str> = frames.frames().iter().map(|f| f.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["http://localhost:8866/Q/A", "http://localhost:8866/Q/Sub/B"]
        );
    }

    #[test]
    fn first_frame_visible_by_default() {
        let (_, frames) = render(&tree(NESTED), "http://x");
        assert_eq!(frames.visible().unwrap().path, "Q/A");
        assert_eq!(frames.frames().iter().filter(|f| f.visible).count(), 1);
    }

    #[test]
    fn show_is_exclusive_system_wide() {
        let (_, mut frames) = render(&tree(NESTED), "http://x");
        assert!(frames.show("Q/Sub/B"));
        assert_eq!(frames.visible().unwrap().path, "Q/Sub/B");
        assert_eq!(frames.frames().iter().filter(|f| f.visible).count(), 1);
    }

    #[test]
    fn show_unknown_path_changes_nothing() {
        let (_, mut frames) = render(&tree(NESTED), "http://x");
        assert!(!frames.show("Q/Nope"));
        assert_eq!(frames.visible().unwrap().path, "Q/A");
    }
}
