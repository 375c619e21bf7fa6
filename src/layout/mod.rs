//! Flex layout of a concrete node tree
//!
//! The flexbox algorithm itself is external. [`LayoutEngine`] is the seam it
//! is consumed through; [`TaffyEngine`] is the shipped implementation.

mod flex_engine;

pub use flex_engine::TaffyEngine;

use thiserror::Error;

use crate::materialize::{ConcreteId, ConcreteTree};
use crate::style::{Direction, Style};

/// Errors reported by a layout engine
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    /// Failure inside the engine
    #[error("layout engine error: {0}")]
    Engine(String),

    /// A geometry was requested for a node the engine does not know
    #[error("no layout node for concrete node {0}")]
    UnknownNode(usize),
}

/// Post-layout box of a node, relative to its parent
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Setter/getter interface of an external flex engine
pub trait LayoutEngine {
    type Node: Copy;

    /// Drop every node created so far
    fn clear(&mut self);

    fn create_node(&mut self, style: &Style) -> Result<Self::Node, LayoutError>;

    /// Append `child` after the existing children of `parent`
    fn append_child(&mut self, parent: Self::Node, child: Self::Node) -> Result<(), LayoutError>;

    /// Lay out the subtree under `root`; `NaN` maximums are unbounded
    fn calculate_layout(
        &mut self,
        root: Self::Node,
        max_width: f32,
        max_height: f32,
        direction: Direction,
    ) -> Result<(), LayoutError>;

    fn geometry(&self, node: Self::Node) -> Result<Geometry, LayoutError>;
}

/// Geometry of every node of a laid-out concrete tree
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutMap {
    boxes: Vec<Geometry>,
}

impl LayoutMap {
    pub fn get(&self, id: ConcreteId) -> Option<Geometry> {
        self.boxes.get(id.0).copied()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

/// Mirror a concrete tree into `engine`, lay it out and read back every box
pub fn compute_layout<E: LayoutEngine>(
    engine: &mut E,
    tree: &ConcreteTree,
    max_width: f32,
    max_height: f32,
    direction: Direction,
) -> Result<LayoutMap, LayoutError> {
    engine.clear();

    // Arena order puts every parent before its children
    let mut handles = Vec::with_capacity(tree.len());
    for (_, node) in tree.iter() {
        handles.push(engine.create_node(&node.style)?);
    }
    for (id, node) in tree.iter() {
        for child in &node.children {
            let child_handle = handles
                .get(child.0)
                .copied()
                .ok_or(LayoutError::UnknownNode(child.0))?;
            engine.append_child(handles[id.0], child_handle)?;
        }
    }

    let root = handles
        .get(tree.root().0)
        .copied()
        .ok_or(LayoutError::UnknownNode(tree.root().0))?;
    engine.calculate_layout(root, max_width, max_height, direction)?;

    let boxes = handles
        .iter()
        .map(|handle| engine.geometry(*handle))
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!("laid out {} nodes", boxes.len());
    Ok(LayoutMap { boxes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_markup;
    use crate::materialize::materialize;
    use crate::template::compile;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn lay_out(source: &str, max_width: f32, max_height: f32) -> (ConcreteTree, LayoutMap) {
        let root = parse_markup(source, 32).unwrap();
        let compiled = compile(&root, 32).unwrap();
        let tree = materialize(&compiled.tree, &IndexMap::new(), 32).unwrap();
        let mut engine = TaffyEngine::new();
        let layout = compute_layout(&mut engine, &tree, max_width, max_height, Direction::Ltr).unwrap();
        (tree, layout)
    }

    fn boxes(tree: &ConcreteTree, layout: &LayoutMap) -> Vec<(f32, f32, f32, f32)> {
        tree.iter()
            .map(|(id, _)| {
                let g = layout.get(id).unwrap();
                (g.left, g.top, g.width, g.height)
            })
            .collect()
    }

    #[test]
    fn test_row_with_fixed_children() {
        let (tree, layout) = lay_out(
            r#"<root width="300px" height="100px" flex-direction="row">
                <a width="100px"/>
                <b width="50px" height="20px"/>
            </root>"#,
            f32::NAN,
            f32::NAN,
        );
        assert_eq!(
            boxes(&tree, &layout),
            vec![
                (0.0, 0.0, 300.0, 100.0),
                (0.0, 0.0, 100.0, 100.0),
                (100.0, 0.0, 50.0, 20.0),
            ]
        );
    }

    #[test]
    fn test_column_default_with_padding_and_margin() {
        let (tree, layout) = lay_out(
            r#"<root width="200px" height="200px" padding="10px">
                <a height="30px" margin-top="5px"/>
                <b height="40px"/>
            </root>"#,
            f32::NAN,
            f32::NAN,
        );
        assert_eq!(
            boxes(&tree, &layout),
            vec![
                (0.0, 0.0, 200.0, 200.0),
                (10.0, 15.0, 180.0, 30.0),
                (10.0, 45.0, 180.0, 40.0),
            ]
        );
    }

    #[test]
    fn test_flex_grow_and_percent() {
        let (tree, layout) = lay_out(
            r#"<root width="400px" height="50px" flex-direction="row">
                <a width="25%"/>
                <b flex-grow="1"/>
                <c flex="1"/>
            </root>"#,
            f32::NAN,
            f32::NAN,
        );
        let widths: Vec<f32> = tree.iter().map(|(id, _)| layout.get(id).unwrap().width).collect();
        assert_eq!(widths, vec![400.0, 100.0, 150.0, 150.0]);
    }

    #[test]
    fn test_display_none_collapses() {
        let (tree, layout) = lay_out(
            r#"<root width="100px" height="100px"><a height="10px" display="none"/><b height="10px"/></root>"#,
            f32::NAN,
            f32::NAN,
        );
        let b = tree[tree.root()].children[1];
        assert_eq!(layout.get(b).unwrap().top, 0.0);
    }
}
