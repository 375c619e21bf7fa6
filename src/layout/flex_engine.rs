//! Layout engine backed by taffy

use std::collections::HashSet;

use taffy::geometry::{Point, Rect, Size};
use taffy::style::{self as ts, AvailableSpace, LengthPercentage, LengthPercentageAuto};
use taffy::{NodeId, TaffyTree};

use super::{Geometry, LayoutEngine, LayoutError};
use crate::style::{
    Align, Dimension, Direction, Display, FlexDirection, FlexWrap, Justify, Overflow, Position,
    Style, Unit,
};

/// [`LayoutEngine`] over a taffy tree.
///
/// taffy has no right-to-left support, so `direction` is accepted and
/// ignored.
pub struct TaffyEngine {
    tree: TaffyTree<()>,
    /// Handles created since the last clear; taffy panics on stale ones
    live: HashSet<NodeId>,
}

impl Default for TaffyEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TaffyEngine {
    pub fn new() -> Self {
        Self {
            tree: TaffyTree::new(),
            live: HashSet::new(),
        }
    }

    fn check_live(&self, node: NodeId) -> Result<(), LayoutError> {
        if self.live.contains(&node) {
            Ok(())
        } else {
            Err(LayoutError::UnknownNode(usize::from(node)))
        }
    }
}

fn engine_error(e: taffy::TaffyError) -> LayoutError {
    LayoutError::Engine(e.to_string())
}

impl LayoutEngine for TaffyEngine {
    type Node = NodeId;

    fn clear(&mut self) {
        self.tree.clear();
        self.live.clear();
    }

    fn create_node(&mut self, style: &Style) -> Result<NodeId, LayoutError> {
        let node = self.tree.new_leaf(to_taffy_style(style)).map_err(engine_error)?;
        self.live.insert(node);
        Ok(node)
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), LayoutError> {
        self.check_live(parent)?;
        self.check_live(child)?;
        self.tree.add_child(parent, child).map_err(engine_error)
    }

    fn calculate_layout(
        &mut self,
        root: NodeId,
        max_width: f32,
        max_height: f32,
        direction: Direction,
    ) -> Result<(), LayoutError> {
        if direction == Direction::Rtl {
            log::trace!("right-to-left direction is laid out left-to-right");
        }
        self.check_live(root)?;
        let available = Size {
            width: available_space(max_width),
            height: available_space(max_height),
        };
        self.tree.compute_layout(root, available).map_err(engine_error)
    }

    fn geometry(&self, node: NodeId) -> Result<Geometry, LayoutError> {
        self.check_live(node)?;
        let layout = self.tree.layout(node).map_err(engine_error)?;
        Ok(Geometry {
            left: layout.location.x,
            top: layout.location.y,
            width: layout.size.width,
            height: layout.size.height,
        })
    }
}

fn available_space(max: f32) -> AvailableSpace {
    if max.is_finite() {
        AvailableSpace::Definite(max)
    } else {
        AvailableSpace::MaxContent
    }
}

pub(crate) fn to_taffy_style(style: &Style) -> ts::Style {
    let overflow = match style.overflow {
        Overflow::Visible => ts::Overflow::Visible,
        Overflow::Hidden => ts::Overflow::Hidden,
        Overflow::Scroll => ts::Overflow::Scroll,
    };

    ts::Style {
        display: match style.display {
            Display::Flex => ts::Display::Flex,
            Display::None => ts::Display::None,
        },
        position: match style.position {
            Position::Relative => ts::Position::Relative,
            Position::Absolute => ts::Position::Absolute,
        },
        overflow: Point {
            x: overflow,
            y: overflow,
        },
        flex_direction: match style.flex_direction {
            FlexDirection::Row => ts::FlexDirection::Row,
            FlexDirection::RowReverse => ts::FlexDirection::RowReverse,
            FlexDirection::Column => ts::FlexDirection::Column,
            FlexDirection::ColumnReverse => ts::FlexDirection::ColumnReverse,
        },
        flex_wrap: match style.flex_wrap {
            FlexWrap::NoWrap => ts::FlexWrap::NoWrap,
            FlexWrap::Wrap => ts::FlexWrap::Wrap,
            FlexWrap::WrapReverse => ts::FlexWrap::WrapReverse,
        },
        align_items: to_align_items(style.align_items),
        align_self: to_align_items(style.align_self),
        align_content: to_align_content(style.align_content),
        justify_content: to_justify_content(style.justify_content),
        flex_grow: style.resolved_flex_grow(),
        flex_shrink: style.resolved_flex_shrink(),
        flex_basis: to_dimension(style.flex_basis),
        size: Size {
            width: to_dimension(style.width),
            height: to_dimension(style.height),
        },
        min_size: Size {
            width: to_dimension(style.min_width),
            height: to_dimension(style.min_height),
        },
        max_size: Size {
            width: to_dimension(style.max_width),
            height: to_dimension(style.max_height),
        },
        margin: edges(&style.margin, to_length_percentage_auto),
        padding: edges(&style.padding, to_length_percentage),
        border: edges(&style.border, to_length_percentage),
        ..ts::Style::default()
    }
}

fn edges<T>(values: &[Dimension; 4], convert: fn(Dimension) -> T) -> Rect<T> {
    let [left, top, right, bottom] = *values;
    Rect {
        left: convert(left),
        right: convert(right),
        top: convert(top),
        bottom: convert(bottom),
    }
}

fn to_dimension(d: Dimension) -> ts::Dimension {
    match d.unit {
        Unit::Point => ts::Dimension::length(d.value),
        Unit::Percent => ts::Dimension::percent(d.value / 100.0),
        Unit::Auto | Unit::Undefined => ts::Dimension::auto(),
    }
}

fn to_length_percentage_auto(d: Dimension) -> LengthPercentageAuto {
    match d.unit {
        Unit::Point => LengthPercentageAuto::length(d.value),
        Unit::Percent => LengthPercentageAuto::percent(d.value / 100.0),
        Unit::Auto => LengthPercentageAuto::auto(),
        Unit::Undefined => LengthPercentageAuto::length(0.0),
    }
}

fn to_length_percentage(d: Dimension) -> LengthPercentage {
    match d.unit {
        Unit::Point => LengthPercentage::length(d.value),
        Unit::Percent => LengthPercentage::percent(d.value / 100.0),
        Unit::Auto | Unit::Undefined => LengthPercentage::length(0.0),
    }
}

fn to_align_items(align: Align) -> Option<ts::AlignItems> {
    match align {
        Align::FlexStart => Some(ts::AlignItems::FlexStart),
        Align::Center => Some(ts::AlignItems::Center),
        Align::FlexEnd => Some(ts::AlignItems::FlexEnd),
        Align::Stretch => Some(ts::AlignItems::Stretch),
        Align::Baseline => Some(ts::AlignItems::Baseline),
        Align::Auto | Align::SpaceBetween | Align::SpaceAround => None,
    }
}

fn to_align_content(align: Align) -> Option<ts::AlignContent> {
    match align {
        Align::FlexStart => Some(ts::AlignContent::FlexStart),
        Align::Center => Some(ts::AlignContent::Center),
        Align::FlexEnd => Some(ts::AlignContent::FlexEnd),
        Align::Stretch => Some(ts::AlignContent::Stretch),
        Align::SpaceBetween => Some(ts::AlignContent::SpaceBetween),
        Align::SpaceAround => Some(ts::AlignContent::SpaceAround),
        Align::Auto | Align::Baseline => None,
    }
}

fn to_justify_content(justify: Justify) -> Option<ts::JustifyContent> {
    Some(match justify {
        Justify::FlexStart => ts::JustifyContent::FlexStart,
        Justify::Center => ts::JustifyContent::Center,
        Justify::FlexEnd => ts::JustifyContent::FlexEnd,
        Justify::SpaceBetween => ts::JustifyContent::SpaceBetween,
        Justify::SpaceAround => ts::JustifyContent::SpaceAround,
        Justify::SpaceEvenly => ts::JustifyContent::SpaceEvenly,
    })
}
