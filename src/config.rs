//! Configuration for a binding session

use crate::style::Direction;

/// Options for [`Session`](crate::Session)
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Available width for layout; `NaN` is unbounded
    pub max_width: f32,

    /// Available height for layout; `NaN` is unbounded
    pub max_height: f32,

    /// Direction handed to the layout engine
    pub direction: Direction,

    /// Deepest element nesting accepted by markup reading, compilation and
    /// materialization
    pub max_depth: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_width: f32::NAN,
            max_height: f32::NAN,
            direction: Direction::Ltr,
            max_depth: 256,
        }
    }
}

impl SessionConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the available layout width
    pub fn with_max_width(mut self, width: f32) -> Self {
        self.max_width = width;
        self
    }

    /// Set the available layout height
    pub fn with_max_height(mut self, height: f32) -> Self {
        self.max_height = height;
        self
    }

    /// Set the layout direction
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the maximum element nesting depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}
