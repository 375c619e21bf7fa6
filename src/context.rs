//! Scoped variable environment used while materializing templates
//!
//! The stack always holds a base frame with the initial data. Loop iterations
//! push a frame, bind their iterator, and pop it before the next sibling
//! iteration starts, so a lookup can never observe bindings from a sibling
//! subtree.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::expr::Value;

/// One layer of name bindings
pub type Frame = HashMap<String, Value>;

/// Chain of scope frames searched innermost first
#[derive(Debug, Clone)]
pub struct ContextStack {
    frames: Vec<Frame>,
}

impl Default for ContextStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStack {
    /// Create a stack with an empty base frame
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::new()],
        }
    }

    /// Create a stack whose base frame holds the given values
    pub fn with_values(values: &IndexMap<String, Value>) -> Self {
        let base = values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self { frames: vec![base] }
    }

    /// Push an empty frame
    pub fn enter(&mut self) {
        self.frames.push(Frame::new());
    }

    /// Pop the innermost frame. The base frame is never popped.
    pub fn leave(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Bind a name in the innermost frame
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        if let Some(top) = self.frames.last_mut() {
            top.insert(name.into(), value);
        }
    }

    /// Look a name up, innermost frame first
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Number of frames pushed above the base frame
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    /// Run `f` inside a fresh frame.
    ///
    /// The frame is popped whatever `f` returns, including errors.
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let depth = self.frames.len();
        self.enter();
        let result = f(self);
        self.frames.truncate(depth);
        result
    }
}
