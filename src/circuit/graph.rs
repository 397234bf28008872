//! Circuit container: named components in declaration order.

use std::collections::HashMap;

use crate::components::Component;
use crate::error::{Result, SpiceError};

/// Ground label used when none is given.
pub const DEFAULT_GROUND: &str = "0";

/// A named component.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub component: Component,
}

/// A circuit: named components plus the label of the reference node.
///
/// Node labels are free-form strings; exactly one of them, the ground label,
/// is the 0 V reference. Declaration order is preserved and determines both
/// node numbering and source numbering in the solver.
#[derive(Debug, Clone)]
pub struct Circuit {
    ground: String,
    elements: Vec<Element>,
    /// Component name -> position in `elements`
    index: HashMap<String, usize>,
}

impl Circuit {
    /// Create an empty circuit with ground label `"0"`.
    pub fn new() -> Self {
        Self::with_ground(DEFAULT_GROUND)
    }

    /// Create an empty circuit with a custom ground label.
    pub fn with_ground(ground: impl Into<String>) -> Self {
        Self {
            ground: ground.into(),
            elements: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// The ground label.
    pub fn ground(&self) -> &str {
        &self.ground
    }

    /// Add a named component. Names must be unique.
    pub fn add(&mut self, name: impl Into<String>, component: Component) -> Result<()> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(SpiceError::DuplicateComponent { name });
        }
        self.index.insert(name.clone(), self.elements.len());
        self.elements.push(Element { name, component });
        Ok(())
    }

    /// Builder-style [`add`](Self::add).
    pub fn with(mut self, name: impl Into<String>, component: Component) -> Result<Self> {
        self.add(name, component)?;
        Ok(self)
    }

    /// Remove a component by name, returning it if it existed.
    pub fn remove(&mut self, name: &str) -> Option<Component> {
        let position = self.index.remove(name)?;
        let element = self.elements.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(element.component)
    }

    /// Look up a component by name.
    pub fn get(&self, name: &str) -> Option<&Component> {
        self.index.get(name).map(|&i| &self.elements[i].component)
    }

    /// Check whether a component with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All elements in declaration order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the circuit has no components.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}
