//! Entity model.
//!
//! An `Entity` is one placed game object of a blueprint. Editors never own
//! entities; they receive a shared reference from the surrounding application
//! and widgets mutate the named slices in place.

use std::fmt;

use crate::catalog;
use crate::error::EditorError;

/// Entity category (type discriminator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    MiningDrill,
    AssemblingMachine,
    Beacon,
    Container,
}

impl EntityKind {
    /// Convert kind to string
    pub fn to_str(self) -> &'static str {
        match self {
            EntityKind::MiningDrill => "mining-drill",
            EntityKind::AssemblingMachine => "assembling-machine",
            EntityKind::Beacon => "beacon",
            EntityKind::Container => "container",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Named slice of entity state a widget can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliceKind {
    Modules,
    Recipe,
}

impl fmt::Display for SliceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SliceKind::Modules => f.write_str("modules"),
            SliceKind::Recipe => f.write_str("recipe"),
        }
    }
}

/// Position on the blueprint grid (tile coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Installed modules.
///
/// Modules are stored compactly: slot `i` is occupied iff `i < modules.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSlots {
    capacity: usize,
    modules: Vec<String>,
}

impl ModuleSlots {
    /// Create empty slots with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            modules: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.modules.len() >= self.capacity
    }

    /// Module in the given slot, if occupied.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.modules.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(String::as_str)
    }

    /// Mutable access to the module list. Callers keep `len() <= capacity()`.
    pub fn modules_mut(&mut self) -> &mut Vec<String> {
        &mut self.modules
    }
}

/// Selected crafting recipe.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipeSlot {
    pub recipe: Option<String>,
}

/// One placed game object.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Entity number, unique within a blueprint
    pub number: u32,
    /// Prototype name (e.g. "electric-mining-drill")
    pub name: String,
    /// Type discriminator
    pub kind: EntityKind,
    /// Grid position
    pub position: Position,
    modules: Option<ModuleSlots>,
    recipe: Option<RecipeSlot>,
}

impl Entity {
    /// Create an entity without any editable slices.
    pub fn new(number: u32, name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            number,
            name: name.into(),
            kind,
            position: Position::default(),
            modules: None,
            recipe: None,
        }
    }

    /// Create an entity with the slices its catalog prototype defines.
    pub fn from_prototype(number: u32, name: &str, position: Position) -> Result<Self, EditorError> {
        let proto =
            catalog::prototype(name).ok_or_else(|| EditorError::UnknownPrototype(name.into()))?;

        let mut entity = Self::new(number, proto.name, proto.kind).at(position);
        if proto.module_slots > 0 {
            entity = entity.with_modules(proto.module_slots);
        }
        if proto.has_recipe {
            entity = entity.with_recipe();
        }
        Ok(entity)
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Add an empty module slice.
    pub fn with_modules(mut self, capacity: usize) -> Self {
        self.modules = Some(ModuleSlots::new(capacity));
        self
    }

    /// Add an empty recipe slice.
    pub fn with_recipe(mut self) -> Self {
        self.recipe = Some(RecipeSlot::default());
        self
    }

    /// Human readable name from the catalog, falling back to the prototype name.
    pub fn title(&self) -> &str {
        catalog::prototype(&self.name)
            .map(|p| p.title)
            .unwrap_or(self.name.as_str())
    }

    /// Check whether the entity carries the given slice.
    pub fn has_slice(&self, slice: SliceKind) -> bool {
        match slice {
            SliceKind::Modules => self.modules.is_some(),
            SliceKind::Recipe => self.recipe.is_some(),
        }
    }

    pub fn modules(&self) -> Option<&ModuleSlots> {
        self.modules.as_ref()
    }

    pub fn modules_mut(&mut self) -> Option<&mut ModuleSlots> {
        self.modules.as_mut()
    }

    pub fn recipe(&self) -> Option<&RecipeSlot> {
        self.recipe.as_ref()
    }

    pub fn recipe_mut(&mut self) -> Option<&mut RecipeSlot> {
        self.recipe.as_mut()
    }
}
