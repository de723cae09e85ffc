//! Static game data: entity prototypes, modules and recipes.

use crate::EntityKind;

/// Entity prototype description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prototype {
    /// Internal prototype name
    pub name: &'static str,
    /// Human readable name
    pub title: &'static str,
    /// Entity category
    pub kind: EntityKind,
    /// Number of module slots (0 means no module slice)
    pub module_slots: usize,
    /// Whether the entity crafts a selectable recipe
    pub has_recipe: bool,
}

/// Module item description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Module {
    /// Internal item name
    pub name: &'static str,
    /// Two-character label used inside slot cells
    pub short: &'static str,
    /// Productivity modules are restricted to crafting/mining entities
    pub productivity: bool,
}

pub const PROTOTYPES: &[Prototype] = &[
    Prototype {
        name: "electric-mining-drill",
        title: "Electric mining drill",
        kind: EntityKind::MiningDrill,
        module_slots: 3,
        has_recipe: false,
    },
    Prototype {
        name: "assembling-machine-2",
        title: "Assembling machine 2",
        kind: EntityKind::AssemblingMachine,
        module_slots: 2,
        has_recipe: true,
    },
    Prototype {
        name: "assembling-machine-3",
        title: "Assembling machine 3",
        kind: EntityKind::AssemblingMachine,
        module_slots: 4,
        has_recipe: true,
    },
    Prototype {
        name: "beacon",
        title: "Beacon",
        kind: EntityKind::Beacon,
        module_slots: 2,
        has_recipe: false,
    },
    Prototype {
        name: "wooden-chest",
        title: "Wooden chest",
        kind: EntityKind::Container,
        module_slots: 0,
        has_recipe: false,
    },
    Prototype {
        name: "iron-chest",
        title: "Iron chest",
        kind: EntityKind::Container,
        module_slots: 0,
        has_recipe: false,
    },
];

pub const MODULES: &[Module] = &[
    Module {
        name: "speed-module",
        short: "S1",
        productivity: false,
    },
    Module {
        name: "speed-module-2",
        short: "S2",
        productivity: false,
    },
    Module {
        name: "speed-module-3",
        short: "S3",
        productivity: false,
    },
    Module {
        name: "effectivity-module",
        short: "E1",
        productivity: false,
    },
    Module {
        name: "effectivity-module-2",
        short: "E2",
        productivity: false,
    },
    Module {
        name: "effectivity-module-3",
        short: "E3",
        productivity: false,
    },
    Module {
        name: "productivity-module",
        short: "P1",
        productivity: true,
    },
    Module {
        name: "productivity-module-2",
        short: "P2",
        productivity: true,
    },
    Module {
        name: "productivity-module-3",
        short: "P3",
        productivity: true,
    },
];

pub const RECIPES: &[&str] = &[
    "iron-gear-wheel",
    "copper-cable",
    "electronic-circuit",
    "advanced-circuit",
    "pipe",
    "engine-unit",
    "inserter",
    "transport-belt",
];

/// Look up an entity prototype by name.
pub fn prototype(name: &str) -> Option<&'static Prototype> {
    PROTOTYPES.iter().find(|p| p.name == name)
}

/// Look up a module by item name.
pub fn module(name: &str) -> Option<&'static Module> {
    MODULES.iter().find(|m| m.name == name)
}

/// Check whether a recipe name is known.
pub fn is_recipe(name: &str) -> bool {
    RECIPES.contains(&name)
}

/// Modules that may be inserted into an entity of the given kind, in catalog order.
pub fn modules_for(kind: EntityKind) -> impl Iterator<Item = &'static Module> {
    MODULES.iter().filter(move |m| module_allowed(m, kind))
}

/// Check whether a module may be inserted into an entity of the given kind.
pub fn module_allowed(module: &Module, kind: EntityKind) -> bool {
    !(module.productivity && kind == EntityKind::Beacon)
}
