//! Editor layouts (one per entity kind) and layout-unit scaling.
//!
//! Layout coordinates are pixel-like units relative to the top-left corner
//! of the editor's content area. [`Scale`] maps them to terminal cells.

use bpedit_core::EntityKind;

/// One element placed on an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutItem {
    /// Static text
    Label { x: u16, y: u16, text: &'static str },
    /// Module slot grid bound to the entity's modules
    Modules { x: u16, y: u16 },
    /// Recipe picker bound to the entity's recipe
    Recipe { x: u16, y: u16 },
}

/// Fixed layout of an editor for one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorLayout {
    /// Short identifier used in logs and errors
    pub name: &'static str,
    /// Entity kind this layout edits
    pub kind: EntityKind,
    /// Content width in layout units
    pub width: u16,
    /// Content height in layout units
    pub height: u16,
    /// Elements in mount order (also focus order)
    pub items: &'static [LayoutItem],
}

/// Electric mining drill: modules only.
pub const MINING_DRILL: EditorLayout = EditorLayout {
    name: "mining",
    kind: EntityKind::MiningDrill,
    width: 402,
    height: 171,
    items: &[
        LayoutItem::Label {
            x: 140,
            y: 56,
            text: "Modules:",
        },
        LayoutItem::Modules { x: 208, y: 45 },
    ],
};

/// Assembling machines: recipe and modules.
pub const ASSEMBLING_MACHINE: EditorLayout = EditorLayout {
    name: "assembler",
    kind: EntityKind::AssemblingMachine,
    width: 402,
    height: 225,
    items: &[
        LayoutItem::Label {
            x: 140,
            y: 56,
            text: "Recipe:",
        },
        LayoutItem::Recipe { x: 208, y: 45 },
        LayoutItem::Label {
            x: 140,
            y: 110,
            text: "Modules:",
        },
        LayoutItem::Modules { x: 208, y: 99 },
    ],
};

/// Beacon: modules only.
pub const BEACON: EditorLayout = EditorLayout {
    name: "beacon",
    kind: EntityKind::Beacon,
    width: 402,
    height: 171,
    items: &[
        LayoutItem::Label {
            x: 140,
            y: 56,
            text: "Modules:",
        },
        LayoutItem::Modules { x: 208, y: 45 },
    ],
};

/// All built-in layouts.
pub const LAYOUTS: &[&EditorLayout] = &[&MINING_DRILL, &ASSEMBLING_MACHINE, &BEACON];

/// Find the layout for an entity kind.
pub fn for_kind(kind: EntityKind) -> Option<&'static EditorLayout> {
    LAYOUTS.iter().copied().find(|layout| layout.kind == kind)
}

/// Layout units per terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale {
    pub px_per_col: u16,
    pub px_per_row: u16,
}

impl Default for Scale {
    fn default() -> Self {
        Self {
            px_per_col: 8,
            px_per_row: 18,
        }
    }
}

impl Scale {
    pub fn new(px_per_col: u16, px_per_row: u16) -> Self {
        Self {
            px_per_col: px_per_col.max(1),
            px_per_row: px_per_row.max(1),
        }
    }

    /// Map a layout position to a cell offset (rounded to nearest).
    pub fn position(&self, x: u16, y: u16) -> (u16, u16) {
        (
            round_div(x, self.px_per_col),
            round_div(y, self.px_per_row),
        )
    }

    /// Map a layout size to cells (rounded up).
    pub fn size(&self, width: u16, height: u16) -> (u16, u16) {
        (
            width.div_ceil(self.px_per_col),
            height.div_ceil(self.px_per_row),
        )
    }
}

fn round_div(value: u16, unit: u16) -> u16 {
    ((value as u32 + unit as u32 / 2) / unit as u32) as u16
}
