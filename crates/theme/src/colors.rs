//! Theme color definitions.

use ratatui::style::Color;

/// Application theme with semantic color assignments.
///
/// The theme uses a minimal 10-color palette:
/// - 2 base colors (bg, fg)
/// - 2 accented colors (accented_bg, accented_fg)
/// - 2 selection colors (selected_bg, selected_fg)
/// - 1 disabled color
/// - 3 semantic colors (success, warning, error)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    /// Theme name for display
    pub name: &'static str,

    // === Base (2 colors) ===
    /// Panel backgrounds
    pub bg: Color,
    /// Labels and entity text
    pub fg: Color,

    // === Accented (2 colors) ===
    /// Status bar, editor title background
    pub accented_bg: Color,
    /// Focused editor border, focused widget frame
    pub accented_fg: Color,

    // === Selection (2 colors) ===
    /// Slot cursor, selected entity row background
    pub selected_bg: Color,
    /// Slot cursor text
    pub selected_fg: Color,

    // === Disabled (1 color) ===
    /// Empty slots, secondary text, separators
    pub disabled: Color,

    // === Semantic (3 colors) ===
    /// Speed modules, preview generation marker
    pub success: Color,
    /// Productivity modules, warnings in the status line
    pub warning: Color,
    /// Edit errors
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        *Self::get_by_name("default")
    }
}
