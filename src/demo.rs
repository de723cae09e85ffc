//! Built-in demo blueprint.

use std::cell::RefCell;
use std::rc::Rc;

use bpedit_core::{EditorError, Entity, Position};

/// Entities shown on startup: (prototype, x, y, modules, recipe).
const BLUEPRINT: &[(&str, f64, f64, &[&str], Option<&str>)] = &[
    ("electric-mining-drill", 1.5, 1.5, &[], None),
    (
        "electric-mining-drill",
        4.5,
        1.5,
        &["productivity-module", "speed-module"],
        None,
    ),
    (
        "assembling-machine-2",
        1.5,
        5.5,
        &["speed-module"],
        Some("iron-gear-wheel"),
    ),
    ("assembling-machine-3", 5.5, 5.5, &[], None),
    ("beacon", 9.5, 5.5, &["speed-module-3", "speed-module-3"], None),
    ("wooden-chest", 3.5, 8.5, &[], None),
];

/// Build the demo blueprint, numbering entities from 1.
pub fn blueprint() -> Result<Vec<Rc<RefCell<Entity>>>, EditorError> {
    BLUEPRINT
        .iter()
        .zip(1u32..)
        .map(|(&(name, x, y, modules, recipe), number)| {
            let mut entity = Entity::from_prototype(number, name, Position::new(x, y))?;
            if let Some(slots) = entity.modules_mut() {
                let capacity = slots.capacity();
                slots
                    .modules_mut()
                    .extend(modules.iter().take(capacity).map(|m| m.to_string()));
            }
            if let (Some(slot), Some(recipe)) = (entity.recipe_mut(), recipe) {
                slot.recipe = Some(recipe.to_string());
            }
            Ok(Rc::new(RefCell::new(entity)))
        })
        .collect()
}
