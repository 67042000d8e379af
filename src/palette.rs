// Finite color palette shared by every chart

use std::collections::BTreeSet;
use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::LapChartError;

/// Colors assigned to drivers, in the order they are handed out.
pub const DEFAULT_PALETTE: [(&str, [u8; 3]); 10] = [
    ("sky", [124, 181, 236]),
    ("charcoal", [67, 67, 72]),
    ("lime", [144, 237, 125]),
    ("orange", [247, 163, 92]),
    ("periwinkle", [128, 133, 233]),
    ("rose", [241, 92, 128]),
    ("mustard", [228, 211, 84]),
    ("lavender", [128, 133, 232]),
    ("burgundy", [141, 70, 83]),
    ("aqua", [145, 232, 225]),
];

/// Stable identity of a color slot: its index in the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(pub usize);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A palette color as stored in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteColor {
    pub name: String,
    pub rgb: [u8; 3],
}

/// One color of the palette. Whether it is in use is tracked by the [`ColorPool`] only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSlot {
    pub id: SlotId,
    pub name: String,
    pub rgb: [u8; 3],
}

/// Bounded set of colors with acquire/release semantics.
///
/// The pool size caps how many drivers can be displayed at once. Slots are
/// always handed out lowest index first so the same selection order yields
/// the same colors.
#[derive(Debug, Clone)]
pub struct ColorPool {
    slots: Vec<ColorSlot>,
    free: BTreeSet<SlotId>,
}

pub fn default_palette() -> Vec<PaletteColor> {
    DEFAULT_PALETTE
        .iter()
        .map(|(name, rgb)| PaletteColor {
            name: name.to_string(),
            rgb: *rgb,
        })
        .collect()
}

impl Default for ColorPool {
    fn default() -> Self {
        Self::new(default_palette())
    }
}

impl ColorPool {
    pub fn new(palette: Vec<PaletteColor>) -> Self {
        let slots: Vec<ColorSlot> = palette
            .into_iter()
            .enumerate()
            .map(|(index, color)| ColorSlot {
                id: SlotId(index),
                name: color.name,
                rgb: color.rgb,
            })
            .collect();
        let free = slots.iter().map(|slot| slot.id).collect();
        Self { slots, free }
    }

    /// Takes the lowest free slot and marks it as used.
    pub fn acquire(&mut self) -> Result<ColorSlot, LapChartError> {
        let id = self
            .free
            .pop_first()
            .ok_or(LapChartError::CapacityExceeded {
                palette_size: self.size(),
            })?;
        debug!("Acquired color slot {}, {} left", id, self.free.len());
        Ok(self.slots[id.0].clone())
    }

    /// Returns a slot to the pool. Releasing a free slot is rejected and does not
    /// change the free count.
    pub fn release(&mut self, id: SlotId) -> Result<(), LapChartError> {
        if id.0 >= self.slots.len() {
            return Err(LapChartError::UnknownSlot { slot: id });
        }
        if !self.free.insert(id) {
            warn!("Ignoring release of color slot {} which is already free", id);
            return Err(LapChartError::SlotAlreadyFree { slot: id });
        }
        debug!("Released color slot {}, {} free", id, self.free.len());
        Ok(())
    }

    pub fn has_free(&self) -> bool {
        !self.free.is_empty()
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn is_used(&self, id: SlotId) -> bool {
        id.0 < self.slots.len() && !self.free.contains(&id)
    }

    pub fn slot(&self, id: SlotId) -> Option<&ColorSlot> {
        self.slots.get(id.0)
    }
}
