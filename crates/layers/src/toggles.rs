use std::collections::BTreeMap;

use serde::Serialize;

use crate::layer::LayerSlot;
use crate::stack::LayerDescriptor;

/// User visibility choices, kept across recompositions.
///
/// Exactly one base is active whenever at least one base is configured.
/// Overlay switches are stored per slot, so flipping one never touches
/// another, and a slot whose data disappears keeps its state for when the
/// data comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerToggles {
    base_count: u8,
    active_base: u8,
    overrides: BTreeMap<LayerSlot, bool>,
}

impl LayerToggles {
    pub fn new(base_count: usize) -> Self {
        Self {
            base_count: base_count.min(u8::MAX as usize) as u8,
            active_base: 0,
            overrides: BTreeMap::new(),
        }
    }

    pub fn active_base(&self) -> Option<u8> {
        (self.base_count > 0).then_some(self.active_base)
    }

    /// Makes `index` the active base. Returns whether anything changed.
    pub fn select_base(&mut self, index: u8) -> bool {
        if index >= self.base_count || index == self.active_base {
            return false;
        }
        self.active_base = index;
        true
    }

    pub fn is_visible(&self, slot: LayerSlot) -> bool {
        match slot {
            LayerSlot::Base(i) => self.active_base() == Some(i),
            other => self
                .overrides
                .get(&other)
                .copied()
                .unwrap_or_else(|| other.default_visible()),
        }
    }

    /// Sets one layer's visibility. Hiding a base is refused: a base can only
    /// be replaced by selecting another. Returns whether anything changed.
    pub fn set_visible(&mut self, slot: LayerSlot, visible: bool) -> bool {
        match slot {
            LayerSlot::Base(i) => visible && self.select_base(i),
            other => {
                let before = self.is_visible(other);
                if visible == other.default_visible() {
                    self.overrides.remove(&other);
                } else {
                    self.overrides.insert(other, visible);
                }
                before != visible
            }
        }
    }

    /// Flips an overlay, or selects a base. Returns the slot's new visibility.
    pub fn toggle(&mut self, slot: LayerSlot) -> bool {
        match slot {
            LayerSlot::Base(i) => {
                self.select_base(i);
            }
            other => {
                let now = !self.is_visible(other);
                self.set_visible(other, now);
            }
        }
        self.is_visible(slot)
    }

    /// Back to every slot's default and the first base.
    pub fn reset(&mut self) {
        self.active_base = 0;
        self.overrides.clear();
    }

    pub fn resolve(&self, layers: Vec<LayerDescriptor>) -> LayerStack {
        LayerStack {
            layers: layers
                .into_iter()
                .map(|descriptor| ResolvedLayer {
                    visible: self.is_visible(descriptor.slot),
                    descriptor,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedLayer {
    #[serde(flatten)]
    pub descriptor: LayerDescriptor,
    pub visible: bool,
}

/// Ordered layer list ready for the renderer, bottom first.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct LayerStack {
    pub layers: Vec<ResolvedLayer>,
}

impl LayerStack {
    pub fn get(&self, slot: LayerSlot) -> Option<&ResolvedLayer> {
        self.layers.iter().find(|l| l.descriptor.slot == slot)
    }

    pub fn slots(&self) -> Vec<LayerSlot> {
        self.layers.iter().map(|l| l.descriptor.slot).collect()
    }

    pub fn visible(&self) -> impl Iterator<Item = &ResolvedLayer> {
        self.layers.iter().filter(|l| l.visible)
    }

    pub fn active_bases(&self) -> usize {
        self.visible()
            .filter(|l| matches!(l.descriptor.slot, LayerSlot::Base(_)))
            .count()
    }
}
