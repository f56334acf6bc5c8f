use bevy::prelude::*;

/// Memory timeline: one entry per photo, the current one highlighted.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timeline {
    open: bool,
    highlighted: usize,
}

impl Timeline {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn highlight(&mut self, index: usize) {
        self.highlighted = index;
    }

    pub fn toggle_icon(&self) -> &'static str {
        if self.open {
            "❌"
        } else {
            "📅"
        }
    }
}
