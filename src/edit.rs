/// Whether primary clicks edit cells or advance the simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditSession {
    edit_mode: bool,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Switches between edit mode and run mode, unless `playing` is true.
    ///
    /// Returns whether the mode changed.
    pub fn toggle_edit_mode(&mut self, playing: bool) -> bool {
        if playing {
            return false;
        }
        self.edit_mode ^= true;
        true
    }
}
