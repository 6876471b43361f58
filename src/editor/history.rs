//! Linear snapshot history backing undo and redo.

use image::RgbaImage;

/// One committed canvas state, dimensions included, so a restore can undo
/// a crop as easily as a stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    image: RgbaImage,
}

impl Snapshot {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Full-frame snapshots in commit order with a cursor at the visible state.
/// Recording while the cursor sits mid-stack drops every later snapshot.
#[derive(Debug, Clone, Default)]
pub struct HistoryStack {
    snapshots: Vec<Snapshot>,
    cursor: usize,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits a snapshot as the new latest state.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        self.cursor = self.snapshots.len() - 1;
    }

    /// Steps the cursor back one state, refusing at the oldest snapshot.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.snapshots.get(self.cursor)
    }

    /// Steps the cursor forward one state, refusing at the newest snapshot.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        self.snapshots.get(self.cursor)
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.snapshots.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
