use crate::controller::action::Action;

/// What a cursor did with an action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavOutcome {
    /// Selection moved to the given index
    Moved(usize),
    /// Directional action at the boundary; candidate for a zone hand-off
    Edge(Action),
    /// Not a navigation action
    Pass(Action),
}

/// Selection cursor over a row-major grid of `len` items.
///
/// A list is a grid with one column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridCursor {
    index: usize,
    len: usize,
    columns: usize,
}

impl GridCursor {
    pub fn new(len: usize, columns: usize) -> Self {
        Self {
            index: 0,
            len,
            columns: columns.max(1),
        }
    }

    pub fn list(len: usize) -> Self {
        Self::new(len, 1)
    }

    /// Number of item columns that fit in a container, never less than one
    pub fn columns_for_width(container_width: f32, item_width: f32, gap: f32) -> usize {
        if item_width.is_nan() || item_width <= 0.0 || !container_width.is_finite() {
            return 1;
        }
        let columns = ((container_width + gap) / (item_width + gap)).floor();
        if columns >= 1.0 {
            columns as usize
        } else {
            1
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn row(&self) -> usize {
        self.index / self.columns
    }

    pub fn column(&self) -> usize {
        self.index % self.columns
    }

    /// Container resized; the selected item stays selected
    pub fn set_columns(&mut self, columns: usize) {
        self.columns = columns.max(1);
    }

    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.index = self.index.min(len.saturating_sub(1));
    }

    pub fn select(&mut self, index: usize) {
        self.index = index.min(self.len.saturating_sub(1));
    }

    pub fn apply(&mut self, action: Action) -> NavOutcome {
        if !action.is_direction() {
            return NavOutcome::Pass(action);
        }
        if self.len == 0 {
            return NavOutcome::Edge(action);
        }

        let last_row = (self.len - 1) / self.columns;
        let target = match action {
            Action::Left if self.column() > 0 => Some(self.index - 1),
            Action::Right if self.column() + 1 < self.columns && self.index + 1 < self.len => {
                Some(self.index + 1)
            }
            Action::Up if self.row() > 0 => Some(self.index - self.columns),
            Action::Down if self.index + self.columns < self.len => Some(self.index + self.columns),
            // Partial last row: drop onto its last item
            Action::Down if self.row() < last_row => Some(self.len - 1),
            _ => None,
        };

        match target {
            Some(index) => {
                self.index = index;
                NavOutcome::Moved(index)
            }
            None => NavOutcome::Edge(action),
        }
    }
}
