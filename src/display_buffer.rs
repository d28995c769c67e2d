use std::collections::VecDeque;

use crate::label::Label;

/// Labels currently on screen, newest first, bounded by total width.
#[derive(Debug, Clone)]
pub struct DisplayBuffer {
    labels: VecDeque<Label>,
    budget: u32,
}

impl DisplayBuffer {
    pub fn new(budget: u32) -> Self {
        Self {
            labels: VecDeque::new(),
            budget,
        }
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Prepend `label`, then drop every older label from the first one at
    /// which the running width (newest to oldest) goes over budget.
    ///
    /// The label just inserted is always kept, even if it is wider than the
    /// budget on its own.
    pub fn insert_front(&mut self, label: Label) {
        self.labels.push_front(label);

        let mut total: u64 = 0;
        let mut keep = self.labels.len();
        for (idx, label) in self.labels.iter().enumerate() {
            total += u64::from(label.width());
            if total > u64::from(self.budget) {
                keep = idx.max(1);
                break;
            }
        }
        if keep < self.labels.len() {
            tracing::trace!(evicted = self.labels.len() - keep, "display buffer over budget");
            self.labels.truncate(keep);
        }
    }

    /// Kept labels oldest first.
    pub fn iter_chronological(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter().rev()
    }

    /// Text of all kept labels, oldest first, so new keys appear at the end.
    pub fn render_text(&self) -> String {
        self.iter_chronological().map(Label::text).collect()
    }

    pub fn total_width(&self) -> u32 {
        let total: u64 = self.labels.iter().map(|l| u64::from(l.width())).sum();
        u32::try_from(total).unwrap_or(u32::MAX)
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(text: &str, width: u32) -> Label {
        Label::new(text, width)
    }

    #[test]
    fn new_buffer_is_empty() {
        let buffer = DisplayBuffer::new(100);
        assert!(buffer.is_empty());
        assert_eq!(buffer.render_text(), "");
        assert_eq!(buffer.total_width(), 0);
    }

    #[test]
    fn render_text_is_chronological() {
        let mut buffer = DisplayBuffer::new(100);
        buffer.insert_front(label("a ", 10));
        buffer.insert_front(label("b ", 10));
        buffer.insert_front(label("c ", 10));
        assert_eq!(buffer.render_text(), "a b c ");
        assert_eq!(buffer.render_text(), buffer.render_text());
    }

    #[test]
    fn oldest_evicted_when_over_budget() {
        let mut buffer = DisplayBuffer::new(100);
        buffer.insert_front(label("A ", 60));
        buffer.insert_front(label("B ", 50));
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.render_text(), "B ");
        assert_eq!(buffer.total_width(), 50);
    }

    #[test]
    fn exact_budget_is_kept() {
        let mut buffer = DisplayBuffer::new(100);
        buffer.insert_front(label("A ", 60));
        buffer.insert_front(label("B ", 40));
        assert_eq!(buffer.render_text(), "A B ");
        assert_eq!(buffer.total_width(), 100);
    }

    #[test]
    fn eviction_drops_whole_suffix() {
        let mut buffer = DisplayBuffer::new(100);
        for name in ["a ", "b ", "c ", "d "] {
            buffer.insert_front(label(name, 20));
        }
        buffer.insert_front(label("Return ", 70));
        // Return(70) + d(20) = 90, + c(20) = 110
        assert_eq!(buffer.render_text(), "d Return ");
    }

    #[test]
    fn oversized_label_survives_its_own_insert() {
        let mut buffer = DisplayBuffer::new(100);
        buffer.insert_front(label("a ", 10));
        buffer.insert_front(label("XF86AudioRaiseVolume ", 250));
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.render_text(), "XF86AudioRaiseVolume ");

        buffer.insert_front(label("b ", 10));
        assert_eq!(buffer.render_text(), "b ");
    }

    #[test]
    fn clear_empties_buffer() {
        let mut buffer = DisplayBuffer::new(100);
        buffer.insert_front(label("a ", 10));
        buffer.clear();
        assert!(buffer.is_empty());
    }
}
