/// Lines a section emits before its first data row: title and table header.
pub const SECTION_HEADER_LINES: usize = 2;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Section {
    pub name: &'static str,
    pub start_line: usize,
    pub item_count: usize,
    pub header_offset: usize,
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct SectionIndex {
    sections: Vec<Section>,
}

impl SectionIndex {
    pub fn push(
        &mut self,
        name: &'static str,
        start_line: usize,
        header_offset: usize,
        item_count: usize,
    ) {
        debug_assert!(
            self.sections
                .last()
                .is_none_or(|last| last.start_line <= start_line),
            "sections must be pushed in line order"
        );
        self.sections.push(Section {
            name,
            start_line,
            item_count,
            header_offset,
        });
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn total_items(&self) -> usize {
        self.sections.iter().map(|section| section.item_count).sum()
    }

    pub fn locate(&self, selected: usize) -> Option<(usize, usize)> {
        let mut cumulative = 0usize;
        for (index, section) in self.sections.iter().enumerate() {
            if selected < cumulative + section.item_count {
                return Some((index, selected - cumulative));
            }
            cumulative += section.item_count;
        }
        None
    }

    /// Line number of the row for `selected`, or `None` when the selection is
    /// stale (beyond the current item count). Callers must not auto-scroll on
    /// `None`.
    pub fn line_for_selection(&self, selected: usize) -> Option<usize> {
        let (index, offset) = self.locate(selected)?;
        let section = &self.sections[index];
        Some(section.start_line + section.header_offset + offset)
    }

    pub fn section_at_line(&self, line: usize) -> Option<usize> {
        self.sections.iter().position(|section| {
            let first = section.start_line + section.header_offset;
            line >= first && line < first + section.item_count
        })
    }
}

pub fn clamp_selection(selected: usize, item_count: usize) -> Option<usize> {
    if item_count == 0 {
        None
    } else {
        Some(selected.min(item_count - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::{SECTION_HEADER_LINES, SectionIndex, clamp_selection};
    use proptest::prelude::*;

    fn layout(sizes: &[usize]) -> SectionIndex {
        let mut index = SectionIndex::default();
        let mut line = 1usize;
        for size in sizes {
            index.push("section", line, SECTION_HEADER_LINES, *size);
            line += SECTION_HEADER_LINES + (*size).max(1) + 1;
        }
        index
    }

    #[test]
    fn forward_and_inverse_mapping_agree_with_an_empty_middle_section() {
        let index = layout(&[3, 0, 5]);
        assert_eq!(index.total_items(), 8);

        for selected in 0..index.total_items() {
            let (section, _) = index.locate(selected).expect("valid selection");
            let line = index.line_for_selection(selected).expect("line exists");
            assert_eq!(index.section_at_line(line), Some(section));
            assert_ne!(section, 1, "empty section owns no items");
        }

        // First section: start 1, header 2 -> rows at 3, 4, 5.
        assert_eq!(index.line_for_selection(0), Some(3));
        assert_eq!(index.line_for_selection(2), Some(5));
        // Third section starts after 3+1+1 lines and the 2+1+1 of the empty one.
        assert_eq!(index.sections()[2].start_line, 11);
        assert_eq!(index.line_for_selection(3), Some(13));
    }

    #[test]
    fn stale_selection_is_not_found() {
        let index = layout(&[3, 0, 5]);
        assert_eq!(index.line_for_selection(8), None);
        assert_eq!(index.locate(42), None);
        assert_eq!(SectionIndex::default().line_for_selection(0), None);
    }

    #[test]
    fn shrinking_selection_reclamps_to_last_item() {
        assert_eq!(clamp_selection(9, 10), Some(9));
        assert_eq!(clamp_selection(9, 5), Some(4));
        assert_eq!(clamp_selection(3, 0), None);
    }

    proptest! {
        #[test]
        fn mapping_is_consistent_for_any_layout(sizes in prop::collection::vec(0usize..6, 0..7)) {
            let index = layout(&sizes);
            for selected in 0..index.total_items() {
                let (section, _) = index.locate(selected).unwrap();
                let line = index.line_for_selection(selected).unwrap();
                prop_assert_eq!(index.section_at_line(line), Some(section));
            }
            prop_assert_eq!(index.line_for_selection(index.total_items()), None);
        }
    }
}
