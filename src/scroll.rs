use ratatui::text::{Line, Span};

use crate::i18n::Translator;
use crate::theme::Tone;

pub fn viewport_height(terminal_height: usize, reserved_chrome: usize) -> usize {
    terminal_height.saturating_sub(reserved_chrome).max(1)
}

pub fn max_offset(total_lines: usize, viewport: usize) -> usize {
    total_lines.saturating_sub(viewport.max(1))
}

/// Offset that keeps `target_line` (when given) inside the viewport, clamped
/// into `[0, max_offset]`.
pub fn effective_offset(
    total_lines: usize,
    viewport: usize,
    requested: usize,
    target_line: Option<usize>,
) -> usize {
    let viewport = viewport.max(1);
    let mut offset = requested;
    if let Some(target) = target_line {
        if target < requested {
            offset = target;
        } else if target >= requested + viewport {
            offset = target + 1 - viewport;
        }
    }
    offset.min(max_offset(total_lines, viewport))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollView {
    pub visible: Vec<Line<'static>>,
    pub offset: usize,
    pub total: usize,
    pub trailer: Option<Line<'static>>,
}

pub struct ScrollWindow<'a> {
    tr: &'a Translator,
}

impl<'a> ScrollWindow<'a> {
    pub fn new(tr: &'a Translator) -> Self {
        Self { tr }
    }

    pub fn apply(
        &self,
        lines: &[Line<'static>],
        viewport: usize,
        requested: usize,
        target_line: Option<usize>,
    ) -> ScrollView {
        let viewport = viewport.max(1);
        let total = lines.len();
        let offset = effective_offset(total, viewport, requested, target_line);
        let end = (offset + viewport).min(total);
        let visible = lines[offset..end].to_vec();

        let trailer = (total > viewport).then(|| {
            let text = self.tr.tf(
                "scroll.trailer",
                &[
                    ("from", &(offset + 1).to_string()),
                    ("to", &end.to_string()),
                    ("total", &total.to_string()),
                ],
            );
            Line::from(Span::styled(text, Tone::Muted.style()))
        });

        ScrollView {
            visible,
            offset,
            total,
            trailer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ScrollWindow, effective_offset, max_offset, viewport_height};
    use crate::format::plain_text;
    use crate::i18n::{Locale, Translator};
    use proptest::prelude::*;
    use ratatui::text::Line;

    fn numbered(count: usize) -> Vec<Line<'static>> {
        (0..count).map(|n| Line::from(format!("line {n}"))).collect()
    }

    #[test]
    fn viewport_never_collapses_to_zero() {
        assert_eq!(viewport_height(40, 4), 36);
        assert_eq!(viewport_height(3, 4), 1);
        assert_eq!(viewport_height(4, 4), 1);
    }

    #[test]
    fn out_of_range_offset_is_clamped() {
        let tr = Translator::new(Locale::En);
        let view = ScrollWindow::new(&tr).apply(&numbered(30), 10, 99, None);
        assert_eq!(view.offset, 20);
        assert_eq!(view.visible.len(), 10);
        assert_eq!(plain_text(&view.visible[0]), "line 20");
        let trailer = view.trailer.expect("content overflows");
        assert_eq!(plain_text(&trailer), "[Lines 21-30 of 30]");
    }

    #[test]
    fn content_that_fits_has_no_trailer() {
        let tr = Translator::new(Locale::En);
        let view = ScrollWindow::new(&tr).apply(&numbered(5), 10, 3, None);
        assert_eq!(view.offset, 0);
        assert_eq!(view.visible.len(), 5);
        assert!(view.trailer.is_none());
    }

    #[test]
    fn empty_content_is_safe() {
        let tr = Translator::new(Locale::En);
        let view = ScrollWindow::new(&tr).apply(&[], 1, 7, Some(3));
        assert_eq!(view.offset, 0);
        assert!(view.visible.is_empty());
    }

    #[test]
    fn target_above_or_below_moves_the_window() {
        assert_eq!(effective_offset(100, 10, 50, Some(20)), 20);
        assert_eq!(effective_offset(100, 10, 50, Some(60)), 51);
        assert_eq!(effective_offset(100, 10, 50, Some(59)), 50);
        assert_eq!(effective_offset(100, 10, 50, None), 50);
    }

    proptest! {
        #[test]
        fn offset_stays_in_bounds(
            total in 0usize..500,
            viewport in 1usize..80,
            requested in 0usize..1000,
            target in proptest::option::of(0usize..600),
        ) {
            let offset = effective_offset(total, viewport, requested, target);
            prop_assert!(offset <= max_offset(total, viewport));
        }

        #[test]
        fn clamping_is_idempotent(
            total in 0usize..500,
            viewport in 1usize..80,
            requested in 0usize..1000,
            target in proptest::option::of(0usize..600),
        ) {
            let first = effective_offset(total, viewport, requested, target);
            let second = effective_offset(total, viewport, requested, target);
            prop_assert_eq!(first, second);
            prop_assert_eq!(effective_offset(total, viewport, first, target), first);
        }

        #[test]
        fn auto_scroll_keeps_target_visible(
            total in 1usize..500,
            viewport in 1usize..80,
            requested in 0usize..1000,
            pick in 0usize..500,
        ) {
            let target = pick % total;
            let offset = effective_offset(total, viewport, requested, Some(target));
            if total <= viewport {
                prop_assert_eq!(offset, 0);
            } else {
                prop_assert!(offset <= target && target < offset + viewport);
            }
        }
    }
}
