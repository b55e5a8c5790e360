//! Overlay placement and rendering utilities.
//!
//! Turns a computed [`PopupStyle`] back into an absolute [`Rect`] and draws
//! the floating surface with `ratatui`.

use ratatui::layout::{Rect, Size};
use ratatui::widgets::{Block, Clear};
use ratatui::Frame;

use crate::geometry::{Length, PopupStyle};

/// Absolute area of popup content of natural size `content`, placed by
/// `style` inside `viewport`.
///
/// The width is the content width clamped to the style's min/max widths;
/// the height is capped by a fixed style height. Whichever inset sides are
/// fixed pin the rect. The result never leaves the viewport.
pub fn popup_area(style: &PopupStyle, viewport: Rect, content: Size) -> Rect {
    let width = content
        .width
        .min(style.max_width)
        .max(style.min_width)
        .min(viewport.width);
    let height = match style.height {
        Length::Fixed(cap) => content.height.min(cap),
        Length::Auto => content.height,
    }
    .min(viewport.height);

    let x = match (style.inset.left, style.inset.right) {
        (Length::Fixed(left), _) => left,
        (Length::Auto, Length::Fixed(right)) => {
            viewport.width.saturating_sub(right.saturating_add(width))
        }
        (Length::Auto, Length::Auto) => 0,
    };
    let y = match (style.inset.top, style.inset.bottom) {
        (Length::Fixed(top), _) => top,
        (Length::Auto, Length::Fixed(bottom)) => {
            viewport.height.saturating_sub(bottom.saturating_add(height))
        }
        (Length::Auto, Length::Auto) => 0,
    };

    Rect::new(
        viewport.x.saturating_add(x),
        viewport.y.saturating_add(y),
        width,
        height,
    )
    .intersection(viewport)
}

/// Clear the overlay area and optionally render a block border.
///
/// Returns the inner area (after block padding, if any).
pub fn render_overlay(frame: &mut Frame, area: Rect, block: Option<&Block>) -> Rect {
    frame.render_widget(Clear, area);
    if let Some(block) = block {
        let inner = block.inner(area);
        frame.render_widget(block.clone(), area);
        inner
    } else {
        area
    }
}

/// [`popup_area`] followed by [`render_overlay`].
pub fn render_popup(
    frame: &mut Frame,
    style: &PopupStyle,
    content: Size,
    block: Option<&Block>,
) -> Rect {
    let area = popup_area(style, frame.area(), content);
    render_overlay(frame, area, block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{resolve, Inset, Placement};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    const VIEWPORT: Rect = Rect::new(0, 0, 80, 24);

    fn area_for(anchor: Rect, content: Size, placement: Placement) -> Rect {
        let resolved = resolve(anchor, VIEWPORT, content, placement, 8, 1000);
        popup_area(&resolved.style, VIEWPORT, content)
    }

    #[test]
    fn below_anchor() {
        let area = area_for(Rect::new(10, 2, 12, 1), Size::new(20, 6), Placement::BottomLeft);
        assert_eq!(area, Rect::new(10, 3, 20, 6));
    }

    #[test]
    fn flipped_above_anchor() {
        let area = area_for(Rect::new(10, 20, 12, 1), Size::new(20, 6), Placement::BottomLeft);
        assert_eq!(area, Rect::new(10, 14, 20, 6));
    }

    #[test]
    fn right_aligned() {
        let area = area_for(Rect::new(60, 2, 10, 1), Size::new(30, 4), Placement::BottomLeft);
        // right edge lines up with the anchor's right edge
        assert_eq!(area, Rect::new(40, 3, 30, 4));
    }

    #[test]
    fn width_respects_min_width_and_height_cap() {
        let area = area_for(Rect::new(10, 10, 16, 1), Size::new(4, 20), Placement::BottomLeft);
        assert_eq!(area.width, 16);
        // 24 - 11 - 8 rows below beat 10 - 8 above
        assert_eq!(area.height, 5);
        assert_eq!(area.y, 11);
    }

    #[test]
    fn never_leaves_viewport() {
        let viewport = Rect::new(5, 5, 30, 10);
        let style = PopupStyle {
            min_width: 50,
            max_width: 50,
            ..PopupStyle::default()
        };
        let area = popup_area(&style, viewport, Size::new(50, 50));
        assert_eq!(area, viewport);
    }

    #[test]
    fn oversized_insets_pin_to_origin() {
        let viewport = Rect::new(0, 0, 200, 50);
        let style = PopupStyle {
            inset: Inset {
                right: Length::Fixed(u16::MAX - 10),
                bottom: Length::Fixed(u16::MAX - 10),
                ..Inset::default()
            },
            max_width: 60,
            ..PopupStyle::default()
        };
        let area = popup_area(&style, viewport, Size::new(60, 20));
        assert_eq!(area, Rect::new(0, 0, 60, 20));
    }

    #[test]
    fn render_overlay_clears_and_draws_border() {
        let mut terminal = Terminal::new(TestBackend::new(20, 6)).unwrap();
        let mut inner = Rect::default();
        terminal
            .draw(|frame| {
                frame.render_widget(
                    ratatui::widgets::Paragraph::new("xxxxxxxxxxxxxxxxxxxx"),
                    frame.area(),
                );
                inner = render_overlay(frame, Rect::new(2, 0, 8, 4), Some(&Block::bordered()));
            })
            .unwrap();
        assert_eq!(inner, Rect::new(3, 1, 6, 2));
        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(0, 0)].symbol(), "x");
        assert_eq!(buffer[(2, 0)].symbol(), "┌");
        assert_eq!(buffer[(9, 3)].symbol(), "┘");
        assert_eq!(buffer[(12, 0)].symbol(), "x");
    }

    #[test]
    fn render_overlay_without_block_returns_area() {
        let mut terminal = Terminal::new(TestBackend::new(10, 4)).unwrap();
        let area = Rect::new(1, 1, 4, 2);
        terminal
            .draw(|frame| {
                assert_eq!(render_overlay(frame, area, None), area);
            })
            .unwrap();
    }
}
