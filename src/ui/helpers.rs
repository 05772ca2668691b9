use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Footer line of `[key] label` pairs.
pub(crate) fn key_hints(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (idx, (key, label)) in hints.iter().enumerate() {
        let label = if idx + 1 == hints.len() {
            format!(" {label}")
        } else {
            format!(" {label}   ")
        };
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::raw(label));
    }
    Line::from(spans)
}

/// Star shown next to favorite recipes.
pub(crate) fn favorite_marker(favorite: bool) -> &'static str {
    if favorite {
        "★"
    } else {
        "☆"
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{anyhow, Context};

    use super::*;

    #[test]
    fn surface_error_reports_root_cause() {
        let err = Err::<(), _>(anyhow!("Recipe title is required."))
            .context("failed to save recipe")
            .unwrap_err();
        assert_eq!(surface_error(&err), "Recipe title is required.");
    }

    #[test]
    fn key_hints_alternate_keys_and_labels() {
        let line = key_hints(&[("[q]", "Quit"), ("[f]", "Search")]);
        assert_eq!(line.spans.len(), 4);
        assert_eq!(line.spans[0].content, "[q]");
        assert_eq!(line.spans[3].content, " Search");
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(60, 50, area);
        assert!(popup.x >= area.x && popup.right() <= area.right());
        assert!(popup.y >= area.y && popup.bottom() <= area.bottom());
        assert_eq!(popup.width, 60);
    }
}
