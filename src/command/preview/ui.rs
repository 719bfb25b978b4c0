use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use super::app::PreviewApp;
use crate::sheet::{FrameAddress, format_percent};
use crate::view::{EntityView, SpriteAnimator};

fn format_uptime(secs: u64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

fn address_label(animator: &SpriteAnimator) -> String {
    match animator.address() {
        FrameAddress::Pixel(offset) => format!("{}px {}px", offset.x, offset.y),
        FrameAddress::Grid(pos) => {
            format!("{} {}", format_percent(pos.pos_x), format_percent(pos.pos_y))
        }
    }
}

fn status_cell(view: &EntityView) -> Cell<'static> {
    match view {
        EntityView::Character(character) => {
            let status = character.status();
            let color = if status.is_active() {
                Color::Green
            } else if status.is_idle() {
                Color::DarkGray
            } else {
                Color::Yellow
            };
            let text = match status.as_str() {
                "" => "-".to_string(),
                s => s.to_string(),
            };
            Cell::from(text).style(Style::default().fg(color))
        }
        EntityView::Zone(_) => Cell::from("-"),
    }
}

fn entity_row(view: &EntityView) -> Row<'static> {
    let (row, frame, playback, address) = match view.animator() {
        Some(animator) => {
            let sequence = animator.sequence();
            let playback = if animator.is_ticking() {
                format!("{} fps", sequence.fps())
            } else {
                "held".to_string()
            };
            (
                animator.props().row.to_string(),
                format!("{}/{}", animator.frame(), sequence.frame_count()),
                playback,
                address_label(animator),
            )
        }
        None => (
            "-".to_string(),
            "-".to_string(),
            "fallback".to_string(),
            view.fallback().unwrap_or_default(),
        ),
    };

    Row::new(vec![
        Cell::from(view.kind()),
        Cell::from(view.label()),
        status_cell(view),
        Cell::from(row),
        Cell::from(frame),
        Cell::from(playback),
        Cell::from(address),
        Cell::from(view.z_index().to_string()),
    ])
}

fn detail_lines(view: &EntityView) -> Vec<Line<'static>> {
    match view.animator() {
        Some(animator) => {
            let mut lines = vec![Line::from(vec![
                Span::styled("src ", Style::default().fg(Color::DarkGray)),
                Span::raw(truncate(&animator.props().src, 72)),
            ])];
            lines.extend(animator.style().iter().map(|(property, value)| {
                Line::from(vec![
                    Span::styled(format!("{}: ", property), Style::default().fg(Color::Cyan)),
                    Span::raw(format!("{};", truncate(value, 72))),
                ])
            }));
            lines
        }
        None => vec![Line::from(vec![
            Span::styled("fallback ", Style::default().fg(Color::DarkGray)),
            Span::raw(view.fallback().unwrap_or_default()),
        ])],
    }
}

fn html_lines(view: &EntityView) -> Vec<Line<'static>> {
    view.render()
        .to_html()
        .lines()
        .map(|line| Line::raw(truncate(line, 96)))
        .collect()
}

/// Inlined data URIs run to kilobytes; keep lines readable.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", head)
}

pub fn draw(frame: &mut Frame, app: &mut PreviewApp) {
    let [header_area, table_area, detail_area, help_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(14),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let uptime = format_uptime(app.started.elapsed().as_secs());
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(app.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("  {} entities  ", app.len())),
            Span::styled(uptime, Style::default().fg(Color::DarkGray)),
        ])),
        header_area,
    );

    let header = Row::new(vec![
        "KIND", "NAME", "STATUS", "ROW", "FRAME", "PLAYBACK", "ADDRESS", "Z",
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = app.views.iter().map(entity_row).collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Min(12),
            Constraint::Length(10),
            Constraint::Length(4),
            Constraint::Length(6),
            Constraint::Length(9),
            Constraint::Length(18),
            Constraint::Length(3),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(" entities "))
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(table, table_area, &mut app.table_state);

    let (detail_title, detail) = match app.selected() {
        Some(view) if app.show_html => (format!(" {} html ", view.label()), html_lines(view)),
        Some(view) => (format!(" {} ", view.label()), detail_lines(view)),
        None => (" style ".to_string(), vec![Line::from("No entities in scene")]),
    };
    frame.render_widget(
        Paragraph::new(detail).block(Block::default().borders(Borders::ALL).title(detail_title)),
        detail_area,
    );

    frame.render_widget(
        Paragraph::new("j/k select  s cycle status  b break sprite  h toggle html  q quit").dark_gray(),
        help_area,
    );
}
