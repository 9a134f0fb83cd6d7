use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::app::DetailsApp;
use super::widgets::{severity_color, stat_block_widget};
use crate::core::telemetry::status_severity;

const BLOCKS_PER_ROW: usize = 4;

/// Main render function
pub fn render_ui(frame: &mut Frame, app: &DetailsApp) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(6),    // Stat blocks
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    render_blocks(frame, chunks[1], app);
    render_footer(frame, chunks[2]);

    if app.show_help {
        render_help_overlay(frame, area);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &DetailsApp) {
    let status = app
        .view
        .status
        .map(|status| status.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let updated = app
        .view
        .received_at
        .map(|at| {
            at.with_timezone(&chrono::Local)
                .format("%H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| "waiting for stats".to_string());

    let source = app.socket_url.as_deref().unwrap_or("no socket configured");

    let line = Line::from(vec![
        Span::styled(" Status: ", Style::default().fg(Color::Gray)),
        Span::styled(
            status,
            Style::default()
                .fg(severity_color(status_severity(app.view.status)))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  │  "),
        Span::styled("Updated: ", Style::default().fg(Color::Gray)),
        Span::raw(updated),
        Span::raw("  │  "),
        Span::styled(source.to_string(), Style::default().fg(Color::DarkGray)),
    ]);

    let block = Block::default()
        .title(" srvmon ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_blocks(frame: &mut Frame, area: Rect, app: &DetailsApp) {
    let blocks = app.blocks();
    let rows: Vec<_> = blocks.chunks(BLOCKS_PER_ROW).collect();

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(3); rows.len()])
        .split(area);

    for (row, row_area) in rows.iter().zip(row_areas.iter()) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![
                Constraint::Ratio(1, BLOCKS_PER_ROW as u32);
                BLOCKS_PER_ROW
            ])
            .split(*row_area);

        for (stat, cell) in row.iter().zip(columns.iter()) {
            frame.render_widget(stat_block_widget(stat), *cell);
        }
    }
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let help = " q: Quit │ ?: Help │ r: Refresh region ";
    let para = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(para, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_text = r#"
    srvmon - Help

    Keyboard Shortcuts:
    ─────────────────────────────────────
    q / Esc     Quit the application
    ? / h       Toggle this help screen
    r           Look up the server region again

    Border colors: cyan normal, yellow above 80%
    of the limit, red above 90%.
    "#;

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::DarkGray));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left);

    let popup_area = centered_rect(60, 50, area);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(paragraph, popup_area);
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
