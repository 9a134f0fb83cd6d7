use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use super::blocks::StatBlock;
use crate::core::telemetry::SeverityTier;

/// Border color for a severity tier
pub fn severity_color(severity: SeverityTier) -> Color {
    match severity {
        SeverityTier::Normal => Color::Cyan,
        SeverityTier::Warning => Color::Yellow,
        SeverityTier::Critical => Color::Red,
    }
}

/// A titled box holding one stat, with the limit dimmed after the value
pub fn stat_block_widget(stat: &StatBlock) -> Paragraph<'static> {
    let title = match &stat.badge {
        Some(badge) => format!(" {} [{}] ", stat.title, badge),
        None => format!(" {} ", stat.title),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(severity_color(stat.severity)));

    let value_style = if stat.muted {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };

    let mut spans = vec![Span::styled(stat.value.clone(), value_style)];
    if let Some(limit) = &stat.limit {
        spans.push(Span::styled(
            format!(" / {}", limit),
            Style::default().fg(Color::DarkGray),
        ));
    }

    Paragraph::new(Line::from(spans))
        .block(block)
        .alignment(Alignment::Center)
}
