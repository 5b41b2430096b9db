use {
    crate::reconciler::{anomaly_flags, classifier},
    crate::state::{ConnectionState, State},
    crate::ui::renderer::{format_amount, format_time_offset, format_votes, short_id},
    crate::ui::terminal::UiView,
    ratatui::{
        layout::{Constraint, Layout as RatLayout, Rect},
        style::{Color, Modifier, Style},
        text::{Line, Span},
        widgets::{Block, Borders, Clear, Paragraph, Row, Table},
        Frame,
    },
};

/// Render the main dashboard layout
pub fn render_layout(f: &mut Frame, area: Rect, state: &State, view: &UiView) {
    let chunks = RatLayout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Stat tiles
            Constraint::Min(0),    // Event table + alerts
            Constraint::Length(3), // Footer/help
        ])
        .split(area);

    render_header(f, chunks[0], state);
    render_stats(f, chunks[1], state);

    let body = RatLayout::default()
        .direction(ratatui::layout::Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(36)])
        .split(chunks[2]);

    render_event_table(f, body[0], state, view);
    render_alert_panel(f, body[1], state);
    render_footer(f, chunks[3], state);

    if view.detail_open {
        render_detail(f, area, state, view);
    }
}

fn connection_style(connection: ConnectionState) -> Style {
    let color = match connection {
        ConnectionState::Connected => Color::Green,
        ConnectionState::Connecting => Color::Yellow,
        ConnectionState::Disconnected => Color::Red,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn render_header(f: &mut Frame, area: Rect, state: &State) {
    let connection = state.connection();

    let text = vec![Line::from(vec![
        Span::styled(
            "FraudFlow",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" - Live Fraud Prediction Monitor  "),
        Span::styled(connection.as_str(), connection_style(connection)),
    ])];

    let header = Block::default().borders(Borders::ALL);
    f.render_widget(Paragraph::new(text).block(header), area);
}

fn render_stats(f: &mut Frame, area: Rect, state: &State) {
    let stats = state.stats();
    let flag_rate = if stats.total > 0 {
        stats.flagged as f64 / stats.total as f64 * 100.0
    } else {
        0.0
    };

    let text = vec![Line::from(vec![
        Span::styled("Events: ", Style::default().fg(Color::Cyan)),
        Span::raw(stats.total.to_string()),
        Span::raw("   "),
        Span::styled("Flagged: ", Style::default().fg(Color::Red)),
        Span::raw(format!("{} ({:.1}%)", stats.flagged, flag_rate)),
        Span::raw("   "),
        Span::styled("Weighted volume: ", Style::default().fg(Color::Cyan)),
        Span::raw(format!("{:.2}", stats.recent_volume)),
    ])];

    let block = Block::default().borders(Borders::ALL).title("Statistics");
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn render_event_table(f: &mut Frame, area: Rect, state: &State, view: &UiView) {
    let count = state.event_count();
    let flags = anomaly_flags(&state.amounts());
    let visible = area.height.saturating_sub(3) as usize;

    let header = Row::new(vec!["Time", "Transaction", "Amount", "Score", "Votes", ""])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let selected_index = view.selected_index(count);

    let rows: Vec<Row> = (0..count)
        .rev() // newest first
        .take(visible.max(1))
        .map(|index| {
            let (transaction, prediction) = state.event_at(index).unwrap_or((None, None));

            let fraud = match transaction {
                Some(tx) => classifier::is_fraud_display(tx, prediction),
                None => classifier::is_flagged(prediction),
            };

            let anomalous = flags.get(index).copied().unwrap_or(false);

            let (time, id, amount) = match transaction {
                Some(tx) => (
                    format_time_offset(tx.time),
                    short_id(tx.transaction_id.as_deref()),
                    format_amount(tx.amount),
                ),
                None => (
                    "unknown".to_string(),
                    "unknown".to_string(),
                    "unknown".to_string(),
                ),
            };

            let score = prediction
                .and_then(|p| p.fraud_score)
                .map(|s| format!("{:.2}", s))
                .unwrap_or_else(|| "-".to_string());

            let mut style = if fraud {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Gray)
            };
            if selected_index == Some(index) {
                style = style.add_modifier(Modifier::REVERSED);
            }

            Row::new(vec![
                time,
                id,
                amount,
                score,
                format_votes(prediction),
                if anomalous { "▲".to_string() } else { String::new() },
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(10), // Time
        Constraint::Length(14), // Transaction
        Constraint::Length(12), // Amount
        Constraint::Length(7),  // Score
        Constraint::Length(14), // Votes
        Constraint::Length(2),  // Anomaly mark
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Events ({})", count)),
    );

    f.render_widget(table, area);
}

fn render_alert_panel(f: &mut Frame, area: Rect, state: &State) {
    let count = state.event_count();
    let visible = area.height.saturating_sub(2) as usize;

    let lines: Vec<Line> = (0..count)
        .rev()
        .filter_map(|index| {
            let (transaction, prediction) = state.event_at(index)?;
            let fraud = match transaction {
                Some(tx) => classifier::is_fraud_display(tx, prediction),
                None => classifier::is_flagged(prediction),
            };
            if !fraud {
                return None;
            }

            let (id, amount) = match transaction {
                Some(tx) => (
                    short_id(tx.transaction_id.as_deref()),
                    format_amount(tx.amount),
                ),
                None => ("unknown".to_string(), "unknown".to_string()),
            };

            Some(Line::from(vec![
                Span::styled("⚠ ", Style::default().fg(Color::Red)),
                Span::raw(format!("{} {}", id, amount)),
            ]))
        })
        .take(visible.max(1))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Fraud Alerts")
        .border_style(Style::default().fg(Color::Red));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(f: &mut Frame, area: Rect, state: &State) {
    let text = vec![Line::from(vec![
        Span::raw("↑/↓ select  Enter detail  q/Esc quit"),
        Span::raw("  |  "),
        Span::styled("Txs: ", Style::default().fg(Color::Cyan)),
        Span::raw(state.transaction_count().to_string()),
        Span::raw("  "),
        Span::styled("Preds: ", Style::default().fg(Color::Cyan)),
        Span::raw(state.prediction_count().to_string()),
        Span::raw("  "),
        Span::raw(chrono::Local::now().format("%H:%M:%S").to_string()),
    ])];

    let footer = Block::default().borders(Borders::ALL).title("Status");
    f.render_widget(Paragraph::new(text).block(footer), area);
}

fn render_detail(f: &mut Frame, area: Rect, state: &State, view: &UiView) {
    let count = state.event_count();
    let Some(index) = view.selected_index(count) else {
        return;
    };
    let Some((transaction, prediction)) = state.event_at(index) else {
        return;
    };

    let mut lines = vec![Line::from(Span::styled(
        format!("Event #{}", index),
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    match transaction {
        Some(tx) => {
            lines.push(Line::from(format!(
                "Transaction: {}",
                tx.transaction_id.as_deref().unwrap_or("unknown")
            )));
            lines.push(Line::from(format!("Time: {}", format_time_offset(tx.time))));
            lines.push(Line::from(format!("Amount: {}", format_amount(tx.amount))));
            if let Some(class) = tx.class {
                lines.push(Line::from(format!("Ground truth: {}", class)));
            }
            if !tx.features.is_empty() {
                lines.push(Line::from(format!("Features: {}", tx.features.len())));
                for (name, value) in tx.features.iter().take(8) {
                    lines.push(Line::from(format!("  {} = {}", name, value)));
                }
            }
        }
        None => lines.push(Line::from("Transaction: unknown (prediction only)")),
    }

    lines.push(Line::from(format!("Votes: {}", format_votes(prediction))));
    if let Some(score) = prediction.and_then(|p| p.fraud_score) {
        lines.push(Line::from(format!("Fraud score: {:.2}", score)));
    }

    let verdict = match transaction {
        Some(tx) => classifier::is_fraud_display(tx, prediction),
        None => classifier::is_flagged(prediction),
    };
    lines.push(Line::from(Span::styled(
        if verdict { "FRAUD" } else { "OK" },
        if verdict {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Green)
        },
    )));

    let popup = centered_rect(50, 60, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Event Detail (Esc to close)");

    f.render_widget(Clear, popup);
    f.render_widget(Paragraph::new(lines).block(block), popup);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = RatLayout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = RatLayout::default()
        .direction(ratatui::layout::Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
