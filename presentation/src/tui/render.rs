//! Frame rendering
//!
//! One `draw` call per frame: a three-row layout (main pane, input,
//! status bar) with the main pane owned by the active surface, and the
//! approval modal drawn last so it sits above everything.

use super::state::TuiState;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use weave_domain::{InteractionMode, SessionState, TranscriptEntry};

pub fn draw(frame: &mut Frame, state: &TuiState) {
    let rows = Layout::vertical([
        Constraint::Min(3),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .split(frame.area());

    match state.surfaces.active() {
        InteractionMode::Conversation => draw_conversation(frame, rows[0], state),
        InteractionMode::ToolBrowse => draw_tool_browser(frame, rows[0], state),
        InteractionMode::Pairing => draw_pairing(frame, rows[0], state),
        InteractionMode::Edit => draw_editor(frame, rows[0], state),
        InteractionMode::Form => draw_form(frame, rows[0], state),
    }

    draw_input(frame, rows[1], state);
    draw_status_bar(frame, rows[2], state);

    if let Some(prompt) = &state.approval {
        draw_approval_modal(frame, prompt);
    }
}

fn draw_conversation(frame: &mut Frame, area: Rect, state: &TuiState) {
    let mut lines: Vec<Line> = Vec::new();
    for entry in &state.transcript {
        lines.extend(entry_lines(entry));
    }
    if !state.stream_buffer.is_empty() {
        for line in state.stream_buffer.lines() {
            lines.push(Line::raw(line.to_string()));
        }
    }

    // Bottom-anchored scroll
    let height = area.height.saturating_sub(2) as usize;
    let offset = lines
        .len()
        .saturating_sub(height + state.scroll as usize);

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((offset as u16, 0))
        .block(Block::default().borders(Borders::ALL).title(" conversation "));
    frame.render_widget(paragraph, area);
}

fn entry_lines(entry: &TranscriptEntry) -> Vec<Line<'static>> {
    match entry {
        TranscriptEntry::User { text } => vec![Line::from(vec![
            Span::styled("you: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(text.clone()),
        ])],
        TranscriptEntry::Assistant { text, interrupted } => {
            let mut lines: Vec<Line> = text.lines().map(|l| Line::raw(l.to_string())).collect();
            if *interrupted {
                lines.push(Line::styled(
                    "[interrupted]",
                    Style::default().fg(Color::Yellow),
                ));
            }
            lines
        }
        TranscriptEntry::Tool { result } => {
            let (label, color) = if result.is_success() {
                ("tool", Color::Green)
            } else {
                ("tool", Color::Red)
            };
            vec![Line::from(vec![
                Span::styled(
                    format!("{} {} ", label, result.tool_name),
                    Style::default().fg(color),
                ),
                Span::styled(result.preview(), Style::default().fg(Color::DarkGray)),
            ])]
        }
        TranscriptEntry::Notice { text } => vec![Line::styled(
            text.clone(),
            Style::default().fg(Color::DarkGray),
        )],
    }
}

fn draw_tool_browser(frame: &mut Frame, area: Rect, state: &TuiState) {
    let items: Vec<ListItem> = state
        .tools
        .iter()
        .enumerate()
        .map(|(i, tool)| {
            let level = state
                .permissions
                .iter()
                .find(|(name, _)| name == &tool.name)
                .map(|(_, level)| level.as_str())
                .unwrap_or("-");
            let marker = if i == state.selected_tool { "> " } else { "  " };
            let line = Line::from(vec![
                Span::raw(marker),
                Span::styled(
                    format!("{:<14}", tool.name),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("{:<7}", level), Style::default().fg(Color::Magenta)),
                Span::styled(
                    format!("{:<17}", tool.category.as_str()),
                    Style::default().fg(Color::Blue),
                ),
                Span::styled(tool.description.clone(), Style::default().fg(Color::DarkGray)),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" tools (Enter: invoke, Esc: back) "),
    );
    frame.render_widget(list, area);
}

fn draw_pairing(frame: &mut Frame, area: Rect, state: &TuiState) {
    let text = vec![
        Line::raw("Enter the pairing code shown by the daemon peer:"),
        Line::raw(""),
        Line::styled(
            format!("  {}", state.pairing_code),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];
    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" pairing "));
    frame.render_widget(paragraph, area);
}

fn draw_editor(frame: &mut Frame, area: Rect, state: &TuiState) {
    let paragraph = Paragraph::new(state.editor.as_str())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" compose (Ctrl-S: send, Esc: back) "),
        );
    frame.render_widget(paragraph, area);
}

fn draw_form(frame: &mut Frame, area: Rect, state: &TuiState) {
    let Some(form) = &state.form else {
        let paragraph = Paragraph::new("select a tool in the browser first (F2)")
            .block(Block::default().borders(Borders::ALL).title(" invoke "));
        frame.render_widget(paragraph, area);
        return;
    };

    let mut lines = vec![
        Line::styled(
            form.tool.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            form.tool.description.clone(),
            Style::default().fg(Color::DarkGray),
        ),
        Line::raw(""),
    ];
    for (i, param) in form.tool.parameters.iter().enumerate() {
        let focus = if i == form.field { "> " } else { "  " };
        let required = if param.required { "*" } else { " " };
        lines.push(Line::from(vec![
            Span::raw(focus),
            Span::styled(
                format!("{}{:<14}", required, param.name),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(form.values[i].clone()),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" invoke (Tab: field, Enter: run, Esc: back) "),
    );
    frame.render_widget(paragraph, area);
}

fn draw_input(frame: &mut Frame, area: Rect, state: &TuiState) {
    let paragraph = Paragraph::new(state.input.as_str())
        .block(Block::default().borders(Borders::ALL).title(" message "));
    frame.render_widget(paragraph, area);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, state: &TuiState) {
    let mode = state.surfaces.active();
    let session = session_label(state.session);
    let status = state.status.as_deref().unwrap_or("");

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.indicator()),
            Style::default()
                .bg(mode_color(mode))
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {} ", session), Style::default().fg(Color::Yellow)),
        Span::raw(" "),
        Span::styled(status.to_string(), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn session_label(state: SessionState) -> &'static str {
    match state {
        SessionState::Idle => "idle",
        SessionState::Streaming => "streaming",
        SessionState::AwaitingApproval => "awaiting approval",
        SessionState::Completed => "completed",
        SessionState::Cancelled => "cancelled",
        SessionState::Failed => "failed",
    }
}

fn mode_color(mode: InteractionMode) -> Color {
    match mode {
        InteractionMode::Conversation => Color::Blue,
        InteractionMode::ToolBrowse => Color::Green,
        InteractionMode::Pairing => Color::Magenta,
        InteractionMode::Edit => Color::Yellow,
        InteractionMode::Form => Color::Cyan,
    }
}

fn draw_approval_modal(frame: &mut Frame, prompt: &super::state::ApprovalPrompt) {
    let area = centered_rect(60, 7, frame.area());
    frame.render_widget(Clear, area);

    let text = vec![
        Line::from(vec![
            Span::raw("The model wants to run "),
            Span::styled(
                prompt.tool.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::styled(prompt.args.clone(), Style::default().fg(Color::DarkGray)),
        Line::raw(""),
        Line::from(vec![
            Span::styled("[y]", Style::default().fg(Color::Green)),
            Span::raw(" once  "),
            Span::styled("[a]", Style::default().fg(Color::Green)),
            Span::raw(" session  "),
            Span::styled("[n/Esc]", Style::default().fg(Color::Red)),
            Span::raw(" deny"),
        ]),
    ];

    let paragraph = Paragraph::new(text).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" approval required ")
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(paragraph, area);
}

/// A fixed-height rect centered in `area`, `percent_x` wide
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    // Widen before multiplying; u16 overflows past ~1092 columns
    let width = (u32::from(area.width) * u32::from(percent_x) / 100) as u16;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height.min(area.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_stays_inside() {
        let outer = Rect::new(0, 0, 100, 30);
        let inner = centered_rect(60, 7, outer);
        assert!(inner.x >= outer.x);
        assert!(inner.y >= outer.y);
        assert!(inner.right() <= outer.right());
        assert!(inner.bottom() <= outer.bottom());
        assert_eq!(inner.width, 60);
        assert_eq!(inner.height, 7);
    }

    #[test]
    fn test_centered_rect_on_very_wide_terminal() {
        let outer = Rect::new(0, 0, 2000, 50);
        let inner = centered_rect(60, 7, outer);
        assert_eq!(inner.width, 1200);
        assert!(inner.right() <= outer.right());
    }

    #[test]
    fn test_session_labels() {
        assert_eq!(session_label(SessionState::AwaitingApproval), "awaiting approval");
        assert_eq!(session_label(SessionState::Idle), "idle");
    }
}
