use base64::Engine;
use muse_core::{Author, GenerationProvider, IMAGINE_COMMAND, Message};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::app::ChatApp;

pub fn render<P: GenerationProvider>(frame: &mut Frame, app: &ChatApp<P>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Messages
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_messages(frame, app, chunks[1]);
    render_input(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);
}

fn render_header<P: GenerationProvider>(frame: &mut Frame, app: &ChatApp<P>, area: Rect) {
    let title = format!("muse - design mentor ({})", app.models);
    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(header, area);
}

/// One-line stand-in for an inline image.
fn image_summary(data_uri: &str) -> String {
    let Some((header, payload)) = data_uri.split_once(',') else {
        return "[Image]".to_string();
    };
    let mime = header
        .strip_prefix("data:")
        .and_then(|h| h.split(';').next())
        .unwrap_or("image");

    match base64::engine::general_purpose::STANDARD.decode(payload) {
        Ok(bytes) => format!("[Image: {}, {:.1} KB]", mime, bytes.len() as f64 / 1024.0),
        Err(_) => format!("[Image: {}]", mime),
    }
}

fn message_lines(msg: &Message) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let (role, style) = match msg.author {
        Author::User => ("You", Style::default().fg(Color::Green)),
        Author::Model => ("Mentor", Style::default().fg(Color::Blue)),
    };
    lines.push(Line::from(Span::styled(
        format!("{}:", role),
        style.add_modifier(Modifier::BOLD),
    )));

    for line in msg.text.lines() {
        lines.push(Line::from(format!("  {}", line)));
    }

    if let Some(url) = &msg.image_url {
        lines.push(Line::from(Span::styled(
            format!("  {}", image_summary(url)),
            Style::default().fg(Color::Magenta),
        )));
    }

    if let Some(references) = msg.visible_references() {
        lines.push(Line::from(Span::styled(
            "  Sources:",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
        for (i, reference) in references.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::raw(format!("  {}. {} ", i + 1, reference.title)),
                Span::styled(
                    format!("<{}>", reference.uri),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }
    }

    lines
}

fn render_messages<P: GenerationProvider>(frame: &mut Frame, app: &ChatApp<P>, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    for msg in app.orchestrator.messages().iter() {
        lines.extend(message_lines(msg));
        lines.push(Line::from("")); // Empty line between messages
    }

    if app.is_loading() {
        lines.push(Line::from(Span::styled(
            "Thinking...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
        )));
    }

    let messages_block = Block::default().borders(Borders::ALL).title("Conversation");

    // Calculate scroll offset to show the bottom of the conversation
    let visible_height = area.height.saturating_sub(2) as usize; // Account for borders
    let total_lines = lines.len();
    let scroll = if total_lines > visible_height {
        (total_lines - visible_height).saturating_sub(app.messages_scroll as usize)
    } else {
        0
    };

    let paragraph = Paragraph::new(Text::from(lines))
        .block(messages_block)
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0));

    frame.render_widget(paragraph, area);
}

fn render_input<P: GenerationProvider>(frame: &mut Frame, app: &ChatApp<P>, area: Rect) {
    let input_block = Block::default().borders(Borders::ALL).title("Input");

    let (display_text, style) = if app.input.is_empty() {
        (
            format!("Ask for advice, or {} <prompt>...", IMAGINE_COMMAND),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (app.input.clone(), Style::default())
    };

    let input_paragraph = Paragraph::new(display_text).style(style).block(input_block);
    frame.render_widget(input_paragraph, area);

    frame.set_cursor_position((cursor_x(area, app.cursor_column()), area.y + 1));
}

/// Terminal column for the input cursor, clamped inside the input box.
fn cursor_x(area: Rect, column: usize) -> u16 {
    let column = u16::try_from(column).unwrap_or(u16::MAX);
    let last_inner = area.right().saturating_sub(2).max(area.x.saturating_add(1));
    area.x.saturating_add(1).saturating_add(column).min(last_inner)
}

fn render_status_bar<P: GenerationProvider>(frame: &mut Frame, app: &ChatApp<P>, area: Rect) {
    let status = if app.is_loading() {
        "Waiting for response...  Ctrl+↑/↓: Scroll  Esc: Quit"
    } else {
        "Enter: Send  Ctrl+↑/↓: Scroll  Esc: Quit"
    };

    let status_bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}
