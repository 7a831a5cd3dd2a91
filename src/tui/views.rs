//! Dashboard views.
//!
//! Pure rendering functions from `DashboardState` to ratatui widgets.
//! Layout, top to bottom: header, topic input, transcript, final post,
//! status line, keybind footer.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use super::colors;
use super::state::{DashboardState, InteractionMode, TranscriptEntry};
use crate::domain::Speaker;

/// Render the full dashboard.
pub fn render(state: &DashboardState, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(3), // Topic input
            Constraint::Min(5),    // Transcript
            Constraint::Length(8), // Final post
            Constraint::Length(1), // Status
            Constraint::Length(1), // Keybinds
        ])
        .split(frame.area());

    render_header(state, frame, chunks[0]);
    render_topic_input(state, frame, chunks[1]);
    render_transcript(state, frame, chunks[2]);
    render_final_post(state, frame, chunks[3]);
    render_status(state, frame, chunks[4]);
    render_keybinds(state, frame, chunks[5]);
}

fn render_header(state: &DashboardState, frame: &mut Frame, area: Rect) {
    let indicator_color = if state.run_active {
        colors::RUNNING
    } else {
        colors::DIM
    };

    let line = Line::from(vec![
        Span::styled(
            " draftr ",
            Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} ", state.status_indicator()),
            Style::default().fg(indicator_color),
        ),
        Span::styled(
            format!("│ limit {} ", state.max_messages),
            Style::default().fg(colors::DIM),
        ),
        Span::styled(
            format!("│ {}", state.metrics_string()),
            Style::default().fg(colors::DIM),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_topic_input(state: &DashboardState, frame: &mut Frame, area: Rect) {
    let border_style = if state.mode == InteractionMode::TopicInput {
        Style::default().fg(colors::HEADER)
    } else {
        Style::default().fg(colors::DIM)
    };

    let input = Paragraph::new(state.topic_input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Topic "),
    );
    frame.render_widget(input, area);
}

fn render_transcript(state: &DashboardState, frame: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = state.transcript.iter().map(format_entry).collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Transcript "),
    );
    frame.render_widget(list, area);
}

/// Format one transcript entry for display.
fn format_entry(entry: &TranscriptEntry) -> ListItem<'_> {
    match entry {
        TranscriptEntry::Round(round) => ListItem::new(Line::from(Span::styled(
            format!("── round {} ──", round),
            Style::default().fg(colors::DIM),
        ))),
        TranscriptEntry::Message { speaker, text } => {
            let (prefix, color) = match speaker {
                Speaker::Human => ("Human: ", colors::HEADER),
                Speaker::Agent => ("Agent: ", colors::AGENT),
                Speaker::Critic => ("Critic: ", colors::CRITIC),
            };
            let line = Line::from(vec![
                Span::styled(prefix, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::raw(text.as_str()),
            ]);
            ListItem::new(line)
        }
    }
}

fn render_final_post(state: &DashboardState, frame: &mut Frame, area: Rect) {
    let (text, style) = match &state.final_draft {
        Some(draft) => (draft.as_str(), Style::default().fg(colors::FINAL)),
        None => ("No final post yet", Style::default().fg(colors::DIM)),
    };

    let post = Paragraph::new(text).style(style).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Final Post "),
    );
    frame.render_widget(post, area);
}

fn render_status(state: &DashboardState, frame: &mut Frame, area: Rect) {
    let message = state.status_message.as_deref().unwrap_or("");
    let status =
        Paragraph::new(format!(" {}", message)).style(Style::default().fg(colors::DIM));
    frame.render_widget(status, area);
}

fn render_keybinds(state: &DashboardState, frame: &mut Frame, area: Rect) {
    let bindings: &[(&str, &str)] = match state.mode {
        InteractionMode::Normal => &[
            ("i", "topic"),
            ("a", "approve"),
            ("r", "regen"),
            ("+/-", "limit"),
            ("Esc", "cancel run"),
            ("q", "quit"),
        ],
        InteractionMode::TopicInput => &[("Enter", "run"), ("Esc", "back")],
    };

    let mut spans = Vec::new();
    for (key, action) in bindings {
        spans.push(Span::styled(
            format!(" <{}>", key),
            Style::default().fg(colors::KEYBIND).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {}", action),
            Style::default().fg(colors::DIM),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_round_entry() {
        let entry = TranscriptEntry::Round(2);
        let _item = format_entry(&entry);
        // Just verify it doesn't panic
    }

    #[test]
    fn test_format_agent_message() {
        let entry = TranscriptEntry::Message {
            speaker: Speaker::Agent,
            text: "A draft".to_string(),
        };
        let _item = format_entry(&entry);
    }

    #[test]
    fn test_format_critic_message() {
        let entry = TranscriptEntry::Message {
            speaker: Speaker::Critic,
            text: "A critique".to_string(),
        };
        let _item = format_entry(&entry);
    }

    #[test]
    fn test_format_human_message() {
        let entry = TranscriptEntry::Message {
            speaker: Speaker::Human,
            text: "A topic".to_string(),
        };
        let _item = format_entry(&entry);
    }

    #[test]
    fn test_render_smoke() {
        use ratatui::Terminal;
        use ratatui::backend::TestBackend;

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        let mut state = DashboardState::new(6);
        state.transcript.push(TranscriptEntry::Round(1));
        state.transcript.push(TranscriptEntry::Message {
            speaker: Speaker::Agent,
            text: "A draft".to_string(),
        });
        state.final_draft = Some("The final post".to_string());
        state.status_message = Some("Draft ready".to_string());

        terminal.draw(|f| render(&state, f)).unwrap();
    }

    #[test]
    fn test_render_smoke_input_mode() {
        use ratatui::Terminal;
        use ratatui::backend::TestBackend;

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        let mut state = DashboardState::new(6);
        state.mode = InteractionMode::TopicInput;
        state.topic_input = "rust jobs".to_string();

        terminal.draw(|f| render(&state, f)).unwrap();
    }
}
