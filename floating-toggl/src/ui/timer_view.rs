use super::*;
use crate::presentation::TextInput;

/// Draws the timer, input field, status line and controls. Returns the
/// input field's area so the suggestion popup can hang below it.
pub fn render_timer_view(frame: &mut Frame, vm: &ViewModel, ui: &UiState, body: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Timer display
            Constraint::Length(3), // Input
            Constraint::Min(0),    // Room for the suggestion popup
            Constraint::Length(1), // Status
            Constraint::Length(2), // Controls
        ])
        .split(body);

    render_timer(frame, chunks[0], vm);
    render_input(frame, chunks[1], vm, ui);
    render_status(frame, chunks[3], vm);
    render_controls(frame, chunks[4], vm.mode());

    chunks[1]
}

fn render_timer(frame: &mut Frame, area: Rect, vm: &ViewModel) {
    let mode = vm.mode();
    let timer_text = match vm.current_entry_display(time::OffsetDateTime::now_utc()) {
        Some(display) => format!("{} ⏵ (running)", display.format_elapsed()),
        None => "00:00:00 (not running)".to_string(),
    };

    let timer = Paragraph::new(timer_text)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Timer ")
                .border_style(mode_style(mode))
                .padding(Padding::horizontal(1)),
        );

    frame.render_widget(timer, area);
}

fn render_input(frame: &mut Frame, area: Rect, vm: &ViewModel, ui: &UiState) {
    let mode = vm.mode();
    let line = if ui.input.value.is_empty() && mode != Mode::Running {
        Line::from(Span::styled(
            "What are you working on? (#project to tag)",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        input_line(&ui.input, mode == Mode::Running)
    };

    let title = match mode {
        Mode::Running => " Running ",
        Mode::Composing | Mode::Idle => " Description ",
    };

    let input = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(mode_style(mode))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(input, area);
}

/// Text with the selection highlighted and a block cursor when editable.
fn input_line(input: &TextInput, read_only: bool) -> Line<'static> {
    if read_only {
        return Line::from(input.value.clone());
    }

    let selected = Style::default().bg(Color::Blue).fg(Color::White);
    if let Some((start, end)) = input.selection() {
        return Line::from(vec![
            Span::raw(input.value[..start].to_string()),
            Span::styled(input.value[start..end].to_string(), selected),
            Span::raw(input.value[end..].to_string()),
        ]);
    }

    let before = &input.value[..input.cursor];
    let after = &input.value[input.cursor..];
    let mut chars = after.chars();
    let under_cursor = chars.next().map(String::from).unwrap_or_else(|| " ".into());
    Line::from(vec![
        Span::raw(before.to_string()),
        Span::styled(
            under_cursor,
            Style::default().add_modifier(Modifier::REVERSED),
        ),
        Span::raw(chars.as_str().to_string()),
    ])
}

fn render_status(frame: &mut Frame, area: Rect, vm: &ViewModel) {
    let state = vm.state();
    let text = match (&state.credential, &state.profile) {
        (None, _) => Span::styled(
            "No API token set. Press Ctrl+T to add one.",
            Style::default().fg(Color::Yellow),
        ),
        (Some(_), Some(profile)) => Span::styled(
            format!("Signed in as {}", profile.display_name),
            Style::default().fg(Color::DarkGray),
        ),
        (Some(_), None) => Span::styled("Loading…", Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(Paragraph::new(Line::from(text)), area);
}

fn render_controls(frame: &mut Frame, area: Rect, mode: Mode) {
    let key = Style::default().fg(Color::Yellow);
    let dim = Style::default().fg(Color::DarkGray);
    let enter_label = if mode == Mode::Running {
        ": stop  "
    } else {
        ": start  "
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Enter", key),
            Span::styled(enter_label, dim),
            Span::styled("Tab", key),
            Span::styled(": suggestions  ", dim),
            Span::styled("↑/↓", key),
            Span::styled(": select  ", dim),
            Span::styled("Ctrl+S", key),
            Span::styled(": stop", dim),
        ]),
        Line::from(vec![
            Span::styled("Ctrl+T", key),
            Span::styled(": API token  ", dim),
            Span::styled("Esc", key),
            Span::styled(": close  ", dim),
            Span::styled("Ctrl+Q", key),
            Span::styled(": quit", dim),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}
