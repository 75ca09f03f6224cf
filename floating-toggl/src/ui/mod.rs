use crate::presentation::UiState;
use crate::view_model::{Mode, ViewModel};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph},
    Frame,
};

mod timer_view;
pub(super) mod utils;

pub fn render(frame: &mut Frame, vm: &ViewModel, ui: &UiState) {
    let area = frame.area();
    let input_area = timer_view::render_timer_view(frame, vm, ui, area);

    if ui.popup_visible {
        render_suggestions(frame, vm, ui, input_area);
    }

    // Token prompt renders on top of everything else
    if ui.token_prompt.is_some() {
        render_token_prompt(frame, ui);
    }
}

fn render_suggestions(frame: &mut Frame, vm: &ViewModel, ui: &UiState, input_area: Rect) {
    let suggestions = vm.completions();
    if suggestions.is_empty() {
        return;
    }

    let height = (suggestions.len() as u16).saturating_add(2).min(10);
    let area = utils::below(input_area, height, frame.area());
    frame.render_widget(Clear, area);

    let items: Vec<ListItem> = suggestions
        .iter()
        .map(|s| {
            let style = if s.starts_with('#') {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };
            ListItem::new(Span::styled(s.clone(), style))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    state.select(Some(ui.selected_index));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_token_prompt(frame: &mut Frame, ui: &UiState) {
    let Some(prompt) = &ui.token_prompt else {
        return;
    };

    let area = utils::centered_rect(60, 7, frame.area());
    frame.render_widget(Clear, area);

    let masked = "•".repeat(prompt.value.chars().count());
    let lines = vec![
        Line::from("Toggl API token (https://toggl.com/app/profile):"),
        Line::from(""),
        Line::from(Span::styled(masked, Style::default().fg(Color::Yellow))),
        Line::from(""),
        Line::from(Span::styled(
            "Enter: save (empty signs out)  Esc: cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Set API Token ")
            .border_style(Style::default().fg(Color::Yellow))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(paragraph, area);
}

fn mode_style(mode: Mode) -> Style {
    match mode {
        Mode::Running => Style::default().fg(Color::Green),
        Mode::Composing => Style::default().fg(Color::Magenta),
        Mode::Idle => Style::default(),
    }
}
