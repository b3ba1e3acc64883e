//! TUI rendering logic for the schedule browser.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, TableState};

use super::state::{BrowserState, Focus, InputMode};
use crate::controller::FetchPhase;
use crate::schedule::ScheduleView;

/// Border style for a pane, highlighted when focused.
fn border_style(state: &BrowserState, focus: Focus) -> Style {
    if state.focus == focus {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// Draws the schedule browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &BrowserState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(8),    // main content
            Constraint::Length(1), // banner
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state);
    draw_main(frame, chunks[1], state);
    draw_banner(frame, chunks[2], state);
    draw_footer(frame, chunks[3], state);
}

/// Draws the filter input and the current selection.
#[allow(clippy::indexing_slicing)]
fn draw_header(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let filter_style = if state.input_mode == InputMode::Filter {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let filter = Paragraph::new(state.filter.clone())
        .style(filter_style)
        .block(Block::default().borders(Borders::ALL).title(" Filtro: / "));
    frame.render_widget(filter, header_chunks[0]);

    let ctx = state.context();
    let selection = format!(
        "{} / {}",
        ctx.state.as_deref().unwrap_or("Selecione um estado"),
        ctx.city.as_deref().unwrap_or("Selecione uma cidade"),
    );
    let summary = Paragraph::new(selection).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Programação Claro TV "),
    );
    frame.render_widget(summary, header_chunks[1]);
}

/// Draws the three columns: location, window, schedule.
#[allow(clippy::indexing_slicing)]
fn draw_main(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(28),
            Constraint::Percentage(22),
            Constraint::Percentage(50),
        ])
        .split(area);

    let location = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(columns[0]);
    draw_states_pane(frame, location[0], state);
    draw_cities_pane(frame, location[1], state);

    draw_window_pane(frame, columns[1], state);
    draw_schedule_pane(frame, columns[2], state);
}

/// Builds list items with a cursor marker.
fn cursor_items<'a>(names: &[&'a str], cursor: usize, active: bool) -> Vec<ListItem<'a>> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let on_cursor = i == cursor && active;
            let marker = if on_cursor { "\u{25b8} " } else { "  " };
            let style = if on_cursor {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::raw(marker),
                Span::styled(*name, style),
            ]))
        })
        .collect()
}

/// Draws the state list.
fn draw_states_pane(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let names = state.filtered_states();
    let items = cursor_items(&names, state.state_cursor, state.focus == Focus::States);
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(state, Focus::States))
            .title(" Estados "),
    );
    frame.render_widget(list, area);
}

/// Draws the city list, or a disabled placeholder.
fn draw_cities_pane(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Cidades ");

    if !state.cities_enabled() {
        let placeholder = Paragraph::new("Selecione uma cidade")
            .style(Style::default().fg(Color::DarkGray))
            .block(block.border_style(Style::default().fg(Color::DarkGray)));
        frame.render_widget(placeholder, area);
        return;
    }

    let names = state.cities();
    let items = cursor_items(&names, state.city_cursor, state.focus == Focus::Cities);
    let list = List::new(items).block(block.border_style(border_style(state, Focus::Cities)));
    frame.render_widget(list, area);
}

/// Draws the four date/time fields and the fetch button.
#[allow(clippy::indexing_slicing)]
fn draw_window_pane(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let fields = [
        (Focus::StartDate, " Dia inicial "),
        (Focus::StartTime, " Hora inicial "),
        (Focus::EndDate, " Dia final "),
        (Focus::EndTime, " Hora final "),
    ];
    for (i, (focus, title)) in fields.into_iter().enumerate() {
        draw_field(frame, rows[i], state, focus, title);
    }

    let enabled = state.assessment().fetch_enabled();
    let focused = state.focus == Focus::FetchButton;
    let mut style = if enabled {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    if focused {
        style = style.add_modifier(Modifier::REVERSED);
    }
    let button = Paragraph::new("Carregar programação")
        .alignment(Alignment::Center)
        .style(style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(state, Focus::FetchButton)),
        );
    frame.render_widget(button, rows[4]);
}

/// Draws one date/time field.
fn draw_field(frame: &mut Frame, area: Rect, state: &BrowserState, focus: Focus, title: &str) {
    let editing = state.input_mode == InputMode::Edit && state.focus == focus;
    let (text, style) = if editing {
        (
            format!("{}_", state.edit_buffer),
            Style::default().fg(Color::Yellow),
        )
    } else {
        (state.field_text(focus).unwrap_or_default(), Style::default())
    };
    let field = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(state, focus))
            .title(String::from(title)),
    );
    frame.render_widget(field, area);
}

/// Draws the schedule pane.
fn draw_schedule_pane(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(state, Focus::Schedule))
        .title(" Programação ");

    let message = match &state.phase {
        FetchPhase::Idle => "Selecione estado, cidade e período.",
        FetchPhase::Fetching => "Carregando...",
        FetchPhase::Failed(_) => "Nenhuma programação carregada.",
        FetchPhase::Rendered(view) if view.is_empty() => "Nenhum canal encontrado.",
        FetchPhase::Rendered(view) => {
            draw_schedule_table(frame, area, state, view, block);
            return;
        }
    };
    let paragraph = Paragraph::new(message)
        .style(Style::default().fg(Color::DarkGray))
        .block(block);
    frame.render_widget(paragraph, area);
}

/// Draws channel rows with their expanded program tables.
fn draw_schedule_table(
    frame: &mut Frame,
    area: Rect,
    state: &BrowserState,
    view: &ScheduleView,
    block: Block,
) {
    let active = state.focus == Focus::Schedule;
    let mut rows: Vec<Row> = Vec::new();
    let mut cursor_row = 0;

    for (i, channel) in view.rows.iter().enumerate() {
        if i == state.schedule_cursor {
            cursor_row = rows.len();
        }
        let marker = if channel.expanded { "\u{25be} " } else { "\u{25b8} " };
        rows.push(
            Row::new(vec![
                Cell::from(format!("{marker}{}", channel.name)),
                Cell::from(channel.logo_url.clone()).style(Style::default().fg(Color::DarkGray)),
            ])
            .style(Style::default().add_modifier(Modifier::BOLD)),
        );

        if !channel.expanded {
            continue;
        }
        rows.push(Row::new(vec![Cell::from(format!(
            "    Programas do {}",
            channel.name
        ))]));
        rows.push(
            Row::new(vec![Cell::from("    Título"), Cell::from("Horário")])
                .style(Style::default().add_modifier(Modifier::UNDERLINED)),
        );
        for program in &channel.programs {
            rows.push(Row::new(vec![
                Cell::from(format!("    {}", program.title)),
                Cell::from(program.time.clone()),
            ]));
        }
    }

    let highlight = if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let table = Table::new(rows, [Constraint::Percentage(60), Constraint::Percentage(40)])
        .block(block)
        .row_highlight_style(highlight);
    let mut table_state = TableState::default().with_selected(Some(cursor_row));
    frame.render_stateful_widget(table, area, &mut table_state);
}

/// Draws the blocking window error or the last fetch failure.
fn draw_banner(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let text = match (state.assessment().blocking_message(), &state.phase) {
        (Some(message), _) => String::from(message),
        (None, FetchPhase::Failed(error)) => format!("Erro ({}): {error}", error.kind()),
        (None, _) => return,
    };
    let banner = Paragraph::new(text).style(
        Style::default()
            .fg(Color::White)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(banner, area);
}

/// Draws the status line and key hints.
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let hints = match state.input_mode {
        InputMode::Filter => "Digite para filtrar | Enter: confirmar | Esc: limpar",
        InputMode::Edit => "DD/MM/AAAA ou HH:MM | Enter: aplicar | Esc: cancelar",
        InputMode::Normal => {
            "Tab: próximo | \u{2191}\u{2193}: mover/ajustar | PgUp/PgDn: \u{b1}1h | e: editar | /: filtrar | Enter: selecionar | q: sair"
        }
    };
    let mut spans = Vec::new();
    if let Some(status) = &state.status {
        spans.push(Span::styled(
            format!("{status}  "),
            Style::default().fg(Color::Yellow),
        ));
    }
    spans.push(Span::raw(hints));
    let footer = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
