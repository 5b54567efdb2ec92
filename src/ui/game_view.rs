use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::controller::{Connectivity, TurnController};
use crate::game::{Board, DiscColor, GameOutcome, Phase, Side};
use crate::stats::{Tally, TallyStore};

/// Everything the view needs besides the controller itself.
pub struct ViewState<'a> {
    pub selected_column: usize,
    pub human_first: bool,
    pub oracle_name: &'a str,
}

pub fn render<S: TallyStore>(frame: &mut Frame, controller: &TurnController<S>, view: &ViewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Board
            Constraint::Length(3), // Status
            Constraint::Length(4), // Tallies
            Constraint::Length(4), // Controls
        ])
        .split(frame.area());

    render_header(frame, controller, view, chunks[0]);
    render_board(frame, controller, view.selected_column, chunks[1]);
    render_status(frame, controller, chunks[2]);
    render_tallies(frame, controller, chunks[3]);
    render_controls(frame, view.human_first, chunks[4]);
}

fn disc_color(color: DiscColor) -> Color {
    match color {
        DiscColor::Red => Color::Red,
        DiscColor::Blue => Color::Blue,
    }
}

fn render_header<S: TallyStore>(
    frame: &mut Frame,
    controller: &TurnController<S>,
    view: &ViewState,
    area: Rect,
) {
    let phase = controller.phase();
    let turn = match phase {
        Phase::Idle => "Not started".to_string(),
        Phase::AwaitingHuman => "Your move".to_string(),
        Phase::AwaitingOpponent => "Opponent to move".to_string(),
        Phase::Finished(_) => "Game Over".to_string(),
    };

    let mut spans = vec![Span::styled(
        format!("{}  |  vs {} ({})  |  ", turn, controller.variant(), view.oracle_name),
        Style::default().add_modifier(Modifier::BOLD),
    )];

    if phase == Phase::Idle {
        spans.push(Span::raw("no game"));
    } else {
        for (i, side) in [Side::Human, Side::Opponent].into_iter().enumerate() {
            let color = controller.color_of(side);
            let sep = if i == 0 { "" } else { "  " };
            spans.push(Span::raw(format!("{}{}: ", sep, side.name())));
            spans.push(Span::styled(color.name(), Style::default().fg(disc_color(color))));
        }
    }

    let header = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Connect Four"));

    frame.render_widget(header, area);
}

/// Cells of the winning run, when the game ended with one.
fn winning_cells<S: TallyStore>(controller: &TurnController<S>) -> Vec<(usize, usize)> {
    match controller.phase() {
        Phase::Finished(GameOutcome::Winner(side)) => controller
            .board()
            .winning_line(side.to_cell())
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn render_board<S: TallyStore>(
    frame: &mut Frame,
    controller: &TurnController<S>,
    selected_column: usize,
    area: Rect,
) {
    let board: &Board = controller.board();
    let cols = board.cols();
    let highlight = winning_cells(controller);
    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")];
    for col in 0..cols {
        let label = format!("{:^3}", col + 1);
        if col == selected_column {
            col_line.push(Span::styled(
                label,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            col_line.push(Span::raw(label));
        }
    }
    col_line.push(Span::raw("  "));
    lines.push(Line::from(col_line));

    let bar = "═".repeat(cols * 3 + 1);
    lines.push(Line::from(format!("  ╔{}╗", bar)));

    for row in 0..board.rows() {
        let mut row_spans = vec![Span::raw("  ║")];

        for col in 0..cols {
            let span = match Side::from_cell(board.get(row, col)) {
                None => Span::styled(" . ", Style::default().fg(Color::DarkGray)),
                Some(side) => {
                    let mut style = Style::default().fg(disc_color(controller.color_of(side)));
                    if highlight.contains(&(row, col)) {
                        style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
                    }
                    Span::styled(" ● ", style)
                }
            };
            row_spans.push(span);
        }

        row_spans.push(Span::raw(" ║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from(format!("  ╚{}╝", bar)));

    // Selection indicator, dimmed when the column cannot take a piece
    let mut indicator_line = vec![Span::raw("   ")];
    for col in 0..cols {
        if col == selected_column {
            let color = if board.is_column_full(col) {
                Color::DarkGray
            } else {
                Color::Cyan
            };
            indicator_line.push(Span::styled(" ▲ ", Style::default().fg(color)));
        } else {
            indicator_line.push(Span::raw("   "));
        }
    }
    indicator_line.push(Span::raw("  "));
    lines.push(Line::from(indicator_line));

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_status<S: TallyStore>(frame: &mut Frame, controller: &TurnController<S>, area: Rect) {
    let connectivity = controller.connectivity();
    let advisory_color = match connectivity {
        Connectivity::Unknown => Color::DarkGray,
        Connectivity::Connected => Color::Green,
        Connectivity::Unreachable => Color::Red,
    };

    let line = Line::from(vec![
        Span::styled(controller.status(), Style::default().fg(Color::Yellow)),
        Span::raw("   "),
        Span::styled(connectivity.message(), Style::default().fg(advisory_color)),
    ]);

    let status = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(status, area);
}

fn tally_line(label: &str, tally: Tally) -> Line<'static> {
    Line::from(format!(
        "{:<10} You {:>4}   Opponent {:>4}   Draws {:>4}",
        label, tally.human, tally.opponent, tally.draws
    ))
}

fn render_tallies<S: TallyStore>(frame: &mut Frame, controller: &TurnController<S>, area: Rect) {
    let (variant, total) = controller.tallies();
    let lines = vec![
        tally_line(controller.variant(), variant),
        tally_line("All", total),
    ];

    let tallies = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Record"));

    frame.render_widget(tallies, area);
}

fn render_controls(frame: &mut Frame, human_first: bool, area: Rect) {
    let line1 = Line::from("←/→: Move  |  Enter: Drop  |  1-9: Drop in column  |  Q: Quit");
    let first = (if human_first { Side::Human } else { Side::Opponent }).name();
    let line2 = Line::from(vec![
        Span::raw("S: Start  X: Resign  R: Reset  F: First mover = "),
        Span::styled(first, Style::default().add_modifier(Modifier::BOLD)),
    ]);

    let controls = Paragraph::new(vec![line1, line2])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(controls, area);
}
