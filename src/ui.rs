//! Terminal UI rendering with ratatui

use blocktris::{Cell, GamePhase, Snapshot, TetrominoType};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const EMPTY: &str = "  ";
const BLOCK: &str = "██";

/// Total width needed: board(22) + next/stats(16) = 38
const GAME_WIDTH: u16 = 38;
/// Board(20) + 2 for borders
const GAME_HEIGHT: u16 = 22;

/// Color for a piece type
fn color(piece_type: TetrominoType) -> Color {
    match piece_type {
        TetrominoType::I => Color::Cyan,
        TetrominoType::O => Color::Yellow,
        TetrominoType::T => Color::Magenta,
        TetrominoType::S => Color::Green,
        TetrominoType::Z => Color::Red,
        TetrominoType::J => Color::Blue,
        TetrominoType::L => Color::Rgb(255, 165, 0), // Orange
    }
}

/// Render the whole game screen from a snapshot
pub fn render_game(frame: &mut Frame, snapshot: &Snapshot) {
    let area = frame.area();
    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    // board | next + stats
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(22), // Board (10*2 + 2 for borders)
            Constraint::Length(16), // Next queue + stats
        ])
        .split(game_area);

    render_board(frame, main_layout[0], snapshot);

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(11), // Next queue
            Constraint::Min(6),     // Stats
        ])
        .split(main_layout[1]);

    render_next_queue(frame, right_layout[0], &snapshot.upcoming);
    render_stats(frame, right_layout[1], snapshot);

    match snapshot.phase {
        GamePhase::Idle => render_overlay(frame, area, "BLOCKTRIS", "Enter to start"),
        GamePhase::Paused => render_overlay(frame, area, "PAUSED", "P resume, Enter restart"),
        GamePhase::GameOver => render_overlay(frame, area, "GAME OVER", "Enter for a new game"),
        GamePhase::Running => {}
    }
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the next piece queue
fn render_next_queue(frame: &mut Frame, area: Rect, queue: &[TetrominoType]) {
    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if queue.is_empty() {
        return;
    }

    let piece_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(3); queue.len()])
        .split(inner);

    for (piece_area, &piece_type) in piece_areas.iter().zip(queue) {
        render_mini_piece(frame, *piece_area, piece_type);
    }
}

/// Render a small piece preview, blank rows trimmed
fn render_mini_piece(frame: &mut Frame, area: Rect, piece_type: TetrominoType) {
    if area.height < 1 || area.width < 4 {
        return;
    }

    let shape = piece_type.shape();
    let cells: Vec<(i32, i32)> = shape.cells().collect();
    let height = cells.iter().map(|&(r, _)| r + 1).max().unwrap_or(0);
    let style = Style::default().fg(color(piece_type));

    let lines: Vec<Line> = (0..height)
        .map(|row| {
            let spans: Vec<Span> = (0..shape.size() as i32)
                .map(|col| {
                    if cells.contains(&(row, col)) {
                        Span::styled(BLOCK, style)
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Render the game board
fn render_board(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = snapshot
        .board
        .rows()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Filled(piece_type) => {
                        Span::styled(BLOCK, Style::default().fg(color(*piece_type)))
                    }
                    Cell::Empty => Span::raw(EMPTY),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render stats panel
fn render_stats(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled("SCORE", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", snapshot.score),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::raw(""),
        Line::from(Span::styled("LINES", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", snapshot.lines),
            Style::default().fg(Color::Green),
        )),
        Line::raw(""),
        Line::styled("w a s d", Style::default().fg(Color::DarkGray)),
        Line::styled("p pause  q quit", Style::default().fg(Color::DarkGray)),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render an overlay (for idle/pause/game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_width = 26u16;
    let popup_height = 5u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}
