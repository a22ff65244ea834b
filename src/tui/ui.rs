//! UI rendering for the TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame,
};

use super::app::{App, ExtractField, HideField, InputLine, RecordsFocus, Tab};
use crate::flow::extract::TAMPER_WARNING;
use crate::flow::records::EMPTY_RECORDS;
use crate::flow::{ExtractPanel, SubmitState};
use crate::record::{shorten_hash, SteganographyRecord, DEFAULT_HASH_DISPLAY};

/// Main render function.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(8),    // Active tab
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    match app.tab {
        Tab::Hide => render_hide(frame, app, chunks[1]),
        Tab::Extract => render_extract(frame, app, chunks[1]),
        Tab::Records => render_records(frame, app, chunks[1]),
    }
    render_footer(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.title()))
        .select(app.tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Stegchain - {} ", app.api_url))
                .border_style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(tabs, area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match (app.tab, app.records_focus) {
        (Tab::Records, RecordsFocus::Table) => {
            "↑/↓ select | v view | / search | r refresh | Tab switch | Esc quit"
        }
        (Tab::Records, RecordsFocus::Search) => "Enter search | Esc back to table",
        _ => "↑/↓ field | Enter confirm | Tab switch | Esc quit",
    };
    let footer = Paragraph::new(hints).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, area);
}

fn form_layout(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(area)
}

fn render_hide(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = form_layout(area);
    let file_title = match &app.hide.image {
        Some(image) => format!(" PNG image (loaded: {}) ", image.name()),
        None => " PNG image path ".to_string(),
    };
    render_input(
        frame,
        chunks[0],
        &file_title,
        &app.hide_path,
        app.hide_field == HideField::Image,
        "Path to a PNG file, Enter to load",
    );
    render_input(
        frame,
        chunks[1],
        " Text to hide ",
        &app.hide_text,
        app.hide_field == HideField::Text,
        "Enter the text you want to hide",
    );

    let lines = match &app.hide.state {
        SubmitState::Idle => vec![Line::styled(
            "Upload a PNG image and enter text to hide. The text hash is anchored on the blockchain.",
            Style::default().fg(Color::DarkGray),
        )],
        SubmitState::Pending => vec![pending_line("Processing...")],
        SubmitState::Succeeded(record) => {
            let mut lines = vec![Line::styled(
                "Text hidden successfully!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )];
            lines.extend(record_lines(record));
            lines
        }
        SubmitState::Failed(err) => vec![error_line(err.message())],
    };
    render_result(frame, chunks[2], lines);
}

fn render_extract(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = form_layout(area);
    let file_title = match &app.extract.image {
        Some(image) => format!(" Steganographic PNG (loaded: {}) ", image.name()),
        None => " Steganographic PNG path ".to_string(),
    };
    render_input(
        frame,
        chunks[0],
        &file_title,
        &app.extract_path,
        app.extract_field == ExtractField::Image,
        "Path to a PNG file, Enter to load",
    );
    render_input(
        frame,
        chunks[1],
        " Transaction hash ",
        &app.extract_hash,
        app.extract_field == ExtractField::TransactionHash,
        "0x...",
    );

    let lines = if app.extract.state.is_pending() {
        vec![pending_line("Extracting...")]
    } else {
        match app.extract.panel() {
            None => vec![Line::styled(
                "Upload a steganographic image and its transaction hash to recover the text.",
                Style::default().fg(Color::DarkGray),
            )],
            Some(ExtractPanel::Verified { text }) => vec![
                Line::styled(
                    "✓ Text integrity verified",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Line::raw(""),
                Line::raw(text.to_string()),
            ],
            Some(ExtractPanel::Tampered { text, detail }) => {
                let mut lines = vec![
                    Line::styled(
                        "✗ Text integrity verification failed",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    Line::styled(TAMPER_WARNING, Style::default().fg(Color::Red)),
                ];
                if let Some(detail) = detail {
                    lines.push(Line::styled(
                        detail.to_string(),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                if let Some(text) = text {
                    lines.push(Line::raw(""));
                    lines.push(Line::raw(text.to_string()));
                }
                lines
            }
            Some(ExtractPanel::Error { message }) => vec![error_line(message)],
        }
    };
    render_result(frame, chunks[2], lines);
}

fn render_records(frame: &mut Frame, app: &App, area: Rect) {
    let browser = &app.records;
    let result_height = if browser.search_result().is_some() { 8 } else { 0 };
    let error_height = if browser.error().is_some() { 1 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(result_height),
            Constraint::Length(error_height),
            Constraint::Min(3),
        ])
        .split(area);

    let search_title = if browser.is_searching() {
        " Search by transaction hash (searching...) "
    } else {
        " Search by transaction hash "
    };
    render_input(
        frame,
        chunks[0],
        search_title,
        &app.search,
        app.records_focus == RecordsFocus::Search,
        "Press / and enter a transaction hash",
    );

    if let Some(record) = browser.search_result() {
        let result = Paragraph::new(record_lines(record))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Record ")
                    .border_style(Style::default().fg(Color::Green)),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(result, chunks[1]);
    }

    if let Some(error) = browser.error() {
        frame.render_widget(Paragraph::new(error_line(error)), chunks[2]);
    }

    render_table(frame, app, chunks[3]);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let browser = &app.records;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Records ({}) ", browser.records().len()))
        .border_style(if app.records_focus == RecordsFocus::Table {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        });

    if browser.records().is_empty() {
        let text = if browser.is_loading() {
            pending_line("Loading records...")
        } else if browser.is_empty() {
            Line::styled(EMPTY_RECORDS, Style::default().fg(Color::DarkGray))
        } else {
            Line::raw("")
        };
        frame.render_widget(Paragraph::new(text).block(block), area);
        return;
    }

    let header = Row::new([
        "File",
        "Original",
        "Text hash",
        "Transaction",
        "Status",
        "Created",
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = browser.records().iter().map(|r| {
        Row::new([
            r.file_name.clone(),
            r.original_file_name.clone(),
            shorten_hash(&r.text_hash, DEFAULT_HASH_DISPLAY),
            shorten_hash(&r.transaction_hash, DEFAULT_HASH_DISPLAY),
            r.status.to_string(),
            r.format_created_at(),
        ])
        .style(Style::default().fg(status_color(r)))
    });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(18),
            Constraint::Percentage(18),
            Constraint::Length(25),
            Constraint::Length(25),
            Constraint::Length(10),
            Constraint::Length(19),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn status_color(record: &SteganographyRecord) -> Color {
    if record.status.is_completed() {
        Color::Green
    } else {
        Color::Yellow
    }
}

/// Detail lines for one record; hashes are shown in full.
fn record_lines(record: &SteganographyRecord) -> Vec<Line<'static>> {
    let field = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(
                format!("{:<20}", label),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(value),
        ])
    };
    vec![
        field("Transaction hash:", record.transaction_hash.clone()),
        field("Text hash:", record.text_hash.clone()),
        field("Blockchain address:", record.blockchain_address.clone()),
        field("File:", record.file_name.clone()),
        field("Status:", record.status.to_string()),
        field("Created:", record.format_created_at()),
    ]
}

fn pending_line(text: &'static str) -> Line<'static> {
    Line::styled(
        text,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::ITALIC),
    )
}

fn error_line(message: &str) -> Line<'static> {
    Line::styled(message.to_string(), Style::default().fg(Color::Red))
}

fn render_result(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let result = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Result "))
        .wrap(Wrap { trim: false });
    frame.render_widget(result, area);
}

/// Render a single-line input, scrolled so the cursor stays visible.
fn render_input(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    input: &InputLine,
    focused: bool,
    placeholder: &str,
) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let (start, visible) = visible_window(input, inner_width);

    let paragraph = if input.is_empty() {
        Paragraph::new(placeholder.to_string()).style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(visible).style(Style::default().fg(Color::White))
    };

    let widget = paragraph.block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(if focused {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            }),
    );
    frame.render_widget(widget, area);

    if focused {
        let cursor_x = area.x + 1 + (input.cursor() - start) as u16;
        let cursor_y = area.y + 1;
        frame.set_cursor_position((cursor_x.min(area.x + area.width.saturating_sub(2)), cursor_y));
    }
}

/// First visible char index and the visible slice of an input.
fn visible_window(input: &InputLine, width: usize) -> (usize, String) {
    let chars: Vec<char> = input.value().chars().collect();
    if chars.len() <= width || width == 0 {
        return (0, input.value().to_string());
    }
    let start = input.cursor().saturating_sub(width - 1);
    let end = (start + width).min(chars.len());
    (start, chars[start..end].iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_visible_window_follows_cursor() {
        let mut input = InputLine::new();
        input.set("abcdefghij");
        let (start, text) = visible_window(&input, 4);
        assert_eq!(start, 7);
        assert_eq!(text, "hij");

        input.move_cursor_home();
        assert_eq!(visible_window(&input, 4), (0, "abcd".to_string()));
    }

    #[test]
    fn test_render_shows_tabs_and_url() {
        let app = App::new("http://localhost:8080/api/steganography");
        let text = screen(&app);
        assert!(text.contains("Hide Text"));
        assert!(text.contains("Records"));
        assert!(text.contains("localhost:8080"));
    }

    #[test]
    fn test_render_empty_records_message() {
        let mut app = App::new("http://localhost:8080");
        app.tab = Tab::Records;
        app.start();
        app.apply(crate::tui::Resolution::Records(
            crate::flow::RecordsAction::Loaded(Ok(vec![])),
        ));
        assert!(screen(&app).contains("No records found."));
    }
}
