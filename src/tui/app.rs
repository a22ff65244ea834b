//! Application state for the TUI.
//!
//! The app owns one flow per tab plus the raw text of every input field.
//! Inputs are pushed into the flows only when the user confirms, so the
//! flows see exactly what gets submitted.

use crate::api::StegoGateway;
use crate::flow::{
    ExtractAction, ExtractEffect, ExtractFlow, HideAction, HideEffect, HideFlow, RecordsAction,
    RecordsBrowser, RecordsEffect, SubmitState,
};
use crate::upload::ImageFile;

/// Top-level tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Hide,
    Extract,
    Records,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Hide, Tab::Extract, Tab::Records];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Hide => "Hide Text",
            Tab::Extract => "Extract Text",
            Tab::Records => "Records",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Hide => 0,
            Tab::Extract => 1,
            Tab::Records => 2,
        }
    }

    pub fn next(&self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn previous(&self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Fields of the hide form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideField {
    Image,
    Text,
}

/// Fields of the extract form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractField {
    Image,
    TransactionHash,
}

/// What receives keys on the records tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordsFocus {
    Table,
    Search,
}

/// A single-line text input with a cursor counted in characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputLine {
    value: String,
    cursor: usize,
}

impl InputLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Replace the content and put the cursor at the end.
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Insert a character at the cursor.
    pub fn enter_char(&mut self, c: char) {
        let index = self.byte_index();
        self.value.insert(index, c);
        self.move_cursor_right();
    }

    /// Delete the character before the cursor.
    pub fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let before = self.value.chars().take(self.cursor - 1);
        let after = self.value.chars().skip(self.cursor);
        self.value = before.chain(after).collect();
        self.move_cursor_left();
    }

    /// Delete the character under the cursor.
    pub fn delete_char_forward(&mut self) {
        if self.cursor >= self.value.chars().count() {
            return;
        }
        let before = self.value.chars().take(self.cursor);
        let after = self.value.chars().skip(self.cursor + 1);
        self.value = before.chain(after).collect();
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.clamp_cursor(self.cursor.saturating_sub(1));
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = self.clamp_cursor(self.cursor.saturating_add(1));
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    fn clamp_cursor(&self, position: usize) -> usize {
        position.min(self.value.chars().count())
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor)
            .unwrap_or(self.value.len())
    }
}

/// A gateway call requested by one of the flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingCall {
    Hide(HideEffect),
    Extract(ExtractEffect),
    Records(RecordsEffect),
}

impl PendingCall {
    /// Performs the call and wraps the outcome for the owning flow.
    pub async fn perform(self, gateway: &dyn StegoGateway) -> Resolution {
        match self {
            PendingCall::Hide(effect) => Resolution::Hide(effect.perform(gateway).await),
            PendingCall::Extract(effect) => Resolution::Extract(effect.perform(gateway).await),
            PendingCall::Records(effect) => Resolution::Records(effect.perform(gateway).await),
        }
    }
}

/// The outcome of a [`PendingCall`], routed back to its flow.
#[derive(Debug, Clone)]
pub enum Resolution {
    Hide(HideAction),
    Extract(ExtractAction),
    Records(RecordsAction),
}

/// Application state for the stegchain TUI.
pub struct App {
    pub tab: Tab,
    pub should_quit: bool,
    /// Backend base URL, shown in the header.
    pub api_url: String,

    pub hide: HideFlow,
    pub hide_path: InputLine,
    pub hide_text: InputLine,
    pub hide_field: HideField,

    pub extract: ExtractFlow,
    pub extract_path: InputLine,
    pub extract_hash: InputLine,
    pub extract_field: ExtractField,

    pub records: RecordsBrowser,
    pub search: InputLine,
    pub records_focus: RecordsFocus,
    /// Highlighted table row.
    pub selected: usize,
}

impl App {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            tab: Tab::Hide,
            should_quit: false,
            api_url: api_url.into(),
            hide: HideFlow::new(),
            hide_path: InputLine::new(),
            hide_text: InputLine::new(),
            hide_field: HideField::Image,
            extract: ExtractFlow::new(),
            extract_path: InputLine::new(),
            extract_hash: InputLine::new(),
            extract_field: ExtractField::Image,
            records: RecordsBrowser::new(),
            search: InputLine::new(),
            records_focus: RecordsFocus::Table,
            selected: 0,
        }
    }

    /// Initial bulk load of the records list.
    pub fn start(&mut self) -> Option<PendingCall> {
        self.reduce_records(RecordsAction::Load)
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
    }

    pub fn previous_tab(&mut self) {
        self.tab = self.tab.previous();
    }

    /// The input receiving typed characters, if any.
    pub fn focused_input(&mut self) -> Option<&mut InputLine> {
        match self.tab {
            Tab::Hide => Some(match self.hide_field {
                HideField::Image => &mut self.hide_path,
                HideField::Text => &mut self.hide_text,
            }),
            Tab::Extract => Some(match self.extract_field {
                ExtractField::Image => &mut self.extract_path,
                ExtractField::TransactionHash => &mut self.extract_hash,
            }),
            Tab::Records => match self.records_focus {
                RecordsFocus::Search => Some(&mut self.search),
                RecordsFocus::Table => None,
            },
        }
    }

    /// Down arrow: next field, or next table row.
    pub fn focus_next(&mut self) {
        match self.tab {
            Tab::Hide => self.hide_field = HideField::Text,
            Tab::Extract => self.extract_field = ExtractField::TransactionHash,
            Tab::Records => self.select_next(),
        }
    }

    /// Up arrow: previous field, or previous table row.
    pub fn focus_previous(&mut self) {
        match self.tab {
            Tab::Hide => self.hide_field = HideField::Image,
            Tab::Extract => self.extract_field = ExtractField::Image,
            Tab::Records => self.select_previous(),
        }
    }

    pub fn select_next(&mut self) {
        let len = self.records.records().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Enter key: load the picked file and advance, or submit.
    pub fn confirm(&mut self) -> Option<PendingCall> {
        match self.tab {
            Tab::Hide => match self.hide_field {
                HideField::Image => {
                    self.select_hide_image();
                    self.hide_field = HideField::Text;
                    None
                }
                HideField::Text => self.submit_hide(),
            },
            Tab::Extract => match self.extract_field {
                ExtractField::Image => {
                    self.select_extract_image();
                    self.extract_field = ExtractField::TransactionHash;
                    None
                }
                ExtractField::TransactionHash => self.submit_extract(),
            },
            Tab::Records => match self.records_focus {
                RecordsFocus::Search => self.search_records(),
                RecordsFocus::Table => self.view_selected(),
            },
        }
    }

    pub fn submit_hide(&mut self) -> Option<PendingCall> {
        self.select_hide_image();
        let text = self.hide_text.value().to_string();
        self.reduce_hide(HideAction::SetText(text));
        self.reduce_hide(HideAction::Submit)
    }

    pub fn submit_extract(&mut self) -> Option<PendingCall> {
        self.select_extract_image();
        let hash = self.extract_hash.value().to_string();
        self.reduce_extract(ExtractAction::SetTransactionHash(hash));
        self.reduce_extract(ExtractAction::Submit)
    }

    pub fn search_records(&mut self) -> Option<PendingCall> {
        let input = self.search.value().to_string();
        self.reduce_records(RecordsAction::SetSearchInput(input));
        self.reduce_records(RecordsAction::Search)
    }

    pub fn refresh_records(&mut self) -> Option<PendingCall> {
        self.reduce_records(RecordsAction::Load)
    }

    /// Shows the highlighted row in the search slot. Never fetches.
    pub fn view_selected(&mut self) -> Option<PendingCall> {
        let hash = self
            .records
            .records()
            .get(self.selected)?
            .transaction_hash
            .clone();
        let call = self.reduce_records(RecordsAction::View(hash));
        self.search.set(self.records.search_input());
        call
    }

    /// Feeds a finished call back into its flow.
    pub fn apply(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::Hide(action) => {
                self.reduce_hide(action);
                if matches!(self.hide.state, SubmitState::Succeeded(_)) {
                    self.hide_path.clear();
                    self.hide_text.clear();
                    self.hide_field = HideField::Image;
                }
            }
            Resolution::Extract(action) => {
                self.reduce_extract(action);
            }
            Resolution::Records(action) => {
                self.reduce_records(action);
                let len = self.records.records().len();
                self.selected = self.selected.min(len.saturating_sub(1));
            }
        }
    }

    fn select_hide_image(&mut self) {
        if let Some(action) = load_image(self.hide_path.value()) {
            self.reduce_hide(match action {
                Ok(image) => HideAction::SelectFile(image),
                Err(reason) => HideAction::RejectFile(reason),
            });
        }
    }

    fn select_extract_image(&mut self) {
        if let Some(action) = load_image(self.extract_path.value()) {
            self.reduce_extract(match action {
                Ok(image) => ExtractAction::SelectFile(image),
                Err(reason) => ExtractAction::RejectFile(reason),
            });
        }
    }

    fn reduce_hide(&mut self, action: HideAction) -> Option<PendingCall> {
        let (state, effect) = std::mem::take(&mut self.hide).reduce(action).into_parts();
        self.hide = state;
        effect.map(PendingCall::Hide)
    }

    fn reduce_extract(&mut self, action: ExtractAction) -> Option<PendingCall> {
        let (state, effect) = std::mem::take(&mut self.extract).reduce(action).into_parts();
        self.extract = state;
        effect.map(PendingCall::Extract)
    }

    fn reduce_records(&mut self, action: RecordsAction) -> Option<PendingCall> {
        let (state, effect) = std::mem::take(&mut self.records).reduce(action).into_parts();
        self.records = state;
        effect.map(PendingCall::Records)
    }
}

/// Reads the file at `path`; `None` when the field is blank.
fn load_image(path: &str) -> Option<Result<ImageFile, String>> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    Some(ImageFile::from_path(path).map_err(|e| format!("Could not read {}: {}", path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{RecordStatus, SteganographyRecord};

    fn record(id: &str, tx: &str) -> SteganographyRecord {
        SteganographyRecord {
            id: id.into(),
            file_name: format!("stego_{id}.png"),
            original_file_name: format!("{id}.png"),
            text_hash: "2cf24d".into(),
            transaction_hash: tx.into(),
            blockchain_address: "0x1111".into(),
            status: RecordStatus::Completed,
            created_at: "2024-03-01T10:15:30".into(),
        }
    }

    fn type_into(input: &mut InputLine, text: &str) {
        for c in text.chars() {
            input.enter_char(c);
        }
    }

    #[test]
    fn test_input_handling() {
        let mut input = InputLine::new();
        type_into(&mut input, "Hi");
        assert_eq!(input.value(), "Hi");
        assert_eq!(input.cursor(), 2);

        input.move_cursor_home();
        input.delete_char_forward();
        assert_eq!(input.value(), "i");

        input.move_cursor_end();
        input.delete_char();
        assert!(input.is_empty());
    }

    #[test]
    fn test_input_handles_multibyte_chars() {
        let mut input = InputLine::new();
        type_into(&mut input, "héllo");
        input.move_cursor_left();
        input.enter_char('!');
        assert_eq!(input.value(), "héll!o");
    }

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::Hide.next(), Tab::Extract);
        assert_eq!(Tab::Records.next(), Tab::Hide);
        assert_eq!(Tab::Hide.previous(), Tab::Records);
    }

    #[test]
    fn test_start_requests_bulk_load() {
        let mut app = App::new("http://localhost:8080");
        assert_eq!(app.start(), Some(PendingCall::Records(RecordsEffect::FetchAll)));
        assert!(app.records.is_loading());
    }

    #[test]
    fn test_submit_hide_without_file_issues_no_call() {
        let mut app = App::new("http://localhost:8080");
        type_into(&mut app.hide_text, "hello");
        assert!(app.submit_hide().is_none());
        assert!(app.hide.state.error().is_some());
    }

    #[test]
    fn test_unreadable_path_is_validation_error() {
        let mut app = App::new("http://localhost:8080");
        type_into(&mut app.hide_path, "/definitely/not/here.png");
        assert!(app.confirm().is_none());
        let message = app.hide.state.error().unwrap().message().to_string();
        assert!(message.starts_with("Could not read"));
        assert_eq!(app.hide_field, HideField::Text);
    }

    #[test]
    fn test_path_edit_while_hide_pending_issues_no_second_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let mut app = App::new("http://localhost:8080");
        app.hide_path.set(path.display().to_string());
        type_into(&mut app.hide_text, "hello");
        assert!(matches!(app.submit_hide(), Some(PendingCall::Hide(_))));

        app.hide_path.set("/nope/missing.png");
        assert!(app.submit_hide().is_none());
        assert!(app.hide.state.is_pending());
    }

    #[test]
    fn test_view_selected_fills_search_without_call() {
        let mut app = App::new("http://localhost:8080");
        app.start();
        app.apply(Resolution::Records(RecordsAction::Loaded(Ok(vec![
            record("1", "0xa"),
            record("2", "0xb"),
        ]))));
        app.select_next();
        assert!(app.view_selected().is_none());
        assert_eq!(app.search.value(), "0xb");
        assert_eq!(
            app.records.search_result().map(|r| r.id.as_str()),
            Some("2")
        );
    }

    #[test]
    fn test_selection_clamped_after_reload() {
        let mut app = App::new("http://localhost:8080");
        app.start();
        app.apply(Resolution::Records(RecordsAction::Loaded(Ok(vec![
            record("1", "0xa"),
            record("2", "0xb"),
        ]))));
        app.select_next();
        app.refresh_records();
        app.apply(Resolution::Records(RecordsAction::Loaded(Ok(vec![record(
            "1", "0xa",
        )]))));
        assert_eq!(app.selected, 0);
    }
}
