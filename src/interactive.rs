use crate::{
    config::Settings,
    feedback::{Feedback, Mark},
    game::{Game, Outcome, Suggestions},
    history::{History, CHART_BUCKETS},
    stats::Scorer,
    tui::{Event, Tui},
    vocabulary::Vocabulary,
    words::{Letter, Word},
};
use color_eyre::eyre::Result;
use crossterm::event::KeyCode;
use itertools::Itertools;
use ratatui::{
    prelude::*,
    text::ToSpan,
    widgets::{Block, BorderType, Padding, Paragraph, Wrap},
};
use std::{iter, mem};

pub struct App {
    settings: Settings,
    vocabulary: Vocabulary,
    history: History,
    scorer: Scorer,
    game: Game,
    suggestions: Suggestions,
    rows: Vec<Row>,
    cursor: usize,
    mode: Mode,
    status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Word,
    /// Waiting for the player to accept a questionable guess.
    Confirm(Vec<Concern>),
    Feedback,
    RoundOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Concern {
    NotInVocabulary,
    PreviouslyUsed,
}

impl Concern {
    fn question(self, guess: &Word) -> String {
        match self {
            Concern::NotInVocabulary => {
                format!("{guess} is not in the vocabulary list, are you sure you want to use it? (y/n)")
            }
            Concern::PreviouslyUsed => {
                format!("{guess} has already been used as an answer, are you sure you want to use it? (y/n)")
            }
        }
    }
}

enum Action {
    Draw,
    Exit,
}

impl App {
    pub fn new(settings: Settings, vocabulary: Vocabulary, history: History) -> Self {
        let scorer = Scorer::new(history.answers().collect(), settings.weights);
        let game = Game::new(vocabulary.words(), settings.word_length);
        let mut app = App {
            rows: vec![Row::new(settings.word_length)],
            settings,
            vocabulary,
            history,
            scorer,
            game,
            suggestions: Default::default(),
            cursor: 0,
            mode: Mode::Word,
            status: String::new(),
        };
        app.active_block_mut().selected = true;
        app.refresh_suggestions();
        app.fill_suggested_word();
        app
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// runs the application's main loop until the user quits
    pub async fn run(&mut self) -> Result<()> {
        let tui = &mut Tui::start()?;

        self.draw(tui)?;

        while let Some(evt) = tui.next().await {
            match self.handle_event(evt)? {
                Some(Action::Draw) => self.draw(tui)?,
                Some(Action::Exit) => break,
                None => {}
            }
        }

        Ok(())
    }

    fn draw(&self, tui: &mut Tui) -> Result<()> {
        tui.draw(|f| self.render(f.size(), f.buffer_mut()))?;
        Ok(())
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let row_width = 8 * self.word_length() as u16;
        let [_, left, right, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(row_width),
            Constraint::Length(46),
            Constraint::Fill(1),
        ])
        .spacing(1)
        .areas(area);

        // Guess rows and status to the left, newest rows kept in view
        let [rows_area, status_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(5)]).areas(left);
        let visible = (rows_area.height / 3) as usize;
        let skipped = self.rows.len().saturating_sub(visible);
        let row_areas = Layout::vertical(iter::repeat(Constraint::Length(3)).take(visible)).split(rows_area);
        for (row, &area) in self.rows.iter().skip(skipped).zip(row_areas.iter()) {
            row.render(area, buf);
        }
        Paragraph::new(vec![
            Line::from(self.mode_hint().bold()),
            Line::from(self.status.as_str()),
        ])
        .wrap(Wrap { trim: true })
        .render(status_area, buf);

        // Word lists and chart to the right
        let [recommended_area, unused_area, used_area, chart_area] = Layout::vertical([
            Constraint::Length(6),
            Constraint::Fill(1),
            Constraint::Length(5),
            Constraint::Length(CHART_BUCKETS as u16 + 2),
        ])
        .areas(right);

        let Suggestions {
            recommended,
            unused,
            used,
        } = &self.suggestions;
        let recommended_text = if recommended.is_empty() {
            "There are no words left in the recommended word list, sorry... you're on your own!".to_string()
        } else {
            recommended.iter().map(|(word, _)| word).join(" ")
        };
        Paragraph::new(recommended_text)
            .wrap(Wrap { trim: true })
            .block(panel("Recommended", recommended.len()))
            .render(recommended_area, buf);
        Paragraph::new(unused.iter().join(" "))
            .wrap(Wrap { trim: true })
            .block(panel("Unused", unused.len()))
            .render(unused_area, buf);
        Paragraph::new(used.iter().join(" "))
            .wrap(Wrap { trim: true })
            .block(panel("Previously used", used.len()))
            .render(used_area, buf);

        let chart = self.history.tries_chart();
        let bar_width = (chart_area.width as usize)
            .saturating_sub(13)
            .min(self.settings.line_length);
        Paragraph::new(chart.lines(bar_width).into_iter().map(Line::from).collect_vec())
            .block(
                Block::bordered()
                    .border_type(BorderType::Plain)
                    .padding(Padding::horizontal(1))
                    .title(chart.title()),
            )
            .render(chart_area, buf);
    }

    fn mode_hint(&self) -> &'static str {
        match self.mode {
            Mode::Word => "ENTER WORD",
            Mode::Confirm(_) => "CONFIRM WORD",
            Mode::Feedback => "ENTER FEEDBACK  . hit  V present  space absent  - cancel  + solved",
            Mode::RoundOver => "ROUND OVER  Y save and play again  N save and quit  X quit without saving",
        }
    }

    /// updates the application's state based on user input
    fn handle_event(&mut self, evt: Event) -> Result<Option<Action>> {
        match evt {
            Event::Key(key_event) => match self.mode {
                Mode::Word => Ok(self.handle_key_in_word_mode(key_event.code)),
                Mode::Confirm(_) => Ok(self.handle_key_in_confirm_mode(key_event.code)),
                Mode::Feedback => Ok(self.handle_key_in_feedback_mode(key_event.code)),
                Mode::RoundOver => self.handle_key_in_round_over_mode(key_event.code),
            },
            Event::Resize => Ok(Some(Action::Draw)),
        }
    }

    fn handle_key_in_word_mode(&mut self, code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Backspace if self.cursor > 0 => {
                self.set_cursor(self.cursor - 1);
                self.active_block_mut().contents = None;
                Some(Action::Draw)
            }
            KeyCode::Char(ch) if self.cursor < self.word_length() => {
                let letter = Letter::try_from(ch).ok()?;
                self.active_block_mut().contents = Some(letter);
                self.set_cursor(self.cursor + 1);
                Some(Action::Draw)
            }
            KeyCode::Enter => {
                let guess = self.last_row().word()?;
                let concerns = self.concerns(&guess);
                match concerns.first().copied() {
                    Some(concern) => {
                        self.status = concern.question(&guess);
                        self.mode = Mode::Confirm(concerns);
                    }
                    None => self.enter_feedback_mode(),
                }
                Some(Action::Draw)
            }
            KeyCode::Esc => Some(Action::Exit),
            _ => None,
        }
    }

    fn handle_key_in_confirm_mode(&mut self, code: KeyCode) -> Option<Action> {
        let Mode::Confirm(concerns) = &mut self.mode else {
            return None;
        };
        match code {
            KeyCode::Char('y' | 'Y') => {
                concerns.remove(0);
                match (concerns.first().copied(), self.last_row().word()) {
                    (Some(concern), Some(guess)) => self.status = concern.question(&guess),
                    _ => self.enter_feedback_mode(),
                }
                Some(Action::Draw)
            }
            KeyCode::Char('n' | 'N') | KeyCode::Esc => {
                self.mode = Mode::Word;
                self.status = "Pick another word".to_string();
                Some(Action::Draw)
            }
            _ => None,
        }
    }

    fn handle_key_in_feedback_mode(&mut self, code: KeyCode) -> Option<Action> {
        let len = self.word_length();
        match code {
            KeyCode::Enter => {
                let marks = self.last_row().letters.iter().map(|l| l.mark).collect_vec();
                self.commit(Feedback::normalized(marks, len));
                Some(Action::Draw)
            }
            KeyCode::Char(ch) => match Mark::from_symbol(ch)? {
                Mark::Cancel => {
                    self.cancel_guess();
                    Some(Action::Draw)
                }
                Mark::Solved => {
                    self.commit(Feedback::normalized([Mark::Solved], len));
                    Some(Action::Draw)
                }
                mark => {
                    self.active_block_mut().mark = mark;
                    self.set_cursor((self.cursor + 1) % len);
                    Some(Action::Draw)
                }
            },
            KeyCode::Right => {
                self.set_cursor((self.cursor + 1) % len);
                Some(Action::Draw)
            }
            KeyCode::Left => {
                self.set_cursor((self.cursor + len - 1) % len);
                Some(Action::Draw)
            }
            KeyCode::Up => {
                let active_block = self.active_block_mut();
                active_block.mark = active_block.mark.cycle();
                Some(Action::Draw)
            }
            KeyCode::Down => {
                let active_block = self.active_block_mut();
                active_block.mark = active_block.mark.cycle().cycle();
                Some(Action::Draw)
            }
            KeyCode::Esc => Some(Action::Exit),
            _ => None,
        }
    }

    fn handle_key_in_round_over_mode(&mut self, code: KeyCode) -> Result<Option<Action>> {
        match code {
            KeyCode::Char('y' | 'Y') => {
                self.save_round()?;
                self.start_round();
                Ok(Some(Action::Draw))
            }
            KeyCode::Char('n' | 'N') => {
                self.save_round()?;
                Ok(Some(Action::Exit))
            }
            KeyCode::Char('x' | 'X') | KeyCode::Esc => {
                log::info!("round results not saved");
                Ok(Some(Action::Exit))
            }
            _ => Ok(None),
        }
    }

    fn concerns(&self, guess: &Word) -> Vec<Concern> {
        let mut concerns = Vec::new();
        if !self.vocabulary.contains(guess) {
            concerns.push(Concern::NotInVocabulary);
        }
        if self.history.answers().contains(guess) {
            concerns.push(Concern::PreviouslyUsed);
        }
        concerns
    }

    fn enter_feedback_mode(&mut self) {
        self.set_cursor(0);
        self.mode = Mode::Feedback;
        self.status.clear();
        self.apply_expected_feedback();
    }

    fn commit(&mut self, feedback: Feedback) {
        let Some(guess) = self.last_row().word() else {
            return;
        };
        match self.game.apply_feedback(guess, &feedback) {
            Outcome::Cancelled => self.cancel_guess(),
            Outcome::Solved => {
                self.set_cursor(self.word_length());
                for block in &mut self.last_row_mut().letters {
                    block.mark = Mark::Hit;
                }
                self.mode = Mode::RoundOver;
                self.status = format!(
                    "Success! You got it in {}. The guess sequence is: {}",
                    self.game.guesses().len(),
                    self.game.guesses().iter().join(" ")
                );
            }
            Outcome::Narrowed => {
                self.set_cursor(self.word_length());
                self.refresh_suggestions();
                let Suggestions { unused, used, .. } = &self.suggestions;
                self.status = if unused.is_empty() && used.is_empty() {
                    "No words from the vocabulary are left".to_string()
                } else {
                    format!("{} unused and {} previously used words left", unused.len(), used.len())
                };
                self.rows.push(Row::new(self.word_length()));
                self.mode = Mode::Word;
                self.set_cursor(0);
                self.fill_suggested_word();
            }
        }
    }

    fn cancel_guess(&mut self) {
        *self.last_row_mut() = Row::new(self.word_length());
        self.mode = Mode::Word;
        self.status = "Cancelling most recent guess".to_string();
        self.set_cursor(0);
        self.fill_suggested_word();
    }

    fn save_round(&mut self) -> Result<()> {
        let fresh = Game::new(self.vocabulary.words(), self.word_length());
        let game = mem::replace(&mut self.game, fresh);
        self.history.push(game.into_round()?);
        self.history.save(&self.settings.current_file)?;
        self.scorer = Scorer::new(self.history.answers().collect(), self.settings.weights);
        Ok(())
    }

    fn start_round(&mut self) {
        self.game = Game::new(self.vocabulary.words(), self.word_length());
        self.rows = vec![Row::new(self.word_length())];
        self.mode = Mode::Word;
        self.status.clear();
        self.cursor = 0;
        self.active_block_mut().selected = true;
        self.refresh_suggestions();
        self.fill_suggested_word();
    }

    fn refresh_suggestions(&mut self) {
        self.suggestions = self
            .game
            .suggestions(&self.history, &self.scorer, self.settings.recommended);
    }

    fn word_length(&self) -> usize {
        self.settings.word_length
    }

    fn set_cursor(&mut self, new_cursor: usize) {
        let old_cursor = self.cursor;
        self.cursor = new_cursor;
        let row = self.last_row_mut();
        if let Some(block) = row.letters.get_mut(old_cursor) {
            block.selected = false;
        }
        if let Some(block) = row.letters.get_mut(new_cursor) {
            block.selected = true;
        }
    }

    fn last_row(&self) -> &Row {
        self.rows.last().expect("there is always at least one row")
    }

    fn last_row_mut(&mut self) -> &mut Row {
        self.rows
            .last_mut()
            .expect("there is always at least one row")
    }

    fn active_block_mut(&mut self) -> &mut LetterBlock {
        let cursor = self.cursor;
        &mut self.last_row_mut().letters[cursor]
    }

    fn fill_suggested_word(&mut self) {
        let Suggestions { recommended, used, .. } = &self.suggestions;
        let Some(word) = recommended.first().map(|(w, _)| w).or(used.first()).cloned() else {
            return;
        };
        self.last_row_mut()
            .letters
            .iter_mut()
            .zip(word.iter())
            .for_each(|(block, letter)| block.contents = Some(letter));
    }

    fn apply_expected_feedback(&mut self) {
        let definite = (0..self.word_length())
            .map(|pos| self.game.constraints().definite(pos))
            .collect_vec();
        for (block, letter) in self.last_row_mut().letters.iter_mut().zip(definite) {
            if letter.is_some() && block.contents == letter {
                block.mark = Mark::Hit;
            }
        }
    }
}

fn panel(title: &str, count: usize) -> Block<'static> {
    Block::bordered()
        .border_type(BorderType::Plain)
        .padding(Padding::horizontal(1))
        .title(Line::from(vec![
            format!("{title} ").into(),
            "╢".into(),
            count.to_string().dark_gray(),
            "╟".into(),
        ]))
}

#[derive(Debug)]
struct Row {
    letters: Vec<LetterBlock>,
}

impl Row {
    fn new(word_length: usize) -> Self {
        Self {
            letters: vec![LetterBlock::default(); word_length],
        }
    }

    fn word(&self) -> Option<Word> {
        let letters = self.letters.iter().map(|l| l.contents).collect::<Option<Vec<_>>>()?;
        Word::try_from(letters).ok()
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let areas = Layout::horizontal(iter::repeat(Constraint::Length(7)).take(self.letters.len()))
            .spacing(1)
            .split(area);
        for (block, &area) in self.letters.iter().zip(areas.iter()) {
            block.render(area, buf);
        }
    }
}

#[derive(Debug, Default, Clone)]
struct LetterBlock {
    contents: Option<Letter>,
    mark: Mark,
    selected: bool,
}

impl LetterBlock {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let ch = self.contents.map(char::from).unwrap_or(' ');
        let paragraph = Paragraph::new(ch.to_span())
            .style(self.style())
            .alignment(Alignment::Center);
        if area.height < 3 || area.width < 7 {
            paragraph.render(area, buf);
            return;
        }
        paragraph.block(self.block()).render(area, buf);
    }

    fn block(&self) -> Block<'static> {
        let border_type = if self.selected {
            BorderType::Thick
        } else {
            BorderType::Rounded
        };
        Block::bordered()
            .border_type(border_type)
            .padding(Padding::horizontal(2))
    }

    fn style(&self) -> Style {
        let (fg, bg) = match (self.mark, self.selected) {
            (Mark::Hit, false) => (Color::Black, Color::Green),
            (Mark::Hit, true) => (Color::Black, Color::LightGreen),
            (Mark::Present, false) => (Color::Black, Color::Yellow),
            (Mark::Present, true) => (Color::Black, Color::LightYellow),
            (_, false) => (Color::White, Color::Black),
            (_, true) => (Color::Black, Color::DarkGray),
        };
        Style::reset().fg(fg).bg(bg).add_modifier(Modifier::BOLD)
    }
}
