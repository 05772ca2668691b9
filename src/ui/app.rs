use std::borrow::Cow;
use std::cmp::min;
use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use tracing::debug;

use crate::models::{Recipe, RecipeId};
use crate::store::RecipeStore;

use super::forms::{ConfirmRecipeDelete, RecipeField, RecipeForm};
use super::helpers::{centered_rect, favorite_marker, key_hints, surface_error};
use super::screens::{ListCursor, ListKind, Screen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height allocation per recipe card in list views.
const RECIPE_CARD_HEIGHT: u16 = 4;
/// Rows moved by PageUp/PageDown.
const PAGE_STEP: isize = 5;

/// Fine-grained modes scoped to the current screen.
enum Mode {
    Normal,
    /// Inline search bar. The term itself lives in the store.
    Searching,
    AddingRecipe(RecipeForm),
    EditingRecipe { id: RecipeId, form: RecipeForm },
    ConfirmDelete(ConfirmRecipeDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Application state for the TUI. Owns the recipe store; every read and write
/// of recipes goes through it.
pub struct App {
    store: RecipeStore,
    screen: Screen,
    mode: Mode,
    cursor: ListCursor,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: RecipeStore) -> Self {
        Self {
            store,
            screen: Screen::List(ListKind::All),
            mode: Mode::Normal,
            cursor: ListCursor::default(),
            status: None,
        }
    }

    pub fn store(&self) -> &RecipeStore {
        &self.store
    }

    /// Dispatch a key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Searching => self.handle_search(code),
            Mode::AddingRecipe(form) => self.handle_add_recipe(code, form)?,
            Mode::EditingRecipe { id, form } => self.handle_edit_recipe(code, id, form)?,
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
        };

        self.cursor.ensure_in_bounds(self.visible_len());
        Ok(exit)
    }

    /// Ctrl-modified keys: Ctrl+C quits from anywhere, Ctrl+E edits the
    /// highlighted recipe while searching.
    pub fn handle_ctrl(&mut self, code: KeyCode) -> Result<bool> {
        match code {
            KeyCode::Char('c') => Ok(true),
            KeyCode::Char('e') => {
                if matches!(self.mode, Mode::Searching) {
                    if let Some(recipe) = self.current_recipe() {
                        self.mode = Mode::EditingRecipe {
                            id: recipe.id(),
                            form: RecipeForm::from_recipe(&recipe),
                        };
                    } else {
                        self.set_status("No recipe selected to edit.", StatusKind::Error);
                    }
                }
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::List(kind) => self.handle_list_key(code, kind, exit),
            Screen::Detail { id, from } => self.handle_detail_key(code, id, from, exit),
        }
    }

    fn handle_list_key(&mut self, code: KeyCode, kind: ListKind, exit: &mut bool) -> Result<Mode> {
        let len = self.visible_len();
        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Esc => {
                if kind == ListKind::All {
                    *exit = true;
                } else {
                    self.clear_status();
                    self.open_list(ListKind::All);
                }
            }
            KeyCode::Up => self.cursor.move_selection(-1, len),
            KeyCode::Down => self.cursor.move_selection(1, len),
            KeyCode::PageUp => self.cursor.move_selection(-PAGE_STEP, len),
            KeyCode::PageDown => self.cursor.move_selection(PAGE_STEP, len),
            KeyCode::Home => self.cursor.select_first(),
            KeyCode::End => self.cursor.select_last(len),
            KeyCode::Enter => match self.current_recipe() {
                Some(recipe) => {
                    self.clear_status();
                    self.screen = Screen::Detail {
                        id: recipe.id(),
                        from: kind,
                    };
                }
                None => self.set_status("No recipe selected.", StatusKind::Error),
            },
            KeyCode::Char('f') | KeyCode::Char('/') => {
                if kind != ListKind::All {
                    self.open_list(ListKind::All);
                }
                self.clear_status();
                return Ok(Mode::Searching);
            }
            KeyCode::Char('+') => {
                self.clear_status();
                return Ok(Mode::AddingRecipe(RecipeForm::default()));
            }
            KeyCode::Char('-') => match self.current_recipe() {
                Some(recipe) => {
                    self.clear_status();
                    return Ok(Mode::ConfirmDelete(ConfirmRecipeDelete::from(&recipe)));
                }
                None => self.set_status("No recipe selected to delete.", StatusKind::Error),
            },
            KeyCode::Char('e') | KeyCode::Char('E') => match self.current_recipe() {
                Some(recipe) => {
                    self.clear_status();
                    return Ok(Mode::EditingRecipe {
                        id: recipe.id(),
                        form: RecipeForm::from_recipe(&recipe),
                    });
                }
                None => self.set_status("No recipe selected to edit.", StatusKind::Error),
            },
            KeyCode::Char('*') | KeyCode::Char(' ') => match self.current_recipe() {
                Some(recipe) => self.toggle_favorite(&recipe),
                None => self.set_status("No recipe selected.", StatusKind::Error),
            },
            KeyCode::Char('a') | KeyCode::Char('A') => {
                self.clear_status();
                self.open_list(ListKind::All);
            }
            KeyCode::Char('v') | KeyCode::Char('V') => {
                self.clear_status();
                self.open_list(ListKind::Favorites);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.open_list(ListKind::Recommendations);
                if kind == ListKind::Recommendations {
                    let count = self.store.recommendations().len();
                    self.set_status(
                        format!("Picked {count} new recommendation(s)."),
                        StatusKind::Info,
                    );
                } else {
                    self.clear_status();
                }
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_detail_key(
        &mut self,
        code: KeyCode,
        id: RecipeId,
        from: ListKind,
        exit: &mut bool,
    ) -> Result<Mode> {
        let recipe = self.store.get(id).cloned();
        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Esc | KeyCode::Backspace => {
                self.clear_status();
                self.return_to_list(from, Some(id));
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                if let Some(recipe) = recipe {
                    self.clear_status();
                    return Ok(Mode::EditingRecipe {
                        id,
                        form: RecipeForm::from_recipe(&recipe),
                    });
                }
            }
            KeyCode::Char('-') => {
                if let Some(recipe) = recipe {
                    self.clear_status();
                    return Ok(Mode::ConfirmDelete(ConfirmRecipeDelete::from(&recipe)));
                }
            }
            KeyCode::Char('*') | KeyCode::Char(' ') => {
                if let Some(recipe) = recipe {
                    self.toggle_favorite(&recipe);
                }
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_search(&mut self, code: KeyCode) -> Mode {
        let len = self.visible_len();
        match code {
            KeyCode::Esc => {
                self.store.set_search_term("");
                self.cursor.select_first();
                return Mode::Normal;
            }
            KeyCode::Enter => {
                let matches = self.store.filtered_recipes().len();
                self.set_status(
                    format!("{matches} recipe(s) match \"{}\".", self.store.search_term()),
                    StatusKind::Info,
                );
                return Mode::Normal;
            }
            KeyCode::Up => self.cursor.move_selection(-1, len),
            KeyCode::Down => self.cursor.move_selection(1, len),
            KeyCode::PageUp => self.cursor.move_selection(-PAGE_STEP, len),
            KeyCode::PageDown => self.cursor.move_selection(PAGE_STEP, len),
            KeyCode::Backspace => {
                let mut term = self.store.search_term().to_string();
                term.pop();
                self.store.set_search_term(term);
                self.cursor.select_first();
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                let mut term = self.store.search_term().to_string();
                term.push(ch);
                self.store.set_search_term(term);
                self.cursor.select_first();
            }
            _ => {}
        }
        Mode::Searching
    }

    fn handle_add_recipe(&mut self, code: KeyCode, mut form: RecipeForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add recipe cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_recipe(&form) {
                Ok(_) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::AddingRecipe(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_edit_recipe(
        &mut self,
        code: KeyCode,
        id: RecipeId,
        mut form: RecipeForm,
    ) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Edit cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_existing_recipe(id, &form) {
                Ok(_) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::EditingRecipe { id, form })
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_confirm_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmRecipeDelete,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.perform_delete(&confirm);
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::ConfirmDelete(confirm)),
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match self.screen {
            Screen::List(kind) => self.draw_list(frame, content_area, kind),
            Screen::Detail { id, .. } => self.draw_detail(frame, content_area, id),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingRecipe(form) => self.draw_recipe_form(frame, area, "Add Recipe", form),
            Mode::EditingRecipe { form, .. } => {
                self.draw_recipe_form(frame, area, "Edit Recipe", form)
            }
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Searching => self.draw_search_bar(frame, area),
            Mode::Normal => {}
        }
    }

    fn draw_list(&self, frame: &mut Frame, area: Rect, kind: ListKind) {
        let mut title = kind.to_string();
        if kind == ListKind::All && !self.store.search_term().trim().is_empty() {
            title = format!(
                "{title} (search: \"{}\", {} of {})",
                self.store.search_term(),
                self.store.filtered_recipes().len(),
                self.store.len()
            );
        }
        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), area);
        let mut inner = block.inner(area);

        // Keep the top row free for the search bar overlay.
        if matches!(self.mode, Mode::Searching) && inner.height > 3 {
            inner.y += 3;
            inner.height -= 3;
        }

        let recipes = self.visible_recipes(kind);
        if recipes.is_empty() {
            let message = if kind == ListKind::All && !self.store.is_empty() {
                "No recipes match your search."
            } else {
                kind.empty_message()
            };
            let paragraph = Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Gray))
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, inner);
            return;
        }

        self.render_recipe_cards(frame, inner, &recipes, self.cursor.selected);
    }

    fn render_recipe_cards(
        &self,
        frame: &mut Frame,
        area: Rect,
        recipes: &[Recipe],
        selected: usize,
    ) {
        if recipes.is_empty() || area.height == 0 {
            return;
        }

        let card_height = RECIPE_CARD_HEIGHT as usize;
        let capacity = ((area.height as usize) / card_height).max(1);
        let len = recipes.len();
        let mut start = if selected >= capacity {
            selected + 1 - capacity
        } else {
            0
        };
        if start + capacity > len {
            start = len.saturating_sub(capacity);
        }
        let end = min(start + capacity, len);
        let visible_len = end.saturating_sub(start);
        if visible_len == 0 {
            return;
        }

        let constraints: Vec<Constraint> = (0..visible_len)
            .map(|_| Constraint::Length(RECIPE_CARD_HEIGHT))
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (idx, chunk) in rows.iter().enumerate() {
            let recipe_index = start + idx;
            if chunk.height == 0 || recipe_index >= len {
                break;
            }

            let recipe = &recipes[recipe_index];
            let is_selected = recipe_index == selected;
            let mut block = Block::default().borders(Borders::ALL);
            let mut paragraph_style = Style::default();
            if is_selected {
                block = block.style(Style::default().fg(Color::Yellow));
                paragraph_style = Style::default().fg(Color::Yellow);
            }

            let marker = favorite_marker(self.store.is_favorite(recipe.id()));
            let title = if is_selected {
                format!("▶ {marker} {}", recipe.title())
            } else {
                format!("{marker} {}", recipe.title())
            };
            let description = if recipe.description().is_empty() {
                "No description".to_string()
            } else {
                recipe.description().to_string()
            };
            let lines = vec![
                Line::from(Span::styled(
                    title,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(description, Style::default().fg(Color::Gray))),
            ];

            let paragraph = Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: true })
                .style(paragraph_style);
            frame.render_widget(paragraph, *chunk);
        }
    }

    fn draw_detail(&self, frame: &mut Frame, area: Rect, id: RecipeId) {
        let Some(recipe) = self.store.get(id) else {
            let paragraph = Paragraph::new("Recipe not found")
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
            return;
        };

        let favorite = self.store.is_favorite(id);
        let block = Block::default()
            .title(format!("{} {}", favorite_marker(favorite), recipe.title()))
            .borders(Borders::ALL);

        let mut lines = vec![
            Line::from(Span::styled(
                recipe.title().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        lines.extend(
            recipe
                .description()
                .lines()
                .map(|line| Line::from(line.to_string())),
        );
        lines.push(Line::from(""));
        let favorite_text = if favorite {
            "★ In your favorites"
        } else {
            "☆ Not a favorite"
        };
        lines.push(Line::from(Span::styled(
            favorite_text,
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let term = self.store.search_term();
        let block = Block::default().borders(Borders::ALL).title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {term}")))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let offset = "Search: ".len() as u16 + term.chars().count() as u16;
        let cursor_x = min(inner.x.saturating_add(offset), inner.right().saturating_sub(1));
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn footer_instructions(&self) -> Line<'static> {
        match (&self.screen, &self.mode) {
            (_, Mode::Searching) => key_hints(&[
                ("[type]", "Filter"),
                ("[↑↓]", "Select"),
                ("[Enter]", "Keep"),
                ("[Ctrl+E]", "Edit"),
                ("[Esc]", "Clear"),
            ]),
            (_, Mode::AddingRecipe(_) | Mode::EditingRecipe { .. }) => key_hints(&[
                ("[Tab]", "Switch Field"),
                ("[Enter]", "Save"),
                ("[Esc]", "Cancel"),
            ]),
            (_, Mode::ConfirmDelete(_)) => key_hints(&[("[y]", "Delete"), ("[n]", "Keep")]),
            (Screen::Detail { .. }, _) => key_hints(&[
                ("[*]", "Favorite"),
                ("[e]", "Edit"),
                ("[-]", "Delete"),
                ("[Esc]", "Back"),
                ("[q]", "Quit"),
            ]),
            (Screen::List(ListKind::Recommendations), _) => key_hints(&[
                ("[↑↓]", "Select"),
                ("[Enter]", "Open"),
                ("[*]", "Favorite"),
                ("[r]", "Shuffle"),
                ("[v]", "Favorites"),
                ("[Esc]", "Back"),
                ("[q]", "Quit"),
            ]),
            (Screen::List(ListKind::Favorites), _) => key_hints(&[
                ("[↑↓]", "Select"),
                ("[Enter]", "Open"),
                ("[*]", "Unfavorite"),
                ("[r]", "Recommendations"),
                ("[Esc]", "Back"),
                ("[q]", "Quit"),
            ]),
            (Screen::List(ListKind::All), _) => key_hints(&[
                ("[↑↓]", "Select"),
                ("[Enter]", "Open"),
                ("[f]", "Search"),
                ("[+]", "Add"),
                ("[-]", "Delete"),
                ("[e]", "Edit"),
                ("[*]", "Favorite"),
                ("[v]", "Favorites"),
                ("[r]", "Recommendations"),
                ("[q]", "Quit"),
            ]),
        }
    }

    fn draw_recipe_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &RecipeForm) {
        let popup_area = centered_rect(70, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Title", RecipeField::Title),
            form.build_line("Description", RecipeField::Description),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch field • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (prefix, row) = match form.active {
            RecipeField::Title => ("Title: ", 0),
            RecipeField::Description => ("Description: ", 1),
        };
        let offset = (prefix.len() + form.value_len(form.active)) as u16;
        let cursor_x = min(inner.x + offset, inner.right().saturating_sub(1));
        frame.set_cursor_position((cursor_x, inner.y + row));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmRecipeDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Delete Recipe").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete '{}' permanently?", confirm.title)),
            Line::from("It will also be removed from your favorites."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    fn save_new_recipe(&mut self, form: &RecipeForm) -> Result<()> {
        let draft = form.parse_inputs()?;
        let title = draft.title().to_string();
        let id = self.store.add_recipe(draft);
        debug!(%id, "recipe created from form");
        self.focus_recipe(id);
        self.set_status(format!("Added \"{title}\"."), StatusKind::Info);
        Ok(())
    }

    fn save_existing_recipe(&mut self, id: RecipeId, form: &RecipeForm) -> Result<()> {
        let patch = form.to_patch()?;
        if self.store.update_recipe(id, patch) {
            self.set_status("Recipe updated.", StatusKind::Info);
        } else {
            self.set_status("That recipe no longer exists.", StatusKind::Error);
        }
        Ok(())
    }

    fn perform_delete(&mut self, confirm: &ConfirmRecipeDelete) {
        if self.store.delete_recipe(confirm.id).is_some() {
            self.set_status(format!("Deleted \"{}\".", confirm.title), StatusKind::Info);
        } else {
            self.set_status("That recipe no longer exists.", StatusKind::Error);
        }
        match self.screen {
            // Leaving a detail page for a deleted recipe goes back to its list.
            Screen::Detail { id, from } if id == confirm.id => self.return_to_list(from, None),
            // The snapshot would still list the deleted recipe.
            Screen::List(ListKind::Recommendations) => {
                self.return_to_list(ListKind::Recommendations, None)
            }
            _ => {}
        }
    }

    fn toggle_favorite(&mut self, recipe: &Recipe) {
        if !self.store.contains(recipe.id()) {
            self.set_status("That recipe no longer exists.", StatusKind::Error);
        } else if self.store.toggle_favorite(recipe.id()) {
            self.set_status(
                format!("Added \"{}\" to favorites.", recipe.title()),
                StatusKind::Info,
            );
        } else {
            self.set_status(
                format!("Removed \"{}\" from favorites.", recipe.title()),
                StatusKind::Info,
            );
        }
    }

    /// Switch to a list screen. Opening recommendations always draws a fresh
    /// set, the same way the list regenerates whenever it is shown.
    fn open_list(&mut self, kind: ListKind) {
        if kind == ListKind::Recommendations {
            self.store.generate_recommendations();
        }
        self.screen = Screen::List(kind);
        self.cursor.select_first();
    }

    fn return_to_list(&mut self, kind: ListKind, focus: Option<RecipeId>) {
        self.open_list(kind);
        if let Some(id) = focus {
            self.focus_recipe(id);
        }
    }

    /// Move the cursor onto `id` if the current list shows it.
    fn focus_recipe(&mut self, id: RecipeId) {
        if let Screen::List(kind) = self.screen {
            if let Some(index) = self
                .visible_recipes(kind)
                .iter()
                .position(|recipe| recipe.id() == id)
            {
                self.cursor.selected = index;
            }
        }
    }

    fn visible_recipes(&self, kind: ListKind) -> Cow<'_, [Recipe]> {
        match kind {
            ListKind::All => Cow::Borrowed(self.store.filtered_recipes()),
            ListKind::Favorites => Cow::Owned(self.store.favorite_recipes()),
            ListKind::Recommendations => Cow::Borrowed(self.store.recommendations()),
        }
    }

    fn visible_len(&self) -> usize {
        match self.screen {
            Screen::List(kind) => self.visible_recipes(kind).len(),
            Screen::Detail { .. } => 0,
        }
    }

    fn current_recipe(&self) -> Option<Recipe> {
        match self.screen {
            Screen::List(kind) => self.visible_recipes(kind).get(self.cursor.selected).cloned(),
            Screen::Detail { id, .. } => self.store.get(id).cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::store::CoinFlip;

    fn app() -> App {
        let store = RecipeStore::with_recipes(vec![
            Recipe::new(1, "Rice and Beans", "Tasty and filling").unwrap(),
            Recipe::new(2, "Pasta", "Quick and easy").unwrap(),
            Recipe::new(3, "Fried Rice", "rice and veggies").unwrap(),
        ])
        .unwrap()
        .with_policy(CoinFlip::seeded(5).with_probability(1.0));
        App::new(store)
    }

    fn press(app: &mut App, keys: &str) {
        for ch in keys.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn typing_in_search_filters_the_store() {
        let mut app = app();
        press(&mut app, "f");
        press(&mut app, "rice");
        assert_eq!(app.store().search_term(), "rice");
        assert_eq!(app.store().filtered_recipes().len(), 2);

        app.handle_key(KeyCode::Backspace).unwrap();
        assert_eq!(app.store().search_term(), "ric");

        app.handle_key(KeyCode::Esc).unwrap();
        assert_eq!(app.store().search_term(), "");
        assert_eq!(app.store().filtered_recipes().len(), 3);
    }

    #[test]
    fn add_form_validates_then_saves() {
        let mut app = app();
        press(&mut app, "+");
        press(&mut app, "Soup");
        app.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(&app.mode, Mode::AddingRecipe(form) if form.error.is_some()));
        assert_eq!(app.store().len(), 3);

        app.handle_key(KeyCode::Tab).unwrap();
        press(&mut app, "Warm and hearty");
        app.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.store().len(), 4);
        assert_eq!(app.store().recipes()[3].title(), "Soup");
        assert_eq!(app.cursor.selected, 3);
    }

    #[test]
    fn delete_from_detail_returns_to_list_and_prunes_favorite() {
        let mut app = app();
        press(&mut app, "*");
        assert!(app.store().is_favorite(RecipeId::new(1)));

        app.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(app.screen, Screen::Detail { .. }));
        press(&mut app, "-");
        press(&mut app, "y");

        assert_eq!(app.screen, Screen::List(ListKind::All));
        assert!(app.store().get(RecipeId::new(1)).is_none());
        assert!(app.store().favorites().is_empty());
    }

    #[test]
    fn cancelled_delete_keeps_recipe() {
        let mut app = app();
        press(&mut app, "-");
        app.handle_key(KeyCode::Esc).unwrap();
        assert_eq!(app.store().len(), 3);
    }

    #[test]
    fn recommendations_skip_favorites() {
        let mut app = app();
        press(&mut app, "*");
        press(&mut app, "r");
        assert_eq!(app.screen, Screen::List(ListKind::Recommendations));
        let ids: Vec<u64> = app
            .store()
            .recommendations()
            .iter()
            .map(|r| r.id().get())
            .collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn deleting_a_recommendation_refreshes_the_list() {
        let mut app = app();
        press(&mut app, "r");
        assert_eq!(app.store().recommendations().len(), 3);

        press(&mut app, "-");
        press(&mut app, "y");
        assert_eq!(app.screen, Screen::List(ListKind::Recommendations));
        assert!(app.store().get(RecipeId::new(1)).is_none());
        let ids: Vec<u64> = app
            .store()
            .recommendations()
            .iter()
            .map(|r| r.id().get())
            .collect();
        assert_eq!(ids, vec![2, 3]);

        // The selection now points at a live recipe.
        press(&mut app, "*");
        assert!(app.store().is_favorite(RecipeId::new(2)));
    }

    #[test]
    fn favoriting_a_deleted_recipe_reports_it_missing() {
        let mut app = app();
        let stale = app.store().get(RecipeId::new(1)).cloned().unwrap();
        app.store.delete_recipe(stale.id());
        let version = app.store().version();

        app.toggle_favorite(&stale);
        assert!(app.store().favorites().is_empty());
        assert_eq!(app.store().version(), version);
        assert!(render(&app).contains("That recipe no longer exists."));
    }

    #[test]
    fn search_cursor_stays_inside_the_popup() {
        let mut app = app();
        press(&mut app, "f");
        press(&mut app, &"long search term ".repeat(5));

        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let position = terminal.get_cursor_position().unwrap();
        assert!(position.x < 39, "cursor at column {}", position.x);
    }

    #[test]
    fn edit_updates_recipe_in_place() {
        let mut app = app();
        app.handle_key(KeyCode::Down).unwrap();
        press(&mut app, "e");
        for _ in 0.."Pasta".len() {
            app.handle_key(KeyCode::Backspace).unwrap();
        }
        press(&mut app, "Lasagna");
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(
            app.store().get(RecipeId::new(2)).unwrap().title(),
            "Lasagna"
        );
        assert_eq!(app.store().recipes()[1].id(), RecipeId::new(2));
    }

    #[test]
    fn renders_list_and_empty_search() {
        let mut app = app();
        let screen = render(&app);
        assert!(screen.contains("Recipe List"));
        assert!(screen.contains("Rice and Beans"));

        press(&mut app, "f");
        press(&mut app, "pizza");
        let screen = render(&app);
        assert!(screen.contains("No recipes match your search."));
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        assert!(app.handle_ctrl(KeyCode::Char('c')).unwrap());
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }
}
