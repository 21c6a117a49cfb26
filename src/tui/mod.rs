pub mod app;
pub mod event;
pub mod layout;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use crate::app::{AppContext, ReaderSession, Result};
use crate::domain::catalog;
use crate::fetcher::{LoadCompletion, LoadTag};

use self::app::{ActivePane, TuiApp};
use self::event::{Action, AppEvent, EventHandler};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Open the reader on `chapter`, or on the last chapter read.
pub async fn run(ctx: Arc<AppContext>, chapter: Option<u16>) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, ctx, chapter).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Loads run on the runtime and come back through `tx`.
struct Loader<'a> {
    ctx: &'a AppContext,
    tx: mpsc::UnboundedSender<LoadCompletion>,
}

impl Loader<'_> {
    fn spawn(&self, tag: LoadTag) {
        tracing::debug!("Loading surah {}", tag.chapter());
        self.ctx.orchestrator.spawn_load(tag, self.tx.clone());
    }
}

async fn run_app(terminal: &mut Tui, ctx: Arc<AppContext>, chapter: Option<u16>) -> Result<()> {
    let mut session = ctx.session();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let loader = Loader { ctx: &ctx, tx };

    let first = match chapter {
        Some(number) => session.select_chapter(number)?,
        None => session.begin_load(),
    };
    loader.spawn(first);

    let mut tui_app = TuiApp::new(session.chapter_number());
    tui_app.retry_hint = ctx.config.keybindings.retry_hint();
    let event_handler = EventHandler::new(Duration::from_millis(100));

    loop {
        let theme = ctx.config.colors.theme(session.prefs().dark_mode);
        terminal.draw(|frame| layout::render(frame, &mut tui_app, &session, theme))?;

        match event_handler.next()? {
            AppEvent::Key(key) => {
                if tui_app.search_input.is_some() {
                    handle_search_key(&mut tui_app, &mut session, key);
                } else {
                    let action = ctx.config.keybindings.get_action(&key);
                    handle_action(&mut tui_app, &mut session, &loader, action);
                }
            }
            AppEvent::Tick => {}
        }

        while let Ok(completion) = rx.try_recv() {
            if session.complete_load(completion) {
                tui_app.clamp_verse_cursor(session.visible_rows().len());
            }
        }
        session.poll_audio();
        session.tick_view(tui_app.verses_height);

        if tui_app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Typing edits the query live; Enter keeps it, Esc drops it.
fn handle_search_key(tui_app: &mut TuiApp, session: &mut ReaderSession, key: KeyEvent) {
    let Some(input) = tui_app.search_input.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Esc => {
            tui_app.search_input = None;
            session.set_query("");
        }
        KeyCode::Enter => {
            tui_app.search_input = None;
        }
        KeyCode::Backspace => {
            input.pop();
            session.set_query(input.clone());
        }
        KeyCode::Char(c) => {
            input.push(c);
            session.set_query(input.clone());
        }
        _ => return,
    }
    tui_app.reset_verse_cursor();
    session.scroll_to(0, tui_app.verses_height);
}

/// Row index in the chapter under the verse cursor.
fn cursor_row(tui_app: &TuiApp, session: &ReaderSession) -> Option<usize> {
    session.visible_rows().get(tui_app.verse_cursor).copied()
}

fn handle_action(
    tui_app: &mut TuiApp,
    session: &mut ReaderSession,
    loader: &Loader<'_>,
    action: Action,
) {
    let visible_len = session.visible_rows().len();
    if action != Action::None {
        tui_app.clear_status();
    }

    match action {
        Action::Quit => {
            tui_app.should_quit = true;
        }
        Action::MoveUp => {
            tui_app.move_up();
            follow_cursor(tui_app, session);
        }
        Action::MoveDown => {
            tui_app.move_down(visible_len);
            follow_cursor(tui_app, session);
        }
        Action::NextPage => {
            tui_app.next_page(visible_len);
            follow_cursor(tui_app, session);
        }
        Action::PrevPage => {
            tui_app.prev_page();
            follow_cursor(tui_app, session);
        }
        Action::ToggleMaximize => {
            tui_app.toggle_maximize();
        }
        Action::NextPane => {
            tui_app.active_pane = tui_app.active_pane.next();
        }
        Action::PrevPane => {
            tui_app.active_pane = tui_app.active_pane.prev();
        }
        Action::Select => match tui_app.active_pane {
            ActivePane::Chapters => match session.select_chapter(tui_app.selected_chapter()) {
                Ok(tag) => {
                    loader.spawn(tag);
                    tui_app.reset_verse_cursor();
                    tui_app.active_pane = ActivePane::Verses;
                }
                Err(e) => tui_app.set_status(e.to_string()),
            },
            ActivePane::Verses | ActivePane::Detail => {
                if let Some(index) = cursor_row(tui_app, session) {
                    if session.row(index).is_some_and(|row| row.is_playable()) {
                        session.play_one(index);
                    } else {
                        tui_app.set_status("No audio for this verse".to_string());
                    }
                }
            }
        },
        Action::PlayAll => {
            session.play_all();
        }
        Action::NextChapter | Action::PrevChapter => {
            let delta = if action == Action::NextChapter { 1 } else { -1 };
            if let Some(tag) = session.navigate(delta) {
                loader.spawn(tag);
                tui_app.follow_chapter(session.chapter_number());
            }
        }
        Action::ToggleFavorite => {
            if let Some(index) = cursor_row(tui_app, session) {
                match session.toggle_favorite(index) {
                    Ok(true) => tui_app.set_status("Added to favorites".to_string()),
                    Ok(false) => tui_app.set_status("Removed from favorites".to_string()),
                    Err(e) => tui_app.set_status(e.to_string()),
                }
                tui_app.clamp_verse_cursor(session.visible_rows().len());
            }
        }
        Action::FavoritesOnly => {
            let on = session.toggle_favorites_only();
            tui_app.reset_verse_cursor();
            session.scroll_to(0, tui_app.verses_height);
            tui_app.set_status(if on {
                "Showing favorites only".to_string()
            } else {
                "Showing all verses".to_string()
            });
        }
        Action::Search => {
            tui_app.search_input = Some(session.filter().query().to_string());
        }
        Action::ToggleDarkMode => {
            session.toggle_dark_mode();
        }
        Action::CycleReciter => {
            loader.spawn(session.cycle_reciter(1));
            let name = catalog::reciter(&session.prefs().reciter).map(|r| r.name);
            tui_app.set_status(format!("Reciter: {}", name.unwrap_or("unknown")));
        }
        Action::CycleTranslation => {
            loader.spawn(session.cycle_translation(1));
            let name = catalog::translation(&session.prefs().translation).map(|t| t.name);
            tui_app.set_status(format!("Translation: {}", name.unwrap_or("unknown")));
        }
        Action::ArabicFontUp | Action::ArabicFontDown => {
            let delta = if action == Action::ArabicFontUp { 2 } else { -2 };
            let size = session.adjust_arabic_font(delta);
            tui_app.set_status(format!("Arabic font size: {}", size));
        }
        Action::TranslationFontUp | Action::TranslationFontDown => {
            let delta = if action == Action::TranslationFontUp { 2 } else { -2 };
            let size = session.adjust_translation_font(delta);
            tui_app.set_status(format!("Translation font size: {}", size));
        }
        Action::Retry => {
            if let Some(tag) = session.retry() {
                loader.spawn(tag);
            }
        }
        Action::None => {}
    }
}

/// Keep the verse cursor on screen after the user moved it.
fn follow_cursor(tui_app: &TuiApp, session: &mut ReaderSession) {
    if tui_app.active_pane == ActivePane::Verses {
        session.scroll_to(tui_app.verse_cursor, tui_app.verses_height);
    }
}
