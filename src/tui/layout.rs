use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::config::ThemeConfig;
use crate::domain::catalog::{self, CHAPTERS};
use crate::domain::TextCell;
use crate::playback::AudioOutput;
use crate::session::{LoadState, Session};
use crate::share;
use crate::store::PreferenceStore;
use crate::tui::app::{ActivePane, TuiApp};

pub fn render<S: PreferenceStore, O: AudioOutput>(
    frame: &mut Frame,
    app: &mut TuiApp,
    session: &Session<S, O>,
    theme: &ThemeConfig,
) {
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        frame.area(),
    );

    if app.maximized {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(10),   // Detail pane (full height)
                Constraint::Length(1), // Status bar
            ])
            .split(frame.area());

        render_detail_pane(frame, app, session, chunks[0], theme);
        render_status_bar(frame, app, session, chunks[1], theme);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Panes
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(30), // Chapter list
            Constraint::Min(30),    // Verses + detail
        ])
        .split(rows[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(60), // Verse list
            Constraint::Min(8),         // Detail
        ])
        .split(columns[1]);

    render_chapters_pane(frame, app, columns[0], theme);
    render_verses_pane(frame, app, session, right[0], theme);
    render_detail_pane(frame, app, session, right[1], theme);
    render_status_bar(frame, app, session, rows[1], theme);
}

fn border_style(app: &TuiApp, pane: ActivePane, theme: &ThemeConfig) -> Style {
    if app.active_pane == pane {
        Style::default().fg(theme.active_border)
    } else {
        Style::default().fg(theme.inactive_border)
    }
}

fn highlight_style(app: &TuiApp, pane: ActivePane, theme: &ThemeConfig) -> Style {
    let style = Style::default().bg(theme.selection_bg).fg(theme.selection_fg);
    if app.active_pane == pane {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

fn cell_span<'a>(cell: &TextCell, display: &'a str, color: Color, theme: &ThemeConfig) -> Span<'a> {
    match cell {
        TextCell::Available(_) => Span::styled(display, Style::default().fg(color)),
        TextCell::Unavailable => Span::styled(
            display,
            Style::default()
                .fg(theme.unavailable_text)
                .add_modifier(Modifier::ITALIC),
        ),
    }
}

fn render_chapters_pane(frame: &mut Frame, app: &mut TuiApp, area: Rect, theme: &ThemeConfig) {
    let items: Vec<ListItem> = CHAPTERS
        .iter()
        .map(|chapter| ListItem::new(format!("{:>3} {}", chapter.number, chapter.name)))
        .collect();

    let title = format!(" Surahs [{}/{}] ", app.selected_chapter(), CHAPTERS.len());

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(app, ActivePane::Chapters, theme));

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style(app, ActivePane::Chapters, theme))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.chapter_list_state);
}

fn render_verses_pane<S: PreferenceStore, O: AudioOutput>(
    frame: &mut Frame,
    app: &mut TuiApp,
    session: &Session<S, O>,
    area: Rect,
    theme: &ThemeConfig,
) {
    let info = catalog::chapter(session.chapter_number());
    let mut title = match info {
        Some(info) => format!(
            " {}. {} ({}) · {} verses · {} ",
            info.number, info.name, info.translation, info.verse_count, info.revelation
        ),
        None => format!(" Surah {} ", session.chapter_number()),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, ActivePane::Verses, theme));

    let inner = block.inner(area);
    let (basmala_area, list_area) = if catalog::has_basmala(session.chapter_number()) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Basmala + translation
                Constraint::Min(0),    // Verses
            ])
            .split(inner);
        (Some(chunks[0]), chunks[1])
    } else {
        (None, inner)
    };
    app.verses_height = usize::from(list_area.height);

    let Some(chapter) = session.chapter() else {
        let message = match session.load_state() {
            LoadState::Failed(error) => Text::from(vec![
                Line::from(Span::styled(error.clone(), Style::default().fg(theme.error))),
                Line::from(""),
                Line::from(app.retry_hint.as_str()),
            ]),
            _ => Text::from("Loading..."),
        };
        let paragraph = Paragraph::new(message)
            .block(block.title(title))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
        return;
    };

    let visible = session.visible_rows();
    let playing = session.playback_state().index();

    let items: Vec<ListItem> = visible
        .iter()
        .filter_map(|&index| chapter.row(index).map(|row| (index, row)))
        .map(|(index, row)| {
            let play_marker = if playing == Some(index) {
                Span::styled("▶ ", Style::default().fg(theme.playing_marker))
            } else if row.is_playable() {
                Span::raw("  ")
            } else {
                Span::styled("· ", Style::default().fg(theme.unavailable_text))
            };
            let favorite_marker = if session.is_favorite(index) {
                Span::styled("★ ", Style::default().fg(theme.favorite_marker))
            } else {
                Span::raw("  ")
            };
            let line = Line::from(vec![
                play_marker,
                favorite_marker,
                Span::raw(format!("{:>3}  ", row.ordinal)),
                cell_span(
                    &row.translation,
                    row.translation_display(),
                    theme.translation_text,
                    theme,
                ),
            ]);

            let style = if playing == Some(index) {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    title.push_str(&format!("[{}/{}] ", visible.len(), chapter.len()));
    if session.filter().is_active() {
        title.push_str("(filtered) ");
    }

    let offset = session.view_offset();
    let mut state = ListState::default().with_offset(offset);
    // Selecting a row outside the viewport would make the list scroll to
    // it, overriding the offset playback asked for.
    if app.verse_cursor >= offset && app.verse_cursor < offset + app.verses_height {
        state.select(Some(app.verse_cursor));
    }

    frame.render_widget(block.title(title), area);
    if let Some(basmala_area) = basmala_area {
        let basmala = Paragraph::new(vec![
            Line::from(Span::styled(
                catalog::BASMALA,
                Style::default()
                    .fg(theme.original_text)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                catalog::BASMALA_TRANSLATION,
                Style::default()
                    .fg(theme.translation_text)
                    .add_modifier(Modifier::ITALIC),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(basmala, basmala_area);
    }

    if items.is_empty() {
        let paragraph = Paragraph::new(Span::styled(
            "No verses match",
            Style::default().fg(theme.unavailable_text),
        ));
        frame.render_widget(paragraph, list_area);
        return;
    }

    let list = List::new(items)
        .highlight_style(highlight_style(app, ActivePane::Verses, theme))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, list_area, &mut state);
}

fn render_detail_pane<S: PreferenceStore, O: AudioOutput>(
    frame: &mut Frame,
    app: &TuiApp,
    session: &Session<S, O>,
    area: Rect,
    theme: &ThemeConfig,
) {
    let row = session
        .visible_rows()
        .get(app.verse_cursor)
        .and_then(|&index| session.row(index).map(|row| (index, row)));

    let (title, content) = if let Some((index, row)) = row {
        let citation = share::citation(session.chapter_number(), row.ordinal);
        let mut lines = vec![
            Line::from(Span::styled(
                row.original.as_str(),
                Style::default()
                    .fg(theme.original_text)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(cell_span(
                &row.transliteration,
                row.transliteration_display(),
                theme.transliteration_text,
                theme,
            )),
            Line::from(""),
            Line::from(cell_span(
                &row.translation,
                row.translation_display(),
                theme.translation_text,
                theme,
            )),
            Line::from(""),
            Line::from("─".repeat(area.width.saturating_sub(2) as usize)),
        ];

        let mut meta = vec![Span::raw(format!("— {}", citation))];
        if session.is_favorite(index) {
            meta.push(Span::styled(
                "  ★ favorite",
                Style::default().fg(theme.favorite_marker),
            ));
        }
        if !row.is_playable() {
            meta.push(Span::styled(
                "  no audio",
                Style::default().fg(theme.unavailable_text),
            ));
        }
        lines.push(Line::from(meta));

        (format!(" {} ", citation), Text::from(lines))
    } else {
        (" Verse ".to_string(), Text::from("No verse selected"))
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(app, ActivePane::Detail, theme));

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));

    frame.render_widget(paragraph, area);
}

fn render_status_bar<S: PreferenceStore, O: AudioOutput>(
    frame: &mut Frame,
    app: &TuiApp,
    session: &Session<S, O>,
    area: Rect,
    theme: &ThemeConfig,
) {
    let status = if let Some(ref input) = app.search_input {
        format!("/{}_  (Enter: keep  Esc: clear)", input)
    } else if let Some(ref msg) = app.status_message {
        msg.clone()
    } else {
        let prefs = session.prefs();
        let reciter = catalog::reciter(&prefs.reciter)
            .map(|r| r.short_name())
            .unwrap_or(prefs.reciter.as_str());
        let translation = catalog::translation(&prefs.translation)
            .map(|t| t.short_name())
            .unwrap_or(prefs.translation.as_str());
        let mut status = format!(
            "{}  |  {}  |  {}  |  Aa {}/{}",
            session.playback_state(),
            reciter,
            translation,
            prefs.arabic_font_size,
            prefs.translation_font_size
        );
        if session.filter().favorites_only() {
            status.push_str("  |  ★ only");
        }
        if !session.filter().query().is_empty() {
            status.push_str(&format!("  |  /{}", session.filter().query()));
        }
        status.push_str(if app.maximized {
            "    j/k:Scroll  m:Exit maximize  q:Quit"
        } else {
            "    Enter:Play  a:Play all  n/p:Surah  f:Fav  /:Search  r/t:Reciter/Translation  q:Quit"
        });
        status
    };

    let paragraph =
        Paragraph::new(status).style(Style::default().fg(theme.status_fg).bg(theme.status_bg));

    frame.render_widget(paragraph, area);
}
