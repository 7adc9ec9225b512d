use crate::{
    app::{self, App, DialogChoice, InputMode, LogLevel},
    game,
};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Padding, Paragraph},
};
use std::{io, time::Duration};

const SIDE_PANEL_WIDTH: u16 = 40;

#[derive(Clone)]
struct Theme {
    accent: Color,
    accent_soft: Color,
    border: Color,
    text: Color,
    muted: Color,
    success: Color,
    warning: Color,
    error: Color,
    header_bg: Color,
}

impl Theme {
    fn new() -> Self {
        Self {
            accent: Color::Rgb(255, 170, 120),
            accent_soft: Color::Rgb(160, 100, 70),
            border: Color::Rgb(90, 75, 65),
            text: Color::Rgb(235, 228, 220),
            muted: Color::Rgb(150, 140, 130),
            success: Color::Rgb(140, 220, 140),
            warning: Color::Rgb(230, 200, 120),
            error: Color::Rgb(235, 100, 95),
            header_bg: Color::Rgb(32, 26, 22),
        }
    }

    fn block(&self, title: &'static str) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.border))
            .title(Span::styled(
                title,
                Style::default()
                    .fg(self.accent)
                    .add_modifier(Modifier::BOLD),
            ))
    }

    fn panel(&self, title: &'static str) -> Block<'static> {
        self.block(title).padding(Padding {
            left: 1,
            right: 1,
            top: 1,
            bottom: 0,
        })
    }
}

pub fn run(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(terminal: &mut Terminal<impl Backend>, app: &mut App) -> Result<()> {
    loop {
        app.clamp_selection();
        terminal.draw(|frame| draw(frame, app))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                handle_key(app, key)?;
            }
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) -> Result<()> {
    if app.dialog.is_some() {
        return handle_dialog_mode(app, key);
    }

    let mode = std::mem::replace(&mut app.input_mode, InputMode::Normal);
    match mode {
        InputMode::Normal => {
            app.input_mode = InputMode::Normal;
            handle_normal_mode(app, key)
        }
        InputMode::Editing {
            prompt,
            mut buffer,
            purpose,
        } => handle_input_mode(app, key, prompt, &mut buffer, purpose),
    }
}

fn handle_dialog_mode(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
            app.dialog_toggle_choice();
        }
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.dialog_set_choice(DialogChoice::Yes);
        }
        KeyCode::Char('n') | KeyCode::Char('N') => {
            app.dialog_set_choice(DialogChoice::No);
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.dialog_confirm();
        }
        KeyCode::Esc => {
            app.dialog_set_choice(DialogChoice::No);
            app.dialog_confirm();
        }
        _ => {}
    }
    Ok(())
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::F(5) => app.refresh_mods(),
        KeyCode::Char('g') | KeyCode::Char('G') => app.enter_edit_game_path(),
        KeyCode::Enter | KeyCode::Char('a') | KeyCode::Char('A') => app.request_apply_selected(),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => app.select_previous(),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => app.select_next(),
        KeyCode::PageUp => app.scroll_log_up(3),
        KeyCode::PageDown => app.scroll_log_down(3),
        _ => {}
    }

    Ok(())
}

fn handle_input_mode(
    app: &mut App,
    key: KeyEvent,
    prompt: String,
    buffer: &mut String,
    purpose: app::InputPurpose,
) -> Result<()> {
    let mut keep_editing = true;
    match key.code {
        KeyCode::Esc => {
            keep_editing = false;
            app.cancel_input();
        }
        KeyCode::Enter => {
            keep_editing = false;
            app.input_mode = InputMode::Normal;
            let value = buffer.trim().to_string();
            if let Err(err) = app.handle_submit(purpose.clone(), value) {
                app.status = format!("Action failed: {err}");
                app.log_error(format!("Action failed: {err}"));
            }
        }
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL)
                || key.modifiers.contains(KeyModifiers::ALT)
            {
                return Ok(());
            }
            buffer.push(c);
        }
        KeyCode::Backspace => {
            buffer.pop();
        }
        _ => {}
    }

    if keep_editing {
        app.input_mode = InputMode::Editing {
            prompt,
            buffer: buffer.clone(),
            purpose,
        };
    }

    Ok(())
}

fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.size();
    let theme = Theme::new();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(9),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(frame, app, &theme, chunks[0]);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(24), Constraint::Length(SIDE_PANEL_WIDTH)])
        .split(chunks[1]);

    draw_mod_list(frame, app, &theme, body_chunks[0]);
    draw_side_panel(frame, app, &theme, body_chunks[1]);
    draw_log(frame, app, &theme, chunks[2]);
    draw_status(frame, app, &theme, chunks[3]);

    draw_input_popup(frame, app, &theme);
    draw_dialog(frame, app, &theme);
}

fn draw_header(frame: &mut Frame<'_>, app: &App, theme: &Theme, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                "pakswap",
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(game::GAME_NAME, Style::default().fg(theme.text)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Content dir: ", Style::default().fg(theme.muted)),
            Span::styled(
                app.paths.base.display().to_string(),
                Style::default().fg(theme.text),
            ),
        ]),
    ])
    .style(Style::default().bg(theme.header_bg))
    .alignment(Alignment::Center);
    frame.render_widget(header, area);
}

fn draw_mod_list(frame: &mut Frame<'_>, app: &App, theme: &Theme, area: Rect) {
    if app.mods.is_empty() {
        let empty = Paragraph::new("No mods found.\nDrop mod folders into Mods_Folder, then press r.")
            .style(Style::default().fg(theme.muted))
            .block(theme.panel("Available Mods"))
            .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .mods
        .iter()
        .map(|descriptor| {
            let active = app.active_mod.as_deref() == Some(descriptor.name.as_str());
            let marker = if active { "* " } else { "  " };
            let style = if active {
                Style::default()
                    .fg(theme.success)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            ListItem::new(Line::from(Span::styled(
                format!("{marker}{}", descriptor.display_line()),
                style,
            )))
        })
        .collect();

    let list = List::new(items)
        .block(theme.panel("Available Mods"))
        .highlight_style(
            Style::default()
                .bg(theme.accent_soft)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">");

    let mut state = ListState::default();
    state.select(Some(app.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_side_panel(frame: &mut Frame<'_>, app: &App, theme: &Theme, area: Rect) {
    let mut lines = Vec::new();

    match app.selected_mod() {
        Some(descriptor) => {
            lines.push(Line::from(Span::styled(
                descriptor.name.clone(),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(vec![
                Span::styled("Files: ", Style::default().fg(theme.muted)),
                Span::styled(
                    descriptor.file_count.to_string(),
                    Style::default().fg(theme.text),
                ),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Path: ", Style::default().fg(theme.muted)),
                Span::styled(
                    descriptor.path.display().to_string(),
                    Style::default().fg(theme.text),
                ),
            ]));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "No mod selected",
                Style::default().fg(theme.muted),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Active: ", Style::default().fg(theme.muted)),
        match &app.active_mod {
            Some(name) => Span::styled(
                name.clone(),
                Style::default()
                    .fg(theme.success)
                    .add_modifier(Modifier::BOLD),
            ),
            None => Span::styled("none this session", Style::default().fg(theme.muted)),
        },
    ]));
    lines.push(Line::from(vec![
        Span::styled("Load dir: ", Style::default().fg(theme.muted)),
        Span::styled(
            app.paths.active_root.display().to_string(),
            Style::default().fg(theme.text),
        ),
    ]));

    lines.push(Line::from(""));
    for hint in [
        "Enter/a  apply selected",
        "r        rescan mods",
        "g        edit game path",
        "j/k      move selection",
        "PgUp/Dn  scroll log",
        "q        quit",
    ] {
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(theme.muted),
        )));
    }

    let panel = Paragraph::new(lines).block(theme.panel("Selection"));
    frame.render_widget(panel, area);
}

fn draw_log(frame: &mut Frame<'_>, app: &App, theme: &Theme, area: Rect) {
    let visible = area.height.saturating_sub(3) as usize;
    let end = app.logs.len().saturating_sub(app.log_scroll);
    let start = end.saturating_sub(visible.max(1));

    let lines: Vec<Line> = app.logs[start..end]
        .iter()
        .map(|entry| {
            let color = match entry.level {
                LogLevel::Info => theme.muted,
                LogLevel::Warn => theme.warning,
                LogLevel::Error => theme.error,
            };
            Line::from(vec![
                Span::styled(
                    format!("[{}] ", app::log_level_label(entry.level)),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(entry.message.clone(), Style::default().fg(theme.text)),
            ])
        })
        .collect();

    let log = Paragraph::new(lines).block(theme.panel("Log"));
    frame.render_widget(log, area);
}

fn draw_status(frame: &mut Frame<'_>, app: &App, theme: &Theme, area: Rect) {
    let status = Paragraph::new(Line::from(Span::styled(
        app.status.clone(),
        Style::default().fg(theme.text),
    )))
    .style(Style::default().bg(theme.header_bg));
    frame.render_widget(status, area);
}

fn draw_input_popup(frame: &mut Frame<'_>, app: &App, theme: &Theme) {
    let InputMode::Editing { prompt, buffer, .. } = &app.input_mode else {
        return;
    };

    let area = frame.size();
    let width = area.width.saturating_mul(2) / 3;
    let width = width.clamp(30, area.width.saturating_sub(2).max(30));
    let popup = centered_rect(area, width, 5);

    let lines = vec![
        Line::from(Span::styled(
            format!("{prompt}:"),
            Style::default().fg(theme.muted),
        )),
        Line::from(vec![
            Span::styled(buffer.clone(), Style::default().fg(theme.text)),
            Span::styled("_", Style::default().fg(theme.accent)),
        ]),
        Line::from(Span::styled(
            "Enter confirm | Esc cancel",
            Style::default().fg(theme.muted),
        )),
    ];

    frame.render_widget(Clear, popup);
    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.accent_soft))
                .style(Style::default().bg(theme.header_bg)),
        )
        .alignment(Alignment::Left);
    frame.render_widget(widget, popup);
}

fn draw_dialog(frame: &mut Frame<'_>, app: &App, theme: &Theme) {
    let Some(dialog) = &app.dialog else {
        return;
    };

    let area = frame.size();
    let message_lines: Vec<Line> = dialog
        .message
        .lines()
        .map(|line| Line::from(line.to_string()))
        .collect();
    let height =
        (message_lines.len() as u16 + 6).clamp(7, area.height.saturating_sub(2).max(7));
    let width = area.width.saturating_mul(2) / 3;
    let width = width.clamp(34, area.width.saturating_sub(2).max(34));
    let dialog_area = centered_rect(area, width, height);

    let yes_selected = matches!(dialog.choice, DialogChoice::Yes);
    let yes_style = if yes_selected {
        Style::default()
            .fg(Color::Black)
            .bg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    let no_style = if !yes_selected {
        Style::default()
            .fg(Color::Black)
            .bg(theme.warning)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };

    let mut lines = Vec::new();
    lines.push(Line::from(Span::styled(
        dialog.title.clone(),
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.extend(message_lines);
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw(" "),
        Span::styled(" Yes ", yes_style),
        Span::raw("   "),
        Span::styled(" No ", no_style),
    ]));

    frame.render_widget(Clear, dialog_area);
    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.accent_soft))
                .style(Style::default().bg(theme.header_bg)),
        )
        .style(Style::default().fg(theme.text))
        .alignment(Alignment::Center);
    frame.render_widget(widget, dialog_area);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
