mod clipboard;
mod help;
mod state;

use crate::cli::{build_config, Cli};
use crate::model::{QueryEvent, EXAMPLE_QUERIES};
use crate::orchestrator::{self, UiCommand};
use crate::view::{self, View, NO_RESULTS_NOTICE};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Terminal,
};
use state::{push_labeled, UiState, TAB_HELP, TAB_QUERY};
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub async fn run(args: Cli) -> Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel::<QueryEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_args = args.clone();
    let ui_handle = std::thread::spawn(move || run_threaded(ui_args, event_rx, cmd_tx));

    let cfg = build_config(&args);
    let res = orchestrator::run_controller(&cfg, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// Run the TUI loop on a dedicated thread.
pub fn run_threaded(
    args: Cli,
    mut event_rx: UnboundedReceiver<QueryEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    // Restores the terminal on every exit path, including a failed setup below.
    let _restore = TerminalGuard::new(restore_terminal);
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    // UiState is owned by the UI thread only; no cross-thread mutation.
    let mut state = UiState::with_query(args.query.clone().unwrap_or_default());
    if args.submit_on_launch {
        submit(&mut state, &cmd_tx);
    }

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();
    let mut dirty = true;

    let res = loop {
        while let Ok(ev) = event_rx.try_recv() {
            state.apply_event(ev);
            dirty = true;
        }

        if dirty || last_tick.elapsed() >= tick_rate {
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
            dirty = false;
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                dirty = true;
                match (k.modifiers, k.code) {
                    (_, KeyCode::Esc) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
                        let _ = cmd_tx.send(UiCommand::Quit);
                        break Ok(());
                    }
                    (_, KeyCode::Tab) => {
                        state.tab = if state.tab == TAB_QUERY {
                            TAB_HELP
                        } else {
                            TAB_QUERY
                        };
                    }
                    (_, KeyCode::F(12)) => state.tab = TAB_HELP,
                    _ if state.tab != TAB_QUERY => {}
                    (_, KeyCode::Enter) => submit(&mut state, &cmd_tx),
                    (_, KeyCode::F(n)) if (1..=5).contains(&n) => {
                        state.select_example(usize::from(n - 1));
                    }
                    (KeyModifiers::CONTROL, KeyCode::Char('n')) => state.cycle_example(true),
                    (KeyModifiers::CONTROL, KeyCode::Char('p')) => state.cycle_example(false),
                    (KeyModifiers::CONTROL, KeyCode::Char('u')) => state.clear_query(),
                    (KeyModifiers::CONTROL, KeyCode::Char('y')) => copy_selected_link(&mut state),
                    (m, KeyCode::Char(c))
                        if !m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
                    {
                        state.push_char(c);
                    }
                    (_, KeyCode::Backspace) => state.pop_char(),
                    (_, KeyCode::Up) => state.move_selection(-1),
                    (_, KeyCode::Down) => state.move_selection(1),
                    (_, KeyCode::PageUp) => state.move_selection(-5),
                    (_, KeyCode::PageDown) => state.move_selection(5),
                    (_, KeyCode::Home) => state.move_selection(isize::MIN / 2),
                    (_, KeyCode::End) => state.move_selection(isize::MAX / 2),
                    _ => {}
                }
            }
        }
    };

    res
}

/// Runs `restore` when dropped.
struct TerminalGuard<F: FnMut()> {
    restore: F,
}

impl<F: FnMut()> TerminalGuard<F> {
    fn new(restore: F) -> Self {
        Self { restore }
    }
}

impl<F: FnMut()> Drop for TerminalGuard<F> {
    fn drop(&mut self) {
        (self.restore)();
    }
}

fn restore_terminal() {
    disable_raw_mode().ok();
    execute!(io::stdout(), LeaveAlternateScreen).ok();
}

fn submit(state: &mut UiState, cmd_tx: &UnboundedSender<UiCommand>) {
    if let Some(query) = state.submit() {
        tracing::debug!(query, "submit from ui");
        if cmd_tx.send(UiCommand::Submit(query)).is_err() {
            state.apply_event(QueryEvent::Failed {
                message: crate::engine::GENERIC_FAILURE.to_string(),
            });
        }
    }
}

fn copy_selected_link(state: &mut UiState) {
    let Some(link) = state.selected_link().map(str::to_string) else {
        state.info = "Selected story has no link".into();
        return;
    };
    state.info = match clipboard::copy_link(&link) {
        Ok(()) => format!("✓ Copied to clipboard: {link}"),
        Err(e) => format!("Clipboard copy failed: {e:#}"),
    };
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let tabs = Tabs::new(vec![Line::from("Query"), Line::from("Help")])
        .select(state.tab)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("HackerNews AI Agent"),
        )
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    match state.tab {
        TAB_QUERY => draw_query(chunks[1], f, state),
        _ => help::draw_help(chunks[1], f),
    }
}

fn draw_query(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let view = view::render(state.controller.state());

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),                                  // Query input
                Constraint::Length(EXAMPLE_QUERIES.len() as u16 + 2), // Examples
                Constraint::Length(1),                                  // Status line
                Constraint::Min(0),                                     // Error / results
            ]
            .as_ref(),
        )
        .split(area);

    draw_input(main[0], f, state, &view);
    draw_examples(main[1], f, &view);
    draw_status(main[2], f, state, &view);
    draw_results(main[3], f, state, &view);
}

fn draw_input(area: Rect, f: &mut ratatui::Frame, state: &UiState, view: &View) {
    let query = &state.controller.state().query;
    let (title, border) = if view.busy {
        ("Searching…", Color::DarkGray)
    } else if view.submit_enabled {
        ("Ask me anything (Enter to search)", Color::Cyan)
    } else {
        ("Ask me anything", Color::Gray)
    };

    let line = if query.is_empty() && view.input_enabled {
        Line::from(vec![
            Span::styled("█", Style::default().fg(Color::Gray)),
            Span::styled(
                " e.g. 'find latest news about AI'",
                Style::default().fg(Color::DarkGray),
            ),
        ])
    } else if view.input_enabled {
        Line::from(vec![Span::raw(query.clone()), Span::raw("█")])
    } else {
        Line::from(Span::styled(
            query.clone(),
            Style::default().fg(Color::DarkGray),
        ))
    };

    let p = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title),
    );
    f.render_widget(p, area);
}

fn draw_examples(area: Rect, f: &mut ratatui::Frame, view: &View) {
    let key_style = if view.input_enabled {
        Style::default().fg(Color::Magenta)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let text_style = if view.input_enabled {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let lines: Vec<Line> = EXAMPLE_QUERIES
        .iter()
        .enumerate()
        .map(|(i, example)| {
            Line::from(vec![
                Span::styled(format!("F{}", i + 1), key_style),
                Span::raw("  "),
                Span::styled(*example, text_style),
            ])
        })
        .collect();

    let p = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Try these examples"),
    );
    f.render_widget(p, area);
}

fn draw_status(area: Rect, f: &mut ratatui::Frame, state: &UiState, view: &View) {
    let mut spans = Vec::new();
    if view.busy {
        let frame = state
            .loading_since
            .map(|t| (t.elapsed().as_millis() / 120) as usize % SPINNER.len())
            .unwrap_or(0);
        spans.push(Span::styled(
            format!(" {} Searching… ", SPINNER[frame]),
            Style::default().fg(Color::Yellow),
        ));
    }
    if !state.info.is_empty() {
        spans.push(Span::styled(
            format!(" {}", state.info),
            Style::default().fg(Color::Gray),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_results(area: Rect, f: &mut ratatui::Frame, state: &UiState, view: &View) {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut selected_line = 0usize;

    if let Some(err) = view.error.as_deref() {
        push_labeled(
            &mut lines,
            Some("⚠ Error"),
            err,
            area.width,
            Style::default().fg(Color::Red),
        );
        let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Results"));
        f.render_widget(p, area);
        return;
    }

    let Some(results) = view.results.as_ref() else {
        let hint = if view.busy {
            "Waiting for the agent…"
        } else {
            "Type a question and press Enter, or pick an example with F1-F5."
        };
        let p = Paragraph::new(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        )))
        .block(Block::default().borders(Borders::ALL).title("Results"));
        f.render_widget(p, area);
        return;
    };

    lines.push(Line::from(Span::styled(
        results.count_line.clone(),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )));
    if let Some(ctx) = results.context_line.as_deref() {
        lines.push(Line::from(Span::styled(
            ctx.to_string(),
            Style::default().fg(Color::Gray),
        )));
    }

    if let Some(summary) = results.summary.as_deref() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Summary",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        for para in summary.lines() {
            push_labeled(&mut lines, None, para, area.width, Style::default());
        }
    }

    if !results.stories.is_empty() {
        lines.push(Line::from(""));
    }
    for (i, story) in results.stories.iter().enumerate() {
        let is_selected = i == state.selected_story;
        if is_selected {
            selected_line = lines.len();
        }
        let marker_style = if is_selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Gray)
        };
        let title_style = match (story.link.is_some(), is_selected) {
            (true, true) => Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::UNDERLINED | Modifier::BOLD),
            (true, false) => Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::UNDERLINED),
            (false, true) => Style::default().add_modifier(Modifier::BOLD),
            (false, false) => Style::default(),
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{:>2}.", i + 1), marker_style),
            Span::styled(if is_selected { "> " } else { "  " }, marker_style),
            Span::styled(story.title.clone(), title_style),
        ]));
        lines.push(Line::from(vec![
            Span::raw("     "),
            Span::styled(
                format!("▲ {} points", story.score),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw("  "),
            Span::styled(format!("by {}", story.by), Style::default().fg(Color::Gray)),
            Span::raw("  "),
            Span::styled(
                format!("{} comments", story.comments),
                Style::default().fg(Color::Gray),
            ),
            Span::raw("  "),
            Span::styled(story.date.clone(), Style::default().fg(Color::Gray)),
        ]));
        if let Some(link) = story.link.as_deref() {
            lines.push(Line::from(vec![
                Span::raw("     "),
                Span::styled(link.to_string(), Style::default().fg(Color::DarkGray)),
            ]));
        }
    }

    if results.no_results {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            NO_RESULTS_NOTICE,
            Style::default().fg(Color::Yellow),
        )));
    }

    // Keep the selected story (and its two meta lines) inside the viewport.
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = (selected_line + 3).saturating_sub(visible);

    let p = Paragraph::new(lines)
        .scroll((scroll.min(u16::MAX as usize) as u16, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Results (↑/↓ select, Ctrl-Y copy link)"),
        );
    f.render_widget(p, area);
}
