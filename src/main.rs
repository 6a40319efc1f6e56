use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Wrap};

use sb60_terminal::analysis::{grade_tally, key_play, summary_metrics, win_prob_series};
use sb60_terminal::chat_gateway::Role;
use sb60_terminal::play::Grade;
use sb60_terminal::provider;
use sb60_terminal::state::{apply_delta, AppState, ProviderCommand, SourceStatus, Tab};

const WORST_QUESTION: &str = "What was the worst 4th down decision and why?";
const GO_FOR_IT_QUESTION: &str = "Should the Patriots have gone for it on 4th & 1?";

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
    refresh: Duration,
    last_refresh: Instant,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        let refresh = std::env::var("PLAYS_POLL_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(600)
            .max(60);
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
            refresh: Duration::from_secs(refresh),
            last_refresh: Instant::now(),
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.input.is_some() {
            self.on_input_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.tab = Tab::Overview,
            KeyCode::Char('2') => self.state.tab = Tab::Plays,
            KeyCode::Char('3') => self.state.tab = Tab::Analysis,
            KeyCode::Tab => self.state.tab = self.state.tab.next(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('a') => self.state.input = Some(String::new()),
            KeyCode::Char('x') => self.submit_question(WORST_QUESTION.to_string()),
            KeyCode::Char('g') => self.submit_question(GO_FOR_IT_QUESTION.to_string()),
            KeyCode::Char('r') => {
                if self.cmd_tx.send(ProviderCommand::RefreshPlays { force: true }).is_err() {
                    self.state.push_log("[WARN] Refresh request failed");
                } else {
                    self.state.push_log("[INFO] Refresh requested");
                    self.last_refresh = Instant::now();
                }
            }
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn on_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state.input = None,
            KeyCode::Enter => {
                let question = self.state.input.take().unwrap_or_default();
                let question = question.trim().to_string();
                if !question.is_empty() {
                    self.submit_question(question);
                }
            }
            KeyCode::Backspace => {
                if let Some(buf) = self.state.input.as_mut() {
                    buf.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(buf) = self.state.input.as_mut() {
                    buf.push(c);
                }
            }
            _ => {}
        }
    }

    fn submit_question(&mut self, question: String) {
        if self.state.chat_busy() {
            self.state.push_log("[INFO] Still waiting on the previous answer");
            return;
        }
        if self.cmd_tx.send(ProviderCommand::Ask(question.clone())).is_err() {
            self.state.push_log("[WARN] Chat request failed");
            return;
        }
        self.state.pending_question = Some(question);
    }

    fn maybe_refresh_plays(&mut self) {
        if self.last_refresh.elapsed() >= self.refresh {
            let _ = self.cmd_tx.send(ProviderCommand::RefreshPlays { force: false });
            self.last_refresh = Instant::now();
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    provider::spawn_provider(tx, cmd_rx);

    let mut app = App::new(cmd_tx);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<sb60_terminal::state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        app.maybe_refresh_plays();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.tab {
        Tab::Overview => render_overview(frame, chunks[1], &app.state),
        Tab::Plays => render_plays(frame, chunks[1], &app.state),
        Tab::Analysis => render_analysis(frame, chunks[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let source = match &state.source {
        SourceStatus::Connected => "LIVE".to_string(),
        SourceStatus::Fallback { .. } => "FALLBACK".to_string(),
    };
    let line1 = format!("  SB60 TERMINAL | 4TH DOWN ANALYSIS | {}", tab_label(state.tab));
    let line2 = format!("  Seahawks 29 - Patriots 13 | Source: {source}");
    format!("{line1}\n{line2}")
}

fn footer_text(state: &AppState) -> String {
    if state.input.is_some() {
        return "Type your question | Enter Send | Esc Cancel".to_string();
    }
    match state.tab {
        Tab::Plays => {
            "1/2/3 Tabs | Tab Next | j/k/↑/↓ Move | a Ask | r Refresh | ? Help | q Quit".to_string()
        }
        _ => {
            "1/2/3 Tabs | Tab Next | a Ask | x Worst? | g Go for it? | r Refresh | ? Help | q Quit"
                .to_string()
        }
    }
}

fn tab_label(tab: Tab) -> &'static str {
    match tab {
        Tab::Overview => "OVERVIEW",
        Tab::Plays => "ALL 4TH DOWNS",
        Tab::Analysis => "ANALYSIS",
    }
}

fn console_text(state: &AppState) -> String {
    state
        .logs
        .back()
        .cloned()
        .unwrap_or_else(|| "No alerts yet".to_string())
}

fn render_overview(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(area);

    render_metrics_strip(frame, rows[0], state);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    render_chat(frame, columns[0], state);
    render_key_play(frame, columns[1], state);
}

fn render_metrics_strip(frame: &mut Frame, area: Rect, state: &AppState) {
    let metrics = summary_metrics(&state.plays);
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    render_metric(frame, cells[0], "4th Down Punts", format!("{}", metrics.punts));
    render_metric(
        frame,
        cells[1],
        "Bad/Questionable",
        format!("{}", metrics.flagged),
    );
    render_metric(
        frame,
        cells[2],
        "Total WPA Lost",
        format!("{:+.1}%", metrics.total_wpa),
    );
    render_metric(
        frame,
        cells[3],
        "Total EPA Lost",
        format!("{:+.2}", metrics.total_epa),
    );
}

fn render_metric(frame: &mut Frame, area: Rect, title: &str, value: String) {
    let widget = Paragraph::new(value)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn render_chat(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title("Ask About the Game")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 3 {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let transcript = Paragraph::new(transcript_text(state)).wrap(Wrap { trim: false });
    frame.render_widget(transcript, rows[0]);

    let caption = format!(
        "Powered by Groq | {} questions left | x: worst decision? | g: go for it?",
        state.questions_left
    );
    let caption = Paragraph::new(caption).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(caption, rows[1]);

    let input_line = match &state.input {
        Some(buf) => format!("> {buf}_"),
        None => "press a to ask a question".to_string(),
    };
    let input_style = if state.input.is_some() {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    frame.render_widget(Paragraph::new(input_line).style(input_style), rows[2]);
}

fn transcript_text(state: &AppState) -> String {
    let mut lines = Vec::new();
    for message in &state.transcript {
        let speaker = match message.role {
            Role::User => "You",
            Role::Assistant => "AI",
        };
        lines.push(format!("{speaker}: {}", message.text));
    }
    if let Some(question) = &state.pending_question {
        lines.push(format!("You: {question}"));
        lines.push("AI: Analyzing...".to_string());
    }
    if lines.is_empty() {
        "Ask about the Patriots' 4th down decisions.".to_string()
    } else {
        lines.join("\n")
    }
}

fn render_key_play(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("The Key Play").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(play) = key_play(&state.plays) else {
        frame.render_widget(Paragraph::new("No 4th down data found"), inner);
        return;
    };

    let headline = format!(
        "4th & {} from {}, down {} in Q{} -> PUNT",
        play.yards_to_go,
        play.field_position,
        play.score_differential.unsigned_abs(),
        play.quarter
    );

    let text = vec![
        Line::styled(headline, Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Line::raw(""),
        Line::raw(format!("Win Prob Before: {}", fmt_pct(play.win_prob_pct))),
        Line::raw("NFL 4th & 1 Conv Rate: 72%"),
        Line::raw(format!("WPA from Punt: {}", fmt_pct(play.wpa_pct))),
        Line::raw(format!("Grade: {}", grade_glyph(play.grade))),
        Line::raw(""),
        Line::raw("The math:"),
        Line::raw("- Go for it: 72% convert and the drive stays alive"),
        Line::raw("- Even if it fails: SEA takes over at the NE 41"),
        Line::raw("- Punt: SEA starts near its own 15"),
        Line::raw(""),
        Line::raw("~44 yards of field position is not worth a 72% conversion chance."),
    ];

    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
}

fn render_plays(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = play_columns();
    render_play_header(frame, sections[0], &widths);

    let list_area = sections[1];
    if state.plays.is_empty() {
        let empty =
            Paragraph::new("No plays loaded").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    let visible = list_area.height as usize;
    for (i, play) in state.plays.iter().take(visible).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };

        let selected = i == state.selected_play;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        render_cell_text(frame, cols[0], &format!("Q{}", play.quarter), row_style);
        render_cell_text(frame, cols[1], &format!("4th & {}", play.yards_to_go), row_style);
        render_cell_text(frame, cols[2], &play.field_position, row_style);
        render_cell_text(
            frame,
            cols[3],
            &format!("{}-{}", play.offense_score, play.defense_score),
            row_style,
        );
        render_cell_text(frame, cols[4], &fmt_pct(play.win_prob_pct), row_style);
        render_cell_text(frame, cols[5], &fmt_pct(play.wpa_pct), row_style);
        render_cell_text(frame, cols[6], &fmt_epa(play.epa), row_style);
        render_cell_text(frame, cols[7], grade_glyph(play.grade), row_style);
        render_cell_text(frame, cols[8], &play.description, row_style);
    }
}

fn play_columns() -> [Constraint; 9] {
    [
        Constraint::Length(4),
        Constraint::Length(9),
        Constraint::Length(11),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(16),
        Constraint::Min(16),
    ]
}

fn render_play_header(frame: &mut Frame, area: Rect, widths: &[Constraint]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);

    render_cell_text(frame, cols[0], "Sit", style);
    render_cell_text(frame, cols[1], "Down", style);
    render_cell_text(frame, cols[2], "Field Pos", style);
    render_cell_text(frame, cols[3], "Score", style);
    render_cell_text(frame, cols[4], "WP%", style);
    render_cell_text(frame, cols[5], "WPA%", style);
    render_cell_text(frame, cols[6], "EPA", style);
    render_cell_text(frame, cols[7], "Grade", style);
    render_cell_text(frame, cols[8], "Description", style);
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, area);
}

fn render_analysis(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_win_prob_chart(frame, columns[0], state);
    render_grade_summary(frame, columns[1], state);
}

fn render_win_prob_chart(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title("Win Probability by Play")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 3 {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let series = win_prob_series(&state.plays);
    let bars: Vec<Bar> = series
        .iter()
        .map(|(label, value)| {
            Bar::default()
                .value(*value)
                .label(Line::from(label.clone()))
                .style(Style::default().fg(Color::Blue))
        })
        .collect();

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(4)
        .bar_gap(1)
        .max(100);
    frame.render_widget(chart, rows[0]);

    let caption = Paragraph::new("Win probability dropped with each conservative punt")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(caption, rows[1]);
}

fn render_grade_summary(frame: &mut Frame, area: Rect, state: &AppState) {
    let tally = grade_tally(&state.plays);
    let metrics = summary_metrics(&state.plays);

    let text = vec![
        Line::raw(format!("🔴 Bad: {}", tally.red)),
        Line::raw(format!("🟡 Questionable: {}", tally.yellow)),
        Line::raw(format!("✅ OK: {}", tally.green)),
        Line::raw(""),
        Line::raw(format!("Punts: {}", metrics.punts)),
        Line::raw(format!("Total WPA: {:+.1}%", metrics.total_wpa)),
        Line::raw(format!("Total EPA: {:+.2}", metrics.total_epa)),
    ];

    let widget = Paragraph::new(text)
        .block(Block::default().title("Decision Grades").borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn grade_glyph(grade: Grade) -> &'static str {
    match grade {
        Grade::Terrible => "🔴 TERRIBLE",
        Grade::Bad => "🔴 BAD",
        Grade::Questionable => "🟡 QUESTIONABLE",
        Grade::Ok => "✅ OK",
    }
}

fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}%"),
        None => "-".to_string(),
    }
}

fn fmt_epa(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "SB60 Terminal - Help",
        "",
        "Global:",
        "  1            Overview",
        "  2            All 4th downs",
        "  3            Analysis",
        "  Tab          Next tab",
        "  a            Ask a question",
        "  x            Ask: worst decision?",
        "  g            Ask: go for it on 4th & 1?",
        "  r            Force data refresh",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Plays:",
        "  j/k or ↑/↓   Move selection",
        "",
        "Chat input:",
        "  Enter        Send",
        "  Esc          Cancel",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
