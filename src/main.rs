mod app;
mod calc;
mod config;
mod event;
mod logging;
mod store;
mod ui;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use app::App;
use calc::button::Button;
use calc::calculator::Calculator;
use calc::editor::Expression;
use calc::evaluate::SYNTAX_ERROR;
use config::Config;
use event::{AppEvent, EventHandler};
use store::history::HistoryStore;
use ui::components::display::Display;
use ui::components::history_dropdown::HistoryPopup;
use ui::components::keypad::{self, Keypad};
use ui::layout::{CalcLayout, pack_hint_lines};

const MAX_FOOTER_LINES: usize = 3;

#[derive(Parser)]
#[command(name = "calcr", version, about = "Terminal keypad calculator with persistent history")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Keep fewer history entries than the default 23")]
    history_limit: Option<usize>,

    #[arg(long, help = "Directory for history and log files")]
    data_dir: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,

    #[arg(short, long, help = "Evaluate an expression, record it, print the result and exit")]
    eval: Option<String>,

    #[arg(long, help = "Print saved history and exit")]
    history: bool,

    #[arg(long, help = "Delete saved history and exit")]
    clear_history: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(theme) = cli.theme.clone() {
        config.theme = theme;
    }
    if let Some(limit) = cli.history_limit {
        config.history_limit = limit;
    }
    config.validate();

    let data_dir = cli.data_dir.clone().unwrap_or_else(Config::default_data_dir);
    logging::init(cli.verbose, &data_dir);
    log::info!("calcr v{}", env!("CARGO_PKG_VERSION"));

    if cli.eval.is_some() || cli.history || cli.clear_history {
        return run_batch(&cli, &config, &data_dir);
    }

    let mut app = App::new(config, &data_dir);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(250));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        log::error!("{err:#}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Non-interactive modes: `--clear-history`, `--eval`, `--history`.
fn run_batch(cli: &Cli, config: &Config, data_dir: &Path) -> Result<()> {
    let mut history = HistoryStore::open(data_dir, config.history_limit)?;

    if cli.clear_history {
        history.clear_all();
        println!("History cleared");
    }

    if let Some(ref text) = cli.eval {
        let mut calculator = Calculator::new();
        calculator.expression = Expression::from_text(text.trim());
        match calculator.press(Button::Equals) {
            Some(evaluation) => {
                history.record(&evaluation.expression, &evaluation.result);
                println!("{}", evaluation.result);
            }
            None => {
                eprintln!("{SYNTAX_ERROR}");
                std::process::exit(1);
            }
        }
    }

    if cli.history {
        for entry in history.entries() {
            println!("{entry}");
        }
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Click(x, y) => {
                let size = terminal.size()?;
                handle_click(app, Rect::new(0, 0, size.width, size.height), x, y);
            }
            AppEvent::Tick | AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.dropdown.open {
        handle_history_key(app, key);
    } else {
        handle_calculator_key(app, key);
    }
}

fn handle_calculator_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('h') => app.open_history(),
        KeyCode::Char('t') => app.cycle_theme(),
        KeyCode::Char('~') => app.press(Button::ToggleSign),
        KeyCode::Char(' ') => app.press_focused(),
        KeyCode::Char(ch) => app.type_label(ch.encode_utf8(&mut [0; 4])),
        KeyCode::Enter => app.press(Button::Equals),
        KeyCode::Backspace => app.press(Button::Backspace),
        KeyCode::Esc | KeyCode::Delete => app.press(Button::Clear),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Tab => app.keypad_focus = app.keypad_focus.cycle(true),
        KeyCode::BackTab => app.keypad_focus = app.keypad_focus.cycle(false),
        _ => {}
    }
}

fn handle_history_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('q') => app.close_history(),
        KeyCode::Up | KeyCode::Char('k') => app.dropdown.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.dropdown.next(),
        KeyCode::Enter => app.recall_highlighted(),
        KeyCode::Delete => app.clear_history(),
        _ => {}
    }
}

fn handle_click(app: &mut App, area: Rect, x: u16, y: u16) {
    if app.dropdown.open {
        return;
    }
    let layout = CalcLayout::new(area, footer_height(app, area));
    if let Some(button) = keypad::hit_test(layout.keypad, x, y) {
        app.click(button);
    }
}

fn hints(app: &App) -> Vec<&'static str> {
    if app.dropdown.open {
        vec!["[Up/Down] Move", "[Enter] Recall", "[Del] Clear all", "[Esc] Close"]
    } else {
        vec![
            "[Enter] =",
            "[Esc] AC",
            "[~] +/-",
            "[Tab/Space] Keypad",
            "[h] History",
            "[t] Theme",
            "[q] Quit",
        ]
    }
}

fn footer_height(app: &App, area: Rect) -> u16 {
    if !app.config.show_hints {
        return 0;
    }
    pack_hint_lines(&hints(app), area.width as usize)
        .len()
        .min(MAX_FOOTER_LINES) as u16
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = CalcLayout::new(area, footer_height(app, area));

    let saved = if app.history.is_persistent() {
        format!(" {} saved", app.history.len())
    } else {
        format!(" {} this session", app.history.len())
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " calcr ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            saved,
            Style::default().fg(colors.text_dim()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    frame.render_widget(Display::new(&app.calculator, app.theme), layout.display);
    frame.render_widget(Keypad::new(app.keypad_focus, app.theme), layout.keypad);

    if layout.footer.height > 0 {
        let lines: Vec<Line> = pack_hint_lines(&hints(app), area.width as usize)
            .into_iter()
            .take(MAX_FOOTER_LINES)
            .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_dim()))))
            .collect();
        frame.render_widget(Paragraph::new(lines), layout.footer);
    }

    if app.dropdown.open {
        let popup = ui::layout::centered_rect(90, 80, layout.keypad);
        frame.render_widget(HistoryPopup::new(&app.dropdown, app.theme), popup);
    }
}
