//! Interactive demo for the tag input widget.
//!
//! Runs a single tag input over a grocery-themed candidate provider and
//! mirrors the widget's hook traffic (content changes, chip clicks) in a
//! status line. Input arrives over a channel from a dedicated blocking
//! thread so `poll()` and `read()` stay on one OS thread.

use std::cell::RefCell;
use std::io::Stdout;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use mentio_tui::{TagInput, TagInputConfig, TagInputState};
use mentio_types::{CandidateSet, GroupedItems, SuggestionItem};
use ratatui::{
    Terminal,
    layout::{Constraint, Layout},
    prelude::*,
    text::{Line, Span},
    widgets::Paragraph,
};
use tokio::{signal, sync::mpsc};

#[derive(Debug, Parser)]
#[command(name = "mentio", about = "Tag input widget demo", version)]
struct Cli {
    /// Character that opens the suggestion popup
    #[arg(long, default_value_t = '@')]
    trigger: char,

    /// Placeholder shown while the field is empty
    #[arg(long)]
    placeholder: Option<String>,

    /// Serve candidates as one flat list instead of grouped sections
    #[arg(long)]
    flat: bool,

    /// Start in readonly mode (press Ctrl+R to toggle)
    #[arg(long)]
    readonly: bool,
}

/// Hook traffic surfaced in the status line.
#[derive(Debug, Default)]
struct HookLog {
    changes: usize,
    last_doc: String,
    last_click: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let log = Rc::new(RefCell::new(HookLog::default()));
    let mut state = build_widget(&cli, &log);

    let mut input_receiver = spawn_input_thread();
    let mut terminal = setup_terminal()?;
    let result = run_loop(&mut terminal, &mut state, &log, &mut input_receiver).await;
    cleanup_terminal(&mut terminal)?;
    result
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_widget(cli: &Cli, log: &Rc<RefCell<HookLog>>) -> TagInputState {
    let config = TagInputConfig {
        placeholder: cli.placeholder.clone(),
        trigger: cli.trigger,
        readonly: cli.readonly,
        ..TagInputConfig::default()
    };

    let flat = cli.flat;
    let change_log = Rc::clone(log);
    let click_log = Rc::clone(log);
    TagInputState::new(config)
        .with_items(move |query| Ok(grocery_candidates(query, flat)))
        .on_change(move |doc| {
            let mut log = change_log.borrow_mut();
            log.changes += 1;
            log.last_doc = doc.to_string();
        })
        .on_tag_click(move |index, attrs| {
            click_log.borrow_mut().last_click =
                Some(format!("#{index} {}", attrs.display_label()));
        })
}

/// Case-insensitive substring filter over a fixed grocery list. "Durian" is
/// intentionally disabled so highlight skipping is visible in the demo.
fn grocery_candidates(query: &str, flat: bool) -> CandidateSet {
    const FRUITS: &[(&str, bool)] = &[
        ("Apple", false),
        ("Banana", false),
        ("Cherry", false),
        ("Durian", true),
        ("Orange", false),
    ];
    const VEGETABLES: &[(&str, bool)] = &[
        ("Broccoli", false),
        ("Carrot", false),
        ("Spinach", false),
        ("Tomato", false),
    ];

    let query = query.to_lowercase();
    let pick = |entries: &[(&str, bool)]| -> Vec<SuggestionItem> {
        entries
            .iter()
            .filter(|(label, _)| label.to_lowercase().contains(&query))
            .map(|(label, disabled)| {
                let item = SuggestionItem::new(label.to_lowercase(), *label);
                if *disabled { item.disabled() } else { item }
            })
            .collect()
    };

    if flat {
        let mut items = pick(FRUITS);
        items.extend(pick(VEGETABLES));
        return CandidateSet::Flat(items);
    }
    CandidateSet::Grouped(
        [("fruits", FRUITS), ("vegetables", VEGETABLES)]
            .into_iter()
            .map(|(group, entries)| GroupedItems::new(group, pick(entries)))
            .filter(|group| !group.items.is_empty())
            .collect(),
    )
}

/// Forwards crossterm events over a channel from a dedicated blocking thread.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    std::thread::spawn(move || {
        let tick = Duration::from_millis(16);
        loop {
            if matches!(event::poll(tick), Ok(true)) {
                match event::read() {
                    Ok(event) => {
                        if sender.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(error) => {
                        tracing::warn!(%error, "failed to read terminal event");
                        break;
                    }
                }
            }
        }
    });
    receiver
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state: &mut TagInputState,
    log: &Rc<RefCell<HookLog>>,
    input_receiver: &mut mpsc::Receiver<Event>,
) -> Result<()> {
    state.handle_focus_gained();
    render(terminal, state, log)?;

    loop {
        tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else { break };
                match event {
                    Event::Key(key) => {
                        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                            break;
                        }
                        if key.code == KeyCode::Char('r') && key.modifiers.contains(KeyModifiers::CONTROL) {
                            let readonly = !state.is_readonly();
                            state.set_readonly(readonly);
                        } else {
                            state.handle_key_event(key);
                        }
                    }
                    Event::Mouse(mouse) => {
                        state.handle_mouse_event(mouse);
                    }
                    Event::FocusGained => state.handle_focus_gained(),
                    Event::FocusLost => state.handle_focus_lost(),
                    Event::Resize(..) | Event::Paste(_) => {}
                }
                render(terminal, state, log)?;
            }
            _ = signal::ctrl_c() => { break; }
        }
    }
    Ok(())
}

fn render(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state: &mut TagInputState,
    log: &Rc<RefCell<HookLog>>,
) -> Result<()> {
    terminal.draw(|frame| {
        let [input, status, doc, help] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        TagInput::default().render(frame, input, state);

        let log = log.borrow();
        let tags = state
            .get_tags()
            .into_iter()
            .map(|tag| tag.attrs.value)
            .collect::<Vec<_>>()
            .join(", ");
        let mut status_line = format!("changes: {}  tags: [{}]", log.changes, tags);
        if let Some(click) = log.last_click.as_deref() {
            status_line.push_str(&format!("  clicked: {click}"));
        }
        if state.is_readonly() {
            status_line.push_str("  [readonly]");
        }
        frame.render_widget(
            Paragraph::new(Line::from(Span::raw(status_line))),
            status,
        );
        frame.render_widget(
            Paragraph::new(log.last_doc.clone()).wrap(ratatui::widgets::Wrap { trim: false }),
            doc,
        );
        frame.render_widget(
            Paragraph::new(Line::from(Span::raw(
                "type, trigger with the configured character; Ctrl+R readonly, Ctrl+C quit",
            ))),
            help,
        );
    })?;
    Ok(())
}
