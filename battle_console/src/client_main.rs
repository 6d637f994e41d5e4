use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use battle_of_roles::api::{ApiError, ClientRequest};
use battle_of_roles::bootstrap::GameBootstrap;
use battle_of_roles::client::{ClientState, GuestConversionError, NotableEvent};
use battle_of_roles::config::ClientConfig;
use battle_of_roles::poller::PollOutcome;
use battle_of_roles::view::TurnResultView;
use crossterm::style::{self, Stylize};
use crossterm::{cursor, event as term_event, execute, terminal};
use instant::Instant;
use log::{info, warn};
use scopeguard::defer;

use crate::network::HttpTransport;
use crate::tui::{self, UserCommand};


const TICK_INTERVAL: Duration = Duration::from_millis(100);

pub struct ConsoleClientConfig {
    pub bootstrap: GameBootstrap,
    pub client_config: ClientConfig,
    pub cookie: Option<String>,
}

enum IncomingEvent {
    Network(ClientRequest, Result<(u16, String), ApiError>),
    Terminal(term_event::Event),
    Tick,
}

// Message line under the input. Cleared by the next command.
struct Message {
    text: String,
    color: style::Color,
}

fn writeln_raw(stdout: &mut io::Stdout, v: impl fmt::Display) -> io::Result<()> {
    let s = v.to_string();
    // Note. Not using `lines()` because it removes trailing new line.
    for line in s.split('\n') {
        execute!(stdout, style::Print(line), cursor::MoveToNextLine(1), cursor::Hide)?;
    }
    Ok(())
}

fn render(
    stdout: &mut io::Stdout, app_start_time: Instant, client_state: &ClientState,
    turn_result: Option<&TurnResultView>, keyboard_input: &str, message: Option<&Message>,
) -> io::Result<()> {
    let now = Instant::now();
    execute!(stdout, cursor::MoveTo(0, 0))?;
    let mut highlight_input = false;
    if let Some(view) = client_state.view() {
        writeln_raw(
            stdout,
            format!("{}\n", tui::render_game(&view, client_state.joker_selected(), turn_result)),
        )?;
        highlight_input = view.hand.cards_enabled;
    } else {
        writeln_raw(stdout, "Chargement...\n")?;
    }
    // Note. Don't clear the screen before drawing to avoid blinking.
    execute!(stdout, terminal::Clear(terminal::ClearType::FromCursorDown))?;

    // Simulate cursor: real cursor blinking is broken with Show/Hide.
    let show_cursor = now.duration_since(app_start_time).as_millis() % 1000 >= 500;
    let cursor = if show_cursor { '▂' } else { ' ' };
    let input_with_cursor = format!("> {keyboard_input}{cursor}");
    let input_style = if highlight_input { style::Color::White } else { style::Color::DarkGrey };
    writeln_raw(stdout, format!("{}\n", input_with_cursor.with(input_style)))?;

    if let Some(message) = message {
        writeln_raw(stdout, message.text.as_str().with(message.color))?;
    }
    Ok(())
}

fn execute_command(client_state: &mut ClientState, command: UserCommand) -> Option<Message> {
    let error = |text: String| Some(Message { text, color: style::Color::Red });
    match command {
        UserCommand::Play(card) => match client_state.play_card(card) {
            Ok(()) => None,
            Err(err) => error(format!("Cannot play {}: {err}", card.name())),
        },
        UserCommand::ToggleJoker => {
            client_state.set_joker_selected(!client_state.joker_selected());
            None
        }
        UserCommand::Convert { username, password } => {
            match client_state.convert_guest(&username, &password) {
                Ok(()) => None,
                Err(GuestConversionError::MissingFields(text)) => error(text),
                Err(err) => error(format!("Cannot convert account: {err}")),
            }
        }
        // Handled by the caller.
        UserCommand::Quit => None,
    }
}

// Clears `ticking` once polling is over, which ends the tick thread.
fn tick_client(client_state: &mut ClientState, now: Instant, ticking: &AtomicBool) {
    match client_state.tick(now) {
        PollOutcome::Fetch | PollOutcome::Wait => {}
        PollOutcome::Stopped => {
            if ticking.swap(false, Ordering::Relaxed) {
                info!("Polling is over, stopping the ticker");
            }
        }
    }
}

pub fn run(config: ConsoleClientConfig) -> anyhow::Result<()> {
    let transport = HttpTransport::new(config.client_config.clone(), config.cookie)?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
    defer! {
        let _ = execute!(io::stdout(), terminal::LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
    };
    let app_start_time = Instant::now();

    let (tx, rx) = mpsc::channel();
    let tx_net = tx.clone();
    let tx_local = tx.clone();
    let tx_tick = tx;
    let ticking = Arc::new(AtomicBool::new(true));
    let ticking_thread = Arc::clone(&ticking);
    let (requests_tx, requests_rx) = mpsc::channel::<ClientRequest>();
    thread::spawn(move || {
        for request in requests_rx {
            let result = transport.execute(&request);
            if tx_net.send(IncomingEvent::Network(request, result)).is_err() {
                return;
            }
        }
    });
    thread::spawn(move || {
        loop {
            let ev = match term_event::read() {
                Ok(ev) => ev,
                Err(err) => {
                    warn!("Cannot read terminal input: {err}");
                    return;
                }
            };
            if tx_local.send(IncomingEvent::Terminal(ev)).is_err() {
                return;
            }
        }
    });
    thread::spawn(move || {
        while ticking_thread.load(Ordering::Relaxed) {
            thread::sleep(TICK_INTERVAL);
            if tx_tick.send(IncomingEvent::Tick).is_err() {
                return;
            }
        }
    });

    let mut client_state =
        ClientState::new(config.bootstrap, config.client_config, requests_tx, Instant::now());
    let mut keyboard_input = String::new();
    let mut message = None;
    let mut turn_result = None;
    for event in rx {
        let now = Instant::now();
        match event {
            IncomingEvent::Network(request, result) => {
                if let Err(err) = client_state.process_response(&request, result, now) {
                    message = Some(Message {
                        text: format!("Internal error: {err}"),
                        color: style::Color::Red,
                    });
                }
            }
            IncomingEvent::Terminal(event) => {
                if let term_event::Event::Key(event) = event {
                    match event.code {
                        term_event::KeyCode::Char(ch) => {
                            keyboard_input.push(ch);
                        }
                        term_event::KeyCode::Backspace => {
                            keyboard_input.pop();
                        }
                        term_event::KeyCode::Enter => {
                            message = match tui::parse_command(&keyboard_input) {
                                Ok(UserCommand::Quit) => {
                                    client_state.stop();
                                    return Ok(());
                                }
                                Ok(command) => execute_command(&mut client_state, command),
                                Err(text) => Some(Message { text, color: style::Color::Red }),
                            };
                            keyboard_input.clear();
                        }
                        _ => {}
                    }
                }
            }
            IncomingEvent::Tick => {
                // Any event triggers repaint, so no additional action is required.
            }
        }
        tick_client(&mut client_state, now, &ticking);
        while let Some(event) = client_state.next_notable_event() {
            match event {
                NotableEvent::TurnCompleted(result) => {
                    turn_result = Some(result);
                }
                NotableEvent::GameOver { .. } => {
                    message = Some(Message {
                        text: "Partie terminée. Tapez /quit pour quitter.".to_owned(),
                        color: style::Color::Magenta,
                    });
                }
                NotableEvent::CardAccepted => {}
                NotableEvent::CardRejected(text) | NotableEvent::GuestConversionFailed(text) => {
                    message = Some(Message { text, color: style::Color::Red });
                }
                NotableEvent::GuestConverted(text) => {
                    message = Some(Message { text, color: style::Color::Green });
                }
            }
        }
        render(
            &mut stdout,
            app_start_time,
            &client_state,
            turn_result.as_ref(),
            &keyboard_input,
            message.as_ref(),
        )?;
    }
    anyhow::bail!("Unexpected end of events stream");
}
