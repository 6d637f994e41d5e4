use battle_of_roles::card::{Card, JOKER_EMOJI};
use battle_of_roles::player::PlayerNum;
use battle_of_roles::view::{CardSlot, GameView, Tone, TurnResultView};
use console::Style;
use strum::IntoEnumIterator;


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum UserCommand {
    Play(Card),
    ToggleJoker,
    Convert { username: String, password: String },
    Quit,
}

fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Positive => Style::new().green(),
        Tone::Negative => Style::new().red(),
        Tone::Neutral => Style::new().dim(),
    }
}

// Cards are typed by name or by first letter; commands start with a slash.
pub fn parse_command(input: &str) -> Result<UserCommand, String> {
    let input = input.trim();
    if let Some(command) = input.strip_prefix('/') {
        let mut words = command.split_whitespace();
        match (words.next(), words.next(), words.next(), words.next()) {
            (Some("quit"), None, ..) => Ok(UserCommand::Quit),
            (Some("joker"), None, ..) => Ok(UserCommand::ToggleJoker),
            (Some("convert"), Some(username), Some(password), None) => Ok(UserCommand::Convert {
                username: username.to_owned(),
                password: password.to_owned(),
            }),
            (Some("convert"), ..) => Err("Usage: /convert <username> <password>".to_owned()),
            _ => Err(format!("Unknown command: '{command}'")),
        }
    } else {
        Card::from_user_input(input)
            .map(UserCommand::Play)
            .ok_or_else(|| format!("Unknown card: '{input}'"))
    }
}

fn render_slot(slot: &CardSlot) -> String {
    match slot {
        CardSlot::Hidden => "[ ? ]".to_owned(),
        CardSlot::Revealed { card, winner } => {
            let text = format!("[{} {}]", card.emoji(), card.name());
            if *winner { Style::new().green().bold().apply_to(text).to_string() } else { text }
        }
    }
}

fn render_player_line(view: &GameView, player: PlayerNum) -> String {
    let scoreboard = &view.scoreboard;
    let joker = scoreboard.jokers[player];
    let you = if player == view.me { " (vous)" } else { "" };
    format!(
        "{}{}: {}  {} {}",
        Style::new().bold().apply_to(&scoreboard.names[player]),
        you,
        scoreboard.scores[player],
        JOKER_EMOJI,
        tone_style(joker.tone()).apply_to(joker.text()),
    )
}

// `turn_result` is passed separately because it outlives the turn it describes: it stays on
// screen while the next turn is half-played.
pub fn render_game(
    view: &GameView, joker_selected: bool, turn_result: Option<&TurnResultView>,
) -> String {
    let mut lines = Vec::new();
    for player in PlayerNum::iter() {
        lines.push(render_player_line(view, player));
    }
    lines.push(String::new());
    let slots = PlayerNum::iter().map(|player| render_slot(&view.play_area.slots[player]));
    lines.push(slots.collect::<Vec<_>>().join("  vs  "));
    lines.push(String::new());
    if let Some(result) = turn_result {
        lines.push(tone_style(result.tone).apply_to(&result.message).to_string());
    }
    if let Some(game_over) = &view.game_over {
        let final_scores = PlayerNum::iter()
            .map(|player| game_over.final_scores[player].to_string())
            .collect::<Vec<_>>()
            .join(" - ");
        lines.push(format!(
            "{}  {}",
            tone_style(game_over.tone()).bold().apply_to(game_over.message()),
            final_scores
        ));
    } else {
        lines.push(view.play_area.status_message.to_owned());
        let cards = Card::iter()
            .map(|card| format!("{} {}", card.emoji(), card.name().to_lowercase()))
            .collect::<Vec<_>>()
            .join("  ");
        let cards_style = if view.hand.cards_enabled { Style::new() } else { Style::new().dim() };
        lines.push(cards_style.apply_to(cards).to_string());
        if view.hand.joker_enabled {
            let checkbox = if joker_selected { "[x]" } else { "[ ]" };
            lines.push(format!("{checkbox} {JOKER_EMOJI} Bouffon (/joker)"));
        }
    }
    lines.join("\n")
}
