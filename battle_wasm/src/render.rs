// Applies the view model to the game page.

use battle_of_roles::player::PlayerNum;
use battle_of_roles::view::{
    CardSlot, GameOverView, GameView, HandView, PlayAreaView, ScoreboardView, Tone,
    TurnResultView,
};
use strum::IntoEnumIterator;
use wasm_bindgen::JsCast;

use crate::web_document::{WebDocument, web_document};
use crate::web_element_ext::WebElementExt;
use crate::web_error_handling::JsResult;


pub const GAME_STATUS_ID: &str = "game-status";
pub const TURN_RESULT_ID: &str = "turn-result";
pub const CARD_BUTTON_SELECTOR: &str = ".card-button";
pub const CARD_ATTRIBUTE: &str = "data-card";
pub const USE_JOKER_ID: &str = "use-joker";
pub const END_GAME_MODAL_ID: &str = "end-game-modal";
pub const WINNER_TEXT_ID: &str = "winner-text";
pub const CONVERSION_FORM_ID: &str = "conversion-form";
pub const NEW_USERNAME_ID: &str = "new-username";
pub const NEW_PASSWORD_ID: &str = "new-password";
pub const CONVERT_ACCOUNT_BUTTON_ID: &str = "convert-account-button";

const TURN_RESULT_ANIMATION: &str = "slideIn 0.5s ease-out";

fn tone_color(tone: Tone) -> &'static str {
    match tone {
        Tone::Positive => "#10b981",
        Tone::Negative => "#ef4444",
        Tone::Neutral => "#94a3b8",
    }
}

fn score_selector(player: PlayerNum) -> String {
    format!("#player{}-score .score", player.to_number())
}
fn joker_selector(player: PlayerNum) -> String {
    format!("#joker-p{} .joker-available", player.to_number())
}
fn card_slot_id(player: PlayerNum) -> String { format!("card-p{}", player.to_number()) }
fn final_score_id(player: PlayerNum) -> String { format!("final-score{}", player.to_number()) }

// Turn result is left out: it is only updated when a turn is newly completed, see
// `render_turn_result`.
pub fn render_game(view: &GameView) -> JsResult<()> {
    render_scoreboard(&view.scoreboard)?;
    render_play_area(&view.play_area)?;
    render_hand(&view.hand)?;
    if let Some(game_over) = &view.game_over {
        render_game_over(game_over)?;
    }
    Ok(())
}

pub fn render_scoreboard(scoreboard: &ScoreboardView) -> JsResult<()> {
    let document = web_document()?;
    for player in PlayerNum::iter() {
        if let Some(score_node) = document.query_selector(&score_selector(player))? {
            score_node.set_text_content(Some(&scoreboard.scores[player].to_string()));
        }
        if let Some(joker_node) = document.query_selector(&joker_selector(player))? {
            let joker = scoreboard.jokers[player];
            joker_node.set_text_content(Some(joker.text()));
            joker_node.set_style("color", tone_color(joker.tone()))?;
        }
    }
    Ok(())
}

pub fn render_play_area(play_area: &PlayAreaView) -> JsResult<()> {
    let document = web_document()?;
    for player in PlayerNum::iter() {
        if let Some(slot_node) = document.get_element_by_id(&card_slot_id(player)) {
            slot_node.set_child(make_card_node(&document, &play_area.slots[player])?)?;
        }
    }
    if let Some(status_node) = document.get_element_by_id(GAME_STATUS_ID) {
        status_node.set_text_content(Some(play_area.status_message));
    }
    Ok(())
}

fn make_card_node(document: &WebDocument, slot: &CardSlot) -> JsResult<web_sys::Element> {
    let node = document.create_element("div")?;
    match slot {
        CardSlot::Hidden => {
            let node = node.with_classes(["card", "card-back"])?;
            node.append_new_element("div")?
                .with_classes(["card-content"])?
                .set_text_content(Some("?"));
            Ok(node)
        }
        CardSlot::Revealed { card, winner } => {
            let card_class = card.css_class();
            let mut classes = vec!["card", card_class.as_str(), "card-flip"];
            if *winner {
                classes.push("card-winner");
            }
            let node = node.with_classes(classes)?;
            node.append_new_element("div")?
                .with_classes(["card-image"])?
                .set_text_content(Some(card.emoji()));
            node.append_new_element("div")?
                .with_classes(["card-name"])?
                .set_text_content(Some(card.name()));
            Ok(node)
        }
    }
}

pub fn render_hand(hand: &HandView) -> JsResult<()> {
    let document = web_document()?;
    for node in document.query_selector_all(CARD_BUTTON_SELECTOR)? {
        let button: web_sys::HtmlButtonElement = node.dyn_into()?;
        button.set_disabled(!hand.cards_enabled);
        let style = button.style();
        if hand.cards_enabled {
            style.set_property("cursor", "pointer")?;
            style.set_property("opacity", "1")?;
            style.set_property("pointer-events", "auto")?;
        } else {
            style.set_property("cursor", "not-allowed")?;
            style.set_property("opacity", "0.6")?;
            style.set_property("pointer-events", "none")?;
        }
    }
    let checkbox = document.get_element_by_id_as::<web_sys::HtmlInputElement>(USE_JOKER_ID)?;
    if let Some(checkbox) = checkbox {
        checkbox.set_disabled(!hand.joker_enabled);
        if let Some(parent) = checkbox.parent_element() {
            parent.set_style("opacity", if hand.joker_enabled { "1" } else { "0.5" })?;
        }
    }
    Ok(())
}

pub fn render_turn_result(result: &TurnResultView) -> JsResult<()> {
    let document = web_document()?;
    let result_node = document.get_element_by_id_as::<web_sys::HtmlElement>(TURN_RESULT_ID)?;
    let Some(result_node) = result_node else {
        return Ok(());
    };
    result_node.set_text_content(Some(&result.message));
    let style = result_node.style();
    style.set_property("color", tone_color(result.tone))?;
    // Restart the animation: reset it and force a reflow before setting it again.
    style.set_property("animation", "none")?;
    let _ = result_node.offset_width();
    style.set_property("animation", TURN_RESULT_ANIMATION)?;
    Ok(())
}

pub fn render_game_over(game_over: &GameOverView) -> JsResult<()> {
    let document = web_document()?;
    let (Some(modal), Some(winner_text)) = (
        document.get_element_by_id(END_GAME_MODAL_ID),
        document.get_element_by_id(WINNER_TEXT_ID),
    ) else {
        return Ok(());
    };
    let final_score_nodes = PlayerNum::iter()
        .map(|player| {
            let node = document.get_element_by_id(&final_score_id(player))?;
            Some((player, node))
        })
        .collect::<Option<Vec<_>>>();
    let Some(final_score_nodes) = final_score_nodes else {
        return Ok(());
    };
    winner_text.set_text_content(Some(game_over.message()));
    winner_text.set_style("color", tone_color(game_over.tone()))?;
    for (player, node) in final_score_nodes {
        node.set_text_content(Some(&game_over.final_scores[player].to_string()));
    }
    modal.set_style("display", "flex")
}

pub fn show_conversion_form() -> JsResult<()> {
    if let Some(form) = web_document()?.get_element_by_id(CONVERSION_FORM_ID) {
        form.set_style("display", "block")?;
    }
    Ok(())
}

pub fn joker_checked() -> JsResult<bool> {
    let checkbox = web_document()?.get_element_by_id_as::<web_sys::HtmlInputElement>(USE_JOKER_ID)?;
    Ok(checkbox.is_some_and(|checkbox| checkbox.checked()))
}

pub fn set_joker_checked(checked: bool) -> JsResult<()> {
    let checkbox = web_document()?.get_element_by_id_as::<web_sys::HtmlInputElement>(USE_JOKER_ID)?;
    if let Some(checkbox) = checkbox {
        checkbox.set_checked(checked);
    }
    Ok(())
}

// Empty if the field is absent.
pub fn input_value(element_id: &str) -> JsResult<String> {
    let input = web_document()?.get_element_by_id_as::<web_sys::HtmlInputElement>(element_id)?;
    Ok(input.map(|input| input.value()).unwrap_or_default())
}
