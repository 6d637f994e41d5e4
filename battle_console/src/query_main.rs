// One-shot commands that query the server without starting the interactive client.

use std::thread;

use battle_of_roles::api::{self, ClientRequest, GameId, GameReadiness};
use battle_of_roles::player::PlayerNum;
use battle_of_roles::snapshot::GameStateSnapshot;
use battle_of_roles::view::game_view;
use log::info;

use crate::network::HttpTransport;
use crate::tui;


pub fn run_state(transport: &HttpTransport, game_id: GameId, me: PlayerNum) -> anyhow::Result<()> {
    let (status, body) = transport.execute(&ClientRequest::FetchState { game_id })?;
    let snapshot: GameStateSnapshot = api::parse_response(status, &body)?;
    let view = game_view(&snapshot, me);
    println!("{}", tui::render_game(&view, false, view.turn_result.as_ref()));
    Ok(())
}

// Polls until an opponent joins. Fails if the game is deleted meanwhile.
pub fn run_wait_ready(transport: &HttpTransport, game_id: GameId) -> anyhow::Result<()> {
    let poll_interval = transport.config().poll_interval;
    info!("Waiting for an opponent to join game {game_id}...");
    loop {
        let readiness = transport.check_ready(game_id)?;
        if let Some(ready_game_id) = readiness_outcome(game_id, &readiness)? {
            println!("Game {ready_game_id} is ready");
            return Ok(());
        }
        thread::sleep(poll_interval);
    }
}

// The game to join once it's ready, `None` while still waiting.
fn readiness_outcome(
    game_id: GameId, readiness: &GameReadiness,
) -> anyhow::Result<Option<GameId>> {
    if let Some(error) = &readiness.error {
        anyhow::bail!("Cannot check game {game_id}: {error}");
    }
    if readiness.deleted {
        anyhow::bail!("Game {game_id} was deleted");
    }
    Ok(readiness.ready.then(|| readiness.game_id.unwrap_or(game_id)))
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn readiness(ready: bool) -> GameReadiness {
        GameReadiness { ready, deleted: false, game_id: None, error: None }
    }

    #[test]
    fn keeps_waiting_until_ready() {
        assert_eq!(readiness_outcome(7, &readiness(false)).unwrap(), None);
        assert_eq!(readiness_outcome(7, &readiness(true)).unwrap(), Some(7));
    }

    #[test]
    fn server_may_redirect_to_another_game() {
        let redirected = GameReadiness { game_id: Some(8), ..readiness(true) };
        assert_eq!(readiness_outcome(7, &redirected).unwrap(), Some(8));
    }

    #[test]
    fn deleted_game_fails() {
        let deleted = GameReadiness { deleted: true, ..readiness(false) };
        let err = readiness_outcome(7, &deleted).unwrap_err();
        assert_eq!(err.to_string(), "Game 7 was deleted");
    }

    #[test]
    fn server_error_fails() {
        let broken = GameReadiness {
            error: Some("Partie introuvable".to_owned()),
            ..readiness(true)
        };
        let err = readiness_outcome(7, &broken).unwrap_err();
        assert_eq!(err.to_string(), "Cannot check game 7: Partie introuvable");
    }
}
