//! Integration tests to ensure a session can start up without errors.

use cosmic_chaos::{
    parse_command, CosmicResult, GameConfig, GameSession, Intent, MessageBuffer, RenderOrder,
    TurnPhase,
};

#[test]
fn test_default_startup() -> CosmicResult<()> {
    let session = GameSession::new(GameConfig::default())?;
    let state = session.state();

    assert_eq!(state.phase, TurnPhase::PlayersTurn);
    assert_eq!(state.turn_number, 0);
    assert_eq!((state.map.width(), state.map.height()), (60, 29));

    let player = state.player()?;
    assert!(player.is_alive());
    assert!(!state.map.is_blocked(player.position));
    assert!(state.is_visible(player.position));
    Ok(())
}

#[test]
fn test_render_list_is_layered() -> CosmicResult<()> {
    let session = GameSession::new(GameConfig::new(31337))?;
    let list = session.state().render_list();

    assert_eq!(list.len(), session.state().entities.len());
    assert!(list
        .windows(2)
        .all(|pair| pair[0].render_order <= pair[1].render_order));
    assert!(list
        .iter()
        .any(|item| item.render_order == RenderOrder::Actor && item.glyph == '@'));
    Ok(())
}

#[test]
fn test_scripted_commands() -> CosmicResult<()> {
    let mut session = GameSession::new(GameConfig::for_testing(8))?;
    let mut log = MessageBuffer::new(4);

    for line in ["h", "l", "j", "k", "y", "u", "b", "n", "g", "i", "esc"] {
        let phase = session.state().phase;
        if phase == TurnPhase::PlayerDead {
            break;
        }
        let intent = parse_command(line, phase)?
            .into_intent()
            .expect("commands map to intents");
        let report = session.process_intent(intent, &mut log)?;
        assert!(!report.exit);
    }

    assert!(log.len() <= 4);
    let quit = session.process_intent(Intent::Exit, &mut log)?;
    assert!(quit.exit);
    Ok(())
}
