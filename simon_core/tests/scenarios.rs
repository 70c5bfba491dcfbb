//! Whole rounds played against the real ticks, debouncer and game.

mod common;

use common::{OutputEvent, Rig, expected_buttons, wrong};
use simon_core::{
    Button, ButtonSet, Lfsr, Phase, PlayerPhase, ResultPhase, SimonPhase, State, Transition,
    config,
};

/// Scenario A: a single digit round won on the first try.
#[test]
fn first_round_victory() {
    let mut rig = Rig::new(0);
    let first = expected_buttons(rig.game.lfsr(), 1)[0];
    assert_eq!(first, Button::S3, "power up seed starts with digit 2");

    rig.run_until_state(State::PlayersTurn, 1_000);
    let playback = rig.out.take();
    assert_eq!(
        playback,
        vec![
            OutputEvent::Digit(2),
            OutputEvent::ToneOn(2),
            OutputEvent::ToneOff,
            OutputEvent::Clear,
        ]
    );

    rig.answer(Button::S3, 40);
    rig.run_until_state(State::Result, 10);
    rig.run_ms(2);

    assert!(rig.game.is_confirmed());
    assert_eq!(rig.game.rank(), 1);
    assert_eq!(rig.game.length(), 2);
    assert_eq!(rig.game.phase(), Phase::Result(ResultPhase::ShowLevel));
    assert_eq!(rig.out.events.last(), Some(&OutputEvent::Victory));

    rig.out.take();
    rig.run_until_state(State::SimonsTurn, 300);
    assert_eq!(rig.out.events.first(), Some(&OutputEvent::Clear));
}

/// Scenario B: two correct steps and a wrong third one.
#[test]
fn defeat_on_third_step() {
    let mut rig = Rig::new(0);
    let sequence = expected_buttons(rig.game.lfsr(), 3);

    rig.play_round(&sequence[..1]);
    rig.run_until_state(State::SimonsTurn, 1_000);
    rig.play_round(&sequence[..2]);
    rig.run_until_state(State::SimonsTurn, 1_000);
    assert_eq!(rig.game.length(), 3);

    let mut expected_state = Lfsr::default();
    for _ in 0..3 {
        expected_state.advance();
    }

    rig.play_round(&[sequence[0], sequence[1], wrong(sequence[2])]);
    assert!(!rig.game.is_confirmed());
    assert_eq!(rig.game.step(), 3);

    rig.run_ms(2);
    assert_eq!(rig.game.rank(), 2);
    assert_eq!(rig.game.length(), 1);
    assert_eq!(rig.game.lfsr().start_state(), expected_state.state());
    assert_eq!(
        rig.game.phase(),
        Phase::Result(ResultPhase::ShowRank)
    );
    assert!(rig.out.events.contains(&OutputEvent::Defeat));

    rig.run_until(1_000, |game| {
        game.phase() == Phase::Result(ResultPhase::ShowLevel)
    });
    assert_eq!(rig.out.events.last(), Some(&OutputEvent::Score(2)));

    // The next round replays from where the player failed
    rig.out.take();
    rig.run_until(1_000, |game| {
        game.phase() == Phase::SimonsTurn(SimonPhase::Play)
    });
    let next_first = expected_state.advance();
    assert_eq!(rig.out.tone, Some(next_first));
}

/// A wrong first step ends the round before the remaining steps.
#[test]
fn mismatch_ends_round_early() {
    let mut rig = Rig::new(0);
    let sequence = expected_buttons(rig.game.lfsr(), 2);
    rig.play_round(&sequence[..1]);
    rig.run_until_state(State::SimonsTurn, 1_000);

    rig.play_round(&[wrong(sequence[0]), sequence[1]]);

    assert_eq!(rig.game.step(), 1);
    rig.run_ms(2);
    assert_eq!(rig.game.rank(), 1);
    assert_eq!(rig.game.length(), 1);
}

#[test]
fn reset_aborts_playback_within_one_poll() {
    let mut rig = Rig::new(0);
    let sequence = expected_buttons(rig.game.lfsr(), 1);
    rig.play_round(&sequence);
    rig.run_until(1_000, |game| {
        game.length() == 2 && game.phase() == Phase::SimonsTurn(SimonPhase::Play)
    });
    assert!(rig.out.tone.is_some());

    rig.shared.request_reset();
    let transition = rig.poll();

    assert_eq!(
        transition,
        Some(Transition {
            from: State::SimonsTurn,
            to: State::Init
        })
    );
    assert_eq!(rig.out.tone, None);
    assert_eq!(rig.out.events.last(), Some(&OutputEvent::Clear));

    rig.poll();
    assert_eq!(rig.game.state(), State::SimonsTurn);
    assert_eq!(rig.game.length(), 1);
}

#[test]
fn reset_aborts_players_turn() {
    let mut rig = Rig::new(0);
    rig.run_until_state(State::PlayersTurn, 1_000);

    rig.set_raw(Button::S1.into());
    rig.run_until(100, |game| {
        matches!(game.phase(), Phase::PlayersTurn(PlayerPhase::Play { .. }))
    });
    rig.shared.request_reset();
    rig.poll();

    assert_eq!(rig.game.state(), State::Init);
    assert_eq!(rig.out.tone, None);
    assert!(!rig.shared.reset_requested());
}

#[test]
fn reset_during_result_starts_over() {
    let mut rig = Rig::new(0);
    let sequence = expected_buttons(rig.game.lfsr(), 1);
    rig.play_round(&sequence);
    rig.run_ms(5);
    assert_eq!(rig.game.length(), 2);

    rig.shared.set_playback_updates(false);
    rig.shared.request_reset();
    rig.poll();

    assert_eq!(rig.game.state(), State::Init);
    assert!(rig.shared.playback_updates_enabled());
    rig.poll();
    assert_eq!(rig.game.length(), 1);
}

#[test]
fn simultaneous_presses_honour_button_one() {
    let mut rig = Rig::new(0);
    rig.run_until_state(State::PlayersTurn, 1_000);
    rig.out.take();

    rig.set_raw(ButtonSet::from(Button::S1).with(Button::S2));
    rig.run_until(100, |game| {
        matches!(game.phase(), Phase::PlayersTurn(PlayerPhase::Play { .. }))
    });

    assert_eq!(
        rig.game.phase(),
        Phase::PlayersTurn(PlayerPhase::Play {
            button: Button::S1,
            released: false
        })
    );
    assert_eq!(
        rig.out.take(),
        vec![OutputEvent::ToneOn(0), OutputEvent::Digit(0)]
    );
}

#[test]
fn held_button_keeps_tone_until_release() {
    let mut rig = Rig::new(0);
    rig.run_until_state(State::PlayersTurn, 1_000);

    rig.set_raw(Button::S3.into());
    rig.run_ms(500);
    assert_eq!(rig.out.tone, Some(2));
    assert_eq!(rig.game.step(), 0);

    rig.set_raw(ButtonSet::EMPTY);
    rig.run_until_state(State::Result, 100);
    assert_eq!(rig.out.tone, None);
    assert!(rig.game.is_confirmed());
}

#[test]
fn knob_sets_playback_pace() {
    let mut fast = Rig::new(0);
    fast.run_until_state(State::PlayersTurn, 5_000);

    let mut slow = Rig::new(255);
    slow.run_until_state(State::PlayersTurn, 5_000);

    let fast_ms = fast.now_ms();
    let slow_ms = slow.now_ms();
    assert!((250..260).contains(&fast_ms), "fast playback took {fast_ms} ms");
    assert!((2_000..2_010).contains(&slow_ms), "slow playback took {slow_ms} ms");
    assert_eq!(slow.shared.playback_duration(), config::playback_duration(255));
}

#[test]
fn same_seed_plays_same_sequence() {
    let run = || {
        let mut rig = Rig::with_lfsr(0, Lfsr::new(0x0BAD_5EED));
        let mut tones = Vec::new();
        for round in 1..=4 {
            let sequence = expected_buttons(rig.game.lfsr(), round);
            rig.play_round(&sequence);
            tones.extend(rig.out.take());
            rig.run_until_state(State::SimonsTurn, 1_000);
        }
        tones
    };

    assert_eq!(run(), run());
}

/// After a defeat the rank waits a full playback duration and the level another 250 ticks.
#[test]
fn result_phases_wait_their_full_durations() {
    let mut rig = Rig::new(128);
    let playback = u32::from(config::playback_duration(128));
    let show_level = u32::from(config::SHOW_LEVEL_TICKS);
    let sequence = expected_buttons(rig.game.lfsr(), 1);

    rig.play_round(&[wrong(sequence[0])]);
    rig.run_until(10, |game| {
        game.phase() == Phase::Result(ResultPhase::ShowRank)
    });
    assert!(rig.out.take().contains(&OutputEvent::Defeat));

    rig.run_ms(playback - 1);
    assert_eq!(rig.game.phase(), Phase::Result(ResultPhase::ShowRank));
    assert!(rig.out.events.is_empty(), "score shown early: {:?}", rig.out.events);

    rig.run_ms(1);
    assert_eq!(rig.game.phase(), Phase::Result(ResultPhase::ShowLevel));
    assert_eq!(rig.out.take(), vec![OutputEvent::Score(0)]);

    rig.run_ms(show_level - 1);
    assert_eq!(rig.game.phase(), Phase::Result(ResultPhase::ShowLevel));
    assert!(rig.out.events.is_empty());

    rig.run_ms(1);
    assert_eq!(rig.game.state(), State::SimonsTurn);
    assert_eq!(rig.out.events.first(), Some(&OutputEvent::Clear));
}

/// A reset that arrives while the game is starting over does not abort the new playback.
#[test]
fn reset_pending_at_init_is_dropped() {
    let mut rig = Rig::new(0);
    rig.shared.request_reset();

    let transition = rig.poll();
    assert_eq!(
        transition,
        Some(Transition {
            from: State::Init,
            to: State::SimonsTurn
        })
    );
    assert!(!rig.shared.reset_requested());

    rig.poll();
    assert_eq!(rig.game.phase(), Phase::SimonsTurn(SimonPhase::Play));
    assert_eq!(rig.game.length(), 1);
    assert_eq!(rig.out.tone, Some(2));
}
