//! Integration tests for the typing-delay model.

use std::time::Duration;

use standin::reply::delay::DelayModel;
use standin::rng::{ScriptedRandom, ThreadRandom};

#[test]
fn delay_stays_within_bounds_for_any_message() {
    let mut rng = ThreadRandom;
    let long_message = "word ".repeat(100);
    for message in ["", "hey", "a few words here", long_message.as_str()] {
        for _ in 0..50 {
            let delay = DelayModel.typing_delay(message, &mut rng);
            assert!(delay >= Duration::from_millis(1000), "too short: {delay:?}");
            assert!(delay <= Duration::from_millis(8000), "too long: {delay:?}");
        }
    }
}

#[test]
fn empty_message_gets_the_baseline_only() {
    for factor_draw in [0.0, 0.5, 0.999] {
        let mut rng = ScriptedRandom::new(&[factor_draw]);
        assert_eq!(
            DelayModel.typing_delay("", &mut rng),
            Duration::from_millis(1000)
        );
    }
}

#[test]
fn longer_messages_wait_longer_at_equal_factor() {
    let mut slow = ScriptedRandom::new(&[0.5]);
    let mut fast = ScriptedRandom::new(&[0.5]);
    let short = DelayModel.typing_delay("two words", &mut fast);
    let long = DelayModel.typing_delay("five words take more typing", &mut slow);
    assert!(long > short);
}

#[test]
fn very_long_messages_clamp_to_the_cap() {
    let message = "word ".repeat(50);
    let mut rng = ScriptedRandom::new(&[0.0]);
    assert_eq!(
        DelayModel.typing_delay(&message, &mut rng),
        Duration::from_secs(8)
    );
}
