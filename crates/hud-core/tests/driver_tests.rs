use hud_core::*;

fn set(name: &str) -> DriverEffect {
    DriverEffect::SetState(name.to_string())
}

/// Advance in 10 ms steps and collect every effect.
fn run(driver: &mut PresenceDriver, secs: f32) -> Vec<DriverEffect> {
    let mut out = Vec::new();
    let steps = (secs / 0.01).round() as usize;
    for _ in 0..steps {
        driver.tick(0.01, &mut out);
    }
    out
}

fn handle(driver: &mut PresenceDriver, event: PresenceEvent) -> Vec<DriverEffect> {
    let mut out = Vec::new();
    driver.handle(event, &mut out);
    out
}

#[test]
fn first_face_goes_active_then_greets() {
    let mut d = PresenceDriver::default();
    assert_eq!(handle(&mut d, PresenceEvent::FaceDetected), vec![set("active")]);
    assert!(run(&mut d, 0.4).is_empty());
    let greeting = d.states().greeting.clone();
    assert_eq!(
        run(&mut d, 0.2),
        vec![set("speaking"), DriverEffect::Speak(greeting)]
    );
    assert!(!d.has_pending());
}

#[test]
fn speech_end_returns_to_active_while_face_present() {
    let mut d = PresenceDriver::default();
    handle(&mut d, PresenceEvent::FaceDetected);
    run(&mut d, 0.6);
    assert_eq!(handle(&mut d, PresenceEvent::SpeechStarted), vec![set("speaking")]);
    assert!(handle(&mut d, PresenceEvent::SpeechEnded).is_empty());
    assert!(d.greeted());
    assert!(run(&mut d, 0.2).is_empty());
    assert_eq!(run(&mut d, 0.2), vec![set("active")]);
}

#[test]
fn speech_end_without_face_returns_to_idle() {
    let mut d = PresenceDriver::default();
    handle(&mut d, PresenceEvent::SpeechStarted);
    handle(&mut d, PresenceEvent::SpeechEnded);
    assert_eq!(run(&mut d, 0.5), vec![set("idle")]);
    assert!(!d.greeted());
}

#[test]
fn speech_failure_holds_feedback_for_three_seconds() {
    for failure in [PresenceEvent::SpeechFailed, PresenceEvent::SpeechUnsupported] {
        let mut d = PresenceDriver::default();
        handle(&mut d, PresenceEvent::FaceDetected);
        run(&mut d, 0.6);
        handle(&mut d, failure);
        assert!(d.greeted());
        assert!(run(&mut d, 2.9).is_empty());
        assert_eq!(run(&mut d, 0.2), vec![set("active")]);
    }
}

#[test]
fn repeated_detection_while_present_is_ignored() {
    let mut d = PresenceDriver::default();
    handle(&mut d, PresenceEvent::FaceDetected);
    run(&mut d, 0.6);
    handle(&mut d, PresenceEvent::SpeechEnded);
    run(&mut d, 0.5);
    assert!(handle(&mut d, PresenceEvent::FaceDetected).is_empty());
}

#[test]
fn face_lost_cancels_pending_greeting() {
    let mut d = PresenceDriver::default();
    handle(&mut d, PresenceEvent::FaceDetected);
    run(&mut d, 0.2);
    assert_eq!(handle(&mut d, PresenceEvent::FaceLost), vec![set("idle")]);
    assert!(!d.has_pending());
    assert!(run(&mut d, 1.0).is_empty());
    assert!(handle(&mut d, PresenceEvent::FaceLost).is_empty());

    // Greeting happens again on return.
    handle(&mut d, PresenceEvent::FaceDetected);
    assert_eq!(run(&mut d, 0.6).len(), 2);
}

#[test]
fn late_speech_end_after_face_lost_does_not_mark_greeted() {
    let mut d = PresenceDriver::default();
    handle(&mut d, PresenceEvent::FaceDetected);
    run(&mut d, 0.6);
    handle(&mut d, PresenceEvent::FaceLost);
    handle(&mut d, PresenceEvent::SpeechEnded);
    assert!(!d.greeted());
    assert_eq!(run(&mut d, 0.5), vec![set("idle")]);
}

#[test]
fn reset_clears_everything() {
    let mut d = PresenceDriver::default();
    handle(&mut d, PresenceEvent::FaceDetected);
    run(&mut d, 0.6);
    handle(&mut d, PresenceEvent::SpeechEnded);
    assert_eq!(handle(&mut d, PresenceEvent::Reset), vec![set("idle")]);
    assert!(!d.face_present());
    assert!(!d.greeted());
    assert!(!d.has_pending());
}

#[test]
fn configured_names_are_used() {
    let config = HudConfig::preset(Preset::Zairo).unwrap();
    let mut d = PresenceDriver::new(config.presence.clone());
    assert_eq!(handle(&mut d, PresenceEvent::FaceDetected), vec![set("detecting")]);
    let effects = run(&mut d, 0.6);
    assert_eq!(effects[0], set("greeting"));
}

#[test]
fn driver_effects_feed_the_engine() {
    let config = HudConfig::preset(Preset::Assistant).unwrap();
    let mut engine = HudEngine::new(&config).unwrap();
    let tx = engine.command_sender();
    let mut d = PresenceDriver::new(config.presence.clone());
    let mut out = Vec::new();
    d.handle(PresenceEvent::FaceDetected, &mut out);
    for _ in 0..60 {
        d.tick(1.0 / 60.0, &mut out);
    }
    let mut spoken = 0;
    for effect in out.drain(..) {
        match effect.into_command() {
            Some(cmd) => assert!(tx.send(cmd)),
            None => spoken += 1,
        }
    }
    engine.tick(1.0 / 60.0, None);
    assert_eq!(spoken, 1);
    assert_eq!(engine.target_state(), "speaking");
    assert_eq!(engine.diagnostics().total(), 0);
}
