use crate::frame::{EventQueue, SharedSnapshot};
use crate::keymap::{command_for_key, nudged_intensity, KeyCommand};
use hud_core::{CommandSender, PresenceEvent};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_global_keydown(snapshot: SharedSnapshot, commands: CommandSender, events: EventQueue) {
    if let Some(window) = web::window() {
        let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
            if ev.repeat() {
                return;
            }
            if let Some(cmd) = command_for_key(&ev.key()) {
                handle_key_command(cmd, &snapshot, &commands, &events);
            }
        }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn handle_key_command(
    cmd: KeyCommand,
    snapshot: &SharedSnapshot,
    commands: &CommandSender,
    events: &EventQueue,
) {
    let presence = |event| events.borrow_mut().push(event);
    match cmd {
        KeyCommand::FaceDetected => presence(PresenceEvent::FaceDetected),
        KeyCommand::FaceLost => presence(PresenceEvent::FaceLost),
        KeyCommand::SpeechEnded => presence(PresenceEvent::SpeechEnded),
        KeyCommand::ResetPresence => presence(PresenceEvent::Reset),
        KeyCommand::SelectState(n) => match snapshot.borrow().nth_state(n) {
            Some(name) => {
                commands.set_state(name);
            }
            None => log::info!("[keys] no state #{}", n + 1),
        },
        KeyCommand::IntensityUp | KeyCommand::IntensityDown => {
            let target = snapshot.borrow().intensity.target;
            commands.set_intensity(nudged_intensity(target, cmd == KeyCommand::IntensityUp));
        }
        KeyCommand::CycleEasing => {
            let next = snapshot.borrow().easing.next();
            commands.set_easing(next);
        }
    }
}
