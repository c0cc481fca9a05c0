use crate::easing::Easing;
use std::sync::mpsc::{self, Receiver, Sender};

/// Request queued from an event callback and applied at the next tick.
#[derive(Clone, Debug, PartialEq)]
pub enum HudCommand {
    SetState(String),
    SetIntensity(f32),
    SetEasing(Easing),
    /// Seconds; invalid values fall back to the default when applied.
    SetDuration(f32),
}

/// Cloneable handle for event callbacks. Sending never blocks.
#[derive(Clone, Debug)]
pub struct CommandSender(Sender<HudCommand>);

impl CommandSender {
    /// Returns `false` once the engine has been dropped.
    pub fn send(&self, cmd: HudCommand) -> bool {
        self.0.send(cmd).is_ok()
    }

    pub fn set_state(&self, name: impl Into<String>) -> bool {
        self.send(HudCommand::SetState(name.into()))
    }

    pub fn set_intensity(&self, value: f32) -> bool {
        self.send(HudCommand::SetIntensity(value))
    }

    pub fn set_easing(&self, easing: Easing) -> bool {
        self.send(HudCommand::SetEasing(easing))
    }

    pub fn set_duration(&self, secs: f32) -> bool {
        self.send(HudCommand::SetDuration(secs))
    }
}

#[derive(Debug)]
pub struct CommandQueue {
    tx: Sender<HudCommand>,
    rx: Receiver<HudCommand>,
}

impl Default for CommandQueue {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }
}

impl CommandQueue {
    pub fn sender(&self) -> CommandSender {
        CommandSender(self.tx.clone())
    }

    /// Everything queued so far, in send order.
    pub fn drain(&self) -> impl Iterator<Item = HudCommand> + '_ {
        self.rx.try_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_send_order_across_clones() {
        let q = CommandQueue::default();
        let a = q.sender();
        let b = a.clone();
        assert!(a.set_state("active"));
        assert!(b.set_intensity(1.5));
        assert!(a.set_state("idle"));
        assert!(b.set_easing(Easing::Linear));
        let got: Vec<_> = q.drain().collect();
        assert_eq!(
            got,
            vec![
                HudCommand::SetState("active".into()),
                HudCommand::SetIntensity(1.5),
                HudCommand::SetState("idle".into()),
                HudCommand::SetEasing(Easing::Linear),
            ]
        );
        assert_eq!(q.drain().count(), 0);
    }

    #[test]
    fn sending_after_drop_reports_failure() {
        let q = CommandQueue::default();
        let s = q.sender();
        drop(q);
        assert!(!s.set_state("idle"));
    }
}
