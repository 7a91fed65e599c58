//! Explicit publish/subscribe channel between the progress core and its
//! observers. Subscribers poll their receiver; dead receivers are pruned on
//! the next publish.

use std::sync::mpsc;

#[derive(Clone, Debug, PartialEq)]
pub enum ProgressEvent {
    ProgressUpdated {
        experience_points: u32,
        level: u32,
        streak_days: u32,
    },
    LevelUp {
        from: u32,
        to: u32,
    },
    AchievementUnlocked {
        id: &'static str,
        name: &'static str,
        reward_xp: u32,
    },
    ChallengeCompleted {
        id: &'static str,
        name: &'static str,
        reward_xp: u32,
    },
    ItemSaved {
        kind: &'static str,
        id: String,
    },
}

#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<mpsc::Sender<ProgressEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> mpsc::Receiver<ProgressEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn publish(&mut self, event: ProgressEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
