//! Player input
//!
//! Platform key events become `InputEvent`s on a channel. The controller
//! drains that channel before each scheduler step and applies events to the
//! game state, so anything sent between two ticks is buffered before the next
//! tick reads the pending direction.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::sim::{Direction, GamePhase, GameState};

/// Toolkit-independent input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Direction(Direction),
    PauseToggle,
    /// Pause only; never resumes (focus loss, hidden tab)
    Pause,
    Quit,
}

impl InputEvent {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(InputEvent::Direction(Direction::Up)),
            "ArrowDown" | "s" | "S" => Some(InputEvent::Direction(Direction::Down)),
            "ArrowLeft" | "a" | "A" => Some(InputEvent::Direction(Direction::Left)),
            "ArrowRight" | "d" | "D" => Some(InputEvent::Direction(Direction::Right)),
            " " | "p" | "P" => Some(InputEvent::PauseToggle),
            "Escape" => Some(InputEvent::Quit),
            _ => None,
        }
    }
}

/// Result of applying one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// First direction key: Idle -> Running
    Started,
    DirectionBuffered,
    /// Would reverse into the neck
    DirectionRejected,
    /// New phase after the toggle
    PauseToggled(GamePhase),
    /// Caller must end the session
    QuitRequested,
    Ignored,
}

/// Sending half handed to the platform layer
#[derive(Debug, Clone)]
pub struct InputSender(Sender<InputEvent>);

impl InputSender {
    /// False once the controller is gone
    pub fn send(&self, event: InputEvent) -> bool {
        self.0.send(event).is_ok()
    }
}

/// Receiving half; applies events to the session state
#[derive(Debug)]
pub struct InputController {
    rx: Receiver<InputEvent>,
}

impl InputController {
    pub fn channel() -> (InputSender, InputController) {
        let (tx, rx) = mpsc::channel();
        (InputSender(tx), InputController { rx })
    }

    /// Events queued since the last drain, oldest first
    pub fn drain(&self) -> Vec<InputEvent> {
        self.rx.try_iter().collect()
    }

    /// Apply one event to the state
    pub fn apply(event: InputEvent, state: &mut GameState) -> InputAction {
        match event {
            InputEvent::Direction(direction) => match state.phase {
                GamePhase::Idle => {
                    state.start();
                    state.buffer_direction(direction);
                    InputAction::Started
                }
                GamePhase::Running => {
                    if state.buffer_direction(direction) {
                        InputAction::DirectionBuffered
                    } else {
                        InputAction::DirectionRejected
                    }
                }
                GamePhase::Paused | GamePhase::Ended => InputAction::Ignored,
            },
            InputEvent::PauseToggle => {
                if state.toggle_pause() {
                    InputAction::PauseToggled(state.phase)
                } else {
                    InputAction::Ignored
                }
            }
            InputEvent::Pause => {
                if state.phase == GamePhase::Running && state.toggle_pause() {
                    InputAction::PauseToggled(GamePhase::Paused)
                } else {
                    InputAction::Ignored
                }
            }
            InputEvent::Quit => {
                if state.is_over() {
                    InputAction::Ignored
                } else {
                    InputAction::QuitRequested
                }
            }
        }
    }
}
