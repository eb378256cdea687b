use winit::keyboard::{KeyCode, PhysicalKey};

use crate::anim::{Animator, Clip};

/// What a key-down asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Play(Clip),
    ToggleOverlay,
    Quit,
}

/// Map a physical key to an action. Unmapped keys return `None`.
pub fn action_for_key(key: PhysicalKey) -> Option<Action> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    match code {
        KeyCode::ArrowLeft => Some(Action::Play(Clip::WalkLeft)),
        KeyCode::ArrowRight => Some(Action::Play(Clip::WalkRight)),
        KeyCode::Space => Some(Action::Play(Clip::Attack)),
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Action::Play(Clip::Attack2)),
        KeyCode::F12 => Some(Action::ToggleOverlay),
        KeyCode::Escape => Some(Action::Quit),
        _ => None,
    }
}

/// Apply a clip action to the animator. Returns false for non-clip actions.
pub fn apply(animator: &mut Animator, action: Action) -> bool {
    match action {
        Action::Play(clip) => {
            animator.trigger(clip);
            true
        }
        _ => false,
    }
}
