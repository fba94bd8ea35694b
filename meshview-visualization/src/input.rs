//! Toolkit-agnostic pointer input
//!
//! Hosts translate their windowing events into these types before handing
//! them to a [`crate::View`].

use nalgebra::Point2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

/// Set of pointer buttons held down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buttons {
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}

impl Buttons {
    pub const NONE: Self = Self {
        left: false,
        middle: false,
        right: false,
    };

    /// A set holding just `button`
    pub fn only(button: PointerButton) -> Self {
        Self::NONE.with(button)
    }

    pub fn with(mut self, button: PointerButton) -> Self {
        match button {
            PointerButton::Left => self.left = true,
            PointerButton::Middle => self.middle = true,
            PointerButton::Right => self.right = true,
        }
        self
    }

    /// True when `button` is held and nothing else is
    pub fn is_only(&self, button: PointerButton) -> bool {
        *self == Self::only(button)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// Keyboard modifiers held during a pointer event. Dispatch compares the
/// whole set, so Alt+Shift is neither Alt nor Shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub alt: bool,
    pub control: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        alt: false,
        control: false,
        shift: false,
    };
    pub const ALT: Self = Self {
        alt: true,
        control: false,
        shift: false,
    };
    pub const CONTROL: Self = Self {
        alt: false,
        control: true,
        shift: false,
    };
    pub const SHIFT: Self = Self {
        alt: false,
        control: false,
        shift: true,
    };
}

/// A pointer press, move or release
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Position in item pixels, origin at the top left
    pub position: Point2<f32>,
    /// Button that changed state; `None` for moves
    pub button: Option<PointerButton>,
    /// Buttons held after the event
    pub buttons: Buttons,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn press(position: Point2<f32>, button: PointerButton, modifiers: Modifiers) -> Self {
        Self {
            position,
            button: Some(button),
            buttons: Buttons::only(button),
            modifiers,
        }
    }

    pub fn moved(position: Point2<f32>, buttons: Buttons, modifiers: Modifiers) -> Self {
        Self {
            position,
            button: None,
            buttons,
            modifiers,
        }
    }

    pub fn release(position: Point2<f32>, button: PointerButton, modifiers: Modifiers) -> Self {
        Self {
            position,
            button: Some(button),
            buttons: Buttons::NONE,
            modifiers,
        }
    }

    /// Position snapped to whole pixels
    pub fn pixel(&self) -> Point2<i32> {
        Point2::new(self.position.x.round() as i32, self.position.y.round() as i32)
    }
}
