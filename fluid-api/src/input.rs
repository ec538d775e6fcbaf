/// Identifies one pointer across its down/move/up lifecycle. Mouse input
/// uses a fixed sentinel id; touch input uses the platform touch id; the
/// landmark-driven adapter mints one id per tracked hand.
pub type PointerId = u64;

/// Push-style input event (spec §6). Coordinates are in surface pixels,
/// origin top-left — the Pointer State flips the `y` axis and normalizes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown { id: PointerId, x: f32, y: f32 },
    PointerMove { id: PointerId, x: f32, y: f32 },
    PointerUp { id: PointerId },
    PointerCancel { id: PointerId },
    Key { code: KeyCode },
}

/// The illustrative keyboard commands from spec §6.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCode {
    TogglePause,
    RandomSplats,
    Other(u32),
}
