use egui::{Context, Key, Modifiers, PointerButton, Pos2, Rect};

/// Input delivered to a drawing session. Pointer positions are relative to the
/// surface origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed over the surface
    PointerDown { pos: Pos2 },
    /// Pointer moved, with or without a button held
    PointerMove { pos: Pos2 },
    /// Primary button released anywhere
    PointerUp { pos: Pos2 },
    /// Scroll wheel; negative values mean the wheel was pushed away
    Wheel { delta: f32 },
    /// Key pressed with the given modifiers
    KeyDown { key: Key, modifiers: Modifiers },
    /// The host wants the surface to take a new size
    Resize { width: u32, height: u32 },
    /// The clear control was activated
    Clear,
}

/// Where the canvas sits this frame and whether it owns pointer and keyboard input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasFocus {
    pub rect: Rect,
    /// The pointer is over the canvas and not over a popup or window above it
    pub hovered: bool,
    /// Another widget (a text or drag field) holds keyboard focus
    pub keyboard_taken: bool,
}

impl CanvasFocus {
    /// Focus for a canvas that owns all input over `rect`
    pub fn owned(rect: Rect) -> Self {
        Self {
            rect,
            hovered: true,
            keyboard_taken: false,
        }
    }
}

/// Converts raw egui input into [`InputEvent`]s, preserving the order egui reports them in
#[derive(Debug, Default)]
pub struct InputHandler {
    button_held: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process this frame's raw egui input for the canvas described by `focus`
    pub fn process_input(&mut self, ctx: &Context, focus: CanvasFocus) -> Vec<InputEvent> {
        ctx.input(|input| {
            input
                .raw
                .events
                .iter()
                .filter_map(|event| self.translate(event, focus))
                .collect()
        })
    }

    /// Translate a single egui event. Split out so it can be exercised without a frame.
    pub fn translate(&mut self, event: &egui::Event, focus: CanvasFocus) -> Option<InputEvent> {
        let relative = |pos: Pos2| (pos - focus.rect.min).to_pos2();

        match event {
            egui::Event::PointerButton {
                pos,
                button: PointerButton::Primary,
                pressed,
                ..
            } => {
                if *pressed {
                    if !focus.hovered || !focus.rect.contains(*pos) {
                        return None;
                    }
                    self.button_held = true;
                    Some(InputEvent::PointerDown { pos: relative(*pos) })
                } else if std::mem::take(&mut self.button_held) {
                    Some(InputEvent::PointerUp { pos: relative(*pos) })
                } else {
                    None
                }
            }
            egui::Event::PointerMoved(pos) => Some(InputEvent::PointerMove { pos: relative(*pos) }),
            // One wheel event is one notch whatever its unit. egui uses positive y
            // for scrolling up, the opposite of DOM wheel deltas.
            egui::Event::MouseWheel { delta, .. } if delta.y != 0.0 => {
                Some(InputEvent::Wheel { delta: -delta.y })
            }
            egui::Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } if !focus.keyboard_taken => Some(InputEvent::KeyDown {
                key: *key,
                modifiers: *modifiers,
            }),
            _ => None,
        }
    }
}
