/// Gamepad input using gilrs.
///
/// Button mapping for start/quit comes from the `[gamepad]` config table.
/// Default mapping:
///   D-pad / Left Stick    →  one step per press
///   Start / A             →  Start
///   Select                →  Quit
///
/// Movement is edge-triggered like key presses: tilt the stick or press the
/// d-pad once per cell.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::grid::Direction;

use super::input::InputAction;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    Start,
    Select,
}

const BTN_COUNT: usize = 8;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South     => Some(Btn::A),
            Button::East      => Some(Btn::B),
            Button::West      => Some(Btn::X),
            Button::North     => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start     => Some(Btn::Start),
            Button::Select    => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Action-to-button mapping (loaded from config).
#[derive(Debug, PartialEq)]
struct ActionMap {
    start: Vec<Btn>,
    quit: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            start: vec![Btn::Start, Btn::A],
            quit:  vec![Btn::Select],
        }
    }
}

impl ActionMap {
    /// Unknown names are skipped; an empty list keeps the default.
    fn from_config(cfg: &GamepadConfig) -> Self {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        let mut map = ActionMap::default();
        let st = parse_list(&cfg.start);
        if !st.is_empty() { map.start = st; }
        let qt = parse_list(&cfg.quit);
        if !qt.is_empty() { map.quit = qt; }
        map
    }
}

fn dir_index(dir: Direction) -> usize {
    match dir {
        Direction::Up => 0,
        Direction::Down => 1,
        Direction::Left => 2,
        Direction::Right => 3,
    }
}

const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    pressed: [bool; BTN_COUNT],
    dpad_pressed: [bool; 4],

    // Stick, digitized
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_held: [bool; 4],
    stick_pressed: [bool; 4],
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_x: f32,
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_y: f32,

    action_map: ActionMap,

    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = {
            match Gilrs::new() {
                Ok(g) => {
                    let has_pad = g.gamepads().next().is_some();
                    (Some(g), has_pad)
                }
                Err(_) => (None, false),
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            pressed: [false; BTN_COUNT],
            dpad_pressed: [false; 4],
            stick_held: [false; 4],
            stick_pressed: [false; 4],
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
            connected,
        }
    }

    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        self.action_map = ActionMap::from_config(cfg);
    }

    pub fn update(&mut self) {
        self.pressed = [false; BTN_COUNT];
        self.dpad_pressed = [false; 4];
        self.stick_pressed = [false; 4];

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.press(btn);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick_x = value,
                        Axis::LeftStickY => self.stick_y = value,
                        _ => {}
                    }
                }
                EventType::Connected => { self.connected = true; }
                EventType::Disconnected => {
                    self.connected = false;
                    self.stick_x = 0.0;
                    self.stick_y = 0.0;
                }
                _ => {}
            }
        }

        let now = [
            self.stick_y > STICK_DEADZONE,
            self.stick_y < -STICK_DEADZONE,
            self.stick_x < -STICK_DEADZONE,
            self.stick_x > STICK_DEADZONE,
        ];
        for i in 0..4 {
            self.stick_pressed[i] = now[i] && !self.stick_held[i];
        }
        self.stick_held = now;
    }

    #[cfg(feature = "gamepad")]
    fn press(&mut self, gilrs_btn: Button) {
        let dpad = match gilrs_btn {
            Button::DPadUp    => Some(Direction::Up),
            Button::DPadDown  => Some(Direction::Down),
            Button::DPadLeft  => Some(Direction::Left),
            Button::DPadRight => Some(Direction::Right),
            _ => None,
        };
        if let Some(dir) = dpad {
            self.dpad_pressed[dir_index(dir)] = true;
        } else if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            self.pressed[btn as usize] = true;
        }
    }

    fn any_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.pressed[b as usize])
    }

    /// Actions produced since the last `update`.
    pub fn actions(&self) -> Vec<InputAction> {
        let mut out = Vec::new();
        if self.any_pressed(&self.action_map.quit) {
            out.push(InputAction::Quit);
        }
        if self.any_pressed(&self.action_map.start) {
            out.push(InputAction::Start);
        }
        for dir in DIRECTIONS {
            let i = dir_index(dir);
            if self.dpad_pressed[i] || self.stick_pressed[i] {
                out.push(InputAction::Step(dir));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(start: &[&str], quit: &[&str]) -> GamepadConfig {
        GamepadConfig {
            start: start.iter().map(|s| s.to_string()).collect(),
            quit: quit.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(Btn::from_name("start"), Some(Btn::Start));
        assert_eq!(Btn::from_name("Back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("south"), Some(Btn::A));
        assert_eq!(Btn::from_name("turbo"), None);
    }

    #[test]
    fn empty_or_unknown_lists_keep_defaults() {
        assert_eq!(ActionMap::from_config(&cfg(&[], &["nope"])), ActionMap::default());
        let map = ActionMap::from_config(&cfg(&["X", "bogus"], &["B"]));
        assert_eq!(map.start, vec![Btn::X]);
        assert_eq!(map.quit, vec![Btn::B]);
    }

    #[cfg(not(feature = "gamepad"))]
    #[test]
    fn stub_pad_is_silent() {
        let mut gp = GamepadState::new();
        gp.load_button_config(&cfg(&["A"], &["B"]));
        gp.update();
        assert!(!gp.connected);
        assert!(gp.actions().is_empty());
    }
}
