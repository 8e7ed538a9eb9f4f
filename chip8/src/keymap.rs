use clap::ValueEnum;
use sdl2::keyboard::Keycode;

/// # Keymap
/// Chip-8 input is generated with a hexadecimal keypad.
///
/// `Qwerty` maps this original layout to the left 4 alphanumeric columns.
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|  ->  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
/// `Hex` maps each key to the keyboard key printed with the same digit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum KeyLayout {
    Qwerty,
    Hex,
}

impl KeyLayout {
    pub fn keymap(self, key: Keycode) -> Option<u8> {
        match self {
            KeyLayout::Qwerty => qwerty(key),
            KeyLayout::Hex => hex(key),
        }
    }
}

fn qwerty(key: Keycode) -> Option<u8> {
    match key {
        Keycode::X => Some(0x0),
        Keycode::Num1 => Some(0x1),
        Keycode::Num2 => Some(0x2),
        Keycode::Num3 => Some(0x3),
        Keycode::Q => Some(0x4),
        Keycode::W => Some(0x5),
        Keycode::E => Some(0x6),
        Keycode::A => Some(0x7),
        Keycode::S => Some(0x8),
        Keycode::D => Some(0x9),
        Keycode::Z => Some(0xA),
        Keycode::C => Some(0xB),
        Keycode::Num4 => Some(0xC),
        Keycode::R => Some(0xD),
        Keycode::F => Some(0xE),
        Keycode::V => Some(0xF),
        _ => None,
    }
}

fn hex(key: Keycode) -> Option<u8> {
    match key {
        Keycode::Num0 | Keycode::Kp0 => Some(0x0),
        Keycode::Num1 | Keycode::Kp1 => Some(0x1),
        Keycode::Num2 | Keycode::Kp2 => Some(0x2),
        Keycode::Num3 | Keycode::Kp3 => Some(0x3),
        Keycode::Num4 | Keycode::Kp4 => Some(0x4),
        Keycode::Num5 | Keycode::Kp5 => Some(0x5),
        Keycode::Num6 | Keycode::Kp6 => Some(0x6),
        Keycode::Num7 | Keycode::Kp7 => Some(0x7),
        Keycode::Num8 | Keycode::Kp8 => Some(0x8),
        Keycode::Num9 | Keycode::Kp9 => Some(0x9),
        Keycode::A => Some(0xA),
        Keycode::B => Some(0xB),
        Keycode::C => Some(0xC),
        Keycode::D => Some(0xD),
        Keycode::E => Some(0xE),
        Keycode::F => Some(0xF),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qwerty_corners() {
        let layout = KeyLayout::Qwerty;
        assert_eq!(layout.keymap(Keycode::Num1), Some(0x1));
        assert_eq!(layout.keymap(Keycode::Num4), Some(0xC));
        assert_eq!(layout.keymap(Keycode::Z), Some(0xA));
        assert_eq!(layout.keymap(Keycode::V), Some(0xF));
        assert_eq!(layout.keymap(Keycode::B), None);
    }

    #[test]
    fn test_hex_is_literal() {
        let layout = KeyLayout::Hex;
        assert_eq!(layout.keymap(Keycode::Num0), Some(0x0));
        assert_eq!(layout.keymap(Keycode::Kp7), Some(0x7));
        assert_eq!(layout.keymap(Keycode::B), Some(0xB));
        assert_eq!(layout.keymap(Keycode::Q), None);
    }

    #[test]
    fn test_layouts_cover_every_key() {
        let keys = [
            Keycode::Num0, Keycode::Num1, Keycode::Num2, Keycode::Num3, Keycode::Num4,
            Keycode::Num5, Keycode::Num6, Keycode::Num7, Keycode::Num8, Keycode::Num9,
            Keycode::Q, Keycode::W, Keycode::E, Keycode::R, Keycode::A, Keycode::S,
            Keycode::D, Keycode::F, Keycode::Z, Keycode::X, Keycode::C, Keycode::V,
            Keycode::B,
        ];
        for layout in &[KeyLayout::Qwerty, KeyLayout::Hex] {
            let mut seen = [false; 16];
            for key in keys.iter() {
                if let Some(k) = layout.keymap(*key) {
                    seen[k as usize] = true;
                }
            }
            assert!(seen.iter().all(|s| *s), "{:?} misses a key", layout);
        }
    }
}
