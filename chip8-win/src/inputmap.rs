//! Keyboard mapping.
use winit::event::VirtualKeyCode;

/// Map a host keyboard key to its CHIP-8 pad key.
///
/// The pad occupies the left of the keyboard:
///
/// ```text
/// 1 2 3 4        1 2 3 C
/// Q W E R   ->   4 5 6 D
/// A S D F        7 8 9 E
/// Z X C V        A 0 B F
/// ```
#[rustfmt::skip]
pub fn chip8_key(key: VirtualKeyCode) -> Option<usize> {
    use VirtualKeyCode as VK;

    match key {
        VK::Key1 => Some(0x1), VK::Key2 => Some(0x2), VK::Key3 => Some(0x3), VK::Key4 => Some(0xC),
        VK::Q    => Some(0x4), VK::W    => Some(0x5), VK::E    => Some(0x6), VK::R    => Some(0xD),
        VK::A    => Some(0x7), VK::S    => Some(0x8), VK::D    => Some(0x9), VK::F    => Some(0xE),
        VK::Z    => Some(0xA), VK::X    => Some(0x0), VK::C    => Some(0xB), VK::V    => Some(0xF),
        _ => None,
    }
}
