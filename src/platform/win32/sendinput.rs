use std::mem::size_of;

use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYEVENTF_KEYUP, KEYEVENTF_UNICODE,
    VIRTUAL_KEY,
};

use crate::input::injector::{KeyDirection, KeystrokeSink, SyntheticKey};

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const INPUT_SIZE: i32 = size_of::<INPUT>() as i32;

/// Injects keystrokes into the system input stream with `SendInput`.
///
/// Every event is sent on its own so a rejected event never drops its
/// neighbours.
#[derive(Debug, Default, Clone, Copy)]
pub struct SendInputSink;

impl KeystrokeSink for SendInputSink {
    fn send(&mut self, key: SyntheticKey) -> bool {
        let flags = match key.direction {
            KeyDirection::Down => KEYEVENTF_UNICODE,
            KeyDirection::Up => KEYEVENTF_UNICODE | KEYEVENTF_KEYUP,
        };
        let input = [INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: VIRTUAL_KEY(0),
                    wScan: key.unit,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        }];
        unsafe { SendInput(&input, INPUT_SIZE) == 1 }
    }
}
