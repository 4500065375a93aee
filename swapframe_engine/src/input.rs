/// Input sink - receives keyboard events forwarded by the surface

/// Virtual-key code of a keyboard key
///
/// Letters use their upper-case ASCII value (`0x41` is 'A'), digits their
/// ASCII value. See `surface::keymap` for the full table.
pub type KeyCode = u8;

/// Keyboard event receiver
///
/// Called synchronously from `Surface::pump_step`, on the thread that drives
/// the frame loop. Implementations must not block.
pub trait InputSink {
    /// A key was pressed (auto-repeat delivers further presses)
    fn on_key_down(&mut self, code: KeyCode);

    /// A key was released
    fn on_key_up(&mut self, code: KeyCode);
}
