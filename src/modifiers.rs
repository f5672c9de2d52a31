//! Modifier bitmask decoding for menu shortcuts.
//!
//! Two different modifier encodings exist on the platform. Menu items
//! declare their shortcut through `AXMenuItemCmdModifiers`, whose bit
//! layout comes from the menu manager, not the event system:
//!
//! - bit 0 (0x1): Shift
//! - bit 1 (0x2): Option
//! - bit 2 (0x4): Control
//! - bit 3 (0x8): **No Command**. Command participates exactly when this
//!   bit is absent. A raw value of 0 therefore means "Command only".
//!
//! Live input events use the `NSEvent` device-independent flag layout
//! instead (Shift `1<<17` … Command `1<<20`), with no inversion. Each
//! encoding is decoded with its own table; the menu-item Command inversion
//! is a platform contract and is preserved bit-for-bit.

/// Which bit layout the raw modifier value uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierEncoding {
    /// `AXMenuItemCmdModifiers` layout (menu manager bits, inverted Command).
    MenuItem,
    /// `NSEvent` device-independent modifier flags.
    Event,
}

/// Normalized set of shortcut modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub option: bool,
    pub control: bool,
    pub command: bool,
}

// AXMenuItemCmdModifiers bits.
const MENU_SHIFT: i64 = 0x1;
const MENU_OPTION: i64 = 0x2;
const MENU_CONTROL: i64 = 0x4;
const MENU_NO_COMMAND: i64 = 0x8;

// NSEvent device-independent modifier flags.
const EVENT_SHIFT: i64 = 1 << 17;
const EVENT_CONTROL: i64 = 1 << 18;
const EVENT_OPTION: i64 = 1 << 19;
const EVENT_COMMAND: i64 = 1 << 20;

/// Decode a raw modifier value into a normalized set.
pub fn decode(bits: i64, encoding: ModifierEncoding) -> Modifiers {
    match encoding {
        ModifierEncoding::MenuItem => Modifiers {
            shift: bits & MENU_SHIFT != 0,
            option: bits & MENU_OPTION != 0,
            control: bits & MENU_CONTROL != 0,
            command: bits & MENU_NO_COMMAND == 0,
        },
        ModifierEncoding::Event => Modifiers {
            shift: bits & EVENT_SHIFT != 0,
            option: bits & EVENT_OPTION != 0,
            control: bits & EVENT_CONTROL != 0,
            command: bits & EVENT_COMMAND != 0,
        },
    }
}

impl Modifiers {
    /// Render the set in the platform-native order `⌃⌥⇧⌘`.
    ///
    /// # Examples
    ///
    /// ```
    /// use menubar_search::modifiers::{decode, ModifierEncoding};
    ///
    /// // 0 = Command only under the menu-item encoding.
    /// assert_eq!(decode(0, ModifierEncoding::MenuItem).symbols(), "⌘");
    /// // Shift+Command.
    /// assert_eq!(decode(0x1, ModifierEncoding::MenuItem).symbols(), "⇧⌘");
    /// ```
    pub fn symbols(&self) -> String {
        let mut out = String::with_capacity(4 * 3);
        if self.control {
            out.push('⌃');
        }
        if self.option {
            out.push('⌥');
        }
        if self.shift {
            out.push('⇧');
        }
        if self.command {
            out.push('⌘');
        }
        out
    }

    /// True when no modifier key is part of the shortcut.
    pub fn is_empty(&self) -> bool {
        !(self.shift || self.option || self.control || self.command)
    }
}
