//! Key-glyph code translation for menu shortcuts.
//!
//! Menu items can declare their shortcut key as a glyph code instead of a
//! literal character: the small integers defined for the Carbon menu
//! manager (`kMenuTabRightGlyph` and friends) and still reported through
//! the accessibility attribute `AXMenuItemCmdGlyph`. This module maps the
//! codes to the display symbols users see in the menu bar.

/// Translate a menu glyph code to its display symbol.
///
/// The table is sparse over the observed range 0x02–0x92. Unknown codes
/// return `None`; that is absence, not an error, and callers fall back to the
/// item's literal shortcut character.
///
/// # Examples
///
/// ```
/// use menubar_search::glyph::symbol;
///
/// assert_eq!(symbol(0x11), Some("⌘"));
/// assert_eq!(symbol(0x6F), Some("F1"));
/// assert_eq!(symbol(0xFF), None);
/// ```
pub fn symbol(code: i64) -> Option<&'static str> {
    let s = match code {
        0x02 => "⇥", // kMenuTabRightGlyph
        0x03 => "⇤", // kMenuTabLeftGlyph
        0x04 => "⌤", // kMenuEnterGlyph
        0x05 => "⇧", // kMenuShiftGlyph
        0x06 => "⌃", // kMenuControlGlyph
        0x07 => "⌥", // kMenuOptionGlyph
        0x09 => "␣", // kMenuSpaceGlyph
        0x0A => "⌦", // kMenuDeleteRightGlyph
        0x0B => "↩", // kMenuReturnGlyph
        0x0C => "↩", // kMenuReturnR2LGlyph
        0x0D => "↩", // kMenuNonmarkingReturnGlyph
        0x0F => "✎", // kMenuPencilGlyph
        0x10 => "⇣", // kMenuDownwardArrowDashedGlyph
        0x11 => "⌘", // kMenuCommandGlyph
        0x12 => "✓", // kMenuCheckmarkGlyph
        0x13 => "◆", // kMenuDiamondGlyph
        0x14 => "\u{f8ff}", // kMenuAppleLogoFilledGlyph
        0x17 => "⌫", // kMenuDeleteLeftGlyph
        0x18 => "⇠", // kMenuLeftArrowDashedGlyph
        0x19 => "⇡", // kMenuUpArrowDashedGlyph
        0x1A => "⇢", // kMenuRightArrowDashedGlyph
        0x1B => "⎋", // kMenuEscapeGlyph
        0x1C => "⌧", // kMenuClearGlyph
        0x62 => "⇞", // kMenuPageUpGlyph
        0x63 => "⇪", // kMenuCapsLockGlyph
        0x64 => "←", // kMenuLeftArrowGlyph
        0x65 => "→", // kMenuRightArrowGlyph
        0x66 => "↖", // kMenuNorthwestArrowGlyph (home)
        0x67 => "?", // kMenuHelpGlyph
        0x68 => "↑", // kMenuUpArrowGlyph
        0x69 => "↘", // kMenuSoutheastArrowGlyph (end)
        0x6A => "↓", // kMenuDownArrowGlyph
        0x6B => "⇟", // kMenuPageDownGlyph
        0x6C => "\u{f8ff}", // kMenuAppleLogoOutlineGlyph
        0x6D => "☰", // kMenuContextualMenuGlyph
        0x6E => "⌽", // kMenuPowerGlyph
        0x6F => "F1",
        0x70 => "F2",
        0x71 => "F3",
        0x72 => "F4",
        0x73 => "F5",
        0x74 => "F6",
        0x75 => "F7",
        0x76 => "F8",
        0x77 => "F9",
        0x78 => "F10",
        0x79 => "F11",
        0x7A => "F12",
        0x87 => "F13",
        0x88 => "F14",
        0x89 => "F15",
        0x8A => "⌃", // kMenuControlISOGlyph
        0x8C => "⏏", // kMenuEjectGlyph
        0x8F => "F16",
        0x90 => "F17",
        0x91 => "F18",
        0x92 => "F19",
        _ => return None,
    };
    Some(s)
}
