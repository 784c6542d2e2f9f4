//! Symbolic constant table for behavior files.
//!
//! Event description files name event types, buttons and keys with strings
//! such as `"Type_MouseButtonPress"` or `"BS_LeftButton"`. This table holds every
//! name those files may use together with its numeric value. The set of names is
//! fixed so existing behavior files keep loading unchanged.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Value returned for names that are not in the table.
pub const UNKNOWN_CONSTANT: i32 = -1;

/// Every known constant, in declaration order.
///
/// Some values appear under more than one name (`Key_Backspace` and
/// `Key_BackSpace`, `Key_Space` and `Key_Any`, ...). The first name listed for a
/// value is the canonical one returned by [`constant_name`].
pub static EVENT_CONSTANTS: &[(&str, i32)] = &[
    ("Type_None", 0),
    ("Type_Timer", 1),
    ("Type_MouseButtonPress", 2),
    ("Type_MouseButtonRelease", 3),
    ("Type_MouseButtonDblClick", 4),
    ("Type_MouseMove", 5),
    ("Type_KeyPress", 6),
    ("Type_KeyRelease", 7),
    ("Type_FocusIn", 8),
    ("Type_FocusOut", 9),
    ("Type_Enter", 10),
    ("Type_Leave", 11),
    ("Type_Paint", 12),
    ("Type_Move", 13),
    ("Type_Resize", 14),
    ("Type_Create", 15),
    ("Type_Destroy", 16),
    ("Type_Show", 17),
    ("Type_Hide", 18),
    ("Type_Close", 19),
    ("Type_Quit", 20),
    ("Type_Reparent", 21),
    ("Type_ShowMinimized", 22),
    ("Type_ShowNormal", 23),
    ("Type_WindowActivate", 24),
    ("Type_WindowDeactivate", 25),
    ("Type_ShowToParent", 26),
    ("Type_HideToParent", 27),
    ("Type_ShowMaximized", 28),
    ("Type_ShowFullScreen", 29),
    ("Type_Accel", 30),
    ("Type_Wheel", 31),
    ("Type_AccelAvailable", 32),
    ("Type_CaptionChange", 33),
    ("Type_IconChange", 34),
    ("Type_ParentFontChange", 35),
    ("Type_ApplicationFontChange", 36),
    ("Type_ParentPaletteChange", 37),
    ("Type_ApplicationPaletteChange", 38),
    ("Type_PaletteChange", 39),
    ("Type_Clipboard", 40),
    ("Type_Speech", 42),
    ("Type_SockAct", 50),
    ("Type_AccelOverride", 51),
    ("Type_DeferredDelete", 52),
    ("Type_DragEnter", 60),
    ("Type_DragMove", 61),
    ("Type_DragLeave", 62),
    ("Type_Drop", 63),
    ("Type_DragResponse", 64),
    ("Type_ChildInserted", 70),
    ("Type_ChildRemoved", 71),
    ("Type_LayoutHint", 72),
    ("Type_ShowWindowRequest", 73),
    ("Type_ActivateControl", 80),
    ("Type_DeactivateControl", 81),
    ("Type_ContextMenu", 82),
    ("Type_IMStart", 83),
    ("Type_IMCompose", 84),
    ("Type_IMEnd", 85),
    ("Type_Accessibility", 86),
    ("Type_TabletMove", 87),
    ("Type_LocaleChange", 88),
    ("Type_LanguageChange", 89),
    ("Type_LayoutDirectionChange", 90),
    ("Type_Style", 91),
    ("Type_TabletPress", 92),
    ("Type_TabletRelease", 93),
    ("Type_TDMouseInput", 1094),
    ("Type_TDMouseKeyDown", 1095),
    ("Type_User", 1000),
    ("Type_MaxUser", 65535),
    ("BS_NoButton", 0),
    ("BS_LeftButton", 0x1),
    ("BS_RightButton", 0x2),
    ("BS_MidButton", 0x4),
    ("BS_MouseButtonMask", 0x7),
    ("BS_ShiftButton", 0x100),
    ("BS_ControlButton", 0x200),
    ("BS_AltButton", 0x400),
    ("BS_MetaButton", 0x800),
    ("BS_KeyButtonMask", 0xf00),
    ("BS_Keypad", 0x4000),
    ("Mod_SHIFT", 0x200000),
    ("Mod_CTRL", 0x400000),
    ("Mod_ALT", 0x800000),
    ("Mod_MODIFIER_MASK", 0xe00000),
    ("Mod_UNICODE_ACCEL", 0x10000000),
    ("Mod_ASCII_ACCEL", 0x10000000),
    ("Key_Escape", 0x1000),
    ("Key_Tab", 0x1001),
    ("Key_Backtab", 0x1002),
    ("Key_BackTab", 0x1002),
    ("Key_Backspace", 0x1003),
    ("Key_BackSpace", 0x1003),
    ("Key_Return", 0x1004),
    ("Key_Enter", 0x1005),
    ("Key_Insert", 0x1006),
    ("Key_Delete", 0x1007),
    ("Key_Pause", 0x1008),
    ("Key_Print", 0x1009),
    ("Key_SysReq", 0x100a),
    ("Key_Home", 0x1010),
    ("Key_End", 0x1011),
    ("Key_Left", 0x1012),
    ("Key_Up", 0x1013),
    ("Key_Right", 0x1014),
    ("Key_Down", 0x1015),
    ("Key_Prior", 0x1016),
    ("Key_PageUp", 0x1016),
    ("Key_Next", 0x1017),
    ("Key_PageDown", 0x1017),
    ("Key_Shift", 0x1020),
    ("Key_Control", 0x1021),
    ("Key_Meta", 0x1022),
    ("Key_Alt", 0x1023),
    ("Key_CapsLock", 0x1024),
    ("Key_NumLock", 0x1025),
    ("Key_ScrollLock", 0x1026),
    ("Key_F1", 0x1030),
    ("Key_F2", 0x1031),
    ("Key_F3", 0x1032),
    ("Key_F4", 0x1033),
    ("Key_F5", 0x1034),
    ("Key_F6", 0x1035),
    ("Key_F7", 0x1036),
    ("Key_F8", 0x1037),
    ("Key_F9", 0x1038),
    ("Key_F10", 0x1039),
    ("Key_F11", 0x103a),
    ("Key_F12", 0x103b),
    ("Key_F13", 0x103c),
    ("Key_F14", 0x103d),
    ("Key_F15", 0x103e),
    ("Key_F16", 0x103f),
    ("Key_F17", 0x1040),
    ("Key_F18", 0x1041),
    ("Key_F19", 0x1042),
    ("Key_F20", 0x1043),
    ("Key_F21", 0x1044),
    ("Key_F22", 0x1045),
    ("Key_F23", 0x1046),
    ("Key_F24", 0x1047),
    ("Key_F25", 0x1048),
    ("Key_F26", 0x1049),
    ("Key_F27", 0x104a),
    ("Key_F28", 0x104b),
    ("Key_F29", 0x104c),
    ("Key_F30", 0x104d),
    ("Key_F31", 0x104e),
    ("Key_F32", 0x104f),
    ("Key_F33", 0x1050),
    ("Key_F34", 0x1051),
    ("Key_F35", 0x1052),
    ("Key_Super_L", 0x1053),
    ("Key_Super_R", 0x1054),
    ("Key_Menu", 0x1055),
    ("Key_Hyper_L", 0x1056),
    ("Key_Hyper_R", 0x1057),
    ("Key_Help", 0x1058),
    ("Key_Muhenkan", 0x1122),
    ("Key_Henkan", 0x1123),
    ("Key_Hiragana_Katakana", 0x1127),
    ("Key_Zenkaku_Hankaku", 0x112a),
    ("Key_Space", 0x20),
    ("Key_Any", 0x20),
    ("Key_Exclam", 0x21),
    ("Key_QuoteDbl", 0x22),
    ("Key_NumberSign", 0x23),
    ("Key_Dollar", 0x24),
    ("Key_Percent", 0x25),
    ("Key_Ampersand", 0x26),
    ("Key_Apostrophe", 0x27),
    ("Key_ParenLeft", 0x28),
    ("Key_ParenRight", 0x29),
    ("Key_Asterisk", 0x2a),
    ("Key_Plus", 0x2b),
    ("Key_Comma", 0x2c),
    ("Key_Minus", 0x2d),
    ("Key_Period", 0x2e),
    ("Key_Slash", 0x2f),
    ("Key_0", 0x30),
    ("Key_1", 0x31),
    ("Key_2", 0x32),
    ("Key_3", 0x33),
    ("Key_4", 0x34),
    ("Key_5", 0x35),
    ("Key_6", 0x36),
    ("Key_7", 0x37),
    ("Key_8", 0x38),
    ("Key_9", 0x39),
    ("Key_Colon", 0x3a),
    ("Key_Semicolon", 0x3b),
    ("Key_Less", 0x3c),
    ("Key_Equal", 0x3d),
    ("Key_Greater", 0x3e),
    ("Key_Question", 0x3f),
    ("Key_At", 0x40),
    ("Key_A", 0x41),
    ("Key_B", 0x42),
    ("Key_C", 0x43),
    ("Key_D", 0x44),
    ("Key_E", 0x45),
    ("Key_F", 0x46),
    ("Key_G", 0x47),
    ("Key_H", 0x48),
    ("Key_I", 0x49),
    ("Key_J", 0x4a),
    ("Key_K", 0x4b),
    ("Key_L", 0x4c),
    ("Key_M", 0x4d),
    ("Key_N", 0x4e),
    ("Key_O", 0x4f),
    ("Key_P", 0x50),
    ("Key_Q", 0x51),
    ("Key_R", 0x52),
    ("Key_S", 0x53),
    ("Key_T", 0x54),
    ("Key_U", 0x55),
    ("Key_V", 0x56),
    ("Key_W", 0x57),
    ("Key_X", 0x58),
    ("Key_Y", 0x59),
    ("Key_Z", 0x5a),
    ("Key_BracketLeft", 0x5b),
    ("Key_Backslash", 0x5c),
    ("Key_BracketRight", 0x5d),
    ("Key_AsciiCircum", 0x5e),
    ("Key_Underscore", 0x5f),
    ("Key_QuoteLeft", 0x60),
    ("Key_BraceLeft", 0x7b),
    ("Key_Bar", 0x7c),
    ("Key_BraceRight", 0x7d),
    ("Key_AsciiTilde", 0x7e),
    ("Key_nobreakspace", 0xa0),
    ("Key_exclamdown", 0xa1),
    ("Key_cent", 0xa2),
    ("Key_sterling", 0xa3),
    ("Key_currency", 0xa4),
    ("Key_yen", 0xa5),
    ("Key_brokenbar", 0xa6),
    ("Key_section", 0xa7),
    ("Key_diaeresis", 0xa8),
    ("Key_copyright", 0xa9),
    ("Key_ordfeminine", 0xaa),
    ("Key_guillemotleft", 0xab),
    ("Key_notsign", 0xac),
    ("Key_hyphen", 0xad),
    ("Key_registered", 0xae),
    ("Key_macron", 0xaf),
    ("Key_degree", 0xb0),
    ("Key_plusminus", 0xb1),
    ("Key_twosuperior", 0xb2),
    ("Key_threesuperior", 0xb3),
    ("Key_acute", 0xb4),
    ("Key_mu", 0xb5),
    ("Key_paragraph", 0xb6),
    ("Key_periodcentered", 0xb7),
    ("Key_cedilla", 0xb8),
    ("Key_onesuperior", 0xb9),
    ("Key_masculine", 0xba),
    ("Key_guillemotright", 0xbb),
    ("Key_onequarter", 0xbc),
    ("Key_onehalf", 0xbd),
    ("Key_threequarters", 0xbe),
    ("Key_questiondown", 0xbf),
    ("Key_Agrave", 0xc0),
    ("Key_Aacute", 0xc1),
    ("Key_Acircumflex", 0xc2),
    ("Key_Atilde", 0xc3),
    ("Key_Adiaeresis", 0xc4),
    ("Key_Aring", 0xc5),
    ("Key_AE", 0xc6),
    ("Key_Ccedilla", 0xc7),
    ("Key_Egrave", 0xc8),
    ("Key_Eacute", 0xc9),
    ("Key_Ecircumflex", 0xca),
    ("Key_Ediaeresis", 0xcb),
    ("Key_Igrave", 0xcc),
    ("Key_Iacute", 0xcd),
    ("Key_Icircumflex", 0xce),
    ("Key_Idiaeresis", 0xcf),
    ("Key_ETH", 0xd0),
    ("Key_Ntilde", 0xd1),
    ("Key_Ograve", 0xd2),
    ("Key_Oacute", 0xd3),
    ("Key_Ocircumflex", 0xd4),
    ("Key_Otilde", 0xd5),
    ("Key_Odiaeresis", 0xd6),
    ("Key_multiply", 0xd7),
    ("Key_Ooblique", 0xd8),
    ("Key_Ugrave", 0xd9),
    ("Key_Uacute", 0xda),
    ("Key_Ucircumflex", 0xdb),
    ("Key_Udiaeresis", 0xdc),
    ("Key_Yacute", 0xdd),
    ("Key_THORN", 0xde),
    ("Key_ssharp", 0xdf),
    ("Key_agrave", 0xe0),
    ("Key_aacute", 0xe1),
    ("Key_acircumflex", 0xe2),
    ("Key_atilde", 0xe3),
    ("Key_adiaeresis", 0xe4),
    ("Key_aring", 0xe5),
    ("Key_ae", 0xe6),
    ("Key_ccedilla", 0xe7),
    ("Key_egrave", 0xe8),
    ("Key_eacute", 0xe9),
    ("Key_ecircumflex", 0xea),
    ("Key_ediaeresis", 0xeb),
    ("Key_igrave", 0xec),
    ("Key_iacute", 0xed),
    ("Key_icircumflex", 0xee),
    ("Key_idiaeresis", 0xef),
    ("Key_eth", 0xf0),
    ("Key_ntilde", 0xf1),
    ("Key_ograve", 0xf2),
    ("Key_oacute", 0xf3),
    ("Key_ocircumflex", 0xf4),
    ("Key_otilde", 0xf5),
    ("Key_odiaeresis", 0xf6),
    ("Key_division", 0xf7),
    ("Key_oslash", 0xf8),
    ("Key_ugrave", 0xf9),
    ("Key_uacute", 0xfa),
    ("Key_ucircumflex", 0xfb),
    ("Key_udiaeresis", 0xfc),
    ("Key_yacute", 0xfd),
    ("Key_thorn", 0xfe),
    ("Key_ydiaeresis", 0xff),
    ("Key_unknown", 0xffff),
    ("Key_none", 0xffff),
];

fn by_name() -> &'static HashMap<&'static str, i32> {
    static MAP: OnceLock<HashMap<&'static str, i32>> = OnceLock::new();
    MAP.get_or_init(|| EVENT_CONSTANTS.iter().copied().collect())
}

/// Look up a symbolic constant by name.
pub fn lookup_constant(name: &str) -> Option<i32> {
    by_name().get(name.trim()).copied()
}

/// Resolve a symbolic constant, falling back to [`UNKNOWN_CONSTANT`].
///
/// Numeric literals (decimal or `0x` hexadecimal) are accepted as well, so a
/// behavior file may spell a value directly instead of by name.
pub fn resolve_constant(name: &str) -> i32 {
    if let Some(value) = lookup_constant(name) {
        return value;
    }
    parse_int(name).unwrap_or(UNKNOWN_CONSTANT)
}

/// Find the canonical name of a value within a prefix group (`"Type_"`, `"BS_"`,
/// `"Mod_"` or `"Key_"`).
pub fn constant_name(prefix: &str, value: i32) -> Option<&'static str> {
    EVENT_CONSTANTS
        .iter()
        .find(|(name, v)| *v == value && name.starts_with(prefix))
        .map(|(name, _)| *name)
}

/// Parse an integer written either in decimal or as `0x`-prefixed hexadecimal.
pub fn parse_int(text: &str) -> Option<i32> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let value = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse::<i64>().ok()?
    };
    let value = if negative { -value } else { value };
    i32::try_from(value).ok()
}
