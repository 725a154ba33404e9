//! Key code to label tables
//!
//! Maps Linux evdev key codes to the labels counted in frequency tables.
//! A handful of kernel codes carry more than one name (`KEY_MUTE` is also
//! `KEY_MIN_INTERESTING`); those map to an ambiguous candidate set that the
//! resolver collapses later.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

/// Label attached to a key code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    /// One unambiguous label
    Single(String),
    /// Several candidate names for the same code
    Ambiguous(BTreeSet<String>),
}

impl Label {
    pub fn single(label: impl Into<String>) -> Self {
        Self::Single(label.into())
    }

    pub fn ambiguous<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Ambiguous(candidates.into_iter().map(Into::into).collect())
    }
}

/// Read-only mapping from key code to label
#[derive(Debug, Clone, Default)]
pub struct CodeLabelTable {
    labels: HashMap<u16, Label>,
}

impl CodeLabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert used when assembling a table
    pub fn with(mut self, code: u16, label: Label) -> Self {
        self.labels.insert(code, label);
        self
    }

    pub fn insert(&mut self, code: u16, label: Label) {
        self.labels.insert(code, label);
    }

    /// Label for a code, if the table has one
    pub fn get(&self, code: u16) -> Option<&Label> {
        self.labels.get(&code)
    }

    /// Label for a code, falling back to the kernel key name
    pub fn label_for(&self, code: u16) -> Label {
        self.get(code)
            .cloned()
            .unwrap_or_else(|| Label::Single(kernel_key_name(code)))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Kernel name for a key code (`KEY_F13`, `BTN_LEFT`, ...)
#[cfg(target_os = "linux")]
pub fn kernel_key_name(code: u16) -> String {
    let name = format!("{:?}", evdev::Key::new(code));
    if name.starts_with("KEY_") || name.starts_with("BTN_") {
        name
    } else {
        format!("KEY_{}", code)
    }
}

/// Kernel name for a key code (`KEY_<code>` without evdev)
#[cfg(not(target_os = "linux"))]
pub fn kernel_key_name(code: u16) -> String {
    format!("KEY_{}", code)
}

/// Default label table for a US keyboard
pub static DEFAULT_LABELS: LazyLock<CodeLabelTable> = LazyLock::new(|| {
    let mut map = CodeLabelTable::new();
    let mut single = |code: u16, label: &str| map.insert(code, Label::single(label));

    // Function row
    single(1, "esc");
    for (i, code) in (59..=68).enumerate() {
        single(code, &format!("f{}", i + 1));
    }
    single(87, "f11");
    single(88, "f12");

    // Number row
    single(41, "`");
    for (i, code) in (2..=10).enumerate() {
        single(code, &format!("{}", i + 1));
    }
    single(11, "0");
    single(12, "-");
    single(13, "=");
    single(14, "backspace");

    // Letter rows
    for (code, label) in [
        (16, "q"), (17, "w"), (18, "e"), (19, "r"), (20, "t"),
        (21, "y"), (22, "u"), (23, "i"), (24, "o"), (25, "p"),
        (30, "a"), (31, "s"), (32, "d"), (33, "f"), (34, "g"),
        (35, "h"), (36, "j"), (37, "k"), (38, "l"),
        (44, "z"), (45, "x"), (46, "c"), (47, "v"), (48, "b"),
        (49, "n"), (50, "m"),
    ] {
        single(code, label);
    }
    single(15, "tab");
    single(26, "[");
    single(27, "]");
    single(43, "\\");
    single(58, "capslock");
    single(39, ";");
    single(40, "'");
    single(28, "enter");
    single(51, ",");
    single(52, ".");
    single(53, "/");
    single(86, "102nd");

    // Modifiers and space
    single(42, "leftshift");
    single(54, "rightshift");
    single(29, "leftctrl");
    single(97, "rightctrl");
    single(56, "leftalt");
    single(100, "rightalt");
    single(125, "leftmeta");
    single(126, "rightmeta");
    single(127, "compose");
    single(57, "space");

    // Navigation
    single(103, "up");
    single(105, "left");
    single(108, "down");
    single(106, "right");
    single(110, "insert");
    single(102, "home");
    single(104, "pageup");
    single(111, "delete");
    single(107, "end");
    single(109, "pagedown");
    single(99, "sysrq");
    single(70, "scrolllock");
    single(119, "pause");

    // Keypad
    single(69, "numlock");
    single(98, "kpslash");
    single(55, "kpasterisk");
    single(74, "kpminus");
    single(78, "kpplus");
    single(96, "kpenter");
    single(83, "kpdot");
    for (code, digit) in [
        (82, 0), (79, 1), (80, 2), (81, 3), (75, 4),
        (76, 5), (77, 6), (71, 7), (72, 8), (73, 9),
    ] {
        single(code, &format!("kp{}", digit));
    }

    // Media
    single(114, "volumedown");
    single(115, "volumeup");
    single(163, "nextsong");
    single(164, "playpause");
    single(165, "previoussong");
    single(224, "brightnessdown");
    single(225, "brightnessup");

    // Codes the kernel exports under several names
    map.insert(113, Label::ambiguous(["KEY_MIN_INTERESTING", "KEY_MUTE"]));
    map.insert(122, Label::ambiguous(["KEY_HANGEUL", "KEY_HANGUEL"]));
    map.insert(152, Label::ambiguous(["KEY_COFFEE", "KEY_SCREENLOCK"]));
    map.insert(153, Label::ambiguous(["KEY_DIRECTION", "KEY_ROTATE_DISPLAY"]));
    map.insert(244, Label::ambiguous(["KEY_BRIGHTNESS_AUTO", "KEY_BRIGHTNESS_ZERO"]));
    map.insert(246, Label::ambiguous(["KEY_WIMAX", "KEY_WWAN"]));

    map
});

/// Shift substitutions for a US layout
pub fn shift_substitutions() -> HashMap<String, String> {
    let mut table: HashMap<String, String> = ('a'..='z')
        .map(|c| (c.to_string(), c.to_ascii_uppercase().to_string()))
        .collect();

    for (base, shifted) in [
        ("`", "~"), ("1", "!"), ("2", "@"), ("3", "#"), ("4", "$"),
        ("5", "%"), ("6", "^"), ("7", "&"), ("8", "*"), ("9", "("),
        ("0", ")"), ("-", "_"), ("=", "+"), ("[", "{"), ("]", "}"),
        ("\\", "|"), (";", ":"), ("'", "\""), (",", "<"), (".", ">"),
        ("/", "?"),
    ] {
        table.insert(base.to_string(), shifted.to_string());
    }
    table
}

/// AltGr substitutions (third level symbols)
pub fn altgr_substitutions() -> HashMap<String, String> {
    [
        ("q", "@"), ("e", "€"), ("m", "µ"), ("2", "²"), ("3", "³"),
        ("7", "{"), ("8", "["), ("9", "]"), ("0", "}"), ("-", "\\"),
        ("=", "~"), ("]", "~"), ("102nd", "|"),
    ]
    .into_iter()
    .map(|(base, sub)| (base.to_string(), sub.to_string()))
    .collect()
}
