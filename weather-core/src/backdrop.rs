//! Background image lookup keyed by condition label.

/// Reference to a static background image.
///
/// `color` and `icon` approximate the image on surfaces that cannot draw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backdrop {
    pub asset: &'static str,
    pub color: (u8, u8, u8),
    pub icon: &'static str,
}

pub const DEFAULT_BACKDROP: Backdrop = Backdrop {
    asset: "clear.png",
    color: (214, 170, 32),
    icon: "☀",
};

const BACKDROPS: &[(&str, Backdrop)] = &[
    ("clear", DEFAULT_BACKDROP),
    (
        "hail",
        Backdrop { asset: "hail.png", color: (96, 125, 139), icon: "🌨" },
    ),
    (
        "heavy cloud",
        Backdrop { asset: "heavy-cloud.png", color: (69, 78, 92), icon: "☁" },
    ),
    (
        "light cloud",
        Backdrop { asset: "light-cloud.png", color: (110, 150, 190), icon: "⛅" },
    ),
    (
        "heavy rain",
        Backdrop { asset: "heavy-rain.png", color: (40, 58, 82), icon: "🌧" },
    ),
    (
        "light rain",
        Backdrop { asset: "light-rain.png", color: (72, 104, 138), icon: "🌦" },
    ),
    (
        "showers",
        Backdrop { asset: "showers.png", color: (58, 90, 120), icon: "🌦" },
    ),
    (
        "sleet",
        Backdrop { asset: "sleet.png", color: (120, 134, 150), icon: "🌨" },
    ),
    (
        "snow",
        Backdrop { asset: "snow.png", color: (160, 180, 200), icon: "❄" },
    ),
    (
        "thunderstorm",
        Backdrop { asset: "thunder.png", color: (52, 40, 78), icon: "⛈" },
    ),
    (
        "thunder",
        Backdrop { asset: "thunder.png", color: (52, 40, 78), icon: "⛈" },
    ),
];

/// Every label maps to some backdrop; unknown or absent labels get the default.
pub fn image_for(condition: Option<&str>) -> Backdrop {
    let Some(label) = condition.map(str::trim).filter(|l| !l.is_empty()) else {
        return DEFAULT_BACKDROP;
    };

    BACKDROPS
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(label))
        .map(|(_, backdrop)| *backdrop)
        .unwrap_or(DEFAULT_BACKDROP)
}

/// Condition labels with a dedicated backdrop.
pub fn known_conditions() -> impl Iterator<Item = &'static str> {
    BACKDROPS.iter().map(|(key, _)| *key)
}
