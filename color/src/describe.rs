use {crate::color::Color, std::fmt};

/// Hue in degrees `0..360`, saturation and value in percents `0..=100`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hsv {
    pub h: u16,
    pub s: u8,
    pub v: u8,
}

impl From<Color> for Hsv {
    fn from(Color(rgb): Color) -> Self {
        let [r, g, b] = rgb.map(|c| f64::from(c) / 255.);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let diff = max - min;

        let h = if diff == 0. {
            0.
        } else if max == r {
            60. * ((g - b) / diff).rem_euclid(6.)
        } else if max == g {
            60. * ((b - r) / diff + 2.)
        } else {
            60. * ((r - g) / diff + 4.)
        };

        let s = if max == 0. { 0. } else { diff / max };

        Self {
            h: (h as u16) % 360,
            s: (s * 100.) as u8,
            v: (max * 100.) as u8,
        }
    }
}

impl fmt::Display for Hsv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let Self { h, s, v } = self;
        write!(f, "hsv({h}°, {s}%, {v}%)")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hue {
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
    Pink,
}

impl Hue {
    #[must_use]
    pub fn from_degrees(h: u16) -> Self {
        match h {
            15..=44 => Self::Orange,
            45..=74 => Self::Yellow,
            75..=164 => Self::Green,
            165..=194 => Self::Cyan,
            195..=254 => Self::Blue,
            255..=284 => Self::Purple,
            285..=344 => Self::Pink,
            _ => Self::Red,
        }
    }
}

impl fmt::Display for Hue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Cyan => "cyan",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Pink => "pink",
        };

        write!(f, "{name} hue")
    }
}

/// A bucket of saturation or value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Low,
    Mid,
    High,
}

impl Level {
    #[must_use]
    pub fn from_percent(p: u8) -> Self {
        match p {
            0..=29 => Self::Low,
            30..=70 => Self::Mid,
            _ => Self::High,
        }
    }
}

/// Overrides the hue for colors close to white or black.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    VeryBright,
    VeryDark,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::VeryBright => write!(f, "very bright"),
            Self::VeryDark => write!(f, "very dark"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Description {
    pub color: Color,
    pub hsv: Hsv,
    pub tone: Option<Tone>,
    pub hue: Hue,
    pub saturation: Level,
    pub value: Level,
}

impl Description {
    #[must_use]
    pub fn name(&self) -> &'static str {
        name_of(self.color).unwrap_or("unknown color")
    }

    /// Human readable labels, the tone override first.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        let mut labels = Vec::with_capacity(4);
        labels.extend(self.tone.map(|tone| tone.to_string()));
        labels.push(self.hue.to_string());

        match self.saturation {
            Level::Low => labels.push("low saturation".to_owned()),
            Level::Mid => {}
            Level::High => labels.push("high saturation".to_owned()),
        }

        match self.value {
            Level::Low => labels.push("dark shade".to_owned()),
            Level::Mid => {}
            Level::High => labels.push("light shade".to_owned()),
        }

        labels
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.labels().join(", "))
    }
}

/// Describes the color with hsv buckets.
#[must_use]
pub fn describe(color: Color) -> Description {
    let hsv = Hsv::from(color);
    let Color(rgb) = color;
    let tone = if rgb.iter().all(|&c| c > 220) {
        Some(Tone::VeryBright)
    } else if rgb.iter().all(|&c| c < 30) {
        Some(Tone::VeryDark)
    } else {
        None
    };

    Description {
        color,
        hsv,
        tone,
        hue: Hue::from_degrees(hsv.h),
        saturation: Level::from_percent(hsv.s),
        value: Level::from_percent(hsv.v),
    }
}

const NAMES: [(Color, &str); 21] = [
    (Color::new(0xff, 0x00, 0x00), "red"),
    (Color::new(0x00, 0xff, 0x00), "green"),
    (Color::new(0x00, 0x00, 0xff), "blue"),
    (Color::new(0xff, 0xff, 0x00), "yellow"),
    (Color::new(0xff, 0x00, 0xff), "magenta"),
    (Color::new(0x00, 0xff, 0xff), "cyan"),
    (Color::new(0xff, 0xa5, 0x00), "orange"),
    (Color::new(0x80, 0x00, 0x80), "purple"),
    (Color::new(0x00, 0x80, 0x00), "dark green"),
    (Color::new(0x00, 0x00, 0x80), "navy"),
    (Color::new(0x80, 0x00, 0x00), "maroon"),
    (Color::new(0x80, 0x80, 0x00), "olive"),
    (Color::new(0x00, 0x80, 0x80), "teal"),
    (Color::new(0xc0, 0xc0, 0xc0), "silver"),
    (Color::new(0x80, 0x80, 0x80), "gray"),
    (Color::new(0xff, 0xff, 0xff), "white"),
    (Color::new(0x00, 0x00, 0x00), "black"),
    (Color::new(0xff, 0xc0, 0xcb), "pink"),
    (Color::new(0xa5, 0x2a, 0x2a), "brown"),
    (Color::new(0xff, 0xd7, 0x00), "gold"),
    (Color::new(0xe6, 0xe6, 0xfa), "lavender"),
];

/// Looks up the canonical name of the exact color.
#[must_use]
pub fn name_of(color: Color) -> Option<&'static str> {
    NAMES
        .iter()
        .find(|&&(col, _)| col == color)
        .map(|&(_, name)| name)
}
