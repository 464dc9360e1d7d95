use {
    serde::{Deserialize, Serialize},
    std::{
        fmt::{self, Write},
        str::FromStr,
    },
    thiserror::Error,
};

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub(crate) [u8; 3]);

impl Color {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    #[must_use]
    pub const fn rgb(self) -> [u8; 3] {
        self.0
    }

    /// Perceived brightness in `0..=255`.
    #[must_use]
    pub fn brightness(self) -> u32 {
        let [r, g, b] = self.0.map(u32::from);
        (r * 299 + g * 587 + b * 114) / 1000
    }

    /// Checks if dark text reads better than light text on this color.
    #[must_use]
    pub fn is_light(self) -> bool {
        self.brightness() > 128
    }

    pub(crate) fn distance_squared(self, other: Self) -> u32 {
        self.0
            .iter()
            .zip(other.0)
            .map(|(&a, b)| u32::from(a.abs_diff(b)).pow(2))
            .sum()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn to_hex(v: u8) -> char {
            match v {
                0..=9 => (b'0' + v) as char,
                10..=15 => (b'a' + v - 10) as char,
                _ => unreachable!(),
            }
        }

        f.write_char('#')?;
        for byte in self.0 {
            f.write_char(to_hex(byte >> 4))?;
            f.write_char(to_hex(byte & 0b1111))?;
        }

        Ok(())
    }
}

impl FromStr for Color {
    type Err = InvalidColorFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn from_hex(v: u8) -> Option<u8> {
            match v {
                b'0'..=b'9' => Some(v - b'0'),
                b'a'..=b'f' => Some(v - b'a' + 10),
                b'A'..=b'F' => Some(v - b'A' + 10),
                _ => None,
            }
        }

        let token = s.trim();
        let digits = token.strip_prefix('#').unwrap_or(token);
        let invalid = || InvalidColorFormat {
            token: token.to_owned(),
        };

        let digits: Vec<u8> = digits
            .bytes()
            .map(from_hex)
            .collect::<Option<_>>()
            .ok_or_else(invalid)?;

        let mut col = [0; 3];
        match digits[..] {
            [r, g, b] => {
                for (colbyte, v) in col.iter_mut().zip([r, g, b]) {
                    *colbyte = (v << 4) | v;
                }
            }
            [r0, r1, g0, g1, b0, b1] => {
                for (colbyte, (a, b)) in col.iter_mut().zip([(r0, r1), (g0, g1), (b0, b1)]) {
                    *colbyte = (a << 4) | b;
                }
            }
            _ => return Err(invalid()),
        }

        Ok(Self(col))
    }
}

impl TryFrom<&str> for Color {
    type Error = InvalidColorFormat;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<String> for Color {
    type Error = InvalidColorFormat;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(col: Color) -> Self {
        col.to_string()
    }
}

impl From<im::Rgb<u8>> for Color {
    fn from(im::Rgb(col): im::Rgb<u8>) -> Self {
        Self(col)
    }
}

impl From<Color> for im::Rgb<u8> {
    fn from(Color(col): Color) -> Self {
        Self(col)
    }
}

/// A token which is not a 3 or 6 digit hex color.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{token:?} is not a valid hex color")]
pub struct InvalidColorFormat {
    pub token: String,
}

/// Colors parsed from a comma separated list.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Parsed {
    pub colors: Vec<Color>,
    pub rejected: Vec<InvalidColorFormat>,
}

/// Parses a comma separated list of hex colors like `"#f00, 00ff00"`.
///
/// Invalid tokens are collected in [`Parsed::rejected`] and don't
/// affect the valid ones. Empty tokens are skipped.
#[must_use]
pub fn parse(input: &str) -> Parsed {
    let mut parsed = Parsed::default();
    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.parse() {
            Ok(col) => parsed.colors.push(col),
            Err(err) => parsed.rejected.push(err),
        }
    }

    parsed
}

/// The quick palette of primary, secondary and neutral colors.
pub const PRESET: [Color; 12] = [
    Color::new(0xff, 0x00, 0x00),
    Color::new(0x00, 0xff, 0x00),
    Color::new(0x00, 0x00, 0xff),
    Color::new(0xff, 0xff, 0x00),
    Color::new(0xff, 0x00, 0xff),
    Color::new(0x00, 0xff, 0xff),
    Color::new(0x00, 0x00, 0x00),
    Color::new(0xff, 0xff, 0xff),
    Color::new(0x80, 0x80, 0x80),
    Color::new(0xff, 0xa5, 0x00),
    Color::new(0x80, 0x00, 0x80),
    Color::new(0x00, 0x80, 0x00),
];
