// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Property and variable values.

use std::fmt;

/// An sRGB color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub rgb: [u8; 3],
    /// 0.0 ..= 1.0
    pub alpha: f64,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, alpha: f64) -> Self {
        Self {
            rgb: [r, g, b],
            alpha,
        }
    }

    /// Parse the digits of a hex color (without `#`): 3, 4, 6 or 8 digits.
    pub fn from_hex(digits: &str) -> Option<Color> {
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let expanded: String = match digits.len() {
            3 | 4 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => digits.to_string(),
            _ => return None,
        };
        let byte = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
        let alpha = if expanded.len() == 8 {
            f64::from(byte(6)?) / 255.0
        } else {
            1.0
        };
        Some(Color::new(byte(0)?, byte(2)?, byte(4)?, alpha))
    }

    /// Build from unclamped channel values (0–255) and alpha (0–1).
    pub fn from_channels(r: f64, g: f64, b: f64, alpha: f64) -> Color {
        let channel = |v: f64| v.round().clamp(0.0, 255.0) as u8;
        Color::new(channel(r), channel(g), channel(b), alpha.clamp(0.0, 1.0))
    }

    /// Hue in degrees, saturation and lightness in 0–1.
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Color {
        let h = hue.rem_euclid(360.0) / 360.0;
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);
        let m2 = if l <= 0.5 { l * (s + 1.0) } else { l + s - l * s };
        let m1 = l * 2.0 - m2;
        let channel = |h: f64| {
            let h = if h < 0.0 {
                h + 1.0
            } else if h > 1.0 {
                h - 1.0
            } else {
                h
            };
            let v = if h * 6.0 < 1.0 {
                m1 + (m2 - m1) * h * 6.0
            } else if h * 2.0 < 1.0 {
                m2
            } else if h * 3.0 < 2.0 {
                m1 + (m2 - m1) * (2.0 / 3.0 - h) * 6.0
            } else {
                m1
            };
            v * 255.0
        };
        Color::from_channels(
            channel(h + 1.0 / 3.0),
            channel(h),
            channel(h - 1.0 / 3.0),
            alpha,
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.rgb;
        if self.alpha >= 1.0 {
            write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", r, g, b, format_number(self.alpha))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
        }
    }
}

/// A parsed value expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A hex color literal; `raw` keeps the source spelling.
    Color { color: Color, raw: String },
    Dimension { value: f64, unit: String },
    Keyword(String),
    Quoted { value: String, quote: char, escaped: bool },
    /// `@name` or `@@name`, with the sigils.
    Variable(String),
    Call { name: String, args: Vec<Value> },
    /// Contents of `url(...)`, quotes included when present.
    Url(String),
    Operation { op: Operator, lhs: Box<Value>, rhs: Box<Value> },
    Negative(Box<Value>),
    Paren(Box<Value>),
    /// Space-separated terms.
    Expression(Vec<Value>),
    /// Comma-separated items.
    List(Vec<Value>),
    /// Text the value grammar does not model.
    Raw(String),
}

impl Value {
    /// Direct sub-values, in source order.
    pub fn children(&self) -> Vec<&Value> {
        match self {
            Value::Call { args, .. } => args.iter().collect(),
            Value::Operation { lhs, rhs, .. } => vec![lhs.as_ref(), rhs.as_ref()],
            Value::Negative(v) | Value::Paren(v) => vec![v.as_ref()],
            Value::Expression(items) | Value::List(items) => items.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// The plain number of a unitless or percentage dimension.
    pub fn as_number(&self) -> Option<(f64, &str)> {
        match self {
            Value::Dimension { value, unit } => Some((*value, unit.as_str())),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Color { raw, .. } => f.write_str(raw),
            Value::Dimension { value, unit } => write!(f, "{}{}", format_number(*value), unit),
            Value::Keyword(word) => f.write_str(word),
            Value::Quoted { value, quote, escaped } => {
                if *escaped {
                    f.write_str(value)
                } else {
                    write!(f, "{quote}{value}{quote}")
                }
            }
            Value::Variable(name) => f.write_str(name),
            Value::Call { name, args } => {
                write!(f, "{}(", name)?;
                write_joined(f, args, ", ")?;
                f.write_str(")")
            }
            Value::Url(inner) => write!(f, "url({})", inner),
            Value::Operation { op: Operator::Div, lhs, rhs } => write!(f, "{}/{}", lhs, rhs),
            Value::Operation { op, lhs, rhs } => write!(f, "{} {} {}", lhs, op.as_str(), rhs),
            Value::Negative(inner) => write!(f, "-{}", inner),
            Value::Paren(inner) => write!(f, "({})", inner),
            Value::Expression(items) => write_joined(f, items, " "),
            Value::List(items) => write_joined(f, items, ", "),
            Value::Raw(text) => f.write_str(text),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Value], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Shortest decimal rendering: `1`, `0.5`, `-2.25`.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        let s = format!("{:.8}", n);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(Color::from_hex("fff"), Some(Color::new(255, 255, 255, 1.0)));
        assert_eq!(Color::from_hex("eeeeee"), Some(Color::new(238, 238, 238, 1.0)));
        assert_eq!(Color::from_hex("00000080").map(|c| c.rgb), Some([0, 0, 0]));
        assert!((Color::from_hex("0008").unwrap().alpha - 136.0 / 255.0).abs() < 1e-9);
        assert_eq!(Color::from_hex("ggg"), None);
        assert_eq!(Color::from_hex("12345"), None);
    }

    #[test]
    fn hsl_primaries() {
        assert_eq!(Color::from_hsl(0.0, 1.0, 0.5, 1.0).rgb, [255, 0, 0]);
        assert_eq!(Color::from_hsl(120.0, 1.0, 0.5, 1.0).rgb, [0, 255, 0]);
        assert_eq!(Color::from_hsl(240.0, 1.0, 0.5, 1.0).rgb, [0, 0, 255]);
        assert_eq!(Color::from_hsl(0.0, 0.0, 0.5, 1.0).rgb, [128, 128, 128]);
    }

    #[test]
    fn color_display() {
        assert_eq!(Color::new(255, 0, 100, 1.0).to_string(), "#ff0064");
        assert_eq!(Color::new(0, 0, 0, 0.5).to_string(), "rgba(0, 0, 0, 0.5)");
    }

    #[test]
    fn value_display() {
        let v = Value::Expression(vec![
            Value::Dimension { value: 1.0, unit: "px".into() },
            Value::Keyword("solid".into()),
            Value::Call {
                name: "rgba".into(),
                args: vec![
                    Value::Dimension { value: 0.0, unit: String::new() },
                    Value::Dimension { value: 0.0, unit: String::new() },
                    Value::Dimension { value: 0.0, unit: String::new() },
                    Value::Dimension { value: 0.25, unit: String::new() },
                ],
            },
        ]);
        assert_eq!(v.to_string(), "1px solid rgba(0, 0, 0, 0.25)");
    }
}
