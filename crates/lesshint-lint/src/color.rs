// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Color extraction from parsed values.

use lesshint_ast::{Color, Value};

/// Every color literal or color function in `value`, in source order.
///
/// Hex literals, `rgb()`/`rgba()` and `hsl()`/`hsla()` with numeric
/// arguments count. Named colors do not. A color function whose arguments
/// are not all plain numbers yields nothing.
pub fn extract_colors(value: &Value) -> Vec<Color> {
    let mut colors = Vec::new();
    collect(value, &mut colors);
    colors
}

fn collect(value: &Value, out: &mut Vec<Color>) {
    match value {
        Value::Color { color, .. } => out.push(*color),
        Value::Call { name, args } if is_color_function(name) => {
            match color_function(&name.to_ascii_lowercase(), args) {
                Some(color) => out.push(color),
                None => tracing::trace!(function = %name, "color arguments not numeric"),
            }
        }
        other => {
            for child in other.children() {
                collect(child, out);
            }
        }
    }
}

fn is_color_function(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "rgb" | "rgba" | "hsl" | "hsla"
    )
}

fn color_function(name: &str, args: &[Value]) -> Option<Color> {
    match (name, args) {
        ("rgb" | "rgba", [Value::Color { color, .. }, alpha]) => {
            let [r, g, b] = color.rgb;
            Some(Color::new(r, g, b, alpha_of(alpha)?))
        }
        ("rgb" | "rgba", [r, g, b]) => Some(Color::from_channels(
            channel(r)?,
            channel(g)?,
            channel(b)?,
            1.0,
        )),
        ("rgb" | "rgba", [r, g, b, a]) => Some(Color::from_channels(
            channel(r)?,
            channel(g)?,
            channel(b)?,
            alpha_of(a)?,
        )),
        ("hsl" | "hsla", [h, s, l]) => Some(Color::from_hsl(hue(h)?, fraction(s)?, fraction(l)?, 1.0)),
        ("hsl" | "hsla", [h, s, l, a]) => Some(Color::from_hsl(
            hue(h)?,
            fraction(s)?,
            fraction(l)?,
            alpha_of(a)?,
        )),
        _ => None,
    }
}

fn number(value: &Value) -> Option<(f64, &str)> {
    let (n, unit) = value.as_number()?;
    n.is_finite().then_some((n, unit))
}

/// 0–255, or a percentage of it.
fn channel(value: &Value) -> Option<f64> {
    match number(value)? {
        (n, "%") => Some(n * 255.0 / 100.0),
        (n, "") => Some(n),
        _ => None,
    }
}

/// 0–1, or a percentage.
fn alpha_of(value: &Value) -> Option<f64> {
    match number(value)? {
        (n, "%") => Some(n / 100.0),
        (n, "") => Some(n),
        _ => None,
    }
}

fn hue(value: &Value) -> Option<f64> {
    match number(value)? {
        (n, "" | "deg") => Some(n),
        _ => None,
    }
}

/// Saturation and lightness: `50%`, or a plain number where values above 1
/// are read as percentages.
fn fraction(value: &Value) -> Option<f64> {
    match number(value)? {
        (n, "%") => Some(n / 100.0),
        (n, "") if n > 1.0 => Some(n / 100.0),
        (n, "") => Some(n),
        _ => None,
    }
}

/// Euclidean distance over `(r, g, b, alpha * 255)`.
pub fn distance(a: &Color, b: &Color) -> f64 {
    let channels = a
        .rgb
        .iter()
        .zip(b.rgb.iter())
        .map(|(x, y)| f64::from(*x) - f64::from(*y));
    let alpha = (a.alpha - b.alpha) * 255.0;
    channels
        .chain(std::iter::once(alpha))
        .map(|d| d * d)
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesshint_ast::{FileId, Node};
    use lesshint_parser::parse_source;

    fn colors(text: &str) -> Vec<String> {
        let sheet = parse_source(&format!("a {{ x: {}; }}", text), FileId::PRIMARY).unwrap();
        let value = match &sheet.rules[0].children()[0] {
            Node::Declaration(decl) => &decl.value,
            other => panic!("expected declaration, got {:?}", other),
        };
        extract_colors(value).iter().map(Color::to_string).collect()
    }

    #[test]
    fn hex_literals() {
        assert_eq!(colors("#fff"), vec!["#ffffff"]);
        assert_eq!(colors("1px solid #FF0064"), vec!["#ff0064"]);
    }

    #[test]
    fn rgb_functions() {
        assert_eq!(colors("rgb(255, 0, 100)"), vec!["#ff0064"]);
        assert_eq!(colors("rgba(0, 0, 0, 0.5)"), vec!["rgba(0, 0, 0, 0.5)"]);
        assert_eq!(colors("rgb(100%, 0%, 0%)"), vec!["#ff0000"]);
        assert_eq!(colors("rgba(#000, 50%)"), vec!["rgba(0, 0, 0, 0.5)"]);
    }

    #[test]
    fn hsl_functions() {
        assert_eq!(colors("hsl(120, 100%, 50%)"), vec!["#00ff00"]);
        assert_eq!(colors("hsla(0, 0%, 0%, 0.5)"), vec!["rgba(0, 0, 0, 0.5)"]);
    }

    #[test]
    fn searches_nested_values() {
        assert_eq!(
            colors("0 1px 2px rgba(0, 0, 0, 0.5), inset 0 0 #abc"),
            vec!["rgba(0, 0, 0, 0.5)", "#aabbcc"]
        );
        assert_eq!(colors("fade(#ffffff, 50%)"), vec!["#ffffff"]);
    }

    #[test]
    fn non_numeric_arguments_are_abandoned() {
        assert!(colors("rgba(@brand, 0.5)").is_empty());
        assert!(colors("rgb(@r + 1, 0, 0)").is_empty());
        assert!(colors("black").is_empty());
    }

    #[test]
    fn distance_includes_alpha() {
        let black = Color::new(0, 0, 0, 1.0);
        assert_eq!(distance(&black, &black), 0.0);
        assert_eq!(distance(&black, &Color::new(3, 4, 0, 1.0)), 5.0);
        assert!((distance(&black, &Color::new(0, 0, 0, 0.0)) - 255.0).abs() < 1e-9);
    }
}
