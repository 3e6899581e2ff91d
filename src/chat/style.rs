// Style token interpretation
//
// Message fragments carry free-form style tokens such as "fg-red,fg-bold" or
// "fg-white,bg-blue". This module turns them into ratatui styles. Unknown
// attributes are ignored so a typo in the config never breaks rendering.

use ratatui::style::{Color, Modifier, Style};

/// Palette used by the `colorize` name token
pub const NAME_COLORS: [Color; 8] = [
    Color::Black,
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::White,
];

/// Parse a comma separated style token into a `Style`
pub fn parse_style_token(token: &str) -> Style {
    token
        .split(',')
        .map(str::trim)
        .filter(|attr| !attr.is_empty())
        .fold(Style::default(), apply_attr)
}

/// Style for an author name; `colorize` picks a stable color from the name
pub fn name_style(token: &str, author: &str) -> Style {
    if !token.contains("colorize") {
        return parse_style_token(token);
    }

    let sum: usize = author.chars().map(|c| c as usize).sum();
    let color = NAME_COLORS[sum % NAME_COLORS.len()];
    parse_style_token(&token.replace("colorize", "")).fg(color)
}

fn apply_attr(style: Style, attr: &str) -> Style {
    let (target, value) = match attr.split_once('-') {
        Some((prefix @ ("fg" | "bg"), value)) => (prefix, value),
        _ => ("fg", attr),
    };

    if let Some(modifier) = parse_modifier(value) {
        return style.add_modifier(modifier);
    }

    match (target, parse_color(value)) {
        ("bg", Some(color)) => style.bg(color),
        (_, Some(color)) => style.fg(color),
        _ => style,
    }
}

fn parse_modifier(value: &str) -> Option<Modifier> {
    match value {
        "bold" => Some(Modifier::BOLD),
        "underline" => Some(Modifier::UNDERLINED),
        "italic" => Some(Modifier::ITALIC),
        "dim" => Some(Modifier::DIM),
        "reverse" => Some(Modifier::REVERSED),
        _ => None,
    }
}

fn parse_color(value: &str) -> Option<Color> {
    let color = match value {
        "default" => Color::Reset,
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" => Color::Gray,
        _ => return value.parse::<u8>().ok().map(Color::Indexed),
    };
    Some(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_colors_and_modifiers() {
        let style = parse_style_token("fg-red,bg-black,fg-bold");
        assert_eq!(style.fg, Some(Color::Red));
        assert_eq!(style.bg, Some(Color::Black));
        assert!(style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_empty_and_unknown_tokens() {
        assert_eq!(parse_style_token(""), Style::default());
        assert_eq!(parse_style_token("fg-chartreuse"), Style::default());
        assert_eq!(parse_style_token("fg-208").fg, Some(Color::Indexed(208)));
    }

    #[test]
    fn test_colorize_is_stable_per_author() {
        let a = name_style("colorize,fg-bold", "alice");
        let b = name_style("colorize,fg-bold", "alice");
        assert_eq!(a, b);
        assert!(a.add_modifier.contains(Modifier::BOLD));

        let sum: usize = "alice".chars().map(|c| c as usize).sum();
        assert_eq!(a.fg, Some(NAME_COLORS[sum % 8]));
    }
}
