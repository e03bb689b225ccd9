//! Grid-style text table with optional 24-bit ANSI coloring.

use itertools::Itertools;

use crate::report::builder::{Align, Report};
use crate::report::color::CellColor;

const RESET: &str = "\x1b[0m";
const HIGHLIGHT_BG: &str = "\x1b[100m";

/// Wraps `text` in a foreground color escape, plus a grey background for
/// extreme values.
pub fn paint(text: &str, color: &CellColor) -> String {
    let [r, g, b] = color.rgb();
    let background = if color.highlighted() { HIGHLIGHT_BG } else { "" };
    format!("{background}\x1b[38;2;{r};{g};{b}m{text}{RESET}")
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let fill = width.saturating_sub(text.chars().count());
    match align {
        Align::Right => format!("{}{}", " ".repeat(fill), text),
        Align::Center => {
            let left = fill / 2;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(fill - left))
        }
    }
}

fn separator(widths: &[usize], fill: char) -> String {
    let inner = widths
        .iter()
        .map(|w| fill.to_string().repeat(w + 2))
        .join("+");
    format!("+{inner}+")
}

fn render_line<'a>(
    cells: impl Iterator<Item = (&'a str, Option<&'a CellColor>)>,
    widths: &[usize],
    aligns: &[Align],
    use_color: bool,
) -> String {
    let inner = cells
        .zip(widths.iter().zip(aligns))
        .map(|((text, color), (&width, &align))| {
            let padded = pad(text, width, align);
            match color {
                // color only the text, not the padding
                Some(color) if use_color && !text.is_empty() => {
                    let start = padded.len() - padded.trim_start().len();
                    let end = start + text.len();
                    format!(
                        "{}{}{}",
                        &padded[..start],
                        paint(text, color),
                        &padded[end..]
                    )
                }
                _ => padded,
            }
        })
        .map(|s| format!(" {s} "))
        .join("|");
    format!("|{inner}|")
}

/// Renders the report as a grid: header, a `=` rule, then one row per symbol
/// separated by `-` rules.
pub fn render(report: &Report, use_color: bool) -> String {
    let columns = report.headers.len();
    let widths: Vec<usize> = (0..columns)
        .map(|j| {
            let header = report.headers[j].chars().count();
            report
                .rows
                .iter()
                .filter_map(|row| row.get(j))
                .map(|cell| cell.text.chars().count())
                .fold(header, usize::max)
        })
        .collect();

    let mut lines = vec![separator(&widths, '-')];
    lines.push(render_line(
        report.headers.iter().map(|h| (h.as_str(), None)),
        &widths,
        &report.aligns,
        false,
    ));
    lines.push(separator(&widths, '='));
    for row in &report.rows {
        lines.push(render_line(
            row.iter().map(|c| (c.text.as_str(), c.color.as_ref())),
            &widths,
            &report.aligns,
            use_color,
        ));
        lines.push(separator(&widths, '-'));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::builder::Cell;
    use crate::report::color::{ColorScale, Tint};

    fn sample() -> Report {
        Report {
            columns: Vec::new(),
            readings: Vec::new(),
            headers: vec!["Symbol".into(), "D1".into(), "SELL".into()],
            rows: vec![vec![
                Cell::plain("EURUSD"),
                Cell::colored(80.0, &ColorScale::default()),
                Cell::blank(),
            ]],
            aligns: vec![Align::Center, Align::Right, Align::Right],
        }
    }

    #[test]
    fn plain_grid_layout() {
        let expected = [
            "+--------+-------+------+",
            "| Symbol |    D1 | SELL |",
            "+========+=======+======+",
            "| EURUSD | 80.00 |      |",
            "+--------+-------+------+",
        ]
        .join("\n");
        assert_eq!(render(&sample(), false), expected);
    }

    #[test]
    fn colored_cells_keep_alignment() {
        let colored = render(&sample(), true);
        let line = colored.lines().nth(3).unwrap();
        assert!(line.starts_with("| EURUSD | \x1b[100m\x1b[38;2;"));
        assert!(line.ends_with(&format!("80.00{RESET} |      |")));
    }

    #[test]
    fn paint_uses_truecolor_escape() {
        let color = CellColor {
            tint: Tint::Lower,
            white: 128,
        };
        assert_eq!(paint("x", &color), "\x1b[38;2;255;128;128mx\x1b[0m");
    }

    #[test]
    fn center_padding_puts_extra_space_on_the_right() {
        assert_eq!(pad("ab", 5, Align::Center), " ab  ");
        assert_eq!(pad("ab", 5, Align::Right), "   ab");
    }
}
