//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use continuum_core::{Card, Category, CategoryId, ColumnId, ColumnView, Priority};
use unicode_width::UnicodeWidthStr;

/// First eight characters of an id, enough to address a card.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Print cards as a table.
pub fn print_cards_table(cards: &[Card]) {
    if cards.is_empty() {
        println!("{}", "No cards found.".dimmed());
        return;
    }

    println!(
        "{:<10} {:<30} {:<16} {:<12} {:<8}",
        "ID", "Title", "Category", "Column", "Priority"
    );
    println!("{}", "─".repeat(80));

    for card in cards {
        let column = pad_right(card.column_id.as_str(), 12);
        let column_colored = match card.column_id {
            ColumnId::Todo => column.blue(),
            ColumnId::InProgress => column.yellow(),
            ColumnId::Done => column.green(),
        };

        println!(
            "{:<10} {} {:<16} {} {}",
            short_id(&card.id),
            pad_right(&truncate_visual(&card.title, 30), 30),
            card.category_id.as_str(),
            column_colored,
            card.priority.map(|p| p.as_str()).unwrap_or("-")
        );
    }

    println!();
    println!("{} card(s) total", cards.len());
}

/// Print the category list, marking the active one.
pub fn print_categories(categories: &[Category], active: CategoryId) {
    if categories.is_empty() {
        println!("{}", "No categories found.".dimmed());
        return;
    }

    println!("{}", "Categories".bold());
    println!();

    for category in categories {
        let marker = if category.id == active {
            "●".cyan()
        } else {
            "○".dimmed()
        };
        println!(
            "  {} {} {}",
            marker,
            category.name.bold(),
            format!("({})", category.id).dimmed()
        );
        if !category.description.is_empty() {
            println!("    {}", category.description.dimmed());
        }
    }
}

/// Get terminal width, defaulting to 80.
fn term_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}

/// Column header text (plain, for width calculation).
fn column_header_plain(column: &ColumnView, max_width: usize) -> String {
    let full = if column.cards.is_empty() {
        column.name.to_uppercase()
    } else {
        format!("{} {}", column.name.to_uppercase(), column.cards.len())
    };
    truncate_visual(&full, max_width)
}

fn column_header_colored(column: &ColumnView, max_width: usize) -> ColoredString {
    let label = column_header_plain(column, max_width);
    match column.id {
        ColumnId::Todo => label.blue().bold(),
        ColumnId::InProgress => label.yellow().bold(),
        ColumnId::Done => label.green().bold(),
    }
}

fn priority_indicator(priority: Option<Priority>) -> ColoredString {
    match priority {
        Some(Priority::High) => "! ".yellow(),
        Some(Priority::Medium) => "· ".dimmed(),
        _ => "  ".normal(),
    }
}

/// A card cell for the wide layout, padded to `width`.
fn format_card_cell(card: &Card, column: ColumnId, width: usize) -> String {
    // 2 chars for the indicator + 1 space + title
    let title_width = if width > 4 { width - 3 } else { 1 };
    let title = pad_right(&truncate_visual(&card.title, title_width), title_width);
    match column {
        ColumnId::Todo => format!("{} {}", priority_indicator(card.priority), title),
        ColumnId::InProgress => {
            format!("{} {}", priority_indicator(card.priority), title.yellow())
        }
        ColumnId::Done => format!("{} {}", "✓ ".green(), title.green().dimmed()),
    }
}

/// Print the board of one category.
pub fn print_board(title: &str, columns: &[ColumnView]) {
    let total: usize = columns.iter().map(|c| c.cards.len()).sum();

    println!("{}", format!(" {} ", title).on_blue().white().bold());

    if total == 0 {
        println!(
            "{}",
            "No cards yet. Create one with 'continuum new <title>'.".dimmed()
        );
        return;
    }

    let width = term_width();
    if width < 60 {
        print_board_compact(columns);
    } else {
        print_board_wide(columns, width);
    }

    let done = columns
        .iter()
        .find(|c| c.id == ColumnId::Done)
        .map(|c| c.cards.len())
        .unwrap_or(0);
    println!(
        " {} {} cards {} {} done ({}%)",
        "■".cyan(),
        total.to_string().bold(),
        "·".dimmed(),
        done.to_string().green(),
        (done * 100) / total
    );
}

/// Columns side by side.
fn print_board_wide(columns: &[ColumnView], term_w: usize) {
    let num_cols = columns.len();
    let available = term_w.saturating_sub(num_cols + 1);
    let col_width = (available / num_cols).clamp(12, 35);

    let border = |left: &str, mid: &str, right: &str| {
        let inner = vec!["─".repeat(col_width); num_cols].join(mid);
        println!("{}", format!("{}{}{}", left, inner, right).dimmed());
    };

    border("┌", "┬", "┐");

    print!("{}", "│".dimmed());
    for (i, column) in columns.iter().enumerate() {
        let header_width = UnicodeWidthStr::width(column_header_plain(column, col_width).as_str());
        let padding = col_width.saturating_sub(header_width);
        let left_pad = padding / 2;
        print!(
            "{}{}{}",
            " ".repeat(left_pad),
            column_header_colored(column, col_width),
            " ".repeat(padding - left_pad)
        );
        if i < num_cols - 1 {
            print!("{}", "│".dimmed());
        }
    }
    println!("{}", "│".dimmed());

    border("├", "┼", "┤");

    let rows = columns.iter().map(|c| c.cards.len()).max().unwrap_or(0);
    for row in 0..rows {
        print!("{}", "│".dimmed());
        for (i, column) in columns.iter().enumerate() {
            match column.cards.get(row) {
                Some(card) => print!("{}", format_card_cell(card, column.id, col_width)),
                None => print!("{}", " ".repeat(col_width)),
            }
            if i < num_cols - 1 {
                print!("{}", "│".dimmed());
            }
        }
        println!("{}", "│".dimmed());
    }

    border("└", "┴", "┘");
}

/// Vertical layout for narrow terminals.
fn print_board_compact(columns: &[ColumnView]) {
    println!();
    for column in columns {
        if column.cards.is_empty() {
            continue;
        }

        println!(" {} {}", "▸".dimmed(), column_header_colored(column, 30));
        for card in &column.cards {
            let title: ColoredString = match column.id {
                ColumnId::InProgress => card.title.as_str().yellow(),
                ColumnId::Done => card.title.as_str().green().dimmed(),
                ColumnId::Todo => card.title.as_str().normal(),
            };
            println!(
                "   {} {} {}",
                priority_indicator(card.priority),
                title,
                short_id(&card.id).dimmed()
            );
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0f8fad5b-d9cb-469f-a165-70867728950e"), "0f8fad5b");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_truncate_visual() {
        assert_eq!(truncate_visual("Pay rent", 20), "Pay rent");
        assert_eq!(truncate_visual("Write the quarterly report", 10), "Write th..");
        assert_eq!(truncate_visual("日本語のタイトル", 7), "日本..");
        assert_eq!(truncate_visual("abcdef", 3), "...");
    }

    #[test]
    fn test_pad_right_uses_visual_width() {
        assert_eq!(pad_right("ab", 4), "ab  ");
        assert_eq!(pad_right("日本", 6), "日本  ");
        assert_eq!(pad_right("toolong", 3), "toolong");
    }
}
