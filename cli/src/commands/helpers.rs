use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use lemon_core::models::{MenuItem, Profile};

pub(crate) fn print_menu_table(items: &[MenuItem]) {
    #[derive(Tabled)]
    struct MenuRow {
        #[tabled(rename = "#")]
        idx: usize,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Price")]
        price: String,
        #[tabled(rename = "Description")]
        description: String,
    }

    let rows: Vec<MenuRow> = items
        .iter()
        .enumerate()
        .map(|(i, item)| MenuRow {
            idx: i + 1,
            name: truncate(&item.name, 30),
            category: capitalize(&item.category),
            price: format_price(item.price),
            description: item
                .description
                .as_deref()
                .map(|d| truncate(d, 45))
                .unwrap_or_default(),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..4)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn print_profile(profile: &Profile) {
    let full_name = match profile.last_name.as_deref() {
        Some(last) => format!("{} {last}", profile.first_name),
        None => profile.first_name.clone(),
    };
    let initials = profile.initials();
    println!("{full_name} ({initials})");
    println!("  Email:   {}", profile.email);
    println!(
        "  Phone:   {}",
        profile.phone_number.as_deref().unwrap_or("-")
    );
    println!("  Picture: {}", profile.image.as_deref().unwrap_or("-"));

    let n = &profile.notifications;
    println!("Email notifications:");
    println!("  {} Order statuses", checkbox(n.order_statuses));
    println!("  {} Password changes", checkbox(n.password_changes));
    println!("  {} Special offers", checkbox(n.special_offers));
    println!("  {} Newsletter", checkbox(n.newsletter));
}

fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

pub(crate) fn format_price(price: f64) -> String {
    format!("${price:.2}")
}

/// Upper-case the first letter: feed categories arrive as "starters", "mains".
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max.saturating_sub(3)).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(12.99), "$12.99");
        assert_eq!(format_price(5.0), "$5.00");
        assert_eq!(format_price(0.5), "$0.50");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("starters"), "Starters");
        assert_eq!(capitalize("Mains"), "Mains");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("éclairs"), "Éclairs");
    }

    #[test]
    fn test_checkbox() {
        assert_eq!(checkbox(true), "[x]");
        assert_eq!(checkbox(false), "[ ]");
    }

    #[test]
    fn test_json_error() {
        assert_eq!(json_error("Not signed in"), r#"{"error":"Not signed in"}"#);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world this is long", 10), "hello w...");
    }

    #[test]
    fn test_truncate_tiny_max() {
        assert_eq!(truncate("Pizza", 2), "...");
        assert_eq!(truncate("Pizza", 0), "...");
    }

    #[test]
    fn test_truncate_utf8() {
        // Should not panic on multi-byte characters
        assert_eq!(truncate("Crème brûlée", 10), "Crème b...");
        assert_eq!(truncate("Bruschetta", 10), "Bruschetta");
        assert_eq!(truncate("日清カップヌードル", 8), "日清カップ...");
    }
}
