//! Help text rendering.
//!
//! Lines use the host's `§` formatting codes; the host colours them on display.

use super::builder::CommandBuilder;

/// Commands listed per help page.
pub const COMMANDS_PER_PAGE: usize = 5;

/// Number of help pages needed for `count` commands.
pub fn total_pages(count: usize) -> usize {
    count.div_ceil(COMMANDS_PER_PAGE)
}

/// Clamp a requested page into `1..=total`, treating an empty listing as one page.
pub fn clamp_page(requested: i32, total: usize) -> usize {
    let total = i64::try_from(total).unwrap_or(i64::MAX);
    i64::from(requested).min(total).max(1) as usize
}

/// One help line: `/name - description (Aliases: ...)`.
pub fn help_line(command: &CommandBuilder) -> String {
    let aliases = if command.aliases.is_empty() {
        String::new()
    } else {
        format!(" (Aliases: {})", command.aliases.join(", "))
    };
    let description = if command.description.is_empty() {
        "No description."
    } else {
        command.description.as_str()
    };
    format!("§e/{}§r - {}{}", command.name, description, aliases)
}

/// Render the requested help page, header and footer included.
pub fn help_page(commands: &[CommandBuilder], requested: i32) -> Vec<String> {
    let total = total_pages(commands.len());
    let page = clamp_page(requested, total);
    let start = (page - 1) * COMMANDS_PER_PAGE;

    let mut lines = vec![format!("§6=== Help (Page {page}/{total}) ===")];
    lines.extend(
        commands
            .iter()
            .skip(start)
            .take(COMMANDS_PER_PAGE)
            .map(help_line),
    );

    if page < total {
        lines.push(format!("§7Type §e/help {}§7 to see more.", page + 1));
    }

    lines
}
