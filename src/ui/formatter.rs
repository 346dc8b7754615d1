//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.
//! Functions here only wrap text in styles and print it.

use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Announce a workflow step before its commands stream their output.
pub fn display_step(name: &str) {
    println!("\n{}", style(format!("▸ {}", name)).bold());
}

/// Render the version change shown above the publish confirmation.
///
/// # Arguments
/// * `from` - Version currently in the manifest
/// * `to` - Version that will be published
pub fn version_change(from: &str, to: &str) -> String {
    format!(
        "Publish {} → {}?",
        style(from).red(),
        style(to).green().bold()
    )
}

/// Render a menu question.
pub fn question(text: &str) -> String {
    style(text).bold().to_string()
}

/// Render one menu row, highlighting the selected one.
pub fn menu_option(label: &str, selected: bool) -> String {
    if selected {
        format!("{} {}", style("❯").cyan(), style(label).cyan())
    } else {
        format!("  {}", label)
    }
}
