/// Output helpers. Results go to stdout as JSON; status lines go to stderr
/// so the JSON stream stays machine-readable.
use colored::*;
use serde::Serialize;

/// Print a query result as one line of JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

pub fn print_json_pretty<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Display a success message
pub fn success(message: &str) {
    eprintln!("{} {}", "✓".green(), message);
}

/// Display an info message
pub fn info(message: &str) {
    eprintln!("{} {}", "●".blue(), message);
}

/// Display a warning message
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Display a process/action message
pub fn action(message: &str) {
    eprintln!("{} {}", "▶".cyan(), message);
}

/// Format a number with thousands separator
pub fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
