use crate::reconcile::{Row, Side, Status};
use colored::Colorize;
use human_format::Formatter;

const SIZE_WIDTH: usize = 18;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SizeStyle {
    /// `1,234,567`
    #[default]
    Grouped,
    /// `1.23MB`
    Human,
}

impl SizeStyle {
    pub fn format(self, size: u64) -> String {
        match self {
            SizeStyle::Grouped => group_thousands(size),
            SizeStyle::Human => Formatter::new()
                .with_decimals(2)
                .with_separator("")
                .with_units("B")
                .format(size as f64),
        }
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn marker(side: Side) -> &'static str {
    match side {
        Side::Both => "LR",
        Side::Local => "L-",
        Side::Remote => "-R",
    }
}

/// Turns classified rows into output lines.
pub trait Presenter {
    fn row(&self, row: &Row) -> String;
}

pub struct Plain {
    pub sizes: SizeStyle,
}

impl Presenter for Plain {
    fn row(&self, row: &Row) -> String {
        format!(
            "{:>width$} {} {}",
            self.sizes.format(row.size),
            marker(row.side),
            row.name,
            width = SIZE_WIDTH,
        )
    }
}

/// Local-only rows in green, remote-only in blue, both halves of a size
/// mismatch in red.
pub struct Colored {
    pub sizes: SizeStyle,
}

impl Presenter for Colored {
    fn row(&self, row: &Row) -> String {
        let line = Plain { sizes: self.sizes }.row(row);
        match row.status {
            Status::Synced => line,
            Status::LocalOnly => line.green().bold().to_string(),
            Status::RemoteOnly => line.blue().bold().to_string(),
            Status::Mismatched => line.red().bold().to_string(),
        }
    }
}
