use console::{Emoji, style};

pub static SUCCESS_ICON: Emoji<'_, '_> = Emoji("✅ ", "");
pub static INFO_ICON: Emoji<'_, '_> = Emoji("ℹ️  ", "");
pub static WARN_ICON: Emoji<'_, '_> = Emoji("⚠️  ", "");
pub static ERROR_ICON: Emoji<'_, '_> = Emoji("❌ ", "");
pub static GLOBE: Emoji<'_, '_> = Emoji("🌐 ", "");
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

pub fn print_success(msg: &str) {
    println!("{} {}", SUCCESS_ICON, style(msg).green());
}

pub fn print_info(msg: &str) {
    println!("{} {}", INFO_ICON, style(msg).blue());
}

pub fn print_warn(msg: &str) {
    println!("{} {}", WARN_ICON, style(msg).yellow());
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", ERROR_ICON, style(msg).red().bold());
}

pub fn print_status(label: &str, msg: &str) {
    println!("  {} {}: {}", GEAR, style(label).bold().cyan(), msg);
}

pub fn print_link(label: &str, url: &str) {
    println!(
        "  {} {}: {}",
        GLOBE,
        style(label).bold(),
        style(url).underlined().cyan()
    );
}

pub fn print_banner() {
    let lines: &[&str] = &[
        "                            _ _                         _ ",
        "  __ _ _   _  __ _  __| | |__   ___   __ _ _ __ __| |",
        " / _` | | | |/ _` |/ _` | '_ \\ / _ \\ / _` | '__/ _` |",
        "| (_| | |_| | (_| | (_| | |_) | (_) | (_| | | | (_| |",
        " \\__, |\\__,_|\\__,_|\\__,_|_.__/ \\___/ \\__,_|_|  \\__,_|",
        "    |_|                                               ",
    ];

    // Four quadrant colours, left to right: red, blue, amber, green
    let stops: [(u8, u8, u8); 4] = [(239, 68, 68), (59, 130, 246), (245, 158, 11), (34, 197, 94)];
    let width = lines.iter().map(|l| l.len()).max().unwrap_or(1) as u32;

    println!();
    for line in lines {
        for (x, ch) in line.chars().enumerate() {
            if ch == ' ' {
                print!(" ");
                continue;
            }
            let (r, g, b) = stops[((x as u32 * 4) / width.max(1)).min(3) as usize];
            print!("\x1b[38;2;{};{};{}m{}", r, g, b, ch);
        }
        println!();
    }
    print!("\x1b[0m");

    println!("{}\n", style("Do, plan, delegate, drop.").cyan());
}

pub fn print_goodbye() {
    println!("\n{} {}", SPARKLE, style("Board closed. See you tomorrow!").bold().cyan());
}

/// A titled block of help or status lines.
pub struct GuideSection {
    title: String,
    lines: Vec<String>,
}

impl GuideSection {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            lines: Vec::new(),
        }
    }

    pub fn command(mut self, name: &str, description: &str) -> Self {
        self.lines.push(format!(
            "  {:<22} {}",
            style(name).green().bold(),
            description
        ));
        self
    }

    pub fn flag(mut self, name: &str, description: &str) -> Self {
        self.lines
            .push(format!("  {:<22} {}", style(name).yellow(), description));
        self
    }

    pub fn status(mut self, label: &str, value: &str) -> Self {
        self.lines
            .push(format!("  {} {}", style(format!("{label}:")).bold(), value));
        self
    }

    pub fn print(self) {
        println!("\n {}", style(&self.title).bold().underlined());
        for line in self.lines {
            println!("{line}");
        }
    }
}
