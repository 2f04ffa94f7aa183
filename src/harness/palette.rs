use colored::{ColoredString, Colorize};

/// Fixed set of tones the harness prints with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Reset,
    Green,
    Red,
    Yellow,
    Blue,
    Cyan,
}

impl Tone {
    pub fn paint(self, message: &str) -> ColoredString {
        match self {
            Tone::Reset => message.normal(),
            Tone::Green => message.green(),
            Tone::Red => message.red(),
            Tone::Yellow => message.yellow(),
            Tone::Blue => message.blue(),
            Tone::Cyan => message.cyan(),
        }
    }
}

pub fn emit(message: &str, tone: Tone) {
    println!("{}", tone.paint(message));
}

pub fn banner(title: &str) {
    let rule = "═".repeat(60);
    emit(&format!("\n╔{}╗", rule), Tone::Cyan);
    emit(&format!("║{:^60}║", title), Tone::Cyan);
    emit(&format!("╚{}╝", rule), Tone::Cyan);
}
