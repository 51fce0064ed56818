use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const RTT_FAST: Color = Color::Green;
pub const RTT_SLOW: Color = Color::Yellow;
pub const LOST: Color = Color::Red;
pub const UNKNOWN: Color = Color::BrightBlack;
