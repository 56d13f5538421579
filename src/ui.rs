use colored::*;
use terminal_size::{terminal_size, Height, Width};

pub fn print_header(model: &str, host: &str, tools: usize) {
    let (width, _) = terminal_size().unwrap_or((Width(80), Height(24)));
    let width = width.0 as usize;

    let line = "─".repeat(width);
    println!("{}", line.black().bold());

    let name = "tooloop".yellow().bold();
    let version = format!("v{}", env!("CARGO_PKG_VERSION")).black().bold();
    println!("  {} {}", name, version);

    // Model + host info
    let info = format!("  {}  •  {}  •  {} tools", model, host, tools).cyan();
    println!("{}", info);

    println!("{}", line.black().bold());
}

pub fn print_tool_result(name: &str, content: &str, success: bool) {
    let name = if success { name.green() } else { name.red() };
    println!("  {} Tool {} returned: {}", "∴".magenta(), name, content);
}

pub fn print_assistant(content: &str) {
    println!("{}: {}", "Assistant".green().bold(), content);
}

pub fn print_step(msg: &str) {
    println!("  {} {}", "•".green(), msg);
}

pub fn print_success(msg: &str) {
    println!("  {} {}", "✓".green().bold(), msg.green());
}

pub fn print_error(msg: &str) {
    println!("  {} {}", "❌".red().bold(), msg.red());
}
