//! Output formatting utilities.

use colored::Colorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use zora_governance::ProposalState;

/// Render base units with the token's decimals, e.g. `10000.000000000 ZORA`.
pub fn format_amount(amount: u128, decimals: u8, symbol: &str) -> String {
    if decimals == 0 {
        return format!("{} {}", amount, symbol);
    }
    let scale = 10u128.pow(u32::from(decimals));
    format!(
        "{}.{:0width$} {}",
        amount / scale,
        amount % scale,
        symbol,
        width = usize::from(decimals)
    )
}

pub fn format_state(state: ProposalState) -> String {
    let label = state.to_string();
    match state {
        ProposalState::Executed | ProposalState::Succeeded => label.green().to_string(),
        ProposalState::Canceled | ProposalState::Defeated | ProposalState::Expired => {
            label.red().to_string()
        }
        ProposalState::Queued => label.yellow().to_string(),
        ProposalState::Pending | ProposalState::Active => label.cyan().to_string(),
    }
}

/// Seconds as whole days plus remainder, e.g. `2d 0h`.
pub fn format_duration(seconds: u64) -> String {
    format!("{}d {}h", seconds / 86_400, (seconds % 86_400) / 3_600)
}

pub fn print_success(msg: &str) {
    println!("{}", format!("✓ {}", msg).green());
}

pub fn print_info(msg: &str) {
    println!("{}", format!("ℹ {}", msg).blue());
}

pub fn print_header(title: &str) {
    println!("{}", title.bold());
    println!("{}", "=".repeat(50));
}

pub fn print_table<T: Tabled>(rows: Vec<T>) {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}
