use chrono::Utc;
use console::style;
use crate::cli::commands::PhasesArgs;
use crate::errors::BcbError;
use crate::phases::{PhaseStatus, PHASES};

pub async fn handle_phases(args: PhasesArgs) -> Result<(), BcbError> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(PHASES)?);
        return Ok(());
    }

    let today = Utc::now().date_naive();
    println!();
    println!("  {}", style("BCB Agent Roadmap").bold());
    println!();
    for phase in PHASES {
        let status = match phase.status {
            PhaseStatus::Completed => style(phase.status.label()).green(),
            PhaseStatus::InProgress => style(phase.status.label()).blue(),
            PhaseStatus::Upcoming => style(phase.status.label()).dim(),
        };
        println!(
            "  {} Phase {}: {} [{}]",
            style(phase.id.as_str()).cyan(),
            phase.number(),
            style(phase.title).bold(),
            status,
        );
        println!("      {}", phase.description);
        println!(
            "      Target: {} | {} days left | {:.0}% of timeline",
            phase.target_date.format("%b %-d, %Y"),
            phase.days_left(today),
            phase.roadmap_progress(today),
        );
        println!();
    }
    Ok(())
}
