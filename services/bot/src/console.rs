use crate::infra::{build_service, parse_shift, OutboxNotifier};
use clap::Args;
use coffee_hire::config::AppConfig;
use coffee_hire::error::AppError;
use coffee_hire::telemetry;
use coffee_hire::workflows::hiring::{CandidateId, Reply, ShiftPeriod, VacancyCatalog};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Args, Debug)]
pub(crate) struct ChatArgs {
    /// Identity the console conversation is recorded under
    #[arg(long, default_value = "console")]
    pub(crate) identity: String,
}

#[derive(Args, Debug)]
pub(crate) struct VacancyQueryArgs {
    /// City to search (case-insensitive)
    #[arg(long)]
    pub(crate) city: String,
    /// Shift period: day or night
    #[arg(long, value_parser = parse_shift)]
    pub(crate) shift: ShiftPeriod,
    /// Only list cafes that accept partial shifts
    #[arg(long)]
    pub(crate) partial: bool,
}

pub(crate) async fn run_chat(args: ChatArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let outbox = OutboxNotifier::default();
    let service = build_service(&config.hiring, outbox.clone());
    let candidate = CandidateId::new(args.identity);

    println!("Coffee Hire console. Type /start to begin, an empty line or Ctrl-D to quit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            break;
        }

        for reply in service.handle_message(&candidate, &line) {
            render_reply(&reply);
        }
        for notice in outbox.drain() {
            println!("[admin] {}", notice.text.replace('\n', "\n[admin] "));
        }
    }

    Ok(())
}

fn render_reply(reply: &Reply) {
    println!("bot> {}", reply.text);
    for (index, choice) in reply.choices.iter().enumerate() {
        println!("  {}. {}", index + 1, choice);
    }
}

pub(crate) fn run_vacancy_query(args: VacancyQueryArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog = VacancyCatalog::try_load(&config.hiring.vacancies_path)?;

    let matches = catalog.query(&args.city, args.shift, args.partial);
    let scope = if args.partial { "partial " } else { "" };
    println!(
        "{} {}{} vacancies in {} ({} records loaded)",
        matches.len(),
        scope,
        args.shift,
        args.city,
        catalog.len()
    );
    for record in &matches {
        println!(
            "- {} (day {}, night {}{})",
            record.display_label(),
            record.day_slots,
            record.night_slots,
            if record.accepts_partial { ", partial ok" } else { "" }
        );
    }

    Ok(())
}
