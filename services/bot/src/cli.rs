use crate::console::{run_chat, run_vacancy_query, ChatArgs, VacancyQueryArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use coffee_hire::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Coffee Hire Bot",
    about = "Run the coffee-shop hiring bot and inspect its vacancy catalog",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Fill in the questionnaire interactively over stdin/stdout
    Chat(ChatArgs),
    /// List vacancies matching a city and shift
    Vacancies(VacancyQueryArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Chat(args) => run_chat(args).await,
        Command::Vacancies(args) => run_vacancy_query(args),
    }
}
