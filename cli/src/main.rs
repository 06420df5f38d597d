mod commands;
mod config;
mod nutrition;
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process;

use crate::commands::{
    cmd_eat, cmd_goal_set, cmd_goal_show, cmd_log, cmd_search, cmd_summary, cmd_workout_list,
    cmd_workout_seed,
};
use crate::config::Config;
use crate::nutrition::NutritionClient;
use stride_core::db::Database;

#[derive(Parser)]
#[command(
    name = "stride",
    version,
    about = "A simple fitness tracker CLI",
    long_about = "\n\n  ███████╗████████╗██████╗ ██╗██████╗ ███████╗
  ██╔════╝╚══██╔══╝██╔══██╗██║██╔══██╗██╔════╝
  ███████╗   ██║   ██████╔╝██║██║  ██║█████╗
  ╚════██║   ██║   ██╔══██╗██║██║  ██║██╔══╝
  ███████║   ██║   ██║  ██║██║██████╔╝███████╗
  ╚══════╝   ╚═╝   ╚═╝  ╚═╝╚═╝╚═════╝ ╚══════╝
        every day counts.
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the nutrition database for a food
    Search {
        /// Search query (e.g. "1 cup rice and 2 eggs")
        query: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search for a food and log it to today's calories
    Eat {
        /// Food name to search for
        food: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Log an amount against a category
    Log {
        /// Category: water, steps, calories
        category: String,
        /// Amount (ml for water, count for steps, kcal for calories)
        amount: f64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show daily summary (defaults to today)
    Summary {
        /// Date to show (YYYY-MM-DD, today, yesterday; default: today)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the daily calorie goal
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Browse the workout catalog
    Workouts {
        #[command(subcommand)]
        command: WorkoutCommands,
    },
    /// Start the REST API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,
        /// Address to bind to (default: 127.0.0.1, use 0.0.0.0 to expose to network)
        #[arg(short, long, default_value = "127.0.0.1")]
        bind: String,
    },
}

#[derive(Subcommand)]
enum GoalCommands {
    /// Set the daily calorie goal (1000-5000 kcal)
    Set {
        /// Daily calorie goal
        calories: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the current calorie goal
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum WorkoutCommands {
    /// List workouts
    List {
        /// Filter by type: home or gym
        #[arg(short, long)]
        r#type: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load the starter workout catalog
    Seed {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&config.db_path)?;
    let nutrition = NutritionClient::new(config.nutrition_api_key());

    match cli.command {
        Commands::Search { query, json } => cmd_search(&nutrition, &query, json).await,
        Commands::Eat { food, json } => cmd_eat(&db, &nutrition, &food, json).await,
        Commands::Log {
            category,
            amount,
            json,
        } => cmd_log(&db, &category, amount, json),
        Commands::Summary { date, json } => cmd_summary(&db, date, json),
        Commands::Goal { command } => match command {
            GoalCommands::Set { calories, json } => cmd_goal_set(&db, calories, json),
            GoalCommands::Show { json } => cmd_goal_show(&db, json),
        },
        Commands::Workouts { command } => match command {
            WorkoutCommands::List { r#type, json } => cmd_workout_list(&db, r#type.as_deref(), json),
            WorkoutCommands::Seed { json } => cmd_workout_seed(&db, json),
        },
        Commands::Serve { port, bind } => server::start_server(db, nutrition, port, &bind).await,
    }
}
