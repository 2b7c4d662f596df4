//! LastPlanner Player - command-line client.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lastplanner_domain::{ColumnId, GameState, PlayerName, TaskId};
use lastplanner_player::infrastructure::clock::SystemClock;
use lastplanner_player::infrastructure::http_client::HttpGameService;
use lastplanner_player::infrastructure::platform::DesktopStorageProvider;
use lastplanner_player::ports::outbound::StorageProvider;
use lastplanner_player::{
    GameSyncService, LocalGameStore, PlayService, PlayerConfig, SessionIdentity,
};

#[derive(Parser, Debug)]
#[command(name = "lastplanner-player", version)]
#[command(about = "Play LastPlanner from the terminal; progress is kept locally and mirrored to the engine")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the current save
    Status,
    /// Start a new game with this character name
    New { name: String },
    /// Move a task to another Kanban column
    Move { task: String, column: String },
    /// Acknowledge the chapter intro
    AckIntro,
    /// Acknowledge today's briefing
    AckBriefing,
    /// Advance to the next day
    NextDay,
    /// Delete the save on this device and on the engine
    Reset,
    /// Show the signed-in account
    Profile,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lastplanner_player=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = PlayerConfig::from_env()?;

    let storage: Arc<dyn StorageProvider> = Arc::new(match &config.storage_path {
        Some(path) => DesktopStorageProvider::with_path(path),
        None => DesktopStorageProvider::new(),
    });
    let remote = HttpGameService::new(config.api_url.clone(), config.timeout)
        .with_user_id(config.user_id.clone());

    let identity = SessionIdentity::new(storage.clone());
    let sync = Arc::new(GameSyncService::new(
        Arc::new(remote),
        LocalGameStore::new(storage),
        Arc::new(SystemClock),
    ));
    let play = PlayService::new(sync.clone());
    let session_id = identity.session_id();

    match args.command {
        Command::Status => match sync.load(&session_id).await {
            Some(state) => print_state(&state),
            None => println!("No saved game. Start one with `new <name>`."),
        },
        Command::New { name } => {
            let state = play.start_new_game(&session_id, PlayerName::new(name)?).await;
            print_state(&state);
        }
        Command::Move { task, column } => {
            let state = play.resume(&session_id).await?;
            let state = play
                .move_task(&session_id, &state, &TaskId::new(task)?, &ColumnId::new(column)?)
                .await?;
            print_state(&state);
        }
        Command::AckIntro => {
            let state = play.resume(&session_id).await?;
            print_state(&play.acknowledge_intro(&session_id, &state).await);
        }
        Command::AckBriefing => {
            let state = play.resume(&session_id).await?;
            print_state(&play.acknowledge_briefing(&session_id, &state).await);
        }
        Command::NextDay => {
            let state = play.resume(&session_id).await?;
            print_state(&play.advance_day(&session_id, &state).await);
        }
        Command::Reset => {
            play.reset(&session_id).await;
            println!("Save deleted for session {session_id}");
        }
        Command::Profile => match sync.profile().await {
            Ok(profile) => println!("Signed in as {}", profile.user_id),
            Err(e) => println!("Not signed in ({e})"),
        },
    }

    Ok(())
}

fn print_state(state: &GameState) {
    let name = if state.player_name.is_empty() {
        "(unnamed)"
    } else {
        state.player_name.as_str()
    };
    println!(
        "{name}: chapter {}, week {}, day {}",
        state.chapter, state.week, state.day
    );
    let r = &state.resources;
    println!(
        "  morale {}  trust {}  productivity {}  quality {}  budget {}",
        r.morale, r.trust, r.productivity, r.quality, r.budget
    );

    let Some(board) = &state.kanban_state else {
        return;
    };
    for column in &board.columns {
        let tasks: Vec<_> = board.tasks_in(&column.id).map(|t| t.title.as_str()).collect();
        let marker = if column.is_over_limit() { " (over limit)" } else { "" };
        println!(
            "  [{}] {}/{}{marker}: {}",
            column.title,
            column.task_count(),
            column.wip_limit,
            tasks.join(", ")
        );
    }
}
