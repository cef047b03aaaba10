mod render;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use taskboard_config::{Settings, StoreBackend};
use taskboard_db::models::User;
use taskboard_services::{
    BoardMutation, DaoError, LogNotifier, Services, StaticIdentity, SyncError,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "taskboard", about = "Collaborative task boards from the terminal")]
struct Cli {
    /// Act as this user instead of `identity.user_id` from the config.
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store the signed-in user's profile.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        mobile: Option<i64>,
    },
    /// Show the signed-in user's profile.
    Whoami,
    CreateBoard {
        #[arg(long)]
        name: String,
        /// URL of an already uploaded board image.
        #[arg(long, default_value = "")]
        image: String,
    },
    /// List boards the signed-in user is a member of.
    Boards,
    Show {
        #[arg(long)]
        board: String,
    },
    AddList {
        #[arg(long)]
        board: String,
        #[arg(long)]
        title: String,
    },
    RenameList {
        #[arg(long)]
        board: String,
        #[arg(long)]
        position: usize,
        #[arg(long)]
        title: String,
    },
    DeleteList {
        #[arg(long)]
        board: String,
        #[arg(long)]
        position: usize,
    },
    AddCard {
        #[arg(long)]
        board: String,
        /// Position of the list the card goes into.
        #[arg(long)]
        list: usize,
        #[arg(long)]
        name: String,
    },
    /// Add a member to a board by their email address.
    Assign {
        #[arg(long)]
        board: String,
        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (silently ignore if missing)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "taskboard_cli=info,taskboard_services=info,taskboard_db=info".into()
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = Settings::load()?;
    info!(backend = ?settings.database.backend, "Loaded settings");
    if settings.database.backend == StoreBackend::Memory {
        warn!("In-memory store selected; nothing is kept after this command exits");
    }

    let identity = StaticIdentity::new(cli.user.clone().or(settings.identity.user_id.clone()));
    let services = Services::connect(Arc::new(identity), Arc::new(LogNotifier), &settings).await?;

    run(&services, cli.command).await
}

async fn run(services: &Services, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Register {
            name,
            email,
            mobile,
        } => {
            let mut user = User::new(String::new(), name, email);
            user.mobile = mobile.unwrap_or_default();
            let user = services.users.register(user).await?;
            println!("Registered {} <{}>", user.name, user.email);
        }
        Command::Whoami => {
            let user = services.users.load_current().await?;
            println!("{} <{}> ({})", user.name, user.email, user.id);
        }
        Command::CreateBoard { name, image } => {
            let creator = creator_name(services).await?;
            let board = services.boards.create(name, image, creator).await?;
            println!("Created board {} ({})", board.name, board.document_id);
        }
        Command::Boards => {
            for board in services.boards.list_for_current_user().await? {
                println!("{}  {}", board.document_id, board.name);
            }
        }
        Command::Show { board } => {
            let session = services.sync.open(&board).await.map_err(user_facing)?;
            print!("{}", render::board(&session.snapshot()));
        }
        Command::AddList { board, title } => {
            let created_by = current_user_id(services)?;
            apply(services, &board, BoardMutation::CreateTaskList { title, created_by }).await?;
        }
        Command::RenameList {
            board,
            position,
            title,
        } => {
            apply(services, &board, BoardMutation::RenameTaskList { position, title }).await?;
        }
        Command::DeleteList { board, position } => {
            apply(services, &board, BoardMutation::DeleteTaskList { position }).await?;
        }
        Command::AddCard { board, list, name } => {
            let created_by = current_user_id(services)?;
            let mutation = BoardMutation::AddCard {
                task_list_position: list,
                name,
                created_by,
            };
            apply(services, &board, mutation).await?;
        }
        Command::Assign { board, email } => {
            apply(services, &board, BoardMutation::AssignMemberByEmail { email }).await?;
        }
    }

    Ok(())
}

/// Opens `board_id`, runs one mutation cycle and prints the reloaded board.
async fn apply(services: &Services, board_id: &str, mutation: BoardMutation) -> anyhow::Result<()> {
    let session = services.sync.open(board_id).await.map_err(user_facing)?;
    let open = session.apply(mutation).await.map_err(user_facing)?;
    print!("{}", render::board(&open));
    Ok(())
}

fn current_user_id(services: &Services) -> anyhow::Result<String> {
    services
        .identity
        .current_user_id()
        .context("No user is signed in; pass --user or set TASKBOARD__IDENTITY__USER_ID")
}

/// Display name of the signed-in user, falling back to their id.
async fn creator_name(services: &Services) -> anyhow::Result<String> {
    match services.users.load_current().await {
        Ok(user) if !user.name.is_empty() => Ok(user.name),
        Ok(_) | Err(DaoError::NotFound(_)) => current_user_id(services),
        Err(err) => Err(err.into()),
    }
}

fn user_facing(err: SyncError) -> anyhow::Error {
    anyhow::anyhow!("{} ({err})", err.user_message())
}
