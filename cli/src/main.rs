use std::time::{Duration, Instant};

use canvas::consts::NODE_SIZE;
use canvas::{BinLayout, Camera, Point, Rect};
use clap::{Args, Parser, Subcommand};
use client::drag::{DragController, DragOutcome};
use client::presence::CursorPublisher;
use client::{
    BoardHandle, BoardState, ConnectConfig, ConnectionManager, ConnectionStatus, LocalMutation,
    ReconnectPolicy, SyncError,
};
use wire::ClientAction;
use wire::types::{CategoryPatch, TodoCreate, TodoPatch};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("timed out waiting for the board connection")]
    ConnectTimeout,
    #[error("board connection ended: {0}")]
    ConnectionEnded(String),
    #[error("todo {0} not found on this board")]
    UnknownTodo(i64),
    #[error("deleting a task is permanent; re-run with --yes to confirm")]
    DeleteNotConfirmed,
    #[error(transparent)]
    Sync(#[from] SyncError),
}

#[derive(Parser, Debug)]
#[command(name = "ideaboard-cli", about = "Ideaboard realtime board CLI")]
struct Cli {
    #[arg(long, env = "IDEABOARD_BASE_URL", default_value = "http://127.0.0.1:8000")]
    base_url: String,

    #[arg(long, env = "IDEABOARD_TOKEN")]
    token: String,

    #[arg(long, env = "IDEABOARD_BOARD_ID")]
    board_id: i64,

    #[arg(long, env = "IDEABOARD_USER_ID")]
    user_id: Option<i64>,

    /// Retry dropped transports with exponential backoff instead of exiting.
    #[arg(long, default_value_t = false)]
    reconnect: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stream board state transitions to stdout.
    Watch {
        /// How long to keep watching before exiting.
        #[arg(long, default_value_t = 30)]
        seconds: u64,
    },
    Todo(TodoCommand),
    Category(CategoryCommand),
    Chat(ChatCommand),
    /// Publish one cursor position at the given screen coordinates.
    Cursor { x: f64, y: f64 },
}

#[derive(Args, Debug)]
struct TodoCommand {
    #[command(subcommand)]
    command: TodoSubcommand,
}

#[derive(Subcommand, Debug)]
enum TodoSubcommand {
    Create {
        name: String,
        #[arg(long, default_value_t = 0.0)]
        x: f64,
        #[arg(long, default_value_t = 0.0)]
        y: f64,
        #[arg(long)]
        category_id: Option<i64>,
    },
    /// Drag a todo to a new center position.
    Move { id: i64, x: f64, y: f64 },
    Complete { id: i64 },
    Reopen { id: i64 },
    Delete {
        id: i64,
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct CategoryCommand {
    #[command(subcommand)]
    command: CategorySubcommand,
}

#[derive(Subcommand, Debug)]
enum CategorySubcommand {
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
}

#[derive(Args, Debug)]
struct ChatCommand {
    #[command(subcommand)]
    command: ChatSubcommand,
}

#[derive(Subcommand, Debug)]
enum ChatSubcommand {
    Send { message: String },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let reconnect = if cli.reconnect {
        ReconnectPolicy::ExponentialBackoff { initial_ms: 1000, max_ms: 10_000 }
    } else {
        ReconnectPolicy::Never
    };

    let mut manager = ConnectionManager::new();
    let handle = manager.open(ConnectConfig {
        base_url: cli.base_url,
        board_id: cli.board_id,
        token: cli.token,
        self_user_id: cli.user_id,
        reconnect,
    });

    let result = run(cli.command, &handle).await;
    manager.close();
    result
}

async fn run(command: Command, handle: &BoardHandle) -> Result<(), CliError> {
    wait_connected(handle).await?;

    match command {
        Command::Watch { seconds } => run_watch(handle, seconds).await,
        Command::Todo(todo) => run_todo(todo.command, handle).await,
        Command::Category(category) => run_category(category.command, handle),
        Command::Chat(chat) => run_chat(chat.command, handle),
        Command::Cursor { x, y } => run_cursor(handle, x, y),
    }
}

async fn run_watch(handle: &BoardHandle, seconds: u64) -> Result<(), CliError> {
    let mut rx = handle.state();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(seconds);

    print_summary(&rx.borrow_and_update());
    loop {
        match tokio::time::timeout_at(deadline, rx.changed()).await {
            // Watch window elapsed.
            Err(_) => return Ok(()),
            // Connection ended; the terminal snapshot was already printed.
            Ok(Err(_)) => return Ok(()),
            Ok(Ok(())) => print_summary(&rx.borrow_and_update()),
        }
    }
}

async fn run_todo(command: TodoSubcommand, handle: &BoardHandle) -> Result<(), CliError> {
    match command {
        TodoSubcommand::Create { name, x, y, category_id } => {
            let create = TodoCreate {
                name,
                position_x: x,
                position_y: y,
                description: None,
                category_id,
            };
            // Optimistic placeholder first, then the fire-and-forget request.
            handle.apply(LocalMutation::CreateTodo(create.clone()));
            handle.send(ClientAction::CreateTodo(create));
            println!("create requested at ({x}, {y})");
            Ok(())
        }
        TodoSubcommand::Move { id, x, y } => run_todo_move(handle, id, x, y).await,
        TodoSubcommand::Complete { id } => {
            require_todo(handle, id).await?;
            handle.apply(LocalMutation::PatchTodo(TodoPatch::completion(id, true)));
            handle.send(ClientAction::UpdateTodo(TodoPatch::completion(id, true)));
            println!("completion requested for todo {id}");
            Ok(())
        }
        TodoSubcommand::Reopen { id } => {
            require_todo(handle, id).await?;
            handle.apply(LocalMutation::PatchTodo(TodoPatch::completion(id, false)));
            handle.send(ClientAction::UpdateTodo(TodoPatch::completion(id, false)));
            println!("reactivation requested for todo {id}");
            Ok(())
        }
        TodoSubcommand::Delete { id, yes } => {
            // The drag-to-bin flow confirms before deleting; --yes is the
            // headless equivalent of that confirmation step.
            if !yes {
                return Err(CliError::DeleteNotConfirmed);
            }
            require_todo(handle, id).await?;
            handle.apply(LocalMutation::RemoveTodo { id });
            handle.send(ClientAction::DeleteTodo { id });
            println!("delete requested for todo {id}");
            Ok(())
        }
    }
}

/// Replay a drag gesture through the reconciler so the move goes out as one
/// debounced position broadcast, exactly as an interactive drop would.
async fn run_todo_move(handle: &BoardHandle, id: i64, x: f64, y: f64) -> Result<(), CliError> {
    let todo = require_todo(handle, id).await?;
    let camera = Camera::default();
    // No bins exist headless; park both far outside any reachable position.
    let offscreen = BinLayout {
        delete: Rect::new(-1.0e12, -1.0e12, 0.0, 0.0),
        complete: Rect::new(-1.0e12, -1.0e12, 0.0, 0.0),
    };

    let mut drag = DragController::new();
    drag.start(&todo);
    drag.moved(
        Point::new(x - NODE_SIZE / 2.0, y - NODE_SIZE / 2.0),
        &camera,
        &offscreen,
    );

    match drag.stop(Instant::now()) {
        DragOutcome::Moved { id, x, y } => {
            handle.apply(LocalMutation::PatchTodo(TodoPatch::position(id, x, y)));
            if let Some(deadline) = drag.next_deadline() {
                tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
            }
            for action in drag.poll_due(Instant::now()) {
                handle.send(action);
            }
            println!("moved todo {id} to ({x}, {y})");
        }
        DragOutcome::Unmoved => println!("todo {id} is already at ({x}, {y})"),
        DragOutcome::DroppedOnBin { .. } | DragOutcome::NotDragging => {}
    }
    Ok(())
}

fn run_category(command: CategorySubcommand, handle: &BoardHandle) -> Result<(), CliError> {
    match command {
        CategorySubcommand::Update { id, name, color } => {
            if let Some(color) = &color {
                // Preview recolor locally; the broadcast makes it durable.
                handle.apply(LocalMutation::RecolorCategory { id, color: color.clone() });
            }
            handle.send(ClientAction::UpdateCategory(CategoryPatch { id, name, color }));
            println!("category update requested for {id}");
            Ok(())
        }
    }
}

fn run_chat(command: ChatSubcommand, handle: &BoardHandle) -> Result<(), CliError> {
    match command {
        ChatSubcommand::Send { message } => {
            handle.send(ClientAction::SendChatMessage { message });
            println!("chat message sent");
            Ok(())
        }
    }
}

fn run_cursor(handle: &BoardHandle, x: f64, y: f64) -> Result<(), CliError> {
    let mut publisher = CursorPublisher::new();
    if let Some(action) = publisher.pointer_moved(Point::new(x, y), &Camera::default(), Instant::now()) {
        handle.send(action);
        println!("cursor published at ({x}, {y})");
    }
    Ok(())
}

/// Block until the connection reports `Connected`, surfacing terminal errors.
async fn wait_connected(handle: &BoardHandle) -> Result<(), CliError> {
    let mut rx = handle.state();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);

    loop {
        {
            let state = rx.borrow_and_update();
            if let Some(error) = terminal_error(&state) {
                return Err(error.into());
            }
            if state.connection == ConnectionStatus::Connected {
                return Ok(());
            }
        }
        match tokio::time::timeout_at(deadline, rx.changed()).await {
            Err(_) => return Err(CliError::ConnectTimeout),
            Ok(Err(_)) => {
                let state = handle.snapshot();
                let reason = state
                    .last_error
                    .map_or_else(|| "closed".to_owned(), |e| e.to_string());
                return Err(CliError::ConnectionEnded(reason));
            }
            Ok(Ok(())) => {}
        }
    }
}

fn terminal_error(state: &BoardState) -> Option<SyncError> {
    if state.connection != ConnectionStatus::Disconnected {
        return None;
    }
    match &state.last_error {
        Some(SyncError::Unauthorized) => Some(SyncError::Unauthorized),
        Some(SyncError::Transport(message)) => Some(SyncError::Transport(message.clone())),
        _ => None,
    }
}

/// Wait briefly for the authoritative snapshot to contain `id`.
async fn require_todo(handle: &BoardHandle, id: i64) -> Result<wire::types::Todo, CliError> {
    let mut rx = handle.state();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);

    loop {
        {
            let state = rx.borrow_and_update();
            if let Some(todo) = state.todos.get(&id) {
                return Ok(todo.clone());
            }
        }
        match tokio::time::timeout_at(deadline, rx.changed()).await {
            Err(_) => return Err(CliError::UnknownTodo(id)),
            Ok(Err(_)) => return Err(CliError::UnknownTodo(id)),
            Ok(Ok(())) => {}
        }
    }
}

fn print_summary(state: &BoardState) {
    let status = match state.connection {
        ConnectionStatus::Disconnected => "disconnected",
        ConnectionStatus::Connecting => "connecting",
        ConnectionStatus::Connected => "connected",
    };
    println!(
        "[{status}] todos={} categories={} users={} cursors={} chat={}",
        state.todos.len(),
        state.categories.len(),
        state.active_users.len(),
        state.cursors.len(),
        state.chat.len(),
    );
    if let Some(message) = state.chat.last() {
        println!("  last chat <{}> {}", message.user.username, message.message);
    }
    if let Some(error) = &state.last_error {
        eprintln!("  error: {error}");
    }
}
