use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;
use taskboard_config::SyncSettings;
use taskboard_db::models::{Board, User};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use super::{BoardMutation, Continuation, OpenBoard, SyncError, SyncState};
use crate::board::{self, resolve_assigned_members};
use crate::dao::{BoardDao, DaoError, UserDao};
use crate::notify::{Notification, Notifier};

/// Opens board sessions. Sessions share the store but nothing else.
pub struct SyncCoordinator {
    boards: Arc<BoardDao>,
    users: Arc<UserDao>,
    notifier: Arc<dyn Notifier>,
    queue_capacity: usize,
}

impl SyncCoordinator {
    pub fn new(
        boards: Arc<BoardDao>,
        users: Arc<UserDao>,
        notifier: Arc<dyn Notifier>,
        settings: &SyncSettings,
    ) -> Self {
        Self {
            boards,
            users,
            notifier,
            queue_capacity: settings.queue_capacity.max(1),
        }
    }

    /// Loads the board and its members, then starts the session worker.
    pub async fn open(&self, board_id: &str) -> Result<BoardSession, SyncError> {
        let initial = load_board(&self.boards, &self.users, board_id).await?;
        let shared = Arc::new(RwLock::new(initial));
        let (state_tx, state_rx) = watch::channel(SyncState::Idle);
        let (jobs_tx, jobs_rx) = mpsc::channel(self.queue_capacity);

        let worker = SessionWorker {
            board_id: board_id.to_string(),
            boards: Arc::clone(&self.boards),
            users: Arc::clone(&self.users),
            notifier: Arc::clone(&self.notifier),
            shared: Arc::clone(&shared),
            state: state_tx,
        };
        tokio::spawn(worker.run(jobs_rx));

        info!(%board_id, "Board session opened");
        Ok(BoardSession {
            board_id: board_id.to_string(),
            jobs: jobs_tx,
            state: state_rx,
            shared,
        })
    }
}

enum Command {
    Mutate(BoardMutation),
    Reload,
}

struct Job {
    command: Command,
    continuation: Continuation,
}

/// Handle to one open board.
///
/// Requests are queued and run strictly one after another. Dropping the handle
/// lets queued work finish and then stops the worker.
pub struct BoardSession {
    board_id: String,
    jobs: mpsc::Sender<Job>,
    state: watch::Receiver<SyncState>,
    shared: Arc<RwLock<OpenBoard>>,
}

impl BoardSession {
    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    /// The board as currently held in memory.
    pub fn snapshot(&self) -> OpenBoard {
        self.shared.read().clone()
    }

    pub fn state(&self) -> SyncState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.state.clone()
    }

    /// Queues `mutation`; `continuation` fires when its cycle ends.
    pub async fn submit(
        &self,
        mutation: BoardMutation,
        continuation: Continuation,
    ) -> Result<(), SyncError> {
        self.enqueue(Command::Mutate(mutation), continuation).await
    }

    /// Queues a reload of the board without changing it.
    pub async fn request_reload(&self, continuation: Continuation) -> Result<(), SyncError> {
        self.enqueue(Command::Reload, continuation).await
    }

    /// Queues `mutation` and waits for its cycle to finish.
    pub async fn apply(&self, mutation: BoardMutation) -> Result<OpenBoard, SyncError> {
        let (continuation, reply) = Continuation::reply();
        self.submit(mutation, continuation).await?;
        reply.await.map_err(|_| SyncError::SessionClosed)?
    }

    pub async fn reload(&self) -> Result<OpenBoard, SyncError> {
        let (continuation, reply) = Continuation::reply();
        self.request_reload(continuation).await?;
        reply.await.map_err(|_| SyncError::SessionClosed)?
    }

    async fn enqueue(&self, command: Command, continuation: Continuation) -> Result<(), SyncError> {
        self.jobs
            .send(Job {
                command,
                continuation,
            })
            .await
            .map_err(|_| SyncError::SessionClosed)
    }
}

/// Which board field a mutation rewrote.
enum Change {
    TaskList,
    AssignedTo { added: Option<User> },
}

struct SessionWorker {
    board_id: String,
    boards: Arc<BoardDao>,
    users: Arc<UserDao>,
    notifier: Arc<dyn Notifier>,
    shared: Arc<RwLock<OpenBoard>>,
    state: watch::Sender<SyncState>,
}

impl SessionWorker {
    async fn run(self, mut jobs: mpsc::Receiver<Job>) {
        while let Some(job) = jobs.recv().await {
            let outcome = match job.command {
                Command::Mutate(mutation) => self.mutate(mutation).await,
                Command::Reload => self.refresh().await,
            };
            self.enter(SyncState::Idle);

            if let Err(error) = &outcome {
                warn!(board_id = %self.board_id, %error, "Board sync failed");
            }
            // A panicking callback must not take the queued jobs down with it
            let finished = panic::catch_unwind(AssertUnwindSafe(|| job.continuation.finish(outcome)));
            if finished.is_err() {
                error!(board_id = %self.board_id, "Board sync continuation panicked");
            }
        }

        debug!(board_id = %self.board_id, "Board session closed");
    }

    fn enter(&self, state: SyncState) {
        debug!(board_id = %self.board_id, ?state, "Sync state");
        self.state.send_replace(state);
    }

    async fn mutate(&self, mutation: BoardMutation) -> Result<OpenBoard, SyncError> {
        self.enter(SyncState::Mutating);
        let kind = mutation.kind();

        let current = self.shared.read().clone();
        let board = current.editable_board()?;
        let (board, change) = self.apply_locally(board, mutation).await?;
        *self.shared.write() = OpenBoard::locally_mutated(board.clone(), current.members().to_vec());

        self.enter(SyncState::Persisting);
        self.persist(&board, &change).await?;

        let reloaded = self.refresh().await?;
        info!(board_id = %self.board_id, mutation = kind, "Board change saved");

        if let Change::AssignedTo { added: Some(user) } = change {
            self.notify_assignment(&reloaded, &user).await;
        }
        Ok(reloaded)
    }

    async fn apply_locally(
        &self,
        draft: Board,
        mutation: BoardMutation,
    ) -> Result<(Board, Change), SyncError> {
        let applied = match mutation {
            BoardMutation::CreateTaskList { title, created_by } => (
                board::create_task_list(draft, title, created_by),
                Change::TaskList,
            ),
            BoardMutation::RenameTaskList { position, title } => (
                board::rename_task_list(draft, position, title)?,
                Change::TaskList,
            ),
            BoardMutation::DeleteTaskList { position } => {
                (board::delete_task_list(draft, position)?, Change::TaskList)
            }
            BoardMutation::AddCard {
                task_list_position,
                name,
                created_by,
            } => (
                board::add_card(draft, task_list_position, name, created_by)?,
                Change::TaskList,
            ),
            BoardMutation::ReplaceCards {
                task_list_position,
                cards,
            } => (
                board::replace_cards(draft, task_list_position, cards)?,
                Change::TaskList,
            ),
            BoardMutation::AssignMember { user } => assign(draft, user),
            BoardMutation::AssignMemberByEmail { email } => {
                let user = self.users.find_by_email(&email).await.map_err(|err| match err {
                    DaoError::NotFound(_) => SyncError::NotFound("No such member found".to_string()),
                    other => SyncError::StoreReadFailed(other.to_string()),
                })?;
                assign(draft, user)
            }
        };
        Ok(applied)
    }

    /// Exactly one write of the whole rewritten field.
    async fn persist(&self, board: &Board, change: &Change) -> Result<(), SyncError> {
        let result = match change {
            Change::TaskList => {
                self.boards
                    .update_task_list(&self.board_id, &board.task_list)
                    .await
            }
            Change::AssignedTo { .. } => {
                self.boards
                    .update_assigned_to(&self.board_id, &board.assigned_to)
                    .await
            }
        };

        result.map_err(|err| match err {
            DaoError::NotFound(_) => SyncError::NotFound("Board not found".to_string()),
            other => SyncError::StoreWriteFailed(other.to_string()),
        })
    }

    async fn refresh(&self) -> Result<OpenBoard, SyncError> {
        self.enter(SyncState::Reloading);
        let reloaded = load_board(&self.boards, &self.users, &self.board_id).await?;
        *self.shared.write() = reloaded.clone();
        Ok(reloaded)
    }

    async fn notify_assignment(&self, open: &OpenBoard, member: &User) {
        let assigned_by = open.members().first();
        let notification = Notification::board_assignment(open.board(), member, assigned_by);

        if let Err(error) = self.notifier.send(notification).await {
            warn!(board_id = %self.board_id, member = %member.id, %error, "Failed to notify new member");
        }
    }
}

fn assign(mut draft: Board, user: User) -> (Board, Change) {
    let added = board::assign_member_to_board(&mut draft, &user);
    (
        draft,
        Change::AssignedTo {
            added: added.then_some(user),
        },
    )
}

async fn load_board(boards: &BoardDao, users: &UserDao, board_id: &str) -> Result<OpenBoard, SyncError> {
    let board = boards.find_by_id(board_id).await.map_err(read_failure)?;
    let directory = users
        .find_by_ids(&board.assigned_to)
        .await
        .map_err(read_failure)?;

    let members = resolve_assigned_members(&board.assigned_to, directory);
    Ok(OpenBoard::loaded(board, members))
}

fn read_failure(err: DaoError) -> SyncError {
    match err {
        DaoError::NotFound(_) => SyncError::NotFound("Board not found".to_string()),
        other => SyncError::StoreReadFailed(other.to_string()),
    }
}
