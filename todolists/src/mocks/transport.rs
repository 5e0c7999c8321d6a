//! In-memory fake of the remote todolist service

use crate::transport::{Transport, TransportError, TransportFuture};
use crate::types::{Task, TaskId, Todolist, TodolistId, UpdateTaskModel};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use uuid::Uuid;

/// Longest title the service accepts
const MAX_TITLE_LEN: usize = 100;

/// The remote operations, for failure injection, latency and the call log
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `Transport::list_todolists`
    ListTodolists,
    /// `Transport::create_todolist`
    CreateTodolist,
    /// `Transport::update_todolist`
    UpdateTodolist,
    /// `Transport::delete_todolist`
    DeleteTodolist,
    /// `Transport::list_tasks`
    ListTasks,
    /// `Transport::create_task`
    CreateTask,
    /// `Transport::update_task`
    UpdateTask,
    /// `Transport::delete_task`
    DeleteTask,
}

#[derive(Default)]
struct Server {
    todolists: Vec<Todolist>,
    tasks: HashMap<TodolistId, Vec<Task>>,
    updates: HashMap<TaskId, UpdateTaskModel>,
    next_order: i64,
}

#[derive(Default)]
struct Inner {
    server: Server,
    failures: HashMap<Operation, TransportError>,
    latency: HashMap<Operation, Duration>,
    queued_latency: HashMap<Operation, VecDeque<Duration>>,
    calls: Vec<Operation>,
}

fn rejected(message: impl Into<String>) -> TransportError {
    TransportError::Rejected {
        result_code: 1,
        messages: vec![message.into()],
    }
}

fn validate_title(title: &str) -> Result<(), TransportError> {
    if title.trim().is_empty() {
        return Err(rejected("Title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(rejected(format!(
            "Title should be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

impl Server {
    fn bucket_mut(&mut self, todolist_id: &TodolistId) -> Result<&mut Vec<Task>, TransportError> {
        self.tasks
            .get_mut(todolist_id)
            .ok_or_else(|| rejected(format!("Todolist {todolist_id} not found")))
    }

    fn next_order(&mut self) -> i64 {
        self.next_order -= 1;
        self.next_order
    }

    fn create_todolist(&mut self, title: &str) -> Result<Todolist, TransportError> {
        validate_title(title)?;
        let order = self.next_order();
        let todolist = Todolist {
            id: TodolistId::new(Uuid::new_v4().to_string()),
            title: title.to_string(),
            added_date: Some(chrono::Utc::now().naive_utc()),
            order,
        };
        self.todolists.push(todolist.clone());
        self.tasks.insert(todolist.id.clone(), Vec::new());
        Ok(todolist)
    }

    fn create_task(&mut self, todolist_id: &TodolistId, title: &str) -> Result<Task, TransportError> {
        validate_title(title)?;
        let order = self.next_order();
        let bucket = self.bucket_mut(todolist_id)?;
        let task = Task {
            order,
            added_date: Some(chrono::Utc::now().naive_utc()),
            ..Task::new(TaskId::new(Uuid::new_v4().to_string()), todolist_id.clone(), title)
        };
        bucket.insert(0, task.clone());
        Ok(task)
    }
}

/// A fake remote service held in memory
///
/// Assigns fresh ids on creation, validates titles the way the real service
/// does, and can be told to fail or slow down any operation.
///
/// ```
/// use todolists::mocks::{InMemoryTransport, Operation};
/// use todolists::transport::TransportError;
///
/// let transport = InMemoryTransport::new();
/// transport.fail(Operation::DeleteTodolist, TransportError::Unauthorized);
/// ```
#[derive(Default)]
pub struct InMemoryTransport {
    inner: Mutex<Inner>,
}

impl InMemoryTransport {
    /// An empty service
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every call to `operation` fail with `error` until [`Self::recover`]
    pub fn fail(&self, operation: Operation, error: TransportError) {
        self.lock().failures.insert(operation, error);
    }

    /// Stop failing `operation`
    pub fn recover(&self, operation: Operation) {
        self.lock().failures.remove(&operation);
    }

    /// Delay every call to `operation`
    pub fn set_latency(&self, operation: Operation, latency: Duration) {
        self.lock().latency.insert(operation, latency);
    }

    /// Delay only the next not-yet-issued call to `operation`
    ///
    /// Queued delays are consumed in call order and take precedence over
    /// [`Self::set_latency`].
    pub fn queue_latency(&self, operation: Operation, latency: Duration) {
        self.lock()
            .queued_latency
            .entry(operation)
            .or_default()
            .push_back(latency);
    }

    /// Every operation issued so far, in call order
    #[must_use]
    pub fn calls(&self) -> Vec<Operation> {
        self.lock().calls.clone()
    }

    /// How many times `operation` was issued
    #[must_use]
    pub fn call_count(&self, operation: Operation) -> usize {
        self.lock().calls.iter().filter(|op| **op == operation).count()
    }

    /// Lists currently stored by the service
    #[must_use]
    pub fn todolists(&self) -> Vec<Todolist> {
        self.lock().server.todolists.clone()
    }

    /// Tasks currently stored for a list
    #[must_use]
    pub fn tasks(&self, todolist_id: &TodolistId) -> Vec<Task> {
        self.lock()
            .server
            .tasks
            .get(todolist_id)
            .cloned()
            .unwrap_or_default()
    }

    /// The last full record sent for a task
    #[must_use]
    pub fn last_update(&self, task_id: &TaskId) -> Option<UpdateTaskModel> {
        self.lock().server.updates.get(task_id).cloned()
    }

    /// Store a list directly, bypassing the call log and injected failures
    ///
    /// # Panics
    ///
    /// Panics if `title` would be rejected by the service.
    #[allow(clippy::expect_used)] // Test fixture helper
    pub fn seed_todolist(&self, title: &str) -> Todolist {
        self.lock()
            .server
            .create_todolist(title)
            .expect("seeded todolist title must be valid")
    }

    /// Store a task directly, bypassing the call log and injected failures
    ///
    /// # Panics
    ///
    /// Panics if the list does not exist or `title` would be rejected.
    #[allow(clippy::expect_used)] // Test fixture helper
    pub fn seed_task(&self, todolist_id: &TodolistId, title: &str) -> Task {
        self.lock()
            .server
            .create_task(todolist_id, title)
            .expect("seeded task must target an existing list")
    }

    /// Log the call and decide its latency and injected failure
    fn begin(&self, operation: Operation) -> (Option<Duration>, Option<TransportError>) {
        let mut inner = self.lock();
        inner.calls.push(operation);

        let queued = inner
            .queued_latency
            .get_mut(&operation)
            .and_then(VecDeque::pop_front);
        let latency = queued.or_else(|| inner.latency.get(&operation).copied());
        let failure = inner.failures.get(&operation).cloned();
        (latency, failure)
    }

    fn call<'a, T, F>(&'a self, operation: Operation, apply: F) -> TransportFuture<'a, T>
    where
        T: Send + 'a,
        F: FnOnce(&mut Server) -> Result<T, TransportError> + Send + 'a,
    {
        let (latency, failure) = self.begin(operation);
        tracing::debug!(?operation, ?latency, failing = failure.is_some(), "In-memory call");

        Box::pin(async move {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            if let Some(error) = failure {
                return Err(error);
            }
            apply(&mut self.lock().server)
        })
    }
}

impl Transport for InMemoryTransport {
    fn list_todolists(&self) -> TransportFuture<'_, Vec<Todolist>> {
        self.call(Operation::ListTodolists, |server| Ok(server.todolists.clone()))
    }

    fn create_todolist(&self, title: &str) -> TransportFuture<'_, Todolist> {
        let title = title.to_string();
        self.call(Operation::CreateTodolist, move |server| server.create_todolist(&title))
    }

    fn update_todolist(&self, id: &TodolistId, title: &str) -> TransportFuture<'_, ()> {
        let (id, title) = (id.clone(), title.to_string());
        self.call(Operation::UpdateTodolist, move |server| {
            validate_title(&title)?;
            let todolist = server
                .todolists
                .iter_mut()
                .find(|tl| tl.id == id)
                .ok_or_else(|| rejected(format!("Todolist {id} not found")))?;
            todolist.title = title;
            Ok(())
        })
    }

    fn delete_todolist(&self, id: &TodolistId) -> TransportFuture<'_, ()> {
        let id = id.clone();
        self.call(Operation::DeleteTodolist, move |server| {
            if server.tasks.remove(&id).is_none() {
                return Err(rejected(format!("Todolist {id} not found")));
            }
            server.todolists.retain(|tl| tl.id != id);
            Ok(())
        })
    }

    fn list_tasks(&self, todolist_id: &TodolistId) -> TransportFuture<'_, Vec<Task>> {
        let todolist_id = todolist_id.clone();
        self.call(Operation::ListTasks, move |server| {
            server.bucket_mut(&todolist_id).map(|bucket| bucket.clone())
        })
    }

    fn create_task(&self, todolist_id: &TodolistId, title: &str) -> TransportFuture<'_, Task> {
        let (todolist_id, title) = (todolist_id.clone(), title.to_string());
        self.call(Operation::CreateTask, move |server| server.create_task(&todolist_id, &title))
    }

    fn update_task(
        &self,
        todolist_id: &TodolistId,
        task_id: &TaskId,
        model: &UpdateTaskModel,
    ) -> TransportFuture<'_, ()> {
        let (todolist_id, task_id, model) = (todolist_id.clone(), task_id.clone(), model.clone());
        self.call(Operation::UpdateTask, move |server| {
            validate_title(&model.title)?;
            let task = server
                .bucket_mut(&todolist_id)?
                .iter_mut()
                .find(|t| t.id == task_id)
                .ok_or_else(|| rejected(format!("Task {task_id} not found")))?;
            task.title.clone_from(&model.title);
            task.description.clone_from(&model.description);
            task.status = model.status;
            task.priority = model.priority;
            task.start_date = model.start_date;
            task.deadline = model.deadline;
            server.updates.insert(task_id, model);
            Ok(())
        })
    }

    fn delete_task(&self, todolist_id: &TodolistId, task_id: &TaskId) -> TransportFuture<'_, ()> {
        let (todolist_id, task_id) = (todolist_id.clone(), task_id.clone());
        self.call(Operation::DeleteTask, move |server| {
            let bucket = server.bucket_mut(&todolist_id)?;
            let before = bucket.len();
            bucket.retain(|t| t.id != task_id);
            if bucket.len() == before {
                return Err(rejected(format!("Task {task_id} not found")));
            }
            Ok(())
        })
    }
}
