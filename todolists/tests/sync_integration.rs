//! End-to-end synchronization scenarios against the in-memory service

#![allow(clippy::panic)] // Tests are allowed to panic on failures

use std::sync::Arc;
use std::time::Duration;
use todolists::mocks::{InMemoryTransport, Operation};
use todolists::transport::TransportError;
use todolists::types::{DomainTodolist, FilterValue, TaskId, TaskPatch, TaskStatus, TodolistId};
use todolists::{selectors, AppError, AppState, SyncError, TodolistsAction, TodolistsApp};

fn setup() -> (Arc<InMemoryTransport>, TodolistsApp) {
    todosync_testing::init_test_tracing();
    let transport = Arc::new(InMemoryTransport::new());
    let app = TodolistsApp::new(transport.clone(), Duration::from_secs(5));
    (transport, app)
}

/// Seed one list with one task remotely and load both into the app
async fn loaded(transport: &InMemoryTransport, app: &TodolistsApp) -> Result<(TodolistId, TaskId), AppError> {
    let list = transport.seed_todolist("Groceries");
    let task = transport.seed_task(&list.id, "Milk");

    app.execute(TodolistsAction::FetchTodolists).await?;
    app.execute(TodolistsAction::FetchTasks {
        todolist_id: list.id.clone(),
    })
    .await?;
    Ok((list.id, task.id))
}

#[tokio::test]
async fn create_todolist_adds_list_and_empty_bucket() -> Result<(), AppError> {
    let (transport, app) = setup();

    let event = app
        .execute(TodolistsAction::CreateTodolist {
            title: "Groceries".into(),
        })
        .await?;

    let server_id = transport.todolists()[0].id.clone();
    assert_eq!(
        event,
        TodolistsAction::TodolistAdded {
            id: server_id.clone(),
            title: "Groceries".into()
        }
    );

    let state = app.snapshot().await;
    assert_eq!(
        state.todolists.items(),
        &[DomainTodolist {
            id: server_id.clone(),
            title: "Groceries".into(),
            filter: FilterValue::All,
        }]
    );
    assert_eq!(state.tasks.bucket(&server_id), Some(&[][..]));
    assert_eq!(state.tasks.bucket_count(), 1);
    Ok(())
}

#[tokio::test]
async fn create_task_puts_server_record_in_bucket() -> Result<(), AppError> {
    let (transport, app) = setup();
    let list = transport.seed_todolist("Groceries");
    app.execute(TodolistsAction::FetchTodolists).await?;

    app.execute(TodolistsAction::CreateTask {
        todolist_id: list.id.clone(),
        title: "Milk".into(),
    })
    .await?;

    let remote = transport.tasks(&list.id);
    let tasks = app.state(|s| s.tasks.tasks(&list.id).to_vec()).await;
    assert_eq!(tasks, remote);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Milk");
    assert_eq!(tasks[0].status, TaskStatus::New);
    assert_eq!(tasks[0].todo_list_id, list.id);
    Ok(())
}

#[tokio::test]
async fn update_of_missing_task_aborts_without_remote_call() -> Result<(), AppError> {
    let (transport, app) = setup();
    let (list_id, _) = loaded(&transport, &app).await?;
    let before = app.snapshot().await;
    let calls_before = transport.calls().len();

    let result = app
        .execute(TodolistsAction::UpdateTask {
            todolist_id: list_id.clone(),
            task_id: TaskId::new("T1"),
            patch: TaskPatch::new().status(TaskStatus::Completed),
        })
        .await;

    assert!(matches!(
        result,
        Err(AppError::Sync(SyncError::TaskNotFound { ref task_id, .. })) if *task_id == TaskId::new("T1")
    ));
    assert_eq!(transport.call_count(Operation::UpdateTask), 0);
    assert_eq!(transport.calls().len(), calls_before);
    assert_eq!(app.snapshot().await, before);
    Ok(())
}

#[tokio::test]
async fn failed_remove_leaves_both_containers_unchanged() -> Result<(), AppError> {
    let (transport, app) = setup();
    let (list_id, _) = loaded(&transport, &app).await?;
    let before = app.snapshot().await;
    transport.fail(
        Operation::DeleteTodolist,
        TransportError::RequestFailed("connection reset".into()),
    );

    let result = app
        .execute(TodolistsAction::RemoveTodolist { id: list_id.clone() })
        .await;

    assert!(matches!(result, Err(AppError::Sync(SyncError::Transport(_)))));
    let after = app.snapshot().await;
    assert_eq!(after, before);
    assert!(after.todolists.contains(&list_id));
    assert_eq!(after.tasks.tasks(&list_id).len(), 1);
    Ok(())
}

#[tokio::test]
async fn successful_remove_cascades_to_bucket() -> Result<(), AppError> {
    let (transport, app) = setup();
    let (list_id, _) = loaded(&transport, &app).await?;

    app.execute(TodolistsAction::RemoveTodolist { id: list_id.clone() })
        .await?;

    let state = app.snapshot().await;
    assert!(state.todolists.is_empty());
    assert!(!state.tasks.has_bucket(&list_id));
    assert!(transport.todolists().is_empty());
    Ok(())
}

#[tokio::test]
async fn remove_is_applied_only_after_acknowledgment() -> Result<(), AppError> {
    let (transport, app) = setup();
    let (list_id, _) = loaded(&transport, &app).await?;
    transport.set_latency(Operation::DeleteTodolist, Duration::from_millis(100));

    let mut handle = app
        .dispatch(TodolistsAction::RemoveTodolist { id: list_id.clone() })
        .await?;

    // Still in flight: nothing removed yet
    assert!(app.state(|s| s.todolists.contains(&list_id)).await);
    assert!(app.state(|s| s.tasks.has_bucket(&list_id)).await);

    handle
        .wait_with_timeout(Duration::from_secs(2))
        .await
        .map_err(AppError::Store)?;
    assert!(!app.state(|s| s.todolists.contains(&list_id)).await);
    Ok(())
}

#[tokio::test]
async fn rename_is_applied_only_after_acknowledgment() -> Result<(), AppError> {
    let (transport, app) = setup();
    let (list_id, _) = loaded(&transport, &app).await?;
    transport.set_latency(Operation::UpdateTodolist, Duration::from_millis(100));
    let title = |app: TodolistsApp, id: TodolistId| async move {
        app.state(|s| s.todolists.get(&id).map(|tl| tl.title.clone())).await
    };

    let rename = app.execute(TodolistsAction::UpdateTodolistTitle {
        id: list_id.clone(),
        title: "Weekly shop".into(),
    });
    let (outcome, in_flight) = tokio::join!(rename, async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        title(app.clone(), list_id.clone()).await
    });

    assert_eq!(in_flight.as_deref(), Some("Groceries"));
    assert_eq!(
        outcome?,
        TodolistsAction::TodolistTitleChanged {
            id: list_id.clone(),
            title: "Weekly shop".into(),
        }
    );
    assert_eq!(title(app.clone(), list_id).await.as_deref(), Some("Weekly shop"));
    assert_eq!(transport.todolists()[0].title, "Weekly shop");
    Ok(())
}

#[tokio::test]
async fn failed_rename_keeps_the_old_title() -> Result<(), AppError> {
    let (transport, app) = setup();
    let (list_id, _) = loaded(&transport, &app).await?;
    let before = app.snapshot().await;
    transport.fail(
        Operation::UpdateTodolist,
        TransportError::Rejected {
            result_code: 1,
            messages: vec!["Title too long".into()],
        },
    );

    let result = app
        .execute(TodolistsAction::UpdateTodolistTitle {
            id: list_id,
            title: "x".repeat(101),
        })
        .await;

    assert!(matches!(
        result,
        Err(AppError::Sync(SyncError::Transport(TransportError::Rejected { .. })))
    ));
    assert_eq!(app.snapshot().await, before);
    assert_eq!(transport.todolists()[0].title, "Groceries");
    Ok(())
}

#[tokio::test]
async fn remove_task_drops_it_after_acknowledgment() -> Result<(), AppError> {
    let (transport, app) = setup();
    let (list_id, task_id) = loaded(&transport, &app).await?;
    let kept = transport.seed_task(&list_id, "Eggs");
    app.execute(TodolistsAction::FetchTasks {
        todolist_id: list_id.clone(),
    })
    .await?;
    transport.set_latency(Operation::DeleteTask, Duration::from_millis(100));

    let mut handle = app
        .dispatch(TodolistsAction::RemoveTask {
            todolist_id: list_id.clone(),
            task_id: task_id.clone(),
        })
        .await?;
    assert!(app.state(|s| selectors::task(s, &list_id, &task_id).is_some()).await);

    handle
        .wait_with_timeout(Duration::from_secs(2))
        .await
        .map_err(AppError::Store)?;

    let ids: Vec<TaskId> = app
        .state(|s| s.tasks.tasks(&list_id).iter().map(|t| t.id.clone()).collect())
        .await;
    assert_eq!(ids, vec![kept.id]);
    assert_eq!(transport.tasks(&list_id).len(), 1);
    Ok(())
}

#[tokio::test]
async fn failed_task_removal_leaves_the_bucket_alone() -> Result<(), AppError> {
    let (transport, app) = setup();
    let (list_id, task_id) = loaded(&transport, &app).await?;
    let before = app.snapshot().await;
    transport.fail(
        Operation::DeleteTask,
        TransportError::Api {
            status: 500,
            message: "boom".into(),
        },
    );

    let result = app
        .execute(TodolistsAction::RemoveTask {
            todolist_id: list_id.clone(),
            task_id: task_id.clone(),
        })
        .await;

    assert!(matches!(
        result,
        Err(AppError::Sync(SyncError::Transport(TransportError::Api { status: 500, .. })))
    ));
    assert_eq!(app.snapshot().await, before);
    assert!(app.state(|s| selectors::task(s, &list_id, &task_id).is_some()).await);
    Ok(())
}

#[tokio::test]
async fn update_task_sends_full_record_and_applies_patch() -> Result<(), AppError> {
    let (transport, app) = setup();
    let (list_id, task_id) = loaded(&transport, &app).await?;
    let before = app
        .state(|s| selectors::task(s, &list_id, &task_id).cloned())
        .await;

    app.execute(TodolistsAction::UpdateTask {
        todolist_id: list_id.clone(),
        task_id: task_id.clone(),
        patch: TaskPatch::new().status(TaskStatus::Completed),
    })
    .await?;

    let sent = transport.last_update(&task_id);
    assert_eq!(sent.as_ref().map(|m| m.title.as_str()), Some("Milk"));
    assert_eq!(sent.as_ref().map(|m| m.status), Some(TaskStatus::Completed));

    let after = app
        .state(|s| selectors::task(s, &list_id, &task_id).cloned())
        .await;
    let (Some(mut before), Some(after)) = (before, after) else {
        panic!("task vanished");
    };
    assert_eq!(after.status, TaskStatus::Completed);
    before.status = TaskStatus::Completed;
    assert_eq!(after, before);
    Ok(())
}

#[tokio::test]
async fn stale_completion_wins_for_same_task() -> Result<(), AppError> {
    let (transport, app) = setup();
    let (list_id, task_id) = loaded(&transport, &app).await?;

    // First update is slow, second is fast: completion order is reversed
    transport.queue_latency(Operation::UpdateTask, Duration::from_millis(150));
    transport.queue_latency(Operation::UpdateTask, Duration::ZERO);

    let mut first = app
        .dispatch(TodolistsAction::UpdateTask {
            todolist_id: list_id.clone(),
            task_id: task_id.clone(),
            patch: TaskPatch::new().title("Oat milk"),
        })
        .await?;
    let mut second = app
        .dispatch(TodolistsAction::UpdateTask {
            todolist_id: list_id.clone(),
            task_id: task_id.clone(),
            patch: TaskPatch::new().title("Soy milk"),
        })
        .await?;

    second.wait().await;
    let title = app
        .state(|s| selectors::task(s, &list_id, &task_id).map(|t| t.title.clone()))
        .await;
    assert_eq!(title.as_deref(), Some("Soy milk"));

    first.wait().await;
    let title = app
        .state(|s| selectors::task(s, &list_id, &task_id).map(|t| t.title.clone()))
        .await;
    assert_eq!(title.as_deref(), Some("Oat milk"));
    Ok(())
}

#[tokio::test]
async fn late_task_creation_after_list_removal_is_dropped() -> Result<(), AppError> {
    let (transport, app) = setup();
    let (list_id, _) = loaded(&transport, &app).await?;
    transport.set_latency(Operation::CreateTask, Duration::from_millis(100));

    let mut create = app
        .dispatch(TodolistsAction::CreateTask {
            todolist_id: list_id.clone(),
            title: "Bread".into(),
        })
        .await?;
    // Local removal while the create is still in flight
    app.dispatch(TodolistsAction::TodolistRemoved { id: list_id.clone() })
        .await?;

    create.wait().await;
    let state = app.snapshot().await;
    assert!(!state.tasks.has_bucket(&list_id));
    assert_eq!(state.tasks.bucket_count(), 0);
    Ok(())
}

#[tokio::test]
async fn concurrent_fetches_fill_every_bucket() -> Result<(), AppError> {
    let (transport, app) = setup();
    let slow = transport.seed_todolist("Slow");
    let fast = transport.seed_todolist("Fast");
    transport.seed_task(&slow.id, "a");
    transport.seed_task(&fast.id, "b");
    app.execute(TodolistsAction::FetchTodolists).await?;

    transport.queue_latency(Operation::ListTasks, Duration::from_millis(100));
    let mut handles = Vec::new();
    for id in [&slow.id, &fast.id] {
        handles.push(
            app.dispatch(TodolistsAction::FetchTasks {
                todolist_id: id.clone(),
            })
            .await?,
        );
    }
    for handle in &mut handles {
        handle.wait().await;
    }

    let state = app.snapshot().await;
    assert_eq!(state.tasks.tasks(&slow.id).len(), 1);
    assert_eq!(state.tasks.tasks(&fast.id).len(), 1);
    Ok(())
}

#[tokio::test]
async fn filter_change_is_local_only() -> Result<(), AppError> {
    let (transport, app) = setup();
    let (list_id, task_id) = loaded(&transport, &app).await?;
    let calls_before = transport.calls().len();

    app.dispatch(TodolistsAction::TodolistFilterChanged {
        id: list_id.clone(),
        filter: FilterValue::Completed,
    })
    .await?;

    assert!(app.state(|s| selectors::visible_tasks(s, &list_id).is_empty()).await);
    app.execute(TodolistsAction::UpdateTask {
        todolist_id: list_id.clone(),
        task_id,
        patch: TaskPatch::new().status(TaskStatus::Completed),
    })
    .await?;
    assert_eq!(app.state(|s| selectors::visible_tasks(s, &list_id).len()).await, 1);
    assert_eq!(transport.calls().len(), calls_before + 1);
    Ok(())
}

#[tokio::test]
async fn failures_are_observable_on_the_action_stream() -> Result<(), AppError> {
    let (transport, app) = setup();
    transport.fail(Operation::CreateTodolist, TransportError::Unauthorized);
    let mut actions = app.subscribe();

    let mut handle = app
        .dispatch(TodolistsAction::CreateTodolist {
            title: "Groceries".into(),
        })
        .await?;
    handle.wait().await;

    let observed = actions.try_recv().ok();
    assert!(matches!(
        observed,
        Some(TodolistsAction::SyncFailed {
            error: SyncError::Transport(TransportError::Unauthorized),
            ..
        })
    ));
    assert_eq!(app.snapshot().await, AppState::new());
    Ok(())
}

#[tokio::test]
async fn shutdown_drains_in_flight_calls() -> Result<(), AppError> {
    let (transport, app) = setup();
    transport.set_latency(Operation::CreateTodolist, Duration::from_millis(100));

    let _handle = app
        .dispatch(TodolistsAction::CreateTodolist {
            title: "Groceries".into(),
        })
        .await?;
    app.shutdown(Duration::from_secs(2)).await?;

    assert_eq!(app.state(|s| s.todolists.len()).await, 1);
    assert!(matches!(
        app.dispatch(TodolistsAction::FetchTodolists).await,
        Err(AppError::Store(_))
    ));
    Ok(())
}
