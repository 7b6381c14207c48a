//! Then steps for board synchronisation BDD scenarios.

use super::world::{BoardSyncWorld, parse_status};
use gorex::board::domain::{Settlement, TransitionDispatch};
use gorex::task::domain::Task;
use rstest_bdd_macros::then;

#[then(r#"the task "{title}" shows "{status}""#)]
fn task_shows(world: &BoardSyncWorld, title: String, status: String) -> Result<(), eyre::Report> {
    let expected = parse_status(&status)?;
    let task_id = world.task_id(&title)?;
    let shown = world
        .controller
        .board()
        .task(task_id)
        .map(Task::status)
        .ok_or_else(|| eyre::eyre!("task {title:?} left the board"))?;
    if shown != expected {
        return Err(eyre::eyre!("expected {title:?} in {expected}, found {shown}"));
    }
    Ok(())
}

#[then("no request is sent")]
fn no_request_sent(world: &BoardSyncWorld) -> Result<(), eyre::Report> {
    if !matches!(world.last_dispatch, Some(TransitionDispatch::Unchanged)) {
        return Err(eyre::eyre!("expected an unchanged dispatch, got {:?}", world.last_dispatch));
    }
    if world.controller.pending_requests() != 0 || world.gateway.calls() != 0 {
        return Err(eyre::eyre!("a request reached the gateway"));
    }
    Ok(())
}

#[then("{count:usize} request is in flight")]
fn one_request_in_flight(world: &BoardSyncWorld, count: usize) -> Result<(), eyre::Report> {
    requests_in_flight(world, count)
}

#[then("{count:usize} requests are in flight")]
fn requests_in_flight(world: &BoardSyncWorld, count: usize) -> Result<(), eyre::Report> {
    let pending = world.controller.board().in_flight().len();
    if pending != count {
        return Err(eyre::eyre!("expected {count} in-flight requests, found {pending}"));
    }
    Ok(())
}

fn last_settlement(world: &BoardSyncWorld) -> Result<Settlement, eyre::Report> {
    world
        .last_settlement
        .map(|(_, settlement)| settlement)
        .ok_or_else(|| eyre::eyre!("nothing has settled yet"))
}

#[then(r#"the last settlement rolls back to "{status}""#)]
fn settlement_rolls_back(world: &BoardSyncWorld, status: String) -> Result<(), eyre::Report> {
    let expected = parse_status(&status)?;
    match last_settlement(world)? {
        Settlement::Reverted { restored, .. } if restored == expected => Ok(()),
        other => Err(eyre::eyre!("expected a rollback to {expected}, got {other:?}")),
    }
}

#[then("the last settlement is a confirmation")]
fn settlement_confirmed(world: &BoardSyncWorld) -> Result<(), eyre::Report> {
    match last_settlement(world)? {
        Settlement::Confirmed => Ok(()),
        other => Err(eyre::eyre!("expected a confirmation, got {other:?}")),
    }
}

#[then("the last settlement is superseded")]
fn settlement_superseded(world: &BoardSyncWorld) -> Result<(), eyre::Report> {
    match last_settlement(world)? {
        Settlement::Superseded { .. } => Ok(()),
        other => Err(eyre::eyre!("expected a superseded failure, got {other:?}")),
    }
}

#[then("the move is denied")]
fn move_denied(world: &BoardSyncWorld) -> Result<(), eyre::Report> {
    if !matches!(world.last_dispatch, Some(TransitionDispatch::Denied)) {
        return Err(eyre::eyre!("expected a denied dispatch, got {:?}", world.last_dispatch));
    }
    Ok(())
}

#[then(r#"the "{status}" column lists "{titles}""#)]
fn column_lists(world: &BoardSyncWorld, status: String, titles: String) -> Result<(), eyre::Report> {
    let column = parse_status(&status)?;
    let columns = world.controller.columns();
    let shown: Vec<&str> = columns
        .column(column)
        .iter()
        .map(|task| task.title().as_str())
        .collect();
    let expected: Vec<&str> = titles.split(',').map(str::trim).collect();
    if shown != expected {
        return Err(eyre::eyre!("expected {column} to list {expected:?}, found {shown:?}"));
    }
    Ok(())
}

#[then(r#"the "{status}" column is empty"#)]
fn column_empty(world: &BoardSyncWorld, status: String) -> Result<(), eyre::Report> {
    let column = parse_status(&status)?;
    let count = world.controller.columns().column(column).len();
    if count != 0 {
        return Err(eyre::eyre!("expected {column} to be empty, found {count} tasks"));
    }
    Ok(())
}
