//! When steps for board synchronisation BDD scenarios.

use super::world::{BoardSyncWorld, Reply, parse_status, run_async};
use gorex::board::domain::TransitionDispatch;
use gorex::failure::FailureCause;
use gorex::task::domain::TaskStatus;
use rstest_bdd_macros::when;

#[when(r#"the task "{title}" is moved to "{status}""#)]
fn move_task(world: &mut BoardSyncWorld, title: String, status: String) -> Result<(), eyre::Report> {
    let target = parse_status(&status)?;
    let task_id = world.task_id(&title)?;
    let sender = world.gateway.expect_move(target)?;
    let dispatch = world.controller.request_transition(task_id, target);
    if matches!(dispatch, TransitionDispatch::Applied(_)) {
        world.replies.insert(target, sender);
    } else {
        world.gateway.forget_move(target)?;
    }
    world.last_dispatch = Some(dispatch);
    Ok(())
}

fn answer(
    world: &mut BoardSyncWorld,
    status: &str,
    reply: impl FnOnce(TaskStatus) -> Reply,
) -> Result<(), eyre::Report> {
    let target = parse_status(status)?;
    let sender = world
        .replies
        .remove(&target)
        .ok_or_else(|| eyre::eyre!("no move to {target} is waiting for the server"))?;
    sender
        .send(reply(target))
        .map_err(|_| eyre::eyre!("gateway stopped waiting for the move to {target}"))?;
    let settled = run_async(world.controller.settle_next())
        .ok_or_else(|| eyre::eyre!("no request settled"))?;
    world.last_settlement = Some(settled);
    Ok(())
}

#[when(r#"the server confirms the move to "{status}""#)]
fn server_confirms(world: &mut BoardSyncWorld, status: String) -> Result<(), eyre::Report> {
    answer(world, &status, Ok)
}

#[when(r#"the server rejects the move to "{status}""#)]
fn server_rejects(world: &mut BoardSyncWorld, status: String) -> Result<(), eyre::Report> {
    answer(world, &status, |_| Err(FailureCause::Server))
}
