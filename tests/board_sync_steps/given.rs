//! Given steps for board synchronisation BDD scenarios.

use super::world::{BoardSyncWorld, parse_status};
use gorex::board::{
    domain::{BoardIntent, OptimisticBoard},
    services::BoardSyncController,
};
use rstest_bdd_macros::given;
use std::sync::Arc;

#[given(r#"a board with task "{title}" in "{status}""#)]
fn board_with_task(
    world: &mut BoardSyncWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let task = world.stored_task(&title, parse_status(&status)?)?;
    world.gateway.track(&task)?;
    world.titles.insert(title, task.id());
    world.controller.apply(BoardIntent::Insert(task));
    Ok(())
}

#[given("the viewer is not a project member")]
fn viewer_is_outsider(world: &mut BoardSyncWorld) {
    let tasks = world.controller.board().tasks().to_vec();
    world.controller =
        BoardSyncController::new(OptimisticBoard::new(tasks, false), Arc::clone(&world.gateway));
}
