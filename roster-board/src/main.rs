//! Roster Board demo: scripted session against an in-memory store.
//!
//! Usage: `roster-board [config.json]`. Set `RUST_LOG=debug` to see the
//! sync and reconciliation traffic.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use log::info;
use roster_board::{BoardConfig, ColumnLayout, MembershipBoard};
use roster_core::{Actor, Group};
use roster_drag::{ContainerId, Direction};
use roster_sync::InMemoryStore;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => BoardConfig::from_path(path)?,
        None => BoardConfig::default(),
    };

    let ada = Actor::human("Ada", "Lovelace");
    let grace = Actor::human("Grace", "Hopper");
    let alan = Actor::human("Alan", "Turing");
    let hall = Actor::location("Main Hall");
    let edsger = Actor::human("Edsger", "Dijkstra");

    let group = Group::new("Compilers")
        .with_description("People who write them")
        .with_members(vec![ada.id]);
    let store = Arc::new(
        InMemoryStore::new(
            vec![
                ada.clone(),
                grace.clone(),
                alan.clone(),
                hall.clone(),
                edsger.clone(),
            ],
            vec![group.clone()],
        )
        .with_latency(Duration::from_millis(20)),
    );

    let mut board = MembershipBoard::with_store(group.id, store.clone(), config);
    board.load().await?;
    let layout = ColumnLayout::default();
    board.layout_with(&layout);
    info!("loaded:   {}", board.render());

    // Pointer drag: Grace from available into members.
    let from = layout.row(ContainerId::Available, 0).center();
    board.pointer_down(grace.id, from);
    board.pointer_move(from.offset(-20.0, 4.0));
    if let Some(pending) = board.pointer_up(layout.column(ContainerId::Members).center()) {
        info!("dragged:  {}", board.view());
        pending.wait().await?;
    }
    board.layout_with(&layout);
    info!("synced:   {}", board.render());

    // Row button: remove Ada.
    if let Some(pending) = board.remove_member(ada.id) {
        pending.wait().await?;
    }
    info!("removed:  {}", board.render());

    // Filter the available column.
    board.set_filter("tur");
    board.layout_with(&layout);
    info!("filtered: {}", board.view());

    // Keyboard drag: Alan across to members.
    if board.key_activate(alan.id) {
        for _ in 0..13 {
            board.key_move(Direction::Left);
        }
        if let Some(pending) = board.key_commit() {
            pending.wait().await?;
        }
    }
    board.set_filter("");
    board.layout_with(&layout);
    info!("keyboard: {}", board.render());

    // A rejected call snaps the optimistic move back.
    store.fail_next(1);
    if let Some(pending) = board.add_member(edsger.id) {
        info!("optimistic: {}", board.view());
        if let Err(e) = pending.wait().await {
            info!("add rejected: {e}");
        }
    }
    info!("reverted: {}", board.render());

    Ok(())
}
