//! Shared fixtures for the reroll test suites.
//! This module exists to avoid repeating game bootstrap and load sequencing across tests.
//! It does not own production reroll logic.

use std::cell::RefCell;
use std::rc::Rc;

use super::controller::RerollController;
use crate::host::{Defs, Host, NewGameConfig};
use crate::settings::RerollSettings;
use crate::types::RerollEvent;

/// A loaded game with its controller initialised by the first session load.
pub(crate) fn booted_game(settings: RerollSettings) -> (Host, RerollController) {
    let mut host = Host::new_game(&NewGameConfig::default(), Defs::new(Some(settings)));
    host.complete_loading().expect("new game has init data");
    let mut controller = RerollController::new();
    controller.on_session_loaded(&mut host).expect("settings loaded");
    (host, controller)
}

pub(crate) fn record_events(controller: &mut RerollController) -> Rc<RefCell<Vec<RerollEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    controller.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    events
}

/// Drives the host through the queued generation and hands the new session back.
pub(crate) fn finish_loading(host: &mut Host, controller: &mut RerollController) {
    host.complete_loading().expect("reroll staged init data");
    controller.on_session_loaded(host).expect("settings loaded");
}
