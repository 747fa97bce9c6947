use crate::reducer::{Action, AppState, reduce};
use tokio::sync::watch;

#[derive(Debug)]
pub struct Store {
    state: watch::Sender<AppState>,
}

impl Store {
    pub fn new(initial: AppState) -> Self {
        let (state, _) = watch::channel(initial);
        Self { state }
    }

    pub fn dispatch(&self, action: Action) -> AppState {
        let mut next = AppState::default();
        self.state.send_modify(|state| {
            *state = reduce(std::mem::take(state), action);
            next = state.clone();
        });
        next
    }

    pub fn snapshot(&self) -> AppState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }
}
