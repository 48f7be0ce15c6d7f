use store_abstractions::{Action, Dispatcher, Effect, FeatureDefinition, Middleware, Reducer};
use store_macros::{effect, handlers, middleware, reducer, store_feature};

pub struct TodoState {
    pub items: Vec<String>,
}

pub struct AddTodo(pub String);

#[store_feature]
pub struct TodoFeature;

impl FeatureDefinition for TodoFeature {
    type State = TodoState;

    fn name(&self) -> &str {
        "Todo"
    }

    fn initial_state(&self) -> TodoState {
        TodoState { items: Vec::new() }
    }
}

#[reducer]
pub struct ClearReducer;

impl Reducer for ClearReducer {
    type State = TodoState;

    fn reduce(&self, _state: &TodoState, _action: &Action) -> Option<TodoState> {
        None
    }
}

#[effect]
pub enum SyncEffect {
    Remote,
    Local,
}

impl Effect for SyncEffect {
    fn handle(&self, _action: &Action, _dispatcher: &dyn Dispatcher) {}
}

#[middleware(auto_load)]
pub struct AuditMiddleware;

impl Middleware for AuditMiddleware {}

pub struct TodoHandlers;

#[handlers]
impl TodoHandlers {
    #[reduce]
    fn add(&self, state: &TodoState, action: &AddTodo) -> TodoState {
        let mut items = state.items.clone();
        items.push(action.0.clone());
        TodoState { items }
    }

    fn helper(&self) -> usize {
        0
    }
}

#[handlers]
impl TodoHandlers {
    #[effect_method]
    fn persist(&self, _action: &AddTodo, _dispatcher: &dyn Dispatcher) {}
}

fn main() {
    let _ = TodoHandlers.helper();
}
