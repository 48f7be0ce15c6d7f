use store_abstractions::{Action, Dispatcher};
use store_macros::handlers;

pub struct Totals {
    pub seen: usize,
}

pub struct Watcher;

#[handlers]
impl Watcher {
    #[reduce]
    fn count(&self, state: &Totals, _action: &Action) -> Totals {
        Totals {
            seen: state.seen + 1,
        }
    }

    #[effect_method]
    fn echo(&self, _action: &Action, _dispatcher: &dyn Dispatcher) {}
}

fn main() {}
