//! A counter driven through a key map on a layered input stack.
//!
//! Run with: `cargo run --example counter`
//!
//! * `up` / `down` adjust the counter, `t` starts a background tick command.
//! * `h` opens an opaque help dialog that traps focus until `esc`.
//! * `q` quits.

use matcha::input::{InputStack, KeyMap, LayerId, LayerOptions};
use matcha::{App, Command, Event, RunOptions};

#[derive(Clone)]
enum Msg {
    Ticked,
}

#[derive(Clone, PartialEq)]
enum Action {
    Increment,
    Decrement,
    StartTick,
    OpenHelp,
    CloseHelp,
    Quit,
}

struct Counter {
    count: i64,
    ticks: u64,
    stack: InputStack<Action>,
    help_layer: Option<LayerId>,
}

fn base_keys() -> KeyMap<Action> {
    let mut keys = KeyMap::new();
    keys.group("counter", |keys| {
        keys.bind("up", "Increment", Action::Increment)?;
        keys.bind("down", "Decrement", Action::Decrement)?;
        keys.bind("t", "Start ticking", Action::StartTick)?;
        Ok(())
    })
    .and_then(|keys| keys.bind("h", "Help", Action::OpenHelp))
    .and_then(|keys| keys.bind("q", "Quit", Action::Quit))
    .expect("static bindings are well-formed");
    keys
}

fn help_keys() -> KeyMap<Action> {
    let mut keys = KeyMap::new();
    keys.bind("esc", "Close help", Action::CloseHelp)
        .expect("static bindings are well-formed");
    keys
}

impl App for Counter {
    type Message = Msg;

    fn init() -> (Self, Vec<Command<Msg>>) {
        let mut stack = InputStack::new();
        stack.push(base_keys(), LayerOptions::named("base").passthrough());
        (
            Counter {
                count: 0,
                ticks: 0,
                stack,
                help_layer: None,
            },
            vec![],
        )
    }

    fn update(&mut self, event: Event<Msg>) -> Vec<Command<Msg>> {
        match event {
            Event::Key(key) => match self.stack.dispatch(&key) {
                Some(Action::Increment) => self.count += 1,
                Some(Action::Decrement) => self.count -= 1,
                Some(Action::StartTick) => {
                    return vec![Command::tick(std::time::Duration::from_secs(1), |_| {
                        Msg::Ticked
                    })];
                }
                Some(Action::OpenHelp) => {
                    if self.help_layer.is_none() {
                        self.help_layer =
                            Some(self.stack.push(help_keys(), LayerOptions::named("help")));
                    }
                }
                Some(Action::CloseHelp) => {
                    if let Some(id) = self.help_layer.take() {
                        self.stack.remove(id);
                    }
                }
                Some(Action::Quit) => return vec![Command::quit()],
                None => {}
            },
            Event::App(Msg::Ticked) => self.ticks += 1,
            _ => {}
        }
        vec![]
    }

    fn view(&self) -> String {
        if self.help_layer.is_some() {
            return "Help: up/down count, t tick, q quit.\nPress esc to close.".into();
        }
        format!(
            "Count: {}  (ticks: {})\nKeys: up down t h q",
            self.count, self.ticks
        )
    }
}

#[tokio::main]
async fn main() -> Result<(), matcha::RuntimeError> {
    matcha::run_with::<Counter>(RunOptions::default()).await?;
    Ok(())
}
