use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use tracing::{error, trace};

use super::event::{AppError, Event};

type TaskFn = Box<dyn FnOnce() -> Option<Event> + Send + 'static>;

/// Deferred work that produces at most one event when it completes.
/// Command bodies only read external services; model state is mutated by
/// the event loop alone.
pub enum Command {
    /// Deliver an event without doing any work
    Emit(Event),
    /// Run off the UI loop (network calls)
    Task(TaskFn),
    /// Deliver `event` after `after` has elapsed
    Tick { after: Duration, event: Event },
    /// Start all at once; completions interleave in any order
    Batch(Vec<Command>),
    /// Each step starts only after the previous step's event was dispatched
    Sequence(Vec<Command>),
    /// Stop the program after the next render
    Quit,
}

impl Command {
    pub fn emit(event: Event) -> Self {
        Command::Emit(event)
    }

    pub fn task<F>(f: F) -> Self
    where
        F: FnOnce() -> Option<Event> + Send + 'static,
    {
        Command::Task(Box::new(f))
    }

    /// Batch of the present commands; `None` when there are none
    pub fn batch(commands: impl IntoIterator<Item = Option<Command>>) -> Option<Command> {
        let mut commands: Vec<Command> = commands.into_iter().flatten().collect();
        match commands.len() {
            0 => None,
            1 => commands.pop(),
            _ => Some(Command::Batch(commands)),
        }
    }

    /// Sequence of the present commands; `None` when there are none
    pub fn sequence(commands: impl IntoIterator<Item = Option<Command>>) -> Option<Command> {
        let mut commands: Vec<Command> = commands.into_iter().flatten().collect();
        match commands.len() {
            0 => None,
            1 => commands.pop(),
            _ => Some(Command::Sequence(commands)),
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Emit(event) => f.debug_tuple("Emit").field(event).finish(),
            Command::Task(_) => f.write_str("Task(..)"),
            Command::Tick { after, event } => f
                .debug_struct("Tick")
                .field("after", after)
                .field("event", event)
                .finish(),
            Command::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Command::Sequence(cmds) => f.debug_tuple("Sequence").field(cmds).finish(),
            Command::Quit => f.write_str("Quit"),
        }
    }
}

type JoinId = u64;

/// Waits for `remaining` deliveries, then runs `next` (or releases `parent`)
struct Join {
    remaining: usize,
    next: Option<Command>,
    parent: Option<JoinId>,
}

/// A completed unit of work on its way back to the loop
struct Envelope {
    event: Option<Event>,
    join: Option<JoinId>,
}

/// How `Task` and `Tick` commands are carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeMode {
    /// Tasks on worker threads, ticks after a real delay
    Threaded,
    /// Tasks run synchronously, ticks deliver immediately
    Inline,
}

/// Executes commands and feeds their events back to the single-threaded
/// loop, one at a time, through a channel.
pub struct Runtime {
    mode: RuntimeMode,
    tx: Sender<Envelope>,
    rx: Receiver<Envelope>,
    joins: HashMap<JoinId, Join>,
    next_join: JoinId,
    quit: bool,
}

impl Runtime {
    pub fn new(mode: RuntimeMode) -> Self {
        let (tx, rx) = mpsc::channel();
        Runtime {
            mode,
            tx,
            rx,
            joins: HashMap::new(),
            next_join: 0,
            quit: false,
        }
    }

    pub fn threaded() -> Self {
        Self::new(RuntimeMode::Threaded)
    }

    pub fn inline() -> Self {
        Self::new(RuntimeMode::Inline)
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Number of batches/sequences still waiting on deliveries
    #[cfg(test)]
    pub fn pending_joins(&self) -> usize {
        self.joins.len()
    }

    pub fn execute(&mut self, command: Command) {
        self.run(command, None);
    }

    /// Dispatch one delivered event through `handler`, execute whatever it
    /// returns, then release the delivery's join. Returns false when
    /// nothing was waiting.
    pub fn pump<F>(&mut self, mut handler: F) -> bool
    where
        F: FnMut(Event) -> Option<Command>,
    {
        let Ok(envelope) = self.rx.try_recv() else {
            return false;
        };
        if let Some(event) = envelope.event
            && let Some(command) = handler(event)
        {
            self.execute(command);
        }
        self.settle(envelope.join);
        true
    }

    /// Pump until the queue is empty. Only terminates in inline mode once
    /// the handlers stop producing work.
    pub fn drain<F>(&mut self, mut handler: F)
    where
        F: FnMut(Event) -> Option<Command>,
    {
        while self.pump(&mut handler) {}
    }

    fn run(&mut self, command: Command, join: Option<JoinId>) {
        match command {
            Command::Emit(event) => self.deliver(Some(event), join),
            Command::Task(f) => match self.mode {
                RuntimeMode::Inline => {
                    let event = run_task(f);
                    self.deliver(event, join);
                }
                RuntimeMode::Threaded => {
                    let tx = self.tx.clone();
                    thread::spawn(move || {
                        let event = run_task(f);
                        let _ = tx.send(Envelope { event, join });
                    });
                }
            },
            Command::Tick { after, event } => match self.mode {
                RuntimeMode::Inline => self.deliver(Some(event), join),
                RuntimeMode::Threaded => {
                    let tx = self.tx.clone();
                    thread::spawn(move || {
                        thread::sleep(after);
                        let _ = tx.send(Envelope {
                            event: Some(event),
                            join,
                        });
                    });
                }
            },
            Command::Batch(commands) => {
                if commands.is_empty() {
                    self.deliver(None, join);
                    return;
                }
                let id = self.open_join(commands.len(), None, join);
                for command in commands {
                    self.run(command, Some(id));
                }
            }
            Command::Sequence(mut commands) => {
                if commands.is_empty() {
                    self.deliver(None, join);
                    return;
                }
                let first = commands.remove(0);
                let next = if commands.is_empty() {
                    None
                } else {
                    Some(Command::Sequence(commands))
                };
                let id = self.open_join(1, next, join);
                self.run(first, Some(id));
            }
            Command::Quit => {
                self.quit = true;
                self.deliver(None, join);
            }
        }
    }

    fn deliver(&self, event: Option<Event>, join: Option<JoinId>) {
        if let Some(event) = &event {
            trace!(kind = event.kind(), "event queued");
        }
        // The runtime holds the receiver, so sending cannot fail
        let _ = self.tx.send(Envelope { event, join });
    }

    fn open_join(&mut self, remaining: usize, next: Option<Command>, parent: Option<JoinId>) -> JoinId {
        let id = self.next_join;
        self.next_join += 1;
        self.joins.insert(
            id,
            Join {
                remaining,
                next,
                parent,
            },
        );
        id
    }

    fn settle(&mut self, join: Option<JoinId>) {
        let Some(id) = join else {
            return;
        };
        let finished = match self.joins.get_mut(&id) {
            Some(pending) => {
                pending.remaining -= 1;
                pending.remaining == 0
            }
            None => false,
        };
        if !finished {
            return;
        }
        if let Some(done) = self.joins.remove(&id) {
            match done.next {
                Some(next) => self.run(next, done.parent),
                None => self.settle(done.parent),
            }
        }
    }
}

/// A panicking task still settles its join, as an error event
fn run_task(f: TaskFn) -> Option<Event> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_default();
        error!(reason = %reason, "background task panicked");
        Some(Event::Error(AppError::invalid("background task failed")))
    })
}
