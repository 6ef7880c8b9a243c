//! Ordering and failure behaviour of the message bus.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use messagebus::{
    Bootstrap, BusError, CommandHandler, Dependencies, EventBuffers, EventHandler, Inject,
    Message, MessageKind, MessageSet, Routable,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CommandKind {
    Start,
    Split,
}

impl MessageKind for CommandKind {
    const ALL: &'static [Self] = &[CommandKind::Start, CommandKind::Split];

    fn name(&self) -> &'static str {
        match self {
            CommandKind::Start => "Start",
            CommandKind::Split => "Split",
        }
    }
}

#[derive(Debug)]
enum Command {
    Start,
    Split,
}

impl Routable for Command {
    type Kind = CommandKind;

    fn kind(&self) -> CommandKind {
        match self {
            Command::Start => CommandKind::Start,
            Command::Split => CommandKind::Split,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Event {
    A,
    B,
    C,
    D,
    Audit,
    Broken,
}

impl MessageKind for Event {
    const ALL: &'static [Self] = &[
        Event::A,
        Event::B,
        Event::C,
        Event::D,
        Event::Audit,
        Event::Broken,
    ];

    fn name(&self) -> &'static str {
        match self {
            Event::A => "A",
            Event::B => "B",
            Event::C => "C",
            Event::D => "D",
            Event::Audit => "Audit",
            Event::Broken => "Broken",
        }
    }
}

impl Routable for Event {
    type Kind = Event;

    fn kind(&self) -> Event {
        *self
    }
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Bus(#[from] BusError),
    #[error("handler refused {0}")]
    Refused(&'static str),
}

struct App;

impl MessageSet for App {
    type Command = Command;
    type Event = Event;
    type Output = &'static str;
    type Error = AppError;
}

#[derive(Clone, Default)]
struct Trace(Arc<Mutex<Vec<&'static str>>>);

impl Trace {
    fn push(&self, entry: &'static str) {
        self.0.lock().unwrap().push(entry);
    }

    fn entries(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }
}

struct StartHandler {
    trace: Trace,
}

impl Inject for StartHandler {
    fn inject(dependencies: &Dependencies) -> Result<Self, BusError> {
        Ok(Self {
            trace: dependencies.resolve()?,
        })
    }
}

#[async_trait]
impl CommandHandler<App> for StartHandler {
    async fn handle(
        &self,
        command: Command,
        events: &mut EventBuffers<Event>,
    ) -> Result<&'static str, AppError> {
        self.trace.push(command.kind().name());
        match command {
            Command::Start => {
                events.domain.add_event(Event::A);
                events.domain.add_event(Event::B);
            }
            Command::Split => {
                events.infra.add_event(Event::Audit);
                events.domain.add_event(Event::A);
                events.domain.add_event(Event::Broken);
            }
        }
        Ok("done")
    }
}

/// Records the event and emits the follow-up for A and B.
struct Chain {
    trace: Trace,
}

impl Inject for Chain {
    fn inject(dependencies: &Dependencies) -> Result<Self, BusError> {
        Ok(Self {
            trace: dependencies.resolve()?,
        })
    }
}

#[async_trait]
impl EventHandler<App> for Chain {
    async fn handle(&self, event: &Event, events: &mut EventBuffers<Event>) -> Result<(), AppError> {
        self.trace.push(event.name());
        match event {
            Event::A => events.domain.add_event(Event::D),
            Event::B => events.domain.add_event(Event::C),
            Event::Broken => return Err(AppError::Refused("Broken")),
            _ => {}
        }
        Ok(())
    }
}

struct Second {
    trace: Trace,
}

impl Inject for Second {
    fn inject(dependencies: &Dependencies) -> Result<Self, BusError> {
        Ok(Self {
            trace: dependencies.resolve()?,
        })
    }
}

#[async_trait]
impl EventHandler<App> for Second {
    async fn handle(&self, _event: &Event, _events: &mut EventBuffers<Event>) -> Result<(), AppError> {
        self.trace.push("second");
        Ok(())
    }
}

fn bootstrap(trace: &Trace) -> Bootstrap<App> {
    Bootstrap::new(Dependencies::new().with(trace.clone()))
        .command::<StartHandler>(CommandKind::Start)
        .command::<StartHandler>(CommandKind::Split)
        .event_for_all::<Chain>(Event::ALL)
}

#[tokio::test]
async fn produced_events_expand_breadth_first() {
    let trace = Trace::default();
    let mut bus = bootstrap(&trace).messagebus().unwrap();

    let result = bus.dispatch(Command::Start).await.unwrap();

    assert_eq!(result, "done");
    assert_eq!(trace.entries(), vec!["Start", "A", "B", "D", "C"]);
}

#[tokio::test]
async fn domain_events_drain_before_infra_events() {
    let trace = Trace::default();
    let bootstrap = Bootstrap::<App>::new(Dependencies::new().with(trace.clone()))
        .command::<StartHandler>(CommandKind::Split)
        .event::<Chain>(Event::A)
        .event::<Chain>(Event::Audit);
    let mut bus = bootstrap.messagebus().unwrap();

    bus.handle(Message::Command(Command::Split)).await.unwrap();

    // Broken has no handler in this table, so it is dropped silently.
    assert_eq!(trace.entries(), vec!["Split", "A", "Audit"]);
}

#[tokio::test]
async fn handlers_of_one_event_run_in_registration_order() {
    let trace = Trace::default();
    let mut bus = Bootstrap::<App>::new(Dependencies::new().with(trace.clone()))
        .event::<Chain>(Event::C)
        .event::<Second>(Event::C)
        .messagebus()
        .unwrap();

    bus.publish(Event::C).await.unwrap();

    assert_eq!(trace.entries(), vec!["C", "second"]);
}

#[tokio::test]
async fn failing_handler_discards_the_rest_of_the_queue() {
    let trace = Trace::default();
    let mut bus = bootstrap(&trace).messagebus().unwrap();

    let err = bus.dispatch(Command::Split).await.unwrap_err();

    assert!(matches!(err, AppError::Refused("Broken")));
    // D from A's handler and the infra Audit event never run.
    assert_eq!(trace.entries(), vec!["Split", "A", "Broken"]);

    // The bus is usable again afterwards.
    bus.dispatch(Command::Start).await.unwrap();
    assert_eq!(trace.entries().last(), Some(&"C"));
}

#[tokio::test]
async fn each_session_gets_its_own_buffers() {
    let trace = Trace::default();
    let bootstrap = bootstrap(&trace);

    let mut first = bootstrap.messagebus().unwrap();
    let mut second = bootstrap.messagebus().unwrap();

    first.dispatch(Command::Start).await.unwrap();
    second.publish(Event::C).await.unwrap();

    assert_eq!(trace.entries(), vec!["Start", "A", "B", "D", "C", "C"]);
    assert!(bootstrap.unhandled_commands().is_empty());
}
