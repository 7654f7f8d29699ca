//! Events emitted while erasing, moving, casting and copying values.

use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    sync::{Arc, Mutex},
};

use poly::{cow::CopyOnWrite, prelude::*};
use tracing::{Event, Level, Subscriber, field::Field};
use tracing_subscriber::{
    Layer,
    layer::{Context, SubscriberExt},
    util::SubscriberInitExt,
};

callable! {
    pub struct Read;
    pub struct Bump;
}

type Shared = CopyOnWrite<u64>;

impl<'a> Call<(&'a Shared,)> for Read {
    type Output = u64;

    fn call(self, (value,): (&'a Shared,)) -> u64 {
        **value
    }
}

impl<'a> Call<(&'a mut Shared,)> for Bump {
    type Output = ();

    fn call(self, (value,): (&'a mut Shared,)) {
        *value.write() += 1;
    }
}

interface! {
    pub struct Counter: CounterModel + Send + Sync {
        fn read = Read(self: &Self) -> u64;
        fn bump = Bump(self: &mut Self);
    }
}

/// Records the level and message of every event, and separately the
/// `state` field of the events that have one.
#[derive(Clone, Default)]
struct Recorder {
    events: Arc<Mutex<Vec<(Level, String)>>>,
    states: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    fn take(&self) -> Vec<(Level, String)> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    fn take_states(&self) -> Vec<String> {
        std::mem::take(&mut *self.states.lock().unwrap())
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    state: Option<String>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_owned();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "state" => self.state = Some(format!("{value:?}")),
            _ => {}
        }
    }
}

impl<S: Subscriber> Layer<S> for Recorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.events
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.message));
        if let Some(state) = visitor.state {
            self.states.lock().unwrap().push(state);
        }
    }
}

fn recorded(level: Level, message: &str) -> (Level, String) {
    (level, message.to_owned())
}

#[test]
fn test_events() {
    let recorder = Recorder::default();
    let _guard = tracing_subscriber::registry()
        .with(recorder.clone())
        .set_default();

    let mut first = Counter::new(Shared::new(1));
    assert_eq!(
        recorder.take(),
        [recorded(Level::TRACE, "erased value into interface")]
    );

    let mut second = first.clone();
    second.bump();
    assert_eq!(
        recorder.take(),
        [recorded(Level::TRACE, "copying shared value before write")]
    );

    // Writing to the now unique value does not copy it again.
    second.bump();
    assert_eq!(second.read(), 3);
    assert_eq!(first.read(), 1);
    assert!(recorder.take().is_empty());

    assert!(first.cast::<u64>().is_err());
    assert_eq!(
        recorder.take(),
        [recorded(Level::DEBUG, "interface cast failed")]
    );

    let _taken = first.take();
    assert_eq!(
        recorder.take(),
        [recorded(Level::TRACE, "moved value out of interface")]
    );
    assert_eq!(recorder.take_states(), ["Holding"]);

    let result = catch_unwind(AssertUnwindSafe(|| first.read()));
    assert!(result.is_err());
    assert_eq!(
        recorder.take(),
        [recorded(
            Level::ERROR,
            "operation on an interface value that holds nothing"
        )]
    );
    assert_eq!(recorder.take_states(), ["MovedFrom"]);
}
