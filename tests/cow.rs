//! Interface values holding copy-on-write values.

use poly::{
    cow::CopyOnWrite,
    markers::Local,
    prelude::*,
};

callable! {
    pub struct Append;
    pub struct Lines;
}

type Shared = CopyOnWrite<Vec<String>>;

impl<'a> Call<(&'a mut Shared, String)> for Append {
    type Output = ();

    fn call(self, (lines, line): (&'a mut Shared, String)) {
        lines.write().push(line);
    }
}

impl<'a> Call<(&'a Shared,)> for Lines {
    type Output = usize;

    fn call(self, (lines,): (&'a Shared,)) -> usize {
        lines.len()
    }
}

impl<'a> Call<(&'a mut CopyOnWrite<Vec<String>, Local>, String)> for Append {
    type Output = ();

    fn call(self, (lines, line): (&'a mut CopyOnWrite<Vec<String>, Local>, String)) {
        lines.write().push(line);
    }
}

impl<'a> Call<(&'a CopyOnWrite<Vec<String>, Local>,)> for Lines {
    type Output = usize;

    fn call(self, (lines,): (&'a CopyOnWrite<Vec<String>, Local>,)) -> usize {
        lines.len()
    }
}

interface! {
    /// A log that can be handed to other threads.
    pub struct Log: LogModel + Send + Sync {
        fn append = Append(self: &mut Self, line: String);
        fn lines = Lines(self: &Self) -> usize;
    }
}

interface! {
    pub struct LocalLog: LocalLogModel {
        fn append = Append(self: &mut Self, line: String);
        fn lines = Lines(self: &Self) -> usize;
    }
}

fn shared(log: &Log) -> &Shared {
    log.cast::<Shared>().unwrap()
}

#[test]
fn test_copies_share_until_written() {
    let mut first = Log::new(Shared::new(vec![String::from("start")]));
    let second = first.clone();
    let third = second.clone();

    assert_eq!(shared(&first).use_count(), 3);
    assert!(shared(&first).ptr_eq(shared(&third)));

    first.append(String::from("first only"));

    assert_eq!(first.lines(), 2);
    assert_eq!(second.lines(), 1);
    assert_eq!(third.lines(), 1);
    assert!(shared(&first).is_unique());
    assert_eq!(shared(&second).use_count(), 2);
    assert!(!shared(&first).ptr_eq(shared(&second)));
}

#[test]
fn test_unique_value_is_written_in_place() {
    let mut log = Log::new(Shared::default());
    log.append(String::from("a"));
    log.append(String::from("b"));

    assert!(shared(&log).is_unique());
    assert_eq!(
        log.downcast::<Shared>().ok().map(CopyOnWrite::into_inner),
        Some(vec![String::from("a"), String::from("b")])
    );
}

#[test]
fn test_local_sharing() {
    let mut first = LocalLog::new(CopyOnWrite::<Vec<String>, Local>::default());
    let second = first.clone();
    assert_eq!(
        first
            .cast::<CopyOnWrite<Vec<String>, Local>>()
            .map(CopyOnWrite::use_count),
        Ok(2)
    );

    call!(Append, &mut first, String::from("only here"));
    assert_eq!(first.lines(), 1);
    assert_eq!(second.lines(), 0);
}
