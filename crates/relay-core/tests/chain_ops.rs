//! Operaciones de cadena en caliente: inserción en el cursor, referencias
//! construibles vía registry y bifurcación por remanente.

mod support;

use std::sync::Arc;

use relay_core::model::ctx_value;
use relay_core::step::StepDef;
use relay_core::{Chain, Invoker, Outcome, StepRegistry, Terminal};
use support::{Doc, FnStep, Rec};

#[derive(Debug, PartialEq)]
struct Marker(&'static str);

#[test]
fn inserted_steps_run_before_queued_tail() {
    let mut chain = Chain::new(Arc::new(StepRegistry::<Doc>::new()));
    chain.add(FnStep::new("expansor", |cx| {
        cx.insert_step(Arc::new(FnStep::appender("x", "x")));
        cx.insert_step(Arc::new(FnStep::appender("y", "y")));
        Ok(Outcome::Continuing(Vec::new()))
    }));
    // ya estaba encolado antes de la expansión
    chain.add(FnStep::appender("z", "z"));
    chain.add(FnStep::finisher("fin"));

    let handle = Invoker::inline().submit(chain, Rec::new());

    assert_eq!(handle.terminal_now(), Some(Terminal::Done));
    let results = handle.results();
    let lines: Vec<&str> = results
        .iter()
        .flat_map(|d| d.lines.iter().map(String::as_str))
        .collect();
    assert_eq!(lines, vec!["x", "y", "z"]);
}

#[test]
fn buildable_ref_resolves_with_ambient_bag() {
    let mut registry = StepRegistry::<Doc>::new();
    registry
        .register_fn("eco", |bag: &relay_core::ContextBag| {
            // la fábrica decide el step mirando el contexto acumulado
            let marker = bag.get::<Marker>().map(|m| m.0).unwrap_or("sin-marca");
            Ok(Arc::new(FnStep::appender("eco", marker)) as Arc<dyn StepDef<Doc>>)
        })
        .unwrap();

    let mut chain = Chain::new(Arc::new(registry));
    chain.add(FnStep::new("marca", |_cx| {
        Ok(Outcome::Continuing(vec![ctx_value(Marker("sello"))]))
    }));
    chain.add_ref("eco").unwrap();
    chain.add(FnStep::finisher("fin"));

    let handle = Invoker::inline().submit(chain, Rec::new());

    assert_eq!(handle.terminal_now(), Some(Terminal::Done));
    let results = handle.results();
    assert_eq!(results[0].lines, vec!["sello"]);
}

#[test]
fn unknown_ref_is_refused_at_add_time() {
    let mut chain = Chain::new(Arc::new(StepRegistry::<Doc>::new()));
    assert!(chain.add_ref("nadie").is_err());
    assert!(chain.is_empty());
}

#[test]
fn remnant_forks_the_unexecuted_tail() {
    let mut chain = Chain::new(Arc::new(StepRegistry::<Doc>::new()));
    chain.contribute(ctx_value(Marker("semilla")));
    chain.add(FnStep::new("contribuye", |_cx| {
        Ok(Outcome::Continuing(vec![ctx_value(Marker("corrido"))]))
    }));
    chain.add(FnStep::new("veto", |_cx| Ok(Outcome::Rejected)));
    chain.add(FnStep::new("cola", |cx| {
        // en el fork, el contexto del run original sigue disponible
        assert_eq!(cx.get::<Marker>().as_deref(), Some(&Marker("corrido")));
        let doc = cx.response();
        doc.lines.push("cola".to_string());
        doc.complete = true;
        doc.touched = true;
        Ok(Outcome::Finished)
    }));

    let rec = Rec::new();
    let handle = Invoker::inline().submit(chain, rec.clone());
    assert_eq!(handle.terminal_now(), Some(Terminal::Rejected));

    // el remanente arranca en el step no ejecutado, con la bolsa plegada
    // como contribución estática
    let fork = handle.remnant();
    assert_eq!(fork.len(), 1);

    let fork_rec = Rec::new();
    let fork_handle = Invoker::inline().submit(fork, fork_rec.clone());
    assert_eq!(fork_handle.terminal_now(), Some(Terminal::Done));
    assert_eq!(fork_handle.results()[0].lines, vec!["cola"]);
    assert_eq!(fork_rec.terminals(), vec!["done:cola:1"]);
}

#[test]
fn remnant_seed_carries_each_value_once() {
    let mut chain = Chain::new(Arc::new(StepRegistry::<Doc>::new()));
    chain.contribute(ctx_value(Marker("semilla")));
    chain.add(FnStep::new("contribuye", |_cx| {
        Ok(Outcome::Continuing(vec![ctx_value(Marker("corrido"))]))
    }));
    chain.add(FnStep::new("veto", |_cx| Ok(Outcome::Rejected)));
    chain.add(FnStep::new("cola", |cx| {
        // sin duplicados: el seed de la cadena no se vuelve a plegar
        let all: Vec<&'static str> = cx.bag().get_all::<Marker>().iter().map(|m| m.0).collect();
        assert_eq!(all, vec!["semilla", "corrido"]);
        let doc = cx.response();
        doc.complete = true;
        doc.touched = true;
        Ok(Outcome::Finished)
    }));

    let handle = Invoker::inline().submit(chain, Rec::new());
    assert_eq!(handle.terminal_now(), Some(Terminal::Rejected));

    let fork = handle.remnant();
    assert_eq!(fork.seed().len(), 2);

    let fork_handle = Invoker::inline().submit(fork, Rec::new());
    assert_eq!(fork_handle.terminal_now(), Some(Terminal::Done));
}

#[test]
fn insert_outside_run_is_refused() {
    let mut chain = Chain::new(Arc::new(StepRegistry::<Doc>::new()));
    chain.add(FnStep::finisher("fin"));
    let entry = relay_core::ChainEntry::Ready(
        Arc::new(FnStep::appender("x", "x")) as Arc<dyn StepDef<Doc>>
    );
    assert!(chain.insert(entry).is_err());
}
